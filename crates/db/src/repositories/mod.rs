//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods participating
//! in the entry/exit transaction take `&mut PgConnection` so they can
//! run inside the caller's transaction.

pub mod camera_repo;
pub mod notification_repo;
pub mod parking_lot_repo;
pub mod parking_session_repo;
pub mod parking_slot_repo;
pub mod payment_repo;
pub mod refresh_token_repo;
pub mod role_repo;
pub mod uploaded_image_repo;
pub mod user_repo;
pub mod vehicle_repo;

pub use camera_repo::CameraRepo;
pub use notification_repo::NotificationRepo;
pub use parking_lot_repo::ParkingLotRepo;
pub use parking_session_repo::ParkingSessionRepo;
pub use parking_slot_repo::ParkingSlotRepo;
pub use payment_repo::PaymentRepo;
pub use refresh_token_repo::RefreshTokenRepo;
pub use role_repo::RoleRepo;
pub use uploaded_image_repo::UploadedImageRepo;
pub use user_repo::UserRepo;
pub use vehicle_repo::VehicleRepo;
