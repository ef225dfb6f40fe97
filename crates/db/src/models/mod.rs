//! Row models (`FromRow` + `Serialize`) and create/update DTOs.

pub mod camera;
pub mod notification;
pub mod parking_lot;
pub mod parking_session;
pub mod parking_slot;
pub mod payment;
pub mod refresh_token;
pub mod role;
pub mod uploaded_image;
pub mod user;
pub mod vehicle;
