//! License-plate extraction from the detector's loose response shapes.
//!
//! Depending on deployment, the detector returns plate text either as
//! JSON (`{"plates": [...]}`, `{"details": [{"text": ...}]}`, or a flat
//! field) or as a response header next to an annotated image. The
//! helpers here normalize all of those into `Option<String>`.

/// Header names the detector has been observed using for plate text.
pub const PLATE_HEADERS: &[&str] = &[
    "x-license-plate",
    "license-plate",
    "x-detected-license-plate",
    "detected-license-plate",
];

/// Flat JSON field names that may carry plate text.
const PLATE_FIELDS: &[&str] = &[
    "license_plate",
    "licensePlate",
    "plate",
    "plate_number",
    "detected_plate",
];

/// Trim and validate raw plate text, rejecting placeholder values the
/// detector emits for "nothing found".
pub fn normalize_plate(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "null" | "none" | "undefined" | "n/a" => None,
        _ => Some(trimmed.to_string()),
    }
}

/// Extract plate text from a JSON response body.
///
/// Checks, in order: the `plates` array, the `details` array
/// (`text`/`plate` keys), and the flat field names in [`PLATE_FIELDS`].
pub fn plate_from_json(body: &serde_json::Value) -> Option<String> {
    if let Some(first) = body.get("plates").and_then(|p| p.as_array()).and_then(|p| p.first()) {
        if let Some(plate) = first.as_str().and_then(normalize_plate) {
            return Some(plate);
        }
    }

    if let Some(first) = body.get("details").and_then(|d| d.as_array()).and_then(|d| d.first()) {
        for key in ["text", "plate"] {
            if let Some(plate) = first.get(key).and_then(|v| v.as_str()).and_then(normalize_plate) {
                return Some(plate);
            }
        }
    }

    for field in PLATE_FIELDS {
        if let Some(plate) = body.get(*field).and_then(|v| v.as_str()).and_then(normalize_plate) {
            return Some(plate);
        }
    }

    None
}
