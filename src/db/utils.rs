//! Database utility functions.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;

static ID_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Generate an 8-character hex ID for database entities.
///
/// Mixes the clock with a process-wide sequence so ids created within the
/// same nanosecond (a unit and its provisioned property) still differ.
pub fn generate_entity_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let sequence = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let value = (duration.as_secs() as u32)
        ^ duration.subsec_nanos()
        ^ sequence.wrapping_mul(0x9E37_79B9);
    format!("{:08x}", value)
}

/// Get current datetime as string in SQLite format
pub fn current_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Use the caller's id when present, otherwise generate one.
pub fn id_or_generate(id: &str) -> String {
    if id.is_empty() {
        generate_entity_id()
    } else {
        id.to_string()
    }
}
