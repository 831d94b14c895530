mod tracking_id;

pub use tracking_id::{generate_tracking_id, generate_tracking_id_at, is_valid_tracking_id, TRACKING_ID_PREFIX};
