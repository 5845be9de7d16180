/// Host loop defaults.
///
/// The activity-change probability is a per-minute weight: at 1.0 the host changes activity
/// about three times a minute.
pub const DEFAULT_ACTIVITY_CHANGE_PROBABILITY: f64 = 0.5;
pub const ACTIVITY_CHANGES_PER_MINUTE_AT_FULL: f64 = 3.0;

pub const DEFAULT_HOST_SEED: u64 = 0x4057_1ED5;
