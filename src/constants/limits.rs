/// Warnings before an automatic escalation ban
pub const WARN_BAN_THRESHOLD: i64 = 3;

/// Length of the escalation ban issued at the warning threshold
pub const ESCALATION_BAN_DAYS: i64 = 30;

/// Trailing window for flood detection (3 minutes)
pub const FLOOD_WINDOW_SECONDS: i64 = 180;

/// Messages allowed inside the window before the throttle fires
pub const FLOOD_MESSAGE_LIMIT: usize = 10;

/// Length of the automatic restriction applied to a flooding user
pub const FLOOD_RESTRICT_SECONDS: i64 = 180;

/// How often idle flood windows are swept from memory
pub const FLOOD_SWEEP_INTERVAL_SECONDS: u64 = 60;
