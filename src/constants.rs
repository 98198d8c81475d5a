//! Shared constants.

/// Seconds in a minute, for `expire` arguments.
pub const MINUTE_IN_SECONDS: i64 = 60;

/// Seconds in an hour.
pub const HOUR_IN_SECONDS: i64 = 60 * MINUTE_IN_SECONDS;

/// Seconds in a day.
pub const DAY_IN_SECONDS: i64 = 24 * HOUR_IN_SECONDS;

/// Seconds in a week.
pub const WEEK_IN_SECONDS: i64 = 7 * DAY_IN_SECONDS;

/// Seconds in a (non-leap) year.
pub const YEAR_IN_SECONDS: i64 = 365 * DAY_IN_SECONDS;

/// Group used when the caller does not name one.
pub const DEFAULT_GROUP: &str = "default";

/// Priority assigned to implementations registered without one.
pub const DEFAULT_PRIORITY: i64 = 10;

/// Priority of the built-in durable backend.
pub const DURABLE_PRIORITY: i64 = 10;

/// Priority of the built-in in-memory fallback backend.
pub const MEMORY_PRIORITY: i64 = 100;

/// Identifier of the built-in durable backend.
pub const DURABLE_IDENTIFIER: &str = "localStorage";

/// Identifier of the built-in in-memory backend.
pub const MEMORY_IDENTIFIER: &str = "variableStorage";

/// Key prefix owned by the durable backend in its storage medium.
pub const DEFAULT_NAMESPACE: &str = "wpCache";

/// Warning logged when an operation runs without an active backend.
pub const NO_IMPLEMENTATION_MESSAGE: &str = "No cache implementation set.";
