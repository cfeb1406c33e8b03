//! Process exit codes returned by [`crate::run`].

/// Command completed.
pub const SUCCESS: i32 = 0;

/// Bad arguments, invalid configuration, or a failed command.
pub const ERROR: i32 = 2;

/// Stopped before finishing (Ctrl+C convention).
pub const INTERRUPTED: i32 = 130;
