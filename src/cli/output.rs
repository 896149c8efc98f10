//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Exit status for a cancelled configuration pass (as for SIGINT)
pub const EXIT_CANCELLED: i32 = 130;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    if e.is_cancellation() {
        return format!("{}. Choices made before cancelling were saved.", e);
    }
    e.to_string()
}

/// Process exit status for a failed command
pub fn exit_code(e: &ApiError) -> i32 {
    if e.is_cancellation() {
        EXIT_CANCELLED
    } else {
        1
    }
}
