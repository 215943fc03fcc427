//! Helpers for classifying PostgreSQL errors.

/// Unique index guarding against duplicate pingback registration.
pub const PINGBACK_UNIQUE_CONSTRAINT: &str = "pingbacks_target_source_ip_key";

/// Returns `true` if the error is a unique violation on `constraint`.
pub fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}
