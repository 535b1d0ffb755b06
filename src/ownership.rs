//! Ownership guard shared by every mutating resource operation.
//!
//! Edit and delete load the target by id alone and then compare owners.
//! A missing record and a record owned by someone else produce the same
//! `AccessDenied`, so callers learn nothing about ids they do not own.

use tracing::warn;

use crate::error::AppError;

/// A record with exactly one owning user.
pub trait OwnedResource {
    fn owner_id(&self) -> i64;
}

/// Returns the record if `caller_id` owns it, `AccessDenied` otherwise.
pub fn ensure_owner<T: OwnedResource>(record: Option<T>, caller_id: i64) -> Result<T, AppError> {
    match record {
        Some(r) if r.owner_id() == caller_id => Ok(r),
        Some(r) => {
            warn!(caller_id, owner_id = r.owner_id(), "ownership check failed");
            Err(AppError::AccessDenied)
        }
        None => {
            warn!(caller_id, "ownership check on missing record");
            Err(AppError::AccessDenied)
        }
    }
}
