use crate::errors::ServiceError;

/// Verifies that `actor` owns a resource whose owner field is `owner`.
///
/// Every owner-gated mutation goes through this one check. Authorization
/// failures surface as NotFound with the same message a genuinely missing
/// resource produces, so callers cannot probe for resource existence.
pub fn ensure_owner(kind: &str, owner: &str, actor: &str) -> Result<(), ServiceError> {
    if owner == actor {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("{} not found", kind)))
    }
}
