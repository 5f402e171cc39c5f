//! The authorization guard.
//!
//! A pure role-membership check with no store access and no side
//! effects. Every mutating engine operation calls it before reading any
//! other entity, so an authorization failure is observable regardless of
//! whether the referenced entities exist.

use ticketing_types::{Role, TicketingError, TicketingResult, User};

/// Admit `actor` if present, active, and holding one of `allowed`.
///
/// Returns the admitted user so callers can keep working with the
/// borrow. Fails with `AccessDenied` otherwise.
pub fn require_role<'a>(actor: Option<&'a User>, allowed: &[Role]) -> TicketingResult<&'a User> {
    let actor = actor.ok_or_else(|| TicketingError::denied("missing actor"))?;
    if !actor.is_active() {
        return Err(TicketingError::denied("actor is inactive"));
    }
    if !allowed.contains(&actor.role) {
        return Err(TicketingError::denied(format!(
            "role {} not permitted",
            actor.role
        )));
    }
    Ok(actor)
}
