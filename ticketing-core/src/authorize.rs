//! Ownership/role authorization predicates
//!
//! Every mutation path goes through these two predicates instead of
//! per-route checks. Role only gates event creation; update and delete
//! require an exact owner match, with no admin override.

use uuid::Uuid;

use crate::error::{TicketingError, TicketingResult};
use crate::models::{Event, Role};

/// Only organizers and admins may create events
pub fn can_create_event(role: Role) -> bool {
    matches!(role, Role::Organizer | Role::Admin)
}

/// Only the event's creator may mutate or delete it
pub fn can_mutate(event: &Event, user_id: Uuid) -> bool {
    event.owner == user_id
}

/// Fail with `Forbidden` unless the role may create events
pub fn require_create_role(role: Role) -> TicketingResult<()> {
    if !can_create_event(role) {
        return Err(TicketingError::forbidden(format!(
            "Role '{role}' may not create events; requires organizer or admin"
        )));
    }
    Ok(())
}

/// Fail with `Forbidden` unless `user_id` owns the event
pub fn require_owner(event: &Event, user_id: Uuid) -> TicketingResult<()> {
    if !can_mutate(event, user_id) {
        return Err(TicketingError::forbidden(
            "Only the event creator can perform this action",
        ));
    }
    Ok(())
}
