//! Notification records.
//!
//! Created only by the notification coordinator when a state transition
//! is accepted. Engines never read notifications back; the records flow
//! one way, store to inbox.

use crate::ids::{NotificationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened. One kind per coordinator trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    TripRequested,
    TripCancelled,
    TicketsSoldSummary,
    UpcomingTripUnsold,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotificationKind::TripRequested => "trip-requested",
            NotificationKind::TripCancelled => "trip-cancelled",
            NotificationKind::TicketsSoldSummary => "tickets-sold-summary",
            NotificationKind::UpcomingTripUnsold => "upcoming-trip-unsold",
        };
        write!(f, "{name}")
    }
}

/// An addressed notification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    /// Recipient.
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub payload: String,
    pub created_at: DateTime<Utc>,
    /// Set at most once; the first mark wins.
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn new(user_id: UserId, kind: NotificationKind, payload: impl Into<String>) -> Self {
        Self {
            id: NotificationId::generate(),
            user_id,
            kind,
            payload: payload.into(),
            created_at: Utc::now(),
            read_at: None,
        }
    }

    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Stamp the read time. A second mark keeps the first timestamp.
    pub fn mark_read(&mut self) {
        if self.read_at.is_none() {
            self.read_at = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unread_until_marked() {
        let mut n = Notification::new(
            UserId::new("user-1"),
            NotificationKind::TripCancelled,
            "trip cancelled",
        );
        assert!(!n.is_read());
        n.mark_read();
        assert!(n.is_read());
    }

    #[test]
    fn second_mark_keeps_first_timestamp() {
        let mut n = Notification::new(
            UserId::new("user-1"),
            NotificationKind::TicketsSoldSummary,
            "sold 3",
        );
        n.mark_read();
        let first = n.read_at;
        n.mark_read();
        assert_eq!(n.read_at, first);
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(NotificationKind::TripRequested.to_string(), "trip-requested");
        assert_eq!(
            NotificationKind::UpcomingTripUnsold.to_string(),
            "upcoming-trip-unsold"
        );
    }
}
