//! Sold tickets.
//!
//! A ticket binds one seat on one trip to one buyer name. The
//! `(trip, seat)` pair is unique across all tickets for all time; tickets
//! are never deleted, and trip cancellation does not touch them.

use crate::ids::{CashierId, TicketId, TripId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ticket status. Sales confirm immediately; `Pending` only exists
/// between construction and the sale engine stamping the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TicketStatus {
    #[default]
    Pending,
    Confirmed,
}

/// One sold seat.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub trip_id: TripId,
    /// 1-based seat number, `1 ..= seats_total` of the trip.
    pub seat_number: u32,
    pub cashier_id: CashierId,
    pub buyer_name: String,
    pub buyer_contact: String,
    pub sold_at: DateTime<Utc>,
    pub status: TicketStatus,
}

impl Ticket {
    pub fn new(
        trip_id: TripId,
        seat_number: u32,
        cashier_id: CashierId,
        buyer_name: impl Into<String>,
        buyer_contact: impl Into<String>,
    ) -> Self {
        Self {
            id: TicketId::generate(),
            trip_id,
            seat_number,
            cashier_id,
            buyer_name: buyer_name.into(),
            buyer_contact: buyer_contact.into(),
            sold_at: Utc::now(),
            status: TicketStatus::Pending,
        }
    }

    /// Case-insensitive exact buyer-name match. No fuzzy dedup.
    pub fn matches_buyer(&self, buyer_name: &str) -> bool {
        self.buyer_name.eq_ignore_ascii_case(buyer_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(buyer: &str) -> Ticket {
        Ticket::new(
            TripId::new("trip-1"),
            7,
            CashierId::new("cash-1"),
            buyer,
            "+359 888 000 000",
        )
    }

    #[test]
    fn new_ticket_is_pending() {
        assert_eq!(ticket("Alice").status, TicketStatus::Pending);
    }

    #[test]
    fn buyer_match_ignores_case() {
        let t = ticket("Alice");
        assert!(t.matches_buyer("ALICE"));
        assert!(t.matches_buyer("alice"));
        assert!(!t.matches_buyer("Alicia"));
    }
}
