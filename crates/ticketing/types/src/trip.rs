//! Trips and trip requests: the two state machines of the system.
//!
//! A trip is published by its organizer company and is sellable while
//! `Active` or `Approved`. Distributors ask for selling rights through
//! trip requests; the organizer decides each request. The approved
//! distributor set only grows. Cancellation freezes it in place rather
//! than clearing it, so sale eligibility is always re-derived from set
//! membership, never from the coarse status.

use crate::ids::{CompanyId, DistributorId, RequestId, TripId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse trip status.
///
/// The status advances `Active -> Approved` when the first request is
/// approved and is not re-derived afterwards; `Cancelled` is reachable
/// from any non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TripStatus {
    /// Created but not yet published.
    #[default]
    Draft,
    /// Published by the organizer; the organizer's own sales may start.
    Active,
    /// At least one distributor has asked for selling rights.
    Requested,
    /// At least one distributor request has been approved.
    Approved,
    /// Cancelled by the organizer or an admin. Terminal.
    Cancelled,
    /// Departed and closed out. Terminal.
    Completed,
}

impl TripStatus {
    /// Ticket sales are permitted in this status.
    pub fn is_sellable(&self) -> bool {
        matches!(self, TripStatus::Active | TripStatus::Approved)
    }

    /// No further transitions leave this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TripStatus::Cancelled | TripStatus::Completed)
    }
}

/// Everything a company states when publishing a trip.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TripSpec {
    /// Free-form trip kind, e.g. "excursion" or "shuttle".
    pub kind: String,
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub seats_total: u32,
    pub per_person_limit: u32,
    pub transport_types: Vec<String>,
}

impl TripSpec {
    pub fn new(
        kind: impl Into<String>,
        destination: impl Into<String>,
        departure: DateTime<Utc>,
        arrival: DateTime<Utc>,
        seats_total: u32,
        per_person_limit: u32,
    ) -> Self {
        Self {
            kind: kind.into(),
            destination: destination.into(),
            departure,
            arrival,
            seats_total,
            per_person_limit,
            transport_types: Vec::new(),
        }
    }

    pub fn with_transport(mut self, transport_type: impl Into<String>) -> Self {
        self.transport_types.push(transport_type.into());
        self
    }
}

/// A published trip.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub organizer_company_id: CompanyId,
    /// Free-form trip kind, e.g. "excursion" or "shuttle".
    pub kind: String,
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub seats_total: u32,
    /// Maximum tickets one buyer name may hold on this trip.
    pub per_person_limit: u32,
    pub status: TripStatus,
    pub transport_types: Vec<String>,
    /// Distributors cleared to sell seats. Grows monotonically; frozen
    /// (not cleared) by cancellation.
    pub approved_distributor_ids: Vec<DistributorId>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn new(organizer_company_id: CompanyId, spec: TripSpec) -> Self {
        Self {
            id: TripId::generate(),
            organizer_company_id,
            kind: spec.kind,
            destination: spec.destination,
            departure: spec.departure,
            arrival: spec.arrival,
            seats_total: spec.seats_total,
            per_person_limit: spec.per_person_limit,
            status: TripStatus::Draft,
            transport_types: spec.transport_types,
            approved_distributor_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Add a distributor to the approved set. Re-approving the same
    /// distributor is a no-op.
    pub fn approve_distributor(&mut self, distributor_id: DistributorId) {
        if !self.approved_distributor_ids.contains(&distributor_id) {
            self.approved_distributor_ids.push(distributor_id);
        }
    }

    pub fn is_distributor_approved(&self, distributor_id: &DistributorId) -> bool {
        self.approved_distributor_ids.contains(distributor_id)
    }
}

/// Status of a single distributor's request. Terminal once decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RequestStatus {
    #[default]
    Requested,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }
}

/// One distributor's ask for selling rights on one trip. Multiple
/// requests per trip are allowed, including repeats from the same
/// distributor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TripRequest {
    pub id: RequestId,
    pub trip_id: TripId,
    pub distributor_id: DistributorId,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl TripRequest {
    pub fn new(trip_id: TripId, distributor_id: DistributorId) -> Self {
        Self {
            id: RequestId::generate(),
            trip_id,
            distributor_id,
            status: RequestStatus::Requested,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn trip() -> Trip {
        let departure = Utc::now() + Duration::hours(48);
        let spec = TripSpec::new(
            "excursion",
            "Plovdiv",
            departure,
            departure + Duration::hours(3),
            40,
            4,
        )
        .with_transport("bus");
        Trip::new(CompanyId::new("comp-1"), spec)
    }

    #[test]
    fn new_trip_starts_draft() {
        let t = trip();
        assert_eq!(t.status, TripStatus::Draft);
        assert!(!t.status.is_sellable());
    }

    #[test]
    fn sellable_statuses() {
        assert!(TripStatus::Active.is_sellable());
        assert!(TripStatus::Approved.is_sellable());
        assert!(!TripStatus::Cancelled.is_sellable());
        assert!(!TripStatus::Draft.is_sellable());
    }

    #[test]
    fn terminal_statuses() {
        assert!(TripStatus::Cancelled.is_terminal());
        assert!(TripStatus::Completed.is_terminal());
        assert!(!TripStatus::Approved.is_terminal());
    }

    #[test]
    fn approving_distributor_is_idempotent() {
        let mut t = trip();
        let dist = DistributorId::new("dist-1");
        t.approve_distributor(dist.clone());
        t.approve_distributor(dist.clone());
        assert_eq!(t.approved_distributor_ids.len(), 1);
        assert!(t.is_distributor_approved(&dist));
    }

    #[test]
    fn trip_serde_round_trip() {
        let mut t = trip();
        t.approve_distributor(DistributorId::new("dist-1"));
        let json = serde_json::to_string(&t).unwrap();
        let back: Trip = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, t.id);
        assert_eq!(back.status, t.status);
        assert!(back.is_distributor_approved(&DistributorId::new("dist-1")));
    }

    #[test]
    fn request_starts_undecided() {
        let req = TripRequest::new(TripId::new("trip-1"), DistributorId::new("dist-1"));
        assert_eq!(req.status, RequestStatus::Requested);
        assert!(!req.status.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }
}
