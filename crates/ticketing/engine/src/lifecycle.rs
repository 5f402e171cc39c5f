//! The trip lifecycle engine.
//!
//! Owns every `Trip` and `TripRequest` transition: publish, request,
//! decide, cancel. The approved-distributor set is monotonic so that a
//! distributor, once cleared, keeps its selling right through later
//! status churn; sale eligibility is re-derived from set membership, not
//! from the coarse trip status.

use crate::access::require_role;
use crate::notify::NotificationCoordinator;
use std::sync::Arc;
use ticketing_store::{
    CompanyStore, DistributorStore, RequestStore, TicketingStore, TripStore,
};
use ticketing_types::{
    CompanyId, DistributorId, RequestId, RequestStatus, Role, TicketingError, TicketingResult,
    Trip, TripId, TripRequest, TripSpec, TripStatus, User,
};
use tracing::info;

/// Publishes trips and moves them and their requests through the state
/// machines.
pub struct TripManager {
    store: Arc<dyn TicketingStore>,
    notifier: Arc<NotificationCoordinator>,
}

impl TripManager {
    pub fn new(store: Arc<dyn TicketingStore>, notifier: Arc<NotificationCoordinator>) -> Self {
        Self { store, notifier }
    }

    /// Publish a trip for the identified organizer company.
    ///
    /// Only the company's owning user may publish. The trip is sellable
    /// (`Active`) immediately; the organizer's own sales need no
    /// approval step.
    pub fn publish_trip(
        &self,
        actor: Option<&User>,
        company_id: &CompanyId,
        spec: TripSpec,
    ) -> TicketingResult<Trip> {
        let actor = require_role(actor, &[Role::Company])?;
        let company = self
            .store
            .get_company(company_id)
            .ok_or_else(|| TicketingError::not_found("company not found"))?;
        if company.owner_user_id != actor.id {
            return Err(TicketingError::denied("company not owned by actor"));
        }
        if spec.seats_total == 0 || spec.per_person_limit == 0 {
            return Err(TicketingError::invalid(
                "seats and per-person limit must be positive",
            ));
        }

        let mut trip = Trip::new(company.id, spec);
        trip.status = TripStatus::Active;
        let trip = self.store.save_trip(trip);
        info!(trip = %trip.id.short(), destination = %trip.destination, "trip published");
        Ok(trip)
    }

    /// Submit a distributor's request for selling rights.
    ///
    /// Repeat requests from the same distributor are not de-duplicated;
    /// each becomes its own record for the organizer to decide.
    pub fn request_trip(
        &self,
        actor: Option<&User>,
        distributor_id: &DistributorId,
        trip_id: &TripId,
    ) -> TicketingResult<TripRequest> {
        let actor = require_role(actor, &[Role::Distributor])?;
        let distributor = self
            .store
            .get_distributor(distributor_id)
            .ok_or_else(|| TicketingError::not_found("distributor not found"))?;
        if distributor.owner_user_id != actor.id {
            return Err(TicketingError::denied("distributor not owned by actor"));
        }
        let trip = self
            .store
            .get_trip(trip_id)
            .ok_or_else(|| TicketingError::not_found("trip not found"))?;
        if trip.status.is_terminal() {
            return Err(TicketingError::invalid(
                "cannot request a cancelled or completed trip",
            ));
        }

        let request = self
            .store
            .save_request(TripRequest::new(trip.id.clone(), distributor.id.clone()));
        info!(
            request = %request.id.short(),
            trip = %trip.id.short(),
            distributor = %distributor.id.short(),
            "trip request submitted"
        );

        let company = self
            .store
            .get_company(&trip.organizer_company_id)
            .ok_or_else(|| TicketingError::not_found("organizer company not found"))?;
        self.notifier
            .on_request_submitted(&request, &company.owner_user_id);
        Ok(request)
    }

    /// Decide a pending request.
    ///
    /// Approval marks the request `Approved`, adds the distributor to
    /// the trip's approved set (a no-op if already present), and
    /// advances the coarse status `Active -> Approved` on the first
    /// approval only; the status is never re-derived afterwards.
    /// Rejection marks the request `Rejected` with no trip-level side
    /// effect.
    pub fn decide_request(
        &self,
        actor: Option<&User>,
        request_id: &RequestId,
        approve: bool,
    ) -> TicketingResult<Trip> {
        let actor = require_role(actor, &[Role::Company])?;
        let mut request = self
            .store
            .get_request(request_id)
            .ok_or_else(|| TicketingError::not_found("request not found"))?;
        let mut trip = self
            .store
            .get_trip(&request.trip_id)
            .ok_or_else(|| TicketingError::not_found("trip not found"))?;
        let company = self
            .store
            .get_company(&trip.organizer_company_id)
            .ok_or_else(|| TicketingError::not_found("organizer company not found"))?;
        if company.owner_user_id != actor.id {
            return Err(TicketingError::denied("company not owned by actor"));
        }
        if request.status.is_terminal() {
            return Err(TicketingError::invalid("request already decided"));
        }

        if approve {
            request.status = RequestStatus::Approved;
            trip.approve_distributor(request.distributor_id.clone());
            if trip.status == TripStatus::Active {
                trip.status = TripStatus::Approved;
            }
            info!(
                request = %request.id.short(),
                distributor = %request.distributor_id.short(),
                trip = %trip.id.short(),
                "request approved"
            );
        } else {
            request.status = RequestStatus::Rejected;
            info!(request = %request.id.short(), "request rejected");
        }

        self.store.save_request(request);
        Ok(self.store.save_trip(trip))
    }

    /// Cancel a trip from any non-terminal status.
    ///
    /// Permitted to an admin or to the owning company. The approved set
    /// is frozen, not cleared, and previously sold tickets stay exactly
    /// as they were; only further sales are blocked.
    pub fn cancel_trip(&self, actor: Option<&User>, trip_id: &TripId) -> TicketingResult<Trip> {
        let actor = require_role(actor, &[Role::Admin, Role::Company])?;
        let mut trip = self
            .store
            .get_trip(trip_id)
            .ok_or_else(|| TicketingError::not_found("trip not found"))?;
        let company = self
            .store
            .get_company(&trip.organizer_company_id)
            .ok_or_else(|| TicketingError::not_found("organizer company not found"))?;
        if actor.role == Role::Company && company.owner_user_id != actor.id {
            return Err(TicketingError::denied("not permitted to cancel"));
        }
        if trip.status.is_terminal() {
            return Err(TicketingError::invalid("trip already closed"));
        }

        trip.status = TripStatus::Cancelled;
        let trip = self.store.save_trip(trip);
        info!(trip = %trip.id.short(), "trip cancelled");
        self.notifier.on_trip_cancelled(&trip);
        Ok(trip)
    }

    pub fn get_trip(&self, trip_id: &TripId) -> TicketingResult<Trip> {
        self.store
            .get_trip(trip_id)
            .ok_or_else(|| TicketingError::not_found("trip not found"))
    }
}
