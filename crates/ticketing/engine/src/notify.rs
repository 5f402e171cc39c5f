//! The notification coordinator.
//!
//! Pure fan-out: accepted state transitions come in, addressed
//! notification records go out through the store. No business rules are
//! evaluated here; the engines have already decided that the transition
//! happened. The coordinator also owns the user-facing inbox operations.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use ticketing_store::{
    CashierStore, CompanyStore, DistributorStore, NotificationStore, TicketStore, TicketingStore,
    TripStore,
};
use ticketing_types::{
    Notification, NotificationId, NotificationKind, TicketingError, TicketingResult, Trip,
    TripRequest, UserId,
};
use tracing::{debug, info};

/// Writes addressed notification records for every affected party of an
/// accepted transition.
pub struct NotificationCoordinator {
    store: Arc<dyn TicketingStore>,
}

impl NotificationCoordinator {
    pub fn new(store: Arc<dyn TicketingStore>) -> Self {
        Self { store }
    }

    fn push(&self, user: UserId, kind: NotificationKind, payload: String) {
        debug!(recipient = %user, kind = %kind, "notification queued");
        self.store
            .save_notification(Notification::new(user, kind, payload));
    }

    /// A distributor asked for selling rights; tell the organizer's
    /// owner.
    pub fn on_request_submitted(&self, request: &TripRequest, company_owner: &UserId) {
        self.push(
            company_owner.clone(),
            NotificationKind::TripRequested,
            format!(
                "trip request submitted by distributor {}",
                request.distributor_id
            ),
        );
    }

    /// A trip was cancelled; tell every approved distributor's owner and
    /// every cashier under each of them. The approved set is frozen by
    /// cancellation, so this is the complete audience.
    pub fn on_trip_cancelled(&self, trip: &Trip) {
        for distributor_id in &trip.approved_distributor_ids {
            let Some(distributor) = self.store.get_distributor(distributor_id) else {
                continue;
            };
            self.push(
                distributor.owner_user_id.clone(),
                NotificationKind::TripCancelled,
                format!("trip {} cancelled", trip.id),
            );
            for cashier in self.store.cashiers_by_distributor(&distributor.id) {
                self.push(
                    cashier.user_id.clone(),
                    NotificationKind::TripCancelled,
                    format!("trip {} cancelled", trip.id),
                );
            }
        }
    }

    /// A seat was sold; tell the organizer's owner with a sold-count
    /// summary recomputed from the store, never cached.
    pub fn on_ticket_sold(&self, trip: &Trip, company_owner: &UserId) {
        let sold = self.store.tickets_by_trip(&trip.id).len();
        self.push(
            company_owner.clone(),
            NotificationKind::TicketsSoldSummary,
            format!("trip {} sold {} of {} seats", trip.id, sold, trip.seats_total),
        );
    }

    /// Pull-based sweep over sellable trips departing within
    /// `horizon_hours` of `now` that still have unsold seats. Notifies
    /// the organizer's owner and every approved distributor's owner.
    /// Returns the flagged trips.
    pub fn notify_upcoming_unsold(&self, now: DateTime<Utc>, horizon_hours: i64) -> Vec<Trip> {
        let until = now + Duration::hours(horizon_hours);
        let mut flagged = Vec::new();

        for trip in self.store.sellable_trips() {
            if trip.departure < now || trip.departure > until {
                continue;
            }
            let sold = self.store.tickets_by_trip(&trip.id).len();
            if sold as u32 >= trip.seats_total {
                continue;
            }

            let payload = format!(
                "trip {} departing soon has {} unsold seats",
                trip.id,
                trip.seats_total - sold as u32
            );
            if let Some(company) = self.store.get_company(&trip.organizer_company_id) {
                self.push(
                    company.owner_user_id.clone(),
                    NotificationKind::UpcomingTripUnsold,
                    payload.clone(),
                );
            }
            for distributor_id in &trip.approved_distributor_ids {
                if let Some(distributor) = self.store.get_distributor(distributor_id) {
                    self.push(
                        distributor.owner_user_id.clone(),
                        NotificationKind::UpcomingTripUnsold,
                        payload.clone(),
                    );
                }
            }
            flagged.push(trip);
        }

        info!(
            flagged = flagged.len(),
            horizon_hours, "upcoming-trip sweep finished"
        );
        flagged
    }

    // inbox operations

    /// Notifications addressed to one user, oldest first.
    pub fn inbox(&self, user: &UserId) -> Vec<Notification> {
        self.store.notifications_for(user)
    }

    /// Stamp a notification read. The first mark wins; marking again is
    /// a no-op that keeps the original timestamp.
    pub fn mark_read(&self, id: &NotificationId) -> TicketingResult<Notification> {
        let mut notification = self
            .store
            .get_notification(id)
            .ok_or_else(|| TicketingError::not_found("notification not found"))?;
        notification.mark_read();
        Ok(self.store.save_notification(notification))
    }
}
