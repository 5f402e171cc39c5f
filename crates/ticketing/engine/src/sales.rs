//! The ticket sale engine.
//!
//! Seven preconditions guard every sale, checked in a fixed order so
//! each failure class is observable on its own. The final two (seat
//! uniqueness and the per-person limit) are validated inside the store's
//! sale primitive, atomically with the insert, so two cashiers racing
//! for one seat cannot both win.

use crate::access::require_role;
use crate::notify::NotificationCoordinator;
use std::sync::Arc;
use ticketing_store::{
    CashierStore, CompanyStore, DistributorStore, TicketStore, TicketingStore, TripStore,
};
use ticketing_types::{
    CashierId, Role, Ticket, TicketStatus, TicketingError, TicketingResult, TripId, User,
};
use tracing::info;

/// Sells individual seats on behalf of cashiers.
pub struct SalesEngine {
    store: Arc<dyn TicketingStore>,
    notifier: Arc<NotificationCoordinator>,
}

impl SalesEngine {
    pub fn new(store: Arc<dyn TicketingStore>, notifier: Arc<NotificationCoordinator>) -> Self {
        Self { store, notifier }
    }

    /// Sell one seat to one named buyer.
    ///
    /// Preconditions, in order: the actor is an active cashier user; the
    /// cashier record is linked to the actor; the trip exists and is in
    /// a sellable status; the cashier's distributor is in the trip's
    /// approved set; the seat number is inside `1..=seats_total`; the
    /// seat is free; the buyer is under the trip's per-person limit
    /// (case-insensitive name match). On success the ticket is
    /// `Confirmed` and the organizer's owner gets a fresh sold-count
    /// summary.
    pub fn sell_ticket(
        &self,
        actor: Option<&User>,
        cashier_id: &CashierId,
        trip_id: &TripId,
        seat_number: u32,
        buyer_name: &str,
        buyer_contact: &str,
    ) -> TicketingResult<Ticket> {
        let actor = require_role(actor, &[Role::Cashier])?;
        let cashier = self
            .store
            .get_cashier(cashier_id)
            .ok_or_else(|| TicketingError::not_found("cashier not found"))?;
        if cashier.user_id != actor.id {
            return Err(TicketingError::denied("cashier not linked to actor"));
        }

        let trip = self
            .store
            .get_trip(trip_id)
            .ok_or_else(|| TicketingError::not_found("trip not found"))?;
        if !trip.status.is_sellable() {
            return Err(TicketingError::invalid(format!(
                "trip not sellable in status {:?}",
                trip.status
            )));
        }

        let distributor = self
            .store
            .get_distributor(&cashier.distributor_id)
            .ok_or_else(|| TicketingError::not_found("distributor not found"))?;
        if !trip.is_distributor_approved(&distributor.id) {
            return Err(TicketingError::denied(
                "distributor not approved for this trip",
            ));
        }

        if seat_number == 0 || seat_number > trip.seats_total {
            return Err(TicketingError::invalid("seat number out of range"));
        }

        let mut ticket = Ticket::new(
            trip.id.clone(),
            seat_number,
            cashier.id.clone(),
            buyer_name,
            buyer_contact,
        );
        ticket.status = TicketStatus::Confirmed;
        let ticket = self
            .store
            .record_sale(ticket, trip.per_person_limit)
            .map_err(|conflict| TicketingError::invalid(conflict.to_string()))?;

        info!(
            ticket = %ticket.id.short(),
            trip = %trip.id.short(),
            seat = seat_number,
            "ticket sold"
        );
        if let Some(company) = self.store.get_company(&trip.organizer_company_id) {
            self.notifier.on_ticket_sold(&trip, &company.owner_user_id);
        }
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::World;
    use ticketing_store::UserStore;
    use ticketing_types::{Role, TicketStatus, TicketingError, User};

    #[test]
    fn sale_succeeds_for_approved_distributor() {
        let world = World::seeded();
        let trip = world.approved_trip(4, 2);

        let ticket = world.sell(&trip, 1, "Alice").unwrap();
        assert_eq!(ticket.status, TicketStatus::Confirmed);
        assert_eq!(ticket.seat_number, 1);
    }

    #[test]
    fn only_cashier_role_may_sell() {
        let world = World::seeded();
        let trip = world.approved_trip(4, 2);
        let err = world
            .sales
            .sell_ticket(
                Some(&world.distributor_user),
                &world.cashier.id,
                &trip.id,
                1,
                "Alice",
                "n/a",
            )
            .unwrap_err();
        assert!(matches!(err, TicketingError::AccessDenied(_)));
    }

    #[test]
    fn cashier_record_must_link_to_actor() {
        let world = World::seeded();
        let trip = world.approved_trip(4, 2);
        let impostor = {
            let user = User::new("impostor@example.com", "Impostor", Role::Cashier);
            world.store.save_user(user.clone());
            user
        };
        let err = world
            .sales
            .sell_ticket(
                Some(&impostor),
                &world.cashier.id,
                &trip.id,
                1,
                "Alice",
                "n/a",
            )
            .unwrap_err();
        assert_eq!(err, TicketingError::denied("cashier not linked to actor"));
    }

    #[test]
    fn unapproved_distributor_cannot_sell() {
        let world = World::seeded();
        // Active trip, but the distributor never got approved.
        let trip = world.active_trip(4, 2);
        let err = world.sell(&trip, 1, "Alice").unwrap_err();
        assert_eq!(
            err,
            TicketingError::denied("distributor not approved for this trip")
        );
    }

    #[test]
    fn cancelled_trip_blocks_further_sales() {
        let world = World::seeded();
        let trip = world.approved_trip(4, 2);
        world.sell(&trip, 1, "Alice").unwrap();
        world
            .trips
            .cancel_trip(Some(&world.admin), &trip.id)
            .unwrap();

        let err = world.sell(&trip, 2, "Bob").unwrap_err();
        assert!(matches!(err, TicketingError::Validation(_)));
    }

    #[test]
    fn seat_number_must_be_in_range() {
        let world = World::seeded();
        let trip = world.approved_trip(4, 2);
        for seat in [0, 5] {
            let err = world.sell(&trip, seat, "Alice").unwrap_err();
            assert_eq!(err, TicketingError::invalid("seat number out of range"));
        }
    }

    #[test]
    fn taken_seat_fails_validation() {
        let world = World::seeded();
        let trip = world.approved_trip(4, 2);
        world.sell(&trip, 1, "Alice").unwrap();

        let err = world.sell(&trip, 1, "Bob").unwrap_err();
        match err {
            TicketingError::Validation(msg) => assert!(msg.contains("already sold")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn per_person_limit_is_case_insensitive() {
        let world = World::seeded();
        let trip = world.approved_trip(4, 1);
        world.sell(&trip, 1, "Alice").unwrap();

        let err = world.sell(&trip, 2, "ALICE").unwrap_err();
        match err {
            TicketingError::Validation(msg) => assert!(msg.contains("per-person limit")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn eligibility_follows_set_membership_not_status() {
        let world = World::seeded();
        let trip = world.approved_trip(4, 2);

        // A second distributor requesting (still undecided) does not
        // revoke the first distributor's right to sell.
        let other_owner = world.register_user("d2@example.com", Role::Distributor);
        let other = world.register_distributor(&other_owner, "North Desk");
        world
            .trips
            .request_trip(Some(&other_owner), &other.id, &trip.id)
            .unwrap();

        assert!(world.sell(&trip, 1, "Alice").is_ok());
    }
}
