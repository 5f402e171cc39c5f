//! Role-scoped read-only reports.
//!
//! Linear filters over the store with the same visibility matrix the
//! original command surface exposes: admins see everything, companies
//! see their own records, distributors and cashiers see the public
//! subset.

use crate::access::require_role;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use ticketing_store::{
    CashierStore, CompanyStore, DistributorStore, TicketStore, TicketingStore, TripStore,
};
use ticketing_types::{
    Cashier, Company, Distributor, DistributorId, Role, Ticket, TicketingError, TicketingResult,
    Trip, TripId, User,
};

const ALL_ROLES: [Role; 4] = [Role::Admin, Role::Company, Role::Distributor, Role::Cashier];

fn within(
    time: DateTime<Utc>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    if from.is_some_and(|f| time < f) {
        return false;
    }
    if to.is_some_and(|t| time > t) {
        return false;
    }
    true
}

/// Read-only queries over the store.
pub struct ReportEngine {
    store: Arc<dyn TicketingStore>,
}

impl ReportEngine {
    pub fn new(store: Arc<dyn TicketingStore>) -> Self {
        Self { store }
    }

    /// Companies that currently have sellable trips departing inside the
    /// window. Distributor only.
    pub fn companies_with_available_trips(
        &self,
        actor: Option<&User>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> TicketingResult<Vec<Company>> {
        require_role(actor, &[Role::Distributor])?;

        let mut companies: Vec<Company> = Vec::new();
        for trip in self.store.sellable_trips() {
            if !within(trip.departure, from, to) {
                continue;
            }
            if companies
                .iter()
                .any(|c| c.id == trip.organizer_company_id)
            {
                continue;
            }
            if let Some(company) = self.store.get_company(&trip.organizer_company_id) {
                companies.push(company);
            }
        }
        Ok(companies)
    }

    /// Trips departing inside the window, scoped by role: admins see
    /// all, companies their own, distributors and cashiers everything.
    pub fn trips(
        &self,
        actor: Option<&User>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> TicketingResult<Vec<Trip>> {
        let actor = require_role(actor, &ALL_ROLES)?;
        let trips = self
            .store
            .list_trips()
            .into_iter()
            .filter(|trip| within(trip.departure, from, to))
            .filter(|trip| self.trip_visible(actor, trip))
            .collect();
        Ok(trips)
    }

    fn trip_visible(&self, actor: &User, trip: &Trip) -> bool {
        match actor.role {
            Role::Admin | Role::Distributor | Role::Cashier => true,
            Role::Company => self
                .store
                .get_company(&trip.organizer_company_id)
                .is_some_and(|company| company.owner_user_id == actor.id),
        }
    }

    /// Tickets of one trip sold inside the window. A company may only
    /// inspect its own trips; other roles are unrestricted.
    pub fn tickets(
        &self,
        actor: Option<&User>,
        trip_id: &TripId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> TicketingResult<Vec<Ticket>> {
        let actor = require_role(actor, &ALL_ROLES)?;
        let scoped: Vec<Ticket> = self
            .store
            .tickets_by_trip(trip_id)
            .into_iter()
            .filter(|ticket| within(ticket.sold_at, from, to))
            .collect();

        let Some(trip) = self.store.get_trip(trip_id) else {
            return Ok(scoped);
        };
        if actor.role == Role::Company {
            let owns = self
                .store
                .get_company(&trip.organizer_company_id)
                .is_some_and(|company| company.owner_user_id == actor.id);
            if !owns {
                return Err(TicketingError::denied("not permitted"));
            }
        }
        Ok(scoped)
    }

    /// Distributor listing: admins see all, companies their own.
    pub fn distributors(&self, actor: Option<&User>) -> TicketingResult<Vec<Distributor>> {
        let actor = require_role(actor, &[Role::Admin, Role::Company])?;
        match actor.role {
            Role::Admin => Ok(self.store.list_distributors()),
            Role::Company => {
                let Some(company) = self.store.company_by_owner(&actor.id) else {
                    return Ok(Vec::new());
                };
                Ok(self.store.distributors_by_company(&company.id))
            }
            _ => Err(TicketingError::denied("not permitted")),
        }
    }

    /// Cashier listing: admins see all, distributors one desk at a
    /// time.
    pub fn cashiers(
        &self,
        actor: Option<&User>,
        distributor_id: &DistributorId,
    ) -> TicketingResult<Vec<Cashier>> {
        let actor = require_role(actor, &[Role::Admin, Role::Distributor])?;
        match actor.role {
            Role::Admin => Ok(self.store.list_cashiers()),
            _ => Ok(self.store.cashiers_by_distributor(distributor_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::World;
    use chrono::{Duration, Utc};
    use ticketing_types::{Role, TicketingError};

    #[test]
    fn available_companies_deduplicate_and_respect_window() {
        let world = World::seeded();
        let now = Utc::now();
        world.approved_trip_departing(now + Duration::hours(10), 4, 2);
        world.approved_trip_departing(now + Duration::hours(20), 4, 2);
        world.approved_trip_departing(now + Duration::hours(200), 4, 2);

        let companies = world
            .reports
            .companies_with_available_trips(
                Some(&world.distributor_user),
                Some(now),
                Some(now + Duration::hours(48)),
            )
            .unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].id, world.company.id);
    }

    #[test]
    fn company_sees_only_its_own_trips() {
        let world = World::seeded();
        world.active_trip(4, 2);

        let other_owner = world.register_user("rival@example.com", Role::Company);
        world
            .directory
            .create_company(Some(&world.admin), other_owner.id.clone(), "Rival", 1.0, "n/a")
            .unwrap();

        let trips = world.reports.trips(Some(&other_owner), None, None).unwrap();
        assert!(trips.is_empty());

        let trips = world
            .reports
            .trips(Some(&world.company_user), None, None)
            .unwrap();
        assert_eq!(trips.len(), 1);
    }

    #[test]
    fn foreign_company_cannot_read_tickets() {
        let world = World::seeded();
        let trip = world.approved_trip(4, 2);
        world.sell(&trip, 1, "Alice").unwrap();

        let other_owner = world.register_user("rival@example.com", Role::Company);
        let err = world
            .reports
            .tickets(Some(&other_owner), &trip.id, None, None)
            .unwrap_err();
        assert!(matches!(err, TicketingError::AccessDenied(_)));

        let tickets = world
            .reports
            .tickets(Some(&world.company_user), &trip.id, None, None)
            .unwrap();
        assert_eq!(tickets.len(), 1);
    }

    #[test]
    fn distributor_listing_is_scoped_by_role() {
        let world = World::seeded();

        let all = world.reports.distributors(Some(&world.admin)).unwrap();
        assert_eq!(all.len(), 1);

        let own = world
            .reports
            .distributors(Some(&world.company_user))
            .unwrap();
        assert_eq!(own.len(), 1);

        let err = world
            .reports
            .distributors(Some(&world.cashier_user))
            .unwrap_err();
        assert!(matches!(err, TicketingError::AccessDenied(_)));
    }

    #[test]
    fn cashier_listing_for_one_desk() {
        let world = World::seeded();
        let cashiers = world
            .reports
            .cashiers(Some(&world.distributor_user), &world.distributor.id)
            .unwrap();
        assert_eq!(cashiers.len(), 1);
        assert_eq!(cashiers[0].id, world.cashier.id);
    }
}
