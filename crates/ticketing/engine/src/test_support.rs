//! Shared fixtures for the engine tests.
//!
//! `World::seeded` wires every engine against one in-memory store and
//! registers the standard cast: an admin, a company with its owner, a
//! distributor with its owner, and a cashier with its login user.

use crate::directory::DirectoryManager;
use crate::lifecycle::TripManager;
use crate::notify::NotificationCoordinator;
use crate::rating::RatingEngine;
use crate::reports::ReportEngine;
use crate::sales::SalesEngine;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use ticketing_store::MemoryStore;
use ticketing_types::{
    Cashier, Company, Distributor, Role, Ticket, TicketingResult, Trip, TripSpec, User,
};

pub struct World {
    pub store: Arc<MemoryStore>,
    pub coordinator: Arc<NotificationCoordinator>,
    pub trips: TripManager,
    pub sales: SalesEngine,
    pub ratings: RatingEngine,
    pub directory: DirectoryManager,
    pub reports: ReportEngine,
    pub admin: User,
    pub company_user: User,
    pub company: Company,
    pub distributor_user: User,
    pub distributor: Distributor,
    pub cashier_user: User,
    pub cashier: Cashier,
}

impl World {
    pub fn seeded() -> Self {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let shared: Arc<dyn ticketing_store::TicketingStore> = store.clone();
        let coordinator = Arc::new(NotificationCoordinator::new(shared.clone()));
        let trips = TripManager::new(shared.clone(), coordinator.clone());
        let sales = SalesEngine::new(shared.clone(), coordinator.clone());
        let ratings = RatingEngine::new(shared.clone());
        let directory = DirectoryManager::new(shared.clone());
        let reports = ReportEngine::new(shared);

        let admin = directory
            .register_user("admin@example.com", "Admin", Role::Admin)
            .unwrap();
        let company_user = directory
            .register_user("company@example.com", "Company Owner", Role::Company)
            .unwrap();
        let company = directory
            .create_company(
                Some(&admin),
                company_user.id.clone(),
                "Balkan Lines",
                5.0,
                "office@balkan.example",
            )
            .unwrap();
        let distributor_user = directory
            .register_user("distributor@example.com", "Distributor Owner", Role::Distributor)
            .unwrap();
        let distributor = directory
            .create_distributor(
                Some(&admin),
                &company.id,
                distributor_user.id.clone(),
                "South Desk",
                2.5,
                "desk@south.example",
            )
            .unwrap();
        let cashier_user = directory
            .register_user("cashier@example.com", "Cashier", Role::Cashier)
            .unwrap();
        let cashier = directory
            .create_cashier(
                Some(&distributor_user),
                &distributor.id,
                cashier_user.id.clone(),
                "Front Window",
                1.0,
                "n/a",
            )
            .unwrap();

        Self {
            store,
            coordinator,
            trips,
            sales,
            ratings,
            directory,
            reports,
            admin,
            company_user,
            company,
            distributor_user,
            distributor,
            cashier_user,
            cashier,
        }
    }

    pub fn register_user(&self, email: &str, role: Role) -> User {
        self.directory.register_user(email, email, role).unwrap()
    }

    pub fn register_distributor(&self, owner: &User, name: &str) -> Distributor {
        self.directory
            .create_distributor(
                Some(&self.admin),
                &self.company.id,
                owner.id.clone(),
                name,
                2.0,
                "n/a",
            )
            .unwrap()
    }

    /// Publish an `Active` trip departing in 48 hours.
    pub fn active_trip(&self, seats: u32, limit: u32) -> Trip {
        self.active_trip_departing(Utc::now() + Duration::hours(48), seats, limit)
    }

    pub fn active_trip_departing(
        &self,
        departure: DateTime<Utc>,
        seats: u32,
        limit: u32,
    ) -> Trip {
        let spec = TripSpec::new(
            "excursion",
            "Sofia",
            departure,
            departure + Duration::hours(4),
            seats,
            limit,
        )
        .with_transport("bus");
        self.trips
            .publish_trip(Some(&self.company_user), &self.company.id, spec)
            .unwrap()
    }

    /// Publish a trip and clear the standard distributor to sell it.
    pub fn approved_trip(&self, seats: u32, limit: u32) -> Trip {
        self.approved_trip_departing(Utc::now() + Duration::hours(48), seats, limit)
    }

    pub fn approved_trip_departing(
        &self,
        departure: DateTime<Utc>,
        seats: u32,
        limit: u32,
    ) -> Trip {
        let trip = self.active_trip_departing(departure, seats, limit);
        let request = self
            .trips
            .request_trip(Some(&self.distributor_user), &self.distributor.id, &trip.id)
            .unwrap();
        self.trips
            .decide_request(Some(&self.company_user), &request.id, true)
            .unwrap()
    }

    /// Sell a seat through the standard cashier.
    pub fn sell(&self, trip: &Trip, seat: u32, buyer: &str) -> TicketingResult<Ticket> {
        self.sales.sell_ticket(
            Some(&self.cashier_user),
            &self.cashier.id,
            &trip.id,
            seat,
            buyer,
            "n/a",
        )
    }
}
