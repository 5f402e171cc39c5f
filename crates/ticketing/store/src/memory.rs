//! In-memory reference implementation of the store traits.
//!
//! Deterministic and test-friendly: one `RwLock<HashMap>` per entity
//! type, clone-out reads, insert-or-replace saves, linear-scan finders.
//! State lives for the process lifetime only.
//!
//! A poisoned lock is recovered with `PoisonError::into_inner` so a
//! panicked writer cannot wedge every later caller; the maps themselves
//! stay consistent because each operation completes its mutation under a
//! single guard.

use crate::traits::{
    CashierStore, CompanyStore, DistributorStore, NotificationStore, RequestStore, SaleConflict,
    TicketStore, TripStore, UserStore,
};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use ticketing_types::{
    Cashier, CashierId, Company, CompanyId, Distributor, DistributorId, Notification,
    NotificationId, RequestId, Ticket, TicketId, Trip, TripId, TripRequest, User, UserId,
};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory ticketing storage.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    companies: RwLock<HashMap<CompanyId, Company>>,
    distributors: RwLock<HashMap<DistributorId, Distributor>>,
    cashiers: RwLock<HashMap<CashierId, Cashier>>,
    trips: RwLock<HashMap<TripId, Trip>>,
    requests: RwLock<HashMap<RequestId, TripRequest>>,
    tickets: RwLock<HashMap<TicketId, Ticket>>,
    notifications: RwLock<HashMap<NotificationId, Notification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryStore {
    fn save_user(&self, user: User) -> User {
        write(&self.users).insert(user.id.clone(), user.clone());
        user
    }

    fn get_user(&self, id: &UserId) -> Option<User> {
        read(&self.users).get(id).cloned()
    }

    fn list_users(&self) -> Vec<User> {
        read(&self.users).values().cloned().collect()
    }

    fn delete_user(&self, id: &UserId) {
        write(&self.users).remove(id);
    }

    fn user_by_email(&self, email: &str) -> Option<User> {
        read(&self.users)
            .values()
            .find(|u| u.email == email)
            .cloned()
    }
}

impl CompanyStore for MemoryStore {
    fn save_company(&self, company: Company) -> Company {
        write(&self.companies).insert(company.id.clone(), company.clone());
        company
    }

    fn get_company(&self, id: &CompanyId) -> Option<Company> {
        read(&self.companies).get(id).cloned()
    }

    fn list_companies(&self) -> Vec<Company> {
        read(&self.companies).values().cloned().collect()
    }

    fn delete_company(&self, id: &CompanyId) {
        write(&self.companies).remove(id);
    }

    fn company_by_owner(&self, owner: &UserId) -> Option<Company> {
        read(&self.companies)
            .values()
            .find(|c| c.owner_user_id == *owner)
            .cloned()
    }
}

impl DistributorStore for MemoryStore {
    fn save_distributor(&self, distributor: Distributor) -> Distributor {
        write(&self.distributors).insert(distributor.id.clone(), distributor.clone());
        distributor
    }

    fn get_distributor(&self, id: &DistributorId) -> Option<Distributor> {
        read(&self.distributors).get(id).cloned()
    }

    fn list_distributors(&self) -> Vec<Distributor> {
        read(&self.distributors).values().cloned().collect()
    }

    fn delete_distributor(&self, id: &DistributorId) {
        write(&self.distributors).remove(id);
    }

    fn distributor_by_owner(&self, owner: &UserId) -> Option<Distributor> {
        read(&self.distributors)
            .values()
            .find(|d| d.owner_user_id == *owner)
            .cloned()
    }

    fn distributors_by_company(&self, company: &CompanyId) -> Vec<Distributor> {
        read(&self.distributors)
            .values()
            .filter(|d| d.company_id == *company)
            .cloned()
            .collect()
    }
}

impl CashierStore for MemoryStore {
    fn save_cashier(&self, cashier: Cashier) -> Cashier {
        write(&self.cashiers).insert(cashier.id.clone(), cashier.clone());
        cashier
    }

    fn get_cashier(&self, id: &CashierId) -> Option<Cashier> {
        read(&self.cashiers).get(id).cloned()
    }

    fn list_cashiers(&self) -> Vec<Cashier> {
        read(&self.cashiers).values().cloned().collect()
    }

    fn delete_cashier(&self, id: &CashierId) {
        write(&self.cashiers).remove(id);
    }

    fn cashiers_by_distributor(&self, distributor: &DistributorId) -> Vec<Cashier> {
        read(&self.cashiers)
            .values()
            .filter(|c| c.distributor_id == *distributor)
            .cloned()
            .collect()
    }
}

impl TripStore for MemoryStore {
    fn save_trip(&self, trip: Trip) -> Trip {
        write(&self.trips).insert(trip.id.clone(), trip.clone());
        trip
    }

    fn get_trip(&self, id: &TripId) -> Option<Trip> {
        read(&self.trips).get(id).cloned()
    }

    fn list_trips(&self) -> Vec<Trip> {
        read(&self.trips).values().cloned().collect()
    }

    fn delete_trip(&self, id: &TripId) {
        write(&self.trips).remove(id);
    }

    fn trips_by_organizer(&self, company: &CompanyId) -> Vec<Trip> {
        read(&self.trips)
            .values()
            .filter(|t| t.organizer_company_id == *company)
            .cloned()
            .collect()
    }

    fn sellable_trips(&self) -> Vec<Trip> {
        read(&self.trips)
            .values()
            .filter(|t| t.status.is_sellable())
            .cloned()
            .collect()
    }
}

impl RequestStore for MemoryStore {
    fn save_request(&self, request: TripRequest) -> TripRequest {
        write(&self.requests).insert(request.id.clone(), request.clone());
        request
    }

    fn get_request(&self, id: &RequestId) -> Option<TripRequest> {
        read(&self.requests).get(id).cloned()
    }

    fn list_requests(&self) -> Vec<TripRequest> {
        read(&self.requests).values().cloned().collect()
    }

    fn delete_request(&self, id: &RequestId) {
        write(&self.requests).remove(id);
    }

    fn requests_by_trip(&self, trip: &TripId) -> Vec<TripRequest> {
        read(&self.requests)
            .values()
            .filter(|r| r.trip_id == *trip)
            .cloned()
            .collect()
    }

    fn requests_by_distributor(&self, distributor: &DistributorId) -> Vec<TripRequest> {
        read(&self.requests)
            .values()
            .filter(|r| r.distributor_id == *distributor)
            .cloned()
            .collect()
    }
}

impl TicketStore for MemoryStore {
    fn save_ticket(&self, ticket: Ticket) -> Ticket {
        write(&self.tickets).insert(ticket.id.clone(), ticket.clone());
        ticket
    }

    fn get_ticket(&self, id: &TicketId) -> Option<Ticket> {
        read(&self.tickets).get(id).cloned()
    }

    fn list_tickets(&self) -> Vec<Ticket> {
        read(&self.tickets).values().cloned().collect()
    }

    fn delete_ticket(&self, id: &TicketId) {
        write(&self.tickets).remove(id);
    }

    fn ticket_by_trip_and_seat(&self, trip: &TripId, seat: u32) -> Option<Ticket> {
        read(&self.tickets)
            .values()
            .find(|t| t.trip_id == *trip && t.seat_number == seat)
            .cloned()
    }

    fn tickets_by_trip(&self, trip: &TripId) -> Vec<Ticket> {
        read(&self.tickets)
            .values()
            .filter(|t| t.trip_id == *trip)
            .cloned()
            .collect()
    }

    fn count_by_trip_and_buyer(&self, trip: &TripId, buyer_name: &str) -> usize {
        read(&self.tickets)
            .values()
            .filter(|t| t.trip_id == *trip && t.matches_buyer(buyer_name))
            .count()
    }

    fn record_sale(&self, ticket: Ticket, per_person_limit: u32) -> Result<Ticket, SaleConflict> {
        let mut guard = write(&self.tickets);

        // Seat uniqueness and buyer limit must be checked under the same
        // guard that performs the insert.
        if guard
            .values()
            .any(|t| t.trip_id == ticket.trip_id && t.seat_number == ticket.seat_number)
        {
            return Err(SaleConflict::SeatTaken {
                trip: ticket.trip_id.clone(),
                seat: ticket.seat_number,
            });
        }

        let held = guard
            .values()
            .filter(|t| t.trip_id == ticket.trip_id && t.matches_buyer(&ticket.buyer_name))
            .count();
        if held as u32 >= per_person_limit {
            return Err(SaleConflict::BuyerLimit {
                trip: ticket.trip_id.clone(),
                buyer: ticket.buyer_name.clone(),
                limit: per_person_limit,
            });
        }

        guard.insert(ticket.id.clone(), ticket.clone());
        Ok(ticket)
    }
}

impl NotificationStore for MemoryStore {
    fn save_notification(&self, notification: Notification) -> Notification {
        write(&self.notifications).insert(notification.id.clone(), notification.clone());
        notification
    }

    fn get_notification(&self, id: &NotificationId) -> Option<Notification> {
        read(&self.notifications).get(id).cloned()
    }

    fn list_notifications(&self) -> Vec<Notification> {
        read(&self.notifications).values().cloned().collect()
    }

    fn delete_notification(&self, id: &NotificationId) {
        write(&self.notifications).remove(id);
    }

    fn notifications_for(&self, user: &UserId) -> Vec<Notification> {
        let mut out: Vec<Notification> = read(&self.notifications)
            .values()
            .filter(|n| n.user_id == *user)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        out
    }
}
