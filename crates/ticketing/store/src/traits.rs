//! Store traits consumed by the engines.
//!
//! Every trait is synchronous: operations are CPU-bound in-memory work
//! and either complete or fail, with no cancellation or timeout concept.
//! Backends must be safe for concurrent readers and writers; beyond the
//! sale primitive they provide no cross-operation isolation.

use thiserror::Error;
use ticketing_types::{
    Cashier, CashierId, Company, CompanyId, Distributor, DistributorId, Notification,
    NotificationId, RequestId, Ticket, TicketId, Trip, TripId, TripRequest, User, UserId,
};

/// Why an otherwise well-formed sale could not be recorded.
///
/// Raised by [`TicketStore::record_sale`] from inside its critical
/// section; the sale engine maps both variants to validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleConflict {
    /// Another ticket already occupies `(trip, seat)`.
    #[error("seat {seat} on trip {trip} is already sold")]
    SeatTaken { trip: TripId, seat: u32 },

    /// The buyer already holds `limit` tickets on this trip.
    #[error("buyer \"{buyer}\" reached the per-person limit of {limit} on trip {trip}")]
    BuyerLimit {
        trip: TripId,
        buyer: String,
        limit: u32,
    },
}

/// User accounts, keyed by id, with a unique-email finder.
pub trait UserStore: Send + Sync {
    fn save_user(&self, user: User) -> User;
    fn get_user(&self, id: &UserId) -> Option<User>;
    fn list_users(&self) -> Vec<User>;
    fn delete_user(&self, id: &UserId);
    /// Case-sensitive exact email lookup.
    fn user_by_email(&self, email: &str) -> Option<User>;
}

pub trait CompanyStore: Send + Sync {
    fn save_company(&self, company: Company) -> Company;
    fn get_company(&self, id: &CompanyId) -> Option<Company>;
    fn list_companies(&self) -> Vec<Company>;
    fn delete_company(&self, id: &CompanyId);
    /// The company owned by a user, if any. Authorization assumes one
    /// owning user per company.
    fn company_by_owner(&self, owner: &UserId) -> Option<Company>;
}

pub trait DistributorStore: Send + Sync {
    fn save_distributor(&self, distributor: Distributor) -> Distributor;
    fn get_distributor(&self, id: &DistributorId) -> Option<Distributor>;
    fn list_distributors(&self) -> Vec<Distributor>;
    fn delete_distributor(&self, id: &DistributorId);
    fn distributor_by_owner(&self, owner: &UserId) -> Option<Distributor>;
    fn distributors_by_company(&self, company: &CompanyId) -> Vec<Distributor>;
}

pub trait CashierStore: Send + Sync {
    fn save_cashier(&self, cashier: Cashier) -> Cashier;
    fn get_cashier(&self, id: &CashierId) -> Option<Cashier>;
    fn list_cashiers(&self) -> Vec<Cashier>;
    fn delete_cashier(&self, id: &CashierId);
    fn cashiers_by_distributor(&self, distributor: &DistributorId) -> Vec<Cashier>;
}

pub trait TripStore: Send + Sync {
    fn save_trip(&self, trip: Trip) -> Trip;
    fn get_trip(&self, id: &TripId) -> Option<Trip>;
    fn list_trips(&self) -> Vec<Trip>;
    fn delete_trip(&self, id: &TripId);
    fn trips_by_organizer(&self, company: &CompanyId) -> Vec<Trip>;
    /// Trips in a sellable status (`Active` or `Approved`).
    fn sellable_trips(&self) -> Vec<Trip>;
}

pub trait RequestStore: Send + Sync {
    fn save_request(&self, request: TripRequest) -> TripRequest;
    fn get_request(&self, id: &RequestId) -> Option<TripRequest>;
    fn list_requests(&self) -> Vec<TripRequest>;
    fn delete_request(&self, id: &RequestId);
    fn requests_by_trip(&self, trip: &TripId) -> Vec<TripRequest>;
    fn requests_by_distributor(&self, distributor: &DistributorId) -> Vec<TripRequest>;
}

pub trait TicketStore: Send + Sync {
    fn save_ticket(&self, ticket: Ticket) -> Ticket;
    fn get_ticket(&self, id: &TicketId) -> Option<Ticket>;
    fn list_tickets(&self) -> Vec<Ticket>;
    fn delete_ticket(&self, id: &TicketId);
    fn ticket_by_trip_and_seat(&self, trip: &TripId, seat: u32) -> Option<Ticket>;
    fn tickets_by_trip(&self, trip: &TripId) -> Vec<Ticket>;
    /// Tickets held by a buyer name on one trip, matched
    /// case-insensitively.
    fn count_by_trip_and_buyer(&self, trip: &TripId, buyer_name: &str) -> usize;

    /// Validate and insert a sale in one critical section.
    ///
    /// Checks that `(trip, seat)` is free and that the buyer holds fewer
    /// than `per_person_limit` tickets on the trip, then inserts. The
    /// three steps are atomic with respect to every other `record_sale`
    /// call, so two cashiers racing for one seat cannot both win.
    fn record_sale(&self, ticket: Ticket, per_person_limit: u32) -> Result<Ticket, SaleConflict>;
}

pub trait NotificationStore: Send + Sync {
    fn save_notification(&self, notification: Notification) -> Notification;
    fn get_notification(&self, id: &NotificationId) -> Option<Notification>;
    fn list_notifications(&self) -> Vec<Notification>;
    fn delete_notification(&self, id: &NotificationId);
    fn notifications_for(&self, user: &UserId) -> Vec<Notification>;
}

/// The full storage surface an engine needs, as one object-safe bound.
pub trait TicketingStore:
    UserStore
    + CompanyStore
    + DistributorStore
    + CashierStore
    + TripStore
    + RequestStore
    + TicketStore
    + NotificationStore
{
}

impl<T> TicketingStore for T where
    T: UserStore
        + CompanyStore
        + DistributorStore
        + CashierStore
        + TripStore
        + RequestStore
        + TicketStore
        + NotificationStore
{
}
