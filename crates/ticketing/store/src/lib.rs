//! Entity storage for the ticketing engines.
//!
//! The engines treat storage as an external collaborator behind narrow
//! per-entity traits: insert-or-replace `save_*`, point `get_*`, full
//! `list_*`, `delete_*`, and a handful of linear-filter finders. The
//! [`TicketingStore`] supertrait aggregates them so an engine can hold a
//! single `Arc<dyn TicketingStore>`.
//!
//! [`MemoryStore`] is the reference implementation: process-lifetime,
//! thread-safe, no durability. Its one non-CRUD primitive is
//! [`TicketStore::record_sale`], which closes the seat check-then-act
//! race by validating and inserting under a single write lock.

#![deny(unsafe_code)]

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{
    CashierStore, CompanyStore, DistributorStore, NotificationStore, RequestStore, SaleConflict,
    TicketStore, TicketingStore, TripStore, UserStore,
};
