//! Authorization, lifecycle, and eligibility engines for trip ticketing
//!
//! This crate is the rule layer of the system. A caller (the text front
//! end or any future API) invokes an operation with an acting [`User`]
//! and parameters; the operation consults the authorization guard first,
//! applies the domain invariants, mutates entity state through the
//! store, and on success hands the transition to the notification
//! coordinator. Data flows one way: store to engines to notification
//! records. Engines never read notifications back.
//!
//! # Components
//!
//! - [`access`] - stateless role-membership guard used by every mutating
//!   operation
//! - [`lifecycle::TripManager`] - `Trip` and `TripRequest` state
//!   transitions and the seat/approval invariants
//! - [`sales::SalesEngine`] - seat-assignment invariants at sale time
//! - [`rating::RatingEngine`] - the auditable eligibility matrix for
//!   cross-entity ratings
//! - [`notify::NotificationCoordinator`] - fan-out of accepted
//!   transitions into addressed notification records
//! - [`directory::DirectoryManager`] - party registration and profile
//!   updates
//! - [`reports::ReportEngine`] - role-scoped read-only queries
//!
//! Every failure is one of the three recoverable
//! [`TicketingError`](ticketing_types::TicketingError) kinds; nothing
//! here terminates the caller's session.
//!
//! [`User`]: ticketing_types::User

#![deny(unsafe_code)]

pub mod access;
pub mod directory;
pub mod lifecycle;
pub mod notify;
pub mod rating;
pub mod reports;
pub mod sales;

#[cfg(test)]
pub(crate) mod test_support;

pub use access::require_role;
pub use directory::DirectoryManager;
pub use lifecycle::TripManager;
pub use notify::NotificationCoordinator;
pub use rating::{PolicyEntry, QualifyingCheck, RatingEngine, RatingTargetKind};
pub use reports::ReportEngine;
pub use sales::SalesEngine;
