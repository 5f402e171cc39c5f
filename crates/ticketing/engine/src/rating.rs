//! The rating eligibility engine.
//!
//! Who may rate whom is an explicit policy table, not a switch buried in
//! each operation: one row per permitted `(actor role, target kind)`
//! pair, each carrying the qualifying check the rater must pass. The
//! table drives both the role gate and the eligibility evaluation, and
//! tests assert against it directly.
//!
//! Ratings are last-write-wins scalars in `[1.0, 5.0]`; no history is
//! kept.

use crate::access::require_role;
use std::sync::Arc;
use ticketing_store::{
    CashierStore, CompanyStore, DistributorStore, RequestStore, TicketingStore, TripStore,
};
use ticketing_types::{
    Cashier, CashierId, Company, CompanyId, Distributor, DistributorId, RequestStatus, Role,
    TicketingError, TicketingResult, User,
};
use tracing::info;

/// Lowest rating value a rater may assign.
pub const MIN_RATING: f64 = 1.0;
/// Highest rating value a rater may assign.
pub const MAX_RATING: f64 = 5.0;

/// The kind of party being rated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatingTargetKind {
    Company,
    Distributor,
    Cashier,
}

/// The relationship a non-admin rater must prove.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualifyingCheck {
    /// No relationship required.
    Unconditional,
    /// Rater's distributor appears in the approved set of at least one
    /// trip organized by the target company.
    ApprovedTripWithOrganizer,
    /// At least one `Approved` request from the target distributor on a
    /// trip the rater's company organizes.
    ApprovedRequestFromTarget,
    /// The target cashier belongs to a distributor owned by the rater.
    OwnsCashiersDistributor,
}

/// One permitted rating direction.
#[derive(Clone, Copy, Debug)]
pub struct PolicyEntry {
    pub actor: Role,
    pub target: RatingTargetKind,
    pub check: QualifyingCheck,
}

/// The complete authorization matrix for ratings. Any `(actor role,
/// target kind)` pair without a row here is denied outright.
pub const RATING_POLICY: &[PolicyEntry] = &[
    PolicyEntry {
        actor: Role::Admin,
        target: RatingTargetKind::Company,
        check: QualifyingCheck::Unconditional,
    },
    PolicyEntry {
        actor: Role::Admin,
        target: RatingTargetKind::Distributor,
        check: QualifyingCheck::Unconditional,
    },
    PolicyEntry {
        actor: Role::Admin,
        target: RatingTargetKind::Cashier,
        check: QualifyingCheck::Unconditional,
    },
    PolicyEntry {
        actor: Role::Distributor,
        target: RatingTargetKind::Company,
        check: QualifyingCheck::ApprovedTripWithOrganizer,
    },
    PolicyEntry {
        actor: Role::Company,
        target: RatingTargetKind::Distributor,
        check: QualifyingCheck::ApprovedRequestFromTarget,
    },
    PolicyEntry {
        actor: Role::Distributor,
        target: RatingTargetKind::Cashier,
        check: QualifyingCheck::OwnsCashiersDistributor,
    },
];

/// Applies the rating policy and writes the resulting scalar.
pub struct RatingEngine {
    store: Arc<dyn TicketingStore>,
}

impl RatingEngine {
    pub fn new(store: Arc<dyn TicketingStore>) -> Self {
        Self { store }
    }

    /// The authorization matrix, for auditing and for the front end's
    /// help output.
    pub fn policy() -> &'static [PolicyEntry] {
        RATING_POLICY
    }

    fn roles_for(target: RatingTargetKind) -> Vec<Role> {
        RATING_POLICY
            .iter()
            .filter(|entry| entry.target == target)
            .map(|entry| entry.actor)
            .collect()
    }

    fn entry_for(actor: Role, target: RatingTargetKind) -> TicketingResult<&'static PolicyEntry> {
        RATING_POLICY
            .iter()
            .find(|entry| entry.actor == actor && entry.target == target)
            .ok_or_else(|| TicketingError::denied("not permitted to rate this target"))
    }

    fn validate_rating(rating: f64) -> TicketingResult<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(TicketingError::invalid(format!(
                "rating must be between {MIN_RATING:.1} and {MAX_RATING:.1}"
            )));
        }
        Ok(())
    }

    pub fn rate_company(
        &self,
        actor: Option<&User>,
        company_id: &CompanyId,
        rating: f64,
    ) -> TicketingResult<Company> {
        let actor = require_role(actor, &Self::roles_for(RatingTargetKind::Company))?;
        let mut company = self
            .store
            .get_company(company_id)
            .ok_or_else(|| TicketingError::not_found("company not found"))?;
        Self::validate_rating(rating)?;

        let entry = Self::entry_for(actor.role, RatingTargetKind::Company)?;
        if entry.check == QualifyingCheck::ApprovedTripWithOrganizer {
            let distributor = self
                .store
                .distributor_by_owner(&actor.id)
                .ok_or_else(|| TicketingError::not_found("no distributor for this user"))?;
            let worked_together = self
                .store
                .list_trips()
                .iter()
                .any(|trip| {
                    trip.organizer_company_id == company.id
                        && trip.is_distributor_approved(&distributor.id)
                });
            if !worked_together {
                return Err(TicketingError::denied(
                    "can only rate companies you have an approved trip with",
                ));
            }
        }

        company.rating = rating;
        info!(company = %company.id.short(), rating, "company rated");
        Ok(self.store.save_company(company))
    }

    pub fn rate_distributor(
        &self,
        actor: Option<&User>,
        distributor_id: &DistributorId,
        rating: f64,
    ) -> TicketingResult<Distributor> {
        let actor = require_role(actor, &Self::roles_for(RatingTargetKind::Distributor))?;
        let mut distributor = self
            .store
            .get_distributor(distributor_id)
            .ok_or_else(|| TicketingError::not_found("distributor not found"))?;
        Self::validate_rating(rating)?;

        let entry = Self::entry_for(actor.role, RatingTargetKind::Distributor)?;
        if entry.check == QualifyingCheck::ApprovedRequestFromTarget {
            let company = self
                .store
                .company_by_owner(&actor.id)
                .ok_or_else(|| TicketingError::not_found("no company for this user"))?;
            let has_approved_request = self
                .store
                .requests_by_distributor(&distributor.id)
                .iter()
                .any(|request| {
                    request.status == RequestStatus::Approved
                        && self
                            .store
                            .get_trip(&request.trip_id)
                            .is_some_and(|trip| trip.organizer_company_id == company.id)
                });
            if !has_approved_request {
                return Err(TicketingError::denied(
                    "can only rate distributors whose requests you have approved",
                ));
            }
        }

        distributor.rating = rating;
        info!(distributor = %distributor.id.short(), rating, "distributor rated");
        Ok(self.store.save_distributor(distributor))
    }

    pub fn rate_cashier(
        &self,
        actor: Option<&User>,
        cashier_id: &CashierId,
        rating: f64,
    ) -> TicketingResult<Cashier> {
        let actor = require_role(actor, &Self::roles_for(RatingTargetKind::Cashier))?;
        let mut cashier = self
            .store
            .get_cashier(cashier_id)
            .ok_or_else(|| TicketingError::not_found("cashier not found"))?;
        Self::validate_rating(rating)?;

        let entry = Self::entry_for(actor.role, RatingTargetKind::Cashier)?;
        if entry.check == QualifyingCheck::OwnsCashiersDistributor {
            let distributor = self
                .store
                .get_distributor(&cashier.distributor_id)
                .ok_or_else(|| TicketingError::not_found("distributor not found"))?;
            if distributor.owner_user_id != actor.id {
                return Err(TicketingError::denied("can only rate your own cashiers"));
            }
        }

        cashier.rating = rating;
        info!(cashier = %cashier.id.short(), rating, "cashier rated");
        Ok(self.store.save_cashier(cashier))
    }
}
