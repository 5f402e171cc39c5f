//! Party registration and profile maintenance.
//!
//! Users register with a unique email; admins create companies and
//! distributors; distributors hire their own cashiers. Profile updates
//! take each field as an independent option so callers can skip what
//! they do not want to touch.

use crate::access::require_role;
use std::sync::Arc;
use ticketing_store::{
    CashierStore, CompanyStore, DistributorStore, TicketingStore, UserStore,
};
use ticketing_types::{
    Cashier, CashierId, Company, CompanyId, Distributor, DistributorId, Role, TicketingError,
    TicketingResult, User, UserId,
};
use tracing::info;

/// Fields of a profile update; `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub commission: Option<f64>,
    pub contact: Option<String>,
}

fn normalized(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_commission(commission: f64) -> TicketingResult<()> {
    if commission < 0.0 {
        return Err(TicketingError::invalid("commission cannot be negative"));
    }
    Ok(())
}

/// Creates and maintains the party records.
pub struct DirectoryManager {
    store: Arc<dyn TicketingStore>,
}

impl DirectoryManager {
    pub fn new(store: Arc<dyn TicketingStore>) -> Self {
        Self { store }
    }

    /// Register a user account. Email must be unique across all users.
    pub fn register_user(
        &self,
        email: &str,
        display_name: &str,
        role: Role,
    ) -> TicketingResult<User> {
        if self.store.user_by_email(email).is_some() {
            return Err(TicketingError::invalid("email already exists"));
        }
        let user = self.store.save_user(User::new(email, display_name, role));
        info!(user = %user.id.short(), role = %user.role, "user registered");
        Ok(user)
    }

    /// Create a company record. Admin only.
    pub fn create_company(
        &self,
        actor: Option<&User>,
        owner_user_id: UserId,
        name: &str,
        commission: f64,
        contact: &str,
    ) -> TicketingResult<Company> {
        require_role(actor, &[Role::Admin])?;
        validate_commission(commission)?;
        let company = self
            .store
            .save_company(Company::new(owner_user_id, name, commission, contact));
        info!(company = %company.id.short(), name = %company.name, "company created");
        Ok(company)
    }

    /// Create a distributor under an existing company. Admin only.
    pub fn create_distributor(
        &self,
        actor: Option<&User>,
        company_id: &CompanyId,
        owner_user_id: UserId,
        name: &str,
        commission: f64,
        contact: &str,
    ) -> TicketingResult<Distributor> {
        require_role(actor, &[Role::Admin])?;
        let company = self
            .store
            .get_company(company_id)
            .ok_or_else(|| TicketingError::not_found("company not found"))?;
        validate_commission(commission)?;
        let distributor = self.store.save_distributor(Distributor::new(
            company.id,
            owner_user_id,
            name,
            commission,
            contact,
        ));
        info!(distributor = %distributor.id.short(), "distributor created");
        Ok(distributor)
    }

    /// Hire a cashier under a distributor the actor owns.
    pub fn create_cashier(
        &self,
        actor: Option<&User>,
        distributor_id: &DistributorId,
        cashier_user_id: UserId,
        name: &str,
        commission: f64,
        contact: &str,
    ) -> TicketingResult<Cashier> {
        let actor = require_role(actor, &[Role::Distributor])?;
        let distributor = self
            .store
            .get_distributor(distributor_id)
            .ok_or_else(|| TicketingError::not_found("distributor not found"))?;
        if distributor.owner_user_id != actor.id {
            return Err(TicketingError::denied("distributor not owned by actor"));
        }
        validate_commission(commission)?;
        let cashier = self.store.save_cashier(Cashier::new(
            distributor.id,
            cashier_user_id,
            name,
            commission,
            contact,
        ));
        info!(cashier = %cashier.id.short(), "cashier created");
        Ok(cashier)
    }

    /// Update company profile fields. Admin, or the owning company user.
    pub fn update_company(
        &self,
        actor: Option<&User>,
        company_id: &CompanyId,
        update: ProfileUpdate,
    ) -> TicketingResult<Company> {
        let actor = require_role(actor, &[Role::Admin, Role::Company])?;
        let mut company = self
            .store
            .get_company(company_id)
            .ok_or_else(|| TicketingError::not_found("company not found"))?;
        if actor.role == Role::Company && company.owner_user_id != actor.id {
            return Err(TicketingError::denied("company not owned by actor"));
        }

        if let Some(name) = normalized(update.name) {
            company.name = name;
        }
        if let Some(commission) = update.commission {
            validate_commission(commission)?;
            company.commission = commission;
        }
        if let Some(contact) = normalized(update.contact) {
            company.contact = contact;
        }
        Ok(self.store.save_company(company))
    }

    /// Update distributor profile fields. Admin, the record owner, or
    /// the owner of the parent company.
    pub fn update_distributor(
        &self,
        actor: Option<&User>,
        distributor_id: &DistributorId,
        update: ProfileUpdate,
    ) -> TicketingResult<Distributor> {
        let actor = require_role(actor, &[Role::Admin, Role::Company, Role::Distributor])?;
        let mut distributor = self
            .store
            .get_distributor(distributor_id)
            .ok_or_else(|| TicketingError::not_found("distributor not found"))?;

        let is_owner = distributor.owner_user_id == actor.id;
        let is_admin = actor.role == Role::Admin;
        let is_company_owner = actor.role == Role::Company
            && self
                .store
                .get_company(&distributor.company_id)
                .is_some_and(|company| company.owner_user_id == actor.id);
        if !is_owner && !is_admin && !is_company_owner {
            return Err(TicketingError::denied("not permitted to update distributor"));
        }

        if let Some(name) = normalized(update.name) {
            distributor.name = name;
        }
        if let Some(commission) = update.commission {
            validate_commission(commission)?;
            distributor.commission = commission;
        }
        if let Some(contact) = normalized(update.contact) {
            distributor.contact = contact;
        }
        Ok(self.store.save_distributor(distributor))
    }

    /// Update cashier profile fields. Admin, or the owner of the
    /// cashier's distributor.
    pub fn update_cashier(
        &self,
        actor: Option<&User>,
        cashier_id: &CashierId,
        update: ProfileUpdate,
    ) -> TicketingResult<Cashier> {
        let actor = require_role(actor, &[Role::Admin, Role::Distributor])?;
        let mut cashier = self
            .store
            .get_cashier(cashier_id)
            .ok_or_else(|| TicketingError::not_found("cashier not found"))?;

        let is_admin = actor.role == Role::Admin;
        let is_distributor_owner = actor.role == Role::Distributor
            && self
                .store
                .get_distributor(&cashier.distributor_id)
                .is_some_and(|distributor| distributor.owner_user_id == actor.id);
        if !is_admin && !is_distributor_owner {
            return Err(TicketingError::denied("not permitted to update cashier"));
        }

        if let Some(name) = normalized(update.name) {
            cashier.name = name;
        }
        if let Some(commission) = update.commission {
            validate_commission(commission)?;
            cashier.commission = commission;
        }
        if let Some(contact) = normalized(update.contact) {
            cashier.contact = contact;
        }
        Ok(self.store.save_cashier(cashier))
    }

    pub fn get_company(&self, id: &CompanyId) -> TicketingResult<Company> {
        self.store
            .get_company(id)
            .ok_or_else(|| TicketingError::not_found("company not found"))
    }

    pub fn get_distributor(&self, id: &DistributorId) -> TicketingResult<Distributor> {
        self.store
            .get_distributor(id)
            .ok_or_else(|| TicketingError::not_found("distributor not found"))
    }

    pub fn get_cashier(&self, id: &CashierId) -> TicketingResult<Cashier> {
        self.store
            .get_cashier(id)
            .ok_or_else(|| TicketingError::not_found("cashier not found"))
    }
}
