//! Parties: users with roles, companies, distributors, cashiers.
//!
//! Ownership between parties is by reference (foreign id), not
//! containment: a distributor points at its company, a cashier at its
//! distributor and its login user.

use crate::ids::{CashierId, CompanyId, DistributorId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// System roles. Every mutating operation is gated on one or more of
/// these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Company,
    Distributor,
    Cashier,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "Admin",
            Role::Company => "Company",
            Role::Distributor => "Distributor",
            Role::Cashier => "Cashier",
        };
        write!(f, "{name}")
    }
}

/// A user account. Inactive users fail every authorization check.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique across all users; uniqueness enforced at registration.
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::generate(),
            email: email.into(),
            display_name: display_name.into(),
            role,
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Rating value for an unrated party. Ratings live in `[1.0, 5.0]` once
/// set; zero means "never rated".
pub const RATING_UNSET: f64 = 0.0;

/// A company that organizes trips.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub owner_user_id: UserId,
    pub name: String,
    pub commission: f64,
    pub rating: f64,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn new(
        owner_user_id: UserId,
        name: impl Into<String>,
        commission: f64,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            id: CompanyId::generate(),
            owner_user_id,
            name: name.into(),
            commission,
            rating: RATING_UNSET,
            contact: contact.into(),
            created_at: Utc::now(),
        }
    }
}

/// A distributor cleared (per trip) to sell a company's seats.
/// Belongs to exactly one company.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Distributor {
    pub id: DistributorId,
    pub company_id: CompanyId,
    pub owner_user_id: UserId,
    pub name: String,
    pub commission: f64,
    pub rating: f64,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

impl Distributor {
    pub fn new(
        company_id: CompanyId,
        owner_user_id: UserId,
        name: impl Into<String>,
        commission: f64,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            id: DistributorId::generate(),
            company_id,
            owner_user_id,
            name: name.into(),
            commission,
            rating: RATING_UNSET,
            contact: contact.into(),
            created_at: Utc::now(),
        }
    }
}

/// A cashier selling individual seats. Belongs to exactly one
/// distributor; `user_id` links the cashier record to its login user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cashier {
    pub id: CashierId,
    pub distributor_id: DistributorId,
    pub user_id: UserId,
    pub name: String,
    pub commission: f64,
    pub rating: f64,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

impl Cashier {
    pub fn new(
        distributor_id: DistributorId,
        user_id: UserId,
        name: impl Into<String>,
        commission: f64,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            id: CashierId::generate(),
            distributor_id,
            user_id,
            name: name.into(),
            commission,
            rating: RATING_UNSET,
            contact: contact.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_is_active() {
        let user = User::new("ana@example.com", "Ana", Role::Company);
        assert!(user.is_active());
        assert_eq!(user.role, Role::Company);
    }

    #[test]
    fn deactivation_sticks() {
        let mut user = User::new("ana@example.com", "Ana", Role::Admin);
        user.deactivate();
        assert!(!user.is_active());
    }

    #[test]
    fn fresh_parties_start_unrated() {
        let owner = UserId::generate();
        let company = Company::new(owner.clone(), "Balkan Lines", 5.0, "office@balkan.example");
        assert_eq!(company.rating, RATING_UNSET);

        let distributor =
            Distributor::new(company.id.clone(), owner, "South Desk", 2.5, "desk@south.example");
        assert_eq!(distributor.rating, RATING_UNSET);
    }

    #[test]
    fn role_display_names() {
        assert_eq!(Role::Distributor.to_string(), "Distributor");
        assert_eq!(Role::Admin.to_string(), "Admin");
    }
}
