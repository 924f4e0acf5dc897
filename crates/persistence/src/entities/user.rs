//! User entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum RoleDb {
    Donor,
    Requester,
    Both,
    Admin,
}

impl From<RoleDb> for domain::models::Role {
    fn from(role: RoleDb) -> Self {
        match role {
            RoleDb::Donor => domain::models::Role::Donor,
            RoleDb::Requester => domain::models::Role::Requester,
            RoleDb::Both => domain::models::Role::Both,
            RoleDb::Admin => domain::models::Role::Admin,
        }
    }
}

impl From<domain::models::Role> for RoleDb {
    fn from(role: domain::models::Role) -> Self {
        match role {
            domain::models::Role::Donor => RoleDb::Donor,
            domain::models::Role::Requester => RoleDb::Requester,
            domain::models::Role::Both => RoleDb::Both,
            domain::models::Role::Admin => RoleDb::Admin,
        }
    }
}

/// Database enum for blood type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "blood_type")]
pub enum BloodTypeDb {
    #[sqlx(rename = "A+")]
    APositive,
    #[sqlx(rename = "A-")]
    ANegative,
    #[sqlx(rename = "B+")]
    BPositive,
    #[sqlx(rename = "B-")]
    BNegative,
    #[sqlx(rename = "AB+")]
    AbPositive,
    #[sqlx(rename = "AB-")]
    AbNegative,
    #[sqlx(rename = "O+")]
    OPositive,
    #[sqlx(rename = "O-")]
    ONegative,
    #[sqlx(rename = "Unknown")]
    Unknown,
}

impl From<BloodTypeDb> for domain::models::BloodType {
    fn from(blood_type: BloodTypeDb) -> Self {
        match blood_type {
            BloodTypeDb::APositive => domain::models::BloodType::APositive,
            BloodTypeDb::ANegative => domain::models::BloodType::ANegative,
            BloodTypeDb::BPositive => domain::models::BloodType::BPositive,
            BloodTypeDb::BNegative => domain::models::BloodType::BNegative,
            BloodTypeDb::AbPositive => domain::models::BloodType::AbPositive,
            BloodTypeDb::AbNegative => domain::models::BloodType::AbNegative,
            BloodTypeDb::OPositive => domain::models::BloodType::OPositive,
            BloodTypeDb::ONegative => domain::models::BloodType::ONegative,
            BloodTypeDb::Unknown => domain::models::BloodType::Unknown,
        }
    }
}

impl From<domain::models::BloodType> for BloodTypeDb {
    fn from(blood_type: domain::models::BloodType) -> Self {
        match blood_type {
            domain::models::BloodType::APositive => BloodTypeDb::APositive,
            domain::models::BloodType::ANegative => BloodTypeDb::ANegative,
            domain::models::BloodType::BPositive => BloodTypeDb::BPositive,
            domain::models::BloodType::BNegative => BloodTypeDb::BNegative,
            domain::models::BloodType::AbPositive => BloodTypeDb::AbPositive,
            domain::models::BloodType::AbNegative => BloodTypeDb::AbNegative,
            domain::models::BloodType::OPositive => BloodTypeDb::OPositive,
            domain::models::BloodType::ONegative => BloodTypeDb::ONegative,
            domain::models::BloodType::Unknown => BloodTypeDb::Unknown,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub role: RoleDb,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub city: String,
    pub blood_type: Option<BloodTypeDb>,
    pub national_id: Option<String>,
    pub is_available: bool,
    pub next_eligible_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            role: entity.role.into(),
            name: entity.name,
            phone: entity.phone,
            email: entity.email,
            password_hash: entity.password_hash,
            city: entity.city,
            blood_type: entity.blood_type.map(Into::into),
            national_id: entity.national_id,
            is_available: entity.is_available,
            next_eligible_date: entity.next_eligible_date,
            is_active: entity.is_active,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_maps_both_ways() {
        for role in [RoleDb::Donor, RoleDb::Requester, RoleDb::Both, RoleDb::Admin] {
            let domain_role: domain::models::Role = role.into();
            assert_eq!(RoleDb::from(domain_role), role);
        }
    }

    #[test]
    fn blood_type_maps_both_ways() {
        for blood_type in [
            BloodTypeDb::APositive,
            BloodTypeDb::ANegative,
            BloodTypeDb::BPositive,
            BloodTypeDb::BNegative,
            BloodTypeDb::AbPositive,
            BloodTypeDb::AbNegative,
            BloodTypeDb::OPositive,
            BloodTypeDb::ONegative,
            BloodTypeDb::Unknown,
        ] {
            let domain_type: domain::models::BloodType = blood_type.into();
            assert_eq!(BloodTypeDb::from(domain_type), blood_type);
        }
    }
}
