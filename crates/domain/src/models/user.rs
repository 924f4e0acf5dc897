//! User domain models: identity, roles, and donor availability.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Days a donor stays unavailable after an approved contact or a completed
/// donation.
pub const COOLDOWN_DAYS: i64 = 90;

/// Account role. `Both` and `Admin` accounts act as donor and requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Requester,
    Both,
    Admin,
}

impl Role {
    /// Whether this role may appear in donor listings and accept requests.
    pub fn is_donor(&self) -> bool {
        matches!(self, Role::Donor | Role::Both | Role::Admin)
    }

    /// Whether this role may create donation requests and ask for contact.
    pub fn is_requester(&self) -> bool {
        matches!(self, Role::Requester | Role::Both | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Donor => write!(f, "donor"),
            Role::Requester => write!(f, "requester"),
            Role::Both => write!(f, "both"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(Role::Donor),
            "requester" => Ok(Role::Requester),
            "both" => Ok(Role::Both),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// ABO/Rh blood type. `Unknown` covers requester accounts that never
/// declared one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl std::fmt::Display for BloodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
            BloodType::Unknown => "Unknown",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for BloodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A+" => Ok(BloodType::APositive),
            "A-" => Ok(BloodType::ANegative),
            "B+" => Ok(BloodType::BPositive),
            "B-" => Ok(BloodType::BNegative),
            "AB+" => Ok(BloodType::AbPositive),
            "AB-" => Ok(BloodType::AbNegative),
            "O+" => Ok(BloodType::OPositive),
            "O-" => Ok(BloodType::ONegative),
            "Unknown" => Ok(BloodType::Unknown),
            other => Err(format!("Unknown blood type: {}", other)),
        }
    }
}

/// Full user record.
///
/// Availability fields are only ever mutated through the repository
/// operations that implement the cooldown rules, never by direct writes.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub role: Role,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub city: String,
    pub blood_type: Option<BloodType>,
    pub national_id: Option<String>,
    pub is_available: bool,
    pub next_eligible_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_donor(&self) -> bool {
        self.role.is_donor()
    }

    pub fn is_requester(&self) -> bool {
        self.role.is_requester()
    }

    /// Whether the stored cooldown has elapsed as of `today`.
    pub fn cooldown_elapsed(&self, today: NaiveDate) -> bool {
        match self.next_eligible_date {
            Some(date) => today >= date,
            None => false,
        }
    }
}

/// The eligibility date a cooldown started on `today` runs to.
pub fn cooldown_end(today: NaiveDate) -> NaiveDate {
    today + Duration::days(COOLDOWN_DAYS)
}

/// Authenticated account summary returned by login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserSummary {
    pub id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub city: String,
}

/// Donor as shown to browsing requesters. Contact details are withheld
/// until a contact request is approved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DonorSummary {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub blood_type: Option<BloodType>,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_eligible_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_capabilities() {
        assert!(Role::Donor.is_donor());
        assert!(!Role::Donor.is_requester());
        assert!(Role::Requester.is_requester());
        assert!(!Role::Requester.is_donor());
        assert!(Role::Both.is_donor() && Role::Both.is_requester());
        assert!(Role::Admin.is_donor() && Role::Admin.is_requester());
    }

    #[test]
    fn role_roundtrip() {
        for role in [Role::Donor, Role::Requester, Role::Both, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn blood_type_labels() {
        assert_eq!(BloodType::APositive.to_string(), "A+");
        assert_eq!(BloodType::ONegative.to_string(), "O-");
        assert_eq!("AB-".parse::<BloodType>().unwrap(), BloodType::AbNegative);
        assert!("C+".parse::<BloodType>().is_err());
    }

    #[test]
    fn blood_type_serde_uses_labels() {
        let json = serde_json::to_string(&BloodType::AbPositive).unwrap();
        assert_eq!(json, "\"AB+\"");
        let parsed: BloodType = serde_json::from_str("\"O+\"").unwrap();
        assert_eq!(parsed, BloodType::OPositive);
    }

    #[test]
    fn cooldown_end_is_ninety_days_out() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(
            cooldown_end(today),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
        );
    }

    #[test]
    fn cooldown_elapsed_checks_date() {
        let eligible = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let user = sample_user(Some(eligible));
        assert!(!user.cooldown_elapsed(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
        assert!(user.cooldown_elapsed(eligible));
        assert!(user.cooldown_elapsed(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()));
    }

    #[test]
    fn cooldown_without_date_never_elapses() {
        // Acceptance-triggered unavailability has no eligibility date; only
        // completing the donation starts the clock.
        let user = sample_user(None);
        assert!(!user.cooldown_elapsed(NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()));
    }

    fn sample_user(next_eligible_date: Option<NaiveDate>) -> User {
        User {
            id: Uuid::new_v4(),
            role: Role::Donor,
            name: "Test Donor".to_string(),
            phone: "22334455".to_string(),
            email: "donor@example.com".to_string(),
            password_hash: String::new(),
            city: "Nouakchott".to_string(),
            blood_type: Some(BloodType::APositive),
            national_id: None,
            is_available: false,
            next_eligible_date,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
