//! User identity and profile types.
//!
//! [`Person`] is the identity held by the session store; [`Profile`] is the
//! richer record behind the profile screen.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use huellitas_core::{Email, PersonId, RecordStatus, UserId};

/// A user account (login identity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: UserId,
    pub username: String,
    pub status: RecordStatus,
}

/// The authenticated person, as returned by login.
///
/// This is what the session store holds; the cart is scoped to
/// `account.id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub given_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub email: Email,
    pub account: Account,
}

impl Person {
    /// The account id the cart and API are scoped to.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.account.id
    }

    /// Display name for greetings.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.paternal_surname)
    }
}

/// Full profile record behind the profile screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub username: String,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    pub person: ProfilePerson,
}

/// Personal data section of a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilePerson {
    pub id: PersonId,
    pub given_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub document_number: String,
    #[serde(default)]
    pub personal_email: Option<String>,
    #[serde(default)]
    pub secondary_email: Option<String>,
    #[serde(default)]
    pub personal_phone: Option<String>,
    #[serde(default)]
    pub secondary_phone: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
}

/// The profile fields editable one at a time from the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Username,
    PersonalEmail,
    SecondaryEmail,
    PersonalPhone,
    SecondaryPhone,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_person() -> Person {
        Person {
            id: PersonId::new(11),
            given_name: "María".to_owned(),
            paternal_surname: "Quispe".to_owned(),
            maternal_surname: "Flores".to_owned(),
            email: Email::parse("maria@example.com").unwrap(),
            account: Account {
                id: UserId::new(7),
                username: "mquispe".to_owned(),
                status: RecordStatus::Active,
            },
        }
    }

    #[test]
    fn test_user_id_comes_from_account() {
        assert_eq!(sample_person().user_id(), UserId::new(7));
    }

    #[test]
    fn test_full_name() {
        assert_eq!(sample_person().full_name(), "María Quispe");
    }

    #[test]
    fn test_person_serde_roundtrip() {
        let person = sample_person();
        let json = serde_json::to_string(&person).unwrap();
        let back: Person = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, person.id);
        assert_eq!(back.account.id, person.account.id);
        assert_eq!(back.email, person.email);
    }
}
