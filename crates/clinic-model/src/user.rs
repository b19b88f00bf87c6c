//! User accounts.

use serde::{Deserialize, Serialize};

use crate::{ModelError, Role, UserId};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Contact address used for notifications. Stored lower-cased.
    pub email: String,
    pub role: Role,
    /// Only set for doctors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

impl User {
    pub fn is_doctor(&self) -> bool {
        self.role == Role::Doctor
    }
}

/// A validated registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub specialization: Option<String>,
}

impl NewUser {
    /// Validate and normalize registration input.
    ///
    /// Trims the name, trims and lower-cases the email, and drops the
    /// specialization for any role other than doctor.
    pub fn new(
        name: impl AsRef<str>,
        email: impl AsRef<str>,
        role: Role,
        specialization: Option<&str>,
    ) -> Result<Self, ModelError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        let email = normalize_email(email.as_ref())?;
        let specialization = match role {
            Role::Doctor => specialization
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            Role::Patient | Role::Admin => None,
        };
        Ok(Self {
            name: name.to_string(),
            email,
            role,
            specialization,
        })
    }

    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            role: self.role,
            specialization: self.specialization,
        }
    }
}

/// Trim and lower-case an email address, rejecting obviously malformed input.
pub fn normalize_email(raw: &str) -> Result<String, ModelError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(ModelError::InvalidEmail(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_normalizes_email() {
        let user = NewUser::new("  Ana ", " Ana@Example.COM ", Role::Patient, None).unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@example.com");
    }

    #[test]
    fn specialization_only_kept_for_doctors() {
        let doctor = NewUser::new("Dr. A", "a@x.org", Role::Doctor, Some(" Cardiology ")).unwrap();
        assert_eq!(doctor.specialization.as_deref(), Some("Cardiology"));

        let patient = NewUser::new("P", "p@x.org", Role::Patient, Some("Cardiology")).unwrap();
        assert_eq!(patient.specialization, None);
    }

    #[test]
    fn rejects_empty_fields() {
        assert_eq!(
            NewUser::new("   ", "a@x.org", Role::Patient, None),
            Err(ModelError::EmptyName)
        );
        assert!(matches!(
            NewUser::new("A", "not-an-email", Role::Patient, None),
            Err(ModelError::InvalidEmail(_))
        ));
        assert!(normalize_email("@x.org").is_err());
    }
}
