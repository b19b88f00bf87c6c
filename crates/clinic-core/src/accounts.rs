//! Account registration and sample-data seeding.

use tracing::{debug, info};

use clinic_model::{NewUser, Role, User};

use crate::error::{RegistrationError, StoreError};
use crate::store::UserStore;

/// Register a new account.
///
/// # Errors
///
/// `Invalid` for an empty name or malformed email, `DuplicateEmail` when the
/// normalized email is already registered.
pub fn register<S: UserStore + ?Sized>(
    store: &S,
    name: &str,
    email: &str,
    role: Role,
    specialization: Option<&str>,
) -> Result<User, RegistrationError> {
    let new_user = NewUser::new(name, email, role, specialization)?;
    let user = store.insert_user(new_user)?;
    info!(user_id = %user.id, role = %user.role, "account created");
    Ok(user)
}

/// Return the user with `new_user.email`, creating it if missing.
///
/// The flag is true when the user was created by this call.
pub fn ensure_user<S: UserStore + ?Sized>(
    store: &S,
    new_user: NewUser,
) -> Result<(User, bool), StoreError> {
    if let Some(existing) = store.find_user_by_email(&new_user.email)? {
        debug!(user_id = %existing.id, "account already present");
        return Ok((existing, false));
    }
    let user = store.insert_user(new_user)?;
    Ok((user, true))
}

/// Sample accounts created by `init-db`: (name, email, role, specialization).
pub const SAMPLE_USERS: [(&str, &str, Role, Option<&str>); 3] = [
    (
        "Dr. Asha Rao",
        "doc1@example.com",
        Role::Doctor,
        Some("Cardiology"),
    ),
    (
        "Dr. Kiran Patel",
        "doc2@example.com",
        Role::Doctor,
        Some("Dermatology"),
    ),
    ("Vishnu Patient", "patient@example.com", Role::Patient, None),
];

/// Ensure every sample account exists and return the emails created now.
pub fn seed_sample_users<S: UserStore + ?Sized>(store: &S) -> Result<Vec<String>, RegistrationError> {
    let mut created = Vec::new();
    for (name, email, role, specialization) in SAMPLE_USERS {
        let new_user = NewUser::new(name, email, role, specialization)?;
        let (user, was_created) = ensure_user(store, new_user)?;
        if was_created {
            created.push(user.email);
        }
    }
    info!(created = created.len(), "sample accounts seeded");
    Ok(created)
}
