use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info};

use crate::error::AuthError;
use crate::models::{NewUser, UserRecord, UserStats};
use crate::storage::Storage;
use crate::util::now_iso;

use super::{LocalStore, USERS_KEY};

pub(crate) const DEMO_PASSWORD: &str = "demo123";

/// (id, first, last, email, opted in, created, last login)
const DEMO_ACCOUNTS: [(&str, &str, &str, &str, bool, &str, &str); 3] = [
    (
        "demo-user-1",
        "John",
        "Smith",
        "john.smith@demo.com",
        true,
        "2025-10-01T00:00:00.000Z",
        "2025-11-01T00:00:00.000Z",
    ),
    (
        "demo-user-2",
        "Sarah",
        "Johnson",
        "sarah.johnson@demo.com",
        false,
        "2025-10-15T00:00:00.000Z",
        "2025-11-03T00:00:00.000Z",
    ),
    (
        "demo-user-3",
        "Mike",
        "Wilson",
        "mike.wilson@demo.com",
        true,
        "2025-10-20T00:00:00.000Z",
        "2025-11-04T00:00:00.000Z",
    ),
];

pub(crate) fn demo_accounts() -> Vec<UserRecord> {
    DEMO_ACCOUNTS
        .iter()
        .map(
            |&(id, first, last, email, promo, created, last_login)| UserRecord {
                id: id.to_string(),
                email: email.to_string(),
                password: DEMO_PASSWORD.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                promotional_emails: promo,
                created_at: created.to_string(),
                last_login: last_login.to_string(),
            },
        )
        .collect()
}

impl<S: Storage> LocalStore<S> {
    pub(crate) fn users(&self) -> Vec<UserRecord> {
        self.read_blob(USERS_KEY).unwrap_or_default()
    }

    fn save_users(&mut self, users: &[UserRecord]) {
        self.write_blob(USERS_KEY, users);
    }

    pub(crate) fn email_exists(&self, email: &str) -> bool {
        self.users().iter().any(|u| u.email_matches(email))
    }

    /// Create an account and sign it in.
    pub(crate) fn register_user(&mut self, data: NewUser) -> Result<UserRecord, AuthError> {
        if self.email_exists(&data.email) {
            return Err(AuthError::DuplicateEmail { email: data.email });
        }

        let now = now_iso();
        let user = UserRecord {
            id: chrono::Utc::now().timestamp_millis().to_string(),
            email: data.email,
            password: data.password,
            first_name: data.first_name,
            last_name: data.last_name,
            promotional_emails: data.promotional_emails,
            created_at: now.clone(),
            last_login: now,
        };

        let mut users = self.users();
        users.push(user.clone());
        self.save_users(&users);
        self.set_current_user(&user);
        info!(user_id = %user.id, "registered new account");
        Ok(user)
    }

    /// Check credentials, stamp `last_login` and sign the account in.
    pub(crate) fn login_user(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        let mut users = self.users();
        let user = users
            .iter_mut()
            .find(|u| u.email_matches(email) && u.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        user.last_login = now_iso();
        let user = user.clone();

        self.save_users(&users);
        self.set_current_user(&user);
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    pub(crate) fn logout_user(&mut self) {
        self.clear_current_user();
        debug!("signed out");
    }

    pub(crate) fn user_stats(&self) -> UserStats {
        let users = self.users();
        let total_users = users.len();
        let promotional_opt_ins = users.iter().filter(|u| u.promotional_emails).count();

        let opt_in_rate = if total_users > 0 {
            (Decimal::from(promotional_opt_ins) * Decimal::ONE_HUNDRED
                / Decimal::from(total_users))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        };

        UserStats {
            total_users,
            promotional_opt_ins,
            opt_in_rate,
        }
    }

    /// Add the three demo accounts, skipping any whose email is taken.
    /// Returns the accounts actually added.
    pub(crate) fn create_demo_accounts(&mut self) -> Vec<UserRecord> {
        let mut users = self.users();
        let added: Vec<UserRecord> = demo_accounts()
            .into_iter()
            .filter(|demo| !users.iter().any(|u| u.email_matches(&demo.email)))
            .collect();

        if added.is_empty() {
            debug!("demo accounts already exist");
            return added;
        }

        users.extend(added.iter().cloned());
        self.save_users(&users);
        info!(count = added.len(), "created demo accounts");
        added
    }

    /// Sign in as demo account 1, 2 or 3.
    pub(crate) fn login_demo(&mut self, number: usize) -> Result<UserRecord, AuthError> {
        let email = number
            .checked_sub(1)
            .and_then(|i| DEMO_ACCOUNTS.get(i))
            .map(|demo| demo.3)
            .ok_or(AuthError::InvalidDemoNumber { number })?;
        self.login_user(email, DEMO_PASSWORD)
    }
}
