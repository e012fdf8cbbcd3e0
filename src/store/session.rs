use crate::models::UserRecord;
use crate::storage::Storage;

use super::{LocalStore, CURRENT_USER_KEY};

impl<S: Storage> LocalStore<S> {
    /// The signed-in user, as it was when the session was set.
    pub(crate) fn current_user(&self) -> Option<UserRecord> {
        self.read_blob(CURRENT_USER_KEY)
    }

    pub(crate) fn set_current_user(&mut self, user: &UserRecord) {
        self.write_blob(CURRENT_USER_KEY, user);
    }

    pub(crate) fn clear_current_user(&mut self) {
        self.remove_blob(CURRENT_USER_KEY);
    }
}
