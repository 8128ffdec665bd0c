use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::{info, warn};

/// File name of the durable slot holding the logged in student id.
pub const SESSION_SLOT: &str = "university_library_user_id";

/// Simulated round trip to the auth service on login.
pub const LOGIN_DELAY: Duration = Duration::from_millis(800);

/// Holds the logged in student id for the lifetime of the process and mirrors
/// it into a single durable file slot so a restart picks the session back up.
///
/// There is no credential validation here. Presence of a non-blank id in the
/// slot is the whole session model.
#[derive(Debug)]
pub struct SessionStore {
    slot: PathBuf,
    user_id: Option<String>,
}

impl SessionStore {
    /// Opens the store, restoring a previously persisted session if the
    /// durable slot is present. The slot is read exactly once, here.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let slot = data_dir.as_ref().join(SESSION_SLOT);

        let user_id = match fs::read_to_string(&slot) {
            Ok(id) if !id.trim().is_empty() => {
                let id = id.trim().to_string();
                info!("Restored session for student {id}");
                Some(id)
            }
            Ok(_) => None,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!("Unable to read session slot: {e}");
                }
                None
            }
        };

        Self { slot, user_id }
    }

    /// Logs a student in. Blank or whitespace-only ids are rejected and the
    /// store is left untouched. On success the id is kept in memory and
    /// written to the durable slot; a failed write is logged and otherwise
    /// treated as slot absence on the next start.
    pub fn login(&mut self, user_id: &str) -> bool {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return false;
        }

        if let Err(e) = fs::write(&self.slot, user_id) {
            warn!("Unable to persist session slot: {e}");
        }

        info!("Student {user_id} logged in");
        self.user_id = Some(user_id.to_string());
        true
    }

    /// Clears the in-memory session and removes the durable slot.
    pub fn logout(&mut self) {
        self.user_id = None;

        if let Err(e) = fs::remove_file(&self.slot) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Unable to clear session slot: {e}");
            }
        }

        info!("Logged out");
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_data_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("athenaeum-session-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn login_persists_across_restart() {
        let dir = temp_data_dir();

        let mut store = SessionStore::open(&dir);
        assert!(!store.is_logged_in());
        assert!(store.login("2024001234"));
        assert_eq!(store.user_id(), Some("2024001234"));

        let restored = SessionStore::open(&dir);
        assert!(restored.is_logged_in());
        assert_eq!(restored.user_id(), Some("2024001234"));
    }

    #[test]
    fn logout_clears_slot() {
        let dir = temp_data_dir();

        let mut store = SessionStore::open(&dir);
        store.login("s-100");
        store.logout();
        assert!(!store.is_logged_in());
        assert!(!dir.join(SESSION_SLOT).exists());

        let restored = SessionStore::open(&dir);
        assert!(!restored.is_logged_in());
    }

    #[test]
    fn blank_login_is_rejected() {
        let dir = temp_data_dir();

        let mut store = SessionStore::open(&dir);
        assert!(!store.login(""));
        assert!(!store.login("   "));
        assert!(!store.is_logged_in());
        assert!(!dir.join(SESSION_SLOT).exists());
    }

    #[test]
    fn login_trims_surrounding_whitespace() {
        let dir = temp_data_dir();

        let mut store = SessionStore::open(&dir);
        assert!(store.login("  2024001234  "));
        assert_eq!(store.user_id(), Some("2024001234"));
    }

    #[test]
    fn logout_without_session_is_a_noop() {
        let dir = temp_data_dir();

        let mut store = SessionStore::open(&dir);
        store.logout();
        assert!(!store.is_logged_in());
    }
}
