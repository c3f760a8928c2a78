//! File-backed persistence of the last authenticated session.
//!
//! Two files live in the data directory: `session.json` with the session, and
//! an `explicitly_logged_out` marker that suppresses automatic restore.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use designer_ext_core::{AuthSession, Result};

const SESSION_FILE: &str = "session.json";
const LOGGED_OUT_MARKER: &str = "explicitly_logged_out";

#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn marker_path(&self) -> PathBuf {
        self.dir.join(LOGGED_OUT_MARKER)
    }

    pub fn load(&self) -> Result<Option<AuthSession>> {
        match fs::read_to_string(self.session_path()) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, session: &AuthSession) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.session_path(), serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        remove_if_exists(&self.session_path())
    }

    /// Stored session, unless the user logged out or it expired.
    pub fn restore(&self) -> Result<Option<AuthSession>> {
        if self.is_logged_out() {
            tracing::debug!("explicitly logged out, not restoring session");
            return Ok(None);
        }
        let Some(session) = self.load()? else {
            return Ok(None);
        };
        if session.is_expired() {
            tracing::info!(exp = session.exp, "stored session expired");
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Deletes the stored session and suppresses restore until the next login.
    pub fn logout(&self) -> Result<()> {
        self.clear()?;
        self.mark_logged_out()
    }

    pub fn is_logged_out(&self) -> bool {
        self.marker_path().exists()
    }

    pub fn mark_logged_out(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.marker_path(), b"true")?;
        Ok(())
    }

    pub fn clear_logged_out(&self) -> Result<()> {
        remove_if_exists(&self.marker_path())
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
