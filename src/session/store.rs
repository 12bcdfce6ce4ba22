use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use super::Session;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to access session file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed session persistence with explicit load/save/clear.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<data dir>/auction-admin/session.json`, or `./session.json` when
    /// the platform has no data dir.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("auction-admin")
            .join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session. A missing file means signed out.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };

        file.lock_shared().map_err(|e| self.io_error(e))?;
        let mut content = String::new();
        let read = file.read_to_string(&mut content);
        let _ = FileExt::unlock(&file);
        read.map_err(|e| self.io_error(e))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let session: Session =
            serde_json::from_str(&content).map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(user = %session.user.email, "session restored");
        Ok(Some(session))
    }

    /// Persist `session`, replacing whatever was stored.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let body = serde_json::to_vec_pretty(session).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.lock_exclusive().map_err(|e| self.io_error(e))?;
        let written = file
            .set_len(0)
            .and_then(|_| file.write_all(&body))
            .and_then(|_| file.flush());
        let _ = FileExt::unlock(&file);
        written.map_err(|e| self.io_error(e))?;

        tracing::info!(user = %session.user.email, "session saved");
        Ok(())
    }

    /// Forget the session (sign-out). Clearing an absent session is fine.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("session cleared");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
