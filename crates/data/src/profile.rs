use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{error, info, warn};
use twinmatch_core::{ProfileStore, StoreError, UserProfile};

pub const PROFILE_FILE_NAME: &str = "user_data.json";
const CORRUPT_EXTENSION: &str = "json.corrupt";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile io at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("profile encode: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ProfileError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// JSON file store. Every save replaces the whole file in one rename.
#[derive(Debug, Clone)]
pub struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(PROFILE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the profile, creating and persisting an empty one when the file is
    /// missing. An undecodable file is moved aside to `*.json.corrupt` and replaced
    /// by an empty profile.
    pub fn load(&self) -> Result<UserProfile, ProfileError> {
        let body = match fs::read(&self.path) {
            Ok(body) => body,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no profile found, creating one");
                return self.reset();
            }
            Err(err) => return Err(ProfileError::io(&self.path, err)),
        };
        match serde_json::from_slice::<UserProfile>(&body) {
            Ok(profile) => Ok(profile),
            Err(err) => {
                error!(path = %self.path.display(), %err, "profile could not be decoded");
                self.move_aside();
                self.reset()
            }
        }
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), ProfileError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|err| ProfileError::io(&dir, err))?;
        let body = serde_json::to_string_pretty(profile)?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|err| ProfileError::io(&dir, err))?;
        tmp.write_all(body.as_bytes())
            .map_err(|err| ProfileError::io(tmp.path(), err))?;
        tmp.persist(&self.path)
            .map_err(|err| ProfileError::io(&self.path, err.error))?;
        Ok(())
    }

    fn reset(&self) -> Result<UserProfile, ProfileError> {
        let profile = UserProfile::default();
        self.save_profile(&profile)?;
        Ok(profile)
    }

    /// First free `*.json.corrupt`, `*.json.corrupt.1`, ... so older backups survive.
    fn backup_path(&self) -> PathBuf {
        let first = self.path.with_extension(CORRUPT_EXTENSION);
        if !first.exists() {
            return first;
        }
        (1u32..)
            .map(|n| self.path.with_extension(format!("{CORRUPT_EXTENSION}.{n}")))
            .find(|path| !path.exists())
            .unwrap_or(first)
    }

    fn move_aside(&self) {
        let backup = self.backup_path();
        match fs::rename(&self.path, &backup) {
            Ok(()) => warn!(backup = %backup.display(), "kept unreadable profile"),
            Err(err) => error!(%err, "could not keep unreadable profile; it will be overwritten"),
        }
    }
}

impl ProfileStore for JsonProfileStore {
    fn save(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        self.save_profile(profile)
            .map_err(|err| StoreError(err.to_string()))
    }
}
