// Cache store for reading and writing cached data.
// Handles JSON serialization, TTL checking, and the persisted session.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::Result;

/// How long a saved session is restored: 7 days.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    /// Create a new cached data entry.
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    /// Check if this cached data has expired based on TTL.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        let elapsed = Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::ZERO);

        elapsed > ttl
    }

    /// Check if this cached data is still valid (not expired).
    pub fn is_valid(&self, ttl: Duration) -> bool {
        !self.is_expired(ttl)
    }
}

/// Read cached JSON data from a file.
pub fn read_cached<T: DeserializeOwned>(path: &Path) -> Result<Option<CachedData<T>>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let cached: CachedData<T> = serde_json::from_str(&contents)?;
    Ok(Some(cached))
}

/// Read cached JSON data, returning None if expired.
pub fn read_if_valid<T: DeserializeOwned>(path: &Path, ttl: Duration) -> Result<Option<T>> {
    match read_cached::<T>(path)? {
        Some(cached) if cached.is_valid(ttl) => Ok(Some(cached.data)),
        _ => Ok(None),
    }
}

/// Write data to cache as JSON.
pub fn write_cached<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let cached = CachedData::new(data);
    let json = serde_json::to_string_pretty(&cached)?;

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// What the inspector restores on the next start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Snapshot opened last.
    pub last_snapshot: Option<PathBuf>,
    /// Entity selected last.
    pub last_entity: Option<String>,
}

impl Session {
    /// Load the session at `path`; missing or expired sessions are empty.
    pub fn load(path: &Path) -> Result<Self> {
        let session = read_if_valid::<Session>(path, SESSION_TTL)?.unwrap_or_default();
        debug!(path = %path.display(), ?session, "session loaded");
        Ok(session)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_cached(path, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_cached() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("state.json");

        let session = Session {
            last_snapshot: Some(PathBuf::from("/tmp/snapshot.json")),
            last_entity: Some("Api1".to_string()),
        };

        write_cached(&path, &session).unwrap();

        let cached: Option<CachedData<Session>> = read_cached(&path).unwrap();
        assert_eq!(cached.unwrap().data, session);
    }

    #[test]
    fn test_expired_entries_are_skipped() {
        let mut data = CachedData::new("test");

        // Set cached_at to the past
        data.cached_at = Utc::now() - chrono::Duration::seconds(600);

        assert!(data.is_expired(Duration::from_secs(300)));
        assert!(!data.is_valid(Duration::from_secs(300)));
        assert!(data.is_valid(Duration::from_secs(3600)));
    }

    #[test]
    fn test_session_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");

        assert_eq!(Session::load(&path).unwrap(), Session::default());

        let session = Session {
            last_snapshot: None,
            last_entity: Some("Table1".to_string()),
        };
        session.save(&path).unwrap();
        assert_eq!(Session::load(&path).unwrap(), session);
    }

    #[test]
    fn test_stale_session_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");

        let mut cached = CachedData::new(Session {
            last_snapshot: None,
            last_entity: Some("Old1".to_string()),
        });
        cached.cached_at = Utc::now() - chrono::Duration::days(30);
        fs::write(&path, serde_json::to_string(&cached).unwrap()).unwrap();

        assert_eq!(Session::load(&path).unwrap(), Session::default());
    }

    #[test]
    fn test_corrupt_session_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(Session::load(&path).is_err());
    }
}
