use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use log::info;

use super::{SessionDataSource, SessionHandle};
use crate::errors::QualigraphError;

/// File-backed session store: one JSON document per (year, location) under a
/// root directory. This is the on-disk cache the rest of the pipeline reads
/// from; capturing sessions into the store is a separate concern.
pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted in the per-user application data directory.
    pub fn in_data_dir() -> Result<Self, QualigraphError> {
        let base = dirs::data_dir().ok_or(QualigraphError::NoDataDir)?;
        Ok(Self::new(base.join("qualigraph").join("sessions")))
    }

    /// Write a session document into the store, returning its path.
    pub fn save(&self, session: &SessionHandle) -> Result<PathBuf, QualigraphError> {
        fs::create_dir_all(&self.root).map_err(|e| QualigraphError::SessionIo { source: e })?;
        let path = self.session_path(session.year, &session.location);
        let file =
            File::create(&path).map_err(|e| QualigraphError::SessionIo { source: e })?;
        serde_json::to_writer(BufWriter::new(file), session)
            .map_err(|e| QualigraphError::SessionParse { source: e })?;
        Ok(path)
    }

    // Locations are matched case-insensitively; anything that is not
    // alphanumeric collapses to '_' so "Abu Dhabi" and "abu dhabi" resolve
    // to the same document.
    fn session_path(&self, year: i32, location: &str) -> PathBuf {
        let slug: String = location
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        self.root.join(format!("{year}_{slug}.json"))
    }
}

impl SessionDataSource for FileSessionStore {
    fn fetch_session(
        &self,
        year: i32,
        location: &str,
    ) -> Result<SessionHandle, QualigraphError> {
        let path = self.session_path(year, location);
        if !path.exists() {
            return Err(QualigraphError::SessionNotFound {
                location: location.to_string(),
                year,
            });
        }

        let file = File::open(&path).map_err(|e| QualigraphError::SessionIo { source: e })?;
        let session: SessionHandle = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| QualigraphError::SessionParse { source: e })?;
        info!(
            "Loaded {} {}: {} classified drivers, {} laps",
            session.location,
            session.year,
            session.results.len(),
            session.laps.len()
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DriverResult;
    use std::io::Write;
    use tempfile::TempDir;

    fn sample_session() -> SessionHandle {
        SessionHandle {
            location: "Abu Dhabi".to_string(),
            year: 2024,
            results: vec![DriverResult {
                abbreviation: "VER".to_string(),
                team_color: "3671C6".to_string(),
                q1: Some(Some(83.1)),
                q2: Some(Some(82.6)),
                q3: Some(Some(82.2)),
            }],
            laps: Vec::new(),
        }
    }

    #[test]
    fn test_save_then_fetch_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());

        store.save(&sample_session()).unwrap();
        let loaded = store.fetch_session(2024, "Abu Dhabi").unwrap();
        assert_eq!(loaded.location, "Abu Dhabi");
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.results[0].q3, Some(Some(82.2)));
    }

    #[test]
    fn test_location_lookup_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());

        store.save(&sample_session()).unwrap();
        assert!(store.fetch_session(2024, "abu dhabi").is_ok());
        assert!(store.fetch_session(2024, "ABU DHABI").is_ok());
    }

    #[test]
    fn test_missing_session_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());

        let result = store.fetch_session(2024, "Monza");
        assert!(matches!(
            result,
            Err(QualigraphError::SessionNotFound { year: 2024, .. })
        ));
    }

    #[test]
    fn test_corrupt_document_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());

        let path = store.session_path(2024, "Monza");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{{not json").unwrap();

        let result = store.fetch_session(2024, "Monza");
        assert!(matches!(result, Err(QualigraphError::SessionParse { .. })));
    }
}
