//! Shared session handle
//!
//! The single synchronization boundary for session state. The acquisition
//! loop and the control-request handlers each hold a clone; every read or
//! write of `recording`/active-file/start-instant state goes through the
//! mutex, so a `record()` in flight can never observe a half-updated file
//! identifier.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::logstore::{LogFileInfo, LogStore, StoreError, LEGACY_LOG_FILE};
use crate::series::Series;

use super::{ControlError, Reading, RecordingSession, SessionStatus};

/// Cloneable, synchronized handle to the recording session.
///
/// Exposes the full control surface consumed by the external request
/// dispatcher: start/stop, status, file listing, series reads, and deletion.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<RecordingSession>>,
}

impl SessionHandle {
    /// Wrap a session over the given store.
    pub fn new(store: LogStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RecordingSession::new(store))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RecordingSession> {
        // A panic while holding the lock cannot leave the session state
        // partially updated, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a session. No-op (preserving the active file) when already
    /// recording.
    pub fn start(&self) -> Result<SessionStatus, ControlError> {
        let mut session = self.lock();
        session.start()?;
        Ok(session.status())
    }

    /// Stop the active session, leaving its file behind.
    pub fn stop(&self) -> SessionStatus {
        let mut session = self.lock();
        session.stop();
        session.status()
    }

    /// Current reading and session status, as one consistent snapshot.
    pub fn status(&self) -> SessionStatus {
        self.lock().status()
    }

    /// Retain the latest acquired reading.
    pub fn observe(&self, reading: Reading) {
        self.lock().observe(reading);
    }

    /// Retain the latest reading and, while recording, append it to the
    /// active log, under a single lock acquisition.
    pub fn observe_and_record(&self, reading: Reading) -> Result<(), StoreError> {
        let mut session = self.lock();
        session.observe(reading);
        session.record(reading.external_temp_c)
    }

    /// List stored log files with sizes.
    pub fn list_logs(&self) -> Result<Vec<LogFileInfo>, ControlError> {
        Ok(self.lock().store().list()?)
    }

    /// Load the named log file as an ordered millisecond-offset series.
    pub fn series(&self, name: &str) -> Result<Series, ControlError> {
        let path = {
            let session = self.lock();
            let path = session.store().path_of(name)?;
            if !path.is_file() {
                return Err(ControlError::NotFound(name.to_owned()));
            }
            path
        };
        // Reading outside the lock: files are only appended, never rewritten
        Series::load(path).map_err(|e| ControlError::Storage(StoreError::Io(e)))
    }

    /// Delete the named log file.
    ///
    /// Refused with [`ControlError::Busy`] when the file belongs to the
    /// active session; the file then remains intact and appendable.
    pub fn delete_log(&self, name: &str) -> Result<(), ControlError> {
        let session = self.lock();
        if session.is_recording() && session.active_file() == Some(name) {
            return Err(ControlError::Busy(name.to_owned()));
        }
        session.store().delete(name)?;
        Ok(())
    }

    /// Resolve the log file a CSV download should serve: an explicit name if
    /// given, else the active file while recording, else the legacy
    /// fallback.
    pub fn csv_target(&self, name: Option<&str>) -> Result<PathBuf, ControlError> {
        let session = self.lock();
        let name = match name {
            Some(n) => n.to_owned(),
            None => session
                .active_file()
                .map(str::to_owned)
                .unwrap_or_else(|| LEGACY_LOG_FILE.to_owned()),
        };
        let path = session.store().path_of(&name)?;
        if !path.is_file() {
            return Err(ControlError::NotFound(name));
        }
        Ok(path)
    }

    /// Remove the legacy fallback log if present. Removing an absent file is
    /// not an error.
    pub fn erase_legacy(&self) -> Result<(), ControlError> {
        let session = self.lock();
        match session.store().delete(LEGACY_LOG_FILE) {
            Ok(()) | Err(StoreError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logstore::LogRow;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn handle() -> (TempDir, SessionHandle) {
        let dir = TempDir::new().unwrap();
        let store = LogStore::new(dir.path()).unwrap();
        (dir, SessionHandle::new(store))
    }

    fn reading(temp: f64) -> Reading {
        Reading {
            external_temp_c: temp,
            internal_temp_c: 24.0,
            fault: false,
        }
    }

    #[test]
    fn test_delete_active_file_is_busy() {
        let (_dir, handle) = handle();
        handle.observe(reading(20.0));
        let status = handle.start().unwrap();
        let active = status.active.unwrap();

        let err = handle.delete_log(&active).unwrap_err();
        assert!(matches!(err, ControlError::Busy(_)));

        // File intact and still appendable
        handle.observe_and_record(reading(20.5)).unwrap();
        let series = handle.series(&active).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_delete_after_stop_succeeds() {
        let (_dir, handle) = handle();
        let active = handle.start().unwrap().active.unwrap();
        handle.stop();

        handle.delete_log(&active).unwrap();
        assert!(handle.list_logs().unwrap().is_empty());
    }

    #[test]
    fn test_delete_distinguishes_rejections() {
        let (_dir, handle) = handle();
        assert!(matches!(
            handle.delete_log("missing.csv"),
            Err(ControlError::NotFound(_))
        ));
        assert!(matches!(
            handle.delete_log("../escape.csv"),
            Err(ControlError::BadRequest(_))
        ));
    }

    #[test]
    fn test_csv_target_resolution_order() {
        let (_dir, handle) = handle();

        // Nothing stored at all: legacy fallback is reported missing
        assert!(matches!(
            handle.csv_target(None),
            Err(ControlError::NotFound(_))
        ));

        // Legacy file exists and no session ever started
        {
            let session = handle.lock();
            session
                .store()
                .append(LEGACY_LOG_FILE, &LogRow::new(0, 19.0))
                .unwrap();
        }
        let path = handle.csv_target(None).unwrap();
        assert_eq!(path.file_name().unwrap(), LEGACY_LOG_FILE);

        // Recording: the active file wins
        let active = handle.start().unwrap().active.unwrap();
        let path = handle.csv_target(None).unwrap();
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), active);

        // Explicit name wins over everything
        let path = handle.csv_target(Some(LEGACY_LOG_FILE)).unwrap();
        assert_eq!(path.file_name().unwrap(), LEGACY_LOG_FILE);
    }

    #[test]
    fn test_erase_legacy_idempotent() {
        let (_dir, handle) = handle();
        handle.erase_legacy().unwrap();

        {
            let session = handle.lock();
            session
                .store()
                .append(LEGACY_LOG_FILE, &LogRow::new(0, 19.0))
                .unwrap();
        }
        handle.erase_legacy().unwrap();
        assert!(handle.list_logs().unwrap().is_empty());
    }

    #[test]
    fn test_two_sessions_independently_deletable() {
        let (_dir, handle) = handle();
        let first = handle.start().unwrap().active.unwrap();
        handle.stop();
        let second = handle.start().unwrap().active.unwrap();
        handle.stop();

        assert_ne!(first, second);
        assert_eq!(handle.list_logs().unwrap().len(), 2);

        handle.delete_log(&first).unwrap();
        handle.delete_log(&second).unwrap();
        assert!(handle.list_logs().unwrap().is_empty());
    }
}
