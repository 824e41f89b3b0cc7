use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PkgError;
use crate::store::PathStore;

const PATHS_FILE: &str = "packages.json";
const CURRENT_FILE: &str = "data.txt";

/// In-memory state of one interactive session: the remembered paths and
/// the path the next build targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub paths: PathStore,
    pub current: Option<PathBuf>,
}

impl Session {
    /// Make `path` the build target. The path must be valid UTF-8 and exist;
    /// it is stored in absolute form.
    pub fn set_current(&mut self, path: &Path) -> Result<&Path, PkgError> {
        if path.to_str().is_none() {
            return Err(PkgError::NonUtf8Path(path.to_path_buf()));
        }
        if !path.exists() {
            return Err(PkgError::PathNotFound(path.to_path_buf()));
        }
        let path = std::path::absolute(path)?;
        debug!(path = %path.display(), "current path set");
        Ok(self.current.insert(path).as_path())
    }

    /// Add the current path to the remembered set. Returns `false` if there is
    /// no current path or it was already remembered.
    pub fn remember_current(&mut self) -> bool {
        match &self.current {
            Some(path) => path.to_str().is_some_and(|p| self.paths.add(p)),
            None => false,
        }
    }
}

/// On-disk home of a [`Session`]: `packages.json` for the path set and
/// `data.txt` for the current path.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn paths_file(&self) -> PathBuf {
        self.dir.join(PATHS_FILE)
    }

    pub fn current_file(&self) -> PathBuf {
        self.dir.join(CURRENT_FILE)
    }

    /// Load the session from disk. Missing files yield an empty session.
    pub fn load(&self) -> Result<Session, PkgError> {
        Ok(Session {
            paths: self.load_paths()?,
            current: self.load_current()?,
        })
    }

    /// Write both state files, creating the data directory if needed.
    pub fn save(&self, session: &Session) -> Result<(), PkgError> {
        self.save_paths(&session.paths)?;
        self.save_current(session.current.as_deref())
    }

    pub fn load_paths(&self) -> Result<PathStore, PkgError> {
        let path = self.paths_file();
        if !path.exists() {
            return Ok(PathStore::new());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| read_error(&path, e))?;
        if content.trim().is_empty() {
            return Ok(PathStore::new());
        }
        let store: PathStore = serde_json::from_str(&content).map_err(|e| read_error(&path, e))?;
        debug!(count = store.len(), file = %path.display(), "loaded remembered paths");
        Ok(store)
    }

    pub fn save_paths(&self, paths: &PathStore) -> Result<(), PkgError> {
        let path = self.paths_file();
        self.ensure_dir(&path)?;
        let content = serde_json::to_string_pretty(paths).map_err(|e| write_error(&path, e))?;
        std::fs::write(&path, content).map_err(|e| write_error(&path, e))?;
        debug!(count = paths.len(), file = %path.display(), "saved remembered paths");
        Ok(())
    }

    pub fn load_current(&self) -> Result<Option<PathBuf>, PkgError> {
        let path = self.current_file();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(|e| read_error(&path, e))?;
        let line = content.trim_end_matches(['\n', '\r']);
        Ok((!line.is_empty()).then(|| PathBuf::from(line)))
    }

    pub fn save_current(&self, current: Option<&Path>) -> Result<(), PkgError> {
        let path = self.current_file();
        self.ensure_dir(&path)?;
        let content = match current {
            Some(p) => p.to_str().ok_or_else(|| PkgError::NonUtf8Path(p.to_path_buf()))?,
            None => "",
        };
        std::fs::write(&path, content).map_err(|e| write_error(&path, e))
    }

    fn ensure_dir(&self, file: &Path) -> Result<(), PkgError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| write_error(file, e))
    }
}

fn read_error(path: &Path, e: impl std::error::Error + Send + Sync + 'static) -> PkgError {
    PkgError::StateRead {
        path: path.to_path_buf(),
        source: Box::new(e),
    }
}

fn write_error(path: &Path, e: impl std::error::Error + Send + Sync + 'static) -> PkgError {
    PkgError::StateWrite {
        path: path.to_path_buf(),
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_load_empty_session_when_files_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("state"));

        let session = storage.load().unwrap();
        assert!(session.paths.is_empty());
        assert!(session.current.is_none());
    }

    #[test]
    fn test_should_round_trip_session() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("state"));

        let session = Session {
            paths: ["/work/Alpha", "/work/beta/beta.nuspec"].into_iter().collect(),
            current: Some(PathBuf::from("/work/Alpha")),
        };
        storage.save(&session).unwrap();

        assert_eq!(storage.load().unwrap(), session);
    }

    #[test]
    fn test_should_round_trip_unset_current_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        storage.save(&Session::default()).unwrap();
        assert_eq!(std::fs::read_to_string(storage.current_file()).unwrap(), "");
        assert_eq!(storage.load().unwrap(), Session::default());
    }

    #[test]
    fn test_should_write_pretty_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        let paths: PathStore = ["/a", "/b"].into_iter().collect();
        storage.save_paths(&paths).unwrap();

        let content = std::fs::read_to_string(storage.paths_file()).unwrap();
        assert_eq!(content, "[\n  \"/a\",\n  \"/b\"\n]");
    }

    #[test]
    fn test_should_report_corrupt_paths_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        std::fs::write(storage.paths_file(), "{ not json").unwrap();

        let err = storage.load_paths().unwrap_err();
        assert!(matches!(err, PkgError::StateRead { .. }));
    }

    #[test]
    fn test_should_set_existing_current_path_as_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::default();

        let set = session.set_current(dir.path()).unwrap().to_path_buf();
        assert!(set.is_absolute());
        assert_eq!(session.current.as_deref(), Some(set.as_path()));
    }

    #[test]
    fn test_should_reject_missing_current_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::default();

        let err = session.set_current(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, PkgError::PathNotFound(_)));
        assert!(session.current.is_none());
    }

    #[test]
    fn test_should_remember_current_path_once() {
        let mut session = Session::default();
        assert!(!session.remember_current());

        session.current = Some(PathBuf::from("/work/Alpha"));
        assert!(session.remember_current());
        assert!(!session.remember_current());
        assert!(session.paths.contains("/work/Alpha"));
    }

    #[test]
    fn test_should_keep_surrounding_whitespace_in_current_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        let session = Session {
            paths: PathStore::new(),
            current: Some(PathBuf::from(" /work/My Lib ")),
        };
        storage.save(&session).unwrap();

        assert_eq!(storage.load().unwrap(), session);
    }

    #[test]
    fn test_should_strip_line_ending_from_current_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        std::fs::write(storage.current_file(), "/work/Alpha\r\n").unwrap();

        assert_eq!(
            storage.load_current().unwrap(),
            Some(PathBuf::from("/work/Alpha"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_should_refuse_non_utf8_current_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut session = Session::default();
        let path = Path::new(OsStr::from_bytes(b"/work/bad\xff"));

        let err = session.set_current(path).unwrap_err();
        assert!(matches!(err, PkgError::NonUtf8Path(_)));
        assert!(session.current.is_none());

        let dir = tempfile::tempdir().unwrap();
        let err = Storage::new(dir.path()).save_current(Some(path)).unwrap_err();
        assert!(matches!(err, PkgError::NonUtf8Path(_)));
    }
}
