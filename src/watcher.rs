//! Filesystem notifications as a wake source, using the notify crate.
//!
//! The tail loop never subscribes to events itself; this adapter turns
//! notify events into [`WakeSignal`] wakes for callers that want lower latency
//! than the poll interval.

use crate::error::{Error, Result};
use crate::wait::WakeSignal;
use notify::{Config as WatcherConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Wakes a [`WakeSignal`] whenever the filesystem reports activity on one file.
///
/// The parent directory is watched rather than the file, so rotation
/// (rename + create) keeps producing wakes. Watching stops on drop.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    file_path: PathBuf,
}

impl FileWatcher {
    /// Starts watching `path` and waking `signal` on events that name it.
    ///
    /// The file itself does not need to exist yet, only its directory.
    pub fn new<P: AsRef<Path>>(path: P, signal: WakeSignal) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let file_name: OsString = file_path
            .file_name()
            .ok_or_else(|| Error::InvalidPath {
                message: format!("{} has no file name", file_path.display()),
            })?
            .to_os_string();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_event_relevant_to_file(&event, &file_name) {
                        signal.wake();
                    }
                }
                Err(error) => {
                    warn!(%error, "file watcher error");
                    signal.wake();
                }
            },
            WatcherConfig::default(),
        )?;

        watcher.watch(watch_dir(&file_path), RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            file_path,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// Directory holding `file_path`; the current directory for bare file names.
fn watch_dir(file_path: &Path) -> &Path {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Check if a notify event is relevant to a specific file
fn is_event_relevant_to_file(event: &Event, target_file_name: &OsStr) -> bool {
    event
        .paths
        .iter()
        .any(|path| path.file_name() == Some(target_file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use notify::event::{DataChange, ModifyKind, RenameMode};
    use std::time::Duration;

    fn modify_event(paths: &[&str]) -> Event {
        Event {
            kind: EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            paths: paths.iter().map(PathBuf::from).collect(),
            attrs: Default::default(),
        }
    }

    #[test]
    fn test_is_event_relevant_to_file_exact_match() {
        let event = modify_event(&["/tmp/test.log"]);

        assert!(is_event_relevant_to_file(&event, OsStr::new("test.log")));
        assert!(!is_event_relevant_to_file(&event, OsStr::new("other.log")));
    }

    #[test]
    fn test_is_event_relevant_to_file_multiple_paths() {
        let event = modify_event(&["/tmp/other.log", "/tmp/test.log", "/tmp/another.log"]);

        assert!(is_event_relevant_to_file(&event, OsStr::new("test.log")));
        assert!(is_event_relevant_to_file(&event, OsStr::new("another.log")));
        assert!(!is_event_relevant_to_file(&event, OsStr::new("missing.log")));
    }

    #[test]
    fn test_is_event_relevant_to_rotation_rename() {
        // A rename reports both the old and the new name.
        let event = Event {
            kind: EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            paths: vec![PathBuf::from("/var/log/app.log.1"), PathBuf::from("/var/log/app.log")],
            attrs: Default::default(),
        };

        assert!(is_event_relevant_to_file(&event, OsStr::new("app.log")));
    }

    #[test]
    fn test_is_event_relevant_to_file_no_file_name() {
        let event = modify_event(&["/"]);
        assert!(!is_event_relevant_to_file(&event, OsStr::new("test.log")));
    }

    #[test]
    fn test_is_event_relevant_to_file_empty_paths() {
        let event = modify_event(&[]);
        assert!(!is_event_relevant_to_file(&event, OsStr::new("test.log")));
    }

    #[test]
    fn test_is_event_relevant_to_file_case_sensitivity() {
        let event = modify_event(&["/tmp/Test.Log"]);

        assert!(!is_event_relevant_to_file(&event, OsStr::new("test.log")));
        assert!(is_event_relevant_to_file(&event, OsStr::new("Test.Log")));
    }

    #[test]
    fn test_watch_dir() {
        assert_eq!(watch_dir(Path::new("/var/log/app.log")), Path::new("/var/log"));
        assert_eq!(watch_dir(Path::new("app.log")), Path::new("."));
        assert_eq!(watch_dir(Path::new("logs/app.log")), Path::new("logs"));
    }

    #[test]
    fn test_path_without_file_name_is_rejected() {
        let result = FileWatcher::new("/", WakeSignal::new());

        match result {
            Err(Error::InvalidPath { .. }) => {}
            Err(other) => panic!("Expected InvalidPath, got {other:?}"),
            Ok(_) => panic!("Expected InvalidPath"),
        }
    }

    #[tokio::test]
    async fn test_watcher_on_missing_file_in_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later.log");

        let watcher = FileWatcher::new(&path, WakeSignal::new()).unwrap();
        assert_eq!(watcher.file_path(), path.as_path());
    }

    #[tokio::test]
    async fn test_watcher_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("app.log");

        let result = FileWatcher::new(&path, WakeSignal::new());
        assert!(matches!(result, Err(Error::Watcher(_))));
    }

    #[tokio::test]
    async fn test_write_wakes_signal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "").unwrap();

        let signal = WakeSignal::new();
        let _watcher = FileWatcher::new(&path, signal.clone()).unwrap();

        std::fs::write(&path, "hello\n").unwrap();

        let cancel = tokio_util::sync::CancellationToken::new();
        let wakeup =
            crate::wait::wait_for_data(&cancel, Duration::from_secs(5), Some(&signal)).await;
        assert_eq!(wakeup, crate::wait::Wakeup::Signalled);
    }
}
