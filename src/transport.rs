//! File-based event transport
//!
//! Each outbound payload becomes one uniquely named `.json` file in the spool
//! directory. Uniqueness is best-effort: second-precision wall clock plus the
//! microsecond fraction plus a random three-digit suffix. Two events in the
//! same microsecond can still draw the same name, in which case the last
//! writer wins; the contract accepts that.

use crate::errors::{SpoolError, SpoolResult};
use chrono::Local;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// Destination for fully serialized event payloads.
///
/// Implementations persist one payload per call. Failures propagate; a broken
/// sink is operationally significant and must not be swallowed.
pub trait PayloadSink: Send + Sync {
    fn persist(&self, payload: &str) -> SpoolResult<()>;
}

/// Sink that writes each payload as a discrete JSON file.
pub struct FileTransport {
    directory: PathBuf,
}

impl FileTransport {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        FileTransport {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create the spool directory and any missing parents. Idempotent;
    /// concurrent creators may race, which is tolerated.
    fn ensure_directory(&self) -> SpoolResult<()> {
        if self.directory.is_dir() {
            return Ok(());
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }
        builder
            .create(&self.directory)
            .map_err(|e| SpoolError::io("creating spool directory", e))
    }

    /// Build a collision-resistant filename stem: 14-digit local timestamp,
    /// 6-digit microsecond fraction, dash, random integer in [100, 999].
    fn unique_file_stem() -> String {
        let now = Local::now();
        let suffix: u32 = rand::rng().random_range(100..=999);
        // Modulo keeps the fraction at six digits across leap seconds.
        format!(
            "{}{:06}-{}",
            now.format("%Y%m%d%H%M%S"),
            now.timestamp_subsec_micros() % 1_000_000,
            suffix
        )
    }
}

impl PayloadSink for FileTransport {
    fn persist(&self, payload: &str) -> SpoolResult<()> {
        self.ensure_directory()?;

        let path = self
            .directory
            .join(format!("{}.json", Self::unique_file_stem()));

        fs::write(&path, payload).map_err(|e| SpoolError::io("writing event file", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o666))
                .map_err(|e| SpoolError::io("setting event file permissions", e))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `^\d{20}(-\d+)?\.json$`
    fn assert_spool_file_name(name: &str) {
        let stem = name.strip_suffix(".json").expect("json extension");
        let (timestamp, suffix) = match stem.split_once('-') {
            Some((timestamp, suffix)) => (timestamp, Some(suffix)),
            None => (stem, None),
        };
        assert_eq!(timestamp.len(), 20, "timestamp block: {name}");
        assert!(timestamp.chars().all(|c| c.is_ascii_digit()), "{name}");
        if let Some(suffix) = suffix {
            assert!(!suffix.is_empty(), "{name}");
            assert!(suffix.chars().all(|c| c.is_ascii_digit()), "{name}");
        }
    }

    #[test]
    fn persist_writes_exactly_one_matching_file() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FileTransport::new(dir.path().join("spool"));

        transport.persist("{\"key\":\"value\"}").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path().join("spool"))
            .unwrap()
            .map(|e| e.unwrap())
            .collect();
        assert_eq!(entries.len(), 1);

        let name = entries[0].file_name().into_string().unwrap();
        assert_spool_file_name(&name);

        let contents = fs::read_to_string(entries[0].path()).unwrap();
        assert_eq!(contents, "{\"key\":\"value\"}");
        let round_trip: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(round_trip, serde_json::json!({"key": "value"}));
    }

    #[test]
    fn persist_creates_missing_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("c");
        let transport = FileTransport::new(&nested);

        transport.persist("{}").unwrap();

        assert!(nested.is_dir());
        assert_eq!(fs::read_dir(&nested).unwrap().count(), 1);
    }

    #[test]
    fn persist_into_existing_directory_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FileTransport::new(dir.path());

        transport.persist("{}").unwrap();
        transport.persist("{}").unwrap();

        // Distinct microseconds, so two files.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn event_files_are_world_readable_and_writable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let transport = FileTransport::new(dir.path());
        transport.persist("{}").unwrap();

        let entry = fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        let mode = entry.metadata().unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o666);
    }

    #[test]
    fn unreachable_directory_fails_loud() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let transport = FileTransport::new(blocker.join("spool"));
        let err = transport.persist("{}").unwrap_err();
        assert!(matches!(err, SpoolError::Io { .. }));
    }
}
