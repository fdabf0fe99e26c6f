//! Test utilities for creating temporary log files and rotating them.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct TempLogFile {
    pub path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

impl TempLogFile {
    /// Create a new empty temporary log file
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("test.log");

        File::create(&path)?;

        Ok(Self {
            path,
            _temp_dir: temp_dir,
        })
    }

    /// Create a temporary log file holding exactly `content`
    pub fn with_content(content: &str) -> std::io::Result<Self> {
        let temp_file = Self::new()?;
        temp_file.append_raw(content)?;
        Ok(temp_file)
    }

    /// Append `content` followed by a newline, creating the file if it is gone
    pub fn append_line(&self, content: &str) -> std::io::Result<()> {
        self.append_raw(&format!("{content}\n"))
    }

    /// Append `content` as-is, creating the file if it is gone
    pub fn append_raw(&self, content: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Truncate the file in place (copytruncate rotation)
    pub fn truncate(&self) -> std::io::Result<()> {
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        Ok(())
    }

    /// Rename the file to `<name>.1`, leaving nothing at the path (rename/create rotation)
    pub fn rotate(&self) -> std::io::Result<PathBuf> {
        let mut rotated = self.path.clone().into_os_string();
        rotated.push(".1");
        let rotated = PathBuf::from(rotated);
        std::fs::rename(&self.path, &rotated)?;
        Ok(rotated)
    }

    /// Get the path to the temporary file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_log_file_creation() {
        let temp_file = TempLogFile::new().unwrap();
        assert!(temp_file.path().exists());
    }

    #[test]
    fn test_with_content_is_verbatim() {
        let temp_file = TempLogFile::with_content("no newline").unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content, "no newline");
    }

    #[test]
    fn test_append_line() {
        let temp_file = TempLogFile::new().unwrap();
        temp_file.append_line("line 1").unwrap();
        temp_file.append_line("line 2").unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content, "line 1\nline 2\n");
    }

    #[test]
    fn test_truncate() {
        let temp_file = TempLogFile::with_content("initial content\n").unwrap();
        temp_file.truncate().unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_rotate_moves_file_away() {
        let temp_file = TempLogFile::with_content("old\n").unwrap();
        let rotated = temp_file.rotate().unwrap();

        assert!(!temp_file.path().exists());
        assert_eq!(std::fs::read_to_string(&rotated).unwrap(), "old\n");
        assert!(rotated.to_string_lossy().ends_with("test.log.1"));

        temp_file.append_line("new").unwrap();
        assert_eq!(std::fs::read_to_string(temp_file.path()).unwrap(), "new\n");
    }
}
