//! Isolated test environment with temp directory.

use super::{NotesCommand, TestNote};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary data directory.
///
/// Creates a temp directory that is automatically cleaned up on drop. The
/// local store lives in `data/`, the config lookup in `config/`, and
/// directories for files mode can be made alongside them.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    temp_dir: TempDir,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::create_dir_all(temp_dir.path().join("config"))
            .expect("Failed to create config directory");
        Self { temp_dir }
    }

    /// Returns the directory passed as `--data-dir`.
    pub fn data_dir(&self) -> PathBuf {
        self.temp_dir.path().join("data")
    }

    /// Returns the path where the local store is kept.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir().join("store.db")
    }

    /// Returns a path under the environment for use as a notes directory.
    ///
    /// The directory is not created.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Writes `config/notekeep/config.toml`.
    pub fn write_config(&self, contents: &str) {
        let dir = self.temp_dir.path().join("config").join("notekeep");
        std::fs::create_dir_all(&dir).expect("Failed to create config directory");
        std::fs::write(dir.join("config.toml"), contents).expect("Failed to write config");
    }

    /// Writes notes as `notes-app-data.json` into `dir`, as another client
    /// sharing the directory would.
    pub fn seed_notes(&self, dir: &Path, notes: &[TestNote]) {
        let value = Value::Array(notes.iter().map(TestNote::to_json).collect());
        self.write_file(dir, "notes-app-data.json", &serde_json::to_string_pretty(&value).unwrap());
    }

    /// Writes a raw file into `dir`, creating the directory if needed.
    pub fn write_file(&self, dir: &Path, name: &str, content: &str) -> PathBuf {
        std::fs::create_dir_all(dir).expect("Failed to create directory");
        let path = dir.join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Reads and parses a JSON file.
    pub fn read_json(&self, path: &Path) -> Value {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
        serde_json::from_str(&text).expect("File is not valid JSON")
    }

    /// Creates a NotesCommand configured for this test environment.
    pub fn cmd(&self) -> NotesCommand {
        NotesCommand::new()
            .config_home(&self.temp_dir.path().join("config"))
            .data_dir(&self.data_dir())
    }

    /// Creates a note through the CLI and returns its ID.
    pub fn create(&self, title: &str) -> String {
        self.cmd().new_note(title).data()["id"]
            .as_str()
            .expect("new should print an id")
            .to_string()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_creates_config_dir_only() {
        let env = TestEnv::new();
        assert!(env.temp_dir.path().join("config").is_dir());
        assert!(!env.data_dir().exists());
    }

    #[test]
    fn test_env_seed_notes_writes_array() {
        let env = TestEnv::new();
        let dir = env.path("shared");
        env.seed_notes(&dir, &[TestNote::new("One"), TestNote::new("Two")]);
        let value = env.read_json(&dir.join("notes-app-data.json"));
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.temp_dir.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
