//! Directory-backed storage: one `<key>.json` file per logical key.

use super::{StorageError, StorageProvider, StorageResult};
use serde_json::Value;
use std::fs;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Access level granted on a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    /// Not granted yet; a request may succeed.
    Prompt,
    Denied,
}

/// A capability to read and write files in a user-chosen directory.
///
/// Reads of an absent file fail with `io::ErrorKind::NotFound`.
pub trait DirectoryHandle {
    /// Display name of the directory.
    fn name(&self) -> String;

    /// Location used to reopen the directory in a later session.
    fn path(&self) -> &Path;

    fn read_file(&self, name: &str) -> io::Result<String>;

    /// Replaces the file's contents, creating it if absent.
    fn write_file(&self, name: &str, contents: &str) -> io::Result<()>;

    fn remove_entry(&self, name: &str) -> io::Result<()>;

    /// Reports the current read-write permission without prompting.
    fn query_permission(&self) -> io::Result<PermissionState>;

    /// Asks for read-write permission.
    fn request_permission(&self) -> io::Result<PermissionState>;
}

/// Lets the user choose a directory.
pub trait DirectoryPicker {
    /// Returns `Ok(None)` when the user dismisses the picker.
    fn pick(&mut self) -> io::Result<Option<Box<dyn DirectoryHandle>>>;
}

/// A directory on the local filesystem.
///
/// Permission is `Granted` when the directory exists and is writable,
/// `Prompt` when it does not exist yet (a request creates it), and `Denied`
/// when it is read-only or not a directory.
#[derive(Debug, Clone)]
pub struct FsDirectoryHandle {
    root: PathBuf,
}

impl FsDirectoryHandle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DirectoryHandle for FsDirectoryHandle {
    fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    fn path(&self) -> &Path {
        &self.root
    }

    fn read_file(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.root.join(name))
    }

    fn write_file(&self, name: &str, contents: &str) -> io::Result<()> {
        let mut temp = NamedTempFile::new_in(&self.root)?;
        temp.write_all(contents.as_bytes())?;
        temp.persist(self.root.join(name)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove_entry(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.root.join(name))
    }

    fn query_permission(&self) -> io::Result<PermissionState> {
        match fs::metadata(&self.root) {
            Ok(meta) if !meta.is_dir() || meta.permissions().readonly() => {
                Ok(PermissionState::Denied)
            }
            Ok(_) => Ok(PermissionState::Granted),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PermissionState::Prompt),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Ok(PermissionState::Denied),
            Err(e) => Err(e),
        }
    }

    fn request_permission(&self) -> io::Result<PermissionState> {
        match self.query_permission()? {
            PermissionState::Prompt => {
                fs::create_dir_all(&self.root)?;
                self.query_permission()
            }
            state => Ok(state),
        }
    }
}

/// Storage provider writing pretty-printed JSON files into a directory.
pub struct DirectoryProvider {
    handle: Option<Box<dyn DirectoryHandle>>,
}

impl DirectoryProvider {
    pub fn new(handle: Box<dyn DirectoryHandle>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// A provider with no directory selected yet.
    pub fn unselected() -> Self {
        Self { handle: None }
    }

    /// Replaces the directory this provider writes to.
    pub fn set_directory_handle(&mut self, handle: Box<dyn DirectoryHandle>) {
        self.handle = Some(handle);
    }

    pub fn handle(&self) -> Option<&dyn DirectoryHandle> {
        self.handle.as_deref()
    }

    fn file_name(key: &str) -> String {
        format!("{key}.json")
    }

    fn io_error(handle: &dyn DirectoryHandle, key: &str, source: io::Error) -> StorageError {
        StorageError::Io {
            path: handle.path().join(Self::file_name(key)),
            source,
        }
    }
}

impl StorageProvider for DirectoryProvider {
    fn describe(&self) -> String {
        match &self.handle {
            Some(handle) => format!("directory {}", handle.path().display()),
            None => "directory (none selected)".to_string(),
        }
    }

    fn init(&self) -> StorageResult<()> {
        if self.handle.is_none() {
            return Err(StorageError::NotInitialized(
                "directory handle not provided; select a directory first".to_string(),
            ));
        }
        Ok(())
    }

    fn read_value(&self, key: &str) -> StorageResult<Option<Value>> {
        let Some(handle) = self.handle.as_deref() else {
            return Ok(None);
        };
        let contents = match handle.read_file(&Self::file_name(key)) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_error(handle, key, e)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| StorageError::Json {
                key: key.to_string(),
                source: e,
            })
    }

    fn write_value(&self, key: &str, value: &Value) -> StorageResult<()> {
        let Some(handle) = self.handle.as_deref() else {
            return Err(StorageError::NotInitialized(
                "no directory selected".to_string(),
            ));
        };
        let contents = serde_json::to_string_pretty(value).map_err(|e| StorageError::Json {
            key: key.to_string(),
            source: e,
        })?;
        handle
            .write_file(&Self::file_name(key), &contents)
            .map_err(|e| Self::io_error(handle, key, e))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let Some(handle) = self.handle.as_deref() else {
            return Ok(());
        };
        match handle.remove_entry(&Self::file_name(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(handle, key, e)),
        }
    }

    fn has_permission(&self) -> StorageResult<bool> {
        let Some(handle) = self.handle.as_deref() else {
            return Ok(false);
        };
        let state = handle.query_permission().map_err(|e| StorageError::Io {
            path: handle.path().to_path_buf(),
            source: e,
        })?;
        Ok(state == PermissionState::Granted)
    }

    fn request_permission(&self) -> StorageResult<bool> {
        let Some(handle) = self.handle.as_deref() else {
            return Ok(false);
        };
        let state = handle.request_permission().map_err(|e| StorageError::Io {
            path: handle.path().to_path_buf(),
            source: e,
        })?;
        Ok(state == PermissionState::Granted)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory directory handle for exercising permission flows.

    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;
    use std::rc::Rc;

    #[derive(Debug)]
    pub(crate) struct DirState {
        pub files: RefCell<BTreeMap<String, String>>,
        pub permission: Cell<PermissionState>,
        /// State a permission request moves to.
        pub on_request: Cell<PermissionState>,
        pub fail_writes: Cell<bool>,
    }

    /// Clones share the same files and permission state.
    #[derive(Debug, Clone)]
    pub(crate) struct MemoryDirectory {
        path: PathBuf,
        pub state: Rc<DirState>,
    }

    impl MemoryDirectory {
        pub fn new(path: &str, permission: PermissionState) -> Self {
            Self {
                path: PathBuf::from(path),
                state: Rc::new(DirState {
                    files: RefCell::new(BTreeMap::new()),
                    permission: Cell::new(permission),
                    on_request: Cell::new(PermissionState::Granted),
                    fail_writes: Cell::new(false),
                }),
            }
        }

        pub fn file(&self, name: &str) -> Option<String> {
            self.state.files.borrow().get(name).cloned()
        }

        pub fn put_file(&self, name: &str, contents: &str) {
            self.state
                .files
                .borrow_mut()
                .insert(name.to_string(), contents.to_string());
        }
    }

    impl DirectoryHandle for MemoryDirectory {
        fn name(&self) -> String {
            self.path.display().to_string()
        }

        fn path(&self) -> &Path {
            &self.path
        }

        fn read_file(&self, name: &str) -> io::Result<String> {
            self.file(name)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }

        fn write_file(&self, name: &str, contents: &str) -> io::Result<()> {
            if self.state.fail_writes.get() {
                return Err(io::Error::other("disk full"));
            }
            self.put_file(name, contents);
            Ok(())
        }

        fn remove_entry(&self, name: &str) -> io::Result<()> {
            self.state
                .files
                .borrow_mut()
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }

        fn query_permission(&self) -> io::Result<PermissionState> {
            Ok(self.state.permission.get())
        }

        fn request_permission(&self) -> io::Result<PermissionState> {
            if self.state.permission.get() == PermissionState::Prompt {
                self.state.permission.set(self.state.on_request.get());
            }
            Ok(self.state.permission.get())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MemoryDirectory;
    use super::*;
    use crate::storage::StorageExt;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn init_requires_a_handle() {
        assert!(DirectoryProvider::unselected().init().is_err());
        let dir = MemoryDirectory::new("/notes", PermissionState::Granted);
        assert!(DirectoryProvider::new(Box::new(dir)).init().is_ok());
    }

    #[test]
    fn missing_file_reads_as_absent() {
        let dir = MemoryDirectory::new("/notes", PermissionState::Granted);
        let provider = DirectoryProvider::new(Box::new(dir));
        assert_eq!(provider.read_value("notes-app-data").unwrap(), None);
        assert_eq!(provider.get("notes-app-data", json!([])), json!([]));
    }

    #[test]
    fn writes_pretty_json_named_after_key() {
        let dir = MemoryDirectory::new("/notes", PermissionState::Granted);
        let provider = DirectoryProvider::new(Box::new(dir.clone()));
        provider.write_value("notes-app-tags", &json!([{"id": "t1", "name": "Work"}])).unwrap();
        let written = dir.file("notes-app-tags.json").unwrap();
        assert!(written.contains('\n'), "expected pretty-printed JSON: {written}");
        assert_eq!(provider.read_value("notes-app-tags").unwrap(), Some(json!([{"id": "t1", "name": "Work"}])));
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let dir = MemoryDirectory::new("/notes", PermissionState::Granted);
        dir.put_file("notes-app-data.json", "[{");
        let provider = DirectoryProvider::new(Box::new(dir));
        assert!(provider.read_value("notes-app-data").is_err());
        assert_eq!(provider.get("notes-app-data", json!([])), json!([]));
    }

    #[test]
    fn write_errors_are_swallowed_by_set() {
        let dir = MemoryDirectory::new("/notes", PermissionState::Granted);
        dir.state.fail_writes.set(true);
        let provider = DirectoryProvider::new(Box::new(dir));
        assert!(provider.write_value("k", &json!(1)).is_err());
        assert!(!provider.set("k", &1));
    }

    #[test]
    fn remove_ignores_missing_file() {
        let dir = MemoryDirectory::new("/notes", PermissionState::Granted);
        dir.put_file("k.json", "1");
        let provider = DirectoryProvider::new(Box::new(dir.clone()));
        provider.remove("k").unwrap();
        provider.remove("k").unwrap();
        assert_eq!(dir.file("k.json"), None);
    }

    #[test]
    fn permission_delegates_to_handle() {
        let dir = MemoryDirectory::new("/notes", PermissionState::Prompt);
        let provider = DirectoryProvider::new(Box::new(dir.clone()));
        assert!(!provider.has_permission().unwrap());
        assert!(provider.request_permission().unwrap());
        assert!(provider.has_permission().unwrap());

        dir.state.permission.set(PermissionState::Prompt);
        dir.state.on_request.set(PermissionState::Denied);
        assert!(!provider.request_permission().unwrap());
    }

    #[test]
    fn unselected_provider_has_no_permission() {
        let provider = DirectoryProvider::unselected();
        assert!(!provider.has_permission().unwrap());
        assert!(!provider.request_permission().unwrap());
        assert_eq!(provider.read_value("k").unwrap(), None);
        assert!(provider.write_value("k", &json!(1)).is_err());
    }

    #[test]
    fn set_directory_handle_selects_directory() {
        let mut provider = DirectoryProvider::unselected();
        provider.set_directory_handle(Box::new(MemoryDirectory::new("/picked", PermissionState::Granted)));
        assert!(provider.init().is_ok());
        assert_eq!(provider.handle().map(|h| h.name()).as_deref(), Some("/picked"));
    }

    #[test]
    fn fs_handle_round_trip() {
        let temp = TempDir::new().unwrap();
        let handle = FsDirectoryHandle::new(temp.path());
        assert_eq!(handle.query_permission().unwrap(), PermissionState::Granted);

        let provider = DirectoryProvider::new(Box::new(handle));
        assert!(provider.set("notes-app-data", &json!([])));
        let on_disk = std::fs::read_to_string(temp.path().join("notes-app-data.json")).unwrap();
        assert_eq!(on_disk, "[]");
        provider.remove("notes-app-data").unwrap();
        assert!(!temp.path().join("notes-app-data.json").exists());
    }

    #[test]
    fn fs_handle_missing_directory_prompts_and_request_creates_it() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("later");
        let handle = FsDirectoryHandle::new(&root);
        assert_eq!(handle.name(), "later");
        assert_eq!(handle.query_permission().unwrap(), PermissionState::Prompt);
        assert_eq!(handle.request_permission().unwrap(), PermissionState::Granted);
        assert!(root.is_dir());
    }

    #[test]
    fn fs_handle_on_a_file_is_denied() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();
        let handle = FsDirectoryHandle::new(&file);
        assert_eq!(handle.query_permission().unwrap(), PermissionState::Denied);
        assert_eq!(handle.request_permission().unwrap(), PermissionState::Denied);
    }
}
