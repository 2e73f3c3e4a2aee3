//! Builder for invocations of the `notes` binary.

// Each test crate uses a different subset of the builders.
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// One `notes` invocation, isolated from the user's config and log filter.
///
/// Global options come first, then a subcommand builder such as [`ls_at`]
/// or [`archive`], then per-command flags like [`json`].
///
/// [`ls_at`]: NotesCommand::ls_at
/// [`archive`]: NotesCommand::archive
/// [`json`]: NotesCommand::json
pub struct NotesCommand {
    args: Vec<String>,
    config_home: Option<PathBuf>,
}

impl NotesCommand {
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            config_home: None,
        }
    }

    /// `--data-dir <path>`: where `store.db` lives.
    pub fn data_dir(self, path: &Path) -> Self {
        let path = path.to_string_lossy().into_owned();
        self.args(["--data-dir", path.as_str()])
    }

    /// Resolves `notekeep/config.toml` under `path` instead of the real
    /// config directory.
    pub fn config_home(mut self, path: &Path) -> Self {
        self.config_home = Some(path.to_path_buf());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("notes").expect("notes binary is built for tests");
        if let Some(home) = &self.config_home {
            cmd.env("XDG_CONFIG_HOME", home);
        }
        cmd.env_remove("RUST_LOG");
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Stdout of a successful run.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("stdout is UTF-8")
    }

    /// Stdout of a successful run parsed as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("stdout is JSON")
    }

    /// Runs with `--format json` and returns the `data` member.
    pub fn data(self) -> Value {
        let out: Value = self.json().output_json();
        out["data"].clone()
    }

    // ===========================================
    // Subcommands
    // ===========================================

    /// `ls` at the default location `/`.
    pub fn ls(self) -> Self {
        self.args(["ls"])
    }

    /// `ls <location>`, e.g. `/archived` or `/tags/<id>?q=text`.
    pub fn ls_at(self, location: &str) -> Self {
        self.args(["ls", location])
    }

    /// `new --title <title>`.
    pub fn new_note(self, title: &str) -> Self {
        self.args(["new", "--title", title])
    }

    /// `show <note>`, where the note is an id, id prefix, or title.
    pub fn show(self, note: &str) -> Self {
        self.args(["show", note])
    }

    /// `edit <note>`; follow with `--title`/`--content` via [`args`](Self::args).
    pub fn edit(self, note: &str) -> Self {
        self.args(["edit", note])
    }

    pub fn archive(self, note: &str) -> Self {
        self.args(["archive", note])
    }

    pub fn unarchive(self, note: &str) -> Self {
        self.args(["unarchive", note])
    }

    /// `tag <note> <name>`.
    pub fn tag(self, note: &str, name: &str) -> Self {
        self.args(["tag", note, name])
    }

    /// `tags` with no action lists tags and usage counts.
    pub fn tags(self) -> Self {
        self.args(["tags"])
    }

    /// `storage <action...>`, e.g. `["files", dir]` or `["grant"]`.
    pub fn storage<I, S>(self, action: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args(["storage"]).args(action)
    }

    /// `lang [en|pt]`.
    pub fn lang(self, language: Option<&str>) -> Self {
        self.args(["lang"]).args(language)
    }

    // ===========================================
    // Per-command flags
    // ===========================================

    /// `--format json`; output is wrapped as `{"data": ...}`.
    pub fn json(self) -> Self {
        self.args(["--format", "json"])
    }
}

impl Default for NotesCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_flag_runs() {
        NotesCommand::new().args(["--version"]).assert().success();
    }

    #[test]
    fn global_options_precede_subcommand() {
        let cmd = NotesCommand::new()
            .data_dir(Path::new("/tmp/notes-data"))
            .ls_at("/archived?q=x")
            .json();
        assert_eq!(
            cmd.get_args(),
            ["--data-dir", "/tmp/notes-data", "ls", "/archived?q=x", "--format", "json"]
        );
    }

    #[test]
    fn lang_without_value_only_adds_subcommand() {
        assert_eq!(NotesCommand::new().lang(None).get_args(), ["lang"]);
        assert_eq!(NotesCommand::new().lang(Some("pt")).get_args(), ["lang", "pt"]);
    }
}
