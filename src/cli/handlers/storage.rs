//! Storage and language command handlers.

use anyhow::{Context, Result, bail};
use std::io;
use std::path::PathBuf;

use crate::cli::output::{OutputFormat, print_json};
use crate::cli::session::Session;
use crate::cli::{LangArgs, StorageAction, StorageArgs};
use crate::settings::StorageMode;
use crate::storage::{DirectoryHandle, DirectoryPicker, FsDirectoryHandle};

/// A picker that always chooses the directory given on the command line.
#[derive(Debug)]
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A picker with nothing to pick, for switches that never prompt.
    pub fn none() -> Self {
        Self { path: None }
    }
}

impl DirectoryPicker for PathPicker {
    fn pick(&mut self) -> io::Result<Option<Box<dyn DirectoryHandle>>> {
        let Some(path) = self.path.take() else {
            return Ok(None);
        };
        let path = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()?.join(path)
        };
        Ok(Some(Box::new(FsDirectoryHandle::new(path))))
    }
}

pub fn handle_storage(args: &StorageArgs, session: &mut Session) -> Result<()> {
    match &args.action {
        StorageAction::Local => {
            session
                .settings
                .set_storage_mode(StorageMode::Local, &mut PathPicker::none())
                .context("failed to switch to local storage")?;
            session.sync();
            println!("Storing notes in {}", session.store_path().display());
        }
        StorageAction::Files { dir } => {
            let changed = session
                .settings
                .set_storage_mode(StorageMode::Files, &mut PathPicker::new(dir))
                .with_context(|| format!("failed to use directory {}", dir.display()))?;
            if !changed {
                bail!("no directory selected");
            }
            session.sync();
            if session.settings.needs_permission() {
                println!("Selected {}; write access is still needed (run `notes storage grant`)", dir.display());
            } else {
                println!("Storing notes in {}", dir.display());
            }
        }
        StorageAction::Grant => {
            let granted = session
                .settings
                .request_permission()
                .context("failed to request directory access")?;
            if !granted {
                bail!("write access to the notes directory was denied");
            }
            session.sync();
            println!("Access granted; {} note(s) loaded", session.manager.notes().len());
        }
        StorageAction::Status { format } => {
            let status = session.settings.status();
            match format {
                OutputFormat::Human => {
                    println!("mode: {}", status.storage_mode);
                    if let Some(directory) = &status.directory {
                        println!("directory: {}", directory);
                    }
                    if status.needs_permission {
                        println!("access: needs permission");
                    } else {
                        println!("access: granted");
                    }
                    println!("language: {}", status.language);
                }
                OutputFormat::Json => print_json(status)?,
            }
        }
    }
    Ok(())
}

pub fn handle_lang(args: &LangArgs, session: &mut Session) -> Result<()> {
    if let Some(language) = args.language {
        session.settings.set_language(language);
    }
    println!("{}", session.language());
    Ok(())
}
