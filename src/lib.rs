//! notekeep - tagged notes with swappable local or directory storage

pub mod cli;
pub mod clock;
pub mod domain;
pub mod editor;
pub mod i18n;
pub mod manager;
pub mod nav;
pub mod notify;
pub mod schema;
pub mod settings;
pub mod storage;
pub mod view;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        handle_archive, handle_completions, handle_edit, handle_lang, handle_list, handle_new,
        handle_rm, handle_show, handle_storage, handle_tag, handle_tags, handle_unarchive,
        handle_untag,
    },
    session::Session,
};

/// Installs the stderr log subscriber. `RUST_LOG` overrides `verbose`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("notekeep={default_level}")));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::Completions(args) = &cli.command {
        return handle_completions(args);
    }

    let config = Config::load()?;
    let data_dir = config.data_dir(cli.data_dir.as_ref());
    let mut session = Session::open(&data_dir, config.language())?;

    match &cli.command {
        Command::New(args) => handle_new(args, &mut session),
        Command::Show(args) => handle_show(args, &mut session),
        Command::Edit(args) => handle_edit(args, &mut session),
        Command::Rm(args) => handle_rm(args, &mut session),
        Command::Archive(args) => handle_archive(args, &mut session),
        Command::Unarchive(args) => handle_unarchive(args, &mut session),
        Command::Tag(args) => handle_tag(args, &mut session),
        Command::Untag(args) => handle_untag(args, &mut session),
        Command::Tags(args) => handle_tags(args, &mut session),
        Command::List(args) => handle_list(args, &mut session),
        Command::Storage(args) => handle_storage(args, &mut session),
        Command::Lang(args) => handle_lang(args, &mut session),
        Command::Completions(args) => handle_completions(args),
    }
}
