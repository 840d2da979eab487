//! Command dispatch

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Play { show_tree }) => cmd_play(cli, *show_tree),
        None => cmd_play(cli, false),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

#[instrument(skip(cli))]
fn cmd_play(cli: &Cli, show_tree: bool) -> CliResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if show_tree {
        settings.show_tree = true;
    }
    debug!("settings: {:?}", settings);

    let container = ServiceContainer::new(settings);
    let mut game = container.game_service();
    let summary = game.run()?;

    if summary.learned > 0 {
        output::success(&format!(
            "learned {} new animal(s) this session",
            summary.learned
        ));
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::header("Effective settings");
            write_stdout(&settings.to_toml()?)
        }
        ConfigCommands::Template => write_stdout(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) if path.exists() => output::info(&path.display()),
                Some(path) => output::detail(&format!("{} (not present)", path.display())),
                None => output::warning("no config directory available on this platform"),
            }
            Ok(())
        }
    }
}

fn write_stdout(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| InfraError::io("write to stdout", e))?;
    Ok(())
}
