//! Command-line interface for tabshell.
//!
//! This module handles CLI argument parsing and the offline session
//! subcommands (`inspect`, `migrate`).

use crate::session::{CURRENT_VERSION, RestoreOutcome, SessionPersistence};
use crate::state::ShellState;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use tabshell_config::{Config, LogLevel};

/// tabshell - Workspace, tab and split-view state for a browser shell
#[derive(Parser, Debug)]
#[command(name = "tabshell")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level for the debug log file (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", global = true, value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Config file to use instead of ~/.config/tabshell/config.yaml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the workspaces, tabs, groups and split view stored in a session file
    Inspect {
        /// Session file (defaults to the configured location)
        #[arg(long, value_name = "PATH")]
        session: Option<PathBuf>,
    },
    /// Load a session file, upgrading older versions, and write it back
    Migrate {
        /// Session file (defaults to the configured location)
        #[arg(long, value_name = "PATH")]
        session: Option<PathBuf>,
    },
}

fn parse_log_level(value: &str) -> std::result::Result<LogLevel, String> {
    LogLevel::from_name(value).ok_or_else(|| format!("unknown log level '{value}'"))
}

impl Cli {
    /// Level requested on the command line, if any
    pub fn log_level_filter(&self) -> Option<log::LevelFilter> {
        self.log_level.map(LogLevel::to_level_filter)
    }

    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to load config from {:?}", path)),
            None => Config::load().context("Failed to load config"),
        }
    }
}

/// Run the parsed command line
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Some(Commands::Inspect { session }) => inspect(config, session.clone()),
        Some(Commands::Migrate { session }) => migrate(config, session.clone()),
        None => inspect(config, None),
    }
}

fn open(config: &Config, session: Option<PathBuf>) -> (SessionPersistence, ShellState) {
    let path = session.unwrap_or_else(|| config.session_path());
    (
        SessionPersistence::new(path, config.session_save_debounce()),
        ShellState::new(config),
    )
}

fn inspect(config: &Config, session: Option<PathBuf>) -> Result<()> {
    let (mut persistence, mut state) = open(config, session);
    let path = persistence.store().path().to_path_buf();
    match persistence
        .restore(&mut state)
        .with_context(|| format!("Failed to read session {:?}", path))?
    {
        RestoreOutcome::NoSnapshot => println!("No session at {}", path.display()),
        RestoreOutcome::Restored { version, .. } => {
            println!("Session {} (version {})", path.display(), version);
            print!("{}", describe_state(&state));
        }
    }
    Ok(())
}

fn migrate(config: &Config, session: Option<PathBuf>) -> Result<()> {
    let (mut persistence, mut state) = open(config, session);
    let path = persistence.store().path().to_path_buf();
    let outcome = persistence
        .restore(&mut state)
        .with_context(|| format!("Failed to read session {:?}", path))?;
    let RestoreOutcome::Restored { version, .. } = outcome else {
        bail!("No session at {}", path.display());
    };
    persistence
        .save(&state)
        .with_context(|| format!("Failed to write session {:?}", path))?;
    if version < CURRENT_VERSION {
        println!("Migrated {} from version {} to {}", path.display(), version, CURRENT_VERSION);
    } else {
        println!("Rewrote {} at version {}", path.display(), CURRENT_VERSION);
    }
    Ok(())
}

/// Human-readable dump of the state graph
pub fn describe_state(state: &ShellState) -> String {
    let mut out = String::new();
    let active_workspace = state.workspaces.active_id();
    for workspace in state.workspaces.workspaces() {
        let marker = if Some(workspace.id()) == active_workspace { "*" } else { " " };
        let _ = writeln!(
            out,
            "{} workspace {} \"{}\" accent={} sidebar={}{}",
            marker,
            workspace.id(),
            workspace.name(),
            workspace.accent_color(),
            workspace.sidebar_width(),
            if workspace.is_sidebar_expanded() { "" } else { " (collapsed)" },
        );
        for group in workspace.groups.groups() {
            let _ = writeln!(
                out,
                "    group {} \"{}\" {}{}",
                group.id(),
                group.name(),
                group.color(),
                if group.is_collapsed() { " (collapsed)" } else { "" },
            );
        }
        let active_tab = workspace.tabs.active_tab_id();
        for tab in workspace.tabs.tabs() {
            let marker = if Some(tab.id()) == active_tab { "*" } else { " " };
            let mut flags = String::new();
            if tab.is_essential() {
                flags.push_str(" essential");
            }
            if tab.is_grouped() {
                let _ = write!(flags, " group={}", tab.group_id());
            }
            let _ = writeln!(
                out,
                "  {} tab {} \"{}\" {}{}",
                marker,
                tab.id(),
                tab.display_title(),
                tab.url(),
                flags
            );
        }
    }

    let split = &state.split_view;
    if split.is_enabled() {
        let _ = writeln!(
            out,
            "split view: {} panes {:?} focused={} ratio={}",
            split.pane_count(),
            split.pane_tab_ids(),
            split.focused_pane(),
            split.split_ratio()
        );
    } else {
        let _ = writeln!(out, "split view: off");
    }
    let _ = writeln!(out, "recently closed: {}", state.recently_closed.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inspect_with_global_log_level() {
        let cli = Cli::try_parse_from([
            "tabshell",
            "inspect",
            "--session",
            "/tmp/s.json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(matches!(
            cli.command,
            Some(Commands::Inspect { session: Some(_) })
        ));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["tabshell", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_describe_marks_active_entries() {
        let mut state = ShellState::default();
        state.workspaces.add_workspace("Main");
        state
            .workspaces
            .active_mut()
            .unwrap()
            .tabs
            .add_tab("https://example.org");
        let text = describe_state(&state);
        assert!(text.contains("* workspace"));
        assert!(text.contains("\"Main\""));
        assert!(text.contains("* tab"));
        assert!(text.contains("https://example.org"));
        assert!(text.contains("split view: off"));
    }
}
