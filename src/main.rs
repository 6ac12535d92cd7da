use anyhow::Result;
use clap::Parser;
use tabshell::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI --log-level wins, then DEBUG_LEVEL, then the config value (applied below)
    tabshell::debug::init_log_bridge(cli.log_level_filter());
    log::info!("Starting tabshell {}", tabshell::VERSION);

    let config = cli.load_config()?;
    if cli.log_level.is_none() && std::env::var_os("DEBUG_LEVEL").is_none() {
        tabshell::debug::set_level(config.log_level.to_level_filter());
    }

    let result = cli::run(&cli, &config);
    if let Err(ref e) = result {
        log::error!("tabshell failed: {e:#}");
    }
    result
}
