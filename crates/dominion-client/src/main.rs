//! Dominion engine client.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitStatus;

use anyhow::{Context, Result};
use clap::Parser;
use dominion_client::config::{Config, OutputFormat, Overrides};
use dominion_client::decision::FixedMove;
use dominion_client::display;
use dominion_client::engine_process::{self, EngineProcess};
use dominion_client::session::{Session, SessionError};
use dominion_core::DuplicateBlockPolicy;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "dominion-client")]
#[clap(about = "Plays the Dominion engine over its stdin/stdout")]
struct Cli {
    /// TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Engine executable
    #[clap(short, long)]
    engine: Option<String>,

    /// Argument passed to the engine (repeatable)
    #[clap(long = "arg")]
    engine_args: Vec<String>,

    /// Turns to play; 0 plays until the engine stops
    #[clap(short, long)]
    turns: Option<u32>,

    /// Move sent every turn
    #[clap(short, long = "move")]
    mv: Option<String>,

    /// Handling of a block marker repeated within one turn
    /// (last-write-wins or merge)
    #[clap(long)]
    duplicate_blocks: Option<DuplicateBlockPolicy>,

    /// How parsed turns are printed
    #[clap(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Fail a turn the engine takes longer than this to send
    #[clap(long)]
    read_timeout_ms: Option<u64>,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let overrides = Overrides {
            engine: self.engine.clone(),
            engine_args: self.engine_args.clone(),
            turns: self.turns,
            move_token: self.mv.clone(),
            duplicate_blocks: self.duplicate_blocks,
            format: self.format,
            read_timeout_ms: self.read_timeout_ms,
        };

        Ok(config.apply_env()?.apply_overrides(overrides))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the printed game state.
    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.resolve_config().context("loading configuration")?;
    info!(
        engine = %config.engine,
        turns = config.turns,
        mv = %config.move_token,
        "starting dominion-client"
    );

    let engine = EngineProcess::spawn(&config)
        .with_context(|| format!("spawning engine `{}`", config.engine))?;
    let EngineProcess {
        child,
        stdout,
        stdin,
    } = engine;

    let mut session = Session::new(stdout, stdin, FixedMove::new(config.move_token()))
        .with_parse_options(config.parse_options())
        .with_read_timeout(config.read_timeout());

    let format = config.format;
    let result = session
        .run(config.turns, |record| match display::render(&record.snapshot, format) {
            Ok(text) => {
                let mut out = std::io::stdout().lock();
                if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
                    error!(error = %e, "cannot print turn {}", record.turn);
                }
            }
            Err(e) => error!(error = %e, "cannot render turn {}", record.turn),
        })
        .await;

    // Closing the engine's stdin before stopping it.
    drop(session);
    let stopped = engine_process::shutdown(child).await;

    let played = session_outcome(result, stopped)?;
    info!(turns = played, "done");
    Ok(())
}

/// A failed session is reported over a failure to stop the engine.
fn session_outcome(
    result: Result<u32, SessionError>,
    stopped: io::Result<Option<ExitStatus>>,
) -> Result<u32> {
    match (result, stopped) {
        (Ok(played), Ok(_)) => Ok(played),
        (Ok(_), Err(e)) => Err(e).context("stopping engine"),
        (Err(e), stopped) => {
            if let Err(stop_err) = stopped {
                error!(error = %stop_err, "cannot stop engine");
            }
            Err(e).context("engine session failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kill_failed() -> io::Error {
        io::Error::new(io::ErrorKind::Other, "kill failed")
    }

    #[test]
    fn duplicate_blocks_flag_takes_policy_names() {
        let cli = Cli::try_parse_from(["dominion-client", "--duplicate-blocks", "merge"]).unwrap();
        assert_eq!(cli.duplicate_blocks, Some(DuplicateBlockPolicy::Merge));

        let cli = Cli::try_parse_from(["dominion-client"]).unwrap();
        assert_eq!(cli.duplicate_blocks, None);

        assert!(Cli::try_parse_from(["dominion-client", "--duplicate-blocks", "first"]).is_err());
    }

    #[test]
    fn session_error_outranks_shutdown_error() {
        let failed = Err(SessionError::Timeout {
            turn: 2,
            after_ms: 50,
        });
        let err = session_outcome(failed, Err(kill_failed())).unwrap_err();
        assert_eq!(err.to_string(), "engine session failed");
        assert!(err.downcast_ref::<SessionError>().is_some());
    }

    #[test]
    fn shutdown_error_surfaces_after_a_good_session() {
        let err = session_outcome(Ok(3), Err(kill_failed())).unwrap_err();
        assert_eq!(err.to_string(), "stopping engine");
        assert_eq!(session_outcome(Ok(3), Ok(None)).unwrap(), 3);
    }
}
