//! Engine child process.
//!
//! Spawns the engine with piped stdin/stdout. The engine's stderr is
//! inherited so its own diagnostics stay visible.

use std::io;
use std::process::{ExitStatus, Stdio};

use tokio::io::BufReader;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

use crate::config::Config;

/// A running engine and the two pipes the adapter talks over.
#[derive(Debug)]
pub struct EngineProcess {
    pub child: Child,
    /// Engine stdout, buffered for line reads.
    pub stdout: BufReader<ChildStdout>,
    /// Engine stdin; moves are written here.
    pub stdin: ChildStdin,
}

impl EngineProcess {
    /// Spawn the engine described by `config`.
    pub fn spawn(config: &Config) -> io::Result<Self> {
        let mut child = Command::new(&config.engine)
            .args(&config.engine_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "engine stdin not piped"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "engine stdout not piped"))?;

        info!(engine = %config.engine, pid = child.id(), "engine started");

        Ok(EngineProcess {
            child,
            stdout: BufReader::new(stdout),
            stdin,
        })
    }
}

/// Stop the engine once the adapter is done with it.
///
/// An engine that already exited is reaped; one still waiting for input
/// is killed. Returns the exit status when one is available.
pub async fn shutdown(mut child: Child) -> io::Result<Option<ExitStatus>> {
    if let Some(status) = child.try_wait()? {
        debug!(%status, "engine already exited");
        return Ok(Some(status));
    }

    match child.kill().await {
        Ok(()) => {
            debug!("engine stopped");
            Ok(child.try_wait()?)
        }
        Err(e) => {
            warn!(error = %e, "failed to stop engine");
            Err(e)
        }
    }
}
