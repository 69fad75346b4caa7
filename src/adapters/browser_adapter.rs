//! Opens chart artifacts with the desktop's default handler.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::domain::error::MarketError;
use crate::ports::config_port::ConfigPort;
use crate::ports::viewer_port::ViewerPort;

pub const VIEWER_SECTION: &str = "viewer";

/// Launches the platform opener (`xdg-open`, `open` or `start`), or a
/// configured command that receives the artifact path as its last argument.
#[derive(Debug, Clone, Default)]
pub struct BrowserLauncher {
    command: Option<String>,
}

impl BrowserLauncher {
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
        }
    }

    /// Honors `[viewer] command` when present and non-blank.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        Self {
            command: config.get_non_blank(VIEWER_SECTION, "command"),
        }
    }

    fn build_command(&self, path: &Path) -> Result<Command, MarketError> {
        if let Some(line) = &self.command {
            let mut parts = line.split_whitespace();
            let program = parts.next().ok_or_else(|| MarketError::Viewer {
                path: path.display().to_string(),
                reason: "viewer command is empty".into(),
            })?;
            let mut cmd = Command::new(program);
            cmd.args(parts).arg(path);
            return Ok(cmd);
        }
        Ok(platform_opener(path))
    }
}

#[cfg(target_os = "macos")]
fn platform_opener(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(target_os = "windows")]
fn platform_opener(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_opener(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

impl ViewerPort for BrowserLauncher {
    fn open(&self, path: &Path) -> Result<(), MarketError> {
        let mut cmd = self.build_command(path)?;
        debug!(command = ?cmd, "launching viewer");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| MarketError::Viewer {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }
}
