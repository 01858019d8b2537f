//! External audio player detection and spawning.
//!
//! Clips are handed to whichever command-line player is installed.
//! Detection runs once; playback spawns a child process per clip so a
//! newer clip can supersede the current one by killing the child.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// A known command-line audio player and the flags for silent playback.
#[derive(Debug, Clone, Copy)]
struct PlayerSpec {
    command: &'static str,
    args: &'static [&'static str],
}

/// Candidate players, tried in order.
const PLAYER_SPECS: &[PlayerSpec] = &[
    PlayerSpec {
        command: "mpv",
        args: &["--no-video", "--really-quiet"],
    },
    PlayerSpec {
        command: "ffplay",
        args: &["-nodisp", "-autoexit", "-loglevel", "quiet"],
    },
    PlayerSpec {
        command: "mpg123",
        args: &["-q"],
    },
    PlayerSpec {
        command: "afplay",
        args: &[],
    },
];

/// Handle to a detected audio player command.
#[derive(Debug, Clone, Copy)]
pub struct Player {
    spec: &'static PlayerSpec,
}

impl Player {
    /// Finds the first installed candidate player, if any.
    #[must_use]
    pub fn detect() -> Option<Self> {
        PLAYER_SPECS
            .iter()
            .find(|spec| command_exists(spec.command))
            .map(|spec| Self { spec })
    }

    /// Name of the detected player command.
    #[must_use]
    pub const fn command(&self) -> &'static str {
        self.spec.command
    }

    /// Spawns playback of a clip file.
    ///
    /// Output is discarded; the child handle is kept so playback can be
    /// superseded by killing it.
    pub fn spawn(&self, clip_path: &Path) -> Result<Child> {
        Command::new(self.spec.command)
            .args(self.spec.args)
            .arg(clip_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context(format!(
                "Failed to start audio player '{}'",
                self.spec.command
            ))
    }
}

/// Checks whether a command can be executed at all.
///
/// The exit status does not matter; only a spawn failure (command not
/// found) counts as absent.
fn command_exists(command: &str) -> bool {
    Command::new(command)
        .arg("--help")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .is_ok()
}

/// Lists the candidate player commands, for error messages.
#[must_use]
pub fn candidate_names() -> Vec<&'static str> {
    PLAYER_SPECS.iter().map(|spec| spec.command).collect()
}
