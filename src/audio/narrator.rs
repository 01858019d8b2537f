//! Background narration playback worker.
//!
//! Playback runs on a dedicated worker thread fed through a message
//! channel, reporting status back through a second channel that the UI
//! loop drains each tick. A new request always supersedes the current
//! clip: the worker drains its inbox to the most recent index and kills
//! the running player process before starting the next one.

use anyhow::{Context, Result};
use std::fs;
use std::process::Child;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::client::AudioClient;
use super::player::{candidate_names, Player};

/// Playback status messages sent from the worker to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A clip started playing.
    Started {
        /// Clip index.
        index: usize,
    },
    /// The current clip finished normally.
    Finished {
        /// Clip index.
        index: usize,
    },
    /// Fetching or playing a clip failed.
    Failed {
        /// Clip index.
        index: usize,
        /// Human-readable failure reason.
        reason: String,
    },
}

/// Commands sent to the worker thread.
enum WorkerCommand {
    Play { index: usize },
    Shutdown,
}

/// Owner of the playback worker thread.
pub struct Narrator {
    commands: Sender<WorkerCommand>,
    events: Receiver<PlaybackEvent>,
    playing: bool,
    handle: Option<JoinHandle<()>>,
}

impl Narrator {
    /// Spawns the worker thread.
    ///
    /// Player detection happens once here; if no player is installed
    /// every request fails with a reason naming the candidates.
    #[must_use]
    pub fn spawn(client: AudioClient) -> Self {
        let (command_tx, command_rx) = channel();
        let (event_tx, event_rx) = channel();

        let player = Player::detect();
        let handle = thread::spawn(move || run_worker(&client, player, &command_rx, &event_tx));

        Self {
            commands: command_tx,
            events: event_rx,
            playing: false,
            handle: Some(handle),
        }
    }

    /// Requests playback of a clip, superseding the current one.
    ///
    /// Fire-and-forget: a dead worker just means no narration.
    pub fn play(&self, index: usize) {
        let _ = self.commands.send(WorkerCommand::Play { index });
    }

    /// Drains one pending playback event, updating the playing flag.
    pub fn poll(&mut self) -> Option<PlaybackEvent> {
        let event = self.events.try_recv().ok()?;
        self.playing = matches!(event, PlaybackEvent::Started { .. });
        Some(event)
    }

    /// True while a clip is playing.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Drop for Narrator {
    fn drop(&mut self) {
        let _ = self.commands.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Worker loop: waits for requests, polls the running player for exit.
fn run_worker(
    client: &AudioClient,
    player: Option<Player>,
    commands: &Receiver<WorkerCommand>,
    events: &Sender<PlaybackEvent>,
) {
    let mut current: Option<(usize, Child)> = None;

    loop {
        match commands.recv_timeout(Duration::from_millis(100)) {
            Ok(WorkerCommand::Play { index }) => {
                // Drain to the most recent request; older ones are stale.
                let mut index = index;
                let mut shutdown = false;
                while let Ok(command) = commands.try_recv() {
                    match command {
                        WorkerCommand::Play { index: newer } => index = newer,
                        WorkerCommand::Shutdown => shutdown = true,
                    }
                }

                stop_current(&mut current);
                if shutdown {
                    return;
                }

                match start_clip(client, player, index) {
                    Ok(child) => {
                        let _ = events.send(PlaybackEvent::Started { index });
                        current = Some((index, child));
                    }
                    Err(err) => {
                        let _ = events.send(PlaybackEvent::Failed {
                            index,
                            reason: err.to_string(),
                        });
                    }
                }
            }
            Ok(WorkerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                stop_current(&mut current);
                return;
            }
            Err(RecvTimeoutError::Timeout) => {
                let mut completion = None;
                if let Some((index, child)) = &mut current {
                    let index = *index;
                    match child.try_wait() {
                        Ok(Some(status)) if status.success() => {
                            completion = Some(PlaybackEvent::Finished { index });
                        }
                        Ok(Some(status)) => {
                            completion = Some(PlaybackEvent::Failed {
                                index,
                                reason: format!("Audio player exited with {status}"),
                            });
                        }
                        Ok(None) => {}
                        Err(err) => {
                            completion = Some(PlaybackEvent::Failed {
                                index,
                                reason: format!("Failed to poll audio player: {err}"),
                            });
                        }
                    }
                }
                if let Some(event) = completion {
                    let _ = events.send(event);
                    current = None;
                }
            }
        }
    }
}

/// Kills and reaps the running player, if any.
fn stop_current(current: &mut Option<(usize, Child)>) {
    if let Some((_, mut child)) = current.take() {
        let _ = child.kill();
        let _ = child.wait();
    }
}

/// Fetches a clip and starts playback.
fn start_clip(client: &AudioClient, player: Option<Player>, index: usize) -> Result<Child> {
    let player = player.with_context(|| {
        format!(
            "No audio player found (tried {})",
            candidate_names().join(", ")
        )
    })?;

    let bytes = client.fetch_clip(index)?;

    let clip_path = std::env::temp_dir().join(format!("planoguia_clip_{index}.mp3"));
    fs::write(&clip_path, &bytes).context(format!(
        "Failed to write clip file: {}",
        clip_path.display()
    ))?;

    player.spawn(&clip_path)
}
