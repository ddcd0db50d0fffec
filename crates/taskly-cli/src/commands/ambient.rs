use std::io;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use clap::Subcommand;
use serde_json::json;
use taskly_core::{AmbientPlayer, AmbientSound, AudioBackend, Config};
use tracing::{debug, warn};

use super::{print_json, CmdResult};

/// How long a freshly spawned player must stay alive to count as playing.
const STARTUP_GRACE: Duration = Duration::from_millis(500);

#[derive(Subcommand)]
pub enum AmbientAction {
    /// List the ambient sounds and their sources
    List,
    /// Loop a sound in the foreground (Ctrl-C stops)
    Play {
        /// rain, ocean or fire
        sound: AmbientSound,
        /// Volume in percent for this run (defaults to ambient.volume)
        #[arg(long)]
        volume: Option<u8>,
        /// Player command (defaults to ambient.player)
        #[arg(long)]
        player: Option<String>,
        /// Stop after this many seconds
        #[arg(long)]
        duration: Option<u64>,
    },
    /// Set the stored ambient volume (clamped to 100)
    Volume { pct: u8 },
}

/// Loops one source through an external player process.
///
/// The player is invoked mpv-style and must keep running while it plays;
/// a process that fails to spawn or exits within [`STARTUP_GRACE`] counts
/// as a failed source.
pub struct PlayerProcess {
    program: String,
    child: Option<Child>,
    source: Option<String>,
}

impl PlayerProcess {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            child: None,
            source: None,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn spawn(&mut self, url: &str, volume: f32) -> io::Result<()> {
        let pct = (volume * 100.0).round() as u32;
        let mut child = Command::new(&self.program)
            .arg("--no-video")
            .arg("--loop=inf")
            .arg(format!("--volume={pct}"))
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", self.program)))?;

        std::thread::sleep(STARTUP_GRACE);
        match child.try_wait() {
            Ok(None) => {
                debug!(pid = child.id(), url, "player started");
                self.child = Some(child);
                self.source = Some(url.to_string());
                Ok(())
            }
            Ok(Some(status)) => Err(io::Error::other(format!(
                "{} exited early ({status})",
                self.program
            ))),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(e)
            }
        }
    }
}

impl AudioBackend for PlayerProcess {
    type Error = io::Error;

    fn play_loop(&mut self, url: &str, volume: f32) -> io::Result<()> {
        self.stop();
        self.spawn(url, volume)
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                debug!(error = %e, "player already gone");
            }
            let _ = child.wait();
        }
        self.source = None;
    }

    /// The volume is fixed per process, so the current source is restarted.
    fn set_volume(&mut self, volume: f32) {
        let Some(url) = self.source.clone() else {
            return;
        };
        self.stop();
        if let Err(e) = self.spawn(&url, volume) {
            warn!(url, error = %e, "player restart failed");
        }
    }
}

impl Drop for PlayerProcess {
    fn drop(&mut self) {
        self.stop();
    }
}

pub fn run(action: AmbientAction) -> CmdResult {
    match action {
        AmbientAction::List => {
            let config = Config::load()?;
            let sounds: Vec<_> = AmbientSound::ALL
                .iter()
                .map(|s| {
                    json!({
                        "id": s.to_string(),
                        "name": s.name(),
                        "emoji": s.emoji(),
                        "sources": s.urls(),
                    })
                })
                .collect();
            print_json(&json!({
                "volume": config.ambient.volume,
                "player": config.ambient.player,
                "sounds": sounds,
            }))
        }
        AmbientAction::Play {
            sound,
            volume,
            player,
            duration,
        } => {
            let config = Config::load()?;
            let program = player.unwrap_or(config.ambient.player);
            let volume = volume.unwrap_or(config.ambient.volume);
            play_foreground(PlayerProcess::new(program), sound, volume, duration)
        }
        AmbientAction::Volume { pct } => {
            let mut config = Config::load()?;
            config.ambient.volume = pct.min(100);
            config.save()?;
            print_json(&json!({ "volume": config.ambient.volume }))
        }
    }
}

fn play_foreground(
    backend: PlayerProcess,
    sound: AmbientSound,
    volume: u8,
    duration: Option<u64>,
) -> CmdResult {
    let mut player = AmbientPlayer::new(backend, volume);
    player.play(sound)?;
    println!(
        "{}",
        json!({
            "playing": sound,
            "volume": player.volume_pct(),
            "source": player.backend().source(),
        })
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()?;
    runtime.block_on(async {
        match duration {
            Some(secs) => tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => Ok(()),
                res = tokio::signal::ctrl_c() => res,
            },
            None => tokio::signal::ctrl_c().await,
        }
    })?;

    player.stop();
    println!("{}", json!({ "stopped": sound }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_player_fails_every_source() {
        let mut player = AmbientPlayer::new(PlayerProcess::new("/nonexistent/taskly-player"), 50);
        assert!(player.play(AmbientSound::Fire).is_err());
        assert!(player.current().is_none());
        assert!(player.backend().source().is_none());
    }

    #[test]
    fn set_volume_without_source_is_a_no_op() {
        let mut backend = PlayerProcess::new("/nonexistent/taskly-player");
        backend.set_volume(0.3);
        assert!(backend.child.is_none());
    }
}
