//! Looping ambient background sounds.
//!
//! Only selection state lives here. Decoding and output belong to an
//! [`AudioBackend`]; each sound carries several source URLs that are tried
//! in order until one loads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CoreError, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientSound {
    Rain,
    Ocean,
    Fire,
}

impl AmbientSound {
    pub const ALL: [AmbientSound; 3] = [AmbientSound::Rain, AmbientSound::Ocean, AmbientSound::Fire];

    pub fn name(self) -> &'static str {
        match self {
            AmbientSound::Rain => "Rain",
            AmbientSound::Ocean => "Ocean",
            AmbientSound::Fire => "Fireplace",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            AmbientSound::Rain => "🌧️",
            AmbientSound::Ocean => "🌊",
            AmbientSound::Fire => "🔥",
        }
    }

    /// Candidate sources, most preferred first.
    pub fn urls(self) -> &'static [&'static str] {
        match self {
            AmbientSound::Rain => &[
                "https://assets.mixkit.co/active_storage/sfx/2515/2515-preview.mp3",
                "https://assets.mixkit.co/active_storage/sfx/2516/2516-preview.mp3",
            ],
            AmbientSound::Ocean => &[
                "https://assets.mixkit.co/active_storage/sfx/2431/2431-preview.mp3",
                "https://assets.mixkit.co/active_storage/sfx/2189/2189-preview.mp3",
            ],
            AmbientSound::Fire => &[
                "https://cdn.freesound.org/previews/157/157950_2552041-lq.mp3",
                "https://cdn.freesound.org/previews/351/351543_5121236-lq.mp3",
                "https://cdn.freesound.org/previews/558/558117_8676212-lq.mp3",
            ],
        }
    }
}

impl fmt::Display for AmbientSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AmbientSound::Rain => "rain",
            AmbientSound::Ocean => "ocean",
            AmbientSound::Fire => "fire",
        };
        f.write_str(s)
    }
}

impl FromStr for AmbientSound {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rain" => Ok(AmbientSound::Rain),
            "ocean" => Ok(AmbientSound::Ocean),
            "fire" => Ok(AmbientSound::Fire),
            other => Err(ValidationError::InvalidValue {
                field: "sound".into(),
                message: format!("unknown ambient sound '{other}'"),
            }),
        }
    }
}

/// Output device for looping audio.
pub trait AudioBackend {
    type Error: fmt::Display;

    /// Load `url` and start looping it at `volume` (0.0..=1.0).
    fn play_loop(&mut self, url: &str, volume: f32) -> Result<(), Self::Error>;
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
}

#[derive(Debug)]
pub struct AmbientPlayer<B: AudioBackend> {
    backend: B,
    current: Option<AmbientSound>,
    volume_pct: u8,
}

impl<B: AudioBackend> AmbientPlayer<B> {
    pub fn new(backend: B, volume_pct: u8) -> Self {
        Self {
            backend,
            current: None,
            volume_pct: volume_pct.min(100),
        }
    }

    pub fn current(&self) -> Option<AmbientSound> {
        self.current
    }

    pub fn volume_pct(&self) -> u8 {
        self.volume_pct
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn volume(&self) -> f32 {
        f32::from(self.volume_pct) / 100.0
    }

    /// Select `sound`. Selecting the playing sound again stops it.
    ///
    /// Returns the sound now playing.
    pub fn play(&mut self, sound: AmbientSound) -> Result<Option<AmbientSound>> {
        if self.current == Some(sound) {
            self.stop();
            return Ok(None);
        }
        self.stop();

        for url in sound.urls() {
            match self.backend.play_loop(url, self.volume()) {
                Ok(()) => {
                    info!(%sound, url, "ambient sound playing");
                    self.current = Some(sound);
                    return Ok(self.current);
                }
                Err(e) => warn!(%sound, url, error = %e, "ambient source failed"),
            }
        }

        self.stop();
        Err(CoreError::Playback {
            sound: sound.name().to_string(),
        })
    }

    pub fn stop(&mut self) {
        self.backend.stop();
        self.current = None;
    }

    /// Set volume in percent, clamped to 100.
    pub fn set_volume(&mut self, pct: u8) {
        self.volume_pct = pct.min(100);
        if self.current.is_some() {
            self.backend.set_volume(self.volume());
        }
    }
}
