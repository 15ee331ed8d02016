/// Side-effect events emitted by the core.
///
/// The core never plays sound or draws.  It pushes `GameEvent`s into an
/// `EventSink`; the host decides what to do with them.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player shot spawned.
    Fire,
    /// Enemy shot spawned.
    EnemyFire,
    EnemyDestroyed,
    PlayerHit { lives_left: u32 },
    WaveCleared { new_level: u32 },
    SessionStart,
    SessionEnd { final_score: u32 },
}

/// The four cues an audio collaborator understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    Fire,
    EnemyDestroyed,
    /// Start the looping session music.
    SessionStart,
    /// Stop the music and play the end jingle.
    SessionEnd,
}

impl GameEvent {
    pub fn audio_cue(&self) -> Option<AudioCue> {
        match self {
            GameEvent::Fire => Some(AudioCue::Fire),
            GameEvent::EnemyDestroyed => Some(AudioCue::EnemyDestroyed),
            GameEvent::SessionStart => Some(AudioCue::SessionStart),
            GameEvent::SessionEnd { .. } => Some(AudioCue::SessionEnd),
            GameEvent::EnemyFire | GameEvent::PlayerHit { .. } | GameEvent::WaveCleared { .. } => {
                None
            }
        }
    }
}

pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}
