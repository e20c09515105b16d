//! Headless collaborators that log what a graphical frontend would draw or play.

use std::collections::BTreeSet;

use asylum_presentation::{
    AudioBackend, HudSink, Overlay, SceneBackend, Sound, SoundHandle, Transform, VisualHandle,
    VisualKind,
};
use glam::Vec3;
use tracing::{debug, info, trace};

/// Scene that tracks live visual handles.
#[derive(Debug, Default)]
pub(crate) struct LoggingScene {
    next: u32,
    live: BTreeSet<VisualHandle>,
}

impl LoggingScene {
    /// Visuals created and not yet removed.
    pub(crate) fn live_visuals(&self) -> usize {
        self.live.len()
    }
}

impl SceneBackend for LoggingScene {
    fn create_visual(&mut self, kind: VisualKind<'_>) -> VisualHandle {
        let handle = VisualHandle::new(self.next);
        self.next += 1;
        let _ = self.live.insert(handle);
        match kind {
            VisualKind::Weapon(_) => debug!(handle = handle.get(), "weapon visual created"),
            VisualKind::Enemy { kind, face } => debug!(
                handle = handle.get(),
                ?kind,
                textured = face.is_some_and(|face| !face.placeholder),
                "enemy visual created"
            ),
            VisualKind::Projectile { .. } => {
                trace!(handle = handle.get(), "projectile visual created");
            }
            VisualKind::Pickup { kind } => debug!(handle = handle.get(), ?kind, "pickup visual created"),
        }
        handle
    }

    fn set_transform(&mut self, handle: VisualHandle, transform: Transform) {
        trace!(handle = handle.get(), position = ?transform.position, opacity = transform.opacity);
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        let _ = self.live.remove(&handle);
        trace!(handle = handle.get(), "visual removed");
    }

    fn set_camera(&mut self, position: Vec3) {
        trace!(?position, "camera");
    }

    fn set_overlay(&mut self, overlay: Overlay) {
        debug!(muzzle_flash = overlay.muzzle_flash, flash = ?overlay.flash, "overlay");
    }

    fn release_pointer(&mut self) {
        info!("pointer released");
    }
}

/// Audio device that only counts what it was asked to play.
#[derive(Debug, Default)]
pub(crate) struct LoggingAudio {
    next: u32,
    playing: BTreeSet<SoundHandle>,
}

impl AudioBackend for LoggingAudio {
    fn play_sound(&mut self, sound: Sound<'_>, volume: f32, looped: bool) -> SoundHandle {
        let handle = SoundHandle::new(self.next);
        self.next += 1;
        let _ = self.playing.insert(handle);
        match sound {
            Sound::Clip(clip) => debug!(
                handle = handle.get(),
                bytes = clip.bytes.len(),
                volume,
                looped,
                "clip started"
            ),
            Sound::Synth(pcm) => debug!(
                handle = handle.get(),
                duration = ?pcm.duration(),
                volume,
                looped,
                "synth started"
            ),
        }
        handle
    }

    fn stop_sound(&mut self, handle: SoundHandle) {
        if self.playing.remove(&handle) {
            trace!(handle = handle.get(), "sound stopped");
        }
    }
}

/// HUD that writes every update to the log.
#[derive(Debug, Default)]
pub(crate) struct LoggingHud {
    games_over: u32,
}

impl LoggingHud {
    /// Number of runs that ended so far.
    pub(crate) fn games_over(&self) -> u32 {
        self.games_over
    }
}

impl HudSink for LoggingHud {
    fn on_health_changed(&mut self, percent: u32) {
        info!("health {percent}%");
    }

    fn on_ammo_changed(&mut self, label: &str) {
        debug!("{label}");
    }

    fn on_game_over(&mut self) {
        self.games_over += 1;
        info!("game over");
    }

    fn on_game_started(&mut self) {
        info!("run started");
    }

    fn on_loading_progress(&mut self, percent: u8) {
        info!("Loading Nightmare... {percent}%");
    }
}
