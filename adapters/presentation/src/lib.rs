#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation contracts for Asylum adapters.
//!
//! Adapters implement [`SceneBackend`], [`AudioBackend`] and [`HudSink`]; the
//! [`Presenter`] consumes the world's event stream each frame and translates
//! it into visuals, sounds, HUD updates and short-lived cosmetic effects.

use std::{
    collections::{BTreeMap, BTreeSet},
    f32::consts::FRAC_PI_2,
    time::Duration,
};

use asylum_assets::{
    synth::{NoiseBed, Pcm, ToneSweep},
    AssetBundle, AudioClip, Model, SoundCue, Texture,
};
use asylum_core::{EnemyKind, EnemySnapshot, EntityId, Event, GamePhase, PickupKind, Tint};
use asylum_world::{query, World};
use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

mod effects;

use effects::{Effect, EffectTimeline};

/// Sample rate used for procedurally rendered sounds.
pub const SAMPLE_RATE: u32 = 44_100;

const AMBIENT_VOLUME: f32 = 0.15;
const WIND_VOLUME: f32 = 0.2;
const WIND_SEED: u64 = 0x0057_1ad0;

const MUZZLE_FLASH: Duration = Duration::from_millis(100);
const FIRE_SHAKE: (f32, Duration) = (0.1, Duration::from_millis(100));
const DAMAGE_FLASH: (Color, Duration) = (Color::new(1.0, 0.0, 0.0, 0.3), Duration::from_millis(200));
const SCARE_FLASH: (Color, Duration) = (Color::new(1.0, 1.0, 1.0, 1.0), Duration::from_millis(50));
const SCARE_SHAKE: (f32, Duration) = (0.3, Duration::from_millis(300));

/// RGBA color used for overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from a packed tint.
    #[must_use]
    pub fn from_tint(tint: Tint) -> Self {
        let (red, green, blue) = tint.channels();
        Self::new(
            f32::from(red) / 255.0,
            f32::from(green) / 255.0,
            f32::from(blue) / 255.0,
            1.0,
        )
    }
}

/// Identifier of a visual owned by the scene backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(u32);

impl VisualHandle {
    /// Wraps a backend-assigned identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the backend-assigned identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a playing sound owned by the audio backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundHandle(u32);

impl SoundHandle {
    /// Wraps a backend-assigned identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the backend-assigned identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Description of a visual the scene backend should create.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VisualKind<'a> {
    /// First-person weapon attached to the camera.
    Weapon(&'a Model),
    /// Hostile actor, textured once the face is loaded.
    Enemy {
        /// Variant of the actor.
        kind: EnemyKind,
        /// Face texture when available.
        face: Option<&'a Texture>,
    },
    /// Glowing projectile.
    Projectile {
        /// Colour of the firing weapon.
        tint: Tint,
    },
    /// Floating collectible.
    Pickup {
        /// Kind of collectible.
        kind: PickupKind,
    },
}

/// Placement of a visual in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Opacity in the range 0.0..=1.0.
    pub opacity: f32,
}

impl Transform {
    /// Opaque, unrotated transform at `position`.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            opacity: 1.0,
        }
    }
}

/// Full-screen feedback drawn above the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Overlay {
    /// Whether the muzzle flash sprite is visible.
    pub muzzle_flash: bool,
    /// Screen tint covering the whole view.
    pub flash: Option<Color>,
}

/// Audio payload handed to the audio backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sound<'a> {
    /// Encoded clip loaded from the asset source.
    Clip(&'a AudioClip),
    /// Procedurally rendered samples.
    Synth(&'a Pcm),
}

/// Scene graph collaborator.
pub trait SceneBackend {
    /// Creates a visual and returns its handle.
    fn create_visual(&mut self, kind: VisualKind<'_>) -> VisualHandle;
    /// Moves, rotates or fades an existing visual.
    fn set_transform(&mut self, handle: VisualHandle, transform: Transform);
    /// Removes a visual from the scene.
    fn remove_visual(&mut self, handle: VisualHandle);
    /// Places the camera.
    fn set_camera(&mut self, position: Vec3);
    /// Replaces the full-screen overlay.
    fn set_overlay(&mut self, overlay: Overlay);
    /// Releases pointer capture so menu interaction is possible.
    fn release_pointer(&mut self);
}

/// Audio playback collaborator.
pub trait AudioBackend {
    /// Starts playing a sound and returns its handle.
    fn play_sound(&mut self, sound: Sound<'_>, volume: f32, looped: bool) -> SoundHandle;
    /// Stops a sound if it is still playing.
    fn stop_sound(&mut self, handle: SoundHandle);
}

/// Heads-up display collaborator.
pub trait HudSink {
    /// Player health as a percentage of the maximum.
    fn on_health_changed(&mut self, percent: u32);
    /// Active weapon label such as `Pistol: 14/15`.
    fn on_ammo_changed(&mut self, label: &str);
    /// The run ended.
    fn on_game_over(&mut self);
    /// A run started.
    fn on_game_started(&mut self);
    /// Share of assets settled so far.
    fn on_loading_progress(&mut self, percent: u8);
}

/// Health as a whole percentage of `max`, exact for any `u32` maximum.
fn health_percent(health: u32, max: u32) -> u32 {
    let percent = u64::from(health) * 100 / u64::from(max.max(1));
    u32::try_from(percent).unwrap_or(u32::MAX)
}

/// Playback volume and lifetime of a one-shot cue.
const fn cue_profile(cue: SoundCue) -> (f32, Duration) {
    match cue {
        SoundCue::Gunfire => (0.8, Duration::from_millis(2000)),
        SoundCue::EnemyDeath => (0.85, Duration::from_millis(3000)),
        SoundCue::Reload => (0.7, Duration::from_millis(3000)),
        SoundCue::WeaponSwitch => (0.6, Duration::from_millis(3000)),
        SoundCue::Ambient => (AMBIENT_VOLUME, Duration::MAX),
    }
}

/// Translates world events into calls on the presentation collaborators.
#[derive(Debug)]
pub struct Presenter<S, A, H> {
    scene: S,
    audio: A,
    hud: H,
    assets: Option<AssetBundle>,
    substitutes: BTreeMap<SoundCue, Pcm>,
    wind: Pcm,
    visuals: BTreeMap<EntityId, VisualHandle>,
    weapon: Option<VisualHandle>,
    effects: EffectTimeline,
    overlay: Overlay,
    one_shots: Vec<(SoundHandle, Duration)>,
    ambient: Option<SoundHandle>,
    wind_loop: Option<SoundHandle>,
    playing: bool,
    shake_rng: ChaCha8Rng,
}

impl<S, A, H> Presenter<S, A, H>
where
    S: SceneBackend,
    A: AudioBackend,
    H: HudSink,
{
    /// Creates a presenter driving the provided collaborators.
    #[must_use]
    pub fn new(scene: S, audio: A, hud: H, shake_seed: u64) -> Self {
        let substitutes = [SoundCue::Gunfire, SoundCue::EnemyDeath]
            .into_iter()
            .filter_map(|cue| ToneSweep::for_cue(cue).map(|sweep| (cue, sweep.render(SAMPLE_RATE))))
            .collect();
        Self {
            scene,
            audio,
            hud,
            assets: None,
            substitutes,
            wind: NoiseBed::WIND.render(SAMPLE_RATE, WIND_SEED),
            visuals: BTreeMap::new(),
            weapon: None,
            effects: EffectTimeline::default(),
            overlay: Overlay::default(),
            one_shots: Vec::new(),
            ambient: None,
            wind_loop: None,
            playing: false,
            shake_rng: ChaCha8Rng::seed_from_u64(shake_seed),
        }
    }

    /// Scene collaborator.
    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Audio collaborator.
    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// HUD collaborator.
    #[must_use]
    pub fn hud(&self) -> &H {
        &self.hud
    }

    /// Forwards asset loading progress to the HUD.
    pub fn loading_progress(&mut self, percent: u8) {
        self.hud.on_loading_progress(percent);
    }

    /// Installs loaded assets, possibly after gameplay already began.
    pub fn install_assets(&mut self, bundle: AssetBundle) {
        if let Some(previous) = self.weapon.take() {
            self.scene.remove_visual(previous);
        }
        self.weapon = Some(self.scene.create_visual(VisualKind::Weapon(&bundle.weapon_model)));
        self.assets = Some(bundle);

        if self.wind_loop.is_none() {
            self.wind_loop = Some(self.audio.play_sound(Sound::Synth(&self.wind), WIND_VOLUME, true));
        }
        if self.playing {
            self.start_ambient();
        }
        info!(playing = self.playing, "assets installed");
    }

    /// Applies one frame of events and resynchronises every visual.
    pub fn present(&mut self, events: &[Event], world: &World) {
        let now = query::now(world);
        let despawned: BTreeSet<EntityId> = events
            .iter()
            .filter_map(|event| match event {
                Event::Despawned { entity } => Some(*entity),
                _ => None,
            })
            .collect();

        for event in events {
            self.apply_event(event, world, now, &despawned);
        }

        self.sync_transforms(world);
        self.effects.expire(now);
        self.update_camera(world);

        let overlay = Overlay {
            muzzle_flash: self.effects.muzzle_flash(),
            flash: self.effects.screen_flash(),
        };
        if overlay != self.overlay {
            self.overlay = overlay;
            self.scene.set_overlay(overlay);
        }

        let audio = &mut self.audio;
        self.one_shots.retain(|(handle, deadline)| {
            if *deadline <= now {
                audio.stop_sound(*handle);
                false
            } else {
                true
            }
        });
    }

    fn apply_event(
        &mut self,
        event: &Event,
        world: &World,
        now: Duration,
        despawned: &BTreeSet<EntityId>,
    ) {
        match *event {
            Event::PhaseChanged {
                to: GamePhase::Playing,
                ..
            } => {
                self.playing = true;
                self.hud.on_game_started();
                self.start_ambient();
            }
            Event::PhaseChanged {
                to: GamePhase::GameOver,
                ..
            } => {
                self.playing = false;
                self.hud.on_game_over();
                self.scene.release_pointer();
            }
            Event::ProjectileSpawned {
                projectile,
                position,
                tint,
                ..
            } => {
                let entity = EntityId::Projectile(projectile);
                self.spawn_visual(entity, VisualKind::Projectile { tint }, position, despawned);
            }
            Event::WeaponFired { .. } => {
                self.play_cue(SoundCue::Gunfire, now);
                self.effects.schedule(Effect::MuzzleFlash, now, MUZZLE_FLASH);
                self.effects.schedule(Effect::Shake(FIRE_SHAKE.0), now, FIRE_SHAKE.1);
            }
            Event::WeaponReloaded { .. } => self.play_cue(SoundCue::Reload, now),
            Event::WeaponSwitched { .. } => self.play_cue(SoundCue::WeaponSwitch, now),
            Event::AmmoChanged {
                slot,
                ammo,
                capacity,
            } => {
                if let Some(profile) = query::weapon_profile(world, slot) {
                    let label = format!("{}: {ammo}/{capacity}", profile.name);
                    self.hud.on_ammo_changed(&label);
                }
            }
            Event::HealthChanged { health, max } => {
                self.hud.on_health_changed(health_percent(health, max));
            }
            Event::PlayerDamaged { .. } => {
                self.effects
                    .schedule(Effect::ScreenFlash(DAMAGE_FLASH.0), now, DAMAGE_FLASH.1);
                self.effects.schedule(Effect::Shake(FIRE_SHAKE.0), now, FIRE_SHAKE.1);
            }
            Event::ScareTriggered { .. } => {
                debug!(?now, "scare presented");
                self.effects
                    .schedule(Effect::ScreenFlash(SCARE_FLASH.0), now, SCARE_FLASH.1);
                self.effects.schedule(Effect::Shake(SCARE_SHAKE.0), now, SCARE_SHAKE.1);
            }
            Event::EnemySpawned {
                enemy,
                kind,
                position,
            } => {
                let entity = EntityId::Enemy(enemy);
                if despawned.contains(&entity) {
                    trace!(enemy = enemy.get(), "enemy removed before it was presented");
                    return;
                }
                let face = self.assets.as_ref().map(|assets| &assets.enemy_face);
                let handle = self.scene.create_visual(VisualKind::Enemy { kind, face });
                self.scene.set_transform(handle, Transform::at(position));
                let _ = self.visuals.insert(entity, handle);
            }
            Event::EnemyKilled { .. } => self.play_cue(SoundCue::EnemyDeath, now),
            Event::PickupSpawned {
                pickup,
                kind,
                position,
            } => {
                let entity = EntityId::Pickup(pickup);
                self.spawn_visual(entity, VisualKind::Pickup { kind }, position, despawned);
            }
            Event::Despawned { entity } => {
                if let Some(handle) = self.visuals.remove(&entity) {
                    self.scene.remove_visual(handle);
                }
            }
            _ => {}
        }
    }

    fn spawn_visual(
        &mut self,
        entity: EntityId,
        kind: VisualKind<'_>,
        position: Vec3,
        despawned: &BTreeSet<EntityId>,
    ) {
        if despawned.contains(&entity) {
            return;
        }
        let handle = self.scene.create_visual(kind);
        self.scene.set_transform(handle, Transform::at(position));
        let _ = self.visuals.insert(entity, handle);
    }

    fn play_cue(&mut self, cue: SoundCue, now: Duration) {
        let (volume, lifetime) = cue_profile(cue);
        let clip = self.assets.as_ref().and_then(|assets| assets.sound(cue));
        let handle = match (clip, self.substitutes.get(&cue)) {
            (Some(clip), _) => self.audio.play_sound(Sound::Clip(clip), volume, false),
            (None, Some(pcm)) => self.audio.play_sound(Sound::Synth(pcm), 1.0, false),
            (None, None) => {
                trace!(?cue, "no clip loaded");
                return;
            }
        };
        self.one_shots.push((handle, now.saturating_add(lifetime)));
    }

    fn start_ambient(&mut self) {
        if self.ambient.is_some() {
            return;
        }
        let Some(clip) = self
            .assets
            .as_ref()
            .and_then(|assets| assets.sound(SoundCue::Ambient))
        else {
            return;
        };
        self.ambient = Some(self.audio.play_sound(Sound::Clip(clip), AMBIENT_VOLUME, true));
        debug!("ambient music started");
    }

    fn sync_transforms(&mut self, world: &World) {
        let animation = query::tuning(world).enemies.death_animation;
        for enemy in query::enemy_view(world).iter() {
            if let Some(handle) = self.visuals.get(&EntityId::Enemy(enemy.id)) {
                self.scene.set_transform(*handle, enemy_pose(enemy, animation));
            }
        }
        for projectile in query::projectile_view(world).iter() {
            if let Some(handle) = self.visuals.get(&EntityId::Projectile(projectile.id)) {
                self.scene
                    .set_transform(*handle, Transform::at(projectile.position));
            }
        }
        for pickup in query::pickup_view(world).iter() {
            if let Some(handle) = self.visuals.get(&EntityId::Pickup(pickup.id)) {
                self.scene.set_transform(
                    *handle,
                    Transform {
                        rotation: Quat::from_rotation_y(pickup.spin),
                        ..Transform::at(pickup.position)
                    },
                );
            }
        }
    }

    fn update_camera(&mut self, world: &World) {
        let mut position = query::player(world).position;
        let intensity = self.effects.shake();
        if intensity > 0.0 {
            let mut jitter = || (self.shake_rng.gen::<f32>() - 0.5) * intensity;
            position += Vec3::new(jitter(), jitter(), jitter());
        }
        self.scene.set_camera(position);
    }
}

/// Pose of an enemy, falling over and fading out while it dies.
#[must_use]
pub fn enemy_pose(enemy: &EnemySnapshot, animation: Duration) -> Transform {
    let heading = Quat::from_rotation_y(enemy.facing.x.atan2(enemy.facing.z));
    let Some(dying_for) = enemy.dying_for else {
        return Transform {
            rotation: heading,
            ..Transform::at(enemy.position)
        };
    };

    let progress = if animation.is_zero() {
        1.0
    } else {
        (dying_for.as_secs_f32() / animation.as_secs_f32()).min(1.0)
    };
    Transform {
        position: Vec3::new(
            enemy.position.x,
            enemy.position.y * (1.0 - progress),
            enemy.position.z,
        ),
        rotation: heading * Quat::from_rotation_x(progress * FRAC_PI_2),
        opacity: 1.0 - progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asylum_core::EnemyId;

    #[test]
    fn health_percent_survives_huge_maximums() {
        assert_eq!(health_percent(75, 100), 75);
        assert_eq!(health_percent(0, 0), 0);
        assert_eq!(health_percent(u32::MAX, u32::MAX), 100);
        assert_eq!(health_percent(50_000_000, 100_000_000), 50);
    }

    fn enemy(dying_for: Option<Duration>) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(1),
            kind: EnemyKind::Stalker,
            position: Vec3::new(4.0, 2.0, -3.0),
            facing: Vec3::Z,
            health: 0,
            contact_damage: 10,
            ready_to_attack: false,
            dying_for,
        }
    }

    #[test]
    fn living_enemies_stand_upright() {
        let pose = enemy_pose(&enemy(None), Duration::from_secs(1));
        assert_eq!(pose.position, Vec3::new(4.0, 2.0, -3.0));
        assert_eq!(pose.opacity, 1.0);
    }

    #[test]
    fn dying_enemies_fall_and_fade() {
        let halfway = enemy_pose(&enemy(Some(Duration::from_millis(500))), Duration::from_secs(1));
        assert!((halfway.position.y - 1.0).abs() < 1e-6);
        assert!((halfway.opacity - 0.5).abs() < 1e-6);

        let done = enemy_pose(&enemy(Some(Duration::from_millis(1500))), Duration::from_secs(1));
        assert_eq!(done.position.y, 0.0);
        assert_eq!(done.opacity, 0.0);
        let tipped = done.rotation * Vec3::Y;
        assert!(tipped.y.abs() < 1e-5);
    }

    #[test]
    fn tint_converts_to_opaque_color() {
        let color = Color::from_tint(Tint::from_hex(0xff_88_00));
        assert_eq!(color.red, 1.0);
        assert!((color.green - 136.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.blue, 0.0);
        assert_eq!(color.alpha, 1.0);
    }
}
