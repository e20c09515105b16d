use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{LogicalAsset, SoundCue};

/// Table mapping every logical asset onto a path below the asset root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    /// Primary weapon model; the `.fbx` sibling is tried second.
    pub weapon_model: PathBuf,
    /// Texture applied to every enemy face.
    pub enemy_face: PathBuf,
    /// Clip played for each trigger pull.
    pub gunfire: PathBuf,
    /// Clip played when an enemy dies.
    pub enemy_death: PathBuf,
    /// Clip played after a successful reload.
    pub reload: PathBuf,
    /// Clip played when the active weapon changes.
    pub weapon_switch: PathBuf,
    /// Looped background music.
    pub ambient: PathBuf,
}

impl AssetManifest {
    /// Path registered for the provided logical asset.
    #[must_use]
    pub fn path(&self, asset: LogicalAsset) -> &PathBuf {
        match asset {
            LogicalAsset::WeaponModel => &self.weapon_model,
            LogicalAsset::EnemyFace => &self.enemy_face,
            LogicalAsset::Sound(SoundCue::Gunfire) => &self.gunfire,
            LogicalAsset::Sound(SoundCue::EnemyDeath) => &self.enemy_death,
            LogicalAsset::Sound(SoundCue::Reload) => &self.reload,
            LogicalAsset::Sound(SoundCue::WeaponSwitch) => &self.weapon_switch,
            LogicalAsset::Sound(SoundCue::Ambient) => &self.ambient,
        }
    }

    /// Logical assets whose configured path does not match their kind.
    #[must_use]
    pub fn mismatched(&self) -> Vec<LogicalAsset> {
        LogicalAsset::ALL
            .into_iter()
            .filter(|asset| crate::AssetKind::infer(self.path(*asset)) != Some(asset.kind()))
            .collect()
    }
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            weapon_model: PathBuf::from("models/gun.gltf"),
            enemy_face: PathBuf::from("models/enemies.jpg"),
            gunfire: PathBuf::from("audio/firing.mp3"),
            enemy_death: PathBuf::from("audio/enemy dies.mp3"),
            reload: PathBuf::from("audio/realoding.mp3"),
            weapon_switch: PathBuf::from("audio/gun switch.mp3"),
            ambient: PathBuf::from("audio/background sound.mp3"),
        }
    }
}
