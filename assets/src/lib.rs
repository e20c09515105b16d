#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Asset resolution with per-kind fallback chains.
//!
//! Every [`LogicalAsset`] maps onto exactly one [`AssetKind`], and each kind
//! owns one fallback chain. Resolution never fails outward: models fall back
//! to a procedural placeholder, textures to a painted face, and audio to an
//! absent marker that callers replace with procedural sound.

use std::{
    collections::BTreeMap,
    path::Path,
    sync::mpsc,
    thread,
};

use image::RgbaImage;
use tracing::{debug, info, warn};

mod error;
mod manifest;
pub mod placeholder;
mod source;
pub mod synth;

pub use error::AssetError;
pub use manifest::AssetManifest;
pub use placeholder::PlaceholderModel;
pub use source::{AssetSource, FileSource};

/// Broad category of an asset, each with its own fallback chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// 3D model container.
    Model,
    /// Raster image.
    Texture,
    /// Encoded audio clip.
    Audio,
}

impl AssetKind {
    /// Detects the kind of a path from its extension.
    #[must_use]
    pub fn infer(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "jpg" | "jpeg" | "png" | "gif" => Some(Self::Texture),
            "mp3" | "wav" | "ogg" => Some(Self::Audio),
            "gltf" | "glb" | "fbx" => Some(Self::Model),
            _ => None,
        }
    }
}

/// Sounds the presentation layer can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SoundCue {
    /// Trigger pull.
    Gunfire,
    /// Enemy death.
    EnemyDeath,
    /// Magazine refilled.
    Reload,
    /// Active weapon changed.
    WeaponSwitch,
    /// Background music.
    Ambient,
}

/// Assets the game asks for by meaning rather than by path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogicalAsset {
    /// First-person weapon model.
    WeaponModel,
    /// Texture applied to enemy faces.
    EnemyFace,
    /// Audio clip for a cue.
    Sound(SoundCue),
}

impl LogicalAsset {
    /// Every asset resolved during loading.
    pub const ALL: [Self; 7] = [
        Self::WeaponModel,
        Self::EnemyFace,
        Self::Sound(SoundCue::Gunfire),
        Self::Sound(SoundCue::EnemyDeath),
        Self::Sound(SoundCue::Reload),
        Self::Sound(SoundCue::WeaponSwitch),
        Self::Sound(SoundCue::Ambient),
    ];

    /// Kind whose fallback chain resolves this asset.
    #[must_use]
    pub const fn kind(self) -> AssetKind {
        match self {
            Self::WeaponModel => AssetKind::Model,
            Self::EnemyFace => AssetKind::Texture,
            Self::Sound(_) => AssetKind::Audio,
        }
    }
}

/// Container formats recognised by the model sniffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFormat {
    /// JSON glTF document.
    Gltf,
    /// Binary glTF.
    Glb,
    /// Autodesk FBX, binary or ASCII.
    Fbx,
}

impl ModelFormat {
    fn sniff(bytes: &[u8]) -> Option<Self> {
        const GLB_MAGIC: &[u8] = b"glTF";
        const FBX_BINARY: &[u8] = b"Kaydara FBX Binary";
        const FBX_ASCII: &[u8] = b"; FBX";

        if bytes.starts_with(GLB_MAGIC) {
            return Some(Self::Glb);
        }
        if bytes.starts_with(FBX_BINARY) || bytes.starts_with(FBX_ASCII) {
            return Some(Self::Fbx);
        }
        let text = std::str::from_utf8(bytes).ok()?;
        (text.trim_start().starts_with('{') && text.contains("\"asset\"")).then_some(Self::Gltf)
    }
}

/// Weapon model, either loaded or assembled from primitives.
#[derive(Clone, Debug, PartialEq)]
pub enum Model {
    /// Raw container bytes that passed the format sniff.
    Loaded {
        /// Detected container format.
        format: ModelFormat,
        /// File contents.
        bytes: Vec<u8>,
    },
    /// Procedural stand-in.
    Placeholder(PlaceholderModel),
}

/// Decoded RGBA texture and whether it is the procedural stand-in.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    /// Decoded pixels.
    pub image: RgbaImage,
    /// Set when the face was painted procedurally.
    pub placeholder: bool,
}

/// Encoded audio clip as read from the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioClip {
    /// Encoded bytes handed to the audio backend untouched.
    pub bytes: Vec<u8>,
}

/// Outcome of resolving one logical asset.
#[derive(Clone, Debug, PartialEq)]
pub enum Resource {
    /// Result of the model chain.
    Model(Model),
    /// Result of the texture chain.
    Texture(Texture),
    /// Result of the audio chain; `None` marks an absent clip.
    Audio(Option<AudioClip>),
}

/// Everything produced by [`AssetPipeline::load_all`].
#[derive(Clone, Debug, PartialEq)]
pub struct AssetBundle {
    /// Weapon model or its placeholder.
    pub weapon_model: Model,
    /// Enemy face texture or its placeholder.
    pub enemy_face: Texture,
    sounds: BTreeMap<SoundCue, AudioClip>,
}

impl AssetBundle {
    /// Loaded clip for a cue, if one was found.
    #[must_use]
    pub fn sound(&self, cue: SoundCue) -> Option<&AudioClip> {
        self.sounds.get(&cue)
    }
}

/// Resolves logical assets through a source and manifest.
#[derive(Debug)]
pub struct AssetPipeline<S> {
    source: S,
    manifest: AssetManifest,
}

impl<S: AssetSource> AssetPipeline<S> {
    /// Creates a pipeline reading the manifest's paths from `source`.
    #[must_use]
    pub fn new(source: S, manifest: AssetManifest) -> Self {
        for asset in manifest.mismatched() {
            warn!(?asset, path = %manifest.path(asset).display(), "asset path does not match its kind");
        }
        Self { source, manifest }
    }

    /// Collaborator the pipeline reads from.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolves one logical asset through the chain for its kind.
    #[must_use]
    pub fn resolve(&self, asset: LogicalAsset) -> Resource {
        let path = self.manifest.path(asset);
        match asset.kind() {
            AssetKind::Model => Resource::Model(self.resolve_model(path)),
            AssetKind::Texture => Resource::Texture(self.resolve_texture(path)),
            AssetKind::Audio => Resource::Audio(self.resolve_audio(path)),
        }
    }

    fn resolve_model(&self, primary: &Path) -> Model {
        let secondary = primary.with_extension("fbx");
        let mut tiers = vec![primary];
        if secondary.as_path() != primary {
            tiers.push(secondary.as_path());
        }

        for path in tiers {
            match self.fetch_model(path) {
                Ok(model) => {
                    debug!(path = %path.display(), "model loaded");
                    return model;
                }
                Err(error) => warn!(%error, "model tier failed"),
            }
        }
        info!("using placeholder weapon model");
        Model::Placeholder(PlaceholderModel::weapon())
    }

    fn fetch_model(&self, path: &Path) -> Result<Model, AssetError> {
        let bytes = self.source.fetch(path)?;
        let format = ModelFormat::sniff(&bytes).ok_or_else(|| AssetError::Malformed {
            path: path.to_path_buf(),
            expected: "model",
        })?;
        Ok(Model::Loaded { format, bytes })
    }

    fn resolve_texture(&self, path: &Path) -> Texture {
        let decoded = self
            .source
            .fetch(path)
            .and_then(|bytes| Ok(image::load_from_memory(&bytes)?.to_rgba8()));
        match decoded {
            Ok(image) => {
                debug!(path = %path.display(), width = image.width(), "texture loaded");
                Texture {
                    image,
                    placeholder: false,
                }
            }
            Err(error) => {
                warn!(%error, "texture unavailable, painting placeholder");
                Texture {
                    image: placeholder::face_texture(),
                    placeholder: true,
                }
            }
        }
    }

    fn resolve_audio(&self, path: &Path) -> Option<AudioClip> {
        let fetched = self.source.fetch(path).and_then(|bytes| {
            if bytes.is_empty() {
                Err(AssetError::Malformed {
                    path: path.to_path_buf(),
                    expected: "audio",
                })
            } else {
                Ok(bytes)
            }
        });
        match fetched {
            Ok(bytes) => Some(AudioClip { bytes }),
            Err(error) => {
                warn!(%error, "audio clip unavailable");
                None
            }
        }
    }
}

impl<S: AssetSource + Sync> AssetPipeline<S> {
    /// Resolves every logical asset concurrently.
    ///
    /// `progress` receives the settled percentage after each resolution and
    /// reaches 100 once every asset has either loaded or fallen back.
    pub fn load_all(&self, mut progress: impl FnMut(u8)) -> AssetBundle {
        let total = LogicalAsset::ALL.len();
        let mut weapon_model = None;
        let mut enemy_face = None;
        let mut sounds = BTreeMap::new();

        thread::scope(|scope| {
            let (sender, receiver) = mpsc::channel();
            for asset in LogicalAsset::ALL {
                let sender = sender.clone();
                let _ = scope.spawn(move || {
                    // The receiver outlives every worker inside the scope.
                    let _ = sender.send((asset, self.resolve(asset)));
                });
            }
            drop(sender);

            for (settled, (asset, resource)) in receiver.iter().enumerate() {
                match (asset, resource) {
                    (LogicalAsset::WeaponModel, Resource::Model(model)) => weapon_model = Some(model),
                    (LogicalAsset::EnemyFace, Resource::Texture(texture)) => enemy_face = Some(texture),
                    (LogicalAsset::Sound(cue), Resource::Audio(Some(clip))) => {
                        let _ = sounds.insert(cue, clip);
                    }
                    (LogicalAsset::Sound(_), Resource::Audio(None)) => {}
                    (asset, _) => warn!(?asset, "resolved resource does not match asset kind"),
                }
                let percent = (settled + 1) * 100 / total;
                progress(u8::try_from(percent).unwrap_or(100));
            }
        });

        info!(clips = sounds.len(), "asset loading settled");
        AssetBundle {
            weapon_model: weapon_model
                .unwrap_or_else(|| Model::Placeholder(PlaceholderModel::weapon())),
            enemy_face: enemy_face.unwrap_or_else(|| Texture {
                image: placeholder::face_texture(),
                placeholder: true,
            }),
            sounds,
        }
    }
}
