//! Zombie model asset: glTF/GLB bounds for feet-to-floor fitting.
//!
//! Only the geometry extent matters to the simulation. Meshes, skins and
//! animation clips stay with the presentation layer.

use glam::{Mat4, Vec3};
use std::path::Path;

/// Failure to load a model asset.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load glTF file: {0}")]
    Load(#[from] gltf::Error),

    #[error("model has no mesh positions")]
    NoGeometry,
}

/// Extent of a loaded model in its own (unscaled) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZombieModel {
    pub min_y: f32,
    pub max_y: f32,
    pub animation_count: usize,
}

impl ZombieModel {
    /// Import `path` and measure the world-space bounding box of every mesh
    /// primitive reachable from the scenes, with node transforms applied.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let (document, buffers, _images) = gltf::import(path)?;

        let mut bounds: Option<(f32, f32)> = None;
        for scene in document.scenes() {
            for node in scene.nodes() {
                visit_node(&node, Mat4::IDENTITY, &buffers, &mut bounds);
            }
        }

        let (min_y, max_y) = bounds.ok_or(AssetError::NoGeometry)?;
        let model = Self {
            min_y,
            max_y,
            animation_count: document.animations().count(),
        };
        log::info!(
            "Loaded zombie model {:?}: height {:.3}, {} animations",
            path,
            model.height(),
            model.animation_count
        );
        Ok(model)
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Uniform scale and vertical offset that make the model `target` units
    /// tall with its lowest point on y = 0.
    pub fn fit_to_height(&self, target: f32) -> (f32, f32) {
        let scale = target / self.height().max(0.01);
        (scale, -self.min_y * scale)
    }
}

fn visit_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    bounds: &mut Option<(f32, f32)>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|b| buffers.get(b.index()).map(|d| &d.0[..]));
            if let Some(positions) = reader.read_positions() {
                for p in positions {
                    let y = world.transform_point3(Vec3::from(p)).y;
                    *bounds = Some(match *bounds {
                        Some((lo, hi)) => (lo.min(y), hi.max(y)),
                        None => (y, y),
                    });
                }
            }
        }
    }

    for child in node.children() {
        visit_node(&child, world, buffers, bounds);
    }
}

/// Which body the horde spawns.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelStatus {
    /// No model configured; zombies use the built-in body.
    Procedural,
    Ready(ZombieModel),
    /// Loading failed. Spawning is disabled for the rest of the session.
    Failed(String),
}

impl ModelStatus {
    /// Resolve the configured asset, if any. Never fails: errors become
    /// [`ModelStatus::Failed`].
    pub fn resolve(path: Option<&Path>) -> Self {
        match path {
            None => ModelStatus::Procedural,
            Some(path) => match ZombieModel::load(path) {
                Ok(model) => ModelStatus::Ready(model),
                Err(e) => {
                    log::warn!("Zombie model {:?} unavailable: {}", path, e);
                    ModelStatus::Failed(format!("Could not load zombie model {}: {}", path.display(), e))
                }
            },
        }
    }

    /// Scale and ground offset for a zombie of `target` height, or `None`
    /// when spawning is disabled.
    pub fn fit(&self, target: f32, procedural_height: f32) -> Option<(f32, f32)> {
        match self {
            ModelStatus::Procedural => Some((target / procedural_height, 0.0)),
            ModelStatus::Ready(model) => Some(model.fit_to_height(target)),
            ModelStatus::Failed(_) => None,
        }
    }

    pub fn can_spawn(&self) -> bool {
        !matches!(self, ModelStatus::Failed(_))
    }

    /// Text for the status line.
    pub fn message(&self) -> String {
        match self {
            ModelStatus::Procedural => "Using procedural zombies".to_string(),
            ModelStatus::Ready(model) => {
                format!("Zombie model ready ({} animations)", model.animation_count)
            }
            ModelStatus::Failed(msg) => msg.clone(),
        }
    }
}
