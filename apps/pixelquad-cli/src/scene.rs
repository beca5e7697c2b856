use anyhow::{Context, bail};
use glam::Vec2;
use pixelquad_assets::SpriteSheet;
use pixelquad_common::{AtlasRegion, AtlasSize, SpriteInstance};
use pixelquad_transform::{Camera, TransformConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A scene file: config, camera, and the sprites to draw.
#[derive(Debug, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub config: TransformConfig,
    pub camera: Camera,
    /// Atlas dimensions, used when no atlas image is supplied.
    #[serde(default)]
    pub atlas_size: Option<AtlasSize>,
    /// Sprite sheet resolving `sprite` names, relative to the scene file.
    #[serde(default)]
    pub sheet: Option<PathBuf>,
    pub instances: Vec<SceneInstance>,
}

/// One sprite: either an explicit normalized region or a sheet name.
#[derive(Debug, Deserialize)]
pub struct SceneInstance {
    pub center: Vec2,
    #[serde(default)]
    pub layer: f32,
    #[serde(default)]
    pub region: Option<AtlasRegion>,
    #[serde(default)]
    pub sprite: Option<String>,
}

impl Scene {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path).with_context(|| format!("opening scene {}", path.display()))?;
        let mut scene: Scene =
            serde_json::from_reader(file).with_context(|| format!("parsing scene {}", path.display()))?;
        if let Some(dir) = path.parent() {
            scene.sheet = scene.sheet.take().map(|sheet| dir.join(sheet));
        }
        tracing::debug!(path = %path.display(), instances = scene.instances.len(), "loaded scene");
        Ok(scene)
    }

    /// Resolve every instance to a normalized region.
    pub fn resolve(&self) -> anyhow::Result<Vec<SpriteInstance>> {
        let sheet = match &self.sheet {
            Some(path) => Some(SpriteSheet::load(path).with_context(|| format!("loading sheet {}", path.display()))?),
            None => None,
        };

        self.instances
            .iter()
            .enumerate()
            .map(|(i, inst)| -> anyhow::Result<SpriteInstance> {
                let region = match (&inst.region, &inst.sprite, &sheet) {
                    (Some(region), None, _) => *region,
                    (None, Some(name), Some(sheet)) => sheet.region(name)?,
                    (None, Some(name), None) => bail!("instance {i} names sprite {name:?} but the scene has no sheet"),
                    (Some(_), Some(_), _) => bail!("instance {i} sets both region and sprite"),
                    (None, None, _) => bail!("instance {i} sets neither region nor sprite"),
                };
                Ok(SpriteInstance::new(inst.center, region, inst.layer))
            })
            .collect()
    }
}
