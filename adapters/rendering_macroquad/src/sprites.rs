use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use macroquad::{
    color::WHITE,
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use sky_dash_rendering::{SceneRect, SpriteKey};

use crate::SceneMetrics;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Cache of textures loaded from the sprite manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads the default sprite manifest from disk.
    pub(crate) fn from_default_manifest() -> Result<Self> {
        Self::from_manifest_path(Self::default_manifest_path())
    }

    /// Loads sprites from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Returns the default manifest path relative to the working directory.
    pub(crate) fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Stretches the sprite for `key` over `bounds`.
    ///
    /// Returns `false` when the atlas has no texture for the key so the caller
    /// can fall back to a primitive.
    pub(crate) fn draw(&self, key: SpriteKey, bounds: SceneRect, metrics: &SceneMetrics) -> bool {
        let Some(texture) = self.texture(key) else {
            return false;
        };

        let origin = metrics.to_screen(bounds.origin);
        let size = bounds.size * metrics.scale;
        texture::draw_texture_ex(
            texture,
            origin.x,
            origin.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(MacroquadVec2::new(size.x, size.y)),
                ..DrawTextureParams::default()
            },
        );
        true
    }

    #[cfg(test)]
    fn contains(&self, key: SpriteKey) -> bool {
        self.textures.contains_key(&key)
    }

    /// Returns the number of textures stored in the atlas.
    pub(crate) fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn texture(&self, key: SpriteKey) -> Option<Texture2D> {
        self.textures.get(&key).copied()
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Self::from_entries(entries, &mut loader)
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let texture = loader(key, &path).with_context(|| {
                format!("failed to load sprite {key:?} from {}", path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {key:?}");
            }
        }
        Ok(Self { textures })
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

/// Resolves manifest entries against `base_path`.
///
/// Keys missing from the manifest are simply not loaded; those entities are
/// drawn as primitives.
fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key = parse_sprite_key(&name)
            .with_context(|| format!("unknown sprite key `{name}` in manifest"))?;
        if resolved.insert(key, base_path.join(relative_path)).is_some() {
            bail!("sprite manifest contains duplicate entry for {key:?}");
        }
    }

    Ok(SpriteKey::ALL
        .into_iter()
        .filter_map(|key| resolved.remove(&key).map(|path| (key, path)))
        .collect())
}

fn parse_sprite_key(name: &str) -> Result<SpriteKey> {
    match name {
        "Player" => Ok(SpriteKey::Player),
        "Obstacle" => Ok(SpriteKey::Obstacle),
        "Hazard" => Ok(SpriteKey::Hazard),
        "Coin" => Ok(SpriteKey::Coin),
        "PowerUp" => Ok(SpriteKey::PowerUp),
        "Projectile" => Ok(SpriteKey::Projectile),
        _ => bail!("unknown sprite key `{name}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn manifest_rejects_unknown_keys() {
        let manifest = r#"
            version = 1

            [sprites]
            Player = "player.png"
            Dragon = "dragon.png"
        "#;

        let result = parse_manifest(manifest, Path::new("assets"));
        assert!(result.is_err(), "unknown keys must be rejected");
    }

    #[test]
    fn manifest_rejects_future_versions() {
        let manifest = r#"
            version = 2

            [sprites]
            Player = "player.png"
        "#;

        assert!(parse_manifest(manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn partial_manifest_resolves_in_canonical_order() {
        let manifest = r#"
            version = 1

            [sprites]
            Coin = "pickups/coin.png"
            Player = "player.png"
        "#;

        let parsed = parse_manifest(manifest, Path::new("root")).expect("manifest should parse");
        let expected = vec![
            (SpriteKey::Player, PathBuf::from("root/player.png")),
            (SpriteKey::Coin, PathBuf::from("root/pickups/coin.png")),
        ];
        assert_eq!(parsed, expected);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let result = SpriteAtlas::from_manifest_path("does/not/exist/manifest.toml");
        assert!(result.is_err());
    }

    #[test]
    fn atlas_loads_each_listed_texture_once() {
        let manifest = r#"
            version = 1

            [sprites]
            Projectile = "projectile.png"
            Hazard = "hazard.png"
            Obstacle = "obstacle.png"
        "#;
        let entries = parse_manifest(manifest, Path::new("assets")).expect("manifest should parse");
        let load_order = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_entries(entries, &mut |key, _| {
            load_order.borrow_mut().push(key);
            Ok(Texture2D::empty())
        })
        .expect("atlas should load using provided loader");

        assert_eq!(
            load_order.borrow().as_slice(),
            &[SpriteKey::Obstacle, SpriteKey::Hazard, SpriteKey::Projectile]
        );
        assert_eq!(atlas.texture_count(), 3);
        assert!(atlas.contains(SpriteKey::Hazard));
        assert!(!atlas.contains(SpriteKey::Player));
    }

    #[test]
    fn loader_failure_is_reported() {
        let entries = vec![(SpriteKey::Player, PathBuf::from("player.png"))];
        let result = SpriteAtlas::from_entries(entries, &mut |_, _| bail!("decode failed"));
        assert!(result.is_err());
    }
}
