//! Native image sizes supplied by the asset loader
//!
//! The simulation never decodes images. The loader reports the pixel size of
//! each sprite image, or `None` when the image failed to load.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which image a sprite is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Player,
    GoodItem,
    BadItem,
}

impl SpriteKind {
    /// Asset file the renderer draws this sprite with
    pub fn asset_path(&self) -> &'static str {
        match self {
            SpriteKind::Player => "AstroBoy1.png",
            SpriteKind::GoodItem => "sun1.png",
            SpriteKind::BadItem => "fish.png",
        }
    }
}

/// Native pixel sizes of the loaded sprite images
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteAtlas {
    pub player: Option<Vec2>,
    pub good_item: Option<Vec2>,
    pub bad_item: Option<Vec2>,
}

impl SpriteAtlas {
    /// Atlas with every image loaded at the given sizes
    pub fn new(player: Vec2, good_item: Vec2, bad_item: Vec2) -> Self {
        Self {
            player: Some(player),
            good_item: Some(good_item),
            bad_item: Some(bad_item),
        }
    }

    /// Size of the image for `kind`, `None` if it failed to load
    pub fn size_of(&self, kind: SpriteKind) -> Option<Vec2> {
        match kind {
            SpriteKind::Player => self.player,
            SpriteKind::GoodItem => self.good_item,
            SpriteKind::BadItem => self.bad_item,
        }
    }

    /// Record a load result for `kind`
    pub fn set(&mut self, kind: SpriteKind, size: Option<Vec2>) {
        if size.is_none() {
            log::warn!("Image {} unavailable", kind.asset_path());
        }
        match kind {
            SpriteKind::Player => self.player = size,
            SpriteKind::GoodItem => self.good_item = size,
            SpriteKind::BadItem => self.bad_item = size,
        }
    }
}
