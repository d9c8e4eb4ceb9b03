//! Sprite geometry shared by every movable entity
//!
//! A sprite is an image drawn with its top-left corner at `pos`, scaled
//! uniformly and rotated about its center. Collision uses the axis-aligned box
//! that contains the rotated, scaled rectangle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in screen pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box centered at `center` with the given half extents
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Interval overlap on both axes. Touching edges count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Common movable entity state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    /// Unique per spawn
    pub id: u32,
    /// Top-left corner (px)
    pub pos: Vec2,
    /// Velocity (px/s)
    pub vel: Vec2,
    /// Rotation about the center, in degrees
    pub rotation: f32,
    /// Uniform scale applied to the native image size
    pub scale: f32,
    /// Cleared when a rule kills the sprite; dead sprites are removed at the end of the tick
    pub alive: bool,
    /// Native pixel dimensions of the source image
    pub native_size: Vec2,
}

impl Sprite {
    pub fn new(id: u32, native_size: Vec2, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
            alive: true,
            native_size,
        }
    }

    /// Scaled width
    #[inline]
    pub fn width(&self) -> f32 {
        self.native_size.x * self.scale
    }

    /// Scaled height
    #[inline]
    pub fn height(&self) -> f32 {
        self.native_size.y * self.scale
    }

    /// Scaled size
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.native_size * self.scale
    }

    /// Center of the unrotated rectangle
    pub fn center(&self) -> Vec2 {
        self.pos + self.size() * 0.5
    }

    /// Set the velocity directly
    pub fn set_velocity(&mut self, x: f32, y: f32) {
        self.vel = Vec2::new(x, y);
    }

    /// Axis-aligned box containing the rotated, scaled rectangle
    pub fn bounding_box(&self) -> Aabb {
        let half = self.size() * 0.5;
        let theta = self.rotation.to_radians();
        let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
        let extent = Vec2::new(half.x * cos + half.y * sin, half.x * sin + half.y * cos);
        Aabb::from_center(self.center(), extent)
    }

    /// Advance position by velocity
    #[inline]
    pub fn integrate_position(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}
