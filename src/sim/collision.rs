//! Collision tests between sprites and against the playfield floor
//!
//! Deliberately conservative: two sprites collide when the axis-aligned boxes
//! of their rotated rectangles overlap, not when the rectangles themselves do.

use super::sprite::Sprite;

/// True when the bounding boxes of `a` and `b` overlap (inclusive bounds)
pub fn check_collision(a: &Sprite, b: &Sprite) -> bool {
    a.bounding_box().overlaps(&b.bounding_box())
}

/// True when the bottom of the sprite's bounding box is at or below the floor line
pub fn reached_floor(sprite: &Sprite, floor: f32) -> bool {
    sprite.bounding_box().bottom() >= floor
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn sprite(x: f32, y: f32, w: f32, h: f32, rotation: f32) -> Sprite {
        let mut s = Sprite::new(0, Vec2::new(w, h), Vec2::new(x, y));
        s.rotation = rotation;
        s
    }

    #[test]
    fn test_overlapping_sprites_collide() {
        let a = sprite(0.0, 0.0, 50.0, 50.0, 0.0);
        let b = sprite(40.0, 40.0, 50.0, 50.0, 0.0);
        assert!(check_collision(&a, &b));
    }

    #[test]
    fn test_separated_sprites_miss() {
        let a = sprite(0.0, 0.0, 50.0, 50.0, 0.0);
        let b = sprite(51.0, 0.0, 50.0, 50.0, 0.0);
        assert!(!check_collision(&a, &b));
    }

    #[test]
    fn test_rotation_uses_enclosing_box() {
        // Rectangles whose corners are 2px apart only collide once one of them rotates.
        let a = sprite(0.0, 0.0, 100.0, 10.0, 0.0);
        let mut b = sprite(0.0, 12.0, 100.0, 10.0, 0.0);
        assert!(!check_collision(&a, &b));
        b.rotation = 30.0;
        assert!(check_collision(&a, &b));
    }

    #[test]
    fn test_floor_contact_is_inclusive() {
        let s = sprite(0.0, 900.0, 20.0, 100.0, 0.0);
        assert!(reached_floor(&s, 1000.0));
        assert!(!reached_floor(&s, 1000.5));
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 1.0f32..200.0, ah in 1.0f32..200.0, ar in 0.0f32..360.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 1.0f32..200.0, bh in 1.0f32..200.0, br in 0.0f32..360.0,
        ) {
            let a = sprite(ax, ay, aw, ah, ar);
            let b = sprite(bx, by, bw, bh, br);
            prop_assert_eq!(check_collision(&a, &b), check_collision(&b, &a));
        }
    }
}
