//! Probe configuration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::BodyShape;
use crate::collision::CollisionLayers;
use crate::error::{require_finite, require_non_negative, require_positive, TuningError};

/// One directional contact check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionCheck {
    /// Local offset of the check origin from the actor origin.
    pub offset: Vec2,

    /// Ray length, or box depth for the ground check.
    pub distance: f32,

    /// Layers that count for this check.
    pub mask: CollisionLayers,
}

impl CollisionCheck {
    pub fn new(offset: Vec2, distance: f32, mask: CollisionLayers) -> Self {
        Self { offset, distance, mask }
    }
}

/// Configuration for a [`CollisionProbe`](super::CollisionProbe).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Ground check. The overlap box spans the body width and is
    /// `ground.distance` deep, directly under the body.
    pub ground: CollisionCheck,

    /// Horizontal rays to the left and right.
    pub wall: CollisionCheck,

    /// Upward ray.
    pub ceiling: CollisionCheck,

    /// Layers that block movement sweeps.
    pub movement_mask: CollisionLayers,

    /// Clearance kept between the body and any surface it moves toward.
    pub skin_width: f32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::for_body(&BodyShape::UNIT, 0.05)
    }
}

impl ProbeConfig {
    /// Build checks sized for `body`.
    ///
    /// Wall and ceiling rays start at the body center and reach two skin
    /// widths past its faces, so a body resting at skin distance still
    /// registers the contact.
    pub fn for_body(body: &BodyShape, skin_width: f32) -> Self {
        let half = body.half_extents();
        let reach = skin_width * 2.0;

        Self {
            ground: CollisionCheck::new(Vec2::ZERO, reach, CollisionLayers::MASK_TERRAIN),
            wall: CollisionCheck::new(body.offset(), half.x + reach, CollisionLayers::MASK_TERRAIN),
            ceiling: CollisionCheck::new(
                body.offset(),
                half.y + reach,
                CollisionLayers::MASK_TERRAIN,
            ),
            movement_mask: CollisionLayers::MASK_MOVEMENT,
            skin_width,
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        require_non_negative("probe.skin_width", self.skin_width)?;
        require_positive("probe.ground.distance", self.ground.distance)?;
        require_positive("probe.wall.distance", self.wall.distance)?;
        require_positive("probe.ceiling.distance", self.ceiling.distance)?;
        for (field, offset) in [
            ("probe.ground.offset", self.ground.offset),
            ("probe.wall.offset", self.wall.offset),
            ("probe.ceiling.offset", self.ceiling.offset),
        ] {
            require_finite(field, offset.x)?;
            require_finite(field, offset.y)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProbeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.skin_width, 0.05);
        assert!((config.wall.distance - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_for_body_follows_offset() {
        let body = BodyShape::new(Vec2::new(0.25, 1.0), Vec2::new(0.0, 1.0)).unwrap();
        let config = ProbeConfig::for_body(&body, 0.01);

        assert_eq!(config.wall.offset, Vec2::new(0.0, 1.0));
        assert!((config.ceiling.distance - 1.02).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_negative_skin() {
        let config = ProbeConfig {
            skin_width: -0.1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TuningError::Negative { .. })));
    }
}
