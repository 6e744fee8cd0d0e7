//! The box an actor occupies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// Axis-aligned box attached to an actor origin.
///
/// A body is only obtainable through [`BodyShape::new`] or
/// [`BodyShape::from_size`], so a probe can never query a zero-size box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBodyShape", into = "RawBodyShape")]
pub struct BodyShape {
    half_extents: Vec2,
    offset: Vec2,
}

impl BodyShape {
    /// Unit box centred on the actor origin.
    pub const UNIT: Self = Self {
        half_extents: Vec2::splat(0.5),
        offset: Vec2::ZERO,
    };

    /// Create a body from half extents and a local offset of the box center
    /// relative to the actor origin.
    pub fn new(half_extents: Vec2, offset: Vec2) -> Result<Self, ShapeError> {
        if !half_extents.is_finite() {
            return Err(ShapeError::NonFinite { field: "half_extents" });
        }
        if !offset.is_finite() {
            return Err(ShapeError::NonFinite { field: "offset" });
        }
        if half_extents.x <= 0.0 || half_extents.y <= 0.0 {
            return Err(ShapeError::NonPositiveExtents {
                x: half_extents.x,
                y: half_extents.y,
            });
        }

        Ok(Self { half_extents, offset })
    }

    /// Create a body from its full width and height.
    pub fn from_size(size: Vec2, offset: Vec2) -> Result<Self, ShapeError> {
        Self::new(size * 0.5, offset)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// World-space center of the box for an actor at `position`.
    #[inline]
    pub fn center(&self, position: Vec2) -> Vec2 {
        position + self.offset
    }

    /// World-space y of the bottom face.
    #[inline]
    pub fn bottom(&self, position: Vec2) -> f32 {
        self.center(position).y - self.half_extents.y
    }
}

impl Default for BodyShape {
    fn default() -> Self {
        Self::UNIT
    }
}

#[derive(Serialize, Deserialize)]
struct RawBodyShape {
    half_extents: Vec2,
    #[serde(default)]
    offset: Vec2,
}

impl TryFrom<RawBodyShape> for BodyShape {
    type Error = ShapeError;

    fn try_from(raw: RawBodyShape) -> Result<Self, Self::Error> {
        Self::new(raw.half_extents, raw.offset)
    }
}

impl From<BodyShape> for RawBodyShape {
    fn from(body: BodyShape) -> Self {
        Self {
            half_extents: body.half_extents,
            offset: body.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_size() {
        assert!(matches!(
            BodyShape::new(Vec2::new(0.0, 0.5), Vec2::ZERO),
            Err(ShapeError::NonPositiveExtents { .. })
        ));
        assert!(BodyShape::from_size(Vec2::ZERO, Vec2::ZERO).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(
            BodyShape::new(Vec2::new(f32::NAN, 0.5), Vec2::ZERO),
            Err(ShapeError::NonFinite { field: "half_extents" })
        ));
        assert!(BodyShape::new(Vec2::splat(0.5), Vec2::new(f32::INFINITY, 0.0)).is_err());
    }

    #[test]
    fn test_center_and_bottom_with_offset() {
        let body = BodyShape::from_size(Vec2::new(1.0, 2.0), Vec2::new(0.0, 1.0)).unwrap();
        let position = Vec2::new(3.0, 0.0);

        assert_eq!(body.center(position), Vec2::new(3.0, 1.0));
        assert_eq!(body.bottom(position), 0.0);
        assert_eq!(body.size(), Vec2::new(1.0, 2.0));
    }
}
