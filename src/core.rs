use crate::error::{KuusiError, KuusiResult};

pub use kurbo::{CubicBez, ParamCurve, Point, Vec2};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> KuusiResult<Self> {
        if width == 0 || height == 0 {
            return Err(KuusiError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_rejects_zero_dimensions() {
        assert!(Canvas::new(0, 100).is_err());
        assert!(Canvas::new(100, 0).is_err());
        assert!(Canvas::new(340, 650).is_ok());
    }
}
