//! Viewport scaling
//!
//! Everything spatial is authored against a 400px wide viewport.

use serde::{Deserialize, Serialize};

use crate::consts::REFERENCE_WIDTH;

/// Viewport dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Scale factor for this viewport
    pub fn scale(&self) -> f32 {
        derive_scale(self.width)
    }
}

/// `viewport_width / 400`
#[inline]
pub fn derive_scale(viewport_width: f32) -> f32 {
    viewport_width / REFERENCE_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_width_is_unit_scale() {
        assert_eq!(derive_scale(400.0), 1.0);
        assert_eq!(derive_scale(800.0), 2.0);
        assert_eq!(Viewport::new(200.0, 600.0).scale(), 0.5);
    }
}
