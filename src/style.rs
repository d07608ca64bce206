//! Draw style catalog
//!
//! A fixed, ordered list of rendering styles cycled round-robin by clicks on
//! the canvas. Styles are read-only geometric parameters consumed by the mesh
//! builder; nothing else in the crate mutates or extends the catalog.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How layer scale progresses from the outermost outline inwards
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleMode {
    /// Single outline at full scale
    None,
    /// Scale shrinks by a fixed step per layer
    Linear,
    /// Scale follows 1/(i+1)
    Exp,
}

/// Immutable descriptor for one rendering style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Display name, mostly for demos and logs
    pub name: &'static str,
    /// Scale progression across nested layers
    pub scale_mode: ScaleMode,
    /// Whether inner layers rotate as they shrink
    pub rotate: bool,
    /// Hard upper bound on nested layers per cell
    pub max_layers: usize,
    /// Per-layer scale decrement for [`ScaleMode::Linear`]
    pub linear_step: Option<f64>,
    /// Inner layers are pruned once `perimeter * scale` drops below
    /// `canvas_area * cutoff` (visually insignificant detail)
    pub cutoff_volume_mul: Option<f64>,
}

/// The fixed style catalog, in click order
pub static STYLES: [LineStyle; 5] = [
    LineStyle {
        name: "simple",
        scale_mode: ScaleMode::None,
        rotate: false,
        max_layers: 1,
        linear_step: None,
        cutoff_volume_mul: None,
    },
    LineStyle {
        name: "scaleExp",
        scale_mode: ScaleMode::Exp,
        rotate: false,
        max_layers: 8,
        linear_step: None,
        cutoff_volume_mul: Some(2e-5),
    },
    LineStyle {
        name: "scaleExpRot",
        scale_mode: ScaleMode::Exp,
        rotate: true,
        max_layers: 7,
        linear_step: None,
        cutoff_volume_mul: Some(2e-5),
    },
    LineStyle {
        name: "scaleLin",
        scale_mode: ScaleMode::Linear,
        rotate: false,
        max_layers: 9,
        linear_step: Some(0.05),
        cutoff_volume_mul: Some(5e-5),
    },
    LineStyle {
        name: "scaleLinRot",
        scale_mode: ScaleMode::Linear,
        rotate: true,
        max_layers: 15,
        linear_step: Some(0.02),
        cutoff_volume_mul: Some(2e-5),
    },
];

/// Round-robin selector over the fixed catalog
///
/// Exactly one style is active at a time; a click advances the index by one,
/// wrapping at the end.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleCatalog {
    index: usize,
}

impl StyleCatalog {
    /// Create a catalog starting at the first style
    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Index of the currently active style
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The currently active style
    #[inline]
    pub fn active(&self) -> &'static LineStyle {
        &STYLES[self.index]
    }

    /// Number of styles in the catalog
    #[inline]
    pub fn len(&self) -> usize {
        STYLES.len()
    }

    /// The catalog is never empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Advance to the next style, wrapping at the end
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % STYLES.len();
    }
}
