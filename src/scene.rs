//! Frame-driver state for the background animation
//!
//! [`Scene`] owns everything the renderer reads each frame: the point field,
//! the style catalog, the viewport, the dirty flag gating mesh rebuilds, and
//! the cached mesh itself. It is deliberately platform-neutral so the whole
//! frame loop can be driven (and tested) without a GPU: the wasm renderer
//! forwards browser events into it and uploads whatever mesh it hands back.
//!
//! Sequencing guarantees: `advance` rebuilds the mesh before returning it, so
//! a draw call issued afterwards always sees a complete upload; resize and
//! click handlers only mutate state and mark it dirty, never draw.

use crate::config::BackgroundConfig;
use crate::mesh::{build_mesh, MeshBuffers, MeshLimits, Viewport};
use crate::points::PointField;
use crate::style::StyleCatalog;

/// Complete animation state for one background instance
#[derive(Debug, Clone)]
pub struct Scene {
    config: BackgroundConfig,
    field: PointField,
    styles: StyleCatalog,
    viewport: Viewport,
    limits: MeshLimits,
    mesh: MeshBuffers,
    dirty: bool,
    initialized: bool,
    last_tick_ms: f64,
    generation: u64,
}

impl Scene {
    /// Create a scene; no points exist until the first resize arrives
    pub fn new(config: BackgroundConfig) -> Self {
        Self {
            field: PointField::new(config.params(), config.seed),
            styles: StyleCatalog::new(),
            viewport: Viewport::new(0.0, 0.0, config.pixel_ratio),
            limits: MeshLimits::default(),
            mesh: MeshBuffers::default(),
            dirty: true,
            initialized: false,
            config,
            last_tick_ms: 0.0,
            generation: 0,
        }
    }

    /// Handle a container resize to `width` x `height` logical pixels
    ///
    /// Zero-sized containers are skipped entirely. The first non-degenerate
    /// size initializes the point field; later changes rescale every existing
    /// point proportionally. Either way the mesh is stale afterwards.
    pub fn handle_resize(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        if self.initialized && width == self.viewport.width && height == self.viewport.height {
            return;
        }
        self.viewport = Viewport::new(width, height, self.config.pixel_ratio);
        if self.initialized {
            self.field.rescale(width, height);
        } else {
            self.field.init(width, height);
            self.initialized = true;
        }
        self.dirty = true;
    }

    /// Handle a click/tap: advance to the next style and force a rebuild
    pub fn handle_click(&mut self) {
        self.styles.advance();
        self.dirty = true;
        log::debug!("style -> {}", self.styles.active().name);
    }

    /// Run one frame at timestamp `now_ms`
    ///
    /// Applies the interval-gated point-set update (a timestamp comparison,
    /// not a sleep), rebuilds the mesh if anything is dirty, and returns the
    /// mesh the caller should draw. Touch-tier scenes effectively never pass
    /// the gate, so their point set stays frozen.
    pub fn advance(&mut self, now_ms: f64) -> &MeshBuffers {
        if self.last_tick_ms == 0.0 {
            self.last_tick_ms = now_ms;
        }
        if now_ms - self.last_tick_ms > self.config.params().tick_interval_ms {
            self.last_tick_ms = now_ms;
            if self.field.tick() {
                self.dirty = true;
            }
        }
        if self.dirty {
            self.rebuild();
        }
        &self.mesh
    }

    /// Rebuild the cached mesh from the current points and style
    fn rebuild(&mut self) {
        self.mesh = build_mesh(
            self.field.points(),
            self.styles.active(),
            self.config.profile,
            &self.viewport,
            self.limits,
        );
        self.dirty = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Monotonic rebuild counter
    ///
    /// Lets a renderer skip the buffer upload when the mesh it already
    /// uploaded is still current.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The most recently built mesh (may be stale if `dirty` is set)
    #[inline]
    pub fn mesh(&self) -> &MeshBuffers {
        &self.mesh
    }

    /// Whether the cached mesh is stale
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current viewport
    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Index of the active style
    #[inline]
    pub fn style_index(&self) -> usize {
        self.styles.index()
    }

    /// The seed point field
    #[inline]
    pub fn field(&self) -> &PointField {
        &self.field
    }

    /// Configuration this scene was built from
    #[inline]
    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }
}
