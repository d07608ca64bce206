//! Animated Voronoi line-art background
//!
//! A real-time, continuously evolving Voronoi-diagram line renderer: an
//! animated set of seed points is tessellated into cells, each cell is
//! expanded into nested scaled/rotated outlines per the active draw style,
//! and the result is flattened into fixed-capacity line-segment buffers for
//! a one-draw-call WebGL frontend.
//!
//! The animation core is platform-neutral and fully testable on the host;
//! only the [`render`] backend requires a browser (wasm32).
//!
//! # Quick Start
//!
//! ```rust
//! use voronoi_lines::*;
//!
//! let config = BackgroundConfigBuilder::new()
//!     .seed(42)
//!     .profile(RenderProfile::Desktop)
//!     .build()
//!     .unwrap();
//!
//! let mut scene = Scene::new(config);
//! scene.handle_resize(800.0, 600.0);
//!
//! let mesh = scene.advance(16.0);
//! println!("built {} line segments", mesh.segment_count());
//! ```
//!
//! On the web side, `start_background("canvas-id", touch_device)` mounts the
//! full frame loop onto an existing canvas and returns a teardown handle.
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration types

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod style;
pub mod points;
pub mod mesh;
pub mod scene;
pub mod render;

// Re-export core types for convenience
pub use error::{BackgroundError, Result};
pub use config::{BackgroundConfig, BackgroundConfigBuilder, ProfileParams, RenderProfile};
pub use style::{LineStyle, ScaleMode, StyleCatalog, STYLES};
pub use points::{Phase, PointField, BOUNDARY_ANCHORS};
pub use mesh::{build_mesh, MeshBuffers, MeshLimits, Viewport, MAX_SEGMENTS};
pub use scene::Scene;

#[cfg(target_arch = "wasm32")]
pub use render::{start_background, Background};

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
