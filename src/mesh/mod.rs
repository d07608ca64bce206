//! Tessellation and line-mesh construction
//!
//! Consumes the current seed points plus the active style, computes a bounded
//! Voronoi diagram (Delaunay dual via `voronator`, the same d3-delaunay
//! lineage the rest of the pipeline assumes), and expands every cell into
//! nested scaled/rotated outlines flattened into flat position/depth buffers.
//!
//! The builder never fails: degenerate cells are skipped, a failed
//! triangulation is logged and yields an empty mesh for the frame, and
//! running into the capacity caps simply truncates the output.

use glam::DVec2;
use voronator::delaunator::Point as SitePoint;
use voronator::VoronoiDiagram;

use crate::config::RenderProfile;
use crate::geometry::{centroid, perimeter, transform};
use crate::style::{LineStyle, ScaleMode};

/// Hard cap on emitted line segments per mesh
pub const MAX_SEGMENTS: usize = 35_000;

/// Voronoi clip bounds extend past the canvas by this fraction of the larger
/// dimension, hiding clipping artifacts at the viewport edge
const BOUNDS_EXPAND_FRACTION: f64 = 0.1;

/// Layers stop shrinking once scale falls below this
const MIN_LAYER_SCALE: f64 = 0.05;

/// Capacity limits for one mesh build
///
/// The default matches the fixed GPU buffer allocation; tests shrink it to
/// exercise truncation without generating tens of thousands of segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshLimits {
    /// Maximum number of line segments
    pub max_segments: usize,
}

impl MeshLimits {
    /// Capacity of the position buffer in floats (x1,y1,x2,y2 per segment)
    #[inline]
    pub fn position_floats(&self) -> usize {
        self.max_segments * 4
    }

    /// Capacity of the depth buffer in floats (one per segment endpoint)
    #[inline]
    pub fn depth_floats(&self) -> usize {
        self.max_segments * 2
    }
}

impl Default for MeshLimits {
    fn default() -> Self {
        Self {
            max_segments: MAX_SEGMENTS,
        }
    }
}

/// Canvas dimensions in logical pixels plus the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical (CSS) width
    pub width: f64,
    /// Logical (CSS) height
    pub height: f64,
    /// Logical -> device pixel scale factor
    pub pixel_ratio: f64,
}

impl Viewport {
    /// Create a viewport from logical dimensions and a pixel ratio
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Physical width in device pixels
    #[inline]
    pub fn device_width(&self) -> u32 {
        (self.width * self.pixel_ratio).round() as u32
    }

    /// Physical height in device pixels
    #[inline]
    pub fn device_height(&self) -> u32 {
        (self.height * self.pixel_ratio).round() as u32
    }

    /// Logical canvas area, used by the layer volume cutoff
    #[inline]
    pub fn logical_area(&self) -> f64 {
        self.width * self.height
    }

    /// A zero-sized viewport; resize and draw work is skipped for these
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Flat line-segment buffers ready for GPU upload
///
/// `positions` holds `x1,y1,x2,y2` per segment in device pixels; `depths`
/// holds one normalized `[0,1]` layer depth per endpoint (identical for both
/// endpoints of a segment). Invariant: `positions.len() == 2 * depths.len()`.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    /// Segment endpoint positions, 4 floats per segment
    pub positions: Vec<f32>,
    /// Per-endpoint layer depth, 2 floats per segment
    pub depths: Vec<f32>,
}

impl MeshBuffers {
    /// Number of line segments
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 4
    }

    /// Number of vertices for the draw call
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 2
    }

    /// Whether the mesh holds no segments
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Appends segments while enforcing the capacity caps
struct SegmentSink {
    mesh: MeshBuffers,
    limits: MeshLimits,
    segments: usize,
}

impl SegmentSink {
    fn new(limits: MeshLimits) -> Self {
        Self {
            mesh: MeshBuffers::default(),
            limits,
            segments: 0,
        }
    }

    /// True once another segment would exceed any cap
    fn full(&self) -> bool {
        self.segments >= self.limits.max_segments
            || self.mesh.positions.len() + 4 > self.limits.position_floats()
            || self.mesh.depths.len() + 2 > self.limits.depth_floats()
    }

    /// Emit one segment, converting logical to device pixels
    ///
    /// Caller is responsible for the capacity and finiteness checks.
    fn push(&mut self, p1: DVec2, p2: DVec2, depth: f32, pixel_ratio: f64) {
        self.mesh.positions.extend([
            (p1.x * pixel_ratio) as f32,
            (p1.y * pixel_ratio) as f32,
            (p2.x * pixel_ratio) as f32,
            (p2.y * pixel_ratio) as f32,
        ]);
        self.mesh.depths.extend([depth, depth]);
        self.segments += 1;
    }
}

/// Build the line mesh for the current seed points and active style
///
/// Fewer than four points cannot produce a meaningful Delaunay triangulation,
/// so the result is an empty mesh; the same applies when `voronator` rejects
/// the input (e.g. all points coincident). Output is truncated at `limits`.
pub fn build_mesh(
    points: &[DVec2],
    style: &LineStyle,
    profile: RenderProfile,
    viewport: &Viewport,
    limits: MeshLimits,
) -> MeshBuffers {
    if points.len() < 4 {
        return MeshBuffers::default();
    }

    let expand = viewport.width.max(viewport.height) * BOUNDS_EXPAND_FRACTION;
    let sites: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
    let diagram = match VoronoiDiagram::<SitePoint>::from_tuple(
        &(-expand, -expand),
        &(viewport.width + expand, viewport.height + expand),
        &sites,
    ) {
        Some(d) => d,
        None => {
            log::warn!("voronoi construction failed for {} sites; empty mesh this frame", sites.len());
            return MeshBuffers::default();
        }
    };

    let layer_cap = profile.layer_cap(style.max_layers);
    let mut sink = SegmentSink::new(limits);

    'cells: for cell in diagram.cells() {
        let poly: Vec<DVec2> = cell
            .points()
            .iter()
            .map(|p| DVec2::new(p.x, p.y))
            .collect();
        if poly.len() < 3 {
            continue;
        }
        let center = centroid(&poly);
        if !center.x.is_finite() || !center.y.is_finite() {
            continue;
        }
        let perim = perimeter(&poly);
        if !perim.is_finite() || perim == 0.0 {
            continue;
        }

        // Layer count follows the cell's perimeter: deterministic, but
        // visually pseudo-random, so density tracks local cell size without
        // extra randomness state. The mod-18 constant is pure tuning.
        let eff_layers = if style.scale_mode == ScaleMode::None {
            1
        } else {
            (2 + (perim.floor() as usize % 18))
                .min(style.max_layers)
                .min(layer_cap)
                .max(1)
        };

        for i in 0..eff_layers {
            let depth = if style.max_layers > 1 {
                i as f64 / (style.max_layers - 1) as f64
            } else {
                0.0
            };

            let scale = match style.scale_mode {
                ScaleMode::None => 1.0,
                ScaleMode::Linear => {
                    let s = 1.0 - i as f64 * style.linear_step.unwrap_or(0.1);
                    if s < MIN_LAYER_SCALE {
                        break;
                    }
                    s
                }
                ScaleMode::Exp => {
                    let s = 1.0 / (i as f64 + 1.0);
                    if i > 0 && s < MIN_LAYER_SCALE {
                        break;
                    }
                    s
                }
            };

            if let Some(cutoff) = style.cutoff_volume_mul {
                if i > 0 && scale < 1.0 && perim * scale < viewport.logical_area() * cutoff {
                    break;
                }
            }

            let weight = if style.scale_mode == ScaleMode::Exp {
                i as f64
            } else {
                1.0
            };
            let angle = if style.rotate {
                (1.0 - scale) * std::f64::consts::FRAC_PI_2 * weight
            } else {
                0.0
            };

            let outline = transform(&poly, center, scale, angle);
            for j in 0..outline.len() {
                if sink.full() {
                    break 'cells;
                }
                let p1 = outline[j];
                let p2 = outline[(j + 1) % outline.len()];
                if p1.x.is_finite() && p1.y.is_finite() && p2.x.is_finite() && p2.y.is_finite() {
                    sink.push(p1, p2, depth as f32, viewport.pixel_ratio);
                }
            }
            if sink.full() {
                break 'cells;
            }
            if style.scale_mode == ScaleMode::None {
                break;
            }
        }
    }

    sink.mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::STYLES;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0, 1.0)
    }

    /// Evenly spread grid of seed points
    fn grid_points(nx: usize, ny: usize) -> Vec<DVec2> {
        let mut pts = Vec::new();
        for ix in 0..nx {
            for iy in 0..ny {
                pts.push(DVec2::new(
                    60.0 + ix as f64 * 700.0 / nx as f64,
                    60.0 + iy as f64 * 500.0 / ny as f64,
                ));
            }
        }
        pts
    }

    #[test]
    fn test_too_few_points_yields_empty_mesh() {
        for n in 0..4 {
            let pts = grid_points(2, 2).into_iter().take(n).collect::<Vec<_>>();
            let mesh = build_mesh(
                &pts,
                &STYLES[0],
                RenderProfile::Desktop,
                &viewport(),
                MeshLimits::default(),
            );
            assert!(mesh.is_empty(), "{} points should produce no mesh", n);
            assert_eq!(mesh.depths.len(), 0);
        }
    }

    #[test]
    fn test_basic_mesh_shape() {
        let mesh = build_mesh(
            &grid_points(4, 4),
            &STYLES[0],
            RenderProfile::Desktop,
            &viewport(),
            MeshLimits::default(),
        );
        assert!(!mesh.is_empty());
        assert_eq!(mesh.positions.len() % 4, 0);
        assert_eq!(mesh.positions.len(), 2 * mesh.depths.len());
        assert_eq!(mesh.vertex_count(), mesh.segment_count() * 2);
    }

    #[test]
    fn test_single_layer_style_depths_are_zero() {
        let mesh = build_mesh(
            &grid_points(5, 5),
            &STYLES[0],
            RenderProfile::Desktop,
            &viewport(),
            MeshLimits::default(),
        );
        assert!(STYLES[0].max_layers == 1);
        assert!(mesh.depths.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_layered_style_depths_are_normalized() {
        let mesh = build_mesh(
            &grid_points(5, 5),
            &STYLES[4],
            RenderProfile::Desktop,
            &viewport(),
            MeshLimits::default(),
        );
        assert!(!mesh.is_empty());
        assert!(mesh.depths.iter().all(|&d| (0.0..=1.0).contains(&d)));
        // Nested layers mean at least two distinct depth values
        let first = mesh.depths[0];
        assert!(mesh.depths.iter().any(|&d| d != first));
    }

    #[test]
    fn test_capacity_truncation() {
        let limits = MeshLimits { max_segments: 10 };
        let mesh = build_mesh(
            &grid_points(6, 6),
            &STYLES[4],
            RenderProfile::Desktop,
            &viewport(),
            limits,
        );
        assert_eq!(mesh.segment_count(), 10);
        assert_eq!(mesh.positions.len(), limits.position_floats());
        assert_eq!(mesh.depths.len(), limits.depth_floats());
    }

    #[test]
    fn test_caps_hold_for_large_inputs() {
        let limits = MeshLimits { max_segments: 100 };
        for style in &STYLES {
            let mesh = build_mesh(
                &grid_points(10, 10),
                style,
                RenderProfile::Desktop,
                &viewport(),
                limits,
            );
            assert!(mesh.positions.len() <= limits.position_floats());
            assert!(mesh.depths.len() <= limits.depth_floats());
        }
    }

    #[test]
    fn test_coincident_points_do_not_panic() {
        let pts = vec![DVec2::new(10.0, 10.0); 20];
        let mesh = build_mesh(
            &pts,
            &STYLES[1],
            RenderProfile::Desktop,
            &viewport(),
            MeshLimits::default(),
        );
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_pixel_ratio_scales_positions() {
        let pts = grid_points(4, 4);
        let at_1x = build_mesh(
            &pts,
            &STYLES[0],
            RenderProfile::Desktop,
            &Viewport::new(800.0, 600.0, 1.0),
            MeshLimits::default(),
        );
        let at_2x = build_mesh(
            &pts,
            &STYLES[0],
            RenderProfile::Desktop,
            &Viewport::new(800.0, 600.0, 2.0),
            MeshLimits::default(),
        );
        assert_eq!(at_1x.positions.len(), at_2x.positions.len());
        for (a, b) in at_1x.positions.iter().zip(at_2x.positions.iter()) {
            assert!((b - a * 2.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_touch_profile_emits_fewer_layers() {
        let pts = grid_points(5, 5);
        let desktop = build_mesh(
            &pts,
            &STYLES[4],
            RenderProfile::Desktop,
            &viewport(),
            MeshLimits::default(),
        );
        let touch = build_mesh(
            &pts,
            &STYLES[4],
            RenderProfile::Touch,
            &viewport(),
            MeshLimits::default(),
        );
        assert!(touch.segment_count() < desktop.segment_count());
    }

    #[test]
    fn test_viewport_device_dimensions() {
        let vp = Viewport::new(800.0, 600.0, 1.5);
        assert_eq!(vp.device_width(), 1200);
        assert_eq!(vp.device_height(), 900);
        assert!(!vp.is_degenerate());
        assert!(Viewport::new(0.0, 600.0, 1.0).is_degenerate());
    }
}
