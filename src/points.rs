//! Evolving seed point set
//!
//! Owns the 2D seed points driving the tessellation. The set breathes between
//! randomized min/max targets: it grows one point at a time (probabilistic,
//! interval-gated by the frame driver), then sheds newest-first back down,
//! then re-randomizes its targets and grows again. Eight boundary anchors
//! pin the diagram to the container edges and are never removed.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::ProfileParams;

/// Number of fixed boundary anchor points (4 corners + 4 edge midpoints)
pub const BOUNDARY_ANCHORS: usize = 8;

/// Anchor inset from the container edge, as a fraction of the smaller dimension
const MARGIN_FRACTION: f64 = 0.05;

/// Whether the point set is currently growing or shrinking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Adding points until the max target is reached
    Growing,
    /// Removing newest points until the min target is reached
    Shrinking,
}

/// The evolving seed point set
///
/// Coordinates are logical (CSS) pixels. Insertion order matters only for the
/// newest-first removal policy; geometry ignores it.
#[derive(Debug, Clone)]
pub struct PointField {
    points: Vec<DVec2>,
    params: ProfileParams,
    rng: ChaCha8Rng,
    max_target: usize,
    min_target: usize,
    phase: Phase,
    width: f64,
    height: f64,
}

impl PointField {
    /// Create an empty field for the given tier parameters
    ///
    /// The field is unusable until [`init`](Self::init) supplies container
    /// dimensions.
    pub fn new(params: ProfileParams, seed: u32) -> Self {
        Self {
            points: Vec::new(),
            params,
            rng: ChaCha8Rng::seed_from_u64(seed as u64),
            max_target: params.max_pts_upper,
            min_target: params.min_pts_lower,
            phase: Phase::Growing,
            width: 0.0,
            height: 0.0,
        }
    }

    /// (Re-)initialize the field for a container of `width` x `height`
    ///
    /// Clears everything, re-randomizes targets, inserts the 8 boundary
    /// anchors and a small randomized interior fill, and resets the phase to
    /// growing.
    pub fn init(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.points.clear();
        self.randomize_targets();
        self.phase = Phase::Growing;

        let margin = width.min(height) * MARGIN_FRACTION;
        let (w, h) = (width, height);
        self.points.extend([
            DVec2::new(margin, margin),
            DVec2::new(w - margin, margin),
            DVec2::new(w - margin, h - margin),
            DVec2::new(margin, h - margin),
            DVec2::new(w / 2.0, margin),
            DVec2::new(w - margin, h / 2.0),
            DVec2::new(w / 2.0, h - margin),
            DVec2::new(margin, h / 2.0),
        ]);
        debug_assert_eq!(self.points.len(), BOUNDARY_ANCHORS);

        let initial_fill = 10.min(self.min_target / 2);
        for _ in 0..initial_fill {
            let x = margin + self.rng.gen_range(0.0..1.0) * (w - 2.0 * margin);
            let y = margin + self.rng.gen_range(0.0..1.0) * (h - 2.0 * margin);
            self.points.push(DVec2::new(x, y));
        }

        log::debug!(
            "point field init: {} points, targets {}..{}",
            self.points.len(),
            self.min_target,
            self.max_target
        );
    }

    /// Re-draw the min/max point targets for the next breathing cycle
    ///
    /// Targets are drawn uniformly from their tier bands and then pushed
    /// apart so they always straddle a minimum gap. Without the gap the set
    /// size can oscillate in a degenerate zero-width band.
    pub fn randomize_targets(&mut self) {
        let p = self.params;
        let gap = ((p.max_pts_lower as f64 - p.min_pts_upper as f64) * 0.5).max(20.0) as i64;

        let mut max_tgt = self.rng.gen_range(p.max_pts_lower..=p.max_pts_upper) as i64;
        let mut min_tgt = self.rng.gen_range(p.min_pts_lower..=p.min_pts_upper) as i64;
        let anchors = BOUNDARY_ANCHORS as i64;

        if min_tgt >= max_tgt - gap {
            let jitter = self.rng.gen_range(0..=gap / 2);
            min_tgt = (anchors + 10).max(max_tgt - gap - jitter);
            min_tgt = min_tgt.max(p.min_pts_lower as i64);
        }
        if max_tgt <= min_tgt + gap {
            let jitter = self.rng.gen_range(0..=gap / 2);
            max_tgt = min_tgt + gap + jitter;
            max_tgt = max_tgt.min(p.max_pts_upper as i64);
        }
        min_tgt = min_tgt.max(anchors + 5);
        max_tgt = max_tgt.max(min_tgt + gap);
        min_tgt = min_tgt.min(p.max_pts_upper as i64 - gap);
        max_tgt = max_tgt.min(p.max_pts_upper as i64);

        self.min_target = min_tgt.max(0) as usize;
        self.max_target = max_tgt.max(0) as usize;
    }

    /// Run one animation update
    ///
    /// The caller is responsible for interval gating; each call performs at
    /// most one growth attempt or one removal batch. Returns `true` if the
    /// point set (or its phase/targets) changed, which obliges a mesh
    /// rebuild.
    pub fn tick(&mut self) -> bool {
        match self.phase {
            Phase::Growing => {
                if self.points.len() < self.max_target {
                    if self.rng.gen_range(0.0..100.0) < self.params.add_pt_prob {
                        let x = self.rng.gen_range(0.0..1.0) * self.width;
                        let y = self.rng.gen_range(0.0..1.0) * self.height;
                        self.points.push(DVec2::new(x, y));
                        return true;
                    }
                    false
                } else {
                    self.phase = Phase::Shrinking;
                    true
                }
            }
            Phase::Shrinking => {
                if self.points.len() > self.min_target {
                    let mut removed = false;
                    for _ in 0..self.params.removals_per_tick {
                        if self.points.len() > self.min_target
                            && self.points.len() > BOUNDARY_ANCHORS
                        {
                            self.points.pop();
                            removed = true;
                        } else {
                            break;
                        }
                    }
                    removed
                } else {
                    self.phase = Phase::Growing;
                    self.randomize_targets();
                    true
                }
            }
        }
    }

    /// Rescale every point proportionally to a new container size
    ///
    /// Non-finite results (possible when the previous container was
    /// zero-sized) are clamped to 0 rather than propagated into the
    /// tessellation. Returns `true` if anything changed.
    pub fn rescale(&mut self, new_width: f64, new_height: f64) -> bool {
        if new_width == self.width && new_height == self.height {
            return false;
        }
        if self.width > 0.0 && self.height > 0.0 {
            let sx = new_width / self.width;
            let sy = new_height / self.height;
            for p in &mut self.points {
                let x = p.x * sx;
                let y = p.y * sy;
                p.x = if x.is_finite() { x } else { 0.0 };
                p.y = if y.is_finite() { y } else { 0.0 };
            }
        }
        self.width = new_width;
        self.height = new_height;
        true
    }

    /// Current seed points
    #[inline]
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Number of seed points
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the field holds no points (before `init`)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Current animation phase
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current max point target
    #[inline]
    pub fn max_target(&self) -> usize {
        self.max_target
    }

    /// Current min point target
    #[inline]
    pub fn min_target(&self) -> usize {
        self.min_target
    }

    /// Logical container size this field was initialized for
    #[inline]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    #[cfg(test)]
    pub(crate) fn points_mut(&mut self) -> &mut Vec<DVec2> {
        &mut self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderProfile;

    fn desktop_params() -> ProfileParams {
        RenderProfile::Desktop.params()
    }

    /// Deterministic growth: always add, remove one per tick
    fn eager_params() -> ProfileParams {
        ProfileParams {
            add_pt_prob: 100.0,
            ..desktop_params()
        }
    }

    #[test]
    fn test_init_counts() {
        let mut field = PointField::new(desktop_params(), 42);
        field.init(800.0, 600.0);

        let fill = field.len() - BOUNDARY_ANCHORS;
        assert!(fill <= 10);
        assert!(fill <= field.min_target() / 2);
        assert_eq!(field.phase(), Phase::Growing);
    }

    #[test]
    fn test_anchor_positions() {
        let mut field = PointField::new(desktop_params(), 1);
        field.init(100.0, 200.0);

        let margin = 100.0 * 0.05;
        assert_eq!(field.points()[0], DVec2::new(margin, margin));
        assert_eq!(field.points()[2], DVec2::new(100.0 - margin, 200.0 - margin));
        // Edge midpoints follow the corners
        assert_eq!(field.points()[4], DVec2::new(50.0, margin));
    }

    #[test]
    fn test_targets_keep_gap() {
        let mut field = PointField::new(desktop_params(), 7);
        for _ in 0..100 {
            field.randomize_targets();
            assert!(field.min_target() + 20 <= field.max_target());
            assert!(field.max_target() <= desktop_params().max_pts_upper);
            assert!(field.min_target() >= BOUNDARY_ANCHORS + 5);
        }
    }

    #[test]
    fn test_growth_reaches_exactly_max_then_flips() {
        let mut field = PointField::new(eager_params(), 42);
        field.init(800.0, 600.0);
        let max = field.max_target();

        for _ in 0..max * 2 {
            if field.phase() == Phase::Shrinking {
                break;
            }
            field.tick();
            assert!(field.len() <= max, "grew past the max target");
        }
        assert_eq!(field.len(), max);
        assert_eq!(field.phase(), Phase::Shrinking);
    }

    #[test]
    fn test_shrink_floors() {
        let mut params = eager_params();
        params.removals_per_tick = 50;
        let mut field = PointField::new(params, 42);
        field.init(800.0, 600.0);

        // Grow to the max target, then shrink all the way down
        while field.phase() == Phase::Growing {
            field.tick();
        }
        let min = field.min_target();
        loop {
            let before_phase = field.phase();
            field.tick();
            assert!(field.len() >= min.min(field.min_target()));
            assert!(field.len() >= BOUNDARY_ANCHORS);
            if before_phase == Phase::Shrinking && field.phase() == Phase::Growing {
                break;
            }
        }
    }

    #[test]
    fn test_touch_tier_is_frozen() {
        let mut field = PointField::new(RenderProfile::Touch.params(), 42);
        field.init(400.0, 700.0);
        let count = field.len();

        for _ in 0..1000 {
            field.tick();
        }
        // Zero add probability and zero removals: only phase flips can occur
        assert_eq!(field.len(), count);
    }

    #[test]
    fn test_rescale_proportional() {
        let mut field = PointField::new(desktop_params(), 42);
        field.init(800.0, 600.0);
        let before: Vec<DVec2> = field.points().to_vec();

        assert!(field.rescale(400.0, 300.0));
        for (old, new) in before.iter().zip(field.points()) {
            assert!((new.x - old.x * 0.5).abs() < 1e-12);
            assert!((new.y - old.y * 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rescale_unchanged_size_is_noop() {
        let mut field = PointField::new(desktop_params(), 42);
        field.init(800.0, 600.0);
        assert!(!field.rescale(800.0, 600.0));
    }

    #[test]
    fn test_rescale_clamps_non_finite() {
        let mut field = PointField::new(desktop_params(), 42);
        field.init(800.0, 600.0);
        field.points_mut().push(DVec2::new(f64::NAN, f64::INFINITY));

        field.rescale(400.0, 300.0);
        let last = *field.points().last().unwrap();
        assert_eq!(last, DVec2::ZERO);
    }
}
