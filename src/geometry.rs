//! Polygon utilities for Voronoi cell expansion
//!
//! Pure functions over vertex lists in logical-pixel space. All of them are
//! degenerate-safe: empty or undersized polygons produce neutral defaults
//! rather than errors, because the mesh builder feeds them whatever the
//! clipped Voronoi diagram happens to emit.

use glam::DVec2;

/// Arithmetic-mean centroid of a polygon
///
/// Returns `(0, 0)` for an empty polygon. This is the vertex average, not the
/// area centroid; cells are near-convex so the difference is invisible and
/// the average is cheaper.
pub fn centroid(poly: &[DVec2]) -> DVec2 {
    if poly.is_empty() {
        return DVec2::ZERO;
    }
    let sum: DVec2 = poly.iter().copied().sum();
    sum / poly.len() as f64
}

/// Perimeter of a closed polygon (wrapping last vertex back to first)
///
/// Edges with a non-finite length are skipped rather than propagated, so a
/// single bad vertex cannot poison the total. Polygons with fewer than two
/// vertices have perimeter 0.
pub fn perimeter(poly: &[DVec2]) -> f64 {
    if poly.len() < 2 {
        return 0.0;
    }
    let mut perim = 0.0;
    for i in 0..poly.len() {
        let p1 = poly[i];
        let p2 = poly[(i + 1) % poly.len()];
        let d = p2 - p1;
        if d.x.is_finite() && d.y.is_finite() {
            perim += d.length();
        }
    }
    perim
}

/// Rigid/scaled transform of a polygon about a center point
///
/// Translates the polygon so `center` sits at the origin, rotates by `angle`
/// radians, applies a uniform `scale`, and translates back. The rotation is
/// skipped entirely when `angle == 0` to avoid the floating round-trip drift
/// of multiplying by cos/sin of zero.
pub fn transform(poly: &[DVec2], center: DVec2, scale: f64, angle: f64) -> Vec<DVec2> {
    let (sin_a, cos_a) = angle.sin_cos();
    poly.iter()
        .map(|&p| {
            let mut v = p - center;
            if angle != 0.0 {
                v = DVec2::new(v.x * cos_a - v.y * sin_a, v.x * sin_a + v.y * cos_a);
            }
            v * scale + center
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
        ]
    }

    #[test]
    fn test_centroid_empty() {
        assert_eq!(centroid(&[]), DVec2::ZERO);
    }

    #[test]
    fn test_centroid_square() {
        assert_eq!(centroid(&square()), DVec2::new(1.0, 1.0));
    }

    #[test]
    fn test_perimeter_degenerate() {
        assert_eq!(perimeter(&[]), 0.0);
        assert_eq!(perimeter(&[DVec2::new(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_perimeter_square() {
        assert_eq!(perimeter(&square()), 8.0);
    }

    #[test]
    fn test_perimeter_skips_non_finite_edges() {
        let poly = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(f64::NAN, 0.0),
        ];
        // Only the first edge is finite on both ends
        let perim = perimeter(&poly);
        assert!(perim.is_finite());
        assert_eq!(perim, 1.0);
    }

    #[test]
    fn test_transform_identity() {
        let poly = square();
        let out = transform(&poly, centroid(&poly), 1.0, 0.0);
        assert_eq!(out, poly);
    }

    #[test]
    fn test_transform_scale_about_center_is_exact() {
        let poly = square();
        let c = centroid(&poly);
        let out = transform(&poly, c, 0.5, 0.0);
        for (orig, scaled) in poly.iter().zip(out.iter()) {
            let expected = (*orig - c) * 0.5 + c;
            // angle == 0 must not introduce any rotation error
            assert_eq!(*scaled, expected);
        }
    }

    #[test]
    fn test_transform_rotation_quarter_turn() {
        let poly = vec![DVec2::new(2.0, 1.0)];
        let out = transform(&poly, DVec2::new(1.0, 1.0), 1.0, std::f64::consts::FRAC_PI_2);
        assert!((out[0].x - 1.0).abs() < 1e-12);
        assert!((out[0].y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_preserves_centroid() {
        let poly = square();
        let c = centroid(&poly);
        let out = transform(&poly, c, 0.7, 1.3);
        let c2 = centroid(&out);
        assert!((c - c2).length() < 1e-12);
    }
}
