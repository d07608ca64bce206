//! Rendering surface and frame loop
//!
//! The shading policy lives here so it can be tested on the host: line
//! positions arrive in device pixels and the vertex stage maps them through
//! the resolution uniform into clip space (Y flipped, screen-style); the
//! fragment stage attenuates a fixed base color by layer depth, fading nested
//! inner outlines for a pseudo-3D look.
//!
//! The WebGL backend itself only compiles for wasm32. On setup failure the
//! background simply does not appear; nothing retries and nothing panics.

#[cfg(target_arch = "wasm32")]
mod webgl;

#[cfg(target_arch = "wasm32")]
pub use webgl::{start_background, Background};

/// Vertex stage: device-pixel position -> clip space, pass depth through
pub const VERT_SHADER: &str = r#"
attribute vec2 a_pos;
attribute float a_depth_val;
uniform vec2 u_res;
varying float v_depth_val;

void main() {
  vec2 zero_to_one = a_pos / u_res;
  vec2 clip_space = (zero_to_one * 2.0 - 1.0) * vec2(1.0, -1.0);
  gl_Position = vec4(clip_space, 0.0, 1.0);
  v_depth_val = a_depth_val;
}
"#;

/// Fragment stage: base color with depth-attenuated alpha
pub const FRAG_SHADER: &str = r#"
precision mediump float;
uniform vec4 u_clr;
varying float v_depth_val;

void main() {
  float alpha_mod = 1.0 - v_depth_val * 0.99;
  alpha_mod = max(0.05, alpha_mod);
  gl_FragColor = vec4(u_clr.rgb, u_clr.a * alpha_mod);
}
"#;

/// Line base color (light grey), RGBA in [0,1]
pub const BASE_COLOR: [f32; 4] = [210.0 / 255.0, 210.0 / 255.0, 210.0 / 255.0, 1.0];

/// Surface clear color (near-black grey), RGBA in [0,1]
pub const CLEAR_COLOR: [f32; 4] = [30.0 / 255.0, 30.0 / 255.0, 30.0 / 255.0, 1.0];

/// Host-side mirror of the fragment stage's alpha attenuation
///
/// Outermost layers (depth 0) draw fully opaque; the deepest nested layers
/// bottom out at 5% alpha instead of vanishing.
pub fn depth_alpha(depth: f32) -> f32 {
    (1.0 - depth * 0.99).max(0.05)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_alpha_endpoints() {
        assert_eq!(depth_alpha(0.0), 1.0);
        assert!((depth_alpha(1.0) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_depth_alpha_monotonic_with_floor() {
        let mut prev = f32::MAX;
        for i in 0..=10 {
            let a = depth_alpha(i as f32 / 10.0);
            assert!(a <= prev);
            assert!(a >= 0.05);
            prev = a;
        }
    }

    #[test]
    fn test_shader_sources_reference_expected_symbols() {
        assert!(VERT_SHADER.contains("a_pos"));
        assert!(VERT_SHADER.contains("u_res"));
        assert!(FRAG_SHADER.contains("u_clr"));
        assert!(FRAG_SHADER.contains("v_depth_val"));
    }
}
