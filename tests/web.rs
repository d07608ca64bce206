#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use voronoi_lines::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn scene_runs_without_gl() {
    // The animation core must work in the browser even when no canvas or
    // context is available; only the renderer needs GL.
    let config = BackgroundConfigBuilder::new().seed(42).build().unwrap();
    let mut scene = Scene::new(config);
    scene.handle_resize(640.0, 480.0);

    let mesh = scene.advance(16.0);
    assert!(!mesh.is_empty());
    assert_eq!(mesh.positions.len(), 2 * mesh.depths.len());
}

#[wasm_bindgen_test]
fn missing_canvas_is_an_error_not_a_panic() {
    assert!(start_background("no-such-canvas", false).is_err());
}
