//! Mesh statistics for every draw style on a deterministic scene

use voronoi_lines::*;

fn main() -> Result<()> {
    println!("=== voronoi-lines mesh stats ===\n");

    let config = BackgroundConfigBuilder::new()
        .seed(12345)
        .profile(RenderProfile::Desktop)
        .pixel_ratio(2.0)?
        .build()?;

    let mut scene = Scene::new(config);
    scene.handle_resize(800.0, 600.0);

    println!(
        "points after init: {} ({} anchors + interior fill)",
        scene.field().len(),
        BOUNDARY_ANCHORS
    );
    println!(
        "targets: {}..{}\n",
        scene.field().min_target(),
        scene.field().max_target()
    );

    // Grow the field a little so the diagram has some body
    for frame in 0..600u32 {
        scene.advance(frame as f64 * 50.0);
    }
    println!("points after warmup: {}\n", scene.field().len());

    for i in 0..STYLES.len() {
        let mesh = scene.advance(1e9 + i as f64);
        let max_depth = mesh.depths.iter().cloned().fold(0.0f32, f32::max);
        let segment_count = mesh.segment_count();
        let vertex_count = mesh.vertex_count();
        let style = STYLES[scene.style_index()];
        println!(
            "style {:12} segments {:6}  vertices {:6}  max depth {:.2}",
            style.name, segment_count, vertex_count, max_depth,
        );
        scene.handle_click();
    }

    Ok(())
}
