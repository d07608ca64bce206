//! Traces the point-set breathing cycle over simulated frames

use voronoi_lines::*;

fn main() -> Result<()> {
    let config = BackgroundConfigBuilder::new()
        .seed(7)
        .profile(RenderProfile::Desktop)
        .build()?;

    let mut scene = Scene::new(config);
    scene.handle_resize(1280.0, 720.0);

    println!("=== voronoi-lines animation trace ===");
    println!(
        "start: {} points, targets {}..{}\n",
        scene.field().len(),
        scene.field().min_target(),
        scene.field().max_target()
    );

    let mut last_phase = scene.field().phase();
    for frame in 0..20_000u32 {
        // 60 fps timeline; the 45 ms tick gate thins this out internally
        scene.advance(frame as f64 * (1000.0 / 60.0));

        let phase = scene.field().phase();
        if phase != last_phase {
            println!(
                "frame {:6}: {:?} -> {:?} at {} points (targets {}..{})",
                frame,
                last_phase,
                phase,
                scene.field().len(),
                scene.field().min_target(),
                scene.field().max_target()
            );
            last_phase = phase;
        }
    }

    let mesh = scene.mesh();
    println!(
        "\nfinal mesh: {} segments from {} points",
        mesh.segment_count(),
        scene.field().len()
    );
    Ok(())
}
