//! Headless parallax demo -- pans the base camera and prints what each layer
//! renderer was told.
//!
//! Run with:
//!   RUST_LOG=stratum_engine=debug,stratum_layer=debug cargo run --example parallax_demo -p stratum-engine

use std::rc::Rc;

use stratum_engine::prelude::*;
use tracing_subscriber::EnvFilter;

const SCENE: &str = r#"{
    "name": "Parallax",
    "layers": [
        { "name": "Sky", "ambientLightColorR": 40, "ambientLightColorG": 60, "ambientLightColorB": 120 },
        { "name": "" },
        {
            "name": "Foreground",
            "followBaseLayerCamera": true,
            "effects": [
                { "name": "heat", "effectType": "Wave", "doubleParameters": { "amplitude": 4, "speed": 2 } }
            ]
        },
        { "name": "HUD" }
    ]
}"#;

fn pan_and_zoom(scene: &mut Scene) {
    let Some(base) = scene.layer_mut("") else {
        return;
    };
    let x = base.camera_x(DEFAULT_CAMERA);
    base.set_camera_x(x + 4.0, DEFAULT_CAMERA);
    let zoom = base.camera_zoom(DEFAULT_CAMERA);
    base.set_camera_zoom(zoom * 1.005, DEFAULT_CAMERA);
}

fn drift_sky(scene: &mut Scene) {
    // The sky scrolls at a quarter of the base speed.
    if let Some(sky) = scene.layer_mut("Sky") {
        let x = sky.camera_x(DEFAULT_CAMERA);
        sky.set_camera_x(x + 1.0, DEFAULT_CAMERA);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let scene = Scene::from_json(
        SCENE,
        &SceneConfig::default(),
        Rc::new(StandardEffectsManager::with_builtin_filters()),
    )?;

    let mut frames = FrameLoop::new(scene, FrameConfig::default());
    frames.add_system("pan_and_zoom", pan_and_zoom);
    frames.add_system("drift_sky", drift_sky);

    let start = frames.scene().capture_snapshot();
    frames.run_frames(120);

    let scene = frames.scene();
    println!(
        "{} frames ({:.0} ms), {:?}",
        frames.frame_count(),
        frames.elapsed_time_ms(),
        frames.last_diagnostics().total_time
    );
    for name in scene.layer_names() {
        let Some(record) = scene.renderer().layer_state(name) else {
            continue;
        };
        let camera = record.camera.unwrap_or_default();
        println!(
            "{:>12} target={} camera=({:.1}, {:.1}) zoom={:.3} frames={}",
            format!("{name:?}"),
            record.render_target.0,
            camera.x,
            camera.y,
            camera.zoom,
            record.frames_prepared
        );
    }

    let pointer = Point::new(400.0, 300.0);
    if let Some(world) = scene.convert_coords("Foreground", pointer) {
        println!("pointer {pointer:?} is at {world:?} on Foreground");
    }

    let mut scene = frames.into_scene();
    scene.restore_from_snapshot(&start)?;
    println!("restored to {}", &start.hash[..16]);
    Ok(())
}
