//! Scene snapshot tests: capture, restore, hash verification and JSON
//! round trips.

use std::rc::Rc;

use stratum_engine::prelude::*;

fn scene() -> Scene {
    Scene::from_json(
        r#"{
            "name": "snap",
            "layers": [
                { "name": "" },
                {
                    "name": "fx",
                    "effects": [
                        { "name": "blur", "effectType": "Blur", "doubleParameters": { "blur": 2 } },
                        { "name": "tint", "effectType": "ColorTint",
                          "stringParameters": { "color": "10;20;30" } }
                    ]
                }
            ]
        }"#,
        &SceneConfig::default(),
        Rc::new(StandardEffectsManager::with_builtin_filters()),
    )
    .unwrap()
}

fn scramble(scene: &mut Scene) {
    scene.set_elapsed_time(99.0);
    let fx = scene.layer_mut("fx").unwrap();
    fx.set_camera_x(-50.0, DEFAULT_CAMERA);
    fx.set_camera_rotation(90.0, DEFAULT_CAMERA);
    fx.set_time_scale(3.0);
    fx.set_default_z_order(7);
    fx.show(false);
    fx.set_clear_color(1, 2, 3);
    fx.remove_effect("blur");
    fx.add_effect(&EffectData::new("wave", WAVE_EFFECT));
    fx.enable_effect("tint", false);
}

#[test]
fn hash_is_stable_and_content_based() {
    let scene = scene();
    let a = scene.capture_snapshot();
    let b = scene.capture_snapshot();
    assert_eq!(a.hash, b.hash);
    assert_eq!(a.hash, scene.state_hash());
    assert_eq!(a.hash.len(), 64);
    assert!(a.hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(a.scene, "snap");
    assert_eq!(a.layers.len(), 2);
}

#[test]
fn restore_undoes_changes() {
    let mut scene = scene();
    let snapshot = scene.capture_snapshot();

    scramble(&mut scene);
    assert_ne!(scene.state_hash(), snapshot.hash);

    scene.restore_from_snapshot(&snapshot).unwrap();
    assert_eq!(scene.state_hash(), snapshot.hash);

    let fx = scene.layer("fx").unwrap();
    assert!(fx.is_visible());
    assert_eq!(fx.time_scale(), 1.0);
    assert_eq!(fx.effects().names(), vec!["blur", "tint"]);
    assert!(fx.is_effect_enabled("tint"));
    assert!(!fx.has_effect("wave"));
    assert_eq!(scene.elapsed_time(), 0.0);
}

#[test]
fn restore_notifies_renderer() {
    let mut scene = scene();
    let snapshot = scene.capture_snapshot();
    scramble(&mut scene);
    scene.restore_from_snapshot(&snapshot).unwrap();

    let record = scene.renderer().layer_state("fx").unwrap();
    assert!(record.visible);
    assert_eq!(record.clear_color, ClearColor::from_rgb8(0, 0, 0));
}

#[test]
fn restore_brings_back_resolution_without_shifting_cameras() {
    let mut scene = scene();
    let snapshot = scene.capture_snapshot();
    scene.set_game_resolution(1920.0, 1080.0).unwrap();

    scene.restore_from_snapshot(&snapshot).unwrap();
    assert_eq!(scene.game_resolution(), (800.0, 600.0));
    assert_eq!(scene.layer("").unwrap().camera_x(DEFAULT_CAMERA), 400.0);
    assert_eq!(scene.layer("").unwrap().camera_y(DEFAULT_CAMERA), 300.0);
}

#[test]
fn tampered_snapshot_is_rejected() {
    let mut scene = scene();
    let mut snapshot = scene.capture_snapshot();
    snapshot.layers[1].camera.x = 1.0;

    let err = scene.restore_from_snapshot(&snapshot).unwrap_err();
    assert!(err.to_string().contains("hash mismatch"), "{err}");
    assert_eq!(scene.layer("fx").unwrap().camera_x(DEFAULT_CAMERA), 400.0);
}

#[test]
fn snapshot_of_unknown_layer_is_rejected() {
    let mut other = Scene::new(
        "other",
        &SceneConfig::default(),
        Rc::new(StandardEffectsManager::with_builtin_filters()),
    )
    .unwrap();
    let snapshot = scene().capture_snapshot();

    let err = other.restore_from_snapshot(&snapshot).unwrap_err();
    assert!(err.to_string().contains("\"fx\""), "{err}");
}

#[test]
fn snapshot_survives_json() {
    let mut scene = scene();
    let snapshot = scene.capture_snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: SceneSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);

    scramble(&mut scene);
    scene.restore_from_snapshot(&parsed).unwrap();
    assert_eq!(scene.state_hash(), snapshot.hash);
}

#[test]
fn non_integer_state_survives_json() {
    let mut scene = scene();
    {
        let base = scene.layer_mut("").unwrap();
        base.set_camera_x(108_052.528_571_428_57, DEFAULT_CAMERA);
        base.set_camera_rotation(137.33, DEFAULT_CAMERA);
        base.set_camera_zoom(1.0 / 3.0, DEFAULT_CAMERA);
    }
    scene.layer_mut("fx").unwrap().set_time_scale(0.7);
    scene.set_elapsed_time(1000.0 / 60.0);
    let snapshot = scene.capture_snapshot();

    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: SceneSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);

    scramble(&mut scene);
    scene.restore_from_snapshot(&parsed).unwrap();
    assert_eq!(scene.state_hash(), snapshot.hash);
}

#[test]
fn many_camera_values_survive_json() {
    let mut scene = scene();
    let mut seed = 0x2545_f491_4f6c_dd1d_u64;
    for i in 0..500 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let k = (seed % 1_000_000) as f64;
        let x = k / 7.0 + 0.1;
        {
            let base = scene.layer_mut("").unwrap();
            base.set_camera_x(x, DEFAULT_CAMERA);
            base.set_camera_y(-x / 11.0, DEFAULT_CAMERA);
            base.set_camera_rotation(x / 3.0, DEFAULT_CAMERA);
        }
        let snapshot = scene.capture_snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: SceneSnapshot = serde_json::from_str(&json).unwrap();

        if let Err(err) = scene.restore_from_snapshot(&parsed) {
            panic!("value #{i} ({x}) failed to restore: {err}");
        }
        assert_eq!(scene.state_hash(), snapshot.hash, "value #{i} ({x})");
    }
}

#[test]
fn wave_phase_is_part_of_the_state() {
    let build = || {
        let mut scene = scene();
        scene
            .layer_mut("fx")
            .unwrap()
            .add_effect(&EffectData::new("wave", WAVE_EFFECT));
        scene
    };

    let mut advanced = build();
    advanced.set_elapsed_time(250.0);
    advanced.update_pre_render();
    let mut still = build();
    still.set_elapsed_time(250.0);
    assert_ne!(advanced.state_hash(), still.state_hash());

    let snapshot = advanced.capture_snapshot();
    advanced.update_pre_render();
    assert_ne!(advanced.state_hash(), snapshot.hash);

    advanced.restore_from_snapshot(&snapshot).unwrap();
    assert_eq!(advanced.state_hash(), snapshot.hash);
    let wave = advanced.layer("fx").unwrap().effects().get("wave").unwrap();
    assert_eq!(wave.parameter("time"), Some(&ParamValue::Double(0.25)));
}
