//! Integration tests for scenes: layer bookkeeping, the frame context seen
//! by layers, and coordinate conversion through the scene.

use std::rc::Rc;

use stratum_engine::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const LEVEL: &str = r#"{
    "name": "Level 1",
    "layers": [
        { "name": "" },
        { "name": "Background", "followBaseLayerCamera": true },
        { "name": "HUD", "visibility": false, "ambientLightColorR": 255 },
        {
            "name": "Lights",
            "isLightingLayer": true,
            "effects": [
                { "name": "soft", "effectType": "Blur", "doubleParameters": { "blur": 4 } },
                { "name": "glow", "effectType": "Glow" }
            ]
        }
    ]
}"#;

fn manager() -> Rc<dyn EffectsManager> {
    Rc::new(StandardEffectsManager::with_builtin_filters())
}

fn level() -> Scene {
    Scene::from_json(LEVEL, &SceneConfig::default(), manager()).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn layers_are_created_in_order() {
    let scene = level();
    assert_eq!(scene.name(), "Level 1");
    assert_eq!(scene.layer_names(), vec!["", "Background", "HUD", "Lights"]);
    assert_eq!(scene.renderer().layer_count(), 4);
}

#[test]
fn cameras_start_on_viewport_origin() {
    let scene = level();
    for name in scene.layer_names() {
        let layer = scene.layer(name).unwrap();
        assert_eq!(layer.camera_x(DEFAULT_CAMERA), 400.0, "layer {name:?}");
        assert_eq!(layer.camera_y(DEFAULT_CAMERA), 300.0, "layer {name:?}");
        assert_eq!(layer.camera_zoom(DEFAULT_CAMERA), 1.0, "layer {name:?}");
    }
}

#[test]
fn missing_base_layer_is_rejected() {
    let err = Scene::from_json(
        r#"{ "layers": [{ "name": "Background" }] }"#,
        &SceneConfig::default(),
        manager(),
    )
    .unwrap_err();
    assert!(
        matches!(err, SceneError::Layer(LayerError::MissingBaseLayer)),
        "got {err:?}"
    );
}

#[test]
fn duplicate_layers_are_rejected() {
    let err = Scene::from_json(
        r#"{ "layers": [{ "name": "" }, { "name": "A" }, { "name": "A" }] }"#,
        &SceneConfig::default(),
        manager(),
    )
    .unwrap_err();
    match err {
        SceneError::Layer(LayerError::DuplicateLayer { name }) => assert_eq!(name, "A"),
        other => panic!("expected DuplicateLayer, got {other:?}"),
    }

    let mut scene = level();
    assert!(scene.add_layer(&LayerData::new("HUD")).is_err());
    assert_eq!(scene.layer_count(), 4);
}

#[test]
fn invalid_config_is_rejected() {
    let config = SceneConfig {
        game_resolution_width: -1.0,
        ..SceneConfig::default()
    };
    assert!(matches!(
        Scene::new("bad", &config, manager()),
        Err(SceneError::InvalidConfig { .. })
    ));
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        Scene::from_json("{ not json", &SceneConfig::default(), manager()),
        Err(SceneError::Parse(_))
    ));
}

// ---------------------------------------------------------------------------
// Removal
// ---------------------------------------------------------------------------

#[test]
fn base_layer_cannot_be_removed() {
    let mut scene = level();
    assert!(matches!(
        scene.remove_layer(""),
        Err(SceneError::Layer(LayerError::BaseLayerRemoval))
    ));
    assert!(scene.has_layer(""));
}

#[test]
fn removing_unknown_layer_lists_existing() {
    let mut scene = level();
    match scene.remove_layer("Nope") {
        Err(SceneError::Layer(LayerError::UnknownLayer { name, existing })) => {
            assert_eq!(name, "Nope");
            assert!(existing.contains("\"Background\""), "{existing}");
        }
        other => panic!("expected UnknownLayer, got {other:?}"),
    }
}

#[test]
fn removing_a_layer_drops_its_renderer_record() {
    let mut scene = level();
    scene.remove_layer("HUD").unwrap();
    assert!(!scene.has_layer("HUD"));
    assert!(scene.renderer().layer_state("HUD").is_none());
    assert_eq!(scene.layer_names(), vec!["", "Background", "Lights"]);
}

// ---------------------------------------------------------------------------
// Renderer and effects
// ---------------------------------------------------------------------------

#[test]
fn renderer_receives_initial_state() {
    let scene = level();
    let hud = scene.renderer().layer_state("HUD").unwrap();
    assert!(!hud.visible);
    assert_eq!(hud.visibility_updates, 1);
    assert_eq!(hud.clear_color.rgba(), [1.0, 0.0, 0.0, 1.0]);

    let lights = scene.renderer().layer_state("Lights").unwrap();
    assert!(lights.visible);
    assert!(lights.is_lighting_layer);
    assert_eq!(lights.frames_prepared, 0);
}

#[test]
fn unknown_effect_types_are_skipped() {
    let scene = level();
    let lights = scene.layer("Lights").unwrap();
    assert!(lights.has_effect("soft"));
    assert!(!lights.has_effect("glow"));
    assert_eq!(lights.initial_effects_data().len(), 2);
    assert_eq!(
        lights.effects().get("soft").unwrap().parameter("blur"),
        Some(&ParamValue::Double(4.0))
    );
}

#[test]
fn update_pre_render_prepares_every_layer() {
    let mut scene = level();
    scene.layer_mut("").unwrap().set_camera_x(420.0, DEFAULT_CAMERA);
    scene.update_pre_render();

    for name in ["", "Background", "HUD", "Lights"] {
        let state = scene.renderer().layer_state(name).unwrap();
        assert_eq!(state.frames_prepared, 1, "layer {name:?}");
    }
    let background = scene.renderer().layer_state("Background").unwrap();
    assert_eq!(background.camera.map(|c| c.x), Some(420.0));
    assert!(close(background.view_matrix[4], -20.0));
    let hud = scene.renderer().layer_state("HUD").unwrap();
    assert_eq!(hud.camera.map(|c| c.x), Some(400.0));
}

#[test]
fn follower_copies_whole_base_camera() {
    let mut scene = level();
    {
        let base = scene.layer_mut("").unwrap();
        base.set_camera_x(10.0, DEFAULT_CAMERA);
        base.set_camera_y(-20.0, DEFAULT_CAMERA);
        base.set_camera_rotation(45.0, DEFAULT_CAMERA);
        base.set_camera_zoom(2.0, DEFAULT_CAMERA);
    }
    scene.update_pre_render();

    let background = scene.layer("Background").unwrap();
    assert_eq!(background.camera_state(DEFAULT_CAMERA), scene.layer("").unwrap().camera_state(DEFAULT_CAMERA));
    // Non-followers keep their own camera.
    assert_eq!(scene.layer("HUD").unwrap().camera_x(DEFAULT_CAMERA), 400.0);
}

// ---------------------------------------------------------------------------
// Frame context
// ---------------------------------------------------------------------------

#[test]
fn layer_elapsed_time_applies_time_scale() {
    let mut scene = level();
    scene.set_elapsed_time(20.0);
    scene.layer_mut("HUD").unwrap().set_time_scale(0.5);
    assert_eq!(scene.layer_elapsed_time("HUD"), Some(10.0));
    assert_eq!(scene.layer_elapsed_time(""), Some(20.0));
    assert_eq!(scene.layer_elapsed_time("Nope"), None);
}

#[test]
fn resizing_keeps_cameras_anchored() {
    let mut scene = level();
    scene.layer_mut("HUD").unwrap().set_camera_x(100.0, DEFAULT_CAMERA);
    scene.set_game_resolution(1000.0, 800.0).unwrap();

    assert_eq!(scene.game_resolution(), (1000.0, 800.0));
    assert_eq!(scene.viewport().origin, Point::new(500.0, 400.0));
    let base = scene.layer("").unwrap();
    assert_eq!(base.camera_x(DEFAULT_CAMERA), 500.0);
    assert_eq!(base.camera_y(DEFAULT_CAMERA), 400.0);
    assert_eq!(scene.layer("HUD").unwrap().camera_x(DEFAULT_CAMERA), 200.0);
}

#[test]
fn invalid_resolution_changes_nothing() {
    let mut scene = level();
    assert!(scene.set_game_resolution(0.0, 600.0).is_err());
    assert!(scene.set_game_resolution(800.0, f64::INFINITY).is_err());
    assert_eq!(scene.game_resolution(), (800.0, 600.0));
    assert_eq!(scene.layer("").unwrap().camera_x(DEFAULT_CAMERA), 400.0);
}

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

#[test]
fn convert_coords_goes_through_the_layer_camera() {
    let mut scene = level();
    scene.layer_mut("").unwrap().set_camera_zoom(2.0, DEFAULT_CAMERA);

    let p = scene.convert_coords("", Point::new(500.0, 300.0)).unwrap();
    assert!(close(p.x, 450.0) && close(p.y, 300.0), "{p:?}");

    let back = scene.convert_inverse_coords("", p).unwrap();
    assert!(close(back.x, 500.0) && close(back.y, 300.0), "{back:?}");

    assert!(scene.convert_coords("Nope", Point::default()).is_none());
}

#[test]
fn layer_transformation_round_trips() {
    let mut scene = level();
    {
        let hud = scene.layer_mut("HUD").unwrap();
        hud.set_camera_rotation(30.0, DEFAULT_CAMERA);
        hud.set_camera_zoom(1.5, DEFAULT_CAMERA);
    }
    let p = Point::new(123.0, -45.0);
    let screen = scene.apply_layer_transformation("HUD", p).unwrap();
    let back = scene.apply_layer_inverse_transformation("HUD", screen).unwrap();
    assert!((back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9);
}

#[test]
fn camera_size_follows_zoom() {
    let mut scene = level();
    assert_eq!(scene.camera_size(""), Some((800.0, 600.0)));
    scene.layer_mut("").unwrap().set_camera_zoom(2.0, DEFAULT_CAMERA);
    assert_eq!(scene.camera_size(""), Some((400.0, 300.0)));
    assert_eq!(scene.camera_size("Nope"), None);
}
