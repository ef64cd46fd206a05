use spectra_core::*;

fn light_params() -> GridParams {
    let mut params = GridParams::default();
    params.set(ParamKey::ParticleCount, 1000.0).unwrap();
    params.set(ParamKey::GridDensity, 50.0).unwrap();
    params
}

fn viz() -> Visualizer {
    Visualizer::new(light_params(), Viewport { width: 800, height: 600 }, 1)
}

#[test]
fn frames_without_audio_are_idle() {
    let mut v = viz();
    let vertices = v.grid().vertices().to_vec();
    let yaw = v.orbit().rotation_y;
    for _ in 0..10 {
        assert_eq!(v.update(1.0 / 60.0, None), FrameStatus::Idle);
    }
    assert_eq!(v.time(), 0.0);
    assert_eq!(v.orbit().rotation_y, yaw);
    assert_eq!(v.grid().vertices(), &vertices[..]);
}

#[test]
fn frame_with_audio_updates_field_and_clock() {
    let mut v = viz();
    let mut buffer = [0u8; 128];
    for b in buffer.iter_mut().take(12) {
        *b = 255;
    }
    assert_eq!(v.update(0.5, Some(&buffer[..])), FrameStatus::Updated);
    assert_eq!(v.field().side(), 12);
    assert!((v.bass_intensity() - 1.0).abs() < 1e-6);
    assert!((v.time() - 0.5).abs() < 1e-6);
    assert!((v.pulse() - 1.5).abs() < 1e-6);
    assert!(v.orbit().rotation_y > 0.0);
}

#[test]
fn animation_speed_scales_the_clock() {
    let mut v = viz();
    v.set(ParamKey::AnimationSpeed, 2.0).unwrap();
    v.update(0.25, Some(&[0u8; 64][..]));
    assert!((v.time() - 0.5).abs() < 1e-6);
}

#[test]
fn shape_params_regenerate_particles() {
    let mut v = viz();
    let generation = v.particles().generation();
    v.set_param("particleSpread", 15.0).unwrap();
    assert_eq!(v.particles().generation(), generation + 1);
    assert_eq!(v.particles().shape().spread, 15.0);
}

#[test]
fn kinetic_params_do_not_regenerate() {
    let mut v = viz();
    let generation = v.particles().generation();
    let grid_generation = v.grid().generation();
    v.set_param("particleSpeed", 1.5).unwrap();
    v.set_param("particlePulseIntensity", 1.5).unwrap();
    v.set_param("maxHeight", 3.0).unwrap();
    assert_eq!(v.particles().generation(), generation);
    assert_eq!(v.grid().generation(), grid_generation);
}

#[test]
fn rewriting_same_value_is_a_no_op() {
    let mut v = viz();
    let generation = v.particles().generation();
    v.set(ParamKey::ParticleCount, 1000.0).unwrap();
    v.set(ParamKey::ParticleCount, 900.0).unwrap(); // clamps back to 1000
    assert_eq!(v.particles().generation(), generation);
}

#[test]
fn density_param_rebuilds_grid() {
    let mut v = viz();
    v.set(ParamKey::GridDensity, 100.0).unwrap();
    assert_eq!(v.grid().grid_lines(), 100);
    assert_eq!(v.grid().lines().len(), 2 * 99);
}

#[test]
fn analyser_settings_are_drained_once_per_change() {
    let mut v = viz();
    assert!(v.take_analyser_settings().is_some());
    assert!(v.take_analyser_settings().is_none());
    v.set(ParamKey::SmoothingTimeConstant, 0.8).unwrap();
    let settings = v.take_analyser_settings().unwrap();
    assert!((settings.smoothing - 0.8).abs() < 1e-6);
    assert!(v.take_analyser_settings().is_none());
}

#[test]
fn resize_widens_grid_and_ignores_zero() {
    let mut v = viz();
    assert!((v.grid().grid_size() - 4.0 * 800.0 / 600.0).abs() < 1e-5);
    v.resize(1600, 400);
    assert!((v.grid().grid_size() - 16.0).abs() < 1e-5);
    v.resize(0, 400);
    assert_eq!(v.viewport(), Viewport { width: 1600, height: 400 });
    v.resize(400, 800);
    assert!((v.grid().grid_size() - 4.0).abs() < 1e-5);
}

#[test]
fn wheel_keeps_zoom_param_in_sync() {
    let mut v = viz();
    v.wheel(-500.0);
    assert!((v.params().zoom() - 1.5).abs() < 1e-5);
    assert_eq!(v.params().zoom(), v.orbit().zoom());
    v.set(ParamKey::Zoom, 3.0).unwrap();
    assert_eq!(v.orbit().zoom(), 3.0);
}

#[test]
fn import_replaces_and_applies_everything() {
    let mut v = viz();
    v.take_analyser_settings();
    v.import_params([("particleCount", 2000.0), ("zoom", 2.0)]);
    assert_eq!(v.particles().len(), 2000);
    assert_eq!(v.orbit().zoom(), 2.0);
    // Grid density falls back to its default.
    assert_eq!(v.grid().grid_lines(), 200);
    assert!(v.take_analyser_settings().is_some());
    assert_eq!(v.export_params()["particleCount"], 2000.0);
}

#[test]
fn drag_then_reset_view() {
    let mut v = viz();
    v.pointer_down(10.0, 10.0);
    v.pointer_move(60.0, 10.0);
    v.pointer_up();
    assert!(!v.orbit().auto_rotate);
    v.reset_view();
    assert!(v.orbit().auto_rotate);
    assert_eq!(v.orbit().rotation_y, 0.0);
}

#[test]
fn view_projection_is_finite() {
    let v = viz();
    assert!(v.view_proj().is_finite());
    assert!((v.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
}
