use cgmath::{InnerSpace, MetricSpace, Point3};
use plug_scene::{
    camera::{Projection, ProjectionMode},
    input::{self, InputOutcome},
    render::frame_uniforms,
    scene::reference_scene,
    settings::Settings,
    state::AppState,
};
use plug_scene::winit::{event::MouseScrollDelta, keyboard::KeyCode};

const EPS: f32 = 1e-4;

fn step(state: &mut AppState, dt: f32) -> InputOutcome {
    state.frame.delta_time = dt;
    input::process_input(state)
}

#[test]
fn walking_a_square_returns_home() {
    let mut state = AppState::new(&Settings::default());
    let home = state.camera.position;

    for key in [KeyCode::KeyW, KeyCode::KeyD, KeyCode::KeyS, KeyCode::KeyA] {
        state.keys.press(key);
        for _ in 0..10 {
            assert_eq!(step(&mut state, 0.05), InputOutcome::Continue);
        }
        state.keys.release(key);
    }

    assert!(state.camera.position.distance(home) < EPS);
}

#[test]
fn looking_up_then_moving_forward_climbs() {
    let mut state = AppState::default();
    // First event only seeds the tracker.
    input::handle_cursor_moved(&mut state, 400.0, 300.0);
    // 300 px up at sensitivity 0.1 is 30 degrees of pitch.
    input::handle_cursor_moved(&mut state, 400.0, 0.0);
    assert!((state.camera.pitch().0 - 30.0).abs() < EPS);

    state.keys.press(KeyCode::KeyW);
    step(&mut state, 1.0);
    let moved = state.camera.position - Point3::new(0.0, 0.0, 3.0);
    assert!((moved.magnitude() - 2.5).abs() < EPS);
    assert!(moved.y > 1.2);
}

#[test]
fn pitch_never_passes_the_limit() {
    let mut state = AppState::default();
    input::handle_cursor_moved(&mut state, 0.0, 0.0);
    input::handle_cursor_moved(&mut state, 0.0, -100_000.0);
    assert_eq!(state.camera.pitch().0, 89.0);
    input::handle_cursor_moved(&mut state, 0.0, 100_000.0);
    assert_eq!(state.camera.pitch().0, -89.0);
    assert!(state.camera.front().y.abs() < 1.0);
}

#[test]
fn scrolling_keeps_the_projection_fixed() {
    let scene = reference_scene();
    let mut state = AppState::default();
    let before = frame_uniforms(&state.camera, &state.frame.projection, &scene)[0].projection;
    // cot(22.5°): a 45° vertical field of view.
    assert!((before[1][1] - 2.414_213_5).abs() < EPS);

    input::handle_scroll(&mut state, MouseScrollDelta::LineDelta(0.0, 20.0));
    assert_eq!(state.camera.zoom().0, 25.0);
    let after = frame_uniforms(&state.camera, &state.frame.projection, &scene)[0].projection;
    assert_eq!(before, after);

    state.keys.press(KeyCode::KeyP);
    step(&mut state, 0.0);
    state.keys.release(KeyCode::KeyP);
    let ortho_a = frame_uniforms(&state.camera, &state.frame.projection, &scene)[0].projection;
    input::handle_scroll(&mut state, MouseScrollDelta::LineDelta(0.0, -20.0));
    let ortho_b = frame_uniforms(&state.camera, &state.frame.projection, &scene)[0].projection;
    assert_eq!(ortho_a, ortho_b);

    state.keys.press(KeyCode::KeyO);
    step(&mut state, 0.0);
    let restored = frame_uniforms(&state.camera, &state.frame.projection, &scene)[0].projection;
    assert_eq!(restored, before);
}

#[test]
fn projection_mode_sticks_between_frames() {
    let mut state = AppState::default();
    state.keys.press(KeyCode::KeyP);
    step(&mut state, 0.016);
    state.keys.release(KeyCode::KeyP);
    for _ in 0..5 {
        step(&mut state, 0.016);
        assert_eq!(state.frame.projection.mode(), ProjectionMode::Orthographic);
    }
    state.keys.press(KeyCode::KeyO);
    step(&mut state, 0.016);
    assert_eq!(state.frame.projection, Projection::new(800, 600));
}

#[test]
fn escape_wins_over_movement() {
    let mut state = AppState::default();
    let start = state.camera.position;
    state.keys.press(KeyCode::KeyW);
    state.keys.press(KeyCode::Escape);
    assert_eq!(step(&mut state, 1.0), InputOutcome::Exit);
    assert_eq!(state.camera.position, start);
}
