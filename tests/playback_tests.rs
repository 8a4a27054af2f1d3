use glam::Vec3;

use orbit_viewer::animation::{Channel, ChannelOutputs, Clip, Interpolation};
use orbit_viewer::loaders::LoadedModel;
use orbit_viewer::math::Aabb;
use orbit_viewer::mixer::Direction;
use orbit_viewer::picking::Hit;
use orbit_viewer::scene::{Mesh, Model, Node};
use orbit_viewer::session::{Session, POSE_SYNC_STEP};

const TOLERANCE: f32 = POSE_SYNC_STEP * 2.0;

fn slide_clip(duration: f32) -> Clip {
    Clip {
        name: "page-turn".into(),
        duration,
        channels: vec![Channel {
            target_node: 0,
            times: vec![0.0, duration],
            outputs: ChannelOutputs::Translations(vec![Vec3::ZERO, Vec3::X]),
            interpolation: Interpolation::Linear,
        }],
    }
}

fn clickable_mesh(node: usize) -> Mesh {
    Mesh {
        name: "cover".into(),
        node,
        vertices: vec![],
        indices: vec![],
        base_color: [1.0, 1.0, 1.0],
        bounds: Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
        clickable: true,
    }
}

fn book(clips: Vec<Clip>) -> LoadedModel {
    let model = Model {
        nodes: vec![Node::new("root", None)],
        meshes: vec![clickable_mesh(0)],
    };
    LoadedModel { model, clips }
}

fn hit_on_mesh(mesh: usize) -> Option<Hit> {
    Some(Hit {
        mesh,
        distance: 1.0,
    })
}

fn loaded_session(clips: Vec<Clip>) -> Session {
    let mut session = Session::new();
    session.attach_model(book(clips)).expect("attach succeeds");
    session
}

#[test]
fn direction_flag_alternates_starting_forward() {
    let mut session = loaded_session(vec![slide_clip(2.0)]);
    assert_eq!(session.next_direction(), Direction::Forward);

    let expected = [
        Direction::Reverse,
        Direction::Forward,
        Direction::Reverse,
        Direction::Forward,
    ];
    for next in expected {
        assert!(session.handle_pick(hit_on_mesh(0)));
        assert_eq!(session.next_direction(), next);
    }
}

#[test]
fn reverse_transition_sets_cursor_to_duration_and_rate_to_minus_one() {
    let mut session = loaded_session(vec![slide_clip(2.0), slide_clip(3.5)]);

    assert!(session.handle_pick(hit_on_mesh(0))); // forward
    session.advance(0.25);
    assert!(session.handle_pick(hit_on_mesh(0))); // reverse

    let durations = [2.0, 3.5];
    for (action, duration) in session.mixer.actions().iter().zip(durations) {
        assert!((action.time - duration).abs() < TOLERANCE);
        assert_eq!(action.time_scale, -1.0);
        assert!(!action.paused, "reconfigured action must be playing");
    }
}

#[test]
fn forward_transition_sets_cursor_to_zero_and_rate_to_plus_one() {
    let mut session = loaded_session(vec![slide_clip(2.0)]);

    assert!(session.handle_pick(hit_on_mesh(0)));
    let action = &session.mixer.actions()[0];
    assert!(action.time.abs() < TOLERANCE);
    assert_eq!(action.time_scale, 1.0);
    assert!(!action.paused);
}

#[test]
fn missed_pick_changes_nothing() {
    let mut session = loaded_session(vec![slide_clip(2.0)]);

    assert!(!session.handle_pick(None));
    assert_eq!(session.next_direction(), Direction::Forward);
    let action = &session.mixer.actions()[0];
    assert!(action.paused);
    assert_eq!(action.time, 0.0);
}

#[test]
fn non_clickable_hit_is_a_noop() {
    let mut session = Session::new();
    let mut loaded = book(vec![slide_clip(2.0)]);
    loaded.model.meshes[0].clickable = false;
    session.attach_model(loaded).expect("attach succeeds");

    assert!(!session.handle_pick(hit_on_mesh(0)));
    assert_eq!(session.next_direction(), Direction::Forward);
    assert!(session.mixer.actions()[0].paused);
}

#[test]
fn interaction_with_zero_clips_is_a_noop() {
    let mut session = loaded_session(vec![]);

    assert!(!session.handle_pick(hit_on_mesh(0)));
    assert_eq!(session.next_direction(), Direction::Forward);
}

#[test]
fn degenerate_scale_model_is_rejected_without_actions() {
    let mut session = Session::new();
    let mut loaded = book(vec![slide_clip(2.0)]);
    loaded.model.nodes[0].scale = Vec3::new(1.0, 0.0, 1.0);

    assert!(session.attach_model(loaded).is_err());
    assert!(session.scene.model.is_none(), "rejected model must not be attached");
    assert!(session.mixer.is_empty());

    // Subsequent interactions stay no-ops
    assert!(!session.handle_pick(hit_on_mesh(0)));
    assert_eq!(session.next_direction(), Direction::Forward);
}

#[test]
fn three_click_scenario_with_two_second_clip() {
    let mut session = loaded_session(vec![slide_clip(2.0)]);

    // First click: forward from the start
    assert!(session.handle_pick(hit_on_mesh(0)));
    {
        let action = &session.mixer.actions()[0];
        assert!(action.time.abs() < TOLERANCE);
        assert_eq!(action.time_scale, 1.0);
        assert!(!action.paused);
    }
    session.advance(0.5);

    // Second click: backward from the end
    assert!(session.handle_pick(hit_on_mesh(0)));
    {
        let action = &session.mixer.actions()[0];
        assert!((action.time - 2.0).abs() < TOLERANCE);
        assert_eq!(action.time_scale, -1.0);
        assert!(!action.paused);
    }
    session.advance(0.5);

    // Third click: forward from the start again
    assert!(session.handle_pick(hit_on_mesh(0)));
    let action = &session.mixer.actions()[0];
    assert!(action.time.abs() < TOLERANCE);
    assert_eq!(action.time_scale, 1.0);
    assert!(!action.paused);
}

#[test]
fn playback_runs_to_completion_and_holds() {
    let mut session = loaded_session(vec![slide_clip(2.0)]);

    assert!(session.handle_pick(hit_on_mesh(0)));
    for _ in 0..300 {
        session.advance(0.016);
    }

    let action = &session.mixer.actions()[0];
    assert_eq!(action.time, 2.0);
    assert!(action.paused);

    // The clamped pose holds the final keyframe
    let model = session.scene.model.as_ref().unwrap();
    assert!((model.nodes[0].translation - Vec3::X).length() < 1e-4);
}

#[test]
fn empty_session_keeps_advancing_after_a_failed_load() {
    // A failed load never calls attach_model; the session just keeps running
    let mut session = Session::new();
    for _ in 0..10 {
        session.advance(0.016);
    }
    assert!(session.scene.model.is_none());
    assert!(!session.handle_pick(hit_on_mesh(0)));
    assert!(!session.handle_pick(None));
    assert_eq!(session.next_direction(), Direction::Forward);
}
