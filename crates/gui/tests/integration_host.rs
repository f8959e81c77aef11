//! Integration tests for the scene host lifecycle and the update coordinator,
//! driven headless through TestHarness.

use glam::Vec3;
use shape_viewer_lib::coordinator::{framing_for, UpdateCoordinator, UpdateOutcome};
use shape_viewer_lib::fixtures;
use shape_viewer_lib::harness::{
    EventLog, FrameEvent, RecordingOverlay, RecordingRenderer, TestHarness,
};
use shape_viewer_lib::scene::{HostConfig, SceneHost};
use shape_viewer_lib::state::GridSettings;
use shared::{ParameterError, ShapeFamily, ShapeKind};

fn approx(a: Vec3, b: Vec3) -> bool {
    a.distance(b) < 1e-4
}

#[test]
fn test_mount_uploads_only_the_grid() {
    let h = TestHarness::new();
    assert!(h.host.is_mounted());
    assert_eq!(h.live_gpu_resources(), 1);
    assert_eq!(h.live_labels(), 0);
    assert_eq!(h.renderer().size, egui::vec2(800.0, 600.0));
    assert_eq!(h.overlay().size, egui::vec2(800.0, 600.0));
}

#[test]
fn test_hidden_grid_is_not_uploaded() {
    let config = HostConfig {
        grid: GridSettings {
            visible: false,
            ..GridSettings::default()
        },
        ..HostConfig::default()
    };
    let h = TestHarness::with_config(egui::vec2(640.0, 480.0), config);
    assert_eq!(h.live_gpu_resources(), 0);
}

#[test]
fn test_cube_scenario() {
    let mut h = TestHarness::new();
    let outcome = h.show(&fixtures::cube(4.0));
    assert_eq!(
        outcome,
        UpdateOutcome::Rebuilt {
            kind: Some(ShapeKind::Cube),
            problems: vec![]
        }
    );

    // grid + surface + outline + one dimension line
    assert_eq!(h.live_gpu_resources(), 4);
    assert_eq!(h.renderer().live_lines().count(), 3);
    assert_eq!(h.label_texts(), ["a=4"]);

    let mesh = h.shape_mesh().unwrap();
    let v = shape_viewer_lib::validation::MeshValidator::new(&mesh);
    assert!(v.assert_dimensions_approx([2.0, 2.0, 2.0], 1e-5));
    assert!((v.aabb().center().y - 1.0).abs() < 1e-6);
}

#[test]
fn test_rhomboid_scenario_labels() {
    let mut h = TestHarness::new();
    h.show(&fixtures::rhomboid(5.0, 3.0, Some(60.0)));
    assert_eq!(h.label_texts(), ["b=5", "h=3", "ang=60°"]);

    let mesh = h.shape_mesh().unwrap();
    let aabb = shape_viewer_lib::viewport::bounds::Aabb::from_mesh(&mesh);
    assert!(aabb.center().x.abs() < 1e-5);
    assert!(aabb.center().z.abs() < 1e-5);
}

#[test]
fn test_labels_print_values_as_given() {
    let mut h = TestHarness::new();
    h.show_shape("cylinder", &[("r", 2.345), ("h", std::f64::consts::PI)]);
    let texts = h.label_texts();
    assert!(texts.contains(&"r=2.345".to_string()), "{texts:?}");
    assert!(texts.contains(&"h=3.141592653589793".to_string()), "{texts:?}");
}

#[test]
fn test_rebuilds_do_not_leak() {
    let mut h = TestHarness::new();
    for desc in fixtures::change_sequence() {
        h.show(&desc);
        h.tick();

        assert_eq!(
            h.live_gpu_resources(),
            h.expected_gpu_resources(),
            "after showing {}",
            desc.shape
        );
        let scene = h.host.scene().unwrap();
        assert_eq!(h.live_labels(), scene.annotations.len());
        assert_eq!(scene.slot.get().map(|s| s.kind), desc.kind());
    }
    assert_eq!(h.renderer().bad_releases, 0);
    assert_eq!(h.overlay().bad_removals, 0);
    assert_eq!(h.coordinator.rebuilds(), 10);
}

#[test]
fn test_unchanged_descriptor_does_not_rebuild() {
    let mut h = TestHarness::new();
    h.show(&fixtures::cylinder(2.0, 4.0));
    let uploads = h.renderer().uploads;

    assert_eq!(h.show(&fixtures::cylinder(2.0, 4.0)), UpdateOutcome::Unchanged);
    assert_eq!(h.renderer().uploads, uploads);
    assert_eq!(h.coordinator.rebuilds(), 1);

    // a parameter change does
    assert!(matches!(
        h.show(&fixtures::cylinder(2.0, 5.0)),
        UpdateOutcome::Rebuilt { .. }
    ));
    assert!(h.label_texts().contains(&"h=5".to_string()));
}

#[test]
fn test_nan_parameter_does_not_rebuild_every_frame() {
    let mut h = TestHarness::new();
    let nan = shared::eval_number("0.0/0.0").unwrap();
    assert!(matches!(
        h.show_shape("cube", &[("a", nan)]),
        UpdateOutcome::Rebuilt { .. }
    ));
    let uploads = h.renderer().uploads;

    // user orbits; the next frame must not reframe the camera
    h.host.controls_mut().unwrap().rotate(30.0, 0.0);
    h.tick_n(5);
    let yaw = h.host.camera().unwrap().yaw;

    assert_eq!(h.show_shape("cube", &[("a", nan)]), UpdateOutcome::Unchanged);
    assert_eq!(h.renderer().uploads, uploads);
    assert_eq!(h.host.camera().unwrap().yaw, yaw);
    assert_eq!(h.coordinator.rebuilds(), 1);
}

#[test]
fn test_unknown_shape_leaves_scene_empty() {
    let mut h = TestHarness::new();
    h.show(&fixtures::sphere(2.0));
    let outcome = h.show(&fixtures::unknown_shape());

    assert_eq!(
        outcome,
        UpdateOutcome::Rebuilt {
            kind: None,
            problems: vec![]
        }
    );
    assert!(h.host.scene().unwrap().slot.is_empty());
    assert_eq!(h.live_labels(), 0);
    // grid only
    assert_eq!(h.live_gpu_resources(), 1);
    assert!(h.tick());
}

#[test]
fn test_missing_parameter_is_reported_but_built() {
    let mut h = TestHarness::new();
    let outcome = h.show_shape("cube", &[]);

    assert_eq!(
        outcome,
        UpdateOutcome::Rebuilt {
            kind: Some(ShapeKind::Cube),
            problems: vec![ParameterError::Missing("a".into())]
        }
    );
    assert_eq!(h.coordinator.problems().len(), 1);
    assert_eq!(h.label_texts(), ["a=NaN"]);

    h.show_shape("cube", &[("a", -1.0)]);
    assert!(matches!(
        h.coordinator.problems(),
        [ParameterError::NotPositive(key, _)] if key == "a"
    ));

    h.show(&fixtures::cube(3.0));
    assert!(h.coordinator.problems().is_empty());
}

#[test]
fn test_reframe_per_family() {
    let mut h = TestHarness::new();

    h.show(&fixtures::cube(4.0));
    let solid = framing_for(ShapeFamily::Solid);
    let camera = h.host.camera().unwrap();
    assert!(approx(camera.target, solid.target));
    assert!(approx(camera.eye_position(), solid.position));

    h.show(&fixtures::circle(3.0));
    let planar = framing_for(ShapeFamily::Planar);
    let camera = h.host.camera().unwrap();
    assert!(approx(camera.target, planar.target));
    assert!(approx(camera.eye_position(), planar.position));
}

#[test]
fn test_frame_renders_scene_then_labels_with_one_camera() {
    let mut h = TestHarness::new();
    h.show(&fixtures::cube(4.0));
    h.clear_events();

    h.host.controls_mut().unwrap().rotate(40.0, 10.0);
    h.tick_n(3);

    let events = h.events();
    assert_eq!(events.len(), 6);
    for pair in events.chunks(2) {
        match pair {
            [FrameEvent::Scene {
                camera: scene_camera,
                meshes,
                lines,
            }, FrameEvent::Labels {
                camera: label_camera,
                labels,
            }] => {
                assert_eq!(scene_camera, label_camera);
                assert_eq!(*meshes, 1);
                // grid + outline + dimension line
                assert_eq!(*lines, 3);
                assert_eq!(*labels, 1);
            }
            other => panic!("unexpected frame events: {:?}", other),
        }
    }

    // damped: the camera keeps moving between frames
    let yaw = |e: &FrameEvent| match e {
        FrameEvent::Scene { camera, .. } | FrameEvent::Labels { camera, .. } => camera.yaw,
        FrameEvent::Disposed => panic!("renderer disposed mid-frame"),
    };
    assert!(yaw(&events[0]) != yaw(&events[2]));
    assert!(yaw(&events[2]) != yaw(&events[4]));
}

#[test]
fn test_controls_settle() {
    let mut h = TestHarness::new();
    h.show(&fixtures::hexagon(3.0));
    h.host.controls_mut().unwrap().zoom(0.3);
    h.tick();
    assert!(!h.host.scene().unwrap().controls.is_settled());

    h.tick_n(300);
    let scene = h.host.scene().unwrap();
    assert!(scene.controls.is_settled());
    let distance = scene.camera.distance;
    assert!(distance >= scene.controls.min_distance);
    assert!(distance <= scene.controls.max_distance);
}

#[test]
fn test_unmount_tears_everything_down() {
    let mut h = TestHarness::new();
    h.show(&fixtures::sphere(2.0));
    h.tick();
    h.unmount();

    assert!(!h.host.is_mounted());
    assert_eq!(h.live_gpu_resources(), 0);
    assert_eq!(h.live_labels(), 0);
    assert!(h.renderer().disposed);
    assert!(h.renderer().detached);
    assert!(h.overlay().detached);
    assert_eq!(h.renderer().bad_releases, 0);

    // no more frames, no more rebuilds
    let events = h.events().len();
    let frames = h.host.frames();
    assert!(!h.tick());
    assert_eq!(h.events().len(), events);
    assert_eq!(h.host.frames(), frames);
    assert_eq!(h.show(&fixtures::cube(4.0)), UpdateOutcome::NotMounted);

    // resize after unmount is ignored
    h.resize(egui::vec2(100.0, 100.0));
    assert_ne!(h.renderer().size, egui::vec2(100.0, 100.0));

    // a second unmount is a no-op
    let releases = h.renderer().releases;
    h.unmount();
    assert_eq!(h.renderer().releases, releases);
}

fn disposals(log: &EventLog) -> usize {
    log.borrow()
        .iter()
        .filter(|e| matches!(e, FrameEvent::Disposed))
        .count()
}

#[test]
fn test_explicit_unmount_before_drop_disposes_once() {
    let log = EventLog::default();
    let mut host = SceneHost::mount(
        RecordingRenderer::new(log.clone()),
        RecordingOverlay::new(log.clone()),
        egui::vec2(800.0, 600.0),
        HostConfig::default(),
    );
    UpdateCoordinator::new().update(&mut host, &fixtures::cube(4.0));
    host.tick();

    // app exit: teardown runs here, not in Drop
    host.unmount();
    assert_eq!(disposals(&log), 1);
    assert_eq!(host.renderer().live_resources(), 0);

    drop(host);
    assert_eq!(disposals(&log), 1);
}

#[test]
fn test_drop_unmounts_a_mounted_host() {
    let log = EventLog::default();
    let host = SceneHost::mount(
        RecordingRenderer::new(log.clone()),
        RecordingOverlay::new(log.clone()),
        egui::vec2(800.0, 600.0),
        HostConfig::default(),
    );
    drop(host);
    assert_eq!(disposals(&log), 1);
}

#[test]
fn test_settings_change_applies_without_remount() {
    let mut h = TestHarness::new();
    h.show(&fixtures::cube(4.0));
    let mount_id = h.host.mount_id();
    let uploads = h.renderer().uploads;

    // a dragged slider changes the settings every frame
    for step in 1..=10 {
        let mut config = h.host.config().clone();
        config.grid.size = 1.0 + step as f32 * 0.1;
        config.camera.fov_degrees = 45.0 + step as f32;
        config.camera.max_distance = 8.0;
        h.host.reconfigure(config);
        assert_eq!(h.show(&fixtures::cube(4.0)), UpdateOutcome::Unchanged);
        assert!(h.tick());
    }

    assert_eq!(h.host.mount_id(), mount_id);
    assert_eq!(h.coordinator.rebuilds(), 1);
    // one grid re-upload per change, nothing else
    assert_eq!(h.renderer().uploads, uploads + 10);
    assert_eq!(h.live_gpu_resources(), h.expected_gpu_resources());
    assert_eq!(h.renderer().bad_releases, 0);
    assert_eq!(h.label_texts(), ["a=4"]);

    let camera = h.host.camera().unwrap();
    assert!((camera.fov - 55.0_f32.to_radians()).abs() < 1e-6);
    assert!(camera.distance <= 8.0);

    let mut config = h.host.config().clone();
    config.grid.visible = false;
    h.host.reconfigure(config);
    assert_eq!(h.live_gpu_resources(), h.expected_gpu_resources());
    assert_eq!(h.live_gpu_resources(), 3);
}

#[test]
fn test_zero_size_mount_is_corrected_by_resize() {
    let mut h = TestHarness::with_size(egui::Vec2::ZERO);
    assert_eq!(h.host.scene().unwrap().aspect(), 1.0);
    h.show(&fixtures::cube(4.0));
    assert!(h.tick());

    h.resize(egui::vec2(1000.0, 500.0));
    assert_eq!(h.renderer().size, egui::vec2(1000.0, 500.0));
    assert_eq!(h.overlay().size, egui::vec2(1000.0, 500.0));
    assert_eq!(h.host.scene().unwrap().aspect(), 2.0);
}

#[test]
fn test_remount_rebuilds_same_descriptor() {
    let mut h = TestHarness::new();
    let desc = fixtures::rhomboid(5.0, 3.0, None);
    h.show(&desc);
    let first_mount = h.host.mount_id();

    let log = EventLog::default();
    h.host = SceneHost::mount(
        RecordingRenderer::new(log.clone()),
        RecordingOverlay::new(log),
        egui::vec2(800.0, 600.0),
        HostConfig::default(),
    );
    assert_ne!(h.host.mount_id(), first_mount);

    assert!(matches!(h.show(&desc), UpdateOutcome::Rebuilt { .. }));
    assert_eq!(h.label_texts(), ["b=5", "h=3", "ang=60°"]);
    assert_eq!(h.live_gpu_resources(), h.expected_gpu_resources());
}

#[test]
fn test_harness_remount_starts_clean() {
    let mut h = TestHarness::new();
    h.show(&fixtures::cube(4.0));
    h.tick_n(5);
    h.remount();

    assert!(h.host.is_mounted());
    assert_eq!(h.host.frames(), 0);
    assert!(h.events().is_empty());
    assert_eq!(h.live_gpu_resources(), 1);
}
