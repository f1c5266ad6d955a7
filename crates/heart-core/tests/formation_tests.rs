// Formation interpolation, group rotation, photos, camera rig and the frame driver.

use glam::{Vec2, Vec3};
use heart_core::constants::*;
use heart_core::*;
use rand::prelude::*;

fn state(mode: Mode) -> InteractionState {
    InteractionState {
        mode,
        ..InteractionState::default()
    }
}

#[test]
fn smoothing_is_frame_rate_independent() {
    let one = approach(0.0, 1.0, PROGRESS_RATE, 0.1);
    let two = approach(approach(0.0, 1.0, PROGRESS_RATE, 0.05), 1.0, PROGRESS_RATE, 0.05);
    assert!((one - two).abs() < 1e-6, "{one} vs {two}");
    assert_eq!(smoothing_alpha(5.0, 0.0), 0.0);
    assert_eq!(smoothing_alpha(5.0, -1.0), 0.0);
    assert!(smoothing_alpha(5.0, 100.0) <= 1.0);
}

#[test]
fn progress_converges_monotonically_to_formed_and_back() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut cloud = HeartCloud::generate(200, &mut rng);
    let formed = state(Mode::Formed);
    let mut prev = cloud.progress();
    assert_eq!(prev, 0.0);
    for i in 0..600 {
        let dt = if i % 3 == 0 { 1.0 / 30.0 } else { 1.0 / 144.0 };
        cloud.advance(dt, &formed, 0.0);
        let p = cloud.progress();
        assert!(p >= prev, "progress fell from {prev} to {p}");
        for e in cloud.elements() {
            assert!((0.0..=1.0).contains(&e.progress));
        }
        prev = p;
    }
    assert!(prev > 0.95, "progress only reached {prev}");

    let chaos = state(Mode::Chaos);
    for _ in 0..600 {
        cloud.advance(1.0 / 60.0, &chaos, 0.0);
        let p = cloud.progress();
        assert!(p <= prev, "progress rose from {prev} to {p}");
        assert!(p >= 0.0);
        prev = p;
    }
    assert!(prev < 0.05);
}

#[test]
fn heart_targets_lie_inside_the_heart() {
    let mut rng = StdRng::seed_from_u64(1);
    let cloud = HeartCloud::generate(500, &mut rng);
    for e in cloud.elements() {
        assert!(heart_implicit(e.assembled_target / HEART_SCALE) < 1e-4);
        assert!(e.chaos_target.abs().max_element() <= CHAOS_HALF_EXTENT);
        assert!((0.0..1.0).contains(&e.size));
        assert!((0.0..1.0).contains(&e.speed));
    }
}

#[test]
fn audio_only_pulses_an_assembled_heart() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut quiet = HeartCloud::generate(50, &mut rng);
    let mut rng = StdRng::seed_from_u64(2);
    let mut loud = HeartCloud::generate(50, &mut rng);

    let chaos = state(Mode::Chaos);
    quiet.advance(0.016, &chaos, 0.0);
    loud.advance(0.016, &chaos, 1.0);
    for (a, b) in quiet.elements().iter().zip(loud.elements()) {
        assert_eq!(a.position, b.position, "audio must not affect scattered points");
    }

    let formed = state(Mode::Formed);
    for _ in 0..300 {
        quiet.advance(1.0 / 30.0, &formed, 0.0);
        loud.advance(1.0 / 30.0, &formed, 1.0);
    }
    let spread = |c: &HeartCloud| c.elements().iter().map(|e| e.position.length()).sum::<f32>();
    assert!(spread(&loud) > spread(&quiet), "loud heart should expand");

    let mut quiet_pts = Vec::new();
    let mut loud_pts = Vec::new();
    quiet.write_instances(&mut quiet_pts, 0.0);
    loud.write_instances(&mut loud_pts, 1.0);
    assert!(loud_pts.iter().zip(&quiet_pts).all(|(l, q)| l.size >= q.size));
}

#[test]
fn rotation_spins_and_unwinds() {
    let mut r = RotationState::default();
    r.advance(1.0, Mode::Formed, false);
    assert!((r.angle - SPIN_BASE_RATE).abs() < 1e-5);

    let mut fast = RotationState::default();
    fast.advance(0.1, Mode::Chaos, true);
    assert!((fast.angle - SPIN_SHAKE_RATE * 0.1).abs() < 1e-5);

    let mut r = RotationState { angle: 2.5 };
    let mut prev = r.angle.abs();
    for _ in 0..300 {
        r.advance(1.0 / 60.0, Mode::Chaos, false);
        assert!(r.angle.abs() <= prev + 1e-6);
        prev = r.angle.abs();
    }
    assert!(prev < 0.01);
}

#[test]
fn rotation_unwinds_the_short_way() {
    let mut r = RotationState { angle: 6.0 };
    r.advance(1.0 / 60.0, Mode::Chaos, false);
    assert!(r.angle < 0.0 && r.angle > -0.3, "wrapped angle {}", r.angle);
}

#[test]
fn ornaments_assemble_on_the_heart_surface() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut ring = OrnamentRing::new(10, 10, &mut rng);
    let formed = state(Mode::Formed);
    for _ in 0..600 {
        ring.advance(1.0 / 60.0, &formed);
    }
    for bead in ring.beads() {
        assert!((bead.position - bead.assembled).length() < 0.01);
        assert_eq!(bead.scale, 1.0);
    }
    let mut out = Vec::new();
    ring.write_instances(&mut out);
    assert_eq!(out.len(), 100);
}

#[test]
fn ornament_beads_wobble_in_chaos() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut ring = OrnamentRing::new(4, 4, &mut rng);
    ring.advance(0.5, &state(Mode::Chaos));
    for bead in ring.beads() {
        let wobble = (bead.scale - 1.0).abs();
        assert!(wobble <= ORNAMENT_CHAOS_WOBBLE + 1e-6);
    }
}

#[test]
fn photos_form_a_ring() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut gallery = PhotoGallery::new(PHOTO_COUNT, &mut rng);
    let formed = state(Mode::Formed);
    for _ in 0..900 {
        gallery.advance(1.0 / 60.0, &formed, Vec3::new(0.0, 0.0, CAMERA_BASE_Z));
    }
    for (i, photo) in gallery.photos().iter().enumerate() {
        let target = ring_position(i, PHOTO_COUNT);
        let horizontal = Vec2::new(photo.position.x, photo.position.z).length();
        assert!((horizontal - PHOTO_RING_RADIUS).abs() < 0.2, "photo {i} radius {horizontal}");
        assert!((photo.position.y - target.y).abs() < 0.75, "photo {i} height");
        assert!((photo.scale - 1.0).abs() < 1e-3);
    }
}

#[test]
fn focused_photo_moves_in_front_of_camera_and_back() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut gallery = PhotoGallery::new(PHOTO_COUNT, &mut rng);
    let eye = Vec3::new(0.0, 0.0, CAMERA_BASE_Z);
    let mut s = state(Mode::Formed);
    for _ in 0..120 {
        gallery.advance(1.0 / 60.0, &s, eye);
    }
    s.focused_index = Some(0);
    for _ in 0..240 {
        gallery.advance(1.0 / 60.0, &s, eye);
    }
    let world = gallery.world_position(0).expect("photo 0");
    assert!((world - (eye + INSPECT_OFFSET)).length() < 0.05, "inspect pose {world:?}");
    assert!((gallery.photos()[0].scale - INSPECT_SCALE).abs() < 0.01);
    assert!((gallery.photos()[1].scale - 1.0).abs() < 0.01);

    let mut instances = Vec::new();
    gallery.write_instances(&mut instances, &s);
    assert_eq!(instances[0].highlight, 1.0);
    assert!(instances[1..].iter().all(|p| p.highlight == 0.0));

    s.focused_index = None;
    for _ in 0..600 {
        gallery.advance(1.0 / 60.0, &s, eye);
    }
    assert!((gallery.photos()[0].scale - 1.0).abs() < 0.01);
}

#[test]
fn inspection_pose_applies_in_chaos_too() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut gallery = PhotoGallery::new(5, &mut rng);
    let eye = Vec3::new(1.0, -1.0, CAMERA_BASE_Z);
    let s = InteractionState {
        focused_index: Some(4),
        ..InteractionState::default()
    };
    for _ in 0..300 {
        gallery.advance(1.0 / 60.0, &s, eye);
    }
    let world = gallery.world_position(4).expect("photo 4");
    assert!((world - (eye + INSPECT_OFFSET)).length() < 0.05);
}

#[test]
fn out_of_range_focus_is_ignored_by_gallery() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut gallery = PhotoGallery::new(3, &mut rng);
    let s = InteractionState {
        focused_index: Some(10),
        mode: Mode::Formed,
        ..InteractionState::default()
    };
    gallery.advance(0.5, &s, Vec3::Z * 18.0);
    let mut out = Vec::new();
    gallery.write_instances(&mut out, &s);
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|p| p.highlight == 0.0));
}

#[test]
fn camera_follows_hand_and_recenters() {
    let mut rig = CameraRig::new(16.0 / 9.0, false);
    assert_eq!(rig.eye(), Vec3::new(0.0, 0.0, CAMERA_BASE_Z));
    let s = InteractionState {
        hand_position: Vec2::new(1.0, 0.0),
        is_hand_detected: true,
        ..InteractionState::default()
    };
    for _ in 0..600 {
        rig.advance(1.0 / 60.0, &s);
    }
    assert!((rig.eye() - Vec3::new(2.5, -2.5, CAMERA_BASE_Z)).length() < 0.01);

    let lost = InteractionState {
        is_hand_detected: false,
        ..s
    };
    for _ in 0..600 {
        rig.advance(1.0 / 60.0, &lost);
    }
    assert!((rig.eye() - Vec3::new(0.0, 0.0, CAMERA_BASE_Z)).length() < 0.01);

    let narrow = CameraRig::new(0.5, true);
    assert_eq!(narrow.base_z(), CAMERA_BASE_Z_NARROW);
    let vp = rig.camera().view_projection();
    assert!(vp.is_finite());
}

#[test]
fn frame_driver_reads_state_and_fills_buffers() {
    let (mut writer, reader) = interaction_channel();
    let config = EngineConfig {
        heart_points: 300,
        ornament_rows: 8,
        ornament_cols: 8,
        ..EngineConfig::default()
    };
    let mut frame = AnimationFrame::new(reader, Box::new(SilentAudio), &config);
    let summary = frame.advance(1.0 / 60.0);
    assert_eq!(summary.mode, Mode::Chaos);
    assert_eq!(frame.points().len(), 300);
    assert_eq!(frame.beads().len(), 64);
    assert_eq!(frame.photo_instances().len(), config.photo_count);
    let total: usize = config.bursts.iter().map(|b| b.capacity).sum();
    assert_eq!(frame.particles().len(), total);

    writer.publish(InteractionState {
        mode: Mode::Formed,
        hand_position: Vec2::new(0.5, 0.5),
        is_hand_detected: true,
        ..InteractionState::default()
    });
    for _ in 0..299 {
        frame.advance(1.0 / 60.0);
    }
    let last = frame.advance(1.0 / 60.0);
    assert_eq!(last.mode, Mode::Formed);
    assert!(last.hand_detected);
    assert!(last.progress > 0.9);
    assert_eq!(last.audio_level, 0.0);
}

#[test]
fn frame_clamps_large_steps() {
    let (_writer, reader) = interaction_channel();
    let config = EngineConfig {
        heart_points: 10,
        ornament_rows: 2,
        ornament_cols: 2,
        ..EngineConfig::default()
    };
    let mut frame = AnimationFrame::new(reader, Box::new(SilentAudio), &config);
    let a = frame.advance(10.0);
    let b = frame.advance(f32::NAN);
    assert!(a.progress.is_finite() && b.progress.is_finite());
    assert!(frame.points().iter().all(|p| p.pos.iter().all(|c| c.is_finite())));
}
