// Gesture interpreter transitions and the interaction state it publishes.

use glam::Vec2;
use heart_core::*;

fn hand(wrist_x: f32, palm: Vec2) -> HandLandmarks {
    let mut points = [Vec2::new(wrist_x, 0.8); 21];
    points[9] = palm;
    HandLandmarks::new(points)
}

fn event(category: GestureCategory, confidence: f32, t_ms: u64) -> GestureEvent {
    GestureEvent::new(category, confidence, t_ms).with_landmarks(hand(0.5, Vec2::new(0.5, 0.5)))
}

fn event_at(category: GestureCategory, wrist_x: f32, t_ms: u64) -> GestureEvent {
    GestureEvent::new(category, 0.9, t_ms).with_landmarks(hand(wrist_x, Vec2::new(0.5, 0.5)))
}

fn interpreter_with(
    initial: InteractionState,
    config: &EngineConfig,
) -> (GestureInterpreter, InteractionReader) {
    let (mut writer, reader) = interaction_channel();
    writer.publish(initial);
    (GestureInterpreter::new(writer, config), reader)
}

fn interpreter() -> (GestureInterpreter, InteractionReader) {
    interpreter_with(InteractionState::default(), &EngineConfig::default())
}

#[test]
fn initial_state_is_scattered_and_idle() {
    let (interp, reader) = interpreter();
    let s = reader.snapshot();
    assert_eq!(s.mode, Mode::Chaos);
    assert_eq!(s.special_gesture, None);
    assert_eq!(s.focused_index, None);
    assert!(!s.is_hand_detected);
    assert!(!s.is_shaking);
    assert_eq!(interp.state(), s);
}

#[test]
fn transition_table_covers_focus_and_input() {
    use InputClass::*;
    assert_eq!(transition_for(Focus::Focused, OpenPalm), Transition::Navigate);
    assert_eq!(transition_for(Focus::Unfocused, OpenPalm), Transition::Scatter);
    for focus in [Focus::Focused, Focus::Unfocused] {
        assert_eq!(transition_for(focus, ClosedFist), Transition::Assemble);
        assert_eq!(transition_for(focus, ILoveYou), Transition::Love);
        assert_eq!(transition_for(focus, ThumbUp), Transition::Approve);
        assert_eq!(transition_for(focus, Pointing), Transition::Inspect);
        assert_eq!(transition_for(focus, Other), Transition::Idle);
    }
}

#[test]
fn pointing_requires_confidence_above_half() {
    let params = GestureParams::default();
    let weak = GestureEvent::new(GestureCategory::Victory, 0.5, 0);
    let strong = GestureEvent::new(GestureCategory::PointingUp, 0.51, 0);
    assert_eq!(InputClass::of(&weak, &params), InputClass::Other);
    assert_eq!(InputClass::of(&strong, &params), InputClass::Pointing);
}

#[test]
fn fist_assembles_and_clears_focus_and_pulse() {
    let initial = InteractionState {
        focused_index: Some(5),
        special_gesture: Some(SpecialGesture::ILoveYou),
        ..InteractionState::default()
    };
    let (mut interp, reader) = interpreter_with(initial, &EngineConfig::default());
    let t = interp.process(Some(&event(GestureCategory::ClosedFist, 0.9, 0)));
    assert_eq!(t, Some(Transition::Assemble));
    let s = reader.snapshot();
    assert_eq!(s.mode, Mode::Formed);
    assert_eq!(s.focused_index, None, "fist must clear focus");
    assert_eq!(s.special_gesture, None, "fist must clear the pulse");
    assert!(!s.is_shaking);
}

#[test]
fn open_palm_clears_the_pulse_with_or_without_focus() {
    for focus in [None, Some(3)] {
        let initial = InteractionState {
            focused_index: focus,
            special_gesture: Some(SpecialGesture::ThumbUp),
            ..InteractionState::default()
        };
        let (mut interp, reader) = interpreter_with(initial, &EngineConfig::default());
        let t = interp.process(Some(&event(GestureCategory::OpenPalm, 0.9, 0)));
        let expected = if focus.is_some() {
            Transition::Navigate
        } else {
            Transition::Scatter
        };
        assert_eq!(t, Some(expected));
        let s = reader.snapshot();
        assert_eq!(s.special_gesture, None, "focus {focus:?}: palm must clear the pulse");
        assert_eq!(s.focused_index, focus);
    }
}

#[test]
fn palm_landmark_is_mirrored_and_inverted() {
    let (mut interp, reader) = interpreter();
    let e = GestureEvent::new(GestureCategory::None, 0.9, 0)
        .with_landmarks(hand(0.5, Vec2::new(0.3, 0.7)));
    interp.process(Some(&e));
    let s = reader.snapshot();
    assert!((s.hand_position - Vec2::new(0.7, 0.3)).length() < 1e-6, "{:?}", s.hand_position);
    assert!(s.is_hand_detected);
}

#[test]
fn missing_gesture_marks_hand_lost_and_holds_the_rest() {
    let (mut interp, reader) = interpreter();
    interp.process(Some(&event(GestureCategory::ClosedFist, 0.9, 0)));
    interp.process(Some(&event(GestureCategory::ThumbUp, 0.9, 33)));
    let before = reader.snapshot();
    assert!(before.is_hand_detected);

    assert_eq!(interp.process(None), None);
    let after = reader.snapshot();
    assert!(!after.is_hand_detected);
    assert!(!after.is_shaking);
    assert_eq!(after.mode, before.mode);
    assert_eq!(after.special_gesture, before.special_gesture);
    assert_eq!(after.focused_index, before.focused_index);
    assert_eq!(after.hand_position, before.hand_position);
}

#[test]
fn event_without_landmarks_keeps_last_position() {
    let (mut interp, reader) = interpreter();
    let e = GestureEvent::new(GestureCategory::None, 0.9, 0)
        .with_landmarks(hand(0.5, Vec2::new(0.2, 0.4)));
    interp.process(Some(&e));
    interp.process(Some(&GestureEvent::new(GestureCategory::ClosedFist, 0.9, 33)));
    let s = reader.snapshot();
    assert!((s.hand_position - Vec2::new(0.8, 0.6)).length() < 1e-6);
    assert!(s.is_hand_detected);
}

#[test]
fn open_palm_shaking_scatters_and_sets_shake() {
    let (mut interp, reader) = interpreter();
    interp.process(Some(&event(GestureCategory::ClosedFist, 0.9, 0)));
    for i in 0..12u64 {
        let x = if i % 2 == 0 { 0.3 } else { 0.7 };
        interp.process(Some(&event_at(GestureCategory::OpenPalm, x, 33 * (i + 1))));
        let s = reader.snapshot();
        assert_eq!(s.mode, Mode::Chaos);
        assert_eq!(s.focused_index, None);
        if i < 9 {
            assert!(!s.is_shaking, "shaking too early at sample {}", i + 1);
        }
    }
    assert!(reader.snapshot().is_shaking);

    interp.process(Some(&event(GestureCategory::ThumbUp, 0.9, 1_000)));
    assert!(!reader.snapshot().is_shaking, "non-palm gesture stops shaking");
}

#[test]
fn steady_open_palm_does_not_shake() {
    let (mut interp, reader) = interpreter();
    for i in 0..25u64 {
        interp.process(Some(&event_at(GestureCategory::OpenPalm, 0.5, 33 * i)));
    }
    assert!(!reader.snapshot().is_shaking);
}

#[test]
fn love_forms_and_sets_pulse_thumb_keeps_mode() {
    let (mut interp, reader) = interpreter();
    interp.process(Some(&event(GestureCategory::ILoveYou, 0.9, 0)));
    let s = reader.snapshot();
    assert_eq!(s.mode, Mode::Formed);
    assert_eq!(s.special_gesture, Some(SpecialGesture::ILoveYou));

    interp.process(Some(&event(GestureCategory::ThumbUp, 0.9, 33)));
    let s = reader.snapshot();
    assert_eq!(s.mode, Mode::Formed);
    assert_eq!(s.special_gesture, Some(SpecialGesture::ThumbUp));

    interp.process(Some(&event(GestureCategory::Victory, 0.2, 66)));
    assert_eq!(reader.snapshot().special_gesture, None, "unrelated gesture clears pulse");
}

#[test]
fn thumb_up_in_chaos_stays_in_chaos() {
    let (mut interp, reader) = interpreter();
    interp.process(Some(&event(GestureCategory::ThumbUp, 0.9, 0)));
    let s = reader.snapshot();
    assert_eq!(s.mode, Mode::Chaos);
    assert_eq!(s.special_gesture, Some(SpecialGesture::ThumbUp));
}

#[test]
fn pointing_focuses_a_valid_photo() {
    for seed in 0..50u64 {
        let config = EngineConfig {
            seed,
            ..EngineConfig::default()
        };
        let (mut interp, reader) = interpreter_with(InteractionState::default(), &config);
        for i in 0..200u64 {
            interp.process(Some(&event(GestureCategory::PointingUp, 0.9, 33 * i)));
            let focus = reader.snapshot().focused_index;
            match focus {
                Some(idx) => assert!(
                    idx < config.photo_count,
                    "seed {seed}: focus {idx} out of range"
                ),
                None => panic!("seed {seed}: pointing left focus empty"),
            }
        }
    }
}

#[test]
fn focus_on_first_photo_is_not_treated_as_empty() {
    let config = EngineConfig {
        gesture: GestureParams {
            refocus_chance: 0.0,
            ..GestureParams::default()
        },
        ..EngineConfig::default()
    };
    let initial = InteractionState {
        focused_index: Some(0),
        mode: Mode::Formed,
        ..InteractionState::default()
    };
    let (mut interp, reader) = interpreter_with(initial, &config);
    for i in 0..50u64 {
        interp.process(Some(&event(GestureCategory::Victory, 0.9, 33 * i)));
        assert_eq!(reader.snapshot().focused_index, Some(0));
    }
}

#[test]
fn weak_pointing_does_not_focus() {
    let (mut interp, reader) = interpreter();
    interp.process(Some(&event(GestureCategory::Victory, 0.4, 0)));
    assert_eq!(reader.snapshot().focused_index, None);
}

#[test]
fn open_palm_swipe_navigates_once_per_cooldown() {
    let initial = InteractionState {
        focused_index: Some(3),
        mode: Mode::Formed,
        ..InteractionState::default()
    };
    let (mut interp, reader) = interpreter_with(initial, &EngineConfig::default());
    let mut seen = Vec::new();
    for i in 0..16u64 {
        let x = 0.1 + 0.05 * i as f32;
        let t = interp.process(Some(&event_at(GestureCategory::OpenPalm, x, 33 * i)));
        assert_eq!(t, Some(Transition::Navigate));
        let s = reader.snapshot();
        assert_eq!(s.mode, Mode::Formed);
        seen.push(s.focused_index);
    }
    assert_eq!(seen.last(), Some(&Some(2)), "one step back, no more within cooldown");
    assert!(seen.iter().all(|f| *f == Some(3) || *f == Some(2)));
}

#[test]
fn swipe_wraps_at_the_ends() {
    let initial = InteractionState {
        focused_index: Some(19),
        mode: Mode::Formed,
        ..InteractionState::default()
    };
    let (mut interp, reader) = interpreter_with(initial, &EngineConfig::default());
    for i in 0..12u64 {
        let x = 0.9 - 0.05 * i as f32;
        interp.process(Some(&event_at(GestureCategory::OpenPalm, x, 33 * i)));
    }
    assert_eq!(reader.snapshot().focused_index, Some(0));
}

#[test]
fn control_commands_set_mode_only() {
    let (mut interp, reader) = interpreter();
    interp.process(Some(&event(GestureCategory::ThumbUp, 0.9, 0)));
    interp.apply_command(ControlCommand::ForceFormed);
    let s = reader.snapshot();
    assert_eq!(s.mode, Mode::Formed);
    assert_eq!(s.special_gesture, Some(SpecialGesture::ThumbUp));
    interp.apply_command(ControlCommand::ForceChaos);
    assert_eq!(reader.snapshot().mode, Mode::Chaos);
}

#[test]
fn classifier_output_reduces_to_top_event() {
    assert_eq!(ClassifierOutput::default().top_event(10), None);

    let out = ClassifierOutput {
        classifications: vec![
            Classification {
                label: "Thumb_Up".into(),
                score: 0.8,
            },
            Classification {
                label: "Open_Palm".into(),
                score: 0.1,
            },
        ],
        landmarks: vec![vec![Vec2::splat(0.5); 21], vec![Vec2::ZERO; 21]],
    };
    let e = out.top_event(42).expect("top event");
    assert_eq!(e.category, GestureCategory::ThumbUp);
    assert_eq!(e.timestamp_ms, 42);
    assert_eq!(e.landmarks.map(|l| l.wrist()), Some(Vec2::splat(0.5)));

    let partial = ClassifierOutput {
        classifications: vec![Classification {
            label: "Wave".into(),
            score: 0.9,
        }],
        landmarks: vec![vec![Vec2::ZERO; 5]],
    };
    let e = partial.top_event(0).expect("event");
    assert_eq!(e.category, GestureCategory::None);
    assert!(e.landmarks.is_none(), "incomplete landmark sets are dropped");
}

#[test]
fn labels_round_trip_through_categories() {
    for label in [
        "Open_Palm",
        "Closed_Fist",
        "Victory",
        "Pointing_Up",
        "Thumb_Up",
        "ILoveYou",
        "None",
    ] {
        assert_eq!(GestureCategory::from_label(label).label(), label);
    }
}

#[test]
fn skeleton_segments_scale_to_pixels() {
    let mut points = [Vec2::ZERO; 21];
    for (i, p) in points.iter_mut().enumerate() {
        *p = Vec2::new(i as f32 / 20.0, 0.5);
    }
    let l = HandLandmarks::new(points);
    let segs = skeleton_segments(&l, 640, 480);
    assert_eq!(segs.len(), HAND_CONNECTIONS.len());
    assert_eq!(segs[0], (Vec2::new(0.0, 240.0), Vec2::new(32.0, 240.0)));
    assert_eq!(skeleton_joints(&l, 640, 480).len(), 21);
}
