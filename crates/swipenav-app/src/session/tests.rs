//! Tests for the session module.

use std::sync::Arc;

use swipenav_core::{CandidateAction, NavBarPosition, PointerEvent, Point};

use crate::config::GestureConfig;
use crate::session::{GesturePhase, GestureSession};

fn bottom_config() -> Arc<GestureConfig> {
    Arc::new(GestureConfig::default())
}

fn side_config() -> Arc<GestureConfig> {
    Arc::new(GestureConfig {
        nav_bar_position: NavBarPosition::Right,
        ..GestureConfig::default()
    })
}

#[test]
fn test_session_start_records_down() {
    let down = PointerEvent::down(540.0, 2155.0, 1_000).with_device(3);
    let session = GestureSession::start(&down, CandidateAction::Home, bottom_config());

    assert_eq!(session.start_point, Point::new(540.0, 2155.0));
    assert_eq!(session.last_point, session.start_point);
    assert_eq!(session.start_time_ms, 1_000);
    assert_eq!(session.device_id, 3);
    assert_eq!(session.candidate(), CandidateAction::Home);
    assert_eq!(session.phase(), GesturePhase::Armed);
    assert!(!session.action_fired());
}

#[test]
fn test_session_ids_are_unique() {
    let down = PointerEvent::down(0.0, 2155.0, 0);
    let a = GestureSession::start(&down, CandidateAction::Back, bottom_config());
    let b = GestureSession::start(&down, CandidateAction::Back, bottom_config());
    assert_ne!(a.id, b.id);
}

#[test]
fn test_try_fire_only_once() {
    let down = PointerEvent::down(540.0, 2155.0, 0);
    let mut session = GestureSession::start(&down, CandidateAction::Home, bottom_config());

    assert!(session.try_fire());
    assert!(session.action_fired());
    assert!(!session.try_fire());
}

#[test]
fn test_input_method_dismissal_once() {
    let down = PointerEvent::down(540.0, 2155.0, 0);
    let mut session = GestureSession::start(&down, CandidateAction::Home, bottom_config());

    assert!(session.take_input_method_dismissal());
    assert!(!session.take_input_method_dismissal());
}

#[test]
fn test_distances_use_vertical_axis_for_bottom_bar() {
    let down = PointerEvent::down(540.0, 2155.0, 0);
    let mut session = GestureSession::start(&down, CandidateAction::Home, bottom_config());

    // Horizontal drift does not count toward the swipe
    assert_eq!(session.distance_since_down(Point::new(900.0, 2155.0)), 0.0);
    assert_eq!(session.distance_since_down(Point::new(540.0, 2000.0)), 155.0);

    session.last_point = Point::new(540.0, 2100.0);
    assert_eq!(session.distance_since_last(Point::new(540.0, 2094.0)), 6.0);
}

#[test]
fn test_distances_use_horizontal_axis_for_side_bar() {
    let down = PointerEvent::down(2150.0, 540.0, 0);
    let session = GestureSession::start(&down, CandidateAction::Home, side_config());

    assert_eq!(session.distance_since_down(Point::new(2000.0, 540.0)), 150.0);
    assert_eq!(session.distance_since_down(Point::new(2150.0, 100.0)), 0.0);
}

#[test]
fn test_phase_progression() {
    let down = PointerEvent::down(540.0, 2155.0, 0);
    let mut session = GestureSession::start(&down, CandidateAction::Home, bottom_config());

    session.long_press_pending = true;
    assert_eq!(session.phase(), GesturePhase::LongPressPending);

    session.long_press_pending = false;
    session.long_press_eligible = true;
    assert_eq!(session.phase(), GesturePhase::SwipeTracking);

    session.recents_armed = true;
    assert_eq!(session.phase(), GesturePhase::RecentsArmed);
}

#[test]
fn test_elapsed_saturates() {
    let down = PointerEvent::down(540.0, 2155.0, 500);
    let session = GestureSession::start(&down, CandidateAction::Home, bottom_config());
    assert_eq!(session.elapsed_ms(800), 300);
    assert_eq!(session.elapsed_ms(100), 0);
}
