#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_equality() {
    assert_eq!(Tool::Select, Tool::Select);
    assert_ne!(Tool::Select, Tool::Pan);
    assert_ne!(Tool::Rect, Tool::Ellipse);
}

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
}

#[test]
fn command_is_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Modifiers::default() }.command());
    assert!(Modifiers { meta: true, ..Modifiers::default() }.command());
    assert!(!Modifiers { shift: true, alt: true, ..Modifiers::default() }.command());
}

// =============================================================
// Button / Key / WheelDelta
// =============================================================

#[test]
fn button_variants_distinct() {
    assert_ne!(Button::Primary, Button::Middle);
    assert_ne!(Button::Primary, Button::Secondary);
    assert_ne!(Button::Middle, Button::Secondary);
}

#[test]
fn key_wraps_name() {
    let k = Key("Escape".to_string());
    assert_eq!(k.0, "Escape");
    assert_eq!(k, Key("Escape".to_string()));
}

#[test]
fn wheel_delta_fields() {
    let w = WheelDelta { dx: 1.5, dy: -3.0 };
    assert_eq!(w.dx, 1.5);
    assert_eq!(w.dy, -3.0);
}

// =============================================================
// PointerEvent normalization
// =============================================================

#[test]
fn pointer_event_computes_world_from_camera() {
    let mut camera = Camera::new(800.0, 600.0);
    camera.x = 100.0;
    camera.y = 50.0;
    let input = PointerInput {
        screen: Point::new(400.0, 300.0),
        button: Button::Primary,
        modifiers: Modifiers::default(),
        pressure: 0.5,
        time_ms: 1000.0,
    };
    let ev = PointerEvent::from_input(input, &camera);
    assert_eq!(ev.world, Point::new(100.0, 50.0));
    assert_eq!(ev.screen, Point::new(400.0, 300.0));
    assert_eq!(ev.pressure, 0.5);
    assert_eq!(ev.time_ms, 1000.0);
}

#[test]
fn pointer_event_respects_zoom() {
    let mut camera = Camera::new(800.0, 600.0);
    camera.set_zoom(2.0);
    let input = PointerInput {
        screen: Point::new(500.0, 300.0),
        button: Button::Primary,
        modifiers: Modifiers::default(),
        pressure: 1.0,
        time_ms: 0.0,
    };
    let ev = PointerEvent::from_input(input, &camera);
    assert_eq!(ev.world, Point::new(50.0, 0.0));
}

// =============================================================
// Gesture
// =============================================================

#[test]
fn gesture_default_is_idle() {
    assert!(matches!(Gesture::default(), Gesture::Idle));
}

#[test]
fn idle_is_not_active() {
    assert!(!Gesture::Idle.is_active());
}

#[test]
fn pending_is_active() {
    let g = Gesture::Pending {
        start_screen: Point::new(0.0, 0.0),
        start_world: Point::new(0.0, 0.0),
        hit: None,
        hit_was_selected: false,
    };
    assert!(g.is_active());
}

#[test]
fn marquee_is_active() {
    let g = Gesture::Marquee {
        start_world: Point::new(0.0, 0.0),
        current_world: Point::new(10.0, 10.0),
    };
    assert!(g.is_active());
}

#[test]
fn translate_origin_carries_endpoints() {
    let o = TranslateOrigin { x: 1.0, y: 2.0, x2: Some(3.0), y2: Some(4.0) };
    assert_eq!(o.x2, Some(3.0));
    let node = TranslateOrigin { x: 1.0, y: 2.0, x2: None, y2: None };
    assert_eq!(node.x2, None);
}
