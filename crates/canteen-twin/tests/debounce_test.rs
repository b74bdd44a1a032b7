//! Debounce and Coalescing Through the Dispatcher

use canteen_twin::adapters::SimulatedBoard;
use canteen_twin::domain::{
    DispatchOutcome, DispenserConfig, LineId, RoleConfig, RoleKind, StepOutcome, Trigger, Wake,
};
use std::time::Duration;

#[test]
fn bounce_within_window_yields_one_event() {
    let mut board = SimulatedBoard::new().unwrap();

    // Five edges inside 270 ms
    let delivered = board.bounce(RoleKind::Entrance, &[0, 30, 50, 80, 100]);
    assert_eq!(delivered, 5);

    let stats = board.dispatcher().stats(LineId::ENTRANCE).unwrap();
    assert_eq!(stats.accepted, 1);
    assert_eq!(stats.rejected, 4);

    assert!(board.step(RoleKind::Entrance).acted());
    assert_eq!(board.step(RoleKind::Entrance), StepOutcome::Idle);
    assert_eq!(board.available(), 7);
}

#[test]
fn spaced_edges_each_yield_an_event() {
    let mut board = SimulatedBoard::new().unwrap();

    for _ in 0..4 {
        board.advance(271);
        board.press(RoleKind::Entrance);
        assert!(board.step(RoleKind::Entrance).acted());
    }
    assert_eq!(board.available(), 4);
    assert_eq!(board.dispatcher().stats(LineId::ENTRANCE).unwrap().rejected, 0);
}

#[test]
fn window_boundary_is_exclusive() {
    let board = SimulatedBoard::new().unwrap();
    let dispatcher = board.dispatcher();

    assert_eq!(dispatcher.on_edge(LineId::EXIT, 1_000), DispatchOutcome::Posted);
    assert_eq!(dispatcher.on_edge(LineId::EXIT, 1_270), DispatchOutcome::Debounced);
    assert_eq!(dispatcher.on_edge(LineId::EXIT, 1_271), DispatchOutcome::Coalesced);
}

#[test]
fn slow_role_sees_one_event_for_many_accepted_edges() {
    let mut board = SimulatedBoard::new().unwrap();

    // Three well-spaced presses while the role is busy elsewhere
    board.bounce(RoleKind::Entrance, &[0, 300, 300]);
    assert_eq!(board.dispatcher().stats(LineId::ENTRANCE).unwrap().coalesced, 2);

    assert!(board.step(RoleKind::Entrance).acted());
    assert_eq!(board.step(RoleKind::Entrance), StepOutcome::Idle);
    assert_eq!(board.available(), 7);
}

#[test]
fn lines_debounce_independently() {
    let mut board = SimulatedBoard::new().unwrap();
    board.press(RoleKind::Entrance);
    board.press(RoleKind::Exit);
    board.press(RoleKind::Reset);

    let acted = board.drain();
    assert_eq!(acted.len(), 3);
}

#[test]
fn custom_window_from_config() {
    let mut config = DispenserConfig::default();
    config.debounce.window_ms = 50;
    let mut board = SimulatedBoard::from_config(config).unwrap();

    board.bounce(RoleKind::Entrance, &[0, 51]);
    assert_eq!(board.dispatcher().stats(LineId::ENTRANCE).unwrap().accepted, 2);
    assert!(board.step(RoleKind::Entrance).acted());
}

#[test]
fn timer_reset_needs_no_button() {
    let mut config = DispenserConfig::default().with_uniform_cooldown(0);
    config.roles[2] = RoleConfig::timed_reset(60_000).with_cooldown_ms(0);
    let mut board = SimulatedBoard::from_config(config).unwrap();

    assert!(!board.press(RoleKind::Reset), "timer-only reset has no line");
    assert!(board.dispatcher().stats(LineId::RESET).is_none());

    board.press(RoleKind::Entrance);
    board.step(RoleKind::Entrance);
    assert_eq!(board.available(), 7);

    assert_eq!(board.step(RoleKind::Reset), StepOutcome::Idle);
    board.advance(60_000);
    assert!(board.step(RoleKind::Reset).acted());
    assert_eq!(board.available(), 8);
}

#[test]
fn reset_on_button_or_period_fires_on_period() {
    let mut config = DispenserConfig::default().with_uniform_cooldown(0);
    config.roles[2] = RoleConfig {
        trigger: Trigger::Both { period_ms: 1_000 },
        ..config.roles[2]
    };
    let mut board = SimulatedBoard::from_config(config).unwrap();

    board.press(RoleKind::Entrance);
    board.step(RoleKind::Entrance);
    assert_eq!(board.available(), 7);

    // Nobody presses reset; the bounded wait runs out on the virtual clock
    let outcome = board
        .dispenser_mut()
        .step_role(RoleKind::Reset, Duration::from_millis(1_000));
    assert!(matches!(outcome, Some(StepOutcome::Acted { wake: Wake::Timer, .. })));
    assert_eq!(board.now_ms(), 1_000);
    assert_eq!(board.available(), 8);

    // The button still works between periods
    board.advance(300);
    board.press(RoleKind::Entrance);
    board.step(RoleKind::Entrance);
    assert!(board.press(RoleKind::Reset));
    assert!(matches!(
        board.step(RoleKind::Reset),
        StepOutcome::Acted { wake: Wake::Edge, .. }
    ));
    assert_eq!(board.available(), 8);
}
