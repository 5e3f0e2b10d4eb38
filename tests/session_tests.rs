use tui_tetris3d::core::{NullOverlay, Orientation, SetupError, Vec3};
use tui_tetris3d::engine::{Session, SessionConfig};
use tui_tetris3d::term::TermOverlay;
use tui_tetris3d::types::{Axis, ClearStage, CoreEvent, Key, KeyFrame, PieceKind, TICK_MS};

fn quiet_config() -> SessionConfig {
    // Keep the boot spawn out of the way of hand-built boards.
    SessionConfig {
        boot_delay_ms: 60_000,
        ..SessionConfig::default()
    }
}

fn run(session: &mut Session, frames: usize, input: &KeyFrame, overlay: &mut TermOverlay) {
    for _ in 0..frames {
        session.frame(TICK_MS, input, overlay);
    }
}

#[test]
fn empty_kind_list_is_rejected() {
    let config = SessionConfig {
        kinds: Vec::new(),
        ..SessionConfig::default()
    };
    assert!(matches!(Session::new(&config), Err(SetupError::NoPrefabs)));
}

#[test]
fn non_unit_spacing_is_rejected() {
    let config = SessionConfig {
        spacing: 2.0,
        ..SessionConfig::default()
    };
    assert!(matches!(
        Session::new(&config),
        Err(SetupError::UnsupportedSpacing(s)) if s == 2.0
    ));
}

#[test]
fn boot_piece_falls_and_the_next_one_follows() {
    let mut session = Session::new(&SessionConfig::default()).unwrap();
    let mut overlay = TermOverlay::new();
    let idle = KeyFrame::default();

    run(&mut session, 63, &idle, &mut overlay);
    let first = session.controller().falling_piece().map(|p| p.id());
    assert!(first.is_some());

    // Spawn row is 6.5; the floor is -4.5. At gravity 2 that is well under 10 s.
    let mut second = None;
    for _ in 0..800 {
        session.frame(TICK_MS, &idle, &mut overlay);
        let now = session.controller().falling_piece().map(|p| p.id());
        if now.is_some() && now != first {
            second = now;
            break;
        }
    }
    assert!(second.is_some());
    assert_eq!(session.controller().pieces_locked(), 1);
    assert!(!session.controller().stack().is_empty());
}

#[test]
fn completing_a_layer_clears_cascades_and_respawns() {
    let mut session = Session::new(&quiet_config()).unwrap();
    let mut overlay = TermOverlay::new();
    let idle = KeyFrame::default();

    // 15 of 16 floor cells, leaving (1.5, -4.5, 1.5) open.
    let ctl = session.controller_mut();
    let along_x = Orientation::quarter_turn(Axis::Z, 1);
    for z in [-1.5, -0.5, 0.5] {
        ctl.place_settled(PieceKind::Line, Vec3::new(0.5, -4.5, z), along_x)
            .unwrap();
    }
    let tee = ctl
        .place_settled(PieceKind::Tee, Vec3::new(-0.5, -4.5, 1.5), Orientation::IDENTITY)
        .unwrap();
    let line = ctl
        .spawn_kind_at(PieceKind::Line, Vec3::new(1.5, -2.5, 1.5))
        .unwrap();
    session.take_events();

    run(&mut session, 150, &idle, &mut overlay);

    let ctl = session.controller();
    assert_eq!(ctl.layers_cleared(), 1);
    assert_eq!(ctl.pieces_locked(), 1);
    assert_eq!(ctl.stage(), ClearStage::Idle);
    assert_eq!(ctl.stack().len(), 4);
    assert_eq!(ctl.stack().max_height(), Some(-2.5));
    assert_eq!(ctl.piece(line).unwrap().position().y, -4.5);
    assert!(ctl.piece(tee).unwrap().is_settled());
    assert!(ctl.falling_piece().is_some());

    let events = session.take_events();
    let pos = |e: &CoreEvent| events.iter().position(|x| x == e);
    let cleared = pos(&CoreEvent::LayersCleared { layers: 1, cubes: 16 }).unwrap();
    let released = pos(&CoreEvent::CascadeReleased { pieces: 2 }).unwrap();
    let settled = pos(&CoreEvent::CascadeSettled).unwrap();
    assert!(cleared < released && released < settled);
    assert!(matches!(events.last(), Some(CoreEvent::PieceSpawned { .. })));
}

#[test]
fn losing_shows_overlay_and_reset_restarts() {
    let mut session = Session::new(&SessionConfig::default()).unwrap();
    let mut overlay = TermOverlay::new();
    let idle = KeyFrame::default();

    session
        .controller_mut()
        .place_settled(PieceKind::Line, Vec3::new(0.5, 3.5, 0.5), Orientation::IDENTITY)
        .unwrap();
    run(&mut session, 2, &idle, &mut overlay);
    assert!(session.is_lost());
    assert!(session.is_paused());
    assert!(overlay.game_over_visible());
    assert!(overlay.take_redraw());

    // Pause does nothing while lost.
    run(&mut session, 1, &KeyFrame::pressed(&[Key::Pause]), &mut overlay);
    assert!(session.is_paused());

    run(&mut session, 1, &KeyFrame::pressed(&[Key::Reset]), &mut overlay);
    assert!(!session.is_lost());
    assert!(!overlay.game_over_visible());
    assert!(session.controller().stack().is_empty());

    // The boot spawn was cancelled; the respawn fires 500 ms after reload.
    run(&mut session, 31, &idle, &mut overlay);
    assert!(session.controller().falling_piece().is_none());
    run(&mut session, 1, &idle, &mut overlay);
    assert!(session.controller().falling_piece().is_some());
}

#[test]
fn pause_freezes_the_falling_piece() {
    let mut session = Session::new(&SessionConfig {
        boot_delay_ms: 0,
        ..SessionConfig::default()
    })
    .unwrap();
    let mut overlay = NullOverlay;
    let idle = KeyFrame::default();

    run_null(&mut session, 2, &idle, &mut overlay);
    let y0 = falling_y(&session);

    session.frame(TICK_MS, &KeyFrame::pressed(&[Key::Pause]), &mut overlay);
    assert!(session.is_paused());
    let paused_at = falling_y(&session);
    run_null(&mut session, 30, &idle, &mut overlay);
    assert_eq!(falling_y(&session), paused_at);

    session.frame(TICK_MS, &KeyFrame::pressed(&[Key::Pause]), &mut overlay);
    run_null(&mut session, 5, &idle, &mut overlay);
    assert!(falling_y(&session) < paused_at);
    assert!(paused_at <= y0);
}

#[test]
fn fast_drop_outpaces_normal_gravity() {
    let config = SessionConfig {
        boot_delay_ms: 0,
        ..SessionConfig::default()
    };
    let mut normal = Session::new(&config).unwrap();
    let mut fast = Session::new(&config).unwrap();
    let mut overlay = NullOverlay;
    let idle = KeyFrame::default();
    let mut fast_drop = KeyFrame::default();
    fast_drop.hold(Key::FastDrop);

    run_null(&mut normal, 1, &idle, &mut overlay);
    run_null(&mut fast, 1, &idle, &mut overlay);
    run_null(&mut normal, 20, &idle, &mut overlay);
    run_null(&mut fast, 20, &fast_drop, &mut overlay);
    assert!(falling_y(&fast) < falling_y(&normal));
}

fn run_null(session: &mut Session, frames: usize, input: &KeyFrame, overlay: &mut NullOverlay) {
    for _ in 0..frames {
        session.frame(TICK_MS, input, overlay);
    }
}

fn falling_y(session: &Session) -> f32 {
    session
        .controller()
        .falling_piece()
        .map(|p| p.position().y)
        .unwrap()
}
