use tui_tetris3d::core::{
    Grid, NullOverlay, Orientation, PieceId, PrefabFactory, StackController, Vec3,
};
use tui_tetris3d::types::{Axis, ClearStage, CoreEvent, Key, KeyFrame, PieceKind};

fn controller() -> StackController {
    StackController::with_prefabs(Grid::default(), &PieceKind::ALL, 1).unwrap()
}

fn along_x() -> Orientation {
    Orientation::quarter_turn(Axis::Z, 1)
}

/// Four horizontal lines cover the 4x4 layer at `y`.
fn fill_layer(c: &mut StackController, y: f32) -> Vec<PieceId> {
    [-1.5, -0.5, 0.5, 1.5]
        .into_iter()
        .map(|z| {
            c.place_settled(PieceKind::Line, Vec3::new(0.5, y, z), along_x())
                .unwrap()
        })
        .collect()
}

fn assert_parallel(c: &StackController) {
    assert_eq!(c.stack().positions().len(), c.stack().cubes().len());
}

/// Run controller steps in frame order until the cascade is over.
fn settle_cascade(c: &mut StackController) {
    let input = KeyFrame::default();
    let mut overlay = NullOverlay;
    for _ in 0..500 {
        c.update(&input, &mut overlay);
        assert_parallel(c);
        if c.stage() == ClearStage::Idle {
            return;
        }
        c.tick_pieces(0.016, &input);
        c.late_tick_pieces();
    }
    panic!("cascade did not settle");
}

#[test]
fn platform_is_idempotent_without_full_layers() {
    let mut c = controller();
    c.place_settled(PieceKind::Tee, Vec3::new(-0.5, -4.5, -1.5), Orientation::IDENTITY)
        .unwrap();
    c.place_settled(PieceKind::Quad, Vec3::new(0.5, -4.5, 1.5), Orientation::IDENTITY)
        .unwrap();
    let before = c.stack().clone();
    for _ in 0..3 {
        assert!(!c.handle_platform());
        assert_eq!(c.stack(), &before);
        assert_eq!(c.stage(), ClearStage::Idle);
    }
    assert_eq!(c.layers_cleared(), 0);
}

#[test]
fn scenario_a_single_full_layer() {
    let mut c = controller();
    let below = c
        .place_settled(PieceKind::Line, Vec3::new(0.5, -4.5, -1.5), along_x())
        .unwrap();
    let layer = fill_layer(&mut c, -3.5);
    let above = c
        .place_settled(PieceKind::Quad, Vec3::new(-1.5, -2.5, -1.5), Orientation::IDENTITY)
        .unwrap();
    let below_positions: Vec<Vec3> = c
        .stack()
        .iter()
        .filter(|(_, r)| r.piece == below)
        .map(|(p, _)| p)
        .collect();
    assert_eq!(c.stack().len(), 24);

    assert!(c.handle_platform());
    assert_parallel(&c);

    assert_eq!(c.stack().len(), 8);
    assert!(c.stack().cubes().iter().all(|r| !layer.contains(&r.piece)));
    let still_below: Vec<Vec3> = c
        .stack()
        .iter()
        .filter(|(_, r)| r.piece == below)
        .map(|(p, _)| p)
        .collect();
    assert_eq!(still_below, below_positions);
    assert_eq!(c.cascading(), &[above]);
    assert_eq!(c.layers_cleared(), 1);
    assert!(c
        .take_events()
        .contains(&CoreEvent::LayersCleared { layers: 1, cubes: 16 }));
}

#[test]
fn scenario_b_piece_below_floor_snaps_onto_it() {
    let grid = Grid::default();
    let mut factory = PrefabFactory::new(&[PieceKind::Line], 1).unwrap();
    let mut piece = factory.build(PieceKind::Line, Vec3::new(0.5, -3.4, 0.5)).unwrap();

    assert!(piece.tick(0.1, 2.0, &grid));
    assert!(piece.is_settled());
    assert_eq!(piece.position().y, -3.5);
    let lowest = piece.cube_positions().map(|(_, p)| p.y).fold(f32::MAX, f32::min);
    assert!((lowest - grid.bottom_ws()).abs() <= 0.1);
}

#[test]
fn scenario_c_move_past_left_wall_rolls_back() {
    let mut c = controller();
    let start = Vec3::new(-1.5, 1.5, 0.5);
    let id = c.spawn_kind_at(PieceKind::Line, start).unwrap();

    c.tick_pieces(0.0, &KeyFrame::pressed(&[Key::MoveLeft]));
    let piece = c.piece(id).unwrap();
    assert_eq!(piece.position(), start);
    assert!(!piece.is_settled());

    // The opposite direction is still open.
    c.tick_pieces(0.0, &KeyFrame::pressed(&[Key::MoveRight]));
    assert_eq!(c.piece(id).unwrap().position(), Vec3::new(-0.5, 1.5, 0.5));
}

#[test]
fn moves_into_the_stack_roll_back() {
    let mut c = controller();
    c.place_settled(PieceKind::Line, Vec3::new(1.5, -3.5, 0.5), Orientation::IDENTITY)
        .unwrap();
    let start = Vec3::new(0.5, -2.5, 0.5);
    let id = c.spawn_kind_at(PieceKind::Line, start).unwrap();

    // Zero dt: no descent, only the move.
    c.tick_pieces(0.0, &KeyFrame::pressed(&[Key::MoveRight]));
    assert_eq!(c.piece(id).unwrap().position(), start);

    c.tick_pieces(0.0, &KeyFrame::pressed(&[Key::MoveLeft]));
    assert_eq!(c.piece(id).unwrap().position(), Vec3::new(-0.5, -2.5, 0.5));
}

#[test]
fn rotation_into_the_stack_restores_the_transform() {
    let spawn = Vec3::new(0.5, -2.5, 0.5);
    let turn = KeyFrame::pressed(&[Key::RotateZPos]);

    // Without a stack the turn fits: the line ends up along x at y = -2.5.
    let mut open = controller();
    let free = open.spawn_kind_at(PieceKind::Line, spawn).unwrap();
    open.tick_pieces(0.0, &turn);
    let turned = open.piece(free).unwrap();
    assert_eq!(turned.transform().orientation, along_x());
    assert_eq!(turned.position(), spawn);

    // A settled column at x = -0.5 sits in the swept cells.
    let mut c = controller();
    c.place_settled(PieceKind::Line, Vec3::new(-0.5, -3.5, 0.5), Orientation::IDENTITY)
        .unwrap();
    let id = c.spawn_kind_at(PieceKind::Line, spawn).unwrap();
    let before = *c.piece(id).unwrap().transform();

    c.tick_pieces(0.0, &turn);
    let piece = c.piece(id).unwrap();
    assert_eq!(*piece.transform(), before);
    assert_eq!(piece.transform().orientation, Orientation::IDENTITY);
    assert!(!piece.is_settled());
}

#[test]
fn rotation_below_the_floor_rolls_back_orientation_only() {
    let c = controller();
    let mut factory = PrefabFactory::new(&[PieceKind::Line], 1).unwrap();
    let turn = KeyFrame::pressed(&[Key::RotateXPos]);
    let lying = Orientation::quarter_turn(Axis::X, 1);

    // Lying along z one layer above the floor, a further quarter turn would
    // put the top cube at -5.5.
    let start = Vec3::new(0.5, -3.5, -0.5);
    let mut piece = factory.build(PieceKind::Line, start).unwrap();
    assert!(piece.handle_rotation(&turn, c.grid(), c.stack()));
    assert_eq!(piece.transform().orientation, lying);

    assert!(!piece.handle_rotation(&turn, c.grid(), c.stack()));
    assert_eq!(piece.transform().orientation, lying);
    assert_eq!(piece.position(), start);

    // One layer higher the same turn rests the lowest cube exactly on the floor.
    let mut piece = factory.build(PieceKind::Line, Vec3::new(0.5, -2.5, -0.5)).unwrap();
    assert!(piece.handle_rotation(&turn, c.grid(), c.stack()));
    assert!(piece.handle_rotation(&turn, c.grid(), c.stack()));
    let lowest = piece.cube_positions().map(|(_, p)| p.y).fold(f32::MAX, f32::min);
    assert_eq!(lowest, c.grid().bottom_ws());
}

#[test]
fn scenario_d_stack_at_top_plus_one_loses() {
    let mut c = controller();
    let mut overlay = NullOverlay;

    // Highest cube at top (4.5): still playing.
    c.place_settled(PieceKind::Line, Vec3::new(-1.5, 2.5, -1.5), Orientation::IDENTITY)
        .unwrap();
    assert!(!c.handle_lose(&mut overlay));

    // Highest cube at top + 1 (5.5).
    c.place_settled(PieceKind::Line, Vec3::new(0.5, 3.5, 0.5), Orientation::IDENTITY)
        .unwrap();
    assert!(c.handle_lose(&mut overlay));
    assert!(c.is_lost());
    assert!(c.take_events().contains(&CoreEvent::GameOver));

    c.schedule_spawn(0);
    for _ in 0..200 {
        c.advance_timers(16);
        c.update(&KeyFrame::default(), &mut overlay);
    }
    assert!(c.falling_piece().is_none());
    assert!(c.is_paused());

    assert!(c.reload(&mut overlay));
    c.advance_timers(500);
    assert!(c.falling_piece().is_some());
}

#[test]
fn scenario_e_reload_while_playing_is_noop() {
    let mut c = controller();
    let mut overlay = NullOverlay;
    c.place_settled(PieceKind::Quad, Vec3::new(-1.5, -4.5, -1.5), Orientation::IDENTITY)
        .unwrap();
    c.spawn_kind_at(PieceKind::Line, Vec3::new(0.5, 2.5, 0.5)).unwrap();
    c.take_events();
    let before = c.snapshot();

    assert!(!c.reload(&mut overlay));
    assert_eq!(c.snapshot(), before);
    assert!(c.take_events().is_empty());
}

#[test]
fn scenario_f_two_full_layers_clear_in_one_pass() {
    let mut c = controller();
    fill_layer(&mut c, -4.5);
    fill_layer(&mut c, -3.5);
    let above = c
        .place_settled(PieceKind::Quad, Vec3::new(-1.5, -2.5, 0.5), Orientation::IDENTITY)
        .unwrap();

    assert!(c.handle_platform());
    assert_parallel(&c);
    assert_eq!(c.layers_cleared(), 2);
    assert_eq!(c.stack().len(), 4);
    assert_eq!(c.cascading(), &[above]);
    assert!(c
        .take_events()
        .contains(&CoreEvent::LayersCleared { layers: 2, cubes: 32 }));

    settle_cascade(&mut c);
    let piece = c.piece(above).unwrap();
    assert!(piece.is_settled());
    assert_eq!(piece.position().y, -4.5);
}

#[test]
fn separated_full_layers_cascade_the_piece_between_them() {
    let mut c = controller();
    fill_layer(&mut c, -4.5);
    let middle = c
        .place_settled(PieceKind::Line, Vec3::new(0.5, -3.5, -1.5), along_x())
        .unwrap();
    fill_layer(&mut c, -2.5);
    assert_eq!(c.stack().len(), 36);

    assert!(c.handle_platform());
    assert_parallel(&c);
    assert_eq!(c.layers_cleared(), 2);
    assert_eq!(c.stack().len(), 4);
    assert!(c.stack().cubes().iter().all(|r| r.piece == middle));
    assert_eq!(c.cascading(), &[middle]);
    assert!(c
        .take_events()
        .contains(&CoreEvent::LayersCleared { layers: 2, cubes: 32 }));

    settle_cascade(&mut c);
    let piece = c.piece(middle).unwrap();
    assert!(piece.is_settled());
    assert_eq!(piece.position().y, -4.5);
    assert_eq!(c.layers_cleared(), 2);
}

#[test]
fn destroyed_cubes_never_come_back() {
    let mut c = controller();
    let layer = fill_layer(&mut c, -4.5);
    c.place_settled(PieceKind::Ell, Vec3::new(-0.5, -2.5, -0.5), Orientation::IDENTITY)
        .unwrap();
    let destroyed: Vec<_> = c
        .stack()
        .cubes()
        .iter()
        .filter(|r| layer.contains(&r.piece))
        .copied()
        .collect();
    assert_eq!(destroyed.len(), 16);

    assert!(c.handle_platform());
    settle_cascade(&mut c);

    for r in &destroyed {
        assert!(!c.stack().cubes().contains(r));
        assert!(c.piece(r.piece).is_none());
    }
}

#[test]
fn settled_pieces_stay_settled_outside_a_cascade() {
    let mut c = controller();
    let mut overlay = NullOverlay;
    let id = c
        .place_settled(PieceKind::Tee, Vec3::new(-0.5, -4.5, 0.5), Orientation::IDENTITY)
        .unwrap();
    let input = KeyFrame::default();
    for _ in 0..60 {
        c.advance_timers(16);
        c.update(&input, &mut overlay);
        c.tick_pieces(0.016, &input);
        c.late_tick_pieces();
        assert!(c.piece(id).unwrap().is_settled());
    }
}

#[test]
fn falling_piece_locks_on_the_stack() {
    let mut c = controller();
    let mut overlay = NullOverlay;
    c.place_settled(PieceKind::Quad, Vec3::new(0.5, -4.5, 0.5), Orientation::IDENTITY)
        .unwrap();
    let id = c.spawn_kind_at(PieceKind::Line, Vec3::new(0.5, 0.5, 0.5)).unwrap();
    let input = KeyFrame::default();
    for _ in 0..200 {
        c.update(&input, &mut overlay);
        assert_parallel(&c);
        if c.falling_piece().is_none() {
            break;
        }
        c.tick_pieces(0.016, &input);
        c.late_tick_pieces();
    }
    assert!(c.falling_piece().is_none());
    assert_eq!(c.pieces_locked(), 1);
    let piece = c.piece(id).unwrap();
    assert!(piece.is_settled());
    // Rests on the quad's top cube at -3.5.
    assert_eq!(piece.position().y, -1.5);
    assert_eq!(c.stack().len(), 8);
}
