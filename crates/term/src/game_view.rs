//! GameView: maps a `SimSnapshot` into a terminal framebuffer.
//!
//! The 3D play field is shown as two orthographic projections side by side:
//! the front view looks down -z (x across, y up) and the side view looks down
//! +x (z across, y up). Settled cubes are shaded by how many of them line up
//! along the view axis; the falling piece is drawn solid on top.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{CubeSnapshot, SimSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::overlay::TermOverlay;
use crate::types::PieceKind;

/// Rows drawn above the top layer so freshly spawned pieces are visible.
pub const SPAWN_ROWS: u16 = 2;

const PANEL_MIN_W: u16 = 14;
const STATUS_ROWS: u16 = 4;

const BG: Rgb = Rgb::new(30, 30, 40);
const SPAWN_BG: Rgb = Rgb::new(20, 20, 26);
const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Which world axis runs across a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// x across, y up.
    Front,
    /// z across, y up.
    Side,
}

impl Projection {
    fn title(self) -> &'static str {
        match self {
            Projection::Front => "FRONT x/y",
            Projection::Side => "SIDE z/y",
        }
    }

    fn columns(self, snap: &SimSnapshot) -> u16 {
        match self {
            Projection::Front => clamp_u16(snap.grid.width),
            Projection::Side => clamp_u16(snap.grid.depth),
        }
    }

    /// Lattice column of a cube, if it lies inside the grid horizontally.
    fn column_of(self, snap: &SimSnapshot, cube: &CubeSnapshot) -> Option<u16> {
        let (v, min) = match self {
            Projection::Front => (cube.x, snap.grid.left),
            Projection::Side => (cube.z, snap.grid.back),
        };
        lattice_index(v, min, snap.grid.spacing, self.columns(snap))
    }
}

/// Terminal renderer for the falling-block game.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    fn box_size(&self, snap: &SimSnapshot, projection: Projection) -> (u16, u16) {
        let w = projection.columns(snap).saturating_mul(self.cell_w).saturating_add(2);
        let h = field_rows(snap).saturating_add(2);
        (w, h)
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &SimSnapshot,
        overlay: &TermOverlay,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (front_w, box_h) = self.box_size(snap, Projection::Front);
        let (side_w, _) = self.box_size(snap, Projection::Side);
        let total_w = front_w
            .saturating_add(side_w)
            .saturating_add(4 + PANEL_MIN_W);
        // Title row, the boxes, then four status rows.
        let total_h = box_h.saturating_add(1 + STATUS_ROWS);

        let start_x = viewport.width.saturating_sub(total_w) / 2;
        let start_y = viewport.height.saturating_sub(total_h) / 2;

        let front_x = start_x;
        let side_x = front_x.saturating_add(front_w).saturating_add(2);
        let panel_x = side_x.saturating_add(side_w).saturating_add(2);
        let box_y = start_y.saturating_add(1);

        self.draw_projection(fb, snap, Projection::Front, front_x, start_y);
        self.draw_projection(fb, snap, Projection::Side, side_x, start_y);
        self.draw_layer_gauge(fb, snap, viewport, panel_x, box_y);
        self.draw_status(fb, snap, viewport, panel_x, box_y);

        let span_w = side_x.saturating_add(side_w) - front_x;
        if overlay.game_over_visible() {
            draw_banner(fb, front_x, box_y, span_w, box_h, "GAME OVER", Some("press R to restart"));
        } else if snap.paused {
            draw_banner(fb, front_x, box_y, span_w, box_h, "PAUSED", None);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SimSnapshot, overlay: &TermOverlay, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, overlay, viewport, &mut fb);
        fb
    }

    fn draw_projection(
        &self,
        fb: &mut FrameBuffer,
        snap: &SimSnapshot,
        projection: Projection,
        x: u16,
        title_y: u16,
    ) {
        let title = CellStyle::new(Rgb::new(160, 160, 170), BLACK).bold();
        fb.put_str(x, title_y, projection.title(), title);

        let (w, h) = self.box_size(snap, projection);
        let y = title_y.saturating_add(1);
        draw_border(fb, x, y, w, h, CellStyle::new(Rgb::new(200, 200, 200), BLACK));

        // Only cells inside the framebuffer are shaded.
        let columns = projection.columns(snap);
        let rows = field_rows(snap);
        for row in 0..rows {
            let py = y.saturating_add(1).saturating_add(row);
            if py >= fb.height() {
                break;
            }
            let layer = rows - 1 - row;
            let spawn_zone = layer >= clamp_u16(snap.grid.height);
            for col in 0..columns {
                let px = x.saturating_add(1).saturating_add(col.saturating_mul(self.cell_w));
                if px >= fb.width() {
                    break;
                }
                let (ch, style) = self.shade(snap, projection, col, layer, spawn_zone);
                fb.fill_rect(px, py, self.cell_w, 1, ch, style);
            }
        }
    }

    /// Glyph for one projected cell: the falling piece wins, otherwise settled
    /// cubes shaded by count along the view axis.
    fn shade(
        &self,
        snap: &SimSnapshot,
        projection: Projection,
        col: u16,
        layer: u16,
        spawn_zone: bool,
    ) -> (char, CellStyle) {
        let mut settled = 0u32;
        let mut falling: Option<PieceKind> = None;
        let mut kind = None;
        for cube in &snap.cubes {
            if projection.column_of(snap, cube) != Some(col) {
                continue;
            }
            if lattice_index(cube.y, snap.grid.bottom, snap.grid.spacing, field_rows(snap)) != Some(layer) {
                continue;
            }
            if cube.falling {
                falling = Some(cube.kind);
            } else {
                settled += 1;
                kind.get_or_insert(cube.kind);
            }
        }

        let bg = if spawn_zone { SPAWN_BG } else { BG };
        if let Some(kind) = falling {
            return ('█', CellStyle::new(kind_color(kind), bg).bold());
        }
        match (settled, kind) {
            (0, _) | (_, None) => {
                let dot = if spawn_zone { ' ' } else { '·' };
                (dot, CellStyle::new(Rgb::new(90, 90, 100), bg).dim())
            }
            (n, Some(kind)) => {
                let ch = match n {
                    1 => '░',
                    2 => '▒',
                    3 => '▓',
                    _ => '█',
                };
                (ch, CellStyle::new(kind_color(kind), bg))
            }
        }
    }

    /// One bar per layer: settled cubes on the layer against a full layer.
    fn draw_layer_gauge(&self, fb: &mut FrameBuffer, snap: &SimSnapshot, viewport: Viewport, x: u16, y: u16) {
        if x.saturating_add(PANEL_MIN_W) > viewport.width {
            return;
        }
        let label = CellStyle::new(Rgb::new(220, 220, 220), BLACK).bold();
        let full = CellStyle::new(Rgb::new(100, 220, 120), BLACK);
        let empty = CellStyle::new(Rgb::new(70, 70, 80), BLACK).dim();
        fb.put_str(x, y.saturating_sub(1), "LAYERS", label);

        let per_layer = snap.grid.width.saturating_mul(snap.grid.depth);
        let bar_w: u32 = 8;
        let top_row = y.saturating_add(1 + SPAWN_ROWS);
        let layers = clamp_u16(snap.grid.height);
        // Top layer first, down to the last row that fits.
        for offset in 0..layers {
            let row = top_row.saturating_add(offset);
            if row >= fb.height() {
                break;
            }
            let layer = layers - 1 - offset;
            let count = snap
                .cubes
                .iter()
                .filter(|c| !c.falling)
                .filter(|c| {
                    lattice_index(c.y, snap.grid.bottom, snap.grid.spacing, layers) == Some(layer)
                })
                .count() as u32;
            let filled = if per_layer == 0 {
                0
            } else {
                count.saturating_mul(bar_w) / per_layer
            };
            for i in 0..bar_w as u16 {
                let (ch, style) = if (i as u32) < filled { ('■', full) } else { ('□', empty) };
                fb.put_char(x.saturating_add(i), row, ch, style);
            }
            fb.put_u32(x.saturating_add(bar_w as u16 + 1), row, count, empty);
        }
    }

    fn draw_status(&self, fb: &mut FrameBuffer, snap: &SimSnapshot, viewport: Viewport, x: u16, y: u16) {
        if x.saturating_add(PANEL_MIN_W) > viewport.width {
            return;
        }
        let label = CellStyle::new(Rgb::new(220, 220, 220), BLACK).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), BLACK);

        let row = y
            .saturating_add(2 + SPAWN_ROWS)
            .saturating_add(clamp_u16(snap.grid.height));
        let state = if snap.lost {
            "lost"
        } else if snap.paused {
            "paused"
        } else {
            "playing"
        };

        let at = fb.put_str(x, row, "CLEARED", label).saturating_add(1);
        fb.put_u32(at, row, snap.layers_cleared, value);
        let row = row.saturating_add(1);
        let at = fb.put_str(x, row, "PIECES", label).saturating_add(1);
        fb.put_u32(at, row, snap.pieces_locked, value);
        let row = row.saturating_add(1);
        let at = fb.put_str(x, row, "STAGE", label).saturating_add(1);
        fb.put_str(at, row, snap.stage.as_str(), value);
        let row = row.saturating_add(1);
        let at = fb.put_str(x, row, "STATE", label).saturating_add(1);
        fb.put_str(at, row, state, value);
    }
}

/// Terminal cells for a grid dimension, saturated at `u16::MAX`.
fn clamp_u16(n: u32) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Layers plus the spawn rows above them.
fn field_rows(snap: &SimSnapshot) -> u16 {
    clamp_u16(snap.grid.height).saturating_add(SPAWN_ROWS)
}

/// Index of `v` on a lattice starting at `min`, if within `count` cells.
fn lattice_index(v: f32, min: f32, spacing: f32, count: u16) -> Option<u16> {
    let i = ((v - min) / spacing).round();
    (i >= 0.0 && i < count as f32).then_some(i as u16)
}

fn kind_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::Line => Rgb::new(80, 220, 220),
        PieceKind::Quad => Rgb::new(240, 220, 80),
        PieceKind::Tee => Rgb::new(200, 120, 220),
        PieceKind::Ell => Rgb::new(255, 165, 0),
        PieceKind::Skew => Rgb::new(100, 220, 120),
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }
    let right = x.saturating_add(w - 1);
    let bottom = y.saturating_add(h - 1);
    fb.put_char(x, y, '┌', style);
    fb.put_char(right, y, '┐', style);
    fb.put_char(x, bottom, '└', style);
    fb.put_char(right, bottom, '┘', style);
    for dx in 1..w - 1 {
        let cx = x.saturating_add(dx);
        if cx >= fb.width() {
            break;
        }
        fb.put_char(cx, y, '─', style);
        fb.put_char(cx, bottom, '─', style);
    }
    for dy in 1..h - 1 {
        let cy = y.saturating_add(dy);
        if cy >= fb.height() {
            break;
        }
        fb.put_char(x, cy, '│', style);
        fb.put_char(right, cy, '│', style);
    }
}

fn draw_banner(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, text: &str, hint: Option<&str>) {
    let style = CellStyle::new(Rgb::new(255, 255, 255), BLACK).bold();
    let mid = y.saturating_add(h / 2);
    let centered = |s: &str| x.saturating_add(w.saturating_sub(s.chars().count() as u16) / 2);
    fb.put_str(centered(text), mid, text, style);
    if let Some(hint) = hint {
        fb.put_str(centered(hint), mid.saturating_add(1), hint, CellStyle { bold: false, ..style });
    }
}
