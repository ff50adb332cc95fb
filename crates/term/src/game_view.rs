//! GameView: draws a [`GameSession`] into a [`Frame`].
//!
//! This module is pure (no I/O) and reads the session only through its render accessors.
//! Only the visible rows are drawn; the hidden spawn rows stay off-screen, and empty cells
//! above the danger row are tinted red.

use std::f32::consts::PI;

use crate::core::{GameSession, PlayerPiece};
use crate::frame::{Frame, Rgb, Style};
use crate::types::{
    PieceKind, ARENA_HEIGHT, ARENA_WIDTH, DANGER_ROW, HIDDEN_ROWS, PREVIEW_LEN, VISIBLE_ROWS,
};

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

const PANEL_W: u16 = 14;
const BLACK: Rgb = Rgb::new(0, 0, 0);
const WELL_BG: Rgb = Rgb::new(18, 18, 26);
const TEXT: Rgb = Rgb::new(220, 220, 220);
const DANGER: Rgb = Rgb::new(150, 30, 30);

/// Block color of a piece kind ("classic" palette)
pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::T => Rgb::new(0xf4, 0x38, 0xff),
        PieceKind::O => Rgb::new(0xff, 0xe0, 0x38),
        PieceKind::L => Rgb::new(0xfe, 0x8d, 0x0f),
        PieceKind::J => Rgb::new(0x38, 0x77, 0xff),
        PieceKind::I => Rgb::new(0x0d, 0xc2, 0xff),
        PieceKind::S => Rgb::new(0x00, 0xf8, 0x67),
        PieceKind::Z => Rgb::new(0xff, 0x00, 0x2b),
    }
}

/// Opacity of a grounded piece: pulses from 0.25 up to 1 and back over the lock delay.
fn lock_alpha(progress: f32) -> f32 {
    0.25 + 0.75 * (progress.clamp(0.0, 1.0) * PI).sin()
}

pub struct GameView {
    /// Arena cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // Two columns per cell roughly squares up terminal glyphs.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Top-left corner of the well border
    pub fn well_origin(&self, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.well_size();
        let x = viewport.width.saturating_sub(frame_w + PANEL_W) / 2;
        let y = viewport.height.saturating_sub(frame_h) / 2;
        (x, y)
    }

    /// Terminal position of an arena cell, `None` for hidden or off-arena cells
    pub fn cell_position(&self, viewport: Viewport, x: i32, y: i32) -> Option<(u16, u16)> {
        if x < 0 || x >= ARENA_WIDTH as i32 || y < HIDDEN_ROWS as i32 || y >= ARENA_HEIGHT as i32
        {
            return None;
        }
        let (ox, oy) = self.well_origin(viewport);
        let px = ox + 1 + x as u16 * self.cell_w;
        let py = oy + 1 + (y as u16 - HIDDEN_ROWS as u16);
        Some((px, py))
    }

    fn well_size(&self) -> (u16, u16) {
        (
            ARENA_WIDTH as u16 * self.cell_w + 2,
            VISIBLE_ROWS as u16 + 2,
        )
    }

    pub fn render(&self, session: &GameSession, viewport: Viewport) -> Frame {
        let mut frame = Frame::new(viewport.width, viewport.height);
        self.render_into(session, viewport, &mut frame);
        frame
    }

    /// Redraw everything into a reusable frame.
    pub fn render_into(&self, session: &GameSession, viewport: Viewport, frame: &mut Frame) {
        frame.reset(viewport.width, viewport.height);

        let (ox, oy) = self.well_origin(viewport);
        let (frame_w, frame_h) = self.well_size();
        self.draw_border(frame, ox, oy, frame_w, frame_h);

        let well = Style::plain(Rgb::new(70, 70, 85), WELL_BG).dim();
        for (y, row) in session.arena().rows().iter().enumerate().skip(HIDDEN_ROWS) {
            for (x, &cell) in row.iter().enumerate() {
                match PieceKind::from_color(cell) {
                    Some(kind) => {
                        let style = Style::plain(piece_color(kind), WELL_BG);
                        self.put_cell(frame, viewport, x as i32, y as i32, '█', style);
                    }
                    None if y < DANGER_ROW => {
                        let style = Style { fg: DANGER, ..well };
                        self.put_cell(frame, viewport, x as i32, y as i32, '·', style);
                    }
                    None => self.put_cell(frame, viewport, x as i32, y as i32, '·', well),
                }
            }
        }

        let active = session.active();
        let color = piece_color(active.kind());
        if session.settings().show_ghost {
            let ghost = session.ghost_position();
            let style = Style::plain(color, WELL_BG).dim();
            self.draw_piece(frame, viewport, &ghost, '░', style);
        }

        let mut style = Style::plain(color, WELL_BG).bold();
        if lock_alpha_for(session) < 0.6 {
            style = Style { bold: false, ..style }.dim();
        }
        self.draw_piece(frame, viewport, active, '█', style);

        self.draw_panel(frame, session, ox + frame_w + 2, oy);

        if session.is_paused() {
            let text = " PAUSED ";
            let x = ox + frame_w.saturating_sub(text.len() as u16) / 2;
            frame.text(x, oy + frame_h / 2, text, Style::plain(TEXT, BLACK).bold());
        }
    }

    fn put_cell(
        &self,
        frame: &mut Frame,
        viewport: Viewport,
        x: i32,
        y: i32,
        ch: char,
        style: Style,
    ) {
        if let Some((px, py)) = self.cell_position(viewport, x, y) {
            frame.fill(px, py, self.cell_w, 1, ch, style);
        }
    }

    fn draw_piece(
        &self,
        frame: &mut Frame,
        viewport: Viewport,
        piece: &PlayerPiece,
        ch: char,
        style: Style,
    ) {
        for (dx, dy, _) in piece.shape().filled() {
            self.put_cell(frame, viewport, piece.x() + dx, piece.y() + dy, ch, style);
        }
    }

    fn draw_border(&self, frame: &mut Frame, x: u16, y: u16, w: u16, h: u16) {
        let style = Style::plain(Rgb::new(190, 190, 200), BLACK);
        let right = x + w - 1;
        let bottom = y + h - 1;
        for dx in 1..w - 1 {
            frame.put(x + dx, y, '─', style);
            frame.put(x + dx, bottom, '─', style);
        }
        for dy in 1..h - 1 {
            frame.put(x, y + dy, '│', style);
            frame.put(right, y + dy, '│', style);
        }
        frame.put(x, y, '┌', style);
        frame.put(right, y, '┐', style);
        frame.put(x, bottom, '└', style);
        frame.put(right, bottom, '┘', style);
    }

    fn draw_panel(&self, frame: &mut Frame, session: &GameSession, x: u16, mut y: u16) {
        let label = Style::plain(TEXT, BLACK).bold();
        let value = Style::plain(TEXT, BLACK);

        frame.text(x, y, "SCORE", label);
        frame.text(x, y + 1, &session.score().to_string(), value);
        y += 3;

        frame.text(x, y, "BEST", label);
        frame.text(x, y + 1, &session.best_score().to_string(), value);
        y += 3;

        frame.text(x, y, "HOLD", label);
        match session.held() {
            Some(kind) => {
                let mut style = Style::plain(piece_color(kind), BLACK).bold();
                if session.hold_used() {
                    style = style.dim();
                }
                frame.text(x, y + 1, kind.as_str(), style);
            }
            None => frame.text(x, y + 1, "-", value),
        }
        y += 3;

        frame.text(x, y, "NEXT", label);
        y += 1;
        if !session.settings().show_preview {
            frame.text(x, y, "off", value.dim());
            return;
        }
        for kind in session.preview(PREVIEW_LEN) {
            frame.text(x, y, kind.as_str(), Style::plain(piece_color(*kind), BLACK).bold());
            y += 1;
        }
    }
}

fn lock_alpha_for(session: &GameSession) -> f32 {
    if session.lock_progress() > 0.0 {
        lock_alpha(session.lock_progress())
    } else {
        1.0
    }
}
