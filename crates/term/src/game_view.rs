//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout: the playfield frame (the grid's wall) with the side panel to its
//! right, holding the title, the NEXT preview box and the SCORE, LEVEL, LINES
//! and TIME readouts, followed by the most recent signal.

use crate::core::piece::shape_cells;
use crate::core::{GameSnapshot, Piece};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GameEvent, PieceKind, Phase, SHAPE_SIZE, WALL_COLOR};

const BLOCK: char = '█';
const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_MIN_WIDTH: u16 = 12;

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Top-left of the playfield interior in framebuffer coordinates.
#[derive(Debug, Clone, Copy)]
struct Origin {
    x: u16,
    y: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Frame size (border included) for a board of `rows x cols`.
    pub fn frame_size(&self, rows: u16, cols: u16) -> (u16, u16) {
        (
            cols.saturating_mul(self.cell_w).saturating_add(2),
            rows.saturating_mul(self.cell_h).saturating_add(2),
        )
    }

    /// Render into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let (frame_w, frame_h) = self.frame_size(snap.rows, snap.cols);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        let origin = Origin {
            x: start_x + 1,
            y: start_y + 1,
        };

        let bg = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
        fb.fill_rect(
            origin.x,
            origin.y,
            frame_w.saturating_sub(2),
            frame_h.saturating_sub(2),
            ' ',
            bg,
        );

        let wall = CellStyle::new(WALL_COLOR.into(), Rgb::new(0, 0, 0));
        draw_border(fb, start_x, start_y, frame_w, frame_h, wall);

        // Locked cells.
        for row in 0..snap.rows as usize {
            for col in 0..snap.cols as usize {
                match PieceKind::from_id(snap.cell(row, col)) {
                    Some(kind) => self.draw_block(fb, origin, row as u16, col as u16, kind),
                    None => self.fill_cell(fb, origin, row as u16, col as u16, '·', bg),
                }
            }
        }

        // Falling piece. Its pose is in bordered coordinates.
        if let Some(piece) = snap.current {
            if snap.phase != Phase::GameOver {
                for (row, col) in piece.absolute_cells() {
                    let (row, col) = (row - 1, col - 1);
                    if row >= 0 && col >= 0 && row < snap.rows as i32 && col < snap.cols as i32 {
                        self.draw_block(fb, origin, row as u16, col as u16, piece.kind());
                    }
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x.saturating_add(frame_w), start_y);

        match snap.phase {
            Phase::Paused => draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PAUSED"),
            Phase::GameOver => {
                draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER")
            }
            Phase::NotStarted => {
                draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PRESS R")
            }
            Phase::Running => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_block(&self, fb: &mut FrameBuffer, origin: Origin, row: u16, col: u16, kind: PieceKind) {
        let style = CellStyle::new(kind.color().into(), PLAY_BG).bold();
        self.fill_cell(fb, origin, row, col, BLOCK, style);
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        origin: Origin,
        row: u16,
        col: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = origin.x + col * self.cell_w;
        let py = origin.y + row * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        frame_right: u16,
        start_y: u16,
    ) {
        let panel_x = frame_right.saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < PANEL_MIN_WIDTH {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let mut y = start_y;
        fb.put_str(panel_x, y, "JATC", label);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        let box_w = SHAPE_SIZE as u16 * self.cell_w + 2;
        let box_h = SHAPE_SIZE as u16 + 2;
        draw_border(fb, panel_x, y, box_w, box_h, value);
        if let Some(next) = snap.next {
            self.draw_preview(fb, panel_x + 1, y + 1, next);
        }
        y = y.saturating_add(box_h + 1);

        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u32(panel_x, y.saturating_add(1), snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LEVEL", label);
        fb.put_u32(panel_x, y.saturating_add(1), snap.speed_level, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LINES", label);
        fb.put_u32(panel_x, y.saturating_add(1), snap.lines, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "TIME", label);
        fb.put_chars(panel_x, y.saturating_add(1), clock_text(snap.elapsed_ms), value);
        y = y.saturating_add(3);

        if let Some(event) = snap.last_event {
            let x = fb.put_str(panel_x, y, event_label(event), value.dim());
            if let GameEvent::RowsCleared { points, .. } = event {
                let x = fb.put_str(x.saturating_add(1), y, "+", value);
                fb.put_u32(x, y, points, value);
            }
        }
    }

    /// Draw the piece's north-facing mask inside the 5x5 preview box.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, piece: Piece) {
        let style = CellStyle::new(piece.kind().color().into(), Rgb::new(0, 0, 0)).bold();
        for (row, col) in shape_cells(piece.kind(), piece.rotation()) {
            let px = x + col as u16 * self.cell_w;
            fb.fill_rect(px, y + row as u16, self.cell_w, 1, BLOCK, style);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_overlay_text(
    fb: &mut FrameBuffer,
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
    text: &str,
) {
    let mid_y = start_y.saturating_add(frame_h / 2);
    let text_w = text.chars().count() as u16;
    let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
    let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
    fb.put_str(x, mid_y, text, style);
}

/// `hh:mm:ss`, hours wrapping at 24.
pub fn clock_text(elapsed_ms: u64) -> [char; 8] {
    let secs = elapsed_ms / 1000;
    let fields = [(secs / 3600) % 24, (secs / 60) % 60, secs % 60];
    let mut out = [':'; 8];
    for (i, value) in fields.iter().enumerate() {
        out[i * 3] = char::from(b'0' + (value / 10) as u8);
        out[i * 3 + 1] = char::from(b'0' + (value % 10) as u8);
    }
    out
}

/// Short display label for the last signal.
pub fn event_label(event: GameEvent) -> &'static str {
    match event {
        GameEvent::RotationAccepted => "ROTATE",
        GameEvent::RowsCleared { .. } => "CLEAR",
        GameEvent::Crashed => "CRASH",
        GameEvent::LevelUp { .. } => "LEVEL UP",
        GameEvent::GameOver => "GAME OVER",
        GameEvent::PauseToggled { paused: true } => "PAUSE",
        GameEvent::PauseToggled { paused: false } => "RESUME",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_text_formats_hours_minutes_seconds() {
        let text: String = clock_text(0).iter().collect();
        assert_eq!(text, "00:00:00");
        let text: String = clock_text(3_723_999).iter().collect();
        assert_eq!(text, "01:02:03");
        // Hours wrap after a day.
        let text: String = clock_text(25 * 3_600_000).iter().collect();
        assert_eq!(text, "01:00:00");
    }

    #[test]
    fn frame_size_tracks_board_dimensions() {
        let view = GameView::default();
        assert_eq!(view.frame_size(20, 10), (22, 22));
        assert_eq!(view.frame_size(8, 6), (14, 10));
    }
}
