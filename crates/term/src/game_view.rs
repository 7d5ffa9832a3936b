//! GameView: maps a `core::SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::SessionSnapshot;
use crate::fb::{FrameBuffer, Glyph, Rgb, Style};
use crate::replay::ReplayFrame;
use crate::types::{Cell, Coord, LossReason, SessionStatus, SpecialKind, Tile, TileKind};

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

/// Front-end state drawn on top of the board
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardOverlay<'a> {
    pub cursor: Option<Coord>,
    pub selected: Option<Coord>,
    pub hint: Option<(Coord, Coord)>,
    /// Swap that was just rejected
    pub rejected: Option<(Coord, Coord)>,
    /// Cascade frame replacing the live board
    pub replay: Option<ReplayFrame<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const BOARD_BG: Rgb = Rgb::new(28, 28, 38);
const SELECT_BG: Rgb = Rgb::new(90, 90, 120);
const HINT_BG: Rgb = Rgb::new(40, 70, 50);
const REJECT_BG: Rgb = Rgb::new(110, 30, 30);
const CLEAR_BG: Rgb = Rgb::new(200, 200, 200);

/// Board + side panel renderer for a match-3 level.
pub struct GameView {
    /// Board cell width in terminal columns (3 leaves room for cursor brackets).
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            cell_w: 3,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
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

    fn frame_size(&self, snap: &SessionSnapshot) -> (u16, u16) {
        (
            snap.cols as u16 * self.cell_w + 2,
            snap.rows as u16 * self.cell_h + 2,
        )
    }

    /// Top-left corner of the board frame
    pub fn board_origin(&self, snap: &SessionSnapshot, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.frame_size(snap);
        let panel_w = 22;
        let x = viewport.width.saturating_sub(frame_w + panel_w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        (x, y)
    }

    /// Terminal position of the first column of board cell `at`
    pub fn cell_origin(&self, snap: &SessionSnapshot, viewport: Viewport, at: Coord) -> (u16, u16) {
        let (x, y) = self.board_origin(snap, viewport);
        (
            x + 1 + at.col.max(0) as u16 * self.cell_w,
            y + 1 + at.row.max(0) as u16 * self.cell_h,
        )
    }

    /// Render into an existing framebuffer (reused across frames).
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        overlay: &BoardOverlay<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let (frame_w, frame_h) = self.frame_size(snap);
        let (start_x, start_y) = self.board_origin(snap, viewport);

        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            frame_w - 2,
            frame_h - 2,
            ' ',
            Style::new(Rgb::new(80, 80, 90), BOARD_BG),
        );
        fb.draw_box(start_x, start_y, frame_w, frame_h, Style::default());

        let cells: &[Cell] = match overlay.replay {
            Some(frame) => frame.cells,
            None => &snap.cells,
        };
        let highlight = overlay.replay.map(|f| f.highlight).unwrap_or(&[]);

        for row in 0..snap.rows as i8 {
            for col in 0..snap.cols as i8 {
                let at = Coord::new(row, col);
                let idx = row as usize * snap.cols as usize + col as usize;
                let cell = cells.get(idx).copied().flatten();

                let mut bg = BOARD_BG;
                if overlay.hint.is_some_and(|(a, b)| a == at || b == at) {
                    bg = HINT_BG;
                }
                if overlay.selected == Some(at) {
                    bg = SELECT_BG;
                }
                if overlay.rejected.is_some_and(|(a, b)| a == at || b == at) {
                    bg = REJECT_BG;
                }
                if highlight.contains(&at) {
                    bg = CLEAR_BG;
                }

                self.draw_cell(fb, snap, viewport, at, cell, bg);
            }
        }

        if overlay.replay.is_none() {
            if let Some(cursor) = overlay.cursor {
                self.draw_cursor(fb, snap, viewport, cursor);
            }
        }

        let panel_end =
            self.draw_side_panel(fb, snap, overlay, viewport, start_x + frame_w + 2, start_y);

        // Below whichever of the board and the panel reaches further down.
        let footer_y = (start_y + frame_h).max(panel_end);
        if footer_y < viewport.height {
            let help = "move: arrows/hjkl  select: space  hint: ?  pause: p  restart: r  quit: q";
            fb.put_str(start_x, footer_y, help, Style::default().dim());
        }

        if let Some(text) = overlay_text(snap) {
            let mid_y = start_y.saturating_add(frame_h / 2);
            fb.put_str_centered(
                start_x,
                mid_y,
                frame_w,
                text,
                Style::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold(),
            );
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &SessionSnapshot,
        overlay: &BoardOverlay<'_>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, overlay, viewport, &mut fb);
        fb
    }

    fn draw_cell(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        viewport: Viewport,
        at: Coord,
        cell: Cell,
        bg: Rgb,
    ) {
        let (px, py) = self.cell_origin(snap, viewport, at);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', Style::new(BOARD_BG, bg));
        let (ch, style) = match cell {
            Some(tile) => {
                let (ch, fg) = tile_glyph(tile);
                let style = Style::new(fg, bg);
                (ch, if tile.is_special() { style.bold() } else { style })
            }
            None => ('·', Style::new(Rgb::new(90, 90, 100), bg).dim()),
        };
        fb.put_char(px + self.cell_w / 2, py + self.cell_h / 2, ch, style);
    }

    fn draw_cursor(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        viewport: Viewport,
        at: Coord,
    ) {
        if at.row < 0 || at.col < 0 || at.row as u8 >= snap.rows || at.col as u8 >= snap.cols {
            return;
        }
        if self.cell_w < 3 {
            return;
        }
        let (px, py) = self.cell_origin(snap, viewport, at);
        let y = py + self.cell_h / 2;
        let keep_bg = |x: u16| fb.get(x, y).map(|g| g.style.bg).unwrap_or(BOARD_BG);
        let left_bg = keep_bg(px);
        let right_bg = keep_bg(px + self.cell_w - 1);
        let style = Style::new(Rgb::new(255, 255, 255), left_bg).bold();
        fb.put_char(px, y, '[', style);
        fb.put_char(px + self.cell_w - 1, y, ']', style.on(right_bg));
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        overlay: &BoardOverlay<'_>,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) -> u16 {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return start_y;
        }

        let label = Style::default().bold();
        let value = Style::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let mut y = start_y;

        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u32(panel_x, y + 1, snap.score, value);
        y += 3;

        fb.put_str(panel_x, y, "MOVES", label);
        fb.put_u32(panel_x, y + 1, snap.moves_remaining, value);
        y += 3;

        if let Some(ms) = snap.time_remaining_ms {
            fb.put_str(panel_x, y, "TIME", label);
            fb.put_str(panel_x, y + 1, &format_clock(ms), value);
            y += 3;
        }
        if let Some(ms) = snap.step_time_remaining_ms {
            fb.put_str(panel_x, y, "MOVE TIMER", label);
            fb.put_str(panel_x, y + 1, &format_clock(ms), value);
            y += 3;
        }

        let depth = overlay.replay.map(|f| f.depth).unwrap_or(snap.combo_depth);
        fb.put_str(panel_x, y, "COMBO", label);
        let x = fb.put_str(panel_x, y + 1, "x", value);
        fb.put_u32(x, y + 1, depth, value);
        y += 3;

        fb.put_str(panel_x, y, "GOALS", label);
        y += 1;
        for objective in &snap.objectives {
            if y >= viewport.height {
                break;
            }
            let swatch = Style::new(kind_color(objective.kind), Rgb::new(0, 0, 0));
            fb.put_char(panel_x, y, '●', swatch);
            let x = fb.put_u32(panel_x + 2, y, objective.current.min(objective.required), value);
            let x = fb.put_str(x, y, "/", value);
            let x = fb.put_u32(x, y, objective.required, value);
            if objective.is_complete() {
                let done = Style::new(Rgb::new(100, 220, 120), Rgb::new(0, 0, 0));
                fb.put_char(x + 1, y, '✓', done);
            }
            y += 1;
        }
        y
    }
}

fn overlay_text(snap: &SessionSnapshot) -> Option<&'static str> {
    match snap.status {
        SessionStatus::Active => None,
        SessionStatus::Idle => Some("READY"),
        SessionStatus::Paused => Some("PAUSED"),
        SessionStatus::Won => Some("LEVEL COMPLETE"),
        SessionStatus::Lost => Some(match snap.loss_reason {
            Some(LossReason::LevelTimeExpired) => "TIME UP",
            Some(LossReason::MoveTimeExpired) => "TOO SLOW",
            Some(LossReason::OutOfMoves) | None => "OUT OF MOVES",
        }),
    }
}

/// `m:ss`, rounding up so the clock never shows 0:00 while time remains
pub fn format_clock(ms: u32) -> String {
    let secs = ms.div_ceil(1000);
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn kind_color(kind: TileKind) -> Rgb {
    match kind {
        TileKind::Red => Rgb::new(230, 70, 70),
        TileKind::Orange => Rgb::new(255, 160, 40),
        TileKind::Yellow => Rgb::new(240, 220, 80),
        TileKind::Green => Rgb::new(100, 220, 120),
        TileKind::Blue => Rgb::new(80, 130, 240),
        TileKind::Purple => Rgb::new(190, 110, 230),
    }
}

/// Character and color a tile is drawn with
pub fn tile_glyph(tile: Tile) -> (char, Rgb) {
    let color = kind_color(tile.kind);
    match tile.special {
        None => ('●', color),
        Some(SpecialKind::RocketHorizontal) => ('⇔', color),
        Some(SpecialKind::RocketVertical) => ('⇕', color),
        Some(SpecialKind::Bomb) => ('✱', color),
        Some(SpecialKind::Rainbow) => ('◆', Rgb::new(255, 255, 255)),
    }
}
