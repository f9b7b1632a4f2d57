use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// Terminal cells per board column; leaves room for a border and a
/// double-width glyph.
const CELL_WIDTH: u16 = 7;
/// Terminal rows per board row: border, glyph line, border.
const CELL_HEIGHT: u16 = 3;

/// Number of grid columns for a board of `slot_count` slots. The board
/// stays as square as possible: 9 slots give 3x3, 4 give 2x2.
pub fn columns(slot_count: usize) -> usize {
    (slot_count as f64).sqrt().ceil() as usize
}

pub fn rows(slot_count: usize) -> usize {
    let cols = columns(slot_count);
    if cols == 0 {
        return 0;
    }
    (slot_count + cols - 1) / cols
}

/// Largest board that fits in `area`, centered. May be smaller than the
/// ideal cell size on cramped terminals; callers skip glyphs that no
/// longer fit.
pub fn board_rect(area: Rect, slot_count: usize) -> Rect {
    let cols = columns(slot_count) as u16;
    let row_count = rows(slot_count) as u16;
    if cols == 0 || row_count == 0 {
        return Rect::default();
    }

    let width = (cols * CELL_WIDTH).min(area.width);
    let height = (row_count * CELL_HEIGHT).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Rect of one slot's cell inside the board returned by `board_rect`.
pub fn cell_rect(board: Rect, slot: usize, slot_count: usize) -> Rect {
    let cols = columns(slot_count) as u16;
    let row_count = rows(slot_count) as u16;
    if cols == 0 || row_count == 0 {
        return Rect::default();
    }

    let cell_width = board.width / cols;
    let cell_height = board.height / row_count;
    let col = (slot as u16) % cols;
    let row = (slot as u16) / cols;

    Rect {
        x: board.x + col * cell_width,
        y: board.y + row * cell_height,
        width: cell_width,
        height: cell_height,
    }
}

/// Left padding that centers `text` in a span of `width` terminal cells,
/// accounting for double-width glyphs.
pub fn centered_pad(text: &str, width: u16) -> u16 {
    let text_width = text.width() as u16;
    width.saturating_sub(text_width) / 2
}
