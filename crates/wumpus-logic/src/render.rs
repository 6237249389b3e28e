//! Debug text rendering.
//!
//! ```text
//!
//! ############ |
//! #..........# |...
//! #....@.....# |.@.
//! ...
//! ############ |
//!
//! ........
//! ```
//!
//! The board sits between two frame lines, which hold the top and bottom
//! edge when `border` is set and are blank otherwise. Each row of the cave
//! is followed by ` |` and, on the three rows around the player, the
//! player's 3×3 view. The last line lists the eight observed neighbors in
//! observation order.

use crate::cave::Cave;
use crate::cell::Cell;
use crate::direction::Position;

/// Glyph drawn at the player's position.
pub const PLAYER_GLYPH: char = '@';
const BORDER_GLYPH: char = '#';

/// Draw the whole cave with the player overlaid, optionally framed.
pub fn draw_board(cave: &Cave, player: Position, border: bool) -> String {
    let rows = cave.rows();
    let cols = cave.columns();
    let mut out = String::with_capacity((rows + 3) * (cols + 10));

    push_frame_line(&mut out, cols, border);

    for r in 0..rows {
        if border {
            out.push(BORDER_GLYPH);
        }
        for c in 0..cols {
            let pos = Position::new(r as i32, c as i32);
            out.push(glyph_at(cave, player, pos));
        }
        if border {
            out.push(BORDER_GLYPH);
        }
        out.push_str(" |");

        let r = r as i32;
        if (player.row - 1..=player.row + 1).contains(&r) {
            for c in player.col - 1..=player.col + 1 {
                out.push(glyph_at(cave, player, Position::new(r, c)));
            }
        }
        out.push('\n');
    }

    push_frame_line(&mut out, cols, border);
    out.push_str(&view_line(cave, player));
    out.push('\n');
    out
}

/// The eight neighbor glyphs in observation order.
pub fn view_line(cave: &Cave, player: Position) -> String {
    cave.what_do_i_see(player).iter().map(|c| c.glyph()).collect()
}

/// Just the 3×3 window around the player, one row per line.
pub fn draw_view(cave: &Cave, player: Position) -> String {
    let mut out = String::with_capacity(12);
    for dr in -1..=1 {
        for dc in -1..=1 {
            out.push(glyph_at(cave, player, Position::new(player.row + dr, player.col + dc)));
        }
        out.push('\n');
    }
    out
}

fn glyph_at(cave: &Cave, player: Position, pos: Position) -> char {
    if pos == player {
        PLAYER_GLYPH
    } else {
        cave.cell(pos).glyph()
    }
}

fn push_frame_line(out: &mut String, cols: usize, border: bool) {
    if border {
        out.extend(std::iter::repeat(BORDER_GLYPH).take(cols + 2));
    }
    out.push('\n');
}

/// Parse the trailing observation line back into cells.
pub fn parse_view_line(line: &str) -> Option<[Cell; 8]> {
    let mut cells = [Cell::Wall; 8];
    let mut chars = line.chars();
    for slot in cells.iter_mut() {
        *slot = Cell::from_glyph(chars.next()?)?;
    }
    if chars.next().is_some() {
        return None;
    }
    Some(cells)
}
