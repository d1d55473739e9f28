//! Plain-text rendering of the tile grid and status line for the terminal driver.
//!
//! Tiles are numbered from 1 on screen; the session uses 0-based indices.
//! Marks: `##` lit tile, `<>` already tapped this round, `..` idle tile.

use super::difficulty::columns_for;
use super::session::GameSession;

pub fn render_grid(tile_count: usize, lit: Option<usize>, tapped: &[usize]) -> String {
    let columns = columns_for(tile_count);
    let mut out = String::new();
    for row_start in (0..tile_count).step_by(columns) {
        let row_end = (row_start + columns).min(tile_count);
        let cells: Vec<String> = (row_start..row_end)
            .map(|idx| {
                let mark = if lit == Some(idx) {
                    "##"
                } else if tapped.contains(&idx) {
                    "<>"
                } else {
                    ".."
                };
                format!("[{}{:>2}]", mark, idx + 1)
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

/// Rows [`render_grid`] prints for `tile_count` tiles.
pub fn grid_rows(tile_count: usize) -> usize {
    tile_count.div_ceil(columns_for(tile_count))
}

/// Move the cursor back over a grid printed just before and draw a new frame in its place.
pub fn redraw_grid(tile_count: usize, lit: Option<usize>, tapped: &[usize]) -> String {
    let rows = grid_rows(tile_count);
    let mut out = String::new();
    if rows > 0 {
        out.push_str(&format!("\x1b[{}A\x1b[J", rows));
    }
    out.push_str(&render_grid(tile_count, lit, tapped));
    out
}

pub fn status_line(session: &GameSession) -> String {
    format!("Level {}  Score: {}", session.level(), session.score())
}

/// Parse a 1-based tile number typed by the player into a 0-based index.
pub fn parse_tile_input(input: &str, tile_count: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    if n >= 1 && n <= tile_count {
        Some(n - 1)
    } else {
        None
    }
}
