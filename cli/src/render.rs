use std::fmt::Write;

use mine3d_core::{BoardView, CellStatus, CellView, GameStatus};

/// Draws the snapshot one z layer at a time, x across and y down.
pub fn render(view: &BoardView) -> String {
    let (size_x, size_y, size_z) = view.size;
    let mut out = String::new();

    let _ = writeln!(out, "{:?}  mines left: {}", view.status, view.mines_left);
    for z in 0..size_z {
        let _ = writeln!(out, "z = {z}");
        out.push_str("     ");
        for x in 0..size_x {
            let _ = write!(out, "{} ", x % 10);
        }
        truncate_trailing(&mut out);
        out.push('\n');

        for y in 0..size_y {
            let _ = write!(out, "{y:>3}  ");
            for x in 0..size_x {
                let symbol = view
                    .cell_at((x, y, z))
                    .map_or('?', |cell| cell_symbol(cell, view.status));
                out.push(symbol);
                out.push(' ');
            }
            truncate_trailing(&mut out);
            out.push('\n');
        }
    }
    out
}

pub fn cell_symbol(cell: &CellView, status: GameStatus) -> char {
    if status == GameStatus::Lost && cell.mine && cell.status != CellStatus::Flagged {
        return '*';
    }
    if !cell.visible {
        return ' ';
    }
    match cell.status {
        CellStatus::Hidden => '#',
        CellStatus::Flagged => 'F',
        CellStatus::Revealed if cell.mine => '*',
        CellStatus::Revealed if cell.adjacent_mines == 0 => '.',
        CellStatus::Revealed => char::from_digit(cell.adjacent_mines.into(), 36).unwrap_or('?'),
    }
}

fn truncate_trailing(out: &mut String) {
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
}
