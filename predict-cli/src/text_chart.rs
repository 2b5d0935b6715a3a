//! Text rendering of histogram draw commands for terminal output.

use predict_shared::DrawCommand;

const FILLED: char = '#';
const EMPTY: char = ' ';

/// Rasterize draw commands onto a `columns` x `rows` character grid.
///
/// One cell is one surface unit; a cell is filled when its center lies inside
/// a filled rectangle. Rows are returned top to bottom.
pub fn render(commands: &[DrawCommand], columns: usize, rows: usize) -> Vec<String> {
    let mut grid = vec![vec![EMPTY; columns]; rows];

    for command in commands {
        match command {
            DrawCommand::Clear {
                x,
                y,
                width,
                height,
            } => paint(&mut grid, (*x, *y, *width, *height), EMPTY),
            DrawCommand::FillRect {
                x,
                y,
                width,
                height,
                ..
            } => paint(&mut grid, (*x, *y, *width, *height), FILLED),
        }
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

fn paint(grid: &mut [Vec<char>], (x, y, width, height): (f64, f64, f64, f64), cell: char) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    for (r, row) in grid.iter_mut().enumerate() {
        let cy = r as f64 + 0.5;
        if cy < y || cy > y + height {
            continue;
        }
        for (c, slot) in row.iter_mut().enumerate() {
            let cx = c as f64 + 0.5;
            if cx >= x && cx <= x + width {
                *slot = cell;
            }
        }
    }
}
