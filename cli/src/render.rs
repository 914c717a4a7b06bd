use minesweeper_core::{CellView, EngineState, Game, MineGenerator, iter_coords};
use minesweeper_protocol::PresentationHints;
use std::fmt::Write;

fn glyph(view: CellView) -> char {
    match view {
        CellView::Hidden => '#',
        CellView::Flagged => 'F',
        CellView::Revealed(0) => '.',
        CellView::Revealed(count) => char::from(b'0' + count),
        CellView::Mine => '*',
        CellView::Blasted => 'X',
        CellView::FalseFlag => '!',
    }
}

fn face(state: EngineState) -> &'static str {
    match state {
        EngineState::Ready | EngineState::Active => ":)",
        EngineState::Won => "B)",
        EngineState::Lost => "X(",
    }
}

/// Text board with row and column indices, followed by the counters line.
pub fn render<G: MineGenerator>(game: &Game<G>, hints: &PresentationHints) -> String {
    let (rows, cols) = game.size();
    let mut out = String::new();

    out.push_str("    ");
    for col in 0..cols {
        let _ = write!(out, "{:>3}", col);
    }
    out.push('\n');

    for row in 0..rows {
        let _ = write!(out, "{:>3} ", row);
        for col in 0..cols {
            let view = game.board()[(row, col)].view();
            let _ = write!(out, "{:>3}", glyph(view));
        }
        out.push('\n');
    }

    let flagged = iter_coords(game.size())
        .filter(|&coords| game.board()[coords].is_flagged())
        .count();
    let _ = writeln!(
        out,
        "{}  mines left: {}  flags: {}  time: {}s  [{}]",
        face(game.state()),
        game.mines_remaining(),
        flagged,
        hints.elapsed_time,
        hints.selected_difficulty
    );
    out
}
