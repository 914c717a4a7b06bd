use alloc::collections::VecDeque;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No reveal yet, mines are not placed.
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

/// One Minesweeper session, from the first reveal to a win or a loss.
///
/// Mines are placed lazily by `G` on the first [`Game::reveal`] so that the first revealed cell is never a mine.
/// Every operation runs to completion and reports what happened as [`GameEvents`].
#[derive(Clone, Debug, PartialEq)]
pub struct Game<G = RandomMineGenerator> {
    config: GameConfig,
    board: Board,
    flagged_count: CellCount,
    state: EngineState,
    triggered_mine: Option<Coord2>,
    generator: G,
}

impl<G: MineGenerator> Game<G> {
    pub fn new(config: GameConfig, generator: G) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            board: Board::new(config.size()),
            flagged_count: 0,
            state: EngineState::Ready,
            triggered_mine: None,
            generator,
        })
    }

    /// Rebuilds a game from a restored board. Neighbor counts are recomputed, never trusted.
    pub(crate) fn from_parts(
        config: GameConfig,
        board: Board,
        state: EngineState,
        generator: G,
    ) -> Self {
        let flagged_count = board.count_flagged();
        let triggered_mine =
            iter_coords(board.size()).find(|&coords| board[coords].was_blasted);
        Self {
            config,
            board,
            flagged_count,
            state,
            triggered_mine,
            generator,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn has_started(&self) -> bool {
        !self.state.is_ready()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_finished()
    }

    /// Flags the player may still place. Never negative, flagging stops at zero.
    pub fn mines_remaining(&self) -> CellCount {
        self.config.mines() - self.flagged_count
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.config.validate_coords(coords)?;
        Ok(self.board[coords])
    }

    pub fn view_at(&self, coords: Coord2) -> Result<CellView> {
        self.cell_at(coords).map(|cell| cell.view())
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Whether the win condition of the configured [`WinPolicy`] holds right now.
    pub fn check_win(&self) -> bool {
        if matches!(self.state, EngineState::Ready | EngineState::Lost) {
            return false;
        }

        win_condition_holds(&self.config, &self.board, self.flagged_count)
    }

    /// Whether [`Game::reveal_adjacent`] at `coords` would reveal anything.
    pub fn can_chord_at(&self, coords: Coord2) -> bool {
        if self.state.is_finished() || !self.config.contains(coords) {
            return false;
        }

        let cell = self.board[coords];
        cell.is_revealed
            && !cell.is_mine
            && cell.neighbor_mines > 0
            && self.board.count_flagged_neighbors(coords) == cell.neighbor_mines
    }

    /// Cells a chord press at `coords` would push down: the cell itself and its neighbors, when covered.
    pub fn chord_targets(&self, coords: Coord2) -> Result<Vec<Coord2>> {
        let coords = self.config.validate_coords(coords)?;
        if self.state.is_finished() {
            return Ok(Vec::new());
        }

        Ok(core::iter::once(coords)
            .chain(self.board.iter_neighbors(coords))
            .filter(|&pos| self.board[pos].is_covered())
            .collect())
    }

    /// Reveals a cell, flood-filling from it when it has no adjacent mines.
    ///
    /// The first call of a session places the mines around `coords` and reports [`GameEvents::STARTED`].
    /// Revealing a flagged or revealed cell, or any cell once the game is over, changes nothing.
    pub fn reveal(&mut self, coords: Coord2) -> Result<GameEvents> {
        let coords = self.config.validate_coords(coords)?;

        let mut events = GameEvents::empty();
        if self.state.is_ready() {
            self.place_mines(coords)?;
            events |= GameEvents::STARTED;
        }

        Ok(events | self.reveal_cell(coords))
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<GameEvents> {
        let coords = self.config.validate_coords(coords)?;

        if self.state.is_finished() || self.board[coords].is_revealed {
            return Ok(GameEvents::empty());
        }

        let total_mines = self.config.mines();
        let cell = &mut self.board[coords];
        if cell.is_flagged {
            cell.is_flagged = false;
            self.flagged_count -= 1;
        } else if self.flagged_count < total_mines {
            cell.is_flagged = true;
            self.flagged_count += 1;
        } else {
            log::debug!("No flags left, ignoring flag at {:?}", coords);
            return Ok(GameEvents::empty());
        }

        Ok(GameEvents::CHANGED | self.finish_if_won())
    }

    /// Chord: reveals every unflagged neighbor of a numbered cell once as many neighbors are flagged as it counts.
    ///
    /// Flags are trusted, a misplaced one makes this lose the game.
    pub fn reveal_adjacent(&mut self, coords: Coord2) -> Result<GameEvents> {
        let coords = self.config.validate_coords(coords)?;

        if !self.can_chord_at(coords) {
            return Ok(GameEvents::empty());
        }

        let mut events = GameEvents::empty();
        for neighbor in self.board.iter_neighbors(coords) {
            if !self.board[neighbor].is_flagged {
                events |= self.reveal_cell(neighbor);
            }
        }

        Ok(events | self.finish_if_won())
    }

    fn place_mines(&mut self, safe: Coord2) -> Result<()> {
        let layout = self.generator.generate(&self.config, safe)?;

        if layout.size() != self.config.size() {
            return Err(GameError::InvalidBoardShape);
        }
        if layout.contains_mine(safe) {
            return Err(GameError::UnsafeStart);
        }
        if layout.mine_count() != self.config.mines() {
            return Err(GameError::MineCountMismatch);
        }

        self.board.place_mines(&layout);
        self.state = EngineState::Active;
        log::debug!("Game started from {:?}", safe);
        Ok(())
    }

    fn reveal_cell(&mut self, coords: Coord2) -> GameEvents {
        if self.state.is_finished() || !self.board[coords].is_covered() {
            return GameEvents::empty();
        }

        if self.board[coords].is_mine {
            let cell = &mut self.board[coords];
            cell.is_revealed = true;
            cell.was_blasted = true;
            self.triggered_mine = Some(coords);
            self.state = EngineState::Lost;
            self.reveal_all_mines();
            log::debug!("Mine hit at {:?}, game lost", coords);
            return GameEvents::CHANGED | GameEvents::LOST;
        }

        self.flood_reveal(coords);
        GameEvents::CHANGED | self.finish_if_won()
    }

    fn flood_reveal(&mut self, origin: Coord2) {
        let mut to_visit = VecDeque::from([origin]);

        while let Some(coords) = to_visit.pop_front() {
            let cell = &mut self.board[coords];
            if !cell.is_covered() || cell.is_mine {
                continue;
            }

            cell.is_revealed = true;
            let count = cell.neighbor_mines;
            log::trace!("Revealed {:?}, adjacent mines: {}", coords, count);

            if count == 0 {
                to_visit.extend(
                    self.board
                        .iter_neighbors(coords)
                        .filter(|&pos| self.board[pos].is_covered()),
                );
            }
        }
    }

    /// Uncovers the rest of the mines and marks wrong flags, after a loss.
    fn reveal_all_mines(&mut self) {
        for coords in iter_coords(self.config.size()) {
            let cell = &mut self.board[coords];
            if cell.is_mine {
                if !cell.was_blasted {
                    cell.is_revealed = true;
                }
            } else if cell.is_flagged {
                cell.was_falsely_flagged = true;
            }
        }
    }

    fn finish_if_won(&mut self) -> GameEvents {
        if self.state.is_finished() || !self.check_win() {
            return GameEvents::empty();
        }

        self.state = EngineState::Won;
        self.triggered_mine = None;
        log::debug!("All safe cells revealed, game won");
        GameEvents::WON
    }
}

/// The win condition of `config`'s policy on `board`, whatever state the game is in.
pub(crate) fn win_condition_holds(config: &GameConfig, board: &Board, flagged: CellCount) -> bool {
    let all_safe_revealed = board.all_safe_revealed();
    match config.win_policy() {
        WinPolicy::RevealAllSafe => all_safe_revealed,
        WinPolicy::FlagAllMines => all_safe_revealed && flagged == config.mines(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: Coord2, mines: &[Coord2]) -> Game<FixedMineGenerator> {
        game_with_policy(size, mines, WinPolicy::RevealAllSafe)
    }

    fn game_with_policy(
        size: Coord2,
        mines: &[Coord2],
        policy: WinPolicy,
    ) -> Game<FixedMineGenerator> {
        let config = GameConfig::new(size.0, size.1, mines.len() as CellCount)
            .unwrap()
            .with_win_policy(policy);
        Game::new(config, FixedMineGenerator::new(mines)).unwrap()
    }

    fn revealed(game: &Game<FixedMineGenerator>, coords: Coord2) -> bool {
        game.board()[coords].is_revealed()
    }

    #[test]
    fn fresh_game_has_no_mines() {
        let game = Game::new(GameConfig::new(9, 9, 10).unwrap(), RandomMineGenerator::new(3)).unwrap();

        assert_eq!(game.state(), EngineState::Ready);
        assert!(!game.has_started());
        assert_eq!(game.mines_remaining(), 10);
        assert_eq!(game.board().count_mines(), 0);
    }

    #[test]
    fn first_reveal_starts_and_places_mines() {
        let mut game = Game::new(GameConfig::new(9, 9, 10).unwrap(), RandomMineGenerator::new(11)).unwrap();

        let events = game.reveal((4, 4)).unwrap();

        assert!(events.contains(GameEvents::STARTED | GameEvents::CHANGED));
        assert!(game.has_started());
        assert_eq!(game.board().count_mines(), 10);
        assert!(!game.board()[(4, 4)].is_mine());
        assert!(revealed_any(&game));
    }

    fn revealed_any<G: MineGenerator>(game: &Game<G>) -> bool {
        game.board().cells().iter().any(|cell| cell.is_revealed())
    }

    #[test]
    fn started_is_reported_once() {
        let mut game = game((3, 3), &[(0, 0)]);

        assert!(game.reveal((2, 2)).unwrap().contains(GameEvents::STARTED));
        assert!(!game.reveal((0, 1)).unwrap().contains(GameEvents::STARTED));
    }

    #[test]
    fn failed_generation_keeps_game_ready() {
        let mut game = game((3, 3), &[(1, 1)]);

        assert_eq!(game.reveal((1, 1)), Err(GameError::UnsafeStart));
        assert_eq!(game.state(), EngineState::Ready);
        assert_eq!(game.board().count_mines(), 0);
    }

    #[test]
    fn reveal_out_of_bounds_is_an_error() {
        let mut game = game((3, 3), &[(0, 0)]);

        assert_eq!(game.reveal((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(game.toggle_flag((0, 3)), Err(GameError::InvalidCoords));
        assert_eq!(game.reveal_adjacent((9, 9)), Err(GameError::InvalidCoords));
        assert!(!game.has_started());
    }

    #[test]
    fn flood_fill_opens_zero_region_and_border() {
        // mines along the right column split off a 5x3 zero region
        let mines = [(0, 4), (1, 4), (2, 4), (3, 4), (4, 4)];
        let mut game = game((5, 5), &mines);

        game.reveal((0, 0)).unwrap();

        for row in 0..5 {
            for col in 0..3 {
                assert!(revealed(&game, (row, col)), "({}, {})", row, col);
                assert_eq!(game.board()[(row, col)].neighbor_mines(), 0);
            }
            assert!(revealed(&game, (row, 3)));
            assert!(game.board()[(row, 3)].neighbor_mines() > 0);
            assert!(!revealed(&game, (row, 4)));
        }
        assert_eq!(game.state(), EngineState::Won);
    }

    #[test]
    fn flood_fill_stops_at_flags() {
        let mut game = game((1, 5), &[(0, 4)]);

        game.toggle_flag((0, 1)).unwrap();
        game.reveal((0, 0)).unwrap();

        assert!(revealed(&game, (0, 0)));
        assert!(!revealed(&game, (0, 1)));
        assert!(!revealed(&game, (0, 2)));
        assert!(game.board()[(0, 1)].is_flagged());
    }

    #[test]
    fn numbered_cell_reveals_alone() {
        let mut game = game((3, 3), &[(0, 0), (2, 2)]);

        game.reveal((1, 1)).unwrap();

        assert_eq!(game.view_at((1, 1)).unwrap(), CellView::Revealed(2));
        assert_eq!(
            game.board().cells().iter().filter(|cell| cell.is_revealed()).count(),
            1
        );
    }

    #[test]
    fn repeated_reveal_is_a_no_op() {
        let mut game = game((3, 3), &[(0, 0), (2, 2)]);

        game.reveal((1, 1)).unwrap();
        let before = game.clone();

        assert_eq!(game.reveal((1, 1)).unwrap(), GameEvents::empty());
        assert_eq!(game, before);
    }

    #[test]
    fn hitting_mine_loses_and_reveals_board() {
        let mut game = game((3, 3), &[(0, 0), (0, 2)]);

        game.reveal((2, 2)).unwrap();
        game.toggle_flag((0, 2)).unwrap();
        game.toggle_flag((0, 1)).unwrap();
        let events = game.reveal((0, 0)).unwrap();

        assert_eq!(events, GameEvents::CHANGED | GameEvents::LOST);
        assert_eq!(game.state(), EngineState::Lost);
        assert_eq!(game.triggered_mine(), Some((0, 0)));
        assert_eq!(game.view_at((0, 0)).unwrap(), CellView::Blasted);
        assert!(revealed(&game, (0, 2)));
        assert_eq!(game.view_at((0, 2)).unwrap(), CellView::Flagged);
        assert!(game.board()[(0, 1)].was_falsely_flagged());
        assert!(!game.board()[(0, 2)].was_falsely_flagged());
    }

    #[test]
    fn finished_game_ignores_moves() {
        let mut game = game((2, 2), &[(0, 0)]);

        game.reveal((1, 1)).unwrap();
        game.reveal((0, 0)).unwrap();
        assert!(game.is_game_over());
        let before = game.clone();

        assert_eq!(game.reveal((0, 1)).unwrap(), GameEvents::empty());
        assert_eq!(game.toggle_flag((0, 1)).unwrap(), GameEvents::empty());
        assert_eq!(game.reveal_adjacent((1, 1)).unwrap(), GameEvents::empty());
        assert_eq!(game, before);
    }

    #[test]
    fn flag_budget_is_enforced() {
        let mut game = game((3, 3), &[(0, 0)]);

        assert_eq!(game.toggle_flag((1, 1)).unwrap(), GameEvents::CHANGED);
        assert_eq!(game.mines_remaining(), 0);

        assert_eq!(game.toggle_flag((2, 2)).unwrap(), GameEvents::empty());
        assert!(!game.board()[(2, 2)].is_flagged());
        assert_eq!(game.mines_remaining(), 0);

        game.toggle_flag((1, 1)).unwrap();
        assert_eq!(game.mines_remaining(), 1);
        assert!(!game.board()[(1, 1)].is_flagged());
    }

    #[test]
    fn revealed_cell_cannot_be_flagged() {
        let mut game = game((3, 3), &[(0, 0), (2, 2)]);

        game.reveal((1, 1)).unwrap();

        assert_eq!(game.toggle_flag((1, 1)).unwrap(), GameEvents::empty());
        assert_eq!(game.mines_remaining(), 2);
    }

    #[test]
    fn first_reveal_on_flag_starts_without_revealing() {
        let mut game = game((3, 3), &[(2, 2)]);

        game.toggle_flag((0, 0)).unwrap();
        let events = game.reveal((0, 0)).unwrap();

        assert_eq!(events, GameEvents::STARTED);
        assert!(game.has_started());
        assert!(!revealed_any(&game));
    }

    #[test]
    fn chord_reveals_unflagged_neighbors() {
        let mines = &[(0, 0), (0, 2)];
        let mut game = game((4, 3), mines);

        game.reveal((1, 1)).unwrap();
        assert_eq!(game.view_at((1, 1)).unwrap(), CellView::Revealed(2));
        game.toggle_flag((0, 0)).unwrap();
        game.toggle_flag((0, 2)).unwrap();
        assert!(game.can_chord_at((1, 1)));

        let events = game.reveal_adjacent((1, 1)).unwrap();

        assert!(events.contains(GameEvents::CHANGED | GameEvents::WON));
        assert!(revealed(&game, (0, 1)));
        assert!(revealed(&game, (1, 0)));
        assert!(revealed(&game, (2, 1)));
        // cascade from the zero row
        assert!(revealed(&game, (3, 0)));
        assert!(!revealed(&game, (0, 0)));
    }

    #[test]
    fn chord_with_wrong_flag_count_is_a_no_op() {
        let mut game = game((3, 3), &[(0, 0), (0, 2)]);

        game.reveal((1, 1)).unwrap();
        game.toggle_flag((0, 0)).unwrap();
        let before = game.clone();

        assert!(!game.can_chord_at((1, 1)));
        assert_eq!(game.reveal_adjacent((1, 1)).unwrap(), GameEvents::empty());
        assert_eq!(game, before);
    }

    #[test]
    fn chord_on_hidden_or_zero_cell_is_a_no_op() {
        let mut game = game((1, 4), &[(0, 3)]);

        assert_eq!(game.reveal_adjacent((0, 0)).unwrap(), GameEvents::empty());
        game.reveal((0, 0)).unwrap();
        assert_eq!(game.view_at((0, 0)).unwrap(), CellView::Revealed(0));
        assert_eq!(game.reveal_adjacent((0, 0)).unwrap(), GameEvents::empty());
    }

    #[test]
    fn chord_trusts_misplaced_flag_and_loses() {
        let mut game = game((3, 3), &[(0, 0)]);

        game.reveal((1, 1)).unwrap();
        game.toggle_flag((0, 1)).unwrap();

        let events = game.reveal_adjacent((1, 1)).unwrap();

        assert!(events.contains(GameEvents::LOST));
        assert!(!events.contains(GameEvents::WON));
        assert_eq!(game.triggered_mine(), Some((0, 0)));
        assert!(game.board()[(0, 1)].was_falsely_flagged());
    }

    #[test]
    fn chord_targets_cover_covered_neighbors() {
        let mut game = game((3, 3), &[(0, 0), (2, 2)]);

        game.reveal((1, 1)).unwrap();
        game.toggle_flag((0, 0)).unwrap();

        let targets = game.chord_targets((1, 1)).unwrap();
        assert_eq!(targets.len(), 7);
        assert!(!targets.contains(&(0, 0)));
        assert!(!targets.contains(&(1, 1)));
        assert_eq!(game.chord_targets((2, 1)).unwrap()[0], (2, 1));
    }

    #[test]
    fn reveal_only_policy_wins_without_flags() {
        let mut game = game((3, 3), &[(2, 2)]);

        let events = game.reveal((0, 0)).unwrap();

        assert_eq!(
            events,
            GameEvents::STARTED | GameEvents::CHANGED | GameEvents::WON
        );
        assert_eq!(game.mines_remaining(), 1);
        assert!(game.check_win());
    }

    #[test]
    fn flag_policy_needs_last_flag_to_win() {
        let mut game = game_with_policy((3, 3), &[(2, 2)], WinPolicy::FlagAllMines);

        let events = game.reveal((0, 0)).unwrap();

        assert!(!events.contains(GameEvents::WON));
        for coords in [(0, 0), (0, 1), (0, 2), (1, 0), (2, 0)] {
            assert!(revealed(&game, coords));
            assert_eq!(game.board()[coords].neighbor_mines(), 0);
        }
        for coords in [(1, 1), (1, 2), (2, 1)] {
            assert!(revealed(&game, coords));
            assert_eq!(game.board()[coords].neighbor_mines(), 1);
        }
        assert!(!revealed(&game, (2, 2)));
        assert!(!game.check_win());

        let events = game.toggle_flag((2, 2)).unwrap();

        assert_eq!(game.mines_remaining(), 0);
        assert!(game.check_win());
        assert_eq!(events, GameEvents::CHANGED | GameEvents::WON);
        assert_eq!(game.state(), EngineState::Won);
    }

    #[test]
    fn generator_can_be_borrowed() {
        let mut generator = FixedMineGenerator::new([(0, 0)]);
        let config = GameConfig::new(2, 2, 1).unwrap();
        let mut game = Game::new(config, &mut generator).unwrap();

        game.reveal((1, 1)).unwrap();

        assert!(game.board()[(0, 0)].is_mine());
    }
}
