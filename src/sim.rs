use log::debug;
use rand::Rng;
use std::collections::VecDeque;

/// The playable rectangle, measured in board units. Width and height are
/// whole multiples of `cell_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
}

impl Board {
    pub fn new(width: i32, height: i32, cell_size: i32) -> Self {
        assert!(cell_size > 0, "cell size must be positive");
        assert!(
            width > 0 && height > 0 && width % cell_size == 0 && height % cell_size == 0,
            "board {}x{} is not a whole number of {} unit cells",
            width,
            height,
            cell_size
        );
        Board {
            width,
            height,
            cell_size,
        }
    }

    pub fn cols(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    /// Cell nearest the middle of the board, snapped to the grid.
    pub fn centre(&self) -> Cell {
        Cell::new(
            self.cols() / 2 * self.cell_size,
            self.rows() / 2 * self.cell_size,
        )
    }

    /// Any cell on the board, uniformly. Ignores what is already there.
    pub fn random_cell(&self, rng: &mut impl Rng) -> Cell {
        Cell::new(
            rng.gen_range(0..self.cols()) * self.cell_size,
            rng.gen_range(0..self.rows()) * self.cell_size,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// One step in a direction, in cells.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CellDelta {
    x: i32,
    y: i32,
}

impl From<Direction> for CellDelta {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => CellDelta { x: 0, y: -1 },
            Direction::Down => CellDelta { x: 0, y: 1 },
            Direction::Left => CellDelta { x: -1, y: 0 },
            Direction::Right => CellDelta { x: 1, y: 0 },
        }
    }
}

/// Top-left corner of a grid square, in board units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn col(&self, cell_size: i32) -> i32 {
        self.x.div_euclid(cell_size)
    }

    pub fn row(&self, cell_size: i32) -> i32 {
        self.y.div_euclid(cell_size)
    }

    fn stepped(&self, direction: Direction, cell_size: i32) -> Cell {
        let delta = CellDelta::from(direction);
        Cell {
            x: self.x + delta.x * cell_size,
            y: self.y + delta.y * cell_size,
        }
    }
}

/// Head-first body. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    pub fn new(head: Cell) -> Self {
        Snake::from_cells([head])
    }

    /// Builds a snake from explicit segments, head first.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        assert!(!body.is_empty(), "a snake needs at least one segment");
        Snake { body }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Ate,
    HitWall,
    /// The session was already over; nothing changed.
    Ended,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    pub snake: Snake,
    pub direction: Direction,
    pub food: Cell,
    pub alive: bool,
}

impl SimulationState {
    /// Fresh session: a single segment in the centre heading right.
    pub fn new(board: Board, rng: &mut impl Rng) -> Self {
        SimulationState {
            snake: Snake::new(board.centre()),
            direction: Direction::Right,
            food: board.random_cell(rng),
            alive: true,
        }
    }

    /// Turns unless `candidate` would reverse through the neck.
    pub fn change_direction(&mut self, candidate: Direction) {
        if candidate != self.direction.opposite() {
            self.direction = candidate;
        }
    }

    /// Advances the simulation by one tick.
    pub fn step(
        &mut self,
        candidate: Option<Direction>,
        board: Board,
        rng: &mut impl Rng,
    ) -> StepOutcome {
        if !self.alive {
            return StepOutcome::Ended;
        }

        if let Some(candidate) = candidate {
            self.change_direction(candidate);
        }

        let new_head = self.snake.head().stepped(self.direction, board.cell_size);
        self.snake.push_head(new_head);

        let ate = new_head == self.food;
        if ate {
            self.food = board.random_cell(rng);
            debug!(
                "Ate at {:?}, length now {}, food moved to {:?}",
                new_head,
                self.snake.len(),
                self.food
            );
        } else {
            self.snake.drop_tail();
        }

        if !board.contains(new_head) {
            self.alive = false;
            return StepOutcome::HitWall;
        }

        if ate {
            StepOutcome::Ate
        } else {
            StepOutcome::Moved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    const RNG_SEED: u64 = 0x5EED_5A4E;

    fn board() -> Board {
        Board::new(800, 600, 20)
    }

    fn state(cells: &[(i32, i32)], direction: Direction, food: (i32, i32)) -> SimulationState {
        SimulationState {
            snake: Snake::from_cells(cells.iter().map(|&(x, y)| Cell::new(x, y))),
            direction,
            food: Cell::new(food.0, food.1),
            alive: true,
        }
    }

    fn body(state: &SimulationState) -> Vec<Cell> {
        state.snake.segments().copied().collect()
    }

    #[test]
    fn test_opposite_directions() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn test_new_session() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let state = SimulationState::new(board(), &mut rng);

        assert_eq!(body(&state), vec![Cell::new(400, 300)]);
        assert_eq!(state.direction, Direction::Right);
        assert!(state.alive);
        assert!(board().contains(state.food));
        assert_eq!(state.food.x % 20, 0);
        assert_eq!(state.food.y % 20, 0);
    }

    #[test]
    fn test_centre_snaps_to_grid() {
        // 39 columns: the raw midpoint (390) is not on a cell boundary
        let board = Board::new(780, 580, 20);
        assert_eq!(board.centre(), Cell::new(380, 280));
    }

    #[test]
    fn test_eating_grows_by_one() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut state = state(&[(400, 300)], Direction::Right, (420, 300));

        let outcome = state.step(None, board(), &mut rng);

        assert_eq!(outcome, StepOutcome::Ate);
        assert_eq!(body(&state), vec![Cell::new(420, 300), Cell::new(400, 300)]);
        assert!(state.alive);
        assert!(board().contains(state.food));
    }

    #[test]
    fn test_leaving_left_edge_ends_session() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut state = state(&[(0, 300)], Direction::Left, (200, 200));

        let outcome = state.step(None, board(), &mut rng);

        assert_eq!(outcome, StepOutcome::HitWall);
        assert_eq!(state.snake.head(), Cell::new(-20, 300));
        assert!(!state.alive);
    }

    #[test]
    fn test_reverse_request_ignored() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut state = state(&[(100, 100), (80, 100)], Direction::Right, (0, 0));

        state.step(Some(Direction::Left), board(), &mut rng);

        assert_eq!(state.direction, Direction::Right);
        assert_eq!(body(&state), vec![Cell::new(120, 100), Cell::new(100, 100)]);
    }

    #[test]
    fn test_reverse_ignored_for_every_direction() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let mut state = state(&[(400, 300)], direction, (0, 0));
            state.step(Some(direction.opposite()), board(), &mut rng);
            assert_eq!(state.direction, direction);
        }
    }

    #[test]
    fn test_perpendicular_turn_applies() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut state = state(&[(400, 300)], Direction::Right, (0, 0));

        state.step(Some(Direction::Up), board(), &mut rng);

        assert_eq!(state.direction, Direction::Up);
        assert_eq!(state.snake.head(), Cell::new(400, 280));
    }

    #[test]
    fn test_straight_line_movement() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut state = state(&[(400, 300)], Direction::Down, (0, 0));

        for tick in 1..=10 {
            state.step(Some(Direction::Down), board(), &mut rng);
            assert_eq!(state.snake.head(), Cell::new(400, 300 + 20 * tick));
            assert_eq!(state.snake.len(), 1);
        }
    }

    #[test]
    fn test_every_edge_is_fatal() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let cases = [
            ((0, 300), Direction::Left, Cell::new(-20, 300)),
            ((780, 300), Direction::Right, Cell::new(800, 300)),
            ((400, 0), Direction::Up, Cell::new(400, -20)),
            ((400, 580), Direction::Down, Cell::new(400, 600)),
        ];

        for (start, direction, expected_head) in cases {
            let mut state = state(&[start], direction, (200, 200));
            assert_eq!(state.step(None, board(), &mut rng), StepOutcome::HitWall);
            assert_eq!(state.snake.head(), expected_head);
            assert!(!state.alive);
        }
    }

    #[test]
    fn test_edge_cells_are_safe() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut state = state(&[(760, 0)], Direction::Right, (200, 200));

        assert_eq!(state.step(None, board(), &mut rng), StepOutcome::Moved);
        assert_eq!(state.snake.head(), Cell::new(780, 0));
        assert!(state.alive);
    }

    #[test]
    fn test_ended_session_ignores_ticks() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut state = state(&[(0, 300)], Direction::Left, (200, 200));
        state.step(None, board(), &mut rng);
        let frozen = state.clone();

        assert_eq!(
            state.step(Some(Direction::Up), board(), &mut rng),
            StepOutcome::Ended
        );
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_self_overlap_is_not_fatal() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        // Square loop: the head moves onto the segment about to become the tail
        let mut state = state(
            &[(120, 100), (100, 100), (100, 120), (120, 120), (140, 120)],
            Direction::Up,
            (0, 0),
        );

        assert_eq!(
            state.step(Some(Direction::Left), board(), &mut rng),
            StepOutcome::Moved
        );
        assert!(state.alive);
        assert_eq!(state.snake.head(), Cell::new(100, 100));
        let overlaps = state
            .snake
            .segments()
            .filter(|&&cell| cell == Cell::new(100, 100))
            .count();
        assert_eq!(overlaps, 2);

        state.step(Some(Direction::Down), board(), &mut rng);
        assert!(state.alive);
    }

    #[test]
    fn test_food_can_land_on_snake() {
        // Tiny board: the only free cells are under the snake.
        let board = Board::new(20, 40, 20);
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut state = state(&[(0, 0)], Direction::Down, (0, 20));

        assert_eq!(state.step(None, board, &mut rng), StepOutcome::Ate);
        assert!(state.snake.segments().any(|&cell| cell == state.food));
    }

    #[test]
    fn test_length_changes_by_at_most_one() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let board = Board::new(200, 200, 20);
        let mut state = SimulationState::new(board, &mut rng);
        let turns = [
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Right,
        ];

        for tick in 0..500 {
            let before = state.snake.len();
            let food = state.food;
            let candidate = Some(turns[rng.gen_range(0..turns.len())]);
            let outcome = state.step(candidate, board, &mut rng);
            match outcome {
                StepOutcome::Ate => {
                    assert_eq!(state.snake.head(), food);
                    assert_eq!(state.snake.len(), before + 1);
                }
                StepOutcome::Moved | StepOutcome::HitWall => {
                    assert_eq!(state.snake.len(), before);
                }
                StepOutcome::Ended => {
                    assert!(!state.alive);
                    assert_eq!(state.snake.len(), before);
                }
            }
            if !state.alive && outcome == StepOutcome::HitWall {
                assert!(!board.contains(state.snake.head()), "tick {}", tick);
            }
        }
    }

    #[test]
    fn test_segments_stay_adjacent() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let board = Board::new(400, 400, 20);
        let mut state = SimulationState::new(board, &mut rng);

        while state.alive {
            let candidate = match rng.gen_range(0..6) {
                0 => Some(Direction::Up),
                1 => Some(Direction::Down),
                2 => Some(Direction::Left),
                3 => Some(Direction::Right),
                _ => None,
            };
            state.step(candidate, board, &mut rng);

            let cells = body(&state);
            for pair in cells.windows(2) {
                let distance = (pair[0].x - pair[1].x).abs() + (pair[0].y - pair[1].y).abs();
                assert_eq!(distance, 20);
            }
        }
    }

    #[test]
    fn test_random_cell_in_range() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let board = Board::new(60, 40, 20);
        for _ in 0..200 {
            let cell = board.random_cell(&mut rng);
            assert!(board.contains(cell));
            assert!((0..3).contains(&cell.col(20)));
            assert!((0..2).contains(&cell.row(20)));
        }
    }

    #[test]
    fn test_cell_col_row() {
        assert_eq!(Cell::new(420, 300).col(20), 21);
        assert_eq!(Cell::new(420, 300).row(20), 15);
        assert_eq!(Cell::new(-20, 0).col(20), -1);
    }

    #[test]
    #[should_panic]
    fn test_board_must_be_whole_cells() {
        Board::new(810, 600, 20);
    }
}
