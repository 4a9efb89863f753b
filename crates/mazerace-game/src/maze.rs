//! Perfect-maze generation.
//!
//! Passages are carved by a randomized depth-first walk over the lattice of
//! odd-coordinate cells. Each step jumps two cells and knocks down the wall
//! cell in between, so the carved passages form a spanning tree over the
//! lattice: every passage cell is reachable and there are no loops.

use rand::Rng;
use rand::seq::SliceRandom;

use mazerace_protocol::{MazeGrid, MazeInfo};

use crate::MazeDimensions;

/// Lattice steps: down, up, right, left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 2), (0, -2), (2, 0), (-2, 0)];

/// A single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Passage,
    Wall,
}

impl Cell {
    /// Wire code: `0` for a passage, `1` for a wall.
    pub fn code(self) -> u8 {
        match self {
            Self::Passage => 0,
            Self::Wall => 1,
        }
    }
}

/// A generated maze with its goal cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    dims: MazeDimensions,
    /// Row-major, `height * width` cells.
    cells: Vec<Cell>,
    goal: (usize, usize),
}

/// One level of the depth-first walk.
struct Frame {
    x: usize,
    y: usize,
    dirs: [(isize, isize); 4],
    next: usize,
}

impl Maze {
    /// Every round starts here.
    pub const START: (usize, usize) = (1, 1);

    /// Generates a fresh maze from the thread-local entropy source.
    pub fn generate(dims: MazeDimensions) -> Self {
        Self::generate_with_rng(dims, &mut rand::rng())
    }

    /// Generates a maze using the given RNG. The result is fully determined
    /// by the sequence of shuffles the RNG produces.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        dims: MazeDimensions,
        rng: &mut R,
    ) -> Self {
        let (width, height) = (dims.width(), dims.height());
        tracing::debug!(width, height, "generating maze");

        let mut maze = Self {
            dims,
            cells: vec![Cell::Wall; width * height],
            goal: Self::START,
        };

        let (sx, sy) = Self::START;
        maze.carve(sx, sy);
        let mut stack = vec![Frame::new(sx, sy, &mut *rng)];

        // Iterative form of the recursive walk: the top frame is the cell
        // currently being expanded, `next` the direction to try next.
        while let Some(frame) = stack.last_mut() {
            let Some(&(dx, dy)) = frame.dirs.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let (x, y) = (frame.x, frame.y);

            let Some((nx, ny)) = maze.interior_step(x, y, dx, dy) else {
                continue;
            };
            if maze.get(nx, ny) != Cell::Wall {
                continue;
            }
            maze.carve((x + nx) / 2, (y + ny) / 2);
            maze.carve(nx, ny);
            stack.push(Frame::new(nx, ny, &mut *rng));
        }

        // Widths and heights are odd, so `side - 2` is already odd; the
        // parity fix only matters if that ever changes.
        let mut goal_x = width - 2;
        let mut goal_y = height - 2;
        if goal_x % 2 == 0 {
            goal_x -= 1;
        }
        if goal_y % 2 == 0 {
            goal_y -= 1;
        }
        maze.carve(goal_x, goal_y);
        maze.goal = (goal_x, goal_y);

        tracing::info!(%dims, goal_x, goal_y, "maze generated");
        maze
    }

    /// Target of a lattice step if it lies strictly inside the border.
    fn interior_step(
        &self,
        x: usize,
        y: usize,
        dx: isize,
        dy: isize,
    ) -> Option<(usize, usize)> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        let inside = nx > 0
            && nx < self.width() - 1
            && ny > 0
            && ny < self.height() - 1;
        inside.then_some((nx, ny))
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width() + x
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[self.index(x, y)]
    }

    fn carve(&mut self, x: usize, y: usize) {
        let i = self.index(x, y);
        self.cells[i] = Cell::Passage;
    }

    pub fn dimensions(&self) -> MazeDimensions {
        self.dims
    }

    pub fn width(&self) -> usize {
        self.dims.width()
    }

    pub fn height(&self) -> usize {
        self.dims.height()
    }

    pub fn goal(&self) -> (usize, usize) {
        self.goal
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width() && y < self.height()).then(|| self.get(x, y))
    }

    pub fn is_passage(&self, x: usize, y: usize) -> bool {
        self.cell(x, y) == Some(Cell::Passage)
    }

    /// Row-major cell codes for the maze query endpoint.
    pub fn to_grid(&self) -> MazeGrid {
        self.cells
            .chunks(self.width())
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }

    /// Goal and dimensions for the maze info endpoint.
    pub fn info(&self) -> MazeInfo {
        MazeInfo {
            goal_x: self.goal.0,
            goal_y: self.goal.1,
            width: self.width(),
            height: self.height(),
        }
    }
}

impl Frame {
    fn new<R: Rng + ?Sized>(x: usize, y: usize, rng: &mut R) -> Self {
        let mut dirs = DIRECTIONS;
        dirs.shuffle(rng);
        Self { x, y, dirs, next: 0 }
    }
}
