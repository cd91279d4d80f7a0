//! The 8-puzzle: a 3x3 board with eight numbered tiles and one blank.

use std::{
    fmt::{Display, Write},
    ops::Index,
    path::Path,
};

use itertools::Itertools;
use pathfinding::directed::bfs::bfs;

use crate::{
    search::{Cost, Neighbors, SearchProblem},
    Error, Result,
};

pub const SIDE: usize = 3;
pub const BLANK: u8 = 0;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    tiles: [u8; SIDE * SIDE],
}

/// Direction the blank moves in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Order in which successors are generated.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// W/A/S/D, case-insensitive.
    pub fn from_key(key: char) -> Option<Direction> {
        match key.to_ascii_uppercase() {
            'W' => Some(Direction::Up),
            'S' => Some(Direction::Down),
            'A' => Some(Direction::Left),
            'D' => Some(Direction::Right),
            _ => None,
        }
    }
}

impl Board {
    /// Build a board from tiles in row-major order. The tiles must be
    /// exactly the numbers 0 to 8.
    pub fn new(tiles: [u8; SIDE * SIDE]) -> Result<Board> {
        match tiles.iter().filter(|&&t| t == BLANK).count() {
            0 => return Err(Error::MissingBlank),
            1 => {}
            _ => return Err(Error::DuplicateTile(BLANK)),
        }

        let mut seen = [false; SIDE * SIDE];
        for &t in &tiles {
            let slot = seen
                .get_mut(t as usize)
                .ok_or(Error::TileOutOfRange(t as u32))?;
            if *slot {
                return Err(Error::DuplicateTile(t));
            }
            *slot = true;
        }

        Ok(Board { tiles })
    }

    pub fn from_rows(rows: [[u8; SIDE]; SIDE]) -> Result<Board> {
        let mut tiles = [0; SIDE * SIDE];
        for (slot, t) in tiles.iter_mut().zip(rows.iter().flatten()) {
            *slot = *t;
        }
        Board::new(tiles)
    }

    /// The arrangement `1 2 3 / 4 5 6 / 7 8 _`.
    pub fn solved() -> Board {
        Board {
            tiles: [1, 2, 3, 4, 5, 6, 7, 8, BLANK],
        }
    }

    pub fn tiles(&self) -> &[u8; SIDE * SIDE] {
        &self.tiles
    }

    pub fn blank(&self) -> (usize, usize) {
        // construction guarantees exactly one blank
        let ix = self.tiles.iter().position(|&t| t == BLANK).unwrap_or(0);
        (ix / SIDE, ix % SIDE)
    }

    /// Move the blank one cell in `direction`, returning the new board, or
    /// `None` if that would leave the grid. `self` is left untouched.
    pub fn slide(&self, direction: Direction) -> Option<Board> {
        let (r, c) = self.blank();
        let (dr, dc) = direction.delta();
        let nr = r.checked_add_signed(dr).filter(|&nr| nr < SIDE)?;
        let nc = c.checked_add_signed(dc).filter(|&nc| nc < SIDE)?;

        let mut next = *self;
        next.tiles.swap(r * SIDE + c, nr * SIDE + nc);
        Some(next)
    }

    /// Boards one blank move away, each at cost 1.
    pub fn successors(&self) -> Neighbors<Board> {
        Direction::ALL
            .iter()
            .filter_map(|&d| self.slide(d))
            .map(|b| (b, 1))
            .collect()
    }

    /// True if `other` is exactly one blank move away.
    pub fn is_adjacent(&self, other: &Board) -> bool {
        Direction::ALL
            .iter()
            .any(|&d| self.slide(d).as_ref() == Some(other))
    }

    /// Pairs of non-blank tiles that appear in the wrong relative order.
    pub fn inversions(&self) -> usize {
        self.tiles
            .iter()
            .filter(|&&t| t != BLANK)
            .tuple_combinations()
            .filter(|(a, b)| a > b)
            .count()
    }

    /// On an odd-width board a move never changes inversion parity, so
    /// `goal` is reachable exactly when the parities agree.
    pub fn is_solvable_towards(&self, goal: &Board) -> bool {
        self.inversions() % 2 == goal.inversions() % 2
    }

    fn position_of(&self, tile: u8) -> (usize, usize) {
        let ix = self.tiles.iter().position(|&t| t == tile).unwrap_or(0);
        (ix / SIDE, ix % SIDE)
    }
}

impl Index<(usize, usize)> for Board {
    type Output = u8;
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.tiles[index.0 * SIDE + index.1]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for line in self.tiles.chunks(SIDE) {
            if !first {
                f.write_char('\n')?;
            } else {
                first = false;
            }

            write!(f, "{}", line.iter().join(" "))?;
        }

        Ok(())
    }
}

/// Sum over non-blank tiles of the row and column distance to the tile's
/// place in `goal`. Admissible and consistent; zero at the goal.
pub fn manhattan(board: &Board, goal: &Board) -> Cost {
    let mut goal_positions = [(0, 0); SIDE * SIDE];
    for t in 0..(SIDE * SIDE) as u8 {
        goal_positions[t as usize] = goal.position_of(t);
    }

    board
        .tiles
        .iter()
        .enumerate()
        .filter(|(_, t)| **t != BLANK)
        .map(|(ix, &t)| {
            let (gr, gc) = goal_positions[t as usize];
            ((ix / SIDE).abs_diff(gr) + (ix % SIDE).abs_diff(gc)) as Cost
        })
        .sum()
}

/// Number of non-blank tiles out of place. Admissible, weaker than
/// [`manhattan`].
pub fn misplaced(board: &Board, goal: &Board) -> Cost {
    board
        .tiles
        .iter()
        .zip_eq(&goal.tiles)
        .filter(|(b, g)| **b != BLANK && b != g)
        .count() as Cost
}

/// The 8-puzzle with unit move costs and the Manhattan heuristic.
#[derive(Clone, Copy, Debug, Default)]
pub struct EightPuzzle;

impl SearchProblem for EightPuzzle {
    type State = Board;

    fn neighbors(&self, state: &Board) -> Neighbors<Board> {
        state.successors()
    }

    fn heuristic(&self, state: &Board, goal: &Board) -> Cost {
        manhattan(state, goal)
    }
}

/// Uninformed breadth-first search; returns the boards from `start` to
/// `goal`, or `None` when the goal is unreachable.
pub fn breadth_first(start: &Board, goal: &Board) -> Option<Vec<Board>> {
    bfs(
        start,
        |b| Direction::ALL.iter().filter_map(|&d| b.slide(d)).collect::<Vec<_>>(),
        |b| b == goal,
    )
}

fn parse_tile(cell: &str) -> Result<u8> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(BLANK);
    }

    let value: u32 = cell.parse().map_err(|source| Error::BadTile {
        tile: cell.to_string(),
        source,
    })?;
    u8::try_from(value)
        .ok()
        .filter(|&t| (t as usize) < SIDE * SIDE)
        .ok_or(Error::TileOutOfRange(value))
}

fn parse_rows(section: &'static str, rows: &[&str]) -> Result<Board> {
    if rows.len() != SIDE {
        return Err(Error::RowCount {
            section,
            found: rows.len(),
        });
    }

    let mut tiles = [BLANK; SIDE * SIDE];
    for (r, row) in rows.iter().enumerate() {
        let cells: Vec<&str> = row.split(',').collect();
        if cells.len() != SIDE {
            return Err(Error::RowWidth(row.to_string()));
        }
        for (c, cell) in cells.into_iter().enumerate() {
            tiles[r * SIDE + c] = parse_tile(cell)?;
        }
    }

    Board::new(tiles)
}

// rows following the header at `at`, up to the next header
fn section<'a>(lines: &[&'a str], at: usize) -> Vec<&'a str> {
    lines[at + 1..]
        .iter()
        .take_while(|l| !l.ends_with(':'))
        .copied()
        .collect()
}

/// Parse an `initial:` / `goal:` puzzle description into a (start, goal)
/// pair. Each header is followed by three comma-separated rows. A file with
/// no headers and exactly six rows (start rows first) is also accepted.
pub fn parse_puzzle(text: &str) -> Result<(Board, Board)> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let header = |name: &str| lines.iter().position(|l| l.eq_ignore_ascii_case(name));
    match (header("initial:"), header("goal:")) {
        (None, None) => {
            if lines.len() != 2 * SIDE {
                return Err(Error::RowCount {
                    section: "initial and goal",
                    found: lines.len(),
                });
            }
            let (initial, goal) = lines.split_at(SIDE);
            Ok((parse_rows("initial", initial)?, parse_rows("goal", goal)?))
        }
        (Some(i), Some(g)) => Ok((
            parse_rows("initial", &section(&lines, i))?,
            parse_rows("goal", &section(&lines, g))?,
        )),
        (None, Some(_)) => Err(Error::MissingSection("initial:")),
        (Some(_), None) => Err(Error::MissingSection("goal:")),
    }
}

pub fn parse_puzzle_file(path: impl AsRef<Path>) -> Result<(Board, Board)> {
    let contents = std::fs::read_to_string(path)?;
    parse_puzzle(&contents)
}

/// Parse a single-line board such as `1,2,3,4,5, ,6,7,8`; an empty or
/// space-only cell is the blank.
pub fn parse_board(line: &str) -> Result<Board> {
    let cells: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
    if cells.len() != SIDE * SIDE {
        return Err(Error::TileCount(cells.len()));
    }

    let mut tiles = [BLANK; SIDE * SIDE];
    for (slot, cell) in tiles.iter_mut().zip(cells) {
        *slot = parse_tile(cell)?;
    }
    Board::new(tiles)
}
