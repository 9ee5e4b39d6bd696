//! Grid and search-state model for flow puzzles.
//!
//! This module defines the pieces the heuristics read:
//! - `Pos` and `Dir`: encoded grid positions and the four compass moves between them.
//! - `Cell`: the per-position state (free, path, init endpoint, goal endpoint).
//! - `PuzzleInfo`: the fixed description of a puzzle, including the precomputed
//!   wall distances and the branch order written by `heuristics::order_colors`.
//! - `GameState`: the cell grid, per-color heads and the completed set that the
//!   search driver mutates between calls.
use std::fmt;

/// Largest supported grid width or height.
pub const MAX_SIZE: usize = 15;

/// Largest supported number of colors. The completed set is a `u16` bitmask.
pub const MAX_COLORS: usize = 16;

/// Number of distinct `Pos` encodings, used to size the cell and wall-distance tables.
pub const MAX_CELLS: usize = 256;

/// An encoded grid position.
///
/// The low nibble stores `x`, the high nibble stores `y`. `Pos::INVALID` is
/// reserved for "off-grid" and never decodes to a real cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos(u8);

impl Pos {
    /// The off-grid sentinel.
    pub const INVALID: Pos = Pos(0xff);

    /// Encodes `(x, y)`. Both coordinates must be below `MAX_SIZE`.
    ///
    /// # Examples
    /// ```
    /// use flow_solver::engine::Pos;
    /// let p = Pos::new(3, 7);
    /// assert_eq!(p.coords(), (3, 7));
    /// assert!(p.is_valid());
    /// assert!(!Pos::INVALID.is_valid());
    /// ```
    pub fn new(x: usize, y: usize) -> Self {
        debug_assert!(x < MAX_SIZE && y < MAX_SIZE);
        Pos(((y << 4) | x) as u8)
    }

    /// Decodes the position into `(x, y)` coordinates.
    pub fn coords(self) -> (usize, usize) {
        ((self.0 & 0xf) as usize, (self.0 >> 4) as usize)
    }

    /// Returns `false` for the off-grid sentinel.
    pub fn is_valid(self) -> bool {
        self != Pos::INVALID
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One of the four compass directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Left,
    Right,
    Up,
    Down,
}

impl Dir {
    /// All directions, in the order the heuristics scan them.
    pub const ALL: [Dir; 4] = [Dir::Left, Dir::Right, Dir::Up, Dir::Down];

    /// The `(dx, dy)` step for this direction. `Up` decreases `y`.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
        }
    }
}

/// The kind of a cell, without its color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Free,
    Path,
    Init,
    Goal,
}

/// The state of a single grid position.
///
/// Every variant except `Free` carries the index of the color occupying it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Unoccupied.
    Free,
    /// Part of an in-progress (or finished) connection.
    Path(u8),
    /// The endpoint a color's path starts from.
    Init(u8),
    /// The endpoint a color's path must reach.
    Goal(u8),
}

impl Cell {
    /// Returns the kind of this cell.
    pub fn kind(self) -> CellKind {
        match self {
            Cell::Free => CellKind::Free,
            Cell::Path(_) => CellKind::Path,
            Cell::Init(_) => CellKind::Init,
            Cell::Goal(_) => CellKind::Goal,
        }
    }

    /// Returns the color stored in this cell, or `None` for a free cell.
    ///
    /// # Examples
    /// ```
    /// use flow_solver::engine::Cell;
    /// assert_eq!(Cell::Goal(3).color(), Some(3));
    /// assert_eq!(Cell::Free.color(), None);
    /// ```
    pub fn color(self) -> Option<usize> {
        match self {
            Cell::Free => None,
            Cell::Path(c) | Cell::Init(c) | Cell::Goal(c) => Some(c as usize),
        }
    }

    pub fn is_free(self) -> bool {
        self == Cell::Free
    }
}

/// Fixed information about a puzzle.
///
/// Everything here stays constant during a search except `color_order`,
/// which `heuristics::order_colors` rewrites.
#[derive(Clone, Debug)]
pub struct PuzzleInfo {
    width: usize,
    height: usize,
    num_colors: usize,
    init_pos: [Pos; MAX_COLORS],
    goal_pos: [Pos; MAX_COLORS],
    color_chars: [char; MAX_COLORS],
    pub(crate) color_order: [usize; MAX_COLORS],
    wall_dist: [u8; MAX_CELLS],
}

impl PuzzleInfo {
    /// Builds the puzzle description from its dimensions and color endpoints.
    ///
    /// `endpoints[c]` holds the display character, init position and goal position
    /// of color `c`. The caller guarantees `width, height <= MAX_SIZE` and at most
    /// `MAX_COLORS` colors; `utils::puzzle_from_str_array` checks both.
    ///
    /// The wall-distance table is computed here once, and the color order starts
    /// out as the identity permutation.
    pub fn new(width: usize, height: usize, endpoints: &[(char, Pos, Pos)]) -> Self {
        debug_assert!(width <= MAX_SIZE && height <= MAX_SIZE);
        debug_assert!(endpoints.len() <= MAX_COLORS);

        let mut init_pos = [Pos::INVALID; MAX_COLORS];
        let mut goal_pos = [Pos::INVALID; MAX_COLORS];
        let mut color_chars = ['?'; MAX_COLORS];
        let mut color_order = [0; MAX_COLORS];

        for (color, &(name, init, goal)) in endpoints.iter().enumerate() {
            color_chars[color] = name;
            init_pos[color] = init;
            goal_pos[color] = goal;
        }
        for (i, slot) in color_order.iter_mut().enumerate() {
            *slot = i;
        }

        let mut wall_dist = [0u8; MAX_CELLS];
        for y in 0..height {
            for x in 0..width {
                let dx = x.min(width - 1 - x);
                let dy = y.min(height - 1 - y);
                wall_dist[Pos::new(x, y).index()] = dx.min(dy) as u8;
            }
        }

        PuzzleInfo {
            width,
            height,
            num_colors: endpoints.len(),
            init_pos,
            goal_pos,
            color_chars,
            color_order,
            wall_dist,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_colors(&self) -> usize {
        self.num_colors
    }

    /// The position a color's path starts from.
    pub fn init_pos(&self, color: usize) -> Pos {
        self.init_pos[color]
    }

    /// The position a color's path must reach.
    pub fn goal_pos(&self, color: usize) -> Pos {
        self.goal_pos[color]
    }

    /// The character the puzzle file uses for `color`.
    pub fn color_name(&self, color: usize) -> char {
        self.color_chars[color]
    }

    /// Looks up the color named by `name`, if the puzzle has one.
    pub fn color_by_name(&self, name: char) -> Option<usize> {
        self.color_chars[..self.num_colors]
            .iter()
            .position(|&c| c == name)
    }

    /// The current branch order: a permutation of `0..num_colors`.
    pub fn color_order(&self) -> &[usize] {
        &self.color_order[..self.num_colors]
    }

    /// Precomputed distance from `(x, y)` to the nearest grid edge.
    ///
    /// # Examples
    /// ```
    /// use flow_solver::utils::puzzle_from_str_array;
    /// let (info, _) = puzzle_from_str_array(&["A....", ".....", "....A"]).unwrap();
    /// assert_eq!(info.wall_dist(0, 0), 0);
    /// assert_eq!(info.wall_dist(2, 1), 1);
    /// assert_eq!(info.wall_dist(4, 1), 0);
    /// ```
    pub fn wall_dist(&self, x: usize, y: usize) -> u8 {
        self.wall_dist[Pos::new(x, y).index()]
    }

    /// Returns the neighbor of `(x, y)` in direction `dir`, or `None` when that
    /// step would leave the grid.
    pub fn offset_pos(&self, x: usize, y: usize, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.offset();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        if nx < self.width && ny < self.height {
            Some(Pos::new(nx, ny))
        } else {
            None
        }
    }

    /// Iterates over the in-grid neighbors of `pos`, in `Dir::ALL` order.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        let (x, y) = pos.coords();
        Dir::ALL
            .into_iter()
            .filter_map(move |dir| self.offset_pos(x, y, dir))
    }
}

/// The mutable part of a search node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    cells: [Cell; MAX_CELLS],
    pos: [Pos; MAX_COLORS],
    completed: u16,
    last_color: usize,
}

impl GameState {
    /// Creates the starting state for `info`: endpoints placed, every head on its
    /// init cell, nothing completed.
    pub fn new(info: &PuzzleInfo) -> Self {
        let mut cells = [Cell::Free; MAX_CELLS];
        let mut pos = [Pos::INVALID; MAX_COLORS];

        for color in 0..info.num_colors() {
            let init = info.init_pos(color);
            cells[init.index()] = Cell::Init(color as u8);
            cells[info.goal_pos(color).index()] = Cell::Goal(color as u8);
            pos[color] = init;
        }

        GameState {
            cells,
            pos,
            completed: 0,
            last_color: 0,
        }
    }

    /// Returns the cell at `pos`. `pos` must be on the grid.
    pub fn cell(&self, pos: Pos) -> Cell {
        self.cells[pos.index()]
    }

    /// The current head of `color`'s path.
    pub fn head(&self, color: usize) -> Pos {
        self.pos[color]
    }

    /// The bitmask of finished colors.
    pub fn completed(&self) -> u16 {
        self.completed
    }

    pub fn is_complete(&self, color: usize) -> bool {
        self.completed & (1 << color) != 0
    }

    /// The color most recently extended by `make_move`.
    pub fn last_color(&self) -> usize {
        self.last_color
    }

    /// Extends `color`'s path one step in direction `dir`.
    ///
    /// The head may step onto a free cell, which becomes part of the path, or onto
    /// the color's own goal, which completes the color.
    ///
    /// # Returns
    /// `true` if the move was applied. `false` (state untouched) if the color is
    /// already complete, the step leaves the grid, or the target is occupied by
    /// anything other than this color's goal.
    pub fn make_move(&mut self, info: &PuzzleInfo, color: usize, dir: Dir) -> bool {
        if color >= info.num_colors() || self.is_complete(color) {
            return false;
        }

        let (x, y) = self.pos[color].coords();
        let Some(next) = info.offset_pos(x, y, dir) else {
            return false;
        };

        match self.cells[next.index()] {
            Cell::Free => {
                self.cells[next.index()] = Cell::Path(color as u8);
            }
            Cell::Goal(c) if c as usize == color => {
                self.completed |= 1 << color;
            }
            _ => return false,
        }

        self.pos[color] = next;
        self.last_color = color;
        true
    }

    /// Renders the grid as text: endpoints as their color character, path cells as
    /// its lowercase form and free cells as `.`.
    pub fn render(&self, info: &PuzzleInfo) -> String {
        let mut output = String::with_capacity((info.width() + 1) * info.height());
        for y in 0..info.height() {
            for x in 0..info.width() {
                let ch = match self.cell(Pos::new(x, y)) {
                    Cell::Free => '.',
                    Cell::Path(c) => info.color_name(c as usize).to_ascii_lowercase(),
                    Cell::Init(c) | Cell::Goal(c) => info.color_name(c as usize),
                };
                output.push(ch);
            }
            output.push('\n');
        }
        output
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            let (x, y) = self.coords();
            write!(f, "({}, {})", x, y)
        } else {
            write!(f, "(invalid)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::puzzle_from_str_array;

    #[test]
    fn test_pos_round_trip_corners() {
        for &(x, y) in &[(0, 0), (MAX_SIZE - 1, 0), (0, MAX_SIZE - 1), (MAX_SIZE - 1, MAX_SIZE - 1)] {
            let p = Pos::new(x, y);
            assert!(p.is_valid());
            assert_eq!(p.coords(), (x, y));
        }
    }

    #[test]
    fn test_offset_pos_at_boundaries() {
        let (info, _) = puzzle_from_str_array(&["A..", "..A"]).unwrap();
        assert_eq!(info.offset_pos(0, 0, Dir::Left), None);
        assert_eq!(info.offset_pos(0, 0, Dir::Up), None);
        assert_eq!(info.offset_pos(0, 0, Dir::Right), Some(Pos::new(1, 0)));
        assert_eq!(info.offset_pos(0, 0, Dir::Down), Some(Pos::new(0, 1)));
        assert_eq!(info.offset_pos(2, 1, Dir::Right), None);
        assert_eq!(info.offset_pos(2, 1, Dir::Down), None);

        let corner: Vec<Pos> = info.neighbors(Pos::new(2, 1)).collect();
        assert_eq!(corner, vec![Pos::new(1, 1), Pos::new(2, 0)]);
    }

    #[test]
    fn test_wall_dist_rectangular() {
        let (info, _) = puzzle_from_str_array(&[
            "A......",
            ".......",
            ".......",
            ".......",
            "......A",
        ])
        .unwrap();
        for y in 0..info.height() {
            for x in 0..info.width() {
                let expected = x.min(y).min(info.width() - 1 - x).min(info.height() - 1 - y);
                assert_eq!(info.wall_dist(x, y) as usize, expected, "at ({}, {})", x, y);
            }
        }
        assert_eq!(info.wall_dist(3, 2), 2);
    }

    #[test]
    fn test_new_state_places_endpoints() {
        let (info, state) = puzzle_from_str_array(&["A.B", "...", "B.A"]).unwrap();
        assert_eq!(state.cell(Pos::new(0, 0)), Cell::Init(0));
        assert_eq!(state.cell(Pos::new(2, 0)), Cell::Init(1));
        assert_eq!(state.cell(Pos::new(0, 2)), Cell::Goal(1));
        assert_eq!(state.cell(Pos::new(2, 2)), Cell::Goal(0));
        assert_eq!(state.head(0), info.init_pos(0));
        assert_eq!(state.head(1), info.init_pos(1));
        assert_eq!(state.completed(), 0);
        assert_eq!(info.color_order(), &[0, 1]);
        assert_eq!(state.cell(Pos::new(1, 1)).kind(), CellKind::Free);
        assert_eq!(state.cell(Pos::new(2, 2)).kind(), CellKind::Goal);
    }

    #[test]
    fn test_make_move_extends_and_completes() {
        let (info, mut state) = puzzle_from_str_array(&["A.A", "B.B"]).unwrap();

        assert!(state.make_move(&info, 0, Dir::Right));
        assert_eq!(state.cell(Pos::new(1, 0)), Cell::Path(0));
        assert_eq!(state.head(0), Pos::new(1, 0));
        assert_eq!(state.last_color(), 0);
        assert!(!state.is_complete(0));

        assert!(state.make_move(&info, 0, Dir::Right));
        assert!(state.is_complete(0));
        assert_eq!(state.head(0), Pos::new(2, 0));
        assert_eq!(state.cell(Pos::new(2, 0)), Cell::Goal(0));

        // A completed color cannot move again.
        assert!(!state.make_move(&info, 0, Dir::Down));
    }

    #[test]
    fn test_make_move_rejects_blocked_targets() {
        let (info, mut state) = puzzle_from_str_array(&["AB.", "..B", "A.."]).unwrap();
        let before = state.clone();

        // Off-grid.
        assert!(!state.make_move(&info, 0, Dir::Left));
        assert!(!state.make_move(&info, 0, Dir::Up));
        // Another color's init.
        assert!(!state.make_move(&info, 0, Dir::Right));
        // Unknown color.
        assert!(!state.make_move(&info, 7, Dir::Down));
        assert_eq!(state, before);

        assert!(state.make_move(&info, 1, Dir::Down));
        // Stepping back onto its own init.
        assert!(!state.make_move(&info, 1, Dir::Up));
        // Another color's path.
        assert!(state.make_move(&info, 0, Dir::Down));
        assert!(!state.make_move(&info, 0, Dir::Right));
        // Another color's goal.
        assert!(state.make_move(&info, 1, Dir::Down));
        assert!(!state.make_move(&info, 1, Dir::Left));
        assert_eq!(state.head(1), Pos::new(1, 2));
        assert_eq!(state.last_color(), 1);
    }

    #[test]
    fn test_render() {
        let (info, mut state) = puzzle_from_str_array(&["R..R", "G..G"]).unwrap();
        state.make_move(&info, 0, Dir::Right);
        assert_eq!(state.render(&info), "Rr.R\nG..G\n");
        assert_eq!(format!("{}", Pos::new(2, 1)), "(2, 1)");
        assert_eq!(format!("{}", Pos::INVALID), "(invalid)");
    }
}
