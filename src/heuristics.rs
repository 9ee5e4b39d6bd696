use crate::engine::{Cell, GameState, Pos, PuzzleInfo, MAX_COLORS};
use crate::options::SearchOptions;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

/// Per-color inputs to the branch-order ranking.
///
/// One record is built for every color each time `order_colors` runs; nothing
/// here outlives that call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorFeatures {
    /// The color this record describes.
    pub index: usize,
    /// Forced priority from `SearchOptions::user_order`, or `MAX_COLORS` when the
    /// color is not listed.
    pub user_index: usize,
    /// Wall distance of the color's current head (`[0]`) and of its goal (`[1]`).
    pub wall_dist: [u8; 2],
    /// Manhattan distance between the two endpoints.
    pub min_dist: usize,
}

impl ColorFeatures {
    /// Builds the feature record for `color` from the puzzle and the current state.
    ///
    /// At the top of the search every head still sits on its init cell, so
    /// endpoint 0 is the init position.
    pub fn new(info: &PuzzleInfo, state: &GameState, color: usize, options: &SearchOptions) -> Self {
        let (x0, y0) = state.head(color).coords();
        let (x1, y1) = info.goal_pos(color).coords();

        ColorFeatures {
            index: color,
            user_index: options
                .user_rank(info.color_name(color))
                .unwrap_or(MAX_COLORS),
            wall_dist: [info.wall_dist(x0, y0), info.wall_dist(x1, y1)],
            min_dist: x0.abs_diff(x1) + y0.abs_diff(y1),
        }
    }
}

/// Orders two feature records for the branch-order sort.
///
/// Rules, first difference wins:
/// 1. lower `user_index` first;
/// 2. lower `wall_dist[0]` first;
/// 3. higher `wall_dist[1]` first;
/// 4. higher `min_dist` first;
/// 5. lower color index first.
///
/// The last rule only makes the order total.
///
/// # Examples
/// ```
/// use flow_solver::heuristics::{compare_features, ColorFeatures};
/// use std::cmp::Ordering;
///
/// let near = ColorFeatures { index: 0, user_index: 16, wall_dist: [0, 1], min_dist: 3 };
/// let far = ColorFeatures { index: 1, user_index: 16, wall_dist: [0, 1], min_dist: 7 };
/// assert_eq!(compare_features(&far, &near), Ordering::Less);
/// ```
pub fn compare_features(a: &ColorFeatures, b: &ColorFeatures) -> Ordering {
    a.user_index
        .cmp(&b.user_index)
        .then(a.wall_dist[0].cmp(&b.wall_dist[0]))
        .then(b.wall_dist[1].cmp(&a.wall_dist[1]))
        .then(b.min_dist.cmp(&a.min_dist))
        .then(a.index.cmp(&b.index))
}

/// Fisher–Yates shuffle of a color order.
pub fn shuffle_colors<R: Rng>(order: &mut [usize], rng: &mut R) {
    for i in (1..order.len()).rev() {
        let j = rng.gen_range(0..=i);
        order.swap(i, j);
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Chooses the order in which the search should try to connect colors and stores
/// it in `info`'s color order.
///
/// With `options.order_random` the current order is shuffled with a time-seeded
/// `SmallRng`. Otherwise every color gets a `ColorFeatures` record and the colors
/// are sorted with `compare_features`: forced priorities first, then colors whose
/// head is closest to a wall, whose goal is farthest from a wall, and whose
/// endpoints are farthest apart.
///
/// The ranking uses a fixed-size scratch array and never allocates. The puzzle
/// loader guarantees `num_colors <= MAX_COLORS`.
///
/// Unless `options.display_quiet` is set, the result is logged at `info` level
/// (see `branching_order_summary`).
///
/// # Arguments
/// * `info`: The puzzle; only its color order is written.
/// * `state`: The search state the order is computed for.
/// * `options`: Ordering mode and display flags.
///
/// # Examples
/// ```
/// use flow_solver::heuristics::order_colors;
/// use flow_solver::options::SearchOptions;
/// use flow_solver::utils::puzzle_from_str_array;
///
/// let (mut info, state) = puzzle_from_str_array(&[
///     "A.B..",
///     ".....",
///     "A...B",
/// ]).unwrap();
/// order_colors(&mut info, &state, &SearchOptions::default());
/// // B's endpoints are farther apart.
/// assert_eq!(info.color_order(), &[1, 0]);
/// ```
pub fn order_colors(info: &mut PuzzleInfo, state: &GameState, options: &SearchOptions) {
    let num_colors = info.num_colors();

    if options.order_random {
        let mut rng = SmallRng::seed_from_u64(time_seed());
        shuffle_colors(&mut info.color_order[..num_colors], &mut rng);
    } else {
        let mut features = [ColorFeatures::default(); MAX_COLORS];
        for (color, record) in features[..num_colors].iter_mut().enumerate() {
            *record = ColorFeatures::new(info, state, color, options);
        }

        features[..num_colors].sort_unstable_by(compare_features);

        for (slot, record) in info.color_order[..num_colors].iter_mut().zip(&features) {
            *slot = record.index;
        }
    }

    log::debug!("branch order: {:?}", info.color_order());

    if !options.display_quiet {
        for line in branching_order_summary(info, options).lines() {
            log::info!("{}", line);
        }
    }
}

/// Formats the human-readable branch-order banner.
///
/// When the driver picks colors by most-constrained-first, the banner says so
/// instead of listing the stored order.
pub fn branching_order_summary(info: &PuzzleInfo, options: &SearchOptions) -> String {
    let mut output = String::new();
    output.push_str("************************************************\n");
    output.push_str("*               Branching Order                *\n");
    if options.order_most_constrained {
        output.push_str("* Will choose color by most constrained\n");
    } else {
        output.push_str("* Will choose colors in order: ");
        output.extend(info.color_order().iter().map(|&c| info.color_name(c)));
        output.push('\n');
    }
    output.push_str("************************************************\n");
    output
}

/// Returns whether the cell at `pos` can still be used as open space.
///
/// That is the case for:
/// - a free cell;
/// - a path cell holding its color's head, if that color is not complete;
/// - an init cell holding its color's head;
/// - the goal of a color that is not complete.
///
/// Every other cell (a completed color's goal or path, the body of a path) is
/// treated as blocked.
pub fn is_free_equivalent(state: &GameState, pos: Pos) -> bool {
    match state.cell(pos) {
        Cell::Free => true,
        Cell::Path(c) => state.head(c as usize) == pos && !state.is_complete(c as usize),
        Cell::Init(c) => state.head(c as usize) == pos,
        Cell::Goal(c) => !state.is_complete(c as usize),
    }
}

fn count_free_neighbors(info: &PuzzleInfo, state: &GameState, pos: Pos) -> usize {
    info.neighbors(pos)
        .filter(|&neighbor| is_free_equivalent(state, neighbor))
        .count()
}

/// Checks the neighborhood of the last moved head for free cells that no path can
/// pass through any more.
///
/// A free cell with at most one free-equivalent neighbor (see `is_free_equivalent`)
/// can be entered but not left, and it is not an endpoint, so the branch cannot be
/// completed. The check looks at the head's neighbors and at the free cells one hop
/// beyond them; it does not flood-fill, so some dead ends go unnoticed.
///
/// The head of `state.last_color()` must be on the grid.
///
/// # Returns
/// `true` if a dead end was found and the branch should be abandoned.
pub fn check_deadends(info: &PuzzleInfo, state: &GameState) -> bool {
    let head = state.head(state.last_color());

    for neighbor in info.neighbors(head) {
        let mut num_free = 0;

        for next in info.neighbors(neighbor) {
            if is_free_equivalent(state, next) {
                num_free += 1;
            }

            if state.cell(next).is_free() && count_free_neighbors(info, state, next) <= 1 {
                log::debug!("dead end at {} near head {}", next, head);
                return true;
            }
        }

        if state.cell(neighbor).is_free() && num_free <= 1 {
            log::debug!("dead end at {} next to head {}", neighbor, head);
            return true;
        }
    }

    false
}
