use crate::engine::{GameState, Pos, PuzzleInfo, MAX_COLORS, MAX_SIZE};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a puzzle description.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("Puzzle has no rows")]
    Empty,

    #[error("Invalid number of rows. Expected at most {max}, found {found}")]
    TooManyRows { max: usize, found: usize },

    #[error("Row {row} is too long. Expected at most {max} characters, found {found}")]
    RowTooLong { row: usize, max: usize, found: usize },

    #[error("Row {row} has {found} characters, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unrecognized character '{ch}' in row {row} col {col}")]
    UnrecognizedCharacter { ch: char, row: usize, col: usize },

    #[error("Too many colors. At most {max} are supported")]
    TooManyColors { max: usize },

    #[error("Color '{color}' has {count} endpoint(s), expected exactly 2")]
    UnpairedColor { color: char, count: usize },

    #[error("Failed to read puzzle file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses an array of string slices into a puzzle description and its starting state.
///
/// Each string slice is one grid row, starting from the top (row 0). All rows must
/// have the same length, and neither dimension may exceed `MAX_SIZE`.
///
/// Valid characters are:
/// - '.': a free cell
/// - any ASCII uppercase letter or digit: an endpoint of the color with that name
///
/// Colors are numbered in order of first appearance (row by row, left to right).
/// The first endpoint of a color is its init, the second its goal.
///
/// # Examples
/// ```
/// use flow_solver::engine::{Cell, Pos};
/// use flow_solver::utils::puzzle_from_str_array;
///
/// let (info, state) = puzzle_from_str_array(&[
///     "R.G",
///     "...",
///     "G.R",
/// ]).unwrap();
/// assert_eq!(info.num_colors(), 2);
/// assert_eq!(info.color_name(0), 'R');
/// assert_eq!(info.goal_pos(0), Pos::new(2, 2));
/// assert_eq!(state.cell(Pos::new(2, 0)), Cell::Init(1));
///
/// assert!(puzzle_from_str_array(&["R.X"]).is_err());
/// assert!(puzzle_from_str_array(&["R.."]).is_err());
/// ```
pub fn puzzle_from_str_array(rows: &[&str]) -> Result<(PuzzleInfo, GameState), PuzzleError> {
    if rows.is_empty() {
        return Err(PuzzleError::Empty);
    }
    if rows.len() > MAX_SIZE {
        return Err(PuzzleError::TooManyRows {
            max: MAX_SIZE,
            found: rows.len(),
        });
    }

    let width = rows[0].chars().count();
    if width == 0 {
        return Err(PuzzleError::Empty);
    }

    // (name, endpoints found so far)
    let mut colors: Vec<(char, Vec<Pos>)> = Vec::new();

    for (y, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found > MAX_SIZE {
            return Err(PuzzleError::RowTooLong {
                row: y,
                max: MAX_SIZE,
                found,
            });
        }
        if found != width {
            return Err(PuzzleError::RaggedRow {
                row: y,
                expected: width,
                found,
            });
        }

        for (x, ch) in row.chars().enumerate() {
            if ch == '.' {
                continue;
            }
            if !(ch.is_ascii_uppercase() || ch.is_ascii_digit()) {
                return Err(PuzzleError::UnrecognizedCharacter { ch, row: y, col: x });
            }

            match colors.iter_mut().find(|(name, _)| *name == ch) {
                Some((_, endpoints)) => endpoints.push(Pos::new(x, y)),
                None => {
                    if colors.len() == MAX_COLORS {
                        return Err(PuzzleError::TooManyColors { max: MAX_COLORS });
                    }
                    colors.push((ch, vec![Pos::new(x, y)]));
                }
            }
        }
    }

    let mut endpoints = Vec::with_capacity(colors.len());
    for (name, found) in &colors {
        if found.len() != 2 {
            return Err(PuzzleError::UnpairedColor {
                color: *name,
                count: found.len(),
            });
        }
        endpoints.push((*name, found[0], found[1]));
    }

    let info = PuzzleInfo::new(width, rows.len(), &endpoints);
    let state = GameState::new(&info);
    Ok((info, state))
}

/// Reads a puzzle file and parses it with `puzzle_from_str_array`.
///
/// Blank lines are skipped and each line is trimmed before parsing.
pub fn puzzle_from_file(path: &Path) -> Result<(PuzzleInfo, GameState), PuzzleError> {
    let content = fs::read_to_string(path)?;

    let lines: Vec<&str> = content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    puzzle_from_str_array(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Cell;

    #[test]
    fn test_puzzle_from_str_array_valid() {
        let (info, state) = puzzle_from_str_array(&[
            "B...A",
            ".....",
            "..A..",
            ".....",
            "B....",
        ])
        .unwrap();
        assert_eq!(info.width(), 5);
        assert_eq!(info.height(), 5);
        assert_eq!(info.num_colors(), 2);
        assert_eq!(info.color_name(0), 'B');
        assert_eq!(info.color_name(1), 'A');
        assert_eq!(info.init_pos(1), Pos::new(4, 0));
        assert_eq!(info.goal_pos(1), Pos::new(2, 2));
        assert_eq!(info.color_by_name('A'), Some(1));
        assert_eq!(info.color_by_name('Z'), None);
        assert_eq!(state.cell(Pos::new(0, 4)), Cell::Goal(0));
        assert_eq!(state.cell(Pos::new(1, 1)), Cell::Free);
    }

    #[test]
    fn test_puzzle_from_str_array_digit_colors() {
        let (info, _) = puzzle_from_str_array(&["1.2", "2.1"]).unwrap();
        assert_eq!(info.num_colors(), 2);
        assert_eq!(info.color_name(1), '2');
    }

    #[test]
    fn test_puzzle_from_str_array_invalid_char() {
        let result = puzzle_from_str_array(&["A.x", "A.x"]);
        assert!(matches!(
            result,
            Err(PuzzleError::UnrecognizedCharacter { ch: 'x', row: 0, col: 2 })
        ));
    }

    #[test]
    fn test_puzzle_from_str_array_empty_input() {
        let rows: [&str; 0] = [];
        assert!(matches!(puzzle_from_str_array(&rows), Err(PuzzleError::Empty)));
        assert!(matches!(puzzle_from_str_array(&[""]), Err(PuzzleError::Empty)));
    }

    #[test]
    fn test_puzzle_from_str_array_ragged_rows() {
        let result = puzzle_from_str_array(&["A..", "A."]);
        assert!(matches!(
            result,
            Err(PuzzleError::RaggedRow { row: 1, expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_puzzle_from_str_array_too_large() {
        let long_row = "A".repeat(MAX_SIZE + 1);
        let result = puzzle_from_str_array(&[long_row.as_str()]);
        assert!(matches!(result, Err(PuzzleError::RowTooLong { row: 0, .. })));

        let rows = vec!["."; MAX_SIZE + 1];
        let result = puzzle_from_str_array(&rows);
        assert!(matches!(result, Err(PuzzleError::TooManyRows { .. })));
    }

    #[test]
    fn test_puzzle_from_str_array_unpaired() {
        let result = puzzle_from_str_array(&["A.B", "..B"]);
        assert!(matches!(
            result,
            Err(PuzzleError::UnpairedColor { color: 'A', count: 1 })
        ));

        let result = puzzle_from_str_array(&["AAA"]);
        assert!(matches!(
            result,
            Err(PuzzleError::UnpairedColor { color: 'A', count: 3 })
        ));
    }

    #[test]
    fn test_puzzle_from_str_array_too_many_colors() {
        // 17 distinct colors, each appearing twice.
        let rows = ["ABCDEFGHI", "ABCDEFGHI", "JKLMNOPQ.", "JKLMNOPQ."];
        let result = puzzle_from_str_array(&rows);
        assert!(matches!(
            result,
            Err(PuzzleError::TooManyColors { max: MAX_COLORS })
        ));
    }

    #[test]
    fn test_puzzle_from_file_bundled() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("puzzles/regular_5x5_01.txt");
        let (info, state) = puzzle_from_file(&path).unwrap();
        assert_eq!(info.width(), 5);
        assert_eq!(info.height(), 5);
        assert_eq!(info.num_colors(), 5);
        assert_eq!(state.render(&info), "A.B.D\n..C.E\n.....\n.B.D.\n.ACE.\n");
    }

    #[test]
    fn test_puzzle_from_file_missing() {
        let result = puzzle_from_file(Path::new("/nonexistent/puzzle.txt"));
        assert!(matches!(result, Err(PuzzleError::Io(_))));
        assert!(result.unwrap_err().to_string().contains("Failed to read puzzle file"));
    }
}
