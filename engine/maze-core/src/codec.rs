//! Grid text codec.
//!
//! A grid is written one row per line, one token per cell. The optional
//! debug form adds a column-index header line and a row-index gutter
//! separated from the tokens by `|`:
//!
//! ```text
//! ___ 0 1 2
//! 0 | # # #
//! 1 | # . #
//! ```
//!
//! Parsing accepts both forms; header lines are skipped.

use maze_config::GridFormat;
use serde_json::Value;

use crate::element::{ElementKind, ROW_SEPARATOR};
use crate::element_set::ElementLookup;
use crate::error::{MazeError, Result};
use crate::grid::{Grid, GridView};
use crate::spec::item;

/// Token written for a value missing from the vocabulary. Only reachable
/// for drafts that have not been validated.
const UNKNOWN_VALUE_TOKEN: char = '?';

/// Parse grid input into values.
///
/// `input` is a multi-line string, a list of line strings, or a list of
/// rows of single-character strings.
pub fn parse_grid<K, S>(input: &Value, elements: &S, path: &str) -> Result<Grid>
where
    K: ElementKind,
    S: ElementLookup<K>,
{
    let lines = input_lines(input, path)?;
    parse_lines(lines.iter().map(String::as_str), elements, path)
}

/// Parse grid text (see [`parse_grid`]).
pub fn parse_grid_text<K, S>(text: &str, elements: &S, path: &str) -> Result<Grid>
where
    K: ElementKind,
    S: ElementLookup<K>,
{
    parse_lines(text.lines(), elements, path)
}

fn parse_lines<'a, K, S>(
    lines: impl Iterator<Item = &'a str>,
    elements: &S,
    path: &str,
) -> Result<Grid>
where
    K: ElementKind,
    S: ElementLookup<K>,
{
    let malformed = |reason: &str| MazeError::MalformedGrid {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let cleaned: Vec<&str> = lines
        .filter(|line| !line.trim().is_empty())
        .map(str::trim_end)
        .collect();
    if cleaned.is_empty() {
        return Err(malformed("grid is empty"));
    }

    let pad = maze_config::grid_pad_char();
    let headered = cleaned.iter().any(|line| line.contains(ROW_SEPARATOR));

    let mut rows: Vec<Vec<char>> = Vec::with_capacity(cleaned.len());
    for line in cleaned {
        let content = if headered {
            match line.split_once(ROW_SEPARATOR) {
                Some((_, content)) => content,
                None if looks_like_header(line, pad) => continue,
                None => return Err(malformed("row is missing a row separator")),
            }
        } else {
            line
        };
        let tokens: Vec<char> = content.chars().filter(|ch| !ch.is_whitespace()).collect();
        if tokens.is_empty() {
            return Err(malformed("row is empty"));
        }
        rows.push(tokens);
    }
    if rows.is_empty() {
        return Err(malformed("grid is empty"));
    }

    let width = rows[0].len();
    let mut values = Vec::with_capacity(rows.len());
    for (row_index, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(MazeError::RaggedGrid {
                path: path.to_string(),
                row: row_index,
                expected: width,
                actual: row.len(),
            });
        }
        let mut row_values = Vec::with_capacity(width);
        for (col, &token) in row.iter().enumerate() {
            let element =
                elements
                    .element_for_token(token)
                    .map_err(|_| MazeError::UnknownToken {
                        path: path.to_string(),
                        token,
                        row: row_index,
                        col,
                    })?;
            row_values.push(element.value());
        }
        values.push(row_values);
    }

    Grid::from_rows(values)
}

fn input_lines(input: &Value, path: &str) -> Result<Vec<String>> {
    let expected = "a string, a list of strings or a list of token rows";
    match input {
        Value::String(text) => Ok(text.lines().map(str::to_string).collect()),
        Value::Array(items) if items.iter().all(Value::is_string) => Ok(items
            .iter()
            .filter_map(|line| line.as_str().map(str::to_string))
            .collect()),
        Value::Array(items) if items.iter().all(Value::is_array) => items
            .iter()
            .enumerate()
            .map(|(index, row)| token_row(row, &item(path, index)))
            .collect(),
        _ => Err(MazeError::type_mismatch(path, expected)),
    }
}

fn token_row(row: &Value, path: &str) -> Result<String> {
    let cells = row.as_array().map(Vec::as_slice).unwrap_or_default();
    let mut tokens = Vec::with_capacity(cells.len());
    for cell in cells {
        let token = match cell {
            Value::String(text) if text.chars().count() == 1 => text.clone(),
            Value::Number(number) if number.as_u64().is_some_and(|digit| digit <= 9) => {
                number.to_string()
            }
            _ => {
                return Err(MazeError::type_mismatch(
                    path,
                    "a row of single-character strings",
                ))
            }
        };
        tokens.push(token);
    }
    Ok(tokens.join(" "))
}

fn looks_like_header(line: &str, pad: char) -> bool {
    line.split_whitespace().all(|token| {
        token.chars().all(|ch| ch.is_ascii_digit()) || token.chars().all(|ch| ch == pad)
    })
}

/// Format a grid as lines of tokens, optionally with index gutters.
pub fn format_grid<K, S, G>(grid: &G, elements: &S, with_headers: bool) -> Vec<String>
where
    K: ElementKind,
    S: ElementLookup<K>,
    G: GridView + ?Sized,
{
    let token_rows: Vec<Vec<char>> = grid
        .rows()
        .map(|row| {
            row.iter()
                .map(|&value| {
                    elements
                        .element_for_value(value)
                        .map(|element| element.token())
                        .unwrap_or(UNKNOWN_VALUE_TOKEN)
                })
                .collect()
        })
        .collect();

    if !with_headers {
        return token_rows
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect();
    }

    let format = GridFormat::default();
    let (height, width) = grid.shape();
    let index_width = height
        .saturating_sub(1)
        .max(width.saturating_sub(1))
        .to_string()
        .len();
    let cell_width = index_width.max(1);
    let interval = format.tick_interval(height, width);
    let pad = |count: usize| format.pad_char.to_string().repeat(count);

    let header_cells: Vec<String> = (0..width)
        .map(|col| {
            if col % interval == 0 {
                format!("{col:>cell_width$}")
            } else {
                pad(cell_width)
            }
        })
        .collect();

    let mut lines = Vec::with_capacity(height + 1);
    lines.push(format!("{} {}", pad(index_width + 2), header_cells.join(" ")));
    for (row_index, row) in token_rows.iter().enumerate() {
        let label = if row_index % interval == 0 {
            format!("{row_index:>index_width$}")
        } else {
            pad(index_width)
        };
        let cells: Vec<String> = row
            .iter()
            .map(|token| format!("{token:>cell_width$}"))
            .collect();
        lines.push(format!("{label} {ROW_SEPARATOR} {}", cells.join(" ")));
    }
    lines
}

/// Join formatted lines into grid text with a trailing newline.
pub fn lines_to_text(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Format a grid straight to text (see [`format_grid`]).
pub fn format_grid_text<K, S, G>(grid: &G, elements: &S, with_headers: bool) -> String
where
    K: ElementKind,
    S: ElementLookup<K>,
    G: GridView + ?Sized,
{
    lines_to_text(&format_grid(grid, elements, with_headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Cell;
    use crate::element_set::ElementSet;
    use serde_json::json;

    fn elements() -> ElementSet<Cell> {
        let items = json!([
            {"name": "open", "token": ".", "value": 0},
            {"name": "wall", "token": "#", "value": 1},
        ]);
        ElementSet::from_list(&items, &[], "elements").unwrap()
    }

    #[test]
    fn test_parse_plain_text() {
        let grid = parse_grid(&json!("###\n#.#\n\n###\n"), &elements(), "layout.grid").unwrap();
        assert_eq!(grid.shape(), (3, 3));
        assert_eq!(grid.get(1, 1), Some(0));
        assert_eq!(grid.get(0, 0), Some(1));
    }

    #[test]
    fn test_parse_line_list_and_token_rows() {
        let from_lines = parse_grid(&json!(["#.", ".#"]), &elements(), "g").unwrap();
        let from_rows = parse_grid(&json!([["#", "."], [".", "#"]]), &elements(), "g").unwrap();
        assert_eq!(from_lines, from_rows);
        assert_eq!(from_lines.to_rows(), vec![vec![1, 0], vec![0, 1]]);
    }

    #[test]
    fn test_inter_token_whitespace_is_ignored() {
        let grid = parse_grid(&json!("# . #\n. . ."), &elements(), "g").unwrap();
        assert_eq!(grid.to_rows(), vec![vec![1, 0, 1], vec![0, 0, 0]]);
    }

    #[test]
    fn test_parse_headered_text() {
        let text = "___ 0 1 2\n0 | # # #\n1 | # . #\n";
        let grid = parse_grid_text(text, &elements(), "g").unwrap();
        assert_eq!(grid.to_rows(), vec![vec![1, 1, 1], vec![1, 0, 1]]);
    }

    #[test]
    fn test_headered_row_without_separator_fails() {
        let text = "0 | # #\n# .\n";
        assert!(matches!(
            parse_grid_text(text, &elements(), "g"),
            Err(MazeError::MalformedGrid { .. })
        ));
    }

    #[test]
    fn test_ragged_grid_fails() {
        let err = parse_grid(&json!("###\n##\n"), &elements(), "layout.grid").unwrap_err();
        assert_eq!(
            err,
            MazeError::RaggedGrid {
                path: "layout.grid".into(),
                row: 1,
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_unknown_token_fails() {
        let err = parse_grid(&json!("#.\n.X\n"), &elements(), "g").unwrap_err();
        assert_eq!(
            err,
            MazeError::UnknownToken {
                path: "g".into(),
                token: 'X',
                row: 1,
                col: 1,
            }
        );
    }

    #[test]
    fn test_empty_and_wrong_shapes_fail() {
        assert!(matches!(
            parse_grid(&json!("\n  \n"), &elements(), "g"),
            Err(MazeError::MalformedGrid { .. })
        ));
        assert!(matches!(
            parse_grid(&json!(42), &elements(), "g"),
            Err(MazeError::TypeMismatch { .. })
        ));
        assert!(matches!(
            parse_grid(&json!([["##"]]), &elements(), "g"),
            Err(MazeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_format_without_headers() {
        let grid = Grid::from_rows(vec![vec![1, 1], vec![0, 1]]).unwrap();
        assert_eq!(format_grid(&grid, &elements(), false), vec!["##", ".#"]);
        assert_eq!(format_grid_text(&grid, &elements(), false), "##\n.#\n");
    }

    #[test]
    fn test_format_with_headers() {
        let grid = Grid::from_rows(vec![vec![1, 1, 1], vec![1, 0, 1]]).unwrap();
        assert_eq!(
            format_grid(&grid, &elements(), true),
            vec!["___ 0 1 2", "0 | # # #", "1 | # . #"]
        );
    }

    #[test]
    fn test_format_with_wide_indices() {
        let grid = Grid::filled(2, 11, 0);
        let lines = format_grid(&grid, &elements(), true);
        assert_eq!(
            lines[0],
            "____  0  1  2  3  4  5  6  7  8  9 10"
        );
        assert_eq!(lines[1], " 0 |  .  .  .  .  .  .  .  .  .  .  .");
    }

    #[test]
    fn test_large_grid_labels_every_tenth_index() {
        let grid = Grid::filled(101, 2, 1);
        let lines = format_grid(&grid, &elements(), true);
        assert_eq!(lines[0], "_____   0 ___");
        assert_eq!(lines[1], "  0 |   #   #");
        assert_eq!(lines[2], "___ |   #   #");
        assert_eq!(lines[11], " 10 |   #   #");
        let parsed = parse_grid_text(&lines_to_text(&lines), &elements(), "g").unwrap();
        assert_eq!(parsed, grid);
    }

    #[test]
    fn test_headers_round_trip() {
        let text = "#####\n#...#\n#.#.#\n#...#\n#####\n";
        let grid = parse_grid_text(text, &elements(), "g").unwrap();
        let headered = format_grid_text(&grid, &elements(), true);
        assert_eq!(parse_grid_text(&headered, &elements(), "g").unwrap(), grid);
        assert_eq!(format_grid_text(&grid, &elements(), false), text);
    }
}
