//! Parsers for command line values.

use anyhow::{anyhow, bail, Context, Result};
use snake_puzzle_core::{Block, Direction, GrowthRate};

/// Single block write requested with `--set x,y,block`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) block: Block,
}

/// Parses a move string of `U`, `R`, `D` and `L` letters.
///
/// Letters are case-insensitive; whitespace and commas are ignored.
pub(crate) fn parse_moves(moves: &str) -> Result<Vec<Direction>> {
    moves
        .chars()
        .enumerate()
        .filter(|(_, letter)| !letter.is_whitespace() && *letter != ',')
        .map(|(position, letter)| match letter.to_ascii_uppercase() {
            'U' => Ok(Direction::Up),
            'R' => Ok(Direction::Right),
            'D' => Ok(Direction::Down),
            'L' => Ok(Direction::Left),
            other => Err(anyhow!("unknown move '{other}' at position {position}")),
        })
        .collect()
}

/// Short letter used when echoing a direction back to the user.
pub(crate) fn move_letter(direction: Direction) -> char {
    match direction {
        Direction::Up => 'U',
        Direction::Right => 'R',
        Direction::Down => 'D',
        Direction::Left => 'L',
    }
}

/// Parses a block given by name or by its map character.
pub(crate) fn parse_block(value: &str) -> Result<Block> {
    let block = match value.to_ascii_lowercase().as_str() {
        "empty" | "." | "_" => Block::Empty,
        "food" => Block::Food,
        "pill" => Block::Pill,
        "snake" => Block::Snake,
        "wall" => Block::Wall,
        "deadly" | "deadly-wall" => Block::DeadlyWall,
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(code), None) => Block::try_from(code)?,
                _ => bail!("unknown block '{value}'"),
            }
        }
    };
    Ok(block)
}

/// Parses `x,y,block`.
pub(crate) fn parse_placement(value: &str) -> Result<Placement> {
    let mut fields = value.splitn(3, ',');
    let (Some(x), Some(y), Some(block)) = (fields.next(), fields.next(), fields.next()) else {
        bail!("expected x,y,block but got '{value}'");
    };
    Ok(Placement {
        x: x.trim().parse().with_context(|| format!("invalid column '{x}'"))?,
        y: y.trim().parse().with_context(|| format!("invalid row '{y}'"))?,
        block: parse_block(block)?,
    })
}

/// Parses a growth rate written as `p/q`.
pub(crate) fn parse_growth_rate(value: &str) -> Result<GrowthRate> {
    let (numerator, denominator) = value
        .split_once('/')
        .ok_or_else(|| anyhow!("expected a fraction like 2/3 but got '{value}'"))?;
    let numerator = numerator
        .trim()
        .parse()
        .with_context(|| format!("invalid numerator '{numerator}'"))?;
    let denominator = denominator
        .trim()
        .parse()
        .with_context(|| format!("invalid denominator '{denominator}'"))?;
    Ok(GrowthRate::new(numerator, denominator)?)
}

/// Parses `dx,dy` offsets, which may be negative.
pub(crate) fn parse_offset(value: &str) -> Result<(i64, i64)> {
    let (dx, dy) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected dx,dy but got '{value}'"))?;
    Ok((
        dx.trim().parse().with_context(|| format!("invalid dx '{dx}'"))?,
        dy.trim().parse().with_context(|| format!("invalid dy '{dy}'"))?,
    ))
}

/// Joins the rows of a map file into a map code.
///
/// Line breaks are dropped; every other character, including spaces, is a
/// cell.
pub(crate) fn map_code_from_rows(rows: &str) -> String {
    rows.lines().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_accept_mixed_case_and_separators() {
        assert_eq!(
            parse_moves("Rr, d L\nu").expect("valid moves"),
            vec![
                Direction::Right,
                Direction::Right,
                Direction::Down,
                Direction::Left,
                Direction::Up,
            ]
        );
    }

    #[test]
    fn moves_reject_unknown_letters() {
        let error = parse_moves("RRX").expect_err("X is not a move");
        assert!(error.to_string().contains("position 2"));
    }

    #[test]
    fn move_letters_match_parser() {
        for direction in Direction::ALL {
            let letter = move_letter(direction).to_string();
            assert_eq!(parse_moves(&letter).expect("valid move"), vec![direction]);
        }
    }

    #[test]
    fn blocks_parse_by_name_or_code() {
        assert_eq!(parse_block("wall").expect("name"), Block::Wall);
        assert_eq!(parse_block("X").expect("code"), Block::DeadlyWall);
        assert_eq!(parse_block(".").expect("alias"), Block::Empty);
        assert!(parse_block("lava").is_err());
        assert!(parse_block("q").is_err());
    }

    #[test]
    fn placements_parse_three_fields() {
        assert_eq!(
            parse_placement("3, 4,food").expect("valid placement"),
            Placement {
                x: 3,
                y: 4,
                block: Block::Food,
            }
        );
        assert!(parse_placement("3,4").is_err());
        assert!(parse_placement("a,4,F").is_err());
    }

    #[test]
    fn growth_rates_must_be_allowed() {
        assert_eq!(
            parse_growth_rate("5/6").expect("allowed"),
            GrowthRate::new(5, 6).expect("allowed")
        );
        assert!(parse_growth_rate("1/4").is_err());
        assert!(parse_growth_rate("half").is_err());
    }

    #[test]
    fn offsets_allow_negative_values() {
        assert_eq!(parse_offset("-2, 3").expect("valid offset"), (-2, 3));
        assert!(parse_offset("2").is_err());
    }

    #[test]
    fn map_rows_join_without_line_breaks() {
        assert_eq!(map_code_from_rows("S F\r\n W \n"), "S F W ");
    }
}
