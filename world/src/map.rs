use std::fmt;

use serde::{Deserialize, Serialize};
use snake_puzzle_core::{
    is_valid_side_length, Block, CellCoord, Direction, ValidationError, MAX_SIDE_LENGTH,
    MIN_SIDE_LENGTH,
};

/// Square toroidal grid of blocks stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Map {
    side_length: u32,
    cells: Vec<Block>,
}

impl Map {
    /// Creates an empty map with the provided side length.
    pub fn blank(side_length: u32) -> Result<Self, ValidationError> {
        if !is_valid_side_length(side_length) {
            return Err(ValidationError::InvalidSideLength(side_length));
        }
        Ok(Self {
            side_length,
            cells: vec![Block::Empty; cell_count(side_length)],
        })
    }

    /// Parses a map code, one character per cell.
    ///
    /// The alphabet is checked first, then the snake marker count, then the
    /// dimensions.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        let cells = code
            .chars()
            .enumerate()
            .map(|(position, found)| {
                Block::from_char(found).ok_or(ValidationError::InvalidMapChars { found, position })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let markers = cells.iter().filter(|block| **block == Block::Snake).count();
        if markers > 1 {
            return Err(ValidationError::TooManySnakeMarkers { count: markers });
        }

        let side_length = (MIN_SIDE_LENGTH..=MAX_SIDE_LENGTH)
            .find(|side| cell_count(*side) == cells.len())
            .ok_or(ValidationError::InvalidMapDimensions { cells: cells.len() })?;

        Ok(Self { side_length, cells })
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn side_length(&self) -> u32 {
        self.side_length
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Block] {
        &self.cells
    }

    /// Block stored at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn block(&self, cell: CellCoord) -> Option<Block> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Linear position of `cell`, or `None` outside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.x() < self.side_length && cell.y() < self.side_length {
            let row = usize::try_from(cell.y()).ok()?;
            let column = usize::try_from(cell.x()).ok()?;
            Some(row * self.side() + column)
        } else {
            None
        }
    }

    /// Coordinates of a linear position, or `None` outside the grid.
    #[must_use]
    pub fn coord(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cells.len() {
            return None;
        }
        let x = u32::try_from(index % self.side()).ok()?;
        let y = u32::try_from(index / self.side()).ok()?;
        Some(CellCoord::new(x, y))
    }

    /// Cell adjacent to `cell` in `direction`, wrapping across edges.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> CellCoord {
        cell.step(direction, self.side_length)
    }

    /// Cell holding the snake marker, if any.
    #[must_use]
    pub fn snake_cell(&self) -> Option<CellCoord> {
        self.cells
            .iter()
            .position(|block| *block == Block::Snake)
            .and_then(|index| self.coord(index))
    }

    /// Number of cells holding `block`.
    #[must_use]
    pub fn count(&self, block: Block) -> usize {
        self.cells.iter().filter(|cell| **cell == block).count()
    }

    /// Renders the map code, optionally with one line per row.
    #[must_use]
    pub fn render(&self, with_line_breaks: bool) -> String {
        let mut rendered = String::with_capacity(self.cells.len() + self.side());
        for (index, block) in self.cells.iter().enumerate() {
            if with_line_breaks && index > 0 && index % self.side() == 0 {
                rendered.push('\n');
            }
            rendered.push(block.as_char());
        }
        rendered
    }

    pub(crate) fn set(&mut self, cell: CellCoord, block: Block) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = block;
        }
    }

    pub(crate) fn positions_of(&self, block: Block) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == block)
            .map(|(index, _)| index)
            .collect()
    }

    pub(crate) fn set_index(&mut self, index: usize, block: Block) {
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = block;
        }
    }

    /// Copy of the map with every `from` block replaced by `to`.
    pub(crate) fn replaced(&self, from: Block, to: Block) -> Self {
        Self {
            side_length: self.side_length,
            cells: self
                .cells
                .iter()
                .map(|block| if *block == from { to } else { *block })
                .collect(),
        }
    }

    /// Copy of the map with every cell emptied.
    pub(crate) fn emptied(&self) -> Self {
        Self {
            side_length: self.side_length,
            cells: vec![Block::Empty; self.cells.len()],
        }
    }

    /// Copy of the map cropped or padded with empty cells on the right and
    /// bottom edges.
    pub(crate) fn resized(&self, side_length: u32) -> Self {
        let mut resized = Self {
            side_length,
            cells: vec![Block::Empty; cell_count(side_length)],
        };
        let kept = self.side_length.min(side_length);
        for y in 0..kept {
            for x in 0..kept {
                let cell = CellCoord::new(x, y);
                if let Some(block) = self.block(cell) {
                    resized.set(cell, block);
                }
            }
        }
        resized
    }

    /// Copy of the map with its content rotated by `(dx, dy)` cells.
    pub(crate) fn shifted(&self, dx: i64, dy: i64) -> Self {
        let side = i64::from(self.side_length);
        let dx = dx.rem_euclid(side);
        let dy = dy.rem_euclid(side);
        let mut shifted = self.clone();
        for (index, block) in self.cells.iter().enumerate() {
            let Some(cell) = self.coord(index) else {
                continue;
            };
            let x = (i64::from(cell.x()) + dx) % side;
            let y = (i64::from(cell.y()) + dy) % side;
            if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
                shifted.set(CellCoord::new(x, y), *block);
            }
        }
        shifted
    }

    fn side(&self) -> usize {
        self.side_length as usize
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

impl TryFrom<String> for Map {
    type Error = ValidationError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::parse(&code)
    }
}

impl From<Map> for String {
    fn from(map: Map) -> Self {
        map.render(false)
    }
}

fn cell_count(side_length: u32) -> usize {
    let side = side_length as usize;
    side * side
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with(side: u32, placements: &[(u32, u32, char)]) -> String {
        let mut cells = vec![' '; cell_count(side)];
        for (x, y, code) in placements {
            cells[(*y * side + *x) as usize] = *code;
        }
        cells.into_iter().collect()
    }

    #[test]
    fn blank_maps_cover_every_supported_side() {
        for side in MIN_SIDE_LENGTH..=MAX_SIDE_LENGTH {
            let map = Map::blank(side).expect("supported side");
            assert_eq!(map.cells().len(), cell_count(side));
            assert!(map.cells().iter().all(|block| *block == Block::Empty));
            assert_eq!(Map::parse(&map.render(false)), Ok(map));
        }
        assert_eq!(Map::blank(14), Err(ValidationError::InvalidSideLength(14)));
        assert_eq!(Map::blank(22), Err(ValidationError::InvalidSideLength(22)));
    }

    #[test]
    fn parse_rejects_unknown_characters_first() {
        let mut code = map_with(15, &[(0, 0, 'S'), (1, 0, 'S')]);
        code.push('q');
        assert_eq!(
            Map::parse(&code),
            Err(ValidationError::InvalidMapChars {
                found: 'q',
                position: 225,
            })
        );
    }

    #[test]
    fn parse_rejects_second_snake_marker() {
        let code = map_with(16, &[(0, 0, 'S'), (5, 5, 'S')]);
        assert_eq!(
            Map::parse(&code),
            Err(ValidationError::TooManySnakeMarkers { count: 2 })
        );
    }

    #[test]
    fn parse_rejects_non_square_lengths() {
        assert_eq!(
            Map::parse(&" ".repeat(226)),
            Err(ValidationError::InvalidMapDimensions { cells: 226 })
        );
        assert_eq!(
            Map::parse(&" ".repeat(196)),
            Err(ValidationError::InvalidMapDimensions { cells: 196 })
        );
    }

    #[test]
    fn coordinates_round_trip_through_indices() {
        let map = Map::blank(17).expect("supported side");
        let cell = CellCoord::new(16, 3);
        let index = map.index(cell).expect("inside grid");
        assert_eq!(index, 3 * 17 + 16);
        assert_eq!(map.coord(index), Some(cell));
        assert_eq!(map.index(CellCoord::new(17, 0)), None);
        assert_eq!(map.coord(17 * 17), None);
    }

    #[test]
    fn render_splits_rows() {
        let map = Map::parse(&map_with(15, &[(14, 0, 'F'), (0, 1, 'W')])).expect("valid map");
        let rendered = map.render(true);
        let rows: Vec<&str> = rendered.split('\n').collect();
        assert_eq!(rows.len(), 15);
        assert!(rows.iter().all(|row| row.chars().count() == 15));
        assert!(rows[0].ends_with('F'));
        assert!(rows[1].starts_with('W'));
    }

    #[test]
    fn resize_pads_and_crops_bottom_right() {
        let map = Map::parse(&map_with(15, &[(0, 0, 'S'), (14, 14, 'F')])).expect("valid map");

        let grown = map.resized(17);
        assert_eq!(grown.side_length(), 17);
        assert_eq!(grown.block(CellCoord::new(0, 0)), Some(Block::Snake));
        assert_eq!(grown.block(CellCoord::new(14, 14)), Some(Block::Food));
        assert_eq!(grown.count(Block::Empty), 17 * 17 - 2);

        let cropped = grown.resized(15);
        assert_eq!(cropped, map);

        let smaller = map.resized(15).resized(15);
        assert_eq!(smaller, map);
    }

    #[test]
    fn shift_moves_content_with_wraparound() {
        let map = Map::parse(&map_with(15, &[(14, 0, 'S')])).expect("valid map");
        let shifted = map.shifted(2, -1);
        assert_eq!(shifted.snake_cell(), Some(CellCoord::new(1, 14)));
        assert_eq!(shifted.count(Block::Snake), 1);
    }
}
