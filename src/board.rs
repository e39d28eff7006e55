use std::fmt;

/// State of one board cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Cell {
    Empty,
    Queen,
    /// No solution extends the current placements with a queen here.
    Dead,
}

impl Cell {
    /// Numeric code used by renderers: `0` empty, `1` queen, `-1` dead.
    pub fn code(self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::Queen => 1,
            Cell::Dead => -1,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// An `n`×`n` grid of cells, stored row-major.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        row < self.size && column < self.size
    }

    fn offset(&self, row: usize, column: usize) -> usize {
        assert!(
            self.contains(row, column),
            "Cell ({}, {}) is outside the {}x{} board",
            row,
            column,
            self.size,
            self.size
        );
        row * self.size + column
    }

    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[self.offset(row, column)]
    }

    pub fn set(&mut self, row: usize, column: usize, cell: Cell) {
        let i = self.offset(row, column);
        self.cells[i] = cell;
    }

    /// Iterate over `(row, column, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let n = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (i / n, i % n, cell))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    pub fn queens(&self) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|&(_, _, cell)| cell == Cell::Queen)
            .map(|(row, column, _)| (row, column))
            .collect()
    }

    /// The grid as numeric codes, one `Vec` per row.
    pub fn to_codes(&self) -> Vec<Vec<i8>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: Vec<&str> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => ".",
                    Cell::Queen => "Q",
                    Cell::Dead => "x",
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
