/*  Copyright 2016-2019 the Conwayste Developers.
 *
 *  This file is part of toruslife.
 *
 *  toruslife is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  toruslife is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with toruslife.  If not, see <http://www.gnu.org/licenses/>. */

use std::fmt;

use rand::RngCore;

use crate::error::{LifeError, LifeResult};
use crate::grids::BitGrid;

/// Starting population for a new `Universe`.
#[derive(Debug, Clone, PartialEq)]
pub enum Initial {
    /// Every cell dead.
    Empty,
    /// Every word of the alive grid filled with random bits.
    Random,
    /// Caller-supplied cells; must hold exactly `cols * rows` bits.
    Cells(BitGrid),
}

/// Builder paradigm to create `Universe` structs with default values.
pub struct BigBang {
    cols:    usize,
    rows:    usize,
    initial: Initial,
}

/// This is a builder for `Universe` structs.
///
/// # Examples
///
/// ```
/// let mut uni = toruslife::universe::BigBang::new()
///                 .cols(80)      // optionally override width
///                 .rows(40)      // optionally override height
///                 .random()      // optionally start with random cells
///                 .birth()
///                 .unwrap();
/// uni.advance_generation();
/// ```
impl BigBang {
    /// Creates and returns a new builder.
    pub fn new() -> BigBang {
        BigBang {
            cols:    64,
            rows:    32,
            initial: Initial::Empty,
        }
    }

    /// Update the total number of columns for this Universe
    pub fn cols(mut self, new_cols: usize) -> BigBang {
        self.cols = new_cols;
        self
    }

    /// Update the total number of rows for this Universe
    pub fn rows(mut self, new_rows: usize) -> BigBang {
        self.rows = new_rows;
        self
    }

    /// Start from a random population.
    pub fn random(mut self) -> BigBang {
        self.initial = Initial::Random;
        self
    }

    /// Start from the given cells. Bit `row * cols + col` is the cell at (`row`, `col`).
    pub fn cells(mut self, cells: BitGrid) -> BigBang {
        self.initial = Initial::Cells(cells);
        self
    }

    /// "Gives life to the universe and the first moment of time."
    ///
    /// # Errors
    ///
    /// - `TooSmall` if `cols` or `rows` is less than 2.
    /// - `TooLarge` if `cols * rows` overflows `usize`.
    /// - `SizeMismatch` if the supplied cells do not hold exactly `cols * rows` bits.
    pub fn birth(self) -> LifeResult<Universe> {
        Universe::new(self.cols, self.rows, self.initial)
    }

    /// Like `birth`, but any randomness comes from `rng`.
    pub fn birth_with_rng<R: RngCore + ?Sized>(self, rng: &mut R) -> LifeResult<Universe> {
        Universe::new_with_rng(self.cols, self.rows, self.initial, rng)
    }
}

impl Default for BigBang {
    fn default() -> Self {
        BigBang::new()
    }
}

/// How a cell should be presented. When several apply, the first in this order wins: `Staged`,
/// `Born`, `Alive`, `Died`, `Dead`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellState {
    Dead,
    Alive,
    /// Alive, and dead in the previous generation.
    Born,
    /// Dead, and alive in the previous generation.
    Died,
    /// Marked for activation on the next commit.
    Staged,
}

/// Represents a wrapping universe in Conway's game of life.
///
/// All four grids are `cols * rows` bits, with cell (`row`, `col`) at bit `row * cols + col`.
#[derive(Debug, Clone)]
pub struct Universe {
    cols:       usize,
    rows:       usize,
    generation: usize,   // current generation (1-based)
    alive:      BitGrid, // 1 = cell is alive
    staged:     BitGrid, // 1 = cell will be set alive on the next commit
    died:       BitGrid, // 1 = cell died in the latest generation
    born:       BitGrid, // 1 = cell was born in the latest generation
}

impl Universe {
    /// Instantiate a new universe with the given dimensions, in cells. The universe is at
    /// generation 1. `Initial::Random` draws from the thread-local generator.
    ///
    /// # Errors
    ///
    /// See `BigBang::birth`.
    pub fn new(cols: usize, rows: usize, initial: Initial) -> LifeResult<Universe> {
        Universe::new_with_rng(cols, rows, initial, &mut rand::thread_rng())
    }

    /// Same as `new`, but `Initial::Random` draws from `rng`.
    pub fn new_with_rng<R: RngCore + ?Sized>(
        cols: usize,
        rows: usize,
        initial: Initial,
        rng: &mut R,
    ) -> LifeResult<Universe> {
        if cols < 2 || rows < 2 {
            return Err(LifeError::TooSmall { cols, rows });
        }
        let bit_count = cols
            .checked_mul(rows)
            .ok_or(LifeError::TooLarge { cols, rows })?;

        let alive = match initial {
            Initial::Empty => BitGrid::new(bit_count)?,
            Initial::Random => {
                let mut grid = BitGrid::new(bit_count)?;
                grid.fill_random(rng);
                grid
            }
            Initial::Cells(grid) => {
                if grid.bit_count() != bit_count {
                    return Err(LifeError::SizeMismatch {
                        expected: bit_count,
                        actual:   grid.bit_count(),
                    });
                }
                grid
            }
        };

        debug!(
            "New {}x{} universe with {} live cells",
            cols,
            rows,
            alive.count_ones()
        );

        Ok(Universe {
            cols,
            rows,
            generation: 1,
            alive,
            staged: BitGrid::new(bit_count)?,
            died: BitGrid::new(bit_count)?,
            born: BitGrid::new(bit_count)?,
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get the latest generation number (1-based).
    pub fn latest_gen(&self) -> usize {
        self.generation
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.alive.count_ones()
    }

    /// The live cells, one bit per cell.
    pub fn alive_grid(&self) -> &BitGrid {
        &self.alive
    }

    /// Bit index of (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` are out of range.
    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell (row {}, col {}) is outside {}x{} universe",
            row,
            col,
            self.cols,
            self.rows
        );
        row * self.cols + col
    }

    /// # Panics
    ///
    /// Panics if `row` or `col` are out of range.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.alive.get(self.index(row, col))
    }

    /// # Panics
    ///
    /// Panics if `row` or `col` are out of range.
    pub fn has_died_this_step(&self, row: usize, col: usize) -> bool {
        self.died.get(self.index(row, col))
    }

    /// # Panics
    ///
    /// Panics if `row` or `col` are out of range.
    pub fn was_born_this_step(&self, row: usize, col: usize) -> bool {
        self.born.get(self.index(row, col))
    }

    /// # Panics
    ///
    /// Panics if `row` or `col` are out of range.
    pub fn is_staged(&self, row: usize, col: usize) -> bool {
        self.staged.get(self.index(row, col))
    }

    /// Classifies a cell for display. See `CellState` for precedence.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` are out of range.
    pub fn cell_state(&self, row: usize, col: usize) -> CellState {
        let i = self.index(row, col);
        if self.staged.get(i) {
            CellState::Staged
        } else if self.born.get(i) {
            CellState::Born
        } else if self.alive.get(i) {
            CellState::Alive
        } else if self.died.get(i) {
            CellState::Died
        } else {
            CellState::Dead
        }
    }

    /// Directly sets a cell alive or dead in the current generation, bypassing staging.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` are out of range.
    pub fn set_cell(&mut self, row: usize, col: usize, alive: bool) {
        let i = self.index(row, col);
        self.alive.set(i, alive);
    }

    /// Marks (`stage == true`) or unmarks a cell for activation on the next `commit_staged`.
    /// This never touches the live population; unstaging a live cell leaves it alive.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` are out of range.
    pub fn stage_cell(&mut self, row: usize, col: usize, stage: bool) {
        let i = self.index(row, col);
        self.staged.set(i, stage);
    }

    pub fn has_staged(&self) -> bool {
        self.staged.any()
    }

    /// Sets every staged cell alive and clears the staging grid. Cells are only ever added.
    pub fn commit_staged(&mut self) {
        let count = self.staged.count_ones();
        if count > 0 {
            debug!("Committing {} staged cells at generation {}", count, self.generation);
        }
        self.alive.or_in_place(&self.staged);
        self.staged.clear();
    }

    /// Kills every cell and forgets staged cells and the latest transitions. The generation
    /// number is kept.
    pub fn clear_all(&mut self) {
        self.alive.clear();
        self.died.clear();
        self.born.clear();
        self.staged.clear();
    }

    /// Computes the next generation in place and returns its number. Afterwards, `died` and
    /// `born` hold exactly the cells that changed.
    pub fn advance_generation(&mut self) -> usize {
        self.died.clear();
        self.born.clear();
        self.mark_transitions();

        // alive = (alive & !died) | born
        self.died.invert();
        self.alive.and_in_place(&self.died);
        self.died.invert();
        self.alive.or_in_place(&self.born);

        self.generation += 1;
        trace!(
            "Generation {}: {} died, {} born, population {}",
            self.generation,
            self.died.count_ones(),
            self.born.count_ones(),
            self.alive.count_ones()
        );
        self.generation
    }

    /// Number of live neighbors of (`row`, `col`), wrapping at every edge. On a 2-wide (or
    /// 2-tall) universe both sides wrap to the same cell, which is then counted twice.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` are out of range.
    pub fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        self.index(row, col);
        let (north, base, south) = Universe::row_bases(self.cols, self.rows, row);
        let last_col = self.cols - 1;
        let neighbors = if col == 0 {
            Universe::west_neighbors(north, base, south, last_col)
        } else if col == last_col {
            Universe::east_neighbors(north, base, south, last_col)
        } else {
            Universe::interior_neighbors(north, base, south, col)
        };
        Universe::count_live(&self.alive, &neighbors)
    }

    /// Walks the universe row by row, recording deaths and births against the current `alive`
    /// grid, which is not modified here.
    ///
    /// Wrapping rows is handled once per row by `row_bases`. Within a row, the first and last
    /// columns wrap to each other and everything in between uses straight offsets, so no cell
    /// needs a modulo.
    fn mark_transitions(&mut self) {
        let (cols, rows) = (self.cols, self.rows);
        let alive = &self.alive;
        let died = &mut self.died;
        let born = &mut self.born;
        let last_col = cols - 1;

        for row in 0..rows {
            let (north, base, south) = Universe::row_bases(cols, rows, row);

            let neighbors = Universe::west_neighbors(north, base, south, last_col);
            Universe::record_transition(alive, died, born, base, Universe::count_live(alive, &neighbors));

            for col in 1..last_col {
                let neighbors = Universe::interior_neighbors(north, base, south, col);
                Universe::record_transition(alive, died, born, base + col, Universe::count_live(alive, &neighbors));
            }

            let neighbors = Universe::east_neighbors(north, base, south, last_col);
            Universe::record_transition(
                alive,
                died,
                born,
                base + last_col,
                Universe::count_live(alive, &neighbors),
            );
        }
    }

    /// Index of the first cell in the row above, this row, and the row below, wrapping top to
    /// bottom.
    #[inline]
    fn row_bases(cols: usize, rows: usize, row: usize) -> (usize, usize, usize) {
        let base = row * cols;
        let north = if row == 0 { (rows - 1) * cols } else { base - cols };
        let south = if row == rows - 1 { 0 } else { base + cols };
        (north, base, south)
    }

    /// Column 0: the western neighbors are in the last column.
    #[inline]
    fn west_neighbors(north: usize, base: usize, south: usize, last_col: usize) -> [usize; 8] {
        [
            north + last_col, north, north + 1,
            base + last_col,         base + 1,
            south + last_col, south, south + 1,
        ]
    }

    /// Last column: the eastern neighbors are in column 0.
    #[inline]
    fn east_neighbors(north: usize, base: usize, south: usize, last_col: usize) -> [usize; 8] {
        [
            north + last_col - 1, north + last_col, north,
            base + last_col - 1,                    base,
            south + last_col - 1, south + last_col, south,
        ]
    }

    #[inline]
    fn interior_neighbors(north: usize, base: usize, south: usize, col: usize) -> [usize; 8] {
        [
            north + col - 1, north + col, north + col + 1,
            base + col - 1,               base + col + 1,
            south + col - 1, south + col, south + col + 1,
        ]
    }

    #[inline]
    fn count_live(alive: &BitGrid, neighbors: &[usize; 8]) -> u8 {
        neighbors.iter().filter(|&&i| alive.get(i)).count() as u8
    }

    /// B3/S23. Only transitions are recorded; survivors and dead cells that stay dead are left
    /// alone.
    #[inline]
    fn record_transition(alive: &BitGrid, died: &mut BitGrid, born: &mut BitGrid, index: usize, count: u8) {
        match (alive.get(index), count) {
            (true, 0..=1) => died.set(index, true), // starvation
            (true, 4..=8) => died.set(index, true), // overpopulation
            (false, 3) => born.set(index, true),
            _ => {}
        }
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            let mut s = String::with_capacity(self.cols);
            for col in 0..self.cols {
                let ch = match self.cell_state(row, col) {
                    CellState::Staged => '+',
                    CellState::Alive | CellState::Born => '*',
                    CellState::Died | CellState::Dead => ' ',
                };
                s.push(ch);
            }
            writeln!(f, "{}", s)?;
        }
        Ok(())
    }
}
