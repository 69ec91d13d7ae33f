/*  Copyright 2019 the Conwayste Developers.
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

custom_error! {pub LifeError
    InvalidSize{bit_count: usize} = "LifeError->InvalidSize->bit count must be positive, got {bit_count}",
    TooSmall{cols: usize, rows: usize} = "LifeError->TooSmall->need at least 2x2 cells, got {cols}x{rows}",
    TooLarge{cols: usize, rows: usize} = "LifeError->TooLarge->{cols}x{rows} cells do not fit in usize",
    SizeMismatch{expected: usize, actual: usize} = "LifeError->SizeMismatch->expected {expected} bits, got {actual}"
}

pub type LifeResult<T> = ::std::result::Result<T, LifeError>;

impl PartialEq for LifeError {
    fn eq(&self, other: &LifeError) -> bool {
        use LifeError::*;
        match (self, other) {
            (InvalidSize { bit_count: a }, InvalidSize { bit_count: b }) => a == b,
            (
                TooSmall {
                    cols: self_cols,
                    rows: self_rows,
                },
                TooSmall {
                    cols: other_cols,
                    rows: other_rows,
                },
            ) => self_cols == other_cols && self_rows == other_rows,
            (
                TooLarge {
                    cols: self_cols,
                    rows: self_rows,
                },
                TooLarge {
                    cols: other_cols,
                    rows: other_rows,
                },
            ) => self_cols == other_cols && self_rows == other_rows,
            (
                SizeMismatch {
                    expected: self_expected,
                    actual: self_actual,
                },
                SizeMismatch {
                    expected: other_expected,
                    actual: other_actual,
                },
            ) => self_expected == other_expected && self_actual == other_actual,
            _ => false,
        }
    }
}
