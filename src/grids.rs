/*  Copyright 2017-2019 the Conwayste Developers.
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

use rand::RngCore;

use crate::error::{LifeError, LifeResult};

const WORD_BITS: usize = 64;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum BitOperation {
    Clear,
    Set,
    Toggle,
}

/// A fixed-length run of bits packed into `u64` words. Bit 0 is the most significant bit of the
/// first word.
///
/// Bits past `bit_count` in the final word are padding. `invert` flips them along with
/// everything else, so nothing should read them; the counting helpers and `==` mask them out.
#[derive(Debug, Clone)]
pub struct BitGrid {
    bit_count: usize,
    words:     Vec<u64>,
}

impl BitGrid {
    /// Creates a new zero-initialized BitGrid holding `bit_count` bits.
    ///
    /// # Errors
    ///
    /// `LifeError::InvalidSize` if `bit_count` is zero.
    pub fn new(bit_count: usize) -> LifeResult<Self> {
        if bit_count == 0 {
            return Err(LifeError::InvalidSize { bit_count });
        }
        let word_count = bit_count / WORD_BITS + (bit_count % WORD_BITS != 0) as usize;
        Ok(BitGrid {
            bit_count,
            words: vec![0; word_count],
        })
    }

    /// Creates a BitGrid of `bit_count` bits with exactly the listed indices set.
    ///
    /// # Panics
    ///
    /// Panics if any index is not less than `bit_count`.
    pub fn from_indices<I>(bit_count: usize, indices: I) -> LifeResult<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut grid = BitGrid::new(bit_count)?;
        for index in indices {
            grid.set(index, true);
        }
        Ok(grid)
    }

    #[inline]
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    #[inline]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Translates a bit index to (word index, single-bit mask).
    #[inline]
    fn locate(&self, index: usize) -> (usize, u64) {
        assert!(
            index < self.bit_count,
            "bit index {} out of range for BitGrid of {} bits",
            index,
            self.bit_count
        );
        let word_idx = index / WORD_BITS;
        let shift = WORD_BITS - 1 - (index & (WORD_BITS - 1));
        (word_idx, 1 << shift)
    }

    /// Mask of the meaningful bits in the final word.
    #[inline]
    fn last_word_mask(&self) -> u64 {
        let used = self.bit_count % WORD_BITS;
        if used == 0 {
            u64::max_value()
        } else {
            u64::max_value() << (WORD_BITS - used)
        }
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        let (word_idx, mask) = self.locate(index);
        self.words[word_idx] & mask != 0
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        let op = if value { BitOperation::Set } else { BitOperation::Clear };
        self.modify(index, op);
    }

    /// Sets, clears, or toggles a single bit.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub fn modify(&mut self, index: usize, op: BitOperation) {
        let (word_idx, mask) = self.locate(index);
        match op {
            BitOperation::Set    => self.words[word_idx] |=  mask,
            BitOperation::Clear  => self.words[word_idx] &= !mask,
            BitOperation::Toggle => self.words[word_idx] ^=  mask,
        }
    }

    /// Clear this BitGrid.
    pub fn clear(&mut self) {
        for word in self.words.iter_mut() {
            *word = 0;
        }
    }

    /// `self &= other`, word by word. Only bits `other` actually holds take part: words past the
    /// end of `other`, and bits past `other.bit_count()` in its final word, are left alone.
    pub fn and_in_place(&mut self, other: &BitGrid) {
        let last = other.words.len() - 1;
        let last_mask = other.last_word_mask();
        for (i, (word, &other_word)) in self.words.iter_mut().zip(other.words.iter()).enumerate() {
            if i == last {
                *word &= other_word | !last_mask;
            } else {
                *word &= other_word;
            }
        }
    }

    /// `self |= other`, with the same overlap rule as `and_in_place`.
    pub fn or_in_place(&mut self, other: &BitGrid) {
        let last = other.words.len() - 1;
        let last_mask = other.last_word_mask();
        for (i, (word, &other_word)) in self.words.iter_mut().zip(other.words.iter()).enumerate() {
            if i == last {
                *word |= other_word & last_mask;
            } else {
                *word |= other_word;
            }
        }
    }

    /// Flips every bit, padding included.
    pub fn invert(&mut self) {
        for word in self.words.iter_mut() {
            *word = !*word;
        }
    }

    /// Returns true if any of the `bit_count` bits is set.
    pub fn any(&self) -> bool {
        let last = self.words.len() - 1;
        self.words[..last].iter().any(|&word| word != 0) || self.words[last] & self.last_word_mask() != 0
    }

    /// Number of set bits among the `bit_count` bits.
    pub fn count_ones(&self) -> usize {
        let last = self.words.len() - 1;
        let full: usize = self.words[..last].iter().map(|word| word.count_ones() as usize).sum();
        full + (self.words[last] & self.last_word_mask()).count_ones() as usize
    }

    /// Calls callback with the index of each bit that is set (1), in ascending order.
    pub fn each_set<F: FnMut(usize)>(&self, mut callback: F) {
        for (word_idx, &word) in self.words.iter().enumerate() {
            if word == 0 {
                continue;
            }
            for shift in (0..WORD_BITS).rev() {
                let index = word_idx * WORD_BITS + (WORD_BITS - 1 - shift);
                if index >= self.bit_count {
                    return;
                }
                if (word >> shift) & 1 == 1 {
                    callback(index);
                }
            }
        }
    }

    /// Fills every word with random bits from `rng`, then clears the padding.
    pub fn fill_random<R: RngCore + ?Sized>(&mut self, rng: &mut R) {
        for word in self.words.iter_mut() {
            *word = rng.next_u64();
        }
        let mask = self.last_word_mask();
        if let Some(last) = self.words.last_mut() {
            *last &= mask;
        }
    }
}

impl PartialEq for BitGrid {
    /// Grids are equal when they hold the same number of bits and the same bits; padding is
    /// ignored.
    fn eq(&self, other: &BitGrid) -> bool {
        if self.bit_count != other.bit_count {
            return false;
        }
        let last = self.words.len() - 1;
        self.words[..last] == other.words[..last]
            && (self.words[last] ^ other.words[last]) & self.last_word_mask() == 0
    }
}

impl Eq for BitGrid {}
