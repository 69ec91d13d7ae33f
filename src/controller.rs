/*  Copyright 2018-2019 the Conwayste Developers.
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

use crate::config::Settings;
use crate::error::LifeResult;
use crate::universe::{CellState, Initial, Universe};

/// What a renderer should paint for one cell.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellStyle {
    Empty,
    Live,
    Born,
    Died,
    Staged,
}

/// Presentation-side state wrapped around a single `Universe`: whether the game is paused,
/// whether the pointer is held down, and the display settings used to map pixels to cells.
///
/// The controller never runs on its own. Whoever owns the timer calls `tick` once per timestep,
/// and input handlers call `press_at`, `drag_to` and `release`.
pub struct Controller<R: RngCore> {
    universe:     Universe,
    settings:     Settings,
    rng:          R,
    paused:       bool,
    pointer_down: bool,
}

impl<R: RngCore> Controller<R> {
    /// Creates a controller over a random `cols` x `rows` universe that has already been stepped
    /// once, so the first frame shows a settled-looking population rather than noise.
    pub fn new(settings: Settings, cols: usize, rows: usize, mut rng: R) -> LifeResult<Self> {
        let universe = Universe::new_with_rng(cols, rows, Initial::Random, &mut rng)?;
        let mut controller = Controller {
            universe,
            settings,
            rng,
            paused: false,
            pointer_down: false,
        };
        controller.step();
        Ok(controller)
    }

    /// Like `new`, sized to cover a `width_px` x `height_px` view plus the hidden rows and
    /// columns from `settings`.
    pub fn for_viewport(settings: Settings, width_px: u32, height_px: u32, rng: R) -> LifeResult<Self> {
        let cell_size = settings.display.cell_size.max(1);
        let visible_cols = (width_px / cell_size + (width_px % cell_size != 0) as u32) as usize + 1;
        let visible_rows = (height_px / cell_size + (height_px % cell_size != 0) as u32) as usize + 1;
        let cols = visible_cols + settings.display.hidden_cols;
        let rows = visible_rows + settings.display.hidden_rows;
        debug!("{}x{} px view -> {}x{} universe", width_px, height_px, cols, rows);
        Controller::new(settings, cols, rows, rng)
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn universe_mut(&mut self) -> &mut Universe {
        &mut self.universe
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Rows a renderer should draw; the rest are hidden past the bottom edge.
    pub fn visible_rows(&self) -> usize {
        self.universe.rows().saturating_sub(self.settings.display.hidden_rows)
    }

    /// Columns a renderer should draw; the rest are hidden past the right edge.
    pub fn visible_cols(&self) -> usize {
        self.universe.cols().saturating_sub(self.settings.display.hidden_cols)
    }

    /// Staged cells take priority over the generation: they are committed instead of stepping.
    fn step(&mut self) {
        if self.universe.has_staged() {
            self.universe.commit_staged();
        } else {
            self.universe.advance_generation();
        }
    }

    /// Timer callback. Returns false, doing nothing, while paused.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.step();
        true
    }

    /// Pauses or resumes. Resuming steps immediately. Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        if self.paused {
            info!("Paused at generation {}", self.universe.latest_gen());
        } else {
            info!("Resumed at generation {}", self.universe.latest_gen());
            self.step();
        }
        self.paused
    }

    /// Maps a pixel position to (`row`, `col`). The view is drawn shifted up and left by half a
    /// cell, so the seam cells are only partly visible. Returns `None` outside the universe.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let cell_size = self.settings.display.cell_size.max(1) as f32;
        let col = ((x + cell_size / 2.0) / cell_size).floor();
        let row = ((y + cell_size / 2.0) / cell_size).floor();
        // NaN fails both comparisons
        if !(col >= 0.0) || !(row >= 0.0) {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.universe.rows() || col >= self.universe.cols() {
            return None;
        }
        Some((row, col))
    }

    /// Pointer pressed. Pauses a running game, then stages the cell under the pointer
    /// (`primary`) or unstages it (any other button). Unstaging never kills a live cell.
    pub fn press_at(&mut self, x: f32, y: f32, primary: bool) -> Option<(usize, usize)> {
        if !self.paused {
            self.toggle_pause();
        }
        self.pointer_down = true;
        let (row, col) = self.cell_at(x, y)?;
        self.universe.stage_cell(row, col, primary);
        Some((row, col))
    }

    /// Pointer moved. While held down, stages the cell under the pointer.
    pub fn drag_to(&mut self, x: f32, y: f32) -> Option<(usize, usize)> {
        if !self.pointer_down {
            return None;
        }
        let (row, col) = self.cell_at(x, y)?;
        self.universe.stage_cell(row, col, true);
        Some((row, col))
    }

    pub fn release(&mut self) {
        self.pointer_down = false;
    }

    /// Replaces the universe with a fresh random one of the same size and steps it once.
    pub fn reset(&mut self) -> LifeResult<()> {
        let (cols, rows) = (self.universe.cols(), self.universe.rows());
        self.universe = Universe::new_with_rng(cols, rows, Initial::Random, &mut self.rng)?;
        self.step();
        Ok(())
    }

    /// Kills every cell and pauses a running game.
    pub fn erase(&mut self) {
        self.universe.clear_all();
        if !self.paused {
            self.toggle_pause();
        }
    }

    /// Style for one cell, honoring the fade settings.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` are out of range.
    pub fn cell_style(&self, row: usize, col: usize) -> CellStyle {
        let display = &self.settings.display;
        match self.universe.cell_state(row, col) {
            CellState::Staged => CellStyle::Staged,
            CellState::Born if display.fade_births => CellStyle::Born,
            CellState::Born | CellState::Alive => CellStyle::Live,
            CellState::Died if display.fade_deaths => CellStyle::Died,
            CellState::Died | CellState::Dead => CellStyle::Empty,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_controller(cols: usize, rows: usize) -> Controller<StdRng> {
        Controller::new(Settings::new(), cols, rows, StdRng::seed_from_u64(11)).unwrap()
    }

    #[test]
    fn new_steps_once() {
        let controller = make_controller(20, 10);
        assert_eq!(controller.universe().latest_gen(), 2);
        assert!(!controller.is_paused());
    }

    #[test]
    fn new_rejects_tiny_universe() {
        assert!(Controller::new(Settings::new(), 1, 10, StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn for_viewport_adds_margin_and_hidden_cells() {
        let controller = Controller::for_viewport(Settings::new(), 320, 200, StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(controller.universe().cols(), 11 + 4);
        assert_eq!(controller.universe().rows(), 8 + 4);
        assert_eq!(controller.visible_cols(), 11);
        assert_eq!(controller.visible_rows(), 8);
    }

    #[test]
    fn for_viewport_handles_huge_pixel_sizes() {
        let mut settings = Settings::new();
        settings.display.cell_size = u32::max_value();
        let controller = Controller::for_viewport(settings, u32::max_value(), 0, StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(controller.universe().cols(), 2 + 4);
        assert_eq!(controller.universe().rows(), 1 + 4);
    }

    #[test]
    fn tick_does_nothing_while_paused() {
        let mut controller = make_controller(10, 10);
        assert!(controller.toggle_pause());
        let gen = controller.universe().latest_gen();
        assert!(!controller.tick());
        assert_eq!(controller.universe().latest_gen(), gen);
    }

    #[test]
    fn resuming_steps_immediately() {
        let mut controller = make_controller(10, 10);
        controller.toggle_pause();
        let gen = controller.universe().latest_gen();
        assert!(!controller.toggle_pause());
        assert_eq!(controller.universe().latest_gen(), gen + 1);
    }

    #[test]
    fn cell_at_uses_half_cell_offset() {
        let controller = make_controller(10, 10);
        assert_eq!(controller.cell_at(0.0, 0.0), Some((0, 0)));
        assert_eq!(controller.cell_at(15.9, 0.0), Some((0, 0)));
        assert_eq!(controller.cell_at(16.0, 0.0), Some((0, 1)));
        assert_eq!(controller.cell_at(0.0, 48.0), Some((2, 0)));
        assert_eq!(controller.cell_at(-17.0, 0.0), None);
        assert_eq!(controller.cell_at(0.0, 10.0 * 32.0), None);
    }

    #[test]
    fn cell_at_ignores_non_finite_positions() {
        let mut controller = make_controller(10, 10);
        assert_eq!(controller.cell_at(f32::NAN, f32::NAN), None);
        assert_eq!(controller.cell_at(f32::NAN, 0.0), None);
        assert_eq!(controller.cell_at(0.0, f32::NAN), None);
        assert_eq!(controller.cell_at(f32::INFINITY, 0.0), None);
        assert_eq!(controller.cell_at(0.0, f32::NEG_INFINITY), None);

        controller.universe_mut().clear_all();
        assert_eq!(controller.press_at(f32::NAN, f32::NAN, true), None);
        assert!(!controller.universe().has_staged());
    }

    #[test]
    fn press_pauses_and_stages_then_tick_commits() {
        let mut controller = make_controller(10, 10);
        controller.universe_mut().clear_all();

        assert_eq!(controller.press_at(64.0, 32.0, true), Some((1, 2)));
        assert!(controller.is_paused());
        assert_eq!(controller.drag_to(96.0, 32.0), Some((1, 3)));
        controller.release();
        assert_eq!(controller.drag_to(128.0, 32.0), None);
        assert!(controller.universe().is_staged(1, 2));
        assert!(controller.universe().is_staged(1, 3));
        assert_eq!(controller.cell_style(1, 2), CellStyle::Staged);

        let gen = controller.universe().latest_gen();
        controller.toggle_pause();
        // the resume step commits instead of advancing
        assert_eq!(controller.universe().latest_gen(), gen);
        assert!(controller.universe().is_alive(1, 2));
        assert!(controller.universe().is_alive(1, 3));
        assert!(!controller.universe().has_staged());

        controller.tick();
        assert_eq!(controller.universe().latest_gen(), gen + 1);
    }

    #[test]
    fn secondary_press_only_unstages() {
        let mut controller = make_controller(10, 10);
        controller.universe_mut().clear_all();
        controller.universe_mut().set_cell(1, 1, true);
        controller.universe_mut().stage_cell(1, 1, true);

        controller.press_at(32.0, 32.0, false);
        assert!(!controller.universe().is_staged(1, 1));
        assert!(controller.universe().is_alive(1, 1));
    }

    #[test]
    fn erase_clears_and_pauses() {
        let mut controller = make_controller(12, 12);
        controller.erase();
        assert!(controller.is_paused());
        assert_eq!(controller.universe().population(), 0);
    }

    #[test]
    fn reset_keeps_size_and_repopulates() {
        let mut controller = make_controller(30, 20);
        controller.erase();
        controller.reset().unwrap();
        assert_eq!(controller.universe().cols(), 30);
        assert_eq!(controller.universe().rows(), 20);
        assert_eq!(controller.universe().latest_gen(), 2);
        assert!(controller.universe().population() > 0);
    }

    #[test]
    fn cell_style_honors_fades() {
        let mut settings = Settings::new();
        let mut controller = Controller::new(settings.clone(), 5, 5, StdRng::seed_from_u64(2)).unwrap();
        {
            let uni = controller.universe_mut();
            uni.clear_all();
            uni.set_cell(2, 1, true);
            uni.set_cell(2, 2, true);
            uni.set_cell(2, 3, true);
            uni.advance_generation();
        }
        assert_eq!(controller.cell_style(1, 2), CellStyle::Live);
        assert_eq!(controller.cell_style(2, 1), CellStyle::Empty);

        settings.display.fade_births = true;
        settings.display.fade_deaths = true;
        controller.settings = settings;
        assert_eq!(controller.cell_style(1, 2), CellStyle::Born);
        assert_eq!(controller.cell_style(2, 2), CellStyle::Live);
        assert_eq!(controller.cell_style(2, 1), CellStyle::Died);
        assert_eq!(controller.cell_style(0, 0), CellStyle::Empty);
    }
}
