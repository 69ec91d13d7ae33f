/*  Copyright 2017-2018 the Conwayste Developers.
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
 *  along with toruslife.  If not, see
 *  <http://www.gnu.org/licenses/>. */

use std::error::Error;

use serde::{Deserialize, Serialize};

#[cfg(not(test))]
use std::fs::OpenOptions;
#[cfg(not(test))]
use std::io::{Read, Write};
#[cfg(not(test))]
use std::path::Path;

pub const CONFIG_FILE_PATH: &str = "toruslife.toml";

pub const DEFAULT_CELL_SIZE: u32 = 32;
pub const DEFAULT_HIDDEN_ROWS: usize = 4;
pub const DEFAULT_HIDDEN_COLS: usize = 4;
pub const DEFAULT_TIMESTEP_MS: u64 = 500;

/// Settings contains everything the presentation side of the game can tune. Any key missing
/// from `toruslife.toml` takes its default value.
// Top-level view of config toml file
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub display: DisplaySettings,
    pub timing:  TimingSettings,
}

/// Decodes from the [display] section.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    /// Edge length of one cell, in pixels.
    pub cell_size:   u32,
    /// Rows kept beyond the bottom edge of the view, so the wrap seam is off screen.
    pub hidden_rows: usize,
    /// Columns kept beyond the right edge of the view.
    pub hidden_cols: usize,
    /// Draw cells born in the latest generation differently from older live cells.
    pub fade_births: bool,
    /// Draw cells that died in the latest generation differently from empty cells.
    pub fade_deaths: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            cell_size:   DEFAULT_CELL_SIZE,
            hidden_rows: DEFAULT_HIDDEN_ROWS,
            hidden_cols: DEFAULT_HIDDEN_COLS,
            fade_births: false,
            fade_deaths: false,
        }
    }
}

/// Decodes from the [timing] section.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct TimingSettings {
    /// Delay between generations.
    pub timestep_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        TimingSettings {
            timestep_ms: DEFAULT_TIMESTEP_MS,
        }
    }
}

impl Settings {
    /// Creates the default configuration with default settings.
    pub fn new() -> Self {
        Default::default()
    }

    /// Checks values that would make the controller misbehave.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.display.cell_size == 0 {
            return Err("display.cell_size must be positive".into());
        }
        if self.timing.timestep_ms == 0 {
            return Err("timing.timestep_ms must be positive".into());
        }
        Ok(())
    }
}

/// Config manages how Settings are loaded from and stored to the filesystem.
pub struct Config {
    settings: Settings, // the actual settings
    path:     String,
    #[cfg(test)]
    pub dummy_file_data: Option<String>,
}

impl Config {
    /// Creates a Config with default settings.
    pub fn new() -> Config {
        Config {
            settings: Settings::new(),
            path: String::from(CONFIG_FILE_PATH),
            #[cfg(test)]
            dummy_file_data: None,
        }
    }

    pub fn set_path(&mut self, path: String) -> &mut Self {
        self.path = path;
        self
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    fn load(&mut self) -> Result<(), Box<dyn Error>> {
        let toml_str;
        #[cfg(not(test))]
        {
            let mut s = String::new();
            let mut f = OpenOptions::new().read(true).open(&self.path)?;
            f.read_to_string(&mut s)?;
            toml_str = s;
        }

        #[cfg(test)]
        {
            toml_str = self.dummy_file_data.clone().unwrap_or_default();
        }

        let settings: Settings = toml::from_str(toml_str.as_str())?;
        settings.validate()?;
        debug!("Loaded settings from {}: {:?}", self.path, settings);
        self.settings = settings;
        Ok(())
    }

    /// Check if file at `self.path` exists. If it exists, settings are read from that path.
    /// Otherwise, the current settings are written to that path. Note: `Config::new()` returns
    /// a `Config` with default settings.
    pub fn load_or_create_default(&mut self) -> Result<(), Box<dyn Error>> {
        let path_exists;
        #[cfg(not(test))]
        {
            path_exists = Path::exists(Path::new(&self.path));
        }

        #[cfg(test)]
        {
            path_exists = self.dummy_file_data.is_some();
        }

        if path_exists {
            self.load()?;
        } else {
            info!("No config at {}; writing defaults", self.path);
            self.force_flush()?;
        };
        Ok(())
    }

    /// Save to file unconditionally, replacing whatever is there.
    pub fn force_flush(&mut self) -> Result<(), Box<dyn Error>> {
        let toml_str = toml::to_string(&self.settings)?;

        #[cfg(not(test))]
        {
            let mut f = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)?;
            f.write_all(toml_str.as_bytes())?;
        }

        #[cfg(test)]
        {
            self.dummy_file_data = Some(toml_str);
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_init_default_settings() {
        let settings = Settings::new();

        assert_eq!(settings.display.cell_size, 32);
        assert_eq!(settings.display.hidden_rows, 4);
        assert_eq!(settings.display.hidden_cols, 4);
        assert_eq!(settings.display.fade_births, false);
        assert_eq!(settings.display.fade_deaths, false);
        assert_eq!(settings.timing.timestep_ms, 500);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let mut config = Config::new();
        config.load_or_create_default().unwrap();

        let written = config.dummy_file_data.clone().unwrap();
        let reread: Settings = toml::from_str(&written).unwrap();
        assert_eq!(reread, Settings::new());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut config = Config::new();
        config.dummy_file_data = Some("[display]\ncell_size = 8\nfade_deaths = true\n".to_owned());
        config.load_or_create_default().unwrap();

        let settings = config.get();
        assert_eq!(settings.display.cell_size, 8);
        assert_eq!(settings.display.fade_deaths, true);
        assert_eq!(settings.display.hidden_rows, DEFAULT_HIDDEN_ROWS);
        assert_eq!(settings.timing.timestep_ms, DEFAULT_TIMESTEP_MS);
    }

    #[test]
    fn test_force_flush_overwrites_existing_file() {
        let mut config = Config::new();
        config.dummy_file_data = Some("[display]\ncell_size = 8\n".to_owned());
        config.load_or_create_default().unwrap();
        config.force_flush().unwrap();
        config.force_flush().unwrap();

        let written = config.dummy_file_data.clone().unwrap();
        let reread: Settings = toml::from_str(&written).unwrap();
        assert_eq!(reread.display.cell_size, 8);
        assert_eq!(&reread, config.get());
    }

    #[test]
    fn test_zero_cell_size_is_rejected() {
        let mut config = Config::new();
        config.dummy_file_data = Some("[display]\ncell_size = 0\n".to_owned());
        assert!(config.load_or_create_default().is_err());
        assert_eq!(config.get(), &Settings::new());
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let mut config = Config::new();
        config.dummy_file_data = Some("[timing]\ntimestep_ms = \"soon\"\n".to_owned());
        assert!(config.load_or_create_default().is_err());
    }
}
