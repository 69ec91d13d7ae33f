/*
 * A terminal front end for toruslife.
 *
 * Copyright (C) 2018-2019 The Conwayste Developers
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of  MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along with
 * this program.  If not, see <http://www.gnu.org/licenses/>.
 */
extern crate chrono;
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate rand;
extern crate toruslife;

use std::io::Write;
use std::process::exit;
use std::str::FromStr;
use std::{thread, time};

use crate::chrono::Local;
use crate::clap::{App, Arg, ArgMatches};
use crate::log::LevelFilter;
use crate::rand::rngs::StdRng;
use crate::rand::SeedableRng;

use toruslife::config::{Config, CONFIG_FILE_PATH};
use toruslife::Controller;

const DEFAULT_COLS: usize = 64;
const DEFAULT_ROWS: usize = 24;

/// Parses an optional numeric argument, exiting on garbage.
fn parse_arg<T: FromStr>(matches: &ArgMatches, name: &str) -> Option<T>
where
    T::Err: std::fmt::Debug,
{
    matches.value_of(name).map(|s| {
        s.parse::<T>().unwrap_or_else(|e| {
            error!("Error while attempting to parse {:?} as {}: {:?}", s, name, e);
            exit(1);
        })
    })
}

fn main() {
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:5}] - {}",
                Local::now().format("%a %Y-%m-%d %H:%M:%S%.6f"),
                record.level(),
                record.args(),
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = App::new("life-term")
        .about("toroidal Game of Life in the terminal")
        .arg(Arg::with_name("cols")
             .short("c")
             .long("cols")
             .help(&format!("number of columns [default {}]", DEFAULT_COLS))
             .takes_value(true))
        .arg(Arg::with_name("rows")
             .short("r")
             .long("rows")
             .help(&format!("number of rows [default {}]", DEFAULT_ROWS))
             .takes_value(true))
        .arg(Arg::with_name("generations")
             .short("g")
             .long("generations")
             .help("stop after this many generations [default: run forever]")
             .takes_value(true))
        .arg(Arg::with_name("seed")
             .short("s")
             .long("seed")
             .help("seed for the random starting population")
             .takes_value(true))
        .arg(Arg::with_name("config")
             .long("config")
             .help(&format!("path to settings file [default {}]", CONFIG_FILE_PATH))
             .takes_value(true))
        .get_matches();

    let cols = parse_arg::<usize>(&matches, "cols").unwrap_or(DEFAULT_COLS);
    let rows = parse_arg::<usize>(&matches, "rows").unwrap_or(DEFAULT_ROWS);
    let generations = parse_arg::<usize>(&matches, "generations");
    let rng = match parse_arg::<u64>(&matches, "seed") {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut config = Config::new();
    if let Some(path) = matches.value_of("config") {
        config.set_path(path.to_owned());
    }
    if let Err(e) = config.load_or_create_default() {
        error!("Error while loading settings from {}: {}", config.path(), e);
        exit(1);
    }
    let settings = config.get().clone();
    let step_time = time::Duration::from_millis(settings.timing.timestep_ms);

    let mut controller = Controller::new(settings, cols, rows, rng).unwrap_or_else(|e| {
        error!("Error while creating universe: {}", e);
        exit(1);
    });
    info!("Running {}x{} universe", cols, rows);

    loop {
        let uni = controller.universe();
        println!("\x1b[H\x1b[2J{}", uni);
        println!("Gen: {}  Population: {}", uni.latest_gen(), uni.population());
        if let Some(limit) = generations {
            if uni.latest_gen() >= limit {
                break;
            }
        }
        controller.tick();
        thread::sleep(step_time);
    }
}
