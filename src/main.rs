// Spotter - line-of-sight tracking of ADS-B traffic
// Copyright (C) 2017-2018  Datong Sun (dndx@idndx.com)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

#[macro_use]
extern crate log;
extern crate chrono;
extern crate env_logger;
extern crate serde_json;
#[macro_use]
extern crate serde_derive;
extern crate thiserror;
#[cfg(test)]
extern crate tempfile;

#[macro_use]
mod utils;
mod batch;
mod config;
mod error;
mod geodesy;
mod processor;
mod protocol;
mod sensor;
mod spotter;
mod transport;

use config::Config;
use spotter::Spotter;
use std::env;
use std::process;

fn run_batch(input: Option<String>, output: Option<String>) {
    let (input, output) = match (input, output) {
        (Some(i), Some(o)) => (i, o),
        _ => {
            error!("usage: spotter batch <input> <output>");
            process::exit(2);
        }
    };

    match batch::run(&input, &output) {
        Ok(n) => info!("{} target(s) from {} written to {}", n, input, output),
        Err(e) => {
            error!("batch run over {} failed: {}", input, e);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let first = args.next();

    if first.as_ref().map(String::as_str) == Some("batch") {
        return run_batch(args.next(), args.next());
    }

    let cfg = match first {
        Some(path) => match Config::load(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("unable to load configuration from {}: {}", path, e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    info!("observer at {}, {} ({} m), feed {}",
          cfg.observer.lat,
          cfg.observer.lon,
          cfg.observer.elv,
          cfg.feed);

    let mut s = Spotter::new(cfg.frequency);

    s.link_sensor(Box::new(sensor::sbs::SBS::new(cfg.feed.clone())));

    s.link_processor(Box::new(processor::traffic::Traffic::new(cfg.observer,
                                                                cfg.record_interval(),
                                                                cfg.max_inactive())));

    s.link_protocol(protocol::record::Record::new());
    if cfg.console {
        s.link_protocol(protocol::console::Console::new(cfg.observer));
    }

    s.link_transport(transport::file::AppendFile::new(cfg.record_path.clone()));

    s.run();
}
