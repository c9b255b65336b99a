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

//! Live table of the tracked aircraft on stdout.

use super::*;
use crate::geodesy::{Elevation, Observer};
use crate::processor::aircraft::Target;
use std::fmt::Write as FmtWrite;
use std::io::{self, Write};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const NOT_RECEIVED: &str = "Not yet received";
const NOT_ENOUGH_DATA: &str = "Not enough data";

pub struct Console {
    observer: Observer,
}

impl Console {
    pub fn new(observer: Observer) -> Box<dyn Protocol> {
        Box::new(Console { observer })
    }

    fn render(&self, targets: &[Target]) -> String {
        let mut out = String::from(CLEAR_SCREEN);

        // writing into a String can not fail
        let _ = writeln!(out,
                         "Observer latitude: {}, longitude: {}, height: {} m",
                         self.observer.lat,
                         self.observer.lon,
                         self.observer.elv);
        let _ = writeln!(out, "---------------------------------");

        for t in targets {
            let _ = writeln!(out, "Aircraft ID: {} ({})", t.id, t.flight_id);
            let _ = writeln!(out, "Latitude: {}", or(t.state.lat, NOT_RECEIVED));
            let _ = writeln!(out, "Longitude: {}", or(t.state.lon, NOT_RECEIVED));
            let _ = writeln!(out, "Altitude (m): {}", or(t.state.altitude, NOT_RECEIVED));
            let _ = writeln!(out, "Azimuth: {}", or(t.azimuth, NOT_ENOUGH_DATA));
            let elevation = match t.elevation {
                Some(Elevation::Visible(e)) => e.to_string(),
                Some(Elevation::BelowHorizon) => "Below horizon".to_string(),
                None => NOT_ENOUGH_DATA.to_string(),
            };
            let _ = writeln!(out, "Elevation angle: {}", elevation);
            let _ = writeln!(out, "---");
        }

        out
    }
}

fn or(v: Option<f64>, missing: &str) -> String {
    v.map_or_else(|| missing.to_string(), |v| v.to_string())
}

impl Protocol for Console {
    fn run(&mut self, _handle: &mut dyn Pushable<Payload>, i: ChainedIter) {
        for r in i {
            if let Report::Traffic(ref targets) = *r {
                let stdout = io::stdout();
                let mut lock = stdout.lock();

                if let Err(e) = lock.write_all(self.render(targets).as_bytes()).and_then(|_| lock.flush()) {
                    warn!("unable to write to console: {}", e);
                }
            }
        }
    }
}
