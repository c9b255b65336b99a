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

//! Text lines for the sightings log.
//!
//! `<local time>: <id>, <lat>, <lon>, <altitude m>, <azimuth>, <elevation>`

use super::*;
use crate::processor::aircraft::Sighting;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub struct Record;

impl Record {
    pub fn new() -> Box<dyn Protocol> {
        Box::new(Record {})
    }
}

pub fn format_sighting(s: &Sighting) -> String {
    format!("{}: {}, {}, {}, {}, {}, {}\n",
            s.time.format(TIME_FORMAT),
            s.id,
            s.lat,
            s.lon,
            s.altitude,
            s.azimuth,
            s.elevation)
}

impl Protocol for Record {
    fn run(&mut self, handle: &mut dyn Pushable<Payload>, i: ChainedIter) {
        for r in i {
            if let Report::Sighting(ref s) = *r {
                handle.push(Payload { payload: format_sighting(s).into_bytes() });
            }
        }
    }
}
