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

pub mod sbs;

use self::sbs::SbsReport;
use crate::spotter::handle::Pushable;
use chrono::{DateTime, Local};
use std::time::Instant;

/// A decoded traffic report, stamped when it came off the wire
#[derive(PartialEq, Debug, Clone)]
pub struct TrafficData {
    pub report: SbsReport,
    pub clock: Instant,
    pub time: DateTime<Local>,
}

#[derive(PartialEq, Debug)]
/// Represents data received from the sensor layer
pub enum SensorData {
    Traffic(TrafficData),
}

/// A type for representing a sensor
pub trait Sensor {
    /// Run the provider, may or may not yield any result
    fn run(&mut self, h: &mut dyn Pushable<SensorData>);
}
