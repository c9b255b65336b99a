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

//! State of a single tracked aircraft.

use crate::geodesy::{self, Elevation, Observer, Position};
use crate::sensor::sbs::SbsReport;
use crate::sensor::TrafficData;
use chrono::{DateTime, Local};
use std::time::Instant;

/// Last known kinematic state. Reports are sparse, so every field keeps
/// its previous value until a report carries a new one.
#[derive(Debug, PartialEq, Copy, Clone, Default)]
pub struct State {
    /// Latitude in deg
    pub lat: Option<f64>,
    /// Longitude in deg
    pub lon: Option<f64>,
    /// Altitude in m
    pub altitude: Option<f64>,
    pub ground_speed: Option<f64>,
    pub vertical_rate: Option<f64>,
    pub on_ground: Option<bool>,
}

impl State {
    /// New state with every field present in `r` taken from it and the
    /// rest retained from `self`
    pub fn merge(&self, r: &SbsReport) -> State {
        State {
            lat: r.lat.or(self.lat),
            lon: r.lon.or(self.lon),
            altitude: r.altitude.map(|a| ft_to_m!(a)).or(self.altitude),
            ground_speed: r.ground_speed.or(self.ground_speed),
            vertical_rate: r.vertical_rate.or(self.vertical_rate),
            on_ground: r.on_ground.or(self.on_ground),
        }
    }

    pub fn position(&self) -> Option<Position> {
        match (self.lat, self.lon, self.altitude) {
            (Some(lat), Some(lon), Some(elv)) => Some(Position { lat, lon, elv }),
            _ => None,
        }
    }
}

/// An update that had full position and line of sight
#[derive(Debug, PartialEq, Clone)]
pub struct HistoryEntry {
    pub report: SbsReport,
    pub clock: Instant,
    pub time: DateTime<Local>,
}

/// A sighting worth keeping on disk
#[derive(Debug, PartialEq, Clone)]
pub struct Sighting {
    pub time: DateTime<Local>,
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    /// Altitude in m
    pub altitude: f64,
    pub azimuth: f64,
    pub elevation: f64,
}

/// Display snapshot of an aircraft
#[derive(Debug, PartialEq, Clone)]
pub struct Target {
    pub id: String,
    pub flight_id: String,
    pub state: State,
    pub azimuth: Option<f64>,
    pub elevation: Option<Elevation>,
}

#[derive(Debug, Clone)]
pub struct Aircraft {
    pub id: String,
    /// Only taken from the first report
    pub flight_id: String,
    pub state: State,
    pub azimuth: Option<f64>,
    pub elevation: Option<Elevation>,
    /// Time of the last qualifying update, creation time before that
    pub last_update: Instant,
    /// When this aircraft last produced a [`Sighting`]
    pub last_recorded: Option<Instant>,
    pub history: Vec<HistoryEntry>,
}

impl Aircraft {
    pub fn new(t: &TrafficData, observer: &Observer) -> Self {
        let mut ac = Aircraft {
            id: t.report.aircraft_id.clone(),
            flight_id: t.report.flight_id.clone(),
            state: State::default(),
            azimuth: None,
            elevation: None,
            last_update: t.clock,
            last_recorded: None,
            history: vec![],
        };

        ac.update(t, observer);
        ac
    }

    /// Merges `t` into the current state. Line of sight is only
    /// recomputed when `t` itself carries latitude, longitude and
    /// altitude. Returns whether the update qualified for the history.
    pub fn update(&mut self, t: &TrafficData, observer: &Observer) -> bool {
        self.state = self.state.merge(&t.report);

        if t.report.has_position() {
            if let Some(p) = self.state.position() {
                let sight = geodesy::line_of_sight(observer, &p);
                trace!("{}: {:?}", self.id, sight);

                // degenerate geometry leaves the previous value alone
                if let Some(az) = sight.azimuth {
                    self.azimuth = Some(az);
                }

                if let Some(el) = sight.elevation {
                    self.elevation = Some(el);
                }
            }
        }

        if !self.is_sighted() {
            return false;
        }

        self.last_update = t.clock;
        self.history.push(HistoryEntry {
            report: t.report.clone(),
            clock: t.clock,
            time: t.time,
        });

        true
    }

    /// Position known and the aircraft is above the horizon
    pub fn is_sighted(&self) -> bool {
        self.state.position().is_some() && self.azimuth.is_some() &&
        self.elevation.map_or(false, |e| e.is_visible())
    }

    pub fn sighting(&self, time: DateTime<Local>) -> Option<Sighting> {
        let p = self.state.position()?;
        let azimuth = self.azimuth?;

        match self.elevation {
            Some(Elevation::Visible(elevation)) => Some(Sighting {
                time,
                id: self.id.clone(),
                lat: p.lat,
                lon: p.lon,
                altitude: p.elv,
                azimuth,
                elevation,
            }),
            _ => None,
        }
    }

    pub fn target(&self) -> Target {
        Target {
            id: self.id.clone(),
            flight_id: self.flight_id.clone(),
            state: self.state,
            azimuth: self.azimuth,
            elevation: self.elevation,
        }
    }
}
