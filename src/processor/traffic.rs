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

//! Maintains the traffic situation around the observer.

use super::*;
use super::aircraft::{Aircraft, Sighting, Target};
use crate::geodesy::Observer;
use crate::sensor::TrafficData;
use std::collections::HashMap;
use std::time::{Duration, Instant};

const REPORT_FREQ: u16 = 1;

pub struct Traffic {
    observer: Observer,
    /// Minimum time between two sightings recorded for one aircraft
    record_interval: Duration,
    max_inactive: Duration,
    situation: HashMap<String, Aircraft>,
    report_counter: u32,
}

impl Traffic {
    pub fn new(observer: Observer, record_interval: Duration, max_inactive: Duration) -> Self {
        Self {
            observer,
            record_interval,
            max_inactive,
            situation: HashMap::with_capacity(100),
            report_counter: 0,
        }
    }

    /// Routes `t` to its aircraft, creating it if needed. Returns a
    /// sighting when a known aircraft had a qualifying update and none
    /// was recorded for it within the record interval.
    pub fn update_or_add(&mut self, t: &TrafficData) -> Option<Sighting> {
        let id = &t.report.aircraft_id;

        if let Some(ac) = self.situation.get_mut(id) {
            if !ac.update(t, &self.observer) {
                return None;
            }

            if let Some(last) = ac.last_recorded {
                if t.clock.saturating_duration_since(last) <= self.record_interval {
                    return None;
                }
            }

            let sighting = ac.sighting(t.time)?;
            ac.last_recorded = Some(t.clock);

            Some(sighting)
        } else {
            info!("new aircraft {}", id);

            self.situation.insert(id.clone(), Aircraft::new(t, &self.observer));

            None
        }
    }

    /// Drops every aircraft without a qualifying update for longer than
    /// the inactivity limit
    pub fn remove_inactive(&mut self, now: Instant) {
        let max_inactive = self.max_inactive;

        self.situation.retain(|id, ac| {
            if now.saturating_duration_since(ac.last_update) > max_inactive {
                info!("aircraft {} inactive, dropping", id);
                false
            } else {
                true
            }
        });
    }

    pub fn get(&self, id: &str) -> Option<&Aircraft> {
        self.situation.get(id)
    }

    pub fn len(&self) -> usize {
        self.situation.len()
    }

    pub fn targets(&self) -> Vec<Target> {
        let mut targets: Vec<Target> = self.situation.values().map(|ac| ac.target()).collect();
        targets.sort_by(|a, b| a.id.cmp(&b.id));

        targets
    }
}

impl Processor for Traffic {
    fn run(&mut self, handle: &mut dyn Pushable<Report>, i: ChainedIter) {
        for e in i {
            match *e {
                SensorData::Traffic(ref t) => {
                    if let Some(s) = self.update_or_add(t) {
                        debug!("recording sighting of {}", s.id);
                        handle.push(Report::Sighting(s));
                    }

                    self.remove_inactive(t.clock);
                }
            }
        }

        // catches aircraft going silent while nothing else is coming in
        self.remove_inactive(handle.clock());

        run_every!(REPORT_FREQ, self.report_counter, handle, {
            trace!("{} aircraft tracked", self.len());
            handle.push(Report::Traffic(self.targets()));
        });
    }
}
