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

//! Fixed-frequency runtime. Every tick moves data one layer down:
//! sensors, processors, protocols, transports.

pub mod handle;

use self::handle::{QueueHandle, TickHandle};
use crate::processor::{Processor, Report};
use crate::protocol::{Payload, Protocol};
use crate::sensor::{Sensor, SensorData};
use crate::transport::Transport;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::thread::sleep;
use std::time::{Duration, Instant};

fn log_queue<T: Debug>(layer: &str, q: &VecDeque<T>) {
    if q.is_empty() {
        return;
    }

    debug!("{} message(s) for the {} layer", q.len(), layer);
    trace!("{:?}", q);
}

pub struct Spotter {
    sensors: Vec<Box<dyn Sensor>>,
    processors: Vec<Box<dyn Processor>>,
    protocols: Vec<Box<dyn Protocol>>,
    transports: Vec<Box<dyn Transport>>,
    interval: Duration,
    sensor_queue: VecDeque<SensorData>,
    report_queue: VecDeque<Report>,
    payload_queue: VecDeque<Payload>,
    handle: TickHandle,
    overruns: u64,
}

impl Spotter {
    pub fn new(freq: u16) -> Self {
        Spotter {
            sensors: vec![],
            processors: vec![],
            protocols: vec![],
            transports: vec![],
            sensor_queue: VecDeque::new(),
            report_queue: VecDeque::new(),
            payload_queue: VecDeque::new(),
            interval: Duration::from_secs(1) / u32::from(freq.max(1)),
            handle: TickHandle::new(freq.max(1)),
            overruns: 0,
        }
    }

    pub fn link_sensor(&mut self, s: Box<dyn Sensor>) {
        self.sensors.push(s);
    }

    pub fn link_processor(&mut self, p: Box<dyn Processor>) {
        self.processors.push(p);
    }

    pub fn link_protocol(&mut self, p: Box<dyn Protocol>) {
        self.protocols.push(p);
    }

    pub fn link_transport(&mut self, t: Box<dyn Transport>) {
        self.transports.push(t);
    }

    fn run_sensors(&mut self) {
        let mut handle = QueueHandle::new(&self.handle, &mut self.sensor_queue);

        for s in self.sensors.iter_mut() {
            s.run(&mut handle);
        }
    }

    fn run_processors(&mut self) {
        log_queue("processor", &self.sensor_queue);

        let mut handle = QueueHandle::new(&self.handle, &mut self.report_queue);
        let (first, second) = self.sensor_queue.as_slices();

        for p in self.processors.iter_mut() {
            p.run(&mut handle, first.iter().chain(second));
        }

        self.sensor_queue.clear();
    }

    fn run_protocols(&mut self) {
        log_queue("protocol", &self.report_queue);

        let mut handle = QueueHandle::new(&self.handle, &mut self.payload_queue);
        let (first, second) = self.report_queue.as_slices();

        for p in self.protocols.iter_mut() {
            p.run(&mut handle, first.iter().chain(second));
        }

        self.report_queue.clear();
    }

    fn run_transports(&mut self) {
        log_queue("transport", &self.payload_queue);

        let (first, second) = self.payload_queue.as_slices();

        for t in self.transports.iter_mut() {
            t.run(&self.handle, first.iter().chain(second));
        }

        self.payload_queue.clear();
    }

    /// One pass through every layer
    pub fn tick(&mut self) {
        self.handle.advance();

        self.run_sensors();
        self.run_processors();
        self.run_protocols();
        self.run_transports();
    }

    pub fn run(&mut self) {
        info!("running at {} ms per tick", self.interval.as_millis());

        loop {
            let before = Instant::now();

            self.tick();

            match self.interval.checked_sub(before.elapsed()) {
                Some(rest) => sleep(rest),
                None => {
                    self.overruns += 1;
                    warn!("tick overran its {} ms slot ({} so far)",
                          self.interval.as_millis(),
                          self.overruns);
                }
            }
        }
    }
}

impl Default for Spotter {
    fn default() -> Spotter {
        Spotter::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::aircraft::tests::{at, position, ZAGREB};
    use crate::processor::traffic::Traffic;
    use crate::protocol::record::Record;
    use crate::sensor::TrafficData;
    use crate::spotter::handle::Pushable;
    use crate::transport::file::AppendFile;
    use std::fs;
    use tempfile::tempdir;

    struct Replay {
        reports: VecDeque<TrafficData>,
    }

    impl Sensor for Replay {
        fn run(&mut self, h: &mut dyn Pushable<SensorData>) {
            while let Some(t) = self.reports.pop_front() {
                h.push(SensorData::Traffic(t));
            }
        }
    }

    #[test]
    fn test_tick_interval() {
        assert_eq!(Spotter::new(4).interval, Duration::from_millis(250));
        assert_eq!(Spotter::default().interval, Duration::from_millis(100));
        // a zero frequency would never tick
        assert_eq!(Spotter::new(0).interval, Duration::from_secs(1));
    }

    #[test]
    fn test_tick_records_sighting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sightings.log");
        let start = Instant::now();

        let mut reports = VecDeque::new();
        reports.push_back(at(position("4CA2D6", 45.9, 16_f64, 10000_f64), start));
        reports.push_back(at(position("4CA2D6", 45.91, 16.01, 10100_f64),
                             start + Duration::from_micros(12500)));

        let mut s = Spotter::new(10);
        s.link_sensor(Box::new(Replay { reports }));
        s.link_processor(Box::new(Traffic::new(ZAGREB,
                                               Duration::from_millis(3000),
                                               Duration::from_millis(3000))));
        s.link_protocol(Record::new());
        s.link_transport(AppendFile::new(path.clone()));

        s.tick();
        s.tick();

        let log = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = log.lines().collect();

        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(": 4CA2D6, 45.91, 16.01, "));
    }
}
