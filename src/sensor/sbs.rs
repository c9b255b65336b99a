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

//! Client for the SBS-1 (BaseStation) text feed served by dump1090,
//! usually on port 30003.
//!
//! Every line is a comma separated record of fixed arity. Lines are
//! decoded into [`SbsReport`] right here, nothing past this module looks
//! at raw fields.

use super::*;
use crate::error::{Error, Result};
use crate::spotter::handle::Pushable;
use chrono::Local;
use std::io::{BufRead, BufReader};
use std::net::TcpStream;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{sleep, spawn, JoinHandle};
use std::time::{Duration, Instant};

const FIELD_COUNT: usize = 22;
const AIRCRAFT_ID: usize = 4;
const FLIGHT_ID: usize = 5;
const ALTITUDE: usize = 11;
const GROUND_SPEED: usize = 13;
const LATITUDE: usize = 14;
const LONGITUDE: usize = 15;
const VERTICAL_RATE: usize = 16;
const ON_GROUND: usize = 20;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// One decoded feed line. `None` means the field was empty in this
/// message, which is the common case: most messages only carry a few
/// of them.
#[derive(Debug, PartialEq, Clone)]
pub struct SbsReport {
    pub aircraft_id: String,
    pub flight_id: String,
    /// Altitude in ft
    pub altitude: Option<f64>,
    pub ground_speed: Option<f64>,
    pub vertical_rate: Option<f64>,
    /// Latitude in deg
    pub lat: Option<f64>,
    /// Longitude in deg
    pub lon: Option<f64>,
    pub on_ground: Option<bool>,
}

impl SbsReport {
    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(',').collect();

        if fields.len() != FIELD_COUNT {
            return Err(Error::FieldCount {
                expected: FIELD_COUNT,
                got: fields.len(),
            });
        }

        let aircraft_id = fields[AIRCRAFT_ID].trim();
        if aircraft_id.is_empty() {
            return Err(Error::MissingField("aircraft id"));
        }

        let lat = parse_number(fields[LATITUDE], "latitude")?;
        if let Some(l) = lat {
            if !(-90_f64..=90_f64).contains(&l) {
                return Err(invalid("latitude", fields[LATITUDE]));
            }
        }

        let lon = parse_number(fields[LONGITUDE], "longitude")?;
        if let Some(l) = lon {
            if !(-180_f64..=180_f64).contains(&l) {
                return Err(invalid("longitude", fields[LONGITUDE]));
            }
        }

        Ok(SbsReport {
            aircraft_id: aircraft_id.to_string(),
            flight_id: fields[FLIGHT_ID].trim().to_string(),
            altitude: parse_number(fields[ALTITUDE], "altitude")?,
            ground_speed: parse_number(fields[GROUND_SPEED], "ground speed")?,
            vertical_rate: parse_number(fields[VERTICAL_RATE], "vertical rate")?,
            lat,
            lon,
            on_ground: parse_flag(fields[ON_GROUND], "on ground flag")?,
        })
    }

    /// Whether this message alone carries a full 3D position
    pub fn has_position(&self) -> bool {
        self.lat.is_some() && self.lon.is_some() && self.altitude.is_some()
    }
}

fn invalid(field: &'static str, value: &str) -> Error {
    Error::InvalidField {
        field,
        value: value.to_string(),
    }
}

fn parse_number(s: &str, field: &'static str) -> Result<Option<f64>> {
    let s = s.trim();

    if s.is_empty() {
        return Ok(None);
    }

    match s.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(invalid(field, s)),
    }
}

// dump1090 writes -1 for a set flag, other sources use 1
fn parse_flag(s: &str, field: &'static str) -> Result<Option<bool>> {
    match s.trim() {
        "" => Ok(None),
        "0" => Ok(Some(false)),
        "1" | "-1" => Ok(Some(true)),
        other => Err(invalid(field, other)),
    }
}

/// Decodes lines from `reader` and forwards them to `tx` until the
/// stream ends. Returns `false` once nobody is listening on `tx` anymore.
fn read_feed<R: BufRead>(reader: R, tx: &Sender<TrafficData>) -> Result<bool> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');

        if line.is_empty() {
            continue;
        }

        match SbsReport::parse(line) {
            Ok(report) => {
                let data = TrafficData {
                    report,
                    clock: Instant::now(),
                    time: Local::now(),
                };

                if tx.send(data).is_err() {
                    return Ok(false);
                }
            }
            Err(e) => debug!("dropping SBS line {:?}: {}", line, e),
        }
    }

    Ok(true)
}

pub struct SBS {
    _handle: JoinHandle<()>,
    rx: Receiver<TrafficData>,
}

impl SBS {
    pub fn new(addr: String) -> Self {
        let (tx, rx) = channel();

        // this thread owns the connection and reconnects whenever it drops
        let handle = spawn(move || loop {
            match TcpStream::connect(&addr) {
                Ok(stream) => {
                    info!("connected to SBS feed at {}", addr);

                    match read_feed(BufReader::new(stream), &tx) {
                        Ok(true) => info!("SBS feed closed by server"),
                        Ok(false) => return,
                        Err(e) => warn!("SBS feed read error: {}", e),
                    }
                }
                Err(e) => warn!("unable to connect to SBS feed at {}: {}", addr, e),
            }

            sleep(RECONNECT_DELAY);
        });

        SBS {
            _handle: handle,
            rx,
        }
    }
}

impl Sensor for SBS {
    fn run(&mut self, h: &mut dyn Pushable<SensorData>) {
        let mut acc = 0_usize;

        for t in self.rx.try_iter() {
            h.push(SensorData::Traffic(t));
            acc += 1;
        }

        if acc > 0 {
            debug!("SBS feed delivered {} reports", acc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const POSITION: &str =
        "MSG,3,1,1,4CA2D6,1,2023/06/01,10:00:00.000,2023/06/01,10:00:00.000,,10000,,,45.9,16.0,,,0,0,0,0";
    const VELOCITY: &str =
        "MSG,4,1,1,4CA2D6,1,2023/06/01,10:00:00.500,2023/06/01,10:00:00.500,,,,420,,,-1536,,,,,0";
    const IDENT: &str =
        "MSG,1,1,1,4CA2D6,1,2023/06/01,10:00:01.000,2023/06/01,10:00:01.000,RYR5UZ  ,,,,,,,,,,,0";

    #[test]
    fn test_parse_position() {
        let r = SbsReport::parse(POSITION).unwrap();

        assert_eq!(r.aircraft_id, "4CA2D6");
        assert_eq!(r.flight_id, "1");
        assert_eq!(r.altitude, Some(10000_f64));
        assert_eq!(r.lat, Some(45.9));
        assert_eq!(r.lon, Some(16_f64));
        assert_eq!(r.ground_speed, None);
        assert_eq!(r.vertical_rate, None);
        assert_eq!(r.on_ground, Some(false));
        assert!(r.has_position());
    }

    #[test]
    fn test_parse_velocity() {
        let r = SbsReport::parse(VELOCITY).unwrap();

        assert_eq!(r.ground_speed, Some(420_f64));
        // vertical rate has its own field, never the longitude
        assert_eq!(r.vertical_rate, Some(-1536_f64));
        assert_eq!(r.lon, None);
        assert_eq!(r.on_ground, None);
        assert!(!r.has_position());
    }

    #[test]
    fn test_parse_ident() {
        let r = SbsReport::parse(IDENT).unwrap();

        assert_eq!(r.altitude, None);
        assert_eq!(r.lat, None);
        assert_eq!(r.lon, None);
        assert!(!r.has_position());
    }

    #[test]
    fn test_parse_dump1090_flag() {
        let line = POSITION.replacen(",0,0,0,0", ",0,0,-1,0", 1);
        let r = SbsReport::parse(&line).unwrap();

        assert_eq!(r.on_ground, Some(true));
    }

    #[test]
    fn test_reject_wrong_arity() {
        match SbsReport::parse("STA,,5,179,400AE7,10103,2008/11/28,14:58:51.153,2008/11/28,14:58:51.153,RM") {
            Err(Error::FieldCount { expected: 22, got: 11 }) => {}
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn test_reject_missing_id() {
        let line = POSITION.replacen("4CA2D6", "", 1);

        match SbsReport::parse(&line) {
            Err(Error::MissingField(_)) => {}
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn test_reject_garbage() {
        let line = POSITION.replacen("10000", "FL100", 1);
        assert!(SbsReport::parse(&line).is_err());

        let line = POSITION.replacen("45.9", "95.1", 1);
        match SbsReport::parse(&line) {
            Err(Error::InvalidField { field: "latitude", .. }) => {}
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn test_read_feed() {
        let input = format!("{}\r\n\r\nnot a record\r\n{}\r\n{}\n", POSITION, VELOCITY, IDENT);
        let (tx, rx) = channel();

        assert!(read_feed(Cursor::new(input), &tx).unwrap());

        let got: Vec<SbsReport> = rx.try_iter().map(|t| t.report).collect();
        assert_eq!(got.len(), 3);
        assert!(got[0].has_position());
        assert_eq!(got[1].ground_speed, Some(420_f64));
        assert_eq!(got[2].lat, None);
    }

    #[test]
    fn test_read_feed_listener_gone() {
        let (tx, rx) = channel();
        drop(rx);

        assert!(!read_feed(Cursor::new(format!("{}\n", POSITION)), &tx).unwrap());
    }
}
