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

//! Runtime configuration, read from an optional JSON file.

use crate::error::{Error, Result};
use crate::geodesy::Observer;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_FEED: &str = "127.0.0.1:30003";
const DEFAULT_RECORD_PATH: &str = "sightings.log";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Position of the ground station
    pub observer: Observer,
    /// Address of the SBS feed, `host:port`
    pub feed: String,
    /// Minimum time between two recorded sightings of one aircraft, in ms
    pub record_interval_ms: u64,
    /// Aircraft not refreshed for this long are dropped, in ms
    pub max_inactive_ms: u64,
    /// Sightings are appended to this file
    pub record_path: PathBuf,
    /// Main loop frequency in Hz
    pub frequency: u16,
    /// Render the live table on stdout
    pub console: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            observer: Observer {
                lat: 45.8007017,
                lon: 15.9712165,
                elv: 130_f64,
            },
            feed: DEFAULT_FEED.to_string(),
            record_interval_ms: 3000,
            max_inactive_ms: 3000,
            record_path: PathBuf::from(DEFAULT_RECORD_PATH),
            frequency: 10,
            console: true,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let cfg: Config = serde_json::from_reader(BufReader::new(file))?;

        cfg.validate()?;

        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let o = &self.observer;

        if !o.is_valid() {
            return Err(Error::InvalidObserver(format!("{}, {}", o.lat, o.lon)));
        }

        if self.frequency == 0 {
            return Err(Error::InvalidConfig("frequency must be at least 1 Hz".to_string()));
        }

        Ok(())
    }

    pub fn record_interval(&self) -> Duration {
        Duration::from_millis(self.record_interval_ms)
    }

    pub fn max_inactive(&self) -> Duration {
        Duration::from_millis(self.max_inactive_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();

        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.record_interval(), Duration::from_millis(3000));
        assert_eq!(cfg.max_inactive(), Duration::from_millis(3000));
        assert_eq!(cfg.feed, "127.0.0.1:30003");
    }

    #[test]
    fn test_load_partial_file() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{ "observer": {{ "lat": 50.0, "lon": 8.5, "elv": 100.0 }}, "record_interval_ms": 10000 }}"#
        ).unwrap();

        let cfg = Config::load(f.path()).unwrap();

        assert_eq!(cfg.observer.lat, 50_f64);
        assert_eq!(cfg.observer.lon, 8.5_f64);
        assert_eq!(cfg.record_interval_ms, 10000);
        // untouched keys keep their defaults
        assert_eq!(cfg.max_inactive_ms, 3000);
        assert_eq!(cfg.frequency, 10);
    }

    #[test]
    fn test_reject_bad_observer() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"{{ "observer": {{ "lat": 91.0, "lon": 0.0, "elv": 0.0 }} }}"#).unwrap();

        match Config::load(f.path()) {
            Err(Error::InvalidObserver(_)) => {}
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn test_reject_zero_frequency() {
        let cfg = Config {
            frequency: 0,
            ..Config::default()
        };

        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_reject_malformed_json() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{{ not json").unwrap();

        match Config::load(f.path()) {
            Err(Error::Json(_)) => {}
            r => panic!("unexpected result: {:?}", r),
        }
    }
}
