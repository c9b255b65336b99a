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

//! Offline calculator. Reads an observer and a list of targets from a
//! text file and writes one azimuth/elevation line per target.
//!
//! Every row holds three whitespace separated numbers: latitude and
//! longitude in deg, height in m. The first row is the observer.

use crate::error::{Error, Result};
use crate::geodesy::{self, Elevation, Position};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

const INVALID_OBSERVER: &str = "Observer input is not valid";
const INVALID_TARGET: &str = "Airplane input is not valid";

fn parse_rows(input: &str) -> Result<Vec<Position>> {
    let mut values = Vec::new();

    for tok in input.split_whitespace() {
        let v = tok.parse::<f64>().map_err(|_| Error::InvalidField {
            field: "coordinate",
            value: tok.to_string(),
        })?;
        values.push(v);
    }

    if values.len() % 3 != 0 {
        warn!("ignoring {} trailing value(s) of an incomplete row", values.len() % 3);
    }

    Ok(values
        .chunks_exact(3)
        .map(|r| Position {
            lat: r[0],
            lon: r[1],
            elv: r[2],
        })
        .collect())
}

fn format_angle(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{}", v),
        None => "n/a".to_string(),
    }
}

/// Runs the calculator over `input`, writing results to `output`.
/// Returns the number of targets computed.
pub fn calculate<W: Write>(input: &str, output: &mut W) -> Result<usize> {
    let rows = parse_rows(input)?;
    let (observer, targets) = match rows.split_first() {
        Some((o, t)) => (o, t),
        None => return Err(Error::MissingField("observer")),
    };

    info!("observer at {}, {} ({} m)", observer.lat, observer.lon, observer.elv);

    if !observer.is_valid() {
        writeln!(output, "{}", INVALID_OBSERVER)?;
        return Err(Error::InvalidObserver(format!("{}, {}", observer.lat, observer.lon)));
    }

    let mut computed = 0;

    for t in targets {
        if !t.is_valid() {
            warn!("skipping target {}, {}: out of range", t.lat, t.lon);
            writeln!(output, "{}", INVALID_TARGET)?;
            continue;
        }

        let sight = geodesy::line_of_sight(observer, t);
        debug!("target {}, {} ({} m): {:?}", t.lat, t.lon, t.elv, sight);

        writeln!(output,
                 "Azimuth: {}, Elevation angle: {}",
                 format_angle(sight.azimuth),
                 format_angle(sight.elevation.as_ref().map(Elevation::degrees)))?;
        computed += 1;
    }

    Ok(computed)
}

/// Reads `input`, creates (or truncates) `output` and runs the calculator.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<usize> {
    let text = fs::read_to_string(input)?;
    let mut out = BufWriter::new(File::create(output)?);

    let res = calculate(&text, &mut out);
    out.flush()?;

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn input_file(text: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(text.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_batch_run() {
        let input = input_file("45.8007017 15.9712165 130\n\
                                45.9 15.9712165 10000\n\
                                45.8007017 16.1 3000\n");
        let dir = tempdir().unwrap();
        let out = dir.path().join("output.txt");

        assert_eq!(run(input.path(), &out).unwrap(), 2);

        let text = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        for l in &lines {
            assert!(l.starts_with("Azimuth: "));
            assert!(l.contains(", Elevation angle: "));
        }

        // first target is due north, the second one due east
        let az = |l: &str| -> f64 {
            l["Azimuth: ".len()..l.find(',').unwrap()].parse().unwrap()
        };
        let north = az(lines[0]);
        assert!(north < 0.1 || north > 359.9);
        assert!((az(lines[1]) - 90_f64).abs() < 0.5);
    }

    #[test]
    fn test_batch_invalid_observer() {
        let input = input_file("95 15 130\n45.9 15.9 10000\n");
        let dir = tempdir().unwrap();
        let out = dir.path().join("output.txt");

        match run(input.path(), &out) {
            Err(Error::InvalidObserver(_)) => {}
            r => panic!("unexpected result: {:?}", r),
        }

        assert_eq!(fs::read_to_string(&out).unwrap(), "Observer input is not valid\n");
    }

    #[test]
    fn test_batch_skips_invalid_target() {
        let input = input_file("45.8007017 15.9712165 130\n\
                                45.9 200 10000\n\
                                45.9 15.9712165 10000\n");
        let dir = tempdir().unwrap();
        let out = dir.path().join("output.txt");

        assert_eq!(run(input.path(), &out).unwrap(), 1);

        let text = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Airplane input is not valid");
        assert!(lines[1].starts_with("Azimuth: "));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_batch_below_horizon_and_overhead() {
        let mut out = Vec::new();
        calculate("45.8007017 15.9712165 130\n48 16 0\n", &mut out).unwrap();
        calculate("0 0 0\n0 0 10000\n", &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with("Elevation angle: -1"));
        assert!(lines[1].starts_with("Azimuth: n/a, "));
    }

    #[test]
    fn test_batch_malformed_input() {
        let mut out = Vec::new();

        match calculate("", &mut out) {
            Err(Error::MissingField("observer")) => {}
            r => panic!("unexpected result: {:?}", r),
        }

        match calculate("45.8 15.9 abc", &mut out) {
            Err(Error::InvalidField { field: "coordinate", .. }) => {}
            r => panic!("unexpected result: {:?}", r),
        }
    }
}
