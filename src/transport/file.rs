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

//! Appends payloads to a file. The file is never truncated or rewritten.

use super::*;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

pub struct AppendFile {
    path: PathBuf,
}

impl AppendFile {
    pub fn new(path: PathBuf) -> Box<dyn Transport> {
        Box::new(AppendFile { path })
    }

    fn append(&self, i: ChainedIter) -> io::Result<usize> {
        let buffer: Vec<u8> = i.flat_map(|p| p.payload.iter().cloned()).collect();

        if buffer.is_empty() {
            return Ok(0);
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(&buffer)?;
        file.flush()?;

        Ok(buffer.len())
    }
}

impl Transport for AppendFile {
    fn run(&mut self, _handle: &dyn Handle, i: ChainedIter) {
        match self.append(i) {
            Ok(0) => {}
            Ok(n) => trace!("appended {} bytes to {}", n, self.path.display()),
            // losing a line is fine, tracking goes on
            Err(e) => error!("unable to append to {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotter::handle::TickHandle;
    use std::fs;
    use tempfile::tempdir;

    fn payloads(lines: &[&str]) -> Vec<Payload> {
        lines.iter().map(|l| Payload { payload: l.as_bytes().to_vec() }).collect()
    }

    #[test]
    fn test_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sightings.log");
        let mut t = AppendFile::new(path.clone());
        let h = TickHandle::new(10);
        let none = vec![];

        let first = payloads(&["a\n", "b\n"]);
        t.run(&h, first.iter().chain(none.iter()));

        let second = payloads(&["c\n"]);
        t.run(&h, second.iter().chain(none.iter()));

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn test_nothing_to_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sightings.log");
        let mut t = AppendFile::new(path.clone());
        let none: Vec<Payload> = vec![];

        t.run(&TickHandle::new(10), none.iter().chain(none.iter()));

        assert!(!path.exists());
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("sightings.log");
        let t = AppendFile { path };
        let lines = payloads(&["a\n"]);
        let none = vec![];

        assert!(t.append(lines.iter().chain(none.iter())).is_err());

        let mut t = AppendFile::new(dir.path().join("missing").join("sightings.log"));
        t.run(&TickHandle::new(10), lines.iter().chain(none.iter()));
    }
}
