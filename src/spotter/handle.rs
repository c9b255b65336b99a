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

//! What every layer sees of the runtime during one tick.

use std::collections::VecDeque;
use std::time::Instant;

pub trait Handle {
    /// Monotonic instant the current tick started at
    fn clock(&self) -> Instant;
    /// Ticks per second of the main loop
    fn frequency(&self) -> u16;
}

/// A handle that also accepts output for the next layer
pub trait Pushable<D>: Handle {
    fn push(&mut self, d: D);
}

pub struct TickHandle {
    clock: Instant,
    freq: u16,
}

impl Handle for TickHandle {
    fn clock(&self) -> Instant {
        self.clock
    }

    fn frequency(&self) -> u16 {
        self.freq
    }
}

impl TickHandle {
    pub fn new(freq: u16) -> Self {
        Self {
            clock: Instant::now(),
            freq,
        }
    }

    /// Start a new tick
    pub fn advance(&mut self) {
        self.clock = Instant::now();
    }
}

pub struct QueueHandle<'a, H, D>
    where D: 'a,
          H: 'a + Handle
{
    handle: &'a H,
    queue: &'a mut VecDeque<D>,
}

impl<'a, H, D> Handle for QueueHandle<'a, H, D>
    where H: 'a + Handle
{
    fn clock(&self) -> Instant {
        self.handle.clock()
    }

    fn frequency(&self) -> u16 {
        self.handle.frequency()
    }
}

impl<'a, H, D> Pushable<D> for QueueHandle<'a, H, D>
    where H: 'a + Handle
{
    fn push(&mut self, d: D) {
        self.queue.push_back(d);
    }
}

impl<'a, H, D> QueueHandle<'a, H, D>
    where H: 'a + Handle
{
    pub fn new(handle: &'a H, queue: &'a mut VecDeque<D>) -> Self {
        Self { handle, queue }
    }
}
