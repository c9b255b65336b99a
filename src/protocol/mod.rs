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

use crate::processor::Report;
use crate::spotter::handle::Pushable;
use std::iter::Chain;
use std::slice::Iter;

type ChainedIter<'a> = Chain<Iter<'a, Report>, Iter<'a, Report>>;

pub mod console;
pub mod record;

#[derive(PartialEq, Debug, Clone)]
pub struct Payload {
    pub payload: Vec<u8>,
}

pub trait Protocol {
    /// Deliver event `e` to this processor
    fn run(&mut self, handle: &mut dyn Pushable<Payload>, i: ChainedIter);
}
