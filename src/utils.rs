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

#[macro_export]
macro_rules! ft_to_m {
    ($x:expr) => (($x as f64) * 0.3048_f64);
}

#[macro_export]
macro_rules! run_every {
    ($hz:expr, $counter:expr, $handle:expr, $action:block) => {
        $counter += 1;
        if $counter >= ($handle.frequency() as f32 / $hz as f32) as u32 {
            $counter = 0;
            $action;
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_ft_to_m() {
        assert_eq!(ft_to_m!(0), 0_f64);
        assert!((ft_to_m!(10000) - 3048_f64).abs() < 1e-9);
        assert!((ft_to_m!(-1000.5_f64) + 304.9524_f64).abs() < 1e-9);
    }
}
