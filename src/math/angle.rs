//! Binary angle measurement: a `u32` where 2^32 is one full turn.
//!
//! Addition and subtraction wrap, which is the whole point: no modulo,
//! no negative angles.  Only the top 13 bits reach the trig table, so
//! two angles that differ below `1 << ANGLETOFINESHIFT` share a sine.

use std::ops::{Add, AddAssign, Sub, SubAssign};

use super::fixed::Fixed;
use super::tables::{ANGLETOFINESHIFT, FINEMASK, finecosine, finesine};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bam(pub u32);

pub const ANG90: Bam = Bam(0x4000_0000);
pub const ANG180: Bam = Bam(0x8000_0000);
pub const ANG270: Bam = Bam(0xC000_0000);

impl Bam {
    /// `round(deg / 360 * 2^32)`, wrapped into one turn.  Lossy; only used
    /// to seed the facing of a spawned player.
    pub fn from_degrees(deg: f64) -> Self {
        let turns = (deg / 360.0 * 4_294_967_296.0).round();
        Bam(turns.rem_euclid(4_294_967_296.0) as u64 as u32)
    }

    pub fn to_degrees(self) -> f64 {
        self.0 as f64 * 360.0 / 4_294_967_296.0
    }

    /// Index into the fine trig table.
    #[inline]
    pub const fn fine(self) -> usize {
        (self.0 >> ANGLETOFINESHIFT) as usize & FINEMASK
    }

    #[inline]
    pub fn sin(self) -> Fixed {
        Fixed(finesine(self.fine()))
    }

    #[inline]
    pub fn cos(self) -> Fixed {
        Fixed(finecosine(self.fine()))
    }
}

impl Add for Bam {
    type Output = Bam;
    #[inline]
    fn add(self, rhs: Bam) -> Bam {
        Bam(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Bam {
    #[inline]
    fn add_assign(&mut self, rhs: Bam) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for Bam {
    type Output = Bam;
    #[inline]
    fn sub(self, rhs: Bam) -> Bam {
        Bam(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Bam {
    #[inline]
    fn sub_assign(&mut self, rhs: Bam) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FRACUNIT;

    #[test]
    fn add_then_sub_round_trips_across_the_wrap() {
        let turn = Bam(640 << 16);
        for a in [0u32, 1, 0x7FFF_FFFF, 0xFFFF_FFFF, 0xFFFF_0000, 12345678] {
            let a = Bam(a);
            assert_eq!((a + turn) - turn, a);
            assert_eq!((a - turn) + turn, a);
        }
    }

    #[test]
    fn degrees_convert_to_quarter_turns() {
        assert_eq!(Bam::from_degrees(0.0), Bam(0));
        assert_eq!(Bam::from_degrees(90.0), ANG90);
        assert_eq!(Bam::from_degrees(180.0), ANG180);
        assert_eq!(Bam::from_degrees(270.0), ANG270);
        assert_eq!(Bam::from_degrees(360.0), Bam(0));
        assert_eq!(Bam::from_degrees(-90.0), ANG270);
    }

    #[test]
    fn trig_at_cardinals() {
        assert_eq!(Bam(0).cos().0, FRACUNIT);
        assert_eq!(Bam(0).sin().0, 0);
        assert_eq!(ANG90.sin().0, FRACUNIT);
        assert_eq!(ANG180.cos().0, -FRACUNIT);
    }

    #[test]
    fn sub_resolution_angles_share_an_entry() {
        let a = Bam(0x1234_0000);
        let b = Bam(a.0 | ((1 << ANGLETOFINESHIFT) - 1));
        assert_eq!(a.fine(), b.fine());
        assert_eq!(a.sin(), b.sin());
    }
}
