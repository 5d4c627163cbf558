//! 16.16 signed fixed-point, the numeric type of every position and
//! momentum in the simulation.
//!
//! The low 16 bits are the fraction.  Products go through an `i64` so the
//! full `i32` range multiplies without wrapping, and are truncated toward
//! zero (not floored) so positive and negative momentum decay alike.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

pub const FRACBITS: u32 = 16;
pub const FRACUNIT: i32 = 1 << FRACBITS;

/// Overflow-safe 16.16 multiply, rounding toward zero.
#[inline]
pub const fn fixed_mul(a: i32, b: i32) -> i32 {
    ((a as i64 * b as i64) / FRACUNIT as i64) as i32
}

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(FRACUNIT);

    /// Whole map units → fixed.
    #[inline]
    pub const fn from_int(v: i32) -> Self {
        Fixed(v << FRACBITS)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer part, rounded toward negative infinity (arithmetic shift).
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRACBITS
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Fixed(self.0.wrapping_abs())
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / FRACUNIT as f32
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({:.4})", self.to_f32())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.to_f32())
    }
}

/* ─────────────────────────── operators ─────────────────────────── */

// Add/Sub wrap like the two's-complement maths they replace.
impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(fixed_mul(self.0, rhs.0))
    }
}

impl From<i32> for Fixed {
    /// Interprets the integer as whole map units.
    fn from(v: i32) -> Self {
        Fixed::from_int(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_by_one_is_identity_for_integers() {
        for k in [-32768, -1000, -1, 0, 1, 7, 1000, 32767] {
            assert_eq!(fixed_mul(k * FRACUNIT, FRACUNIT), k * FRACUNIT);
        }
    }

    #[test]
    fn mul_does_not_overflow_large_operands() {
        // 30000.0 * 0.5 overflows a 32-bit intermediate.
        let a = 30000 * FRACUNIT;
        assert_eq!(fixed_mul(a, FRACUNIT / 2), 15000 * FRACUNIT);
        assert_eq!(fixed_mul(-a, FRACUNIT / 2), -15000 * FRACUNIT);

        assert_eq!(fixed_mul(i32::MAX, FRACUNIT), i32::MAX);
        assert_eq!(fixed_mul(i32::MIN, FRACUNIT), i32::MIN);
    }

    #[test]
    fn mul_truncates_toward_zero() {
        // 1/65536 * 0.5 = 0.5 ulp → 0 on both signs
        assert_eq!(fixed_mul(1, FRACUNIT / 2), 0);
        assert_eq!(fixed_mul(-1, FRACUNIT / 2), 0);
        assert_eq!(fixed_mul(-3, FRACUNIT / 2), -1);
    }

    #[test]
    fn to_int_floors() {
        assert_eq!(Fixed::from_int(5).to_int(), 5);
        assert_eq!(Fixed(-1).to_int(), -1);
        assert_eq!(Fixed(FRACUNIT + FRACUNIT / 2).to_int(), 1);
    }
}
