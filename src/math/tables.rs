//! Fine sine lookup, built once on first use.
//!
//! 8192 fine angles per circle.  The table covers 5/4 of a turn so the
//! cosine is just the sine shifted by a quarter (`FINEANGLES / 4`).

use once_cell::sync::Lazy;

use super::fixed::FRACUNIT;

pub const FINEANGLES: usize = 8192;
pub const FINEMASK: usize = FINEANGLES - 1;
/// BAM → fine index: keep the top 13 bits.
pub const ANGLETOFINESHIFT: u32 = 19;

static FINE_SINE: Lazy<Box<[i32; FINEANGLES * 5 / 4]>> = Lazy::new(|| {
    let mut table = Box::new([0i32; FINEANGLES * 5 / 4]);
    for (i, slot) in table.iter_mut().enumerate() {
        let a = i as f64 * std::f64::consts::TAU / FINEANGLES as f64;
        *slot = (a.sin() * FRACUNIT as f64).round() as i32;
    }
    table
});

/// Sine of fine angle `idx` (masked) as raw 16.16.
#[inline]
pub fn finesine(idx: usize) -> i32 {
    FINE_SINE[idx & FINEMASK]
}

/// Cosine of fine angle `idx` (masked) as raw 16.16.
#[inline]
pub fn finecosine(idx: usize) -> i32 {
    FINE_SINE[(idx & FINEMASK) + FINEANGLES / 4]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_points_are_exact() {
        assert_eq!(finesine(0), 0);
        assert_eq!(finecosine(0), FRACUNIT);
        assert_eq!(finesine(FINEANGLES / 4), FRACUNIT);
        assert_eq!(finecosine(FINEANGLES / 2), -FRACUNIT);
        assert_eq!(finesine(FINEANGLES * 3 / 4), -FRACUNIT);
    }

    #[test]
    fn index_is_masked() {
        assert_eq!(finesine(FINEANGLES + 10), finesine(10));
        assert_eq!(finecosine(FINEANGLES * 3 + 99), finecosine(99));
    }
}
