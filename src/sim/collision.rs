//! Fixed-point port of DOOM’s P_TryMove / P_CheckPosition, lines only.
//!
//! ✔ blockmap 3×3 neighbourhood around the destination
//! ✔ vanilla box-on-line-side corner selection by slope type
//! ✔ two-sided openings: headroom + 24-unit step-up limit
//! ✔ X-then-Y slide fallback

use log::debug;

use crate::math::Fixed;
use crate::world::{Level, Linedef, LinedefId, SlopeType};

/// Highest floor rise a walker can step onto (map units).
pub const MAX_STEP_HEIGHT: i32 = 24;

/// Square footprint in 16.16.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BBox {
    pub top: Fixed,
    pub bottom: Fixed,
    pub left: Fixed,
    pub right: Fixed,
}

impl BBox {
    #[inline]
    pub fn around(x: Fixed, y: Fixed, radius: Fixed) -> Self {
        Self {
            top: y + radius,
            bottom: y - radius,
            left: x - radius,
            right: x + radius,
        }
    }
}

/// What the collision test needs to know about whoever is moving.
#[derive(Clone, Copy, Debug)]
pub struct Body {
    pub radius: Fixed,
    pub height: i32,
    /// floor height the body currently stands on (map units)
    pub floor: i32,
}

/// Which attempt of `try_move` was committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Full,
    SlideX,
    SlideY,
    Blocked,
}

/// Vertical gap through a two-sided line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opening {
    pub top: i32,
    pub bottom: i32,
    pub range: i32,
}

/* ─────────────────────────  SIDE TESTS  ───────────────────────────────── */

/// Signed cross product of `(x, y) - v1` against the line direction.
/// Positive = front (right), negative = back, zero = on the line.
#[inline]
fn cross(level: &Level, line: &Linedef, x: Fixed, y: Fixed) -> i64 {
    let v1 = level.vertices[line.v1 as usize].pos;
    let rx = x.raw() as i64 - Fixed::from_int(v1.x).raw() as i64;
    let ry = y.raw() as i64 - Fixed::from_int(v1.y).raw() as i64;
    rx * line.delta.y as i64 - ry * line.delta.x as i64
}

/// `true` unless both candidate corners lie strictly on the same side.
pub fn box_crosses_line(level: &Level, bbox: &BBox, line: &Linedef) -> bool {
    let (a, b) = match line.slope {
        SlopeType::Horizontal | SlopeType::Positive => (
            cross(level, line, bbox.left, bbox.top),
            cross(level, line, bbox.right, bbox.bottom),
        ),
        SlopeType::Vertical | SlopeType::Negative => (
            cross(level, line, bbox.right, bbox.top),
            cross(level, line, bbox.left, bbox.bottom),
        ),
    };
    !((a > 0 && b > 0) || (a < 0 && b < 0))
}

/// `false` when the two boxes do not overlap (touching edges don't count).
#[inline]
fn bbox_overlaps_line(bbox: &BBox, line: &Linedef) -> bool {
    !(bbox.right <= Fixed::from_int(line.bbox.min.x)
        || bbox.left >= Fixed::from_int(line.bbox.max.x)
        || bbox.top <= Fixed::from_int(line.bbox.min.y)
        || bbox.bottom >= Fixed::from_int(line.bbox.max.y))
}

/// Opening of a two-sided line, `None` if it is one-sided or malformed.
pub fn line_opening(level: &Level, line: &Linedef) -> Option<Opening> {
    let (front, back) = level.line_sectors(line)?;
    let front = &level.sectors[front as usize];
    let back = &level.sectors[back as usize];

    let top = front.ceil_h.min(back.ceil_h); // lower ceiling
    let bottom = front.floor_h.max(back.floor_h); // higher floor

    Some(Opening {
        top,
        bottom,
        range: top - bottom,
    })
}

/* ─────────────────────────  PER-LINE CHECK  ───────────────────────────── */

/// Returns `false` when `line` blocks `body` occupying `bbox`.
pub fn check_line(level: &Level, line: &Linedef, bbox: &BBox, body: &Body) -> bool {
    if !line.is_two_sided() && !line.is_blocking() {
        return true;
    }

    if !bbox_overlaps_line(bbox, line) || !box_crosses_line(level, bbox, line) {
        return true;
    }

    if !line.is_two_sided() {
        return false; // solid wall
    }

    let Some(open) = line_opening(level, line) else {
        debug!("two-sided line {line:?} is missing a side, ignoring it");
        return true;
    };

    if line.is_blocking() {
        return false;
    }
    if open.range < body.height {
        return false; // no headroom
    }
    if open.bottom - body.floor > MAX_STEP_HEIGHT {
        return false; // step too tall
    }
    true
}

/* ─────────────────────────  POSITION / MOVE  ──────────────────────────── */

/// First line (in blockmap visiting order) that rejects `body` centred
/// on `(x, y)`, if any.
pub fn blocking_line(level: &Level, body: &Body, x: Fixed, y: Fixed) -> Option<LinedefId> {
    let bbox = BBox::around(x, y, body.radius);
    let mut blocker = None;
    level.blockmap.lines_around(x, y, |id| {
        if check_line(level, &level.linedefs[id as usize], &bbox, body) {
            true
        } else {
            blocker = Some(id);
            false
        }
    });
    blocker
}

/// `true` if `body` may stand at `(x, y)`.
#[inline]
pub fn check_position(level: &Level, body: &Body, x: Fixed, y: Fixed) -> bool {
    blocking_line(level, body, x, y).is_none()
}

/// Move by `(dx, dy)` if possible, else slide along X, else along Y.
/// X is always tried before Y, which decides how corners resolve.
pub fn try_move(
    level: &Level,
    body: &Body,
    x: &mut Fixed,
    y: &mut Fixed,
    dx: Fixed,
    dy: Fixed,
) -> MoveOutcome {
    let attempts = [
        (MoveOutcome::Full, dx, dy),
        (MoveOutcome::SlideX, dx, Fixed::ZERO),
        (MoveOutcome::SlideY, Fixed::ZERO, dy),
    ];
    for (outcome, mx, my) in attempts {
        if mx.is_zero() && my.is_zero() {
            continue;
        }
        let (nx, ny) = (*x + mx, *y + my);
        if check_position(level, body, nx, ny) {
            *x = nx;
            *y = ny;
            return outcome;
        }
    }
    MoveOutcome::Blocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::sample::row_of_rooms;
    use crate::world::{LevelBuilder, LinedefFlags};

    fn walker(floor: i32) -> Body {
        Body {
            radius: Fixed::from_int(16),
            height: 56,
            floor,
        }
    }

    fn fx(v: i32) -> Fixed {
        Fixed::from_int(v)
    }

    #[test]
    fn crossing_and_clear_boxes() {
        let lvl = row_of_rooms(&[(0, 128)]).unwrap();
        let west = &lvl.linedefs[0]; // x = 0, vertical
        assert!(box_crosses_line(&lvl, &BBox::around(fx(4), fx(100), fx(16)), west));
        assert!(!box_crosses_line(&lvl, &BBox::around(fx(40), fx(100), fx(16)), west));
        // touching the line is not crossing it
        let touching = BBox::around(fx(16), fx(100), fx(16));
        assert!(!bbox_overlaps_line(&touching, west));
    }

    #[test]
    fn diagonal_line_uses_slope_corners() {
        let mut b = LevelBuilder::new("DIAG");
        let s = b.sector(0, 128);
        let v0 = b.vertex(0, 0);
        let v1 = b.vertex(256, 256);
        let l = b.wall(v0, v1, s);
        b.subsector(&[(l, 0)]);
        let lvl = b.build().unwrap();
        let line = &lvl.linedefs[0];
        assert_eq!(line.slope, SlopeType::Positive);

        // centre on the line
        assert!(box_crosses_line(&lvl, &BBox::around(fx(128), fx(128), fx(16)), line));
        // corner just clear below-right of the line
        assert!(!box_crosses_line(&lvl, &BBox::around(fx(160), fx(100), fx(16)), line));
        assert!(!check_line(&lvl, line, &BBox::around(fx(128), fx(128), fx(16)), &walker(0)));
    }

    #[test]
    fn box_past_the_end_of_a_wall_is_not_blocked() {
        let lvl = row_of_rooms(&[(0, 128), (0, 128)]).unwrap();
        let north = &lvl.linedefs[1]; // room 0 north wall, (0,256)-(256,256)
        let past_end = BBox::around(fx(300), fx(256), fx(16));
        // the infinite line y = 256 splits the box ...
        assert!(box_crosses_line(&lvl, &past_end, north));
        // ... but the segment stops at x = 256
        assert!(check_line(&lvl, north, &past_end, &walker(0)));
        let on_wall = BBox::around(fx(200), fx(256), fx(16));
        assert!(!check_line(&lvl, north, &on_wall, &walker(0)));
    }

    #[test]
    fn wide_map_positions_do_not_overflow() {
        let mut b = LevelBuilder::new("WIDE");
        let s = b.sector(0, 128);
        let v0 = b.vertex(-20000, 0);
        let v1 = b.vertex(20000, 0);
        let l = b.wall(v0, v1, s);
        b.subsector(&[(l, 0)]);
        let lvl = b.build().unwrap();
        assert!(check_position(&lvl, &walker(0), fx(19000), fx(100)));
        assert!(!check_position(&lvl, &walker(0), fx(19000), fx(10)));
        assert!(check_position(&lvl, &walker(0), fx(-19000), fx(-100)));
    }

    #[test]
    fn step_up_limit() {
        let ok = row_of_rooms(&[(0, 128), (24, 128)]).unwrap();
        let too_high = row_of_rooms(&[(0, 128), (25, 128)]).unwrap();
        // straddling the shared line at x = 256
        assert!(check_position(&ok, &walker(0), fx(250), fx(128)));
        assert!(!check_position(&too_high, &walker(0), fx(250), fx(128)));
        // stepping down is free
        let drop = row_of_rooms(&[(100, 228), (0, 228)]).unwrap();
        assert!(check_position(&drop, &walker(100), fx(250), fx(128)));
    }

    #[test]
    fn headroom() {
        let low = row_of_rooms(&[(0, 128), (0, 55)]).unwrap();
        assert!(!check_position(&low, &walker(0), fx(250), fx(128)));
        let exact = row_of_rooms(&[(0, 128), (0, 56)]).unwrap();
        assert!(check_position(&exact, &walker(0), fx(250), fx(128)));
    }

    #[test]
    fn malformed_two_sided_line_is_ignored() {
        let mut b = LevelBuilder::new("HALF");
        let s = b.sector(0, 128);
        let v0 = b.vertex(0, 0);
        let v1 = b.vertex(0, 256);
        let l = b.line(v0, v1, LinedefFlags::TWO_SIDED, Some(s), None);
        b.subsector(&[(l, 0)]);
        let lvl = b.build().unwrap();
        assert!(check_position(&lvl, &walker(0), fx(4), fx(128)));
    }

    #[test]
    fn impassable_two_sided_line_blocks() {
        let mut b = LevelBuilder::new("RAIL");
        let s0 = b.sector(0, 128);
        let s1 = b.sector(0, 128);
        let v0 = b.vertex(0, 0);
        let v1 = b.vertex(0, 256);
        let flags = LinedefFlags::TWO_SIDED | LinedefFlags::IMPASSABLE;
        let l = b.line(v0, v1, flags, Some(s0), Some(s1));
        b.subsector(&[(l, 0)]);
        let lvl = b.build().unwrap();
        assert_eq!(blocking_line(&lvl, &walker(0), fx(4), fx(128)), Some(l));
    }

    #[test]
    fn non_blocking_one_sided_line_is_skipped() {
        let mut b = LevelBuilder::new("GHOST");
        let s = b.sector(0, 128);
        let v0 = b.vertex(0, 0);
        let v1 = b.vertex(0, 256);
        let l = b.line(v0, v1, LinedefFlags::empty(), Some(s), None);
        b.subsector(&[(l, 0)]);
        let lvl = b.build().unwrap();
        assert!(check_position(&lvl, &walker(0), fx(0), fx(128)));
    }

    #[test]
    fn try_move_slides_along_a_wall() {
        let lvl = row_of_rooms(&[(0, 128)]).unwrap();
        let body = walker(0);
        // hugging the north wall (y = 256), moving north-east
        let (mut x, mut y) = (fx(128), fx(240));
        let out = try_move(&lvl, &body, &mut x, &mut y, fx(8), fx(8));
        assert_eq!(out, MoveOutcome::SlideX);
        assert_eq!((x, y), (fx(136), fx(240)));

        // against the east wall, moving north-east
        let (mut x, mut y) = (fx(240), fx(128));
        let out = try_move(&lvl, &body, &mut x, &mut y, fx(8), fx(8));
        assert_eq!(out, MoveOutcome::SlideY);
        assert_eq!((x, y), (fx(240), fx(136)));
    }

    #[test]
    fn try_move_into_corner_is_blocked() {
        let lvl = row_of_rooms(&[(0, 128)]).unwrap();
        let (mut x, mut y) = (fx(240), fx(240));
        let out = try_move(&lvl, &walker(0), &mut x, &mut y, fx(4), fx(4));
        assert_eq!(out, MoveOutcome::Blocked);
        assert_eq!((x, y), (fx(240), fx(240)));
    }

    #[test]
    fn try_move_is_deterministic() {
        let lvl = row_of_rooms(&[(0, 128), (30, 128)]).unwrap();
        let run = || {
            let (mut x, mut y) = (fx(230), fx(30));
            let out = try_move(&lvl, &walker(0), &mut x, &mut y, Fixed(700_000), Fixed(-300_000));
            (out, x, y)
        };
        let first = run();
        for _ in 0..10 {
            assert_eq!(run(), first);
        }
    }
}
