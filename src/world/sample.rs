//! Generated test level: a row of 256×256 rooms running east along the
//! x-axis, each room its own sector, neighbours joined by two-sided
//! lines.  The outer boundary is solid.  Room `i` is tagged `i + 1` and
//! the player starts in the middle of room 0 facing east.

use super::builder::LevelBuilder;
use super::bsp::NodeChild;
use super::geometry::{Level, LevelError, PLAYER1_START, SectorId};

pub const ROOM_SIZE: i32 = 256;

/// Rooms that fit before the east wall passes 32767, the largest map
/// coordinate a 16.16 `Fixed` holds.  Ids and tags stay far inside their
/// 16-bit types at this size.
pub const MAX_ROOMS: usize = i16::MAX as usize / ROOM_SIZE as usize;

/// One room per `(floor, ceiling)` entry.
pub fn row_of_rooms(rooms: &[(i32, i32)]) -> Result<Level, LevelError> {
    if rooms.len() > MAX_ROOMS {
        return Err(LevelError::TooManyRooms {
            count: rooms.len(),
            max: MAX_ROOMS,
        });
    }
    let mut b = LevelBuilder::new("ROOMS");
    if rooms.is_empty() {
        return b.build();
    }
    let n = rooms.len() as i32;

    let sectors: Vec<SectorId> = rooms
        .iter()
        .enumerate()
        .map(|(i, &(floor, ceil))| {
            let s = b.sector(floor, ceil);
            b.tag_sector(s, i as i16 + 1);
            s
        })
        .collect();

    // bottom / top vertex of every column boundary
    let cols: Vec<_> = (0..=n)
        .map(|i| {
            let x = i * ROOM_SIZE;
            (b.vertex(x, 0), b.vertex(x, ROOM_SIZE))
        })
        .collect();

    // Lines run clockwise round each room so the room is on their right.
    let mut south_walls = Vec::with_capacity(rooms.len());
    b.wall(cols[0].0, cols[0].1, sectors[0]);
    for (i, &s) in sectors.iter().enumerate() {
        let (bl, tl) = cols[i];
        let (br, tr) = cols[i + 1];
        b.wall(tl, tr, s); // north
        if i + 1 < sectors.len() {
            b.portal(tr, br, s, sectors[i + 1]); // shared east edge
        } else {
            b.wall(tr, br, s); // east boundary
        }
        south_walls.push(b.wall(br, bl, s));
    }

    let leaves: Vec<_> = south_walls
        .iter()
        .map(|&l| NodeChild::Subsector(b.subsector(&[(l, 0)])))
        .collect();

    // Chain of vertical partitions, innermost (east-most) first so the
    // westmost split at x = ROOM_SIZE ends up as the root.
    let mut east = *leaves.last().unwrap_or(&NodeChild::Subsector(0));
    for i in (1..leaves.len()).rev() {
        let x = i as i32 * ROOM_SIZE;
        east = b.node((x, 0), (0, ROOM_SIZE), east, leaves[i - 1]);
    }

    b.thing(ROOM_SIZE / 2, ROOM_SIZE / 2, 0, PLAYER1_START);
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape() {
        let lvl = row_of_rooms(&[(0, 128), (24, 128)]).unwrap();
        assert_eq!(lvl.sectors.len(), 2);
        // west + 2×(north, east, south)
        assert_eq!(lvl.linedefs.len(), 7);
        assert_eq!(lvl.nodes.len(), 1);
        assert_eq!(lvl.sectors[1].tag, 2);
        assert_eq!(lvl.blockmap.width, 5);
        assert_eq!(lvl.blockmap.height, 3);
    }

    #[test]
    fn room_count_is_capped() {
        let rooms = vec![(0, 128); MAX_ROOMS + 1];
        assert_eq!(
            row_of_rooms(&rooms).unwrap_err(),
            LevelError::TooManyRooms {
                count: MAX_ROOMS + 1,
                max: MAX_ROOMS
            }
        );
    }

    #[test]
    fn single_room_has_no_nodes() {
        let lvl = row_of_rooms(&[(0, 128)]).unwrap();
        assert!(lvl.nodes.is_empty());
        assert_eq!(lvl.locate_sector(100, 100), 0);
    }
}
