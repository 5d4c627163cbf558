use log::debug;

use crate::world::geometry::{Level, Node, NodeId, SectorId, SubsectorId};

/// A BSP child: either another partition node or a leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeChild {
    Node(NodeId),
    Subsector(SubsectorId),
}

// ──────────────────────────────────────────────────────────────────────────
//                       Level – public helpers
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    /// Index of the BSP root (`nodes.len()-1` in Doom), `None` for a map
    /// that is a single subsector.
    #[inline(always)]
    pub fn bsp_root(&self) -> Option<NodeId> {
        self.nodes.len().checked_sub(1).map(|i| i as NodeId)
    }

    /// Walk the BSP and return the subsector id containing the map-unit
    /// point `(x, y)`.
    pub fn locate_subsector(&self, x: i32, y: i32) -> SubsectorId {
        let Some(mut idx) = self.bsp_root() else {
            return 0;
        };
        loop {
            let node = &self.nodes[idx as usize];
            match node.child[node.point_side(x, y)] {
                NodeChild::Subsector(ss) => return ss,
                NodeChild::Node(n) => idx = n,
            }
        }
    }

    /// Sector owning subsector `ss`: first seg → linedef → sidedef on the
    /// seg's side.  `None` when any link of that chain is missing.
    pub fn subsector_sector(&self, ss: SubsectorId) -> Option<SectorId> {
        let sub = self.subsectors.get(ss as usize)?;
        if sub.seg_count == 0 {
            return None;
        }
        let seg = &self.segs[sub.first_seg as usize];
        let ld = &self.linedefs[seg.linedef as usize];
        let side = if seg.side == 0 {
            ld.right_sidedef
        } else {
            ld.left_sidedef
        }?;
        Some(self.sidedefs[side as usize].sector)
    }

    /// Sector containing the map-unit point.  Degenerate leaves fall back
    /// to sector 0.
    pub fn locate_sector(&self, x: i32, y: i32) -> SectorId {
        let ss = self.locate_subsector(x, y);
        self.subsector_sector(ss).unwrap_or_else(|| {
            debug!("subsector {ss} at ({x}, {y}) has no sector chain, using sector 0");
            0
        })
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Node geometry helpers
// ──────────────────────────────────────────────────────────────────────────
impl Node {
    /// 0 = *right* of splitter (cross product ≥ 0), 1 = *left*.
    #[inline(always)]
    pub fn point_side(&self, x: i32, y: i32) -> usize {
        let d = (x as i64 - self.x as i64) * self.dy as i64
            - (y as i64 - self.y as i64) * self.dx as i64;
        if d >= 0 { 0 } else { 1 }
    }
}

// ──────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::world::geometry::{Linedef, LinedefFlags, MapData, Sector, Seg, Sidedef, Subsector, Vertex};
    use crate::world::sample::row_of_rooms;

    #[test]
    fn point_side_tie_goes_right() {
        let node = Node {
            x: 256,
            y: 0,
            dx: 0,
            dy: 256,
            child: [NodeChild::Subsector(1), NodeChild::Subsector(0)],
        };
        assert_eq!(node.point_side(300, 10), 0);
        assert_eq!(node.point_side(256, 99), 0); // on the line
        assert_eq!(node.point_side(200, 10), 1);
    }

    #[test]
    fn locates_each_room() {
        let lvl = row_of_rooms(&[(0, 128), (16, 128), (32, 128), (48, 128)]).unwrap();
        for room in 0..4 {
            let x = room * 256 + 128;
            assert_eq!(lvl.locate_sector(x, 128), room as SectorId);
        }
        // boundaries belong to the room on the right
        assert_eq!(lvl.locate_sector(256, 5), 1);
        assert_eq!(lvl.locate_sector(255, 5), 0);
    }

    #[test]
    fn no_nodes_uses_subsector_zero() {
        let data = MapData {
            vertices: vec![Vertex { pos: IVec2::ZERO }, Vertex { pos: IVec2::new(64, 0) }],
            linedefs: vec![Linedef::new(0, 1, LinedefFlags::IMPASSABLE, Some(0), None)],
            sidedefs: vec![Sidedef::plain(1)],
            sectors: vec![Sector::new(0, 64), Sector::new(8, 64)],
            segs: vec![Seg { linedef: 0, side: 0 }],
            subsectors: vec![Subsector {
                seg_count: 1,
                first_seg: 0,
            }],
            ..Default::default()
        };
        let lvl = Level::new(data).unwrap();
        assert_eq!(lvl.bsp_root(), None);
        assert_eq!(lvl.locate_sector(-5000, 9000), 1);
    }

    #[test]
    fn broken_leaf_falls_back_to_sector_zero() {
        // seg points at the missing left side of a one-sided line
        let data = MapData {
            vertices: vec![Vertex { pos: IVec2::ZERO }, Vertex { pos: IVec2::new(64, 0) }],
            linedefs: vec![Linedef::new(0, 1, LinedefFlags::IMPASSABLE, Some(0), None)],
            sidedefs: vec![Sidedef::plain(1)],
            sectors: vec![Sector::new(0, 64), Sector::new(8, 64)],
            segs: vec![Seg { linedef: 0, side: 1 }],
            subsectors: vec![Subsector {
                seg_count: 1,
                first_seg: 0,
            }],
            ..Default::default()
        };
        let lvl = Level::new(data).unwrap();
        assert_eq!(lvl.subsector_sector(0), None);
        assert_eq!(lvl.locate_sector(10, 10), 0);
    }
}
