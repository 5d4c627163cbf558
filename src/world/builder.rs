//! Programmatic level construction.
//!
//! Loaders hand `Level::new` a filled-in `MapData`; tools and tests that
//! have no WAD use this builder instead.  Every call returns the id of the
//! element it created, so geometry can be wired up by index.

use glam::IVec2;

use super::bsp::NodeChild;
use super::geometry::{
    Level, LevelError, Linedef, LinedefFlags, LinedefId, MapData, Node, Sector, SectorId, Seg,
    Sidedef, SidedefId, Subsector, SubsectorId, Thing, VertexId, Vertex,
};

#[derive(Debug, Default)]
pub struct LevelBuilder {
    data: MapData,
}

impl LevelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            data: MapData {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    pub fn sector(&mut self, floor_h: i32, ceil_h: i32) -> SectorId {
        self.data.sectors.push(Sector::new(floor_h, ceil_h));
        (self.data.sectors.len() - 1) as SectorId
    }

    pub fn tag_sector(&mut self, sector: SectorId, tag: i16) -> &mut Self {
        self.data.sectors[sector as usize].tag = tag;
        self
    }

    pub fn vertex(&mut self, x: i32, y: i32) -> VertexId {
        self.data.vertices.push(Vertex {
            pos: IVec2::new(x, y),
        });
        (self.data.vertices.len() - 1) as VertexId
    }

    fn side(&mut self, sector: Option<SectorId>) -> Option<SidedefId> {
        let sector = sector?;
        self.data.sidedefs.push(Sidedef::plain(sector));
        Some((self.data.sidedefs.len() - 1) as SidedefId)
    }

    /// Linedef with explicit flags and optional sides.
    pub fn line(
        &mut self,
        v1: VertexId,
        v2: VertexId,
        flags: LinedefFlags,
        front: Option<SectorId>,
        back: Option<SectorId>,
    ) -> LinedefId {
        let right = self.side(front);
        let left = self.side(back);
        self.data
            .linedefs
            .push(Linedef::new(v1, v2, flags, right, left));
        (self.data.linedefs.len() - 1) as LinedefId
    }

    /// Solid one-sided wall; `front` is the sector on its right.
    pub fn wall(&mut self, v1: VertexId, v2: VertexId, front: SectorId) -> LinedefId {
        self.line(v1, v2, LinedefFlags::IMPASSABLE, Some(front), None)
    }

    /// Two-sided line joining `front` (right) and `back` (left).
    pub fn portal(
        &mut self,
        v1: VertexId,
        v2: VertexId,
        front: SectorId,
        back: SectorId,
    ) -> LinedefId {
        self.line(v1, v2, LinedefFlags::TWO_SIDED, Some(front), Some(back))
    }

    /// Leaf made of consecutive segs `(linedef, side)`; the first seg
    /// decides the owning sector.
    pub fn subsector(&mut self, segs: &[(LinedefId, u8)]) -> SubsectorId {
        let first_seg = self.data.segs.len() as u16;
        self.data
            .segs
            .extend(segs.iter().map(|&(linedef, side)| Seg { linedef, side }));
        self.data.subsectors.push(Subsector {
            seg_count: segs.len() as u16,
            first_seg,
        });
        (self.data.subsectors.len() - 1) as SubsectorId
    }

    /// Partition through `(x, y)` along `(dx, dy)`.  Push children before
    /// parents: the last node added is the root.
    pub fn node(
        &mut self,
        (x, y): (i32, i32),
        (dx, dy): (i32, i32),
        right: NodeChild,
        left: NodeChild,
    ) -> NodeChild {
        self.data.nodes.push(Node {
            x,
            y,
            dx,
            dy,
            child: [right, left],
        });
        NodeChild::Node((self.data.nodes.len() - 1) as u16)
    }

    pub fn thing(&mut self, x: i32, y: i32, angle: i16, type_id: u16) -> &mut Self {
        self.data.things.push(Thing {
            pos: IVec2::new(x, y),
            angle,
            type_id,
            options: 0x0007,
        });
        self
    }

    pub fn build(self) -> Result<Level, LevelError> {
        Level::new(self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_room() {
        let mut b = LevelBuilder::new("BOX");
        let s = b.sector(0, 128);
        let v: Vec<_> = [(0, 0), (0, 128), (128, 128), (128, 0)]
            .iter()
            .map(|&(x, y)| b.vertex(x, y))
            .collect();
        let first = b.wall(v[0], v[1], s);
        for i in 1..4 {
            b.wall(v[i], v[(i + 1) % 4], s);
        }
        b.subsector(&[(first, 0)]);
        b.thing(64, 64, 90, 1);

        let lvl = b.build().unwrap();
        assert_eq!(lvl.linedefs.len(), 4);
        assert_eq!(lvl.sidedefs.len(), 4);
        assert_eq!(lvl.locate_sector(64, 64), s);
        assert_eq!(lvl.player_start().map(|t| t.angle), Some(90));
    }

    #[test]
    fn bad_sector_reference_surfaces() {
        let mut b = LevelBuilder::new("BAD");
        b.sector(0, 128);
        let v0 = b.vertex(0, 0);
        let v1 = b.vertex(64, 0);
        b.wall(v0, v1, 3);
        assert!(matches!(
            b.build(),
            Err(LevelError::SidedefSector { sector: 3, .. })
        ));
    }
}
