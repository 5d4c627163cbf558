use bitflags::bitflags;
use glam::IVec2;
use log::debug;
use thiserror::Error;

use super::blockmap::Blockmap;
use super::bsp::NodeChild;

pub type SubsectorId = u16;
pub type LinedefId = u16;
pub type SegmentId = u16;
pub type VertexId = u16;
pub type SidedefId = u16;
pub type SectorId = u16;
pub type NodeId = u16;

/// 8-byte, NUL-padded texture / flat name.  Opaque to the simulation.
pub type TextureName = [u8; 8];

/// Thing type of the single-player start marker.
pub const PLAYER1_START: u16 = 1;

/// Pack a texture name the way the WAD stores it (truncated, NUL padded).
pub fn texture_name(name: &str) -> TextureName {
    let mut out = [0u8; 8];
    for (dst, src) in out.iter_mut().zip(name.bytes()) {
        *dst = src.to_ascii_uppercase();
    }
    out
}

/*------------------------- game objects -----------------------------*/

#[derive(Clone, Debug)]
pub struct Thing {
    pub pos: IVec2,
    pub angle: i16, // degrees, as stored in the map
    pub type_id: u16,
    pub options: u16,
}

/*--------------------------- linedefs -------------------------------*/

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LinedefFlags: u16 {
        const IMPASSABLE      = 0x0001;
        const BLOCK_MONSTERS  = 0x0002;
        const TWO_SIDED       = 0x0004;
        const UPPER_UNPEGGED  = 0x0010;
        const LOWER_UNPEGGED  = 0x0020;
        const SECRET          = 0x0040;
        const BLOCK_SOUND     = 0x0080;
        const NOT_ON_MAP      = 0x0200;
        const ALREADY_ON_MAP  = 0x1000; // editor flag
    }
}

/// Orientation class used to pick the two box corners that can straddle
/// a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlopeType {
    #[default]
    Horizontal,
    Vertical,
    Positive,
    Negative,
}

/// Integer axis-aligned box in map units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Aabb {
    pub min: IVec2,
    pub max: IVec2,
}

#[derive(Clone, Debug)]
pub struct Linedef {
    pub v1: VertexId,
    pub v2: VertexId,
    pub flags: LinedefFlags,
    pub special: u16,
    pub tag: u16,
    pub right_sidedef: Option<SidedefId>,
    pub left_sidedef: Option<SidedefId>,
    // derived by `Level::new`
    pub delta: IVec2,
    pub bbox: Aabb,
    pub slope: SlopeType,
}

impl Linedef {
    pub fn new(
        v1: VertexId,
        v2: VertexId,
        flags: LinedefFlags,
        right_sidedef: Option<SidedefId>,
        left_sidedef: Option<SidedefId>,
    ) -> Self {
        Self {
            v1,
            v2,
            flags,
            special: 0,
            tag: 0,
            right_sidedef,
            left_sidedef,
            delta: IVec2::ZERO,
            bbox: Aabb::default(),
            slope: SlopeType::default(),
        }
    }

    #[inline]
    pub fn is_two_sided(&self) -> bool {
        self.flags.contains(LinedefFlags::TWO_SIDED)
    }

    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.flags.contains(LinedefFlags::IMPASSABLE)
    }
}

/*--------------------------- sidedefs -------------------------------*/

#[derive(Clone, Debug)]
pub struct Sidedef {
    pub x_off: i16,
    pub y_off: i16,
    pub upper: TextureName,
    pub lower: TextureName,
    pub middle: TextureName,
    pub sector: SectorId,
}

impl Sidedef {
    /// Untextured side facing `sector`.
    pub fn plain(sector: SectorId) -> Self {
        Self {
            x_off: 0,
            y_off: 0,
            upper: [0; 8],
            lower: [0; 8],
            middle: [0; 8],
            sector,
        }
    }
}

/*----------------------- simple primitives --------------------------*/

#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub pos: IVec2,
}

#[derive(Clone, Debug)]
pub struct Seg {
    pub linedef: LinedefId,
    pub side: u8, // 0 = right sidedef, 1 = left
}

#[derive(Clone, Debug)]
pub struct Subsector {
    pub seg_count: u16,
    pub first_seg: SegmentId,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    /// `[right, left]`
    pub child: [NodeChild; 2],
}

#[derive(Clone, Debug)]
pub struct Sector {
    pub floor_h: i32,
    pub ceil_h: i32,
    pub floor_tex: TextureName,
    pub ceil_tex: TextureName,
    pub light: i16,
    pub special: i16,
    pub tag: i16,
}

impl Sector {
    pub fn new(floor_h: i32, ceil_h: i32) -> Self {
        Self {
            floor_h,
            ceil_h,
            floor_tex: texture_name("FLOOR4_8"),
            ceil_tex: texture_name("CEIL3_5"),
            light: 160,
            special: 0,
            tag: 0,
        }
    }
}

/*=======================================================================*/
/*                       Unvalidated input + errors                      */
/*=======================================================================*/

/// Level graph as handed over by a loader.  Nothing here is checked yet;
/// `Level::new` does that.
#[derive(Debug, Default)]
pub struct MapData {
    pub name: String,
    pub things: Vec<Thing>,
    pub linedefs: Vec<Linedef>,
    pub sidedefs: Vec<Sidedef>,
    pub vertices: Vec<Vertex>,
    pub segs: Vec<Seg>,
    pub subsectors: Vec<Subsector>,
    pub nodes: Vec<Node>,
    pub sectors: Vec<Sector>,
    /// `None` → built from the linedefs.
    pub blockmap: Option<Blockmap>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level has no sectors")]
    NoSectors,

    #[error("linedef {line} references vertex {vertex} (have {count})")]
    LineVertex {
        line: usize,
        vertex: VertexId,
        count: usize,
    },

    #[error("linedef {line} references sidedef {sidedef} (have {count})")]
    LineSidedef {
        line: usize,
        sidedef: SidedefId,
        count: usize,
    },

    #[error("sidedef {sidedef} references sector {sector} (have {count})")]
    SidedefSector {
        sidedef: usize,
        sector: SectorId,
        count: usize,
    },

    #[error("seg {seg} references linedef {linedef} (have {count})")]
    SegLinedef {
        seg: usize,
        linedef: LinedefId,
        count: usize,
    },

    #[error("subsector {subsector} seg range {first}+{len} exceeds {count} segs")]
    SubsectorSegs {
        subsector: usize,
        first: SegmentId,
        len: u16,
        count: usize,
    },

    #[error("node {node} child {child:?} is out of range")]
    NodeChild { node: usize, child: NodeChild },

    #[error("blockmap is {width}x{height} with {cells} cells")]
    BlockmapShape {
        width: i32,
        height: i32,
        cells: usize,
    },

    #[error("{count} rooms requested, at most {max} fit the map coordinate range")]
    TooManyRooms { count: usize, max: usize },

    #[error("blockmap cell {cell} references linedef {line} (have {count})")]
    BlockmapLine {
        cell: usize,
        line: LinedefId,
        count: usize,
    },
}

/*=======================================================================*/
/*                               Level                                   */
/*=======================================================================*/

/// Runtime snapshot of one map.  Geometry is immutable after load; only
/// `sectors[*].floor_h` changes, and only through platform thinkers.
#[derive(Debug)]
pub struct Level {
    pub name: String,
    pub things: Vec<Thing>,
    pub linedefs: Vec<Linedef>,
    pub sidedefs: Vec<Sidedef>,
    pub vertices: Vec<Vertex>,
    pub segs: Vec<Seg>,
    pub subsectors: Vec<Subsector>,
    pub nodes: Vec<Node>,
    pub sectors: Vec<Sector>,
    pub blockmap: Blockmap,
}

impl Level {
    /// Validate every cross reference, derive per-line data and build the
    /// blockmap if the loader did not supply one.
    pub fn new(data: MapData) -> Result<Level, LevelError> {
        let MapData {
            name,
            things,
            mut linedefs,
            sidedefs,
            vertices,
            segs,
            subsectors,
            nodes,
            sectors,
            blockmap,
        } = data;

        if sectors.is_empty() {
            return Err(LevelError::NoSectors);
        }

        for (i, sd) in sidedefs.iter().enumerate() {
            if sd.sector as usize >= sectors.len() {
                return Err(LevelError::SidedefSector {
                    sidedef: i,
                    sector: sd.sector,
                    count: sectors.len(),
                });
            }
        }

        for (i, ld) in linedefs.iter_mut().enumerate() {
            for v in [ld.v1, ld.v2] {
                if v as usize >= vertices.len() {
                    return Err(LevelError::LineVertex {
                        line: i,
                        vertex: v,
                        count: vertices.len(),
                    });
                }
            }
            for sd in [ld.right_sidedef, ld.left_sidedef].into_iter().flatten() {
                if sd as usize >= sidedefs.len() {
                    return Err(LevelError::LineSidedef {
                        line: i,
                        sidedef: sd,
                        count: sidedefs.len(),
                    });
                }
            }
            finalise_line(ld, &vertices);
        }

        for (i, seg) in segs.iter().enumerate() {
            if seg.linedef as usize >= linedefs.len() {
                return Err(LevelError::SegLinedef {
                    seg: i,
                    linedef: seg.linedef,
                    count: linedefs.len(),
                });
            }
        }

        for (i, ss) in subsectors.iter().enumerate() {
            if ss.first_seg as usize + ss.seg_count as usize > segs.len() {
                return Err(LevelError::SubsectorSegs {
                    subsector: i,
                    first: ss.first_seg,
                    len: ss.seg_count,
                    count: segs.len(),
                });
            }
        }

        // Children must point at earlier nodes, which also rules out cycles.
        for (i, node) in nodes.iter().enumerate() {
            for child in node.child {
                let ok = match child {
                    NodeChild::Node(n) => (n as usize) < i,
                    NodeChild::Subsector(s) => (s as usize) < subsectors.len(),
                };
                if !ok {
                    return Err(LevelError::NodeChild { node: i, child });
                }
            }
        }

        let blockmap = match blockmap {
            Some(bm) => bm,
            None => Blockmap::build(&vertices, &linedefs),
        };
        blockmap.validate(linedefs.len())?;

        debug!(
            "level {name}: {} lines, {} sectors, {} nodes, blockmap {}x{}",
            linedefs.len(),
            sectors.len(),
            nodes.len(),
            blockmap.width,
            blockmap.height
        );

        Ok(Level {
            name,
            things,
            linedefs,
            sidedefs,
            vertices,
            segs,
            subsectors,
            nodes,
            sectors,
            blockmap,
        })
    }

    /// `(front, back)` sectors of a two-sided line, `None` if the line is
    /// one-sided or is flagged two-sided but lacks a side.
    #[inline]
    pub fn line_sectors(&self, line: &Linedef) -> Option<(SectorId, SectorId)> {
        if !line.is_two_sided() {
            return None;
        }
        let front = line.right_sidedef?;
        let back = line.left_sidedef?;
        Some((
            self.sidedefs[front as usize].sector,
            self.sidedefs[back as usize].sector,
        ))
    }

    /// Every sector across a two-sided line from `sector`.  A neighbour
    /// bordering on several lines is yielded once per line.
    pub fn neighbour_sectors(&self, sector: SectorId) -> impl Iterator<Item = SectorId> + '_ {
        self.linedefs
            .iter()
            .filter_map(move |ld| match self.line_sectors(ld)? {
                (f, b) if f == sector && b != sector => Some(b),
                (f, b) if b == sector && f != sector => Some(f),
                _ => None,
            })
    }

    /// Lowest floor among `sector` and its neighbours.
    pub fn lowest_floor_surrounding(&self, sector: SectorId) -> i32 {
        self.neighbour_sectors(sector)
            .map(|s| self.sectors[s as usize].floor_h)
            .fold(self.sectors[sector as usize].floor_h, i32::min)
    }

    /// Highest floor among `sector` and its neighbours.
    pub fn highest_floor_surrounding(&self, sector: SectorId) -> i32 {
        self.neighbour_sectors(sector)
            .map(|s| self.sectors[s as usize].floor_h)
            .fold(self.sectors[sector as usize].floor_h, i32::max)
    }

    /// First single-player start in the thing list.
    pub fn player_start(&self) -> Option<&Thing> {
        self.things.iter().find(|t| t.type_id == PLAYER1_START)
    }

    /// Sector ids carrying `tag`, in index order.
    pub fn sectors_with_tag(&self, tag: i16) -> impl Iterator<Item = SectorId> + '_ {
        self.sectors
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.tag == tag)
            .map(|(i, _)| i as SectorId)
    }
}

fn finalise_line(ld: &mut Linedef, vertices: &[Vertex]) {
    let a = vertices[ld.v1 as usize].pos;
    let b = vertices[ld.v2 as usize].pos;
    ld.delta = b - a;
    ld.bbox = Aabb {
        min: a.min(b),
        max: a.max(b),
    };
    ld.slope = match (ld.delta.x, ld.delta.y) {
        (0, _) => SlopeType::Vertical,
        (_, 0) => SlopeType::Horizontal,
        (dx, dy) if (dx > 0) == (dy > 0) => SlopeType::Positive,
        _ => SlopeType::Negative,
    };
}
