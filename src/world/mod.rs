mod blockmap;
mod bsp;
mod builder;
mod geometry;
pub mod sample;

pub use blockmap::{Blockmap, MAPBLOCKSHIFT};
pub use bsp::NodeChild;
pub use builder::LevelBuilder;
pub use geometry::{
    Aabb, Level, LevelError, Linedef, LinedefFlags, LinedefId, MapData, Node, NodeId,
    PLAYER1_START, Sector, SectorId, Seg, SegmentId, Sidedef, SidedefId, SlopeType, Subsector,
    SubsectorId, TextureName, Thing, Vertex, VertexId, texture_name,
};
