//! Static line grid – the BLOCKMAP.
//!
//! * One cell ≙ 128×128 map-units (vanilla constant).
//! * Each cell lists the linedefs whose bounding box touches it.
//! * Built once at load, read-only afterwards.
//!
//! Lookups take 16.16 coordinates, so the world → cell conversion is a
//! single arithmetic shift that floors negative offsets correctly.

use glam::IVec2;
use smallvec::SmallVec;

use super::geometry::{LevelError, Linedef, LinedefId, Vertex};
use crate::math::{FRACBITS, Fixed};

/// size of one grid cell in world units
pub const MAPBLOCKSHIFT: u32 = 7; // 2^7 = 128

/// Most cells hold a handful of lines, so this rarely spills to the heap.
pub type Cell = SmallVec<[LinedefId; 8]>;

#[derive(Clone, Debug)]
pub struct Blockmap {
    /// bottom-left corner, map units
    pub origin: IVec2,
    pub width: i32,
    pub height: i32,
    /// row-major, `height` rows of `width` cells
    pub cells: Vec<Cell>,
}

impl Blockmap {
    /// Grid covering every vertex, each line registered in all cells its
    /// bounding box overlaps.
    pub fn build(vertices: &[Vertex], linedefs: &[Linedef]) -> Blockmap {
        if vertices.is_empty() {
            return Blockmap {
                origin: IVec2::ZERO,
                width: 1,
                height: 1,
                cells: vec![Cell::new()],
            };
        }
        let (min, max) = vertices.iter().fold(
            (IVec2::splat(i32::MAX), IVec2::splat(i32::MIN)),
            |(lo, hi), v| (lo.min(v.pos), hi.max(v.pos)),
        );

        let width = ((max.x - min.x) >> MAPBLOCKSHIFT) + 1;
        let height = ((max.y - min.y) >> MAPBLOCKSHIFT) + 1;
        let mut cells = vec![Cell::new(); (width * height) as usize];

        for (id, ld) in linedefs.iter().enumerate() {
            let a = vertices[ld.v1 as usize].pos;
            let b = vertices[ld.v2 as usize].pos;
            let lo = (a.min(b) - min) >> MAPBLOCKSHIFT as i32;
            let hi = (a.max(b) - min) >> MAPBLOCKSHIFT as i32;
            for by in lo.y..=hi.y {
                for bx in lo.x..=hi.x {
                    cells[(by * width + bx) as usize].push(id as LinedefId);
                }
            }
        }

        Blockmap {
            origin: min,
            width,
            height,
            cells,
        }
    }

    pub(crate) fn validate(&self, line_count: usize) -> Result<(), LevelError> {
        if self.width <= 0
            || self.height <= 0
            || self.cells.len() != (self.width * self.height) as usize
        {
            return Err(LevelError::BlockmapShape {
                width: self.width,
                height: self.height,
                cells: self.cells.len(),
            });
        }
        for (cell, lines) in self.cells.iter().enumerate() {
            if let Some(&line) = lines.iter().find(|&&l| l as usize >= line_count) {
                return Err(LevelError::BlockmapLine {
                    cell,
                    line,
                    count: line_count,
                });
            }
        }
        Ok(())
    }

    /// Cell column / row holding the point.  May lie outside the grid.
    /// Offsets are taken in `i64`: a map wider than 32768 units does not
    /// fit its 16.16 span in an `i32`.
    #[inline]
    pub fn cell_of(&self, x: Fixed, y: Fixed) -> (i32, i32) {
        let shift = FRACBITS + MAPBLOCKSHIFT;
        let bx = (x.raw() as i64 - ((self.origin.x as i64) << FRACBITS)) >> shift;
        let by = (y.raw() as i64 - ((self.origin.y as i64) << FRACBITS)) >> shift;
        (bx as i32, by as i32)
    }

    /// Lines in cell `(bx, by)`; out-of-grid cells are empty.
    #[inline]
    pub fn lines(&self, bx: i32, by: i32) -> &[LinedefId] {
        if bx < 0 || by < 0 || bx >= self.width || by >= self.height {
            return &[];
        }
        &self.cells[(by * self.width + bx) as usize]
    }

    /// Visit every line of the 3×3 cells around the point, row by row.
    /// Lines spanning several cells are visited once per cell.  Stops
    /// early when `f` returns `false`.
    pub fn lines_around<F>(&self, x: Fixed, y: Fixed, mut f: F) -> bool
    where
        F: FnMut(LinedefId) -> bool,
    {
        let (cx, cy) = self.cell_of(x, y);
        for by in cy - 1..=cy + 1 {
            for bx in cx - 1..=cx + 1 {
                for &line in self.lines(bx, by) {
                    if !f(line) {
                        return false;
                    }
                }
            }
        }
        true
    }
}
