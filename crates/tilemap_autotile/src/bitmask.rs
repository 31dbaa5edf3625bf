//! 9-bit adjacency bitmasks
//!
//! The 3x3 neighborhood of a cell maps to bit `row * 3 + col`, where row and
//! col 0..=2 correspond to dy and dx -1..=1:
//!
//! ```text
//!   1 |   2 |   4        NW | N  | NE
//!   8 |  16 |  32        W  | C  | E
//!  64 | 128 | 256        SW | S  | SE
//! ```

/// Neighbor direction flags
pub mod bits {
    pub const NW: u16 = 1 << 0;
    pub const N: u16 = 1 << 1;
    pub const NE: u16 = 1 << 2;
    pub const W: u16 = 1 << 3;
    pub const CENTER: u16 = 1 << 4;
    pub const E: u16 = 1 << 5;
    pub const SW: u16 = 1 << 6;
    pub const S: u16 = 1 << 7;
    pub const SE: u16 = 1 << 8;

    /// All nine cells
    pub const ALL: u16 = 0x1FF;
}

/// Row-major 3x3 presence grid, `grid[row][col]`
pub type BitmaskGrid = [[bool; 3]; 3];

/// Bit for a grid cell; `None` outside the 3x3 grid
pub const fn cell_bit(row: usize, col: usize) -> Option<u16> {
    if row > 2 || col > 2 {
        return None;
    }
    Some(1 << (row * 3 + col))
}

/// Clear corner bits that lack both adjacent cardinals
pub fn apply_corner_rule(bitmask: u16) -> u16 {
    use bits::*;

    let mut result = bitmask & ALL;

    // NW corner requires N and W
    if (bitmask & (N | W)) != (N | W) {
        result &= !NW;
    }
    // NE corner requires N and E
    if (bitmask & (N | E)) != (N | E) {
        result &= !NE;
    }
    // SW corner requires S and W
    if (bitmask & (S | W)) != (S | W) {
        result &= !SW;
    }
    // SE corner requires S and E
    if (bitmask & (S | E)) != (S | E) {
        result &= !SE;
    }

    result
}

/// Compute the bitmask of a cell from a neighbor query.
///
/// `has_neighbor(dx, dy)` is asked for the 8 offsets in row-major order. The
/// center bit is always set. A corner bit is set only when the diagonal
/// neighbor and both cardinals next to it are present.
pub fn calculate_bitmask_from_neighbors<F>(mut has_neighbor: F) -> u16
where
    F: FnMut(i32, i32) -> bool,
{
    let mut bitmask = bits::CENTER;

    for row in 0..3usize {
        for col in 0..3usize {
            if row == 1 && col == 1 {
                continue;
            }
            let dx = col as i32 - 1;
            let dy = row as i32 - 1;
            if has_neighbor(dx, dy) {
                bitmask |= 1 << (row * 3 + col);
            }
        }
    }

    apply_corner_rule(bitmask)
}

/// Pack a 3x3 grid into a bitmask
pub fn grid_to_bitmask(grid: &BitmaskGrid) -> u16 {
    let mut bitmask = 0;
    for (row, cells) in grid.iter().enumerate() {
        for (col, &set) in cells.iter().enumerate() {
            if set {
                bitmask |= 1 << (row * 3 + col);
            }
        }
    }
    bitmask
}

/// Unpack a bitmask into a 3x3 grid. Bits above 8 are ignored.
pub fn bitmask_to_grid(bitmask: u16) -> BitmaskGrid {
    let mut grid = [[false; 3]; 3];
    for (row, cells) in grid.iter_mut().enumerate() {
        for (col, cell) in cells.iter_mut().enumerate() {
            *cell = bitmask & (1 << (row * 3 + col)) != 0;
        }
    }
    grid
}

/// Flip one cell. Out-of-grid cells leave the mask unchanged.
pub fn toggle_bitmask_cell(bitmask: u16, row: usize, col: usize) -> u16 {
    match cell_bit(row, col) {
        Some(bit) => (bitmask ^ bit) & bits::ALL,
        None => bitmask & bits::ALL,
    }
}

pub fn is_bitmask_cell_set(bitmask: u16, row: usize, col: usize) -> bool {
    cell_bit(row, col).map(|bit| bitmask & bit != 0).unwrap_or(false)
}

/// Number of cells (0..=9) on which two masks agree
pub fn bitmask_similarity(a: u16, b: u16) -> u32 {
    9 - ((a ^ b) & bits::ALL).count_ones()
}
