//! Packed tile identifiers
//!
//! Every grid cell stores a single [`TileId`]: the sprite position inside a
//! tileset image, the tileset it comes from and two flip flags, packed into
//! one integer. The all-zero value is the empty cell.
//!
//! Layout (`u64`):
//!
//! ```text
//! | unused (22) | flip_y (1) | flip_x (1) | slot (8) | sprite y (16) | sprite x (16) |
//! 63          42     41           40       39      32 31           16 15            0
//! ```
//!
//! The slot field stores `tileset_order + 1`. Slot 0 never comes out of
//! [`TileId::pack`], so sprite (0, 0) of tileset 0 is a real tile and the
//! all-zero bit pattern stays reserved for "no tile".

use serde::{Deserialize, Serialize};
use thiserror::Error;

const X_BITS: u64 = 16;
const Y_BITS: u64 = 16;
const SLOT_BITS: u64 = 8;

const X_SHIFT: u64 = 0;
const Y_SHIFT: u64 = X_BITS;
const SLOT_SHIFT: u64 = X_BITS + Y_BITS;
const FLIP_X_SHIFT: u64 = SLOT_SHIFT + SLOT_BITS;
const FLIP_Y_SHIFT: u64 = FLIP_X_SHIFT + 1;

const X_MASK: u64 = (1 << X_BITS) - 1;
const Y_MASK: u64 = (1 << Y_BITS) - 1;
const SLOT_MASK: u64 = (1 << SLOT_BITS) - 1;
const FLIP_X_BIT: u64 = 1 << FLIP_X_SHIFT;
const FLIP_Y_BIT: u64 = 1 << FLIP_Y_SHIFT;
const USED_BITS: u64 = (1 << (FLIP_Y_SHIFT + 1)) - 1;

/// Largest sprite coordinate (pixels) on either axis
pub const MAX_SPRITE_COORD: u32 = X_MASK as u32;

/// Number of tilesets addressable at once; valid orders are `0..MAX_TILESETS`
pub const MAX_TILESETS: u32 = SLOT_MASK as u32;

/// Errors raised when a tile does not fit the packed layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileIdError {
    #[error("sprite {axis} coordinate {value} exceeds the maximum of {max}")]
    SpriteOutOfRange {
        axis: &'static str,
        value: u32,
        max: u32,
    },
    #[error("tileset order {order} exceeds the maximum of {max}")]
    TilesetOutOfRange { order: u32, max: u32 },
}

/// Unpacked view of a tile identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRef {
    /// Sprite x inside the tileset image
    pub x: u32,
    /// Sprite y inside the tileset image
    pub y: u32,
    /// The tileset's `order`, not its position in any list
    pub tileset_order: u32,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
}

impl TileRef {
    pub fn new(x: u32, y: u32, tileset_order: u32) -> Self {
        Self {
            x,
            y,
            tileset_order,
            flip_x: false,
            flip_y: false,
        }
    }

    /// Pack this reference into a grid value
    pub fn pack(&self) -> Result<TileId, TileIdError> {
        TileId::pack(self.x, self.y, self.tileset_order, self.flip_x, self.flip_y)
    }
}

/// A packed grid-cell value. `TileId::EMPTY` means no tile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TileId(u64);

impl TileId {
    pub const EMPTY: Self = TileId(0);

    /// Pack sprite position, tileset order and flips into one value.
    ///
    /// Out-of-range fields are rejected, never truncated.
    pub fn pack(
        x: u32,
        y: u32,
        tileset_order: u32,
        flip_x: bool,
        flip_y: bool,
    ) -> Result<Self, TileIdError> {
        if x > MAX_SPRITE_COORD {
            return Err(TileIdError::SpriteOutOfRange {
                axis: "x",
                value: x,
                max: MAX_SPRITE_COORD,
            });
        }
        if y > MAX_SPRITE_COORD {
            return Err(TileIdError::SpriteOutOfRange {
                axis: "y",
                value: y,
                max: MAX_SPRITE_COORD,
            });
        }
        if tileset_order >= MAX_TILESETS {
            return Err(TileIdError::TilesetOutOfRange {
                order: tileset_order,
                max: MAX_TILESETS - 1,
            });
        }

        let slot = tileset_order as u64 + 1;
        let mut raw = (x as u64) << X_SHIFT | (y as u64) << Y_SHIFT | slot << SLOT_SHIFT;
        if flip_x {
            raw |= FLIP_X_BIT;
        }
        if flip_y {
            raw |= FLIP_Y_BIT;
        }
        Ok(TileId(raw))
    }

    /// Inverse of [`TileId::pack`]. Returns `None` for the empty cell and for
    /// raw values `pack` can never produce.
    pub fn unpack(self) -> Option<TileRef> {
        if self.0 & !USED_BITS != 0 {
            return None;
        }
        let slot = (self.0 >> SLOT_SHIFT) & SLOT_MASK;
        if slot == 0 {
            return None;
        }
        Some(TileRef {
            x: ((self.0 >> X_SHIFT) & X_MASK) as u32,
            y: ((self.0 >> Y_SHIFT) & Y_MASK) as u32,
            tileset_order: (slot - 1) as u32,
            flip_x: self.0 & FLIP_X_BIT != 0,
            flip_y: self.0 & FLIP_Y_BIT != 0,
        })
    }

    pub const fn from_raw(raw: u64) -> Self {
        TileId(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Tileset order without decoding the rest
    pub fn tileset_order(self) -> Option<u32> {
        self.unpack().map(|r| r.tileset_order)
    }

    /// Same sprite and tileset with the given flips. Empty stays empty.
    pub fn with_flip(self, flip_x: bool, flip_y: bool) -> Self {
        if self.unpack().is_none() {
            return self;
        }
        let mut raw = self.0 & !(FLIP_X_BIT | FLIP_Y_BIT);
        if flip_x {
            raw |= FLIP_X_BIT;
        }
        if flip_y {
            raw |= FLIP_Y_BIT;
        }
        TileId(raw)
    }

    /// Same sprite with the flips cleared
    pub fn unflipped(self) -> Self {
        self.with_flip(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_across_field_extremes() {
        let coords = [0, 1, 16, 255, 4096, MAX_SPRITE_COORD];
        let orders = [0, 1, 31, MAX_TILESETS - 1];
        for &x in &coords {
            for &y in &coords {
                for &order in &orders {
                    for (fx, fy) in [(false, false), (true, false), (false, true), (true, true)] {
                        let id = TileId::pack(x, y, order, fx, fy).unwrap();
                        let r = id.unpack().unwrap();
                        assert_eq!((r.x, r.y, r.tileset_order), (x, y, order));
                        assert_eq!((r.flip_x, r.flip_y), (fx, fy));
                        assert_eq!(r.pack().unwrap(), id);
                    }
                }
            }
        }
    }

    #[test]
    fn test_origin_of_first_tileset_is_not_empty() {
        let id = TileId::pack(0, 0, 0, false, false).unwrap();
        assert!(!id.is_empty());
        assert_ne!(id, TileId::EMPTY);
        assert_eq!(id.unpack(), Some(TileRef::new(0, 0, 0)));
    }

    #[test]
    fn test_empty_does_not_unpack() {
        assert_eq!(TileId::EMPTY.unpack(), None);
        assert!(TileId::default().is_empty());
        // flip bits without a slot are not a valid tile either
        assert_eq!(TileId::from_raw(FLIP_X_BIT).unpack(), None);
        assert_eq!(TileId::from_raw(1 << 50).unpack(), None);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert_eq!(
            TileId::pack(MAX_SPRITE_COORD + 1, 0, 0, false, false),
            Err(TileIdError::SpriteOutOfRange {
                axis: "x",
                value: MAX_SPRITE_COORD + 1,
                max: MAX_SPRITE_COORD,
            })
        );
        assert!(matches!(
            TileId::pack(0, 70_000, 0, false, false),
            Err(TileIdError::SpriteOutOfRange { axis: "y", .. })
        ));
        assert!(matches!(
            TileId::pack(0, 0, MAX_TILESETS, false, false),
            Err(TileIdError::TilesetOutOfRange { .. })
        ));
    }

    #[test]
    fn test_with_flip_keeps_sprite() {
        let id = TileId::pack(32, 48, 3, false, false).unwrap();
        let flipped = id.with_flip(true, true);
        let r = flipped.unpack().unwrap();
        assert!(r.flip_x && r.flip_y);
        assert_eq!((r.x, r.y, r.tileset_order), (32, 48, 3));
        assert_eq!(flipped.unflipped(), id);
        assert_eq!(TileId::EMPTY.with_flip(true, false), TileId::EMPTY);
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let id = TileId::pack(16, 0, 0, false, false).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.raw().to_string());
        let back: TileId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
