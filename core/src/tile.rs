use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::types::Direction;

bitflags! {
    /// Bit-packed state of a single cell: the low nibble holds one
    /// stub-presence flag per direction, the high nibble the matching
    /// powered flags. A powered bit without its presence bit is malformed;
    /// the propagator never trusts powered bits and rebuilds them from
    /// scratch.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Tile: u8 {
        const UP = 1;
        const RIGHT = 1 << 1;
        const DOWN = 1 << 2;
        const LEFT = 1 << 3;
        const UP_POWERED = 1 << 4;
        const RIGHT_POWERED = 1 << 5;
        const DOWN_POWERED = 1 << 6;
        const LEFT_POWERED = 1 << 7;
    }
}

impl Tile {
    const STUB_MASK: u8 = 0x0f;
    const POWERED_MASK: u8 = 0xf0;

    /// The presence flag for a stub pointing in `dir`.
    pub const fn stub(dir: Direction) -> Self {
        match dir {
            Direction::Up => Self::UP,
            Direction::Right => Self::RIGHT,
            Direction::Down => Self::DOWN,
            Direction::Left => Self::LEFT,
        }
    }

    /// The powered flag for the stub pointing in `dir`.
    pub const fn powered(dir: Direction) -> Self {
        match dir {
            Direction::Up => Self::UP_POWERED,
            Direction::Right => Self::RIGHT_POWERED,
            Direction::Down => Self::DOWN_POWERED,
            Direction::Left => Self::LEFT_POWERED,
        }
    }

    pub const fn has_stub(self, dir: Direction) -> bool {
        self.bits() & Self::stub(dir).bits() != 0
    }

    pub const fn is_powered(self, dir: Direction) -> bool {
        self.bits() & Self::powered(dir).bits() != 0
    }

    pub const fn stub_count(self) -> u32 {
        (self.bits() & Self::STUB_MASK).count_ones()
    }

    /// Whether any stub of this cell currently carries power.
    pub const fn is_energized(self) -> bool {
        self.bits() & Self::POWERED_MASK != 0
    }

    /// Drops every powered flag, keeping the stubs.
    #[must_use]
    pub const fn unpowered(self) -> Self {
        Self::from_bits_retain(self.bits() & Self::STUB_MASK)
    }

    /// Remaps both nibbles one quarter turn clockwise: up to right, right to
    /// down, down to left, left to up. Four applications are the identity and
    /// the number of set presence bits never changes.
    #[must_use]
    pub const fn rotated(self) -> Self {
        let stubs = self.bits() & Self::STUB_MASK;
        let powered = (self.bits() & Self::POWERED_MASK) >> 4;
        let stubs = ((stubs << 1) | (stubs >> 3)) & Self::STUB_MASK;
        let powered = ((powered << 1) | (powered >> 3)) & Self::STUB_MASK;
        Self::from_bits_retain(stubs | (powered << 4))
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::empty()
    }
}
