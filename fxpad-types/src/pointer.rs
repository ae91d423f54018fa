//! Pointer button state and operations.
//!
//! Button masks for pointer action steps, supporting up to 8 buttons.
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use bitfield_struct::bitfield;

/// Pointer buttons
#[bitfield(u8, order = Lsb, defmt = cfg(feature = "defmt"))]
#[derive(Eq, PartialEq)]
pub struct PointerButtons {
    #[bits(1)]
    pub button1: bool, //left
    #[bits(1)]
    pub button2: bool, //right
    #[bits(1)]
    pub button3: bool, //middle
    #[bits(1)]
    pub button4: bool,
    #[bits(1)]
    pub button5: bool,
    #[bits(1)]
    pub button6: bool,
    #[bits(1)]
    pub button7: bool,
    #[bits(1)]
    pub button8: bool,
}

impl BitOr for PointerButtons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() | rhs.into_bits())
    }
}
impl BitAnd for PointerButtons {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() & rhs.into_bits())
    }
}
impl Not for PointerButtons {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::from_bits(!self.into_bits())
    }
}
impl BitAndAssign for PointerButtons {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}
impl BitOrAssign for PointerButtons {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl PointerButtons {
    pub const BUTTON1: Self = Self::new().with_button1(true);
    pub const BUTTON2: Self = Self::new().with_button2(true);
    pub const BUTTON3: Self = Self::new().with_button3(true);
    pub const BUTTON4: Self = Self::new().with_button4(true);
    pub const BUTTON5: Self = Self::new().with_button5(true);
    pub const BUTTON6: Self = Self::new().with_button6(true);
    pub const BUTTON7: Self = Self::new().with_button7(true);
    pub const BUTTON8: Self = Self::new().with_button8(true);

    /// No button pressed.
    pub const fn none() -> Self {
        Self::new()
    }

    /// Whether any button is pressed.
    pub fn any(&self) -> bool {
        self.into_bits() != 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn masks_combine() {
        let both = PointerButtons::BUTTON1 | PointerButtons::BUTTON2;
        assert_eq!(both.into_bits(), 0x03);
        assert!(both.any());
        assert!(!PointerButtons::none().any());
        assert_eq!((both & !PointerButtons::BUTTON1).into_bits(), 0x02);
    }
}
