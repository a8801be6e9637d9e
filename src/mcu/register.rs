use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::BIT;

/// Width in bytes of one GPIO register.
pub const WORD_SIZE: usize = 4;

/****************************************************
 gpio function select regs: begin  addr : 0x00
 GPFSEL0..GPFSEL5, ten pins per register
 *****************************************************/
pub const GPFSEL0: usize = 0x00;

bitflags! {
    /// How a register window is opened.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Access: u8 {
        const READ = BIT!(0);
        const WRITE = BIT!(1);
    }
}

/// A mapped block of 32-bit little-endian hardware registers.
pub trait RegisterWindow {
    /// Mapped length in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_word(&self, offset: usize) -> Result<u32>;

    fn write_word(&mut self, offset: usize, value: u32) -> Result<()>;
}

/// Checks that a whole word at `offset` lies inside a window of `len` bytes
/// and is word aligned.
pub fn check_word(offset: usize, len: usize) -> Result<()> {
    match offset.checked_add(WORD_SIZE) {
        Some(end) if end <= len => {}
        _ => return Err(Error::OutOfRange { offset, len }),
    }

    if offset % WORD_SIZE != 0 {
        return Err(Error::Misaligned(offset));
    }

    Ok(())
}

#[macro_export]
macro_rules! regrw_idx {
    ( $x:ident, $a:expr ) => {
        paste::paste! {
            pub fn [<read_ $x>]<W: $crate::mcu::register::RegisterWindow + ?Sized>(
                window: &W,
                i: usize,
            ) -> $crate::error::Result<u32> {
                window.read_word(i.saturating_add($a))
            }

            pub fn [<write_ $x>]<W: $crate::mcu::register::RegisterWindow + ?Sized>(
                window: &mut W,
                value: u32,
                i: usize,
            ) -> $crate::error::Result<()> {
                window.write_word(i.saturating_add($a), value)
            }
        }
    };
}

regrw_idx!(reg_gpio_fsel, GPFSEL0);
