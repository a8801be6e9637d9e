use core::fmt;

use log::debug;

use crate::config::PIN_COUNT;
use crate::error::{Error, Result};
use crate::mcu::fsel::FunctionSelect;
use crate::mcu::register::{read_reg_gpio_fsel, write_reg_gpio_fsel, RegisterWindow, WORD_SIZE};
use crate::{BIT_MASK_LEN, GET_FLD, SET_FLD_V};

/// Bits per function select field.
pub const FSEL_WIDTH: u32 = 3;
/// Function select fields packed into one register.
pub const PINS_PER_REGISTER: u32 = 10;
pub const FSEL_MASK: u32 = BIT_MASK_LEN!(FSEL_WIDTH);

/// Location of a pin's function select field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinDescriptor {
    /// Byte offset of the containing GPFSEL register.
    pub register_offset: usize,
    pub bit_shift: u32,
    pub bit_mask: u32,
}

/// Computes where the FSEL field of `pin` lives.
///
/// No range check: a pin past the mapped window fails later, at the window's
/// bounds check.
pub fn describe(pin: u32) -> PinDescriptor {
    let bit_shift = (pin % PINS_PER_REGISTER) * FSEL_WIDTH;
    PinDescriptor {
        register_offset: (pin / PINS_PER_REGISTER) as usize * WORD_SIZE,
        bit_shift,
        bit_mask: FSEL_MASK << bit_shift,
    }
}

/// Reads the raw 3-bit function select value of `pin`.
pub fn get_function<W: RegisterWindow + ?Sized>(window: &W, pin: u32) -> Result<u8> {
    let pd = describe(pin);
    let word = read_reg_gpio_fsel(window, pd.register_offset)?;
    Ok(GET_FLD!(word, pd.bit_mask, pd.bit_shift) as u8)
}

/// Sets the function select field of `pin` to `value`.
///
/// Read-modify-write of the containing register: the other nine fields in the
/// word are written back unchanged. Not atomic against other writers.
pub fn set_function<W: RegisterWindow + ?Sized>(window: &mut W, pin: u32, value: u8) -> Result<()> {
    let pd = describe(pin);

    let mut word = read_reg_gpio_fsel(window, pd.register_offset)?;
    let orig = word;
    SET_FLD_V!(word, pd.bit_mask, pd.bit_shift, value as u32);

    debug!(
        "GPFSEL{} {orig:#010x} -> {word:#010x} (pin {pin} = {value})",
        pd.register_offset / WORD_SIZE
    );

    write_reg_gpio_fsel(window, word, pd.register_offset)
}

pub fn pin_function<W: RegisterWindow + ?Sized>(window: &W, pin: u32) -> Result<FunctionSelect> {
    let bits = get_function(window, pin)?;
    FunctionSelect::from_bits(bits).ok_or(Error::InvalidField(bits))
}

pub fn set_pin_function<W: RegisterWindow + ?Sized>(
    window: &mut W,
    pin: u32,
    function: FunctionSelect,
) -> Result<()> {
    set_function(window, pin, function.bits())
}

/// A pin and its current function; displays as a listing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFunction {
    pub pin: u32,
    pub function: FunctionSelect,
}

impl fmt::Display for PinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PIN {}: {}", self.pin, self.function)
    }
}

/// Functions of pins `0..PIN_COUNT`.
pub fn list_functions<W: RegisterWindow + ?Sized>(
    window: &W,
) -> Result<heapless::Vec<PinFunction, PIN_COUNT>> {
    let mut pins = heapless::Vec::new();
    for pin in 0..PIN_COUNT as u32 {
        let function = pin_function(window, pin)?;
        // capacity is PIN_COUNT, so this never overflows
        let _ = pins.push(PinFunction { pin, function });
    }
    Ok(pins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcu::buffer::BufferWindow;
    use crate::mcu::fsel::{encode, FSEL_VALUES};

    #[mry::mry]
    struct RecordingWindow {}

    #[mry::mry]
    impl RegisterWindow for RecordingWindow {
        fn len(&self) -> usize {
            4096
        }

        fn read_word(&self, offset: usize) -> Result<u32> {
            Ok(0)
        }

        fn write_word(&mut self, offset: usize, value: u32) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_describe_formula() {
        let cases = [(0, 0, 0), (9, 0, 27), (10, 4, 0), (21, 8, 3), (31, 12, 3)];

        for (pin, offset, shift) in cases {
            let pd = describe(pin);
            assert_eq!(pd.register_offset, offset, "pin {pin}");
            assert_eq!(pd.bit_shift, shift, "pin {pin}");
            assert_eq!(pd.bit_mask, 0b111 << shift, "pin {pin}");
            assert!(pd.bit_shift + FSEL_WIDTH <= 32);
        }
    }

    /// Tests the set_function read-modify-write sequence.
    ///
    /// Pin 21 lives in GPFSEL2 (offset 8) at bit 3. The register already holds
    /// values for pins 20 and 22..29, plus a stale value for pin 21; exactly one
    /// read and one write at offset 8 must happen, and only bits 3..5 change.
    #[test]
    fn test_set_function_rmw() {
        let mut window = mry::new!(RecordingWindow {});
        let existing = 0x3fff_fffd; // pin 21 field = 0b111, pin 20 = 0b101
        let expected = (existing & !(0b111 << 3)) | (3 << 3);

        window.mock_read_word(8).returns(Ok(existing));
        window.mock_write_word(8, expected).returns(Ok(()));

        set_function(&mut window, 21, 3).unwrap();

        window.mock_read_word(8).assert_called(1);
        window.mock_write_word(8, expected).assert_called(1);
    }

    #[test]
    fn test_get_function_masks_neighbours() {
        let mut window = mry::new!(RecordingWindow {});
        // pin 19 field = 0b110, every other field in GPFSEL1 = 0b111
        window.mock_read_word(4).returns(Ok(0x3fff_ffff & !(0b001 << 27)));

        assert_eq!(get_function(&window, 19).unwrap(), 6);
        assert_eq!(pin_function(&window, 19).unwrap(), FunctionSelect::Alt2);
        window.mock_read_word(4).assert_called(2);
    }

    #[test]
    fn test_set_function_read_failure_skips_write() {
        let mut window = mry::new!(RecordingWindow {});
        window
            .mock_read_word(mry::Any)
            .returns(Err(Error::OutOfRange { offset: 4096, len: 4096 }));
        window.mock_write_word(mry::Any, mry::Any).returns(Ok(()));

        assert!(set_function(&mut window, 10240, 1).is_err());

        window.mock_write_word(mry::Any, mry::Any).assert_called(0);
    }

    #[test]
    fn test_round_trip_all_pins_and_values() {
        let mut window = BufferWindow::new(4096);

        for pin in 0..32 {
            for value in 0..8 {
                set_function(&mut window, pin, value).unwrap();
                assert_eq!(get_function(&window, pin).unwrap(), value, "pin {pin}");
            }
        }
    }

    #[test]
    fn test_set_preserves_register_neighbours() {
        let mut window = BufferWindow::new(4096);

        for p0 in 0..30u32 {
            for p1 in (p0 / 10 * 10)..(p0 / 10 * 10 + 10) {
                if p1 == p0 {
                    continue;
                }
                set_function(&mut window, p1, 5).unwrap();
                set_function(&mut window, p0, 2).unwrap();
                assert_eq!(get_function(&window, p1).unwrap(), 5, "p0 {p0} p1 {p1}");
                set_function(&mut window, p0, 7).unwrap();
                assert_eq!(get_function(&window, p1).unwrap(), 5, "p0 {p0} p1 {p1}");
            }
        }
    }

    #[test]
    fn test_alt4_on_pin_21_of_zero_window() {
        let mut window = BufferWindow::new(4096);

        set_function(&mut window, 21, encode("ALT4").unwrap()).unwrap();

        assert_eq!(get_function(&window, 21).unwrap(), 3);
        assert_eq!(window.read_word(8).unwrap(), 0b011_000);
        assert!(window
            .as_bytes()
            .iter()
            .enumerate()
            .all(|(i, b)| i == 8 || *b == 0));
    }

    #[test]
    fn test_list_zero_window_is_all_input() {
        let window = BufferWindow::new(4096);

        let pins = list_functions(&window).unwrap();

        assert_eq!(pins.len(), 32);
        for (i, pf) in pins.iter().enumerate() {
            assert_eq!(pf.pin as usize, i);
            assert_eq!(pf.function, FunctionSelect::Input);
        }
        assert_eq!(pins[7].to_string(), "PIN 7: INPUT");
    }

    #[test]
    fn test_typed_set_and_get() {
        let mut window = BufferWindow::new(4096);

        for function in FSEL_VALUES {
            set_pin_function(&mut window, 14, function).unwrap();
            assert_eq!(pin_function(&window, 14).unwrap(), function);
        }
    }

    #[test]
    fn test_pin_outside_window_is_out_of_range() {
        let mut window = BufferWindow::new(4096);

        // pin 10240 -> offset 4096, first word past the page
        assert!(matches!(
            get_function(&window, 10240),
            Err(Error::OutOfRange { offset: 4096, .. })
        ));
        assert!(matches!(
            set_function(&mut window, 10240, 1),
            Err(Error::OutOfRange { .. })
        ));
        assert!(get_function(&window, 10239).is_ok());
    }
}
