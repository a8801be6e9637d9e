//! Get or set the function select (ALT) mode of Raspberry Pi GPIO pins by
//! mapping the GPIO register block from `/dev/mem`.
//!
//! See the BCM2835 ARM Peripherals datasheet, section 6.1, for the GPFSEL
//! register layout.

pub mod cli;
pub mod common;
pub mod config;
pub mod error;
pub mod logger;
pub mod mcu;

pub use config::{Config, Soc, PIN_COUNT};
pub use error::{Error, Result};
pub use mcu::buffer::BufferWindow;
pub use mcu::devmem::DevMem;
pub use mcu::fsel::{decode, encode, FunctionSelect};
pub use mcu::gpio::{
    describe, get_function, list_functions, pin_function, set_function, set_pin_function,
    PinDescriptor, PinFunction,
};
pub use mcu::register::{Access, RegisterWindow};
