pub mod buffer;
pub mod devmem;
pub mod fsel;
pub mod gpio;
pub mod register;
