use crate::error::Result;
use crate::mcu::register::{check_word, RegisterWindow, WORD_SIZE};

/// Register window backed by an in-memory byte buffer.
///
/// Stands in for the hardware block when simulating or testing; bytes are
/// laid out exactly as the device would expose them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferWindow {
    bytes: Vec<u8>,
}

impl BufferWindow {
    /// Zero-filled window of `len` bytes.
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl RegisterWindow for BufferWindow {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn read_word(&self, offset: usize) -> Result<u32> {
        check_word(offset, self.bytes.len())?;
        let raw: u32 = bytemuck::pod_read_unaligned(&self.bytes[offset..offset + WORD_SIZE]);
        Ok(u32::from_le(raw))
    }

    fn write_word(&mut self, offset: usize, value: u32) -> Result<()> {
        check_word(offset, self.bytes.len())?;
        self.bytes[offset..offset + WORD_SIZE].copy_from_slice(bytemuck::bytes_of(&value.to_le()));
        Ok(())
    }
}
