use std::fs::OpenOptions;
use std::io;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::ptr::{self, NonNull};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::mcu::register::{check_word, Access, RegisterWindow};

/// Size of one page, which is how much of the GPIO block gets mapped.
pub fn page_size() -> usize {
    // SAFETY: sysconf has no memory-safety preconditions.
    match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
        n if n > 0 => n as usize,
        _ => 4096,
    }
}

/// One page of physical memory mapped from a memory device such as `/dev/mem`.
///
/// The file descriptor is closed as soon as the mapping exists; the mapping
/// itself is released by [`DevMem::close`], or on drop if `close` never ran.
#[derive(Debug)]
pub struct DevMem {
    base: Option<NonNull<u8>>,
    len: usize,
    access: Access,
    device: PathBuf,
}

impl DevMem {
    pub fn open(config: &Config, access: Access) -> Result<Self> {
        Self::map(&config.device, config.gpio_base, page_size(), access)
    }

    fn map(device: &Path, phys: u64, len: usize, access: Access) -> Result<Self> {
        let writable = access.contains(Access::WRITE);

        let file = OpenOptions::new()
            .read(true)
            .write(writable)
            .custom_flags(libc::O_SYNC)
            .open(device)
            .map_err(|e| Error::acquire(device, e))?;

        let offset = libc::off_t::try_from(phys).map_err(|_| Error::Io {
            device: device.to_path_buf(),
            source: Arc::new(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("base address {phys:#x} does not fit in off_t"),
            )),
        })?;

        let prot = if writable {
            libc::PROT_READ | libc::PROT_WRITE
        } else {
            libc::PROT_READ
        };

        // SAFETY: a fresh shared mapping is requested at an address of the
        // kernel's choosing; the result is checked before use.
        let addr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                prot,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                offset,
            )
        };
        if addr == libc::MAP_FAILED {
            return Err(Error::acquire(device, io::Error::last_os_error()));
        }
        drop(file);

        info!("mapped {len} bytes of {} at {phys:#x} ({access:?})", device.display());

        Ok(Self {
            base: NonNull::new(addr.cast::<u8>()),
            len,
            access,
            device: device.to_path_buf(),
        })
    }

    /// Releases the mapping, reporting `munmap` failures.
    pub fn close(mut self) -> Result<()> {
        self.unmap()
    }

    fn unmap(&mut self) -> Result<()> {
        let Some(base) = self.base.take() else {
            return Ok(());
        };

        // SAFETY: `base`/`len` came from a successful mmap and are unmapped once.
        if unsafe { libc::munmap(base.as_ptr().cast(), self.len) } != 0 {
            return Err(Error::Io {
                device: self.device.clone(),
                source: Arc::new(io::Error::last_os_error()),
            });
        }

        debug!("unmapped {}", self.device.display());
        Ok(())
    }

    fn word_ptr(&self, offset: usize) -> Result<*mut u32> {
        check_word(offset, self.len)?;
        let base = self.base.ok_or(Error::OutOfRange {
            offset,
            len: 0,
        })?;
        // SAFETY: check_word keeps offset + 4 inside the mapping.
        Ok(unsafe { base.as_ptr().add(offset) }.cast::<u32>())
    }
}

impl RegisterWindow for DevMem {
    fn len(&self) -> usize {
        self.len
    }

    fn read_word(&self, offset: usize) -> Result<u32> {
        let word = self.word_ptr(offset)?;
        // SAFETY: word_ptr returns an aligned, in-bounds pointer into the mapping.
        Ok(u32::from_le(unsafe { ptr::read_volatile(word) }))
    }

    fn write_word(&mut self, offset: usize, value: u32) -> Result<()> {
        if !self.access.contains(Access::WRITE) {
            return Err(Error::ReadOnly);
        }
        let word = self.word_ptr(offset)?;
        // SAFETY: as in read_word, and the mapping was created with PROT_WRITE.
        unsafe { ptr::write_volatile(word, value.to_le()) };
        Ok(())
    }
}

impl Drop for DevMem {
    fn drop(&mut self) {
        if let Err(e) = self.unmap() {
            warn!("{e}");
        }
    }
}
