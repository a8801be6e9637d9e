use std::path::PathBuf;

pub const DEV_MEM: &str = "/dev/mem";

// GPIO register block physical base, per SoC
pub const GPIO_REGS_BCM2835: u64 = 0x2020_0000; // Pi 1, Zero
pub const GPIO_REGS_BCM2836: u64 = 0x3F20_0000; // Pi 2, Pi 3
pub const GPIO_REGS_BCM2711: u64 = 0xFE20_0000; // Pi 4

/// Pins reported when listing.
pub const PIN_COUNT: usize = 32;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Soc {
    #[default]
    Bcm2835,
    Bcm2836,
    Bcm2711,
}

impl Soc {
    pub const fn gpio_base(self) -> u64 {
        match self {
            Soc::Bcm2835 => GPIO_REGS_BCM2835,
            Soc::Bcm2836 => GPIO_REGS_BCM2836,
            Soc::Bcm2711 => GPIO_REGS_BCM2711,
        }
    }
}

/// Where the GPIO register block lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub device: PathBuf,
    pub gpio_base: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEV_MEM),
            gpio_base: Soc::default().gpio_base(),
        }
    }
}
