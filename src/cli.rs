use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::info;

use crate::config::{Config, Soc, DEV_MEM};
use crate::error::Result;
use crate::mcu::devmem::DevMem;
use crate::mcu::fsel::FunctionSelect;
use crate::mcu::gpio::{list_functions, pin_function, set_pin_function, PinFunction};
use crate::mcu::register::{Access, RegisterWindow};

#[derive(Parser, Debug)]
#[command(name = "gpio-alt", version)]
#[command(about = "Set or get Raspberry Pi GPIO ALT function", long_about = None)]
pub struct Args {
    /// GPIO number to set/get. Leave blank to list pins 0-31
    #[arg(value_name = "GPIO")]
    pub gpio: Option<u32>,

    /// Function to set: INPUT, OUTPUT or ALT0-ALT5. Leave blank to read back the current function
    #[arg(value_name = "ALT", requires = "gpio")]
    pub alt: Option<String>,

    /// SoC whose GPIO block base address to use
    #[arg(long, value_enum, default_value_t = Soc::Bcm2835, conflicts_with = "base")]
    pub soc: Soc,

    /// Physical base address of the GPIO block (e.g. 0x3F200000), overrides --soc
    #[arg(long, value_parser = parse_address)]
    pub base: Option<u64>,

    /// Memory device to map
    #[arg(long, default_value = DEV_MEM)]
    pub device: PathBuf,

    /// Log more (-v info, -vv register writes, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_address(s: &str) -> core::result::Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

/// What one invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    Get(u32),
    Set(u32, FunctionSelect),
}

impl Command {
    /// Listing and reading only need a read-only mapping.
    pub fn access(&self) -> Access {
        match self {
            Command::List | Command::Get(_) => Access::READ,
            Command::Set(..) => Access::READ | Access::WRITE,
        }
    }
}

impl Args {
    pub fn command(&self) -> Result<Command> {
        Ok(match (self.gpio, self.alt.as_deref()) {
            (Some(pin), Some(alt)) => Command::Set(pin, alt.parse()?),
            (Some(pin), None) => Command::Get(pin),
            (None, _) => Command::List,
        })
    }

    pub fn config(&self) -> Config {
        Config {
            device: self.device.clone(),
            gpio_base: self.base.unwrap_or_else(|| self.soc.gpio_base()),
        }
    }
}

/// Runs `command` against `window`, writing any listing to `out`.
pub fn run<W, O>(command: &Command, window: &mut W, out: &mut O) -> Result<()>
where
    W: RegisterWindow + ?Sized,
    O: Write,
{
    match *command {
        Command::List => {
            for pf in list_functions(window)? {
                writeln!(out, "{pf}")?;
            }
        }
        Command::Get(pin) => {
            let function = pin_function(window, pin)?;
            writeln!(out, "{}", PinFunction { pin, function })?;
        }
        Command::Set(pin, function) => {
            set_pin_function(window, pin, function)?;
            info!("pin {pin} set to {function}");
        }
    }
    Ok(())
}

/// Maps the GPIO block, runs the requested command and unmaps again.
///
/// The function token is checked before the device is opened. The mapping is
/// released whether or not the command succeeded.
pub fn execute(args: &Args) -> Result<()> {
    let command = args.command()?;

    let mut mem = DevMem::open(&args.config(), command.access())?;
    let result = run(&command, &mut mem, &mut io::stdout().lock());
    let closed = mem.close();

    result.and(closed)
}
