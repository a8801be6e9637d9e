use core::fmt;
use core::str::FromStr;

use const_format::formatcp;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::error::{Error, Result};

pub const INPUT: &str = "INPUT";
pub const OUTPUT: &str = "OUTPUT";
pub const ALT0: &str = "ALT0";
pub const ALT1: &str = "ALT1";
pub const ALT2: &str = "ALT2";
pub const ALT3: &str = "ALT3";
pub const ALT4: &str = "ALT4";
pub const ALT5: &str = "ALT5";

pub const VALID_CHOICES: &str = formatcp!(
    "{}, {}, {}, {}, {}, {}, {}, {}",
    INPUT,
    OUTPUT,
    ALT0,
    ALT1,
    ALT2,
    ALT3,
    ALT4,
    ALT5
);

/// GPIO function select (FSEL) field value.
///
/// The hardware encoding is not in ALT order: ALT0..ALT3 occupy 4..7 and
/// ALT4/ALT5 sit at 3 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum FunctionSelect {
    Input = 0,
    Output = 1,
    Alt5 = 2,
    Alt4 = 3,
    Alt0 = 4,
    Alt1 = 5,
    Alt2 = 6,
    Alt3 = 7,
}

/// Every function, indexed by its field value.
pub const FSEL_VALUES: [FunctionSelect; 8] = [
    FunctionSelect::Input,
    FunctionSelect::Output,
    FunctionSelect::Alt5,
    FunctionSelect::Alt4,
    FunctionSelect::Alt0,
    FunctionSelect::Alt1,
    FunctionSelect::Alt2,
    FunctionSelect::Alt3,
];

impl FunctionSelect {
    pub fn from_bits(value: u8) -> Option<Self> {
        FromPrimitive::from_u8(value)
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            FunctionSelect::Input => INPUT,
            FunctionSelect::Output => OUTPUT,
            FunctionSelect::Alt5 => ALT5,
            FunctionSelect::Alt4 => ALT4,
            FunctionSelect::Alt0 => ALT0,
            FunctionSelect::Alt1 => ALT1,
            FunctionSelect::Alt2 => ALT2,
            FunctionSelect::Alt3 => ALT3,
        }
    }
}

impl FromStr for FunctionSelect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FSEL_VALUES
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidArgument(s.to_string()))
    }
}

impl fmt::Display for FunctionSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a function name (any case) to its field value.
pub fn encode(name: &str) -> Result<u8> {
    name.parse::<FunctionSelect>().map(FunctionSelect::bits)
}

/// Maps a field value to its function name; `None` above 7.
pub fn decode(value: u8) -> Option<&'static str> {
    FunctionSelect::from_bits(value).map(FunctionSelect::name)
}
