// Rust Bech32m Library
// Written by
//   The Bech32m developers
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication
// along with this software.
// If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.
//

//! Codec errors
//!

use std::error;
use std::fmt;

/// Encoding or decoding error.
///
/// Every failure aborts the whole encode or decode call; there is no partial
/// output and no recovery. The variants carry the offending value where one
/// exists so callers can surface it directly to the end user.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Witness version must be 0 to 16 inclusive.
    InvalidWitnessVersion(u8),
    /// The witness program must be between 2 and 40 bytes in length, and
    /// exactly 20 or 32 bytes for version 0.
    InvalidProgramSize(usize),
    /// The human-readable part did not match the expected one.
    InvalidPrefix(String),
    /// The string, or the decoded data payload, has an invalid length.
    InvalidLength(usize),
    /// The string is too short to contain an HRP, separator and checksum.
    TooShort(usize),
    /// The string contains both uppercase and lowercase letters.
    MixedCase,
    /// The string does not contain the `'1'` separator.
    MissingSeparator,
    /// The separator is the first character, leaving an empty HRP.
    EmptyHrp,
    /// Fewer than six data characters follow the separator.
    TooShortChecksum,
    /// A character is outside printable ASCII or not in the data alphabet.
    OutOfRangeCharacter(u8),
    /// The checksum does not match the rest of the string.
    InvalidChecksum,
    /// An input value to bit conversion does not fit in the source width.
    InvalidValue(u8),
    /// Bit conversion left non-zero or oversized padding bits.
    InvalidPadding,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidWitnessVersion(ref wver) => {
                write!(f, "invalid witness version: {}", wver)
            }
            Error::InvalidProgramSize(ref len) => {
                write!(f, "invalid witness program length: {}", len)
            }
            Error::InvalidPrefix(ref hrp) => {
                write!(f, "human-readable part \"{}\" does not match the expected prefix", hrp)
            }
            Error::InvalidLength(ref len) => write!(f, "invalid length: {}", len),
            Error::TooShort(ref len) => {
                write!(f, "string of length {} is too short to be well-formed", len)
            }
            Error::MixedCase => write!(f, "mixed-case strings not allowed"),
            Error::MissingSeparator => write!(f, "missing human-readable separator, \"1\""),
            Error::EmptyHrp => write!(f, "human-readable part is empty"),
            Error::TooShortChecksum => {
                write!(f, "fewer than six data characters after the separator")
            }
            Error::OutOfRangeCharacter(ref b) => write!(f, "invalid character (code={})", b),
            Error::InvalidChecksum => write!(f, "invalid checksum"),
            Error::InvalidValue(ref v) => {
                write!(f, "value {} does not fit in the source bit width", v)
            }
            Error::InvalidPadding => write!(f, "invalid padding bits in data payload"),
        }
    }
}

impl error::Error for Error {}
