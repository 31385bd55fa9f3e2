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

//! # Rust Bech32m Library
//!
//! Encoding and decoding of segwit witness programs as bech32m strings,
//! as specified by [BIP-350].
//!
//! A bech32m string is a human-readable part (HRP), a `'1'` separator, and a
//! data part written in a 32-character alphabet, the last six characters of
//! which are a BCH-style checksum over the whole string. The checksum detects
//! any single-character transcription error. Only the bech32m checksum
//! constant is supported; strings checksummed with the original [BIP-173]
//! bech32 constant do not verify.
//!
//! The two entry points are [`encode_segwit`] and [`decode_segwit`], which
//! are mutually inverse for every valid witness program:
//!
//! ```
//! let s = bech32m::encode_segwit("bc", 1, &[0x33; 32]).unwrap();
//! let witness = bech32m::decode_segwit("bc", &s).unwrap();
//! assert_eq!(witness.version(), 1);
//! assert_eq!(witness.program(), &[0x33; 32][..]);
//! ```
//!
//! [BIP-173]: <https://github.com/bitcoin/bips/blob/master/bip-0173.mediawiki>
//! [BIP-350]: <https://github.com/bitcoin/bips/blob/master/bip-0350.mediawiki>
//!

// Coding conventions
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(missing_docs)]

pub mod checksum;
pub mod convert;
mod error;
pub mod segwit;

// export everything at the top level so it can be used as `bech32m::encode_segwit` etc.
pub use crate::convert::convert_bits;
pub use crate::error::Error;
pub use crate::segwit::{decode_segwit, encode_segwit, WitnessProgram};
