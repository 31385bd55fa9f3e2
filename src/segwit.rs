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

//! # Segwit Witness Programs
//!
//! The encode/decode state machine stitching together the bit regrouping
//! and checksum layers, plus the [`WitnessProgram`] value type enforcing
//! the witness version and program length rules.
//!

#[cfg(feature = "serde")]
use actual_serde as serde;

use crate::checksum;
use crate::convert::convert_bits;
use crate::error::Error;

/// The 32-character data alphabet; the index of a character is its symbol value.
const CHARSET: [u8; 32] = *b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Reverse lookup from ASCII byte to symbol value, `-1` marking bytes
/// outside the alphabet.
#[rustfmt::skip]
const CHARSET_REV: [i8; 128] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    15, -1, 10, 17, 21, 20, 26, 30,  7,  5, -1, -1, -1, -1, -1, -1,
    -1, 29, -1, 24, 13, 25,  9,  8, 23, -1, 18, 22, 31, 27, 19, -1,
     1,  0,  3, 16, 11, 28, 12, 14,  6,  4,  2, -1, -1, -1, -1, -1,
    -1, 29, -1, 24, 13, 25,  9,  8, 23, -1, 18, 22, 31, 27, 19, -1,
     1,  0,  3, 16, 11, 28, 12, 14,  6,  4,  2, -1, -1, -1, -1, -1,
];

/// Separator between the HRP and the data part.
const SEP: u8 = b'1';

/// Maximum length in bytes of an encoded string.
const MAX_STRING_LENGTH: usize = 90;

/// Maximum number of decoded data symbols, witness version included.
const MAX_DATA_SYMBOLS: usize = 65;

/// A validated segwit witness program: a version and the program bytes.
///
/// Construction through [`WitnessProgram::new`] enforces the version and
/// length rules, so every live value is valid and encodable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WitnessProgram {
    /// The witness version, 0 to 16 inclusive.
    version: u8,
    /// The program payload, 2 to 40 bytes.
    program: Vec<u8>,
}

impl WitnessProgram {
    /// Creates a witness program after validating the version and length rules.
    ///
    /// The version must be 0 to 16 inclusive and the program 2 to 40 bytes
    /// long; a version 0 program must be exactly 20 or 32 bytes.
    pub fn new(version: u8, program: Vec<u8>) -> Result<WitnessProgram, Error> {
        if version > 16 {
            return Err(Error::InvalidWitnessVersion(version));
        }
        if program.len() < 2 || program.len() > 40 {
            return Err(Error::InvalidProgramSize(program.len()));
        }
        if version == 0 && program.len() != 20 && program.len() != 32 {
            return Err(Error::InvalidProgramSize(program.len()));
        }
        Ok(WitnessProgram { version, program })
    }

    /// Returns the witness version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the program payload.
    pub fn program(&self) -> &[u8] {
        &self.program
    }

    /// Consumes the witness program, returning the program payload.
    pub fn into_program(self) -> Vec<u8> {
        self.program
    }
}

/// Encodes a witness program as a bech32m string.
///
/// The HRP is folded to lowercase; it must be non-empty and contain only
/// bytes in the printable ASCII range 33 to 126. The result is at most 90
/// bytes, `hrp` then `'1'` then the version symbol, program and checksum
/// mapped through the data alphabet.
pub fn encode_segwit(hrp: &str, version: u8, program: &[u8]) -> Result<String, Error> {
    let witness = WitnessProgram::new(version, program.to_vec())?;

    if hrp.is_empty() {
        return Err(Error::EmptyHrp);
    }
    let mut hrp_lower = Vec::with_capacity(hrp.len());
    for &b in hrp.as_bytes() {
        if b < 33 || b > 126 {
            return Err(Error::OutOfRangeCharacter(b));
        }
        hrp_lower.push(b.to_ascii_lowercase());
    }

    let mut data = Vec::with_capacity(1 + (witness.program().len() * 8 + 4) / 5);
    data.push(witness.version());
    data.extend_from_slice(&convert_bits(witness.program(), 8, 5, true)?);
    let check = checksum::create_checksum(&hrp_lower, &data);

    let total = hrp_lower.len() + 1 + data.len() + check.len();
    if total > MAX_STRING_LENGTH {
        return Err(Error::InvalidLength(total));
    }

    let mut ret = String::with_capacity(total);
    for &b in &hrp_lower {
        ret.push(char::from(b));
    }
    ret.push(char::from(SEP));
    for &d in data.iter().chain(check.iter()) {
        ret.push(char::from(CHARSET[usize::from(d)]));
    }
    Ok(ret)
}

/// Decodes a bech32m string into its witness program.
///
/// The string must carry the expected HRP (compared case-insensitively; the
/// HRP may itself contain `'1'`, the separator is the last occurrence), a
/// valid bech32m checksum, and a payload satisfying the witness program
/// rules. Either all letters are uppercase or all are lowercase.
pub fn decode_segwit(expected_hrp: &str, s: &str) -> Result<WitnessProgram, Error> {
    let len = s.len();
    if len > MAX_STRING_LENGTH {
        return Err(Error::InvalidLength(len));
    }
    // shortest well-formed string: one HRP byte, separator, checksum
    if len < 8 {
        return Err(Error::TooShort(len));
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut sep_pos = None;
    let mut folded = Vec::with_capacity(len);
    for (n, &b) in s.as_bytes().iter().enumerate() {
        if b < 33 || b > 126 {
            return Err(Error::OutOfRangeCharacter(b));
        }
        if b.is_ascii_uppercase() {
            has_upper = true;
        } else if b.is_ascii_lowercase() {
            has_lower = true;
        }
        let b = b.to_ascii_lowercase();
        if b == SEP {
            sep_pos = Some(n);
        }
        folded.push(b);
    }
    if has_upper && has_lower {
        return Err(Error::MixedCase);
    }
    let sep = match sep_pos {
        None => return Err(Error::MissingSeparator),
        Some(0) => return Err(Error::EmptyHrp),
        Some(n) => n,
    };
    if len - (sep + 1) < 6 {
        return Err(Error::TooShortChecksum);
    }

    let (hrp, data_part) = folded.split_at(sep);
    let mut data = Vec::with_capacity(data_part.len() - 1);
    for &b in &data_part[1..] {
        // b is printable ASCII here, so it indexes the table
        let v = CHARSET_REV[usize::from(b)];
        if v == -1 {
            return Err(Error::OutOfRangeCharacter(b));
        }
        data.push(v as u8); // table entries are 0..=31
    }

    if !checksum::verify_checksum(hrp, &data) {
        return Err(Error::InvalidChecksum);
    }
    data.truncate(data.len() - 6);

    if !hrp.eq_ignore_ascii_case(expected_hrp.as_bytes()) {
        return Err(Error::InvalidPrefix(String::from_utf8_lossy(hrp).into_owned()));
    }
    if data.is_empty() || data.len() > MAX_DATA_SYMBOLS {
        return Err(Error::InvalidLength(data.len()));
    }

    let program = convert_bits(&data[1..], 5, 8, false)?;
    WitnessProgram::new(data[0], program)
}

#[cfg(feature = "serde")]
impl serde::Serialize for WitnessProgram {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut st = serializer.serialize_struct("WitnessProgram", 2)?;
        st.serialize_field("version", &self.version)?;
        st.serialize_field("program", &self.program)?;
        st.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for WitnessProgram {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use std::fmt;

        use serde::de;

        const FIELDS: &[&str] = &["version", "program"];

        enum Field {
            Version,
            Program,
        }

        impl<'de> serde::Deserialize<'de> for Field {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                struct FieldVisitor;
                impl<'de> de::Visitor<'de> for FieldVisitor {
                    type Value = Field;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        formatter.write_str("`version` or `program`")
                    }

                    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
                    where
                        E: de::Error,
                    {
                        match v {
                            "version" => Ok(Field::Version),
                            "program" => Ok(Field::Program),
                            _ => Err(de::Error::unknown_field(v, FIELDS)),
                        }
                    }
                }
                deserializer.deserialize_identifier(FieldVisitor)
            }
        }

        struct Visitor;
        impl<'de> de::Visitor<'de> for Visitor {
            type Value = WitnessProgram;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a segwit witness program")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let version = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let program = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                WitnessProgram::new(version, program).map_err(de::Error::custom)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut version: Option<u8> = None;
                let mut program: Option<Vec<u8>> = None;
                while let Some(key) = map.next_key()? {
                    match key {
                        Field::Version => {
                            if version.is_some() {
                                return Err(de::Error::duplicate_field("version"));
                            }
                            version = Some(map.next_value()?);
                        }
                        Field::Program => {
                            if program.is_some() {
                                return Err(de::Error::duplicate_field("program"));
                            }
                            program = Some(map.next_value()?);
                        }
                    }
                }
                let version = version.ok_or_else(|| de::Error::missing_field("version"))?;
                let program = program.ok_or_else(|| de::Error::missing_field("program"))?;
                WitnessProgram::new(version, program).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_struct("WitnessProgram", FIELDS, Visitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_conservative::FromHex;

    fn roundtrips(hrp: &str, version: u8, program: &[u8], s: &str) {
        assert_eq!(
            encode_segwit(hrp, version, program).as_deref(),
            Ok(s),
            "encode failed for {}",
            s,
        );
        let witness = decode_segwit(hrp, s).expect("decode failed");
        assert_eq!(witness.version(), version, "version mismatch for {}", s);
        assert_eq!(witness.program(), program, "program mismatch for {}", s);
    }

    #[test]
    fn reference_vectors() {
        // vectors: (hrp, version, program, encoding)
        let vectors = [
            (
                "bc",
                1,
                "0000000000000000000000000000000000000000000000000000000000000000",
                "bc1pqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqpqqenm",
            ),
            (
                "bc",
                1,
                "751e76e8199196d454941c45d1b3a323f1433bd6751e76e8199196d454941c45d1b3a323f1433bd6",
                "bc1pw508d6qejxtdg4y5r3zarvary0c5xw7kw508d6qejxtdg4y5r3zarvary0c5xw7kt5nd6y",
            ),
            ("bc", 16, "751e", "bc1sw50qgdz25j"),
            ("bc", 2, "751e76e8199196d454941c45d1b3a323", "bc1zw508d6qejxtdg4y5r3zarvaryvaxxpcs"),
            (
                "tb",
                1,
                "000000c4a5cad46221b2a187905e5266362b99d5e91c6ce24d165dab93e86433",
                "tb1pqqqqp399et2xygdj5xreqhjjvcmzhxw4aywxecjdzew6hylgvsesf3hn0c",
            ),
            (
                "bc",
                1,
                "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
                "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqzk5jj0",
            ),
        ];

        for &(hrp, version, program, s) in &vectors {
            let program = Vec::<u8>::from_hex(program).unwrap();
            roundtrips(hrp, version, &program, s);
        }
    }

    #[test]
    fn separator_is_last_occurrence() {
        // the HRP may itself contain '1'
        roundtrips("a1b", 3, &[1, 2, 3, 4], "a1b1rqypqxpqtyl7xk");
    }

    #[test]
    fn case_folding() {
        let lower = encode_segwit("bc", 1, &[0; 32]).unwrap();
        assert_eq!(encode_segwit("BC", 1, &[0; 32]).unwrap(), lower);

        let upper = lower.to_uppercase();
        assert_eq!(decode_segwit("bc", &upper).unwrap(), decode_segwit("bc", &lower).unwrap());
        assert_eq!(decode_segwit("BC", &lower).unwrap(), decode_segwit("bc", &lower).unwrap());

        let mut mixed = lower;
        let last = mixed.pop().unwrap();
        mixed.push(last.to_ascii_uppercase());
        assert_eq!(decode_segwit("bc", &mixed).unwrap_err(), Error::MixedCase);
    }

    #[test]
    fn decode_rejects_malformed_strings() {
        // vectors: (expected hrp, string, error)
        let invalid = [
            ("bc", "a1qqqqq", Error::TooShort(7)),
            ("bc", "qqqqqqqq", Error::MissingSeparator),
            ("bc", "1qqqqqqq", Error::EmptyHrp),
            ("bc", "bc1qqqqq", Error::TooShortChecksum),
            ("y", "y1b0jsk6g", Error::OutOfRangeCharacter(b'b')),
            ("bc", "bc 1qqqqqqq", Error::OutOfRangeCharacter(b' ')),
            ("bc", "bc\u{7f}1qqqqqqq", Error::OutOfRangeCharacter(0x7f)),
            ("bc", "bc1qqqqqqq", Error::InvalidChecksum),
            // bech32 (constant 1) strings do not verify against the bech32m constant
            ("bc", "BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4", Error::InvalidChecksum),
            (
                "tb",
                "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7",
                Error::InvalidChecksum,
            ),
            // valid checksum over an empty data part leaves nothing for the witness
            ("bc", "bc1a8xfp7", Error::InvalidLength(0)),
            ("a", "a1lqfn3a", Error::InvalidLength(0)),
            // crafted: valid checksum, witness version 17
            (
                "bc",
                "bc13qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq0hg8yd",
                Error::InvalidWitnessVersion(17),
            ),
            // crafted: valid checksum, one-byte program
            ("bc", "bc1pq592tjmp", Error::InvalidProgramSize(1)),
            // crafted: valid checksum, non-zero padding bits
            ("bc", "bc1pqpzh4eu6", Error::InvalidPadding),
            // crafted: valid checksum, version 0 with a 21-byte program
            (
                "bc",
                "bc1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq8e34ap",
                Error::InvalidProgramSize(21),
            ),
        ];

        for &(hrp, s, ref want) in &invalid {
            let got = decode_segwit(hrp, s).unwrap_err();
            assert_eq!(&got, want, "vector: {}", s);
        }
    }

    #[test]
    fn decode_checks_prefix_after_checksum() {
        let s = encode_segwit("bc", 1, &[0; 32]).unwrap();
        assert_eq!(
            decode_segwit("tb", &s).unwrap_err(),
            Error::InvalidPrefix("bc".to_string()),
        );
        // a corrupted string reports the checksum, not the prefix
        let mut corrupt = s.into_bytes();
        corrupt[4] = b'z';
        let corrupt = String::from_utf8(corrupt).unwrap();
        assert_eq!(decode_segwit("tb", &corrupt).unwrap_err(), Error::InvalidChecksum);
    }

    #[test]
    fn encode_validates_inputs() {
        assert_eq!(
            encode_segwit("bc", 17, &[0; 32]).unwrap_err(),
            Error::InvalidWitnessVersion(17),
        );
        assert_eq!(encode_segwit("bc", 1, &[0; 41]).unwrap_err(), Error::InvalidProgramSize(41));
        assert_eq!(encode_segwit("bc", 1, &[0; 1]).unwrap_err(), Error::InvalidProgramSize(1));
        assert_eq!(encode_segwit("bc", 0, &[0; 21]).unwrap_err(), Error::InvalidProgramSize(21));
        assert!(encode_segwit("bc", 0, &[0; 20]).is_ok());
        assert!(encode_segwit("bc", 0, &[0; 32]).is_ok());
        assert_eq!(encode_segwit("", 1, &[0; 32]).unwrap_err(), Error::EmptyHrp);
        assert_eq!(
            encode_segwit("b c", 1, &[0; 32]).unwrap_err(),
            Error::OutOfRangeCharacter(b' '),
        );
        // 84-byte HRP pushes the total length past 90
        let hrp = "x".repeat(84);
        assert_eq!(
            encode_segwit(&hrp, 0, &[0; 20]).unwrap_err(),
            Error::InvalidLength(84 + 1 + 33 + 6),
        );
    }

    #[test]
    fn witness_program_rules() {
        assert!(WitnessProgram::new(0, vec![0; 20]).is_ok());
        assert!(WitnessProgram::new(0, vec![0; 32]).is_ok());
        assert_eq!(
            WitnessProgram::new(0, vec![0; 25]).unwrap_err(),
            Error::InvalidProgramSize(25),
        );
        assert!(WitnessProgram::new(16, vec![0; 2]).is_ok());
        assert!(WitnessProgram::new(1, vec![0; 40]).is_ok());
        assert_eq!(
            WitnessProgram::new(17, vec![0; 20]).unwrap_err(),
            Error::InvalidWitnessVersion(17),
        );

        let witness = WitnessProgram::new(5, vec![7; 11]).unwrap();
        assert_eq!(witness.version(), 5);
        assert_eq!(witness.program(), &[7; 11][..]);
        assert_eq!(witness.into_program(), vec![7; 11]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn witness_program_serde() {
        use serde_test::{assert_tokens, Token};

        let witness = WitnessProgram::new(16, vec![0x75, 0x1e]).unwrap();
        assert_tokens(
            &witness,
            &[
                Token::Struct { name: "WitnessProgram", len: 2 },
                Token::Str("version"),
                Token::U8(16),
                Token::Str("program"),
                Token::Seq { len: Some(2) },
                Token::U8(0x75),
                Token::U8(0x1e),
                Token::SeqEnd,
                Token::StructEnd,
            ],
        );

        // deserialization re-validates
        let bad: Result<WitnessProgram, _> =
            serde_json::from_str("{\"version\":17,\"program\":[1,2,3]}");
        assert!(bad.is_err());
    }
}
