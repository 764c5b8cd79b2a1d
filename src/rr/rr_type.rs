// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Provides the [`Type`] structure for the RR types written to zone
//! files.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::util::Caseless;

/// The RR type of a record in the zone tree.
///
/// Zone files name a type either by its mnemonic (`A`, `PTR`, ...) or
/// in the generic `TYPEnnn` form of RFC 3597 § 5. The common types are
/// available as constants and are recognized case-insensitively.
/// Anything else is kept as the text it was given in and written back
/// unchanged, so parsing a type never fails.
#[derive(Clone, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Type(Repr);

#[derive(Clone, Eq, Hash, PartialEq, PartialOrd, Ord)]
enum Repr {
    Code(u16),
    Text(Box<str>),
}

impl Type {
    pub const A: Type = Type(Repr::Code(1));
    pub const NS: Type = Type(Repr::Code(2));
    pub const CNAME: Type = Type(Repr::Code(5));
    pub const SOA: Type = Type(Repr::Code(6));
    pub const PTR: Type = Type(Repr::Code(12));
    pub const HINFO: Type = Type(Repr::Code(13));
    pub const MX: Type = Type(Repr::Code(15));
    pub const TXT: Type = Type(Repr::Code(16));
    pub const AAAA: Type = Type(Repr::Code(28));
    pub const SRV: Type = Type(Repr::Code(33));
    pub const CAA: Type = Type(Repr::Code(257));

    /// Returns the numeric value of this type, if it is known.
    pub fn code(&self) -> Option<u16> {
        match self.0 {
            Repr::Code(code) => Some(code),
            Repr::Text(_) => None,
        }
    }

    /// Returns the canonical mnemonic of this type, if it has one.
    pub fn mnemonic(&self) -> Option<&'static str> {
        MNEMONICS
            .iter()
            .find(|(code, _)| Some(*code) == self.code())
            .map(|(_, mnemonic)| *mnemonic)
    }
}

const MNEMONICS: [(u16, &str); 11] = [
    (1, "A"),
    (2, "NS"),
    (5, "CNAME"),
    (6, "SOA"),
    (12, "PTR"),
    (13, "HINFO"),
    (15, "MX"),
    (16, "TXT"),
    (28, "AAAA"),
    (33, "SRV"),
    (257, "CAA"),
];

impl From<u16> for Type {
    fn from(code: u16) -> Self {
        Self(Repr::Code(code))
    }
}

impl FromStr for Type {
    type Err = Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if let Some((code, _)) = MNEMONICS
            .iter()
            .find(|(_, mnemonic)| Caseless(*mnemonic) == Caseless(text))
        {
            return Ok(Self::from(*code));
        }
        let generic = match text.get(0..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("TYPE") => text[4..].parse::<u16>().ok(),
            _ => None,
        };
        Ok(match generic {
            Some(code) => Self::from(code),
            None => Self(Repr::Text(text.into())),
        })
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.0, self.mnemonic()) {
            (_, Some(mnemonic)) => f.write_str(mnemonic),
            (Repr::Code(code), None) => write!(f, "TYPE{code}"),
            (Repr::Text(text), None) => f.write_str(text),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
