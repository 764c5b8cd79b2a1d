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

//! Implementation of the [`Record`] structure.

use std::fmt::{self, Write};

use serde::{de, Deserialize};

use super::Type;

/// A resource record held in a record set of the zone tree.
///
/// A record either applies to the label its record set is attached to
/// (the `(type, value)` form) or to a named subdomain relative to the
/// zone it is rendered into (the `(subdomain, type, value)` form). The
/// value is opaque text that is written to the zone file as is.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    pub subdomain: Option<String>,
    pub rr_type: Type,
    pub value: String,
}

impl Record {
    /// Creates a record owned by the label of its record set.
    pub fn new(rr_type: Type, value: impl Into<String>) -> Self {
        Self {
            subdomain: None,
            rr_type,
            value: value.into(),
        }
    }

    /// Creates a record owned by `subdomain`.
    pub fn with_subdomain(
        subdomain: impl Into<String>,
        rr_type: Type,
        value: impl Into<String>,
    ) -> Self {
        Self {
            subdomain: Some(subdomain.into()),
            rr_type,
            value: value.into(),
        }
    }

    /// Builds a record from its textual fields, which must be either
    /// `[type, value]` or `[subdomain, type, value]`. Only the number of
    /// fields is checked; types without a known mnemonic are kept as
    /// written.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, Error> {
        match fields {
            [rr_type, value] => Ok(Self::new(parse_type(rr_type.as_ref()), value.as_ref())),
            [subdomain, rr_type, value] => Ok(Self::with_subdomain(
                subdomain.as_ref(),
                parse_type(rr_type.as_ref()),
                value.as_ref(),
            )),
            _ => Err(Error::Arity(fields.len())),
        }
    }

    /// Returns the owner this record is written with. `default_owner`
    /// is used for records without a subdomain.
    pub fn owner<'a>(&'a self, default_owner: &'a str) -> &'a str {
        self.subdomain.as_deref().unwrap_or(default_owner)
    }

    /// Appends the zone file line for this record to `out`.
    pub fn write_line(&self, default_owner: &str, out: &mut String) {
        writeln!(
            out,
            "{}\tIN\t{}\t{}",
            self.owner(default_owner),
            self.rr_type,
            self.value,
        )
        .unwrap();
    }
}

fn parse_type(text: &str) -> Type {
    match text.parse() {
        Ok(rr_type) => rr_type,
        Err(never) => match never {},
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let fields = Vec::<String>::deserialize(deserializer)?;
        Record::from_fields(&fields).map_err(de::Error::custom)
    }
}

/// Errors that arise when building a [`Record`] from text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    Arity(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Arity(n) => write!(
                f,
                "a record must have 2 fields (type, value) or 3 fields \
                 (subdomain, type, value), but {} were given",
                n,
            ),
        }
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
