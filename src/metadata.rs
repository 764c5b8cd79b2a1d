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

//! Assembling complete zone files and packing them for delivery.
//!
//! [`assemble`] joins each zone's SOA boilerplate, glue, and records
//! into one zone file. The resulting [`ZoneFiles`] map can be packed
//! into a single JSON object (`{"<zone>": "<zone file>", ...}`) with
//! [`ZoneFiles::pack`], handed to whatever installs the zones on the
//! name server, and recovered there with [`ZoneFiles::unpack`]. Zone
//! order is preserved through the round trip.

use std::collections::HashMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{de, Deserialize, Serialize};

use crate::render::{boilerplate, RenderedZones, SoaTimers};

/// Complete zone files keyed by zone name (the root is the empty
/// string).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ZoneFiles {
    files: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl ZoneFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns the zone file for `zone`.
    pub fn get(&self, zone: &str) -> Option<&str> {
        self.positions.get(zone).map(|&i| self.files[i].1.as_str())
    }

    /// Returns an iterator over zone names and their zone files.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.files
            .iter()
            .map(|(zone, text)| (zone.as_str(), text.as_str()))
    }

    /// Sets the zone file for `zone`, replacing any previous one.
    pub fn insert(&mut self, zone: impl Into<String>, text: impl Into<String>) {
        let zone = zone.into();
        let text = text.into();
        match self.positions.get(&zone) {
            Some(&i) => self.files[i].1 = text,
            None => {
                self.positions.insert(zone.clone(), self.files.len());
                self.files.push((zone, text));
            }
        }
    }

    /// Packs the zone files into a single blob for transport.
    pub fn pack(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Into::into)
    }

    /// Recovers zone files from a blob produced by [`ZoneFiles::pack`].
    pub fn unpack(blob: &[u8]) -> Result<Self> {
        serde_json::from_slice(blob).map_err(Into::into)
    }
}

/// Assembles the zone file of every rendered zone: the boilerplate,
/// then the glue (if any), then the records (if any), each separated by
/// a newline. Zones with neither glue nor records are left out.
pub fn assemble(zones: &RenderedZones, timers: &SoaTimers) -> ZoneFiles {
    let mut files = ZoneFiles::new();
    for (zone, sections) in zones.iter() {
        if sections.glue.is_none() && sections.records.is_none() {
            continue;
        }
        let mut text = boilerplate(zone, timers);
        if let Some(ref glue) = sections.glue {
            text.push('\n');
            text.push_str(glue);
        }
        if let Some(ref records) = sections.records {
            text.push('\n');
            text.push_str(records);
        }
        files.insert(zone, text);
    }
    files
}

////////////////////////////////////////////////////////////////////////
// SERIALIZATION                                                      //
////////////////////////////////////////////////////////////////////////

impl Serialize for ZoneFiles {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.files.len()))?;
        for (zone, text) in &self.files {
            map.serialize_entry(zone, text)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ZoneFiles {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(ZoneFilesVisitor)
    }
}

struct ZoneFilesVisitor;

impl<'de> de::Visitor<'de> for ZoneFilesVisitor {
    type Value = ZoneFiles;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from zone names to zone files")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let mut files = ZoneFiles::new();
        while let Some((zone, text)) = map.next_entry::<String, String>()? {
            files.insert(zone, text);
        }
        Ok(files)
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// Errors that arise while packing or unpacking zone files.
#[derive(Debug)]
pub enum Error {
    Json(serde_json::Error),
}

impl From<serde_json::Error> for Error {
    fn from(json_error: serde_json::Error) -> Self {
        Self::Json(json_error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Json(json_error) => write!(f, "malformed zone metadata: {}", json_error),
        }
    }
}

impl std::error::Error for Error {}

/// A result type for packing and unpacking.
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
