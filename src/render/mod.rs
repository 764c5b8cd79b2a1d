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

//! Rendering a [`ZoneTree`] into per-zone glue and record text.
//!
//! [`render`] walks the tree depth first. Every node with labels below
//! it is a zone: it gets a glue record (an `NS` record naming
//! `ns.<zone>` and an `A` record giving that name server the DNS
//! server's address), and it is walked in turn. Record sets found
//! directly below a zone are written as that zone's records. Finally,
//! the root zone gets glue for itself and for every top-level zone.
//!
//! The result is a [`RenderedZones`] map. Joining each zone's sections
//! with its [SOA boilerplate](soa::boilerplate) is left to
//! [`metadata::assemble`](crate::metadata::assemble).

use std::collections::HashMap;
use std::fmt::Write;
use std::net::Ipv4Addr;

use log::debug;

use crate::rr::Record;
use crate::tree::{Children, ZoneTree};
use crate::util::subdomain;

pub mod soa;
pub use soa::{boilerplate, SoaTimers};

////////////////////////////////////////////////////////////////////////
// RENDERED ZONES                                                     //
////////////////////////////////////////////////////////////////////////

/// The glue and record sections of each zone, keyed by fully qualified
/// zone name (the root is the empty string), in the order the zones
/// were first reached.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RenderedZones {
    zones: Vec<(String, Sections)>,
    positions: HashMap<String, usize>,
}

/// The rendered sections of one zone.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Sections {
    pub glue: Option<String>,
    pub records: Option<String>,
}

impl RenderedZones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn get(&self, zone: &str) -> Option<&Sections> {
        self.positions.get(zone).map(|&i| &self.zones[i].1)
    }

    /// Returns an iterator over zone names and their sections.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sections)> + '_ {
        self.zones.iter().map(|(zone, sections)| (zone.as_str(), sections))
    }

    /// Gets the sections of `zone`, adding an empty entry if the zone
    /// has not been seen yet. Entries are never removed.
    fn entry(&mut self, zone: &str) -> &mut Sections {
        let i = match self.positions.get(zone) {
            Some(&i) => i,
            None => {
                let i = self.zones.len();
                self.positions.insert(zone.to_owned(), i);
                self.zones.push((zone.to_owned(), Sections::default()));
                i
            }
        };
        &mut self.zones[i].1
    }
}

////////////////////////////////////////////////////////////////////////
// RENDERING                                                          //
////////////////////////////////////////////////////////////////////////

/// Renders `tree` into per-zone sections, using `dns_address` as the
/// address of every name server named in glue records.
///
/// The output only depends on the tree and the address: rendering the
/// same tree twice yields identical text.
pub fn render(tree: &ZoneTree, dns_address: Ipv4Addr) -> RenderedZones {
    let mut zones = RenderedZones::new();
    visit(tree.root(), None, "", dns_address, &mut zones);
    zones.entry("").glue = Some(root_glue(tree.root(), dns_address));
    zones
}

/// Walks the labels below the zone `domain`. `own_records` is the
/// record set held by the zone's node itself, if any.
fn visit(
    children: &Children,
    own_records: Option<&[Record]>,
    domain: &str,
    dns_address: Ipv4Addr,
    zones: &mut RenderedZones,
) {
    for (label, node) in children.iter() {
        if let Some(grandchildren) = node.children() {
            let zone = subdomain(label, domain);
            debug!("Rendering zone {}.", zone);
            zones.entry(&zone).glue = Some(glue(&zone, dns_address));
            visit(grandchildren, node.records(), &zone, dns_address, zones);
        }
    }

    let mut text = String::new();
    if let Some(records) = own_records {
        for record in records {
            record.write_line(domain, &mut text);
        }
    }
    for (label, node) in children.iter() {
        if node.children().is_none() {
            for record in node.records().unwrap_or_default() {
                record.write_line(label, &mut text);
            }
        }
    }
    if !text.is_empty() {
        zones.entry(domain).records = Some(text);
    }
}

/// Produces the glue record for the zone `zone`.
fn glue(zone: &str, dns_address: Ipv4Addr) -> String {
    let ns = subdomain("ns", zone);
    format!(
        "{zone}\tIN\tNS\t{ns}\n\
         {ns}\tIN\tA\t{dns_address}\n\n",
    )
}

/// Produces the glue for the root zone: the root's own name server and
/// one delegation per top-level zone.
fn root_glue(root: &Children, dns_address: Ipv4Addr) -> String {
    let mut text = format!(". IN NS ns.\nns. IN A {}\n", dns_address);
    for (label, node) in root.iter() {
        if node.children().is_some() {
            let ns = format!("ns.{}.", label);
            write!(
                text,
                "{label}.\tIN\tNS\t{ns}\n\
                 {ns}\tIN\tA\t{dns_address}\n\n",
            )
            .unwrap();
        }
    }
    text
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
