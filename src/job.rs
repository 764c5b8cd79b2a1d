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

//! Running zone generation from start to finish.

use std::fmt;
use std::net::Ipv4Addr;

use log::Level::Debug;
use log::{debug, log_enabled};

use crate::metadata::{self, assemble, ZoneFiles};
use crate::observer::{self, Observer};
use crate::render::{render, SoaTimers};
use crate::tree::{Host, HostsTracked, Overlay, ZoneTree};

/// Everything needed to generate the zones of one DNS server.
#[derive(Clone, Debug)]
pub struct Job {
    pub hosts: Vec<Host>,
    pub hosts_tracked: HostsTracked,
    pub overlay: Option<Overlay>,
    pub dns_address: Ipv4Addr,
    pub soa: SoaTimers,
}

/// The output of a [`Job`].
#[derive(Debug)]
pub struct Output {
    pub files: ZoneFiles,
    pub blob: Vec<u8>,
}

impl Job {
    /// Creates a job for `hosts` with every host tracked, no overlay,
    /// and the default SOA timers.
    pub fn new(hosts: Vec<Host>, dns_address: Ipv4Addr) -> Self {
        Self {
            hosts,
            hosts_tracked: HostsTracked::All,
            overlay: None,
            dns_address,
            soa: SoaTimers::default(),
        }
    }

    /// Builds the zone tree, merges the overlay, renders and assembles
    /// the zone files, and packs them. `observer` sees the output of
    /// every stage.
    pub fn run(&self, observer: &mut dyn Observer) -> Result<Output, Error> {
        let mut tree = ZoneTree::build(&self.hosts, &self.hosts_tracked);
        if let Some(ref overlay) = self.overlay {
            tree.merge(overlay.clone());
        }
        observer.tree(&tree)?;

        let zones = render(&tree, self.dns_address);
        observer.rendered(&zones, &self.soa)?;

        let files = assemble(&zones, &self.soa);
        observer.zone_files(&files)?;
        if log_enabled!(Debug) {
            let mut message = format!("Generated {} zone files:", files.len());
            for (zone, _) in files.iter() {
                message.push_str("\n  ");
                message.push_str(if zone.is_empty() { "." } else { zone });
            }
            debug!("{}", message);
        }

        let blob = files.pack()?;
        observer.packed(&blob)?;
        Ok(Output { files, blob })
    }
}

/// Errors that arise while running a [`Job`].
#[derive(Debug)]
pub enum Error {
    Observer(observer::Error),
    Metadata(metadata::Error),
}

impl From<observer::Error> for Error {
    fn from(error: observer::Error) -> Self {
        Self::Observer(error)
    }
}

impl From<metadata::Error> for Error {
    fn from(error: metadata::Error) -> Self {
        Self::Metadata(error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Observer(error) => error.fmt(f),
            Self::Metadata(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
