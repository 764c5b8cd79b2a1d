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

//! Generation of authoritative DNS zone files from a host inventory.
//!
//! The input is a flat list of hosts, each with a fully qualified name
//! and an IPv4 address. [`tree::ZoneTree::build`] arranges the hosts
//! into a tree of labels, adding both the forward `A` records and the
//! reverse `PTR` records under `in-addr.arpa`. An optional
//! [overlay](tree::Overlay) can then be merged into the tree at the
//! top-level-domain level. [`render::render`] walks the tree and
//! produces, for each zone, its delegation glue and its resource
//! records, and [`metadata::assemble`] joins those with the SOA
//! boilerplate into complete zone files that can be packed for
//! delivery to the name server.
//!
//! ```
//! use zonegen::metadata;
//! use zonegen::render::{self, SoaTimers};
//! use zonegen::tree::{Host, HostsTracked, ZoneTree};
//!
//! let hosts = [Host::new("web.lab.example", "10.0.0.5".parse().ok())];
//! let tree = ZoneTree::build(&hosts, &HostsTracked::All);
//! let zones = render::render(&tree, "10.0.0.1".parse().unwrap());
//! let files = metadata::assemble(&zones, &SoaTimers::default());
//!
//! assert!(files.get("lab.example.").unwrap().contains("web\tIN\tA\t10.0.0.5"));
//! assert!(files.get("").unwrap().contains(". IN NS ns."));
//! ```

pub mod install;
pub mod job;
pub mod metadata;
pub mod observer;
pub mod render;
pub mod rr;
pub mod tree;
mod util;
