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

//! Building a [`ZoneTree`] from a host inventory.

use std::fmt;
use std::net::Ipv4Addr;

use log::{debug, warn};
use serde::{de, Deserialize};

use super::ZoneTree;
use crate::rr::{Record, Type};

/// A host in the inventory. Hosts without an address are not part of
/// the generated zones.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Host {
    pub name: String,
    pub address: Option<Ipv4Addr>,
}

impl Host {
    pub fn new(name: impl Into<String>, address: Option<Ipv4Addr>) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

/// Which hosts a DNS server generates records for.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum HostsTracked {
    /// Every host in the inventory. Written as `"*"` in configuration.
    #[default]
    All,

    /// Only hosts whose names are listed.
    Only(Vec<String>),
}

impl HostsTracked {
    /// Returns whether the host named `name` is tracked.
    pub fn tracks(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.iter().any(|n| n == name),
        }
    }
}

impl ZoneTree {
    /// Builds the zone tree for `hosts`.
    ///
    /// Each tracked host with an address contributes an `A` record at
    /// its name in the forward tree and a `PTR` record back to its name
    /// at `<address>.in-addr.arpa.` in the reverse tree. Hosts without
    /// an address and untracked hosts are skipped. An empty inventory
    /// produces an empty tree.
    pub fn build<'a>(hosts: impl IntoIterator<Item = &'a Host>, tracked: &HostsTracked) -> Self {
        let mut tree = Self::new();
        for host in hosts {
            let address = match host.address {
                Some(address) => address,
                None => {
                    debug!("Skipping {}: it has no address.", host.name);
                    continue;
                }
            };
            if !tracked.tracks(&host.name) {
                debug!("Skipping {}: it is not tracked.", host.name);
                continue;
            }
            tree.add_host(&host.name, address);
        }
        tree
    }

    /// Adds the forward and reverse records of a single host.
    ///
    /// If the host's name (or its address) was already added, the
    /// record set at that label is replaced: the last host added wins.
    /// Names with an empty label (including the empty name) are skipped.
    pub fn add_host(&mut self, name: &str, address: Ipv4Addr) {
        let name = name.strip_suffix('.').unwrap_or(name);
        if name.split('.').any(str::is_empty) {
            warn!(
                "Skipping host {:?} (address {}): its name has an empty label.",
                name, address,
            );
            return;
        }

        let forward: Vec<&str> = name.split('.').rev().collect();
        self.set_records(&forward, vec![Record::new(Type::A, address.to_string())]);

        // The octets of the address are already in the order the
        // reverse tree needs (most significant first).
        let reverse_name = format!("arpa.in-addr.{}", address);
        let reverse: Vec<&str> = reverse_name.split('.').collect();
        self.set_records(&reverse, vec![Record::new(Type::PTR, format!("{}.", name))]);
    }
}

////////////////////////////////////////////////////////////////////////
// DESERIALIZATION                                                    //
////////////////////////////////////////////////////////////////////////

impl<'de> Deserialize<'de> for HostsTracked {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(HostsTrackedVisitor)
    }
}

struct HostsTrackedVisitor;

impl<'de> de::Visitor<'de> for HostsTrackedVisitor {
    type Value = HostsTracked;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("\"*\" or a list of host names")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if value == "*" {
            Ok(HostsTracked::All)
        } else {
            Err(E::invalid_value(de::Unexpected::Str(value), &self))
        }
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut names = Vec::new();
        while let Some(name) = seq.next_element::<String>()? {
            names.push(name);
        }
        Ok(HostsTracked::Only(names))
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;

    use super::*;
    use crate::tree::ZoneNode;

    lazy_static! {
        static ref WEB: Host = Host::new("web.lab.example", "10.0.0.5".parse().ok());
        static ref DB: Host = Host::new("db.lab.example", "10.0.0.6".parse().ok());
        static ref NO_ADDRESS: Host = Host::new("switch.lab.example", None);
    }

    #[test]
    fn forward_and_reverse_paths_are_built() {
        let tree = ZoneTree::build([&*WEB], &HostsTracked::All);

        assert_eq!(
            tree.get(&["example", "lab", "web"]).unwrap().records(),
            Some(&[Record::new(Type::A, "10.0.0.5")][..]),
        );
        assert_eq!(
            tree.get(&["arpa", "in-addr", "10", "0", "0", "5"])
                .unwrap()
                .records(),
            Some(&[Record::new(Type::PTR, "web.lab.example.")][..]),
        );
        let top_level: Vec<_> = tree.root().iter().map(|(label, _)| label).collect();
        assert_eq!(top_level, ["example", "arpa"]);
    }

    #[test]
    fn empty_inventory_gives_empty_tree() {
        let tree = ZoneTree::build(&[], &HostsTracked::All);
        assert!(tree.is_empty());
    }

    #[test]
    fn hosts_without_addresses_are_skipped() {
        let tree = ZoneTree::build([&*NO_ADDRESS], &HostsTracked::All);
        assert!(tree.is_empty());
    }

    #[test]
    fn untracked_hosts_are_skipped() {
        let tracked = HostsTracked::Only(vec!["db.lab.example".into()]);
        let tree = ZoneTree::build([&*WEB, &*DB], &tracked);
        let lab = tree.get(&["example", "lab"]).unwrap().children().unwrap();
        assert!(lab.get("web").is_none());
        assert!(lab.get("db").is_some());
    }

    #[test]
    fn siblings_share_their_parents() {
        let tree = ZoneTree::build([&*WEB, &*DB], &HostsTracked::All);
        assert_eq!(tree.root().len(), 2);
        let lab = tree.get(&["example", "lab"]).unwrap().children().unwrap();
        let labels: Vec<_> = lab.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, ["web", "db"]);
        let octets = tree.get(&["arpa", "in-addr", "10", "0", "0"]).unwrap();
        assert_eq!(octets.children().unwrap().len(), 2);
    }

    #[test]
    fn trailing_dot_is_ignored() {
        let mut tree = ZoneTree::new();
        tree.add_host("web.lab.example.", "10.0.0.5".parse().unwrap());
        assert!(tree.get(&["example", "lab", "web"]).is_some());
        assert_eq!(
            tree.get(&["arpa", "in-addr", "10", "0", "0", "5"])
                .unwrap()
                .records(),
            Some(&[Record::new(Type::PTR, "web.lab.example.")][..]),
        );
    }

    #[test]
    fn names_with_empty_labels_are_skipped() {
        let mut tree = ZoneTree::new();
        for name in [".", "", "web..example", ".example", "web.example.."] {
            tree.add_host(name, "10.0.0.5".parse().unwrap());
        }
        assert!(tree.is_empty());

        tree.add_host("web.example", "10.0.0.5".parse().unwrap());
        assert!(tree.get(&["example", "web"]).is_some());
    }

    #[test]
    fn last_host_wins_on_collisions() {
        let mut tree = ZoneTree::new();
        tree.add_host("web.lab.example", "10.0.0.5".parse().unwrap());
        tree.add_host("www.lab.example", "10.0.0.5".parse().unwrap());
        tree.add_host("web.lab.example", "10.0.0.7".parse().unwrap());

        assert_eq!(
            tree.get(&["example", "lab", "web"]).unwrap().records(),
            Some(&[Record::new(Type::A, "10.0.0.7")][..]),
        );
        assert_eq!(
            tree.get(&["arpa", "in-addr", "10", "0", "0", "5"])
                .unwrap()
                .records(),
            Some(&[Record::new(Type::PTR, "www.lab.example.")][..]),
        );
    }

    #[test]
    fn a_host_named_after_a_zone_makes_both() {
        let mut tree = ZoneTree::new();
        tree.add_host("web.lab.example", "10.0.0.5".parse().unwrap());
        tree.add_host("lab.example", "10.0.0.2".parse().unwrap());
        assert!(matches!(
            tree.get(&["example", "lab"]),
            Some(ZoneNode::Both(_, _)),
        ));
    }

    #[test]
    fn hosts_tracked_deserializes_from_star_or_list() {
        let all: HostsTracked = serde_json::from_str("\"*\"").unwrap();
        assert_eq!(all, HostsTracked::All);
        let only: HostsTracked = serde_json::from_str("[\"web.lab.example\"]").unwrap();
        assert!(only.tracks("web.lab.example"));
        assert!(!only.tracks("db.lab.example"));
        assert!(serde_json::from_str::<HostsTracked>("\"web\"").is_err());
    }
}
