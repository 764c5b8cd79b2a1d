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

//! Merging caller-supplied records into a [`ZoneTree`].
//!
//! An [`Overlay`] maps top-level labels to subtrees shaped like the
//! zone tree itself. Merging happens one level deep: for a top-level
//! label the tree already has, the overlay's labels replace or extend
//! the labels directly below it; nothing further down is merged.

use std::fmt;

use log::debug;
use serde::{de, Deserialize};

use super::{Children, ZoneNode, ZoneTree};
use crate::rr::Record;

/// Extra records keyed by top-level label.
///
/// In configuration, an overlay is a table whose keys are labels. A
/// table value is a node with labels below it, and an array value is a
/// record set whose elements are `[type, value]` or
/// `[subdomain, type, value]` arrays:
///
/// ```toml
/// [overlay.example]
/// mail = [["MX", "10 mx.example."], ["www", "CNAME", "web.lab.example."]]
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Overlay {
    domains: Children,
}

impl Overlay {
    /// Creates an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subtree for the top-level label `tld`.
    pub fn insert(&mut self, tld: impl Into<String>, node: ZoneNode) {
        self.domains.insert(tld, node);
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl ZoneTree {
    /// Merges `overlay` into this tree.
    ///
    /// A top-level label that is absent (or empty) in the tree is
    /// inserted with the overlay's subtree unchanged. Otherwise, labels
    /// directly below it in the overlay replace the tree's labels of the
    /// same name, in place, and new labels are appended; an overlay
    /// record set replaces the node's record set. Everything else in the
    /// tree is left untouched.
    pub fn merge(&mut self, overlay: Overlay) {
        let root = self.root_mut();
        for (tld, node) in overlay.domains {
            match root.get_or_insert_with(&tld, ZoneNode::interior) {
                existing if existing.is_empty() => {
                    debug!("Overlay adds top-level domain {}.", tld);
                    *existing = node;
                }
                existing => {
                    debug!("Overlay merges into top-level domain {}.", tld);
                    merge_node(existing, node);
                }
            }
        }
    }
}

fn merge_node(existing: &mut ZoneNode, overlay: ZoneNode) {
    match overlay {
        ZoneNode::Interior(children) => merge_children(existing.make_interior(), children),
        ZoneNode::Leaves(records) => existing.set_records(records),
        ZoneNode::Both(children, records) => {
            merge_children(existing.make_interior(), children);
            existing.set_records(records);
        }
    }
}

fn merge_children(existing: &mut Children, overlay: Children) {
    for (label, node) in overlay {
        existing.insert(label, node);
    }
}

////////////////////////////////////////////////////////////////////////
// DESERIALIZATION                                                    //
////////////////////////////////////////////////////////////////////////

impl<'de> Deserialize<'de> for Overlay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        Ok(Self {
            domains: Children::deserialize(deserializer)?,
        })
    }
}

impl<'de> Deserialize<'de> for Children {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(NodeVisitor).and_then(|node| match node {
            ZoneNode::Interior(children) => Ok(children),
            _ => Err(de::Error::custom("expected a table of labels")),
        })
    }
}

impl<'de> Deserialize<'de> for ZoneNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> de::Visitor<'de> for NodeVisitor {
    type Value = ZoneNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a table of labels or an array of records")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let mut children = Children::new();
        while let Some((label, node)) = map.next_entry::<String, ZoneNode>()? {
            children.insert(label, node);
        }
        Ok(ZoneNode::Interior(children))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut records = Vec::new();
        while let Some(record) = seq.next_element::<Record>()? {
            records.push(record);
        }
        Ok(ZoneNode::Leaves(records))
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rr::Type;
    use crate::tree::{Host, HostsTracked};

    fn lab_tree() -> ZoneTree {
        let hosts = [
            Host::new("web.lab.example", "10.0.0.5".parse().ok()),
            Host::new("db.example", "10.0.0.6".parse().ok()),
        ];
        ZoneTree::build(&hosts, &HostsTracked::All)
    }

    #[test]
    fn new_top_level_domains_are_inserted_unchanged() {
        let mut tree = lab_tree();
        let mut subtree = Children::new();
        subtree.insert("mx", ZoneNode::Leaves(vec![Record::new(Type::A, "10.1.0.1")]));
        let mut overlay = Overlay::new();
        overlay.insert("test", ZoneNode::Interior(subtree.clone()));
        tree.merge(overlay);

        assert_eq!(tree.get(&["test"]), Some(&ZoneNode::Interior(subtree)));
        let top_level: Vec<_> = tree.root().iter().map(|(label, _)| label).collect();
        assert_eq!(top_level, ["example", "arpa", "test"]);
    }

    #[test]
    fn merge_keeps_unrelated_records_and_replaces_same_labels() {
        let mut tree = lab_tree();
        let mut subtree = Children::new();
        subtree.insert("db", ZoneNode::Leaves(vec![Record::new(Type::A, "10.0.0.9")]));
        subtree.insert(
            "mail",
            ZoneNode::Leaves(vec![Record::new(Type::MX, "10 mx.example.")]),
        );
        let mut overlay = Overlay::new();
        overlay.insert("example", ZoneNode::Interior(subtree));
        tree.merge(overlay);

        let example = tree.get(&["example"]).unwrap().children().unwrap();
        let labels: Vec<_> = example.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, ["lab", "db", "mail"]);
        assert_eq!(
            tree.get(&["example", "db"]).unwrap().records(),
            Some(&[Record::new(Type::A, "10.0.0.9")][..]),
        );
        assert!(tree.get(&["example", "lab", "web"]).is_some());
    }

    #[test]
    fn merge_is_one_level_deep() {
        let mut tree = lab_tree();
        let mut lab = Children::new();
        lab.insert("ftp", ZoneNode::Leaves(vec![Record::new(Type::A, "10.0.0.8")]));
        let mut subtree = Children::new();
        subtree.insert("lab", ZoneNode::Interior(lab));
        let mut overlay = Overlay::new();
        overlay.insert("example", ZoneNode::Interior(subtree));
        tree.merge(overlay);

        assert!(tree.get(&["example", "lab", "web"]).is_none());
        assert!(tree.get(&["example", "lab", "ftp"]).is_some());
    }

    #[test]
    fn repeated_merges_are_stable() {
        let mut overlay = Overlay::new();
        overlay.insert(
            "example",
            ZoneNode::Leaves(vec![Record::new(Type::TXT, "\"hello\"")]),
        );
        let mut once = lab_tree();
        once.merge(overlay.clone());
        let mut twice = once.clone();
        twice.merge(overlay);
        assert_eq!(once, twice);
        assert!(matches!(once.get(&["example"]), Some(ZoneNode::Both(_, _))));
    }

    #[test]
    fn overlay_deserializes_tables_and_record_arrays() {
        let overlay: Overlay = serde_json::from_str(
            r#"{"example": {"mail": [["MX", "10 mx.example."], ["www", "CNAME", "web."]]}}"#,
        )
        .unwrap();
        let mut mail = Children::new();
        mail.insert(
            "mail",
            ZoneNode::Leaves(vec![
                Record::new(Type::MX, "10 mx.example."),
                Record::with_subdomain("www", Type::CNAME, "web."),
            ]),
        );
        let mut expected = Overlay::new();
        expected.insert("example", ZoneNode::Interior(mail));
        assert_eq!(overlay, expected);
    }

    #[test]
    fn overlay_keeps_unlisted_record_types() {
        let overlay: Overlay = serde_json::from_str(
            r#"{"example": {"sip": [["NAPTR", "100 10 \"u\" \"E2U+sip\" \"\" ."],
                                    ["_ssh", "SSHFP", "1 1 abcd"]]}}"#,
        )
        .unwrap();
        let mut tree = lab_tree();
        tree.merge(overlay);

        let zones = crate::render::render(&tree, "10.0.0.1".parse().unwrap());
        assert_eq!(
            zones.get("example.").unwrap().records.as_deref(),
            Some(
                "db\tIN\tA\t10.0.0.6\n\
                 sip\tIN\tNAPTR\t100 10 \"u\" \"E2U+sip\" \"\" .\n\
                 _ssh\tIN\tSSHFP\t1 1 abcd\n"
            ),
        );
    }

    #[test]
    fn overlay_rejects_records_of_the_wrong_arity() {
        let err = serde_json::from_str::<Overlay>(r#"{"example": {"mail": [["MX"]]}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("but 1 were given"));
    }
}
