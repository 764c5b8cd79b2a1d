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

//! Implementation of the zone tree built from a host inventory.
//!
//! The tree is a nested, insertion-ordered mapping from labels to
//! [`ZoneNode`]s, starting at the root. A node may own further labels
//! (which makes it a zone that is delegated to), a record set, or both.
//! The forward tree (e.g. `example` → `lab` → `web`) and the reverse
//! tree (`arpa` → `in-addr` → `10` → …) share the same root.

use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::vec;

use crate::rr::Record;

mod builder;
mod overlay;
pub use builder::{Host, HostsTracked};
pub use overlay::Overlay;

////////////////////////////////////////////////////////////////////////
// TREE AND NODES                                                     //
////////////////////////////////////////////////////////////////////////

/// A zone tree. See the [module-level documentation](self).
///
/// Trees are created with [`ZoneTree::build`] and may then be extended
/// with [`ZoneTree::merge`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ZoneTree {
    root: Children,
}

/// A node in the zone tree.
///
/// An `Interior` node has labels below it; when rendered, it becomes a
/// zone of its own, with glue published for it. A `Leaves` node holds
/// only a record set, whose records belong to the zone of the node's
/// parent. A `Both` node is a zone that also holds records of its own.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ZoneNode {
    Interior(Children),
    Leaves(Vec<Record>),
    Both(Children, Vec<Record>),
}

/// The labels below a node and their nodes, in insertion order.
///
/// Labels are never removed, so each label's position in `entries` is
/// stable and is indexed by `positions`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Children {
    entries: Vec<(String, ZoneNode)>,
    positions: HashMap<String, usize>,
}

impl ZoneTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the labels directly below the root.
    pub fn root(&self) -> &Children {
        &self.root
    }

    /// Returns whether the tree holds nothing at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Finds the node reached by following `labels` from the root,
    /// most significant label first.
    pub fn get(&self, labels: &[&str]) -> Option<&ZoneNode> {
        let (last, path) = labels.split_last()?;
        let mut children = &self.root;
        for label in path {
            children = children.get(label)?.children()?;
        }
        children.get(last)
    }

    /// Replaces the record set at the end of `labels` (most significant
    /// label first) with `records`, creating any missing nodes along the
    /// way. Nodes that only held records and must now hold labels as
    /// well become [`ZoneNode::Both`].
    pub(crate) fn set_records(&mut self, labels: &[&str], records: Vec<Record>) {
        let (last, path) = match labels.split_last() {
            Some(split) => split,
            None => return,
        };
        let mut children = &mut self.root;
        for label in path {
            children = children
                .get_or_insert_with(label, ZoneNode::interior)
                .make_interior();
        }
        children
            .get_or_insert_with(last, || ZoneNode::Leaves(Vec::new()))
            .set_records(records);
    }

    pub(crate) fn root_mut(&mut self) -> &mut Children {
        &mut self.root
    }
}

impl ZoneNode {
    /// Creates an interior node with no labels below it.
    pub fn interior() -> Self {
        Self::Interior(Children::new())
    }

    /// Returns the labels below this node, if it has any structure of
    /// its own (i.e. if it is delegated to).
    pub fn children(&self) -> Option<&Children> {
        match self {
            Self::Interior(children) | Self::Both(children, _) => Some(children),
            Self::Leaves(_) => None,
        }
    }

    /// Returns the record set of this node, if it has one.
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            Self::Leaves(records) | Self::Both(_, records) => Some(records),
            Self::Interior(_) => None,
        }
    }

    /// Returns whether this node has neither labels nor records.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Interior(children) => children.is_empty(),
            Self::Leaves(records) => records.is_empty(),
            Self::Both(children, records) => children.is_empty() && records.is_empty(),
        }
    }

    /// Returns the labels below this node, first converting a
    /// [`Leaves`](ZoneNode::Leaves) node into a [`Both`](ZoneNode::Both)
    /// node so that its records are kept.
    pub(crate) fn make_interior(&mut self) -> &mut Children {
        if let Self::Leaves(records) = self {
            let records = mem::take(records);
            *self = Self::Both(Children::new(), records);
        }
        match self {
            Self::Interior(children) | Self::Both(children, _) => children,
            Self::Leaves(_) => unreachable!(),
        }
    }

    /// Replaces this node's record set, keeping any labels below it.
    pub(crate) fn set_records(&mut self, records: Vec<Record>) {
        match self {
            Self::Leaves(existing) | Self::Both(_, existing) => *existing = records,
            Self::Interior(children) => {
                let children = mem::take(children);
                *self = Self::Both(children, records);
            }
        }
    }
}

impl Children {
    /// Creates an empty set of labels.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&ZoneNode> {
        self.position(label).map(|i| &self.entries[i].1)
    }

    /// Returns an iterator over the labels and their nodes, in the
    /// order the labels were first inserted.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ZoneNode)> + '_ {
        self.entries.iter().map(|(label, node)| (label.as_str(), node))
    }

    /// Inserts `node` at `label`. If the label is already present, its
    /// node is replaced in place (keeping its position) and the old
    /// node is returned.
    pub fn insert(&mut self, label: impl Into<String>, node: ZoneNode) -> Option<ZoneNode> {
        let label = label.into();
        match self.position(&label) {
            Some(i) => Some(mem::replace(&mut self.entries[i].1, node)),
            None => {
                self.positions.insert(label.clone(), self.entries.len());
                self.entries.push((label, node));
                None
            }
        }
    }

    /// Gets the node at `label`, first inserting the node returned by
    /// `f` if the label is absent.
    pub(crate) fn get_or_insert_with(
        &mut self,
        label: &str,
        f: impl FnOnce() -> ZoneNode,
    ) -> &mut ZoneNode {
        let i = match self.position(label) {
            Some(i) => i,
            None => {
                let i = self.entries.len();
                self.positions.insert(label.to_owned(), i);
                self.entries.push((label.to_owned(), f()));
                i
            }
        };
        &mut self.entries[i].1
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }
}

impl IntoIterator for Children {
    type Item = (String, ZoneNode);
    type IntoIter = vec::IntoIter<(String, ZoneNode)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, ZoneNode)> for Children {
    fn from_iter<I: IntoIterator<Item = (String, ZoneNode)>>(iter: I) -> Self {
        let mut children = Self::new();
        for (label, node) in iter {
            children.insert(label, node);
        }
        children
    }
}

////////////////////////////////////////////////////////////////////////
// DISPLAY                                                            //
////////////////////////////////////////////////////////////////////////

/// Displays the tree as an indented outline, one label per line, with
/// record sets listed after their label. This is what the debug
/// observer writes out.
impl fmt::Display for ZoneTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(empty)\n");
        }
        write_children(f, &self.root, 0)
    }
}

fn write_children(f: &mut fmt::Formatter, children: &Children, depth: usize) -> fmt::Result {
    for (label, node) in children.iter() {
        write!(f, "{:width$}{}", "", label, width = depth * 2)?;
        if let Some(records) = node.records() {
            f.write_str(" =")?;
            for record in records {
                match record.subdomain {
                    Some(ref subdomain) => {
                        write!(f, " ({} {} {})", subdomain, record.rr_type, record.value)?
                    }
                    None => write!(f, " ({} {})", record.rr_type, record.value)?,
                }
            }
        }
        writeln!(f)?;
        if let Some(grandchildren) = node.children() {
            write_children(f, grandchildren, depth + 1)?;
        }
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
