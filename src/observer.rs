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

//! Observation of the intermediate results of zone generation.
//!
//! A [`Job`](crate::job::Job) reports each stage's output to an
//! [`Observer`]. Observation never feeds back into generation; it is
//! purely a side channel. [`NoopObserver`] ignores everything, and
//! [`DebugDir`] writes every artifact to a directory for inspection.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::metadata::ZoneFiles;
use crate::render::{boilerplate, RenderedZones, SoaTimers};
use crate::tree::ZoneTree;

/// Receives the output of each stage of zone generation. All methods
/// do nothing by default.
pub trait Observer {
    /// Called with the zone tree, after any overlay has been merged.
    fn tree(&mut self, _tree: &ZoneTree) -> Result<()> {
        Ok(())
    }

    /// Called with the rendered glue and record sections.
    fn rendered(&mut self, _zones: &RenderedZones, _timers: &SoaTimers) -> Result<()> {
        Ok(())
    }

    /// Called with the assembled zone files.
    fn zone_files(&mut self, _files: &ZoneFiles) -> Result<()> {
        Ok(())
    }

    /// Called with the packed zone files.
    fn packed(&mut self, _blob: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// An [`Observer`] that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

////////////////////////////////////////////////////////////////////////
// DEBUG DIRECTORY                                                    //
////////////////////////////////////////////////////////////////////////

/// An [`Observer`] that writes every artifact to a directory.
///
/// For each zone `<zone>`, the files `<zone>soa`, `<zone>glue`, and
/// `<zone>a` hold its boilerplate, glue, and records, and `<zone>`
/// holds the complete zone file. The root zone is written as `dot.`.
/// The tree is written to `zone_tree` and the packed blob to
/// `metadata`.
#[derive(Debug)]
pub struct DebugDir {
    dir: PathBuf,
}

impl DebugDir {
    /// Creates the debug directory for the DNS server `server` under
    /// `base`. Output from a previous run is removed.
    pub fn create(base: impl AsRef<Path>, server: &str) -> Result<Self> {
        let dir = base.as_ref().join(server);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| Error::new(&dir, e))?;
        }
        fs::create_dir_all(&dir).map_err(|e| Error::new(&dir, e))?;
        debug!("Writing debug output to {}.", dir.display());
        Ok(Self { dir })
    }

    /// Returns the path of the directory.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> Result<()> {
        let path = self.dir.join(name);
        fs::write(&path, contents).map_err(|e| Error::new(&path, e))
    }
}

/// The file name stem used for `zone`.
fn stem(zone: &str) -> &str {
    if zone.is_empty() {
        "dot."
    } else {
        zone
    }
}

impl Observer for DebugDir {
    fn tree(&mut self, tree: &ZoneTree) -> Result<()> {
        self.write("zone_tree", tree.to_string())
    }

    fn rendered(&mut self, zones: &RenderedZones, timers: &SoaTimers) -> Result<()> {
        for (zone, sections) in zones.iter() {
            let name = stem(zone);
            self.write(&format!("{}soa", name), boilerplate(zone, timers))?;
            if let Some(ref glue) = sections.glue {
                self.write(&format!("{}glue", name), glue)?;
            }
            if let Some(ref records) = sections.records {
                self.write(&format!("{}a", name), records)?;
            }
        }
        Ok(())
    }

    fn zone_files(&mut self, files: &ZoneFiles) -> Result<()> {
        for (zone, text) in files.iter() {
            self.write(stem(zone), text)?;
        }
        Ok(())
    }

    fn packed(&mut self, blob: &[u8]) -> Result<()> {
        self.write("metadata", blob)
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An I/O error that occurred while writing observer output.
#[derive(Debug)]
pub struct Error {
    path: Box<Path>,
    io_err: io::Error,
}

impl Error {
    pub fn new(path: impl AsRef<Path>, io_err: io::Error) -> Self {
        Self {
            path: path.as_ref().into(),
            io_err,
        }
    }

    /// Returns the path that could not be written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the [`io::Error`] that caused this error.
    pub fn io_error(&self) -> &io::Error {
        &self.io_err
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "failed to write debug output to {}: {}",
            self.path.display(),
            self.io_err,
        )
    }
}

impl std::error::Error for Error {}

/// A result type for observers.
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
