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

//! Installation of generated zone files for a BIND-style name server.
//!
//! Each zone file is written to `db.<zone>` in a zone directory (the
//! root zone goes to `db.root`), and a configuration fragment declaring
//! every zone as a master zone loaded from that file is written next
//! to the server's main configuration. The main configuration is
//! rewritten to include only the server options and that fragment, so
//! the stock default zones (which declare their own `"."`) are not
//! loaded alongside the generated root zone. Restarting the server to
//! pick up the new zones is left to the caller.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::metadata::ZoneFiles;

/// The zone directory used by default.
pub const DEFAULT_ZONE_DIR: &str = "/var/lib/bind";

/// The configuration fragment written by default.
pub const DEFAULT_CONF_PATH: &str = "/etc/bind/named.conf.local";

/// The main server configuration rewritten by default.
pub const DEFAULT_NAMED_CONF_PATH: &str = "/etc/bind/named.conf";

/// The name of the options file included by the main configuration. It
/// is expected next to the main configuration file.
const OPTIONS_FILE_NAME: &str = "named.conf.options";

/// Returns the path of the zone file for `zone` in `zone_dir`.
pub fn zone_file_path(zone_dir: impl AsRef<Path>, zone: &str) -> PathBuf {
    if zone.is_empty() {
        zone_dir.as_ref().join("db.root")
    } else {
        zone_dir.as_ref().join(format!("db.{}", zone))
    }
}

/// Returns the configuration block declaring `zone` as a master zone
/// loaded from `path`.
pub fn zone_declaration(zone: &str, path: &Path) -> String {
    let zone = if zone.is_empty() { "." } else { zone };
    format!(
        "zone \"{}\"{{\n\ttype master;\n\tfile \"{}\";\n}};\n",
        zone,
        path.display(),
    )
}

/// Returns the configuration fragment declaring every zone in `files`,
/// with zone files in `zone_dir`.
pub fn named_conf(files: &ZoneFiles, zone_dir: impl AsRef<Path>) -> String {
    let mut conf = String::new();
    for (zone, _) in files.iter() {
        let path = zone_file_path(zone_dir.as_ref(), zone);
        conf.push_str(&zone_declaration(zone, &path));
    }
    conf
}

/// Returns the main server configuration for `named_conf_path`: an
/// include of the options file next to it, then an include of the zone
/// declarations at `conf_path`.
pub fn main_conf(named_conf_path: &Path, conf_path: &Path) -> String {
    format!(
        "include \"{}\";\ninclude \"{}\";\n",
        named_conf_path.with_file_name(OPTIONS_FILE_NAME).display(),
        conf_path.display(),
    )
}

/// Writes every zone file into `zone_dir`, the configuration fragment
/// declaring them to `conf_path`, and the main configuration including
/// that fragment to `named_conf_path`.
pub fn install(
    files: &ZoneFiles,
    zone_dir: impl AsRef<Path>,
    conf_path: impl AsRef<Path>,
    named_conf_path: impl AsRef<Path>,
) -> Result<(), Error> {
    let zone_dir = zone_dir.as_ref();
    fs::create_dir_all(zone_dir).map_err(|e| Error::new(zone_dir, e))?;
    for (zone, text) in files.iter() {
        let path = zone_file_path(zone_dir, zone);
        debug!("Writing {}.", path.display());
        fs::write(&path, text).map_err(|e| Error::new(&path, e))?;
    }

    let conf_path = conf_path.as_ref();
    debug!("Writing {}.", conf_path.display());
    fs::write(conf_path, named_conf(files, zone_dir)).map_err(|e| Error::new(conf_path, e))?;

    let named_conf_path = named_conf_path.as_ref();
    debug!("Writing {}.", named_conf_path.display());
    fs::write(named_conf_path, main_conf(named_conf_path, conf_path))
        .map_err(|e| Error::new(named_conf_path, e))
}

/// An I/O error that occurred while installing zones.
#[derive(Debug)]
pub struct Error {
    path: Box<Path>,
    io_err: io::Error,
}

impl Error {
    fn new(path: impl AsRef<Path>, io_err: io::Error) -> Self {
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
        write!(f, "failed to write {}: {}", self.path.display(), self.io_err)
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
