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

//! Implements the configuration file.

use std::fmt::Write;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::Level::Debug;
use log::{debug, log_enabled};
use serde::Deserialize;

use zonegen::job::Job;
use zonegen::render::SoaTimers;
use zonegen::tree::{Host, HostsTracked, Overlay};

use crate::args::RenderArgs;

////////////////////////////////////////////////////////////////////////
// CONFIGURATION LOADING                                              //
////////////////////////////////////////////////////////////////////////

/// Loads the configuration for the `render` command. The file given
/// with `--config` (if any) is read first; the DNS server address and
/// hosts given on the command line then override and extend it.
pub fn load(args: &RenderArgs) -> Result<Config> {
    let mut config = match args.config {
        Some(ref path) => load_from_path(path).context("failed to load the configuration")?,
        None => Config {
            name: default_name(),
            dns_address: args.dns_address.ok_or_else(|| {
                anyhow!("a DNS server address is required when no configuration file is given")
            })?,
            hosts_tracked: HostsTracked::All,
            soa: SoaTimers::default(),
            hosts: Vec::new(),
            overlay: None,
        },
    };

    if let Some(dns_address) = args.dns_address {
        config.dns_address = dns_address;
    }
    config
        .hosts
        .extend(args.hosts.iter().map(|description| description.0.clone()));

    log_config_summary(&config);
    Ok(config)
}

/// Loads the configuration from the file given by `path`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let raw_config =
        fs::read_to_string(path.as_ref()).context("failed to read the configuration file")?;
    toml::from_str(&raw_config).context("failed to parse the configuration file")
}

/// Summarizes the configuration in the log, if the debug log level is
/// enabled.
fn log_config_summary(config: &Config) {
    if !log_enabled!(Debug) {
        // Don't compute the message if it will never be printed.
        return;
    }

    let tracked = match config.hosts_tracked {
        HostsTracked::All => String::from("all"),
        HostsTracked::Only(ref names) => format!("{} listed", names.len()),
    };
    let overlay = match config.overlay {
        Some(ref overlay) if !overlay.is_empty() => "present",
        _ => "none",
    };

    let mut message = format!(
        "Configuration loaded:\n\
         Server:       {}\n\
         DNS address:  {}\n\
         SOA serial:   {}\n\
         Tracked:      {}\n\
         Overlay:      {}\n\
         Hosts:        ",
        config.name, config.dns_address, config.soa.serial, tracked, overlay,
    );
    summarize_hosts(&config.hosts, &mut message);
    debug!("{}", message);
}

/// Produces the host summary for [`log_config_summary`].
fn summarize_hosts(hosts: &[Host], message: &mut String) {
    if hosts.is_empty() {
        message.push_str("none");
    } else {
        write!(message, "{} in the inventory", hosts.len()).unwrap();
        for host in hosts {
            match host.address {
                Some(address) => write!(message, "\n  {} ({})", host.name, address).unwrap(),
                None => write!(message, "\n  {} (no address)", host.name).unwrap(),
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////
// CONFIGURATION FILE STRUCTURE                                       //
////////////////////////////////////////////////////////////////////////

/// The complete configuration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_name")]
    pub name: String,
    pub dns_address: Ipv4Addr,
    #[serde(default)]
    pub hosts_tracked: HostsTracked,
    #[serde(default)]
    pub soa: SoaTimers,
    #[serde(default)]
    pub hosts: Vec<Host>,
    pub overlay: Option<Overlay>,
}

/// The name of the DNS server, when none is configured. This names the
/// server's debug output directory.
fn default_name() -> String {
    String::from("DNS")
}

impl Config {
    /// Creates the zone generation job described by this configuration.
    pub fn job(&self) -> Job {
        Job {
            hosts: self.hosts.clone(),
            hosts_tracked: self.hosts_tracked.clone(),
            overlay: self.overlay.clone(),
            dns_address: self.dns_address,
            soa: self.soa.clone(),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
