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

//! Implements command-line argument parsing.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::anyhow;
use clap::{ArgGroup, Parser, Subcommand};

use zonegen::install::{DEFAULT_CONF_PATH, DEFAULT_NAMED_CONF_PATH, DEFAULT_ZONE_DIR};
use zonegen::tree::Host;

/// Parses the command line arguments.
pub fn parse() -> Args {
    Args::parse()
}

/// Generates DNS zone files for a host inventory
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate and pack zone files
    Render(RenderArgs),

    /// Install packed zone files for the name server
    Install(InstallArgs),
}

#[derive(Debug, Parser)]
#[clap(group(ArgGroup::new("inventory").required(true).args(&["config", "hosts"])))]
pub struct RenderArgs {
    /// Set the configuration file to use
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Set (or override) the DNS server's address
    #[clap(long, value_name = "IP")]
    pub dns_address: Option<Ipv4Addr>,

    /// Add hosts to the inventory
    #[clap(long = "host", value_name = "NAME[=IP]")]
    pub hosts: Vec<HostDescription>,

    /// Write the packed zone files to FILE instead of standard output
    #[clap(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write every intermediate result under DIR
    #[clap(long, value_name = "DIR")]
    pub debug_dir: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct InstallArgs {
    /// Read the packed zone files from FILE
    #[clap(long, value_name = "FILE")]
    pub metadata: PathBuf,

    /// Set the directory to write zone files to
    #[clap(long, value_name = "DIR", default_value = DEFAULT_ZONE_DIR)]
    pub zone_dir: PathBuf,

    /// Set the path of the zone declarations to write
    #[clap(long, value_name = "FILE", default_value = DEFAULT_CONF_PATH)]
    pub conf: PathBuf,

    /// Set the path of the main server configuration to rewrite
    #[clap(long, value_name = "FILE", default_value = DEFAULT_NAMED_CONF_PATH)]
    pub named_conf: PathBuf,
}

/// A host provided on the command line with the `--host` option. This
/// is parsed with its [`FromStr`] implementation and accepts two
/// forms, the second of which describes a host without an address
/// (which is then skipped, just like in a configuration file):
///
/// * `web.lab.example=10.0.0.5`
/// * `web.lab.example`
#[derive(Clone, Debug)]
pub struct HostDescription(pub Host);

impl FromStr for HostDescription {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, address) = match s.split_once('=') {
            Some((name, address)) => (
                name,
                Some(
                    address
                        .parse::<Ipv4Addr>()
                        .map_err(|e| anyhow!("invalid address: {}", e))?,
                ),
            ),
            None => (s, None),
        };
        if name.is_empty() {
            Err(anyhow!("the host name cannot be empty"))
        } else {
            Ok(Self(Host::new(name, address)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_description_from_str_splits_name_and_address() {
        let description: HostDescription = "web.lab.example=10.0.0.5".parse().unwrap();
        assert_eq!(
            description.0,
            Host::new("web.lab.example", Some(Ipv4Addr::new(10, 0, 0, 5))),
        );
        let description: HostDescription = "switch.lab.example".parse().unwrap();
        assert_eq!(description.0, Host::new("switch.lab.example", None));
    }

    #[test]
    fn install_defaults_to_the_stock_bind_paths() {
        let args = Args::try_parse_from(["zonegen", "install", "--metadata", "zones.json"]).unwrap();
        match args.command {
            Command::Install(install) => {
                assert_eq!(install.zone_dir, PathBuf::from(DEFAULT_ZONE_DIR));
                assert_eq!(install.conf, PathBuf::from(DEFAULT_CONF_PATH));
                assert_eq!(install.named_conf, PathBuf::from(DEFAULT_NAMED_CONF_PATH));
            }
            Command::Render(_) => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn host_description_from_str_rejects_bad_input() {
        assert!("web.lab.example=10.0.0".parse::<HostDescription>().is_err());
        assert!("=10.0.0.5".parse::<HostDescription>().is_err());
    }
}
