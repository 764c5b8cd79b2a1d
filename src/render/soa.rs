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

//! The SOA boilerplate that starts every generated zone file.

use std::fmt::Write;

use lazy_static::lazy_static;
use serde::Deserialize;

lazy_static! {
    /// The SOA timers used unless configuration overrides them.
    pub static ref DEFAULT_SOA_TIMERS: SoaTimers = SoaTimers {
        serial: String::from("2014080800"),
        refresh: String::from("3h"),
        retry: String::from("15M"),
        expire: String::from("3W12h"),
        minimum: String::from("2h20M"),
    };
}

/// The serial and timer fields of the SOA record.
///
/// These are written to the zone file verbatim, so the timers may use
/// the unit suffixes BIND understands (`3h`, `3W12h`, ...).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SoaTimers {
    pub serial: String,
    pub refresh: String,
    pub retry: String,
    pub expire: String,
    pub minimum: String,
}

impl Default for SoaTimers {
    fn default() -> Self {
        DEFAULT_SOA_TIMERS.clone()
    }
}

/// Produces the `$ORIGIN`, `$TTL`, and SOA lines for `zone`, which is
/// either a fully qualified name or the empty string for the root.
pub fn boilerplate(zone: &str, timers: &SoaTimers) -> String {
    let mut text = String::new();
    if zone.is_empty() {
        text.push_str("$ORIGIN .\n");
    } else {
        writeln!(text, "$ORIGIN {}", zone).unwrap();
    }
    text.push_str("$TTL 5m\n");
    writeln!(text, "@ IN SOA ns.{} noemail.noreply.org (", zone).unwrap();
    writeln!(text, "\t\t\t{}", timers.serial).unwrap();
    writeln!(text, "\t\t\t{}", timers.refresh).unwrap();
    writeln!(text, "\t\t\t{}", timers.retry).unwrap();
    writeln!(text, "\t\t\t{}", timers.expire).unwrap();
    writeln!(text, "\t\t\t{} )", timers.minimum).unwrap();
    text
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_boilerplate_uses_a_dot_origin() {
        assert_eq!(
            boilerplate("", &SoaTimers::default()),
            "$ORIGIN .\n\
             $TTL 5m\n\
             @ IN SOA ns. noemail.noreply.org (\n\
             \t\t\t2014080800\n\
             \t\t\t3h\n\
             \t\t\t15M\n\
             \t\t\t3W12h\n\
             \t\t\t2h20M )\n",
        );
    }

    #[test]
    fn zone_boilerplate_names_the_zone() {
        let timers = SoaTimers {
            serial: String::from("7"),
            ..SoaTimers::default()
        };
        let text = boilerplate("lab.example.", &timers);
        assert!(text.starts_with("$ORIGIN lab.example.\n$TTL 5m\n"));
        assert!(text.contains("@ IN SOA ns.lab.example. noemail.noreply.org (\n\t\t\t7\n"));
    }
}
