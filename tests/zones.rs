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

//! End-to-end tests of zone generation through the public API.

use std::net::Ipv4Addr;

use lazy_static::lazy_static;

use zonegen::job::Job;
use zonegen::metadata::ZoneFiles;
use zonegen::observer::NoopObserver;
use zonegen::rr::{Record, Type};
use zonegen::tree::{Children, Host, Overlay, ZoneNode};

lazy_static! {
    static ref DNS: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
    static ref HOSTS: Vec<Host> = vec![
        Host::new("web.lab.example", "10.0.0.5".parse().ok()),
        Host::new("db.lab.example", "10.0.0.6".parse().ok()),
        Host::new("mail.example", "10.0.1.2".parse().ok()),
        Host::new("gw.corp.test", "192.168.7.1".parse().ok()),
        Host::new("switch.lab.example", None),
    ];
}

fn generate(job: &Job) -> ZoneFiles {
    job.run(&mut NoopObserver).unwrap().files
}

/// Splits `name` into its first label and the name of its parent.
fn split_first_label(name: &str) -> (&str, &str) {
    name.split_once('.').unwrap()
}

#[test]
fn single_host_scenario() {
    let job = Job::new(HOSTS[..1].to_vec(), *DNS);
    let files = generate(&job);

    let root = files.get("").unwrap();
    assert!(root.starts_with("$ORIGIN .\n$TTL 5m\n@ IN SOA ns. noemail.noreply.org (\n"));
    assert!(root.contains(". IN NS ns.\nns. IN A 10.0.0.1\n"));
    assert!(root.contains("example.\tIN\tNS\tns.example.\nns.example.\tIN\tA\t10.0.0.1\n"));
    assert!(root.contains("arpa.\tIN\tNS\tns.arpa.\nns.arpa.\tIN\tA\t10.0.0.1\n"));

    let lab = files.get("lab.example.").unwrap();
    assert!(lab.starts_with("$ORIGIN lab.example.\n"));
    assert!(lab.ends_with("\nweb\tIN\tA\t10.0.0.5\n"));

    let reverse = files.get("0.0.10.in-addr.arpa.").unwrap();
    assert!(reverse.ends_with("\n5\tIN\tPTR\tweb.lab.example.\n"));
}

#[test]
fn every_host_has_forward_and_reverse_records() {
    let files = generate(&Job::new(HOSTS.clone(), *DNS));

    for host in HOSTS.iter() {
        let address = match host.address {
            Some(address) => address,
            None => continue,
        };
        let (label, parent) = split_first_label(&host.name);
        let forward = files.get(&format!("{}.", parent)).unwrap();
        assert!(forward.contains(&format!("\n{}\tIN\tA\t{}\n", label, address)));

        let [a, b, c, d] = address.octets();
        let reverse = files.get(&format!("{}.{}.{}.in-addr.arpa.", c, b, a)).unwrap();
        assert!(reverse.contains(&format!("\n{}\tIN\tPTR\t{}.\n", d, host.name)));
    }

    // Hosts without an address appear nowhere.
    assert!(files.iter().all(|(_, text)| !text.contains("switch")));
}

#[test]
fn every_zone_has_exactly_one_glue_record() {
    let files = generate(&Job::new(HOSTS.clone(), *DNS));

    for (zone, text) in files.iter() {
        if zone.is_empty() {
            continue;
        }
        let ns = format!("{}\tIN\tNS\tns.{}\n", zone, zone);
        let a = format!("ns.{}\tIN\tA\t10.0.0.1\n", zone);
        assert_eq!(text.matches(&ns).count(), 1, "NS glue of {}", zone);
        assert_eq!(text.matches(&a).count(), 1, "A glue of {}", zone);
    }

    let root = files.get("").unwrap();
    for tld in ["example", "arpa", "test"] {
        let ns = format!("{}.\tIN\tNS\tns.{}.\n", tld, tld);
        assert_eq!(root.matches(&ns).count(), 1, "root delegation of {}", tld);
    }
}

#[test]
fn generation_is_deterministic() {
    let job = Job::new(HOSTS.clone(), *DNS);
    let first = job.run(&mut NoopObserver).unwrap();
    let second = job.run(&mut NoopObserver).unwrap();
    assert_eq!(first.files, second.files);
    assert_eq!(first.blob, second.blob);
    assert_eq!(ZoneFiles::unpack(&first.blob).unwrap(), first.files);
}

#[test]
fn overlay_adds_records_without_losing_hosts() {
    let mut example = Children::new();
    example.insert(
        "www",
        ZoneNode::Leaves(vec![Record::new(Type::CNAME, "web.lab.example.")]),
    );
    example.insert(
        "mail",
        ZoneNode::Leaves(vec![Record::new(Type::A, "10.0.1.3")]),
    );
    let mut overlay = Overlay::new();
    overlay.insert("example", ZoneNode::Interior(example));
    overlay.insert(
        "internal",
        ZoneNode::Interior(Children::from_iter([(
            String::from("ldap"),
            ZoneNode::Leaves(vec![Record::new(Type::A, "10.9.9.9")]),
        )])),
    );

    let mut job = Job::new(HOSTS.clone(), *DNS);
    job.overlay = Some(overlay);
    let files = generate(&job);

    let example = files.get("example.").unwrap();
    assert!(example.contains("\nmail\tIN\tA\t10.0.1.3\n"));
    assert!(!example.contains("10.0.1.2\n"));
    assert!(example.contains("\nwww\tIN\tCNAME\tweb.lab.example.\n"));
    assert!(files
        .get("lab.example.")
        .unwrap()
        .contains("\nweb\tIN\tA\t10.0.0.5\n"));

    assert!(files
        .get("internal.")
        .unwrap()
        .ends_with("\nldap\tIN\tA\t10.9.9.9\n"));
    assert!(files
        .get("")
        .unwrap()
        .contains("internal.\tIN\tNS\tns.internal.\n"));
}

#[test]
fn empty_inventory_still_has_a_root_zone() {
    let files = generate(&Job::new(Vec::new(), *DNS));
    assert_eq!(files.len(), 1);
    assert!(files.get("").unwrap().ends_with("\n. IN NS ns.\nns. IN A 10.0.0.1\n"));
}

#[test]
fn hosts_with_empty_labels_produce_no_zones() {
    let hosts = vec![
        Host::new("web..example", "10.0.0.5".parse().ok()),
        Host::new("db.example", "10.0.0.6".parse().ok()),
    ];
    let files = generate(&Job::new(hosts, *DNS));
    assert!(files.iter().all(|(zone, _)| !zone.starts_with('.') && !zone.contains("..")));
    assert!(files.get("0.0.10.in-addr.arpa.").unwrap().contains("\n6\tIN\tPTR\tdb.example.\n"));
    assert!(files.iter().all(|(_, text)| !text.contains("10.0.0.5")));
}
