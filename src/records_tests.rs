// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `records.rs`

use super::*;

fn supernet() -> Supernet {
    Supernet::parse("10.1.0.0/16").unwrap()
}

#[test]
fn test_build_pair_in_scope() {
    let (forward, reverse) = build_pair(
        "ncn-m001.can.example.com",
        "10.1.0.5".parse().unwrap(),
        &supernet(),
    )
    .expect("address is inside the supernet");

    assert_eq!(forward.kind, DirectiveKind::Forward);
    assert_eq!(forward.record_type, RecordType::A);
    assert_eq!(
        forward.to_string(),
        "update add ncn-m001.can.example.com 86400 A 10.1.0.5"
    );

    assert_eq!(reverse.kind, DirectiveKind::Reverse);
    assert_eq!(reverse.record_type, RecordType::Ptr);
    assert_eq!(
        reverse.to_string(),
        "update add 5.0.1.10.in-addr.arpa. 86400 PTR ncn-m001.can.example.com"
    );
}

#[test]
fn test_build_pair_out_of_scope() {
    let result = build_pair(
        "router.example.com",
        "192.168.1.1".parse().unwrap(),
        &supernet(),
    );

    assert!(result.is_none());
}

#[test]
fn test_out_of_scope_for_any_name() {
    let outside: IpAddr = "10.2.0.1".parse().unwrap();

    for name in ["a", "b.example.com", "", "ncn-w001.can.example.com"] {
        assert!(
            build_pair(name, outside, &supernet()).is_none(),
            "{name} should produce nothing"
        );
    }
}

#[test]
fn test_reverse_name_matches_reverse_pointer() {
    let address: IpAddr = "10.1.3.42".parse().unwrap();
    let (_, reverse) = build_pair("uan01.can.example.com", address, &supernet()).unwrap();

    assert_eq!(reverse.name, reverse_pointer(address));
    assert_eq!(reverse.name, "42.3.1.10.in-addr.arpa.");
    assert_eq!(reverse.value, "uan01.can.example.com");
}

#[test]
fn test_ttl_is_constant() {
    let (forward, reverse) =
        build_pair("x.example.com", "10.1.0.9".parse().unwrap(), &supernet()).unwrap();

    assert_eq!(forward.ttl, 86400);
    assert_eq!(reverse.ttl, 86400);
}

#[test]
fn test_ipv6_pair_uses_aaaa() {
    let v6 = Supernet::parse("2001:db8::/32").unwrap();
    let (forward, reverse) =
        build_pair("v6.example.com", "2001:db8::1".parse().unwrap(), &v6).unwrap();

    assert_eq!(
        forward.to_string(),
        "update add v6.example.com 86400 AAAA 2001:db8::1"
    );
    assert!(reverse.name.ends_with(".8.b.d.0.1.0.0.2.ip6.arpa."));
    assert_eq!(reverse.name.split('.').filter(|l| l.len() == 1).count(), 32);
}

#[test]
fn test_reverse_pointer_ipv4() {
    assert_eq!(
        reverse_pointer("192.0.2.1".parse().unwrap()),
        "1.2.0.192.in-addr.arpa."
    );
    assert_eq!(
        reverse_pointer("0.0.0.0".parse().unwrap()),
        "0.0.0.0.in-addr.arpa."
    );
}

#[test]
fn test_host_address_pair_new() {
    let pair = HostAddressPair::new(
        "vcs.shandy.dev.cray.com",
        "10.1.0.7".parse().unwrap(),
        RecordOrigin::ExternalDns,
    );

    assert_eq!(pair.name, "vcs.shandy.dev.cray.com");
    assert_eq!(pair.origin, RecordOrigin::ExternalDns);
}
