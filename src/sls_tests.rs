// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `sls.rs`

use super::*;
use serde_json::json;

fn network(value: serde_json::Value) -> SlsNetwork {
    serde_json::from_value(value).expect("fixture should deserialize")
}

fn can_network() -> SlsNetwork {
    network(json!({
        "Name": "CAN",
        "FullName": "Customer Access Network",
        "IPRanges": ["10.1.0.0/16"],
        "Type": "ethernet",
        "ExtraProperties": {
            "CIDR": "10.1.0.0/16",
            "Subnets": [
                {
                    "Name": "bootstrap_dhcp",
                    "CIDR": "10.1.0.0/24",
                    "IPReservations": [
                        { "Name": "ncn-m001", "IPAddress": "10.1.0.5", "Aliases": ["master"] },
                        { "Name": "ncn-w001", "IPAddress": "10.1.0.6" }
                    ]
                },
                {
                    "Name": "can_metallb_address_pool",
                    "CIDR": "10.1.1.0/24"
                }
            ]
        }
    }))
}

#[test]
fn test_supernet_from_first_range() {
    let mut net = can_network();
    net.ip_ranges = Some(vec!["10.1.0.0/16".to_string(), "10.2.0.0/16".to_string()]);

    let supernet = net.supernet().unwrap();
    assert_eq!(supernet.to_string(), "10.1.0.0/16");
}

#[test]
fn test_supernet_missing_ranges_is_fatal() {
    let net = network(json!({ "Name": "CAN" }));

    match net.supernet() {
        Err(SourceError::MissingField { field, .. }) => assert_eq!(field, "IPRanges"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_supernet_empty_ranges_is_fatal() {
    let net = network(json!({ "Name": "CAN", "IPRanges": [] }));

    match net.supernet() {
        Err(SourceError::MissingField { field, .. }) => assert_eq!(field, "IPRanges[0]"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_primary_names_and_aliases() {
    let net = can_network();
    let pairs: Vec<HostAddressPair> = host_pairs(net.subnets().unwrap(), "can.example.com")
        .collect::<Result<_, _>>()
        .unwrap();

    let names: Vec<&str> = pairs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "ncn-m001.can.example.com",
            "master.can.example.com",
            "ncn-w001.can.example.com"
        ]
    );

    assert_eq!(pairs[0].address, pairs[1].address);
    assert_eq!(pairs[2].address.to_string(), "10.1.0.6");
    assert!(pairs.iter().all(|p| p.origin == RecordOrigin::Sls));
}

#[test]
fn test_subnets_without_reservations_are_skipped() {
    let net = network(json!({
        "IPRanges": ["10.1.0.0/16"],
        "ExtraProperties": { "Subnets": [ { "Name": "empty" } ] }
    }));

    assert_eq!(host_pairs(net.subnets().unwrap(), "can.example.com").count(), 0);
}

#[test]
fn test_empty_subnet_list_yields_nothing() {
    let net = network(json!({
        "IPRanges": ["10.1.0.0/16"],
        "ExtraProperties": { "Subnets": [] }
    }));

    assert!(net.subnets().unwrap().is_empty());
}

#[test]
fn test_network_without_subnets_is_fatal() {
    for value in [
        json!({ "IPRanges": ["10.1.0.0/16"] }),
        json!({ "IPRanges": ["10.1.0.0/16"], "ExtraProperties": {} }),
    ] {
        match network(value).subnets() {
            Err(SourceError::MissingField { source_name, field }) => {
                assert_eq!(source_name, "sls");
                assert_eq!(field, "ExtraProperties.Subnets");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

#[test]
fn test_bad_reservation_does_not_stop_the_rest() {
    let net = network(json!({
        "IPRanges": ["10.1.0.0/16"],
        "ExtraProperties": {
            "Subnets": [{
                "Name": "bootstrap_dhcp",
                "IPReservations": [
                    { "Name": "broken", "IPAddress": "10.1.0.300", "Aliases": ["alias"] },
                    { "IPAddress": "10.1.0.7" },
                    { "Name": "no-address" },
                    { "Name": "ok", "IPAddress": "10.1.0.8" }
                ]
            }]
        }
    }));

    let results: Vec<_> = host_pairs(net.subnets().unwrap(), "can.example.com").collect();
    assert_eq!(results.len(), 4);

    assert_eq!(
        results[0],
        Err(RecordParseError::InvalidReservationAddress {
            name: "broken".to_string(),
            address: "10.1.0.300".to_string(),
        })
    );
    assert_eq!(
        results[1],
        Err(RecordParseError::MissingReservationField {
            subnet: "bootstrap_dhcp".to_string(),
            field: "Name",
        })
    );
    assert_eq!(
        results[2],
        Err(RecordParseError::MissingReservationField {
            subnet: "bootstrap_dhcp".to_string(),
            field: "IPAddress",
        })
    );
    assert_eq!(
        results[3].as_ref().map(|p| p.name.as_str()),
        Ok("ok.can.example.com")
    );
}

#[test]
fn test_wrong_typed_reservations_are_isolated() {
    let net = network(json!({
        "IPRanges": ["10.1.0.0/16"],
        "ExtraProperties": {
            "Subnets": [{
                "Name": "bootstrap_dhcp",
                "IPReservations": [
                    { "Name": "ncn-m001", "IPAddress": "10.1.0.5" },
                    { "Name": "numeric-address", "IPAddress": 10 },
                    { "Name": 5, "IPAddress": "10.1.0.7" },
                    "not-an-object",
                    { "Name": "null-alias", "IPAddress": "10.1.0.6", "Aliases": [null, "kept"] }
                ]
            }]
        }
    }));

    let results: Vec<_> = host_pairs(net.subnets().unwrap(), "can.example.com").collect();
    assert_eq!(results.len(), 7);

    assert_eq!(
        results[0].as_ref().map(|p| p.name.as_str()),
        Ok("ncn-m001.can.example.com")
    );
    for (position, index) in [(1, 1), (2, 2), (3, 3)] {
        match &results[position] {
            Err(RecordParseError::MalformedReservation {
                subnet,
                index: reported,
                ..
            }) => {
                assert_eq!(subnet, "bootstrap_dhcp");
                assert_eq!(*reported, index);
            }
            other => panic!("unexpected result at {position}: {other:?}"),
        }
    }

    assert_eq!(
        results[4].as_ref().map(|p| p.name.as_str()),
        Ok("null-alias.can.example.com")
    );
    assert_eq!(
        results[5],
        Err(RecordParseError::MalformedAlias {
            name: "null-alias".to_string(),
            alias: "null".to_string(),
        })
    );
    assert_eq!(
        results[6].as_ref().map(|p| p.name.as_str()),
        Ok("kept.can.example.com")
    );
}

#[test]
fn test_empty_alias_is_reported() {
    let net = network(json!({
        "IPRanges": ["10.1.0.0/16"],
        "ExtraProperties": {
            "Subnets": [{
                "Name": "bootstrap_dhcp",
                "IPReservations": [
                    { "Name": "ncn-m001", "IPAddress": "10.1.0.5", "Aliases": [""] }
                ]
            }]
        }
    }));

    let results: Vec<_> = host_pairs(net.subnets().unwrap(), "can.example.com").collect();
    assert_eq!(
        results[1],
        Err(RecordParseError::MalformedAlias {
            name: "ncn-m001".to_string(),
            alias: "\"\"".to_string(),
        })
    );
}

#[test]
fn test_qualify() {
    assert_eq!(qualify("api", "can.example.com"), "api.can.example.com");
}
