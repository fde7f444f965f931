// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `pipeline.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::externaldns::KeyValueEntry;
    use crate::sls::SlsNetwork;
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedNetwork(serde_json::Value);

    #[async_trait]
    impl NetworkInventorySource for FixedNetwork {
        async fn fetch_network(&self, _network: &str) -> Result<SlsNetwork, SourceError> {
            serde_json::from_value(self.0.clone()).map_err(|e| SourceError::MalformedResponse {
                source_name: "sls".to_string(),
                reason: e.to_string(),
            })
        }
    }

    struct FixedDump(Vec<KeyValueEntry>);

    #[async_trait]
    impl DnsStoreDumpSource for FixedDump {
        async fn dump(&self) -> Result<Vec<KeyValueEntry>, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct FixedDomain(&'static str);

    #[async_trait]
    impl DomainSuffixProvider for FixedDomain {
        async fn external_domain(&self) -> Result<String, SourceError> {
            Ok(self.0.to_string())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl DnsStoreDumpSource for Unreachable {
        async fn dump(&self) -> Result<Vec<KeyValueEntry>, SourceError> {
            Err(SourceError::NoReplicas {
                namespace: "services".to_string(),
                selector: "etcd_cluster=cray-externaldns-etcd".to_string(),
            })
        }
    }

    fn can_network() -> FixedNetwork {
        FixedNetwork(json!({
            "Name": "CAN",
            "IPRanges": ["10.1.0.0/16"],
            "ExtraProperties": {
                "Subnets": [
                    {
                        "Name": "bootstrap_dhcp",
                        "CIDR": "10.1.0.0/24",
                        "IPReservations": [
                            {"Name": "ncn-m001", "IPAddress": "10.1.0.5", "Aliases": ["master"]}
                        ]
                    },
                    {"Name": "empty", "CIDR": "10.1.1.0/24"}
                ]
            }
        }))
    }

    fn settings() -> GenerateSettings {
        GenerateSettings::new("ns.example.com")
    }

    #[tokio::test]
    async fn test_reservation_and_alias_scenario() {
        let update = generate(
            &can_network(),
            &FixedDump(Vec::new()),
            &FixedDomain("can.example.com"),
            &settings(),
        )
        .await
        .unwrap();

        let expected = "server ns.example.com 53\n\
                        \n\
                        zone can.example.com\n\
                        update add master.can.example.com 86400 A 10.1.0.5\n\
                        update add ncn-m001.can.example.com 86400 A 10.1.0.5\n\
                        \n\
                        show\n\
                        send\n\
                        answer\n\
                        \n\
                        zone 1.10.in-addr.arpa.\n\
                        update add 5.0.1.10.in-addr.arpa. 86400 PTR master.can.example.com\n\
                        update add 5.0.1.10.in-addr.arpa. 86400 PTR ncn-m001.can.example.com\n\
                        \n\
                        show\n\
                        send\n\
                        answer\n";
        assert_eq!(update.script, expected);
        assert_eq!(update.forward_zone, "can.example.com");
        assert_eq!(update.reverse_zone, "1.10.in-addr.arpa.");
        assert_eq!(update.stats.accepted, 2);
    }

    #[tokio::test]
    async fn test_bad_entry_does_not_abort_later_entries() {
        let dump = FixedDump(vec![
            KeyValueEntry::from_plain("/skydns/com/example/can/broken/1", r#"{"text":"x"}"#),
            KeyValueEntry::from_plain("/skydns/com/example/can/vcs/2", r#"{"host":"10.1.0.20"}"#),
        ]);

        let update = generate(&can_network(), &dump, &FixedDomain("can.example.com"), &settings())
            .await
            .unwrap();

        assert!(update
            .script
            .contains("update add vcs.can.example.com 86400 A 10.1.0.20\n"));
        assert!(!update.script.contains("broken"));
        assert_eq!(update.stats.skipped, 1);
        assert_eq!(update.stats.accepted, 3);
    }

    #[tokio::test]
    async fn test_out_of_scope_address_yields_nothing() {
        let dump = FixedDump(vec![KeyValueEntry::from_plain(
            "/skydns/com/example/can/outside/1",
            r#"{"host":"192.168.1.1"}"#,
        )]);

        let update = generate(&can_network(), &dump, &FixedDomain("can.example.com"), &settings())
            .await
            .unwrap();

        assert!(!update.script.contains("192.168.1.1"));
        assert!(!update.script.contains("1.1.168.192"));
        assert!(!update.script.contains("outside"));
        assert_eq!(update.stats.out_of_scope, 1);
    }

    #[tokio::test]
    async fn test_duplicates_across_sources() {
        let dump = FixedDump(vec![KeyValueEntry::from_plain(
            "/skydns/com/example/can/ncn-m001/abc",
            r#"{"host":"10.1.0.5"}"#,
        )]);

        let preserved = generate(
            &can_network(),
            &dump,
            &FixedDomain("can.example.com"),
            &settings(),
        )
        .await
        .unwrap();

        let mut dedupe = settings();
        dedupe.duplicate_policy = DuplicatePolicy::Deduplicate;
        let deduplicated = generate(&can_network(), &dump, &FixedDomain("can.example.com"), &dedupe)
            .await
            .unwrap();

        let line = "update add ncn-m001.can.example.com 86400 A 10.1.0.5";
        assert_eq!(preserved.script.matches(line).count(), 2);
        assert_eq!(deduplicated.script.matches(line).count(), 1);
        assert_eq!(deduplicated.stats.duplicates, 1);
    }

    #[tokio::test]
    async fn test_generation_is_idempotent() {
        let dump = FixedDump(vec![
            KeyValueEntry::from_plain("/skydns/com/example/can/b/1", r#"{"host":"10.1.3.4"}"#),
            KeyValueEntry::from_plain("/skydns/com/example/can/a/2", r#"{"host":"10.1.2.3"}"#),
        ]);

        let first = generate(&can_network(), &dump, &FixedDomain("can.example.com"), &settings())
            .await
            .unwrap();
        let second = generate(&can_network(), &dump, &FixedDomain("can.example.com"), &settings())
            .await
            .unwrap();

        assert_eq!(first.script, second.script);
    }

    #[tokio::test]
    async fn test_fatal_source_error_produces_no_output() {
        let err = generate(
            &can_network(),
            &Unreachable,
            &FixedDomain("can.example.com"),
            &settings(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SourceError::NoReplicas { .. }));
    }

    #[tokio::test]
    async fn test_missing_ip_ranges_is_fatal() {
        let network = FixedNetwork(json!({"Name": "CAN"}));

        let err = generate(
            &network,
            &FixedDump(Vec::new()),
            &FixedDomain("can.example.com"),
            &settings(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SourceError::MissingField { .. }));
    }

    #[tokio::test]
    async fn test_missing_subnets_is_fatal() {
        let network = FixedNetwork(json!({"Name": "CAN", "IPRanges": ["10.1.0.0/16"]}));

        let err = generate(
            &network,
            &FixedDump(Vec::new()),
            &FixedDomain("can.example.com"),
            &settings(),
        )
        .await
        .unwrap_err();

        match err {
            SourceError::MissingField { field, .. } => assert_eq!(field, "ExtraProperties.Subnets"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wrong_typed_reservation_is_skipped() {
        let network = FixedNetwork(json!({
            "Name": "CAN",
            "IPRanges": ["10.1.0.0/16"],
            "ExtraProperties": {
                "Subnets": [{
                    "Name": "bootstrap_dhcp",
                    "IPReservations": [
                        {"Name": "ncn-m001", "IPAddress": "10.1.0.5"},
                        {"Name": "bad", "IPAddress": 10}
                    ]
                }]
            }
        }));

        let update = generate(
            &network,
            &FixedDump(Vec::new()),
            &FixedDomain("can.example.com"),
            &settings(),
        )
        .await
        .unwrap();

        assert!(update
            .script
            .contains("update add ncn-m001.can.example.com 86400 A 10.1.0.5\n"));
        assert_eq!(update.stats.accepted, 1);
        assert_eq!(update.stats.skipped, 1);
    }

    struct LabelledDomain;

    #[async_trait]
    impl DomainSuffixProvider for LabelledDomain {
        async fn external_domain(&self) -> Result<String, SourceError> {
            Ok("can.example.com".to_string())
        }

        fn source_label(&self) -> &'static str {
            "pipeline_test_domain"
        }
    }

    #[tokio::test]
    async fn test_fetch_duration_is_labelled_by_source() {
        let histogram =
            crate::metrics::SOURCE_FETCH_DURATION_SECONDS.with_label_values(&["pipeline_test_domain"]);
        let before = histogram.get_sample_count();

        generate(&can_network(), &FixedDump(Vec::new()), &LabelledDomain, &settings())
            .await
            .unwrap();

        assert_eq!(histogram.get_sample_count(), before + 1);
    }

    #[tokio::test]
    async fn test_custom_server_and_port() {
        let mut custom = settings();
        custom.dns_server = "10.92.100.85".to_string();
        custom.port = 5353;

        let update = generate(
            &can_network(),
            &FixedDump(Vec::new()),
            &FixedDomain("can.example.com"),
            &custom,
        )
        .await
        .unwrap();

        assert!(update.script.starts_with("server 10.92.100.85 5353\n\n"));
    }
}
