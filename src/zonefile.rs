// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Rendering of the final nsupdate script.
//!
//! The script updates two zones in two transactions: the forward zone named
//! after the external DNS domain, then the reverse zone derived from the
//! supernet. Directives within each zone are sorted by their text so that
//! consecutive runs produce diff-friendly, byte-identical output.
//!
//! ```text
//! server ns.example.com 53
//!
//! zone can.example.com
//! update add ncn-m001.can.example.com 86400 A 10.1.0.5
//!
//! show
//! send
//! answer
//!
//! zone 1.10.in-addr.arpa.
//! update add 5.0.1.10.in-addr.arpa. 86400 PTR ncn-m001.can.example.com
//!
//! show
//! send
//! answer
//! ```

use crate::classifier::Supernet;
use crate::records::{reverse_pointer, Directive};

/// Trailer closing each zone's transaction.
const TRANSACTION_TRAILER: [&str; 3] = ["show", "send", "answer"];

/// Name of the reverse zone covering `supernet`.
///
/// This is the reverse pointer of the network address with its leading `0`
/// labels removed, e.g. `10.1.0.0/16` gives `1.10.in-addr.arpa.`.
#[must_use]
pub fn reverse_zone_name(supernet: &Supernet) -> String {
    let pointer = reverse_pointer(supernet.network_address());
    let mut zone = pointer.as_str();
    while let Some(rest) = zone.strip_prefix("0.") {
        zone = rest;
    }
    zone.to_string()
}

/// Text of each directive, sorted ascending.
#[must_use]
pub fn sorted_lines(directives: &[Directive]) -> Vec<String> {
    let mut lines: Vec<String> = directives.iter().map(ToString::to_string).collect();
    lines.sort();
    lines
}

/// Render the complete nsupdate script.
///
/// Pure formatting: writing the text anywhere is up to the caller.
#[must_use]
pub fn render(
    forward: &[Directive],
    reverse: &[Directive],
    dns_server: &str,
    port: u16,
    forward_zone: &str,
    supernet: &Supernet,
) -> String {
    let mut lines: Vec<String> = vec![format!("server {dns_server} {port}")];

    push_zone(&mut lines, forward_zone, sorted_lines(forward));
    push_zone(&mut lines, &reverse_zone_name(supernet), sorted_lines(reverse));

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

fn push_zone(lines: &mut Vec<String>, zone: &str, directives: Vec<String>) {
    lines.push(String::new());
    lines.push(format!("zone {zone}"));
    lines.extend(directives);
    lines.push(String::new());
    lines.extend(TRANSACTION_TRAILER.iter().map(ToString::to_string));
}

#[cfg(test)]
#[path = "zonefile_tests.rs"]
mod zonefile_tests;
