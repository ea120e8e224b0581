use std::sync::OnceLock;

use ipnetwork::IpNetwork;

use crate::extractor::{parse_candidate, Extractor};
use crate::ipset::{AddressSet, Family};

static V4_EXTRACTOR: OnceLock<Extractor> = OnceLock::new();
static V6_EXTRACTOR: OnceLock<Extractor> = OnceLock::new();
static RESERVED_V4: OnceLock<AddressSet> = OnceLock::new();

fn v4_extractor() -> &'static Extractor {
    V4_EXTRACTOR.get_or_init(|| Extractor::new(Family::V4).expect("IPv4 grammar compiles"))
}

fn v6_extractor() -> &'static Extractor {
    V6_EXTRACTOR.get_or_init(|| Extractor::new(Family::V6).expect("IPv6 grammar compiles"))
}

/// The reserved IPv4 ranges subtracted from every scrape: "this network"
/// (0.0.0.0/8) and multicast/reserved space (224.0.0.0/3).
///
/// Process-wide constant with no configuration surface. IPv6 results have no
/// equivalent exclusion.
pub fn reserved_v4() -> &'static AddressSet {
    RESERVED_V4.get_or_init(|| {
        let ranges = ["0.0.0.0/8", "224.0.0.0/3"].map(|cidr| {
            IpNetwork::V4(cidr.parse().expect("reserved range literal parses"))
        });
        AddressSet::from_networks(Family::V4, ranges)
    })
}

/// Scan text with one family's grammar, keep the candidates that survive
/// strict validation, and aggregate them into a canonical set.
fn scan(extractor: &'static Extractor, text: &str) -> AddressSet {
    let haystack = text.as_bytes();
    let family = extractor.family();
    let validated = extractor.find_iter(haystack).filter_map(|range| {
        let token = std::str::from_utf8(&haystack[range]).ok()?;
        parse_candidate(token, family)
    });
    AddressSet::from_networks(family, validated)
}

/// Extract the IPv4 address set from page text.
///
/// Pure function of the input: grammar scan, strict validation, set
/// aggregation, then subtraction of [`reserved_v4`]. Never panics, never
/// errors; malformed candidates are silently dropped.
pub fn extract_ipv4(text: &str) -> AddressSet {
    let mut set = scan(v4_extractor(), text);
    set.subtract(reserved_v4());
    set
}

/// Extract the IPv6 address set from page text.
///
/// Same shape as [`extract_ipv4`] but with no exclusion subtraction.
pub fn extract_ipv6(text: &str) -> AddressSet {
    scan(v6_extractor(), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4_cidrs(text: &str) -> Vec<String> {
        extract_ipv4(text).cidrs().iter().map(|n| n.to_string()).collect()
    }

    fn v6_cidrs(text: &str) -> Vec<String> {
        extract_ipv6(text).cidrs().iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn empty_text_yields_empty_sets() {
        assert!(extract_ipv4("").is_empty());
        assert!(extract_ipv6("").is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "192.168.0.4 10.2.3.4 2001:db8::1 192.168.0.4";
        assert_eq!(extract_ipv4(text), extract_ipv4(text));
        assert_eq!(extract_ipv6(text), extract_ipv6(text));
        assert_eq!(v4_cidrs(text), v4_cidrs(text));
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(
            v4_cidrs("192.168.0.4 10.2.3.4 192.168.0.4 10.2.3.4"),
            vec!["10.2.3.4/32", "192.168.0.4/32"]
        );
    }

    #[test]
    fn out_of_range_octets_are_rejected() {
        assert!(extract_ipv4("260.1.3.4 260.1.5.5").is_empty());
    }

    #[test]
    fn reserved_ranges_are_excluded() {
        // 0.0.3.255 falls in 0.0.0.0/8; 255.255.192.0 falls in 224.0.0.0/3.
        assert!(extract_ipv4("0.0.3.255 255.255.192.0").is_empty());
    }

    #[test]
    fn exclusion_applies_to_v4_only() {
        // The IPv6 pipeline keeps loopback; the asymmetry is intentional.
        assert_eq!(v6_cidrs("::1"), vec!["::1/128"]);
    }

    #[test]
    fn whitespace_between_tokens_is_tolerated() {
        assert_eq!(
            v4_cidrs("\n192.168.0.1\n10.0.0.1\n"),
            vec!["10.0.0.1/32", "192.168.0.1/32"]
        );
    }

    #[test]
    fn network_literal_survives_unsplit() {
        assert_eq!(v4_cidrs("peering with 192.0.0.0/24 today"), vec!["192.0.0.0/24"]);
    }

    #[test]
    fn v6_literals_are_collected() {
        assert_eq!(
            v6_cidrs("hosts ::1 and 2a03:2880:2130:cf05::/64"),
            vec!["::1/128", "2a03:2880:2130:cf05::/64"]
        );
    }

    #[test]
    fn adjacent_addresses_merge_into_blocks() {
        assert_eq!(
            v4_cidrs("8.8.8.8 and 8.8.8.9 answered"),
            vec!["8.8.8.8/31"]
        );
    }

    #[test]
    fn garbage_never_panics() {
        let noisy = "999.999.999.999 1234.12341.12.3.3.4 word ::: 1.2.3.4.5.6 %%% /17";
        assert!(extract_ipv4(noisy).is_empty());
        assert!(extract_ipv6(noisy).is_empty());
    }

    #[test]
    fn families_do_not_cross_contaminate() {
        let text = "v4 8.8.4.4 v6 2001:db8::2";
        assert_eq!(v4_cidrs(text), vec!["8.8.4.4/32"]);
        assert_eq!(v6_cidrs(text), vec!["2001:db8::2/128"]);
    }
}
