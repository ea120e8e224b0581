use std::io::{self, Write};

use crate::ipset::{AddressSet, Family};

/// Section banner used between the per-family report sections.
const RULE: &str = "================";

fn family_header(family: Family) -> &'static str {
    match family {
        Family::V4 => "IPv4 addresses:",
        Family::V6 => "IPv6 addresses:",
    }
}

/// Render one family's result as report lines.
///
/// A non-empty set yields one CIDR per line, ascending by base address. An
/// empty set yields the single no-result line naming the scraped URL.
pub fn render(set: &AddressSet, url: &str) -> Vec<String> {
    if set.is_empty() {
        vec![format!("No addresses found when scraping {url}")]
    } else {
        set.cidrs().iter().map(|net| net.to_string()).collect()
    }
}

/// Write the full report: IPv4 section then IPv6 section, always both, in
/// that order, regardless of emptiness.
pub fn write_report<W: Write>(
    out: &mut W,
    v4: &AddressSet,
    v6: &AddressSet,
    url: &str,
) -> io::Result<()> {
    for set in [v4, v6] {
        writeln!(out, "{RULE}")?;
        writeln!(out, "{}", family_header(set.family()))?;
        for line in render(set, url) {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}
