use std::net::{Ipv4Addr, Ipv6Addr};
use std::ops::Range;
use std::str::FromStr;

use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use regex_automata::meta::Regex;
use regex_automata::{Input, MatchKind};
use regex_syntax::hir::Hir;

use crate::ipset::Family;

/// Candidate IPv4 address or network: four dot-separated 1-3 digit groups
/// with an optional 1-2 digit prefix length. Range-invalid octets (e.g. 999)
/// are accepted here and rejected by validation.
static IPV4_PATTERN: &str = r"(?:[0-9]{1,3}\.){3}[0-9]{1,3}(?:/[0-9]{1,2})?";

/// One hextet of an IPv6 address.
static HEXTET: &str = r"[0-9A-Fa-f]{1,4}";

/// A dotted quad with range-checked octets, as embedded in mapped forms.
static QUAD: &str = r"(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";

/// Candidate IPv6 grammar: every elision form, trailing embedded dotted-quad
/// forms, an optional zone index, and an optional 1-3 digit prefix length.
///
/// The whole match is the candidate token. The engine is leftmost-first, so
/// branch order matters: branches that carry a longer tail come before
/// branches matching a prefix of them, otherwise e.g. `2001:db8::1` would
/// stop at `2001:db8::`.
fn ipv6_pattern() -> String {
    let branches = [
        // All eight hextets.
        format!("(?:{HEXTET}:){{7}}{HEXTET}"),
        // Six hextets and an embedded trailing quad.
        format!("(?:{HEXTET}:){{6}}{QUAD}"),
        // ::ffff:q.q.q.q mapped form, with or without the ffff run.
        format!("::(?:[Ff]{{4}}(?::0{{1,4}})?:)?{QUAD}"),
        // Elision followed by an embedded trailing quad.
        format!("(?:{HEXTET}:){{1,4}}:{QUAD}"),
        // Single mid-run elision, longest tails first.
        format!("{HEXTET}:(?::{HEXTET}){{1,6}}"),
        format!("(?:{HEXTET}:){{1,2}}(?::{HEXTET}){{1,5}}"),
        format!("(?:{HEXTET}:){{1,3}}(?::{HEXTET}){{1,4}}"),
        format!("(?:{HEXTET}:){{1,4}}(?::{HEXTET}){{1,3}}"),
        format!("(?:{HEXTET}:){{1,5}}(?::{HEXTET}){{1,2}}"),
        format!("(?:{HEXTET}:){{1,6}}:{HEXTET}"),
        // Trailing elision.
        format!("(?:{HEXTET}:){{1,7}}:"),
        // Leading elision and the bare `::`.
        format!(":(?:(?::{HEXTET}){{1,7}}|:)"),
    ];
    format!(
        "(?:{})(?:%[0-9A-Za-z]+)?(?:/[0-9]{{1,3}})?",
        branches.join("|")
    )
}

/// A searcher for candidate address tokens of one family embedded in text.
///
/// Matches are syntactic candidates only; callers validate each one with
/// [`parse_candidate`] before use.
#[derive(Clone, Debug)]
pub struct Extractor {
    regex: Regex,
    family: Family,
}

impl Extractor {
    /// Compile the candidate grammar for a family.
    pub fn new(family: Family) -> anyhow::Result<Extractor> {
        let pattern = match family {
            Family::V4 => IPV4_PATTERN.to_string(),
            Family::V6 => ipv6_pattern(),
        };
        let hir: Hir = regex_syntax::Parser::new().parse(&pattern)?;

        let regex = Regex::builder()
            .configure(
                Regex::config()
                    .auto_prefilter(true)
                    .match_kind(MatchKind::LeftmostFirst),
            )
            .build_from_hir(&hir)?;

        Ok(Extractor { regex, family })
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Return an iterator of candidate token ranges found in the haystack.
    ///
    /// The regex engine has no lookaround, so the boundary rules of the
    /// grammar are applied here on the bytes adjacent to each match: a
    /// candidate embedded in a longer dotted or hex run is discarded, and
    /// scanning resumes one byte past the discarded start so a shorter
    /// candidate inside it can still surface, as a lookbehind would allow.
    /// Overlapping candidates are not deduplicated; the address set is.
    pub fn find_iter<'a>(&'a self, haystack: &'a [u8]) -> impl Iterator<Item = Range<usize>> + 'a {
        let mut at = 0usize;
        std::iter::from_fn(move || {
            while at <= haystack.len() {
                let input = Input::new(haystack).range(at..);
                let range = self.regex.find(input)?.range();
                if self.boundary_ok(haystack, &range) {
                    at = range.end;
                    return Some(range);
                }
                at = range.start + 1;
            }
            None
        })
    }

    #[inline]
    fn boundary_ok(&self, haystack: &[u8], range: &Range<usize>) -> bool {
        match self.family {
            Family::V4 => v4_boundary_ok(haystack, range),
            Family::V6 => v6_boundary_ok(haystack, range),
        }
    }
}

/// An IPv4 candidate must not touch a `.` on either side.
#[inline]
fn v4_boundary_ok(haystack: &[u8], range: &Range<usize>) -> bool {
    let before = range.start.checked_sub(1).map(|i| haystack[i]);
    let after = haystack.get(range.end).copied();
    before != Some(b'.') && after != Some(b'.')
}

/// An IPv6 candidate must not be preceded by an alphanumeric or `.`, and
/// must not be followed by anything that marks it as a fragment of a longer
/// token.
#[inline]
fn v6_boundary_ok(haystack: &[u8], range: &Range<usize>) -> bool {
    let before = range.start.checked_sub(1).map(|i| haystack[i]);
    if before.is_some_and(|b| b.is_ascii_alphanumeric() || b == b'.') {
        return false;
    }
    let after = haystack.get(range.end).copied();
    !after.is_some_and(|b| b.is_ascii_alphanumeric() || b == b':' || b == b'.')
}

/// Strictly validate a candidate token against the family's address rules.
///
/// A token containing `/` must parse as a network: a legal base address and
/// a numeric prefix length within the family bound (0-32 for IPv4, 0-128 for
/// IPv6). Any other token must parse as a bare address, which gets the
/// full-length prefix. Returns `None` for every malformed candidate; a
/// rejection is expected and silent, never an error.
pub fn parse_candidate(token: &str, family: Family) -> Option<IpNetwork> {
    match token.split_once('/') {
        Some((addr, prefix)) => {
            let prefix: u8 = prefix.parse().ok()?;
            if prefix > family.max_prefix() {
                return None;
            }
            match family {
                Family::V4 => {
                    let addr = Ipv4Addr::from_str(addr).ok()?;
                    Some(IpNetwork::V4(Ipv4Network::new(addr, prefix).ok()?))
                }
                Family::V6 => {
                    let addr = Ipv6Addr::from_str(addr).ok()?;
                    Some(IpNetwork::V6(Ipv6Network::new(addr, prefix).ok()?))
                }
            }
        }
        None => match family {
            Family::V4 => {
                let addr = Ipv4Addr::from_str(token).ok()?;
                Some(IpNetwork::V4(Ipv4Network::new(addr, 32).ok()?))
            }
            Family::V6 => {
                let addr = Ipv6Addr::from_str(token).ok()?;
                Some(IpNetwork::V6(Ipv6Network::new(addr, 128).ok()?))
            }
        },
    }
}
