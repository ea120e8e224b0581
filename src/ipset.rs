use std::net::{Ipv4Addr, Ipv6Addr};

use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};

/// Address family of a candidate token or an address set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Address width in bits.
    #[inline]
    pub fn width(self) -> u32 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    /// Longest legal prefix length for the family.
    #[inline]
    pub fn max_prefix(self) -> u8 {
        self.width() as u8
    }

    /// Family of a parsed network value.
    #[inline]
    pub fn of(net: &IpNetwork) -> Family {
        match net {
            IpNetwork::V4(_) => Family::V4,
            IpNetwork::V6(_) => Family::V6,
        }
    }
}

/// A canonical set of addresses for one family.
///
/// The set is held as sorted, inclusive `(start, end)` ranges over the
/// address space, widened to `u128` so both families share the arithmetic.
/// Invariant: ranges are disjoint and never adjacent. Any union or
/// difference re-establishes maximally-merged form, so structural equality
/// is set equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressSet {
    family: Family,
    ranges: Vec<(u128, u128)>,
}

impl AddressSet {
    /// Create an empty set for the given family.
    pub fn new(family: Family) -> AddressSet {
        AddressSet {
            family,
            ranges: Vec::new(),
        }
    }

    /// Build a set from validated networks, merging as it goes.
    ///
    /// Insertion is idempotent: duplicate and overlapping networks collapse
    /// into the covering range.
    pub fn from_networks<I>(family: Family, networks: I) -> AddressSet
    where
        I: IntoIterator<Item = IpNetwork>,
    {
        let mut set = AddressSet::new(family);
        for net in networks {
            set.insert(&net);
        }
        set
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Union the set with a single network.
    pub fn insert(&mut self, net: &IpNetwork) {
        debug_assert_eq!(Family::of(net), self.family);
        let (start, end) = bounds(net);
        self.insert_range(start, end);
    }

    /// Remove every address of `other` from the set.
    ///
    /// An exclusion falling in the interior of a range splits it in two.
    pub fn subtract(&mut self, other: &AddressSet) {
        debug_assert_eq!(other.family, self.family);
        for &(start, end) in &other.ranges {
            self.subtract_range(start, end);
        }
    }

    /// The minimal sequence of CIDR blocks exactly covering the set,
    /// ascending by base address.
    pub fn cidrs(&self) -> Vec<IpNetwork> {
        let width = self.family.width();
        let mut out = Vec::new();
        for &(start, end) in &self.ranges {
            let mut cur = start;
            loop {
                // Largest block that is aligned at `cur` and fits in the range.
                let align = if cur == 0 {
                    width
                } else {
                    cur.trailing_zeros().min(width)
                };
                let span = end - cur;
                let fit = if span == u128::MAX {
                    128
                } else {
                    (span + 1).ilog2()
                };
                let host = align.min(fit);
                out.push(self.network(cur, (width - host) as u8));
                if host >= 128 {
                    break;
                }
                cur = match cur.checked_add(1u128 << host) {
                    Some(next) if next <= end => next,
                    _ => break,
                };
            }
        }
        out
    }

    fn insert_range(&mut self, start: u128, end: u128) {
        let mut start = start;
        let mut end = end;
        let mut i = 0;
        while i < self.ranges.len() {
            let (s, e) = self.ranges[i];
            if e.checked_add(1).is_some_and(|next| next < start) {
                // Strictly left of the new range, not even adjacent.
                i += 1;
                continue;
            }
            if end.checked_add(1).is_some_and(|next| next < s) {
                // Strictly right: nothing further can touch the new range.
                break;
            }
            // Overlapping or adjacent: absorb and keep scanning from i.
            start = start.min(s);
            end = end.max(e);
            self.ranges.remove(i);
        }
        self.ranges.insert(i, (start, end));
    }

    fn subtract_range(&mut self, start: u128, end: u128) {
        let mut kept = Vec::with_capacity(self.ranges.len() + 1);
        for &(s, e) in &self.ranges {
            if e < start || s > end {
                kept.push((s, e));
                continue;
            }
            if s < start {
                kept.push((s, start - 1));
            }
            if e > end {
                kept.push((end + 1, e));
            }
        }
        self.ranges = kept;
    }

    fn network(&self, base: u128, prefix: u8) -> IpNetwork {
        match self.family {
            // UNWRAP: prefix is derived from the family width, never out of bounds
            Family::V4 => IpNetwork::V4(Ipv4Network::new(Ipv4Addr::from(base as u32), prefix).unwrap()),
            Family::V6 => IpNetwork::V6(Ipv6Network::new(Ipv6Addr::from(base), prefix).unwrap()),
        }
    }
}

/// Inclusive first/last address of a network, widened to `u128`.
fn bounds(net: &IpNetwork) -> (u128, u128) {
    let (base, prefix, width) = match net {
        IpNetwork::V4(n) => (u128::from(u32::from(n.ip())), u32::from(n.prefix()), 32),
        IpNetwork::V6(n) => (u128::from(n.ip()), u32::from(n.prefix()), 128),
    };
    let ones = if width == 128 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    };
    let mask = if prefix == 0 { 0 } else { ones ^ (ones >> prefix) };
    let start = base & mask;
    (start, start | (ones ^ mask))
}
