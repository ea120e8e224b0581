//! The ipscrape library for scraping web pages for IP addresses.
//!
//! This library fetches a page, renders it to visible text, extracts IPv4
//! and IPv6 address and network candidates with per-family grammars,
//! validates them strictly, and aggregates the survivors into minimal sets
//! of CIDR blocks.
//!
//! # Examples
//!
//! Running the two extraction pipelines over already-rendered text:
//!
//! ```rust
//! use ipscrape::{extract_ipv4, extract_ipv6};
//!
//! let text = "gateway 192.168.0.1, upstream 2001:db8::1";
//! let v4 = extract_ipv4(text);
//! let v6 = extract_ipv6(text);
//!
//! assert_eq!(v4.cidrs()[0].to_string(), "192.168.0.1/32");
//! assert_eq!(v6.cidrs()[0].to_string(), "2001:db8::1/128");
//! ```

pub mod error;
pub mod extractor;
pub mod html;
pub mod input;
pub mod ipset;
pub mod output;
pub mod pipeline;

pub use crate::error::Error;
pub use crate::extractor::{parse_candidate, Extractor};
pub use crate::ipset::{AddressSet, Family};
pub use crate::pipeline::{extract_ipv4, extract_ipv6};
