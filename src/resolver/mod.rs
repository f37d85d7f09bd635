//! Query Resolution
//!
//! Maps a parsed question to answer/authority/additional records by a single
//! point lookup in the external key-value store. The store is injected via
//! the [`KeyLookup`] capability so tests can substitute an in-memory map.
//!
//! ## Naming convention
//!
//! Which section a record lands in is chosen by a substring convention on
//! the queried name: names containing `ip4` answer A queries, names
//! containing `ip6` answer AAAA queries (and advertise an AAAA record in
//! the additional section for any other type). Names with neither substring
//! never produce records. See [`address_hint`].

mod store;

pub use store::RedisStore;

use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::wire::{ResourceRecord, CLASS_IN, TYPE_A, TYPE_AAAA};

/// Point-lookup capability over the external name→address mapping.
///
/// `Ok(None)` is a miss. Implementations must be safe for concurrent use
/// from many request tasks.
#[async_trait]
pub trait KeyLookup: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
}

/// Which address family a domain name advertises, per the naming convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressHint {
    Ipv4,
    Ipv6,
    None,
}

/// Classify a name by the `ip4`/`ip6` substring convention.
///
/// `ip4` wins when both substrings appear.
pub fn address_hint(name: &str) -> AddressHint {
    if name.contains("ip4") {
        AddressHint::Ipv4
    } else if name.contains("ip6") {
        AddressHint::Ipv6
    } else {
        AddressHint::None
    }
}

/// Records produced for one question
#[derive(Debug, Clone, Default)]
pub struct ResolvedRecords {
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,

    /// True when the name had no usable mapping (absent, empty, or
    /// unparseable value) — feeds the optional NXDOMAIN policy
    pub miss: bool,
}

/// Resolves questions against an injected key-value store
pub struct Resolver {
    store: Arc<dyn KeyLookup>,

    /// TTL stamped on every synthesized record (configured expiry)
    ttl: u32,
}

impl Resolver {
    pub fn new(store: Arc<dyn KeyLookup>, ttl: u32) -> Self {
        Self { store, ttl }
    }

    /// Resolve one question.
    ///
    /// Unsupported classes and types yield empty lists silently. Lookup
    /// failures are logged and degrade to misses; the client still gets a
    /// NOERROR-shaped response.
    pub async fn resolve(&self, question: &ResourceRecord) -> ResolvedRecords {
        let mut resolved = ResolvedRecords::default();

        if question.class != CLASS_IN {
            return resolved;
        }

        if question.rtype != TYPE_A && question.rtype != TYPE_AAAA {
            return resolved;
        }

        let value = match self.store.get(&question.name).await {
            Ok(Some(value)) if !value.is_empty() => value,
            Ok(_) => {
                resolved.miss = true;
                return resolved;
            }
            Err(err) => {
                warn!("lookup for {} failed: {err:#}", question.name);
                resolved.miss = true;
                return resolved;
            }
        };

        let address: IpAddr = match value.parse() {
            Ok(address) => address,
            Err(_) => {
                warn!(
                    "stored value for {} is not an IP literal: {value:?}",
                    question.name
                );
                resolved.miss = true;
                return resolved;
            }
        };

        debug!("{} resolved to {address}", question.name);

        match address_hint(&question.name) {
            AddressHint::Ipv4 => {
                if question.rtype == TYPE_A {
                    match ipv4_octets(address) {
                        Some(octets) => resolved.answers.push(ResourceRecord::answer(
                            question.name.clone(),
                            TYPE_A,
                            self.ttl,
                            octets.to_vec(),
                        )),
                        None => {
                            warn!(
                                "value for ip4 name {} is not representable as IPv4: {address}",
                                question.name
                            );
                            resolved.miss = true;
                        }
                    }
                }
            }
            AddressHint::Ipv6 => {
                let record = ResourceRecord::answer(
                    question.name.clone(),
                    TYPE_AAAA,
                    self.ttl,
                    ipv6_octets(address).to_vec(),
                );
                if question.rtype == TYPE_AAAA {
                    resolved.answers.push(record);
                } else {
                    // Queried an ip6 name without asking for AAAA: advisory
                    // record in the additional section
                    resolved.additionals.push(record);
                }
            }
            AddressHint::None => {}
        }

        resolved
    }
}

fn ipv4_octets(address: IpAddr) -> Option<[u8; 4]> {
    match address {
        IpAddr::V4(v4) => Some(v4.octets()),
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(|v4| v4.octets()),
    }
}

fn ipv6_octets(address: IpAddr) -> [u8; 16] {
    match address {
        IpAddr::V4(v4) => v4.to_ipv6_mapped().octets(),
        IpAddr::V6(v6) => v6.octets(),
    }
}
