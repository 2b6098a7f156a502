// Copyright (c) 2025 - Cowboy AI, Inc.
//! IPv4 Host Address Pool
//!
//! A pool is built from a gateway interface address such as `10.20.1.254/24`
//! and hands out every other usable host address of that subnet exactly once,
//! in ascending order, as `address/prefix`.
//!
//! # Invariants
//!
//! - Never yields the gateway, the network or the broadcast address
//! - Never yields an address outside the subnet
//! - Addresses are strictly ascending
//! - `/31` and `/32` subnets yield nothing
//!
//! A pool is a one-shot cursor owned by a single VLAN definition. Exhaustion is
//! a normal outcome: callers treat `None` as "no address for this attachment".
//!
//! # Examples
//!
//! ```rust
//! use cx_attach::domain::IpPool;
//!
//! let mut pool = IpPool::parse("10.20.1.254/24").unwrap();
//! assert_eq!(pool.next_address().unwrap().to_string(), "10.20.1.1/24");
//! assert_eq!(pool.gateway().to_string(), "10.20.1.254");
//! ```

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

/// Smallest prefix length that still leaves room for hosts besides network/broadcast
const MAX_HOST_PREFIX: u8 = 30;

/// Stateful allocator over the hosts of one subnet, skipping the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpPool {
    network: Ipv4Net,
    gateway: Ipv4Addr,
    cursor: u32,
    last: u32,
    exhausted: bool,
}

impl IpPool {
    /// Create a pool from the gateway's interface address
    pub fn from_gateway(gateway: Ipv4Net) -> Self {
        let network = gateway.trunc();
        let (cursor, last, exhausted) = if network.prefix_len() > MAX_HOST_PREFIX {
            (0, 0, true)
        } else {
            (
                u32::from(network.network()) + 1,
                u32::from(network.broadcast()) - 1,
                false,
            )
        };

        Self {
            network,
            gateway: gateway.addr(),
            cursor,
            last,
            exhausted,
        }
    }

    /// Parse `a.b.c.d/len`; returns `None` for anything else
    pub fn parse(prefix: &str) -> Option<Self> {
        prefix.trim().parse::<Ipv4Net>().ok().map(Self::from_gateway)
    }

    /// Gateway address excluded from allocation
    pub fn gateway(&self) -> Ipv4Addr {
        self.gateway
    }

    /// Subnet the pool allocates from
    pub fn network(&self) -> Ipv4Net {
        self.network
    }

    /// Hand out the next free host address, or `None` once the pool is spent
    pub fn next_address(&mut self) -> Option<Ipv4Net> {
        while !self.exhausted {
            let candidate = Ipv4Addr::from(self.cursor);
            if self.cursor == self.last {
                self.exhausted = true;
            } else {
                self.cursor += 1;
            }
            if candidate == self.gateway {
                continue;
            }
            return Ipv4Net::new(candidate, self.network.prefix_len()).ok();
        }
        None
    }
}

impl Iterator for IpPool {
    type Item = Ipv4Net;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_first_address_skips_network() {
        let mut pool = IpPool::parse("10.20.1.254/24").unwrap();
        assert_eq!(pool.next_address().unwrap().to_string(), "10.20.1.1/24");
        assert_eq!(pool.next_address().unwrap().to_string(), "10.20.1.2/24");
    }

    #[test]
    fn test_gateway_is_skipped() {
        let pool = IpPool::parse("192.168.0.2/29").unwrap();
        let addresses: Vec<String> = pool.map(|net| net.to_string()).collect();
        assert_eq!(
            addresses,
            vec![
                "192.168.0.1/29",
                "192.168.0.3/29",
                "192.168.0.4/29",
                "192.168.0.5/29",
                "192.168.0.6/29",
            ]
        );
    }

    #[test]
    fn test_pool_exhausts() {
        let mut pool = IpPool::parse("10.0.0.1/30").unwrap();
        assert_eq!(pool.next_address().unwrap().to_string(), "10.0.0.2/30");
        assert!(pool.next_address().is_none());
        assert!(pool.next_address().is_none());
    }

    #[test_case("10.0.0.0/31" ; "point to point")]
    #[test_case("10.0.0.7/32" ; "single host")]
    fn test_tiny_subnets_yield_nothing(prefix: &str) {
        let mut pool = IpPool::parse(prefix).unwrap();
        assert!(pool.next_address().is_none());
    }

    #[test_case("not-an-ip" ; "garbage")]
    #[test_case("10.0.0.1" ; "missing prefix")]
    #[test_case("10.0.0.1/33" ; "prefix too long")]
    fn test_invalid_prefix_rejected(prefix: &str) {
        assert!(IpPool::parse(prefix).is_none());
    }

    #[test]
    fn test_full_slash_24_count() {
        let pool = IpPool::parse("172.19.233.254/24").unwrap();
        assert_eq!(pool.network().to_string(), "172.19.233.0/24");
        assert_eq!(pool.count(), 253);
    }
}
