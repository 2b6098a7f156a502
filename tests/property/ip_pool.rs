// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for IPv4 Host Pools

use std::net::Ipv4Addr;

use cx_attach::domain::IpPool;
use ipnet::Ipv4Net;
use proptest::prelude::*;

/// Gateway interface addresses with prefixes small enough to exhaust quickly
fn gateway() -> impl Strategy<Value = Ipv4Net> {
    (any::<u32>(), 22u8..=32).prop_map(|(raw, prefix)| {
        Ipv4Net::new(Ipv4Addr::from(raw), prefix).expect("prefix is in range")
    })
}

proptest! {
    /// Addresses stay inside the subnet, skip reserved addresses and ascend
    #[test]
    fn prop_pool_yields_ascending_usable_hosts(gateway in gateway()) {
        let pool = IpPool::from_gateway(gateway);
        let network = gateway.trunc();
        let addresses: Vec<Ipv4Net> = pool.collect();

        for address in &addresses {
            prop_assert_eq!(address.prefix_len(), network.prefix_len());
            prop_assert!(network.contains(&address.addr()));
            prop_assert_ne!(address.addr(), gateway.addr());
            prop_assert_ne!(address.addr(), network.network());
            prop_assert_ne!(address.addr(), network.broadcast());
        }
        prop_assert!(addresses.windows(2).all(|pair| pair[0].addr() < pair[1].addr()));
    }

    /// The pool hands out every usable host except the gateway
    #[test]
    fn prop_pool_size_accounts_for_gateway(gateway in gateway()) {
        let network = gateway.trunc();
        let count = IpPool::from_gateway(gateway).count();

        if network.prefix_len() > 30 {
            prop_assert_eq!(count, 0);
        } else {
            let hosts = (1usize << (32 - network.prefix_len())) - 2;
            let gateway_is_host = gateway.addr() != network.network()
                && gateway.addr() != network.broadcast();
            let expected = if gateway_is_host { hosts - 1 } else { hosts };
            prop_assert_eq!(count, expected);
        }
    }

    /// Exhaustion is permanent
    #[test]
    fn prop_exhausted_pool_stays_empty(gateway in gateway()) {
        let mut pool = IpPool::from_gateway(gateway);
        while pool.next_address().is_some() {}
        prop_assert_eq!(pool.next_address(), None);
        prop_assert_eq!(pool.gateway(), gateway.addr());
    }
}

#[test]
fn test_pool_from_documented_gateway() {
    let mut pool = IpPool::parse("10.20.1.1/24").expect("valid prefix");
    assert_eq!(
        pool.next_address().map(|net| net.to_string()),
        Some("10.20.1.2/24".to_string())
    );
    assert!(IpPool::parse("not-a-prefix").is_none());
}
