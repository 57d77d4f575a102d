//! Default machine-id derivation from host network identity.
//!
//! Uniqueness across machines depends entirely on the operator assigning
//! distinct machine ids; this module only provides a *default* for hosts
//! that did not configure one explicitly. Deployments that need a
//! deterministic, collision-checked assignment should pass an explicit id to
//! the builder.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

/// Derives a machine id in `[1, max]` from this host's network identity.
///
/// The local IPv4 address is discovered by connecting a UDP socket to a
/// non-routable address (no packets are sent) and reading the socket's local
/// address. The address is mixed through a 64-bit finalizer and folded into
/// the requested range, so hosts on the same subnet spread across the id
/// space rather than clustering in the low bits. When no IPv4 address is
/// available (e.g. loopback-only containers), the process id seeds the hash
/// instead — stable for the process lifetime, but not across restarts.
///
/// Returns 0 only when `max` is 0, i.e. the layout has no machine-id field;
/// builder validation rejects that value.
pub fn derive_machine_id(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    let seed = match local_ipv4() {
        Some(ip) => u64::from(u32::from(ip)),
        None => u64::from(std::process::id()),
    };
    mix64(seed) % max + 1
}

/// Discovers the local IPv4 address used for outbound traffic.
///
/// Connecting a UDP socket performs route selection without sending
/// anything; the target address never has to be reachable.
fn local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(10, 254, 254, 254), 1)).ok()?;
    match socket.local_addr().ok()? {
        SocketAddr::V4(addr) => Some(*addr.ip()),
        SocketAddr::V6(_) => None,
    }
}

// SplitMix64 finalizer.
const fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^= x >> 31;
    x
}
