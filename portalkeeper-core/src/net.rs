//! Local network helpers

use crate::Result;
use std::net::{IpAddr, UdpSocket};
use tracing::debug;

/// Discover the local IP address used to reach the campus network.
///
/// Connects a UDP socket toward a public address and reads back the
/// local endpoint; no datagram is ever sent, so this works even while
/// captured by the portal.
pub fn local_ip() -> Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:80")?;
    let ip = socket.local_addr()?.ip();
    debug!(ip = %ip, "detected local IP");
    Ok(ip)
}
