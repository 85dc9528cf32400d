//! Utility functions for network checks

use std::net::{IpAddr, UdpSocket};

/// Address routed toward the public internet. Connecting a UDP socket sends
/// no packets; it only asks the OS which local interface would be used.
const PROBE_ADDR: &str = "8.8.8.8:80";

/// Local IPv4 address of the interface facing the gateway, if any
pub fn local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect(PROBE_ADDR).ok()?;
    let ip = socket.local_addr().ok()?.ip();
    tracing::debug!("Detected local IP: {}", ip);
    (!ip.is_unspecified()).then_some(ip)
}

/// Accept only something that parses as an IP address
pub fn parse_ip(input: &str) -> Option<IpAddr> {
    input.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ip() {
        assert_eq!(parse_ip(" 10.9.8.7 "), Some("10.9.8.7".parse().unwrap()));
        assert_eq!(parse_ip("10.9.8"), None);
        assert_eq!(parse_ip(""), None);
    }
}
