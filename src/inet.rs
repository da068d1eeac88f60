//! IPv4 address extraction from interface status text.
//!
//! Handles both `ip addr show` output
//! (`inet 192.168.1.42/24 brd 192.168.1.255 scope global wlan0`) and the
//! older toolbox `ifconfig` form (`inet addr:192.168.1.42  Bcast:...`).

use std::net::Ipv4Addr;

/// Raw address token from the first `inet` line, with any `/prefix` removed.
///
/// The token is not validated; use [`parse_inet_address`] before handing it
/// to anything that connects.
pub fn extract_inet_token(status: &str) -> Option<&str> {
    status.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        if fields.next()? != "inet" {
            return None;
        }
        let token = fields.next()?;
        let token = token.strip_prefix("addr:").unwrap_or(token);
        let address = token.split_once('/').map_or(token, |(addr, _prefix)| addr);
        Some(address)
    })
}

/// The interface's IPv4 address, or `None` when the interface has none or the
/// status text holds something that isn't an IPv4 address.
pub fn parse_inet_address(status: &str) -> Option<Ipv4Addr> {
    extract_inet_token(status)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IP_ADDR_SHOW: &str = "\
32: wlan0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc mq state UP group default qlen 3000
    inet 192.168.1.42/24 brd 192.168.1.255 scope global wlan0
       valid_lft forever preferred_lft forever
";

    #[test]
    fn strips_prefix_length() {
        assert_eq!(
            extract_inet_token("inet 192.168.1.42/24 brd 192.168.1.255 scope global wlan0"),
            Some("192.168.1.42")
        );
        assert_eq!(
            parse_inet_address(IP_ADDR_SHOW),
            Some(Ipv4Addr::new(192, 168, 1, 42))
        );
    }

    #[test]
    fn address_without_prefix() {
        assert_eq!(
            parse_inet_address("    inet 10.0.0.7 scope global wlan0"),
            Some(Ipv4Addr::new(10, 0, 0, 7))
        );
    }

    #[test]
    fn ifconfig_style_output() {
        let status = "wlan0     Link encap:UNSPEC\n          inet addr:172.16.4.9  Bcast:172.16.4.255  Mask:255.255.255.0\n";
        assert_eq!(extract_inet_token(status), Some("172.16.4.9"));
        assert_eq!(
            parse_inet_address(status),
            Some(Ipv4Addr::new(172, 16, 4, 9))
        );
    }

    #[test]
    fn no_inet_line() {
        let status = "32: wlan0: <NO-CARRIER,BROADCAST,MULTICAST,UP> mtu 1500 state DOWN\n";
        assert_eq!(extract_inet_token(status), None);
        assert_eq!(parse_inet_address(status), None);
        assert_eq!(parse_inet_address(""), None);
    }

    #[test]
    fn ignores_inet6() {
        let status = "    inet6 fe80::1c2b:3dff:fe4e:5f60/64 scope link\n";
        assert_eq!(extract_inet_token(status), None);

        let both = "    inet6 fe80::1/64 scope link\n    inet 10.1.2.3/16 scope global wlan0\n";
        assert_eq!(parse_inet_address(both), Some(Ipv4Addr::new(10, 1, 2, 3)));
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert_eq!(extract_inet_token("inet 300.1.2.3/24"), Some("300.1.2.3"));
        assert_eq!(parse_inet_address("inet 300.1.2.3/24"), None);
        assert_eq!(parse_inet_address("inet /24"), None);
        assert_eq!(parse_inet_address("inet"), None);
        assert_eq!(parse_inet_address("Device \"wlan0\" does not exist."), None);
    }
}
