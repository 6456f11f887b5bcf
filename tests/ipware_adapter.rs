//! Resolution behaviour through the public adapter API.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use header_ipware::ipware::{ClientIp, ConfigurationError, HeaderIpWare, IpWareOptions};

fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.append(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    map
}

fn resolve(ipware: &HeaderIpWare, pairs: &[(&str, &str)], strict: bool) -> (Option<String>, bool) {
    let (ip, trusted) = ipware
        .get_client_ip_from_request(&headers(pairs), strict)
        .into_parts();
    (ip.map(|ip| ip.to_string()), trusted)
}

fn ipware(options: IpWareOptions) -> HeaderIpWare {
    HeaderIpWare::new(options).unwrap()
}

fn some(ip: &str) -> Option<String> {
    Some(ip.to_string())
}

mod basic {
    use super::*;

    #[test]
    fn test_simple_forwarded_for() {
        let ipware = ipware(IpWareOptions::default());
        assert_eq!(resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8")], false), (some("8.8.8.8"), false));
    }

    #[test]
    fn test_single_header_precedence() {
        let ipware = ipware(IpWareOptions::default().with_precedence(["X-Forwarded-For"]));
        let (ip, _) = resolve(&ipware, &[("X-Forwarded-For", "203.0.113.5")], false);
        assert_eq!(ip, some("203.0.113.5"));
    }

    #[test]
    fn test_multiple_ips_leftmost() {
        let ipware = ipware(IpWareOptions::default().with_leftmost(true));
        let (ip, _) = resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 1.1.1.1, 9.9.9.9")], false);
        assert_eq!(ip, some("8.8.8.8"));
    }

    #[test]
    fn test_multiple_ips_rightmost() {
        let ipware = ipware(IpWareOptions::default().with_leftmost(false));
        let (ip, _) = resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 1.1.1.1, 9.9.9.9")], false);
        assert_eq!(ip, some("9.9.9.9"));
    }

    #[test]
    fn test_ipv6_address() {
        let ipware = ipware(IpWareOptions::default());
        let (ip, _) = resolve(&ipware, &[("X-Forwarded-For", "2001:db8::1")], false);
        assert_eq!(ip, some("2001:db8::1"));
    }

    #[test]
    fn test_no_ip_found() {
        let ipware = ipware(IpWareOptions::default());
        assert_eq!(resolve(&ipware, &[], false), (None, false));
        assert_eq!(resolve(&ipware, &[("User-Agent", "curl/8.0")], false), (None, false));
    }

    #[test]
    fn test_invalid_ip_ignored() {
        let ipware = ipware(IpWareOptions::default());
        assert_eq!(resolve(&ipware, &[("X-Forwarded-For", "invalid-ip")], false), (None, false));
    }

    #[test]
    fn test_repeated_calls_agree() {
        let ipware = ipware(IpWareOptions::default());
        let request = [("X-Forwarded-For", "8.8.8.8, 10.0.0.1"), ("X-Real-IP", "1.1.1.1")];
        let first = resolve(&ipware, &request, false);
        for _ in 0..10 {
            assert_eq!(resolve(&ipware, &request, false), first);
        }
    }
}

mod precedence {
    use super::*;

    #[test]
    fn test_default_precedence() {
        let ipware = ipware(IpWareOptions::default());
        let (ip, _) = resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8"), ("X-Real-IP", "1.1.1.1")], false);
        assert_eq!(ip, some("8.8.8.8"));
    }

    #[test]
    fn test_custom_precedence() {
        let ipware = ipware(IpWareOptions::default().with_precedence(["X-Real-IP", "X-Forwarded-For"]));
        let (ip, _) = resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8"), ("X-Real-IP", "1.1.1.1")], false);
        assert_eq!(ip, some("1.1.1.1"));
    }

    #[test]
    fn test_arrival_order_does_not_matter() {
        let ipware = ipware(IpWareOptions::default().with_precedence(["CF-Connecting-IP", "X-Forwarded-For"]));
        let (a, _) = resolve(&ipware, &[("CF-Connecting-IP", "8.8.8.8"), ("X-Forwarded-For", "1.1.1.1")], false);
        let (b, _) = resolve(&ipware, &[("X-Forwarded-For", "1.1.1.1"), ("CF-Connecting-IP", "8.8.8.8")], false);
        assert_eq!(a, some("8.8.8.8"));
        assert_eq!(b, some("8.8.8.8"));
    }

    #[test]
    fn test_provider_header_precedence_over_generic() {
        let ipware = ipware(IpWareOptions::default());
        let (ip, _) = resolve(&ipware, &[("X-Forwarded-For", "1.1.1.1"), ("CF-Connecting-IP", "8.8.8.8")], false);
        assert_eq!(ip, some("8.8.8.8"));
    }

    #[test]
    fn test_only_configured_headers_consulted() {
        let ipware = ipware(IpWareOptions::default().with_precedence(["CF-Connecting-IP"]));
        let (ip, _) = resolve(&ipware, &[("X-Forwarded-For", "1.1.1.1")], false);
        assert_eq!(ip, None);
    }

    #[test]
    fn test_forwarded_header() {
        let ipware = ipware(IpWareOptions::default().with_precedence(["Forwarded"]));
        let (ip, _) = resolve(&ipware, &[("Forwarded", "for=8.8.8.8;proto=https, for=10.0.0.1")], false);
        assert_eq!(ip, some("8.8.8.8"));
    }
}

mod proxy_count {
    use super::*;

    #[test]
    fn test_proxy_count_zero() {
        let ipware = ipware(IpWareOptions::default().with_proxy_count(0));
        assert_eq!(resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8")], false), (some("8.8.8.8"), true));
    }

    #[test]
    fn test_proxy_count_one_non_strict() {
        let ipware = ipware(IpWareOptions::default().with_proxy_count(1));
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 1.1.1.1")], false),
            (some("8.8.8.8"), true)
        );
    }

    #[test]
    fn test_proxy_count_one_strict_match() {
        let ipware = ipware(IpWareOptions::default().with_proxy_count(1));
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 1.1.1.1")], true),
            (some("8.8.8.8"), true)
        );
    }

    #[test]
    fn test_proxy_count_strict_mismatch() {
        let ipware = ipware(IpWareOptions::default().with_proxy_count(1));
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 1.1.1.1, 9.9.9.9")], true),
            (None, false)
        );
    }

    #[test]
    fn test_proxy_count_insufficient() {
        let ipware = ipware(IpWareOptions::default().with_proxy_count(2));
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 1.1.1.1")], false),
            (None, false)
        );
    }

    #[test]
    fn test_negative_proxy_count_rejected() {
        let err = HeaderIpWare::new(IpWareOptions::default().with_proxy_count(-1)).unwrap_err();
        assert_eq!(err, ConfigurationError::NegativeProxyCount(-1));
    }
}

mod proxy_list {
    use super::*;

    #[test]
    fn test_proxy_list_single_trusted() {
        let ipware = ipware(IpWareOptions::default().with_proxy_list(["1.1.1."]));
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 1.1.1.1")], false),
            (some("8.8.8.8"), true)
        );
    }

    #[test]
    fn test_proxy_list_multiple_trusted() {
        let ipware = ipware(IpWareOptions::default().with_proxy_list(["1.1.1.", "9.9.9."]));
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 1.1.1.1, 9.9.9.9")], false),
            (some("8.8.8.8"), true)
        );
    }

    #[test]
    fn test_proxy_list_untrusted() {
        let ipware = ipware(IpWareOptions::default().with_proxy_list(["1.1.1."]));
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 9.9.9.9")], false),
            (None, false)
        );
    }

    #[test]
    fn test_proxy_list_strict_match() {
        let ipware = ipware(IpWareOptions::default().with_proxy_list(["1.1.1."]));
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 1.1.1.1")], true),
            (some("8.8.8.8"), true)
        );
    }

    #[test]
    fn test_proxy_list_strict_extra_proxy() {
        let ipware = ipware(IpWareOptions::default().with_proxy_list(["1.1.1."]));
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 9.9.9.9, 1.1.1.1")], true),
            (None, false)
        );
    }

    #[test]
    fn test_malformed_prefix_rejected() {
        let err = HeaderIpWare::new(IpWareOptions::default().with_proxy_list(["10.0.0.0/8"])).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidProxyPrefix(_)));
    }
}

mod combined {
    use super::*;

    #[test]
    fn test_combined_validation() {
        let ipware = ipware(IpWareOptions::default().with_proxy_count(1).with_proxy_list(["1.1.1."]));
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 1.1.1.1")], false),
            (some("8.8.8.8"), true)
        );
    }

    #[test]
    fn test_combined_count_mismatch() {
        let ipware = ipware(IpWareOptions::default().with_proxy_count(1).with_proxy_list(["1.1.1."]));
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 9.9.9.9, 1.1.1.1")], true),
            (None, false)
        );
    }

    #[test]
    fn test_trusted_prefix_route() {
        let ipware = ipware(IpWareOptions::default().with_proxy_count(1).with_proxy_list(["10.0."]));

        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 10.0.1.1")], false),
            (some("8.8.8.8"), true)
        );
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 172.16.0.1")], false),
            (None, false)
        );
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 1.1.1.1, 10.0.1.1")], true),
            (None, false)
        );
    }

    #[test]
    fn test_multiple_proxies_scenario() {
        let ipware = ipware(IpWareOptions::default().with_proxy_count(2).with_proxy_list(["10.1.", "10.2."]));
        assert_eq!(
            resolve(&ipware, &[("X-Forwarded-For", "8.8.8.8, 10.1.1.1, 10.2.2.2")], false),
            (some("8.8.8.8"), true)
        );
    }
}

mod ip_types {
    use super::*;

    fn client(pairs: &[(&str, &str)], options: IpWareOptions) -> ClientIp {
        ipware(options)
            .get_client_ip_from_request(&headers(pairs), false)
            .ip
            .unwrap()
    }

    #[test]
    fn test_public_ip() {
        let ip = client(&[("X-Forwarded-For", "8.8.8.8")], IpWareOptions::default());
        assert!(ip.is_global());
    }

    #[test]
    fn test_private_ip_fallback() {
        let ip = client(&[("X-Forwarded-For", "192.168.1.1")], IpWareOptions::default());
        assert_eq!(ip.to_string(), "192.168.1.1");
        assert!(ip.is_private());
    }

    #[test]
    fn test_loopback_ip() {
        let ip = client(&[("X-Forwarded-For", "127.0.0.1")], IpWareOptions::default());
        assert!(ip.is_loopback());
    }

    #[test]
    fn test_public_preferred_over_private() {
        let ip = client(
            &[("X-Real-IP", "192.168.1.1"), ("X-Forwarded-For", "8.8.8.8")],
            IpWareOptions::default().with_precedence(["X-Real-IP", "X-Forwarded-For"]),
        );
        assert_eq!(ip.to_string(), "8.8.8.8");
    }

    #[test]
    fn test_ipv4_with_port() {
        let ip = client(&[("X-Forwarded-For", "203.0.113.1:8080")], IpWareOptions::default());
        assert_eq!(ip.to_string(), "203.0.113.1");
    }

    #[test]
    fn test_ipv6_with_port() {
        let ip = client(&[("X-Forwarded-For", "[2001:db8::1]:8080")], IpWareOptions::default());
        assert_eq!(ip.to_string(), "2001:db8::1");
    }
}
