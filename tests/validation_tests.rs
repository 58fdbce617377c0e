use vcdctl::error::VcdError;
use vcdctl::validation::{
    parse_gateway_cidr, parse_header, parse_ip_range, validate_api_path, validate_filter_value,
};

fn is_invalid_input<T>(result: Result<T, VcdError>) -> bool {
    matches!(result, Err(VcdError::InvalidInput(_)))
}

#[test]
fn test_valid_gateway_cidrs() {
    let cidr = parse_gateway_cidr("192.168.10.1/24").unwrap();
    assert_eq!(cidr.address.to_string(), "192.168.10.1");
    assert_eq!(cidr.prefix_length, 24);

    let v6 = parse_gateway_cidr("2001:db8::1/64").unwrap();
    assert!(v6.address.is_ipv6());
    assert_eq!(v6.prefix_length, 64);

    assert_eq!(parse_gateway_cidr("10.0.0.1/0").unwrap().prefix_length, 0);
    assert_eq!(parse_gateway_cidr("10.0.0.1/32").unwrap().prefix_length, 32);
}

#[test]
fn test_malformed_gateway_cidrs() {
    assert!(is_invalid_input(parse_gateway_cidr("192.168.10.1")));
    assert!(is_invalid_input(parse_gateway_cidr("192.168.10.1/24/8")));
    assert!(is_invalid_input(parse_gateway_cidr("192.168.10.1/")));
    assert!(is_invalid_input(parse_gateway_cidr("192.168.10.1/twenty")));
    assert!(is_invalid_input(parse_gateway_cidr("192.168.10.1/33")));
    assert!(is_invalid_input(parse_gateway_cidr("gateway/24")));
    assert!(is_invalid_input(parse_gateway_cidr("")));

    let err = parse_gateway_cidr("10.0.0.1/abc").unwrap_err();
    assert!(err.to_string().contains("abc"));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_ip_ranges() {
    let range = parse_ip_range("10.0.0.10-10.0.0.20").unwrap();
    assert_eq!(range.start_address, "10.0.0.10");
    assert_eq!(range.end_address, "10.0.0.20");

    let single = parse_ip_range("10.0.0.10 - 10.0.0.10").unwrap();
    assert_eq!(single.start_address, single.end_address);

    assert!(is_invalid_input(parse_ip_range("10.0.0.10")));
    assert!(is_invalid_input(parse_ip_range("10.0.0.20-10.0.0.10")));
    assert!(is_invalid_input(parse_ip_range("10.0.0.1-2001:db8::1")));
    assert!(is_invalid_input(parse_ip_range("a-b")));
}

#[test]
fn test_headers() {
    assert_eq!(
        parse_header("Content-Type: application/json").unwrap(),
        ("Content-Type".to_string(), "application/json".to_string())
    );
    assert_eq!(
        parse_header("X-Empty:").unwrap(),
        ("X-Empty".to_string(), String::new())
    );
    assert!(is_invalid_input(parse_header("no-colon")));
    assert!(is_invalid_input(parse_header(": value")));
    assert!(is_invalid_input(parse_header("Bad Name: value")));
}

#[test]
fn test_api_paths() {
    assert!(validate_api_path("/api/org").is_ok());
    assert!(validate_api_path("/cloudapi/1.0.0/edgeGateways").is_ok());
    assert!(is_invalid_input(validate_api_path("org")));
    assert!(is_invalid_input(validate_api_path("")));
}

#[test]
fn test_filter_values() {
    assert!(validate_filter_value("org", "acme-prod").is_ok());
    assert!(validate_filter_value("vdc network", "net with spaces").is_ok());
    for bad in ["", "   ", "a;b", "a,b", "(a", "a)"] {
        assert!(
            is_invalid_input(validate_filter_value("org", bad)),
            "{:?} should be rejected",
            bad
        );
    }
}
