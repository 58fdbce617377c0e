//! Validation of user-supplied values before they reach the API
//!
//! Malformed input is reported as `VcdError::InvalidInput` with a message
//! naming the offending value; nothing here panics on bad input.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::{VcdError, VcdResult};
use crate::models::IpRange;

/// A gateway address with its prefix length, e.g. `192.168.10.1/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayCidr {
    pub address: IpAddr,
    pub prefix_length: u8,
}

impl FromStr for GatewayCidr {
    type Err = VcdError;

    /// Splits on a literal `/`. Anything other than exactly two parts, a
    /// non-numeric prefix or a prefix too long for the address family is
    /// rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 2 {
            return Err(VcdError::invalid_input(format!(
                "gateway CIDR '{}' must look like <address>/<prefix>",
                s
            )));
        }

        let address: IpAddr = parts[0].parse().map_err(|_| {
            VcdError::invalid_input(format!("gateway CIDR '{}': '{}' is not an IP address", s, parts[0]))
        })?;
        let prefix_length: u8 = parts[1].parse().map_err(|_| {
            VcdError::invalid_input(format!("gateway CIDR '{}': prefix '{}' is not a number", s, parts[1]))
        })?;

        let max = if address.is_ipv4() { 32 } else { 128 };
        if prefix_length > max {
            return Err(VcdError::invalid_input(format!(
                "gateway CIDR '{}': prefix length {} exceeds {}",
                s, prefix_length, max
            )));
        }

        Ok(Self {
            address,
            prefix_length,
        })
    }
}

impl fmt::Display for GatewayCidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_length)
    }
}

pub fn parse_gateway_cidr(s: &str) -> VcdResult<GatewayCidr> {
    s.parse()
}

/// Parses `start-end` into an IP range of one address family.
pub fn parse_ip_range(s: &str) -> VcdResult<IpRange> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| VcdError::invalid_input(format!("IP range '{}' must look like <start>-<end>", s)))?;
    let start: IpAddr = start
        .trim()
        .parse()
        .map_err(|_| VcdError::invalid_input(format!("IP range '{}': bad start address", s)))?;
    let end: IpAddr = end
        .trim()
        .parse()
        .map_err(|_| VcdError::invalid_input(format!("IP range '{}': bad end address", s)))?;
    if start.is_ipv4() != end.is_ipv4() {
        return Err(VcdError::invalid_input(format!("IP range '{}' mixes address families", s)));
    }
    if start > end {
        return Err(VcdError::invalid_input(format!("IP range '{}' ends before it starts", s)));
    }
    Ok(IpRange {
        start_address: start.to_string(),
        end_address: end.to_string(),
    })
}

/// Parses a `Name: value` header argument.
pub fn parse_header(s: &str) -> VcdResult<(String, String)> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| VcdError::invalid_input(format!("header '{}' must look like 'Name: value'", s)))?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(VcdError::invalid_input(format!("header '{}' has an invalid name", s)));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Raw passthrough paths must be absolute API paths.
pub fn validate_api_path(path: &str) -> VcdResult<()> {
    if !path.starts_with('/') {
        return Err(VcdError::invalid_input(format!(
            "\"{}\" is not a valid command or api path (expected /api/... or /cloudapi/...)",
            path
        )));
    }
    Ok(())
}

/// Values placed inside a `(field==value)` filter cannot contain the
/// expression's own separators.
pub fn validate_filter_value(kind: &str, value: &str) -> VcdResult<()> {
    if value.trim().is_empty() {
        return Err(VcdError::invalid_input(format!("{} name is required", kind)));
    }
    if value.contains([';', ',', '(', ')']) {
        return Err(VcdError::invalid_input(format!(
            "{} name '{}' contains a filter separator (; , ( ))",
            kind, value
        )));
    }
    Ok(())
}
