// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Field checks shared by the `with_*` decorators, and the messages they record.

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Highest TCP port accepted for BGP sessions
pub const MAX_BGP_PORT: u16 = 16384;

/// Bounds for BGP timers, in seconds
pub const MIN_TIMER_SECS: u64 = 1;
pub const MAX_TIMER_SECS: u64 = 65535;

pub fn cannot_be_empty(kind: &str, field: &str) -> String {
    format!("{} '{}' cannot be empty", kind, field)
}

pub fn cannot_be_empty_list(kind: &str, field: &str) -> String {
    format!("{} '{}' cannot be empty list", kind, field)
}

pub fn cannot_be_empty_map(kind: &str, field: &str) -> String {
    format!("{} '{}' cannot be empty map", kind, field)
}

pub fn invalid_ip(kind: &str, field: &str) -> String {
    format!("{} '{}' of the {} contains invalid ip address", kind, field, kind)
}

pub fn invalid_cidr(kind: &str, field: &str, value: &str) -> String {
    format!("{} '{}' contains invalid CIDR {}", kind, field, value)
}

pub fn out_of_range(kind: &str, field: &str, min: impl Display, max: impl Display) -> String {
    format!("{} '{}' must be between {} and {}", kind, field, min, max)
}

pub fn not_one_of(kind: &str, field: &str, value: &str, allowed: &[&str]) -> String {
    format!(
        "{} '{}' has invalid value {}, must be one of: {}",
        kind,
        field,
        value,
        allowed.join(", ")
    )
}

pub fn is_ip(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

pub fn is_ipv4(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok()
}

/// `address/prefix` with an IPv4 or IPv6 address and a prefix within the family width
pub fn is_cidr(value: &str) -> bool {
    let Some((address, prefix)) = value.split_once('/') else {
        return false;
    };

    let Ok(prefix) = prefix.parse::<u8>() else {
        return false;
    };

    match address.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => prefix <= 32,
        Ok(IpAddr::V6(_)) => prefix <= 128,
        Err(_) => false,
    }
}

pub fn in_range<T: PartialOrd>(value: T, min: T, max: T) -> bool {
    value >= min && value <= max
}

pub fn is_one_of(value: &str, allowed: &[&str]) -> bool {
    allowed.contains(&value)
}

/// BGP timers are whole seconds between 1 and 65535
pub fn is_valid_timer(duration: Duration) -> bool {
    duration.subsec_nanos() == 0
        && in_range(duration.as_secs(), MIN_TIMER_SECS, MAX_TIMER_SECS)
}

/// Render a duration the way the API server expects a metav1.Duration
pub fn format_duration(duration: Duration) -> String {
    format!("{}s", duration.as_secs())
}
