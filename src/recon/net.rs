//! Internal network endpoints visible from the environment and /etc/hosts

use crate::reporting::model::ResultSet;
use std::net::IpAddr;
use url::{Host, Url};

const INTERNAL_SUFFIXES: &[&str] = &[
    ".internal",
    ".local",
    ".localdomain",
    ".svc",
    ".cluster.local",
    ".consul",
];

pub const HOSTS_FILE: &str = "/etc/hosts";

/// Environment values that point at internal endpoints, keyed by variable
/// name, plus non-loopback /etc/hosts entries keyed `hosts:<name>`
pub fn collect(vars: &[(String, String)], hosts_file: Option<&str>) -> ResultSet {
    let mut found = ResultSet::new();

    for (name, value) in vars {
        if let Some(endpoint) = internal_endpoint(value) {
            found.insert(name.clone(), endpoint);
        }
    }

    if let Some(hosts) = hosts_file {
        for (name, ip) in parse_hosts(hosts) {
            found.insert(format!("hosts:{}", name), ip.to_string());
        }
    }

    found
}

/// Return `value` if it is a URL, `host:port` pair or IP literal naming an
/// internal host
pub fn internal_endpoint(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.contains(char::is_whitespace) {
        return None;
    }

    if let Ok(ip) = value.parse::<IpAddr>() {
        return is_internal_ip(ip).then(|| value.to_string());
    }

    let internal = if value.contains("://") {
        let url = Url::parse(value).ok()?;
        is_internal_host(&url.host()?)
    } else {
        let (host, port) = value.rsplit_once(':')?;
        port.parse::<u16>().ok()?;
        if host.is_empty() || host.contains('/') {
            return None;
        }
        is_internal_host(&Host::parse(host).ok()?)
    };

    internal.then(|| value.to_string())
}

fn is_internal_host<S: AsRef<str>>(host: &Host<S>) -> bool {
    match host {
        Host::Ipv4(ip) => is_internal_ip(IpAddr::V4(*ip)),
        Host::Ipv6(ip) => is_internal_ip(IpAddr::V6(*ip)),
        Host::Domain(domain) => {
            // Non-special schemes (postgres://, redis://) keep IP hosts opaque
            let literal = domain.as_ref().trim_start_matches('[').trim_end_matches(']');
            if let Ok(ip) = literal.parse::<IpAddr>() {
                return is_internal_ip(ip);
            }

            let domain = domain.as_ref().trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost"
                || !domain.contains('.')
                || INTERNAL_SUFFIXES.iter().any(|s| domain.ends_with(s))
        }
    }
}

/// Loopback, RFC1918, link-local, shared address space and IPv6 ULA
pub fn is_internal_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || (octets[0] == 100 && (octets[1] & 0xc0) == 64)
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_loopback() || (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
        }
    }
}

/// Host names mapped to routable addresses
pub fn parse_hosts(contents: &str) -> Vec<(String, IpAddr)> {
    let mut entries = Vec::new();

    for line in contents.lines() {
        let line = line.split('#').next().unwrap_or("");
        let mut fields = line.split_whitespace();

        let Some(Ok(ip)) = fields.next().map(str::parse::<IpAddr>) else {
            continue;
        };
        if ip.is_loopback() || ip.is_unspecified() || ip.is_multicast() {
            continue;
        }
        if let IpAddr::V6(v6) = ip {
            // ip6-allnodes, ip6-allrouters and friends
            if v6.segments()[0] & 0xff00 == 0xff00 {
                continue;
            }
        }

        for name in fields {
            entries.push((name.to_string(), ip));
        }
    }

    entries
}
