use std::net::IpAddr;

/// Minimal domain hierarchy utilities
pub struct DomainUtils;

/// Second-level suffixes that behave like a TLD.
const MULTI_PART_SUFFIXES: &[&str] = &[
    "co.in", "net.in", "org.in", "gov.in", "nic.in", "ac.in", "bank.in", "co.uk", "org.uk",
    "gov.uk", "ac.uk", "com.au", "net.au", "org.au", "co.nz", "com.br", "com.sg", "co.jp",
    "co.za", "com.mx",
];

impl DomainUtils {
    /// Check if domain matches any in list (with hierarchy support)
    pub fn matches_domain_list(domain: &str, domain_list: &[String]) -> bool {
        let domain_lower = domain.to_lowercase();

        for pattern in domain_list {
            let pattern_lower = pattern.to_lowercase();

            // Exact match
            if domain_lower == pattern_lower {
                return true;
            }

            // Subdomain match (domain ends with .pattern)
            if domain_lower.ends_with(&format!(".{}", pattern_lower)) {
                return true;
            }
        }

        false
    }

    /// Canonicalize host (lowercase, no trailing dot, no www prefix)
    pub fn canonicalize_domain(domain: &str) -> String {
        let domain_lower = domain.trim_end_matches('.').to_lowercase();
        if let Some(stripped) = domain_lower.strip_prefix("www.") {
            stripped.to_string()
        } else {
            domain_lower
        }
    }

    /// Registrable part of a host, e.g. "secure.login.example.co.in" -> "example.co.in"
    pub fn registrable_domain(host: &str) -> String {
        let host = Self::canonicalize_domain(host);
        let parts: Vec<&str> = host.split('.').filter(|p| !p.is_empty()).collect();
        if parts.len() < 2 {
            return host;
        }

        let last_two = parts[parts.len() - 2..].join(".");
        if parts.len() >= 3 && MULTI_PART_SUFFIXES.contains(&last_two.as_str()) {
            parts[parts.len() - 3..].join(".")
        } else {
            last_two
        }
    }

    pub fn extract_tld(host: &str) -> Option<String> {
        let host = host.trim_end_matches('.');
        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() >= 2 {
            Some(parts.last()?.to_lowercase())
        } else {
            None
        }
    }

    /// Labels and hyphen-separated tokens of a host, lowercased.
    pub fn host_tokens(host: &str) -> Vec<String> {
        host.to_lowercase()
            .split(['.', '-', '_'])
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn is_ip_literal(host: &str) -> bool {
        let trimmed = host.trim_start_matches('[').trim_end_matches(']');
        trimmed.parse::<IpAddr>().is_ok()
    }
}
