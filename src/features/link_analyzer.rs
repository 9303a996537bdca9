use super::tld_risk::TldRiskAnalyzer;
use super::{Detection, SignalExtractor, SignalKind};
use crate::config::{BrandConfig, EngineConfig};
use crate::domain_utils::DomainUtils;
use crate::error::AnalysisError;
use crate::normalization::NormalizedContent;
use crate::types::{ContentKind, Severity, SignalCategory};
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;
use url::{Host, Url};

/// Parse a link the way a browser address bar would, assuming http when the
/// scheme is missing.
pub fn parse_link(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = if raw.contains("://") {
        Url::parse(raw)
    } else {
        Url::parse(&format!("http://{}", raw))
    };
    parsed.ok().filter(|u| u.host().is_some())
}

/// Finds link-shaped spans in free text: an explicit scheme or a `www.` prefix.
#[derive(Debug, Clone)]
pub struct LinkFinder {
    regex: Regex,
}

impl LinkFinder {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"'`]+"#)?,
        })
    }

    /// Byte spans of parseable links, minus trailing sentence punctuation.
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        self.regex
            .find_iter(text)
            .filter_map(|m| {
                let trimmed = m
                    .as_str()
                    .trim_end_matches(['.', ',', ';', ':', '!', '?', ')', ']', '}']);
                parse_link(trimmed)?;
                Some(m.start()..m.start() + trimmed.len())
            })
            .collect()
    }

    pub fn contains_link(&self, text: &str) -> bool {
        !self.spans(text).is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedLink {
    /// Literal text of the link in the submitted input
    pub raw: String,
    /// Folded text the link was parsed from
    pub folded: String,
    pub url: Url,
    pub host: String,
    /// Literal text of the host as submitted, before folding
    pub raw_host: String,
    pub had_scheme: bool,
}

impl ExtractedLink {
    /// Only the host counts; non-ASCII paths and queries are ordinary.
    fn is_disguised(&self) -> bool {
        !self.raw_host.eq_ignore_ascii_case(&self.host)
            || self.host.split('.').any(|label| label.starts_with("xn--"))
    }
}

pub struct LinkAnalyzer {
    finder: LinkFinder,
    brands: Vec<BrandConfig>,
    official_domains: Vec<String>,
    url_shorteners: Vec<String>,
    bait_keywords: Vec<String>,
    tld_analyzer: TldRiskAnalyzer,
}

impl LinkAnalyzer {
    pub fn from_config(config: &EngineConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            finder: LinkFinder::new()?,
            brands: config.brands.clone(),
            official_domains: config.official_domains(),
            url_shorteners: config.url_shorteners.clone(),
            bait_keywords: config
                .bait_host_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            tld_analyzer: TldRiskAnalyzer::new(config.tld_risk.clone()),
        })
    }

    pub fn extract_links(&self, content: &NormalizedContent) -> Vec<ExtractedLink> {
        let text = content.text();

        let spans: Vec<Range<usize>> = match content.kind() {
            ContentKind::Url => vec![0..text.len()],
            ContentKind::Text => self.finder.spans(text),
        };

        spans
            .into_iter()
            .filter_map(|range| {
                let span = &text[range.clone()];
                let start = range.start + (span.len() - span.trim_start().len());
                let folded = span.trim().to_string();
                let url = parse_link(&folded)?;
                let host = DomainUtils::canonicalize_domain(url.host_str()?);

                // Map the folded host back onto the submitted characters
                let raw_host = folded
                    .to_ascii_lowercase()
                    .find(&host)
                    .map(|at| content.excerpt(start + at..start + at + host.len()))
                    .unwrap_or(host.as_str())
                    .to_string();

                Some(ExtractedLink {
                    raw: content.excerpt(range).trim().to_string(),
                    had_scheme: folded.contains("://"),
                    folded,
                    url,
                    host,
                    raw_host,
                })
            })
            .collect()
    }

    fn is_official(&self, host: &str) -> bool {
        DomainUtils::matches_domain_list(host, &self.official_domains)
    }

    /// Host labels minus the public suffix, split on dots and hyphens.
    fn name_tokens(host: &str) -> Vec<String> {
        let registrable = DomainUtils::registrable_domain(host);
        let name = match registrable.split_once('.') {
            Some((_, suffix)) => host
                .strip_suffix(suffix)
                .map(|rest| rest.trim_end_matches('.'))
                .unwrap_or(host),
            None => host,
        };
        DomainUtils::host_tokens(name)
    }

    /// Brand whose name the host carries without being one of its domains.
    fn imitated_brand(&self, host: &str) -> Option<&BrandConfig> {
        let tokens = Self::name_tokens(host);
        let variants: Vec<Vec<String>> = vec![
            tokens.clone(),
            tokens.iter().map(|t| fold_digits(t, 'l')).collect(),
            tokens.iter().map(|t| fold_digits(t, 'i')).collect(),
        ];

        self.brands
            .iter()
            .filter(|brand| !brand.official_domains.is_empty())
            .find(|brand| {
                brand.aliases.iter().any(|alias| {
                    let alias: String = alias
                        .to_lowercase()
                        .chars()
                        .filter(|c| !c.is_whitespace())
                        .collect();
                    if alias.is_empty() {
                        return false;
                    }
                    variants.iter().any(|tokens| spells_alias(tokens, &alias))
                })
            })
    }

    fn bait_keyword(&self, host: &str) -> Option<&str> {
        let tokens = Self::name_tokens(host);
        self.bait_keywords
            .iter()
            .find(|keyword| tokens.iter().any(|t| t.contains(keyword.as_str())))
            .map(String::as_str)
    }

    fn analyze_link(&self, link: &ExtractedLink) -> Vec<(SignalKind, Severity, String)> {
        let mut findings = Vec::new();
        let host = link.host.as_str();

        if !link.url.username().is_empty() || link.url.password().is_some() {
            findings.push((
                SignalKind::HiddenHost,
                Severity::High,
                "Real destination is hidden after an '@' in the link".to_string(),
            ));
        }

        let is_ip = matches!(link.url.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)))
            || DomainUtils::is_ip_literal(host);
        if is_ip {
            findings.push((
                SignalKind::IpLiteralHost,
                Severity::High,
                "Link points to a raw IP address instead of a domain".to_string(),
            ));
        }

        if link.is_disguised() {
            findings.push((
                SignalKind::Homograph,
                Severity::High,
                "Domain uses look-alike characters to disguise itself".to_string(),
            ));
        }

        let official = self.is_official(host);

        if !is_ip && !official {
            if let Some(brand) = self.imitated_brand(host) {
                findings.push((
                    SignalKind::LookalikeDomain,
                    Severity::High,
                    format!(
                        "Domain imitates {} but is not one of its official sites",
                        brand.name
                    ),
                ));
            }

            if let Some(keyword) = self.bait_keyword(host) {
                findings.push((
                    SignalKind::BaitKeywordHost,
                    Severity::High,
                    format!("Domain name contains the bait word '{}'", keyword),
                ));
            }

            let tokens = DomainUtils::host_tokens(host);
            if tokens.iter().any(|t| t == "https" || t == "http" || t == "ssl") {
                findings.push((
                    SignalKind::FakeHttpsIndicator,
                    Severity::High,
                    "Puts 'https' in the domain name to look secure".to_string(),
                ));
            }

            if let Some((severity, description)) = self.tld_analyzer.assess_host(host) {
                findings.push((
                    SignalKind::SuspiciousTld,
                    severity,
                    format!("Uses a high-risk domain ending {}", description),
                ));
            }
        }

        if DomainUtils::matches_domain_list(host, &self.url_shorteners) {
            findings.push((
                SignalKind::UrlShortener,
                Severity::Medium,
                "Shortened link hides the real destination".to_string(),
            ));
        }

        if link.had_scheme && link.url.scheme() == "http" {
            findings.push((
                SignalKind::InsecureTransport,
                Severity::Medium,
                "Link does not use a secure HTTPS connection".to_string(),
            ));
        } else if !link.had_scheme && !link.raw.to_lowercase().starts_with("www.") {
            findings.push((
                SignalKind::MissingTransport,
                Severity::Low,
                "Address has no http:// or https:// prefix".to_string(),
            ));
        }

        if !is_ip && host.split('.').count() >= 5 {
            findings.push((
                SignalKind::NestedSubdomains,
                Severity::Low,
                "Domain is buried under many subdomains".to_string(),
            ));
        }

        findings
    }
}

/// Whether a run of whole consecutive tokens spells the alias, so
/// "state-bank-of-india" matches but "pineapple" does not match "apple".
fn spells_alias(tokens: &[String], alias: &str) -> bool {
    (0..tokens.len()).any(|start| {
        let mut joined = String::new();
        for token in &tokens[start..] {
            joined.push_str(token);
            if joined == alias {
                return true;
            }
            if joined.len() >= alias.len() || !alias.starts_with(joined.as_str()) {
                return false;
            }
        }
        false
    })
}

/// Undo common digit-for-letter swaps ("sb1", "paypa1", "amaz0n").
fn fold_digits(token: &str, one: char) -> String {
    token
        .chars()
        .map(|c| match c {
            '0' => 'o',
            '1' => one,
            '3' => 'e',
            '4' => 'a',
            '5' => 's',
            '7' => 't',
            '8' => 'b',
            other => other,
        })
        .collect()
}

fn short_phrase(kind: SignalKind, host: &str) -> String {
    let label = match kind {
        SignalKind::HiddenHost => "Hidden destination",
        SignalKind::IpLiteralHost => "Raw IP address",
        SignalKind::Homograph => "Disguised characters in",
        SignalKind::LookalikeDomain => "Look-alike domain",
        SignalKind::BaitKeywordHost => "Bait word in domain",
        SignalKind::FakeHttpsIndicator => "Fake 'https' in domain",
        SignalKind::SuspiciousTld => "Risky domain ending",
        SignalKind::UrlShortener => "Shortened link",
        SignalKind::InsecureTransport => "Not secure (http)",
        SignalKind::MissingTransport => "No http(s) prefix",
        SignalKind::NestedSubdomains => "Deeply nested subdomains",
        _ => "Suspicious link",
    };
    format!("{}: {}", label, host)
}

impl SignalExtractor for LinkAnalyzer {
    fn extract(&self, content: &NormalizedContent) -> Result<Vec<Detection>, AnalysisError> {
        let links = self.extract_links(content);
        if links.is_empty() {
            return Err(AnalysisError::unavailable(self.name(), content.kind()));
        }
        log::debug!("Found {} link(s) to analyze", links.len());

        let mut seen = HashSet::new();
        let mut detections = Vec::new();

        for link in &links {
            for (kind, severity, reason) in self.analyze_link(link) {
                if !seen.insert(kind) {
                    continue;
                }
                let evidence = match content.kind() {
                    ContentKind::Text => link.raw.clone(),
                    ContentKind::Url => short_phrase(kind, &link.host),
                };
                detections.push(
                    Detection::new(kind, SignalCategory::Technical, severity, reason)
                        .with_evidence(evidence),
                );
            }
        }

        Ok(detections)
    }

    fn name(&self) -> &str {
        "link_analyzer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::ContentNormalizer;

    fn run(text: &str, kind: ContentKind) -> Result<Vec<Detection>, AnalysisError> {
        let content = ContentNormalizer::new().normalize(text, kind).unwrap();
        LinkAnalyzer::from_config(&EngineConfig::default())
            .unwrap()
            .extract(&content)
    }

    fn kinds(text: &str, kind: ContentKind) -> Vec<SignalKind> {
        run(text, kind).unwrap().into_iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_parse_link() {
        assert_eq!(
            parse_link("sbi-pan-verify.in/kyc").and_then(|u| u.host_str().map(str::to_string)),
            Some("sbi-pan-verify.in".to_string())
        );
        assert!(parse_link("https://").is_none());
        assert!(parse_link("").is_none());
    }

    #[test]
    fn test_embedded_link_in_text() {
        let detections = run(
            "SBI ALERT: Your account will be temporarily blocked due to PAN not updated. Click here: http://sbi-pan-verify.in",
            ContentKind::Text,
        )
        .unwrap();
        let found: Vec<SignalKind> = detections.iter().map(|d| d.kind).collect();

        assert_eq!(
            found,
            vec![
                SignalKind::LookalikeDomain,
                SignalKind::BaitKeywordHost,
                SignalKind::InsecureTransport
            ]
        );
        for detection in &detections {
            assert_eq!(detection.evidence.as_deref(), Some("http://sbi-pan-verify.in"));
        }
    }

    #[test]
    fn test_text_without_links_is_unavailable() {
        let err = run(
            "Hey, are we still meeting for lunch tomorrow?",
            ContentKind::Text,
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::ExtractorUnavailable { .. }));
    }

    #[test]
    fn test_official_domain_is_clean() {
        assert!(kinds("https://www.amazon.in/deals", ContentKind::Url).is_empty());
        assert!(kinds("https://retail.onlinesbi.sbi/login", ContentKind::Url).is_empty());
    }

    #[test]
    fn test_url_kind_synthesized_evidence() {
        let detections = run("http://amaz0n-offers.xyz/sale", ContentKind::Url).unwrap();
        let lookalike = detections
            .iter()
            .find(|d| d.kind == SignalKind::LookalikeDomain)
            .unwrap();
        assert!(lookalike.signal.reason.contains("Amazon"));
        assert_eq!(
            lookalike.evidence.as_deref(),
            Some("Look-alike domain: amaz0n-offers.xyz")
        );
        assert!(detections.iter().any(|d| d.kind == SignalKind::SuspiciousTld));
    }

    #[test]
    fn test_missing_scheme() {
        let found = kinds("paypal-secure-login.com", ContentKind::Url);
        assert!(found.contains(&SignalKind::MissingTransport));
        assert!(found.contains(&SignalKind::LookalikeDomain));
        assert!(found.contains(&SignalKind::BaitKeywordHost));
    }

    #[test]
    fn test_ip_and_hidden_host() {
        let found = kinds("http://www.paypal.com@192.168.4.20/login", ContentKind::Url);
        assert!(found.contains(&SignalKind::HiddenHost));
        assert!(found.contains(&SignalKind::IpLiteralHost));
        assert!(!found.contains(&SignalKind::LookalikeDomain));
    }

    #[test]
    fn test_homograph_host() {
        let found = kinds("https://p\u{0430}ypal.com/signin", ContentKind::Url);
        assert!(found.contains(&SignalKind::Homograph));
    }

    #[test]
    fn test_non_ascii_path_is_not_homograph() {
        for kind in [ContentKind::Url, ContentKind::Text] {
            let found = kinds("https://ru.wikipedia.org/wiki/Москва", kind);
            assert!(!found.contains(&SignalKind::Homograph), "kind: {}", kind);
        }
        let found = kinds("Read https://example.com/search?q=\u{0430}bc now", ContentKind::Text);
        assert!(found.is_empty());
    }

    #[test]
    fn test_zero_width_in_host_is_homograph() {
        let found = kinds("https://pay\u{200B}pal.com/signin", ContentKind::Url);
        assert!(found.contains(&SignalKind::Homograph));
    }

    #[test]
    fn test_brand_inside_longer_word_is_not_lookalike() {
        for url in [
            "https://pineapple.com",
            "https://lh3.googleusercontent.com/a/photo.jpg",
            "https://www.outlookindia.com/news",
            "https://s3.amazonaws.com/bucket/file",
        ] {
            assert!(
                !kinds(url, ContentKind::Url).contains(&SignalKind::LookalikeDomain),
                "url: {}",
                url
            );
        }
    }

    #[test]
    fn test_brand_as_hyphenated_token_is_lookalike() {
        assert!(kinds("https://apple-id-support.com", ContentKind::Url)
            .contains(&SignalKind::LookalikeDomain));
        assert!(kinds("https://state-bank-of-india.co.in", ContentKind::Url)
            .contains(&SignalKind::LookalikeDomain));
    }

    #[test]
    fn test_link_finder() {
        let finder = LinkFinder::new().unwrap();
        assert!(finder.contains_link("see www.example.com."));
        assert!(finder.contains_link("go to https://example.com/x"));
        assert!(!finder.contains_link("awww.that is cute"));
        assert!(!finder.contains_link("https:// is the prefix"));
        assert_eq!(finder.spans("visit www.example.com, thanks"), vec![6..21]);
    }

    #[test]
    fn test_shortener_and_fake_https() {
        assert!(kinds("https://bit.ly/3xYz", ContentKind::Url).contains(&SignalKind::UrlShortener));
        assert!(kinds("http://https-netbanking.top", ContentKind::Url)
            .contains(&SignalKind::FakeHttpsIndicator));
    }

    #[test]
    fn test_each_kind_fires_once() {
        let found = kinds(
            "Verify at http://hdfc-verify.xyz or http://icici-verify.xyz today",
            ContentKind::Text,
        );
        let lookalikes = found
            .iter()
            .filter(|k| **k == SignalKind::LookalikeDomain)
            .count();
        assert_eq!(lookalikes, 1);
    }
}
