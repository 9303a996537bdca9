use super::link_analyzer::parse_link;
use super::{Detection, PatternGroup, SignalExtractor, SignalKind};
use crate::config::{BrandConfig, BrandKind, EngineConfig};
use crate::domain_utils::DomainUtils;
use crate::error::AnalysisError;
use crate::normalization::NormalizedContent;
use crate::types::{ContentKind, Severity, SignalCategory};
use regex::Regex;
use std::collections::HashMap;

/// Named-brand matcher for one brand kind, with a generic fallback phrase list.
struct BrandMatcher {
    kind: SignalKind,
    severity: Severity,
    reason: &'static str,
    regex: Option<Regex>,
    alias_to_brand: HashMap<String, String>,
    fallback: Option<PatternGroup>,
}

impl BrandMatcher {
    fn new(
        brands: &[&BrandConfig],
        kind: SignalKind,
        severity: Severity,
        reason: &'static str,
        fallback: Option<PatternGroup>,
    ) -> Result<Self, regex::Error> {
        let mut alias_to_brand = HashMap::new();
        let mut aliases: Vec<String> = Vec::new();

        for brand in brands {
            for alias in &brand.aliases {
                let key = normalize_alias(alias);
                if key.is_empty() {
                    continue;
                }
                alias_to_brand.insert(key.clone(), brand.name.clone());
                aliases.push(key);
            }
        }

        // Longest alias first so "income tax department" wins over "income tax"
        aliases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        aliases.dedup();

        let regex = if aliases.is_empty() {
            None
        } else {
            let alternation = aliases
                .iter()
                .map(|a| regex::escape(a).replace(' ', r"\s+"))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"(?i)\b({})\b", alternation))?)
        };

        Ok(Self {
            kind,
            severity,
            reason,
            regex,
            alias_to_brand,
            fallback,
        })
    }

    fn detect(
        &self,
        content: &NormalizedContent,
        official_brand: Option<&str>,
    ) -> Option<Detection> {
        if let Some(regex) = &self.regex {
            for found in regex.find_iter(content.text()) {
                let brand = self
                    .alias_to_brand
                    .get(&normalize_alias(found.as_str()))
                    .map(String::as_str)
                    .unwrap_or("unknown");

                // A link to the brand's own domain is not impersonation
                if official_brand == Some(brand) {
                    continue;
                }

                return Some(
                    Detection::new(
                        self.kind,
                        SignalCategory::Social,
                        self.severity,
                        format!("{} ({})", self.reason, brand),
                    )
                    .with_evidence(content.excerpt(found.range())),
                );
            }
        }

        self.fallback.as_ref().and_then(|group| group.detect(content))
    }
}

fn normalize_alias(alias: &str) -> String {
    alias
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Claims of authority: banks, government, executives, well-known brands.
pub struct ImpersonationAnalyzer {
    matchers: Vec<BrandMatcher>,
    brands: Vec<BrandConfig>,
}

impl ImpersonationAnalyzer {
    pub fn from_config(config: &EngineConfig) -> Result<Self, regex::Error> {
        let of_kind = |kind: BrandKind| -> Vec<&BrandConfig> {
            config.brands.iter().filter(|b| b.kind == kind).collect()
        };

        let matchers = vec![
            BrandMatcher::new(
                &of_kind(BrandKind::Bank),
                SignalKind::BankImpersonation,
                Severity::High,
                "Impersonates a bank or payment institution",
                Some(PatternGroup::new(
                    SignalKind::BankImpersonation,
                    SignalCategory::Social,
                    Severity::High,
                    "Claims to come from your bank",
                    r"(?i)\b(your bank|bank (alert|team|manager|official)|customer care (executive|team)|kyc (department|team))\b",
                )?),
            )?,
            BrandMatcher::new(
                &of_kind(BrandKind::Authority),
                SignalKind::AuthorityImpersonation,
                Severity::High,
                "Claims to be a government or law-enforcement authority",
                Some(PatternGroup::new(
                    SignalKind::AuthorityImpersonation,
                    SignalCategory::Social,
                    Severity::High,
                    "Claims to be a government or law-enforcement authority",
                    r"(?i)\b(police|tax department|customs (department|officer|duty)|government of \w+|ministry of \w+|cbi officer|narcotics (bureau|department))\b",
                )?),
            )?,
            BrandMatcher::new(
                &[],
                SignalKind::ExecutiveImpersonation,
                Severity::Medium,
                "Claims to be a senior executive or manager",
                Some(PatternGroup::new(
                    SignalKind::ExecutiveImpersonation,
                    SignalCategory::Social,
                    Severity::Medium,
                    "Claims to be a senior executive or manager",
                    r"(?i)\b(ceo|cfo|managing director|chief executive|your (boss|manager)|hr (team|department|manager))\b",
                )?),
            )?,
            BrandMatcher::new(
                &of_kind(BrandKind::Consumer),
                SignalKind::BrandMention,
                Severity::Low,
                "Uses a well-known brand name",
                None,
            )?,
        ];

        Ok(Self {
            matchers,
            brands: config.brands.clone(),
        })
    }

    /// Brand that owns the submitted URL, if the URL is on an official domain.
    fn official_brand_for(&self, content: &NormalizedContent) -> Option<String> {
        if content.kind() != ContentKind::Url {
            return None;
        }
        let url = parse_link(content.text())?;
        let host = url.host_str()?;

        self.brands
            .iter()
            .find(|b| DomainUtils::matches_domain_list(host, &b.official_domains))
            .map(|b| b.name.clone())
    }
}

impl SignalExtractor for ImpersonationAnalyzer {
    fn extract(&self, content: &NormalizedContent) -> Result<Vec<Detection>, AnalysisError> {
        let official = self.official_brand_for(content);
        if let Some(brand) = &official {
            log::debug!("URL is on an official {} domain", brand);
        }

        Ok(self
            .matchers
            .iter()
            .filter_map(|m| m.detect(content, official.as_deref()))
            .collect())
    }

    fn name(&self) -> &str {
        "impersonation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::ContentNormalizer;

    fn run(text: &str, kind: ContentKind) -> Vec<Detection> {
        let content = ContentNormalizer::new().normalize(text, kind).unwrap();
        ImpersonationAnalyzer::from_config(&EngineConfig::default())
            .unwrap()
            .extract(&content)
            .unwrap()
    }

    #[test]
    fn test_named_bank() {
        let detections = run(
            "SBI ALERT: Your account will be temporarily blocked due to PAN not updated.",
            ContentKind::Text,
        );
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].kind, SignalKind::BankImpersonation);
        assert_eq!(detections[0].severity(), Severity::High);
        assert_eq!(detections[0].evidence.as_deref(), Some("SBI"));
        assert!(detections[0].signal.reason.contains("(SBI)"));
    }

    #[test]
    fn test_longest_alias_wins() {
        let detections = run(
            "Notice from the Income Tax Department regarding your refund",
            ContentKind::Text,
        );
        assert_eq!(detections[0].kind, SignalKind::AuthorityImpersonation);
        assert_eq!(
            detections[0].evidence.as_deref(),
            Some("Income Tax Department")
        );
    }

    #[test]
    fn test_generic_fallbacks() {
        let found: Vec<SignalKind> = run(
            "This is your bank. The police have flagged your account. Regards, CEO",
            ContentKind::Text,
        )
        .into_iter()
        .map(|d| d.kind)
        .collect();
        assert_eq!(
            found,
            vec![
                SignalKind::BankImpersonation,
                SignalKind::AuthorityImpersonation,
                SignalKind::ExecutiveImpersonation
            ]
        );
    }

    #[test]
    fn test_official_url_not_impersonation() {
        assert!(run("https://www.amazon.in/deals", ContentKind::Url).is_empty());

        let detections = run("http://amazon-prize-claim.xyz/win", ContentKind::Url);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].kind, SignalKind::BrandMention);
    }

    #[test]
    fn test_benign_message() {
        assert!(run("Hey, are we still meeting for lunch tomorrow?", ContentKind::Text).is_empty());
    }
}
