use crate::domain_utils::DomainUtils;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TldRisk {
    Trusted,    // .gov, .edu, .mil
    Standard,   // .com, .org, .in, ...
    Suspicious, // cheap TLDs common in phishing kits
    HighRisk,   // free TLDs with very high abuse rates
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TldInfo {
    pub risk_level: TldRisk,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TldRiskConfig {
    pub tlds: HashMap<String, TldInfo>,
    pub default_risk: TldRisk,
}

#[derive(Debug, Clone)]
pub struct TldRiskAnalyzer {
    config: TldRiskConfig,
    tld_lookup: HashMap<String, TldInfo>,
}

impl TldRiskAnalyzer {
    pub fn new(config: TldRiskConfig) -> Self {
        let mut tld_lookup = HashMap::new();

        // Build lookup table
        for (tld, info) in &config.tlds {
            tld_lookup.insert(tld.trim_start_matches('.').to_lowercase(), info.clone());
        }

        Self { config, tld_lookup }
    }

    /// Get TLD risk information
    pub fn get_tld_risk(&self, tld: &str) -> (TldRisk, String) {
        let tld_lower = tld.to_lowercase();

        if let Some(info) = self.tld_lookup.get(&tld_lower) {
            (info.risk_level.clone(), info.description.clone())
        } else {
            (self.config.default_risk.clone(), "unlisted TLD".to_string())
        }
    }

    /// Severity a host earns from its TLD alone, if any.
    pub fn assess_host(&self, host: &str) -> Option<(Severity, String)> {
        let tld = DomainUtils::extract_tld(host)?;
        let (risk, description) = self.get_tld_risk(&tld);

        match risk {
            TldRisk::Trusted | TldRisk::Standard => None,
            TldRisk::Suspicious => Some((Severity::Medium, format!(".{} ({})", tld, description))),
            TldRisk::HighRisk => Some((Severity::High, format!(".{} ({})", tld, description))),
        }
    }
}
