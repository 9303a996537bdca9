use crate::features::tld_risk::{TldInfo, TldRisk, TldRiskConfig};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrandKind {
    /// Banks, card issuers and payment institutions
    Bank,
    /// Tax offices, regulators, police
    Authority,
    /// Consumer brands, shops, couriers
    Consumer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    pub name: String,
    pub kind: BrandKind,
    /// Phrases that name the brand in free text, matched case-insensitively
    pub aliases: Vec<String>,
    /// Domains the brand actually sends links from
    pub official_domains: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub brands: Vec<BrandConfig>,
    pub tld_risk: TldRiskConfig,
    pub url_shorteners: Vec<String>,
    /// Words that legitimate institutions do not put in their hostnames
    pub bait_host_keywords: Vec<String>,
    #[serde(default)]
    pub disabled_extractors: Vec<String>,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    50
}

fn brand(name: &str, kind: BrandKind, aliases: &[&str], domains: &[&str]) -> BrandConfig {
    BrandConfig {
        name: name.to_string(),
        kind,
        aliases: aliases.iter().map(|s| s.to_string()).collect(),
        official_domains: domains.iter().map(|s| s.to_string()).collect(),
    }
}

fn tld(risk_level: TldRisk, description: &str) -> TldInfo {
    TldInfo {
        risk_level,
        description: description.to_string(),
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        use BrandKind::*;

        let brands = vec![
            brand(
                "SBI",
                Bank,
                &["sbi", "state bank of india", "onlinesbi"],
                &["sbi.co.in", "onlinesbi.sbi", "sbi.bank.in", "sbicard.com"],
            ),
            brand("HDFC Bank", Bank, &["hdfc", "hdfc bank"], &["hdfcbank.com", "hdfc.com"]),
            brand("ICICI Bank", Bank, &["icici", "icici bank"], &["icicibank.com"]),
            brand("Axis Bank", Bank, &["axis bank", "axisbank"], &["axisbank.com"]),
            brand("Kotak", Bank, &["kotak", "kotak mahindra"], &["kotak.com"]),
            brand("PNB", Bank, &["pnb", "punjab national bank"], &["pnbindia.in"]),
            brand("Chase", Bank, &["chase bank", "jpmorgan chase"], &["chase.com"]),
            brand("Bank of America", Bank, &["bank of america", "bofa"], &["bankofamerica.com"]),
            brand("Wells Fargo", Bank, &["wells fargo", "wellsfargo"], &["wellsfargo.com"]),
            brand("Citibank", Bank, &["citibank", "citi bank"], &["citi.com", "citibank.com"]),
            brand("HSBC", Bank, &["hsbc"], &["hsbc.com", "hsbc.co.in", "hsbc.co.uk"]),
            brand("Barclays", Bank, &["barclays"], &["barclays.co.uk", "barclays.com"]),
            brand("PayPal", Bank, &["paypal"], &["paypal.com", "paypal.me"]),
            brand(
                "Income Tax Department",
                Authority,
                &["income tax department", "income tax", "incometax"],
                &["incometax.gov.in"],
            ),
            brand("IRS", Authority, &["irs", "internal revenue service"], &["irs.gov"]),
            brand("HMRC", Authority, &["hmrc"], &["gov.uk"]),
            brand(
                "Reserve Bank of India",
                Authority,
                &["rbi", "reserve bank of india"],
                &["rbi.org.in"],
            ),
            brand("TRAI", Authority, &["trai"], &["trai.gov.in"]),
            brand(
                "Cyber Crime Cell",
                Authority,
                &["cyber cell", "cyber crime cell", "cybercrime"],
                &["cybercrime.gov.in"],
            ),
            brand(
                "Amazon",
                Consumer,
                &["amazon"],
                &["amazon.com", "amazon.in", "amazon.co.uk", "amazonaws.com"],
            ),
            brand("Flipkart", Consumer, &["flipkart"], &["flipkart.com"]),
            brand("Netflix", Consumer, &["netflix"], &["netflix.com"]),
            brand(
                "Microsoft",
                Consumer,
                &["microsoft", "outlook", "office365"],
                &["microsoft.com", "live.com", "outlook.com", "office.com"],
            ),
            brand(
                "Apple",
                Consumer,
                &["apple id", "icloud", "apple"],
                &["apple.com", "icloud.com"],
            ),
            brand(
                "Google",
                Consumer,
                &["google", "gmail"],
                &["google.com", "gmail.com", "youtube.com", "googleusercontent.com"],
            ),
            brand("WhatsApp", Consumer, &["whatsapp"], &["whatsapp.com"]),
            brand("Paytm", Consumer, &["paytm"], &["paytm.com"]),
            brand("PhonePe", Consumer, &["phonepe"], &["phonepe.com"]),
            brand("FedEx", Consumer, &["fedex"], &["fedex.com"]),
            brand("DHL", Consumer, &["dhl"], &["dhl.com"]),
            brand("India Post", Consumer, &["india post", "indiapost"], &["indiapost.gov.in"]),
        ];

        let mut tlds = HashMap::new();
        for free in ["tk", "ml", "ga", "cf", "gq"] {
            tlds.insert(
                free.to_string(),
                tld(TldRisk::HighRisk, "free TLD with a very high abuse rate"),
            );
        }
        for cheap in [
            "xyz", "top", "club", "click", "link", "work", "buzz", "rest", "icu", "zip", "mov",
            "cam", "loan", "win", "bid", "shop", "site", "online", "fun", "live",
        ] {
            tlds.insert(
                cheap.to_string(),
                tld(TldRisk::Suspicious, "TLD frequently used by phishing sites"),
            );
        }
        for trusted in ["gov", "mil", "edu"] {
            tlds.insert(trusted.to_string(), tld(TldRisk::Trusted, "restricted registry"));
        }

        Self {
            brands,
            tld_risk: TldRiskConfig {
                tlds,
                default_risk: TldRisk::Standard,
            },
            url_shorteners: [
                "bit.ly",
                "tinyurl.com",
                "t.co",
                "goo.gl",
                "ow.ly",
                "is.gd",
                "v.gd",
                "tiny.cc",
                "rb.gy",
                "cutt.ly",
                "shorturl.at",
                "s.id",
                "t.ly",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            bait_host_keywords: [
                "verify", "verification", "secure", "login", "signin", "update", "kyc", "account",
                "confirm", "wallet", "unlock", "reward", "claim", "bonus", "refund", "support",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            disabled_extractors: Vec::new(),
            history_limit: default_history_limit(),
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: EngineConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.history_limit == 0 {
            anyhow::bail!("history_limit must be at least 1");
        }
        for brand in &self.brands {
            if brand.aliases.iter().all(|a| a.trim().is_empty()) {
                anyhow::bail!("brand '{}' has no aliases", brand.name);
            }
        }
        Ok(())
    }

    /// Official domains of every configured brand.
    pub fn official_domains(&self) -> Vec<String> {
        self.brands
            .iter()
            .flat_map(|b| b.official_domains.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.brands.iter().any(|b| b.name == "SBI"));
        assert!(config.official_domains().contains(&"sbi.co.in".to_string()));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = EngineConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: EngineConfig = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed.brands.len(), config.brands.len());
        assert_eq!(parsed.url_shorteners, config.url_shorteners);
        assert_eq!(parsed.history_limit, 50);
        assert_eq!(
            parsed.tld_risk.tlds.get("tk").map(|t| t.risk_level.clone()),
            Some(TldRisk::HighRisk)
        );
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "phishshield-config-{}.yaml",
            uuid::Uuid::new_v4()
        ));
        let path = path.to_string_lossy().to_string();

        let mut config = EngineConfig::default();
        config.history_limit = 7;
        config.to_file(&path).unwrap();

        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded.history_limit, 7);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_history_limit_rejected() {
        let mut config = EngineConfig::default();
        config.history_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = EngineConfig::from_file("/nonexistent/phishshield.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/phishshield.yaml"));
    }
}
