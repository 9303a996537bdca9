use super::{Detection, PatternGroup, SignalExtractor, SignalKind};
use crate::error::AnalysisError;
use crate::normalization::NormalizedContent;
use crate::types::{Severity, SignalCategory};

/// Job and storefront wording. Weak on its own, decisive for the taxonomy
/// when paired with a fee demand or a look-alike domain.
pub struct OfferLanguageAnalyzer {
    groups: Vec<PatternGroup>,
}

impl OfferLanguageAnalyzer {
    pub fn new() -> Result<Self, regex::Error> {
        let groups = vec![
            PatternGroup::new(
                SignalKind::JobOffer,
                SignalCategory::Semantic,
                Severity::Low,
                "Unsolicited job or easy-income offer",
                r"(?i)\b(work from home|part[- ]time (job|work)|job offer|hiring now|we are hiring|vacanc(y|ies)|daily (income|salary|payout)|earn (rs\.?|inr|usd)?\s?[\d,]+k?\s?(per|a|/|every)\s?(day|week|month|hour)|like (youtube )?videos|simple online tasks?|data entry job)\b",
            )?,
            PatternGroup::new(
                SignalKind::RetailOffer,
                SignalCategory::Semantic,
                Severity::Low,
                "Storefront or deal wording",
                r"(?i)\b(flat \d{1,2}% off|\d{1,2}% off|clearance sale|mega sale|festive sale|limited stock|only \d+ left|buy now|order now|free shipping|cash on delivery|discount)\b",
            )?,
            PatternGroup::new(
                SignalKind::ImplausibleDiscount,
                SignalCategory::Semantic,
                Severity::Medium,
                "Discount too large to be genuine",
                r"(?i)\b[7-9]\d\s?%\s?(off|discount)\b",
            )?,
        ];

        Ok(Self { groups })
    }
}

impl SignalExtractor for OfferLanguageAnalyzer {
    fn extract(&self, content: &NormalizedContent) -> Result<Vec<Detection>, AnalysisError> {
        Ok(self
            .groups
            .iter()
            .filter_map(|group| group.detect(content))
            .collect())
    }

    fn name(&self) -> &str {
        "offer_language"
    }
}
