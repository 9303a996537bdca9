use super::{Detection, PatternGroup, SignalExtractor, SignalKind};
use crate::error::AnalysisError;
use crate::normalization::NormalizedContent;
use crate::types::{Severity, SignalCategory};

/// Money bait and payment demands.
pub struct FinancialLureAnalyzer {
    groups: Vec<PatternGroup>,
}

impl FinancialLureAnalyzer {
    pub fn new() -> Result<Self, regex::Error> {
        use Severity::*;
        use SignalCategory::Financial;

        let groups = vec![
            PatternGroup::new(
                SignalKind::Reward,
                Financial,
                High,
                "Promises a prize, lottery win or unexpected money",
                r"(?i)\b(you (have |'ve )?won|winner|lottery|lucky draw|jackpot|prize( money)?|cash ?back of|claim your (reward|prize|gift|bonus)|free (iphone|gift|money|recharge)|(reward|bonus) (points )?(of|worth)|selected for (a|an) (reward|prize|gift))\b",
            )?,
            PatternGroup::new(
                SignalKind::AdvanceFee,
                Financial,
                High,
                "Asks for an upfront fee before paying out",
                r"(?i)\b(registration (fee|charges?)|processing (fee|charges?)|training (fee|charges?)|security deposit|refundable (deposit|amount|fee)|advance (fee|payment)|joining fee|activation (fee|charges?)|clearance (fee|charges?)|delivery charges? of)\b",
            )?,
            PatternGroup::new(
                SignalKind::GiftCard,
                Financial,
                High,
                "Asks for payment in gift cards",
                r"(?i)\b(gift ?cards?|itunes cards?|google play (cards?|codes?)|steam cards?|amazon (pay )?vouchers?)\b",
            )?,
            PatternGroup::new(
                SignalKind::PaymentRedirection,
                Financial,
                High,
                "Redirects payment to a UPI ID, QR code or payment link",
                r"(?i)\b(upi (id|pin)|scan (the |this )?qr|qr code|collect request|payment link|pay via (gpay|google pay|phonepe|paytm|upi)|send (it )?(to|on) (gpay|google pay|phonepe|paytm)|[a-z0-9._-]+@(ybl|okaxis|oksbi|okhdfcbank|okicici|paytm|upi|ibl|axl))\b",
            )?,
            PatternGroup::new(
                SignalKind::PaymentRequest,
                Financial,
                Medium,
                "Requests a payment or money transfer",
                r"(?i)\b(pay|deposit|transfer|send)\b.{0,30}(\b(fee|fees|amount|money|charges?|rs\.?|inr)\b|₹|\$\s?\d)",
            )?,
            PatternGroup::new(
                SignalKind::KycUpdate,
                Financial,
                Medium,
                "Claims identity or KYC documents need updating",
                r"(?i)\b(pan|kyc|aadhaa?r)\b.{0,30}\b(update|updated|expire|expired|verify|verification|link|linked|pending)\b",
            )?,
        ];

        Ok(Self { groups })
    }
}

impl SignalExtractor for FinancialLureAnalyzer {
    fn extract(&self, content: &NormalizedContent) -> Result<Vec<Detection>, AnalysisError> {
        Ok(self
            .groups
            .iter()
            .filter_map(|group| group.detect(content))
            .collect())
    }

    fn name(&self) -> &str {
        "financial_lures"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::ContentNormalizer;
    use crate::types::ContentKind;

    fn run(text: &str) -> Vec<Detection> {
        let content = ContentNormalizer::new()
            .normalize(text, ContentKind::Text)
            .unwrap();
        FinancialLureAnalyzer::new()
            .unwrap()
            .extract(&content)
            .unwrap()
    }

    fn kinds(text: &str) -> Vec<SignalKind> {
        run(text).into_iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_kyc_update() {
        let detections = run(
            "SBI ALERT: Your account will be temporarily blocked due to PAN not updated. Click here: http://sbi-pan-verify.in",
        );
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].kind, SignalKind::KycUpdate);
        assert_eq!(detections[0].severity(), Severity::Medium);
        assert_eq!(detections[0].evidence.as_deref(), Some("PAN not updated"));
    }

    #[test]
    fn test_lottery_with_fee() {
        let found = kinds(
            "Congratulations! You have won a lottery of Rs 25,00,000. Pay the processing fee of Rs 4,999 to claim.",
        );
        assert!(found.contains(&SignalKind::Reward));
        assert!(found.contains(&SignalKind::AdvanceFee));
        assert!(found.contains(&SignalKind::PaymentRequest));
    }

    #[test]
    fn test_gift_cards() {
        assert!(kinds("I need you to buy 5 Google Play cards for a client")
            .contains(&SignalKind::GiftCard));
    }

    #[test]
    fn test_upi_redirection() {
        assert!(kinds("Send the refund to winner123@ybl now")
            .contains(&SignalKind::PaymentRedirection));
        assert!(kinds("Scan the QR to receive your money")
            .contains(&SignalKind::PaymentRedirection));
    }

    #[test]
    fn test_benign_message() {
        assert!(run("Hey, are we still meeting for lunch tomorrow?").is_empty());
        assert!(run("Lunch was great, I'll pay you back tomorrow").is_empty());
    }
}
