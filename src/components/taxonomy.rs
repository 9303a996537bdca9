//! Taxonomy Classifier
//!
//! Picks the single scam category whose signal pattern is present, using a
//! fixed rule table.

use crate::features::{Detection, SignalKind};
use crate::types::{ScamCategory, Severity};

/// Highest severity among detections of a matching tactic.
fn strongest(detections: &[Detection], matches: impl Fn(SignalKind) -> bool) -> Option<Severity> {
    detections
        .iter()
        .filter(|d| matches(d.kind))
        .map(|d| d.severity())
        .max()
}

/// Both halves of a rule must be present; the rule's strength is the
/// strongest contributing signal.
fn both(a: Option<Severity>, b: Option<Severity>) -> Option<Severity> {
    Some(a?.max(b?))
}

fn is_payment_demand(kind: SignalKind) -> bool {
    matches!(
        kind,
        SignalKind::PaymentRequest
            | SignalKind::AdvanceFee
            | SignalKind::PaymentRedirection
            | SignalKind::GiftCard
    )
}

fn lottery(d: &[Detection]) -> Option<Severity> {
    both(
        strongest(d, |k| k == SignalKind::Reward),
        strongest(d, |k| k.is_pressure() || is_payment_demand(k)),
    )
}

fn payment_fraud(d: &[Detection]) -> Option<Severity> {
    both(
        strongest(d, |k| {
            matches!(k, SignalKind::PaymentRedirection | SignalKind::GiftCard)
        }),
        strongest(d, SignalKind::is_impersonation),
    )
}

fn job_scam(d: &[Detection]) -> Option<Severity> {
    both(
        strongest(d, |k| k == SignalKind::JobOffer),
        strongest(d, |k| {
            matches!(k, SignalKind::AdvanceFee | SignalKind::PaymentRequest)
        }),
    )
}

fn fake_shop(d: &[Detection]) -> Option<Severity> {
    both(
        strongest(d, |k| {
            matches!(k, SignalKind::RetailOffer | SignalKind::ImplausibleDiscount)
        }),
        strongest(d, SignalKind::is_lookalike),
    )
}

fn account_takeover(d: &[Detection]) -> Option<Severity> {
    both(
        strongest(d, |k| {
            matches!(
                k,
                SignalKind::BankImpersonation
                    | SignalKind::AuthorityImpersonation
                    | SignalKind::CredentialRequest
            )
        }),
        strongest(d, SignalKind::is_pressure),
    )
}

type Rule = (ScamCategory, fn(&[Detection]) -> Option<Severity>);

/// Table order is the tie-break order.
const RULES: [Rule; 5] = [
    (ScamCategory::LotteryRewardScam, lottery),
    (ScamCategory::PaymentFraud, payment_fraud),
    (ScamCategory::JobScam, job_scam),
    (ScamCategory::FakeShoppingWebsite, fake_shop),
    (ScamCategory::AccountTakeover, account_takeover),
];

pub struct TaxonomyClassifier;

impl TaxonomyClassifier {
    pub fn classify(detections: &[Detection], score: u8, safe_max: u8) -> ScamCategory {
        if score <= safe_max {
            return ScamCategory::None;
        }

        let mut best: Option<(ScamCategory, Severity)> = None;
        for (category, evaluate) in RULES.iter() {
            if let Some(severity) = evaluate(detections) {
                log::debug!("Taxonomy rule matched: {} ({:?})", category, severity);
                // Strictly greater: earlier rules win ties
                if best.map_or(true, |(_, current)| severity > current) {
                    best = Some((*category, severity));
                }
            }
        }

        best.map(|(category, _)| category)
            .unwrap_or(ScamCategory::General)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignalCategory;

    fn detection(kind: SignalKind, severity: Severity) -> Detection {
        let category = match kind {
            SignalKind::BankImpersonation
            | SignalKind::AuthorityImpersonation
            | SignalKind::ExecutiveImpersonation
            | SignalKind::BrandMention => SignalCategory::Social,
            SignalKind::Reward
            | SignalKind::PaymentRequest
            | SignalKind::AdvanceFee
            | SignalKind::GiftCard
            | SignalKind::PaymentRedirection
            | SignalKind::KycUpdate => SignalCategory::Financial,
            SignalKind::Homograph | SignalKind::LookalikeDomain | SignalKind::SuspiciousTld => {
                SignalCategory::Technical
            }
            _ => SignalCategory::Semantic,
        };
        Detection::new(kind, category, severity, "test")
    }

    #[test]
    fn test_low_score_is_none() {
        let detections = vec![
            detection(SignalKind::Reward, Severity::High),
            detection(SignalKind::Urgency, Severity::High),
        ];
        assert_eq!(TaxonomyClassifier::classify(&detections, 30, 30), ScamCategory::None);
        assert_eq!(
            TaxonomyClassifier::classify(&detections, 31, 30),
            ScamCategory::LotteryRewardScam
        );
    }

    #[test]
    fn test_no_rule_is_general() {
        let detections = vec![detection(SignalKind::Coercion, Severity::High)];
        assert_eq!(TaxonomyClassifier::classify(&detections, 45, 30), ScamCategory::General);
        assert_eq!(TaxonomyClassifier::classify(&[], 45, 30), ScamCategory::General);
    }

    #[test]
    fn test_each_rule() {
        let cases = vec![
            (
                vec![
                    detection(SignalKind::PaymentRedirection, Severity::High),
                    detection(SignalKind::BrandMention, Severity::Low),
                ],
                ScamCategory::PaymentFraud,
            ),
            (
                vec![
                    detection(SignalKind::JobOffer, Severity::Low),
                    detection(SignalKind::AdvanceFee, Severity::High),
                ],
                ScamCategory::JobScam,
            ),
            (
                vec![
                    detection(SignalKind::ImplausibleDiscount, Severity::Medium),
                    detection(SignalKind::LookalikeDomain, Severity::High),
                ],
                ScamCategory::FakeShoppingWebsite,
            ),
            (
                vec![
                    detection(SignalKind::BankImpersonation, Severity::High),
                    detection(SignalKind::AccountThreat, Severity::High),
                ],
                ScamCategory::AccountTakeover,
            ),
        ];

        for (detections, expected) in cases {
            assert_eq!(TaxonomyClassifier::classify(&detections, 60, 30), expected);
        }
    }

    #[test]
    fn test_severity_beats_table_order() {
        // Lottery matches at Medium, account takeover at High
        let detections = vec![
            detection(SignalKind::Reward, Severity::Medium),
            detection(SignalKind::AlarmHeader, Severity::Medium),
            detection(SignalKind::CredentialRequest, Severity::High),
        ];
        assert_eq!(
            TaxonomyClassifier::classify(&detections, 60, 30),
            ScamCategory::AccountTakeover
        );
    }

    #[test]
    fn test_table_order_breaks_ties() {
        // Lottery and account takeover both match at High
        let detections = vec![
            detection(SignalKind::Reward, Severity::High),
            detection(SignalKind::BankImpersonation, Severity::High),
            detection(SignalKind::Urgency, Severity::High),
        ];
        assert_eq!(
            TaxonomyClassifier::classify(&detections, 80, 30),
            ScamCategory::LotteryRewardScam
        );
    }
}
