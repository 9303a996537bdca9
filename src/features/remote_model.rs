use super::{Detection, SignalExtractor, SignalKind};
use crate::collaborators::ContentClassifier;
use crate::error::AnalysisError;
use crate::normalization::NormalizedContent;
use crate::types::{AnalysisStatus, SignalCategory, ThreatSignal};
use serde::Deserialize;

/// Upper bound on signals taken from one remote verdict.
const MAX_REMOTE_FLAGS: usize = 12;

/// The part of a remote verdict the engine trusts. Score, category and
/// explanation are recomputed locally.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteVerdict {
    #[allow(dead_code)]
    status: AnalysisStatus,
    flags: Vec<ThreatSignal>,
}

/// Optional extractor backed by a hosted model.
pub struct RemoteModelExtractor {
    classifier: Box<dyn ContentClassifier>,
}

impl RemoteModelExtractor {
    pub fn new(classifier: Box<dyn ContentClassifier>) -> Self {
        Self { classifier }
    }

    fn parse(&self, raw: &str) -> Result<Vec<Detection>, AnalysisError> {
        let body = strip_code_fence(raw);
        let verdict: RemoteVerdict = serde_json::from_str(body)
            .map_err(|e| AnalysisError::MalformedCollaboratorResponse(e.to_string()))?;

        Ok(verdict
            .flags
            .into_iter()
            .filter(|flag| !flag.reason.trim().is_empty())
            .take(MAX_REMOTE_FLAGS)
            .map(|flag| {
                let kind = infer_kind(flag.category, &flag.reason);
                Detection {
                    signal: flag,
                    kind,
                    evidence: None,
                }
            })
            .collect())
    }
}

/// Hosted models like to wrap JSON in a markdown fence.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

/// Best-effort tactic for a remote flag, from keywords in its reason.
fn infer_kind(category: SignalCategory, reason: &str) -> SignalKind {
    let reason = reason.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| reason.contains(w));

    let kind = match category {
        SignalCategory::Semantic => {
            if has(&["otp", "password", "pin ", "cvv", "credential"]) {
                Some(SignalKind::CredentialRequest)
            } else if has(&["block", "suspend", "deactivat", "frozen"]) {
                Some(SignalKind::AccountThreat)
            } else if has(&["legal", "arrest", "penalty", "police case"]) {
                Some(SignalKind::Coercion)
            } else if has(&["urgen", "immediate", "deadline", "pressure", "hours"]) {
                Some(SignalKind::Urgency)
            } else if has(&["job", "work from home", "income"]) {
                Some(SignalKind::JobOffer)
            } else if has(&["discount", "% off"]) {
                Some(SignalKind::ImplausibleDiscount)
            } else if has(&["sale", "shop", "store"]) {
                Some(SignalKind::RetailOffer)
            } else {
                None
            }
        }
        SignalCategory::Social => {
            if has(&["bank"]) {
                Some(SignalKind::BankImpersonation)
            } else if has(&["government", "police", "tax", "authority", "official"]) {
                Some(SignalKind::AuthorityImpersonation)
            } else if has(&["ceo", "executive", "manager", "boss"]) {
                Some(SignalKind::ExecutiveImpersonation)
            } else if has(&["brand"]) {
                Some(SignalKind::BrandMention)
            } else {
                None
            }
        }
        SignalCategory::Financial => {
            if has(&["lottery", "prize", "reward", "won", "winner"]) {
                Some(SignalKind::Reward)
            } else if has(&["gift card"]) {
                Some(SignalKind::GiftCard)
            } else if has(&["upi", "qr", "payment link"]) {
                Some(SignalKind::PaymentRedirection)
            } else if has(&["fee", "deposit"]) {
                Some(SignalKind::AdvanceFee)
            } else if has(&["kyc", "pan", "aadhaar"]) {
                Some(SignalKind::KycUpdate)
            } else if has(&["pay", "transfer", "money"]) {
                Some(SignalKind::PaymentRequest)
            } else {
                None
            }
        }
        SignalCategory::Technical => {
            if has(&["ip address"]) {
                Some(SignalKind::IpLiteralHost)
            } else if has(&["homograph", "punycode", "look-alike characters"]) {
                Some(SignalKind::Homograph)
            } else if has(&["lookalike", "look-alike", "typosquat", "imitat", "spoof"]) {
                Some(SignalKind::LookalikeDomain)
            } else if has(&["tld", "domain ending", "extension"]) {
                Some(SignalKind::SuspiciousTld)
            } else if has(&["shorten"]) {
                Some(SignalKind::UrlShortener)
            } else if has(&["http", "insecure", "not secure"]) {
                Some(SignalKind::InsecureTransport)
            } else {
                None
            }
        }
    };

    kind.unwrap_or_else(|| SignalKind::reported(category))
}

impl SignalExtractor for RemoteModelExtractor {
    fn extract(&self, content: &NormalizedContent) -> Result<Vec<Detection>, AnalysisError> {
        let raw = self
            .classifier
            .classify(content.original(), content.kind())
            .map_err(|e| AnalysisError::ClassificationUnavailable(e.to_string()))?;

        let detections = self.parse(&raw)?;
        log::debug!(
            "{} reported {} signal(s)",
            self.classifier.name(),
            detections.len()
        );
        Ok(detections)
    }

    fn name(&self) -> &str {
        "remote_model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::CollaboratorError;
    use crate::normalization::ContentNormalizer;
    use crate::types::{ContentKind, Severity};

    struct CannedClassifier(Result<String, CollaboratorError>);

    impl ContentClassifier for CannedClassifier {
        fn classify(&self, _text: &str, _kind: ContentKind) -> Result<String, CollaboratorError> {
            self.0.clone()
        }
    }

    fn run(response: Result<String, CollaboratorError>) -> Result<Vec<Detection>, AnalysisError> {
        let content = ContentNormalizer::new()
            .normalize("You won a prize, pay the fee now", ContentKind::Text)
            .unwrap();
        RemoteModelExtractor::new(Box::new(CannedClassifier(response))).extract(&content)
    }

    #[test]
    fn test_flags_become_detections() {
        let json = r#"```json
{
  "status": "Scam",
  "category": "Lottery / Reward Scam",
  "score": 91,
  "explanation": "Classic prize bait.",
  "flags": [
    {"category": "Financial", "reason": "Promises a lottery prize", "severity": "High"},
    {"category": "Semantic", "reason": "Unusual phrasing", "severity": "Low"},
    {"category": "Social", "reason": "   ", "severity": "Low"}
  ]
}
```"#;
        let detections = run(Ok(json.to_string())).unwrap();

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].kind, SignalKind::Reward);
        assert_eq!(detections[0].severity(), Severity::High);
        assert_eq!(detections[1].kind, SignalKind::ReportedSemantic);
        assert!(detections.iter().all(|d| d.evidence.is_none()));
    }

    #[test]
    fn test_provider_failure() {
        let err = run(Err(CollaboratorError::Timeout)).unwrap_err();
        assert!(matches!(err, AnalysisError::ClassificationUnavailable(_)));
    }

    #[test]
    fn test_malformed_response() {
        let err = run(Ok("I think this is a scam".to_string())).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedCollaboratorResponse(_)));

        let err = run(Ok(r#"{"status": "Scam", "flags": [{"category": "Emotional"}]}"#.to_string()))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedCollaboratorResponse(_)));
    }

    #[test]
    fn test_infer_kind() {
        assert_eq!(
            infer_kind(SignalCategory::Social, "Pretends to be your bank"),
            SignalKind::BankImpersonation
        );
        assert_eq!(
            infer_kind(SignalCategory::Technical, "Domain is a look-alike of amazon.in"),
            SignalKind::LookalikeDomain
        );
        assert_eq!(
            infer_kind(SignalCategory::Financial, "Something odd"),
            SignalKind::ReportedFinancial
        );
    }
}
