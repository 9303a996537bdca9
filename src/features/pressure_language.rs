use super::{Detection, PatternGroup, SignalExtractor, SignalKind};
use crate::error::AnalysisError;
use crate::normalization::NormalizedContent;
use crate::types::{Severity, SignalCategory};

/// Urgency, threats and coercive tone.
pub struct PressureLanguageAnalyzer {
    groups: Vec<PatternGroup>,
}

impl PressureLanguageAnalyzer {
    pub fn new() -> Result<Self, regex::Error> {
        use Severity::*;
        use SignalCategory::Semantic;

        let groups = vec![
            PatternGroup::new(
                SignalKind::Urgency,
                Semantic,
                High,
                "Time-pressure language pushes for an immediate reaction",
                r"(?i)\b(act (now|fast|immediately)|urgent(ly)?|immediately|right away|asap|(within|in the next|expires? in|valid for( only)?) \d+\s*(hours?|hrs?|minutes?|mins?|days?)|expires? (today|tonight|soon)|last (chance|day|warning)|final (notice|warning|reminder)|before midnight|limited time)\b",
            )?,
            PatternGroup::new(
                SignalKind::AccountThreat,
                Semantic,
                High,
                "Threatens to block or suspend an account or service",
                r"(?i)\b(account|card|sim|number|profile|wallet|upi id|services?)\b.{0,40}\b(blocked|suspended|locked|deactivated|disabled|closed|frozen|terminated|restricted|on hold)\b|\b(block|suspend|deactivat|freez|terminat|disabl)\w*\s.{0,20}\byour\s+(account|card|sim|number|services?)\b",
            )?,
            PatternGroup::new(
                SignalKind::Coercion,
                Semantic,
                High,
                "Coercive tone threatens legal or financial consequences",
                r"(?i)\b(legal action|arrest(ed)?|arrest warrant|warrant|police (case|complaint)|penalty|fine of|court (case|notice|summons)|prosecut\w+|or else|failure to (comply|respond|pay|update)|will be (charged|penali[sz]ed|prosecuted))\b",
            )?,
            // Case-sensitive: shouted headers only
            PatternGroup::new(
                SignalKind::AlarmHeader,
                Semantic,
                Medium,
                "Alarm-style header designed to cause panic",
                r"\b(ALERT|WARNING|ATTENTION|IMPORTANT|FINAL NOTICE)\b",
            )?,
            PatternGroup::new(
                SignalKind::CallToAction,
                Semantic,
                Medium,
                "Pushes the reader to click a link or call right away",
                r"(?i)\b(click (here|on|the link|below|now)|tap (here|on|the link|below)|open (the|this) link|follow (the|this) link|visit (the|this) link|call (us )?(now|immediately)|reply (yes|now|with))\b",
            )?,
            PatternGroup::new(
                SignalKind::CredentialRequest,
                Semantic,
                High,
                "Asks for an OTP, PIN, password or card details",
                r"(?i)\b(share|send|provide|enter|confirm|tell|forward|give)\b.{0,30}\b(otp|one[- ]time (password|passcode|pin)|pin|password|passcode|cvv|verification code|security code|login details|card details|net ?banking)\b|\b(otp|cvv)\b.{0,30}\b(share|send|provide|forward)\b",
            )?,
        ];

        Ok(Self { groups })
    }

    fn analyze_content_structure(&self, content: &NormalizedContent) -> Vec<Detection> {
        let mut detections = Vec::new();
        let text = content.text();

        // Excessive capitalization
        let caps_count = text.chars().filter(|c| c.is_uppercase()).count();
        let total_chars = text.chars().filter(|c| c.is_alphabetic()).count();
        if total_chars >= 20 && caps_count * 100 / total_chars > 60 {
            detections.push(Detection::new(
                SignalKind::AlarmHeader,
                SignalCategory::Semantic,
                Severity::Low,
                "Message is written mostly in capital letters",
            ));
        }

        // Multiple exclamation marks
        if text.matches('!').count() > 3 {
            detections.push(Detection::new(
                SignalKind::AlarmHeader,
                SignalCategory::Semantic,
                Severity::Low,
                "Repeated exclamation marks create false excitement",
            ));
        }

        detections
    }
}

impl SignalExtractor for PressureLanguageAnalyzer {
    fn extract(&self, content: &NormalizedContent) -> Result<Vec<Detection>, AnalysisError> {
        let mut detections: Vec<Detection> = self
            .groups
            .iter()
            .filter_map(|group| group.detect(content))
            .collect();

        if content.kind() == crate::types::ContentKind::Text {
            detections.extend(self.analyze_content_structure(content));
        }

        Ok(detections)
    }

    fn name(&self) -> &str {
        "pressure_language"
    }
}
