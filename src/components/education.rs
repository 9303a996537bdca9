//! Per-category lessons shown after a risky verdict.

use crate::features::Detection;
use crate::types::{EducationModule, ScamCategory};

/// Most time-critical tip whenever the input carried a link.
pub const LINK_TIP: &str = "Do not click the link or open the website it points to.";
/// Always the last tip.
pub const REPORT_TIP: &str =
    "Report it on the national cyber-crime helpline 1930 or at cybercrime.gov.in.";

const MAX_RED_FLAGS: usize = 5;

pub struct Lesson {
    pub description: &'static str,
    pub danger: &'static str,
    pub tips: &'static [&'static str],
}

pub fn lesson(category: ScamCategory) -> Option<Lesson> {
    let lesson = match category {
        ScamCategory::AccountTakeover => Lesson {
            description: "The sender pretends to be your bank or a government office and claims your account, card or SIM is about to be blocked.",
            danger: "Panic makes people share OTPs, PINs or card details, which lets the scammer empty the account within minutes.",
            tips: &[
                "Never share an OTP, PIN, CVV or password with anyone, including bank staff.",
                "Contact your bank only through the number printed on your card or its official app.",
                "Banks do not block accounts over SMS or chat without notice through official channels.",
            ],
        },
        ScamCategory::LotteryRewardScam => Lesson {
            description: "You are told you won a prize, lottery or cash reward you never entered for.",
            danger: "The 'processing fee' or 'tax' you are asked to pay is the scam; the prize never arrives.",
            tips: &[
                "Do not pay any fee to claim a prize; real winnings never require upfront payment.",
                "Ignore winnings from lotteries or draws you never entered.",
                "Do not share bank or identity details to 'receive' a reward.",
            ],
        },
        ScamCategory::PaymentFraud => Lesson {
            description: "Someone posing as a trusted person or company asks you to pay through a UPI ID, QR code, payment link or gift cards.",
            danger: "Scanning a QR code or approving a collect request sends money out of your account; gift cards cannot be traced or refunded.",
            tips: &[
                "Never scan a QR code or enter your UPI PIN to receive money.",
                "Verify any payment request by calling the person or company on a number you already know.",
                "Legitimate organisations do not ask for payment in gift cards.",
            ],
        },
        ScamCategory::JobScam => Lesson {
            description: "An unsolicited offer promises easy income for simple tasks or a job you did not apply for.",
            danger: "After small initial payouts you are asked for registration fees or 'task deposits' that are never returned.",
            tips: &[
                "Do not pay to get a job; genuine employers never charge registration or training fees.",
                "Check the company on its official website and job portals before sharing documents.",
                "Be wary of offers that pay for liking videos or rating products.",
            ],
        },
        ScamCategory::FakeShoppingWebsite => Lesson {
            description: "A shop with unbelievable discounts imitates a known brand on a look-alike website.",
            danger: "Orders are never delivered and card details entered on the site are stolen.",
            tips: &[
                "Type the shop's address yourself instead of following deal links.",
                "Check the exact spelling of the domain before paying.",
                "Prefer cash on delivery or a credit card with buyer protection for unknown sellers.",
            ],
        },
        ScamCategory::General => Lesson {
            description: "The content shows several warning signs common to online fraud, without matching one specific scam pattern.",
            danger: "Scammers combine pressure, impersonation and payment requests to rush you into acting before you think.",
            tips: &[
                "Pause before acting on any unexpected message that asks for money or details.",
                "Verify the sender through an official channel you look up yourself.",
            ],
        },
        ScamCategory::None => return None,
    };
    Some(lesson)
}

/// Education for a risky result. `None` when the category carries no lesson.
pub fn build_module(
    category: ScamCategory,
    detections: &[Detection],
    has_link: bool,
) -> Option<EducationModule> {
    let lesson = lesson(category)?;

    let mut safety_tips = Vec::with_capacity(lesson.tips.len() + 2);
    if has_link {
        safety_tips.push(LINK_TIP.to_string());
    }
    safety_tips.extend(lesson.tips.iter().map(|t| t.to_string()));
    safety_tips.push(REPORT_TIP.to_string());

    Some(EducationModule {
        scam_description: lesson.description.to_string(),
        danger_reason: lesson.danger.to_string(),
        safety_tips,
        red_flags: red_flags(detections),
    })
}

/// Distinct evidence excerpts in flag order.
pub fn red_flags(detections: &[Detection]) -> Vec<String> {
    let mut flags: Vec<String> = Vec::new();
    for evidence in detections.iter().filter_map(|d| d.evidence.as_deref()) {
        if flags.len() == MAX_RED_FLAGS {
            break;
        }
        if !flags.iter().any(|f| f == evidence) {
            flags.push(evidence.to_string());
        }
    }
    flags
}
