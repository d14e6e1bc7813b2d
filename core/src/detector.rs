use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contacts::{ContactDirectory, ContactRecord};
use crate::error::HandoffError;
use crate::patterns::{
    ASSISTANCE_KEYWORDS, ASSISTANCE_REQUEST_PATTERNS, BARE_HELP_PHRASES, COMPLAINT_PATTERNS,
    COMPLAINT_PHRASES, DISCRIMINATION_KEYWORDS, DISCRIMINATION_PATTERNS, HUMAN_CONTACT_KEYWORDS,
    RIGHTS_PHRASES, SEARCH_INTENT_KEYWORDS, contains_any, matches_any,
};
use crate::reply::{HANDOFF_TYPE_CASEWORKER, HandoffReply, format_message};

/// Why a conversation is handed to a human. Selects both the contact routing
/// and the reply template.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    UserRequest,
    DiscriminationCase,
}

impl ReasonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonKind::UserRequest => "user_request",
            ReasonKind::DiscriminationCase => "discrimination_case",
        }
    }
}

impl fmt::Display for ReasonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReasonKind {
    type Err = HandoffError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "user_request" => Ok(ReasonKind::UserRequest),
            "discrimination_case" => Ok(ReasonKind::DiscriminationCase),
            other => Err(HandoffError::UnknownReason(other.to_string())),
        }
    }
}

/// Caller-owned conversation state relevant to routing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionContext {
    /// Voucher program as the user named it ("CityFHEPS", "Section 8", ...)
    #[serde(default, alias = "voucher_type")]
    pub voucher_program: Option<String>,
    /// Borough as the user named it ("Brooklyn", "staten island", ...)
    #[serde(default)]
    pub borough: Option<String>,
}

impl SessionContext {
    pub fn new(voucher_program: impl Into<String>, borough: impl Into<String>) -> Self {
        Self {
            voucher_program: Some(voucher_program.into()),
            borough: Some(borough.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum HandoffVerdict {
    NoHandoff,
    Handoff {
        reason: ReasonKind,
        contact: ContactRecord,
    },
}

impl HandoffVerdict {
    pub fn requires_handoff(&self) -> bool {
        matches!(self, HandoffVerdict::Handoff { .. })
    }

    pub fn reason(&self) -> Option<ReasonKind> {
        match self {
            HandoffVerdict::Handoff { reason, .. } => Some(*reason),
            HandoffVerdict::NoHandoff => None,
        }
    }

    pub fn contact(&self) -> Option<&ContactRecord> {
        match self {
            HandoffVerdict::Handoff { contact, .. } => Some(contact),
            HandoffVerdict::NoHandoff => None,
        }
    }
}

/// Identifies a step of the cascade, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    ComplaintIntent,
    RightsAssistance,
    AssistanceRequest,
    DiscriminationKeyword,
    DiscriminationPattern,
    GeneralAssistance,
}

impl RuleId {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::ComplaintIntent => "complaint_intent",
            RuleId::RightsAssistance => "rights_assistance",
            RuleId::AssistanceRequest => "assistance_request",
            RuleId::DiscriminationKeyword => "discrimination_keyword",
            RuleId::DiscriminationPattern => "discrimination_pattern",
            RuleId::GeneralAssistance => "general_assistance",
        }
    }
}

/// Verdict plus the rule that decided it. `rule` is `None` when the cascade
/// ran out without a decisive rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub verdict: HandoffVerdict,
    pub rule: Option<RuleId>,
}

/// Flat view of a [`Classification`] for JSON consumers. Handoff fields are
/// absent when no handoff is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HandoffReport {
    pub requires_human_handoff: bool,
    /// Always "caseworker" when a handoff is required
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handoff_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactRecord>,
    /// Cascade rule that decided the verdict
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<RuleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<HandoffReply>,
}

impl From<Classification> for HandoffReport {
    fn from(classification: Classification) -> Self {
        let matched_rule = classification.rule;
        match classification.verdict {
            HandoffVerdict::NoHandoff => Self {
                requires_human_handoff: false,
                handoff_type: None,
                reason: None,
                contact: None,
                matched_rule,
                reply: None,
            },
            HandoffVerdict::Handoff { reason, contact } => Self {
                requires_human_handoff: true,
                handoff_type: Some(HANDOFF_TYPE_CASEWORKER.to_string()),
                reason: Some(reason),
                contact: Some(contact),
                matched_rule,
                reply: None,
            },
        }
    }
}

impl HandoffReport {
    /// Attach the user-facing reply: the handoff notice when a handoff is
    /// required, otherwise `fallback` (the assistant's own answer) as a regular
    /// reply.
    pub fn with_reply(mut self, fallback: Option<String>) -> Self {
        self.reply = match (self.reason, &self.contact) {
            (Some(reason), Some(contact)) => {
                Some(HandoffReply::handoff(format_message(reason, contact)))
            }
            _ => fallback.map(HandoffReply::passthrough),
        };
        self
    }
}

/// The message in the two shapes the rules read.
struct MessageView<'a> {
    trimmed: &'a str,
    lowered: String,
}

enum Trigger {
    Phrases(&'static [&'static str]),
    Patterns(&'static [Regex]),
}

impl Trigger {
    fn fires(&self, message: &MessageView<'_>) -> bool {
        match self {
            Trigger::Phrases(phrases) => contains_any(&message.lowered, phrases),
            Trigger::Patterns(patterns) => matches_any(message.trimmed, patterns),
        }
    }
}

#[derive(Clone, Copy)]
enum Suppression {
    /// Search vocabulary without an explicit ask for a human.
    SearchWithoutHumanContact,
    /// The whole message is a bare "help".
    BareHelpPhrase,
}

impl Suppression {
    fn applies(self, message: &MessageView<'_>) -> bool {
        match self {
            Suppression::SearchWithoutHumanContact => {
                contains_any(&message.lowered, SEARCH_INTENT_KEYWORDS)
                    && !contains_any(&message.lowered, HUMAN_CONTACT_KEYWORDS)
            }
            Suppression::BareHelpPhrase => BARE_HELP_PHRASES.contains(&message.lowered.trim()),
        }
    }
}

#[derive(Clone, Copy)]
enum RuleAction {
    /// Hand off. A suppression skips the rule and the cascade moves on.
    Escalate(ReasonKind),
    /// Never hands off. A suppression ends the cascade with `NoHandoff`.
    SuppressOnly,
}

enum RuleOutcome {
    Escalate(ReasonKind),
    Decline,
    Continue,
}

struct HandoffRule {
    id: RuleId,
    triggers: Vec<Trigger>,
    suppressions: &'static [Suppression],
    action: RuleAction,
}

impl HandoffRule {
    fn evaluate(&self, message: &MessageView<'_>) -> RuleOutcome {
        if !self.triggers.iter().any(|trigger| trigger.fires(message)) {
            return RuleOutcome::Continue;
        }
        let suppressed = self
            .suppressions
            .iter()
            .any(|suppression| suppression.applies(message));

        match (self.action, suppressed) {
            (RuleAction::Escalate(_), true) => {
                tracing::debug!(rule = self.id.as_str(), "handoff rule suppressed");
                RuleOutcome::Continue
            }
            (RuleAction::Escalate(reason), false) => RuleOutcome::Escalate(reason),
            (RuleAction::SuppressOnly, true) => RuleOutcome::Decline,
            (RuleAction::SuppressOnly, false) => RuleOutcome::Continue,
        }
    }
}

const DISCRIMINATION: RuleAction = RuleAction::Escalate(ReasonKind::DiscriminationCase);
const USER_REQUEST: RuleAction = RuleAction::Escalate(ReasonKind::UserRequest);

/// The ordered cascade. Specific intents come before broad keyword lists so a
/// generic "help with" never overrides a complaint or a direct request.
static RULES: LazyLock<Vec<HandoffRule>> = LazyLock::new(|| {
    vec![
        HandoffRule {
            id: RuleId::ComplaintIntent,
            triggers: vec![
                Trigger::Phrases(COMPLAINT_PHRASES),
                Trigger::Patterns(&COMPLAINT_PATTERNS),
            ],
            suppressions: &[],
            action: DISCRIMINATION,
        },
        HandoffRule {
            id: RuleId::RightsAssistance,
            triggers: vec![Trigger::Phrases(RIGHTS_PHRASES)],
            suppressions: &[],
            action: USER_REQUEST,
        },
        HandoffRule {
            id: RuleId::AssistanceRequest,
            triggers: vec![Trigger::Patterns(&ASSISTANCE_REQUEST_PATTERNS)],
            suppressions: &[Suppression::SearchWithoutHumanContact],
            action: USER_REQUEST,
        },
        HandoffRule {
            id: RuleId::DiscriminationKeyword,
            triggers: vec![Trigger::Phrases(DISCRIMINATION_KEYWORDS)],
            suppressions: &[],
            action: DISCRIMINATION,
        },
        HandoffRule {
            id: RuleId::DiscriminationPattern,
            triggers: vec![Trigger::Patterns(&DISCRIMINATION_PATTERNS)],
            suppressions: &[],
            action: DISCRIMINATION,
        },
        // Matching here never escalates on its own; the rule only closes the
        // cascade early for bare help and search-flavoured help.
        HandoffRule {
            id: RuleId::GeneralAssistance,
            triggers: vec![Trigger::Phrases(ASSISTANCE_KEYWORDS)],
            suppressions: &[
                Suppression::BareHelpPhrase,
                Suppression::SearchWithoutHumanContact,
            ],
            action: RuleAction::SuppressOnly,
        },
    ]
});

/// Decides whether a chat message needs a human and who that human is.
///
/// Stateless apart from the shared, read-only contact directory: cloning is
/// cheap and every call is independent.
#[derive(Debug, Clone)]
pub struct HandoffDetector {
    directory: Arc<ContactDirectory>,
}

impl Default for HandoffDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl HandoffDetector {
    /// Detector backed by the built-in directory.
    pub fn new() -> Self {
        Self::with_directory(Arc::new(ContactDirectory::builtin().clone()))
    }

    pub fn with_directory(directory: Arc<ContactDirectory>) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &ContactDirectory {
        &self.directory
    }

    /// Rule ids in evaluation order.
    pub fn rules() -> impl Iterator<Item = RuleId> {
        RULES.iter().map(|rule| rule.id)
    }

    pub fn detect(&self, message: &str, context: &SessionContext) -> HandoffVerdict {
        self.classify(message, context).verdict
    }

    pub fn classify(&self, message: &str, context: &SessionContext) -> Classification {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Classification {
                verdict: HandoffVerdict::NoHandoff,
                rule: None,
            };
        }
        let view = MessageView {
            trimmed,
            lowered: trimmed.to_lowercase(),
        };

        for rule in RULES.iter() {
            match rule.evaluate(&view) {
                RuleOutcome::Continue => continue,
                RuleOutcome::Decline => {
                    tracing::debug!(rule = rule.id.as_str(), "handoff declined");
                    return Classification {
                        verdict: HandoffVerdict::NoHandoff,
                        rule: Some(rule.id),
                    };
                }
                RuleOutcome::Escalate(reason) => {
                    let contact = self.contact_for(reason, context);
                    tracing::debug!(
                        rule = rule.id.as_str(),
                        reason = reason.as_str(),
                        contact = %contact.name,
                        "handoff required"
                    );
                    return Classification {
                        verdict: HandoffVerdict::Handoff { reason, contact },
                        rule: Some(rule.id),
                    };
                }
            }
        }

        Classification {
            verdict: HandoffVerdict::NoHandoff,
            rule: None,
        }
    }

    /// Detect, and on handoff build the user-facing reply envelope.
    pub fn escalate(&self, message: &str, context: &SessionContext) -> Option<HandoffReply> {
        match self.detect(message, context) {
            HandoffVerdict::Handoff { reason, contact } => {
                Some(HandoffReply::handoff(format_message(reason, &contact)))
            }
            HandoffVerdict::NoHandoff => None,
        }
    }

    /// The contact a handoff for `reason` is sent to. User requests go to the
    /// program's regular offices; discrimination cases go to the borough office
    /// when the program has one, otherwise to the discrimination contacts.
    pub fn contact_for(&self, reason: ReasonKind, context: &SessionContext) -> ContactRecord {
        let program = context.voucher_program.as_deref();
        let borough = context.borough.as_deref();
        match reason {
            ReasonKind::UserRequest => self.directory.resolve(program, borough, false, false),
            ReasonKind::DiscriminationCase => self.directory.resolve(program, borough, true, true),
        }
    }
}
