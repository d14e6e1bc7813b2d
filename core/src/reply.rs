use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contacts::ContactRecord;
use crate::detector::ReasonKind;
use crate::error::HandoffError;

/// Handoff type reported to the chat UI for every escalation.
pub const HANDOFF_TYPE_CASEWORKER: &str = "caseworker";

pub const NYC_COMMISSION_HOTLINE: &str = "212-416-0197";
pub const NYS_DIVISION_HOTLINE: &str = "1-888-392-3644";

/// Render the user-facing handoff notice for `reason`.
pub fn format_message(reason: ReasonKind, contact: &ContactRecord) -> String {
    let ContactRecord {
        name,
        phone,
        email,
        address,
        hours,
    } = contact;

    let message = match reason {
        ReasonKind::UserRequest => format!(
            "I understand you'd like to speak with a human caseworker. \
             I'm happy to connect you with the right person.\n\
             \n\
             **{name}**\n\
             Phone: {phone}\n\
             Email: {email}\n\
             Address: {address}\n\
             Hours: {hours}\n\
             \n\
             I'm still here if you need help drafting a message or have other \
             questions about your housing search."
        ),
        ReasonKind::DiscriminationCase => format!(
            "I notice you may be experiencing housing discrimination, which is illegal in NYC. \
             You should speak with a housing specialist right away.\n\
             \n\
             **{name}**\n\
             Phone: {phone}\n\
             Email: {email}\n\
             Address: {address}\n\
             Hours: {hours}\n\
             \n\
             Additionally, you can report housing discrimination:\n\
             - NYC Commission on Human Rights: {NYC_COMMISSION_HOTLINE}\n\
             - NYS Division of Human Rights: {NYS_DIVISION_HOTLINE}\n\
             \n\
             I'm here if you need help documenting what happened or have other questions."
        ),
    };
    message.trim().to_string()
}

/// Like [`format_message`] for a reason tag coming off the wire.
pub fn format_message_for_tag(
    reason: &str,
    contact: &ContactRecord,
) -> Result<String, HandoffError> {
    let reason: ReasonKind = reason.parse()?;
    Ok(format_message(reason, contact))
}

/// Metadata the chat UI reads to switch into handoff mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReplyMetadata {
    pub requires_human_handoff: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handoff_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Response envelope handed back to the chat orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HandoffReply {
    pub response: String,
    pub metadata: ReplyMetadata,
}

impl HandoffReply {
    /// A reply that hands the conversation to a caseworker.
    pub fn handoff(response: String) -> Self {
        Self {
            response,
            metadata: ReplyMetadata {
                requires_human_handoff: true,
                handoff_type: Some(HANDOFF_TYPE_CASEWORKER.to_string()),
                timestamp: Some(Utc::now()),
            },
        }
    }

    /// A reply produced by the regular assistant flow.
    pub fn passthrough(response: String) -> Self {
        Self {
            response,
            metadata: ReplyMetadata {
                requires_human_handoff: false,
                handoff_type: None,
                timestamp: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::ContactDirectory;

    fn cityfheps_central() -> ContactRecord {
        ContactDirectory::builtin().resolve(Some("CityFHEPS"), None, false, false)
    }

    #[test]
    fn user_request_message_lists_every_contact_field() {
        let contact = cityfheps_central();
        let message = format_message(ReasonKind::UserRequest, &contact);

        assert!(message.starts_with(
            "I understand you'd like to speak with a human caseworker."
        ));
        assert!(message.contains("**CityFHEPS Central Office**"));
        assert!(message.contains("Phone: 929-221-0047"));
        assert!(message.contains(&contact.email));
        assert!(message.contains(&contact.address));
        assert!(message.contains(&contact.hours));
        assert!(message.ends_with("questions about your housing search."));
        assert!(!message.contains(NYS_DIVISION_HOTLINE));
    }

    #[test]
    fn discrimination_message_appends_both_hotlines() {
        let contact =
            ContactDirectory::builtin().resolve(Some("Section 8"), Some("Bronx"), true, true);
        let message = format_message(ReasonKind::DiscriminationCase, &contact);

        assert!(message.contains("illegal in NYC"));
        assert!(message.contains(&contact.phone));
        assert!(message.contains(&contact.email));
        assert!(message.contains(&contact.address));
        assert!(message.contains(
            "- NYC Commission on Human Rights: 212-416-0197"
        ));
        assert!(message.contains(
            "- NYS Division of Human Rights: 1-888-392-3644"
        ));
    }

    #[test]
    fn formatted_messages_are_trimmed() {
        let contact = cityfheps_central();
        for reason in [ReasonKind::UserRequest, ReasonKind::DiscriminationCase] {
            let message = format_message(reason, &contact);
            assert_eq!(message, message.trim());
        }
    }

    #[test]
    fn unknown_reason_tag_is_rejected() {
        let err = format_message_for_tag("eviction_notice", &cityfheps_central())
            .expect_err("unknown reason must fail");
        assert_eq!(
            err,
            HandoffError::UnknownReason("eviction_notice".to_string())
        );
    }

    #[test]
    fn handoff_envelope_is_tagged_caseworker() {
        let reply = HandoffReply::handoff("Test response".to_string());
        assert!(reply.metadata.requires_human_handoff);
        assert_eq!(reply.metadata.handoff_type.as_deref(), Some("caseworker"));
        assert!(reply.metadata.timestamp.is_some());

        let value = serde_json::to_value(HandoffReply::passthrough("ok".to_string()))
            .expect("serialize reply");
        assert_eq!(value["metadata"]["requires_human_handoff"], false);
        assert!(value["metadata"].get("handoff_type").is_none());
    }
}
