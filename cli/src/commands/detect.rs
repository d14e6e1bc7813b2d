use voucherbot_core::{HandoffDetector, HandoffReport, SessionContext};

use crate::util::print_json;

pub fn session(program: Option<&str>, borough: Option<&str>) -> SessionContext {
    SessionContext {
        voucher_program: program.map(str::to_string),
        borough: borough.map(str::to_string),
    }
}

fn evaluate(
    detector: &HandoffDetector,
    message: &str,
    context: &SessionContext,
    with_reply: bool,
) -> HandoffReport {
    let report = HandoffReport::from(detector.classify(message, context));
    if with_reply {
        report.with_reply(None)
    } else {
        report
    }
}

pub fn run(
    detector: &HandoffDetector,
    message: &str,
    program: Option<&str>,
    borough: Option<&str>,
    with_reply: bool,
) -> i32 {
    let report = evaluate(detector, message, &session(program, borough), with_reply);
    print_json(&report)
}

#[cfg(test)]
mod tests {
    use voucherbot_core::{ReasonKind, RuleId};

    use super::*;

    #[test]
    fn caseworker_request_hands_off_to_borough_office() {
        let report = evaluate(
            &HandoffDetector::new(),
            "Can I talk to a caseworker?",
            &session(Some("CityFHEPS"), Some("Brooklyn")),
            true,
        );

        assert!(report.requires_human_handoff);
        assert_eq!(report.reason, Some(ReasonKind::UserRequest));
        assert_eq!(report.matched_rule, Some(RuleId::AssistanceRequest));
        let contact = report.contact.expect("contact for handoff");
        assert_eq!(contact.name, "Brooklyn CityFHEPS Office");
        let reply = report.reply.expect("reply requested");
        assert!(reply.metadata.requires_human_handoff);
        assert!(reply.response.contains(&contact.phone));
    }

    #[test]
    fn reply_is_omitted_unless_requested() {
        let report = evaluate(
            &HandoffDetector::new(),
            "The landlord won't accept my voucher",
            &session(Some("CityFHEPS"), Some("Brooklyn")),
            false,
        );

        assert_eq!(report.reason, Some(ReasonKind::DiscriminationCase));
        assert!(report.reply.is_none());
    }

    #[test]
    fn search_messages_serialize_without_handoff_fields() {
        let report = evaluate(
            &HandoffDetector::new(),
            "Find apartments in Brooklyn",
            &session(None, None),
            true,
        );

        let value = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(value["requires_human_handoff"], false);
        assert!(value.get("contact").is_none());
        assert!(value.get("reply").is_none());
        assert!(value.get("handoff_type").is_none());
    }
}
