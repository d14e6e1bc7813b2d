use serde::Serialize;
use voucherbot_core::{ContactRecord, HandoffDetector, ReasonKind, format_message};

use super::detect::session;
use crate::util::{exit_error, print_json};

#[derive(Debug, Serialize)]
struct FormatOutput {
    reason: ReasonKind,
    contact: ContactRecord,
    message: String,
}

/// Render the notice with the contact the detector would attach for `reason`.
fn render(
    detector: &HandoffDetector,
    reason: ReasonKind,
    program: Option<&str>,
    borough: Option<&str>,
) -> FormatOutput {
    let contact = detector.contact_for(reason, &session(program, borough));
    FormatOutput {
        reason,
        message: format_message(reason, &contact),
        contact,
    }
}

pub fn run(
    detector: &HandoffDetector,
    reason: &str,
    program: Option<&str>,
    borough: Option<&str>,
) -> i32 {
    let reason: ReasonKind = match reason.parse() {
        Ok(r) => r,
        Err(e) => exit_error(
            &e.to_string(),
            Some("Use --reason user_request or --reason discrimination_case."),
        ),
    };
    print_json(&render(detector, reason, program, borough))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_request_uses_program_office() {
        let output = render(
            &HandoffDetector::new(),
            ReasonKind::UserRequest,
            Some("section 8"),
            Some("queens"),
        );

        assert_eq!(output.contact.name, "Queens NYCHA Section 8 Office");
        assert!(output.message.contains(&output.contact.phone));
    }

    #[test]
    fn hasa_discrimination_goes_to_legal_team() {
        let output = render(
            &HandoffDetector::new(),
            ReasonKind::DiscriminationCase,
            Some("HASA"),
            Some("Bronx"),
        );

        assert_eq!(output.contact.name, "Housing Works Legal Team");
        assert!(output.message.contains("212-416-0197"));
    }

    #[test]
    fn discrimination_case_uses_renamed_borough_office() {
        let output = render(
            &HandoffDetector::new(),
            ReasonKind::DiscriminationCase,
            Some("CityFHEPS"),
            Some("Brooklyn"),
        );

        assert_eq!(output.contact.name, "Brooklyn CityFHEPS Office");
        assert_eq!(output.contact.phone, "718-557-1399");
    }
}
