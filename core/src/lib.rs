//! Escalation decisions for the VoucherBot housing assistant.
//!
//! [`HandoffDetector`] reads one chat message plus the session's voucher
//! program and borough, decides whether a human has to take over, and picks
//! the office to send the user to. [`format_message`] turns that decision
//! into the reply shown to the user.

pub mod contacts;
pub mod detector;
pub mod error;
mod patterns;
pub mod reply;

pub use contacts::{Borough, ContactDirectory, ContactRecord, VoucherProgram};
pub use detector::{
    Classification, HandoffDetector, HandoffReport, HandoffVerdict, ReasonKind, RuleId,
    SessionContext,
};
pub use error::HandoffError;
pub use reply::{HandoffReply, format_message};
