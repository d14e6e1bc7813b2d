pub mod detect;
pub mod format;
pub mod health;
pub mod resolve;
