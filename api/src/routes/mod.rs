pub mod contacts;
pub mod handoff;
pub mod health;
