pub mod generator;
pub mod heat;
pub mod rules;
pub mod session;
pub mod triggers;
