// Data models for grinstall

pub mod distribution;
pub mod layout;
pub mod platform;
pub mod receipt;
