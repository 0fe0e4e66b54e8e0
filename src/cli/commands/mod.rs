//! CLI command implementations

pub mod geocode;
pub mod init;
pub mod status;
pub mod validate;
