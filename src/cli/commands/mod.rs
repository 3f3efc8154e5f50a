//! CLI command modules

pub mod info;
pub mod init;
pub mod mock;
pub mod normalize;
pub mod register;
pub mod validate;
