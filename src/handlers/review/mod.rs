pub mod admin;
pub mod create;
pub mod get;
