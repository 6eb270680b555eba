pub mod request;
pub mod verify;
