pub mod config;
pub mod msg;
pub mod request;
pub mod response;
