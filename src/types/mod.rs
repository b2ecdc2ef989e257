pub mod finance;
pub mod request;
pub mod response;
pub mod token;
