pub mod event;
pub mod response;
