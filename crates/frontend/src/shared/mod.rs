pub mod api_utils;
pub mod behaviors;
pub mod config;
pub mod date_utils;
pub mod dom;
pub mod modal;
pub mod notify;
pub mod number_format;
pub mod request_guard;
pub mod storage;
pub mod theme;
pub mod transient;
