pub mod dashboard;

pub use dashboard::init;
