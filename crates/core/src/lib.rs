#![forbid(unsafe_code)]

pub mod generator;
pub mod grading;
pub mod model;
pub mod time;

pub use time::Clock;
