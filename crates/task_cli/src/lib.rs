pub mod api;
pub mod cli;
pub mod ui;

pub use api::{ClientError, HttpTaskApi, TaskApi};
