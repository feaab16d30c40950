pub mod archive;
pub mod cli;
pub mod error;
pub mod lock;
pub mod logging;
pub mod pipeline;

pub use error::RunError;
pub use pipeline::{RunOutcome, default_engine, run};
