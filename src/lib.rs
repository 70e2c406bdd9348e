pub mod config;
pub mod error;
pub mod fetch;
pub mod identity;
pub mod layout;
pub mod output;
pub mod process;
pub mod record;
pub mod sheet;

pub use error::PipelineError;
