pub mod analysis;
pub mod config;
pub mod error;
pub mod generation;
pub mod latex;
pub mod request;
pub mod review;
pub mod source;

pub use config::PaperdeskConfig;
pub use error::{PaperdeskError, Result};
