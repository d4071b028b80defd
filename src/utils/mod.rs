// Utility module for configuration, logging and errors
// Author: Gabriel Demetrios Lafis

mod config;
mod error;
mod logging;
mod validation;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use validation::*;
