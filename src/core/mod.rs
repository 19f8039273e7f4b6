pub mod astronomy;
pub mod config;
pub mod error;
pub mod types;

pub use astronomy::MoonPhase;
pub use config::CullConfig;
pub use error::{CullError, Result};
