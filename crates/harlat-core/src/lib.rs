pub mod analysis;
pub mod error;
pub mod filter;
pub mod har;
pub mod loader;

pub use error::{Error, Result};
