pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod server;
pub mod token;

pub use error::{Error, IssueError};
pub type Result<T> = std::result::Result<T, Error>;
