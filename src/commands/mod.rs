//! CLI commands implementation

pub mod init;
pub mod purge;
pub mod query;
pub mod scrape;

pub use init::*;
pub use purge::*;
pub use query::*;
pub use scrape::*;
