pub mod cache;
pub mod common;
pub mod parser;
pub mod schema;
#[cfg(feature = "http")]
pub mod server;
pub mod store;

pub use cache::RecordCache;
pub use parser::LinkResolver;
pub use store::Database;
