pub mod error;
pub mod handlers;
pub mod spark;
pub mod types;
