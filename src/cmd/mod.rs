pub mod analyze;
pub mod cache;
pub mod config;
pub mod corpus;
pub mod table;
