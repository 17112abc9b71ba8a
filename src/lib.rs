pub mod cache;
pub mod config;
pub mod consts;
pub mod corpus;
pub mod error;
pub mod fingers;
pub mod layout;
pub mod metrics;
pub mod ranking;
pub mod table;
pub mod util;
