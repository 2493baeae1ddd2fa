pub mod config;
pub mod error;
pub mod pipeline;
pub mod projection;
pub mod report;
pub mod table;
pub mod trajectory;
