pub mod credentials;
pub mod dashboard;
pub mod error;
pub mod github;
pub mod models;
pub mod ranking;
pub mod releases;
pub mod types;
