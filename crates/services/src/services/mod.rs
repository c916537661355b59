pub mod config;
pub mod feedback;
pub mod preferences;
pub mod search;
pub mod youtube;
