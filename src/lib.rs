pub mod background;
pub mod config;
pub mod errors;
pub mod fetchers;
pub mod models;
pub mod notifiers;
pub mod utils;
