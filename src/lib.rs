pub mod api;
pub mod config;
pub mod data_models;
pub mod news_api;
pub mod render;
pub mod search;
