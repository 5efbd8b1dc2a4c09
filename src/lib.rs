pub mod config;
pub mod errors;
pub mod models;
pub mod storage;
pub mod thumbnails;
pub mod web;
