pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod kakao;
pub mod logger;
pub mod map;
pub mod models;
pub mod pipeline;
pub mod seoul;
pub mod stats;
