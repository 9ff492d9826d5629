pub mod audio;
pub mod config;
pub mod extraction;
pub mod http;
pub mod repositories;
pub mod storage;
