pub mod api;
pub mod catalog;
pub mod config;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod repository;
pub mod storage;
