pub mod app;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod session;
pub mod storage;
pub mod tasks;
pub mod validation;
pub mod view;
pub mod voting;
