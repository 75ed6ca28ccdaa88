//! Request handlers

pub mod account;
pub mod auth;
pub mod health;
pub mod shop;
pub mod transfer;
