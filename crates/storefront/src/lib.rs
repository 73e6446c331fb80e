//! Tavola Storefront library.
//!
//! This crate provides the storefront functionality as a library, allowing
//! it to be tested in-process and reused by the CLI.
//!
//! # Modules
//!
//! - [`store`] - The cart store (reducer + persistence + publish/subscribe)
//! - [`storage`] - Durable storage slots
//! - [`menu`] - Menu catalog loading
//! - [`routes`] - axum JSON and SSE handlers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod menu;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
