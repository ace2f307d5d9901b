//! Europeana catalog adapter.
//!
//! Wraps records from the Europeana REST API as [`document::Document`]s with
//! dotted-path field access and locale-aware language map resolution, and
//! provides a cached [`repository::Repository`] for record lookup and search.

pub mod api;
pub mod cache;
pub mod config;
pub mod document;
pub mod i18n;
pub mod repository;
pub mod response;
pub mod server;
