//! Core library for `nupkg` — an interactive front end for `dotnet pack`
//! and `nuget pack`.
//!
//! Provides the remembered-path store, persisted session state,
//! configuration, and construction and launching of pack commands.

pub mod build;
pub mod config;
pub mod error;
pub mod state;
pub mod store;
