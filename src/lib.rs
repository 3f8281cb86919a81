//! Core library exports for the category board.
//!
//! The `data` feature exposes the in-memory domain layer: typed category
//! records, validated forms, the search projection, the reorder engine and
//! the repository. The `app` feature adds services and configuration, plus
//! the asynchronous actions and the console driver built on them.

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod repository;

#[cfg(feature = "app")]
pub mod actions;
#[cfg(feature = "app")]
pub mod console;
#[cfg(feature = "app")]
pub mod models;
#[cfg(feature = "app")]
pub mod services;
