//! Core use-case services.
//!
//! # Responsibility
//! - Combine storage engine and query layer into use-case level APIs.
//! - Keep the presentation layer decoupled from the backing medium.

pub mod todo_service;
