//! Auth module: three-layer architecture (domain, repository, service).
//!
//! This module centralizes registration, login, token verification, and the
//! password reset/update workflows under the service crate.

pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::AuthService;
