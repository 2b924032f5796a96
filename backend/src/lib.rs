//! Blogging backend: domain model, HTTP adapter, and storage adapters.
//!
//! The crate follows a hexagonal layout. `domain` holds entities, ports, and
//! use-case services; `inbound` adapts HTTP requests onto the services;
//! `outbound` implements the ports against PostgreSQL, the filesystem, and
//! an in-process cache.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
