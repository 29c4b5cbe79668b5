//! Zefix Company Lookup Gateway Library
//!
//! Relays company-name searches to the Swiss company registry (Zefix),
//! attaching Basic credentials from configuration and normalizing the
//! registry's answer into a `found`/`data` result.
//!
//! # Modules
//!
//! - `api`: API-layer namespace (handlers, routes, OpenAPI document).
//! - `core`: Domain-layer namespace (gateway, models, errors).
//! - `integrations`: External service integrations (registry client).
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Request, result and envelope types.
//! - `openapi`: OpenAPI document.
//! - `registry_client`: Zefix HTTPS client and transport abstraction.
//! - `routes`: Router assembly.
//! - `services`: The company lookup gateway.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod registry_client;
pub mod routes;
pub mod services;
