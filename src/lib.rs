//! # Recipe AI
//!
//! A small recipe suggestion backend.
//!
//! Two lookups are served over HTTP: a dish guess from an uploaded photo,
//! decided by keywords in the filename, and recipe suggestions from a list
//! of ingredients, scored by ingredient overlap against a fixed catalog.
//! Every answer is also appended to a SQLite document store when one is
//! configured; a failed write never fails the request.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │  HTTP (axum) │──▶│ resolver/matcher │──▶│ DocumentStore │
//! │   server     │   │   over Catalog   │   │ (best effort) │
//! └──────────────┘   └──────────────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! recipe-ai init                     # create database
//! recipe-ai serve                    # start HTTP server
//! recipe-ai match makaron czosnek    # try the matcher offline
//! recipe-ai guess margherita.jpg     # try the resolver offline
//! recipe-ai history --limit 5        # inspect stored requests
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`models`] | Recipe and response types |
//! | [`catalog`] | Embedded image templates and seed recipes |
//! | [`resolver`] | Filename-keyword dish guessing |
//! | [`matcher`] | Ingredient-overlap matching |
//! | [`diagnostics`] | `GET /test` report |
//! | [`store`] | Document store trait and backends |
//! | [`server`] | HTTP server |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`history`] | Stored request listing |

pub mod catalog;
pub mod config;
pub mod db;
pub mod diagnostics;
pub mod error;
pub mod history;
pub mod matcher;
pub mod migrate;
pub mod models;
pub mod resolver;
pub mod server;
pub mod store;
