//! # BizSearch
//!
//! Natural-language listing query engine for a business and franchise
//! marketplace.
//!
//! BizSearch turns free-text queries ("cheap restaurant franchise in Mumbai
//! under 20 lakh") into structured, bounded filter specifications and
//! executes them as safe, paginated reads over the listing store. Raw REST
//! query parameters go through the same validation layer, so both paths
//! converge on one executable shape.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────┐   ┌───────────┐   ┌──────────┐
//! │ free text  │──▶│  Intent   │──▶│   Query   │──▶│  Query   │
//! │ REST params│──▶│ Extractor │   │ Validator │   │ Executor │
//! └────────────┘   └───────────┘   └───────────┘   └────┬─────┘
//!                                                       │
//!                                    ┌──────────┐  ┌────┴─────┐
//!                                    │   CLI    │  │  SQLite  │
//!                                    │  (bizq)  │  │ listings │
//!                                    └──────────┘  └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! bizq init                                  # create database
//! bizq seed fixtures/listings.json           # load listings
//! bizq parse "cheap cafe in mumbai"          # inspect the parsed intent
//! bizq search "franchise under 20 lakh"      # parse and execute
//! bizq serve api                             # start the HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types and the pagination envelope |
//! | [`sanitize`] | Input sanitization primitives |
//! | [`lexicon`] | Static keyword tables |
//! | [`intent`] | Natural-language intent extraction |
//! | [`query`] | Query validation (allowlists and bounds) |
//! | [`executor`] | Safe dynamic queries against the store |
//! | [`search`] | CLI parse/search commands |
//! | [`seed`] | Listing fixture loading |
//! | [`server`] | HTTP API server |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod config;
pub mod db;
pub mod executor;
pub mod intent;
pub mod lexicon;
pub mod migrate;
pub mod models;
pub mod query;
pub mod sanitize;
pub mod search;
pub mod seed;
pub mod server;
