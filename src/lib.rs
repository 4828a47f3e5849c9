//! # Mixmax
//!
//! A command-line tool and library for finding Schedule I mixing recipes.
//!
//! Given the effects you want on a product, mixmax searches ingredient
//! sequences up to a step bound and ranks the ones that produce those
//! effects by:
//!
//! - Lowest total ingredient cost, or
//! - Highest profit (sell price minus ingredient cost)
//!
//! The rules of how each ingredient changes a mix are plain data, pinned to
//! game version 0.3.4f4 and replaceable as a whole.
//!
//! ## Modules
//!
//! - [`models`] - Rule data, effect sets, search requests and results
//! - [`data`] - CSV/JSON rule data loading
//! - [`mixer`] - Effect transformation for a single ingredient
//! - [`optimizer`] - Reverse recipe search and ranking
//! - [`display`] - Output formatting and display utilities
//! - [`error`] - Error type shared by the library
//!
//! ## Example Usage
//!
//! ```
//! use mixmax::{
//!     data::embedded_ruleset,
//!     models::{Objective, SearchRequest},
//!     optimizer::search,
//! };
//!
//! let ruleset = embedded_ruleset().unwrap();
//!
//! // Cheapest way to get an Energizing, Gingeritis mix in at most 3 steps
//! let request = SearchRequest::new(["Energizing", "Gingeritis"], Objective::Cost, 3);
//! let ranking = search(&ruleset, &request).unwrap();
//!
//! for result in ranking.top(3) {
//!     println!("{:?} costs {}", result.sequence, result.total_cost);
//! }
//! ```
//!
//! ## Objectives
//!
//! 1. **Cost** (default): cheapest recipe first.
//!
//! 2. **Profit**: most profitable recipe first. Without a chosen base
//!    product, each recipe is priced on the product it sells best on.

pub mod data;
pub mod display;
pub mod error;
pub mod mixer;
pub mod models;
pub mod optimizer;
pub mod wasm;
