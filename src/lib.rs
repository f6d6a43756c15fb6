//! orgtree: editable organization charts
//!
//! Layers, innermost first:
//! - `domain`: the immutable org tree, department zoning and the mutation engine
//! - `application`: region store, shared snapshots, URL snapshot codec
//! - `infrastructure`: filesystem boundary and service wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
