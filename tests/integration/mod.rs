//! Integration tests for the unitree lazy tree core

mod config_integration;
mod mutation_invalidation;
mod store_coalescing;
mod test_utils;
mod tree_walk;
