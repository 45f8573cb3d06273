pub mod api;
pub mod cli;
pub mod db;
pub mod paths;
pub mod serde_utils;

#[cfg(test)]
mod serde_utils_test;
