//! Crex library exports for testing

pub mod core;
pub mod fetch;
pub mod runtime;
pub mod templates;
pub mod tui;

#[cfg(test)]
pub mod test_support;
