//! Librarian library exports for testing

pub mod console;
pub mod core;
pub mod library;

#[cfg(test)]
pub mod test_support;
