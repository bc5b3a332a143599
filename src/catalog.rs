//! Catalog types shared by every track list in the client.
//!
//! Tracks are fetched from the service and never mutated afterwards; the
//! browse, search and favorites lists each own their own copies.

mod display;
mod model;

pub use display::display_from_fields;
pub use model::*;

#[cfg(test)]
mod tests;
