//! Glint - image preview with procedural effects
//!
//! Ingests raster images, renders the selected one with a layered procedural
//! effect, and exports either the composite or the original bytes.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;

#[cfg(test)]
mod test_helpers;
