//! Platform abstraction layer
//!
//! The browser build exposes a `WebGame` handle to the JS render layer;
//! native builds drive `GameSession` directly (see `main.rs`).

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebGame;
