//! Platform bindings
//!
//! Handles browser/native differences for:
//! - Input events
//! - Presentation (HUD, overlays, sounds, drawing)
//! - Frame timing

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;
