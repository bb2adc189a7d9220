//! View-side state and render models.
//!
//! # Responsibility
//! - Hold local UI state and the explicit list cache in one container.
//! - Keep rendering independent from any UI toolkit.

pub mod controller;
pub mod render;
