//! Server-side page loader and renderer.
//!
//! Pages fetch their content from the Content API over HTTP, like any other
//! client would, and render it into fixed mount points.

pub mod client;
pub mod components;
pub mod html;
pub mod loader;
pub mod pages;
pub mod preferences;
pub mod sections;
