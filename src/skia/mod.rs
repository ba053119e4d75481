// plywood-gl/src/skia/mod.rs
//
//! Drawing with Skia on the current GL context.

pub mod gpu_context;
pub mod render_target;
pub mod texture;
