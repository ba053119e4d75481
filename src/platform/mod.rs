// plywood-gl/src/platform/mod.rs
//
//! Platform backends. Only EGL is supported.

pub mod egl;
