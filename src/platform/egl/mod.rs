// plywood-gl/src/platform/egl/mod.rs
//
//! EGL loading, error translation, and context handling.

pub mod context;
pub(crate) mod device;
pub mod display;
pub(crate) mod error;

pub use self::device::egl_library_available;
