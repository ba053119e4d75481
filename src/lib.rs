// plywood-gl/src/lib.rs
//
//! Glue between Skia and an EGL/OpenGL ES 2 context.
//!
//! The core of this crate is the `bridge` module: it resolves GL entry points through EGL, hands
//! them to Skia as a GL interface table, reports the framebuffer that is currently bound and
//! puts a freshly made-current context into a known cleared state. Around it sit the pieces a
//! compositor needs to actually draw with Skia on that context: a per-thread cached Skia GPU
//! context, wrapping of the bound framebuffer as a Skia surface, and import of existing GLES
//! textures as Skia images.
//!
//! All GL and EGL state is bound to the thread whose context is current. Nothing here may be
//! shared across threads.

#[cfg(not(egl_platform))]
compile_error!("plywood-gl only supports EGL platforms");

#[macro_use]
extern crate log;

pub mod bridge;
pub use crate::bridge::{build_gl_interface, initialize_gl_state, query_framebuffer_info};
pub use crate::bridge::{resolve_proc_address, try_build_gl_interface, GLFramebufferInfo};

pub mod error;
pub use crate::error::{Error, WindowingApiError};

mod context;
pub use crate::context::{ContextAttributeFlags, ContextAttributes};

mod info;
pub use crate::info::GLVersion;

pub mod gl_utils;
pub use crate::gl_utils::{with_current_gl, ClearState};

pub mod platform;
pub use crate::platform::egl::context::{CurrentContextGuard, HeadlessContext};
pub use crate::platform::egl::display::EGLHandles;

pub mod skia;
pub use crate::skia::gpu_context::{gr_context, reset_gr_context};
pub use crate::skia::render_target::{wrap_current_framebuffer, RenderTargetAttributes};
pub use crate::skia::texture::GLESTexture;

/// The GL function table used by this crate.
pub type Gl = glow::Context;

#[allow(non_camel_case_types, dead_code, clippy::all)]
mod egl {
    use std::os::raw::{c_long, c_void};
    pub type khronos_utime_nanoseconds_t = khronos_uint64_t;
    pub type khronos_uint64_t = u64;
    pub type khronos_ssize_t = c_long;
    pub type EGLint = i32;
    pub type EGLNativeDisplayType = *const c_void;
    pub type EGLNativePixmapType = *const c_void;
    pub type EGLNativeWindowType = *const c_void;
    pub type NativeDisplayType = EGLNativeDisplayType;
    pub type NativePixmapType = EGLNativePixmapType;
    pub type NativeWindowType = EGLNativeWindowType;
    include!(concat!(env!("OUT_DIR"), "/egl_bindings.rs"));
}

#[cfg(all(test, feature = "sm-test"))]
mod tests;
