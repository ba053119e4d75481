// plywood-gl/src/bridge.rs
//
//! The bridge between Skia's GL backend and the EGL/GLES context current on this thread.
//!
//! Every operation here forwards to EGL, GLES or Skia and reports what they report. None of them
//! validates its inputs or raises errors of its own; a null pointer, a `None` interface or a
//! driver-defined framebuffer value is the caller's to check.

use crate::egl::types::EGLDisplay;
use crate::gl_utils::with_current_gl;
use crate::platform::egl::device::lookup_egl_extension;
use crate::platform::egl::display::EGLHandles;
use crate::Error;

use glow::HasContext;
use skia_safe::gpu::gl::{FramebufferInfo, Interface};
use std::ffi::CString;
use std::os::raw::c_void;
use std::ptr;

/// The framebuffer object that was bound for drawing when it was queried.
///
/// Zero names the default framebuffer of whatever surface is current.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GLFramebufferInfo {
    pub buffer: u32,
}

impl GLFramebufferInfo {
    /// Describes this framebuffer to Skia. `format` is the sized internal format of its color
    /// attachment, e.g. `GL_RGBA8`.
    pub fn to_skia(&self, format: u32) -> FramebufferInfo {
        let mut info = FramebufferInfo::from_fboid(self.buffer);
        info.format = format;
        info
    }
}

/// Returns the address of a GL or EGL entry point, as `eglGetProcAddress` reports it.
///
/// Null if the platform can't resolve the name, if EGL couldn't be loaded, or if the name contains
/// a NUL byte.
pub fn resolve_proc_address(name: &str) -> *const c_void {
    match CString::new(name) {
        Ok(name) => lookup_egl_extension(&name),
        Err(_) => ptr::null(),
    }
}

/// Asks Skia to assemble a GL interface table, resolving every entry point through
/// `resolve_proc_address`.
///
/// `None` if Skia's assembly fails, typically because a required entry point is missing or no
/// context is current.
pub fn build_gl_interface() -> Option<Interface> {
    Interface::new_load_with(resolve_proc_address)
}

/// `build_gl_interface`, with failure as an error.
pub fn try_build_gl_interface() -> Result<Interface, Error> {
    build_gl_interface().ok_or(Error::InterfaceAssemblyFailed)
}

/// Reports the framebuffer currently bound for drawing in the GL context current on this thread.
///
/// `display` does not select the context: the query always goes to whatever is current. A display
/// that isn't the current one is logged and otherwise ignored. With no context current the driver
/// has nothing to report and the default framebuffer (0) is returned.
pub fn query_framebuffer_info(display: EGLDisplay) -> GLFramebufferInfo {
    let current = EGLHandles::current();
    if current.display != display {
        warn!(
            "querying framebuffer of current display {:?}, not {:?}",
            current.display, display
        );
    }

    with_current_gl(|gl| unsafe {
        let buffer = gl.get_parameter_i32(glow::FRAMEBUFFER_BINDING);
        GLFramebufferInfo {
            buffer: buffer as u32,
        }
    })
    .unwrap_or_else(|| {
        warn!("no GL context is current; reporting the default framebuffer");
        GLFramebufferInfo::default()
    })
}

/// Puts the bound framebuffer into a known state before Skia first draws to it: clear stencil 0,
/// transparent black clear color, all stencil planes writable, and color and stencil cleared.
///
/// Calling it again just clears again.
pub fn initialize_gl_state() {
    let initialized = with_current_gl(|gl| unsafe {
        gl.clear_stencil(0);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.stencil_mask(0xffffffff);
        gl.clear(glow::STENCIL_BUFFER_BIT | glow::COLOR_BUFFER_BIT);
    });
    if initialized.is_none() {
        warn!("no GL context is current; GL state left untouched");
    }
}
