// plywood-gl/src/platform/egl/display.rs
//
//! What EGL considers current on the calling thread.

use super::device::{egl_library_available, EGL_FUNCTIONS};
use crate::egl;
use crate::egl::types::{EGLContext, EGLDisplay, EGLSurface, EGLint};

/// A snapshot of the EGL display, context and surfaces current on this thread.
///
/// These are borrowed handles: nothing is destroyed when a snapshot is dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EGLHandles {
    pub display: EGLDisplay,
    pub context: EGLContext,
    pub draw_surface: EGLSurface,
    pub read_surface: EGLSurface,
}

impl EGLHandles {
    /// Handles that name nothing.
    pub fn none() -> EGLHandles {
        EGLHandles {
            display: egl::NO_DISPLAY,
            context: egl::NO_CONTEXT,
            draw_surface: egl::NO_SURFACE,
            read_surface: egl::NO_SURFACE,
        }
    }

    /// Returns whatever is current on the calling thread. If EGL isn't loaded, nothing is.
    pub fn current() -> EGLHandles {
        if !egl_library_available() {
            return EGLHandles::none();
        }
        EGL_FUNCTIONS.with(|egl| unsafe {
            EGLHandles {
                display: egl.GetCurrentDisplay(),
                context: egl.GetCurrentContext(),
                draw_surface: egl.GetCurrentSurface(egl::DRAW as EGLint),
                read_surface: egl.GetCurrentSurface(egl::READ as EGLint),
            }
        })
    }

    /// The display, if any.
    #[inline]
    pub fn egl_display(&self) -> Option<EGLDisplay> {
        if self.display == egl::NO_DISPLAY {
            None
        } else {
            Some(self.display)
        }
    }

    /// The context, if any.
    #[inline]
    pub fn egl_context(&self) -> Option<EGLContext> {
        if self.context == egl::NO_CONTEXT {
            None
        } else {
            Some(self.context)
        }
    }

    /// True if these handles are the ones current on the calling thread.
    pub fn is_current(&self) -> bool {
        self.egl_context().is_some() && *self == EGLHandles::current()
    }
}

/// True if some GL context is current on the calling thread.
pub fn has_current_context() -> bool {
    EGLHandles::current().egl_context().is_some()
}

/// The context current on this thread. `None` if nothing is current, or if this thread's EGL
/// function table has already been torn down at thread exit.
pub(crate) fn try_current_context() -> Option<EGLContext> {
    if !egl_library_available() {
        return None;
    }
    EGL_FUNCTIONS
        .try_with(|egl| unsafe { egl.GetCurrentContext() })
        .ok()
        .filter(|&context| context != egl::NO_CONTEXT)
}
