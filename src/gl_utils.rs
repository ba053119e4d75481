// plywood-gl/src/gl_utils.rs
//
//! Access to the GL function table of the current context, and a few readbacks built on it.

use crate::bridge::resolve_proc_address;
use crate::egl::types::EGLContext;
use crate::platform::egl::display::EGLHandles;
use crate::Gl;

use euclid::default::Size2D;
use glow::{HasContext, PixelPackData};
use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    static GL_FUNCTIONS: RefCell<Option<(EGLContext, Rc<Gl>)>> = const { RefCell::new(None) };
}

/// Runs `f` with the GL function table of the context current on this thread.
///
/// Returns `None` without calling `f` if no GL context is current. The table is loaded through
/// EGL the first time a context is seen and reloaded whenever a different context is current,
/// since glow records the version and extensions of the context it was loaded in.
pub fn with_current_gl<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&Gl) -> R,
{
    let egl_context = EGLHandles::current().egl_context()?;
    let gl = GL_FUNCTIONS.with(|cell| {
        let mut cell = cell.borrow_mut();
        if let Some((loaded_for, gl)) = cell.as_ref() {
            if *loaded_for == egl_context {
                return gl.clone();
            }
        }
        debug!("loading GL function table for {:?}", egl_context);
        let gl = Rc::new(unsafe { Gl::from_loader_function(resolve_proc_address) });
        *cell = Some((egl_context, gl.clone()));
        gl
    });
    Some(f(&gl))
}

/// Forgets the GL function table loaded for `egl_context`, which is about to go away.
pub(crate) fn forget_gl_functions_for(egl_context: EGLContext) {
    GL_FUNCTIONS.with(|cell| {
        let mut cell = cell.borrow_mut();
        if cell.as_ref().is_some_and(|(loaded_for, _)| *loaded_for == egl_context) {
            *cell = None;
        }
    })
}

/// The clear values the driver currently holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClearState {
    pub color: [f32; 4],
    pub stencil: i32,
}

impl ClearState {
    /// What `initialize_gl_state` leaves behind.
    pub const INITIAL: ClearState = ClearState {
        color: [0.0; 4],
        stencil: 0,
    };

    pub fn query(gl: &Gl) -> ClearState {
        unsafe {
            let mut color = [0.0; 4];
            gl.get_parameter_f32_slice(glow::COLOR_CLEAR_VALUE, &mut color);
            let stencil = gl.get_parameter_i32(glow::STENCIL_CLEAR_VALUE);
            ClearState { color, stencil }
        }
    }
}

/// Reads back the RGBA8 contents of the bound read framebuffer, bottom row first.
pub fn read_pixels(gl: &Gl, size: &Size2D<i32>) -> Vec<u8> {
    let mut pixels = vec![0; size.width.max(0) as usize * size.height.max(0) as usize * 4];
    unsafe {
        gl.read_pixels(
            0,
            0,
            size.width,
            size.height,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            PixelPackData::Slice(Some(&mut pixels)),
        );
    }
    pixels
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn initial_clear_state_is_transparent_black() {
        assert_eq!(ClearState::INITIAL.color, [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(ClearState::INITIAL.stencil, 0);
    }
}
