// plywood-gl/src/skia/gpu_context.rs
//
//! The per-thread Skia GPU context.

use crate::bridge;
use crate::egl::types::EGLContext;
use crate::platform::egl::display::{self, EGLHandles};
use crate::Error;

use skia_safe::gpu::{direct_contexts, DirectContext};
use std::cell::RefCell;

thread_local! {
    static GR_CONTEXT: RefCell<Option<CachedGrContext>> = const { RefCell::new(None) };
}

/// A Skia GPU context and the EGL context its GPU objects live in.
struct CachedGrContext {
    egl_context: EGLContext,
    gr_context: DirectContext,
}

impl Drop for CachedGrContext {
    fn drop(&mut self) {
        // Freeing GPU objects is only valid in the context that owns them.
        if display::try_current_context() != Some(self.egl_context) {
            self.gr_context.abandon();
        }
    }
}

/// Returns this thread's Skia GPU context for the GL context that is current, creating it on
/// first use.
///
/// The context is shared by every later caller on the thread while the same GL context stays
/// current. If a different GL context has been made current since, the old Skia context is
/// abandoned and a new one is built. With no GL context current this fails with
/// `Error::NoCurrentContext` and the cache is left alone. If creation fails nothing is cached, so
/// a later call tries again.
pub fn gr_context() -> Result<DirectContext, Error> {
    let egl_context = EGLHandles::current()
        .egl_context()
        .ok_or(Error::NoCurrentContext)?;

    let stale = GR_CONTEXT.with(|cached| {
        let mut cached = cached.borrow_mut();
        match cached.as_ref() {
            Some(entry) if entry.egl_context == egl_context => Ok(entry.gr_context.clone()),
            _ => Err(cached.take()),
        }
    });
    match stale {
        Ok(gr_context) => return Ok(gr_context),
        Err(Some(stale)) => {
            debug!("GL context changed from {:?}; dropping Skia GPU context", stale.egl_context);
            drop(stale);
        }
        Err(None) => {}
    }

    let interface = bridge::try_build_gl_interface()?;
    let gr_context =
        direct_contexts::make_gl(interface, None).ok_or(Error::GpuContextCreationFailed)?;
    debug!("created Skia GPU context for {:?}", egl_context);

    GR_CONTEXT.with(|cached| {
        *cached.borrow_mut() = Some(CachedGrContext {
            egl_context,
            gr_context: gr_context.clone(),
        })
    });
    Ok(gr_context)
}

/// Drops this thread's cached Skia GPU context.
///
/// When `context_lost` is set the GL context it was built on is gone, and Skia is told to forget
/// its GPU objects instead of freeing them. The same happens if that GL context isn't current.
pub fn reset_gr_context(context_lost: bool) {
    let cached = GR_CONTEXT.with(|cached| cached.borrow_mut().take());
    if let Some(mut cached) = cached {
        if context_lost {
            cached.gr_context.abandon();
        }
        debug!("dropped Skia GPU context (lost: {})", context_lost);
    }
}

/// Drops the cached Skia GPU context if it was built on `egl_context`, which is about to go away.
pub(crate) fn release_gr_context_for(egl_context: EGLContext) {
    let cached = GR_CONTEXT.with(|cached| {
        let mut cached = cached.borrow_mut();
        match cached.as_ref() {
            Some(entry) if entry.egl_context == egl_context => cached.take(),
            _ => None,
        }
    });
    if cached.is_some() {
        debug!("released Skia GPU context of {:?}", egl_context);
    }
}

/// True if this thread has a cached Skia GPU context.
pub fn has_gr_context() -> bool {
    GR_CONTEXT.with(|cached| cached.borrow().is_some())
}
