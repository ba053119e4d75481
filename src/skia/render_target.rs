// plywood-gl/src/skia/render_target.rs
//
//! Wrapping the bound framebuffer as a Skia surface.

use crate::bridge::query_framebuffer_info;
use crate::gl_utils::with_current_gl;
use crate::platform::egl::display::EGLHandles;
use crate::Error;

use euclid::default::Size2D;
use glow::HasContext;
use skia_safe::gpu::{backend_render_targets, surfaces, DirectContext, SurfaceOrigin};
use skia_safe::{ColorType, Surface};

/// How the bound framebuffer is described to Skia.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderTargetAttributes {
    pub size: Size2D<i32>,
    pub sample_count: usize,
    pub stencil_bits: usize,
    /// Sized internal format of the color attachment.
    pub format: u32,
    pub origin: SurfaceOrigin,
    pub color_type: ColorType,
}

impl RenderTargetAttributes {
    /// A single-sampled RGBA8 target with an 8-bit stencil buffer, origin at the bottom left as GL
    /// framebuffers have it.
    pub fn new(size: Size2D<i32>) -> RenderTargetAttributes {
        RenderTargetAttributes {
            size,
            sample_count: 0,
            stencil_bits: 8,
            format: glow::RGBA8,
            origin: SurfaceOrigin::BottomLeft,
            color_type: ColorType::RGBA8888,
        }
    }

    /// Like `new`, but with sample count and stencil depth read from the driver for the bound
    /// framebuffer.
    pub fn for_current_framebuffer(size: Size2D<i32>) -> Result<RenderTargetAttributes, Error> {
        with_current_gl(|gl| unsafe {
            let sample_count = gl.get_parameter_i32(glow::SAMPLES).max(0) as usize;
            let stencil_bits = gl.get_parameter_i32(glow::STENCIL_BITS).max(0) as usize;
            RenderTargetAttributes {
                sample_count,
                stencil_bits,
                ..RenderTargetAttributes::new(size)
            }
        })
        .ok_or(Error::NoCurrentContext)
    }
}

/// Wraps the framebuffer bound on the current context as a Skia surface.
///
/// Skia draws straight into that framebuffer; the surface holds no pixels of its own. The binding
/// is read at call time, so rebinding afterwards doesn't move the surface.
pub fn wrap_current_framebuffer(
    context: &mut DirectContext,
    attributes: &RenderTargetAttributes,
) -> Result<Surface, Error> {
    let current = EGLHandles::current();
    if current.egl_context().is_none() {
        return Err(Error::NoCurrentContext);
    }

    let framebuffer = query_framebuffer_info(current.display);
    let backend_render_target = backend_render_targets::make_gl(
        (attributes.size.width, attributes.size.height),
        attributes.sample_count,
        attributes.stencil_bits,
        framebuffer.to_skia(attributes.format),
    );
    debug!(
        "wrapping framebuffer {} ({}x{}) as a Skia surface",
        framebuffer.buffer, attributes.size.width, attributes.size.height
    );

    surfaces::wrap_backend_render_target(
        context,
        &backend_render_target,
        attributes.origin,
        attributes.color_type,
        None,
        None,
    )
    .ok_or(Error::RenderTargetWrapFailed)
}
