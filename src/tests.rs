// plywood-gl/src/tests.rs
//
//! Tests that need a working EGL driver. Enable with the `sm-test` feature.

use crate::gl_utils::{self, with_current_gl, ClearState};
use crate::platform::egl::device::EGL_FUNCTIONS;
use crate::skia::gpu_context::has_gr_context;
use crate::{bridge, ContextAttributes, EGLHandles, GLESTexture, HeadlessContext};
use crate::{gr_context, reset_gr_context, wrap_current_framebuffer, RenderTargetAttributes};
use crate::{Error, GLVersion, Gl};

use euclid::default::Size2D;
use glow::{HasContext, PixelUnpackData};
use serial_test::serial;
use skia_safe::{Color, Paint, Rect};
use std::os::raw::c_void;

fn with_headless_context<F>(size: Size2D<i32>, f: F)
where
    F: FnOnce(&HeadlessContext),
{
    let mut context = HeadlessContext::with_size(&ContextAttributes::default(), &size).unwrap();
    context.make_current().unwrap();
    f(&context);
    context.destroy().unwrap();
}

fn small() -> Size2D<i32> {
    Size2D::new(16, 16)
}

#[test]
#[serial]
fn test_headless_context_becomes_current() {
    let mut context = HeadlessContext::new(&ContextAttributes::default()).unwrap();
    assert!(!context.handles().is_current());
    context.make_current().unwrap();
    assert!(context.handles().is_current());
    assert!(crate::platform::egl::display::has_current_context());
    assert_eq!(EGLHandles::current(), context.handles());
    context.destroy().unwrap();
    assert_eq!(EGLHandles::current().egl_context(), None);
}

#[test]
#[serial]
fn test_current_context_guard_restores_previous_context() {
    let mut first = HeadlessContext::new(&ContextAttributes::default()).unwrap();
    let mut second = HeadlessContext::new(&ContextAttributes::default()).unwrap();
    first.make_current().unwrap();
    {
        let _guard = crate::CurrentContextGuard::new();
        second.make_current().unwrap();
        assert!(second.handles().is_current());
    }
    assert!(first.handles().is_current());
    second.destroy().unwrap();
    first.destroy().unwrap();
}

#[test]
#[serial]
fn test_resolve_proc_address_matches_egl() {
    with_headless_context(small(), |_| {
        for name in [c"glClear", c"glGetIntegerv", c"glStencilMask", c"eglGetCurrentContext"] {
            let direct = EGL_FUNCTIONS
                .with(|egl| unsafe { egl.GetProcAddress(name.as_ptr()) as *const c_void });
            let resolved = bridge::resolve_proc_address(name.to_str().unwrap());
            assert!(!resolved.is_null(), "{:?} did not resolve", name);
            assert_eq!(resolved, direct);
        }
        assert!(bridge::resolve_proc_address("eglNotARealEntryPointPLYWOOD").is_null());
    })
}

#[test]
#[serial]
fn test_build_gl_interface() {
    with_headless_context(small(), |_| {
        let interface = bridge::build_gl_interface().expect("no interface");
        assert!(interface.validate());
        assert!(bridge::try_build_gl_interface().is_ok());
    })
}

#[test]
#[serial]
fn test_initialize_gl_state_clears_to_transparent_black() {
    let size = small();
    with_headless_context(size, |_| {
        with_current_gl(|gl| unsafe {
            gl.clear_color(1.0, 0.0, 0.0, 1.0);
            gl.clear_stencil(5);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::STENCIL_BUFFER_BIT);
        })
        .unwrap();

        bridge::initialize_gl_state();

        with_current_gl(|gl| unsafe {
            assert_eq!(ClearState::query(gl), ClearState::INITIAL);
            let stencil_write_mask = gl.get_parameter_i32(glow::STENCIL_WRITEMASK) as u32;
            assert_eq!(stencil_write_mask & 0xff, 0xff);
            let pixels = gl_utils::read_pixels(gl, &size);
            assert!(pixels.iter().all(|&channel| channel == 0));
            assert_eq!(gl.get_error(), glow::NO_ERROR);
        })
        .unwrap();
    })
}

#[test]
#[serial]
fn test_initialize_gl_state_twice() {
    let size = small();
    with_headless_context(size, |_| {
        bridge::initialize_gl_state();
        bridge::initialize_gl_state();
        with_current_gl(|gl| unsafe {
            assert_eq!(gl.get_error(), glow::NO_ERROR);
            assert_eq!(ClearState::query(gl), ClearState::INITIAL);
            assert!(gl_utils::read_pixels(gl, &size).iter().all(|&channel| channel == 0));
        })
        .unwrap();
    })
}

#[test]
#[serial]
fn test_query_framebuffer_info_matches_driver() {
    with_headless_context(small(), |context| {
        let display = context.handles().display;
        assert_eq!(bridge::query_framebuffer_info(display).buffer, 0);

        with_current_gl(|gl| unsafe {
            let framebuffer = gl.create_framebuffer().unwrap();
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));

            let direct = gl.get_parameter_i32(glow::FRAMEBUFFER_BINDING) as u32;
            let info = bridge::query_framebuffer_info(display);
            assert_eq!(info.buffer, direct);
            assert_eq!(info.buffer, framebuffer.0.get());

            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.delete_framebuffer(framebuffer);
        })
        .unwrap();
    })
}

#[test]
#[serial]
fn test_query_framebuffer_info_without_context() {
    assert_eq!(EGLHandles::current().egl_context(), None);
    let info = bridge::query_framebuffer_info(EGLHandles::none().display);
    assert_eq!(info.buffer, 0);
    // Nothing to clear, nothing to fail.
    bridge::initialize_gl_state();
}

#[test]
#[serial]
fn test_gr_context_is_cached() {
    with_headless_context(small(), |_| {
        assert!(!has_gr_context());
        let _first = gr_context().unwrap();
        assert!(has_gr_context());
        let _second = gr_context().unwrap();
        assert!(has_gr_context());
    });
    assert!(!has_gr_context());
}

#[test]
#[serial]
fn test_gr_context_needs_a_current_context() {
    assert!(matches!(gr_context(), Err(crate::Error::NoCurrentContext)));
    assert!(!has_gr_context());
}

#[test]
#[serial]
fn test_skia_draws_into_current_framebuffer() {
    let size = Size2D::new(32, 32);
    with_headless_context(size, |_| {
        bridge::initialize_gl_state();
        let mut gr_context = gr_context().unwrap();
        let attributes = RenderTargetAttributes::for_current_framebuffer(size).unwrap();
        let mut surface = wrap_current_framebuffer(&mut gr_context, &attributes).unwrap();
        surface.canvas().clear(Color::RED);
        gr_context.flush_and_submit();

        with_current_gl(|gl| {
            let pixels = gl_utils::read_pixels(gl, &size);
            for pixel in pixels.chunks(4) {
                assert_eq!(pixel, &[255, 0, 0, 255]);
            }
        })
        .unwrap();
    })
}

#[test]
#[serial]
fn test_texture_import() {
    let size = Size2D::new(8, 4);
    with_headless_context(small(), |_| {
        let texture = with_current_gl(|gl| unsafe {
            let texture = gl.create_texture().unwrap();
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            let pixels = [0u8, 255, 0, 255].repeat((size.width * size.height) as usize);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                size.width,
                size.height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(&pixels)),
            );
            gl.bind_texture(glow::TEXTURE_2D, None);
            texture
        })
        .unwrap();

        let mut gr_context = gr_context().unwrap();
        let image = GLESTexture::new(glow::TEXTURE_2D, texture.0.get(), size)
            .to_image(&mut gr_context)
            .unwrap();
        assert_eq!((image.width(), image.height()), (size.width, size.height));
        assert!(image.is_texture_backed());

        let empty = GLESTexture::new(glow::TEXTURE_2D, texture.0.get(), Size2D::new(0, 0));
        assert!(empty.to_image(&mut gr_context).is_err());

        drop(image);
        gr_context.flush_and_submit();
        with_current_gl(|gl| unsafe { gl.delete_texture(texture) }).unwrap();
    })
}

fn draw_and_read_back(size: Size2D<i32>, color: Color) -> Vec<u8> {
    bridge::initialize_gl_state();
    let mut gr_context = gr_context().unwrap();
    let attributes = RenderTargetAttributes::for_current_framebuffer(size).unwrap();
    let mut surface = wrap_current_framebuffer(&mut gr_context, &attributes).unwrap();
    let mut paint = Paint::default();
    paint.set_color(color);
    let bounds = Rect::from_wh(size.width as f32, size.height as f32);
    surface.canvas().draw_rect(bounds, &paint);
    gr_context.flush_and_submit();
    drop(surface);
    with_current_gl(|gl| gl_utils::read_pixels(gl, &size)).unwrap()
}

#[test]
#[serial]
fn test_gr_context_follows_the_current_context() {
    let size = Size2D::new(24, 24);
    let attributes = ContextAttributes::default();

    let mut first = HeadlessContext::with_size(&attributes, &size).unwrap();
    first.make_current().unwrap();
    let pixels = draw_and_read_back(size, Color::RED);
    assert!(pixels.chunks(4).all(|pixel| pixel == [255, 0, 0, 255]));
    assert!(has_gr_context());

    first.destroy().unwrap();
    assert!(!has_gr_context());
    assert!(matches!(gr_context(), Err(Error::NoCurrentContext)));

    let mut second = HeadlessContext::with_size(&attributes, &size).unwrap();
    second.make_current().unwrap();
    let pixels = draw_and_read_back(size, Color::BLUE);
    assert!(pixels.chunks(4).all(|pixel| pixel == [0, 0, 255, 255]));
    second.destroy().unwrap();
    assert!(!has_gr_context());
}

#[test]
#[serial]
fn test_gr_context_is_rebuilt_when_another_context_is_current() {
    let size = small();
    let attributes = ContextAttributes::default();
    let mut first = HeadlessContext::with_size(&attributes, &size).unwrap();
    let mut second = HeadlessContext::with_size(&attributes, &size).unwrap();

    first.make_current().unwrap();
    let built_on_first = gr_context().unwrap();
    drop(built_on_first);

    first.make_no_context_current().unwrap();
    assert!(matches!(gr_context(), Err(Error::NoCurrentContext)));
    assert!(has_gr_context());

    second.make_current().unwrap();
    let pixels = draw_and_read_back(size, Color::GREEN);
    assert!(pixels.chunks(4).all(|pixel| pixel == [0, 255, 0, 255]));

    // The cache now belongs to `second`, so destroying `first` leaves it alone.
    first.destroy().unwrap();
    assert!(has_gr_context());
    reset_gr_context(false);
    assert!(!has_gr_context());
    second.destroy().unwrap();
}

#[test]
#[serial]
fn test_gl_functions_describe_the_current_context() {
    let gles2 = ContextAttributes::default();
    let gles3 = ContextAttributes {
        version: GLVersion::new(3, 0),
        ..ContextAttributes::default()
    };
    let mut contexts = vec![];
    for attributes in [gles2, gles3, gles2] {
        let mut context = match HeadlessContext::new(&attributes) {
            Ok(context) => context,
            Err(err) => {
                warn!("skipping GLES {:?} context: {}", attributes.version, err);
                continue;
            }
        };
        context.make_current().unwrap();
        let fresh = unsafe { Gl::from_loader_function(bridge::resolve_proc_address) };
        let expected = fresh.version().clone();
        with_current_gl(|gl| {
            let version = gl.version();
            assert_eq!(
                (version.major, version.minor, version.is_embedded),
                (expected.major, expected.minor, expected.is_embedded)
            );
        })
        .unwrap();
        context.make_no_context_current().unwrap();
        contexts.push(context);
    }
    for mut context in contexts {
        context.destroy().unwrap();
    }
}
