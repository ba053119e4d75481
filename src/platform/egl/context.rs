// plywood-gl/src/platform/egl/context.rs
//
//! Headless EGL contexts and current-context bookkeeping.

use super::device::{egl_library_available, EGL_FUNCTIONS};
use super::display::EGLHandles;
use super::error::ToWindowingApiError;
use crate::egl::types::{EGLConfig, EGLContext, EGLDisplay, EGLSurface, EGLint};
use crate::egl::{self, EGLNativeDisplayType};
use crate::gl_utils;
use crate::skia::gpu_context;
use crate::{ContextAttributeFlags, ContextAttributes, Error};

use euclid::default::Size2D;
use std::ptr;
use std::thread;

const DUMMY_PBUFFER_SIZE: i32 = 16;
const RGB_CHANNEL_BIT_DEPTH: EGLint = 8;

/// Restores the previously current EGL context when dropped.
#[must_use]
pub struct CurrentContextGuard {
    old: EGLHandles,
}

impl CurrentContextGuard {
    pub fn new() -> CurrentContextGuard {
        CurrentContextGuard {
            old: EGLHandles::current(),
        }
    }
}

impl Default for CurrentContextGuard {
    fn default() -> CurrentContextGuard {
        CurrentContextGuard::new()
    }
}

impl Drop for CurrentContextGuard {
    fn drop(&mut self) {
        if self.old.display == egl::NO_DISPLAY {
            return;
        }
        EGL_FUNCTIONS.with(|egl| unsafe {
            egl.MakeCurrent(
                self.old.display,
                self.old.draw_surface,
                self.old.read_surface,
                self.old.context,
            );
        })
    }
}

/// An OpenGL ES context rendering into a small pbuffer on the default EGL display.
///
/// This is what tests and off-screen tools use in place of a compositor's output. The pbuffer's
/// default framebuffer (object 0) is what `query_framebuffer_info` reports until another
/// framebuffer is bound.
///
/// A headless context must be explicitly destroyed with `destroy()`, or a panic will occur.
pub struct HeadlessContext {
    egl_display: EGLDisplay,
    egl_context: EGLContext,
    egl_surface: EGLSurface,
    size: Size2D<i32>,
}

impl Drop for HeadlessContext {
    fn drop(&mut self) {
        if self.egl_context != egl::NO_CONTEXT && !thread::panicking() {
            panic!("Should have destroyed the headless context with `destroy()`!")
        }
    }
}

impl HeadlessContext {
    /// Creates a context with a pbuffer of the default (16×16) size.
    pub fn new(attributes: &ContextAttributes) -> Result<HeadlessContext, Error> {
        let size = Size2D::new(DUMMY_PBUFFER_SIZE, DUMMY_PBUFFER_SIZE);
        HeadlessContext::with_size(attributes, &size)
    }

    /// Creates a context rendering into a pbuffer of the given size. The context is not made
    /// current.
    pub fn with_size(
        attributes: &ContextAttributes,
        size: &Size2D<i32>,
    ) -> Result<HeadlessContext, Error> {
        if !egl_library_available() {
            return Err(Error::NoEGLLibraryFound);
        }

        unsafe {
            let egl_display = open_default_display()?;
            let egl_config = choose_config(egl_display, attributes)?;

            EGL_FUNCTIONS.with(|egl| {
                let pbuffer_attributes = [
                    egl::WIDTH as EGLint,
                    size.width,
                    egl::HEIGHT as EGLint,
                    size.height,
                    egl::NONE as EGLint,
                    0,
                    0,
                    0,
                ];
                let egl_surface = egl.CreatePbufferSurface(
                    egl_display,
                    egl_config,
                    pbuffer_attributes.as_ptr(),
                );
                if egl_surface == egl::NO_SURFACE {
                    let err = egl.GetError().to_windowing_api_error();
                    return Err(Error::SurfaceCreationFailed(err));
                }

                // Include some extra zeroes to work around broken implementations.
                let egl_context_attributes = [
                    egl::CONTEXT_CLIENT_VERSION as EGLint,
                    attributes.version.major as EGLint,
                    egl::NONE as EGLint,
                    0,
                    0,
                    0,
                ];
                let egl_context = egl.CreateContext(
                    egl_display,
                    egl_config,
                    egl::NO_CONTEXT,
                    egl_context_attributes.as_ptr(),
                );
                if egl_context == egl::NO_CONTEXT {
                    let err = egl.GetError().to_windowing_api_error();
                    egl.DestroySurface(egl_display, egl_surface);
                    return Err(Error::ContextCreationFailed(err));
                }

                debug!(
                    "created headless GLES {}.x context {:?} ({}x{})",
                    attributes.version.major, egl_context, size.width, size.height
                );
                Ok(HeadlessContext {
                    egl_display,
                    egl_context,
                    egl_surface,
                    size: *size,
                })
            })
        }
    }

    /// Makes this context current on the calling thread, with its pbuffer as both draw and read
    /// surface.
    pub fn make_current(&self) -> Result<(), Error> {
        EGL_FUNCTIONS.with(|egl| unsafe {
            let result = egl.MakeCurrent(
                self.egl_display,
                self.egl_surface,
                self.egl_surface,
                self.egl_context,
            );
            if result == egl::FALSE {
                let err = egl.GetError().to_windowing_api_error();
                return Err(Error::MakeCurrentFailed(err));
            }
            Ok(())
        })
    }

    /// Releases whatever context is current on this thread for this context's display.
    pub fn make_no_context_current(&self) -> Result<(), Error> {
        unsafe { make_no_context_current(self.egl_display) }
    }

    /// The EGL handles naming this context and its pbuffer.
    pub fn handles(&self) -> EGLHandles {
        EGLHandles {
            display: self.egl_display,
            context: self.egl_context,
            draw_surface: self.egl_surface,
            read_surface: self.egl_surface,
        }
    }

    #[inline]
    pub fn size(&self) -> Size2D<i32> {
        self.size
    }

    /// Destroys the context and its pbuffer. If the context is current, nothing is current
    /// afterwards. The display stays initialized, since other contexts may share it.
    ///
    /// A Skia GPU context cached for this context is released first, while its GPU objects can
    /// still be freed.
    pub fn destroy(&mut self) -> Result<(), Error> {
        if self.egl_context == egl::NO_CONTEXT {
            return Ok(());
        }

        gpu_context::release_gr_context_for(self.egl_context);
        gl_utils::forget_gl_functions_for(self.egl_context);

        if self.handles().is_current() {
            self.make_no_context_current()?;
        }

        EGL_FUNCTIONS.with(|egl| unsafe {
            let mut first_error = None;
            if egl.DestroySurface(self.egl_display, self.egl_surface) == egl::FALSE {
                first_error = Some(egl.GetError().to_windowing_api_error());
            }
            self.egl_surface = egl::NO_SURFACE;

            if egl.DestroyContext(self.egl_display, self.egl_context) == egl::FALSE {
                let err = egl.GetError().to_windowing_api_error();
                first_error = first_error.or(Some(err));
            }
            self.egl_context = egl::NO_CONTEXT;

            match first_error {
                Some(err) => Err(Error::DestructionFailed(err)),
                None => Ok(()),
            }
        })
    }
}

unsafe fn open_default_display() -> Result<EGLDisplay, Error> {
    EGL_FUNCTIONS.with(|egl| {
        let egl_display = egl.GetDisplay(egl::DEFAULT_DISPLAY as EGLNativeDisplayType);
        if egl_display == egl::NO_DISPLAY {
            let err = egl.GetError().to_windowing_api_error();
            return Err(Error::DisplayInitializationFailed(err));
        }

        let (mut major_version, mut minor_version) = (0, 0);
        let result = egl.Initialize(egl_display, &mut major_version, &mut minor_version);
        if result == egl::FALSE {
            let err = egl.GetError().to_windowing_api_error();
            return Err(Error::DisplayInitializationFailed(err));
        }
        debug!("initialized EGL {}.{}", major_version, minor_version);

        if egl.BindAPI(egl::OPENGL_ES_API) == egl::FALSE {
            let err = egl.GetError().to_windowing_api_error();
            return Err(Error::DisplayInitializationFailed(err));
        }
        Ok(egl_display)
    })
}

unsafe fn choose_config(
    egl_display: EGLDisplay,
    attributes: &ContextAttributes,
) -> Result<EGLConfig, Error> {
    let flags = attributes.flags;
    let channel_size = |flag, size| if flags.contains(flag) { size } else { 0 };
    let alpha_size = channel_size(ContextAttributeFlags::ALPHA, 8);
    let depth_size = channel_size(ContextAttributeFlags::DEPTH, 24);
    let stencil_size = channel_size(ContextAttributeFlags::STENCIL, 8);
    let renderable_type = if attributes.version.major >= 3 {
        egl::OPENGL_ES3_BIT
    } else {
        egl::OPENGL_ES2_BIT
    };

    // Create required config attributes.
    let required_config_attributes = [
        egl::RED_SIZE as EGLint,
        RGB_CHANNEL_BIT_DEPTH,
        egl::GREEN_SIZE as EGLint,
        RGB_CHANNEL_BIT_DEPTH,
        egl::BLUE_SIZE as EGLint,
        RGB_CHANNEL_BIT_DEPTH,
        egl::ALPHA_SIZE as EGLint,
        alpha_size,
    ];

    // Create config attributes.
    let mut requested_config_attributes = required_config_attributes.to_vec();
    requested_config_attributes.extend_from_slice(&[
        egl::DEPTH_SIZE as EGLint,
        depth_size,
        egl::STENCIL_SIZE as EGLint,
        stencil_size,
        egl::SURFACE_TYPE as EGLint,
        egl::PBUFFER_BIT as EGLint,
        egl::RENDERABLE_TYPE as EGLint,
        renderable_type as EGLint,
    ]);
    requested_config_attributes.extend_from_slice(&[egl::NONE as EGLint, 0, 0, 0]);

    EGL_FUNCTIONS.with(|egl| {
        // See how many applicable configs there are.
        let mut config_count = 0;
        let result = egl.ChooseConfig(
            egl_display,
            requested_config_attributes.as_ptr(),
            ptr::null_mut(),
            0,
            &mut config_count,
        );
        if result == egl::FALSE {
            let err = egl.GetError().to_windowing_api_error();
            return Err(Error::PixelFormatSelectionFailed(err));
        }
        if config_count == 0 {
            return Err(Error::NoPixelFormatFound);
        }

        // Enumerate all those configs.
        let mut configs = vec![ptr::null(); config_count as usize];
        let mut real_config_count = config_count;
        let result = egl.ChooseConfig(
            egl_display,
            requested_config_attributes.as_ptr(),
            configs.as_mut_ptr(),
            config_count,
            &mut real_config_count,
        );
        if result == egl::FALSE {
            let err = egl.GetError().to_windowing_api_error();
            return Err(Error::PixelFormatSelectionFailed(err));
        }
        configs.truncate(real_config_count as usize);

        // Sanitize configs. `eglChooseConfig` treats sizes as minimums; Skia wants exact RGBA8.
        configs
            .into_iter()
            .find(|&egl_config| {
                required_config_attributes
                    .chunks(2)
                    .all(|pair| get_config_attr(egl_display, egl_config, pair[0]) == Some(pair[1]))
            })
            .ok_or(Error::NoPixelFormatFound)
    })
}

unsafe fn make_no_context_current(egl_display: EGLDisplay) -> Result<(), Error> {
    EGL_FUNCTIONS.with(|egl| {
        let result = egl.MakeCurrent(
            egl_display,
            egl::NO_SURFACE,
            egl::NO_SURFACE,
            egl::NO_CONTEXT,
        );
        if result == egl::FALSE {
            let err = egl.GetError().to_windowing_api_error();
            return Err(Error::MakeCurrentFailed(err));
        }
        Ok(())
    })
}

unsafe fn get_config_attr(
    egl_display: EGLDisplay,
    egl_config: EGLConfig,
    attr: EGLint,
) -> Option<EGLint> {
    EGL_FUNCTIONS.with(|egl| {
        let mut value = 0;
        let result = egl.GetConfigAttrib(egl_display, egl_config, attr, &mut value);
        if result == egl::FALSE {
            None
        } else {
            Some(value)
        }
    })
}
