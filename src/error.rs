// plywood-gl/src/error.rs
//
//! Various errors that methods can produce.
//!
//! The bridge operations themselves never fail on their own: they hand back whatever the
//! platform reports. These errors come from the surrounding helpers.

use std::fmt::{self, Display, Formatter};

/// Various errors that methods can produce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// The EGL shared library could not be loaded.
    NoEGLLibraryFound,
    /// EGL could not open or initialize a display connection.
    DisplayInitializationFailed(WindowingApiError),
    /// The system couldn't choose an EGL config.
    PixelFormatSelectionFailed(WindowingApiError),
    /// No EGL config matched the requested attributes.
    NoPixelFormatFound,
    /// The system couldn't create an OpenGL ES context.
    ContextCreationFailed(WindowingApiError),
    /// The system couldn't create the pbuffer surface backing a headless context.
    SurfaceCreationFailed(WindowingApiError),
    /// The system couldn't make the OpenGL ES context current or not current.
    MakeCurrentFailed(WindowingApiError),
    /// The system couldn't destroy an EGL object.
    DestructionFailed(WindowingApiError),
    /// An operation required a current GL context, but none was current on this thread.
    NoCurrentContext,
    /// Skia couldn't assemble a GL interface from the resolved entry points.
    InterfaceAssemblyFailed,
    /// Skia couldn't create a GPU context from the GL interface.
    GpuContextCreationFailed,
    /// Skia refused to wrap the bound framebuffer as a surface.
    RenderTargetWrapFailed,
    /// The texture couldn't be imported into Skia.
    TextureImportFailed,
}

/// Abstraction of the errors that EGL returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowingApiError {
    /// Miscellaneous error.
    Failed,
    /// EGL is not initialized, or could not be initialized, for the specified display.
    NotInitialized,
    /// EGL cannot access a requested resource (for example a context is bound in another
    /// thread).
    BadAccess,
    /// EGL failed to allocate resources for the requested operation.
    BadAlloc,
    /// An unrecognized attribute or attribute value was passed in the attribute list.
    BadAttribute,
    /// An `EGLConfig` argument does not name a valid config.
    BadConfig,
    /// An `EGLContext` argument does not name a valid EGL rendering context.
    BadContext,
    /// The current surface of the calling thread is no longer valid.
    BadCurrentSurface,
    /// An `EGLDisplay` argument does not name a valid EGL display connection.
    BadDisplay,
    /// Arguments are inconsistent.
    BadMatch,
    /// A native pixmap argument does not refer to a valid native pixmap.
    BadNativePixmap,
    /// A native window argument does not refer to a valid native window.
    BadNativeWindow,
    /// One or more argument values are invalid.
    BadParameter,
    /// An `EGLSurface` argument does not name a valid surface.
    BadSurface,
    /// A power management event has occurred. All contexts must be destroyed and recreated.
    ContextLost,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Error::NoEGLLibraryFound => write!(f, "the EGL library could not be loaded"),
            Error::DisplayInitializationFailed(err) => {
                write!(f, "EGL display initialization failed: {:?}", err)
            }
            Error::PixelFormatSelectionFailed(err) => {
                write!(f, "EGL config selection failed: {:?}", err)
            }
            Error::NoPixelFormatFound => {
                write!(f, "no EGL config matched the requested attributes")
            }
            Error::ContextCreationFailed(err) => write!(f, "context creation failed: {:?}", err),
            Error::SurfaceCreationFailed(err) => write!(f, "pbuffer creation failed: {:?}", err),
            Error::MakeCurrentFailed(err) => write!(f, "making context current failed: {:?}", err),
            Error::DestructionFailed(err) => write!(f, "EGL object destruction failed: {:?}", err),
            Error::NoCurrentContext => write!(f, "no GL context is current on this thread"),
            Error::InterfaceAssemblyFailed => write!(f, "Skia could not assemble a GL interface"),
            Error::GpuContextCreationFailed => write!(f, "Skia could not create a GPU context"),
            Error::RenderTargetWrapFailed => write!(f, "Skia could not wrap the framebuffer"),
            Error::TextureImportFailed => write!(f, "Skia could not import the texture"),
        }
    }
}

impl std::error::Error for Error {}
