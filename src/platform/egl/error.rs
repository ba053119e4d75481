// plywood-gl/src/platform/egl/error.rs
//
//! `eglGetError` codes as `WindowingApiError`s.

use crate::egl;
use crate::egl::types::{EGLenum, EGLint};
use crate::WindowingApiError;

/// Every error code EGL 1.5 defines, and what it becomes. `EGL_SUCCESS` and unknown codes are
/// reported as `WindowingApiError::Failed`.
const EGL_ERROR_CODES: [(EGLenum, WindowingApiError); 14] = [
    (egl::NOT_INITIALIZED, WindowingApiError::NotInitialized),
    (egl::BAD_ACCESS, WindowingApiError::BadAccess),
    (egl::BAD_ALLOC, WindowingApiError::BadAlloc),
    (egl::BAD_ATTRIBUTE, WindowingApiError::BadAttribute),
    (egl::BAD_CONTEXT, WindowingApiError::BadContext),
    (egl::BAD_CONFIG, WindowingApiError::BadConfig),
    (egl::BAD_CURRENT_SURFACE, WindowingApiError::BadCurrentSurface),
    (egl::BAD_DISPLAY, WindowingApiError::BadDisplay),
    (egl::BAD_SURFACE, WindowingApiError::BadSurface),
    (egl::BAD_MATCH, WindowingApiError::BadMatch),
    (egl::BAD_PARAMETER, WindowingApiError::BadParameter),
    (egl::BAD_NATIVE_PIXMAP, WindowingApiError::BadNativePixmap),
    (egl::BAD_NATIVE_WINDOW, WindowingApiError::BadNativeWindow),
    (egl::CONTEXT_LOST, WindowingApiError::ContextLost),
];

pub(crate) trait ToWindowingApiError {
    fn to_windowing_api_error(self) -> WindowingApiError;
}

impl ToWindowingApiError for EGLint {
    fn to_windowing_api_error(self) -> WindowingApiError {
        let code = self as EGLenum;
        EGL_ERROR_CODES
            .iter()
            .find(|&&(egl_code, _)| egl_code == code)
            .map_or(WindowingApiError::Failed, |&(_, err)| err)
    }
}
