// plywood-gl/src/platform/egl/device.rs
//
//! Loading of the EGL library and its function table.

use crate::egl::Egl;

use libc::{dlopen, dlsym, RTLD_LAZY};
use std::env;
use std::ffi::{CStr, CString};
use std::mem;
use std::os::raw::{c_char, c_void};
use std::ptr;
use std::sync::LazyLock;

/// Overrides the shared object EGL is loaded from.
pub(crate) static EGL_LIBRARY_ENV_VAR: &str = "PLYWOOD_EGL_LIBRARY";

thread_local! {
    pub static EGL_FUNCTIONS: Egl = Egl::load_with(get_proc_address);
}

static EGL_LIBRARY: LazyLock<EGLLibraryWrapper> = LazyLock::new(|| {
    let mut sonames = vec![];
    if let Some(path) = env::var_os(EGL_LIBRARY_ENV_VAR) {
        match CString::new(path.into_encoded_bytes()) {
            Ok(path) => sonames.push(path),
            Err(_) => warn!("ignoring {}: path contains a NUL byte", EGL_LIBRARY_ENV_VAR),
        }
    }
    sonames.push(c"libEGL.so.1".to_owned());
    sonames.push(c"libEGL.so".to_owned());

    for soname in &sonames {
        unsafe {
            let handle = dlopen(soname.as_ptr(), RTLD_LAZY);
            if !handle.is_null() {
                debug!("loaded EGL from {:?}", soname);
                return EGLLibraryWrapper(handle);
            }
        }
    }

    warn!("unable to load the libEGL shared object (tried {:?})", sonames);
    EGLLibraryWrapper(ptr::null_mut())
});

struct EGLLibraryWrapper(*mut c_void);

unsafe impl Send for EGLLibraryWrapper {}
unsafe impl Sync for EGLLibraryWrapper {}

/// Returns true if a libEGL shared object could be loaded into this process.
pub fn egl_library_available() -> bool {
    !EGL_LIBRARY.0.is_null()
}

// Resolves the core EGL entry points out of the shared object itself. Everything else goes through
// `eglGetProcAddress`.
fn get_proc_address(symbol_name: &str) -> *const c_void {
    if EGL_LIBRARY.0.is_null() {
        return ptr::null();
    }
    let symbol_name = match CString::new(symbol_name) {
        Ok(symbol_name) => symbol_name,
        Err(_) => return ptr::null(),
    };
    unsafe { dlsym(EGL_LIBRARY.0, symbol_name.as_ptr()).cast_const() }
}

// `eglGetProcAddress` typed so that a null result stays representable.
type GetProcAddressFn = unsafe extern "C" fn(procname: *const c_char) -> *const c_void;

static EGL_GET_PROC_ADDRESS: LazyLock<Option<GetProcAddressFn>> = LazyLock::new(|| {
    let symbol = get_proc_address("eglGetProcAddress");
    if symbol.is_null() {
        None
    } else {
        Some(unsafe { mem::transmute::<*const c_void, GetProcAddressFn>(symbol) })
    }
});

/// Looks up a GL or EGL entry point through `eglGetProcAddress`. Null if EGL isn't loaded or the
/// name is unknown to the platform.
pub(crate) fn lookup_egl_extension(name: &CStr) -> *const c_void {
    match *EGL_GET_PROC_ADDRESS {
        Some(get) => unsafe { get(name.as_ptr()) },
        None => ptr::null(),
    }
}
