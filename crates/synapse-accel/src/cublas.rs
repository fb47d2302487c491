#![allow(non_snake_case)]

// --- cuBLAS (v2 API, dlopen) ---

use libloading::{Library, Symbol};
use std::ffi::c_void;
use std::ptr;
use tracing::debug;

use crate::errors::{AccelError, Result};
use crate::runtime::BlasRuntime;
use crate::types::StatusCode;
use crate::util;

#[allow(non_camel_case_types)]
type cublasHandle_t = *mut c_void;
#[allow(non_camel_case_types)]
type CublasCreate = unsafe extern "C" fn(*mut cublasHandle_t) -> i32;
#[allow(non_camel_case_types)]
type CublasDestroy = unsafe extern "C" fn(cublasHandle_t) -> i32;
#[allow(non_camel_case_types)]
type CublasGetVersion = unsafe extern "C" fn(cublasHandle_t, *mut i32) -> i32;

#[cfg(target_os = "windows")]
const CANDIDATES: &[&str] = &["cublas64_12.dll", "cublas64_11.dll", "cublas64_13.dll"];
#[cfg(target_os = "linux")]
const CANDIDATES: &[&str] = &[
    "libcublas.so.12",
    "libcublas.so.11",
    "libcublas.so.13",
    "libcublas.so",
];
#[cfg(not(any(target_os = "windows", target_os = "linux")))]
const CANDIDATES: &[&str] = &["libcublas.dylib"];

/// Raw cuBLAS handle. Null until `cublasCreate_v2` fills it in.
#[derive(Debug)]
pub struct RawHandle(cublasHandle_t);

impl RawHandle {
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

/// cuBLAS resolved from a shared library at run time.
pub struct CublasRuntime {
    create: CublasCreate,
    destroy: CublasDestroy,
    get_version: Option<CublasGetVersion>,
    library: String,
    // fn pointers above are only valid while this stays loaded
    _lib: Library,
}

impl CublasRuntime {
    /// Try `SYNAPSE_CUBLAS_LIB` first, then the platform's usual names.
    pub fn load() -> Result<Self> {
        let names = util::cublas_override()
            .into_iter()
            .chain(CANDIDATES.iter().map(|s| s.to_string()));
        first_usable(names, Self::load_from)
    }

    pub fn load_from(name: &str) -> Result<Self> {
        unsafe {
            let lib = Library::new(name).map_err(|_| AccelError::LibraryNotFound {
                tried: name.to_string(),
            })?;

            let (create, destroy, get_version) = {
                let cublasCreate: Symbol<CublasCreate> =
                    lib.get(b"cublasCreate_v2")
                        .map_err(|_| AccelError::SymbolMissing {
                            symbol: "cublasCreate_v2",
                            library: name.to_string(),
                        })?;
                let cublasDestroy: Symbol<CublasDestroy> =
                    lib.get(b"cublasDestroy_v2")
                        .map_err(|_| AccelError::SymbolMissing {
                            symbol: "cublasDestroy_v2",
                            library: name.to_string(),
                        })?;
                let cublasGetVersion: Option<Symbol<CublasGetVersion>> =
                    lib.get(b"cublasGetVersion_v2").ok();

                (
                    *cublasCreate,
                    *cublasDestroy,
                    cublasGetVersion.map(|s| *s),
                )
            };

            debug!(library = %name, "cuBLAS loaded");
            Ok(Self {
                create,
                destroy,
                get_version,
                library: name.to_string(),
                _lib: lib,
            })
        }
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    /// Packed cuBLAS version of a live handle, e.g. `120401` → "12.4.1".
    pub fn version(&self, handle: &RawHandle) -> Option<String> {
        let get_version = self.get_version?;
        if handle.is_null() {
            return None;
        }
        let mut ver = 0i32;
        let rc = unsafe { get_version(handle.0, &mut ver as *mut i32) };
        if rc != 0 {
            return None;
        }
        ver_string(ver)
    }
}

/// Walk `names` until `load` succeeds. A candidate that opens but lacks a
/// symbol does not stop the walk; its error is returned if nothing loads.
fn first_usable<T>(
    names: impl IntoIterator<Item = String>,
    mut load: impl FnMut(&str) -> Result<T>,
) -> Result<T> {
    let mut tried = Vec::new();
    let mut first_missing_symbol = None;
    for name in names {
        match load(&name) {
            Ok(rt) => return Ok(rt),
            Err(AccelError::LibraryNotFound { .. }) => {
                debug!(library = %name, "cuBLAS candidate did not load");
                tried.push(name);
            }
            Err(e) => {
                debug!(library = %name, error = %e, "cuBLAS candidate unusable");
                tried.push(name);
                first_missing_symbol.get_or_insert(e);
            }
        }
    }
    Err(first_missing_symbol.unwrap_or(AccelError::LibraryNotFound {
        tried: tried.join(", "),
    }))
}

impl BlasRuntime for CublasRuntime {
    type Handle = RawHandle;

    fn create_handle(&self) -> (RawHandle, StatusCode) {
        let mut raw: cublasHandle_t = ptr::null_mut();
        let rc = unsafe { (self.create)(&mut raw as *mut cublasHandle_t) };
        (RawHandle(raw), StatusCode(rc))
    }

    fn destroy_handle(&self, handle: RawHandle) {
        // a failed create leaves the slot null; there is nothing to free
        if handle.is_null() {
            debug!("cuBLAS handle never created, skipping destroy");
            return;
        }
        let rc = unsafe { (self.destroy)(handle.0) };
        if rc != 0 {
            debug!(status = %StatusCode(rc), "cublasDestroy_v2 reported failure");
        }
    }
}

fn ver_string(v: i32) -> Option<String> {
    if v <= 0 {
        return None;
    }
    // cuBLAS >= 12 packs major*10000 + minor*100 + patch, older major*1000 + minor*100 + patch
    let (major, rest) = if v >= 100_000 {
        (v / 10_000, v % 10_000)
    } else {
        (v / 1000, v % 1000)
    };
    let minor = rest / 100;
    let patch = rest % 100;
    Some(format!("{major}.{minor}.{patch}"))
}
