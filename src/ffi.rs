//! FFI bindings for Restwell
//!
//! This module provides C-compatible functions so a platform UI can call the
//! engine directly. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using
//! `restwell_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::PathBuf;
use std::ptr;

use chrono::NaiveDateTime;

use crate::backends::FileBackend;
use crate::estimator::BedtimeEstimator;
use crate::model::LinearSleepModel;
use crate::store::SleepLogStore;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Estimation
// ============================================================================

/// Estimate a bedtime with the shipped model.
///
/// `wake_time` is a naive local timestamp in `YYYY-MM-DDTHH:MM:SS` form.
/// Returns a JSON object with `bedtime` (HH:MM) and
/// `predicted_sleep_seconds`.
///
/// # Safety
/// - `wake_time` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with
///   `restwell_free_string`.
/// - Returns NULL on error; call `restwell_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn restwell_estimate_bedtime(
    wake_time: *const c_char,
    sleep_duration_hours: f64,
    coffee_cups: u32,
) -> *mut c_char {
    clear_last_error();

    let wake_str = match cstr_to_string(wake_time) {
        Some(s) => s,
        None => {
            set_last_error("Invalid wake_time string pointer");
            return ptr::null_mut();
        }
    };

    let wake = match NaiveDateTime::parse_from_str(&wake_str, "%Y-%m-%dT%H:%M:%S") {
        Ok(dt) => dt,
        Err(e) => {
            set_last_error(&format!("Invalid wake_time '{}': {}", wake_str, e));
            return ptr::null_mut();
        }
    };

    let estimator = BedtimeEstimator::new(LinearSleepModel::default());
    match estimator.estimate(wake, sleep_duration_hours, coffee_cups) {
        Ok(rec) => {
            let result = serde_json::json!({
                "bedtime": rec.short_time(),
                "predicted_sleep_seconds": rec.predicted_sleep_seconds,
            });
            string_to_cstr(&result.to_string())
        }
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Sleep Log
// ============================================================================

/// Append a sleep quality entry to the file-backed log under `data_dir`.
///
/// Returns the stored entry as a JSON object.
///
/// # Safety
/// - `data_dir` and `comments` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with
///   `restwell_free_string`.
/// - Returns NULL on error; call `restwell_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn restwell_log_append(
    data_dir: *const c_char,
    quality: u8,
    comments: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let dir = match cstr_to_string(data_dir) {
        Some(s) => s,
        None => {
            set_last_error("Invalid data_dir string pointer");
            return ptr::null_mut();
        }
    };

    let comments_str = match cstr_to_string(comments) {
        Some(s) => s,
        None => {
            set_last_error("Invalid comments string pointer");
            return ptr::null_mut();
        }
    };

    let backend = FileBackend::new(PathBuf::from(dir));
    let mut store = SleepLogStore::new(backend);

    match store.append(quality, &comments_str) {
        Ok(entry) => match serde_json::to_string(&entry) {
            Ok(json) => string_to_cstr(&json),
            Err(e) => {
                set_last_error(&e.to_string());
                ptr::null_mut()
            }
        },
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Load the full sleep log from the file-backed store under `data_dir`.
///
/// Returns a JSON array (empty when no history exists).
///
/// # Safety
/// - `data_dir` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with
///   `restwell_free_string`.
/// - Returns NULL on error; call `restwell_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn restwell_log_load(data_dir: *const c_char) -> *mut c_char {
    clear_last_error();

    let dir = match cstr_to_string(data_dir) {
        Some(s) => s,
        None => {
            set_last_error("Invalid data_dir string pointer");
            return ptr::null_mut();
        }
    };

    let store = SleepLogStore::new(FileBackend::new(PathBuf::from(dir)));
    let summary = store.load_all();

    match serde_json::to_string(&summary) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Restwell functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Restwell function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn restwell_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Restwell call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn restwell_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Restwell library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn restwell_version() -> *const c_char {
    // Use a static CString to avoid allocation
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
