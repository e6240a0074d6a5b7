//! C-ABI wrapper around `counter-core`.
//!
//! # Overview
//! Exposes request building, response parsing and the counter session
//! through `extern "C"` functions, so a host in any language with a C FFI can
//! do the HTTP itself and still share the state rules of the Rust core.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A session operation is `begin_*` (returns an `FfiTicket`), then the host
//!   runs the request, then `counter_session_complete` with the response or
//!   `counter_session_fail` when no response arrived.
//! - The C caller owns all returned pointers and must call the matching
//!   `counter_*_free` / `counter_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use counter_core::{HttpResponse, Operation, RequestFailure};

use types::*;

/// Read a caller-owned C string. Invalid UTF-8 reads as empty.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string.
unsafe fn read_c_str(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .unwrap_or("")
        .to_string()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `CounterClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `counter_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn counter_client_new(base_url: *const c_char) -> *mut FfiCounterClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { read_c_str(base_url) };
        let client = counter_core::CounterClient::new(&url);
        Box::into_raw(Box::new(FfiCounterClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `counter_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn counter_client_free(client: *mut FfiCounterClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn build(client: *const FfiCounterClient, operation: Operation) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_request(operation))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the `GET /api/counter` request. Returns null if `client` is null.
/// Free with `counter_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn counter_build_get_counter(client: *const FfiCounterClient) -> *mut FfiHttpRequest {
    build(client, Operation::Refresh)
}

/// Build the `POST /api/counter/increment` request. Returns null if `client`
/// is null. Free with `counter_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn counter_build_increment(client: *const FfiCounterClient) -> *mut FfiHttpRequest {
    build(client, Operation::Increment)
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A null body reads as an empty string.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { read_c_str(resp.body) }
    };
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

/// Parse a response from either counter endpoint.
///
/// Never returns null. Free with `counter_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn counter_parse_counter(
    client: *const FfiCounterClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCounterResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiCounterResult::null_arg("client");
        }
        if response.is_null() {
            return FfiCounterResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_counter(ffi_response_to_core(resp)) {
            Ok(parsed) => FfiCounterResult::ok(parsed),
            Err(e) => FfiCounterResult::from_failure(e),
        }
    })
    .unwrap_or_else(|_| FfiCounterResult::panic("panic in counter_parse_counter"))
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Create an empty session: count unset, empty message, not loading.
/// Free with `counter_session_free`.
#[unsafe(no_mangle)]
pub extern "C" fn counter_session_new() -> *mut FfiCounterSession {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiCounterSession {
            inner: counter_core::CounterSession::new(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a session. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn counter_session_free(session: *mut FfiCounterSession) {
    if !session.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(session) });
        });
    }
}

fn begin(session: *mut FfiCounterSession, operation: Operation) -> FfiTicket {
    let unissued = FfiTicket {
        seq: 0,
        operation: operation.into(),
    };
    catch_unwind(|| {
        if session.is_null() {
            return unissued;
        }
        let session = unsafe { &mut *session };
        session.inner.begin(operation).into()
    })
    .unwrap_or(unissued)
}

#[unsafe(no_mangle)]
pub extern "C" fn counter_session_begin_refresh(session: *mut FfiCounterSession) -> FfiTicket {
    begin(session, Operation::Refresh)
}

/// Starts an increment; `loading` is true when this returns.
#[unsafe(no_mangle)]
pub extern "C" fn counter_session_begin_increment(session: *mut FfiCounterSession) -> FfiTicket {
    begin(session, Operation::Increment)
}

/// Settle `ticket` with the response the host received. A ticket from a
/// different session comes back as `Unissued` and changes nothing.
#[unsafe(no_mangle)]
pub extern "C" fn counter_session_complete(
    session: *mut FfiCounterSession,
    client: *const FfiCounterClient,
    ticket: FfiTicket,
    response: *const FfiHttpResponse,
) -> FfiCompletion {
    catch_unwind(|| {
        if session.is_null() || client.is_null() || response.is_null() {
            return FfiCompletion::NullArg;
        }
        let session = unsafe { &mut *session };
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let outcome = client.inner.parse_counter(ffi_response_to_core(resp));
        session.inner.complete(ticket.into(), outcome).into()
    })
    .unwrap_or(FfiCompletion::Panic)
}

/// Settle `ticket` when no response arrived. `detail` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn counter_session_fail(
    session: *mut FfiCounterSession,
    ticket: FfiTicket,
    detail: *const c_char,
) -> FfiCompletion {
    catch_unwind(|| {
        if session.is_null() {
            return FfiCompletion::NullArg;
        }
        let session = unsafe { &mut *session };
        let detail = if detail.is_null() {
            "transport error".to_string()
        } else {
            unsafe { read_c_str(detail) }
        };
        session
            .inner
            .complete(ticket.into(), Err(RequestFailure::Transport(detail)))
            .into()
    })
    .unwrap_or(FfiCompletion::Panic)
}

#[unsafe(no_mangle)]
pub extern "C" fn counter_session_has_count(session: *const FfiCounterSession) -> bool {
    if session.is_null() {
        return false;
    }
    catch_unwind(|| unsafe { &*session }.inner.state().count.is_some()).unwrap_or(false)
}

/// The current count, or 0 while unset (check `counter_session_has_count`).
#[unsafe(no_mangle)]
pub extern "C" fn counter_session_count(session: *const FfiCounterSession) -> i64 {
    if session.is_null() {
        return 0;
    }
    catch_unwind(|| unsafe { &*session }.inner.state().count.unwrap_or(0)).unwrap_or(0)
}

#[unsafe(no_mangle)]
pub extern "C" fn counter_session_loading(session: *const FfiCounterSession) -> bool {
    if session.is_null() {
        return false;
    }
    catch_unwind(|| unsafe { &*session }.inner.state().loading).unwrap_or(false)
}

/// Copy of the current status message. Free with `counter_free_string`.
/// Returns null if `session` is null.
#[unsafe(no_mangle)]
pub extern "C" fn counter_session_message(session: *const FfiCounterSession) -> *mut c_char {
    if session.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(|| to_c_string(&unsafe { &*session }.inner.state().message))
        .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by `counter_build_*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn counter_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        counter_free_string(req.path);
        counter_free_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                counter_free_string(h.key);
                counter_free_string(h.value);
            }
        }
    });
}

/// Free a result returned by `counter_parse_counter`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn counter_free_result(result: *mut FfiCounterResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        counter_free_string(result.error_message);
        counter_free_string(result.message);
    });
}

/// Free a string returned by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn counter_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}
