//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use counter_core::{Completion, CounterResponse, HttpMethod, Operation, RequestFailure, Ticket};

/// Opaque handle to a `CounterClient`.
pub struct FfiCounterClient {
    pub(crate) inner: counter_core::CounterClient,
}

/// Opaque handle to a `CounterSession`.
pub struct FfiCounterSession {
    pub(crate) inner: counter_core::CounterSession,
}

/// Copy `s` into a heap C string owned by the caller. Interior NULs are
/// dropped rather than failing the conversion.
pub(crate) fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// `body` is null for both counter endpoints; the POST must be sent with an
/// empty body.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: counter_core::HttpRequest) -> *mut Self {
        let path = to_c_string(&req.path);
        let body = match req.body {
            Some(b) => to_c_string(&b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// The C caller builds this after executing a request and passes a pointer
/// to `counter_parse_counter` or `counter_session_complete`. The FFI layer
/// reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Transport = 1,
    Http = 2,
    Decode = 3,
    Panic = 4,
    NullArg = 5,
}

/// Result of `counter_parse_counter`.
///
/// On success `error_code` is `Ok`, `error_message` is null, and
/// `count`/`message` hold the response. On failure `error_message` is a
/// human-readable C string, `message` is null and `count` is 0.
#[repr(C)]
pub struct FfiCounterResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub count: i64,
    pub message: *mut c_char,
}

impl FfiCounterResult {
    pub(crate) fn ok(response: CounterResponse) -> *mut Self {
        Box::into_raw(Box::new(FfiCounterResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            count: response.count,
            message: to_c_string(&response.message),
        }))
    }

    pub(crate) fn from_failure(failure: RequestFailure) -> *mut Self {
        let (error_code, http_status) = match &failure {
            RequestFailure::Transport(_) => (FfiErrorCode::Transport, 0),
            RequestFailure::Status { status, .. } => (FfiErrorCode::Http, *status),
            RequestFailure::Decode(_) => (FfiErrorCode::Decode, 0),
        };
        Self::error(error_code, http_status, &failure.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg)
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiCounterResult {
            error_code,
            error_message: to_c_string(msg),
            http_status,
            count: 0,
            message: std::ptr::null_mut(),
        }))
    }
}

// ---------------------------------------------------------------------------
// Session types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiOperation {
    Refresh = 0,
    Increment = 1,
}

impl From<Operation> for FfiOperation {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Refresh => FfiOperation::Refresh,
            Operation::Increment => FfiOperation::Increment,
        }
    }
}

impl From<FfiOperation> for Operation {
    fn from(op: FfiOperation) -> Self {
        match op {
            FfiOperation::Refresh => Operation::Refresh,
            FfiOperation::Increment => Operation::Increment,
        }
    }
}

/// A started operation. `seq` is 0 when the session pointer was null.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FfiTicket {
    pub seq: u64,
    pub operation: FfiOperation,
}

impl From<Ticket> for FfiTicket {
    fn from(t: Ticket) -> Self {
        FfiTicket {
            seq: t.seq,
            operation: t.operation.into(),
        }
    }
}

impl From<FfiTicket> for Ticket {
    fn from(t: FfiTicket) -> Self {
        Ticket {
            seq: t.seq,
            operation: t.operation.into(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiCompletion {
    Applied = 0,
    Stale = 1,
    NullArg = 2,
    Panic = 3,
    /// The ticket's `seq` was never handed out by this session.
    Unissued = 4,
}

impl From<Completion> for FfiCompletion {
    fn from(c: Completion) -> Self {
        match c {
            Completion::Applied => FfiCompletion::Applied,
            Completion::Stale => FfiCompletion::Stale,
            Completion::Unissued => FfiCompletion::Unissued,
        }
    }
}
