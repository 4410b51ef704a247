//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. `TraceLayer` (request span, see [`make_request_span`])
//! 3. Request ID (records into the span created above)
//! 4. CORS (permissive; the API is consumed from browser frontends)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, make_request_span, request_id_middleware};
