//! Maps dashboard service errors to eg_core::AppError for consistent user-facing messages.
//! Each service has its own module to keep mappings small and readable.

mod client;
mod typhoon;
mod weather;

pub(crate) use client::client_error;
