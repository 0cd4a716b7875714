//! Failure diagnostics.
//!
//! Every failed call is logged once, at error level, with a captured stack
//! backtrace. The record is a side effect: the error itself is returned
//! unchanged.

use std::backtrace::Backtrace;

use crate::{Error, Method};

/// Log `error` for a call to `url` and hand it back.
///
/// The backtrace is captured regardless of `RUST_BACKTRACE`.
pub(crate) fn report(error: Error, method: Method, url: &str) -> Error {
    let backtrace = Backtrace::force_capture();
    tracing::error!(
        kind = error.kind(),
        status = error.status(),
        %method,
        url,
        error = %error,
        %backtrace,
        "lob request failed"
    );
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_returns_error_unchanged() {
        let err = report(
            Error::status_error(404, "https://api.lob.com/v1/addresses/adr_x", b"{}"),
            Method::Get,
            "https://api.lob.com/v1/addresses/adr_x",
        );
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some("{}"));
    }
}
