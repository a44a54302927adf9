//! Test fixtures for shared error codes and envelopes.

use storage_proxy_shared::{ErrorClass, ErrorCode, ErrorEnvelope};

/// Return a list of common error codes used in tests.
pub fn common_error_codes() -> Vec<ErrorCode> {
    vec![
        ErrorCode::invalid_input(),
        ErrorCode::not_found(),
        ErrorCode::unsupported(),
        ErrorCode::transport(),
        ErrorCode::decode(),
        ErrorCode::registration(),
        ErrorCode::internal(),
    ]
}

/// A retriable transport failure fixture (remote API unavailable).
pub fn transport_error() -> ErrorEnvelope {
    ErrorEnvelope::transport("remote API returned 503 Service Unavailable", ErrorClass::Retriable)
        .with_metadata("status", "503")
}

/// A decode failure fixture.
pub fn decode_error() -> ErrorEnvelope {
    ErrorEnvelope::decode("payload did not match the declared type")
}

/// A registry refusal fixture.
pub fn registration_error() -> ErrorEnvelope {
    ErrorEnvelope::registration("an object is already registered under this name")
}

/// An invalid input error fixture.
pub fn invalid_input_error() -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::invalid_input(), "invalid input")
}
