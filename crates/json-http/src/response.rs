//! HTTP response types

use crate::error::HttpError;

/// Result of an HTTP operation, generic over the success type R and error type E
pub type Response<R, E = HttpError> = Result<R, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_type_is_result() {
        let success: Response<i32> = Ok(42);
        assert!(matches!(success, Ok(42)));

        let error: Response<i32> = Err(HttpError::Status {
            status: 500,
            message: "500 Internal Server Error".to_string(),
        });
        assert!(matches!(error, Err(HttpError::Status { status: 500, .. })));
    }
}
