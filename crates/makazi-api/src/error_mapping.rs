use crate::{ApiError, ApiErrorCode};

#[must_use]
pub fn map_error(error: &ApiError) -> u16 {
    match error.code {
        ApiErrorCode::InvalidQueryParameter | ApiErrorCode::ValidationFailed => 400,
        ApiErrorCode::Unauthorized => 401,
        ApiErrorCode::RegistrationClosed => 403,
        ApiErrorCode::PropertyNotFound
        | ApiErrorCode::InquiryNotFound
        | ApiErrorCode::DirectorNotFound => 404,
        ApiErrorCode::UsernameTaken => 409,
        ApiErrorCode::PayloadTooLarge => 413,
        ApiErrorCode::NotReady | ApiErrorCode::StoreUnavailable => 503,
        ApiErrorCode::Internal => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_maps_to_a_sensible_status() {
        assert_eq!(map_error(&ApiError::invalid_param("page", "x")), 400);
        assert_eq!(map_error(&ApiError::unauthorized()), 401);
        assert_eq!(map_error(&ApiError::property_not_found(7)), 404);
        assert_eq!(
            map_error(&ApiError::new(
                ApiErrorCode::StoreUnavailable,
                "pool exhausted",
                serde_json::Value::Null,
            )),
            503
        );
    }
}
