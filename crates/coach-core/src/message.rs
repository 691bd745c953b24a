//! Turning errors into text a coach can act on.

use coach_api::ApiError;

use crate::error::CoreError;

pub const SESSION_EXPIRED: &str = "Your session has expired. Log in again with `coach login`.";

/// The one place an [`ApiError`] becomes a display string.
pub fn user_message(err: &ApiError) -> String {
    match err {
        ApiError::Validation { message, .. } => message.clone(),
        ApiError::NotFound(msg) | ApiError::Conflict(msg) | ApiError::InvalidArgument(msg) => {
            msg.clone()
        }
        ApiError::Auth(_) => SESSION_EXPIRED.to_owned(),
        ApiError::Server { status, message } => {
            format!("The server could not complete the request ({status}): {message}")
        }
        ApiError::Network(_) => {
            "Could not reach the server. Check your connection and the API URL.".to_owned()
        }
        ApiError::Decode { .. } => "The server sent a response that could not be read.".to_owned(),
    }
}

/// Same as [`user_message`] for core errors.
pub fn core_message(err: &CoreError) -> String {
    match err {
        CoreError::Api(api) => user_message(api),
        CoreError::PartialBuild {
            plan_id,
            created,
            failed_at,
            source,
        } => format!(
            "Plan {plan_id} was created but only {created} step(s) were saved; {failed_at} failed: {}",
            user_message(source)
        ),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn detail_is_shown_verbatim() {
        let err = ApiError::NotFound("No exercises found for day 2".into());
        assert_eq!(user_message(&err), "No exercises found for day 2");
    }

    #[test]
    fn auth_asks_for_login() {
        assert_eq!(user_message(&ApiError::Auth("x".into())), SESSION_EXPIRED);
    }

    #[test]
    fn network_hides_transport_details() {
        let msg = user_message(&ApiError::Network("tcp connect error: 111".into()));
        assert!(!msg.contains("111"));
    }

    #[test]
    fn core_validation_lists_fields() {
        let err = CoreError::Validation(vec![ValidationError::new("peso", "must be between 20 and 500 kg")]);
        assert_eq!(core_message(&err), "peso: must be between 20 and 500 kg");
    }
}
