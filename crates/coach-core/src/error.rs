use coach_api::ApiError;
use coach_api::models::Id;
use thiserror::Error;

use crate::plan::parser::PlanParseError;
use crate::validation::ValidationError;

/// Errors returned by core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{}", join_validation(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Parse(#[from] PlanParseError),

    /// A multi-step build stopped half-way. Steps already committed stay in
    /// the backend.
    #[error("plan {plan_id} partially built: {created} step(s) committed, failed at {failed_at}: {source}")]
    PartialBuild {
        plan_id: Id,
        created: usize,
        failed_at: String,
        #[source]
        source: ApiError,
    },

    /// The backend answered successfully but the result does not match what
    /// the operation asked for.
    #[error("unexpected backend result: {0}")]
    Inconsistent(String),
}

impl CoreError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::Api(ApiError::InvalidArgument(msg.into()))
    }

    pub(crate) fn conflict(msg: impl Into<String>) -> Self {
        Self::Api(ApiError::Conflict(msg.into()))
    }

    /// The wrapped API error, if any.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            Self::PartialBuild { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Api(ApiError::Conflict(_)))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::Api(ApiError::InvalidArgument(_)))
    }
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(vec![err])
    }
}

fn join_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
