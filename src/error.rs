use thiserror::Error;

/// Failures of the credential subsystem.
///
/// None of these are fatal to the process: the server converts each one into a
/// `{success: false, message}` payload at the gate or endpoint that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Not Authorized, Login Again")]
    MissingCredential,

    #[error("{0}")]
    InvalidCredential(String),

    #[error("Patient ID is required")]
    MissingSubject,

    #[error("upstream request failed: {0}")]
    UpstreamFailure(String),

    #[error("not entitled to issue a capability for this subject")]
    NotEntitled,

    #[error("capability rejected: {0}")]
    CapabilityRejected(String),
}

impl AuthError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        AuthError::InvalidCredential(reason.into())
    }

    /// Short machine-friendly name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::InvalidCredential(_) => "invalid_credential",
            AuthError::MissingSubject => "missing_subject",
            AuthError::UpstreamFailure(_) => "upstream_failure",
            AuthError::NotEntitled => "not_entitled",
            AuthError::CapabilityRejected(_) => "capability_rejected",
        }
    }
}
