use std::fmt;

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum RecargaError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Form incomplete: {0}")]
    IncompleteForm(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Why an orchestration cycle ended in the Failed state.
///
/// None of these abort the application; each one becomes a user-facing
/// message and the form resets on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The server answered `success: false`.
    SubmissionRejected,
    /// Network or parse failure while submitting.
    SubmissionTransport,
    /// Network or parse failure while checking the task status.
    StatusTransport,
    /// The server reported `status: "failed"`.
    TaskFailed,
}

impl FailureKind {
    /// Message shown when the server did not supply one.
    pub fn fallback_message(self) -> &'static str {
        match self {
            FailureKind::SubmissionRejected => "Erro ao iniciar recarga.",
            FailureKind::SubmissionTransport => "Falha na conexão com o servidor.",
            FailureKind::StatusTransport => "Erro ao verificar status da recarga.",
            FailureKind::TaskFailed => "Falha na recarga.",
        }
    }

    /// Server message when present and non-empty, fallback otherwise.
    pub fn message(self, server_message: Option<&str>) -> String {
        match server_message.map(str::trim) {
            Some(msg) if !msg.is_empty() => msg.to_string(),
            _ => self.fallback_message().to_string(),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::SubmissionRejected => write!(f, "Submission rejected"),
            FailureKind::SubmissionTransport => write!(f, "Submission transport failure"),
            FailureKind::StatusTransport => write!(f, "Status check transport failure"),
            FailureKind::TaskFailed => write!(f, "Task reported failure"),
        }
    }
}
