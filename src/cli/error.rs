use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("Failed to connect to API server")]
    #[diagnostic(
        code(estate::cli::connection_failed),
        help(
            "Is the API server running? Try: estate api\nOr set ESTATE_API_URL to point to the correct server."
        )
    )]
    ConnectionFailed {
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid response from API server: {message}")]
    #[diagnostic(
        code(estate::cli::invalid_response),
        help("The server returned data in an unexpected format. Check that client and server versions match.")
    )]
    InvalidResponse { message: String },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(estate::cli::api_error))]
    ApiError { status: u16, message: String },

    #[error("Refusing to delete {what} {id} without --force")]
    #[diagnostic(
        code(estate::cli::force_required),
        help("Deletes cascade to dependent records and cannot be undone. Re-run with --force.")
    )]
    ForceRequired { what: &'static str, id: String },
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            CliError::ConnectionFailed { source: e }
        } else {
            CliError::InvalidResponse {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::InvalidResponse {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
