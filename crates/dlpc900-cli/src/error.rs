//! Top-level error type the binary reports on exit.

/// Everything that can cause `dlpc900` to exit non-zero.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Loading or resolving the saved configuration document failed.
    #[error(transparent)]
    Config(#[from] dlpc900_config::ConfigError),

    /// Validating or running the resolved pattern sequence failed.
    #[error(transparent)]
    Upload(#[from] dlpc900_upload::UploadError),

    /// Opening the HID transport failed.
    #[error(transparent)]
    Transport(#[from] dlpc900_transport::TransportError),

    /// No channels resolved to any patterns at all.
    #[error("resolved pattern sequence is empty")]
    EmptySequence,
}
