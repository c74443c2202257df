use thiserror::Error;

/// Errors that can occur while turning raw bytes into a bitmap
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unsupported or corrupt image data: {0}")]
    Image(#[from] image::ImageError),
    #[error("Image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// A failed remote generation job, forwarded verbatim for display
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {message}")]
pub struct GenerationError {
    /// Exception type reported by the backend
    pub kind: String,
    /// Node that failed, e.g. `KSampler (ID: 3)`
    pub node: Option<String>,
    pub message: String,
    pub trace: Option<String>,
}

/// Network or transport failure during upload or polling. Terminal for the attempt.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("Status check failed: {0}")]
    Poll(String),
    #[error("Could not start generation worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Generation worker stopped before reporting a result")]
    Disconnected,
}

/// Rejected user input. State is untouched when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Canvas size must be between {min}px and {max}px, got {width}x{height}")]
    CanvasSize {
        width: u32,
        height: u32,
        min: u32,
        max: u32,
    },
}

/// Errors that can occur while rasterizing or encoding the composite
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("PNG encoding error: {0}")]
    Png(String),
}

/// What a generation backend reports when a job does not produce an image
#[derive(Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// Errors surfaced by editor actions to the presentation layer
#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
    #[error("A generation request is already in progress")]
    GenerationInFlight,
}

impl From<JobError> for EditorError {
    fn from(error: JobError) -> Self {
        match error {
            JobError::Generation(e) => EditorError::Generation(e),
            JobError::Transfer(e) => EditorError::Transfer(e),
        }
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
