use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Debug, Error)]
pub enum LayoutError {
    /// The orthogonal solver could not produce a usable path, including the
    /// case of NaN or infinite snapshot coordinates.
    #[error("edge solver failed for edge `{edge_id}`: {reason}")]
    SolverFailed { edge_id: String, reason: String },

    /// The routing worker thread is gone; schedule/cancel can no longer be
    /// delivered.
    #[error("routing worker disconnected")]
    WorkerDisconnected,
}
