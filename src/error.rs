use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a plotting run.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Input is missing, unreadable, or does not carry `n`, `m` and `time`.
    #[error("bad timing data in {}: {reason}", path.display())]
    DataFormat { path: PathBuf, reason: String },

    /// The chart could not be drawn, encoded, or written.
    #[error("cannot render chart to {}: {reason}", path.display())]
    Render { path: PathBuf, reason: String },
}

impl PlotError {
    /// Flatten an `anyhow` cause chain into a [`PlotError::DataFormat`].
    pub fn data_format(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        PlotError::DataFormat {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }

    /// Flatten an `anyhow` cause chain into a [`PlotError::Render`].
    pub fn render(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        PlotError::Render {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}
