use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Plot configuration
// ---------------------------------------------------------------------------

/// Everything the pipeline needs to know about where to read, where to write,
/// and how the chart looks. The binary always runs with [`Default`].
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Canvas size in pixels (10×6 in at 100 dpi).
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Marker radius in pixels.
    pub marker_size: u32,
    pub line_width: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("timing.txt"),
            output: PathBuf::from("timing.png"),
            width: 1000,
            height: 600,
            title: "Time vs. Number of Rows".to_string(),
            x_label: "Number of rows (m)".to_string(),
            y_label: "Time taken (seconds)".to_string(),
            marker_size: 4,
            line_width: 2,
        }
    }
}
