use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
///
/// Every `Option` left as `None` falls back to the config file, then to the
/// compiled-in default.
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to the timing log
    pub input: PathBuf,

    /// Optional analysis configuration file (TOML)
    pub config: Option<PathBuf>,

    /// Step to fit (default: slowest step by mean duration)
    pub step: Option<String>,

    /// Collect malformed and negative-duration rows instead of aborting
    pub lenient: bool,

    /// Row whose start time is the origin for hours-since-origin
    pub origin_row: Option<usize>,

    /// Seed for reproducible sampling
    pub seed: Option<u64>,

    /// Number of variates to draw from the best fit
    pub sample: Option<usize>,

    /// Print the report as JSON
    pub json: bool,

    /// Print the human-readable summary
    pub summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            config: None,
            step: None,
            lenient: false,
            origin_row: None,
            seed: None,
            sample: None,
            json: false,
            summary: true,
        }
    }
}
