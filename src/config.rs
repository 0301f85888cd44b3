//! Configuration for spot extraction runs.

use std::path::PathBuf;

/// Spot extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Directory for output files. `None` writes beside the input.
    pub output_dir: Option<PathBuf>,

    /// Name part of the file holding everything but the requested colorants.
    pub remaining_suffix: String,

    /// Rename unwanted Separation colorants to `None` in each output.
    pub neutralize_separations: bool,

    /// Compress streams when saving.
    pub compress: bool,

    /// Rewrite the pages of a pass in parallel.
    pub parallel: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            output_dir: None,
            remaining_suffix: "remaining".to_string(),
            neutralize_separations: true,
            compress: true,
            parallel: true,
        }
    }

    /// Write outputs to `dir` instead of beside the input.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the name part of the remaining file.
    pub fn with_remaining_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.remaining_suffix = suffix.into();
        self
    }

    /// Enable Separation neutralization.
    pub fn with_neutralize_separations(mut self, enable: bool) -> Self {
        self.neutralize_separations = enable;
        self
    }

    /// Enable stream compression.
    pub fn with_compress(mut self, enable: bool) -> Self {
        self.compress = enable;
        self
    }

    /// Enable parallel page rewriting.
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }
}
