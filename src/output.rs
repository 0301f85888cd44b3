//! Output file naming.
//!
//! `scan.pdf` with colorant `PANTONE 123` yields `scan.PANTONE 123.pdf`, and
//! the remaining content goes to `scan.remaining.pdf`.

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Derives output paths from the input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    dir: PathBuf,
    stem: String,
}

impl OutputNames {
    /// Name outputs after `input`, placing them in `output_dir` if given and
    /// beside the input otherwise.
    pub fn new(input: &Path, output_dir: Option<&Path>) -> Result<Self> {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::InvalidPath(input.display().to_string()))?;
        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        Ok(Self { dir, stem })
    }

    /// Path of the file isolating `colorant`.
    pub fn colorant(&self, colorant: &str) -> PathBuf {
        self.with_middle(&sanitize_component(colorant))
    }

    /// Path of the file with the requested colorants removed.
    pub fn remaining(&self, suffix: &str) -> PathBuf {
        self.with_middle(&sanitize_component(suffix))
    }

    fn with_middle(&self, middle: &str) -> PathBuf {
        self.dir.join(format!("{}.{}.pdf", self.stem, middle))
    }
}

/// Reserve `path` among `taken`, or the first free `<name>-N.pdf` variant.
///
/// ```
/// # use pdf_spots::output::claim_unique;
/// # use std::collections::HashSet;
/// # use std::path::PathBuf;
/// let mut taken = HashSet::new();
/// assert_eq!(claim_unique(&mut taken, PathBuf::from("a.x.pdf")), PathBuf::from("a.x.pdf"));
/// assert_eq!(claim_unique(&mut taken, PathBuf::from("a.x.pdf")), PathBuf::from("a.x-2.pdf"));
/// ```
pub fn claim_unique(taken: &mut HashSet<PathBuf>, path: PathBuf) -> PathBuf {
    if taken.insert(path.clone()) {
        return path;
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut n = 2;
    loop {
        let candidate = path.with_file_name(format!("{}-{}.pdf", stem, n));
        if taken.insert(candidate.clone()) {
            log::warn!("{} is already an output, using {}", path.display(), candidate.display());
            return candidate;
        }
        n += 1;
    }
}

/// Make a colorant name usable inside a file name.
///
/// Path separators and control characters become `_`.
///
/// ```
/// # use pdf_spots::output::sanitize_component;
/// assert_eq!(sanitize_component("Black/White"), "Black_White");
/// ```
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_beside_input() {
        let names = OutputNames::new(Path::new("jobs/scan.pdf"), None).unwrap();
        assert_eq!(names.colorant("PANTONE 123"), PathBuf::from("jobs/scan.PANTONE 123.pdf"));
        assert_eq!(names.remaining("remaining"), PathBuf::from("jobs/scan.remaining.pdf"));
    }

    #[test]
    fn test_names_in_output_dir() {
        let names = OutputNames::new(Path::new("jobs/scan.pdf"), Some(Path::new("out"))).unwrap();
        assert_eq!(names.colorant("Gold"), PathBuf::from("out/scan.Gold.pdf"));
    }

    #[test]
    fn test_bare_file_name() {
        let names = OutputNames::new(Path::new("scan.pdf"), None).unwrap();
        assert_eq!(names.remaining("remaining"), PathBuf::from("scan.remaining.pdf"));
    }

    #[test]
    fn test_invalid_input_path() {
        assert!(matches!(OutputNames::new(Path::new("/"), None), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_claim_unique_numbers_clashes() {
        let names = OutputNames::new(Path::new("job.pdf"), None).unwrap();
        let mut taken = HashSet::new();
        let remaining = claim_unique(&mut taken, names.remaining("remaining"));
        let spot = claim_unique(&mut taken, names.colorant("remaining"));
        let slash = claim_unique(&mut taken, names.colorant("Spot/1"));
        let underscore = claim_unique(&mut taken, names.colorant("Spot_1"));

        assert_eq!(remaining, PathBuf::from("job.remaining.pdf"));
        assert_eq!(spot, PathBuf::from("job.remaining-2.pdf"));
        assert_eq!(slash, PathBuf::from("job.Spot_1.pdf"));
        assert_eq!(underscore, PathBuf::from("job.Spot_1-2.pdf"));
    }

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("a\\b\tc"), "a_b_c");
        assert_eq!(sanitize_component("PANTONE 123 C"), "PANTONE 123 C");
        assert_eq!(sanitize_component(""), "_");
    }
}
