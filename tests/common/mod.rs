//! Common test utilities for the pipeline tests

use meta_analysis::{GroupSummary, StudyRecord};
use std::path::PathBuf;

/// Path of a file under `tests/data`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// A tiny study with a negative effect and a larger null study
pub fn two_study_records() -> Vec<StudyRecord> {
    vec![
        StudyRecord::new("A", GroupSummary::new(4.0, 1.0, 3), GroupSummary::new(3.0, 1.414, 2)),
        StudyRecord::new("B", GroupSummary::new(5.0, 2.0, 10), GroupSummary::new(5.0, 2.0, 10)),
    ]
}
