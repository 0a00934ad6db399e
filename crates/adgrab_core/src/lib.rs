//! Adgrab core: pure candidate, naming and validation rules with no IO.
mod candidate;
mod extension;
mod input;
mod job;

pub use candidate::{first_srcset_url, is_excluded_candidate, resolve_candidate, CandidateSet};
pub use extension::{infer_extension, FALLBACK_EXTENSION};
pub use input::{parse_http_url, InputError};
pub use job::{entry_name, ArchiveJob, JobSummary, SkippedUrl};
