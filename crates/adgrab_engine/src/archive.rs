use std::io::{Cursor, Write};
use std::sync::Arc;

use adgrab_core::{infer_extension, parse_http_url, ArchiveJob, JobSummary, SkippedUrl};
use engine_logging::{engine_info, engine_warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::fetch::Fetcher;
use crate::{FailureKind, FetchPurpose};

#[derive(Debug, Clone)]
pub struct ArchiveSettings {
    /// Upper bound on image payload bytes held for one archive.
    pub max_total_bytes: u64,
    pub compression_level: Option<i32>,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            max_total_bytes: 200 * 1024 * 1024,
            compression_level: Some(9),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("no urls to archive")]
    NoUrls,
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub source_url: String,
    pub byte_len: u64,
}

#[derive(Debug, Clone)]
pub struct ArchiveOutput {
    pub bytes: Vec<u8>,
    pub entries: Vec<ArchiveEntry>,
    pub skipped: Vec<SkippedUrl>,
    pub summary: JobSummary,
}

/// Downloads images one after another and packs the successes into a zip.
///
/// A failing URL is logged and skipped; it never aborts the job and never
/// consumes an entry number. The archive is assembled in memory under
/// [`ArchiveSettings::max_total_bytes`] so a writer failure surfaces before
/// the caller has sent anything.
pub struct Archiver {
    fetcher: Arc<dyn Fetcher>,
    settings: ArchiveSettings,
}

impl Archiver {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: ArchiveSettings) -> Self {
        Self { fetcher, settings }
    }

    pub async fn build(&self, urls: Vec<String>) -> Result<ArchiveOutput, ArchiveError> {
        if urls.is_empty() {
            return Err(ArchiveError::NoUrls);
        }

        let mut job = ArchiveJob::new(urls.clone());
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(self.settings.compression_level)
            .unix_permissions(0o644);
        let mut entries = Vec::new();
        let mut held_bytes: u64 = 0;

        for raw in urls {
            let url = match parse_http_url(&raw) {
                Ok(url) => url,
                Err(err) => {
                    engine_warn!("archive skip url={:?} reason={}", raw, err);
                    job.record_failure(raw, err.to_string());
                    continue;
                }
            };

            let output = match self.fetcher.fetch(&url, FetchPurpose::Image).await {
                Ok(output) => output,
                Err(err) => {
                    engine_warn!("archive skip url={} reason={}", url, err);
                    job.record_failure(raw, err.to_string());
                    continue;
                }
            };

            let byte_len = output.bytes.len() as u64;
            if held_bytes + byte_len > self.settings.max_total_bytes {
                let kind = FailureKind::TooLarge {
                    max_bytes: self.settings.max_total_bytes,
                    actual: Some(held_bytes + byte_len),
                };
                engine_warn!("archive skip url={} reason={}", url, kind);
                job.record_failure(raw, kind.to_string());
                continue;
            }

            let extension = infer_extension(output.metadata.content_type.as_deref(), &raw);
            let name = job.commit_entry(extension);
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&output.bytes)?;
            held_bytes += byte_len;
            entries.push(ArchiveEntry {
                name,
                source_url: raw,
                byte_len,
            });
        }

        let bytes = zip.finish()?.into_inner();
        let summary = job.summary();
        engine_info!(
            "archive built requested={} entries={} skipped={} zip_bytes={}",
            summary.requested,
            summary.succeeded,
            summary.skipped,
            bytes.len()
        );

        Ok(ArchiveOutput {
            bytes,
            entries,
            skipped: job.into_skipped(),
            summary,
        })
    }
}
