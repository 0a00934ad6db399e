/// Archive entry name for the `index`-th successful download (1-based).
pub fn entry_name(index: usize, extension: &str) -> String {
    format!("ad-{index:03}.{extension}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedUrl {
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSummary {
    pub requested: usize,
    pub succeeded: usize,
    pub skipped: usize,
}

/// Request-scoped bookkeeping for one archive download.
///
/// Entry names come from a counter that only advances on [`ArchiveJob::commit_entry`];
/// failures are recorded separately and never consume an index.
#[derive(Debug, Clone)]
pub struct ArchiveJob {
    urls: Vec<String>,
    next_index: usize,
    skipped: Vec<SkippedUrl>,
}

impl ArchiveJob {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            next_index: 1,
            skipped: Vec::new(),
        }
    }

    /// Reserve the next entry name and advance the counter.
    pub fn commit_entry(&mut self, extension: &str) -> String {
        let name = entry_name(self.next_index, extension);
        self.next_index += 1;
        name
    }

    pub fn record_failure(&mut self, url: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedUrl {
            url: url.into(),
            reason: reason.into(),
        });
    }

    pub fn into_skipped(self) -> Vec<SkippedUrl> {
        self.skipped
    }

    pub fn summary(&self) -> JobSummary {
        JobSummary {
            requested: self.urls.len(),
            succeeded: self.next_index - 1,
            skipped: self.skipped.len(),
        }
    }
}
