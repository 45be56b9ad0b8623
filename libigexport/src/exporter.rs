//! Post export: one Hugo content file per media record
//!
//! Each record becomes `{out_dir}/{YYYY-MM-DD}-{id}.md` containing front
//! matter and an `instagram` shortcode invocation:
//!
//! ```text
//! ---
//! date: 2024-03-15T10:30:00-07:00
//! draft: false
//! tags:
//!   - instagram
//! instagram_id: 17895695668004550
//! instagram_permalink: https://www.instagram.com/p/CxYz123/
//! media_type: IMAGE
//! shortcode: CxYz123
//! ---
//!
//! {{< instagram CxYz123 >}}
//! ```
//!
//! Existing files with the same name are overwritten.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local};
use tracing::{debug, info, warn};

use crate::error::{ExportError, Result};
use crate::shortcode::{extract_shortcode, ShortcodeSource};
use crate::types::{DerivedPost, PostRecord};

/// Layout of the API's `timestamp` field, e.g. `2024-03-15T10:30:00+0000`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Source of "now" for records whose timestamp cannot be parsed
pub type Clock = fn() -> DateTime<FixedOffset>;

/// Local wall-clock time with the local UTC offset
pub fn local_now() -> DateTime<FixedOffset> {
    let now = Local::now();
    now.with_timezone(now.offset())
}

/// First `_`-delimited segment of a raw media id
///
/// The Graph API sometimes returns ids of the form `<media>_<owner>`.
pub fn derive_id(raw_id: &str) -> &str {
    raw_id.split('_').next().unwrap_or(raw_id)
}

pub fn parse_timestamp(timestamp: &str) -> std::result::Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
}

/// Compute id, shortcode and publish date for a record
pub fn derive_post(record: &PostRecord, clock: Clock) -> DerivedPost {
    let id = derive_id(&record.raw_id).to_string();
    let permalink = record.permalink.clone().unwrap_or_default();
    let media_type = record.media_type.clone().unwrap_or_default();

    let shortcode = extract_shortcode(&permalink, &id);
    match shortcode.source {
        ShortcodeSource::Post | ShortcodeSource::Reel => {
            debug!(id = %id, shortcode = %shortcode, "Extracted shortcode from permalink");
        }
        _ if permalink.is_empty() => {
            warn!(id = %id, "Post has no permalink, using ID as shortcode");
        }
        ShortcodeSource::PathTail => {
            warn!(
                id = %id,
                permalink = %permalink,
                media_type = %media_type,
                shortcode = %shortcode,
                "Unrecognised permalink, using last path segment as shortcode"
            );
        }
        ShortcodeSource::Fallback => {
            warn!(
                id = %id,
                permalink = %permalink,
                media_type = %media_type,
                "Could not extract shortcode from permalink, using ID"
            );
        }
    }

    let (published, timestamp_recovered) = match parse_timestamp(&record.timestamp) {
        Ok(published) => (published, false),
        Err(e) => {
            warn!(id = %id, timestamp = %record.timestamp, error = %e, "Unparseable timestamp, using current time");
            (clock(), true)
        }
    };

    DerivedPost {
        id,
        shortcode,
        published,
        timestamp_recovered,
        permalink,
        media_type,
    }
}

/// Hugo content for a post
pub fn render_post(post: &DerivedPost) -> String {
    format!(
        "---\n\
         date: {date}\n\
         draft: false\n\
         tags:\n  - instagram\n\
         instagram_id: {id}\n\
         instagram_permalink: {permalink}\n\
         media_type: {media_type}\n\
         shortcode: {shortcode}\n\
         ---\n\
         \n\
         {{{{< instagram {shortcode} >}}}}\n",
        date = post.published.format("%Y-%m-%dT%H:%M:%S%:z"),
        id = post.id,
        permalink = post.permalink,
        media_type = post.media_type,
        shortcode = post.shortcode,
    )
}

/// `{YYYY-MM-DD}-{id}.md`
pub fn file_name(post: &DerivedPost) -> String {
    format!("{}-{}.md", post.published.format("%Y-%m-%d"), post.id)
}

/// Writes content files into one output directory
pub struct PostExporter {
    out_dir: PathBuf,
    clock: Clock,
}

impl PostExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            clock: local_now,
        }
    }

    /// Use `clock` instead of the local time for unparseable timestamps
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Write the content file for `record` and return its path
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Write` if the file cannot be written.
    pub fn export(&self, record: &PostRecord) -> Result<PathBuf> {
        debug!(
            raw_id = %record.raw_id,
            permalink = record.permalink.as_deref().unwrap_or_default(),
            timestamp = %record.timestamp,
            media_type = record.media_type.as_deref().unwrap_or_default(),
            media_url = record.media_url.as_deref().unwrap_or_default(),
            "Processing post"
        );

        let post = derive_post(record, self.clock);
        let path = self.out_dir.join(file_name(&post));

        std::fs::write(&path, render_post(&post)).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), shortcode = %post.shortcode, "Created post");
        Ok(path)
    }
}
