//! Generator for the "Wikipedle" category, sampled from a gzipped dump of
//! Wikipedia page titles (one title per line, as published under
//! `dumps.wikimedia.org/other/pagetitles`).

use flate2::read::GzDecoder;
use rand::Rng;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::domain::entities::{CategoryImport, WordImport};

/// Share of eligible titles kept.
pub const SAMPLE_RATE: f64 = 0.003;

pub const CATEGORY_NAME: &str = "Wikipedle";

/// Result of sampling a dump.
#[derive(Debug, Clone, PartialEq)]
pub struct WikipedleSample {
    pub import: CategoryImport,
    /// Lines read from the dump, blank or not.
    pub lines_read: usize,
}

/// Keeps non-empty ASCII titles with probability `rate`, turning `_` into
/// spaces. The first kept title is dropped.
pub fn sample_titles<B: BufRead, R: Rng + ?Sized>(
    reader: B,
    rng: &mut R,
    rate: f64,
) -> io::Result<WikipedleSample> {
    let mut lines_read = 0;
    let mut words = Vec::new();

    for line in reader.split(b'\n') {
        let line = line?;
        lines_read += 1;

        let title = line.trim_ascii();
        if title.is_empty() || !title.is_ascii() || !rng.random_bool(rate) {
            continue;
        }
        // ASCII checked above.
        let title = String::from_utf8_lossy(title).replace('_', " ");
        words.push(WordImport::plain(title));
    }

    if !words.is_empty() {
        words.remove(0);
    }

    Ok(WikipedleSample {
        import: CategoryImport {
            name: CATEGORY_NAME.to_string(),
            must_hint: false,
            must_present: false,
            words,
        },
        lines_read,
    })
}

/// Samples the gzipped title dump at `path` with [`SAMPLE_RATE`].
pub fn generate_wikipedle<R: Rng + ?Sized>(
    path: &Path,
    rng: &mut R,
) -> io::Result<WikipedleSample> {
    let file = File::open(path)?;
    sample_titles(BufReader::new(GzDecoder::new(file)), rng, SAMPLE_RATE)
}
