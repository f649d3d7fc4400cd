//! Generators for the numeric categories ("Intle" and "Floatle").

use rand::Rng;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::entities::{CategoryImport, WordImport};

/// Words generated per category unless asked otherwise.
pub const DEFAULT_WORD_COUNT: usize = 10_000;

const MAX_NUMBER: u32 = 1_000_000;

/// `count` random integers in `0..=1_000_000`.
pub fn generate_intle<R: Rng + ?Sized>(rng: &mut R, count: usize) -> CategoryImport {
    let words = (0..count)
        .map(|_| WordImport::plain(rng.random_range(0..=MAX_NUMBER).to_string()))
        .collect();

    numeric_category("Intle", words)
}

/// `count` random decimals, each hinted with its number of decimal places.
pub fn generate_floatle<R: Rng + ?Sized>(rng: &mut R, count: usize) -> CategoryImport {
    let words = (0..count)
        .map(|_| {
            let digits = rng.random_range(0..=MAX_NUMBER).to_string();
            let point = rng.random_range(1..=digits.len());
            let text = float_text(&digits, point);
            let hint = decimal_places_hint(&text);
            WordImport {
                word: text,
                hint,
                hint_long: None,
            }
        })
        .collect();

    numeric_category("Floatle", words)
}

fn numeric_category(name: &str, words: Vec<WordImport>) -> CategoryImport {
    CategoryImport {
        name: name.to_string(),
        must_hint: false,
        must_present: false,
        words,
    }
}

/// Places a decimal point after `point` digits and renders the result as the
/// shortest float text.
///
/// A single digit `d` always becomes `0.d`. The rendered value always
/// contains a point: `"123."` becomes `123.0` and `"1.050"` becomes `1.05`.
pub fn float_text(digits: &str, point: usize) -> String {
    let raw = if digits.len() == 1 {
        format!("0.{digits}")
    } else {
        let point = point.clamp(1, digits.len());
        format!("{}.{}", &digits[..point], &digits[point..])
    };

    match raw.parse::<f64>() {
        Ok(value) => {
            let mut text = value.to_string();
            if !text.contains('.') {
                text.push_str(".0");
            }
            text
        }
        Err(_) => raw,
    }
}

/// `"1 decimal place"` / `"{n} decimal places"`, or `None` without a point.
pub fn decimal_places_hint(text: &str) -> Option<String> {
    let (_, fraction) = text.split_once('.')?;
    let places = fraction.len();
    let suffix = if places == 1 { "" } else { "s" };
    Some(format!("{places} decimal place{suffix}"))
}

/// Writes `import` as `{dir}/{lowercased name}.json` and returns the path.
pub fn write_import(dir: &Path, import: &CategoryImport) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(import.file_name());
    let file = std::fs::File::create(&path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, import)?;
    writer.flush()?;
    Ok(path)
}
