use crate::error::Error;
use itertools::Itertools;
use std::io::ErrorKind;
use std::path::Path;

/// Loads candidate labels from a newline-separated UTF-8 file.
///
/// Lines are trimmed, blank lines dropped, and repeated labels kept only at
/// their first position so no name is ever queried twice.
pub fn load_labels(path: &Path) -> Result<Vec<String>, Error> {
    let contents = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => Error::WordlistNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::WordlistUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(parse_labels(&contents))
}

pub fn parse_labels(contents: &str) -> Vec<String> {
    normalize(contents.lines())
}

/// Trims, drops blanks and removes repeats, keeping first-seen order.
pub fn normalize<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .unique()
        .map(String::from)
        .collect()
}
