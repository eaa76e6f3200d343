use std::{fs, path::Path};

use anyhow::Context;

/// Marker preceding the publication identifier in a ScienceDirect URL path.
const PII_MARKER: &str = "pii/";

/// Read `path` and return every PII found in it, in line order.
///
/// A line carries an identifier only when splitting it on `pii/` yields
/// exactly two fragments; the trimmed second fragment is the identifier.
/// Lines without the marker (or with more than one) are skipped silently.
/// Duplicates are kept.
pub fn extract_pub_ids(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("could not find file {}", path.display()))?;

    Ok(contents
        .lines()
        .filter_map(|line| {
            let mut fragments = line.trim().splitn(3, PII_MARKER);
            let _head = fragments.next()?;
            let id = fragments.next()?;
            // A third fragment means the marker appeared twice; not a link we
            // know how to read.
            match fragments.next() {
                None => Some(id.trim().to_string()),
                Some(_) => None,
            }
        })
        .collect())
}
