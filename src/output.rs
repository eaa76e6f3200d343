use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Serialize `value` as pretty-printed JSON to `<folder>/<name>.json`.
///
/// The folder (and any missing parents) is created on demand; an empty
/// folder means the current directory. `name` is sanitised first, so a
/// caller-supplied title can be used directly.
pub fn write_json<T: Serialize + ?Sized>(
    folder: &str,
    name: &str,
    value: &T,
) -> anyhow::Result<PathBuf> {
    let filename = format!("{}.json", valid_filename(name)?);

    let folder = if folder.is_empty() {
        Path::new(".")
    } else {
        Path::new(folder)
    };
    fs::create_dir_all(folder)
        .with_context(|| format!("could not create folder {}", folder.display()))?;

    let path = folder.join(filename);
    let json = serde_json::to_string_pretty(value).context("could not serialise to JSON")?;
    fs::write(&path, json).with_context(|| format!("could not write {}", path.display()))?;
    Ok(path)
}

static INVALID_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^-\w.]").unwrap());

/// Turn an arbitrary string into something safe to use as a filename:
/// trim, spaces to underscores, then drop everything that is not
/// alphanumeric, a hyphen, an underscore, or a dot.
pub fn valid_filename(name: &str) -> anyhow::Result<String> {
    let s = name.trim().replace(' ', "_");
    let s = INVALID_FILENAME_CHARS.replace_all(&s, "").into_owned();
    if s.is_empty() || s == "." || s == ".." {
        anyhow::bail!("could not derive file name from '{name}'");
    }
    Ok(s)
}
