use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::{config::Defaults, output};

/// Link relation tag marking the canonical ScienceDirect URL.
const CANONICAL_REL: &str = "scidir";

/// Raw records that fail transformation are dumped to
/// `failed_article.json` for inspection.
const DIAGNOSTIC_NAME: &str = "failed_article";

/// One article in the shape the knowledge base ingests.
#[derive(Debug, Serialize)]
pub struct TargetRecord {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub permission: String,
    pub authors: Vec<String>,
    #[serde(rename = "mediaType")]
    pub media_type: String,
    pub tags: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub metadata: Metadata,
    pub created: Created,
    #[serde(rename = "createdBy")]
    pub created_by: Option<String>,
    pub updated: String,
    #[serde(rename = "isDeleted")]
    pub is_deleted: bool,
    pub original: Vec<Value>,
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub url: Option<String>,
}

/// Creation timestamp in the extended-JSON date shape the store expects.
#[derive(Debug, Serialize)]
pub struct Created {
    #[serde(rename = "$date")]
    pub date: NumberLong,
}

#[derive(Debug, Serialize)]
pub struct NumberLong {
    #[serde(rename = "$numberLong")]
    pub number_long: String,
}

impl Created {
    fn now() -> Self {
        Created {
            date: NumberLong {
                number_long: Utc::now().timestamp_millis().to_string(),
            },
        }
    }
}

/// Map one unwrapped source record into a [`TargetRecord`].
///
/// A missing required key inside `coredata` dumps the offending record to
/// `failed_article.json` before failing, so the raw payload survives for
/// manual inspection.
pub fn transform_article(article: &Value, defaults: &Defaults) -> anyhow::Result<TargetRecord> {
    match build_record(article, defaults) {
        Ok(record) => Ok(record),
        Err(e) => {
            // Diagnostic dump only; the original error is what gets reported.
            let _ = output::write_json("", DIAGNOSTIC_NAME, article);
            Err(e)
        }
    }
}

fn build_record(article: &Value, defaults: &Defaults) -> anyhow::Result<TargetRecord> {
    let coredata = article
        .get("coredata")
        .and_then(Value::as_object)
        .ok_or_else(|| anyhow::anyhow!("key error: 'coredata'"))?;

    Ok(TargetRecord {
        title: string_field(coredata.get("dc:title")),
        thumbnail: defaults.thumbnail.map(str::to_string),
        description: string_field(coredata.get("dc:description")),
        permission: defaults.permission.to_string(),
        authors: authors(coredata.get("dc:creator"))?,
        media_type: defaults.media_type.to_string(),
        tags: defaults.tags.to_string(),
        kind: defaults.kind.to_string(),
        metadata: Metadata {
            url: canonical_url(coredata.get("link"))?,
        },
        created: Created::now(),
        created_by: defaults.created_by.map(str::to_string),
        updated: defaults.updated.to_string(),
        is_deleted: defaults.is_deleted,
        original: vec![article.clone()],
        published_date: coredata
            .get("prism:coverDate")
            .and_then(Value::as_str)
            .and_then(standard_date),
    })
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// The `@href` of the *last* link entry tagged with the canonical relation.
/// The scan deliberately does not short-circuit on the first match.
fn canonical_url(links: Option<&Value>) -> anyhow::Result<Option<String>> {
    let Some(links) = links.and_then(Value::as_array) else {
        return Ok(None);
    };

    let mut url = None;
    for link in links {
        let rel = link
            .get("@rel")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("key error: '@rel'"))?;
        if rel == CANONICAL_REL {
            let href = link
                .get("@href")
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow::anyhow!("key error: '@href'"))?;
            url = Some(href.to_string());
        }
    }
    Ok(url)
}

fn authors(creators: Option<&Value>) -> anyhow::Result<Vec<String>> {
    let Some(creators) = creators.and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    creators
        .iter()
        .map(|creator| {
            creator
                .get("$")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("key error: '$'"))
        })
        .collect()
}

/// Normalise a free-form cover date to `YYYY-MM-DD`.
///
/// Tries a ladder of formats, most common first; anything unparseable comes
/// back as `None` rather than an error.
pub fn standard_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.format("%Y-%m-%d").to_string());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc2822(raw) {
        return Some(dt.format("%Y-%m-%d").to_string());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.format("%Y-%m-%d").to_string());
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%B %d, %Y", "%d-%m-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d.format("%Y-%m-%d").to_string());
        }
    }
    None
}
