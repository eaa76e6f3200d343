use std::collections::BTreeMap;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::Value;
use url::Url;

use crate::{
    config::{ApiConfig, Defaults},
    transform::{self, TargetRecord},
};

const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Top-level wrapper key the API puts around every article payload.
const WRAPPER_KEY: &str = "full-text-retrieval-response";

/// What one pass over the identifier list produced.
///
/// `fatal` carries the error that aborted the batch early, if any; the
/// records and ledger accumulated up to that point are still valid and get
/// written out before the process exits.
pub struct BatchOutcome {
    pub articles: Vec<TargetRecord>,
    pub failed: BTreeMap<String, String>,
    pub fatal: Option<anyhow::Error>,
}

/// Fetch outcomes we care to distinguish. 400 and 404 mean "this one record
/// is bad" and the batch moves on; everything else (auth failure, exhausted
/// quota, network down) is treated as systemic and aborts the run rather
/// than burning through the remaining identifiers.
enum FetchError {
    BadRequest,
    NotFound,
    Other(anyhow::Error),
}

/// Fetch and transform every identifier in order.
pub fn run_batch(config: &ApiConfig, defaults: &Defaults, ids: &[String]) -> BatchOutcome {
    let agent = agent();
    let total = ids.len();

    let mut articles = Vec::new();
    let mut failed = BTreeMap::new();
    let mut fatal = None;

    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template("{pos}/{len} {wide_msg}") {
        pb.set_style(style);
    }

    for (n, id) in ids.iter().enumerate() {
        pb.set_message(format!("Getting article {} of {}", n + 1, total));

        match fetch_record(&agent, config, id) {
            Ok(body) => match body.get(WRAPPER_KEY) {
                Some(record) => match transform::transform_article(record, defaults) {
                    Ok(article) => articles.push(article),
                    Err(_) => {
                        report(&pb, id, "failed to transform data, see failed_article.json");
                        failed.insert(id.clone(), "Failed to transform data".to_string());
                    }
                },
                None => {
                    report(&pb, id, "unable to parse article");
                    failed.insert(id.clone(), format!("Unable to parse article {id}"));
                }
            },
            Err(FetchError::BadRequest) => {
                report(&pb, id, "invalid PII/publication ID");
                failed.insert(id.clone(), "Invalid PII/publication ID".to_string());
            }
            Err(FetchError::NotFound) => {
                report(&pb, id, "resource not found");
                failed.insert(id.clone(), "Resource not found".to_string());
            }
            Err(FetchError::Other(e)) => {
                report(&pb, id, &format!("unable to fetch: {e}"));
                failed.insert(id.clone(), format!("Unable to fetch: {e}"));
                fatal = Some(e.context(format!("unable to fetch article {id}")));
                pb.inc(1);
                break;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    eprintln!(
        "{} {}  {} {}",
        "✓".green(),
        articles.len(),
        "✗".red(),
        failed.len()
    );

    BatchOutcome {
        articles,
        failed,
        fatal,
    }
}

fn agent() -> ureq::Agent {
    let cfg = ureq::Agent::config_builder()
        .timeout_connect(Some(std::time::Duration::from_secs(5)))
        .timeout_global(Some(std::time::Duration::from_secs(30)))
        .build();
    ureq::Agent::new_with_config(cfg)
}

fn report(pb: &ProgressBar, id: &str, message: &str) {
    pb.suspend(|| eprintln!("{} {}: {}", "✗".red(), id, message));
}

/// One GET for one identifier, with the status captured at the point the
/// error is raised so classification never reads a stale response.
fn fetch_record(agent: &ureq::Agent, config: &ApiConfig, id: &str) -> Result<Value, FetchError> {
    let url = request_url(config, id).map_err(FetchError::Other)?;

    let res = match agent.get(url.as_str()).call() {
        Ok(res) => res,
        Err(ureq::Error::StatusCode(400)) => return Err(FetchError::BadRequest),
        Err(ureq::Error::StatusCode(404)) => return Err(FetchError::NotFound),
        Err(e) => return Err(FetchError::Other(e.into())),
    };

    let body = res
        .into_body()
        .read_to_string()
        .map_err(|e| FetchError::Other(e.into()))?;
    serde_json::from_str(&body).map_err(|e| FetchError::Other(e.into()))
}

fn request_url(config: &ApiConfig, id: &str) -> anyhow::Result<Url> {
    let enc_id = utf8_percent_encode(id, PATH_SEGMENT_ENCODE_SET).to_string();
    let mut url = Url::parse(&format!(
        "{}/{}",
        config.base_url.trim_end_matches('/'),
        enc_id
    ))?;
    url.query_pairs_mut()
        .append_pair("apiKey", &config.api_key)
        .append_pair("httpAccept", "application/json");
    Ok(url)
}
