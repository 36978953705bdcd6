//! Feed validation against the W3C feed validator.
//!
//! The generated feed is posted as form data with `output=soap12` and the
//! verdict is read from the SOAP response:
//!
//! ```xml
//! <m:feedvalidationresponse>
//!   <m:validity>false</m:validity>
//!   <m:errors>
//!     <m:errorcount>1</m:errorcount>
//!     <m:errorlist><error><line>23</line><text>Missing ...</text></error></m:errorlist>
//!   </m:errors>
//!   <m:warnings><m:warningcount>0</m:warningcount></m:warnings>
//! </m:feedvalidationresponse>
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use reqwest::header::CONTENT_TYPE;

use crate::config::SiteConfig;
use crate::log;

/// Characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Issue {
    pub line: Option<u32>,
    pub text: String,
}

/// Parsed validator response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verdict {
    pub valid: bool,
    pub errors: Vec<Issue>,
    pub warnings: usize,
}

/// Validate `path` (default `[feed].path`) and log the verdict.
///
/// Returns whether the feed is valid. Request and parse failures are errors.
pub fn validate(config: &SiteConfig, path: Option<&Path>) -> Result<bool> {
    let path = path.unwrap_or(&config.feed.path);
    let feed = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed {}", path.display()))?;

    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let response = client
        .post(&config.feed.validator)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(request_body(&feed))
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .context("feed validation request failed")?;

    let verdict = parse_response(&response)?;
    let shown = config.root_relative(path);
    if verdict.valid {
        log!("feed"; "{} is valid ({} warnings)", shown.display(), verdict.warnings);
    } else {
        log!("feed"; "{} is invalid", shown.display());
        for issue in &verdict.errors {
            match issue.line {
                Some(line) => eprintln!("- line {line}: {}", issue.text),
                None => eprintln!("- {}", issue.text),
            }
        }
    }
    Ok(verdict.valid)
}

/// Form body the validator's SOAP interface expects.
pub fn request_body(feed: &str) -> String {
    format!(
        "manual=1&output=soap12&rawdata={}",
        utf8_percent_encode(feed, COMPONENT)
    )
}

/// Read the verdict out of a SOAP 1.2 validator response.
pub fn parse_response(xml: &str) -> Result<Verdict> {
    let mut reader = Reader::from_str(xml);

    let mut verdict = Verdict::default();
    let mut validity = None;
    let mut in_error = false;
    let mut issue = Issue::default();
    // text of the innermost open element; entity references split it up
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                text.clear();
                if e.local_name().as_ref() == b"error" {
                    in_error = true;
                    issue = Issue::default();
                }
            }
            Ok(Event::Text(t)) => text.push_str(&t.decode()?),
            Ok(Event::CData(t)) => text.push_str(&t.decode()?),
            Ok(Event::GeneralRef(r)) => {
                if let Some(ch) = r.resolve_char_ref()? {
                    text.push(ch);
                } else {
                    let name = r.decode()?;
                    match resolve_predefined_entity(&name) {
                        Some(value) => text.push_str(value),
                        None => bail!("unknown entity `&{name};` in validator response"),
                    }
                }
            }
            Ok(Event::End(e)) => {
                let value = text.trim();
                match e.local_name().as_ref() {
                    b"validity" => validity = Some(value == "true"),
                    b"warningcount" => verdict.warnings = value.parse().unwrap_or(0),
                    b"line" if in_error => issue.line = value.parse().ok(),
                    b"text" if in_error => issue.text.push_str(value),
                    b"error" if in_error => {
                        verdict.errors.push(std::mem::take(&mut issue));
                        in_error = false;
                    }
                    _ => {}
                }
                text.clear();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => bail!(
                "validator response parse error at position {}: {:?}",
                reader.error_position(),
                e
            ),
        }
    }

    let Some(valid) = validity else {
        bail!("validator response has no m:validity element");
    };
    verdict.valid = valid;
    Ok(verdict)
}
