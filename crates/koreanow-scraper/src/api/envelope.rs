//! Streaming parse of the policy news XML envelope.
//!
//! Expected layout:
//!
//! ```text
//! <response>
//!   <header><resultCode>00</resultCode><resultMsg>…</resultMsg></header>
//!   <body><NewsItem><Title>…</Title>…</NewsItem>…</body>
//! </response>
//! ```

use std::collections::HashMap;

use koreanow_core::{DEFAULT_AUTHOR, UNTITLED};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ScraperError;
use crate::types::NewsRecord;

const HEADER_TAG: &str = "header";
const BODY_TAG: &str = "body";
const ITEM_TAG: &str = "NewsItem";
const RESULT_CODE_TAG: &str = "resultCode";
const RESULT_MSG_TAG: &str = "resultMsg";

/// Result codes the API uses for success.
const SUCCESS_CODES: &[&str] = &["00", "0"];

/// Child elements of one `<NewsItem>`, keyed by tag name.
pub type RawItem = HashMap<String, String>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub result_code: Option<String>,
    pub result_msg: Option<String>,
    /// `None` when the document has no `<body>` element at all.
    pub items: Option<Vec<RawItem>>,
}

impl Envelope {
    /// A missing `<resultCode>` counts as success; an empty one does not.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result_code
            .as_deref()
            .is_none_or(|code| SUCCESS_CODES.contains(&code.trim()))
    }
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Parses the API response body.
///
/// Only direct children of the root are inspected: `header` for the result
/// code and message, `body` for `NewsItem` records. Text and CDATA content
/// are both accepted and concatenated per element.
///
/// # Errors
///
/// Returns [`ScraperError::Xml`] when the document is not well-formed.
pub fn parse_envelope(xml: &str) -> Result<Envelope, ScraperError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut envelope = Envelope::default();
    let mut path: Vec<String> = Vec::new();
    let mut current: Option<RawItem> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(e.local_name().as_ref());
                path.push(name);
                on_open(&path, &mut envelope, &mut current);
            }
            Event::Empty(e) => {
                let name = local_name(e.local_name().as_ref());
                path.push(name);
                on_open(&path, &mut envelope, &mut current);
                on_close(&path, &mut envelope, &mut current);
                path.pop();
            }
            Event::End(_) => {
                on_close(&path, &mut envelope, &mut current);
                path.pop();
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map(std::borrow::Cow::into_owned)
                    .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                on_text(&path, &text, &mut envelope, current.as_mut());
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                on_text(&path, &text, &mut envelope, current.as_mut());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(envelope)
}

fn on_open(path: &[String], envelope: &mut Envelope, current: &mut Option<RawItem>) {
    match path {
        [_, body] if body == BODY_TAG => {
            envelope.items.get_or_insert_with(Vec::new);
        }
        [_, body, item] if body == BODY_TAG && item == ITEM_TAG => {
            *current = Some(RawItem::new());
        }
        [_, header, field] if header == HEADER_TAG && field == RESULT_CODE_TAG => {
            envelope.result_code.get_or_insert_with(String::new);
        }
        _ => {}
    }
}

fn on_close(path: &[String], envelope: &mut Envelope, current: &mut Option<RawItem>) {
    if let [_, body, item] = path {
        if body == BODY_TAG && item == ITEM_TAG {
            if let (Some(fields), Some(items)) = (current.take(), envelope.items.as_mut()) {
                items.push(fields);
            }
        }
    }
}

fn on_text(path: &[String], text: &str, envelope: &mut Envelope, current: Option<&mut RawItem>) {
    match path {
        [_, header, field] if header == HEADER_TAG => {
            let slot = match field.as_str() {
                RESULT_CODE_TAG => &mut envelope.result_code,
                RESULT_MSG_TAG => &mut envelope.result_msg,
                _ => return,
            };
            slot.get_or_insert_with(String::new).push_str(text);
        }
        [_, body, item, field] if body == BODY_TAG && item == ITEM_TAG => {
            if let Some(fields) = current {
                fields.entry(field.clone()).or_default().push_str(text);
            }
        }
        _ => {}
    }
}

fn first_non_blank(fields: &RawItem, tags: &[&str]) -> Option<String> {
    tags.iter()
        .filter_map(|tag| fields.get(*tag))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_owned)
}

impl NewsRecord {
    /// Maps raw `NewsItem` fields onto a record, applying defaults for
    /// missing title and author. `ApproveDate` is preferred over `ModifyDate`.
    #[must_use]
    pub fn from_fields(fields: &RawItem) -> Self {
        Self {
            title: first_non_blank(fields, &["Title"]).unwrap_or_else(|| UNTITLED.to_owned()),
            link: first_non_blank(fields, &["OriginalUrl"]).unwrap_or_default(),
            summary: first_non_blank(fields, &["DataContents"]).unwrap_or_default(),
            pub_date: first_non_blank(fields, &["ApproveDate", "ModifyDate"]).unwrap_or_default(),
            author: first_non_blank(fields, &["ApproverName"])
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_owned()),
        }
    }
}
