//! Page request construction
//!
//! The first request is built from the topic; every later one comes from the
//! registry's own `next` value, appended to the fixed filter parameters
//! without modification.

use url::Url;

/// Where the next page request points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(String);

impl PageCursor {
    /// Cursor for the first page
    pub fn first() -> Self {
        Self("page=1".to_string())
    }

    /// Wraps a registry-supplied `next` value
    pub fn from_next(next: impl Into<String>) -> Self {
        Self(next.into())
    }

    /// The cursor text as received
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Builds the request URL for a page
///
/// The filter parameters are `format=json`, `topic="<topic>"`,
/// `sort=additionDate` and `ord=asc`. A cursor that is itself an absolute
/// URL is used as-is; otherwise it is appended (minus any leading `?`) to
/// the filter parameters.
///
/// # Example
///
/// ```
/// use registry_harvest::registry::{page_url, PageCursor};
///
/// let url = page_url("https://bio.tools/api/tool/", "Proteomics", &PageCursor::first()).unwrap();
/// assert!(url.as_str().ends_with("&page=1"));
/// ```
pub fn page_url(api_url: &str, topic: &str, cursor: &PageCursor) -> Result<Url, url::ParseError> {
    if let Ok(absolute) = Url::parse(cursor.as_str()) {
        return Ok(absolute);
    }

    let mut url = Url::parse(api_url)?;
    url.query_pairs_mut()
        .append_pair("format", "json")
        .append_pair("topic", &format!("\"{}\"", topic))
        .append_pair("sort", "additionDate")
        .append_pair("ord", "asc");

    let fragment = cursor.as_str().trim_start_matches('?');
    if !fragment.is_empty() {
        let query = format!("{}&{}", url.query().unwrap_or_default(), fragment);
        url.set_query(Some(&query));
    }

    Ok(url)
}
