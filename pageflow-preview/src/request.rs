//! The preview handshake query.
//!
//! An editor opens a page with `?previewkey=...` (and `ContentID=...` for
//! dynamic pages). That query is forwarded to the preview route, which
//! validates the key and switches the session into preview mode.

use pageflow_types::ContentId;
use url::form_urlencoded;

/// Query parameter carrying the preview token.
pub const PREVIEW_KEY_PARAM: &str = "previewkey";

/// Parameters of a preview request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewRequest {
    /// Page path the preview should land on.
    pub slug: Option<String>,
    /// Token as received. May contain spaces where the sender had `+`.
    pub preview_key: Option<String>,
    /// Bound content item for dynamic pages.
    pub content_id: Option<ContentId>,
}

impl PreviewRequest {
    /// Reads the request from a URL query string (with or without the leading `?`).
    ///
    /// `ContentID` wins over `contentID`; non-positive or unparsable IDs are dropped.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut request = Self::default();
        let mut lower_content_id = None;

        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match name.as_ref() {
                "slug" => request.slug = Some(value),
                PREVIEW_KEY_PARAM => request.preview_key = Some(value),
                "ContentID" => request.content_id = parse_content_id(&value),
                "contentID" => lower_content_id = parse_content_id(&value),
                _ => {}
            }
        }

        if request.content_id.is_none() {
            request.content_id = lower_content_id;
        }
        request.preview_key = request.preview_key.filter(|k| !k.is_empty());
        request
    }

    /// Builds the URL that forwards this request to `route` for `pathname`.
    ///
    /// Returns `None` when no preview key is present; such requests are not
    /// preview requests at all.
    #[must_use]
    pub fn redirect_url(&self, route: &str, pathname: &str) -> Option<String> {
        let key = self.preview_key.as_deref()?;

        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("slug", pathname);
        query.append_pair(PREVIEW_KEY_PARAM, key);
        if let Some(content_id) = self.content_id {
            query.append_pair("ContentID", &content_id.to_string());
        }

        Some(format!("{route}?{}", query.finish()))
    }
}

fn parse_content_id(value: &str) -> Option<ContentId> {
    value
        .parse::<ContentId>()
        .ok()
        .filter(ContentId::is_bound)
}
