use pageflow_preview::{PreviewRequest, generate_token, validate_token};
use pageflow_types::ContentId;
use pretty_assertions::assert_eq;

#[test]
fn parses_key_and_content_id() {
    let request = PreviewRequest::from_query("?previewkey=abc&ContentID=42");
    assert_eq!(request.preview_key.as_deref(), Some("abc"));
    assert_eq!(request.content_id, Some(ContentId::new(42)));
    assert_eq!(request.slug, None);
}

#[test]
fn lowercase_content_id_is_fallback() {
    let request = PreviewRequest::from_query("previewkey=abc&contentID=7");
    assert_eq!(request.content_id, Some(ContentId::new(7)));

    let both = PreviewRequest::from_query("previewkey=abc&contentID=7&ContentID=9");
    assert_eq!(both.content_id, Some(ContentId::new(9)));
}

#[test]
fn non_positive_content_id_is_dropped() {
    let request = PreviewRequest::from_query("previewkey=abc&ContentID=-1");
    assert_eq!(request.content_id, None);
    let garbage = PreviewRequest::from_query("previewkey=abc&ContentID=x");
    assert_eq!(garbage.content_id, None);
}

#[test]
fn empty_key_is_absent() {
    let request = PreviewRequest::from_query("previewkey=");
    assert_eq!(request.preview_key, None);
    assert_eq!(request.redirect_url("/api/preview", "/"), None);
}

#[test]
fn unescaped_plus_decodes_to_space_and_still_validates() {
    let token = generate_token("secret");
    assert!(token.as_str().contains('+'));

    // Sender forgot to escape the token.
    let request = PreviewRequest::from_query(&format!("previewkey={}", token.as_str()));
    let received = request.preview_key.unwrap();
    assert!(received.contains(' '));
    assert_eq!(validate_token(Some(&received), "secret"), Ok(()));
}

#[test]
fn redirect_url_roundtrips_through_query() {
    let token = generate_token("secret");
    let request = PreviewRequest {
        slug: None,
        preview_key: Some(token.as_str().to_string()),
        content_id: Some(ContentId::new(15)),
    };

    let url = request.redirect_url("/api/preview", "/blog/post").unwrap();
    assert!(url.starts_with("/api/preview?slug=%2Fblog%2Fpost&previewkey="));
    assert!(url.ends_with("&ContentID=15"));

    let (_, query) = url.split_once('?').unwrap();
    let parsed = PreviewRequest::from_query(query);
    assert_eq!(parsed.slug.as_deref(), Some("/blog/post"));
    assert_eq!(parsed.preview_key.as_deref(), Some(token.as_str()));
    assert_eq!(parsed.content_id, Some(ContentId::new(15)));
}

#[test]
fn redirect_url_omits_missing_content_id() {
    let request = PreviewRequest::from_query("previewkey=abc");
    let url = request.redirect_url("/api/preview", "/").unwrap();
    assert_eq!(url, "/api/preview?slug=%2F&previewkey=abc");
}
