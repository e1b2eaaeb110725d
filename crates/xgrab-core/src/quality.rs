use url::Url;

/// Rewrite a photo URL to request the original-quality variant.
///
/// Twitter media URLs select quality via query parameters; replacing the
/// query with `format=jpg&name=orig` asks for the untouched original. The
/// caller probes the rewritten URL and falls back if it does not exist.
/// Unparseable input is returned unchanged.
pub fn with_original_quality(photo_url: &str) -> String {
    match Url::parse(photo_url) {
        Ok(mut url) => {
            url.set_query(Some("format=jpg&name=orig"));
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => photo_url.to_string(),
    }
}
