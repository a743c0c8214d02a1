use serde_json::Value;
use url::Url;

/// Recursion cap for the `.logo` branch. The self-reference guard already
/// stops direct cycles; the cap bounds pathological nesting.
const MAX_LOGO_DEPTH: usize = 4;

/// Turns a heterogeneous media field into an absolute URL. Pure, no I/O,
/// never errors: anything unrecognized resolves to None.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    base_url: String,
    fallback_url: String,
}

impl MediaResolver {
    pub fn new(base_url: impl Into<String>, fallback_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            fallback_url: fallback_url.into(),
        }
    }

    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }

    /// Resolution precedence, first match wins:
    /// 1. plain string path
    /// 2. `.url`
    /// 3. `.data.attributes.url`
    /// 4. `.attributes.url`
    /// 5. `.data` non-empty array -> first element's `attributes.url`
    /// 6. `.hash` + `.name` -> `/uploads/{hash}_{name}`
    /// 7. `.logo` distinct from self -> recurse
    /// 8. `.src`
    pub fn resolve(&self, reference: &Value) -> Option<String> {
        self.resolve_at_depth(reference, 0)
    }

    fn resolve_at_depth(&self, reference: &Value, depth: usize) -> Option<String> {
        if let Value::String(s) = reference {
            return clean(s).map(|path| self.join_base(path));
        }

        let obj = reference.as_object()?;

        if let Some(url) = string_at(obj.get("url")) {
            return Some(self.join_base(url));
        }

        if let Some(url) = string_at(
            obj.get("data")
                .and_then(|d| d.get("attributes"))
                .and_then(|a| a.get("url")),
        ) {
            return Some(self.join_base(url));
        }

        if let Some(url) = string_at(obj.get("attributes").and_then(|a| a.get("url"))) {
            return Some(self.join_base(url));
        }

        if let Some(Value::Array(items)) = obj.get("data") {
            if let Some(url) = string_at(
                items
                    .first()
                    .and_then(|first| first.get("attributes"))
                    .and_then(|a| a.get("url")),
            ) {
                return Some(self.join_base(url));
            }
        }

        if let (Some(hash), Some(name)) = (string_at(obj.get("hash")), string_at(obj.get("name"))) {
            return Some(self.join_base(&format!("/uploads/{}_{}", hash, name)));
        }

        if let Some(logo) = obj.get("logo") {
            // Guard against a field pointing back at its own container.
            if logo != reference && depth < MAX_LOGO_DEPTH {
                if let Some(url) = self.resolve_at_depth(logo, depth + 1) {
                    return Some(url);
                }
            }
        }

        if let Some(src) = string_at(obj.get("src")) {
            return Some(self.join_base(src));
        }

        None
    }

    /// Prefixes the content host onto relative paths; already-absolute URLs
    /// pass through unchanged.
    pub fn join_base(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match Url::parse(&self.base_url).and_then(|base| base.join(path)) {
            Ok(joined) => joined.to_string(),
            Err(_) => format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
        }
    }
}

fn string_at(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).and_then(clean)
}

fn clean(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver() -> MediaResolver {
        MediaResolver::new("https://cms.example.com", "/images/logo-fallback.svg")
    }

    #[test]
    fn test_resolve_plain_string_path() {
        assert_eq!(
            resolver().resolve(&json!("/uploads/a.png")),
            Some("https://cms.example.com/uploads/a.png".to_string())
        );
        assert_eq!(
            resolver().resolve(&json!("  /uploads/b.png  ")),
            Some("https://cms.example.com/uploads/b.png".to_string())
        );
        assert_eq!(resolver().resolve(&json!("   ")), None);
    }

    #[test]
    fn test_resolve_url_field() {
        assert_eq!(
            resolver().resolve(&json!({"url": "/uploads/a.png"})),
            Some("https://cms.example.com/uploads/a.png".to_string())
        );
    }

    #[test]
    fn test_resolve_data_attributes_url() {
        let reference = json!({"data": {"attributes": {"url": "/uploads/nested.png"}}});
        assert_eq!(
            resolver().resolve(&reference),
            Some("https://cms.example.com/uploads/nested.png".to_string())
        );
    }

    #[test]
    fn test_resolve_attributes_url() {
        let reference = json!({"attributes": {"url": "/uploads/attr.png"}});
        assert_eq!(
            resolver().resolve(&reference),
            Some("https://cms.example.com/uploads/attr.png".to_string())
        );
    }

    #[test]
    fn test_resolve_data_array_first_element() {
        let reference = json!({"data": [
            {"attributes": {"url": "/uploads/first.png"}},
            {"attributes": {"url": "/uploads/second.png"}}
        ]});
        assert_eq!(
            resolver().resolve(&reference),
            Some("https://cms.example.com/uploads/first.png".to_string())
        );

        assert_eq!(resolver().resolve(&json!({"data": []})), None);
    }

    #[test]
    fn test_resolve_hash_and_name() {
        let reference = json!({"hash": "logo_abc123", "name": "logo.png"});
        assert_eq!(
            resolver().resolve(&reference),
            Some("https://cms.example.com/uploads/logo_abc123_logo.png".to_string())
        );

        // Only one of the pair is not enough.
        assert_eq!(resolver().resolve(&json!({"hash": "h"})), None);
    }

    #[test]
    fn test_resolve_nested_logo() {
        let reference = json!({"logo": {"url": "/uploads/inner.png"}});
        assert_eq!(
            resolver().resolve(&reference),
            Some("https://cms.example.com/uploads/inner.png".to_string())
        );
    }

    #[test]
    fn test_resolve_self_referential_logo_terminates() {
        // {logo: <value equal to the container>} must not recurse forever.
        let inner = json!({"logo": {"logo": {}}});
        let reference = json!({"logo": inner});
        assert_eq!(resolver().resolve(&reference), None);

        let direct = json!({"logo": {"logo": {"logo": {"logo": {"logo": {"logo": "x"}}}}}});
        // Deeply nested chains are cut off by the depth cap, not a panic.
        let _ = resolver().resolve(&direct);
    }

    #[test]
    fn test_resolve_src_field() {
        assert_eq!(
            resolver().resolve(&json!({"src": "/uploads/src.png"})),
            Some("https://cms.example.com/uploads/src.png".to_string())
        );
    }

    #[test]
    fn test_resolve_unrecognized_shapes_return_none() {
        assert_eq!(resolver().resolve(&json!(null)), None);
        assert_eq!(resolver().resolve(&json!(42)), None);
        assert_eq!(resolver().resolve(&json!({"unrelated": true})), None);
        assert_eq!(resolver().resolve(&json!([1, 2, 3])), None);
    }

    #[test]
    fn test_resolve_precedence_url_wins() {
        let reference = json!({
            "url": "/uploads/primary.png",
            "src": "/uploads/ignored.png",
            "hash": "h", "name": "n"
        });
        assert_eq!(
            resolver().resolve(&reference),
            Some("https://cms.example.com/uploads/primary.png".to_string())
        );
    }

    #[test]
    fn test_join_base_passes_absolute_urls_through() {
        assert_eq!(
            resolver().resolve(&json!("https://cdn.example.net/a.png")),
            Some("https://cdn.example.net/a.png".to_string())
        );
    }

    #[test]
    fn test_join_base_handles_trailing_slash() {
        let resolver = MediaResolver::new("https://cms.example.com/", "/fb.svg");
        assert_eq!(
            resolver.join_base("/uploads/a.png"),
            "https://cms.example.com/uploads/a.png"
        );
        assert_eq!(
            resolver.join_base("uploads/a.png"),
            "https://cms.example.com/uploads/a.png"
        );
    }
}
