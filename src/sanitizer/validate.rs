//! Per-route validation predicates for prerendered artifacts.
//!
//! Both predicates treat unreadable content as invalid rather than as an
//! error: a file that cannot be read cannot be shipped either way, and the
//! cleanup pass must keep going regardless of the cause.

use std::fs;
use std::path::Path;

use memchr::memmem;
use serde::Serialize;
use serde_json::Value;

/// Substring whose presence is required: an opening `<title` tag.
const TITLE_OPEN: &[u8] = b"<title";
/// Literal closing tag, required in full.
const TITLE_CLOSE: &[u8] = b"</title>";
/// Known build-defect signature: a mangled closing title tag.
const CORRUPTED_MARKER: &[u8] = b"?/title>";

/// Read a file as UTF-8 text, mapping every I/O fault to "absent".
#[must_use]
pub fn read_text(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// Why an `.html` artifact failed validation. Reports the first failing
/// check in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HtmlFault {
    /// File missing or unreadable.
    Unreadable,
    /// No `<title` opening tag anywhere in the document.
    MissingTitleOpen,
    /// No literal `</title>` closing tag.
    MissingTitleClose,
    /// The `?/title>` corruption signature is present.
    CorruptedMarker,
}

impl HtmlFault {
    /// Stable label used in audit records and JSON payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unreadable => "unreadable",
            Self::MissingTitleOpen => "missing_title_open",
            Self::MissingTitleClose => "missing_title_close",
            Self::CorruptedMarker => "corrupted_marker",
        }
    }
}

/// Why a `.meta` artifact failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaFault {
    /// File missing or unreadable.
    Unreadable,
    /// Content is not a single well-formed JSON value.
    Syntax,
    /// Parsed value is not a JSON object.
    NonObjectRoot,
    /// Object has no `headers` property.
    MissingHeaders,
    /// `headers` is present but not an object.
    NonObjectHeaders,
}

impl MetaFault {
    /// Stable label used in audit records and JSON payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unreadable => "unreadable",
            Self::Syntax => "syntax",
            Self::NonObjectRoot => "non_object_root",
            Self::MissingHeaders => "missing_headers",
            Self::NonObjectHeaders => "non_object_headers",
        }
    }
}

/// Validate prerendered HTML content.
///
/// Valid content contains `<title` and the literal `</title>` closing tag,
/// and does not contain the `?/title>` corruption signature.
#[must_use]
pub fn check_html(content: Option<&str>) -> Option<HtmlFault> {
    let Some(text) = content else {
        return Some(HtmlFault::Unreadable);
    };
    let bytes = text.as_bytes();
    if memmem::find(bytes, TITLE_OPEN).is_none() {
        return Some(HtmlFault::MissingTitleOpen);
    }
    if memmem::find(bytes, TITLE_CLOSE).is_none() {
        return Some(HtmlFault::MissingTitleClose);
    }
    if memmem::find(bytes, CORRUPTED_MARKER).is_some() {
        return Some(HtmlFault::CorruptedMarker);
    }
    None
}

/// Validate serialized response metadata.
///
/// Valid content parses as a single JSON object carrying a `headers`
/// property whose value is itself an object.
#[must_use]
pub fn check_meta(content: Option<&str>) -> Option<MetaFault> {
    let Some(text) = content else {
        return Some(MetaFault::Unreadable);
    };
    let Ok(parsed) = serde_json::from_str::<Value>(text) else {
        return Some(MetaFault::Syntax);
    };
    let Some(root) = parsed.as_object() else {
        return Some(MetaFault::NonObjectRoot);
    };
    match root.get("headers") {
        None => Some(MetaFault::MissingHeaders),
        Some(headers) if headers.is_object() => None,
        Some(_) => Some(MetaFault::NonObjectHeaders),
    }
}

/// Combined verdict for one route's artifact set.
///
/// The `.rsc` member is never inspected; the verdict is computed from the
/// HTML and metadata alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteVerdict {
    /// HTML fault, if any.
    pub html: Option<HtmlFault>,
    /// Metadata fault, if any.
    pub meta: Option<MetaFault>,
}

impl RouteVerdict {
    /// Judge both text contents at once.
    #[must_use]
    pub fn judge(html: Option<&str>, meta: Option<&str>) -> Self {
        Self {
            html: check_html(html),
            meta: check_meta(meta),
        }
    }

    /// Whether the artifact set can be shipped as-is.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.html.is_none() && self.meta.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GOOD_HTML: &str = "<html><head><title>Settings</title></head><body></body></html>";
    const GOOD_META: &str = r#"{"status":200,"headers":{"x-powered-by":"prerender"}}"#;

    #[test]
    fn wellformed_html_passes() {
        assert_eq!(check_html(Some(GOOD_HTML)), None);
    }

    #[test]
    fn html_with_attributes_on_title_passes() {
        // `<title` is a prefix match; attribute forms still count.
        let html = r#"<title data-rh="true">Worlds</title>"#;
        assert_eq!(check_html(Some(html)), None);
    }

    #[test]
    fn unreadable_html_is_invalid() {
        assert_eq!(check_html(None), Some(HtmlFault::Unreadable));
    }

    #[test]
    fn html_without_title_open_is_invalid() {
        assert_eq!(
            check_html(Some("<html><body>no head</body></html>")),
            Some(HtmlFault::MissingTitleOpen)
        );
    }

    #[test]
    fn html_without_title_close_is_invalid() {
        assert_eq!(
            check_html(Some("<html><title>unterminated</html>")),
            Some(HtmlFault::MissingTitleClose)
        );
    }

    #[test]
    fn corrupted_marker_overrides_wellformed_tags() {
        // Both tags present, but the defect signature also appears.
        let html = "<html><title>S</title><p>?/title></p></html>";
        assert_eq!(check_html(Some(html)), Some(HtmlFault::CorruptedMarker));
    }

    #[test]
    fn marker_without_close_reports_missing_close_first() {
        // Checks run in order: the mangled tag means no literal close tag.
        let html = "<html><title>?/title></html>";
        assert_eq!(check_html(Some(html)), Some(HtmlFault::MissingTitleClose));
    }

    #[test]
    fn wellformed_meta_passes() {
        assert_eq!(check_meta(Some(GOOD_META)), None);
    }

    #[test]
    fn empty_headers_object_passes() {
        assert_eq!(check_meta(Some(r#"{"headers":{}}"#)), None);
    }

    #[test]
    fn unreadable_meta_is_invalid() {
        assert_eq!(check_meta(None), Some(MetaFault::Unreadable));
    }

    #[test]
    fn malformed_json_is_invalid() {
        assert_eq!(check_meta(Some("{not json")), Some(MetaFault::Syntax));
    }

    #[test]
    fn non_object_roots_are_invalid() {
        for raw in ["null", "42", "\"headers\"", "[{\"headers\":{}}]"] {
            assert_eq!(
                check_meta(Some(raw)),
                Some(MetaFault::NonObjectRoot),
                "raw: {raw}"
            );
        }
    }

    #[test]
    fn missing_headers_is_invalid() {
        assert_eq!(
            check_meta(Some(r#"{"status":200}"#)),
            Some(MetaFault::MissingHeaders)
        );
    }

    #[test]
    fn non_object_headers_are_invalid() {
        for raw in [
            r#"{"headers":null}"#,
            r#"{"headers":[]}"#,
            r#"{"headers":"x"}"#,
            r#"{"headers":200}"#,
        ] {
            assert_eq!(
                check_meta(Some(raw)),
                Some(MetaFault::NonObjectHeaders),
                "raw: {raw}"
            );
        }
    }

    #[test]
    fn verdict_requires_both_sides_clean() {
        assert!(RouteVerdict::judge(Some(GOOD_HTML), Some(GOOD_META)).is_valid());
        assert!(!RouteVerdict::judge(Some(GOOD_HTML), Some("{not json")).is_valid());
        assert!(!RouteVerdict::judge(None, Some(GOOD_META)).is_valid());
        assert!(!RouteVerdict::judge(None, None).is_valid());
    }

    proptest! {
        // Plain prose never contains the required tags, so it never ships.
        #[test]
        fn html_without_tags_never_validates(body in "[a-zA-Z0-9 .,]{0,256}") {
            prop_assert!(check_html(Some(&body)).is_some());
        }

        // Wrapping any tag-free text in a title element always ships.
        #[test]
        fn titled_document_always_validates(text in "[a-zA-Z0-9 .,]{0,128}") {
            let html = format!("<html><head><title>{text}</title></head></html>");
            prop_assert_eq!(check_html(Some(&html)), None);
        }

        // Any object with an object-valued `headers` key validates, no
        // matter what else the metadata carries.
        #[test]
        fn meta_with_object_headers_always_validates(
            key in "[a-z]{1,12}",
            value in "[a-zA-Z0-9]{0,24}",
        ) {
            // The sibling key is prefixed so it can never shadow `headers`.
            let meta = serde_json::json!({
                "headers": { (key.clone()): value.clone() },
                (format!("x_{key}")): value,
            });
            prop_assert_eq!(check_meta(Some(&meta.to_string())), None);
        }

        // A scalar root never validates regardless of its value.
        #[test]
        fn scalar_meta_never_validates(n in proptest::num::i64::ANY) {
            let raw = n.to_string();
            prop_assert_eq!(check_meta(Some(&raw)), Some(MetaFault::NonObjectRoot));
        }
    }
}
