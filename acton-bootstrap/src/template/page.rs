//! Page metadata derived from the request path

use inflector::Inflector;
use std::ffi::OsStr;
use std::path::Path;

/// Human-readable page name and category
///
/// # Examples
///
/// ```rust
/// use acton_bootstrap::template::PageMeta;
///
/// let meta = PageMeta::from_request_path("/course-tools/grade_report.php?term=fall");
/// assert_eq!(meta.name, "Grade Report");
/// assert_eq!(meta.category, "Course Tools");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageMeta {
    /// Title-cased file name of the page, without extension
    pub name: String,
    /// Title-cased name of the directory holding the page
    pub category: String,
}

impl PageMeta {
    /// Derive metadata from a request path such as `/forms/my-page.php?x=1`
    #[must_use]
    pub fn from_request_path(request_path: &str) -> Self {
        let path = request_path.split(['?', '#']).next().unwrap_or_default();
        let path = Path::new(path);

        let name = path
            .file_stem()
            .and_then(OsStr::to_str)
            .map(humanize)
            .unwrap_or_default();
        let category = path
            .parent()
            .and_then(Path::file_name)
            .and_then(OsStr::to_str)
            .map(humanize)
            .unwrap_or_default();

        Self { name, category }
    }
}

fn humanize(segment: &str) -> String {
    let decoded = urlencoding::decode(segment)
        .map_or_else(|_| segment.to_string(), std::borrow::Cow::into_owned);
    decoded.replace(['-', '_'], " ").to_title_case()
}
