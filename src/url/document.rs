use crate::{UrlError, UrlResult};

/// Returns the listing page suffix for a zero-based page index
///
/// The first page has no suffix; page `N` is published as `index_N`.
pub fn page_suffix(page: u32) -> String {
    if page == 0 {
        String::new()
    } else {
        format!("_{}", page)
    }
}

/// Derives a document id from a URL path
///
/// The id is the basename of the last path segment with its extension
/// removed, e.g. `jkwlyxspxx/202401/t20240110_1.html` → `t20240110_1`.
pub fn document_id(path: &str) -> UrlResult<String> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let basename = path
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| UrlError::MissingDocumentId(path.to_string()))?;

    let id = match basename.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => basename,
    };

    if id.is_empty() {
        return Err(UrlError::MissingDocumentId(path.to_string()));
    }
    Ok(id.to_string())
}
