//! Listing page walker
//!
//! Reads one page of a listing into lightweight stubs. A page that
//! does not exist is reported as [`ListingPage::NotFound`], which is how
//! pagination ends; it is not an error.

use crate::channel::{LISTING_SELECTORS, NOT_FOUND_MARKER};
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::record::ContentStub;
use crate::url::{Listing, UrlScheme};
use crate::IsbnError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Result of reading one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingPage {
    /// Stubs in listing order
    Entries(Vec<ContentStub>),
    /// The page number is past the end of the listing
    NotFound,
}

/// Walks listing pages of the configured URL scheme
pub struct ListingWalker<'a> {
    fetcher: &'a Fetcher,
    scheme: &'a UrlScheme,
}

impl<'a> ListingWalker<'a> {
    pub fn new(fetcher: &'a Fetcher, scheme: &'a UrlScheme) -> Self {
        Self { fetcher, scheme }
    }

    /// Fetches and parses page `page` (zero-based) of `listing`
    ///
    /// An HTTP 404 for a listing page is treated like the in-page marker.
    pub async fn walk_page(&self, listing: Listing, page: u32) -> Result<ListingPage, IsbnError> {
        let url = self.scheme.listing_url(listing, page)?;

        let body = match self.fetcher.fetch_text(&url).await {
            Ok(body) => body,
            Err(FetchError::Status { status: 404, .. }) => {
                tracing::debug!("{} page {} answered 404", listing, page);
                return Ok(ListingPage::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        parse_listing(&body, &url, self.scheme).map_err(|message| IsbnError::Listing {
            listing,
            page,
            message,
        })
    }
}

/// Parses a listing page fetched from `listing_url`
///
/// # Entry Rules
///
/// - Each `div.ellipsis` is one entry; its first `<a>` gives title and href
/// - The date is the first `<span>` of the entry's parent, brackets removed
/// - The href is normalised through the URL scheme, which also yields the
///   channel and document id
///
/// # Returns
///
/// * `Ok(ListingPage)` - Stubs, or the not-found sentinel
/// * `Err(String)` - An entry did not have the expected structure
pub fn parse_listing(
    html: &str,
    listing_url: &Url,
    scheme: &UrlScheme,
) -> Result<ListingPage, String> {
    let document = Html::parse_document(html);

    let marker = selector(NOT_FOUND_MARKER)?;
    let not_found = document
        .select(&marker)
        .any(|div| div.text().collect::<String>().trim() == "404");
    if not_found {
        return Ok(ListingPage::NotFound);
    }

    let entry_selector = selector(LISTING_SELECTORS.entry)?;
    let link_selector = selector(LISTING_SELECTORS.link)?;
    let date_selector = selector(LISTING_SELECTORS.date)?;

    let mut stubs = Vec::new();
    for entry in document.select(&entry_selector) {
        let link = entry
            .select(&link_selector)
            .next()
            .ok_or_else(|| "listing entry without a link".to_string())?;
        let href = link
            .value()
            .attr("href")
            .ok_or_else(|| "listing link without href".to_string())?;

        let title = link.text().collect::<String>().trim().to_string();
        let title = if title.is_empty() {
            link.value().attr("title").unwrap_or_default().trim().to_string()
        } else {
            title
        };

        let date = entry
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|parent| parent.select(&date_selector).next())
            .map(|span| date_label(&span.text().collect::<String>()))
            .ok_or_else(|| format!("listing entry '{}' without a date label", title))?;

        let located = scheme.locate(listing_url, href).map_err(|e| e.to_string())?;
        stubs.push(ContentStub {
            channel: located.channel,
            id: located.id,
            title,
            url: located.url,
            date,
        });
    }

    Ok(ListingPage::Entries(stubs))
}

/// Strips whitespace and the surrounding brackets of a date label
fn date_label(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '[' || c == ']')
        .trim()
        .to_string()
}

fn selector(s: &str) -> Result<Selector, String> {
    Selector::parse(s).map_err(|e| format!("invalid selector '{}': {:?}", s, e))
}
