//! URL handling for the bulletin site
//!
//! The site has used several URL schemes over time. A deployment picks one:
//!
//! | Scheme | Listing | Detail |
//! |--------|---------|--------|
//! | `Section` | `<base><channel>/index[_N].html` | `<base><channel>/<yyyymm>/<id>.html` |
//! | `Aggregate` | `<base>index[_N].html` | `<base><channel>/<yyyymm>/<id>.html` |
//! | `Channels` | `<origin>/nppa/channels/<cid>[_N].shtml` | `<origin>/nppa/contents/<cid>/<id>.shtml` |
//!
//! `Aggregate` walks one listing shared by all channels. Under `Section` and
//! `Aggregate` stub URLs are stored relative to the base, so the first path
//! segment is the channel code. Under `Channels` stub URLs are stored
//! fully qualified and the channel is found through the numeric channel id.

mod document;

pub use document::{document_id, page_suffix};

use crate::channel::Channel;
use crate::{UrlError, UrlResult};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// One paginated listing of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listing {
    /// The listing of a single channel
    Channel(Channel),
    /// The listing shared by every channel
    Aggregate,
}

impl From<Channel> for Listing {
    fn from(channel: Channel) -> Self {
        Self::Channel(channel)
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(channel) => write!(f, "{}", channel),
            Self::Aggregate => write!(f, "aggregate"),
        }
    }
}

/// A listing href resolved into stub identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Normalised URL as stored on the stub
    pub url: String,
    pub channel: Channel,
    pub id: String,
}

/// The URL scheme used by a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlScheme {
    Section {
        base: Url,
    },
    Aggregate {
        base: Url,
    },
    Channels {
        origin: Url,
        ids: BTreeMap<Channel, String>,
    },
}

impl UrlScheme {
    /// Creates a section scheme rooted at `base`
    ///
    /// A missing trailing slash is added so relative joins stay inside the
    /// section.
    pub fn section(base: &str) -> UrlResult<Self> {
        Ok(Self::Section {
            base: section_base(base)?,
        })
    }

    /// Creates a scheme walking the shared listing of the section at `base`
    pub fn aggregate(base: &str) -> UrlResult<Self> {
        Ok(Self::Aggregate {
            base: section_base(base)?,
        })
    }

    /// Creates a numeric-channel scheme on the origin of `site`
    pub fn channels(site: &str, ids: BTreeMap<Channel, String>) -> UrlResult<Self> {
        let mut origin = Url::parse(site).map_err(|e| UrlError::Parse(e.to_string()))?;
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);
        Ok(Self::Channels { origin, ids })
    }

    /// Returns the listings to walk for `channels`, in walk order
    pub fn listings(&self, channels: &[Channel]) -> Vec<Listing> {
        match self {
            Self::Aggregate { .. } => vec![Listing::Aggregate],
            Self::Section { .. } | Self::Channels { .. } => {
                channels.iter().copied().map(Listing::Channel).collect()
            }
        }
    }

    /// Builds the URL of page `page` (zero-based) of `listing`
    pub fn listing_url(&self, listing: impl Into<Listing>, page: u32) -> UrlResult<Url> {
        let listing = listing.into();
        let suffix = page_suffix(page);
        let joined = match (self, listing) {
            (Self::Section { base }, Listing::Channel(channel)) => {
                base.join(&format!("{}/index{}.html", channel.code(), suffix))
            }
            (Self::Aggregate { base }, Listing::Aggregate) => {
                base.join(&format!("index{}.html", suffix))
            }
            (Self::Channels { origin, ids }, Listing::Channel(channel)) => {
                let cid = ids
                    .get(&channel)
                    .ok_or(UrlError::MissingChannelId(channel))?;
                origin.join(&format!("nppa/channels/{}{}.shtml", cid, suffix))
            }
            (_, listing) => return Err(UrlError::UnsupportedListing(listing)),
        };
        joined.map_err(|e| UrlError::Parse(e.to_string()))
    }

    /// Resolves a listing entry href found on `listing`
    pub fn locate(&self, listing: &Url, href: &str) -> UrlResult<Located> {
        let href = href.trim();
        let absolute = listing
            .join(href)
            .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

        match self {
            Self::Section { base } | Self::Aggregate { base } => {
                let relative = absolute
                    .path()
                    .strip_prefix(base.path())
                    .filter(|_| absolute.origin() == base.origin())
                    .ok_or_else(|| UrlError::OutsideBase {
                        url: absolute.to_string(),
                        base: base.to_string(),
                    })?;

                let code = relative.split('/').next().unwrap_or_default();
                let channel = Channel::from_code(code)
                    .ok_or_else(|| UrlError::UnknownChannel(relative.to_string()))?;
                let id = document_id(relative)?;

                Ok(Located {
                    url: relative.to_string(),
                    channel,
                    id,
                })
            }
            Self::Channels { origin, ids } => {
                if absolute.origin() != origin.origin() {
                    return Err(UrlError::OutsideBase {
                        url: absolute.to_string(),
                        base: origin.to_string(),
                    });
                }

                let segments: Vec<&str> = absolute.path().split('/').collect();
                let cid = segments
                    .iter()
                    .position(|s| *s == "contents")
                    .and_then(|i| segments.get(i + 1))
                    .ok_or_else(|| UrlError::UnknownChannel(absolute.to_string()))?;
                let channel = ids
                    .iter()
                    .find(|(_, id)| id.as_str() == *cid)
                    .map(|(channel, _)| *channel)
                    .ok_or_else(|| UrlError::UnknownChannel(absolute.to_string()))?;
                let id = document_id(absolute.path())?;

                Ok(Located {
                    url: absolute.to_string(),
                    channel,
                    id,
                })
            }
        }
    }

    /// Builds the detail page URL of a stored stub URL
    pub fn detail_url(&self, stub_url: &str) -> UrlResult<Url> {
        let root = match self {
            Self::Section { base } | Self::Aggregate { base } => base,
            Self::Channels { origin, .. } => origin,
        };
        root.join(stub_url)
            .map_err(|e| UrlError::Parse(format!("{}: {}", stub_url, e)))
    }
}

/// Parses a section base, adding a missing trailing slash so relative joins
/// stay inside the section
fn section_base(base: &str) -> UrlResult<Url> {
    let mut base = Url::parse(base).map_err(|e| UrlError::Parse(e.to_string()))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}
