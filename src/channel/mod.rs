//! Bulletin channels and their page layouts
//!
//! The bulletin site publishes five channels. Each one shares the listing page
//! template but renders its approval table with a different set of columns,
//! which is described once in the layout table and nowhere else.

mod layout;

pub use layout::{
    CatalogSource, ChannelLayout, Field, IsbnColumn, ListingSelectors, LISTING_SELECTORS,
    NOT_FOUND_MARKER,
};

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five fixed bulletin channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    /// 进口网络游戏审批信息
    #[serde(rename = "jkwlyxspxx")]
    ImportOnlineGame,

    /// 进口电子游戏审批信息
    #[serde(rename = "jkdzyxspxx")]
    ImportElectronicGame,

    /// 国产网络游戏审批信息
    #[serde(rename = "gcwlyxspxx")]
    MadeInChinaOnlineGame,

    /// 游戏审批变更信息
    #[serde(rename = "yxspbgxx")]
    GameChanged,

    /// 游戏审批撤销信息
    #[serde(rename = "yxspcxxx")]
    GameRevoked,
}

impl Channel {
    /// All channels in their canonical iteration order
    pub const ALL: [Channel; 5] = [
        Channel::ImportOnlineGame,
        Channel::ImportElectronicGame,
        Channel::MadeInChinaOnlineGame,
        Channel::GameChanged,
        Channel::GameRevoked,
    ];

    /// The site's path code for this channel
    pub fn code(&self) -> &'static str {
        match self {
            Self::ImportOnlineGame => "jkwlyxspxx",
            Self::ImportElectronicGame => "jkdzyxspxx",
            Self::MadeInChinaOnlineGame => "gcwlyxspxx",
            Self::GameChanged => "yxspbgxx",
            Self::GameRevoked => "yxspcxxx",
        }
    }

    /// The bulletin type name as printed on the site
    pub fn chinese_name(&self) -> &'static str {
        match self {
            Self::ImportOnlineGame => "进口网络游戏审批信息",
            Self::ImportElectronicGame => "进口电子游戏审批信息",
            Self::MadeInChinaOnlineGame => "国产网络游戏审批信息",
            Self::GameChanged => "游戏审批变更信息",
            Self::GameRevoked => "游戏审批撤销信息",
        }
    }

    /// Looks up a channel by its path code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Returns the layout rules for this channel
    pub fn layout(&self) -> &'static ChannelLayout {
        layout::lookup(*self)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Channel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s.trim()).ok_or_else(|| ConfigError::UnknownChannel(s.to_string()))
    }
}
