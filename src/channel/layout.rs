//! Static per-channel layout table
//!
//! Column positions, accepted column counts, table selectors and the catalog
//! source for every channel. The extractor is a single loop driven by these
//! descriptors; adding a channel is a data change here.

use super::Channel;

/// A field of an approval record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Seq,
    Name,
    Catalog,
    Publisher,
    Operator,
    ApprovalNumber,
    Isbn,
    ChangeInfo,
    RevokeInfo,
    Date,
}

impl Field {
    /// Every field in record order
    pub const ALL: [Field; 10] = [
        Self::Seq,
        Self::Name,
        Self::Catalog,
        Self::Publisher,
        Self::Operator,
        Self::ApprovalNumber,
        Self::Isbn,
        Self::ChangeInfo,
        Self::RevokeInfo,
        Self::Date,
    ];

    /// Column header as printed on the bulletin tables
    pub fn label(&self) -> &'static str {
        match self {
            Self::Seq => "序号",
            Self::Name => "名称",
            Self::Catalog => "申报类别",
            Self::Publisher => "出版单位",
            Self::Operator => "运营单位",
            Self::ApprovalNumber => "文号",
            Self::Isbn => "出版物号",
            Self::ChangeInfo => "变更信息",
            Self::RevokeInfo => "撤销信息",
            Self::Date => "时间",
        }
    }
}

/// Whether a channel's table carries an ISBN column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsbnColumn {
    /// The channel never has an ISBN column
    Absent,
    /// Some bulletins include the ISBN column, some omit it
    Optional,
    /// Every row has an ISBN column
    Required,
}

/// Where the catalog value of a row comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// The catalog cell's visible text
    Cell,
    /// The row's inline `var _sblb = '<value>';` script, falling back to the
    /// cell text when the row has no script
    Script,
}

/// Selectors for one entry of a listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingSelectors {
    /// Container of a single listing entry
    pub entry: &'static str,
    /// Title link inside the entry
    pub link: &'static str,
    /// Date label, searched in the entry's parent
    pub date: &'static str,
}

/// All channels share the site's listing template
pub const LISTING_SELECTORS: ListingSelectors = ListingSelectors {
    entry: "div.ellipsis",
    link: "a",
    date: "span",
};

/// Block rendered in place of the listing when the page number does not exist
pub const NOT_FOUND_MARKER: &str = "div.g-font-size-140.g-font-size-100--2xs.g-line-height-1.g-mb-10";

const TABLE: &str = "table.tableOrder";
const STRICT_TABLE: &str = "table.trStyle.tableOrder";

/// Layout rules for one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLayout {
    pub channel: Channel,
    pub listing: ListingSelectors,
    /// Selector of the approval table on a detail page
    pub table_selector: &'static str,
    /// Column order of the widest accepted row, ISBN included when present
    pub columns: &'static [Field],
    pub isbn: IsbnColumn,
    pub catalog: CatalogSource,
}

static LAYOUTS: [ChannelLayout; 5] = [
    ChannelLayout {
        channel: Channel::ImportOnlineGame,
        listing: LISTING_SELECTORS,
        table_selector: STRICT_TABLE,
        columns: &[
            Field::Seq,
            Field::Name,
            Field::Catalog,
            Field::Publisher,
            Field::Operator,
            Field::ApprovalNumber,
            Field::Isbn,
            Field::Date,
        ],
        isbn: IsbnColumn::Optional,
        catalog: CatalogSource::Script,
    },
    ChannelLayout {
        channel: Channel::ImportElectronicGame,
        listing: LISTING_SELECTORS,
        table_selector: TABLE,
        columns: &[
            Field::Seq,
            Field::Name,
            Field::Publisher,
            Field::ApprovalNumber,
            Field::Date,
        ],
        isbn: IsbnColumn::Absent,
        catalog: CatalogSource::Cell,
    },
    ChannelLayout {
        channel: Channel::MadeInChinaOnlineGame,
        listing: LISTING_SELECTORS,
        table_selector: STRICT_TABLE,
        columns: &[
            Field::Seq,
            Field::Name,
            Field::Catalog,
            Field::Publisher,
            Field::Operator,
            Field::ApprovalNumber,
            Field::Isbn,
            Field::Date,
        ],
        isbn: IsbnColumn::Optional,
        catalog: CatalogSource::Script,
    },
    ChannelLayout {
        channel: Channel::GameChanged,
        listing: LISTING_SELECTORS,
        table_selector: TABLE,
        columns: &[
            Field::Seq,
            Field::Name,
            Field::Catalog,
            Field::Publisher,
            Field::Operator,
            Field::ChangeInfo,
            Field::ApprovalNumber,
            Field::Isbn,
            Field::Date,
        ],
        isbn: IsbnColumn::Optional,
        catalog: CatalogSource::Cell,
    },
    ChannelLayout {
        channel: Channel::GameRevoked,
        listing: LISTING_SELECTORS,
        table_selector: TABLE,
        columns: &[
            Field::Seq,
            Field::Name,
            Field::Catalog,
            Field::Publisher,
            Field::Operator,
            Field::RevokeInfo,
            Field::ApprovalNumber,
            Field::Isbn,
            Field::Date,
        ],
        isbn: IsbnColumn::Required,
        catalog: CatalogSource::Cell,
    },
];

pub(super) fn lookup(channel: Channel) -> &'static ChannelLayout {
    match channel {
        Channel::ImportOnlineGame => &LAYOUTS[0],
        Channel::ImportElectronicGame => &LAYOUTS[1],
        Channel::MadeInChinaOnlineGame => &LAYOUTS[2],
        Channel::GameChanged => &LAYOUTS[3],
        Channel::GameRevoked => &LAYOUTS[4],
    }
}

impl ChannelLayout {
    /// Fewest cells a data row may have
    pub fn min_columns(&self) -> usize {
        match self.isbn {
            IsbnColumn::Optional => self.columns.len() - 1,
            IsbnColumn::Absent | IsbnColumn::Required => self.columns.len(),
        }
    }

    /// Most cells a data row may have
    pub fn max_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if a row with `cells` cells matches this layout
    pub fn accepts(&self, cells: usize) -> bool {
        cells == self.max_columns() || cells == self.min_columns()
    }

    /// Returns the field assignment for a row with `cells` cells
    ///
    /// Rows without the optional ISBN column map the remaining cells in the
    /// same order with the ISBN position removed.
    pub fn fields_for(&self, cells: usize) -> Option<Vec<Field>> {
        if cells == self.max_columns() {
            Some(self.columns.to_vec())
        } else if cells == self.min_columns() {
            Some(
                self.columns
                    .iter()
                    .copied()
                    .filter(|f| *f != Field::Isbn)
                    .collect(),
            )
        } else {
            None
        }
    }

    /// Returns true if items of this channel may carry `field`
    pub fn defines(&self, field: Field) -> bool {
        self.columns.contains(&field)
    }

    /// Human readable accepted column count, e.g. `7 or 8`
    pub fn expected_columns(&self) -> String {
        if self.min_columns() == self.max_columns() {
            self.max_columns().to_string()
        } else {
            format!("{} or {}", self.min_columns(), self.max_columns())
        }
    }
}
