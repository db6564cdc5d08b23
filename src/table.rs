//! Search / sort / pagination state for dashboard tables.
//!
//! State only changes through [`TableState::reduce`], which takes the old
//! state and an action and returns the new one. [`TableState::apply`] turns a
//! state plus the full row set into the visible page.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::UnifiedOrder;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

pub trait TableRow {
    type Column: Copy + PartialEq;

    /// `needle` is already lowercased and non-empty.
    fn matches(&self, needle: &str) -> bool;

    fn compare(&self, other: &Self, column: Self::Column) -> Ordering;
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableAction<K> {
    SetSearch(String),
    SortBy(K),
    SetSort(K, SortDirection),
    NextPage,
    PrevPage,
    GoToPage(usize),
    SetPageSize(usize),
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableState<K> {
    pub search: String,
    pub sort: Option<(K, SortDirection)>,
    pub page: usize,
    pub page_size: usize,
}

impl<K> Default for TableState<K> {
    fn default() -> Self {
        TableState {
            search: String::new(),
            sort: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage<T> {
    pub rows: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
}

impl<K: Copy + PartialEq> TableState<K> {
    pub fn reduce(self, action: TableAction<K>) -> Self {
        match action {
            TableAction::SetSearch(text) => TableState {
                search: text.trim().to_string(),
                page: 0,
                ..self
            },
            TableAction::SortBy(key) => {
                let sort = match self.sort {
                    Some((current, dir)) if current == key => (key, dir.flip()),
                    _ => (key, SortDirection::Asc),
                };
                TableState {
                    sort: Some(sort),
                    page: 0,
                    ..self
                }
            }
            TableAction::SetSort(key, dir) => TableState {
                sort: Some((key, dir)),
                page: 0,
                ..self
            },
            TableAction::NextPage => TableState {
                page: self.page.saturating_add(1),
                ..self
            },
            TableAction::PrevPage => TableState {
                page: self.page.saturating_sub(1),
                ..self
            },
            TableAction::GoToPage(page) => TableState { page, ..self },
            TableAction::SetPageSize(size) => TableState {
                page_size: size.max(1),
                page: 0,
                ..self
            },
            TableAction::Reset => TableState::default(),
        }
    }

    /// Filters, sorts and slices `rows`. A page past the end shows the last page.
    pub fn apply<T>(&self, rows: &[T]) -> TablePage<T>
    where
        T: TableRow<Column = K> + Clone,
    {
        let needle = self.search.to_lowercase();
        let mut visible: Vec<&T> = rows
            .iter()
            .filter(|r| needle.is_empty() || r.matches(&needle))
            .collect();

        if let Some((column, dir)) = self.sort {
            visible.sort_by(|a, b| {
                let ord = a.compare(b, column);
                match dir {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let page_size = self.page_size.max(1);
        let total_rows = visible.len();
        let total_pages = total_rows.div_ceil(page_size).max(1);
        let page = self.page.min(total_pages - 1);

        let rows = visible
            .into_iter()
            .skip(page * page_size)
            .take(page_size)
            .cloned()
            .collect();

        TablePage {
            rows,
            page,
            page_size,
            total_rows,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderColumn {
    Timestamp,
    Total,
    Tips,
    Status,
    Source,
}

impl OrderColumn {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "timestamp" | "time" | "date" => Some(OrderColumn::Timestamp),
            "total" => Some(OrderColumn::Total),
            "tips" => Some(OrderColumn::Tips),
            "status" => Some(OrderColumn::Status),
            "source" | "sourcetype" => Some(OrderColumn::Source),
            _ => None,
        }
    }
}

impl TableRow for UnifiedOrder {
    type Column = OrderColumn;

    fn matches(&self, needle: &str) -> bool {
        self.id.to_lowercase().contains(needle)
            || self.status.as_str().contains(needle)
            || self.source_type.as_str().contains(needle)
            || self
                .items
                .iter()
                .any(|i| i.name.to_lowercase().contains(needle))
    }

    fn compare(&self, other: &Self, column: OrderColumn) -> Ordering {
        match column {
            OrderColumn::Timestamp => self.timestamp.cmp(&other.timestamp),
            OrderColumn::Total => self.total.total_cmp(&other.total),
            OrderColumn::Tips => self.tips.total_cmp(&other.tips),
            OrderColumn::Status => self.status.as_str().cmp(other.status.as_str()),
            OrderColumn::Source => self.source_type.as_str().cmp(other.source_type.as_str()),
        }
    }
}
