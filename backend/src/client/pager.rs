//! Cursor-based infinite lists and DAO pickers.

use serde_json::{Value, json};

use super::{ClientError, ContributionSummary, ListArgs, ProtocolClient};

pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Contributions fetched page by page. Each request asks for one row more
/// than the page size to learn whether another page exists, and the next
/// request starts at the last row seen (skipping it).
#[derive(Debug)]
pub struct ContributionInfiniteList {
    client: ProtocolClient,
    filter: Option<Value>,
    order_by: Option<Value>,
    page_size: i32,
    pages: Vec<Vec<ContributionSummary>>,
    cursor: Option<i32>,
    has_next_page: bool,
}

impl ContributionInfiniteList {
    pub fn new(client: ProtocolClient, filter: Option<Value>, order_by: Option<Value>, page_size: i32) -> Self {
        Self {
            client,
            filter,
            order_by,
            page_size: page_size.max(1),
            pages: Vec::new(),
            cursor: None,
            has_next_page: true,
        }
    }

    /// `true` until a page comes back short
    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn pages(&self) -> &[Vec<ContributionSummary>] {
        &self.pages
    }

    /// All rows fetched so far, in order
    pub fn items(&self) -> impl Iterator<Item = &ContributionSummary> {
        self.pages.iter().flatten()
    }

    fn next_page_args(&self) -> ListArgs {
        ListArgs {
            filter: self.filter.clone(),
            order_by: self.order_by.clone(),
            cursor: self.cursor,
            take: Some(self.page_size.saturating_add(1)),
            skip: self.cursor.map(|_| 1),
        }
    }

    /// Fetch the next page. Returns `None` once the list is exhausted.
    pub async fn fetch_next_page(&mut self) -> Result<Option<&[ContributionSummary]>, ClientError> {
        if !self.has_next_page {
            return Ok(None);
        }

        let args = self.next_page_args();
        let mut rows = self.client.list_contributions(&args).await?;

        self.has_next_page = rows.len() > self.page_size as usize;
        rows.truncate(self.page_size as usize);
        if let Some(last) = rows.last() {
            self.cursor = Some(last.id);
        }
        if rows.is_empty() {
            self.has_next_page = false;
            return Ok(None);
        }

        self.pages.push(rows);
        Ok(self.pages.last().map(Vec::as_slice))
    }
}

/// Contributions attributed to a DAO, most recent engagement first.
pub fn recent_contributions_for_dao(client: ProtocolClient, dao_id: i32) -> ContributionInfiniteList {
    ContributionInfiniteList::new(
        client,
        Some(json!({
            "guilds": { "some": { "guild": { "is": { "id": { "equals": dao_id } } } } }
        })),
        Some(json!([{ "date_of_engagement": "desc" }])),
        DEFAULT_PAGE_SIZE,
    )
}

/// One entry of a DAO select box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: Option<i32>,
    pub label: String,
}

/// The user's DAOs behind a leading "No DAO" entry.
pub async fn dao_select_options(client: &ProtocolClient, user_id: i32) -> Result<Vec<SelectOption>, ClientError> {
    let daos = client.daos_for_user(user_id).await?;

    let mut options = vec![SelectOption {
        value: None,
        label: "No DAO".to_string(),
    }];
    for dao in daos {
        if options.iter().any(|o| o.value == Some(dao.id)) {
            continue;
        }
        options.push(SelectOption {
            value: Some(dao.id),
            label: dao.name.unwrap_or_default(),
        });
    }
    Ok(options)
}
