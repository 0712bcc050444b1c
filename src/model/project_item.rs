use chrono::{DateTime, Utc};

use super::field_value::FieldValue;

/// Issue metadata linked to a project item. Non-issue content (drafts,
/// pull requests) leaves everything empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueContent {
    pub title: String,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub body: String,
    pub assignees: Vec<String>,
    pub labels: Vec<String>,
}

/// A project item as fetched, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProjectItem {
    pub id: String,
    pub fields: Vec<FieldValue>,
    pub content: IssueContent,
}

/// One page of items. `has_more` is set when the board holds more items
/// than a single page returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPage {
    pub items: Vec<RawProjectItem>,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub description: String,
    pub assignees: Vec<String>,
    pub labels: Vec<String>,
    /// Empty when no qualifying text field was found.
    pub recipient: String,
    pub bounty_amount: String,
    pub bounty_symbol: String,
}
