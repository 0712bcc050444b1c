pub mod field_value;
pub mod project_item;

pub use field_value::FieldValue;
pub use project_item::{IssueContent, ItemPage, ProjectItem, RawProjectItem};
