use crate::model::{FieldValue, ProjectItem, RawProjectItem};
use crate::util::amount::format_whole;

/// Single-select status that puts an item on the payment report.
pub const PENDING_PAYMENT: &str = "Pending Payment";
/// Token label for bounties. Text fields ending in it are read as amounts.
pub const BOUNTY_SYMBOL: &str = "BUIDL";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub pending_payment: bool,
    pub recipient: String,
    pub bounty_amount: String,
    pub bounty_symbol: String,
}

impl Classification {
    fn apply(mut self, field: &FieldValue) -> Self {
        match field {
            FieldValue::SingleSelect(name) => {
                if name == PENDING_PAYMENT {
                    self.pending_payment = true;
                }
            }
            FieldValue::Text(text) if !text.is_empty() => self.apply_text(text),
            FieldValue::Text(_) => {}
            FieldValue::Number(value) => {
                if *value > 0.0 {
                    self.bounty_amount = format_whole(*value);
                    self.bounty_symbol = BOUNTY_SYMBOL.to_string();
                }
            }
        }
        self
    }

    fn apply_text(&mut self, text: &str) {
        if text.trim().ends_with(BOUNTY_SYMBOL) {
            // "500 BUIDL" only; "500BUIDL" or "about 500 BUIDL" set nothing.
            let parts: Vec<&str> = text.split_whitespace().collect();
            if let [amount, symbol] = parts.as_slice() {
                self.bounty_amount = amount.to_string();
                self.bounty_symbol = symbol.to_string();
            }
        } else if !text.contains(BOUNTY_SYMBOL) {
            self.recipient = text.to_string();
        }
    }
}

/// Fold an item's field values in order. Later fields overwrite earlier ones.
pub fn classify(fields: &[FieldValue]) -> Classification {
    fields
        .iter()
        .fold(Classification::default(), Classification::apply)
}

/// Classify a fetched item, keeping it only when it is pending payment.
pub fn classify_item(raw: RawProjectItem) -> Option<ProjectItem> {
    let Classification {
        pending_payment,
        recipient,
        bounty_amount,
        bounty_symbol,
    } = classify(&raw.fields);

    if !pending_payment {
        return None;
    }

    let content = raw.content;
    Some(ProjectItem {
        id: raw.id,
        title: content.title,
        url: content.url,
        created_at: content.created_at,
        updated_at: content.updated_at,
        description: content.body,
        assignees: content.assignees,
        labels: content.labels,
        recipient,
        bounty_amount,
        bounty_symbol,
    })
}

/// Classify a page of items, preserving fetch order.
pub fn classify_items(raw: Vec<RawProjectItem>) -> Vec<ProjectItem> {
    raw.into_iter().filter_map(classify_item).collect()
}
