/// A single custom field value attached to a project item.
///
/// Exactly one kind is populated per field, decided by how the field is
/// configured on the board.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    SingleSelect(String),
    Text(String),
    Number(f64),
}
