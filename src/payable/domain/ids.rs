//! Identifier types for the payable domain.

uuid_identifier! {
    /// Unique identifier for an obligation record.
    pub struct AccountPayableId;
}

uuid_identifier! {
    /// Unique identifier for a supplier.
    pub struct SupplierId;
}

uuid_identifier! {
    /// Unique identifier for an expense classification.
    pub struct ExpenseClassificationId;
}

uuid_identifier! {
    /// Unique identifier for an obligation history row.
    pub struct AccountPayableHistoryId;
}
