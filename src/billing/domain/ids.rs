//! Identifier types for the billing domain.

uuid_identifier! {
    /// Unique identifier for a recorded unit of work.
    pub struct TimeEntryId;
}

uuid_identifier! {
    /// Unique identifier for an invoice.
    pub struct InvoiceId;
}

uuid_identifier! {
    /// Unique identifier for an invoice history row.
    pub struct InvoiceHistoryId;
}
