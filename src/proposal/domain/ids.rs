//! Identifier types for the proposal domain.

uuid_identifier! {
    /// Unique identifier for a commercial proposal.
    pub struct ProposalId;
}
