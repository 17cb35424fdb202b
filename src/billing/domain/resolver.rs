//! Ordered resolution of identities from an entry's links.

/// Candidate values for one identity, in fixed precedence order.
///
/// [`IdentitySources::resolve`] returns the first present value in this
/// order: `explicit`, `project`, `proposal`, `client`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentitySources<T> {
    /// Value supplied by the caller.
    pub explicit: Option<T>,
    /// Value taken from the linked project.
    pub project: Option<T>,
    /// Value taken from the linked proposal.
    pub proposal: Option<T>,
    /// Value taken from the linked client.
    pub client: Option<T>,
}

impl<T> Default for IdentitySources<T> {
    fn default() -> Self {
        Self {
            explicit: None,
            project: None,
            proposal: None,
            client: None,
        }
    }
}

impl<T: Copy> IdentitySources<T> {
    /// Returns the first present candidate.
    #[must_use]
    pub fn resolve(&self) -> Option<T> {
        self.explicit
            .or(self.project)
            .or(self.proposal)
            .or(self.client)
    }
}

#[cfg(test)]
mod tests {
    use super::IdentitySources;
    use rstest::rstest;

    #[rstest]
    #[case(Some(1), Some(2), Some(3), Some(4), Some(1))]
    #[case(None, Some(2), Some(3), Some(4), Some(2))]
    #[case(None, None, Some(3), Some(4), Some(3))]
    #[case(None, None, None, Some(4), Some(4))]
    #[case(None, None, None, None, None)]
    fn resolve_returns_first_present_value(
        #[case] explicit: Option<u8>,
        #[case] project: Option<u8>,
        #[case] proposal: Option<u8>,
        #[case] client: Option<u8>,
        #[case] expected: Option<u8>,
    ) {
        let sources = IdentitySources {
            explicit,
            project,
            proposal,
            client,
        };
        assert_eq!(sources.resolve(), expected);
    }
}
