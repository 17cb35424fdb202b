//! Identifier newtypes for parties referenced across bounded contexts.

uuid_identifier! {
    /// Identifier of the company that owns proposals, projects and ledgers.
    pub struct CompanyId;
}

uuid_identifier! {
    /// Identifier of a client the company sells to.
    pub struct ClientId;
}

uuid_identifier! {
    /// Identifier of a user acting on records (owner, approver, rejecter).
    pub struct UserId;
}
