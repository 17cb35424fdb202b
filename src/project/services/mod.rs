//! Application services for template instantiation.

mod instantiation;

pub use instantiation::{
    InstantiateTemplateRequest, TemplateInstantiationError, TemplateInstantiationResult,
    TemplateInstantiationService,
};
