//! DAO templates: the fields, configure screens and data preparation each
//! organization kind contributes to the onboarding wizard.

pub mod builtin;
pub mod registry;
pub mod template;

pub use registry::TemplateRegistry;
pub use template::*;
