//! Onboarding wizard — template selection, domain checks, configuration,
//! signing and launch of a new DAO.
//!
//! The [`OnboardingController`] owns all wizard state. A rendering layer
//! reads [`WizardView`] snapshots and calls the controller's handlers;
//! templates come from a [`TemplateRegistry`](crate::templates::TemplateRegistry),
//! name lookups from a [`NameAvailability`] implementation, and side effects go
//! to an [`OnboardingHost`].

pub mod controller;
pub mod domain;
pub mod host;
pub mod lifecycle;
pub mod state;
pub mod steps;
pub mod timers;

pub use controller::{
    ControllerEvent, FieldUpdate, OnboardingController, TemplateSummary, TimerKey, WizardView,
};
pub use domain::{DomainField, MAX_DOMAIN_LENGTH, NameAvailability, StaticNameRegistry, normalize_domain};
pub use host::{NoopHost, OnboardingHost};
pub use lifecycle::Visibility;
pub use state::{DaoCreationStatus, Direction, DomainCheckStatus, WizardState};
pub use steps::{Screen, Step, StepGroup, compute_steps};
pub use timers::TimerSet;
