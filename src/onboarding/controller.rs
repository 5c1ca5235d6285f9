//! OnboardingController — owns the wizard state, sequences steps, runs the
//! debounced domain checks and delegates to templates and the host.
//!
//! Every handler takes `&mut self`; the controller lives on one task. Timers
//! and name lookups run as spawned tasks that post [`ControllerEvent`]s back
//! into the controller's queue, which is drained with
//! [`OnboardingController::process_next`] or
//! [`OnboardingController::process_ready`]. The controller must be used
//! within a tokio runtime.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::OnboardingConfig;
use crate::error::{LookupError, WizardError};
use crate::templates::{Template, TemplateData, TemplateRegistry};

use super::domain::{DomainField, NameAvailability, normalize_domain};
use super::host::OnboardingHost;
use super::lifecycle::Visibility;
use super::state::{DaoCreationStatus, Direction, DomainCheckStatus, WizardState};
use super::steps::{Screen, Step, StepGroup, compute_steps};
use super::timers::TimerSet;

/// Timer slots. One pending timer per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Debounce or retry delay of a domain input.
    DomainCheck(DomainField),
    /// Step forward after the DAO was created.
    AutoAdvance,
}

/// Work posted back to the controller by its timers and lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// The debounce or retry delay for `name` elapsed; time to look it up.
    CheckDue { field: DomainField, name: String },
    /// A name lookup finished.
    LookupResolved {
        field: DomainField,
        name: String,
        result: Result<bool, LookupError>,
    },
    /// The post-creation delay elapsed.
    AutoAdvance,
}

/// Outcome of a field edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    Applied,
    /// The template's filter refused the value; nothing changed.
    Rejected,
}

/// Template entry for the template selection screen.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Snapshot handed to the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub session_id: Uuid,
    pub visibility: Visibility,
    pub render: bool,
    pub steps: Vec<Step>,
    pub step_index: usize,
    pub step: Step,
    pub direction: Direction,
    pub next_enabled: bool,
    pub prev_enabled: bool,
    pub prev_next_visible: bool,
    pub signing_next: bool,
    pub templates: Vec<TemplateSummary>,
    pub template: Option<String>,
    pub fields: TemplateData,
    pub domain: String,
    pub domain_check_status: DomainCheckStatus,
    pub domain_to_open: String,
    pub domain_to_open_check_status: DomainCheckStatus,
    pub dao_creation_status: DaoCreationStatus,
}

/// Drives DAO creation from template selection to launch.
pub struct OnboardingController {
    session_id: Uuid,
    config: OnboardingConfig,
    templates: Arc<TemplateRegistry>,
    names: Arc<dyn NameAvailability>,
    host: Arc<dyn OnboardingHost>,
    state: WizardState,
    visibility: Visibility,
    dao_creation_status: DaoCreationStatus,
    timers: TimerSet<TimerKey>,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
}

impl OnboardingController {
    /// Create a visible wizard with default state.
    ///
    /// Must be called within a tokio runtime: domain checks and the
    /// auto-advance spawn timer tasks on it.
    pub fn new(
        config: OnboardingConfig,
        templates: Arc<TemplateRegistry>,
        names: Arc<dyn NameAvailability>,
        host: Arc<dyn OnboardingHost>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            session_id: Uuid::new_v4(),
            config,
            templates,
            names,
            host,
            state: WizardState::default(),
            visibility: Visibility::initial(true),
            dao_creation_status: DaoCreationStatus::default(),
            timers: TimerSet::new(),
            events_tx,
            events_rx,
        }
    }

    /// Start hidden (not rendered) instead of visible.
    pub fn with_initial_visibility(mut self, visible: bool) -> Self {
        self.visibility = Visibility::initial(visible);
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn dao_creation_status(&self) -> DaoCreationStatus {
        self.dao_creation_status
    }

    /// Number of timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }

    pub fn selected_template(&self) -> Option<Arc<Template>> {
        self.state
            .template
            .as_deref()
            .and_then(|id| self.templates.get(id))
    }

    // ── Steps ───────────────────────────────────────────────────────────

    /// Current step sequence. Recomputed on every call.
    pub fn steps(&self) -> Vec<Step> {
        compute_steps(self.selected_template().as_deref())
    }

    pub fn current_step(&self) -> Step {
        self.steps()
            .get(self.state.step_index)
            .cloned()
            .unwrap_or_else(Step::start)
    }

    /// Move by `delta` steps. Ignored when the target is out of range.
    ///
    /// Entering the sign step submits the DAO creation first.
    pub fn move_step(&mut self, delta: isize) {
        let steps = self.steps();
        let Some(new_index) = self
            .state
            .step_index
            .checked_add_signed(delta)
            .filter(|&i| i < steps.len())
        else {
            debug!(
                session_id = %self.session_id,
                index = self.state.step_index,
                delta,
                "Step move out of range ignored"
            );
            return;
        };

        if steps[new_index].screen == Screen::Sign {
            self.build_dao();
        }

        self.state.step_index = new_index;
        self.state.direction = Direction::from_delta(delta);
        info!(
            session_id = %self.session_id,
            step = %steps[new_index].screen,
            index = new_index,
            "Moved to step"
        );
    }

    pub fn next_step(&mut self) {
        if self.is_next_enabled() {
            self.move_step(1);
        }
    }

    pub fn prev_step(&mut self) {
        if self.is_prev_enabled() {
            self.move_step(-1);
        }
    }

    pub fn is_next_enabled(&self) -> bool {
        match self.current_step().screen {
            Screen::Start | Screen::Template => self.state.template.is_some(),
            Screen::Domain => self.state.domain_check_status == DomainCheckStatus::Accepted,
            Screen::Configure(id) => self.validate_configure_screen(&id),
            Screen::Sign => self.dao_creation_status == DaoCreationStatus::Success,
            Screen::Launch => true,
        }
    }

    pub fn is_prev_enabled(&self) -> bool {
        true
    }

    /// Navigation buttons are hidden on the start, sign and launch screens.
    pub fn is_prev_next_visible(&self) -> bool {
        !matches!(
            self.current_step().group,
            StepGroup::Start | StepGroup::Sign | StepGroup::Launch
        )
    }

    /// Whether moving forward from here submits the DAO.
    pub fn is_signing_next(&self) -> bool {
        self.steps()
            .get(self.state.step_index + 1)
            .is_some_and(|step| step.screen == Screen::Sign)
    }

    fn validate_configure_screen(&self, screen: &str) -> bool {
        self.selected_template()
            .and_then(|t| t.screen(screen).map(|s| s.validate(&self.state.template_data)))
            .unwrap_or(false)
    }

    fn clamp_step_index(&mut self) {
        let last = self.steps().len().saturating_sub(1);
        if self.state.step_index > last {
            debug!(
                session_id = %self.session_id,
                from = self.state.step_index,
                to = last,
                "Step index clamped"
            );
            self.state.step_index = last;
        }
    }

    // ── Template & fields ───────────────────────────────────────────────

    /// Select a template (or none) and load its field defaults.
    pub fn select_template(&mut self, id: Option<&str>) -> Result<(), WizardError> {
        let template = match id {
            Some(id) => Some(self.templates.get(id).ok_or_else(|| {
                WizardError::UnknownTemplate { id: id.to_string() }
            })?),
            None => None,
        };

        self.state.template_data = template
            .as_deref()
            .map(Template::initial_data)
            .unwrap_or_default();
        self.state.template = template.map(|t| t.id.clone());
        self.clamp_step_index();

        info!(
            session_id = %self.session_id,
            template = self.state.template.as_deref().unwrap_or("none"),
            "Template selected"
        );
        Ok(())
    }

    /// Run an edit through the template's field filter and merge the result.
    pub fn update_field(
        &mut self,
        screen: &str,
        name: &str,
        value: Value,
    ) -> Result<FieldUpdate, WizardError> {
        let template = self
            .selected_template()
            .ok_or(WizardError::NoTemplateSelected)?;
        let field = template
            .field(name)
            .ok_or_else(|| WizardError::UnknownField {
                template: template.id.clone(),
                field: name.to_string(),
            })?;

        match field.filter(&value, &self.state.template_data) {
            Some(update) => {
                debug!(
                    session_id = %self.session_id,
                    screen,
                    field = name,
                    updated = ?update.keys().collect::<Vec<_>>(),
                    "Field updated"
                );
                self.state.template_data.extend(update);
                Ok(FieldUpdate::Applied)
            }
            None => {
                debug!(session_id = %self.session_id, screen, field = name, "Field edit rejected");
                Ok(FieldUpdate::Rejected)
            }
        }
    }

    // ── Domains ─────────────────────────────────────────────────────────

    /// Input handler for the name of the organization to create.
    pub fn handle_domain_change(&mut self, raw: &str) {
        self.check_domain(raw, DomainField::Create);
    }

    /// Input handler for the name of an existing organization to open.
    pub fn handle_domain_to_open_change(&mut self, raw: &str) {
        self.check_domain(raw, DomainField::Open);
    }

    /// Store the normalized input and schedule a debounced availability check.
    pub fn check_domain(&mut self, raw: &str, field: DomainField) {
        let name = normalize_domain(raw);
        if self.domain_value(field) == name {
            return;
        }

        *self.domain_value_mut(field) = name.clone();
        *self.domain_status_mut(field) = DomainCheckStatus::Pending;
        self.timers.cancel(TimerKey::DomainCheck(field));

        if name.is_empty() {
            *self.domain_status_mut(field) = DomainCheckStatus::None;
            return;
        }

        let delay = self.config.domain_check_debounce;
        self.schedule_check(field, name, delay);
    }

    pub fn domain_value(&self, field: DomainField) -> &str {
        match field {
            DomainField::Create => &self.state.domain,
            DomainField::Open => &self.state.domain_to_open,
        }
    }

    pub fn domain_status(&self, field: DomainField) -> DomainCheckStatus {
        match field {
            DomainField::Create => self.state.domain_check_status,
            DomainField::Open => self.state.domain_to_open_check_status,
        }
    }

    fn domain_value_mut(&mut self, field: DomainField) -> &mut String {
        match field {
            DomainField::Create => &mut self.state.domain,
            DomainField::Open => &mut self.state.domain_to_open,
        }
    }

    fn domain_status_mut(&mut self, field: DomainField) -> &mut DomainCheckStatus {
        match field {
            DomainField::Create => &mut self.state.domain_check_status,
            DomainField::Open => &mut self.state.domain_to_open_check_status,
        }
    }

    fn schedule_check(&mut self, field: DomainField, name: String, delay: std::time::Duration) {
        let tx = self.events_tx.clone();
        self.timers
            .schedule(TimerKey::DomainCheck(field), delay, move || {
                let _ = tx.send(ControllerEvent::CheckDue { field, name });
            });
    }

    fn spawn_lookup(&self, field: DomainField, name: String) {
        let names = Arc::clone(&self.names);
        let tx = self.events_tx.clone();
        debug!(session_id = %self.session_id, %field, %name, "Looking up name");
        tokio::spawn(async move {
            let result = names.is_name_available(&name).await;
            let _ = tx.send(ControllerEvent::LookupResolved {
                field,
                name,
                result,
            });
        });
    }

    fn apply_lookup(&mut self, field: DomainField, name: String, result: Result<bool, LookupError>) {
        if self.domain_value(field) != name {
            debug!(session_id = %self.session_id, %field, %name, "Discarding stale lookup result");
            return;
        }

        match result {
            Ok(available) => {
                let status = if field.is_valid(available) {
                    DomainCheckStatus::Accepted
                } else {
                    DomainCheckStatus::Rejected
                };
                *self.domain_status_mut(field) = status;
                info!(session_id = %self.session_id, %field, %name, %status, "Domain checked");
            }
            Err(e) => {
                let delay = self.config.domain_check_retry;
                warn!(
                    session_id = %self.session_id,
                    %field,
                    %name,
                    retry_ms = delay.as_millis() as u64,
                    "Name lookup failed, retrying: {}",
                    e
                );
                self.schedule_check(field, name, delay);
            }
        }
    }

    // ── Host actions ────────────────────────────────────────────────────

    /// Hand the prepared template data to the host's DAO builder.
    pub fn build_dao(&self) -> bool {
        let Some(template) = self.selected_template() else {
            warn!(session_id = %self.session_id, "Cannot build DAO without a template");
            return false;
        };
        let data = template.prepare_data(&self.state.template_data);
        info!(
            session_id = %self.session_id,
            template = %template.name,
            domain = %self.state.domain,
            "Submitting DAO creation"
        );
        self.host.build_dao(&template.name, &self.state.domain, data);
        true
    }

    /// Open the organization named in the open-existing input, once it's
    /// known to exist.
    pub fn open_organization(&self) -> bool {
        if self.state.domain_to_open_check_status != DomainCheckStatus::Accepted {
            return false;
        }
        let target = format!("{}.{}", self.state.domain_to_open, self.config.domain_suffix);
        info!(session_id = %self.session_id, %target, "Opening organization");
        self.host.open_organization(&target);
        true
    }

    pub fn open_organization_address(&self, address: &str) {
        info!(session_id = %self.session_id, %address, "Opening organization by address");
        self.host.open_organization(address);
    }

    /// "Create a new organization" from the start screen.
    pub fn start_create(&mut self) {
        self.reset();
        self.move_step(1);
    }

    /// The start screen finished its transition; forget the previous attempt.
    pub fn start_rest(&mut self) {
        if self.state.step_index != 0 {
            return;
        }
        self.timers.cancel(TimerKey::DomainCheck(DomainField::Create));
        self.state.template = None;
        self.state.template_data.clear();
        self.state.domain.clear();
        self.state.domain_check_status = DomainCheckStatus::None;
    }

    /// Back to defaults. Also the "try again" action after a failed creation.
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.state = WizardState::default();
        self.dao_creation_status = DaoCreationStatus::None;
        info!(session_id = %self.session_id, "Wizard reset");
        self.host.reset_dao_builder();
    }

    /// The user confirmed the launch screen.
    pub fn complete(&self) {
        info!(session_id = %self.session_id, "Onboarding complete");
        self.host.complete();
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    pub fn set_visible(&mut self, visible: bool) {
        let Some(next) = self.visibility.request(visible) else {
            return;
        };
        if next == Visibility::Appearing {
            self.state.step_index = 0;
        }
        debug!(session_id = %self.session_id, from = ?self.visibility, to = ?next, "Visibility changed");
        self.visibility = next;
    }

    /// The rendering layer finished its show/hide transition.
    pub fn transition_complete(&mut self) {
        let Some(next) = self.visibility.settle() else {
            return;
        };
        if next == Visibility::Hidden {
            // Domain checks keep running while hidden.
            self.timers.cancel(TimerKey::AutoAdvance);
            debug!(session_id = %self.session_id, "Wizard unmounted");
        }
        self.visibility = next;
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn should_render(&self) -> bool {
        self.visibility.should_render()
    }

    /// Track the host's creation status; success schedules one step forward.
    pub fn set_dao_creation_status(&mut self, status: DaoCreationStatus) {
        let previous = std::mem::replace(&mut self.dao_creation_status, status);
        if status == previous {
            return;
        }
        info!(session_id = %self.session_id, %previous, %status, "DAO creation status changed");

        if status == DaoCreationStatus::Success {
            let tx = self.events_tx.clone();
            self.timers
                .schedule(TimerKey::AutoAdvance, self.config.auto_advance_delay, move || {
                    let _ = tx.send(ControllerEvent::AutoAdvance);
                });
        }
    }

    // ── Events ──────────────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::CheckDue { field, name } => {
                if self.domain_value(field) != name {
                    debug!(session_id = %self.session_id, %field, %name, "Skipping superseded check");
                    return;
                }
                self.spawn_lookup(field, name);
            }
            ControllerEvent::LookupResolved {
                field,
                name,
                result,
            } => self.apply_lookup(field, name, result),
            ControllerEvent::AutoAdvance => self.next_step(),
        }
    }

    /// Wait for the next timer or lookup event and apply it.
    pub async fn process_next(&mut self) -> Option<ControllerEvent> {
        let event = self.events_rx.recv().await?;
        self.handle_event(event.clone());
        Some(event)
    }

    /// Apply every event already queued without waiting. Returns how many ran.
    pub fn process_ready(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    // ── View ────────────────────────────────────────────────────────────

    pub fn view(&self) -> WizardView {
        let templates = self
            .templates
            .list()
            .into_iter()
            .filter_map(|id| self.templates.get(&id))
            .map(|t| TemplateSummary {
                id: t.id.clone(),
                name: t.name.clone(),
                description: t.description.clone(),
            })
            .collect();

        WizardView {
            session_id: self.session_id,
            visibility: self.visibility,
            render: self.should_render(),
            steps: self.steps(),
            step_index: self.state.step_index,
            step: self.current_step(),
            direction: self.state.direction,
            next_enabled: self.is_next_enabled(),
            prev_enabled: self.is_prev_enabled(),
            prev_next_visible: self.is_prev_next_visible(),
            signing_next: self.is_signing_next(),
            templates,
            template: self.state.template.clone(),
            fields: self.state.template_data.clone(),
            domain: self.state.domain.clone(),
            domain_check_status: self.state.domain_check_status,
            domain_to_open: self.state.domain_to_open.clone(),
            domain_to_open_check_status: self.state.domain_to_open_check_status,
            dao_creation_status: self.dao_creation_status,
        }
    }
}
