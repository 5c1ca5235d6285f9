//! Step sequence — derived from the selected template on every access.

use serde::Serialize;

use crate::templates::Template;

/// Progress-bar group a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepGroup {
    Start,
    Template,
    Domain,
    Configure,
    Sign,
    Launch,
}

/// Screen shown for a step. Configure screens carry the template's screen id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Screen {
    Start,
    Template,
    Domain,
    Configure(String),
    Sign,
    Launch,
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Template => write!(f, "template"),
            Self::Domain => write!(f, "domain"),
            Self::Configure(id) => write!(f, "configure:{id}"),
            Self::Sign => write!(f, "sign"),
            Self::Launch => write!(f, "launch"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub screen: Screen,
    pub group: StepGroup,
}

impl Step {
    fn new(screen: Screen, group: StepGroup) -> Self {
        Self { screen, group }
    }

    pub fn start() -> Self {
        Self::new(Screen::Start, StepGroup::Start)
    }
}

/// `[start, template, domain, ...configure screens, sign, launch]`.
pub fn compute_steps(template: Option<&Template>) -> Vec<Step> {
    let configure = template.map(Template::screens).unwrap_or_default();

    let mut steps = Vec::with_capacity(5 + configure.len());
    steps.push(Step::start());
    steps.push(Step::new(Screen::Template, StepGroup::Template));
    steps.push(Step::new(Screen::Domain, StepGroup::Domain));
    steps.extend(
        configure
            .iter()
            .map(|s| Step::new(Screen::Configure(s.id.clone()), StepGroup::Configure)),
    );
    steps.push(Step::new(Screen::Sign, StepGroup::Sign));
    steps.push(Step::new(Screen::Launch, StepGroup::Launch));
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::ScreenSpec;

    #[test]
    fn fixed_steps_without_template() {
        let screens: Vec<_> = compute_steps(None).into_iter().map(|s| s.screen).collect();
        assert_eq!(
            screens,
            [Screen::Start, Screen::Template, Screen::Domain, Screen::Sign, Screen::Launch]
        );
    }

    #[test]
    fn configure_screens_inserted_after_domain() {
        let template = Template::new("t", "T")
            .with_screen(ScreenSpec::new("one", |_| true))
            .with_screen(ScreenSpec::new("two", |_| true));
        let steps = compute_steps(Some(&template));

        assert_eq!(steps.len(), 7);
        assert_eq!(steps[3], Step::new(Screen::Configure("one".into()), StepGroup::Configure));
        assert_eq!(steps[4], Step::new(Screen::Configure("two".into()), StepGroup::Configure));
        assert_eq!(steps[5].screen, Screen::Sign);
        assert_eq!(steps[6].group, StepGroup::Launch);
    }

    #[test]
    fn screen_display() {
        assert_eq!(Screen::Configure("voting".into()).to_string(), "configure:voting");
        assert_eq!(Screen::Sign.to_string(), "sign");
    }
}
