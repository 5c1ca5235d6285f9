//! Line-oriented driver for the wizard: parses stdin commands and reports
//! host actions on the terminal.

use anyhow::{Context, bail};
use serde_json::Value;

use crate::onboarding::{DaoCreationStatus, OnboardingController, OnboardingHost};

/// One stdin command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    View,
    Create,
    StartRest,
    Template(Option<String>),
    Domain(String),
    OpenDomain(String),
    OpenOrganization,
    OpenAddress(String),
    Field {
        screen: String,
        name: String,
        value: Value,
    },
    Next,
    Prev,
    Status(DaoCreationStatus),
    Reset,
    Show,
    Hide,
    TransitionComplete,
    Complete,
    Quit,
}

pub const HELP: &str = "\
Commands:
  create                       start creating a new organization
  template <id|none>           select a template
  domain <name>                type the new organization's name
  open <name>                  type an existing organization's name
  open-org                     open the organization typed with `open`
  open-address <address>       open an organization by address
  field <screen> <name> <val>  edit a template field (JSON or plain text)
  next | prev                  navigate
  status <none|pending|success|error>
                               report the DAO creation status
  reset                        start over
  show | hide | rested         visibility and end of transition
  rest                         start screen finished its transition
  complete                     confirm the launch screen
  view                         print the full wizard view
  quit";

/// Parse a command line. Blank lines are the caller's concern.
pub fn parse_command(line: &str) -> anyhow::Result<Command> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word {
        "help" | "?" => Command::Help,
        "view" => Command::View,
        "create" => Command::Create,
        "rest" => Command::StartRest,
        "template" => match rest {
            "" => bail!("usage: template <id|none>"),
            "none" => Command::Template(None),
            id => Command::Template(Some(id.to_string())),
        },
        "domain" => Command::Domain(rest.to_string()),
        "open" => Command::OpenDomain(rest.to_string()),
        "open-org" => Command::OpenOrganization,
        "open-address" => {
            if rest.is_empty() {
                bail!("usage: open-address <address>");
            }
            Command::OpenAddress(rest.to_string())
        }
        "field" => {
            let mut parts = rest.splitn(3, char::is_whitespace);
            let (Some(screen), Some(name), Some(raw)) = (parts.next(), parts.next(), parts.next())
            else {
                bail!("usage: field <screen> <name> <value>");
            };
            Command::Field {
                screen: screen.to_string(),
                name: name.to_string(),
                value: parse_value(raw.trim()),
            }
        }
        "next" => Command::Next,
        "prev" => Command::Prev,
        "status" => Command::Status(
            rest.parse::<DaoCreationStatus>()
                .map_err(anyhow::Error::msg)
                .context("usage: status <none|pending|success|error>")?,
        ),
        "reset" => Command::Reset,
        "show" => Command::Show,
        "hide" => Command::Hide,
        "rested" => Command::TransitionComplete,
        "complete" => Command::Complete,
        "quit" | "exit" => Command::Quit,
        other => bail!("Unknown command: {other} (try `help`)"),
    };
    Ok(command)
}

/// JSON if it parses, otherwise the raw text as a string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Apply a command to the controller. Returns false when the session should end.
pub fn apply_command(ctrl: &mut OnboardingController, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Help => eprintln!("{HELP}"),
        Command::View => println!("{}", serde_json::to_string_pretty(&ctrl.view())?),
        Command::Create => ctrl.start_create(),
        Command::StartRest => ctrl.start_rest(),
        Command::Template(id) => ctrl.select_template(id.as_deref())?,
        Command::Domain(raw) => ctrl.handle_domain_change(&raw),
        Command::OpenDomain(raw) => ctrl.handle_domain_to_open_change(&raw),
        Command::OpenOrganization => {
            if !ctrl.open_organization() {
                eprintln!("Organization name not confirmed yet");
            }
        }
        Command::OpenAddress(address) => ctrl.open_organization_address(&address),
        Command::Field {
            screen,
            name,
            value,
        } => {
            let outcome = ctrl.update_field(&screen, &name, value)?;
            eprintln!("{name}: {outcome:?}");
        }
        Command::Next => ctrl.next_step(),
        Command::Prev => ctrl.prev_step(),
        Command::Status(status) => ctrl.set_dao_creation_status(status),
        Command::Reset => ctrl.reset(),
        Command::Show => ctrl.set_visible(true),
        Command::Hide => ctrl.set_visible(false),
        Command::TransitionComplete => ctrl.transition_complete(),
        Command::Complete => ctrl.complete(),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// One-line summary printed after every change.
pub fn summary(ctrl: &OnboardingController) -> String {
    let state = ctrl.state();
    let step = ctrl.current_step();
    format!(
        "[{}/{}] {} | next: {} | domain: {:?} ({}) | open: {:?} ({}) | dao: {}",
        state.step_index + 1,
        ctrl.steps().len(),
        step.screen,
        if ctrl.is_next_enabled() { "on" } else { "off" },
        state.domain,
        state.domain_check_status,
        state.domain_to_open,
        state.domain_to_open_check_status,
        ctrl.dao_creation_status(),
    )
}

/// Host that reports every action on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalHost;

impl OnboardingHost for TerminalHost {
    fn build_dao(&self, template_name: &str, domain: &str, data: Value) {
        eprintln!("🔨 Building {template_name} DAO at {domain}: {data}");
        eprintln!("   Report the result with `status success` or `status error`");
    }

    fn open_organization(&self, target: &str) {
        eprintln!("📂 Opening organization {target}");
    }

    fn complete(&self) {
        eprintln!("✅ Onboarding complete");
    }

    fn reset_dao_builder(&self) {
        tracing::debug!("DAO builder reset");
    }
}
