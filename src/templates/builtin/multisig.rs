//! Multisig template — a fixed set of signers approves every action.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Value, json};

use super::as_integer;
use crate::templates::template::{FieldSpec, ScreenSpec, Template, TemplateData};

pub const ID: &str = "multisig";

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("static address pattern is valid")
});

pub fn template() -> Template {
    Template::new(ID, "Multisig")
        .with_description(
            "A small group of signers approves every action. Good for teams \
             that want to move funds only with several keys.",
        )
        .with_field("signers", FieldSpec::new(|| json!([]), filter_signers))
        .with_field(
            "needed_signatures",
            FieldSpec::new(|| json!(1), filter_needed_signatures),
        )
        .with_screen(ScreenSpec::new("signers", validate_signers))
        .with_screen(ScreenSpec::new("needed-signatures", validate_needed_signatures))
        .with_prepare_data(prepare_data)
}

/// Whether `address` looks like a hex-encoded account address.
pub fn is_address(address: &str) -> bool {
    ADDRESS_RE.is_match(address)
}

fn signers(fields: &TemplateData) -> Vec<String> {
    fields
        .get("signers")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn max_needed(signer_count: usize) -> i64 {
    i64::try_from(signer_count.max(1)).unwrap_or(i64::MAX)
}

/// Accepts a list of signer strings; keeps `needed_signatures` within the new
/// signer count.
fn filter_signers(value: &Value, fields: &TemplateData) -> Option<TemplateData> {
    let list = value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(|s| s.trim().to_string()))
        .collect::<Option<Vec<_>>>()?;

    let needed = fields
        .get("needed_signatures")
        .and_then(as_integer)
        .unwrap_or(1)
        .clamp(1, max_needed(list.len()));

    Some(TemplateData::from([
        ("signers".to_string(), json!(list)),
        ("needed_signatures".to_string(), json!(needed)),
    ]))
}

fn filter_needed_signatures(value: &Value, fields: &TemplateData) -> Option<TemplateData> {
    let needed = as_integer(value)?.clamp(1, max_needed(signers(fields).len()));
    Some(TemplateData::from([(
        "needed_signatures".to_string(),
        json!(needed),
    )]))
}

fn validate_signers(fields: &TemplateData) -> bool {
    let list = signers(fields);
    let mut seen = HashSet::new();
    !list.is_empty()
        && list
            .iter()
            .all(|s| is_address(s) && seen.insert(s.to_ascii_lowercase()))
}

fn validate_needed_signatures(fields: &TemplateData) -> bool {
    let count = signers(fields).len();
    fields
        .get("needed_signatures")
        .and_then(as_integer)
        .is_some_and(|n| n >= 1 && n <= max_needed(count) && count > 0)
}

fn prepare_data(fields: &TemplateData) -> Value {
    json!({
        "signers": signers(fields),
        "neededSignatures": fields.get("needed_signatures").and_then(as_integer).unwrap_or(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";

    fn apply(fields: &mut TemplateData, name: &str, value: Value) -> bool {
        match template().field(name).unwrap().filter(&value, fields) {
            Some(update) => {
                fields.extend(update);
                true
            }
            None => false,
        }
    }

    #[test]
    fn address_check() {
        assert!(is_address(ALICE));
        assert!(!is_address("0x123"));
        assert!(!is_address("1111111111111111111111111111111111111111"));
    }

    #[test]
    fn removing_signers_lowers_needed_signatures() {
        let mut data = template().initial_data();
        assert!(apply(&mut data, "signers", json!([ALICE, BOB])));
        assert!(apply(&mut data, "needed_signatures", json!(2)));
        assert_eq!(data["needed_signatures"], json!(2));

        assert!(apply(&mut data, "signers", json!([ALICE])));
        assert_eq!(data["needed_signatures"], json!(1));
    }

    #[test]
    fn needed_signatures_capped_by_signer_count() {
        let mut data = template().initial_data();
        apply(&mut data, "signers", json!([ALICE, BOB]));
        assert!(apply(&mut data, "needed_signatures", json!("5")));
        assert_eq!(data["needed_signatures"], json!(2));
    }

    #[test]
    fn non_list_signers_rejected() {
        let mut data = template().initial_data();
        assert!(!apply(&mut data, "signers", json!(ALICE)));
        assert!(!apply(&mut data, "signers", json!([ALICE, 3])));
        assert_eq!(data["signers"], json!([]));
    }

    #[test]
    fn signers_screen_requires_unique_valid_addresses() {
        let t = template();
        let screen = t.screen("signers").unwrap();
        let mut data = t.initial_data();
        assert!(!screen.validate(&data));

        apply(&mut data, "signers", json!([ALICE, "0xnope"]));
        assert!(!screen.validate(&data));

        apply(&mut data, "signers", json!([ALICE, ALICE.to_uppercase().replace("0X", "0x")]));
        assert!(!screen.validate(&data));

        apply(&mut data, "signers", json!([ALICE, BOB]));
        assert!(screen.validate(&data));
        assert!(t.screen("needed-signatures").unwrap().validate(&data));
    }

    #[test]
    fn prepare_data_lists_signers() {
        let t = template();
        let mut data = t.initial_data();
        apply(&mut data, "signers", json!([ALICE, BOB]));
        apply(&mut data, "needed_signatures", json!(2));
        assert_eq!(
            t.prepare_data(&data),
            json!({"signers": [ALICE, BOB], "neededSignatures": 2})
        );
    }
}
