//! Democracy template — token holders vote on every decision.

use serde_json::{Value, json};

use super::as_integer;
use crate::templates::template::{FieldSpec, ScreenSpec, Template, TemplateData};

pub const ID: &str = "democracy";

const MAX_TOKEN_NAME_LEN: usize = 30;
const MAX_TOKEN_SYMBOL_LEN: usize = 5;
const MAX_VOTE_DURATION_HOURS: i64 = 24 * 365;
/// One percent in 18-decimal fixed point.
const PCT_BASE: u128 = 10_u128.pow(16);

pub fn template() -> Template {
    Template::new(ID, "Democracy")
        .with_description(
            "Token holders vote on every decision. Good for open communities \
             where each member's weight follows their stake.",
        )
        .with_field("support", FieldSpec::new(|| json!(50), filter_support))
        .with_field("min_quorum", FieldSpec::new(|| json!(15), filter_min_quorum))
        .with_field("vote_duration", FieldSpec::new(|| json!(24), filter_vote_duration))
        .with_field("token_name", FieldSpec::new(|| json!(""), filter_token_name))
        .with_field("token_symbol", FieldSpec::new(|| json!(""), filter_token_symbol))
        .with_screen(ScreenSpec::new("voting", validate_voting))
        .with_screen(ScreenSpec::new("token", validate_token))
        .with_prepare_data(prepare_data)
}

fn get_int(fields: &TemplateData, name: &str) -> Option<i64> {
    fields.get(name).and_then(as_integer)
}

fn get_str<'a>(fields: &'a TemplateData, name: &str) -> &'a str {
    fields.get(name).and_then(Value::as_str).unwrap_or_default()
}

/// Support is clamped to 1–100; lowering it below the quorum drags the quorum down.
fn filter_support(value: &Value, fields: &TemplateData) -> Option<TemplateData> {
    let support = as_integer(value)?.clamp(1, 100);
    let mut update = TemplateData::from([("support".to_string(), json!(support))]);
    if get_int(fields, "min_quorum").is_some_and(|quorum| quorum > support) {
        update.insert("min_quorum".to_string(), json!(support));
    }
    Some(update)
}

/// Quorum never exceeds the current support.
fn filter_min_quorum(value: &Value, fields: &TemplateData) -> Option<TemplateData> {
    let support = get_int(fields, "support").unwrap_or(100);
    let quorum = as_integer(value)?.clamp(0, support);
    Some(TemplateData::from([("min_quorum".to_string(), json!(quorum))]))
}

fn filter_vote_duration(value: &Value, _fields: &TemplateData) -> Option<TemplateData> {
    let hours = as_integer(value)?;
    if !(1..=MAX_VOTE_DURATION_HOURS).contains(&hours) {
        return None;
    }
    Some(TemplateData::from([("vote_duration".to_string(), json!(hours))]))
}

fn filter_token_name(value: &Value, _fields: &TemplateData) -> Option<TemplateData> {
    let name = value.as_str()?;
    if name.chars().count() > MAX_TOKEN_NAME_LEN {
        return None;
    }
    Some(TemplateData::from([("token_name".to_string(), json!(name))]))
}

fn filter_token_symbol(value: &Value, _fields: &TemplateData) -> Option<TemplateData> {
    let symbol: String = value
        .as_str()?
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .take(MAX_TOKEN_SYMBOL_LEN)
        .collect();
    Some(TemplateData::from([("token_symbol".to_string(), json!(symbol))]))
}

fn validate_voting(fields: &TemplateData) -> bool {
    match (
        get_int(fields, "support"),
        get_int(fields, "min_quorum"),
        get_int(fields, "vote_duration"),
    ) {
        (Some(support), Some(quorum), Some(duration)) => {
            (1..=100).contains(&support) && (0..=support).contains(&quorum) && duration >= 1
        }
        _ => false,
    }
}

fn validate_token(fields: &TemplateData) -> bool {
    !get_str(fields, "token_name").trim().is_empty()
        && !get_str(fields, "token_symbol").is_empty()
}

fn to_pct_base(percent: i64) -> String {
    (u128::from(percent.unsigned_abs()) * PCT_BASE).to_string()
}

fn prepare_data(fields: &TemplateData) -> Value {
    json!({
        "tokenName": get_str(fields, "token_name").trim(),
        "tokenSymbol": get_str(fields, "token_symbol"),
        "supportNeeded": to_pct_base(get_int(fields, "support").unwrap_or_default()),
        "minAcceptanceQuorum": to_pct_base(get_int(fields, "min_quorum").unwrap_or_default()),
        "voteDuration": get_int(fields, "vote_duration").unwrap_or_default() * 3600,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(fields: &mut TemplateData, name: &str, value: Value) -> bool {
        let template = template();
        match template.field(name).unwrap().filter(&value, fields) {
            Some(update) => {
                fields.extend(update);
                true
            }
            None => false,
        }
    }

    #[test]
    fn defaults_pass_voting_but_not_token() {
        let t = template();
        let data = t.initial_data();
        assert!(t.screen("voting").unwrap().validate(&data));
        assert!(!t.screen("token").unwrap().validate(&data));
    }

    #[test]
    fn lowering_support_drags_quorum() {
        let mut data = template().initial_data();
        assert!(apply(&mut data, "support", json!("10")));
        assert_eq!(data["support"], json!(10));
        assert_eq!(data["min_quorum"], json!(10));
    }

    #[test]
    fn quorum_is_capped_by_support() {
        let mut data = template().initial_data();
        assert!(apply(&mut data, "min_quorum", json!(90)));
        assert_eq!(data["min_quorum"], json!(50));
    }

    #[test]
    fn non_numeric_percentages_are_rejected() {
        let mut data = template().initial_data();
        assert!(!apply(&mut data, "support", json!("lots")));
        assert_eq!(data["support"], json!(50));
    }

    #[test]
    fn zero_vote_duration_is_rejected() {
        let mut data = template().initial_data();
        assert!(!apply(&mut data, "vote_duration", json!(0)));
        assert_eq!(data["vote_duration"], json!(24));
    }

    #[test]
    fn token_symbol_is_uppercased_and_truncated() {
        let mut data = template().initial_data();
        assert!(apply(&mut data, "token_symbol", json!("my-token")));
        assert_eq!(data["token_symbol"], json!("MYTOK"));
    }

    #[test]
    fn prepare_data_scales_values() {
        let t = template();
        let mut data = t.initial_data();
        apply(&mut data, "token_name", json!("Org Token"));
        apply(&mut data, "token_symbol", json!("org"));

        let prepared = t.prepare_data(&data);
        assert_eq!(prepared["tokenSymbol"], json!("ORG"));
        assert_eq!(prepared["supportNeeded"], json!("500000000000000000"));
        assert_eq!(prepared["minAcceptanceQuorum"], json!("150000000000000000"));
        assert_eq!(prepared["voteDuration"], json!(86_400));
    }
}
