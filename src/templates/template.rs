//! Template contract: fields with defaults and filters, configure screens
//! with validators, and the data preparation step used at signing time.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Current values of a template's configuration fields, keyed by field name.
pub type TemplateData = BTreeMap<String, Value>;

/// Produces a field's initial value.
pub type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// Filters a proposed field value against every field so far.
///
/// Returns the partial set of fields to merge, or `None` to reject the edit.
/// A filter may return more than the edited field to keep linked fields
/// consistent.
pub type FilterFn = Arc<dyn Fn(&Value, &TemplateData) -> Option<TemplateData> + Send + Sync>;

/// Decides whether a configure screen's fields allow moving forward.
pub type ValidateFn = Arc<dyn Fn(&TemplateData) -> bool + Send + Sync>;

/// Turns the collected fields into the payload handed to the DAO builder.
pub type PrepareFn = Arc<dyn Fn(&TemplateData) -> Value + Send + Sync>;

/// A single configurable field.
#[derive(Clone)]
pub struct FieldSpec {
    default: DefaultFn,
    filter: FilterFn,
}

impl FieldSpec {
    pub fn new(
        default: impl Fn() -> Value + Send + Sync + 'static,
        filter: impl Fn(&Value, &TemplateData) -> Option<TemplateData> + Send + Sync + 'static,
    ) -> Self {
        Self {
            default: Arc::new(default),
            filter: Arc::new(filter),
        }
    }

    pub fn default_value(&self) -> Value {
        (self.default)()
    }

    pub fn filter(&self, value: &Value, fields: &TemplateData) -> Option<TemplateData> {
        (self.filter)(value, fields)
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("default", &self.default_value())
            .finish_non_exhaustive()
    }
}

/// A configure screen contributed by a template.
#[derive(Clone)]
pub struct ScreenSpec {
    pub id: String,
    validate: ValidateFn,
}

impl ScreenSpec {
    pub fn new(
        id: impl Into<String>,
        validate: impl Fn(&TemplateData) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            validate: Arc::new(validate),
        }
    }

    pub fn validate(&self, fields: &TemplateData) -> bool {
        (self.validate)(fields)
    }
}

impl fmt::Debug for ScreenSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenSpec")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// A DAO template.
#[derive(Clone)]
pub struct Template {
    /// Registry key, e.g. "democracy".
    pub id: String,
    /// Name passed to the DAO builder.
    pub name: String,
    pub description: String,
    fields: BTreeMap<String, FieldSpec>,
    screens: Vec<ScreenSpec>,
    prepare: PrepareFn,
}

impl Template {
    /// Create a template with no fields or screens whose prepared data is the
    /// raw field map.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            fields: BTreeMap::new(),
            screens: Vec::new(),
            prepare: Arc::new(|fields: &TemplateData| {
                Value::Object(fields.clone().into_iter().collect())
            }),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Append a configure screen. Screens are shown in insertion order.
    pub fn with_screen(mut self, screen: ScreenSpec) -> Self {
        self.screens.push(screen);
        self
    }

    pub fn with_prepare_data(
        mut self,
        prepare: impl Fn(&TemplateData) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.prepare = Arc::new(prepare);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn screens(&self) -> &[ScreenSpec] {
        &self.screens
    }

    pub fn screen(&self, id: &str) -> Option<&ScreenSpec> {
        self.screens.iter().find(|s| s.id == id)
    }

    /// Every declared field set to its default.
    pub fn initial_data(&self) -> TemplateData {
        self.fields
            .iter()
            .map(|(name, spec)| (name.clone(), spec.default_value()))
            .collect()
    }

    pub fn prepare_data(&self, fields: &TemplateData) -> Value {
        (self.prepare)(fields)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("screens", &self.screens)
            .finish_non_exhaustive()
    }
}

/// Filter that accepts any value and updates only the named field.
pub fn accept_any(
    name: &'static str,
) -> impl Fn(&Value, &TemplateData) -> Option<TemplateData> + Send + Sync + 'static {
    move |value, _| Some(TemplateData::from([(name.to_string(), value.clone())]))
}
