use serde::{Deserialize, Serialize};

/// One error/telemetry record as produced by the collection pipeline.
///
/// Every section is optional: records with missing or malformed fields are
/// tolerated everywhere and simply skipped by the aggregators that need the
/// absent field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Device metadata section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modem_version: Option<String>,
}

/// Radio context section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plmn: Option<Plmn>,
    /// Radio Access Technology tag (e.g. "LTE", "5G").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rat: Option<String>,
}

/// Public Land Mobile Network attributes; source of the country attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Plmn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Error payload section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Record {
    /// Device model, if present.
    pub fn model(&self) -> Option<&str> {
        self.metadata.as_ref()?.model.as_deref()
    }

    /// Modem software version, if present.
    pub fn modem_version(&self) -> Option<&str> {
        self.metadata.as_ref()?.modem_version.as_deref()
    }

    /// PLMN country attribute, if present.
    pub fn country(&self) -> Option<&str> {
        self.context.as_ref()?.plmn.as_ref()?.country.as_deref()
    }

    /// Radio access technology tag, if present.
    pub fn rat(&self) -> Option<&str> {
        self.context.as_ref()?.rat.as_deref()
    }

    /// Raw error message, if present.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref()?.error_message.as_deref()
    }
}

/// Which attribute a filter selection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterField {
    Country,
    Model,
}

impl FilterField {
    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Country => "country",
            FilterField::Model => "model",
        }
    }
}

/// Current filter selection. `None` means "no filter" for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub country: Option<String>,
    pub model: Option<String>,
}

impl FilterState {
    /// True if at least one field has an active selection.
    pub fn has_active(&self) -> bool {
        self.country.is_some() || self.model.is_some()
    }

    /// Number of active filter fields.
    pub fn active_count(&self) -> usize {
        [self.country.is_some(), self.model.is_some()]
            .iter()
            .filter(|b| **b)
            .count()
    }

    /// Exclusive-AND predicate: a record passes iff, for every non-null
    /// field, its attribute equals the filter value exactly.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(country) = self.country.as_deref()
            && record.country() != Some(country)
        {
            return false;
        }
        if let Some(model) = self.model.as_deref()
            && record.model() != Some(model)
        {
            return false;
        }
        true
    }
}
