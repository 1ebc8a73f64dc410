use chrono::format::{Item, StrftimeItems};
use chronicle_types::{DEFAULT_TIMEZONE, Tz};
use std::collections::BTreeMap;

/// Date/time formatting rules for one record type.
///
/// Entries are keyed by field name and apply only to fields of the record
/// that owns this configuration; nested records carry their own.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatConfig {
    output_formats: BTreeMap<String, String>,
    input_formats: BTreeMap<String, Vec<String>>,
    output_timezone: Tz,
    input_naive_timezone: Tz,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            output_formats: BTreeMap::new(),
            input_formats: BTreeMap::new(),
            output_timezone: DEFAULT_TIMEZONE,
            input_naive_timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl FormatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `field` with `format` instead of ISO-8601.
    #[must_use]
    pub fn with_output_format(mut self, field: &str, format: &str) -> Self {
        self.output_formats
            .insert(field.to_string(), format.to_string());
        self
    }

    /// Formats tried, in order, when parsing `field` from text.
    #[must_use]
    pub fn with_input_formats<I, S>(mut self, field: &str, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_formats.insert(
            field.to_string(),
            formats.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Zone that encoded date/times are expressed in.
    #[must_use]
    pub fn with_output_timezone(mut self, zone: Tz) -> Self {
        self.output_timezone = zone;
        self
    }

    /// Zone attached to decoded date/times that carry no offset.
    #[must_use]
    pub fn with_input_naive_timezone(mut self, zone: Tz) -> Self {
        self.input_naive_timezone = zone;
        self
    }

    pub fn output_format(&self, field: &str) -> Option<&str> {
        self.output_formats.get(field).map(String::as_str)
    }

    /// Configured input formats for `field`; empty when none are configured.
    pub fn input_formats(&self, field: &str) -> &[String] {
        self.input_formats
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn output_timezone(&self) -> Tz {
        self.output_timezone
    }

    pub fn input_naive_timezone(&self) -> Tz {
        self.input_naive_timezone
    }

    /// Every `(field, format)` pair in this configuration, outputs first.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        let outputs = self
            .output_formats
            .iter()
            .map(|(field, format)| (field.as_str(), format.as_str()));
        let inputs = self.input_formats.iter().flat_map(|(field, formats)| {
            formats
                .iter()
                .map(move |format| (field.as_str(), format.as_str()))
        });
        outputs.chain(inputs)
    }
}

/// Returns true if chrono understands every specifier in `format`.
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
