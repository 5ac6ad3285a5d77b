use crate::types::{AttributePath, Diagnostic, Diagnostics, Dynamic};

pub trait Validator: Send + Sync {
    fn description(&self) -> String;
    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Diagnostics);
}

fn invalid(path: &AttributePath, summary: String, detail: String) -> Diagnostic {
    Diagnostic::error(summary, detail).with_attribute(path.clone())
}

pub struct StringLengthValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Validator for StringLengthValidator {
    fn description(&self) -> String {
        format!("length between {:?} and {:?}", self.min, self.max)
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Diagnostics) {
        if let Some(s) = value.as_string() {
            if let Some(min) = self.min {
                if s.len() < min {
                    diagnostics.push(invalid(
                        path,
                        format!("{} must have minimum length of {}", path, min),
                        format!("Got length {}", s.len()),
                    ));
                }
            }
            if let Some(max) = self.max {
                if s.len() > max {
                    diagnostics.push(invalid(
                        path,
                        format!("{} must have maximum length of {}", path, max),
                        format!("Got length {}", s.len()),
                    ));
                }
            }
        }
    }
}

pub struct StringPatternValidator {
    pub pattern: regex::Regex,
    pub description: String,
}

impl StringPatternValidator {
    pub fn new(pattern: regex::Regex, description: &str) -> Self {
        Self {
            pattern,
            description: description.to_string(),
        }
    }

    /// Fully-qualified hostname, optionally with a leading wildcard label
    pub fn hostname() -> Self {
        Self::new(
            hostname_pattern().clone(),
            "a hostname such as cdn.example.com",
        )
    }
}

fn hostname_pattern() -> &'static regex::Regex {
    static PATTERN: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::Regex::new(
            r"^(\*\.)?([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,63}$",
        )
        .unwrap_or_else(|e| panic!("hostname pattern is invalid: {}", e))
    })
}

impl Validator for StringPatternValidator {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Diagnostics) {
        if let Some(s) = value.as_string() {
            if !self.pattern.is_match(s) {
                diagnostics.push(invalid(
                    path,
                    format!("{} must be {}", path, self.description),
                    format!("Value '{}' does not match pattern", s),
                ));
            }
        }
    }
}

pub struct NumberRangeValidator {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Validator for NumberRangeValidator {
    fn description(&self) -> String {
        format!("between {:?} and {:?}", self.min, self.max)
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Diagnostics) {
        if let Some(n) = value.as_number() {
            if let Some(min) = self.min {
                if n < min {
                    diagnostics.push(invalid(
                        path,
                        format!("{} must be at least {}", path, min),
                        format!("Got {}", n),
                    ));
                }
            }
            if let Some(max) = self.max {
                if n > max {
                    diagnostics.push(invalid(
                        path,
                        format!("{} must be at most {}", path, max),
                        format!("Got {}", n),
                    ));
                }
            }
        }
    }
}

pub struct OneOfValidator {
    pub values: Vec<String>,
}

impl OneOfValidator {
    pub fn new(values: &[&str]) -> Self {
        Self {
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl Validator for OneOfValidator {
    fn description(&self) -> String {
        format!("one of {:?}", self.values)
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Diagnostics) {
        if let Some(s) = value.as_string() {
            if !self.values.iter().any(|v| v == s) {
                diagnostics.push(invalid(
                    path,
                    format!("{} must be one of: {:?}", path, self.values),
                    format!("Got '{}'", s),
                ));
            }
        }
    }
}
