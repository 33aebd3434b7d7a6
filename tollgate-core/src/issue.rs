use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of the access path from the decoded root to an offending field.
///
/// An empty `key` marks an unnamed step, such as the root entry or a union
/// member. `expected` is the name of the type the schema wanted at this step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub key: String,
    pub expected: Option<String>,
}

impl PathStep {
    pub fn new(key: impl Into<String>, expected: Option<String>) -> Self {
        Self {
            key: key.into(),
            expected,
        }
    }

    pub fn is_named(&self) -> bool {
        !self.key.is_empty()
    }
}

/// Access path handed down through nested schemas while decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<PathStep>);

impl Path {
    /// Root context for a decode call; the root step carries no field name.
    pub fn root(expected: impl Into<String>) -> Self {
        Path(vec![PathStep::new("", Some(expected.into()))])
    }

    /// Extends the path by one step.
    pub fn child(&self, key: impl Into<String>, expected: impl Into<String>) -> Self {
        let mut steps = self.0.clone();
        steps.push(PathStep::new(key, Some(expected.into())));
        Path(steps)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn into_steps(self) -> Vec<PathStep> {
        self.0
    }
}

impl From<Vec<PathStep>> for Path {
    fn from(steps: Vec<PathStep>) -> Self {
        Path(steps)
    }
}

/// A single decode failure reported by a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Steps from the root to the offending value, root first.
    pub path: Vec<PathStep>,
    /// The raw value found there, `None` when the value was absent.
    pub actual: Option<Value>,
    /// Optional engine-specific explanation.
    pub message: Option<String>,
}

impl Issue {
    pub fn new(path: &Path, actual: Option<Value>) -> Self {
        Self {
            path: path.steps().to_vec(),
            actual,
            message: None,
        }
    }

    /// Issue for a value that is present but has the wrong shape.
    pub fn invalid(path: &Path, actual: &Value) -> Self {
        Self::new(path, Some(actual.clone()))
    }

    /// Issue for a required value that was not supplied.
    pub fn missing(path: &Path) -> Self {
        Self::new(path, None)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn last_step(&self) -> Option<&PathStep> {
        self.path.last()
    }

    /// Dotted path of the named steps after the root entry.
    pub fn field_path(&self) -> String {
        self.path
            .iter()
            .skip(1)
            .filter(|step| step.is_named())
            .map(|step| step.key.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}
