use serde::{Deserialize, Serialize};
use std::fmt;

/// Request field a validation step reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Body,
    Query,
    Params,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Query, Source::Params, Source::Body];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Body => "body",
            Source::Query => "query",
            Source::Params => "params",
        }
    }

    /// Name of the side-channel slot holding the decoded value.
    pub fn local_key(&self) -> &'static str {
        match self {
            Source::Body => "typedBody",
            Source::Query => "typedQuery",
            Source::Params => "typedParams",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
