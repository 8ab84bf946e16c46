//! SourceMapDocument entity
//!
//! Only `sources` is interpreted; every other field is carried through
//! untouched so a relocated map stays byte-compatible with its consumers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DeclResult;

/// A standard (v3) source map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMapDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, rename = "sourceRoot", skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,

    pub sources: Vec<String>,

    #[serde(default)]
    pub mappings: String,

    /// `names`, `sourcesContent` and any extension fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceMapDocument {
    pub fn parse(content: &str) -> DeclResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Compact JSON, as emitted by the compiler
    pub fn to_json(&self) -> DeclResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rewrite every `sources` entry in place
    pub fn map_sources(&mut self, mut f: impl FnMut(&str) -> String) {
        for source in &mut self.sources {
            *source = f(source);
        }
    }
}
