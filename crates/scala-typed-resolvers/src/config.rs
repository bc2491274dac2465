use std::collections::BTreeMap;

use crate::error::CodegenError;

pub const DEFAULT_EFFECT_TYPE: &str = "zio.UIO";
pub const DEFAULT_FORMAT_PROFILE: &str = "default";

/// Settings driving the generated Scala code.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Package clause written at the top of the file
    pub package_name: Option<String>,
    /// Wrapper for resolver results, e.g. `zio.UIO` or `zio.Task`. When the
    /// effect is abstract this is the name of the type parameter, e.g. `F`.
    pub effect_type: String,
    /// Render the effect as a `[F[_]]` type parameter on the operation roots
    pub is_effect_type_abstract: bool,
    /// Imports appended after the generated ones, in order
    pub extra_imports: Vec<String>,
    /// GraphQL scalar name to Scala type
    pub scalar_mappings: BTreeMap<String, String>,
    /// Annotate input records with their GraphQL name
    pub preserve_input_names: bool,
    /// Add Scala 3 `derives` clauses for the Caliban schema and argument builders
    pub add_derives: bool,
    /// Style profile handed to the formatter
    pub format_profile: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            package_name: None,
            effect_type: DEFAULT_EFFECT_TYPE.to_owned(),
            is_effect_type_abstract: false,
            extra_imports: Vec::new(),
            scalar_mappings: BTreeMap::new(),
            preserve_input_names: false,
            add_derives: false,
            format_profile: DEFAULT_FORMAT_PROFILE.to_owned(),
        }
    }
}

impl GenerationConfig {
    pub fn from_toml(source: &str) -> Result<Self, CodegenError> {
        Ok(toml::from_str(source)?)
    }
}
