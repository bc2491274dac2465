#![allow(unused_crate_dependencies)]

mod analyze;
mod args;
mod config;
mod decl;
mod emit;
mod error;
mod format;
mod names;
mod operations;
mod shapes;
mod type_ref;

use graphql_parser::schema::Document;

pub use self::{
    config::{GenerationConfig, DEFAULT_EFFECT_TYPE, DEFAULT_FORMAT_PROFILE},
    error::CodegenError,
    format::{FormatError, Formatter, Scalafmt, Verbatim},
    names::{sanitize, type_name},
    type_ref::translate,
};
pub use graphql_parser;

/// Generate a Scala source file with Caliban-ready case classes for every type of the passed in
/// SDL schema, plus one record per operation root whose fields are the resolver signatures.
pub fn generate<F>(graphql_sdl: &str, config: &GenerationConfig, formatter: &F) -> Result<String, CodegenError>
where
    F: Formatter + ?Sized,
{
    let parsed_schema = graphql_parser::parse_schema::<&str>(graphql_sdl)?;
    let source = synthesize(&parsed_schema, config)?;

    Ok(formatter.format(source, &config.format_profile)?)
}

/// Same as [`generate`] on an already parsed document, without formatting.
#[tracing::instrument(skip_all)]
pub fn synthesize<'a>(document: &'a Document<'a, &'a str>, config: &GenerationConfig) -> Result<String, CodegenError> {
    let schema = analyze::analyze(document, config.is_effect_type_abstract);
    if schema.is_empty() {
        tracing::debug!("No type definitions to generate code for");
    }

    let translator = type_ref::TypeTranslator::new(&config.scalar_mappings)
        .with_effect_parameter(&schema.parameterized, &config.effect_type);
    let args = args::synthesize_args(&schema, &translator, config.add_derives);

    let ctx = shapes::Context {
        schema: &schema,
        config,
        translator: &translator,
        args: &args,
    };
    let shapes = shapes::synthesize_shapes(&ctx);
    let operations = operations::synthesize_operations(&ctx);

    let mut out = String::new();
    emit::emit(
        &mut out,
        config,
        &emit::Modules {
            args: &args.records,
            shapes: &shapes,
            operations: &operations,
        },
    )?;

    Ok(out)
}
