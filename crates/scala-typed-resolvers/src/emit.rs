use std::{borrow::Cow, fmt};

use crate::{
    config::GenerationConfig,
    decl::{Declaration, RecordDecl, INDENT},
    operations::OperationRoots,
};

const TYPES_MODULE: &str = "Types";
const OPERATIONS_MODULE: &str = "Operations";
const STREAM_IMPORT: &str = "zio.stream.ZStream";
const ANNOTATIONS_IMPORT: &str = "caliban.schema.Annotations._";

pub(crate) struct Modules<'a> {
    pub(crate) args: &'a [RecordDecl],
    pub(crate) shapes: &'a [Declaration],
    pub(crate) operations: &'a OperationRoots,
}

impl Modules<'_> {
    fn has_types(&self) -> bool {
        !self.args.is_empty() || !self.shapes.is_empty()
    }

    fn has_operations(&self) -> bool {
        !self.operations.records.is_empty()
    }

    fn has_annotations(&self) -> bool {
        self.args
            .iter()
            .chain(&self.operations.records)
            .any(RecordDecl::has_annotations)
            || self.shapes.iter().any(Declaration::has_annotations)
    }
}

/// Package, imports, the types module, then the operations module.
pub(crate) fn emit<O>(out: &mut O, config: &GenerationConfig, modules: &Modules<'_>) -> fmt::Result
where
    O: fmt::Write,
{
    if !modules.has_types() && !modules.has_operations() {
        return out.write_char('\n');
    }

    write_package(out, config)?;
    write_imports(out, &imports(config, modules))?;

    if modules.has_types() {
        let declarations = modules
            .args
            .iter()
            .map(|record| record as &dyn fmt::Display)
            .chain(modules.shapes.iter().map(|declaration| declaration as &dyn fmt::Display));

        write_module(out, TYPES_MODULE, declarations)?;
    }

    if modules.has_operations() {
        if modules.has_types() {
            out.write_char('\n')?;
        }

        let declarations = modules
            .operations
            .records
            .iter()
            .map(|record| record as &dyn fmt::Display);

        write_module(out, OPERATIONS_MODULE, declarations)?;
    }

    Ok(())
}

fn write_package<O: fmt::Write>(out: &mut O, config: &GenerationConfig) -> fmt::Result {
    match &config.package_name {
        Some(package) => writeln!(out, "package {package}\n"),
        None => Ok(()),
    }
}

fn imports<'a>(config: &'a GenerationConfig, modules: &Modules<'_>) -> Vec<Cow<'a, str>> {
    let mut imports = Vec::new();

    if modules.has_types() && modules.has_operations() && modules.operations.references_types {
        imports.push(Cow::Owned(format!("{TYPES_MODULE}._")));
    }

    if modules.operations.has_subscription_fields {
        imports.push(Cow::Borrowed(STREAM_IMPORT));
    }

    if modules.has_annotations() {
        imports.push(Cow::Borrowed(ANNOTATIONS_IMPORT));
    }

    imports.extend(config.extra_imports.iter().map(|import| {
        let import = import.trim();
        Cow::Borrowed(import.strip_prefix("import ").unwrap_or(import).trim_start())
    }));

    imports
}

fn write_imports<O: fmt::Write>(out: &mut O, imports: &[Cow<'_, str>]) -> fmt::Result {
    if imports.is_empty() {
        return Ok(());
    }

    for import in imports {
        writeln!(out, "import {import}")?;
    }

    out.write_char('\n')
}

fn write_module<'d, O: fmt::Write>(
    out: &mut O,
    name: &str,
    declarations: impl Iterator<Item = &'d dyn fmt::Display>,
) -> fmt::Result {
    writeln!(out, "object {name} {{")?;

    for (index, declaration) in declarations.enumerate() {
        if index > 0 {
            out.write_char('\n')?;
        }

        for line in declaration.to_string().lines() {
            if line.is_empty() {
                out.write_char('\n')?;
            } else {
                writeln!(out, "{INDENT}{line}")?;
            }
        }
    }

    out.write_str("}\n")
}
