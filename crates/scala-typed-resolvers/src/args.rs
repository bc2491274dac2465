use graphql_parser::schema::Field;
use indexmap::IndexMap;

use crate::{
    analyze::{definition_name, AnalyzedSchema, FieldsOwner},
    decl::{Derives, FieldDecl, RecordDecl},
    names::{sanitize, NameResolver},
    shapes::input_value_annotations,
    type_ref::TypeTranslator,
};

/// Parameter records of every field declaring arguments.
pub(crate) struct ArgsRecords<'a> {
    names: NameResolver,
    by_field: IndexMap<(&'a str, &'a str), String>,
    /// In allocation order.
    pub(crate) records: Vec<RecordDecl>,
}

impl<'a> ArgsRecords<'a> {
    pub(crate) fn record_name(&self, owner: &'a str, field: &'a str) -> Option<&str> {
        self.by_field.get(&(owner, field)).map(String::as_str)
    }

    /// Fields implementing an interface field share the interface's record,
    /// so the accessor types line up.
    fn resolve(&mut self, ctx: &ArgsContext<'_, 'a>, owner: FieldsOwner<'a>, field: &'a Field<'a, &'a str>) {
        if self.by_field.contains_key(&(owner.name, field.name)) {
            return;
        }

        let (declaring_owner, declaring) = ctx
            .schema
            .declaring_field(owner, field.name)
            .unwrap_or((owner.name, field));

        if declaring.arguments.is_empty() {
            return;
        }

        let name = match self.by_field.get(&(declaring_owner, declaring.name)) {
            Some(name) => name.clone(),
            None => {
                let name = self.names.resolve(declaring_owner, declaring.name);
                self.records.push(args_record(ctx, &name, declaring));
                self.by_field.insert((declaring_owner, declaring.name), name.clone());
                name
            }
        };

        self.by_field.insert((owner.name, field.name), name);
    }
}

struct ArgsContext<'s, 'a> {
    schema: &'s AnalyzedSchema<'a>,
    translator: &'s TypeTranslator<'s>,
    add_derives: bool,
}

#[tracing::instrument(skip_all)]
pub(crate) fn synthesize_args<'a>(
    schema: &AnalyzedSchema<'a>,
    translator: &TypeTranslator<'_>,
    add_derives: bool,
) -> ArgsRecords<'a> {
    let ctx = ArgsContext {
        schema,
        translator,
        add_derives,
    };

    let mut args = ArgsRecords {
        names: NameResolver::new(schema.declared_type_names()),
        by_field: IndexMap::new(),
        records: Vec::new(),
    };

    for definition in &schema.definitions {
        let Some(owner) = schema.fields_owner(definition_name(definition)) else {
            continue;
        };

        for field in owner.fields.iter().filter(|field| !field.arguments.is_empty()) {
            args.resolve(&ctx, owner, field);
        }
    }

    tracing::debug!(records = args.records.len(), "Synthesized argument records");

    args
}

fn args_record<'a>(ctx: &ArgsContext<'_, 'a>, name: &str, field: &Field<'a, &'a str>) -> RecordDecl {
    let mut record = RecordDecl::new(name);

    record.fields = field
        .arguments
        .iter()
        .map(|argument| FieldDecl {
            name: sanitize(argument.name).into_owned(),
            ty: ctx.translator.translate(&argument.value_type),
            annotations: input_value_annotations(argument),
        })
        .collect();

    if ctx.add_derives {
        record.derives = Some(Derives::Input);
    }

    record
}
