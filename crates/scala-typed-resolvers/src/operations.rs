use graphql_parser::schema::ObjectType;

use crate::{
    analyze::RootKind,
    decl::{Derives, FieldDecl, RecordDecl},
    names::{sanitize, type_name},
    shapes::{description, field_annotations, Context},
    type_ref::{base_name, TypeExpr},
};

/// Query, Mutation and Subscription records, in that order.
pub(crate) struct OperationRoots {
    pub(crate) records: Vec<RecordDecl>,
    /// A Subscription field exists, so the stream type gets imported.
    pub(crate) has_subscription_fields: bool,
    /// Some field refers to a declaration of the types module.
    pub(crate) references_types: bool,
}

#[tracing::instrument(skip_all)]
pub(crate) fn synthesize_operations(ctx: &Context<'_, '_>) -> OperationRoots {
    let mut roots = OperationRoots {
        records: Vec::new(),
        has_subscription_fields: false,
        references_types: false,
    };

    for kind in RootKind::ALL {
        let Some(object) = ctx.schema.root(kind) else {
            continue;
        };

        if kind == RootKind::Subscription && !object.fields.is_empty() {
            roots.has_subscription_fields = true;
        }

        roots.references_types |= references_types(ctx, object);
        roots.records.push(root_record(ctx, kind, object));
    }

    roots
}

fn root_record<'a>(ctx: &Context<'_, 'a>, kind: RootKind, object: &'a ObjectType<'a, &'a str>) -> RecordDecl {
    let config = ctx.config;
    let mut record = RecordDecl::new(type_name(object.name));

    if config.is_effect_type_abstract {
        record.type_parameter = Some(config.effect_type.clone());
    } else if config.add_derives {
        record.derives = Some(Derives::Output);
    }

    record.annotations.extend(description(object.description.as_deref()));
    record.fields = object
        .fields
        .iter()
        .map(|field| {
            let result = ctx.translator.translate(&field.field_type);

            // Root fields already run in the effect, `@lazy` adds nothing here.
            let wrapped = match kind {
                RootKind::Query | RootKind::Mutation => TypeExpr::effect(&config.effect_type, result),
                RootKind::Subscription => TypeExpr::stream(result),
            };

            FieldDecl {
                name: sanitize(field.name).into_owned(),
                ty: wrapped.with_args(ctx.args.record_name(object.name, field.name)),
                annotations: field_annotations(field),
            }
        })
        .collect();

    record
}

fn references_types<'a>(ctx: &Context<'_, 'a>, object: &'a ObjectType<'a, &'a str>) -> bool {
    object.fields.iter().any(|field| {
        !field.arguments.is_empty() || {
            let name = base_name(&field.field_type);
            !ctx.translator.is_mapped(name) && ctx.schema.definition(name).is_some()
        }
    })
}
