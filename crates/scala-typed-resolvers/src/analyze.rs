use std::collections::BTreeSet;

use graphql_parser::schema::{
    Definition, Document, Field, InputObjectType, InterfaceType, ObjectType, TypeDefinition, TypeExtension,
};
use indexmap::IndexMap;

use crate::type_ref::base_name;

pub(crate) const LAZY_DIRECTIVE: &str = "lazy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RootKind {
    Query,
    Mutation,
    Subscription,
}

impl RootKind {
    pub(crate) const ALL: [RootKind; 3] = [RootKind::Query, RootKind::Mutation, RootKind::Subscription];

    fn default_type_name(self) -> &'static str {
        match self {
            RootKind::Query => "Query",
            RootKind::Mutation => "Mutation",
            RootKind::Subscription => "Subscription",
        }
    }
}

/// Index over a schema document, built once before synthesis.
pub(crate) struct AnalyzedSchema<'a> {
    /// Type definitions in declaration order.
    pub(crate) definitions: Vec<&'a TypeDefinition<'a, &'a str>>,
    definitions_by_name: IndexMap<&'a str, &'a TypeDefinition<'a, &'a str>>,
    query: Option<&'a str>,
    mutation: Option<&'a str>,
    subscription: Option<&'a str>,
    /// Unions an object belongs to, in union declaration order.
    union_membership: IndexMap<&'a str, Vec<&'a str>>,
    /// Types that can be passed as operation input.
    pub(crate) input_reachable: BTreeSet<&'a str>,
    /// Declarations that take the effect as a type parameter.
    pub(crate) parameterized: BTreeSet<&'a str>,
}

/// Fields shared by object and interface definitions.
#[derive(Clone, Copy)]
pub(crate) struct FieldsOwner<'a> {
    pub(crate) name: &'a str,
    pub(crate) implements_interfaces: &'a [&'a str],
    pub(crate) fields: &'a [Field<'a, &'a str>],
}

impl<'a> From<&'a ObjectType<'a, &'a str>> for FieldsOwner<'a> {
    fn from(object: &'a ObjectType<'a, &'a str>) -> Self {
        FieldsOwner {
            name: object.name,
            implements_interfaces: &object.implements_interfaces,
            fields: &object.fields,
        }
    }
}

impl<'a> From<&'a InterfaceType<'a, &'a str>> for FieldsOwner<'a> {
    fn from(interface: &'a InterfaceType<'a, &'a str>) -> Self {
        FieldsOwner {
            name: interface.name,
            implements_interfaces: &interface.implements_interfaces,
            fields: &interface.fields,
        }
    }
}

impl<'a> AnalyzedSchema<'a> {
    pub(crate) fn definition(&self, name: &str) -> Option<&'a TypeDefinition<'a, &'a str>> {
        self.definitions_by_name.get(name).copied()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub(crate) fn root_name(&self, kind: RootKind) -> Option<&'a str> {
        match kind {
            RootKind::Query => self.query,
            RootKind::Mutation => self.mutation,
            RootKind::Subscription => self.subscription,
        }
    }

    pub(crate) fn root(&self, kind: RootKind) -> Option<&'a ObjectType<'a, &'a str>> {
        match self.definition(self.root_name(kind)?)? {
            TypeDefinition::Object(object) => Some(object),
            _ => None,
        }
    }

    pub(crate) fn is_root(&self, name: &str) -> bool {
        RootKind::ALL
            .iter()
            .any(|kind| self.root_name(*kind) == Some(name))
    }

    pub(crate) fn fields_owner(&self, name: &str) -> Option<FieldsOwner<'a>> {
        match self.definition(name)? {
            TypeDefinition::Object(object) => Some(object.into()),
            TypeDefinition::Interface(interface) => Some(interface.into()),
            _ => None,
        }
    }

    pub(crate) fn interface(&self, name: &str) -> Option<&'a InterfaceType<'a, &'a str>> {
        match self.definition(name)? {
            TypeDefinition::Interface(interface) => Some(interface),
            _ => None,
        }
    }

    pub(crate) fn unions_of(&self, object_name: &str) -> &[&'a str] {
        self.union_membership
            .get(object_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The topmost interface field that `field_name` of `owner` implements,
    /// with the interface declaring it. Implementers take their accessor
    /// shape from it.
    pub(crate) fn declaring_field(
        &self,
        owner: FieldsOwner<'a>,
        field_name: &str,
    ) -> Option<(&'a str, &'a Field<'a, &'a str>)> {
        let mut visited = BTreeSet::from([owner.name]);
        let mut current = owner;
        let mut declaring = None;

        loop {
            let next = current
                .implements_interfaces
                .iter()
                .filter(|interface| !visited.contains(*interface))
                .filter_map(|interface| self.interface(interface))
                .find_map(|interface| {
                    interface
                        .fields
                        .iter()
                        .find(|field| field.name == field_name)
                        .map(|field| (interface, field))
                });

            let Some((interface, field)) = next else {
                break declaring;
            };

            visited.insert(interface.name);
            declaring = Some((interface.name, field));
            current = interface.into();
        }
    }

    /// Names of every declaration that ends up in the types module.
    pub(crate) fn declared_type_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.definitions_by_name.keys().copied()
    }
}

#[tracing::instrument(skip_all)]
pub(crate) fn analyze<'a>(document: &'a Document<'a, &'a str>, effect_is_abstract: bool) -> AnalyzedSchema<'a> {
    let mut definitions = Vec::new();
    let mut schema_definition = None;

    for definition in &document.definitions {
        match definition {
            Definition::TypeDefinition(type_definition) => definitions.push(type_definition),
            Definition::SchemaDefinition(schema) => schema_definition = Some(schema),
            Definition::TypeExtension(extension) => {
                tracing::warn!("Type extensions are not supported, skipping '{}'", extension_name(extension));
            }
            Definition::DirectiveDefinition(directive) => {
                tracing::debug!("Skipping directive definition '@{}'", directive.name);
            }
        }
    }

    let definitions_by_name: IndexMap<_, _> = definitions
        .iter()
        .map(|definition| (definition_name(definition), *definition))
        .collect();

    let root = |kind: RootKind| -> Option<&'a str> {
        match schema_definition {
            Some(schema) => match kind {
                RootKind::Query => schema.query,
                RootKind::Mutation => schema.mutation,
                RootKind::Subscription => schema.subscription,
            },
            None => {
                let name = kind.default_type_name();
                definitions_by_name
                    .get_key_value(name)
                    .filter(|(_, definition)| matches!(definition, TypeDefinition::Object(_)))
                    .map(|(name, _)| *name)
            }
        }
    };

    let mut union_membership: IndexMap<&'a str, Vec<&'a str>> = IndexMap::new();

    for definition in &definitions {
        let TypeDefinition::Union(union) = definition else {
            continue;
        };

        for member in &union.types {
            let unions = union_membership.entry(*member).or_default();
            if !unions.contains(&union.name) {
                unions.push(union.name);
            }
        }
    }

    let mut schema = AnalyzedSchema {
        query: root(RootKind::Query),
        mutation: root(RootKind::Mutation),
        subscription: root(RootKind::Subscription),
        definitions,
        definitions_by_name,
        union_membership,
        input_reachable: BTreeSet::new(),
        parameterized: BTreeSet::new(),
    };

    schema.input_reachable = collect_input_reachable(&schema);

    if effect_is_abstract {
        schema.parameterized = collect_parameterized(&schema);
    }

    tracing::debug!(
        definitions = schema.definitions.len(),
        parameterized = schema.parameterized.len(),
        "Analyzed schema"
    );

    schema
}

/// Input objects, plus everything an argument or input field refers to.
fn collect_input_reachable<'a>(schema: &AnalyzedSchema<'a>) -> BTreeSet<&'a str> {
    let mut pending = Vec::new();

    for definition in &schema.definitions {
        match definition {
            TypeDefinition::Object(ObjectType { fields, .. })
            | TypeDefinition::Interface(InterfaceType { fields, .. }) => {
                pending.extend(
                    fields
                        .iter()
                        .flat_map(|field| &field.arguments)
                        .map(|argument| base_name(&argument.value_type)),
                );
            }
            TypeDefinition::InputObject(input) => pending.push(input.name),
            _ => (),
        }
    }

    let mut reachable = BTreeSet::new();

    while let Some(name) = pending.pop() {
        if !reachable.insert(name) {
            continue;
        }

        if let Some(TypeDefinition::InputObject(InputObjectType { fields, .. })) = schema.definition(name) {
            pending.extend(fields.iter().map(|field| base_name(&field.value_type)));
        }
    }

    reachable
}

/// Non-root objects and interfaces with a lazy field, anything referring to
/// them, and the implementers of parameterized interfaces.
fn collect_parameterized<'a>(schema: &AnalyzedSchema<'a>) -> BTreeSet<&'a str> {
    let owners = schema
        .definitions
        .iter()
        .filter_map(|definition| schema.fields_owner(definition_name(definition)))
        .filter(|owner| !schema.is_root(owner.name))
        .collect::<Vec<_>>();

    let mut parameterized = owners
        .iter()
        .filter(|owner| owner.fields.iter().any(is_lazy))
        .map(|owner| owner.name)
        .collect::<BTreeSet<_>>();

    loop {
        let before = parameterized.len();

        for owner in &owners {
            if parameterized.contains(owner.name) {
                continue;
            }

            let refers_to_parameterized = owner
                .fields
                .iter()
                .any(|field| parameterized.contains(base_name(&field.field_type)))
                || owner
                    .implements_interfaces
                    .iter()
                    .any(|interface| parameterized.contains(interface));

            if refers_to_parameterized {
                parameterized.insert(owner.name);
            }
        }

        if parameterized.len() == before {
            break parameterized;
        }
    }
}

pub(crate) fn is_lazy<'a>(field: &Field<'a, &'a str>) -> bool {
    field.directives.iter().any(|directive| directive.name == LAZY_DIRECTIVE)
}

pub(crate) fn definition_name<'a>(definition: &TypeDefinition<'a, &'a str>) -> &'a str {
    match definition {
        TypeDefinition::Scalar(scalar) => scalar.name,
        TypeDefinition::Object(object) => object.name,
        TypeDefinition::Interface(interface) => interface.name,
        TypeDefinition::Union(union) => union.name,
        TypeDefinition::Enum(r#enum) => r#enum.name,
        TypeDefinition::InputObject(input) => input.name,
    }
}

fn extension_name<'a>(extension: &TypeExtension<'a, &'a str>) -> &'a str {
    match extension {
        TypeExtension::Scalar(scalar) => scalar.name,
        TypeExtension::Object(object) => object.name,
        TypeExtension::Interface(interface) => interface.name,
        TypeExtension::Union(union) => union.name,
        TypeExtension::Enum(r#enum) => r#enum.name,
        TypeExtension::InputObject(input) => input.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn default_roots() {
        let document = graphql_parser::parse_schema::<&str>(indoc! {r#"
            type Subscription { ticks: Int }
            type Query { hello: String }
            input Mutation { value: Int }
        "#})
        .unwrap();

        let schema = analyze(&document, false);

        assert_eq!(schema.root_name(RootKind::Query), Some("Query"));
        assert_eq!(schema.root_name(RootKind::Mutation), None);
        assert_eq!(schema.root_name(RootKind::Subscription), Some("Subscription"));
    }

    #[test]
    fn schema_definition_roots() {
        let document = graphql_parser::parse_schema::<&str>(indoc! {r#"
            schema { query: RootQuery }
            type RootQuery { hello: String }
            type Mutation { bye: String }
        "#})
        .unwrap();

        let schema = analyze(&document, false);

        assert_eq!(schema.root_name(RootKind::Query), Some("RootQuery"));
        assert_eq!(schema.root_name(RootKind::Mutation), None);
        assert!(schema.root(RootKind::Query).is_some());
    }

    #[test]
    fn union_membership_in_declaration_order() {
        let document = graphql_parser::parse_schema::<&str>(indoc! {r#"
            union Problems = Timeout | NotFound
            union AllErrors = NotFound | Timeout | NotFound
            type NotFound { message: String }
            type Timeout { message: String }
        "#})
        .unwrap();

        let schema = analyze(&document, false);

        assert_eq!(schema.unions_of("NotFound"), ["Problems", "AllErrors"]);
        assert_eq!(schema.unions_of("Timeout"), ["Problems", "AllErrors"]);
        assert!(schema.unions_of("Problems").is_empty());
    }

    #[test]
    fn input_reachability() {
        let document = graphql_parser::parse_schema::<&str>(indoc! {r#"
            type Query { users(filter: UserFilter, order: Order): [User] }
            type User { role: Role }
            input UserFilter { role: Role, nested: Nested }
            input Nested { value: Int }
            input Unused { value: Int }
            enum Role { ADMIN }
            enum Order { ASC }
        "#})
        .unwrap();

        let schema = analyze(&document, false);

        assert_eq!(
            schema.input_reachable.iter().copied().collect::<Vec<_>>(),
            ["Int", "Nested", "Order", "Role", "Unused", "UserFilter"]
        );
    }

    #[test]
    fn declaring_fields_come_from_the_topmost_interface() {
        let document = graphql_parser::parse_schema::<&str>(indoc! {r#"
            interface Node { id: ID! }
            interface Entity implements Node { id: ID!, name: String }
            type User implements Entity & Node { id: ID!, name: String, age: Int }
        "#})
        .unwrap();

        let schema = analyze(&document, false);
        let user = schema.fields_owner("User").unwrap();
        let declared_by = |field| schema.declaring_field(user, field).map(|(owner, _)| owner);

        assert_eq!(declared_by("id"), Some("Node"));
        assert_eq!(declared_by("name"), Some("Entity"));
        assert_eq!(declared_by("age"), None);
        assert_eq!(
            schema.declaring_field(schema.fields_owner("Node").unwrap(), "id"),
            None
        );
    }

    #[test]
    fn parameterized_closure() {
        let sdl = indoc! {r#"
            type Query { user: User }
            interface Node { friends: [Node] @lazy }
            type User implements Node { friends: [Node], posts: [Post] }
            type Post { author: Author }
            type Author { name: String @lazy }
            type Plain { name: String }
        "#};
        let document = graphql_parser::parse_schema::<&str>(sdl).unwrap();

        assert!(analyze(&document, false).parameterized.is_empty());
        assert_eq!(
            analyze(&document, true).parameterized.into_iter().collect::<Vec<_>>(),
            ["Author", "Node", "Post", "User"]
        );
    }
}
