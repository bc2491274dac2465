use graphql_parser::schema::{
    Directive, EnumType, Field, InputObjectType, InputValue, InterfaceType, ObjectType, TypeDefinition, UnionType,
    Value,
};

use crate::{
    analyze::{is_lazy, AnalyzedSchema, FieldsOwner},
    args::ArgsRecords,
    config::GenerationConfig,
    decl::{Annotation, Declaration, Derives, FieldDecl, RecordDecl, SumKind, SumTypeDecl, VariantDecl},
    names::{sanitize, type_name},
    type_ref::{TypeExpr, TypeTranslator},
};

const DEPRECATED_DIRECTIVE: &str = "deprecated";
const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// Everything the shape and operation synthesizers read.
pub(crate) struct Context<'s, 'a> {
    pub(crate) schema: &'s AnalyzedSchema<'a>,
    pub(crate) config: &'s GenerationConfig,
    pub(crate) translator: &'s TypeTranslator<'s>,
    pub(crate) args: &'s ArgsRecords<'a>,
}

impl<'a> Context<'_, 'a> {
    fn effect_parameter(&self, declaration: &str) -> Option<String> {
        self.schema
            .parameterized
            .contains(declaration)
            .then(|| self.config.effect_type.clone())
    }

    /// Declarations taking the effect as a parameter cannot derive.
    pub(crate) fn derives(&self, declaration: &str, derives: Derives) -> Option<Derives> {
        (self.config.add_derives && !self.schema.parameterized.contains(declaration)).then_some(derives)
    }

    /// Output field of a non-root type, lazy fields run in the effect. A
    /// field implementing an interface field is lazy when that one is.
    fn output_field(&self, owner: FieldsOwner<'a>, field: &'a Field<'a, &'a str>) -> FieldDecl {
        let mut ty = self.translator.translate(&field.field_type);

        let lazy = match self.schema.declaring_field(owner, field.name) {
            Some((_, declaring)) => is_lazy(declaring),
            None => is_lazy(field),
        };

        if lazy {
            ty = TypeExpr::effect(&self.config.effect_type, ty);
        }

        FieldDecl {
            name: sanitize(field.name).into_owned(),
            ty: ty.with_args(self.args.record_name(owner.name, field.name)),
            annotations: field_annotations(field),
        }
    }

    fn interface_references(&self, interfaces: &[&str]) -> Vec<String> {
        interfaces
            .iter()
            .map(|interface| self.translator.reference(interface))
            .collect()
    }
}

/// Objects, inputs, enums, unions then interfaces, each in declaration order.
#[tracing::instrument(skip_all)]
pub(crate) fn synthesize_shapes(ctx: &Context<'_, '_>) -> Vec<Declaration> {
    let mut objects: Vec<Declaration> = Vec::new();
    let mut inputs: Vec<Declaration> = Vec::new();
    let mut enums: Vec<Declaration> = Vec::new();
    let mut unions: Vec<Declaration> = Vec::new();
    let mut interfaces: Vec<Declaration> = Vec::new();

    for definition in ctx.schema.definitions.iter().copied() {
        match definition {
            TypeDefinition::Object(object) if ctx.schema.is_root(object.name) => (),
            TypeDefinition::Object(object) => objects.push(object_record(ctx, object).into()),
            TypeDefinition::InputObject(input) => inputs.push(input_record(ctx, input).into()),
            TypeDefinition::Enum(r#enum) => enums.push(enum_sum_type(ctx, r#enum).into()),
            TypeDefinition::Union(union) => unions.push(union_sum_type(ctx, union).into()),
            TypeDefinition::Interface(interface) => interfaces.push(interface_sum_type(ctx, interface).into()),
            TypeDefinition::Scalar(scalar) => {
                tracing::debug!("Scalar '{}' has no declaration, it goes through the mappings", scalar.name);
            }
        }
    }

    let mut declarations = objects;
    declarations.extend(inputs);
    declarations.extend(enums);
    declarations.extend(unions);
    declarations.extend(interfaces);
    declarations
}

fn object_record<'a>(ctx: &Context<'_, 'a>, object: &'a ObjectType<'a, &'a str>) -> RecordDecl {
    let mut record = RecordDecl::new(type_name(object.name));

    record.type_parameter = ctx.effect_parameter(object.name);
    record.annotations.extend(description(object.description.as_deref()));
    record.fields = object
        .fields
        .iter()
        .map(|field| ctx.output_field(object.into(), field))
        .collect();

    let mut parents = ctx.interface_references(&object.implements_interfaces);
    for union in ctx.schema.unions_of(object.name) {
        let union = type_name(union).into_owned();
        if !parents.contains(&union) {
            parents.push(union);
        }
    }
    record.parents = parents;
    record.derives = ctx.derives(object.name, Derives::Output);

    record
}

fn input_record<'a>(ctx: &Context<'_, 'a>, input: &'a InputObjectType<'a, &'a str>) -> RecordDecl {
    let mut record = RecordDecl::new(type_name(input.name));

    record.annotations.extend(description(input.description.as_deref()));
    if ctx.config.preserve_input_names {
        record.annotations.push(Annotation::InputName(input.name.to_owned()));
    }

    record.fields = input
        .fields
        .iter()
        .map(|field| FieldDecl {
            name: sanitize(field.name).into_owned(),
            ty: ctx.translator.translate(&field.value_type),
            annotations: input_value_annotations(field),
        })
        .collect();
    record.derives = ctx.derives(input.name, Derives::Input);

    record
}

fn enum_sum_type<'a>(ctx: &Context<'_, 'a>, r#enum: &'a EnumType<'a, &'a str>) -> SumTypeDecl {
    let variants = r#enum
        .values
        .iter()
        .map(|value| {
            let mut annotations = Vec::new();
            annotations.extend(description(value.description.as_deref()));
            annotations.extend(deprecation(&value.directives));

            VariantDecl {
                name: sanitize(value.name).into_owned(),
                annotations,
            }
        })
        .collect();

    // Enums may be decoded from arguments too.
    let derives = if ctx.schema.input_reachable.contains(r#enum.name) {
        Derives::Input
    } else {
        Derives::Output
    };

    SumTypeDecl {
        name: type_name(r#enum.name).into_owned(),
        kind: SumKind::Enum(variants),
        type_parameter: None,
        parents: Vec::new(),
        annotations: description(r#enum.description.as_deref()).into_iter().collect(),
        derives: ctx.derives(r#enum.name, derives),
    }
}

fn union_sum_type<'a>(ctx: &Context<'_, 'a>, union: &'a UnionType<'a, &'a str>) -> SumTypeDecl {
    SumTypeDecl {
        name: type_name(union.name).into_owned(),
        kind: SumKind::Union,
        type_parameter: None,
        parents: Vec::new(),
        annotations: description(union.description.as_deref()).into_iter().collect(),
        derives: ctx.derives(union.name, Derives::Output),
    }
}

fn interface_sum_type<'a>(ctx: &Context<'_, 'a>, interface: &'a InterfaceType<'a, &'a str>) -> SumTypeDecl {
    let mut annotations = vec![Annotation::Interface];
    annotations.extend(description(interface.description.as_deref()));

    SumTypeDecl {
        name: type_name(interface.name).into_owned(),
        kind: SumKind::Interface(
            interface
                .fields
                .iter()
                .map(|field| ctx.output_field(interface.into(), field))
                .collect(),
        ),
        type_parameter: ctx.effect_parameter(interface.name),
        parents: ctx.interface_references(&interface.implements_interfaces),
        annotations,
        derives: ctx.derives(interface.name, Derives::Output),
    }
}

pub(crate) fn description(description: Option<&str>) -> Option<Annotation> {
    description.map(|text| Annotation::Description(text.to_owned()))
}

fn deprecation<'a>(directives: &[Directive<'a, &'a str>]) -> Option<Annotation> {
    let directive = directives
        .iter()
        .find(|directive| directive.name == DEPRECATED_DIRECTIVE)?;

    let reason = directive
        .arguments
        .iter()
        .find(|(name, _)| *name == "reason")
        .and_then(|(_, value)| match value {
            Value::String(reason) => Some(reason.clone()),
            _ => None,
        })
        .unwrap_or_else(|| DEFAULT_DEPRECATION_REASON.to_owned());

    Some(Annotation::Deprecated(reason))
}

pub(crate) fn field_annotations<'a>(field: &Field<'a, &'a str>) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    annotations.extend(description(field.description.as_deref()));
    annotations.extend(deprecation(&field.directives));
    annotations
}

pub(crate) fn input_value_annotations<'a>(value: &InputValue<'a, &'a str>) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    annotations.extend(description(value.description.as_deref()));
    annotations.extend(deprecation(&value.directives));
    annotations.extend(
        value
            .default_value
            .as_ref()
            .map(|default| Annotation::Default(default.to_string())),
    );
    annotations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyze::analyze, args::synthesize_args};
    use expect_test::expect;
    use indoc::indoc;

    fn render(sdl: &str, config: &GenerationConfig) -> String {
        let document = graphql_parser::parse_schema::<&str>(sdl).unwrap();
        let schema = analyze(&document, config.is_effect_type_abstract);
        let translator = TypeTranslator::new(&config.scalar_mappings)
            .with_effect_parameter(&schema.parameterized, &config.effect_type);
        let args = synthesize_args(&schema, &translator, config.add_derives);
        let ctx = Context {
            schema: &schema,
            config,
            translator: &translator,
            args: &args,
        };

        synthesize_shapes(&ctx).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn declaration_order() {
        let rendered = render(
            indoc! {r#"
                interface Node { id: ID! }
                union SearchResult = User
                enum Role { ADMIN GUEST }
                input UserInput { name: String! }
                type User implements Node { id: ID!, role: Role }
                type Query { users: [User!]! }
                scalar DateTime
            "#},
            &GenerationConfig::default(),
        );

        expect![[r#"
            final case class User(id: String, role: scala.Option[Role]) extends Node with SearchResult
            final case class UserInput(name: String)
            sealed trait Role extends scala.Product with scala.Serializable
            object Role {
              case object ADMIN extends Role
              case object GUEST extends Role
            }
            sealed trait SearchResult extends scala.Product with scala.Serializable
            @GQLInterface
            sealed trait Node extends scala.Product with scala.Serializable {
              def id: String
            }
        "#]]
        .assert_eq(&rendered);
    }

    #[test]
    fn lazy_fields_run_in_the_effect() {
        let rendered = render(
            indoc! {r#"
                type User {
                  name: String!
                  friends(first: Int): [User!]! @lazy
                  avatar: String @lazy
                }
            "#},
            &GenerationConfig::default(),
        );

        expect![[r#"
            final case class User(name: String, friends: UserFriendsArgs => zio.UIO[List[User]], avatar: zio.UIO[scala.Option[String]])
        "#]]
        .assert_eq(&rendered);
    }

    #[test]
    fn implementers_follow_interface_laziness() {
        let rendered = render(
            indoc! {r#"
                interface Node { friends: [Node] @lazy }
                interface Named { label: String }
                type Person implements Node & Named {
                  friends: [Node]
                  label: String @lazy
                  name: String @lazy
                }
            "#},
            &GenerationConfig::default(),
        );

        expect![[r#"
            final case class Person(friends: zio.UIO[scala.Option[List[scala.Option[Node]]]], label: scala.Option[String], name: zio.UIO[scala.Option[String]]) extends Node with Named
            @GQLInterface
            sealed trait Node extends scala.Product with scala.Serializable {
              def friends: zio.UIO[scala.Option[List[scala.Option[Node]]]]
            }
            @GQLInterface
            sealed trait Named extends scala.Product with scala.Serializable {
              def label: scala.Option[String]
            }
        "#]]
        .assert_eq(&rendered);
    }

    #[test]
    fn enum_values_avoid_inherited_members() {
        let rendered = render("enum Signal { wait notify GO }", &GenerationConfig::default());

        expect![[r#"
            sealed trait Signal extends scala.Product with scala.Serializable
            object Signal {
              case object wait$ extends Signal
              case object notify$ extends Signal
              case object GO extends Signal
            }
        "#]]
        .assert_eq(&rendered);
    }

    #[test]
    fn descriptions_and_deprecations() {
        let rendered = render(
            indoc! {r#"
                "A crew member"
                type Pilot {
                  "Call sign"
                  name: String!
                  rank: Int @deprecated
                  wing: String @deprecated(reason: "Use \"squadron\"")
                }
                enum Origin {
                  "Home"
                  EARTH
                  BELT @deprecated(reason: "Mined out")
                }
            "#},
            &GenerationConfig::default(),
        );

        expect![[r#"
            @GQLDescription("A crew member")
            final case class Pilot(@GQLDescription("Call sign") name: String, @GQLDeprecated("No longer supported") rank: scala.Option[Int], @GQLDeprecated("Use \"squadron\"") wing: scala.Option[String])
            sealed trait Origin extends scala.Product with scala.Serializable
            object Origin {
              @GQLDescription("Home") case object EARTH extends Origin
              @GQLDeprecated("Mined out") case object BELT extends Origin
            }
        "#]]
        .assert_eq(&rendered);
    }

    #[test]
    fn preserved_input_names_and_derives() {
        let config = GenerationConfig {
            preserve_input_names: true,
            add_derives: true,
            ..GenerationConfig::default()
        };

        let rendered = render(
            indoc! {r#"
                type Query { users(filter: UserFilter): [User] }
                type User { role: Role, kind: Kind }
                input UserFilter { role: Role, limit: Int = 10 }
                enum Role { ADMIN }
                enum Kind { HUMAN }
            "#},
            &config,
        );

        expect![[r#"
            final case class User(role: scala.Option[Role], kind: scala.Option[Kind]) derives caliban.schema.Schema.SemiAuto
            @GQLInputName("UserFilter")
            final case class UserFilter(role: scala.Option[Role], @GQLDefault("10") limit: scala.Option[Int]) derives caliban.schema.Schema.SemiAuto, caliban.schema.ArgBuilder
            sealed trait Role extends scala.Product with scala.Serializable derives caliban.schema.Schema.SemiAuto, caliban.schema.ArgBuilder
            object Role {
              case object ADMIN extends Role
            }
            sealed trait Kind extends scala.Product with scala.Serializable derives caliban.schema.Schema.SemiAuto
            object Kind {
              case object HUMAN extends Kind
            }
        "#]]
        .assert_eq(&rendered);
    }

    #[test]
    fn abstract_effect_parameterizes_lazy_types() {
        let config = GenerationConfig {
            effect_type: "F".to_owned(),
            is_effect_type_abstract: true,
            add_derives: true,
            ..GenerationConfig::default()
        };

        let rendered = render(
            indoc! {r#"
                type Post { author: Author! }
                type Author { name: String @lazy }
                type Tag { label: String }
            "#},
            &config,
        );

        expect![[r#"
            final case class Post[F[_]](author: Author[F])
            final case class Author[F[_]](name: F[scala.Option[String]])
            final case class Tag(label: scala.Option[String]) derives caliban.schema.Schema.SemiAuto
        "#]]
        .assert_eq(&rendered);
    }
}
