use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use graphql_parser::schema::Type;

use crate::names;

pub(crate) const STREAM_TYPE: &str = "ZStream";

/// A Scala type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TypeExpr {
    Named(String),
    Optional(Box<TypeExpr>),
    Sequence(Box<TypeExpr>),
    Effect { effect: String, inner: Box<TypeExpr> },
    Stream(Box<TypeExpr>),
    Function { args: String, result: Box<TypeExpr> },
}

impl TypeExpr {
    pub(crate) fn effect(effect: &str, inner: TypeExpr) -> Self {
        TypeExpr::Effect {
            effect: effect.to_owned(),
            inner: Box::new(inner),
        }
    }

    pub(crate) fn stream(inner: TypeExpr) -> Self {
        TypeExpr::Stream(Box::new(inner))
    }

    /// Resolver functions take their arguments as a single record.
    pub(crate) fn with_args(self, args: Option<&str>) -> Self {
        match args {
            Some(args) => TypeExpr::Function {
                args: args.to_owned(),
                result: Box::new(self),
            },
            None => self,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => f.write_str(name),
            TypeExpr::Optional(inner) => write!(f, "scala.Option[{inner}]"),
            TypeExpr::Sequence(inner) => write!(f, "List[{inner}]"),
            TypeExpr::Effect { effect, inner } => write!(f, "{effect}[{inner}]"),
            TypeExpr::Stream(inner) => write!(f, "{STREAM_TYPE}[Any, Nothing, {inner}]"),
            TypeExpr::Function { args, result } => write!(f, "{args} => {result}"),
        }
    }
}

fn builtin_scalar(name: &str) -> Option<&'static str> {
    Some(match name {
        "Int" => "Int",
        "Float" => "Double",
        "String" | "ID" => "String",
        "Boolean" => "Boolean",
        _ => return None,
    })
}

/// Name at the bottom of a list / non-null wrapper chain.
pub(crate) fn base_name<'a>(ty: &Type<'a, &'a str>) -> &'a str {
    match ty {
        Type::NamedType(name) => *name,
        Type::ListType(inner) | Type::NonNullType(inner) => base_name(inner),
    }
}

/// Maps GraphQL type references to Scala type expressions.
pub(crate) struct TypeTranslator<'a> {
    scalar_mappings: &'a BTreeMap<String, String>,
    // Declarations taking the effect as a type parameter, with the parameter name.
    parameterized: Option<(&'a BTreeSet<&'a str>, &'a str)>,
}

impl<'a> TypeTranslator<'a> {
    pub(crate) fn new(scalar_mappings: &'a BTreeMap<String, String>) -> Self {
        TypeTranslator {
            scalar_mappings,
            parameterized: None,
        }
    }

    pub(crate) fn with_effect_parameter(mut self, names: &'a BTreeSet<&'a str>, parameter: &'a str) -> Self {
        if !names.is_empty() {
            self.parameterized = Some((names, parameter));
        }
        self
    }

    pub(crate) fn translate<'t>(&self, ty: &Type<'t, &'t str>) -> TypeExpr {
        match ty {
            Type::NonNullType(inner) => self.translate_non_null(inner),
            nullable => TypeExpr::Optional(Box::new(self.translate_non_null(nullable))),
        }
    }

    fn translate_non_null<'t>(&self, ty: &Type<'t, &'t str>) -> TypeExpr {
        match ty {
            Type::NamedType(name) => self.base(name),
            Type::ListType(inner) => TypeExpr::Sequence(Box::new(self.translate(inner))),
            Type::NonNullType(inner) => self.translate_non_null(inner),
        }
    }

    pub(crate) fn base(&self, name: &str) -> TypeExpr {
        if let Some(mapped) = self.scalar_mappings.get(name) {
            return TypeExpr::Named(mapped.clone());
        }

        if let Some(builtin) = builtin_scalar(name) {
            return TypeExpr::Named(builtin.to_owned());
        }

        TypeExpr::Named(self.reference(name))
    }

    /// A reference to a generated declaration, applied to the effect
    /// parameter when the declaration takes one.
    pub(crate) fn reference(&self, name: &str) -> String {
        let rendered = names::type_name(name);

        match self.parameterized {
            Some((names, parameter)) if names.contains(name) => format!("{rendered}[{parameter}]"),
            _ => rendered.into_owned(),
        }
    }

    pub(crate) fn is_mapped(&self, name: &str) -> bool {
        self.scalar_mappings.contains_key(name) || builtin_scalar(name).is_some()
    }
}

/// Translates with the scalar mappings only.
pub fn translate<'a>(ty: &Type<'a, &'a str>, scalar_mappings: &BTreeMap<String, String>) -> String {
    TypeTranslator::new(scalar_mappings).translate(ty).to_string()
}
