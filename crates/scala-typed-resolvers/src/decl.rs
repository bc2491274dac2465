//! Scala declarations produced by the synthesizers, and how they render.

use std::fmt::{self, Write};

use crate::type_ref::TypeExpr;

pub(crate) const INDENT: &str = "  ";

const SUM_TYPE_PARENTS: &str = "scala.Product with scala.Serializable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Annotation {
    Description(String),
    Deprecated(String),
    InputName(String),
    Default(String),
    Interface,
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Description(text) => write!(f, "@GQLDescription({})", Quoted(text)),
            Annotation::Deprecated(reason) => write!(f, "@GQLDeprecated({})", Quoted(reason)),
            Annotation::InputName(name) => write!(f, "@GQLInputName({})", Quoted(name)),
            Annotation::Default(value) => write!(f, "@GQLDefault({})", Quoted(value)),
            Annotation::Interface => f.write_str("@GQLInterface"),
        }
    }
}

/// A Scala string literal.
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;

        for ch in self.0.chars() {
            match ch {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                ch => f.write_char(ch)?,
            }
        }

        f.write_char('"')
    }
}

/// Which Caliban capabilities a declaration derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Derives {
    Output,
    Input,
}

impl fmt::Display for Derives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Derives::Output => f.write_str(" derives caliban.schema.Schema.SemiAuto"),
            Derives::Input => f.write_str(" derives caliban.schema.Schema.SemiAuto, caliban.schema.ArgBuilder"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldDecl {
    pub(crate) name: String,
    pub(crate) ty: TypeExpr,
    pub(crate) annotations: Vec<Annotation>,
}

impl fmt::Display for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{annotation} ")?;
        }

        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// `final case class`, used for objects, inputs, args and operation roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordDecl {
    pub(crate) name: String,
    pub(crate) type_parameter: Option<String>,
    pub(crate) fields: Vec<FieldDecl>,
    pub(crate) parents: Vec<String>,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) derives: Option<Derives>,
}

impl RecordDecl {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        RecordDecl {
            name: name.into(),
            type_parameter: None,
            fields: Vec::new(),
            parents: Vec::new(),
            annotations: Vec::new(),
            derives: None,
        }
    }

    pub(crate) fn has_annotations(&self) -> bool {
        !self.annotations.is_empty() || self.fields.iter().any(|field| !field.annotations.is_empty())
    }
}

impl fmt::Display for RecordDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_annotations(f, &self.annotations)?;
        write!(f, "final case class {}", self.name)?;

        if let Some(parameter) = &self.type_parameter {
            write!(f, "[{parameter}[_]]")?;
        }

        f.write_char('(')?;
        for (index, field) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        f.write_char(')')?;

        for (index, parent) in self.parents.iter().enumerate() {
            let keyword = if index == 0 { "extends" } else { "with" };
            write!(f, " {keyword} {parent}")?;
        }

        if let Some(derives) = self.derives {
            write!(f, "{derives}")?;
        }

        f.write_char('\n')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VariantDecl {
    pub(crate) name: String,
    pub(crate) annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SumKind {
    Enum(Vec<VariantDecl>),
    /// Members extend the union, it declares nothing itself.
    Union,
    /// Abstract accessors every implementer provides.
    Interface(Vec<FieldDecl>),
}

/// `sealed trait`, used for enums, unions and interfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SumTypeDecl {
    pub(crate) name: String,
    pub(crate) kind: SumKind,
    pub(crate) type_parameter: Option<String>,
    pub(crate) parents: Vec<String>,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) derives: Option<Derives>,
}

impl SumTypeDecl {
    fn has_annotations(&self) -> bool {
        !self.annotations.is_empty()
            || match &self.kind {
                SumKind::Enum(variants) => variants.iter().any(|variant| !variant.annotations.is_empty()),
                SumKind::Union => false,
                SumKind::Interface(fields) => fields.iter().any(|field| !field.annotations.is_empty()),
            }
    }
}

impl fmt::Display for SumTypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;

        write_annotations(f, &self.annotations)?;
        write!(f, "sealed trait {name}")?;

        if let Some(parameter) = &self.type_parameter {
            write!(f, "[{parameter}[_]]")?;
        }

        write!(f, " extends {SUM_TYPE_PARENTS}")?;
        for parent in &self.parents {
            write!(f, " with {parent}")?;
        }

        if let Some(derives) = self.derives {
            write!(f, "{derives}")?;
        }

        match &self.kind {
            SumKind::Enum(variants) => {
                writeln!(f)?;
                writeln!(f, "object {name} {{")?;
                for variant in variants {
                    f.write_str(INDENT)?;
                    for annotation in &variant.annotations {
                        write!(f, "{annotation} ")?;
                    }
                    writeln!(f, "case object {} extends {name}", variant.name)?;
                }
                writeln!(f, "}}")
            }
            SumKind::Union => writeln!(f),
            SumKind::Interface(fields) if fields.is_empty() => writeln!(f),
            SumKind::Interface(fields) => {
                writeln!(f, " {{")?;
                for field in fields {
                    f.write_str(INDENT)?;
                    for annotation in &field.annotations {
                        write!(f, "{annotation} ")?;
                    }
                    writeln!(f, "def {}: {}", field.name, field.ty)?;
                }
                writeln!(f, "}}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Declaration {
    Record(RecordDecl),
    Sum(SumTypeDecl),
}

impl Declaration {
    pub(crate) fn has_annotations(&self) -> bool {
        match self {
            Declaration::Record(record) => record.has_annotations(),
            Declaration::Sum(sum) => sum.has_annotations(),
        }
    }
}

impl From<RecordDecl> for Declaration {
    fn from(record: RecordDecl) -> Self {
        Declaration::Record(record)
    }
}

impl From<SumTypeDecl> for Declaration {
    fn from(sum: SumTypeDecl) -> Self {
        Declaration::Sum(sum)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Record(record) => fmt::Display::fmt(record, f),
            Declaration::Sum(sum) => fmt::Display::fmt(sum, f),
        }
    }
}

fn write_annotations(f: &mut fmt::Formatter<'_>, annotations: &[Annotation]) -> fmt::Result {
    for annotation in annotations {
        writeln!(f, "{annotation}")?;
    }

    Ok(())
}
