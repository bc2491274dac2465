use std::{borrow::Cow, collections::BTreeSet};

/// Scala hard keywords. An identifier matching one of these is backquoted.
const RESERVED_KEYWORDS: &[&str] = &[
    "_",
    "abstract",
    "case",
    "catch",
    "class",
    "def",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "final",
    "finally",
    "for",
    "forSome",
    "given",
    "if",
    "implicit",
    "import",
    "lazy",
    "macro",
    "match",
    "new",
    "null",
    "object",
    "override",
    "package",
    "private",
    "protected",
    "return",
    "sealed",
    "super",
    "then",
    "this",
    "throw",
    "trait",
    "true",
    "try",
    "type",
    "val",
    "var",
    "while",
    "with",
    "yield",
];

/// Members every case class inherits. Backquoting does not stop a case class
/// field from shadowing them, so these get a `$` suffix instead.
const RESERVED_MEMBERS: &[&str] = &[
    "canEqual",
    "clone",
    "copy",
    "equals",
    "finalize",
    "getClass",
    "hashCode",
    "notify",
    "notifyAll",
    "productArity",
    "productElement",
    "productIterator",
    "productPrefix",
    "toString",
    "wait",
];

const MEMBER_MARKER: char = '$';

/// Turns a GraphQL field, argument or enum value name into a Scala identifier.
pub fn sanitize(identifier: &str) -> Cow<'_, str> {
    if needs_backquotes(identifier) {
        Cow::Owned(format!("`{identifier}`"))
    } else if RESERVED_MEMBERS.contains(&identifier) {
        Cow::Owned(format!("{identifier}{MEMBER_MARKER}"))
    } else {
        Cow::Borrowed(identifier)
    }
}

/// Type names skip the member rule, they never shadow members.
pub fn type_name(name: &str) -> Cow<'_, str> {
    if needs_backquotes(name) {
        Cow::Owned(format!("`{name}`"))
    } else {
        Cow::Borrowed(name)
    }
}

// A trailing underscore glues the next operator character onto the
// identifier, so `user_: Int` reads as the name `user_:`.
fn needs_backquotes(identifier: &str) -> bool {
    RESERVED_KEYWORDS.contains(&identifier) || identifier.ends_with('_')
}

/// `user_by_id` and `userById` both become `UserById`.
pub(crate) fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for word in name.split('_').filter(|word| !word.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    out
}

/// Hands out args record names that clash neither with declared types nor
/// with each other.
pub(crate) struct NameResolver {
    taken: BTreeSet<String>,
}

impl NameResolver {
    pub(crate) fn new<'a>(declared_type_names: impl IntoIterator<Item = &'a str>) -> Self {
        NameResolver {
            taken: declared_type_names.into_iter().map(str::to_owned).collect(),
        }
    }

    pub(crate) fn resolve(&mut self, owner: &str, field: &str) -> String {
        let base = format!("{}{}Args", pascal_case(owner), pascal_case(field));
        let mut candidate = base.clone();
        let mut suffix = 2;

        while self.taken.contains(&candidate) {
            candidate = format!("{base}{suffix}");
            suffix += 1;
        }

        self.taken.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn keywords_are_backquoted() {
        assert_eq!(sanitize("type"), "`type`");
        assert_eq!(sanitize("val"), "`val`");
        assert_eq!(type_name("object"), "`object`");
    }

    #[test]
    fn trailing_underscores_are_backquoted() {
        assert_eq!(sanitize("_"), "`_`");
        assert_eq!(sanitize("user_"), "`user_`");
        assert_eq!(sanitize("__typename_"), "`__typename_`");
        assert_eq!(type_name("Node_"), "`Node_`");
        assert!(matches!(sanitize("_id"), Cow::Borrowed("_id")));
    }

    #[test]
    fn case_class_members_get_a_marker() {
        assert_eq!(sanitize("wait"), "wait$");
        assert_eq!(sanitize("toString"), "toString$");
        assert_eq!(sanitize("copy"), "copy$");
    }

    #[test]
    fn type_names_keep_member_names() {
        assert_eq!(type_name("wait"), "wait");
    }

    #[test]
    fn plain_identifiers_pass_through() {
        assert!(matches!(sanitize("name"), Cow::Borrowed("name")));
        assert!(matches!(sanitize("Type"), Cow::Borrowed("Type")));
    }

    #[test]
    fn pascal_case_keeps_inner_capitals() {
        let rendered = ["user", "userById", "user_by_id", "getURL", "_private"]
            .iter()
            .map(|name| pascal_case(name))
            .collect::<Vec<_>>()
            .join(" ");

        expect!["User UserById UserById GetURL Private"].assert_eq(&rendered);
    }

    #[test]
    fn args_names_never_collide() {
        let mut resolver = NameResolver::new(["QueryUserArgs"]);

        assert_eq!(resolver.resolve("Query", "user"), "QueryUserArgs2");
        assert_eq!(resolver.resolve("Query", "user_name"), "QueryUserNameArgs");
        assert_eq!(resolver.resolve("Query", "userName"), "QueryUserNameArgs2");
        assert_eq!(resolver.resolve("Query", "user"), "QueryUserArgs3");
    }
}
