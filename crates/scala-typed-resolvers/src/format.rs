use xshell::{cmd, Shell};

/// Style profiles understood by [`Scalafmt`], as scalafmt HOCON settings.
const STYLE_PROFILES: &[(&str, &str)] = &[
    ("default", "version = \"3.8.3\"\nrunner.dialect = scala3\nmaxColumn = 120"),
    (
        "intellij",
        "version = \"3.8.3\"\nrunner.dialect = scala3\npreset = IntelliJ\nmaxColumn = 120",
    ),
    (
        "align",
        "version = \"3.8.3\"\nrunner.dialect = scala3\npreset = defaultWithAlign\nmaxColumn = 120",
    ),
];

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Unknown style profile '{0}'")]
    UnknownProfile(String),
    #[error(transparent)]
    Command(#[from] xshell::Error),
}

/// Normalizes the layout of generated source.
pub trait Formatter {
    fn format(&self, source: String, profile: &str) -> Result<String, FormatError>;
}

/// Returns the source untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl Formatter for Verbatim {
    fn format(&self, source: String, _profile: &str) -> Result<String, FormatError> {
        Ok(source)
    }
}

/// Pipes the source through the `scalafmt` CLI.
pub struct Scalafmt {
    shell: Shell,
}

impl Scalafmt {
    pub fn new() -> Result<Self, FormatError> {
        Ok(Self { shell: Shell::new()? })
    }
}

impl Formatter for Scalafmt {
    fn format(&self, source: String, profile: &str) -> Result<String, FormatError> {
        let config = style_config(profile)?;

        let mut formatted = cmd!(
            self.shell,
            "scalafmt --stdin --non-interactive --quiet --config-str {config}"
        )
        .stdin(source.as_str())
        .read()
        .inspect_err(|_| {
            tracing::error!("Failed to format generated code:\n{source}");
        })?;

        // `read` strips the trailing newline.
        formatted.push('\n');
        Ok(formatted)
    }
}

fn style_config(profile: &str) -> Result<&'static str, FormatError> {
    STYLE_PROFILES
        .iter()
        .find(|(name, _)| *name == profile)
        .map(|(_, config)| *config)
        .ok_or_else(|| FormatError::UnknownProfile(profile.to_owned()))
}
