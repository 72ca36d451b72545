// ABOUTME: Builder for the argv handed to the pack binary.
// ABOUTME: Renders booleans, valued options and repeatable options as pack flags.

use std::fmt::Display;

/// Ordered argv for one pack invocation.
///
/// Tokens are emitted in the order the builder methods are called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackArgs(Vec<String>);

impl PackArgs {
    /// Start with the pack subcommand words, e.g. `["sbom", "download"]`.
    pub fn command<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(words.into_iter().map(Into::into).collect())
    }

    /// Positional argument.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.0.push(value.into());
        self
    }

    /// `--name` when enabled, nothing otherwise.
    pub fn flag(mut self, name: &str, enabled: bool) -> Self {
        if enabled {
            self.0.push(format!("--{name}"));
        }
        self
    }

    /// `--name value` when a value is present.
    pub fn opt<V: Display>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.0.push(format!("--{name}"));
            self.0.push(value.to_string());
        }
        self
    }

    /// One `--name value` pair per value.
    pub fn multi(mut self, name: &str, values: &[String]) -> Self {
        for value in values {
            self.0.push(format!("--{name}"));
            self.0.push(value.clone());
        }
        self
    }

    /// Raw tokens appended verbatim.
    pub fn extend<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_only_render_when_true() {
        let args = PackArgs::command(["build"])
            .flag("publish", true)
            .flag("clear-cache", false);
        assert_eq!(args.as_slice(), ["build", "--publish"]);
    }

    #[test]
    fn absent_options_are_skipped() {
        let args = PackArgs::command(["build"])
            .opt("gid", Some(1000))
            .opt::<String>("network", None);
        assert_eq!(args.as_slice(), ["build", "--gid", "1000"]);
    }

    #[test]
    fn repeatable_options_keep_order() {
        let tags = vec!["a:1".to_string(), "b:2".to_string()];
        let args = PackArgs::default().multi("tag", &tags);
        assert_eq!(args.as_slice(), ["--tag", "a:1", "--tag", "b:2"]);
    }

    #[test]
    fn extend_appends_raw_tokens() {
        let args = PackArgs::command(["inspect"])
            .arg("img")
            .extend(["--docker-host", "inherit"]);
        assert_eq!(
            args.into_vec(),
            vec!["inspect", "img", "--docker-host", "inherit"]
        );
    }
}
