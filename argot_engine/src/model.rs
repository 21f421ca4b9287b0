/// The cardinality of inputs to match for a parameter.
///
/// Inspired by argparse: <https://docs.python.org/3/library/argparse.html#nargs>
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Nargs {
    /// No explicit cardinality: precisely one value, stored as a single value.
    #[default]
    Single,
    /// `N`: Precisely `N` values, stored as a list.
    Precisely(u8),
    /// `?`: Zero or one value.
    Optional,
    /// `*`: May be any number of values, including `0`.
    Any,
    /// `+`: At least one value must be specified.
    AtLeastOne,
    /// Every remaining token, regardless of its shape.
    Remainder,
    /// One selector token followed by every remaining token.
    /// Reserved for sub-command branches.
    SubCommand,
    /// Consumes nothing and stores nothing.
    Suppress,
}

impl Nargs {
    /// Whether this cardinality never consumes a token.
    pub fn is_zero(&self) -> bool {
        matches!(self, Nargs::Precisely(0) | Nargs::Suppress)
    }

    pub(crate) fn expectation(&self) -> String {
        match self {
            Nargs::Single => "expected one argument".to_string(),
            Nargs::Optional => "expected at most one argument".to_string(),
            Nargs::AtLeastOne => "expected at least one argument".to_string(),
            Nargs::Precisely(n) => format!("expected {n} argument(s)"),
            Nargs::Any | Nargs::Remainder | Nargs::Suppress => {
                "expected 0 argument(s)".to_string()
            }
            Nargs::SubCommand => "expected a sub-command".to_string(),
        }
    }
}

impl std::fmt::Display for Nargs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The class of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentKind {
    /// Matched by position.
    Positional,
    /// Matched by one of its option strings (ex: `--name` or `-n`).
    Optional,
    /// Matched by position; its first value selects a nested parser.
    SubCommand,
}

/// The declared description of one parameter.
///
/// Specs are mutable while they are being declared (see [`Action::initialize`](crate::prelude::Action::initialize)).
/// Once the parser is built they are only ever read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    kind: ArgumentKind,
    option_strings: Vec<String>,
    dest: Option<String>,
    nargs: Nargs,
    required: bool,
    default: Vec<String>,
    constant: Vec<String>,
    choices: Vec<String>,
    help: Option<String>,
    metavar: Option<String>,
    pub(crate) choice_help: Vec<(String, String)>,
}

impl ArgumentSpec {
    pub(crate) fn new(kind: ArgumentKind, option_strings: Vec<String>, dest: Option<String>) -> Self {
        Self {
            kind,
            option_strings,
            dest,
            nargs: Nargs::default(),
            required: false,
            default: Vec::default(),
            constant: Vec::default(),
            choices: Vec::default(),
            help: None,
            metavar: None,
            choice_help: Vec::default(),
        }
    }

    /// The class of this parameter.
    pub fn kind(&self) -> ArgumentKind {
        self.kind
    }

    /// The option strings (empty for positionals and sub-command branches).
    pub fn option_strings(&self) -> &[String] {
        &self.option_strings
    }

    /// The key under which values are stored, or `None` when storage is suppressed.
    pub fn dest(&self) -> Option<&str> {
        self.dest.as_deref()
    }

    /// How many tokens this parameter consumes.
    pub fn nargs(&self) -> Nargs {
        self.nargs
    }

    /// Whether the parse fails when this parameter is absent.
    pub fn required(&self) -> bool {
        self.required
    }

    /// The values stored when the parameter is not supplied.
    pub fn default(&self) -> &[String] {
        &self.default
    }

    /// The values stored by const-style actions.
    pub fn constant(&self) -> &[String] {
        &self.constant
    }

    /// The allowed values (empty means unrestricted).
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// The description shown in the help message.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The display name for this parameter's values in usage & help.
    pub fn metavar(&self) -> Option<&str> {
        self.metavar.as_deref()
    }

    /// Override the cardinality.
    pub fn set_nargs(&mut self, nargs: Nargs) {
        self.nargs = nargs;
    }

    /// Override whether the parameter is required.
    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Override the default values.
    pub fn set_default(&mut self, default: Vec<String>) {
        self.default = default;
    }

    /// Override the constant values.
    pub fn set_constant(&mut self, constant: Vec<String>) {
        self.constant = constant;
    }

    /// Override the storage key.
    pub fn set_dest(&mut self, dest: Option<String>) {
        self.dest = dest;
    }

    pub(crate) fn set_choices(&mut self, choices: Vec<String>) {
        self.choices = choices;
    }

    pub(crate) fn set_help(&mut self, help: Option<String>) {
        self.help = help;
    }

    pub(crate) fn set_metavar(&mut self, metavar: Option<String>) {
        self.metavar = metavar;
    }

    /// The name used to refer to this parameter in error messages.
    ///
    /// ### Example
    /// ```
    /// # use argot_engine as argot;
    /// use argot::{CommandLineParser, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(["-c", "--count"]))
    ///     .build_parser()
    ///     .unwrap();
    /// let error = parser.parse_tokens(&["--count"]).unwrap_err();
    /// assert_eq!(error.to_string(), "argument -c/--count: expected one argument");
    /// ```
    pub fn display_name(&self) -> String {
        if !self.option_strings.is_empty() {
            self.option_strings.join("/")
        } else if let Some(metavar) = &self.metavar {
            metavar.clone()
        } else if let Some(dest) = &self.dest {
            dest.clone()
        } else if !self.choices.is_empty() {
            format!("{{{}}}", self.choices.join(","))
        } else {
            String::default()
        }
    }

    /// The choices, quoted & comma separated (ex: `'a', 'b'`).
    pub(crate) fn choice_list(&self) -> String {
        self.choices
            .iter()
            .map(|c| format!("'{c}'"))
            .collect::<Vec<String>>()
            .join(", ")
    }

    pub(crate) fn is_positional(&self) -> bool {
        self.option_strings.is_empty()
    }
}

/// Derive the default dest for a set of option strings.
///
/// The first long option (ex: `--foo-bar`) wins, otherwise the first option string is used.
/// Leading prefix characters are stripped and internal `-` become `_`.
pub(crate) fn derive_dest(option_strings: &[String], prefix: char) -> Option<String> {
    let long = format!("{prefix}{prefix}");
    let chosen = option_strings
        .iter()
        .find(|option| option.starts_with(&long) && option.len() > long.len())
        .or_else(|| option_strings.first())?;

    Some(chosen.trim_start_matches(prefix).replace('-', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[rstest]
    #[case(vec!["-f", "--foo-bar", "--foo"], "foo_bar")]
    #[case(vec!["-x", "-y"], "x")]
    #[case(vec!["--verbose", "-v"], "verbose")]
    #[case(vec!["-dry-run"], "dry_run")]
    fn dest_derivation(#[case] option_strings: Vec<&str>, #[case] expected: &str) {
        assert_eq!(
            derive_dest(&strings(&option_strings), '-'),
            Some(expected.to_string())
        );
    }

    #[test]
    fn dest_derivation_prefix() {
        assert_eq!(
            derive_dest(&strings(&["+f", "++foo"]), '+'),
            Some("foo".to_string())
        );
        assert_eq!(derive_dest(&[], '-'), None);
    }

    #[test]
    fn display_name() {
        let option = ArgumentSpec::new(
            ArgumentKind::Optional,
            strings(&["-c", "--count"]),
            Some("count".to_string()),
        );
        assert_eq!(option.display_name(), "-c/--count");

        let positional =
            ArgumentSpec::new(ArgumentKind::Positional, vec![], Some("file".to_string()));
        assert_eq!(positional.display_name(), "file");

        let mut renamed =
            ArgumentSpec::new(ArgumentKind::Positional, vec![], Some("file".to_string()));
        renamed.set_metavar(Some("FILE".to_string()));
        assert_eq!(renamed.display_name(), "FILE");

        let mut branch = ArgumentSpec::new(ArgumentKind::SubCommand, vec![], None);
        branch.set_choices(strings(&["a", "b"]));
        assert_eq!(branch.display_name(), "{a,b}");
        assert_eq!(branch.choice_list(), "'a', 'b'");
    }

    #[rstest]
    #[case(Nargs::Single, "expected one argument")]
    #[case(Nargs::Optional, "expected at most one argument")]
    #[case(Nargs::AtLeastOne, "expected at least one argument")]
    #[case(Nargs::Precisely(3), "expected 3 argument(s)")]
    fn expectation(#[case] nargs: Nargs, #[case] expected: &str) {
        assert_eq!(nargs.expectation(), expected);
    }

    #[test]
    fn nargs_default() {
        assert_eq!(Nargs::default(), Nargs::Single);

        let spec = ArgumentSpec::new(ArgumentKind::Positional, vec![], Some("file".to_string()));
        assert_eq!(spec.nargs(), Nargs::Single);
    }
}
