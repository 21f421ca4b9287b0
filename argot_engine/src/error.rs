use thiserror::Error;

use crate::model::Nargs;

/// An invalid declaration, raised when the parser is built.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

/// The single failure channel of a parse.
///
/// Argument scoped variants render as `argument <display name>: <detail>`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// An abbreviated option matched more than one option string.
    #[error("ambiguous option: {token} could match {}", .candidates.join(", "))]
    AmbiguousOption {
        /// The token as it appeared on the command line.
        token: String,
        /// Every matching option string, in lexicographic order.
        candidates: Vec<String>,
    },

    /// The sub-command selector does not name a declared command.
    #[error("argument {argument}: invalid choice: {choice} (choose from {})", quoted(.choices))]
    UnknownSubCommand {
        /// The display name of the sub-command branch.
        argument: String,
        /// The selector token.
        choice: String,
        /// The declared command names & aliases.
        choices: Vec<String>,
    },

    /// Too few (or too many) tokens for the declared `Nargs`.
    #[error("argument {argument}: {}", .nargs.expectation())]
    ArityMismatch {
        /// The display name of the parameter.
        argument: String,
        /// The declared cardinality.
        nargs: Nargs,
    },

    /// A value outside the declared choices.
    #[error("argument {argument}: invalid choice: {value} (choose from {})", quoted(.choices))]
    InvalidChoice {
        /// The display name of the parameter.
        argument: String,
        /// The offending value.
        value: String,
        /// The declared choices.
        choices: Vec<String>,
    },

    /// Two members of a mutually exclusive group were both supplied.
    #[error("argument {argument}: not allowed with argument {other}")]
    Conflict {
        /// The display name of the later parameter.
        argument: String,
        /// The display name of the earlier parameter.
        other: String,
    },

    /// Required parameters that were never supplied.
    #[error("the following arguments are required: {}", .names.join(", "))]
    MissingRequired {
        /// The display names, in declaration order.
        names: Vec<String>,
    },

    /// A required mutually exclusive group none of whose members were supplied.
    #[error("one of the arguments {} is required", .names.join(" "))]
    MissingRequiredGroup {
        /// The display names of the group members.
        names: Vec<String>,
    },

    /// An inline value (ex: `--flag=x` or `-fx`) that the option cannot take.
    #[error("argument {argument}: ignored explicit argument {value}")]
    IgnoredExplicitArgument {
        /// The display name of the option.
        argument: String,
        /// The inline value.
        value: String,
    },

    /// An action failed to apply its values.
    #[error("argument {argument}: {message}")]
    InvalidAction {
        /// The display name of the parameter.
        argument: String,
        /// The action's own description of the failure.
        message: String,
    },

    /// Tokens left over after a strict parse.
    #[error("unrecognized arguments: {}", .0.join(" "))]
    UnrecognizedArguments(Vec<String>),

    /// The parse stopped early and the program should exit with this status (ex: after printing help).
    #[error("exit requested with status {0}")]
    Exit(i32),
}

fn quoted(values: &[String]) -> String {
    values
        .iter()
        .map(|value| format!("'{value}'"))
        .collect::<Vec<String>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[rstest]
    #[case(
        ParseError::AmbiguousOption { token: "--fo".to_string(), candidates: strings(&["--foo", "--four"]) },
        "ambiguous option: --fo could match --foo, --four"
    )]
    #[case(
        ParseError::UnknownSubCommand { argument: "{a,b}".to_string(), choice: "c".to_string(), choices: strings(&["a", "b"]) },
        "argument {a,b}: invalid choice: c (choose from 'a', 'b')"
    )]
    #[case(
        ParseError::ArityMismatch { argument: "--foo".to_string(), nargs: Nargs::Precisely(2) },
        "argument --foo: expected 2 argument(s)"
    )]
    #[case(
        ParseError::InvalidChoice { argument: "move".to_string(), value: "fire".to_string(), choices: strings(&["rock", "paper"]) },
        "argument move: invalid choice: fire (choose from 'rock', 'paper')"
    )]
    #[case(
        ParseError::Conflict { argument: "--bar".to_string(), other: "--foo".to_string() },
        "argument --bar: not allowed with argument --foo"
    )]
    #[case(
        ParseError::MissingRequired { names: strings(&["a", "--b"]) },
        "the following arguments are required: a, --b"
    )]
    #[case(
        ParseError::MissingRequiredGroup { names: strings(&["--foo", "--bar"]) },
        "one of the arguments --foo --bar is required"
    )]
    #[case(
        ParseError::IgnoredExplicitArgument { argument: "-v/--verbose".to_string(), value: "x".to_string() },
        "argument -v/--verbose: ignored explicit argument x"
    )]
    #[case(
        ParseError::UnrecognizedArguments(strings(&["a", "--b"])),
        "unrecognized arguments: a --b"
    )]
    fn parse_error_display(#[case] error: ParseError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError("abc".to_string()).to_string(),
            "Config error: abc"
        );
    }
}
