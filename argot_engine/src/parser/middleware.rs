use std::env;

use crate::constant::ERROR_STATUS;
use crate::error::ParseError;
use crate::namespace::Namespace;
use crate::parser::base::Parser;
use crate::parser::interface::UserInterface;

/// The configured command line parser.
/// Built via `CommandLineParser::build_parser` or `CommandLineParser::build`.
///
/// The parser is immutable once built, so it may be used for any number of parses.
pub struct GeneralParser {
    parser: Parser,
    user_interface: Box<dyn UserInterface>,
}

impl std::fmt::Debug for GeneralParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneralParser")
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

impl GeneralParser {
    pub(crate) fn new(parser: Parser, user_interface: Box<dyn UserInterface>) -> Self {
        Self {
            parser,
            user_interface,
        }
    }

    /// Run the command line parser against the input tokens, leniently.
    ///
    /// Tokens that no parameter claims (ex: unrecognized options, or surplus arguments) are returned alongside the [`Namespace`] as "extras".
    ///
    /// ### Example
    /// ```
    /// # use argot_engine as argot;
    /// use argot::prelude::*;
    /// use argot::{CommandLineParser, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(["--foo"]).action(StoreTrue))
    ///     .build_parser()
    ///     .unwrap();
    /// let (namespace, extras) = parser.parse_known_tokens(&["--foo", "--bar", "baz"]).unwrap();
    /// assert_eq!(namespace.get_one("foo"), Some("true"));
    /// assert_eq!(extras, vec!["--bar".to_string(), "baz".to_string()]);
    /// ```
    pub fn parse_known_tokens(&self, tokens: &[&str]) -> Result<(Namespace, Vec<String>), ParseError> {
        self.parser.consume(tokens, &*self.user_interface)
    }

    /// Run the command line parser against the input tokens, strictly.
    ///
    /// Any extras are reported as [`ParseError::UnrecognizedArguments`].
    ///
    /// If the help switch (`-h` or `--help`) is encountered, the help message is printed and [`ParseError::Exit`]`(0)` is returned.
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<Namespace, ParseError> {
        let (namespace, extras) = self.parse_known_tokens(tokens)?;

        if extras.is_empty() {
            Ok(namespace)
        } else {
            Err(ParseError::UnrecognizedArguments(extras))
        }
    }

    /// Run the command line parser against the Cli [`env::args`].
    ///
    /// If the parser encounters an error, it prints the usage & error message, then exits with error code `2` (via `std::process::exit`).
    ///
    /// If the help switch (`-h` or `--help`) is encountered, the parser displays the help message and exits with error code `0`.
    pub fn parse(&self) -> Namespace {
        let command_input: Vec<String> = env::args().skip(1).collect();

        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(namespace) => namespace,
            Err(error) => std::process::exit(self.report(error)),
        }
    }

    /// The full help message.
    pub fn format_help(&self) -> String {
        self.parser.help()
    }

    /// The usage line.
    pub fn format_usage(&self) -> String {
        self.parser.usage()
    }

    /// Print the error through the user interface, and produce the exit code it calls for.
    fn report(&self, error: ParseError) -> i32 {
        match error {
            ParseError::Exit(code) => code,
            error => {
                self.user_interface.print_error(self.parser.usage());
                self.user_interface
                    .print_error(format!("{}: error: {error}", self.parser.program()));
                ERROR_STATUS
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Store, StoreTrue};
    use crate::model::{ArgumentKind, ArgumentSpec};
    use crate::parser::base::{Declared, Settings};
    use crate::parser::util::channel_interface;
    use crate::prelude::Action;
    use crate::test::assert_contains;
    use rstest::rstest;

    fn declared() -> Vec<Declared> {
        let mut flag = ArgumentSpec::new(
            ArgumentKind::Optional,
            vec!["--flag".to_string()],
            Some("flag".to_string()),
        );
        StoreTrue.initialize(&mut flag);
        let variable =
            ArgumentSpec::new(ArgumentKind::Positional, vec![], Some("variable".to_string()));

        vec![(flag, Box::new(StoreTrue)), (variable, Box::new(Store))]
    }

    fn parser(user_interface: Box<dyn UserInterface>) -> GeneralParser {
        GeneralParser::new(
            Parser::new(Settings::new("program"), declared(), Vec::default()).unwrap(),
            user_interface,
        )
    }

    #[test]
    fn parse_tokens_empty() {
        // Setup
        let (sender, receiver) = channel_interface();
        let general_parser = GeneralParser::new(Parser::empty(), Box::new(sender));

        // Execute
        let namespace = general_parser.parse_tokens(empty::slice()).unwrap();

        // Verify
        assert_eq!(namespace, Namespace::default());
        drop(general_parser);
        assert_eq!(receiver.consume(), (None, None));
    }

    #[rstest]
    #[case(vec!["1"], "false")]
    #[case(vec!["--flag", "1"], "true")]
    #[case(vec!["1", "--flag"], "true")]
    #[case(vec!["--fl", "1"], "true")]
    fn parse_tokens(#[case] tokens: Vec<&str>, #[case] flag: &str) {
        // Setup
        let (sender, receiver) = channel_interface();
        let general_parser = parser(Box::new(sender));

        // Execute
        let namespace = general_parser.parse_tokens(tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(namespace.get_one("variable"), Some("1"));
        assert_eq!(namespace.get_one("flag"), Some(flag));
        drop(general_parser);
        assert_eq!(receiver.consume(), (None, None));
    }

    #[rstest]
    #[case(vec!["1", "2"], vec!["2"])]
    #[case(vec!["1", "--other"], vec!["--other"])]
    #[case(vec!["--other", "1", "2"], vec!["--other", "2"])]
    fn parse_tokens_unrecognized(#[case] tokens: Vec<&str>, #[case] extras: Vec<&str>) {
        let (sender, _receiver) = channel_interface();
        let general_parser = parser(Box::new(sender));

        let (namespace, actual) = general_parser.parse_known_tokens(tokens.as_slice()).unwrap();
        assert_eq!(namespace.get_one("variable"), Some("1"));
        assert_eq!(actual, extras);

        let error = general_parser.parse_tokens(tokens.as_slice()).unwrap_err();
        assert_eq!(
            error,
            ParseError::UnrecognizedArguments(extras.iter().map(|e| e.to_string()).collect())
        );
    }

    #[rstest]
    #[case(vec!["--help"])]
    #[case(vec!["-h"])]
    #[case(vec!["1", "-h", "--unknown"])]
    fn parse_tokens_help(#[case] tokens: Vec<&str>) {
        // Setup
        let (sender, receiver) = channel_interface();
        let general_parser = parser(Box::new(sender));

        // Execute
        let error = general_parser.parse_tokens(tokens.as_slice()).unwrap_err();

        // Verify
        assert_eq!(error, ParseError::Exit(0));
        assert_eq!(general_parser.report(error), 0);
        drop(general_parser);

        let message = receiver.consume_message();
        assert_contains!(message, "usage: program [-h] [--flag] variable");
        assert_contains!(message, "-h, --help");
    }

    #[test]
    fn report() {
        // Setup
        let (sender, receiver) = channel_interface();
        let general_parser = parser(Box::new(sender));
        let error = general_parser.parse_tokens(&["--flag"]).unwrap_err();

        // Execute
        let code = general_parser.report(error);

        // Verify
        assert_eq!(code, ERROR_STATUS);
        drop(general_parser);

        let error = receiver.consume_error();
        assert_eq!(
            error,
            "usage: program [-h] [--flag] variable\nprogram: error: the following arguments are required: variable"
        );
    }

    #[test]
    fn format() {
        let (sender, _receiver) = channel_interface();
        let general_parser = parser(Box::new(sender));

        assert_eq!(general_parser.format_usage(), "usage: program [-h] [--flag] variable");
        assert_contains!(general_parser.format_help(), "positional arguments:");
        assert_contains!(general_parser.format_help(), "options:");
    }
}
