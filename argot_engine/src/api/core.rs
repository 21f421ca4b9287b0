use crate::api::{Branch, Command, Parameter, ParameterInner};
use crate::error::ConfigError;
use crate::parser::{
    ConsoleInterface, Declared, ExclusiveGroup, GeneralParser, Parser, Settings,
    SubCommandAction, UserInterface,
};

enum Declaration {
    Parameter(ParameterInner),
    Branch(Branch),
}

/// The base command line parser.
///
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::prelude::*;
/// use argot::{CommandLineParser, Parameter};
///
/// let parser = CommandLineParser::new("program")
///     .about("My program that does awesome stuff.")
///     .add(Parameter::option(["-v", "--verbose"]).action(StoreTrue))
///     .add(Parameter::argument("file"))
///     .build();
/// let namespace = parser.parse_tokens(&["-v", "notes.txt"]).unwrap();
///
/// assert_eq!(namespace.get_one("verbose"), Some("true"));
/// assert_eq!(namespace.get_one("file"), Some("notes.txt"));
/// ```
pub struct CommandLineParser {
    settings: Settings,
    declarations: Vec<Declaration>,
    groups: Vec<ExclusiveGroup>,
    commands: Vec<(Command, CommandLineParser)>,
    user_interface: Option<Box<dyn UserInterface>>,
    deferred_error: Option<ConfigError>,
}

impl std::fmt::Debug for CommandLineParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLineParser")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CommandLineParser {
    /// Create a command line parser.
    ///
    /// ### Example
    /// ```
    /// # use argot_engine as argot;
    /// use argot::CommandLineParser;
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .build();
    ///
    /// parser.parse_tokens(empty::slice()).unwrap();
    /// ```
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            settings: Settings::new(program),
            declarations: Vec::default(),
            groups: Vec::default(),
            commands: Vec::default(),
            user_interface: None,
            deferred_error: None,
        }
    }

    /// Document the about message for this command line parser.
    /// If repeated, only the final message will apply.
    ///
    /// An about message documents the command line parser in full sentence/paragraph format.
    /// We recommend allowing `argot` to format this field (ex: it is not recommended to use line breaks `'\n'`).
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.settings.about.replace(description.into());
        self
    }

    /// Document the epilog for this command line parser, shown at the end of the help message.
    /// If repeated, only the final message will apply.
    pub fn epilog(mut self, description: impl Into<String>) -> Self {
        self.settings.epilog.replace(description.into());
        self
    }

    /// Set the character which marks options (defaults to `-`).
    ///
    /// ### Example
    /// ```
    /// # use argot_engine as argot;
    /// use argot::{CommandLineParser, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .prefix_char('+')
    ///     .add(Parameter::option(["+f", "++foo"]))
    ///     .add(Parameter::argument("bar"))
    ///     .build();
    /// let namespace = parser.parse_tokens(&["-x", "++foo", "1"]).unwrap();
    ///
    /// assert_eq!(namespace.get_one("bar"), Some("-x"));
    /// assert_eq!(namespace.get_one("foo"), Some("1"));
    /// ```
    pub fn prefix_char(mut self, prefix: char) -> Self {
        self.settings.prefix = prefix;
        self
    }

    /// Allow (default) or disallow long options to be abbreviated to any unambiguous prefix (ex: `--verb` for `--verbose`).
    pub fn allow_abbrev(mut self, allow_abbrev: bool) -> Self {
        self.settings.allow_abbrev = allow_abbrev;
        self
    }

    /// Add (default) or omit the automatic `-h/--help` option.
    pub fn add_help(mut self, add_help: bool) -> Self {
        self.settings.add_help = add_help;
        self
    }

    /// Direct the help & error messages through the `user_interface` (defaults to [`ConsoleInterface`]).
    pub fn interface(mut self, user_interface: impl UserInterface + 'static) -> Self {
        self.user_interface.replace(Box::new(user_interface));
        self
    }

    /// Add an argument/option to the command line parser.
    ///
    /// The order of argument parameters corresponds to their positional order during parsing.
    /// The order of option parameters does not affect the command parser semantics.
    pub fn add(mut self, parameter: Parameter) -> Self {
        self.declarations
            .push(Declaration::Parameter(parameter.consume()));
        self
    }

    /// Add a mutually exclusive group of options: at most one may be supplied.
    /// When `required`, exactly one must be supplied.
    ///
    /// ### Example
    /// ```
    /// # use argot_engine as argot;
    /// use argot::prelude::*;
    /// use argot::{CommandLineParser, Parameter, ParseError};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .exclusive(false, |group| {
    ///         group
    ///             .add(Parameter::option(["--foo"]).action(StoreTrue))
    ///             .add(Parameter::option(["--bar"]).action(StoreFalse))
    ///     })
    ///     .build();
    ///
    /// assert!(parser.parse_tokens(&["--foo"]).is_ok());
    /// let error = parser.parse_tokens(&["--foo", "--bar"]).unwrap_err();
    /// assert_eq!(error.to_string(), "argument --bar: not allowed with argument --foo");
    /// ```
    pub fn exclusive(
        mut self,
        required: bool,
        setup_fn: impl FnOnce(Exclusive) -> Exclusive,
    ) -> Self {
        let group = setup_fn(Exclusive::default());
        let start = self.declarations.len();

        for parameter in group.parameters {
            self.declarations
                .push(Declaration::Parameter(parameter.consume()));
        }

        self.groups.push(ExclusiveGroup::new(
            required,
            (start..self.declarations.len()).collect(),
        ));
        self
    }

    /// Branch into sub-commands.
    ///
    /// The branch is matched by position, like any other argument; every token following the sub-command name is handed to that sub-command.
    /// Set up the sub-commands with [`CommandLineParser::command`].
    ///
    /// ### Example
    /// ```
    /// # use argot_engine as argot;
    /// use argot::{Branch, Command, CommandLineParser, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(["--root"]))
    ///     .branch(Branch::new().dest("command"))
    ///     .command(Command::new("add").alias("a"), |sub| {
    ///         sub.add(Parameter::argument("item"))
    ///     })
    ///     .command("list", |sub| sub)
    ///     .build();
    /// let namespace = parser.parse_tokens(&["--root", "x", "a", "thing"]).unwrap();
    ///
    /// assert_eq!(namespace.get_one("root"), Some("x"));
    /// assert_eq!(namespace.get_one("command"), Some("a"));
    /// assert_eq!(namespace.get_one("item"), Some("thing"));
    /// ```
    pub fn branch(mut self, branch: Branch) -> Self {
        if self
            .declarations
            .iter()
            .any(|d| matches!(d, Declaration::Branch(_)))
        {
            self.deferred_error.get_or_insert(ConfigError(format!(
                "{} cannot have multiple sub-command branches",
                self.settings.program
            )));
        } else {
            self.declarations.push(Declaration::Branch(branch));
        }

        self
    }

    /// Set up a sub-command of the branch.
    ///
    /// Each name & alias must be distinct across the sub-commands.
    /// See [`CommandLineParser::branch`] for usage.
    pub fn command(
        mut self,
        command: impl Into<Command>,
        setup_fn: impl FnOnce(SubCommand) -> SubCommand,
    ) -> Self {
        let command = command.into();

        if !self
            .declarations
            .iter()
            .any(|d| matches!(d, Declaration::Branch(_)))
        {
            self.deferred_error.get_or_insert(ConfigError(format!(
                "sub-command '{}' requires a branch",
                command.name()
            )));
        }

        for (i, name) in command.names().iter().enumerate() {
            let conflicting = self
                .commands
                .iter()
                .any(|(existing, _)| existing.names().contains(name));

            if conflicting {
                let kind = if i == 0 { "sub-command" } else { "sub-command alias" };
                self.deferred_error.get_or_insert(ConfigError(format!(
                    "conflicting {kind}: {name}"
                )));
            }
        }

        let sub_command = setup_fn(SubCommand {
            inner: CommandLineParser::new(command.name()),
        });
        self.commands.push((command, sub_command.inner));
        self
    }

    /// Finalize this (and every nested) parser.
    fn finalize(self, settings: Settings) -> Result<Parser, ConfigError> {
        let CommandLineParser {
            declarations,
            groups,
            commands,
            deferred_error,
            ..
        } = self;

        if let Some(error) = deferred_error {
            return Err(error);
        }

        let mut choices = Vec::default();
        let mut choice_help = Vec::default();
        let mut children = Vec::default();

        for (command, sub_command) in commands {
            let child_settings = Settings {
                program: format!("{} {}", settings.program, command.name()),
                depth: settings.depth + 1,
                about: sub_command.settings.about.clone(),
                epilog: sub_command.settings.epilog.clone(),
                prefix: settings.prefix,
                allow_abbrev: settings.allow_abbrev,
                add_help: settings.add_help,
            };
            let names = command.names();
            choices.extend(names.iter().cloned());
            choice_help.extend(command.choice_help());
            children.push((names, sub_command.finalize(child_settings)?));
        }

        let mut action = Some(SubCommandAction::new(children));
        let mut declared: Vec<Declared> = Vec::with_capacity(declarations.len());

        for declaration in declarations {
            match declaration {
                Declaration::Parameter(inner) => declared.push(inner.declare(settings.prefix)?),
                Declaration::Branch(branch) => {
                    let action = action
                        .take()
                        .expect("internal error - parser must have at most one branch");
                    declared.push((
                        branch.declare(choices.clone(), choice_help.clone()),
                        Box::new(action),
                    ));
                }
            }
        }

        Parser::new(settings, declared, groups)
    }

    fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser, ConfigError> {
        let settings = self.settings.clone();
        let parser = self.finalize(settings)?;
        Ok(GeneralParser::new(parser, user_interface))
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a conflicting option string).
    pub fn build_parser(mut self) -> Result<GeneralParser, ConfigError> {
        let user_interface = self
            .user_interface
            .take()
            .unwrap_or_else(|| Box::new(ConsoleInterface::default()));
        self.build_with_interface(user_interface)
    }

    /// Build the command line parser.
    /// This finalizes the configuration and checks for errors (ex: a conflicting option string).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser {
        match self.build_parser() {
            Ok(gp) => gp,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

/// A sub-command line parser.
///
/// Used with [`CommandLineParser::command`].
/// Sub-commands inherit the prefix character, abbreviation and help settings of their parent.
pub struct SubCommand {
    inner: CommandLineParser,
}

impl SubCommand {
    /// Document the about message for this sub-command.
    /// If repeated, only the final message will apply.
    pub fn about(self, description: impl Into<String>) -> Self {
        SubCommand {
            inner: self.inner.about(description),
        }
    }

    /// Document the epilog for this sub-command.
    pub fn epilog(self, description: impl Into<String>) -> Self {
        SubCommand {
            inner: self.inner.epilog(description),
        }
    }

    /// Add an argument/option to the sub-command.
    ///
    /// See [`CommandLineParser::add`].
    pub fn add(self, parameter: Parameter) -> Self {
        SubCommand {
            inner: self.inner.add(parameter),
        }
    }

    /// Add a mutually exclusive group to the sub-command.
    ///
    /// See [`CommandLineParser::exclusive`].
    pub fn exclusive(self, required: bool, setup_fn: impl FnOnce(Exclusive) -> Exclusive) -> Self {
        SubCommand {
            inner: self.inner.exclusive(required, setup_fn),
        }
    }

    /// Branch the sub-command into further (nested) sub-commands.
    ///
    /// ### Example
    /// ```
    /// # use argot_engine as argot;
    /// use argot::{Branch, CommandLineParser, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .branch(Branch::new().dest("outer"))
    ///     .command("remote", |sub| {
    ///         sub.branch(Branch::new().dest("inner"))
    ///             .command("add", |sub| sub.add(Parameter::argument("url")))
    ///     })
    ///     .build();
    /// let namespace = parser.parse_tokens(&["remote", "add", "example.org"]).unwrap();
    ///
    /// assert_eq!(namespace.get_one("outer"), Some("remote"));
    /// assert_eq!(namespace.get_one("inner"), Some("add"));
    /// assert_eq!(namespace.get_one("url"), Some("example.org"));
    /// ```
    pub fn branch(self, branch: Branch) -> Self {
        SubCommand {
            inner: self.inner.branch(branch),
        }
    }

    /// Set up a nested sub-command.
    ///
    /// See [`CommandLineParser::command`].
    pub fn command(
        self,
        command: impl Into<Command>,
        setup_fn: impl FnOnce(SubCommand) -> SubCommand,
    ) -> Self {
        SubCommand {
            inner: self.inner.command(command, setup_fn),
        }
    }
}

/// A mutually exclusive group of parameters.
///
/// Used with [`CommandLineParser::exclusive`].
#[derive(Debug, Default)]
pub struct Exclusive {
    parameters: Vec<Parameter>,
}

impl Exclusive {
    /// Add an option to the group.
    pub fn add(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}
