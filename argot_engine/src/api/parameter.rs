use crate::api::{Action, Store};
use crate::error::ConfigError;
use crate::model::{derive_dest, ArgumentKind, ArgumentSpec, Nargs};
use crate::parser::Declared;
use crate::prelude::Choices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ParameterClass {
    Opt,
    Arg,
}

pub(super) struct ParameterInner {
    class: ParameterClass,
    // The option strings of an option, or the single name of an argument.
    names: Vec<String>,
    action: Box<dyn Action>,
    nargs: Option<Nargs>,
    required: Option<bool>,
    default: Option<Vec<String>>,
    constant: Option<Vec<String>>,
    choices: Vec<String>,
    choice_help: Vec<(String, String)>,
    dest: Option<String>,
    help: Option<String>,
    metavar: Option<String>,
}

impl ParameterInner {
    fn new(class: ParameterClass, names: Vec<String>) -> Self {
        Self {
            class,
            names,
            action: Box::new(Store),
            nargs: None,
            required: None,
            default: None,
            constant: None,
            choices: Vec::default(),
            choice_help: Vec::default(),
            dest: None,
            help: None,
            metavar: None,
        }
    }

    /// Produce the spec, letting the action shape it before the explicit settings are applied.
    pub(super) fn declare(self, prefix: char) -> Result<Declared, ConfigError> {
        let ParameterInner {
            class,
            names,
            action,
            nargs,
            required,
            default,
            constant,
            choices,
            choice_help,
            dest,
            help,
            metavar,
        } = self;

        let mut spec = match class {
            ParameterClass::Arg => {
                let name = names
                    .into_iter()
                    .next()
                    .expect("internal error - argument must have a name");

                if required.is_some() {
                    return Err(ConfigError(format!(
                        "argument {name}: 'required' is an invalid argument for positionals"
                    )));
                }

                if dest.is_some() {
                    return Err(ConfigError(format!(
                        "argument {name}: dest supplied twice for positional argument"
                    )));
                }

                ArgumentSpec::new(ArgumentKind::Positional, Vec::default(), Some(name))
            }
            ParameterClass::Opt => {
                let dest = derive_dest(&names, prefix);
                ArgumentSpec::new(ArgumentKind::Optional, names, dest)
            }
        };

        action.initialize(&mut spec);

        if let Some(nargs) = nargs {
            spec.set_nargs(nargs);
        }

        if let Some(required) = required {
            spec.set_required(required);
        }

        if let Some(default) = default {
            spec.set_default(default);
        }

        if let Some(constant) = constant {
            spec.set_constant(constant);
        }

        if !choices.is_empty() {
            spec.set_choices(choices);
        }

        spec.choice_help = choice_help;

        if dest.is_some() {
            spec.set_dest(dest);
        }

        if help.is_some() {
            spec.set_help(help);
        }

        if metavar.is_some() {
            spec.set_metavar(metavar);
        }

        Ok((spec, action))
    }
}

impl std::fmt::Debug for ParameterInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = match &self.class {
            ParameterClass::Opt => "Opt",
            ParameterClass::Arg => "Arg",
        };
        let nargs = match &self.nargs {
            Some(nargs) => nargs.to_string(),
            None => "_".to_string(),
        };
        let help = if let Some(d) = &self.help {
            format!(", {d}")
        } else {
            "".to_string()
        };

        write!(
            f,
            "{class}[{nargs}, {names}{help}]",
            names = self.names.join("/"),
        )
    }
}

/// An argument/option parameter for the command line parser.
///
/// Every setting is optional: an unset `nargs`, `default`, etc. is left to the action (see [`Action::initialize`]).
pub struct Parameter(ParameterInner);

impl std::fmt::Debug for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parameter({:?})", self.0)
    }
}

impl Parameter {
    /// Create an option parameter, matched by any of its `option_strings` (ex: `["-v", "--verbose"]`).
    ///
    /// The dest is derived from the first long option string (or the first option string, when there are no long ones).
    ///
    /// ### Example
    /// ```
    /// # use argot_engine as argot;
    /// use argot::{CommandLineParser, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(["-d", "--dry-run"]))
    ///     .build_parser()
    ///     .unwrap();
    /// let namespace = parser.parse_tokens(&["-d", "yes"]).unwrap();
    /// assert_eq!(namespace.get_one("dry_run"), Some("yes"));
    /// ```
    pub fn option<I, S>(option_strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ParameterInner::new(
            ParameterClass::Opt,
            option_strings.into_iter().map(Into::into).collect(),
        ))
    }

    /// Create an argument parameter, matched by position.
    /// The `name` is also its dest.
    ///
    /// ### Example
    /// ```
    /// # use argot_engine as argot;
    /// use argot::{CommandLineParser, Nargs, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::argument("source").nargs(Nargs::AtLeastOne))
    ///     .add(Parameter::argument("destination"))
    ///     .build_parser()
    ///     .unwrap();
    /// let namespace = parser.parse_tokens(&["a", "b", "c"]).unwrap();
    /// assert_eq!(namespace.get("source").unwrap(), ["a", "b"]);
    /// assert_eq!(namespace.get_one("destination"), Some("c"));
    /// ```
    pub fn argument(name: impl Into<String>) -> Self {
        Self(ParameterInner::new(ParameterClass::Arg, vec![name.into()]))
    }

    /// Set the cardinality of values to consume.
    pub fn nargs(self, nargs: Nargs) -> Self {
        let mut inner = self.0;
        inner.nargs = Some(nargs);
        Self(inner)
    }

    /// Set the action applied when the parameter is matched.
    /// Defaults to [`Store`].
    ///
    /// ### Example
    /// ```
    /// # use argot_engine as argot;
    /// use argot::{CommandLineParser, Count, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(["-v"]).action(Count))
    ///     .build_parser()
    ///     .unwrap();
    /// let namespace = parser.parse_tokens(&["-vvv"]).unwrap();
    /// assert_eq!(namespace.get_one("v"), Some("3"));
    /// ```
    pub fn action(self, action: impl Action + 'static) -> Self {
        let mut inner = self.0;
        inner.action = Box::new(action);
        Self(inner)
    }

    /// Set a single default value.
    /// If repeated, only the final default will apply.
    pub fn default(self, value: impl Into<String>) -> Self {
        self.defaults([value])
    }

    /// Set the default values.
    pub fn defaults<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inner = self.0;
        inner.default = Some(values.into_iter().map(Into::into).collect());
        Self(inner)
    }

    /// Set a single constant value (used by `Nargs::Optional` and the const actions).
    pub fn constant(self, value: impl Into<String>) -> Self {
        self.constants([value])
    }

    /// Set the constant values.
    pub fn constants<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inner = self.0;
        inner.constant = Some(values.into_iter().map(Into::into).collect());
        Self(inner)
    }

    /// Restrict the values to the `choices`.
    ///
    /// See also [`Choices::choice`] to document the choices individually.
    pub fn choices<I, S>(self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inner = self.0;
        inner.choices = choices.into_iter().map(Into::into).collect();
        Self(inner)
    }

    /// Mark an option as required.
    /// Arguments are required based off their nargs; setting this on an argument is a configuration error.
    pub fn required(self, required: bool) -> Self {
        let mut inner = self.0;
        inner.required = Some(required);
        Self(inner)
    }

    /// Override the derived dest of an option.
    pub fn dest(self, dest: impl Into<String>) -> Self {
        let mut inner = self.0;
        inner.dest = Some(dest.into());
        Self(inner)
    }

    /// Document the help message for this parameter.
    /// If repeated, only the final message will apply.
    pub fn help(self, description: impl Into<String>) -> Self {
        let mut inner = self.0;
        inner.help = Some(description.into());
        Self(inner)
    }

    /// Set the name shown for this parameter's values in the usage & help.
    pub fn metavar(self, metavar: impl Into<String>) -> Self {
        let mut inner = self.0;
        inner.metavar = Some(metavar.into());
        Self(inner)
    }

    pub(super) fn consume(self) -> ParameterInner {
        self.0
    }
}

impl<T: Into<String>> Choices<T> for Parameter {
    /// Add a choice, documenting it with a help message.
    /// If repeated for the same `variant`, only the final message will apply.
    ///
    /// ### Example
    /// ```
    /// # use argot_engine as argot;
    /// use argot::prelude::*;
    /// use argot::{CommandLineParser, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::argument("move")
    ///         .choice("rock", "Crushes scissors.")
    ///         .choice("paper", "Covers rock."))
    ///     .build_parser()
    ///     .unwrap();
    /// assert!(parser.parse_tokens(&["rock"]).is_ok());
    /// assert!(parser.parse_tokens(&["scissors"]).is_err());
    /// ```
    fn choice(self, variant: T, description: impl Into<String>) -> Self {
        let mut inner = self.0;
        let variant = variant.into();
        let description = description.into();

        if !inner.choices.contains(&variant) {
            inner.choices.push(variant.clone());
        }

        match inner.choice_help.iter_mut().find(|(v, _)| v == &variant) {
            Some((_, existing)) => *existing = description,
            None => inner.choice_help.push((variant, description)),
        }

        Self(inner)
    }
}

/// The sub-command branch of a command line parser.
/// Used with [`CommandLineParser::branch`](crate::CommandLineParser::branch).
///
/// The branch consumes the sub-command name, and hands every remaining token over to that sub-command.
#[derive(Debug, Default)]
pub struct Branch {
    dest: Option<String>,
    help: Option<String>,
    metavar: Option<String>,
    required: bool,
}

impl Branch {
    /// Create an (optional) branch, which does not record the selected sub-command.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the name of the selected sub-command under `dest`.
    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest.replace(dest.into());
        self
    }

    /// Document the help message for this branch.
    /// If repeated, only the final message will apply.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// Set the name shown for this branch in the usage & help (instead of `{a,b,..}`).
    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar.replace(metavar.into());
        self
    }

    /// Require a sub-command to be selected.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Produce the spec of this branch, over the names of its sub-commands.
    pub(super) fn declare(
        self,
        choices: Vec<String>,
        choice_help: Vec<(String, String)>,
    ) -> ArgumentSpec {
        let Branch {
            dest,
            help,
            metavar,
            required,
        } = self;
        let mut spec = ArgumentSpec::new(ArgumentKind::SubCommand, Vec::default(), dest);
        spec.set_nargs(Nargs::SubCommand);
        spec.set_required(required);
        spec.set_choices(choices);
        spec.choice_help = choice_help;
        spec.set_help(help);
        spec.set_metavar(metavar);
        spec
    }
}

/// A sub-command of a [`Branch`].
/// Used with [`CommandLineParser::command`](crate::CommandLineParser::command).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    help: Option<String>,
}

impl Command {
    /// Create a sub-command, selected by its `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::default(),
            help: None,
        }
    }

    /// Add an alternate name which also selects this sub-command.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Document the help message for this sub-command, shown in the help of its parent.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    pub(super) fn name(&self) -> &str {
        &self.name
    }

    /// The name followed by the aliases.
    pub(super) fn names(&self) -> Vec<String> {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .cloned()
            .collect()
    }

    /// The help entry for this sub-command (ex: `("checkout (co)", "..")`).
    pub(super) fn choice_help(&self) -> Option<(String, String)> {
        let help = self.help.as_ref()?;

        if self.aliases.is_empty() {
            Some((self.name.clone(), help.clone()))
        } else {
            Some((
                format!("{} ({})", self.name, self.aliases.join(", ")),
                help.clone(),
            ))
        }
    }
}

impl From<&str> for Command {
    fn from(value: &str) -> Self {
        Command::new(value)
    }
}

impl From<String> for Command {
    fn from(value: String) -> Self {
        Command::new(value)
    }
}
