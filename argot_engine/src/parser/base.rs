use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::api::{Action, Help};
use crate::constant::*;
use crate::error::{ConfigError, ParseError};
use crate::matcher::*;
use crate::model::*;
use crate::namespace::Namespace;
use crate::parser::classifier::{Classification, OptionMatch, TokenClassifier};
use crate::parser::conflict::{ConflictRegistry, ExclusiveGroup};
use crate::parser::interface::UserInterface;
use crate::parser::printer::Printer;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

// We need a (dyn ..) here so that built-in and user defined actions may sit side by side in one parser.
pub(crate) type Declared = (ArgumentSpec, Box<dyn Action>);

/// Parser wide settings.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) program: String,
    pub(crate) depth: usize,
    pub(crate) about: Option<String>,
    pub(crate) epilog: Option<String>,
    pub(crate) prefix: char,
    pub(crate) allow_abbrev: bool,
    pub(crate) add_help: bool,
}

impl Settings {
    pub(crate) fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            depth: 0,
            about: None,
            epilog: None,
            prefix: DEFAULT_PREFIX,
            allow_abbrev: true,
            add_help: true,
        }
    }
}

/// The live state of a running parse, handed to each [`Action`](crate::prelude::Action).
pub struct ActionContext<'a> {
    parser: &'a Parser,
    interface: &'a dyn UserInterface,
    extras: &'a mut Vec<String>,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(
        parser: &'a Parser,
        interface: &'a dyn UserInterface,
        extras: &'a mut Vec<String>,
    ) -> Self {
        Self {
            parser,
            interface,
            extras,
        }
    }

    /// The program name of the running parser (ex: `"program sub-command"`).
    pub fn program(&self) -> &str {
        &self.parser.program
    }

    /// How many sub-commands deep the running parser is (the root is `0`).
    pub fn depth(&self) -> usize {
        self.parser.depth
    }

    /// The full help message of the running parser.
    pub fn help(&self) -> String {
        self.parser.help()
    }

    /// The usage line of the running parser.
    pub fn usage(&self) -> String {
        self.parser.usage()
    }

    /// Print through the configured user interface.
    pub fn print(&self, message: String) {
        self.interface.print(message);
    }

    /// Report tokens that the action could not use; they are returned to the caller as extras.
    pub fn push_extras(&mut self, extras: Vec<String>) {
        self.extras.extend(extras);
    }

    pub(crate) fn interface(&self) -> &'a dyn UserInterface {
        self.interface
    }
}

pub(crate) struct Parser {
    program: String,
    depth: usize,
    prefix: char,
    declared: Vec<Declared>,
    patterns: Vec<ArityPattern>,
    positionals: Vec<usize>,
    classifier: TokenClassifier,
    conflicts: ConflictRegistry,
    printer: Printer,
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("program", &self.program)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// Bookkeeping for a single call to `Parser::consume`.
struct Consumption {
    namespace: Namespace,
    positionals: VecDeque<usize>,
    seen: HashSet<usize>,
    seen_non_default: HashSet<usize>,
    extras: Vec<String>,
    action_extras: Vec<String>,
}

impl Parser {
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self::new(Settings::new("program"), Vec::default(), Vec::default()).unwrap()
    }

    /// Finalize the declarations into a parser.
    ///
    /// `groups` refer to `declared` by index.
    pub(crate) fn new(
        settings: Settings,
        declared: Vec<Declared>,
        groups: Vec<ExclusiveGroup>,
    ) -> Result<Self, ConfigError> {
        let prefix = settings.prefix;
        let mut specs: Vec<Declared> = Vec::with_capacity(declared.len() + 1);
        let offset = if settings.add_help {
            let mut help = ArgumentSpec::new(
                ArgumentKind::Optional,
                vec![
                    format!("{prefix}{HELP_SHORT}"),
                    format!("{prefix}{prefix}{HELP_NAME}"),
                ],
                None,
            );
            Help.initialize(&mut help);
            help.set_help(Some(HELP_MESSAGE.to_string()));
            specs.push((help, Box::new(Help)));
            1
        } else {
            0
        };
        specs.extend(declared);

        let mut options: BTreeMap<String, usize> = BTreeMap::default();
        let mut positionals = Vec::default();

        for (index, (spec, action)) in specs.iter_mut().enumerate() {
            match spec.kind() {
                ArgumentKind::Optional => {
                    if spec.option_strings().is_empty() {
                        return Err(ConfigError(
                            "options require at least one option string".to_string(),
                        ));
                    }

                    for option_string in spec.option_strings() {
                        if option_string.chars().count() < 2 || !option_string.starts_with(prefix)
                        {
                            return Err(ConfigError(format!(
                                "invalid option string '{option_string}': must start with a character '{prefix}'"
                            )));
                        }
                    }

                    let conflicting: Vec<&str> = spec
                        .option_strings()
                        .iter()
                        .filter(|o| options.contains_key(*o))
                        .map(String::as_str)
                        .collect();

                    if !conflicting.is_empty() {
                        return Err(ConfigError(format!(
                            "argument {}: conflicting option string(s): {}",
                            spec.display_name(),
                            conflicting.join(", ")
                        )));
                    }

                    for option_string in spec.option_strings() {
                        options.insert(option_string.clone(), index);
                    }
                }
                ArgumentKind::Positional => {
                    match spec.nargs() {
                        Nargs::Optional => {}
                        Nargs::Any if !spec.default().is_empty() => {}
                        _ => spec.set_required(true),
                    }

                    positionals.push(index);
                }
                ArgumentKind::SubCommand => {
                    positionals.push(index);
                }
            }

            action.validate(spec)?;
        }

        let mut shifted = Vec::with_capacity(groups.len());

        for group in groups {
            if group.members().is_empty() {
                return Err(ConfigError(
                    "mutually exclusive groups require at least one member".to_string(),
                ));
            }

            for member in group.members() {
                let (spec, _) = specs.get(member + offset).ok_or_else(|| {
                    ConfigError(format!("exclusive group member {member} is not declared"))
                })?;

                if spec.required() {
                    return Err(ConfigError(format!(
                        "argument {}: mutually exclusive arguments must be optional",
                        spec.display_name()
                    )));
                }
            }

            let members = group.members().iter().map(|m| m + offset).collect();
            shifted.push(ExclusiveGroup::new(group.required(), members));
        }

        let patterns = specs
            .iter()
            .map(|(spec, _)| match spec.kind() {
                ArgumentKind::Optional => ArityPattern::optional(spec.nargs()),
                ArgumentKind::Positional | ArgumentKind::SubCommand => {
                    ArityPattern::positional(spec.nargs())
                }
            })
            .collect();
        let classifier = TokenClassifier::new(prefix, settings.allow_abbrev, options);
        let conflicts = ConflictRegistry::new(shifted);
        let printer = Printer::terminal(&settings, &specs, conflicts.groups());

        Ok(Self {
            program: settings.program,
            depth: settings.depth,
            prefix,
            declared: specs,
            patterns,
            positionals,
            classifier,
            conflicts,
            printer,
        })
    }

    pub(crate) fn program(&self) -> &str {
        &self.program
    }

    pub(crate) fn help(&self) -> String {
        self.printer.help()
    }

    pub(crate) fn usage(&self) -> String {
        self.printer.usage()
    }

    /// Parse the `tokens` into a fresh namespace, returning it alongside the tokens that went unused.
    pub(crate) fn consume(
        &self,
        tokens: &[&str],
        interface: &dyn UserInterface,
    ) -> Result<(Namespace, Vec<String>), ParseError> {
        let Classification { symbols, options } = self.classifier.classify(tokens)?;
        let mut namespace = Namespace::default();

        for (spec, _) in &self.declared {
            if let Some(dest) = spec.dest() {
                // The first declaration of a shared dest supplies its default.
                if !namespace.contains(dest) {
                    namespace.set_values(dest, spec.default().to_vec());
                }
            }
        }

        let mut state = Consumption {
            namespace,
            positionals: self.positionals.iter().copied().collect(),
            seen: HashSet::default(),
            seen_non_default: HashSet::default(),
            extras: Vec::default(),
            action_extras: Vec::default(),
        };
        let last_option = options.keys().next_back().copied();
        let mut start = 0;

        // Alternate between positional runs and single options until we've passed the last option.
        while last_option.map_or(false, |last| start <= last) {
            let next_option = options
                .range(start..)
                .next()
                .map(|(index, _)| *index)
                .unwrap_or(tokens.len());

            if start != next_option {
                let stop =
                    self.consume_positionals(&mut state, tokens, &symbols, start, interface)?;

                // Only move on to the option if the positionals didn't consume it.
                if stop > start {
                    start = stop;
                    continue;
                }
            }

            if !options.contains_key(&start) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Unclaimed positional tokens {:?}.", &tokens[start..next_option]);
                }

                state
                    .extras
                    .extend(tokens[start..next_option].iter().map(|t| t.to_string()));
                start = next_option;
            }

            start = self.consume_optional(&mut state, tokens, &symbols, &options, start, interface)?;
        }

        let stop = self.consume_positionals(&mut state, tokens, &symbols, start, interface)?;
        state
            .extras
            .extend(tokens[stop..].iter().map(|t| t.to_string()));

        let missing: Vec<String> = self
            .declared
            .iter()
            .enumerate()
            .filter(|(index, (spec, _))| spec.required() && !state.seen.contains(index))
            .map(|(_, (spec, _))| spec.display_name())
            .collect();

        if !missing.is_empty() {
            return Err(ParseError::MissingRequired { names: missing });
        }

        if let Some(group) = self.conflicts.unsatisfied(&state.seen_non_default).next() {
            return Err(ParseError::MissingRequiredGroup {
                names: group
                    .members()
                    .iter()
                    .map(|member| self.declared[*member].0.display_name())
                    .collect(),
            });
        }

        let Consumption {
            namespace,
            mut extras,
            action_extras,
            ..
        } = state;
        extras.extend(action_extras);

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Parsed {namespace} with extras {extras:?}.");
        }

        Ok((namespace, extras))
    }

    /// Assign as many of the queued positionals as possible, starting at `start`.
    /// Returns the index after the last token consumed.
    fn consume_positionals(
        &self,
        state: &mut Consumption,
        tokens: &[&str],
        symbols: &[Symbol],
        start: usize,
        interface: &dyn UserInterface,
    ) -> Result<usize, ParseError> {
        let patterns: Vec<&ArityPattern> = state
            .positionals
            .iter()
            .map(|index| &self.patterns[*index])
            .collect();
        let counts = match_partial(&patterns, &symbols[start..]);
        let mut stop = start;

        for count in counts {
            if let Some(index) = state.positionals.pop_front() {
                let arguments: Vec<String> = tokens[stop..stop + count]
                    .iter()
                    .map(|t| t.to_string())
                    .collect();
                stop += count;
                self.take(state, index, arguments, interface)?;
            }
        }

        Ok(stop)
    }

    /// Consume the option at `start` (along with its values).
    /// Returns the index after the last token consumed.
    fn consume_optional(
        &self,
        state: &mut Consumption,
        tokens: &[&str],
        symbols: &[Symbol],
        options: &BTreeMap<usize, OptionMatch>,
        start: usize,
        interface: &dyn UserInterface,
    ) -> Result<usize, ParseError> {
        let OptionMatch {
            option_string,
            spec,
            explicit,
        } = options
            .get(&start)
            .cloned()
            .expect("internal error - option index must be classified");
        let mut index = match spec {
            Some(index) => index,
            None => {
                state.extras.push(tokens[start].to_string());
                return Ok(start + 1);
            }
        };
        let mut option_string = option_string;
        let mut explicit = explicit;
        let mut taken: Vec<(usize, Vec<String>)> = Vec::default();
        let stop;

        loop {
            let spec = &self.declared[index].0;

            match explicit {
                Some(value) => {
                    let count = self.patterns[index]
                        .matches(&[Symbol::Argument])
                        .ok_or_else(|| ParseError::ArityMismatch {
                            argument: spec.display_name(),
                            nargs: spec.nargs(),
                        })?;

                    if count == 0 && self.is_short(&option_string) && !value.is_empty() {
                        // Peel off the next short option (ex: `-vx` is `-v -x`).
                        taken.push((index, Vec::default()));
                        let mut characters = value.chars();
                        let next = format!(
                            "{}{}",
                            self.prefix,
                            characters.next().unwrap_or_default()
                        );

                        match self.classifier.lookup(&next) {
                            Some(next_index) => {
                                let remainder = characters.as_str();
                                index = next_index;
                                option_string = next;
                                // Only the final option of a cluster may take an `=` value (ex: `-vx=1`).
                                explicit = if remainder.is_empty() {
                                    None
                                } else {
                                    Some(remainder.strip_prefix('=').unwrap_or(remainder).to_string())
                                };
                            }
                            None => {
                                return Err(ParseError::IgnoredExplicitArgument {
                                    argument: spec.display_name(),
                                    value,
                                });
                            }
                        }
                    } else if count == 1 {
                        stop = start + 1;
                        taken.push((index, vec![value]));
                        break;
                    } else {
                        return Err(ParseError::IgnoredExplicitArgument {
                            argument: spec.display_name(),
                            value,
                        });
                    }
                }
                None => {
                    let begin = start + 1;
                    let count = self.patterns[index].matches(&symbols[begin..]).ok_or_else(|| {
                        ParseError::ArityMismatch {
                            argument: spec.display_name(),
                            nargs: spec.nargs(),
                        }
                    })?;
                    stop = begin + count;
                    taken.push((
                        index,
                        tokens[begin..stop].iter().map(|t| t.to_string()).collect(),
                    ));
                    break;
                }
            }
        }

        for (index, arguments) in taken {
            self.take(state, index, arguments, interface)?;
        }

        Ok(stop)
    }

    fn take(
        &self,
        state: &mut Consumption,
        index: usize,
        arguments: Vec<String>,
        interface: &dyn UserInterface,
    ) -> Result<(), ParseError> {
        let (spec, action) = &self.declared[index];
        // A positional that matched nothing only holds its default; it doesn't count as supplied.
        let supplied = !(spec.is_positional() && arguments.is_empty());
        let values = self.values(spec, arguments)?;
        state.seen.insert(index);

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Taking {} with values {values:?} (supplied: {supplied}).",
                spec.display_name()
            );
        }

        if supplied {
            if let Some(other) = self.conflicts.conflict(index, &state.seen_non_default) {
                return Err(ParseError::Conflict {
                    argument: spec.display_name(),
                    other: self.declared[other].0.display_name(),
                });
            }

            state.seen_non_default.insert(index);
        }

        if spec.nargs() == Nargs::Suppress {
            return Ok(());
        }

        let mut context = ActionContext::new(self, interface, &mut state.action_extras);
        action.act(&mut state.namespace, spec, &values, &mut context)
    }

    /// Derive the values for the action from the consumed `arguments`.
    fn values(&self, spec: &ArgumentSpec, mut arguments: Vec<String>) -> Result<Vec<String>, ParseError> {
        let nargs = spec.nargs();

        if !matches!(nargs, Nargs::Remainder | Nargs::SubCommand) {
            if let Some(position) = arguments.iter().position(|a| a == SEPARATOR) {
                arguments.remove(position);
            }
        }

        let values = match (arguments.len(), nargs) {
            (0, Nargs::Optional) if spec.is_positional() => spec.default().to_vec(),
            (0, Nargs::Optional) => spec.constant().to_vec(),
            (0, Nargs::Any) if spec.is_positional() => spec.default().to_vec(),
            _ => arguments,
        };

        // The sub-command selector is checked by the dispatcher.
        if nargs != Nargs::SubCommand && !spec.choices().is_empty() {
            if let Some(value) = values
                .iter()
                .find(|v| !v.is_empty() && !spec.choices().contains(v))
            {
                return Err(ParseError::InvalidChoice {
                    argument: spec.display_name(),
                    value: value.clone(),
                    choices: spec.choices().to_vec(),
                });
            }
        }

        Ok(values)
    }

    /// Whether the option string is the single prefix (short) form.
    fn is_short(&self, option_string: &str) -> bool {
        !option_string.starts_with(&format!("{p}{p}", p = self.prefix))
    }
}
