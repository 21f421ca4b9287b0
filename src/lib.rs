//! `argot` is an argparse-style command line parser for Rust.
//!
//! The program declares its options & arguments up front, and `argot` turns the raw Cli tokens into a [`Namespace`]: a plain mapping from each parameter's *dest* to the string values it received.
//! Specifically, `argot` attempts to prioritize the following design concerns:
//! * *Familiar Cli semantics*:
//! Anyone who has used a Unix style Cli should be able to use an `argot` program without reading its help.
//! Long & short options, clustered flags, `--key=value`, `--` and abbreviated long options all behave as expected.
//! * *Declarative configuration*:
//! The parser is configured once, by chaining builder calls, and validated when built.
//! An invalid configuration is reported as a [`ConfigError`] before any token is parsed.
//! * *Extensible behaviour*:
//! What happens when a parameter is matched is decided by its [`Action`](prelude::Action).
//! The built-in actions cover storing, appending, counting, flags & help; custom actions sit alongside them.
//! * *Sub-command paradigm*:
//! The user may configure sub-commands which act to collect multiple related programs into a single Cli.
//! * *Detailed yet basic UX*:
//! The help and error output should leave no ambiguity in how to use the program.
//! However, we do not aim to support rich display configurations, such as colour output, shell completions, etc.
//!
//! # Usage
//! This page includes a few demos on using `argot`.
//!
//! ```no_run
#![doc = include_str!("../demos/demo_summer.rs")]
//! ```
//!
//! ```console
//! $ summer -h
//! usage: summer [-h] [-s SCALE] [--round] item [item ...]
//!
//! Sum up the items.
//!
//! positional arguments:
//!   item                  The items to sum.
//!
//! options:
//!   -h, --help            show this help message and exit
//!   -s SCALE, --scale SCALE
//!                         Multiply the sum by this amount.
//!   --round               Round the sum to the nearest integer.
//!
//! $ summer 1 2 3
//! Sum: 6
//!
//! $ summer --sc 2 1.25 --round
//! Sum: 3
//!
//! $ summer
//! usage: summer [-h] [-s SCALE] [--round] item [item ...]
//! summer: error: the following arguments are required: item
//! ```
//!
//! # Builder Api
//! Configure `argot` by starting with a [`CommandLineParser`] and `add`ing parameters.
//! There are two classes of parameters: [`Parameter::option`] and [`Parameter::argument`].
//!
//! * Options are matched by their option strings (ex: `-c` or `--count`), anywhere on the Cli.
//! They are not required, unless configured via [`Parameter::required`].
//! * Arguments are matched by position, in the order they were `add`ed.
//! They are required, unless their [`Nargs`] allow zero values.
//!
//! Each parameter is further configured with:
//! * *Nargs*: how many values it consumes (see the **Cli Semantics** section).
//! * *Action*: what it does with those values (defaults to [`Store`](prelude::Store)).
//! * *Dest*: the key of its values in the `Namespace`.
//! For arguments, this is the name.
//! For options, this is derived from the first long option string, with `-` replaced by `_` (ex: `--dry-run` becomes `dry_run`).
//! * *Default & constant*: the value(s) held when the parameter does not appear, and the value(s) used by const-style actions.
//! * *Choices*: the values the parameter accepts; anything else is rejected.
//! * *Help & metavar*: documentation for the help message.
//!
//! Parameters may also be gathered into a mutually exclusive group via [`CommandLineParser::exclusive`].
//! At most one member of the group may appear; if the group is required, exactly one must.
//!
//! ### Actions
//! The built-in actions live in the [prelude](./prelude/index.html).
//! * `Store`: keep the matched values (replacing any previous ones).
//! * `StoreConst`, `StoreTrue`, `StoreFalse`: keep a constant; these take no values.
//! * `Append`, `AppendConst`: extend the previous values, so the option may be repeated.
//! * `Count`: count the occurrences (ex: `-vvv` counts `3`).
//! * `Help`: print the help message and stop the parse.
//!
//! ```no_run
#![doc = include_str!("../demos/demo_actions.rs")]
//! ```
//!
//! ### Sub-commands
//! To setup a sub-command based Cli, start with a root `CommandLineParser`.
//! Both options and arguments may be added to the root parser via `add`.
//! The sub-command section of the parser begins by `branch`ing this parser with a [`Branch`].
//! Each sub-command is then configured via [`CommandLineParser::command`], which takes the [`Command`] (a name, along with optional aliases & help) and a `impl FnOnce(SubCommand) -> SubCommand` to setup its parser.
//!
//! The first token at the branch position selects the sub-command, and every remaining token is handed over to it.
//! The values parsed by the sub-command are merged into the same `Namespace` as the root.
//!
//! ```no_run
#![doc = include_str!("../demos/demo_sub_command.rs")]
//! ```
//!
//! ```console
//! $ package -h
//! usage: package [-h] [-q] COMMAND ...
//!
//! Manage the packages of a project.
//!
//! positional arguments:
//!   COMMAND               The operation to perform.
//!     install (i)         Install packages.
//!     remove (rm)         Remove packages.
//!
//! options:
//!   -h, --help            show this help message and exit
//!   -q, --quiet           Only print errors.
//!
//! $ package i -h
//! usage: package install [-h] [--registry REGISTRY] package [package ...]
//! <truncated>
//!
//! $ package i serde --registry mirror
//! Installing 'serde' from 'mirror'.
//!
//! $ package upgrade
//! usage: package [-h] [-q] COMMAND ...
//! package: error: argument COMMAND: invalid choice: upgrade (choose from 'install', 'i', 'remove', 'rm', 'doctor')
//! ```
//!
//! # Cli Semantics
//! `argot` parses the Cli tokens according to the following set of rules.
//!
//! * Options are matched based off their option strings.
//! Once matched, the option's cardinality is consumed from the subsequent tokens.
//! * Arguments are matched based off positional ordering, in between the options.
//! The tokens between two options are shared out across the remaining arguments, in order, as greedily as their cardinalities allow.
//! For example, `a b c` will match `a b` into a `+` argument, and `c` into a following cardinality=1 argument.
//! * A long option may be abbreviated to any unambiguous prefix (ex: `--verb` for `--verbose`).
//! This may be turned off via [`CommandLineParser::allow_abbrev`].
//! * The value of an option may be attached with the `=` character.
//! For example, `--key=123` is equivalent to `--key 123`.
//! Only the first `=` character is used as a separator.
//! * The value of a short option may be attached directly.
//! For example, `-k123` is equivalent to `-k 123`.
//! * Multiple short options may be combined into a single token.
//! For example, `-abc` is equivalent to `-a -b -c`.
//! Only the final option in the cluster may take a value (ex: `-abc=123` or `-abc 123`).
//! * The token `--` marks the end of the options; every following token is positional.
//! * Negative numbers (ex: `-1` or `-2.5`) are positional, unless the parser declares an option that looks like a negative number.
//!
//! ### Nargs
//! ```console
//! Nargs          | Cardinality | Argument syntax   | Option syntax
//! ----------------------------------------------------------------------------
//! Single         | [1]         | VALUE             | [--NAME VALUE]
//! Precisely(n)   | [n]         | VALUE .. VALUE    | [--NAME VALUE .. VALUE]
//! Optional       | [0, 1]      | [VALUE]           | [--NAME [VALUE]]
//! Any            | [0, ∞)      | [VALUE ...]       | [--NAME [VALUE ...]]
//! AtLeastOne     | [1, ∞)      | VALUE [VALUE ...] | [--NAME VALUE [VALUE ...]]
//! Remainder      | [0, ∞)      | ...               | [--NAME ...]
//! ```
//!
//! `Optional` options use their *constant* when they appear without a value, and their *default* when they do not appear at all.
//! `Remainder` consumes everything that follows, options included.
//!
//! # Errors
//! When a parse fails, [`GeneralParser::parse`] prints the usage line & error message to stderr, and exits with status `2`.
//! The same failure is available programmatically as a [`ParseError`] via [`GeneralParser::parse_tokens`].
//!
//! # Features
//! * `tracing_debug`: Emit `tracing` debug events from the parser internals.
pub use argot_engine::*;
