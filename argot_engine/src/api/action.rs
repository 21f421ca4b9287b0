use crate::constant::*;
use crate::error::{ConfigError, ParseError};
use crate::model::{ArgumentSpec, Nargs};
use crate::namespace::Namespace;
use crate::parser::ActionContext;

/// Behaviour applied when a parameter is matched on the command line.
///
/// An action shapes its parameter while it is being declared (`initialize`), checks the final declaration when the parser is built (`validate`), and writes the matched values into the [`Namespace`] during a parse (`act`).
///
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::prelude::*;
/// use argot::{ActionContext, ArgumentSpec, CommandLineParser, Namespace, Parameter, ParseError};
///
/// struct Upper;
///
/// impl Action for Upper {
///     fn act(
///         &self,
///         namespace: &mut Namespace,
///         spec: &ArgumentSpec,
///         values: &[String],
///         _context: &mut ActionContext,
///     ) -> Result<(), ParseError> {
///         let upper = values.iter().map(|v| v.to_uppercase()).collect();
///         namespace.set_values(spec.dest().unwrap(), upper);
///         Ok(())
///     }
/// }
///
/// let parser = CommandLineParser::new("program")
///     .add(Parameter::argument("name").action(Upper))
///     .build_parser()
///     .unwrap();
/// let namespace = parser.parse_tokens(&["abc"]).unwrap();
/// assert_eq!(namespace.get_one("name"), Some("ABC"));
/// ```
pub trait Action {
    /// Adjust the declared spec before any explicit settings are applied (ex: forcing `Nargs::Precisely(0)`).
    fn initialize(&self, _spec: &mut ArgumentSpec) {}

    /// Check the final declaration.
    fn validate(&self, _spec: &ArgumentSpec) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Apply the matched `values`.
    fn act(
        &self,
        namespace: &mut Namespace,
        spec: &ArgumentSpec,
        values: &[String],
        context: &mut ActionContext,
    ) -> Result<(), ParseError>;
}

fn disallow_zero(spec: &ArgumentSpec, kind: &str, alternative: &str) -> Result<(), ConfigError> {
    if spec.nargs() == Nargs::Precisely(0) {
        return Err(ConfigError(format!(
            "argument {}: nargs for {kind} actions must be != 0; {alternative}",
            spec.display_name()
        )));
    }

    if !spec.constant().is_empty() && spec.nargs() != Nargs::Optional {
        return Err(ConfigError(format!(
            "argument {}: nargs must be '?'(optional) to supply const",
            spec.display_name()
        )));
    }

    Ok(())
}

fn flag(spec: &mut ArgumentSpec) {
    spec.set_required(false);
    spec.set_nargs(Nargs::Precisely(0));
}

/// Store the matched value(s).
/// This is the default action.
///
/// `Nargs::Single` and `Nargs::Optional` store one value; every other cardinality stores the full list.
pub struct Store;

impl Action for Store {
    fn validate(&self, spec: &ArgumentSpec) -> Result<(), ConfigError> {
        disallow_zero(
            spec,
            "store",
            "if you have nothing to store, actions such as store true or store const may be more appropriate",
        )
    }

    fn act(
        &self,
        namespace: &mut Namespace,
        spec: &ArgumentSpec,
        values: &[String],
        _context: &mut ActionContext,
    ) -> Result<(), ParseError> {
        if let Some(dest) = spec.dest() {
            match spec.nargs() {
                Nargs::Single | Nargs::Optional => {
                    namespace.set_values(dest, values.iter().take(1).cloned().collect());
                }
                _ => namespace.set_values(dest, values.to_vec()),
            }
        }

        Ok(())
    }
}

/// Store the declared constant; takes no values.
pub struct StoreConst;

impl Action for StoreConst {
    fn initialize(&self, spec: &mut ArgumentSpec) {
        flag(spec);
    }

    fn act(
        &self,
        namespace: &mut Namespace,
        spec: &ArgumentSpec,
        _values: &[String],
        _context: &mut ActionContext,
    ) -> Result<(), ParseError> {
        if let Some(dest) = spec.dest() {
            namespace.set_values(dest, spec.constant().to_vec());
        }

        Ok(())
    }
}

/// Store `true` (default `false`); takes no values.
pub struct StoreTrue;

impl Action for StoreTrue {
    fn initialize(&self, spec: &mut ArgumentSpec) {
        flag(spec);
        spec.set_constant(vec![TRUE_VALUE.to_string()]);
        spec.set_default(vec![FALSE_VALUE.to_string()]);
    }

    fn act(
        &self,
        namespace: &mut Namespace,
        spec: &ArgumentSpec,
        values: &[String],
        context: &mut ActionContext,
    ) -> Result<(), ParseError> {
        StoreConst.act(namespace, spec, values, context)
    }
}

/// Store `false` (default `true`); takes no values.
pub struct StoreFalse;

impl Action for StoreFalse {
    fn initialize(&self, spec: &mut ArgumentSpec) {
        flag(spec);
        spec.set_constant(vec![FALSE_VALUE.to_string()]);
        spec.set_default(vec![TRUE_VALUE.to_string()]);
    }

    fn act(
        &self,
        namespace: &mut Namespace,
        spec: &ArgumentSpec,
        values: &[String],
        context: &mut ActionContext,
    ) -> Result<(), ParseError> {
        StoreConst.act(namespace, spec, values, context)
    }
}

/// Append the matched value(s) to the list under `dest`.
pub struct Append;

impl Action for Append {
    fn initialize(&self, spec: &mut ArgumentSpec) {
        spec.set_required(false);
    }

    fn validate(&self, spec: &ArgumentSpec) -> Result<(), ConfigError> {
        disallow_zero(
            spec,
            "append",
            "if arg strings are not supplying the value to append, the append const action may be more appropriate",
        )
    }

    fn act(
        &self,
        namespace: &mut Namespace,
        spec: &ArgumentSpec,
        values: &[String],
        _context: &mut ActionContext,
    ) -> Result<(), ParseError> {
        if let Some(dest) = spec.dest() {
            namespace.append_values(dest, values);
        }

        Ok(())
    }
}

/// Append the declared constant to the list under `dest`; takes no values.
///
/// Several options may share one `dest` to collect their constants together.
pub struct AppendConst;

impl Action for AppendConst {
    fn initialize(&self, spec: &mut ArgumentSpec) {
        flag(spec);
    }

    fn act(
        &self,
        namespace: &mut Namespace,
        spec: &ArgumentSpec,
        _values: &[String],
        _context: &mut ActionContext,
    ) -> Result<(), ParseError> {
        if let Some(dest) = spec.dest() {
            namespace.append_values(dest, spec.constant());
        }

        Ok(())
    }
}

/// Count the occurrences of the parameter; takes no values.
pub struct Count;

impl Action for Count {
    fn initialize(&self, spec: &mut ArgumentSpec) {
        flag(spec);
    }

    fn act(
        &self,
        namespace: &mut Namespace,
        spec: &ArgumentSpec,
        _values: &[String],
        _context: &mut ActionContext,
    ) -> Result<(), ParseError> {
        let dest = match spec.dest() {
            Some(dest) => dest,
            None => return Ok(()),
        };

        let count = match namespace.get_one(dest) {
            Some(current) => current.parse::<u64>().map_err(|_| ParseError::InvalidAction {
                argument: spec.display_name(),
                message: format!("cannot count from non-integer value '{current}'"),
            })? + 1,
            None => 1,
        };
        namespace.set_value(dest, count.to_string());
        Ok(())
    }
}

/// Print the help message and stop the parse with [`ParseError::Exit`]`(0)`.
pub struct Help;

impl Action for Help {
    fn initialize(&self, spec: &mut ArgumentSpec) {
        spec.set_nargs(Nargs::Precisely(0));
        spec.set_default(Vec::default());
        spec.set_dest(None);
    }

    fn act(
        &self,
        _namespace: &mut Namespace,
        _spec: &ArgumentSpec,
        _values: &[String],
        context: &mut ActionContext,
    ) -> Result<(), ParseError> {
        context.print(context.help());
        Err(ParseError::Exit(0))
    }
}
