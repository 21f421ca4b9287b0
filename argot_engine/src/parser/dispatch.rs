use std::collections::HashMap;

use crate::api::Action;
use crate::error::ParseError;
use crate::model::ArgumentSpec;
use crate::namespace::Namespace;
use crate::parser::base::{ActionContext, Parser};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Hands the tail of the tokens over to the sub-command selected by the first token.
#[derive(Debug)]
pub(crate) struct SubCommandAction {
    children: Vec<Parser>,
    // Names & aliases, by index into `children`.
    names: HashMap<String, usize>,
}

impl SubCommandAction {
    /// `children` pairs each sub-command parser with every name it answers to (the primary name first).
    pub(crate) fn new(children: Vec<(Vec<String>, Parser)>) -> Self {
        let mut parsers = Vec::with_capacity(children.len());
        let mut names = HashMap::default();

        for (index, (aliases, parser)) in children.into_iter().enumerate() {
            for alias in aliases {
                names.insert(alias, index);
            }

            parsers.push(parser);
        }

        Self {
            children: parsers,
            names,
        }
    }
}

impl Action for SubCommandAction {
    fn act(
        &self,
        namespace: &mut Namespace,
        spec: &ArgumentSpec,
        values: &[String],
        context: &mut ActionContext,
    ) -> Result<(), ParseError> {
        let (choice, tail) = values
            .split_first()
            .expect("internal error - sub-command values must include the selector");

        if let Some(dest) = spec.dest() {
            namespace.set_values(dest, vec![choice.clone()]);
        }

        let child = match self.names.get(choice) {
            Some(index) => &self.children[*index],
            None => {
                return Err(ParseError::UnknownSubCommand {
                    argument: spec.display_name(),
                    choice: choice.clone(),
                    choices: spec.choices().to_vec(),
                });
            }
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Dispatching {tail:?} to '{}'.", child.program());
        }

        let tail: Vec<&str> = tail.iter().map(AsRef::as_ref).collect();
        let (child_namespace, extras) = child.consume(&tail, context.interface())?;
        namespace.merge(child_namespace);

        if !extras.is_empty() {
            context.push_extras(extras);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Store, StoreTrue};
    use crate::model::{ArgumentKind, Nargs};
    use crate::parser::base::{Declared, Settings};
    use crate::parser::util::InMemoryInterface;
    use crate::test::assert_contains;
    use rstest::rstest;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn child(program: &str, declared: Vec<Declared>) -> Parser {
        let mut settings = Settings::new(program);
        settings.depth = 1;
        Parser::new(settings, declared, Vec::default()).unwrap()
    }

    fn branch(dest: Option<&str>) -> ArgumentSpec {
        let mut spec = ArgumentSpec::new(ArgumentKind::SubCommand, vec![], dest.map(str::to_string));
        spec.set_nargs(Nargs::SubCommand);
        spec.set_choices(strings(&["add", "a", "remove"]));
        spec
    }

    fn action() -> SubCommandAction {
        let mut item = ArgumentSpec::new(ArgumentKind::Positional, vec![], Some("item".to_string()));
        Store.initialize(&mut item);
        let mut force = ArgumentSpec::new(
            ArgumentKind::Optional,
            strings(&["--force"]),
            Some("force".to_string()),
        );
        StoreTrue.initialize(&mut force);

        SubCommandAction::new(vec![
            (
                strings(&["add", "a"]),
                child("program add", vec![(item, Box::new(Store))]),
            ),
            (
                strings(&["remove"]),
                child("program remove", vec![(force, Box::new(StoreTrue))]),
            ),
        ])
    }

    fn dispatch(
        spec: &ArgumentSpec,
        namespace: &mut Namespace,
        values: &[&str],
    ) -> Result<Vec<String>, ParseError> {
        let parser = Parser::empty();
        let interface = InMemoryInterface::default();
        let mut extras = Vec::default();
        let mut context = ActionContext::new(&parser, &interface, &mut extras);
        action().act(namespace, spec, &strings(values), &mut context)?;
        Ok(extras)
    }

    #[rstest]
    #[case(vec!["add", "x"])]
    #[case(vec!["a", "x"])]
    fn select(#[case] values: Vec<&str>) {
        // Setup
        let mut namespace = Namespace::default();
        namespace.set_value("item", "parent".to_string());

        // Execute
        let extras = dispatch(&branch(Some("command")), &mut namespace, &values).unwrap();

        // Verify
        assert_eq!(extras, Vec::<String>::default());
        assert_eq!(namespace.get_one("command"), Some(values[0]));
        // The child's values win.
        assert_eq!(namespace.get_one("item"), Some("x"));
        assert!(!namespace.contains("force"));
    }

    #[test]
    fn select_without_dest() {
        let mut namespace = Namespace::default();
        dispatch(&branch(None), &mut namespace, &["remove", "--force"]).unwrap();
        assert_eq!(namespace.get_one("force"), Some("true"));
        assert_eq!(namespace.iter().count(), 1);
    }

    #[test]
    fn select_extras() {
        let mut namespace = Namespace::default();
        let extras = dispatch(&branch(None), &mut namespace, &["remove", "--unknown", "x"]).unwrap();
        assert_eq!(extras, strings(&["--unknown", "x"]));
        assert_eq!(namespace.get_one("force"), Some("false"));
    }

    #[test]
    fn select_unknown() {
        let error = dispatch(&branch(None), &mut Namespace::default(), &["move", "x"]).unwrap_err();
        assert_matches!(&error, ParseError::UnknownSubCommand { argument, choice, choices } => {
            assert_eq!(argument, "{add,a,remove}");
            assert_eq!(choice, "move");
            assert_eq!(choices, &strings(&["add", "a", "remove"]));
        });
        assert_contains!(error.to_string(), "invalid choice: move");
    }

    #[test]
    fn select_child_error() {
        let error = dispatch(&branch(None), &mut Namespace::default(), &["add"]).unwrap_err();
        assert_matches!(error, ParseError::MissingRequired { names } => {
            assert_eq!(names, strings(&["item"]));
        });
    }
}
