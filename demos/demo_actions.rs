use argot::prelude::*;
use argot::{ActionContext, ArgumentSpec, CommandLineParser, Namespace, Parameter, ParseError};

/// Store the upper-cased value.
struct Shout;

impl Action for Shout {
    fn act(
        &self,
        namespace: &mut Namespace,
        spec: &ArgumentSpec,
        values: &[String],
        _context: &mut ActionContext,
    ) -> Result<(), ParseError> {
        if let Some(dest) = spec.dest() {
            namespace.set_values(dest, values.iter().map(|v| v.to_uppercase()).collect());
        }

        Ok(())
    }
}

fn main() {
    let parser = CommandLineParser::new("actions")
        .epilog("Flags may be clustered: -vvv is -v -v -v.")
        .add(
            Parameter::option(["-v", "--verbose"])
                .action(Count)
                .help("Increase the verbosity."),
        )
        .add(
            Parameter::option(["-t", "--tag"])
                .action(Append)
                .help("Tag the greeting (repeatable)."),
        )
        .exclusive(false, |group| {
            group
                .add(
                    Parameter::option(["--formal"])
                        .action(StoreConst)
                        .constant("Good day")
                        .dest("salutation"),
                )
                .add(
                    Parameter::option(["--casual"])
                        .action(StoreConst)
                        .constant("Hey")
                        .dest("salutation"),
                )
        })
        .add(
            Parameter::argument("colour")
                .choice("red", "The colour red.")
                .choice("green", "The colour green.")
                .choice("blue", "The colour blue."),
        )
        .add(
            Parameter::argument("name")
                .action(Shout)
                .help("Who to greet."),
        )
        .build();

    let namespace = parser.parse();
    let salutation = namespace.get_one("salutation").unwrap_or("Hello");
    let name = namespace.get_one("name").unwrap_or_default();
    let colour = namespace.get_one("colour").unwrap_or_default();
    println!("{salutation}, {name} (in {colour})!");

    if let Some(tags) = namespace.get("tag") {
        println!("Tags: {}", tags.join(", "));
    }

    if let Some(verbosity) = namespace.get_one("verbose") {
        println!("Verbosity: {verbosity}");

        for (dest, values) in namespace.iter() {
            println!("  {dest}: {values:?}");
        }
    }
}
