use argot::prelude::*;
use argot::{Branch, Command, CommandLineParser, Nargs, Parameter};

fn main() {
    let parser = CommandLineParser::new("package")
        .about("Manage the packages of a project.")
        .add(
            Parameter::option(["-q", "--quiet"])
                .action(StoreTrue)
                .help("Only print errors."),
        )
        .branch(
            Branch::new()
                .dest("command")
                .metavar("COMMAND")
                .required(true)
                .help("The operation to perform."),
        )
        .command(
            Command::new("install").alias("i").help("Install packages."),
            |sub| {
                sub.about("Install the named packages, along with their dependencies.")
                    .add(
                        Parameter::argument("package")
                            .nargs(Nargs::AtLeastOne)
                            .help("The packages to install."),
                    )
                    .add(
                        Parameter::option(["--registry"])
                            .default("default")
                            .help("Where to fetch packages from."),
                    )
            },
        )
        .command(
            Command::new("remove").alias("rm").help("Remove packages."),
            |sub| {
                sub.add(
                    Parameter::argument("package")
                        .nargs(Nargs::AtLeastOne)
                        .help("The packages to remove."),
                )
            },
        )
        // An undocumented sub-command.
        .command("doctor", |sub| sub)
        .build();

    let namespace = parser.parse();
    let quiet = namespace.get_one("quiet") == Some("true");

    match namespace.get_one("command") {
        Some("install") | Some("i") => {
            let registry = namespace.get_one("registry").unwrap_or("default");

            for package in namespace.get("package").unwrap_or_default() {
                if !quiet {
                    println!("Installing '{package}' from '{registry}'.");
                }
            }
        }
        Some("remove") | Some("rm") => {
            for package in namespace.get("package").unwrap_or_default() {
                if !quiet {
                    println!("Removing '{package}'.");
                }
            }
        }
        Some("doctor") => {
            println!("Everything looks fine.");
        }
        _ => {
            panic!("impossible - the parser rejects any sub-command not set up via `command(..)`.")
        }
    }
}
