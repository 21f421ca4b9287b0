use argot::prelude::*;
use argot::{CommandLineParser, Nargs, Parameter};

fn main() {
    let parser = CommandLineParser::new("summer")
        .about("Sum up the items.")
        .add(
            Parameter::argument("item")
                .nargs(Nargs::AtLeastOne)
                .help("The items to sum."),
        )
        .add(
            Parameter::option(["-s", "--scale"])
                .default("1")
                .help("Multiply the sum by this amount."),
        )
        .add(
            Parameter::option(["--round"])
                .action(StoreTrue)
                .help("Round the sum to the nearest integer."),
        )
        .build();

    let namespace = parser.parse();
    let items = namespace.get("item").unwrap_or_default();
    let scale = parse_number(namespace.get_one("scale").unwrap_or("1"));
    let sum: f64 = items.iter().map(|item| parse_number(item)).sum::<f64>() * scale;

    if namespace.get_one("round") == Some("true") {
        println!("Sum: {}", sum.round());
    } else {
        println!("Sum: {sum}");
    }
}

fn parse_number(value: &str) -> f64 {
    match value.parse::<f64>() {
        Ok(number) => number,
        Err(_) => {
            eprintln!("summer: error: '{value}' is not a number");
            std::process::exit(2);
        }
    }
}
