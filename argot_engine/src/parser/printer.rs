use terminal_size::{terminal_size, Width};

use crate::model::{ArgumentKind, ArgumentSpec, Nargs};
use crate::parser::base::{Declared, Settings};
use crate::parser::conflict::ExclusiveGroup;
use crate::parser::interface::ColumnRenderer;
use crate::parser::interface::Width as ColumnWidth;

const FALLBACK_TOTAL_WIDTH: usize = 80;
const MAXIMUM_LEFT_WIDTH: usize = 22;
const PADDING_WIDTH: usize = 2;
const MAIN_INDENT: usize = 2;
const CHOICE_INDENT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    invocation: String,
    help: String,
    choices: Vec<(String, String)>,
}

/// Renders the usage line & help message for one parser.
#[derive(Debug)]
pub(crate) struct Printer {
    program: String,
    about: Option<String>,
    epilog: Option<String>,
    summary: Vec<String>,
    positionals: Vec<Row>,
    options: Vec<Row>,
    terminal_width: Option<usize>,
}

impl Printer {
    pub(crate) fn terminal(settings: &Settings, specs: &[Declared], groups: &[ExclusiveGroup]) -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(settings, specs, groups, terminal_width)
    }

    pub(crate) fn new(
        settings: &Settings,
        specs: &[Declared],
        groups: &[ExclusiveGroup],
        terminal_width: Option<usize>,
    ) -> Self {
        let mut positionals = Vec::default();
        let mut options = Vec::default();

        for (spec, _) in specs {
            let row = Row {
                invocation: invocation(spec),
                help: spec.help().unwrap_or_default().to_string(),
                choices: spec.choice_help.clone(),
            };

            match spec.kind() {
                ArgumentKind::Optional => options.push(row),
                ArgumentKind::Positional | ArgumentKind::SubCommand => positionals.push(row),
            }
        }

        Self {
            program: settings.program.clone(),
            about: settings.about.clone(),
            epilog: settings.epilog.clone(),
            summary: summary(specs, groups),
            positionals,
            options,
            terminal_width,
        }
    }

    pub(crate) fn usage(&self) -> String {
        if self.summary.is_empty() {
            format!("usage: {}", self.program)
        } else {
            format!("usage: {} {}", self.program, self.summary.join(" "))
        }
    }

    pub(crate) fn help(&self) -> String {
        let rows = self.positionals.iter().chain(self.options.iter());
        let mut left_column_width = 1;
        let mut middle_column_width = 2;

        for row in rows {
            left_column_width = std::cmp::max(left_column_width, row.invocation.len());
            middle_column_width = std::cmp::max(middle_column_width, row.help.len());

            for (choice, description) in &row.choices {
                left_column_width = std::cmp::max(left_column_width, choice.len() + CHOICE_INDENT);
                middle_column_width = std::cmp::max(middle_column_width, description.len());
            }
        }

        let column_renderer = ColumnRenderer::guided(
            ColumnWidth::at_least(PADDING_WIDTH, 1).expect("internal error - padding must be valid"),
            ColumnWidth::at_least(std::cmp::min(left_column_width, MAXIMUM_LEFT_WIDTH), 1)
                .expect("internal error - left must be valid"),
            ColumnWidth::at_least(middle_column_width, 2)
                .expect("internal error - middle must be valid"),
            self.terminal_width.unwrap_or(FALLBACK_TOTAL_WIDTH),
        );
        let mut lines = vec![self.usage()];

        if let Some(about) = &self.about {
            lines.push(String::default());
            lines.push(about.clone());
        }

        if !self.positionals.is_empty() {
            lines.push(String::default());
            lines.push("positional arguments:".to_string());
            render_rows(&column_renderer, &self.positionals, &mut lines);
        }

        if !self.options.is_empty() {
            lines.push(String::default());
            lines.push("options:".to_string());
            render_rows(&column_renderer, &self.options, &mut lines);
        }

        if let Some(epilog) = &self.epilog {
            lines.push(String::default());
            lines.push(epilog.clone());
        }

        lines.join("\n")
    }
}

fn render_rows(column_renderer: &ColumnRenderer, rows: &[Row], lines: &mut Vec<String>) {
    for row in rows {
        lines.extend(column_renderer.render(MAIN_INDENT, &row.invocation, &row.help));

        for (choice, description) in &row.choices {
            // Indent within the left column, so the help stays aligned.
            lines.extend(column_renderer.render(
                MAIN_INDENT,
                &format!("{:CHOICE_INDENT$}{choice}", ""),
                description,
            ));
        }
    }
}

/// The name shown for the values of a parameter (ex: `COUNT` or `{a,b}`).
fn metavar(spec: &ArgumentSpec) -> String {
    if let Some(metavar) = spec.metavar() {
        metavar.to_string()
    } else if !spec.choices().is_empty() {
        format!("{{{}}}", spec.choices().join(","))
    } else {
        match (spec.kind(), spec.dest()) {
            (ArgumentKind::Optional, Some(dest)) => dest.to_ascii_uppercase(),
            (_, Some(dest)) => dest.to_string(),
            (_, None) => String::default(),
        }
    }
}

/// The values grammar of a parameter (ex: `COUNT [COUNT ...]`).
fn grammar(spec: &ArgumentSpec) -> String {
    let m = metavar(spec);

    match spec.nargs() {
        Nargs::Single => m,
        Nargs::Optional => format!("[{m}]"),
        Nargs::Any => format!("[{m} ...]"),
        Nargs::AtLeastOne => format!("{m} [{m} ...]"),
        Nargs::Remainder => "...".to_string(),
        Nargs::SubCommand => format!("{m} ..."),
        Nargs::Suppress => String::default(),
        Nargs::Precisely(n) => (0..n).map(|_| m.clone()).collect::<Vec<String>>().join(" "),
    }
}

fn invocation(spec: &ArgumentSpec) -> String {
    match spec.kind() {
        ArgumentKind::Optional => {
            let grammar = grammar(spec);
            spec.option_strings()
                .iter()
                .map(|option_string| {
                    if grammar.is_empty() {
                        option_string.clone()
                    } else {
                        format!("{option_string} {grammar}")
                    }
                })
                .collect::<Vec<String>>()
                .join(", ")
        }
        ArgumentKind::Positional | ArgumentKind::SubCommand => metavar(spec),
    }
}

/// The bare usage form of a parameter (ex: `--count COUNT` or `filename`).
fn usage_part(spec: &ArgumentSpec) -> String {
    let grammar = grammar(spec);

    match spec.kind() {
        ArgumentKind::Optional => {
            let option_string = spec
                .option_strings()
                .first()
                .cloned()
                .unwrap_or_default();

            if grammar.is_empty() {
                option_string
            } else {
                format!("{option_string} {grammar}")
            }
        }
        ArgumentKind::Positional | ArgumentKind::SubCommand => grammar,
    }
}

fn summary(specs: &[Declared], groups: &[ExclusiveGroup]) -> Vec<String> {
    let mut summary = Vec::default();
    let mut grouped = vec![None; specs.len()];

    for (g, group) in groups.iter().enumerate() {
        for member in group.members() {
            grouped[*member].get_or_insert(g);
        }
    }

    let optionals = specs
        .iter()
        .enumerate()
        .filter(|(_, (spec, _))| spec.kind() == ArgumentKind::Optional);
    let positionals = specs
        .iter()
        .enumerate()
        .filter(|(_, (spec, _))| spec.kind() != ArgumentKind::Optional);
    let mut rendered_groups = vec![false; groups.len()];

    for (index, (spec, _)) in optionals.chain(positionals) {
        match grouped[index] {
            Some(g) => {
                // A group is rendered once, at the position of its first member.
                if !rendered_groups[g] {
                    rendered_groups[g] = true;
                    let group = &groups[g];
                    let members = group
                        .members()
                        .iter()
                        .map(|member| usage_part(&specs[*member].0))
                        .collect::<Vec<String>>()
                        .join(" | ");

                    if group.required() {
                        summary.push(format!("({members})"));
                    } else {
                        summary.push(format!("[{members}]"));
                    }
                }
            }
            None => {
                let part = usage_part(spec);

                if part.is_empty() {
                    continue;
                }

                if spec.required() || spec.kind() != ArgumentKind::Optional {
                    summary.push(part);
                } else {
                    summary.push(format!("[{part}]"));
                }
            }
        }
    }

    summary
}
