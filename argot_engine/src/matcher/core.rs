use std::collections::HashSet;

use crate::matcher::model::*;
use crate::model::Nargs;

/// The matchable rule compiled from a declared `Nargs`.
///
/// A pattern is a sequence of quantified symbol classes, matched greedily & anchored at the start of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArityPattern {
    nargs: Nargs,
    elements: Vec<Element>,
}

impl ArityPattern {
    /// Compile the pattern used when scanning a positional run.
    /// Separators may appear around the arguments.
    pub(crate) fn positional(nargs: Nargs) -> Self {
        Self {
            nargs,
            elements: compile(nargs),
        }
    }

    /// Compile the pattern used for the tokens trailing an option.
    /// An option's own run may not contain a separator.
    pub(crate) fn optional(nargs: Nargs) -> Self {
        Self {
            nargs,
            elements: compile(nargs)
                .into_iter()
                .filter_map(|element| element.without(Symbol::Separator))
                .collect(),
        }
    }

    pub(crate) fn nargs(&self) -> Nargs {
        self.nargs
    }

    /// The number of symbols consumed by the match anchored at the start of `symbols`.
    pub(crate) fn matches(&self, symbols: &[Symbol]) -> Option<usize> {
        match_sequence(&[self], symbols).map(|counts| counts[0])
    }
}

impl std::fmt::Display for ArityPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for element in &self.elements {
            write!(f, "{element}")?;
        }

        Ok(())
    }
}

fn compile(nargs: Nargs) -> Vec<Element> {
    let separators = Element::star(&[Symbol::Separator]);

    match nargs {
        Nargs::Single => vec![
            separators.clone(),
            Element::one(Symbol::Argument),
            separators,
        ],
        Nargs::Optional => vec![
            separators.clone(),
            Element::maybe(Symbol::Argument),
            separators,
        ],
        Nargs::Any => vec![
            separators,
            Element::star(&[Symbol::Argument, Symbol::Separator]),
        ],
        Nargs::AtLeastOne => vec![
            separators,
            Element::one(Symbol::Argument),
            Element::star(&[Symbol::Argument, Symbol::Separator]),
        ],
        Nargs::Remainder => vec![Element::star(&[
            Symbol::Separator,
            Symbol::Argument,
            Symbol::Option,
        ])],
        Nargs::SubCommand => vec![
            separators,
            Element::one(Symbol::Argument),
            Element::star(&[Symbol::Separator, Symbol::Argument, Symbol::Option]),
        ],
        Nargs::Precisely(0) | Nargs::Suppress => vec![separators],
        Nargs::Precisely(n) => {
            let mut elements = vec![separators.clone()];

            for _ in 0..n {
                elements.push(Element::one(Symbol::Argument));
                elements.push(separators.clone());
            }

            elements
        }
    }
}

/// Match the given patterns back to back against `symbols`, returning the count consumed by each.
fn match_sequence(patterns: &[&ArityPattern], symbols: &[Symbol]) -> Option<Vec<usize>> {
    let elements: Vec<&Element> = patterns.iter().flat_map(|p| p.elements.iter()).collect();
    let mut walker = Walker {
        elements: &elements,
        symbols,
        ends: Vec::with_capacity(elements.len()),
        dead: HashSet::default(),
    };

    if !walker.descend(0, 0) {
        return None;
    }

    let mut counts = Vec::with_capacity(patterns.len());
    let mut offset = 0;
    let mut position = 0;

    for pattern in patterns {
        offset += pattern.elements.len();
        let end = if offset == 0 {
            0
        } else {
            walker.ends[offset - 1]
        };
        counts.push(end - position);
        position = end;
    }

    Some(counts)
}

/// Match as many of the `patterns` as possible against `symbols`.
///
/// The full sequence is tried first, then the final pattern is sliced off until a match is found.
/// Returns the consumed count for each pattern in the first window that matched (empty when none did).
pub(crate) fn match_partial(patterns: &[&ArityPattern], symbols: &[Symbol]) -> Vec<usize> {
    for window in (1..=patterns.len()).rev() {
        if let Some(counts) = match_sequence(&patterns[..window], symbols) {
            return counts;
        }
    }

    Vec::default()
}

struct Walker<'a> {
    elements: &'a [&'a Element],
    symbols: &'a [Symbol],
    // The symbol position after each matched element.
    ends: Vec<usize>,
    // (element, position) pairs already known not to lead to a match.
    dead: HashSet<(usize, usize)>,
}

impl<'a> Walker<'a> {
    fn descend(&mut self, index: usize, position: usize) -> bool {
        if index == self.elements.len() {
            return true;
        }

        if self.dead.contains(&(index, position)) {
            return false;
        }

        let element = self.elements[index];
        let available = self.symbols[position..]
            .iter()
            .take_while(|symbol| element.accepts(symbol))
            .count();
        let upper = match element.max() {
            Some(max) => std::cmp::min(max, available),
            None => available,
        };

        if upper >= element.min() {
            // Greedy: try the longest run first.
            for take in (element.min()..=upper).rev() {
                self.ends.push(position + take);

                if self.descend(index + 1, position + take) {
                    return true;
                }

                self.ends.pop();
            }
        }

        self.dead.insert((index, position));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{thread_rng, Rng};
    use rstest::rstest;

    #[rstest]
    #[case(Nargs::Single, "-*A-*", "A")]
    #[case(Nargs::Optional, "-*A?-*", "A?")]
    #[case(Nargs::Any, "-*[A-]*", "A*")]
    #[case(Nargs::AtLeastOne, "-*A[A-]*", "AA*")]
    #[case(Nargs::Remainder, "[-AO]*", "[AO]*")]
    #[case(Nargs::SubCommand, "-*A[-AO]*", "A[AO]*")]
    #[case(Nargs::Suppress, "-*", "")]
    #[case(Nargs::Precisely(0), "-*", "")]
    #[case(Nargs::Precisely(2), "-*A-*A-*", "AA")]
    fn compile_nargs(#[case] nargs: Nargs, #[case] positional: &str, #[case] optional: &str) {
        assert_eq!(ArityPattern::positional(nargs).to_string(), positional);
        assert_eq!(ArityPattern::optional(nargs).to_string(), optional);
        assert_eq!(ArityPattern::optional(nargs).nargs(), nargs);
    }

    #[rstest]
    #[case(Nargs::Single, "A", Some(1))]
    #[case(Nargs::Single, "AA", Some(1))]
    #[case(Nargs::Single, "-A", Some(2))]
    #[case(Nargs::Single, "O", None)]
    #[case(Nargs::Single, "", None)]
    #[case(Nargs::Optional, "", Some(0))]
    #[case(Nargs::Optional, "AA", Some(1))]
    #[case(Nargs::Any, "AAOA", Some(2))]
    #[case(Nargs::Any, "-AAA", Some(4))]
    #[case(Nargs::AtLeastOne, "", None)]
    #[case(Nargs::AtLeastOne, "O", None)]
    #[case(Nargs::AtLeastOne, "AAO", Some(2))]
    #[case(Nargs::Remainder, "AOAO", Some(4))]
    #[case(Nargs::Remainder, "", Some(0))]
    #[case(Nargs::SubCommand, "AOAO", Some(4))]
    #[case(Nargs::SubCommand, "OA", None)]
    #[case(Nargs::Precisely(0), "AA", Some(0))]
    #[case(Nargs::Precisely(3), "AAO", None)]
    #[case(Nargs::Precisely(3), "AAAA", Some(3))]
    fn positional_matches(#[case] nargs: Nargs, #[case] text: &str, #[case] expected: Option<usize>) {
        assert_eq!(ArityPattern::positional(nargs).matches(&symbols(text)), expected);
    }

    #[rstest]
    #[case(Nargs::Single, "-A", None)]
    #[case(Nargs::Any, "A-A", Some(1))]
    #[case(Nargs::Remainder, "AO-A", Some(2))]
    #[case(Nargs::Precisely(0), "A", Some(0))]
    #[case(Nargs::Optional, "O", Some(0))]
    fn optional_matches(#[case] nargs: Nargs, #[case] text: &str, #[case] expected: Option<usize>) {
        assert_eq!(ArityPattern::optional(nargs).matches(&symbols(text)), expected);
    }

    #[test]
    fn precisely_random() {
        for _ in 0..100 {
            let n: u8 = thread_rng().gen_range(1..20);
            let extra: usize = thread_rng().gen_range(0..5);
            let pattern = ArityPattern::optional(Nargs::Precisely(n));
            let text = "A".repeat(n as usize + extra);
            assert_eq!(pattern.matches(&symbols(&text)), Some(n as usize));

            let short = "A".repeat(n as usize - 1) + "O";
            assert_eq!(pattern.matches(&symbols(&short)), None);
        }
    }

    #[rstest]
    #[case(vec![Nargs::Single, Nargs::Single], "AA", vec![1, 1])]
    #[case(vec![Nargs::Single, Nargs::Single], "AOA", vec![1])]
    #[case(vec![Nargs::Any, Nargs::Single], "AAA", vec![2, 1])]
    #[case(vec![Nargs::AtLeastOne, Nargs::Precisely(2)], "AAAA", vec![2, 2])]
    #[case(vec![Nargs::Single, Nargs::Optional], "A", vec![1, 0])]
    #[case(vec![Nargs::Single, Nargs::SubCommand], "AAOA", vec![1, 3])]
    #[case(vec![Nargs::Single], "O", vec![])]
    #[case(vec![], "AA", vec![])]
    #[case(vec![Nargs::Precisely(2), Nargs::Single], "A", vec![])]
    fn partial(#[case] nargs: Vec<Nargs>, #[case] text: &str, #[case] expected: Vec<usize>) {
        let patterns: Vec<ArityPattern> = nargs.into_iter().map(ArityPattern::positional).collect();
        let references: Vec<&ArityPattern> = patterns.iter().collect();
        assert_eq!(match_partial(&references, &symbols(text)), expected);
    }

    #[test]
    fn partial_bounded() {
        // Many greedy patterns over a long run must not blow up.
        let patterns: Vec<ArityPattern> = (0..30).map(|_| ArityPattern::positional(Nargs::Any)).collect();
        let references: Vec<&ArityPattern> = patterns.iter().collect();
        let text = "A".repeat(200) + "O";
        let counts = match_partial(&references, &symbols(&text));
        assert_eq!(counts.len(), 30);
        assert_eq!(counts[0], 200);
        assert_eq!(counts.iter().sum::<usize>(), 200);
    }
}
