use std::collections::BTreeMap;

use crate::constant::*;
use crate::error::ParseError;
use crate::matcher::Symbol;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// How an option-shaped token was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionMatch {
    /// The registered option string (or the raw token, when unrecognized).
    pub(crate) option_string: String,
    /// The index of the resolved spec; `None` when the option is unrecognized.
    pub(crate) spec: Option<usize>,
    /// The inline value (ex: `--foo=1` or `-f1`).
    pub(crate) explicit: Option<String>,
}

/// The classified form of a token list.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Classification {
    pub(crate) symbols: Vec<Symbol>,
    /// Every `Symbol::Option` position, with its resolution.
    pub(crate) options: BTreeMap<usize, OptionMatch>,
}

/// Resolves raw tokens against the registered option strings.
#[derive(Debug)]
pub(crate) struct TokenClassifier {
    prefix: char,
    allow_abbrev: bool,
    // Sorted, so candidate lists come out in lexicographic order.
    options: BTreeMap<String, usize>,
    negative_number_options: bool,
}

impl TokenClassifier {
    pub(crate) fn new(prefix: char, allow_abbrev: bool, options: BTreeMap<String, usize>) -> Self {
        let negative_number_options = options.keys().any(|o| looks_like_negative_number(o));

        Self {
            prefix,
            allow_abbrev,
            options,
            negative_number_options,
        }
    }

    /// Find the spec registered under exactly `option_string`.
    pub(crate) fn lookup(&self, option_string: &str) -> Option<usize> {
        self.options.get(option_string).copied()
    }

    pub(crate) fn classify(&self, tokens: &[&str]) -> Result<Classification, ParseError> {
        let mut symbols = Vec::with_capacity(tokens.len());
        let mut options = BTreeMap::default();
        let mut separated = false;

        for (index, token) in tokens.iter().enumerate() {
            if separated {
                symbols.push(Symbol::Argument);
            } else if *token == SEPARATOR {
                separated = true;
                symbols.push(Symbol::Separator);
            } else {
                match self.resolve(token)? {
                    Some(option_match) => {
                        options.insert(index, option_match);
                        symbols.push(Symbol::Option);
                    }
                    None => symbols.push(Symbol::Argument),
                }
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Classified {tokens:?} as '{}'.",
                crate::matcher::render(&symbols)
            );
        }

        Ok(Classification { symbols, options })
    }

    /// Resolve a single token; `None` means the token is positional.
    fn resolve(&self, token: &str) -> Result<Option<OptionMatch>, ParseError> {
        if !token.starts_with(self.prefix) {
            return Ok(None);
        }

        if let Some(spec) = self.lookup(token) {
            return Ok(Some(OptionMatch {
                option_string: token.to_string(),
                spec: Some(spec),
                explicit: None,
            }));
        }

        if token.chars().count() == 1 {
            return Ok(None);
        }

        if let Some((option_string, explicit)) = token.split_once('=') {
            if let Some(spec) = self.lookup(option_string) {
                return Ok(Some(OptionMatch {
                    option_string: option_string.to_string(),
                    spec: Some(spec),
                    explicit: Some(explicit.to_string()),
                }));
            }
        }

        let mut candidates = self.candidates(token);

        match candidates.len() {
            0 => {}
            1 => return Ok(candidates.pop()),
            _ => {
                let mut names: Vec<String> =
                    candidates.into_iter().map(|c| c.option_string).collect();
                names.sort();
                return Err(ParseError::AmbiguousOption {
                    token: token.to_string(),
                    candidates: names,
                });
            }
        }

        if looks_like_negative_number(token) && !self.negative_number_options {
            return Ok(None);
        }

        if token.contains(' ') {
            return Ok(None);
        }

        Ok(Some(OptionMatch {
            option_string: token.to_string(),
            spec: None,
            explicit: None,
        }))
    }

    fn candidates(&self, token: &str) -> Vec<OptionMatch> {
        let long = format!("{p}{p}", p = self.prefix);

        if token.starts_with(&long) {
            // Long options only split at the '='.
            if !self.allow_abbrev {
                return Vec::default();
            }

            let (option_prefix, explicit) = match token.split_once('=') {
                Some((option_prefix, explicit)) => (option_prefix, Some(explicit.to_string())),
                None => (token, None),
            };

            self.options
                .iter()
                .filter(|(option_string, _)| option_string.starts_with(option_prefix))
                .map(|(option_string, spec)| OptionMatch {
                    option_string: option_string.clone(),
                    spec: Some(*spec),
                    explicit: explicit.clone(),
                })
                .collect()
        } else {
            // Short options may be joined with their value (ex: `-f1`) or with other short options (ex: `-vx`).
            let split = token
                .char_indices()
                .nth(2)
                .map(|(i, _)| i)
                .unwrap_or(token.len());
            let (short, remainder) = token.split_at(split);

            self.options
                .iter()
                .filter_map(|(option_string, spec)| {
                    if option_string == short {
                        Some(OptionMatch {
                            option_string: option_string.clone(),
                            spec: Some(*spec),
                            explicit: if remainder.is_empty() {
                                None
                            } else {
                                Some(remainder.to_string())
                            },
                        })
                    } else if option_string.starts_with(token) {
                        Some(OptionMatch {
                            option_string: option_string.clone(),
                            spec: Some(*spec),
                            explicit: None,
                        })
                    } else {
                        None
                    }
                })
                .collect()
        }
    }
}

/// Matches `-N` and `-N.N` / `-.N` shaped tokens.
fn looks_like_negative_number(token: &str) -> bool {
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());

    match token.strip_prefix('-') {
        Some(rest) => match rest.split_once('.') {
            Some((whole, fraction)) => digits(whole) && !fraction.is_empty() && digits(fraction),
            None => !rest.is_empty() && digits(rest),
        },
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{render, symbols};
    use rstest::rstest;

    fn classifier(options: &[&str]) -> TokenClassifier {
        TokenClassifier::new(
            DEFAULT_PREFIX,
            true,
            options
                .iter()
                .enumerate()
                .map(|(i, o)| (o.to_string(), i))
                .collect(),
        )
    }

    fn resolved(option_string: &str, spec: usize, explicit: Option<&str>) -> Option<OptionMatch> {
        Some(OptionMatch {
            option_string: option_string.to_string(),
            spec: Some(spec),
            explicit: explicit.map(str::to_string),
        })
    }

    #[rstest]
    #[case(vec![], "")]
    #[case(vec!["a"], "A")]
    #[case(vec!["--foo", "a"], "OA")]
    #[case(vec!["a", "--", "--foo", "-f", "--"], "A-AAA")]
    #[case(vec!["-", "", "-1", "-2.5", "-.5", "a b"], "AAAAAA")]
    #[case(vec!["--unknown", "-u", "-1x"], "OOO")]
    fn classify_symbols(#[case] tokens: Vec<&str>, #[case] expected: &str) {
        let classification = classifier(&["-f", "--foo"]).classify(&tokens).unwrap();
        assert_eq!(render(&classification.symbols), expected);
        assert_eq!(classification.symbols, symbols(expected));
        assert_eq!(
            classification.options.len(),
            expected.chars().filter(|c| *c == 'O').count()
        );
    }

    #[rstest]
    #[case("--foo", resolved("--foo", 1, None))]
    #[case("-f", resolved("-f", 0, None))]
    #[case("--foo=1", resolved("--foo", 1, Some("1")))]
    #[case("--foo=", resolved("--foo", 1, Some("")))]
    #[case("--fo", resolved("--foo", 1, None))]
    #[case("--fo=x=y", resolved("--foo", 1, Some("x=y")))]
    #[case("-f1", resolved("-f", 0, Some("1")))]
    #[case("-f=1", resolved("-f", 0, Some("1")))]
    #[case("-fx", resolved("-f", 0, Some("x")))]
    #[case("a", None)]
    #[case("-", None)]
    #[case("-5", None)]
    fn resolve(#[case] token: &str, #[case] expected: Option<OptionMatch>) {
        assert_eq!(
            classifier(&["-f", "--foo"]).resolve(token).unwrap(),
            expected
        );
    }

    #[test]
    fn resolve_unrecognized() {
        let option_match = classifier(&["--foo"]).resolve("--bar").unwrap().unwrap();
        assert_eq!(option_match.spec, None);
        assert_eq!(option_match.option_string, "--bar");
    }

    #[test]
    fn resolve_ambiguous() {
        let error = classifier(&["--foonley", "--foobar"])
            .resolve("--foo")
            .unwrap_err();
        assert_matches!(error, ParseError::AmbiguousOption { token, candidates } => {
            assert_eq!(token, "--foo");
            assert_eq!(candidates, vec!["--foobar".to_string(), "--foonley".to_string()]);
        });
    }

    #[rstest]
    #[case("--foon", "--foonley")]
    #[case("--foob", "--foobar")]
    fn resolve_abbreviation(#[case] token: &str, #[case] expected: &str) {
        let option_match = classifier(&["--foonley", "--foobar"])
            .resolve(token)
            .unwrap()
            .unwrap();
        assert_eq!(option_match.option_string, expected);
    }

    #[test]
    fn resolve_short_ambiguous() {
        // `-fo` is both `-f` joined with `o` and a prefix of `-foo`.
        let error = classifier(&["-f", "-foo"]).resolve("-fo").unwrap_err();
        assert_matches!(error, ParseError::AmbiguousOption { candidates, .. } => {
            assert_eq!(candidates, vec!["-f".to_string(), "-foo".to_string()]);
        });
    }

    #[test]
    fn disallow_abbrev() {
        let classifier = TokenClassifier::new(
            DEFAULT_PREFIX,
            false,
            BTreeMap::from([("--foobar".to_string(), 0), ("-f".to_string(), 1)]),
        );
        let option_match = classifier.resolve("--foo").unwrap().unwrap();
        assert_eq!(option_match.spec, None);
        // Short option joining is unaffected.
        assert_eq!(classifier.resolve("-fx").unwrap(), resolved("-f", 1, Some("x")));
    }

    #[test]
    fn negative_number_options() {
        let classifier = classifier(&["-1", "--foo"]);
        assert_eq!(classifier.resolve("-1").unwrap(), resolved("-1", 0, None));
        assert_matches!(classifier.resolve("-2").unwrap(), Some(OptionMatch { spec: None, .. }));
    }

    #[test]
    fn custom_prefix() {
        let classifier = TokenClassifier::new(
            '+',
            true,
            BTreeMap::from([("+f".to_string(), 0), ("++foo".to_string(), 1)]),
        );
        let classification = classifier.classify(&["+f", "-f", "++fo=1"]).unwrap();
        assert_eq!(render(&classification.symbols), "OAO");
        assert_eq!(
            classification.options.get(&2),
            resolved("++foo", 1, Some("1")).as_ref()
        );
    }

    #[rstest]
    #[case("-1", true)]
    #[case("-12", true)]
    #[case("-1.5", true)]
    #[case("-.5", true)]
    #[case("-", false)]
    #[case("-1.", false)]
    #[case("-a", false)]
    #[case("1", false)]
    #[case("--1", false)]
    fn negative_number(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(looks_like_negative_number(token), expected);
    }
}
