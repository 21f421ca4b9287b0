/// The abstract shape of one classified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Symbol {
    /// `A`: a plain (positional) token.
    Argument,
    /// `O`: an option token, recognized or not.
    Option,
    /// `-`: the `--` separator.
    Separator,
}

impl Symbol {
    pub(crate) fn as_char(&self) -> char {
        match self {
            Symbol::Argument => 'A',
            Symbol::Option => 'O',
            Symbol::Separator => '-',
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Render a run of symbols in the `AO-` notation.
pub(crate) fn render(symbols: &[Symbol]) -> String {
    symbols.iter().map(Symbol::as_char).collect()
}

/// A quantified symbol class, ex: `A`, `-*`, `[A-]*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    accepts: Vec<Symbol>,
    min: usize,
    max: Option<usize>,
}

impl Element {
    pub(crate) fn one(symbol: Symbol) -> Self {
        Self {
            accepts: vec![symbol],
            min: 1,
            max: Some(1),
        }
    }

    pub(crate) fn maybe(symbol: Symbol) -> Self {
        Self {
            accepts: vec![symbol],
            min: 0,
            max: Some(1),
        }
    }

    pub(crate) fn star(symbols: &[Symbol]) -> Self {
        Self {
            accepts: symbols.to_vec(),
            min: 0,
            max: None,
        }
    }

    pub(crate) fn accepts(&self, symbol: &Symbol) -> bool {
        self.accepts.contains(symbol)
    }

    pub(crate) fn min(&self) -> usize {
        self.min
    }

    pub(crate) fn max(&self) -> Option<usize> {
        self.max
    }

    /// Drop `symbol` from the class; `None` when nothing is left to accept.
    pub(crate) fn without(mut self, symbol: Symbol) -> Option<Self> {
        self.accepts.retain(|s| s != &symbol);

        if self.accepts.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = if self.accepts.len() == 1 {
            render(&self.accepts)
        } else {
            format!("[{}]", render(&self.accepts))
        };
        let quantifier = match (self.min, self.max) {
            (1, Some(1)) => "",
            (0, Some(1)) => "?",
            (_, None) => "*",
            _ => unreachable!("internal error - unsupported quantifier"),
        };
        write!(f, "{class}{quantifier}")
    }
}

#[cfg(test)]
pub(crate) fn symbols(pattern: &str) -> Vec<Symbol> {
    pattern
        .chars()
        .map(|c| match c {
            'A' => Symbol::Argument,
            'O' => Symbol::Option,
            '-' => Symbol::Separator,
            _ => unreachable!("un-planned test symbol"),
        })
        .collect()
}
