use std::collections::BTreeMap;

/// The resolved values of a parse, keyed by `dest`.
///
/// Every value is kept as the raw string matched from the command line (or declared as a default/constant).
/// Conversion into richer types is left to the caller.
///
/// ### Example
/// ```
/// # use argot_engine as argot;
/// use argot::{CommandLineParser, Nargs, Parameter, StoreConst};
///
/// let parser = CommandLineParser::new("program")
///     .add(Parameter::option(["--verbose"]).action(StoreConst).constant("yes"))
///     .add(Parameter::argument("items").nargs(Nargs::AtLeastOne))
///     .build_parser()
///     .unwrap();
/// let namespace = parser.parse_tokens(&["a", "b"]).unwrap();
///
/// assert_eq!(namespace.get("items"), Some(&["a".to_string(), "b".to_string()][..]));
/// assert_eq!(namespace.get_one("verbose"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    values: BTreeMap<String, Vec<String>>,
}

impl Namespace {
    /// Whether `dest` has an entry (possibly empty).
    pub fn contains(&self, dest: &str) -> bool {
        self.values.contains_key(dest)
    }

    /// All values stored under `dest`.
    pub fn get(&self, dest: &str) -> Option<&[String]> {
        self.values.get(dest).map(Vec::as_slice)
    }

    /// The first value stored under `dest`.
    pub fn get_one(&self, dest: &str) -> Option<&str> {
        self.values
            .get(dest)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Overwrite the first value under `dest`, keeping any that follow.
    pub fn set_value(&mut self, dest: &str, value: impl Into<String>) {
        let values = self.values.entry(dest.to_string()).or_default();

        match values.first_mut() {
            Some(first) => *first = value.into(),
            None => values.push(value.into()),
        }
    }

    /// Replace every value under `dest`.
    pub fn set_values(&mut self, dest: &str, values: Vec<String>) {
        self.values.insert(dest.to_string(), values);
    }

    /// Extend the values under `dest`.
    pub fn append_values(&mut self, dest: &str, values: &[String]) {
        self.values
            .entry(dest.to_string())
            .or_default()
            .extend_from_slice(values);
    }

    /// Iterate over `(dest, values)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(dest, values)| (dest.as_str(), values.as_slice()))
    }

    /// Fold `other` into this namespace; entries in `other` win.
    pub(crate) fn merge(&mut self, other: Namespace) {
        self.values.extend(other.values);
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries: Vec<String> = self
            .values
            .iter()
            .map(|(dest, values)| match values.as_slice() {
                [] => format!("{dest}=None"),
                [value] => format!("{dest}={value}"),
                _ => format!("{dest}=[{}]", values.join(", ")),
            })
            .collect();
        write!(f, "Namespace({})", entries.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{thread_rng, Rng};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn empty() {
        let namespace = Namespace::default();
        assert!(!namespace.contains("a"));
        assert_eq!(namespace.get("a"), None);
        assert_eq!(namespace.get_one("a"), None);
        assert_eq!(namespace.to_string(), "Namespace()");
    }

    #[test]
    fn set_value() {
        // Setup
        let mut namespace = Namespace::default();

        // Execute
        namespace.set_value("a", "1");
        namespace.set_value("a", "2");
        namespace.set_values("b", strings(&["x", "y"]));
        namespace.set_value("b", "z");

        // Verify
        assert_eq!(namespace.get("a").unwrap(), strings(&["2"]));
        assert_eq!(namespace.get("b").unwrap(), strings(&["z", "y"]));
        assert_eq!(namespace.get_one("b"), Some("z"));
    }

    #[test]
    fn append_values() {
        let mut namespace = Namespace::default();
        let mut expected = Vec::default();

        for _ in 0..10 {
            let value: u32 = thread_rng().gen();
            namespace.append_values("a", &[value.to_string()]);
            expected.push(value.to_string());
        }

        namespace.append_values("a", empty::slice());
        assert_eq!(namespace.get("a").unwrap(), expected);
    }

    #[test]
    fn merge() {
        // Setup
        let mut parent = Namespace::default();
        parent.set_value("a", "1");
        parent.set_value("b", "2");
        let mut child = Namespace::default();
        child.set_value("b", "3");
        child.set_values("c", Vec::default());

        // Execute
        parent.merge(child);

        // Verify
        assert_eq!(parent.get_one("a"), Some("1"));
        assert_eq!(parent.get_one("b"), Some("3"));
        assert!(parent.contains("c"));
        assert_eq!(
            parent.iter().map(|(dest, _)| dest).collect::<Vec<&str>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn display() {
        let mut namespace = Namespace::default();
        namespace.set_values("foo", strings(&["a", "b"]));
        namespace.set_value("bar", "1");
        namespace.set_values("baz", Vec::default());
        assert_eq!(
            namespace.to_string(),
            "Namespace(bar=1, baz=None, foo=[a, b])"
        );
    }
}
