/// Arguments extracted for one command invocation.
///
/// Values are kept in declaration order. For patterns with placeholders each
/// value is paired with its placeholder name; for patterns without any, the
/// values are blank positional slots sized to the command's declared
/// parameter count.
///
/// Unmatched placeholders hold `""`, never a missing value.
///
/// # Example
///
/// ```rust,ignore
/// // pattern "{fname} {lname?}", text "/greet Ada"
/// assert_eq!(args.get("fname"), Some("Ada"));
/// assert_eq!(args.get("lname"), Some(""));
/// assert_eq!(&args[0], "Ada");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    names: Vec<String>,
    values: Vec<String>,
}

impl CommandArgs {
    /// Creates arguments keyed by placeholder name.
    ///
    /// `names` and `values` are paired by position.
    pub fn named(names: Vec<String>, values: Vec<String>) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self { names, values }
    }

    /// Creates unnamed positional arguments.
    pub fn unnamed(values: Vec<String>) -> Self {
        Self {
            names: Vec::new(),
            values,
        }
    }

    /// Returns the value extracted for placeholder `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// Returns all values in declaration order.
    pub fn positional(&self) -> &[String] {
        &self.values
    }

    /// Returns the placeholder names (empty for positional arguments).
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterates `(name, value)` pairs. Positional arguments have no name.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &str)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (self.names.get(i).map(String::as_str), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::ops::Index<usize> for CommandArgs {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}
