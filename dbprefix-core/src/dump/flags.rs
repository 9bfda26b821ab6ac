//! Ordered `--name=value` flags for the dump tool.

/// Modifier prefixes the dump tool accepts in front of any option name.
const OPTION_MODIFIERS: [&str; 5] = ["loose-", "skip-", "disable-", "enable-", "maximum-"];

/// One long option: `--name=value`, or `--name` when there is no value.
#[derive(Clone, PartialEq, Eq)]
pub struct Flag {
    /// Option name without the leading dashes
    pub name: String,
    /// Optional value
    pub value: Option<String>,
}

impl Flag {
    /// Creates a flag.
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Renders the flag as a single argument.
    pub fn to_arg(&self) -> String {
        match &self.value {
            Some(value) => format!("--{}={}", self.name, value),
            None => format!("--{}", self.name),
        }
    }

    /// Whether the dump tool reads this flag as its password option.
    ///
    /// mysqldump accepts unambiguous prefixes of `--password`, numbered
    /// `--password1` to `--password3` variants and modifier prefixes such as
    /// `--loose-`, treating `_` and `-` alike.
    pub fn is_password(&self) -> bool {
        let name = self.name.to_ascii_lowercase().replace('_', "-");
        let base = OPTION_MODIFIERS
            .iter()
            .find_map(|modifier| name.strip_prefix(modifier))
            .unwrap_or(&name);
        (base.len() >= 2 && "password".starts_with(base)) || base.starts_with("password")
    }
}

impl std::fmt::Debug for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.value, self.is_password()) {
            (Some(_), true) => write!(f, "--{}=****", self.name),
            _ => write!(f, "{}", self.to_arg()),
        }
    }
}

/// Flags in insertion order, unique by name.
///
/// Inserting a name that is already present replaces its value but keeps
/// its original position, so the last writer wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    flags: Vec<Flag>,
}

impl FlagSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a flag.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let flag = Flag::new(name, value);
        match self.flags.iter_mut().find(|f| f.name == flag.name) {
            Some(existing) => existing.value = flag.value,
            None => self.flags.push(flag),
        }
    }

    /// Inserts every flag of `other`, in order.
    pub fn merge(&mut self, other: Self) {
        for flag in other.flags {
            self.insert(flag.name, flag.value);
        }
    }

    /// Looks a flag up by name.
    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// Removes a flag by name.
    pub fn remove(&mut self, name: &str) -> Option<Flag> {
        let idx = self.flags.iter().position(|f| f.name == name)?;
        Some(self.flags.remove(idx))
    }

    /// Keeps only the flags for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&Flag) -> bool) {
        self.flags.retain(|flag| keep(flag));
    }

    /// Number of flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Renders every flag as an argument.
    pub fn to_args(&self) -> Vec<String> {
        self.flags.iter().map(Flag::to_arg).collect()
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<T: IntoIterator<Item = Flag>>(iter: T) -> Self {
        let mut set = Self::new();
        for flag in iter {
            set.insert(flag.name, flag.value);
        }
        set
    }
}
