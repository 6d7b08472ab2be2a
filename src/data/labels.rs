use serde::{Deserialize, Serialize};

/// Maps dataset labels to output class indices and back.
///
/// The numeric core never sees labels; this trait is how a caller plugs in
/// its own alphabet. `index_of` returning `None` marks a label as unmapped.
pub trait LabelMap {
    fn index_of(&self, label: &str) -> Option<usize>;
    fn label_of(&self, index: usize) -> Option<String>;
    fn class_count(&self) -> usize;
}

/// Digits `0`-`9` map to 0-9, letters `A`-`Z` (either case) to 10-35.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alphanumeric;

impl LabelMap for Alphanumeric {
    fn index_of(&self, label: &str) -> Option<usize> {
        let mut chars = label.trim().chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match c.to_ascii_uppercase() {
            d @ '0'..='9' => Some(d as usize - '0' as usize),
            l @ 'A'..='Z' => Some(10 + l as usize - 'A' as usize),
            _ => None,
        }
    }

    fn label_of(&self, index: usize) -> Option<String> {
        match index {
            0..=9 => Some(((b'0' + index as u8) as char).to_string()),
            10..=35 => Some(((b'A' + (index - 10) as u8) as char).to_string()),
            _ => None,
        }
    }

    fn class_count(&self) -> usize {
        36
    }
}

/// An explicit, ordered symbol list such as `["a", "4", "f"]`.
///
/// Matching trims whitespace and ignores case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    symbols: Vec<String>,
}

impl SymbolSet {
    pub fn new<I, S>(symbols: I) -> SymbolSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        SymbolSet {
            symbols: symbols.into_iter().map(|s| normalize(s.as_ref())).collect(),
        }
    }
}

impl LabelMap for SymbolSet {
    fn index_of(&self, label: &str) -> Option<usize> {
        let label = normalize(label);
        self.symbols.iter().position(|s| *s == label)
    }

    fn label_of(&self, index: usize) -> Option<String> {
        self.symbols.get(index).cloned()
    }

    fn class_count(&self) -> usize {
        self.symbols.len()
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Serializable choice of label alphabet, as found in a run config.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LabelScheme {
    #[default]
    Alphanumeric,
    Symbols { symbols: Vec<String> },
}

impl LabelScheme {
    pub fn build(&self) -> Box<dyn LabelMap> {
        match self {
            LabelScheme::Alphanumeric => Box::new(Alphanumeric),
            LabelScheme::Symbols { symbols } => Box::new(SymbolSet::new(symbols)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphanumeric_covers_digits_and_letters() {
        let map = Alphanumeric;
        assert_eq!(map.index_of("7"), Some(7));
        assert_eq!(map.index_of("A"), Some(10));
        assert_eq!(map.index_of("z"), Some(35));
        assert_eq!(map.index_of(" q "), Some(26));
        assert_eq!(map.label_of(35).as_deref(), Some("Z"));
        assert_eq!(map.label_of(36), None);
    }

    #[test]
    fn alphanumeric_rejects_everything_else() {
        let map = Alphanumeric;
        for bad in ["", "10", "ab", "?", "é"] {
            assert_eq!(map.index_of(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn alphanumeric_is_injective() {
        let map = Alphanumeric;
        for i in 0..map.class_count() {
            let label = map.label_of(i).unwrap();
            assert_eq!(map.index_of(&label), Some(i));
        }
    }

    #[test]
    fn symbol_set_follows_given_order() {
        let map = SymbolSet::new(["a", "4", "f"]);
        assert_eq!(map.index_of("A"), Some(0));
        assert_eq!(map.index_of("4"), Some(1));
        assert_eq!(map.index_of(" F"), Some(2));
        assert_eq!(map.index_of("b"), None);
        assert_eq!(map.class_count(), 3);
        assert_eq!(map.label_of(1).as_deref(), Some("4"));
    }

    #[test]
    fn scheme_builds_matching_map() {
        let scheme: LabelScheme =
            serde_yaml::from_str("type: symbols\nsymbols: [a, \"4\", f]").unwrap();
        assert_eq!(scheme.build().class_count(), 3);
        assert_eq!(LabelScheme::default().build().class_count(), 36);
    }
}
