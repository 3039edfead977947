//! Fit results and the nested containers that hold them.

use std::any::Any;
use std::borrow::Borrow;
use std::fmt;

use crate::domain::Key;

/// Registry identity of a leaf result type.
///
/// Also used as the `"type"` discriminator of leaf objects in results JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(pub &'static str);

impl TypeTag {
    pub fn name(self) -> &'static str {
        self.0
    }
}

impl Borrow<str> for TypeTag {
    fn borrow(&self) -> &str {
        self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// An opaque, read-only outcome of one fit or optimization.
pub trait FitResult: Any + fmt::Debug + Send + Sync {
    fn type_tag(&self) -> TypeTag;

    fn as_any(&self) -> &dyn Any;

    /// The more general result this one extends, if any.
    ///
    /// Registry resolution falls back along this chain when no extractor is
    /// registered for the exact tag.
    fn supertype(&self) -> Option<&dyn FitResult> {
        None
    }
}

/// A concrete leaf type with a static tag.
pub trait LeafType: FitResult + Sized {
    const TAG: TypeTag;
}

/// Input to the dispatcher: one result, or an arbitrarily nested collection.
#[derive(Debug)]
pub enum Fits {
    Leaf(Box<dyn FitResult>),
    /// Order-significant sequence; index columns get the positions.
    List(Vec<Fits>),
    /// Keyed collection in definition order; index columns get the keys.
    Dict(Vec<(String, Fits)>),
}

impl Fits {
    pub fn leaf(result: impl FitResult) -> Self {
        Fits::Leaf(Box::new(result))
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Fits>,
    {
        Fits::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a keyed collection. A repeated key replaces the earlier value
    /// but keeps the earlier position.
    pub fn dict<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Fits>,
    {
        let mut out: Vec<(String, Fits)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            match out.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }
        Fits::Dict(out)
    }

    /// Element count for containers, 1 for a leaf.
    pub fn len(&self) -> usize {
        match self {
            Fits::Leaf(_) => 1,
            Fits::List(items) => items.len(),
            Fits::Dict(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deepest container nesting below this node (0 for a leaf).
    pub fn depth(&self) -> usize {
        match self {
            Fits::Leaf(_) => 0,
            Fits::List(items) => 1 + items.iter().map(Fits::depth).max().unwrap_or(0),
            Fits::Dict(entries) => 1 + entries.iter().map(|(_, f)| f.depth()).max().unwrap_or(0),
        }
    }

    /// Container elements paired with their keys; empty for a leaf.
    pub fn entries(&self) -> Vec<(Key, &Fits)> {
        match self {
            Fits::Leaf(_) => Vec::new(),
            Fits::List(items) => items.iter().enumerate().map(|(i, f)| (Key::Index(i), f)).collect(),
            Fits::Dict(entries) => entries.iter().map(|(k, f)| (Key::Name(k.clone()), f)).collect(),
        }
    }
}

impl<T: FitResult> From<T> for Fits {
    fn from(result: T) -> Self {
        Fits::leaf(result)
    }
}

impl From<Box<dyn FitResult>> for Fits {
    fn from(result: Box<dyn FitResult>) -> Self {
        Fits::Leaf(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Dummy;

    impl FitResult for Dummy {
        fn type_tag(&self) -> TypeTag {
            TypeTag("Dummy")
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn dict_keeps_first_position_for_repeated_keys() {
        let fits = Fits::dict([("a", Fits::leaf(Dummy)), ("b", Fits::list([Dummy])), ("a", Fits::list([Dummy, Dummy]))]);
        let Fits::Dict(entries) = &fits else {
            panic!("expected a dict");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[0].1.len(), 2);
    }

    #[test]
    fn depth_counts_container_levels() {
        assert_eq!(Fits::leaf(Dummy).depth(), 0);
        assert_eq!(Fits::list([Dummy, Dummy]).depth(), 1);
        let nested = Fits::dict([("A", Fits::list([Dummy])), ("B", Fits::leaf(Dummy))]);
        assert_eq!(nested.depth(), 2);
    }

    #[test]
    fn entries_pair_positions_and_keys() {
        let list = Fits::list([Dummy, Dummy]);
        let keys: Vec<Key> = list.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![Key::Index(0), Key::Index(1)]);

        let dict = Fits::dict([("x", Dummy)]);
        assert_eq!(dict.entries()[0].0, Key::Name("x".to_string()));
    }
}
