use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for object IDs — fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for placeable objects.
/// Internally a `Spur` index — 4 bytes, Copy, Eq, Hash in O(1).
///
/// The same string always interns to the same `ObjectId`, which is what
/// makes save→reload keep ids stable: snapshots carry the string form and
/// rehydration interns it back to an equal id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(Spur);

impl ObjectId {
    /// Intern a string as an ObjectId, or return the existing id if seen before.
    pub fn intern(s: &str) -> Self {
        ObjectId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Mint a unique id with a kind prefix (e.g. `text_3`, `image_7`).
    ///
    /// This is the only way new objects get ids, so a duplicate can never
    /// collide with its source.
    pub fn fresh(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ObjectId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ObjectId::intern("hero_text");
        let b = ObjectId::intern("hero_text");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "hero_text");
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = ObjectId::fresh("text");
        let b = ObjectId::fresh("text");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("text_"));
    }

    #[test]
    fn serde_preserves_id() {
        let id = ObjectId::fresh("shape");
        let json = serde_json::to_string(&id).unwrap();
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
