//! Resolved identities
//!
//! The front end assigns every declared type a [`TypeId`]. Passes compare
//! bindings by id and only carry names along for printing.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a resolved type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// Create a type id from its raw index.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw index.
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type{}", self.0)
    }
}

/// A bound reference to a type: its identity plus its (already mangled)
/// target-language name.
///
/// Equality and hashing only look at the id.
#[derive(Debug, Clone, Eq)]
pub struct TypeRef {
    /// Resolved identity
    pub id: TypeId,
    /// Target-language name
    pub name: String,
}

impl TypeRef {
    /// Create a type reference.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: TypeId::new(id),
            name: name.into(),
        }
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Index of a member inside its owning [`crate::ClassDecl`].
///
/// Ids are only stable while the member list is not reordered; passes take
/// them, mutate, and drop them within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(u32);

impl MemberId {
    /// Create a member id from a position in the member list.
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position in the member list.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "member{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_equality_ignores_name() {
        let a = TypeRef::new(3, "Test");
        let b = TypeRef::new(3, "Test_Renamed");
        let c = TypeRef::new(4, "Test");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_member_id_round_trips_index() {
        assert_eq!(MemberId::new(7).index(), 7);
        assert_eq!(TypeId::new(2).to_string(), "type2");
    }
}
