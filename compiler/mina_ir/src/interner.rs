//! Sharded string interner.
//!
//! Identifiers, module segments and string literals are interned once per
//! session and compared as [`Name`]s afterwards. The interner is shared by
//! every compilation unit analysed in the session, so each shard sits behind
//! its own `RwLock`.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;

/// Interned string.
///
/// Bits 31-28 select the shard, bits 27-0 index into it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty string, pre-interned in shard 0.
    pub const EMPTY: Name = Name(0);

    const MAX_LOCAL: u32 = 0x0FFF_FFFF;
    const NUM_SHARDS: usize = 16;

    #[inline]
    const fn new(shard: u32, local: u32) -> Self {
        Name((shard << 28) | (local & Self::MAX_LOCAL))
    }

    #[inline]
    const fn shard(self) -> usize {
        (self.0 >> 28) as usize
    }

    #[inline]
    const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}:{})", self.shard(), self.local())
    }
}

struct Shard {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Shard {
    fn new() -> Self {
        Shard {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(128),
        }
    }
}

/// Thread-safe interner handing out [`Name`]s.
///
/// Interned strings are leaked and live for the rest of the process.
pub struct StringInterner {
    shards: [RwLock<Shard>; Name::NUM_SHARDS],
}

impl StringInterner {
    pub fn new() -> Self {
        let interner = StringInterner {
            shards: std::array::from_fn(|_| RwLock::new(Shard::new())),
        };
        // Shard 0 must hand out index 0 for the empty string.
        let empty = interner.intern("");
        debug_assert_eq!(empty, Name::EMPTY);
        interner
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        if s.is_empty() {
            return 0;
        }
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Intern `s`, returning the existing name when already present.
    pub fn intern(&self, s: &str) -> Name {
        let shard_idx = Self::shard_for(s);
        let shard = &self.shards[shard_idx];

        if let Some(&local) = shard.read().map.get(s) {
            return Name::new(shard_idx as u32, local);
        }

        let mut guard = shard.write();
        if let Some(&local) = guard.map.get(s) {
            return Name::new(shard_idx as u32, local);
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let local = u32::try_from(guard.strings.len()).unwrap_or(Name::MAX_LOCAL);
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);
        Name::new(shard_idx as u32, local)
    }

    /// Text of an interned name.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.shards[name.shard()]
            .read()
            .strings
            .get(name.local())
            .copied()
            .unwrap_or("")
    }

    /// Join several names with `.`, as used for module paths.
    pub fn join(&self, names: &[Name]) -> String {
        let mut out = String::new();
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(self.lookup(*name));
        }
        out
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().strings.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
