use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Type-erased schema handle stored in a [`SchemaCache`].
pub type CachedSchema = Arc<dyn Any + Send + Sync>;

/// Key-value store for record schemas, keyed by record type identity.
///
/// The decoder performs `load` then, on a miss, `store` without locking around the pair.
/// Two concurrent misses for the same type both build the schema; the later store wins.
pub trait SchemaCache: Send + Sync {
	/// Look up a previously stored schema.
	fn load(&self, key: TypeId) -> Option<CachedSchema>;

	/// Store a schema for later lookups.
	fn store(&self, key: TypeId, value: CachedSchema);
}

/// Default in-memory [`SchemaCache`] safe for concurrent decoders.
#[derive(Default)]
pub struct TypeCache {
	entries: RwLock<HashMap<TypeId, CachedSchema>>,
}

impl TypeCache {
	/// Create an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of cached record types.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Whether nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Drop every cached schema.
	pub fn clear(&self) {
		self.entries.write().clear();
	}
}

impl SchemaCache for TypeCache {
	fn load(&self, key: TypeId) -> Option<CachedSchema> {
		self.entries.read().get(&key).cloned()
	}

	fn store(&self, key: TypeId, value: CachedSchema) {
		self.entries.write().insert(key, value);
	}
}

impl fmt::Debug for TypeCache {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeCache").field("len", &self.len()).finish()
	}
}
