//! Entities and persistence
//!
//! Persistence is the caller's business. Views only need [`Store`]'s
//! load/save/delete; [`MemoryStore`] is enough for tests and demos.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::TurboError;

/// A persisted domain object
///
/// Usually derived:
///
/// ```rust
/// use serde::Serialize;
/// use turbo_response::Model;
///
/// #[derive(Clone, Serialize, Model)]
/// struct Todo {
///     #[model(pk)]
///     id: Option<i64>,
///     description: String,
/// }
///
/// assert_eq!(Todo::NAME, "todo");
/// ```
pub trait Model: Clone + Serialize + Send + Sync + 'static {
    /// Primary key type
    type Key: Clone + Ord + fmt::Display + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Lower-case model name, used in default targets
    const NAME: &'static str;

    /// Primary key, `None` until saved
    fn pk(&self) -> Option<Self::Key>;

    /// Assign the primary key
    fn set_pk(&mut self, key: Self::Key);

    /// `{name}-{pk}`, the identifier a saved entity is rendered under
    fn dom_id(&self) -> Option<String> {
        self.pk().map(|pk| format!("{}-{pk}", Self::NAME))
    }
}

/// Load/save/delete by primary key
#[async_trait]
pub trait Store<M: Model>: Send + Sync + 'static {
    /// Load the entity stored under `key`
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::NotFound`] if there is none.
    async fn get(&self, key: &M::Key) -> Result<M, TurboError>;

    /// Insert or update `model`, returning it with its key assigned
    async fn save(&self, model: M) -> Result<M, TurboError>;

    /// Delete `model`; it is consumed, its key is gone with it
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::NotFound`] if it was never saved or is already gone.
    async fn delete(&self, model: M) -> Result<(), TurboError>;
}

struct Rows<M: Model> {
    rows: BTreeMap<M::Key, M>,
    next_key: u32,
}

impl<M> Rows<M>
where
    M: Model,
    M::Key: From<u32>,
{
    /// Next sequential key not already taken by an explicitly keyed save
    fn allocate(&mut self) -> M::Key {
        loop {
            let key = M::Key::from(self.next_key);
            self.next_key += 1;
            if !self.rows.contains_key(&key) {
                return key;
            }
        }
    }
}

/// In-memory [`Store`] with sequential keys starting at 1
///
/// Keys already used by explicitly keyed saves are skipped.
pub struct MemoryStore<M: Model> {
    inner: RwLock<Rows<M>>,
    _model: PhantomData<fn() -> M>,
}

impl<M> MemoryStore<M>
where
    M: Model,
    M::Key: From<u32>,
{
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Rows {
                rows: BTreeMap::new(),
                next_key: 1,
            }),
            _model: PhantomData,
        }
    }

    /// Number of stored entities
    #[must_use]
    pub fn count(&self) -> usize {
        self.inner.read().rows.len()
    }

    /// Whether `key` is stored
    #[must_use]
    pub fn contains(&self, key: &M::Key) -> bool {
        self.inner.read().rows.contains_key(key)
    }

    /// Snapshot of every entity, in key order
    #[must_use]
    pub fn all(&self) -> Vec<M> {
        self.inner.read().rows.values().cloned().collect()
    }
}

impl<M> Default for MemoryStore<M>
where
    M: Model,
    M::Key: From<u32>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> fmt::Debug for MemoryStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("model", &M::NAME)
            .field("rows", &self.inner.read().rows.len())
            .finish()
    }
}

#[async_trait]
impl<M> Store<M> for MemoryStore<M>
where
    M: Model,
    M::Key: From<u32>,
{
    async fn get(&self, key: &M::Key) -> Result<M, TurboError> {
        self.inner
            .read()
            .rows
            .get(key)
            .cloned()
            .ok_or_else(|| TurboError::not_found::<M>(key))
    }

    async fn save(&self, mut model: M) -> Result<M, TurboError> {
        let mut inner = self.inner.write();
        let key = match model.pk() {
            Some(key) => key,
            None => {
                let key = inner.allocate();
                model.set_pk(key.clone());
                key
            }
        };
        tracing::debug!(model = M::NAME, key = %key, "saved");
        inner.rows.insert(key, model.clone());
        Ok(model)
    }

    async fn delete(&self, model: M) -> Result<(), TurboError> {
        let key = model.pk().ok_or_else(|| {
            TurboError::Store(format!("cannot delete an unsaved {}", M::NAME))
        })?;
        if self.inner.write().rows.remove(&key).is_none() {
            return Err(TurboError::not_found::<M>(&key));
        }
        tracing::debug!(model = M::NAME, key = %key, "deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::Todo;

    #[tokio::test]
    async fn test_save_assigns_sequential_keys() {
        let store = MemoryStore::<Todo>::new();
        let first = store.save(Todo::new("milk")).await.unwrap();
        let second = store.save(Todo::new("eggs")).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(store.count(), 2);
    }

    #[tokio::test]
    async fn test_save_existing_key_updates() {
        let store = MemoryStore::<Todo>::new();
        let mut todo = store.save(Todo::new("milk")).await.unwrap();
        todo.description = "oat milk".into();
        store.save(todo).await.unwrap();

        assert_eq!(store.count(), 1);
        assert_eq!(store.get(&1).await.unwrap().description, "oat milk");
    }

    #[tokio::test]
    async fn test_generated_keys_skip_explicit_keys() {
        let store = MemoryStore::<Todo>::new();
        store
            .save(Todo {
                id: Some(5),
                description: "milk".into(),
            })
            .await
            .unwrap();
        let mut keys = Vec::new();
        for n in 0..5 {
            let todo = store.save(Todo::new(format!("new{n}"))).await.unwrap();
            keys.push(todo.id.unwrap());
        }

        assert_eq!(keys, vec![1, 2, 3, 4, 6]);
        assert_eq!(store.count(), 6);
        assert_eq!(store.get(&5).await.unwrap().description, "milk");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryStore::<Todo>::new();
        assert!(store.get(&42).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_removes_and_second_delete_fails() {
        let store = MemoryStore::<Todo>::new();
        let todo = store.save(Todo::new("milk")).await.unwrap();

        store.delete(todo.clone()).await.unwrap();
        assert!(!store.contains(&1));
        assert!(store.delete(todo).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_unsaved_is_store_error() {
        let store = MemoryStore::<Todo>::new();
        let err = store.delete(Todo::new("ghost")).await.unwrap_err();
        assert!(matches!(err, TurboError::Store(_)));
    }

    #[test]
    fn test_dom_id() {
        let mut todo = Todo::new("milk");
        assert_eq!(todo.dom_id(), None);
        todo.set_pk(5);
        assert_eq!(todo.dom_id().as_deref(), Some("todo-5"));
    }
}
