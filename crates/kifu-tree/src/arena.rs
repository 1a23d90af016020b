use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Number of addressable entries per arena. Indices stay below `u16::MAX`,
/// which is never handed out.
pub const MAX_ENTRIES: usize = u16::MAX as usize;

pub struct Key<T>(u16, PhantomData<T>);

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl<T> fmt::Display for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T> std::hash::Hash for Key<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Key<T> {}

impl<T> PartialOrd for Key<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Key<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> Key<T> {
    pub const fn new(index: u16) -> Self {
        Self(index, PhantomData)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, or gives it back when the arena is full.
    pub fn alloc(&mut self, value: T) -> Result<Key<T>, T> {
        let Some(key) = self.next_key() else {
            return Err(value);
        };
        self.items.push(value);
        Ok(key)
    }

    /// The key the next allocation will receive.
    pub fn next_key(&self) -> Option<Key<T>> {
        (self.items.len() < MAX_ENTRIES).then(|| Key::new(self.items.len() as u16))
    }

    pub fn remaining(&self) -> usize {
        MAX_ENTRIES - self.items.len()
    }

    pub fn get(&self, key: Key<T>) -> Option<&T> {
        self.items.get(key.index())
    }

    pub fn keys(&self) -> impl Iterator<Item = Key<T>> + use<T> {
        (0..self.items.len() as u16).map(Key::new)
    }

    pub fn iter_enumerated(&self) -> impl Iterator<Item = (Key<T>, &T)> {
        self.items.iter().enumerate().map(|(i, item)| (Key::new(i as u16), item))
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Index<Key<T>> for Arena<T> {
    type Output = T;
    fn index(&self, index: Key<T>) -> &Self::Output {
        &self.items[index.index()]
    }
}

impl<T> IndexMut<Key<T>> for Arena<T> {
    fn index_mut(&mut self, index: Key<T>) -> &mut Self::Output {
        &mut self.items[index.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_past_the_bound() {
        let mut arena = Arena::new();
        for i in 0..MAX_ENTRIES {
            let key = arena.alloc(i as u32).unwrap();
            assert_eq!(key.index(), i);
        }
        assert_eq!(arena.remaining(), 0);
        assert_eq!(arena.alloc(7), Err(7));
        assert_eq!(arena.len(), MAX_ENTRIES);
        assert_eq!(arena[Key::new(0xFFFE)], 0xFFFE);
        assert_eq!(arena.get(Key::new(0xFFFF)), None);
    }
}
