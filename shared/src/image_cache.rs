use std::collections::HashMap;
use std::fmt;

use crate::error::ApiError;

/// Cache key for a day's image, scoped to the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey {
    pub user: String,
    pub day: u32,
}

impl ImageKey {
    pub fn new(user: impl Into<String>, day: u32) -> Self {
        Self {
            user: user.into(),
            day,
        }
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "my-calendar_img_{}_{}", self.user, self.day)
    }
}

/// What a box should do about its image on this render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLookup<V> {
    /// The door is still closed, nothing to load
    Disabled,
    Cached(V),
    /// Another render already issued the fetch
    Pending,
    /// The caller owns this fetch and must `complete` or `fail` the key
    Fetch(ImageKey),
}

#[derive(Debug)]
enum Entry<V> {
    InFlight,
    Ready(V),
}

/// Fetch-once cache for day images.
///
/// Values are owned by the cache: replacing an entry or dropping the cache
/// drops the previous value, which lets resource handles clean up after themselves.
#[derive(Debug)]
pub struct ImageCache<V> {
    entries: HashMap<ImageKey, Entry<V>>,
}

impl<V> Default for ImageCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ImageCache<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns true when the caller should issue the fetch: the key is neither cached nor in flight.
    pub fn request(&mut self, key: &ImageKey) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.clone(), Entry::InFlight);
        true
    }

    /// Decide how to get the image of `day` for `user`. Without a user nothing is
    /// marked in flight and no request may be sent.
    pub fn lookup(
        &mut self,
        user: Option<&str>,
        day: u32,
        enabled: bool,
    ) -> Result<ImageLookup<V>, ApiError>
    where
        V: Clone,
    {
        if !enabled {
            return Ok(ImageLookup::Disabled);
        }
        let user = user.ok_or(ApiError::Unauthenticated)?;
        let key = ImageKey::new(user, day);
        if let Some(value) = self.get(&key) {
            return Ok(ImageLookup::Cached(value.clone()));
        }
        if self.request(&key) {
            Ok(ImageLookup::Fetch(key))
        } else {
            Ok(ImageLookup::Pending)
        }
    }

    pub fn complete(&mut self, key: ImageKey, value: V) {
        self.entries.insert(key, Entry::Ready(value));
    }

    /// Forget an in-flight fetch so a later render retries it
    pub fn fail(&mut self, key: &ImageKey) {
        if matches!(self.entries.get(key), Some(Entry::InFlight)) {
            self.entries.remove(key);
        }
    }

    pub fn get(&self, key: &ImageKey) -> Option<&V> {
        match self.entries.get(key) {
            Some(Entry::Ready(value)) => Some(value),
            _ => None,
        }
    }

    pub fn is_in_flight(&self, key: &ImageKey) -> bool {
        matches!(self.entries.get(key), Some(Entry::InFlight))
    }

    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry, Entry::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry, e.g. on sign-out
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Tracked(Rc<Cell<u32>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_key_format() {
        assert_eq!(ImageKey::new("Lea", 5).to_string(), "my-calendar_img_Lea_5");
    }

    #[test]
    fn test_fetch_issued_once() {
        let mut cache: ImageCache<&str> = ImageCache::new();
        let key = ImageKey::new("Lea", 5);

        assert!(cache.request(&key));
        assert!(cache.is_in_flight(&key));
        assert!(!cache.request(&key));

        cache.complete(key.clone(), "blob:1");
        assert!(!cache.request(&key));
        assert_eq!(cache.get(&key), Some(&"blob:1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_per_user_and_day() {
        let mut cache: ImageCache<()> = ImageCache::new();
        assert!(cache.request(&ImageKey::new("Lea", 5)));
        assert!(cache.request(&ImageKey::new("Lea", 6)));
        assert!(cache.request(&ImageKey::new("Tom", 5)));
    }

    #[test]
    fn test_failure_allows_retry() {
        let mut cache: ImageCache<()> = ImageCache::new();
        let key = ImageKey::new("Lea", 1);

        assert!(cache.request(&key));
        cache.fail(&key);
        assert!(cache.get(&key).is_none());
        assert!(cache.request(&key));
    }

    #[test]
    fn test_fail_keeps_ready_value() {
        let mut cache = ImageCache::new();
        let key = ImageKey::new("Lea", 1);
        cache.complete(key.clone(), 42);
        cache.fail(&key);
        assert_eq!(cache.get(&key), Some(&42));
    }

    #[test]
    fn test_lookup_without_user_sends_nothing() {
        let mut cache: ImageCache<&str> = ImageCache::new();

        assert_eq!(cache.lookup(None, 5, true), Err(ApiError::Unauthenticated));
        assert!(!cache.is_in_flight(&ImageKey::new("", 5)));
        assert_eq!(cache.entries.len(), 0);

        // Signing in later still triggers the first fetch
        assert_eq!(
            cache.lookup(Some("Lea"), 5, true),
            Ok(ImageLookup::Fetch(ImageKey::new("Lea", 5)))
        );
    }

    #[test]
    fn test_lookup_while_closed_is_disabled() {
        let mut cache: ImageCache<&str> = ImageCache::new();
        assert_eq!(cache.lookup(None, 5, false), Ok(ImageLookup::Disabled));
        assert_eq!(cache.lookup(Some("Lea"), 5, false), Ok(ImageLookup::Disabled));
        assert!(cache.entries.is_empty());
    }

    #[test]
    fn test_lookup_fetches_once() {
        let mut cache = ImageCache::new();
        let Ok(ImageLookup::Fetch(key)) = cache.lookup(Some("Lea"), 3, true) else {
            panic!("first lookup should fetch");
        };
        assert_eq!(cache.lookup(Some("Lea"), 3, true), Ok(ImageLookup::Pending));

        cache.complete(key, "blob:3");
        assert_eq!(cache.lookup(Some("Lea"), 3, true), Ok(ImageLookup::Cached("blob:3")));
    }

    #[test]
    fn test_replaced_and_cleared_values_are_dropped() {
        let drops = Rc::new(Cell::new(0));
        let mut cache = ImageCache::new();
        let key = ImageKey::new("Lea", 2);

        cache.complete(key.clone(), Tracked(drops.clone()));
        cache.complete(key.clone(), Tracked(drops.clone()));
        assert_eq!(drops.get(), 1);

        cache.clear();
        assert_eq!(drops.get(), 2);
        assert!(cache.is_empty());
    }
}
