//! Named codecs, built on first use.
//!
//! A [`Registry`] holds the settings of every configuration group and the
//! codecs constructed from them so far. It is meant to live in whatever
//! process-level context the application already shares (usually behind an
//! `Arc`). [`Registry::instance`] builds a group's codec at most once;
//! concurrent first calls for the same group all receive the same instance.
//! A group whose settings fail to resolve is not cached, so every call reports
//! the configuration error again.

use std::sync::{Arc, PoisonError, RwLock};

use hashbrown::HashMap;
use tracing::debug;

use crate::codec::Codec;
use crate::config::{DEFAULT_GROUP, Settings};
use crate::error::{Error, Result};

#[derive(Default)]
pub struct Registry {
    groups: HashMap<String, Settings>,
    instances: RwLock<HashMap<String, Arc<Codec>>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the settings of `name`, builder style.
    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, settings: Settings) -> Self {
        self.insert_group(name, settings);
        self
    }

    /// Adds (or replaces) the settings of `name`.
    ///
    /// A codec already built for `name` is dropped from the cache so the next
    /// [`Registry::instance`] call picks up the new settings.
    pub fn insert_group(&mut self, name: impl Into<String>, settings: Settings) {
        let name = name.into();
        self.instances.get_mut().unwrap_or_else(PoisonError::into_inner).remove(&name);
        self.groups.insert(name, settings);
    }

    /// Names of all configured groups.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Returns the codec of group `name` (`None` selects [`DEFAULT_GROUP`]),
    /// constructing it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownGroup`] for a group without settings, and any
    /// configuration error raised while resolving its settings.
    pub fn instance(&self, name: Option<&str>) -> Result<Arc<Codec>> {
        let name = name.unwrap_or(DEFAULT_GROUP);

        if let Some(codec) = self.instances.read().unwrap_or_else(PoisonError::into_inner).get(name) {
            return Ok(Arc::clone(codec));
        }

        let settings = self.groups.get(name).ok_or_else(|| Error::UnknownGroup(name.to_owned()))?;

        let mut instances = self.instances.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have won the race between the two locks.
        if let Some(codec) = instances.get(name) {
            return Ok(Arc::clone(codec));
        }

        let codec = Arc::new(Codec::from_settings(name, settings)?);
        instances.insert(name.to_owned(), Arc::clone(&codec));
        debug!(group = name, "codec constructed");

        Ok(codec)
    }

    /// Number of codecs built so far.
    #[must_use]
    pub fn constructed(&self) -> usize {
        self.instances.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CipherKind;

    fn settings(salt: &str) -> Settings {
        Settings::new().key("0123456789abcdef0123456789abcdef").sign_salt(salt)
    }

    #[test]
    fn test_default_group() {
        let registry = Registry::new().with_group(DEFAULT_GROUP, settings("pepper"));
        let codec = registry.instance(None).unwrap();
        assert_eq!(codec.decode(&codec.encode(b"hello").unwrap()).unwrap(), b"hello");
    }

    #[test]
    fn test_instance_is_reused() {
        let registry = Registry::new().with_group(DEFAULT_GROUP, settings("pepper"));
        let first = registry.instance(None).unwrap();
        let second = registry.instance(Some(DEFAULT_GROUP)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.constructed(), 1);
    }

    #[test]
    fn test_groups_are_independent() {
        let registry = Registry::new().with_group("users", settings("one")).with_group("billing", settings("two").cipher(CipherKind::Aes128));
        let users = registry.instance(Some("users")).unwrap();
        let billing = registry.instance(Some("billing")).unwrap();

        assert!(!Arc::ptr_eq(&users, &billing));
        assert_eq!(billing.config().cipher(), CipherKind::Aes128);
        assert!(billing.decode(&users.encode(b"hello").unwrap()).is_err());

        let mut names: Vec<_> = registry.groups().collect();
        names.sort_unstable();
        assert_eq!(names, ["billing", "users"]);
    }

    #[test]
    fn test_unknown_group() {
        let registry = Registry::new();
        assert!(matches!(registry.instance(Some("missing")), Err(Error::UnknownGroup(name)) if name == "missing"));
        assert!(matches!(registry.instance(None), Err(Error::UnknownGroup(_))));
    }

    #[test]
    fn test_invalid_settings_not_cached() {
        let registry = Registry::new().with_group(DEFAULT_GROUP, Settings::new().key("k"));
        for _ in 0..2 {
            assert!(matches!(registry.instance(None), Err(Error::MissingSignSalt { .. })));
        }
        assert_eq!(registry.constructed(), 0);
    }

    #[test]
    fn test_replacing_group_drops_cached_codec() {
        let mut registry = Registry::new().with_group(DEFAULT_GROUP, settings("pepper"));
        let before = registry.instance(None).unwrap();

        registry.insert_group(DEFAULT_GROUP, settings("salt"));
        let after = registry.instance(None).unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        assert!(after.decode(&before.encode(b"hello").unwrap()).is_err());
    }

    #[test]
    fn test_concurrent_first_use_builds_once() {
        let registry = Registry::new().with_group(DEFAULT_GROUP, settings("pepper"));

        let codecs: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| registry.instance(None).unwrap())).collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        assert!(codecs.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
        assert_eq!(registry.constructed(), 1);
    }
}
