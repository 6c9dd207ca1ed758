//! In-memory short-key store.
//!
//! A [`KeyStore`] trades arbitrary strings (typically URLs) for short random
//! keys and resolves them back. It holds at most a fixed number of values,
//! and shortening a value it already holds returns the existing key.
//!
//! ```rust
//! use corral_keystore::{KeyStore, KeyStoreSettings};
//!
//! # fn example() -> Result<(), corral_core::RegistryError> {
//! let store = KeyStore::new(
//!     KeyStoreSettings::builder()
//!         .base_url("https://www.rev.me")
//!         .build(),
//! );
//!
//! let key = store.shorten("https://example.com/some/long/path")?;
//! assert_eq!(key.as_str().len(), 6);
//! assert_eq!(store.resolve(key.as_str())?, "https://example.com/some/long/path");
//!
//! let url = store.shorten_url("https://example.com/some/long/path")?;
//! assert_eq!(url, format!("https://www.rev.me/{key}"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod keystore;

pub use keystore::{KeyStore, KeyStoreSettings, DEFAULT_MAX_KEYS};
