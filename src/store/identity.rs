use sha2::{Digest, Sha256};
use std::fmt;

/// Fingerprint selecting the cache file for one (user, host, username, schema)
/// combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheIdentity(String);

impl CacheIdentity {
    pub fn derive(user: &str, host: &str, username: &str, schema: &str) -> Self {
        let mut hasher = Sha256::new();
        // NUL terminated fields: hosts (IPv6) and usernames may contain ':'
        for field in [user, host, username, schema] {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
        CacheIdentity(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
