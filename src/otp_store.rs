use moka::sync::Cache;
use std::time::Duration;

use crate::{
    constants::*,
    utils::{generate_otp, get_epoch_ms, normalize_email},
};

/// A one-time code waiting to be verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRecord {
    pub code: String,
    /// EPOCH milliseconds after which the code is rejected
    pub expires_at: u64,
}

impl OtpRecord {
    pub fn new(code: &str, expires_at: u64) -> Self {
        Self {
            code: code.to_owned(),
            expires_at,
        }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }
}

/// In-process store of email one-time codes, keyed by lowercased email.
///
/// At most one code is live per email: issuing a new code replaces the
/// previous one. Entries are evicted by the cache once their validity has
/// elapsed, and the expiry is checked again on every read.
pub struct OtpStore {
    cache: Cache<String, OtpRecord>,
    validity: Duration,
}

impl OtpStore {
    pub fn new(validity: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(validity)
            .build();
        Self { cache, validity }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Generate a fresh code for the email and store it, replacing any prior code
    pub fn issue(&self, email: &str) -> OtpRecord {
        let code = generate_otp(OTP_LENGTH);
        let expires_at = get_epoch_ms() + self.validity.as_millis() as u64;
        let record = OtpRecord::new(&code, expires_at);
        self.insert(email, record.clone());
        record
    }

    pub fn insert(&self, email: &str, record: OtpRecord) {
        self.cache.insert(normalize_email(email), record);
    }

    pub fn get(&self, email: &str) -> Option<OtpRecord> {
        self.cache.get(&normalize_email(email))
    }

    /// Check a code against the current time, consuming it on success
    pub fn verify(&self, email: &str, code: &str) -> bool {
        self.verify_at(email, code, get_epoch_ms())
    }

    /// Check a code against `now_ms`. A matching, unexpired code is removed
    /// so it cannot be used twice; any other outcome leaves the store as is.
    pub fn verify_at(&self, email: &str, code: &str, now_ms: u64) -> bool {
        let key = normalize_email(email);
        let Some(record) = self.cache.get(&key) else {
            return false;
        };
        if record.code != code.trim() || record.is_expired(now_ms) {
            return false;
        }
        // only the caller that actually removes the record wins
        match self.cache.remove(&key) {
            Some(removed) => removed == record,
            None => false,
        }
    }

    /// Run the cache's pending maintenance, dropping expired entries
    pub fn purge_expired(&self) {
        self.cache.run_pending_tasks();
    }

    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for OtpStore {
    fn default() -> Self {
        let validity = Duration::from_secs(OTP_VALIDITY_MINS * 60);
        Self::new(validity, OTP_STORE_CAPACITY)
    }
}
