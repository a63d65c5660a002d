use crate::errors::{StorageError, Superseded};
use crate::request::RequestGate;
use crate::storage::PersistedStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::future::Future;
use tracing::{debug, info, warn};

/// Persisted wrapper pairing a generated payload with its expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_category: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
    pub payload: T,
}

impl<T> CacheEntry<T> {
    pub fn is_valid(&self, partition: Option<&str>, now: DateTime<Utc>) -> bool {
        if let Some(partition) = partition {
            if self.theme_category.as_deref() != Some(partition) {
                return false;
            }
        }
        now < self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Last millisecond of the current UTC day.
    EndOfDay,
    After(Duration),
}

impl Expiry {
    pub fn expires_at(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Expiry::EndOfDay => {
                let midnight = now
                    .date_naive()
                    .succ_opt()
                    .and_then(|day| day.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc());
                match midnight {
                    Some(midnight) => midnight - Duration::milliseconds(1),
                    None => DateTime::<Utc>::MAX_UTC,
                }
            }
            Expiry::After(ttl) => now + ttl,
        }
    }
}

pub const EXAMPLES_TTL_HOURS: i64 = 12;

/// Where a generated payload is cached and for how long.
#[derive(Debug, Clone, Copy)]
pub struct CacheSlot<'a> {
    pub key: &'a str,
    pub partition: Option<&'a str>,
    pub expiry: Expiry,
}

/// Returns the cached payload under `slot.key` while it is unexpired and
/// belongs to `slot.partition`; otherwise runs `produce` once and caches its
/// output.
///
/// Each miss takes a token from `gate`. A payload whose token was superseded
/// by a newer miss is discarded unwritten and reported as [`Superseded`], so
/// the newest request's payload is the one left in the store. A failed
/// `produce` leaves whatever envelope was stored untouched.
pub async fn get_or_fetch_at<T, E, F, Fut>(
    store: &PersistedStore,
    slot: CacheSlot<'_>,
    gate: &RequestGate,
    now: DateTime<Utc>,
    produce: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    E: From<StorageError> + From<Superseded>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let CacheSlot { key, partition, expiry } = slot;
    if let Some(entry) = store.get_opt::<CacheEntry<T>>(key).await {
        if entry.is_valid(partition, now) {
            debug!(key, "cache hit");
            return Ok(entry.payload);
        }
    }

    let token = gate.begin().await;
    info!(key, partition, "cache miss, generating");
    let payload = produce().await?;

    let Some(_commit) = gate.claim(token).await else {
        warn!(key, "discarding payload superseded by a newer request");
        return Err(Superseded.into());
    };
    let entry = CacheEntry {
        theme_category: partition.map(str::to_string),
        expires_at: expiry.expires_at(now),
        payload,
    };
    store.set(key, &entry).await?;
    Ok(entry.payload)
}
