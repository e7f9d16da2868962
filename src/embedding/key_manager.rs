use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct ApiKey {
    key: String,
    disabled_until: Option<DateTime<Utc>>,
}

/// Round-robin pool of embedding API keys. Rate-limited keys sit out until
/// the next UTC midnight.
#[derive(Debug, Clone)]
pub struct KeyPool {
    keys: Arc<Mutex<Vec<ApiKey>>>,
    last_used_key_index: Arc<Mutex<usize>>,
}

impl KeyPool {
    pub fn new(api_keys: Vec<String>) -> Self {
        let keys = api_keys
            .into_iter()
            .filter(|key| !key.trim().is_empty())
            .map(|key| ApiKey {
                key,
                disabled_until: None,
            })
            .collect();
        Self {
            keys: Arc::new(Mutex::new(keys)),
            // Starts at the last slot so the first call hands out key 0.
            last_used_key_index: Arc::new(Mutex::new(usize::MAX)),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.lock().map(|keys| keys.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_key(&self) -> Result<String> {
        self.get_key_at(Utc::now())
    }

    fn get_key_at(&self, now: DateTime<Utc>) -> Result<String> {
        let mut keys_guard = self
            .keys
            .lock()
            .map_err(|_| anyhow!("API key pool lock poisoned"))?;

        for api_key in keys_guard.iter_mut() {
            if let Some(disabled_until) = api_key.disabled_until {
                if now >= disabled_until {
                    api_key.disabled_until = None;
                    log::info!("Re-enabling API key ending in ...{}", key_suffix(&api_key.key));
                }
            }
        }

        if keys_guard.is_empty() {
            return Err(anyhow!("No API keys configured."));
        }

        let mut last_idx = self
            .last_used_key_index
            .lock()
            .map_err(|_| anyhow!("API key index lock poisoned"))?;
        let start_idx = last_idx.wrapping_add(1) % keys_guard.len();

        for i in 0..keys_guard.len() {
            let idx = (start_idx + i) % keys_guard.len();
            if keys_guard[idx].disabled_until.is_none() {
                *last_idx = idx;
                return Ok(keys_guard[idx].key.clone());
            }
        }

        Err(anyhow!(
            "All API keys are currently rate-limited or disabled."
        ))
    }

    pub fn disable_key(&self, key_to_disable: &str) {
        self.disable_key_at(key_to_disable, Utc::now());
    }

    fn disable_key_at(&self, key_to_disable: &str, now: DateTime<Utc>) {
        let Ok(mut keys) = self.keys.lock() else {
            log::error!("API key pool lock poisoned; cannot disable key");
            return;
        };
        let Some(tomorrow) = (now.date_naive() + chrono::Duration::days(1)).and_hms_opt(0, 0, 0)
        else {
            return;
        };
        let tomorrow_utc = DateTime::<Utc>::from_naive_utc_and_offset(tomorrow, Utc);
        if let Some(api_key) = keys.iter_mut().find(|k| k.key == key_to_disable) {
            api_key.disabled_until = Some(tomorrow_utc);
            log::warn!(
                "Disabling API key ending in ...{} until {}",
                key_suffix(&api_key.key),
                tomorrow_utc
            );
        }
    }
}

/// Last four characters, for logs.
pub fn key_suffix(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    chars[chars.len().saturating_sub(4)..].iter().collect()
}
