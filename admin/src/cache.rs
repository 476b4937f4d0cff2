use crate::{
    client::AdminClient,
    error::AdminError,
};
use cached::{
    Cached,
    TimedSizedCache,
};
use std::{
    fmt,
    sync::{
        Arc,
        Mutex,
        MutexGuard,
        PoisonError,
    },
    time::Duration,
};

/// Identity a cached client acts for.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ClientKey {
    /// No visitor session, the configured service credentials are used.
    Service,
    Session(String),
}

impl ClientKey {
    /// Key for an optional session token header. An empty token counts as no token.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(token) if !token.is_empty() => ClientKey::Session(token.to_string()),
            _ => ClientKey::Service,
        }
    }
}

impl fmt::Debug for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientKey::Service => f.write_str("Service"),
            ClientKey::Session(token) => write!(f, "Session(<{} chars>)", token.len()),
        }
    }
}

/// Bounded cache of administrative clients per visitor.
///
/// Entries expire `ttl` after insertion. When `capacity` is reached the least recently used entry is evicted.
/// The lock is never held while a client is being created.
#[derive(Clone)]
pub struct ClientCache {
    entries: Arc<Mutex<TimedSizedCache<ClientKey, AdminClient>>>,
}

impl ClientCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(TimedSizedCache::with_size_and_lifespan(capacity.max(1), ttl))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TimedSizedCache<ClientKey, AdminClient>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.lock().cache_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &ClientKey) -> Option<AdminClient> {
        let client = self.lock().cache_get(key).cloned();
        match client {
            Some(_) => debug!(?key, "client cache hit"),
            None => debug!(?key, "client cache miss"),
        }
        client
    }

    pub fn insert(&self, key: ClientKey, client: AdminClient) {
        self.lock().cache_set(key, client);
    }

    /// The client for an optional visitor session token.
    ///
    /// Without a token the service client is used. A token is exchanged for a visitor client once and reused
    /// until its entry expires. Failed exchanges are not cached.
    pub async fn client_for(&self, service: &AdminClient, session_token: Option<&str>) -> Result<AdminClient, AdminError> {
        let key = ClientKey::from_token(session_token);
        if let Some(client) = self.get(&key) {
            return Ok(client);
        }

        let client = match &key {
            ClientKey::Service => service.clone(),
            ClientKey::Session(token) => service.with_user_session_token(token).await?,
        };
        self.insert(key, client.clone());
        Ok(client)
    }
}
