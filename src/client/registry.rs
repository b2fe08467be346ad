//! Client registry
//!
//! Tracks the sessions that are currently connected.

use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Registry shared between the acceptor and every session handler
pub type SharedRegistry = Arc<Mutex<ClientRegistry>>;

/// Identifies one registered session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the registry remembers about a connected client
#[derive(Debug, Clone)]
pub struct ClientInfo {
    name: String,
    peer_addr: Option<SocketAddr>,
    connected_at: Instant,
}

impl ClientInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn peer_addr(&self) -> Option<&SocketAddr> {
        self.peer_addr.as_ref()
    }

    pub fn connected_at(&self) -> Instant {
        self.connected_at
    }
}

/// Registry for tracking active clients
///
/// Ids are handed out under the same lock that inserts the entry, so
/// concurrent registrations never share an id.
pub struct ClientRegistry {
    clients: HashMap<SessionId, ClientInfo>,
    next_id: u64,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            next_id: 1,
        }
    }

    /// Creates an empty registry ready to be shared across tasks
    pub fn shared() -> SharedRegistry {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Adds a client and returns the id of its new session.
    pub fn register(&mut self, name: impl Into<String>, peer_addr: Option<SocketAddr>) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;

        self.clients.insert(
            id,
            ClientInfo {
                name: name.into(),
                peer_addr,
                connected_at: Instant::now(),
            },
        );
        id
    }

    /// Removes a session. Removing an absent id is a no-op and returns `None`.
    pub fn remove(&mut self, id: SessionId) -> Option<ClientInfo> {
        self.clients.remove(&id)
    }

    pub fn get(&self, id: SessionId) -> Option<&ClientInfo> {
        self.clients.get(&id)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.clients.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Sorted snapshot of connected names, duplicates included
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.clients.values().map(|c| c.name.clone()).collect();
        names.sort();
        names
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_distinct_ids() {
        let mut registry = ClientRegistry::new();
        let alice = registry.register("Alice", None);
        let bob = registry.register("Bob", None);

        assert_ne!(alice, bob);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(alice).map(ClientInfo::name), Some("Alice"));
    }

    #[test]
    fn test_register_records_peer_address_and_time() {
        let mut registry = ClientRegistry::new();
        let addr: SocketAddr = "127.0.0.1:50000".parse().unwrap();
        let before = Instant::now();
        let id = registry.register("Alice", Some(addr));

        let info = registry.get(id).unwrap();
        assert_eq!(info.peer_addr(), Some(&addr));
        assert!(info.connected_at() >= before);

        let removed = registry.remove(id).unwrap();
        assert_eq!(removed.name(), "Alice");
        assert_eq!(removed.peer_addr(), Some(&addr));
    }

    #[test]
    fn test_same_name_registers_twice() {
        let mut registry = ClientRegistry::new();
        registry.register("Alice", None);
        registry.register("Alice", None);

        assert_eq!(registry.names(), vec!["Alice", "Alice"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = ClientRegistry::new();
        let alice = registry.register("Alice", None);
        let bob = registry.register("Bob", None);

        assert!(registry.remove(alice).is_some());
        assert!(registry.remove(alice).is_none());
        assert!(!registry.contains(alice));
        assert!(registry.contains(bob));
        assert_eq!(registry.names(), vec!["Bob"]);
    }

    #[test]
    fn test_ids_are_not_reused_after_removal() {
        let mut registry = ClientRegistry::new();
        let first = registry.register("A", None);
        registry.remove(first);
        let second = registry.register("B", None);

        assert_ne!(first, second);
        assert!(registry.remove(first).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_registration_loses_nothing() {
        let registry = ClientRegistry::shared();
        let mut handles = Vec::new();

        for i in 0..50 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.lock().await.register(format!("client-{i}"), None)
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 50);
        assert_eq!(registry.lock().await.len(), 50);
    }
}
