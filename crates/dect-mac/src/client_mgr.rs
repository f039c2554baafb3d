use std::collections::HashMap;

use dect_core::{ClientId, ClientInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMgrErr {
    ClientLimitReached { max_clients: usize },
    AlreadyRegistered { client_id: ClientId },
}

/// Registry of admitted clients, keyed by client id
pub struct MacClientMgr {
    clients: HashMap<ClientId, ClientInfo>,
    max_clients: usize,
}

impl MacClientMgr {
    pub fn new(max_clients: usize) -> Self {
        MacClientMgr {
            clients: HashMap::new(),
            max_clients,
        }
    }

    pub fn get(&self, client_id: ClientId) -> Option<&ClientInfo> {
        self.clients.get(&client_id)
    }

    pub fn is_known(&self, client_id: ClientId) -> bool {
        self.clients.contains_key(&client_id)
    }

    /// Registers a new, unassigned client. An existing entry is never replaced,
    /// since it may still own slots.
    pub fn register(&mut self, client_id: ClientId, num_slots_needed: u16) -> Result<&mut ClientInfo, ClientMgrErr> {
        if self.clients.contains_key(&client_id) {
            return Err(ClientMgrErr::AlreadyRegistered { client_id });
        }
        if self.clients.len() >= self.max_clients {
            return Err(ClientMgrErr::ClientLimitReached { max_clients: self.max_clients });
        }
        Ok(self
            .clients
            .entry(client_id)
            .or_insert_with(|| ClientInfo::new(client_id, num_slots_needed)))
    }

    /// Removes a client from the registry, returning its info if found
    pub fn remove(&mut self, client_id: ClientId) -> Option<ClientInfo> {
        self.clients.remove(&client_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClientInfo> {
        self.clients.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_remove() {
        let mut mgr = MacClientMgr::new(2);
        assert!(mgr.register(10, 3).is_ok());
        assert!(mgr.is_known(10));
        assert_eq!(mgr.get(10).map(|c| c.num_slots_needed()), Some(3));
        assert_eq!(mgr.register(10, 5).err(), Some(ClientMgrErr::AlreadyRegistered { client_id: 10 }));

        assert!(mgr.register(11, 1).is_ok());
        assert_eq!(mgr.register(12, 1).err(), Some(ClientMgrErr::ClientLimitReached { max_clients: 2 }));

        let removed = mgr.remove(10).unwrap();
        assert_eq!(removed.client_id(), 10);
        assert!(mgr.remove(10).is_none());
        assert_eq!(mgr.len(), 1);
        assert!(mgr.register(12, 1).is_ok());
    }
}
