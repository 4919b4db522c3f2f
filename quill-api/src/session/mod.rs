use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub trait TokenSession: Send + Sync {
    /// Mints a token for a logged-in user. `remember` exempts the token
    /// from expiry.
    fn add_user(&mut self, user: &str, remember: bool) -> Uuid;
    fn get_user(&self, id: &Uuid) -> Option<String>;
    fn remove_user(&mut self, id: &Uuid);
}

struct SessionEntry {
    login: String,
    expires: Option<Instant>,
}

pub struct DefaultTokenSession {
    active_users: HashMap<Uuid, SessionEntry>,
    ttl_seconds: Option<u64>,
}

impl DefaultTokenSession {
    pub fn new(ttl_seconds: Option<u64>) -> Self {
        Self {
            active_users: HashMap::new(),
            ttl_seconds,
        }
    }
}

impl TokenSession for DefaultTokenSession {
    fn add_user(&mut self, user: &str, remember: bool) -> Uuid {
        let mut uuid = Uuid::new_v4();
        while self.active_users.contains_key(&uuid) {
            uuid = Uuid::new_v4();
        }

        let expires = match (remember, self.ttl_seconds) {
            (false, Some(secs)) => Some(Instant::now() + Duration::from_secs(secs)),
            _ => None,
        };
        self.active_users.insert(
            uuid,
            SessionEntry {
                login: user.to_owned(),
                expires,
            },
        );
        uuid
    }

    fn get_user(&self, id: &Uuid) -> Option<String> {
        let entry = self.active_users.get(id)?;
        if let Some(deadline) = entry.expires {
            if Instant::now() > deadline {
                return None;
            }
        }
        Some(entry.login.clone())
    }

    fn remove_user(&mut self, id: &Uuid) {
        self.active_users.remove(id);
    }
}
