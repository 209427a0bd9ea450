//! Collision-free random identifiers.
//!
//! Ids are drawn from `[0-9a-z]`, one random byte per character reduced
//! modulo 36. A draw that collides with an id already issued in the same
//! namespace is thrown away and retried whole.
//!
//! By default every issuer shares one process-wide namespace so that ids
//! never repeat within a run. Concurrent compilations that need their own
//! namespace use [`IdIssuer::isolated`] or [`IdIssuer::seeded`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Length of ids given to ordinary document entities.
pub const ENTITY_ID_LEN: usize = 4;

/// Length of process-level bootstrap tokens.
pub const TOKEN_ID_LEN: usize = 32;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

static PROCESS_ISSUED: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

enum Namespace {
    Process,
    Isolated(HashSet<String>),
}

impl Namespace {
    /// Inserts `id`, returning false if it was already taken.
    fn claim(&mut self, id: &str) -> bool {
        match self {
            Namespace::Process => {
                // A poisoned lock still holds a valid set; keep issuing from it.
                let mut issued = PROCESS_ISSUED.lock().unwrap_or_else(|e| e.into_inner());
                issued.insert(id.to_string())
            }
            Namespace::Isolated(issued) => issued.insert(id.to_string()),
        }
    }
}

/// Issues unique ids from a random source into a namespace.
pub struct IdIssuer {
    rng: Box<dyn RngCore + Send>,
    namespace: Namespace,
}

impl IdIssuer {
    /// OS entropy, process-wide namespace.
    pub fn new() -> Self {
        Self {
            rng: Box::new(OsRng),
            namespace: Namespace::Process,
        }
    }

    /// OS entropy, private namespace.
    pub fn isolated() -> Self {
        Self {
            rng: Box::new(OsRng),
            namespace: Namespace::Isolated(HashSet::new()),
        }
    }

    /// Deterministic ids in a private namespace, for reproducible output.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Box::new(Xoshiro256StarStar::seed_from_u64(seed)),
            namespace: Namespace::Isolated(HashSet::new()),
        }
    }

    /// Draws a fresh id of `length` characters.
    pub fn next_id(&mut self, length: usize) -> String {
        let mut bytes = vec![0u8; length];
        loop {
            self.rng.fill_bytes(&mut bytes);
            let id: String = bytes
                .iter()
                .map(|b| ALPHABET[(*b as usize) % ALPHABET.len()] as char)
                .collect();
            if self.namespace.claim(&id) {
                return id;
            }
        }
    }

    /// Draws an id of the default entity length.
    pub fn next_entity_id(&mut self) -> String {
        self.next_id(ENTITY_ID_LEN)
    }

    /// Marks a caller-supplied id as taken so generated ids avoid it.
    /// Returns false if it was already issued.
    pub fn reserve(&mut self, id: &str) -> bool {
        self.namespace.claim(id)
    }
}

impl Default for IdIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let namespace = match &self.namespace {
            Namespace::Process => "process",
            Namespace::Isolated(_) => "isolated",
        };
        f.debug_struct("IdIssuer")
            .field("namespace", &namespace)
            .finish()
    }
}

/// Draws an id from the process-wide namespace.
pub fn generate(length: usize) -> String {
    IdIssuer::new().next_id(length)
}
