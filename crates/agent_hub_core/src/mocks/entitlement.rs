//! Mock entitlement store for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::{AccessCode, Entitlement};
use crate::ports::{EntitlementInsert, EntitlementStore, EntitlementStoreError};

/// In-memory entitlement store with programmable failures.
#[derive(Default)]
pub struct MockEntitlementStore {
    entitled: Mutex<HashSet<String>>,
    codes: Mutex<HashMap<String, bool>>,
    fail_find: AtomicBool,
    fail_code_lookup: AtomicBool,
    fail_insert: AtomicBool,
    pub find_calls: AtomicUsize,
    pub code_lookups: AtomicUsize,
    pub insert_calls: AtomicUsize,
}

impl MockEntitlementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, email: &str) {
        self.entitled.lock().unwrap().insert(email.to_string());
    }

    pub fn add_code(&self, code: &str, is_active: bool) {
        self.codes.lock().unwrap().insert(code.to_string(), is_active);
    }

    pub fn is_entitled(&self, email: &str) -> bool {
        self.entitled.lock().unwrap().contains(email)
    }

    /// Makes `find_entitlement` fail, e.g. to simulate a row-level
    /// permission denial.
    pub fn fail_find(&self, fail: bool) {
        self.fail_find.store(fail, Ordering::SeqCst);
    }

    pub fn fail_code_lookup(&self, fail: bool) {
        self.fail_code_lookup.store(fail, Ordering::SeqCst);
    }

    pub fn fail_insert(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl EntitlementStore for MockEntitlementStore {
    async fn find_entitlement(
        &self,
        email: &str,
    ) -> Result<Option<Entitlement>, EntitlementStoreError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_find.load(Ordering::SeqCst) {
            return Err(EntitlementStoreError::Query("permission denied".into()));
        }
        Ok(self.is_entitled(email).then(|| Entitlement {
            email: email.to_string(),
        }))
    }

    async fn insert_entitlement(
        &self,
        email: &str,
    ) -> Result<EntitlementInsert, EntitlementStoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(EntitlementStoreError::Write("permission denied".into()));
        }
        let inserted = self.entitled.lock().unwrap().insert(email.to_string());
        Ok(if inserted {
            EntitlementInsert::Created
        } else {
            EntitlementInsert::AlreadyEntitled
        })
    }

    async fn find_active_access_code(
        &self,
        code: &str,
    ) -> Result<Option<AccessCode>, EntitlementStoreError> {
        self.code_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_code_lookup.load(Ordering::SeqCst) {
            return Err(EntitlementStoreError::Query("lookup failed".into()));
        }
        let active = self.codes.lock().unwrap().get(code).copied();
        Ok(match active {
            Some(true) => Some(AccessCode {
                code: code.to_string(),
                is_active: true,
            }),
            // Inactive codes read the same as absent ones.
            _ => None,
        })
    }
}
