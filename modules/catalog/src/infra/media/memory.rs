use anyhow::{anyhow, bail};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::contract::model::ImageRef;
use crate::domain::ports::MediaStore;

/// In-memory media store for tests: remembers uploads, can be told to fail.
#[derive(Default)]
pub struct MemoryMediaStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    fail_uploads: AtomicBool,
    fail_releases: AtomicBool,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_releases(&self, fail: bool) {
        self.fail_releases.store(fail, Ordering::SeqCst);
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn contains(&self, storage_id: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(storage_id)
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> anyhow::Result<ImageRef> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            bail!("simulated upload failure for {filename}");
        }
        let storage_id = Uuid::new_v4().simple().to_string();
        self.blobs
            .lock()
            .unwrap()
            .insert(storage_id.clone(), bytes);
        Ok(ImageRef {
            url: format!("memory://{storage_id}"),
            storage_id,
        })
    }

    async fn release(&self, storage_id: &str) -> anyhow::Result<()> {
        if self.fail_releases.load(Ordering::SeqCst) {
            bail!("simulated release failure for {storage_id}");
        }
        self.blobs
            .lock()
            .unwrap()
            .remove(storage_id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("unknown storage id {storage_id}"))
    }
}
