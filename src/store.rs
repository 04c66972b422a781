// File: ./src/store.rs
use crate::client::RemoteClient;
use crate::config::{Backend, Config};
use crate::error::{LostFoundError, Result};
use crate::model::{Item, ItemStatus, Transition};
use crate::storage::LocalStorage;
use crate::upload::{ImageUploader, InlineUploader, RemoteUploader};
use async_trait::async_trait;
use std::sync::Arc;

/// Where items live. Every call may hit the disk or the network.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items, most recent first.
    async fn list(&self) -> Result<Vec<Item>>;

    async fn get(&self, id: &str) -> Result<Option<Item>>;

    /// Persists a new item and returns the stored record.
    async fn add(&self, item: Item) -> Result<Item>;

    /// `Ok(None)` when no item has this id.
    async fn update_status(&self, id: &str, status: ItemStatus) -> Result<Option<Item>>;
}

pub struct LocalItemStore {
    storage: LocalStorage,
}

impl LocalItemStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    // The file lock is blocking, so each operation runs off the async workers.
    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(LocalStorage) -> Result<T> + Send + 'static,
    {
        let storage = self.storage.clone();
        tokio::task::spawn_blocking(move || f(storage))
            .await
            .map_err(|e| LostFoundError::Persistence(e.to_string()))?
    }
}

#[async_trait]
impl ItemStore for LocalItemStore {
    async fn list(&self) -> Result<Vec<Item>> {
        self.blocking(|storage| storage.load()).await
    }

    async fn get(&self, id: &str) -> Result<Option<Item>> {
        let id = id.to_string();
        self.blocking(move |storage| Ok(storage.load()?.into_iter().find(|i| i.id == id)))
            .await
    }

    async fn add(&self, item: Item) -> Result<Item> {
        self.blocking(move |storage| {
            storage.modify(|items| {
                if items.iter().any(|i| i.id == item.id) {
                    return Err(LostFoundError::Persistence(format!(
                        "an item with id {} already exists",
                        item.id
                    )));
                }
                items.insert(0, item.clone());
                Ok(item)
            })
        })
        .await
    }

    async fn update_status(&self, id: &str, status: ItemStatus) -> Result<Option<Item>> {
        let id = id.to_string();
        self.blocking(move |storage| {
            storage.modify_if(|items| {
                let Some(item) = items.iter_mut().find(|i| i.id == id) else {
                    return Ok((None, false));
                };
                match item.transition(status) {
                    Transition::Rejected => Err(LostFoundError::InvalidTransition(id.clone())),
                    Transition::Changed => Ok((Some(item.clone()), true)),
                    Transition::Unchanged => Ok((Some(item.clone()), false)),
                }
            })
        })
        .await
    }
}

/// The store and upload strategy chosen for this deployment.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn ItemStore>,
    pub uploader: Arc<dyn ImageUploader>,
    pub backend: Backend,
}

impl Services {
    pub fn open(config: &Config) -> Result<Self> {
        match config.backend {
            Backend::Local => {
                let dir = config
                    .data_dir()
                    .map_err(|e| LostFoundError::Config(e.to_string()))?;
                log::info!("Using local storage in {}", dir.display());
                Ok(Self {
                    store: Arc::new(LocalItemStore::new(LocalStorage::new(dir))),
                    uploader: Arc::new(InlineUploader),
                    backend: Backend::Local,
                })
            }
            Backend::Remote => {
                let client = RemoteClient::new(&config.url, &config.username, &config.password)?;
                log::info!("Using remote backend at {}", config.url);
                Ok(Self {
                    store: Arc::new(RemoteItemStore::new(client.clone())),
                    uploader: Arc::new(RemoteUploader::new(client)),
                    backend: Backend::Remote,
                })
            }
        }
    }
}

pub struct RemoteItemStore {
    client: RemoteClient,
}

impl RemoteItemStore {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ItemStore for RemoteItemStore {
    async fn list(&self) -> Result<Vec<Item>> {
        self.client.list_items().await
    }

    async fn get(&self, id: &str) -> Result<Option<Item>> {
        self.client.get_item(id).await
    }

    async fn add(&self, item: Item) -> Result<Item> {
        self.client.create_item(&item).await
    }

    async fn update_status(&self, id: &str, status: ItemStatus) -> Result<Option<Item>> {
        self.client.update_status(id, status).await
    }
}
