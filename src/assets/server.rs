use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use tokio::runtime::Runtime;

use crate::assets::model::ModelAsset;
use crate::errors::{Result, SceneError};

fn get_asset_runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create asset loader runtime"))
}

new_key_type! {
    pub struct ModelHandle;
}

/// Progress of one model load.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Still parsing on the loader runtime. Elements waiting on it stay absent.
    Pending,
    Ready(Arc<ModelAsset>),
    /// The load failed. Only the elements using this model degrade.
    Failed(Arc<SceneError>),
}

impl LoadState {
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, LoadState::Pending)
    }
}

struct ModelEntry {
    path: PathBuf,
    state: LoadState,
}

type LoadResult = (ModelHandle, Result<ModelAsset>);

/// Loads models in the background and hands results back on the frame thread.
///
/// Nothing a background task produces touches the scene directly: results
/// queue on a channel and are applied in [`poll`](Self::poll).
pub struct AssetServer {
    root: PathBuf,
    models: SlotMap<ModelHandle, ModelEntry>,
    by_path: FxHashMap<PathBuf, ModelHandle>,
    sender: flume::Sender<LoadResult>,
    receiver: flume::Receiver<LoadResult>,
}

impl std::fmt::Debug for AssetServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetServer")
            .field("root", &self.root)
            .field("models", &self.models.len())
            .finish_non_exhaustive()
    }
}

impl Default for AssetServer {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetServer {
    /// Creates a server resolving relative paths against `root`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            root: root.as_ref().to_path_buf(),
            models: SlotMap::with_key(),
            by_path: FxHashMap::default(),
            sender,
            receiver,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Starts loading `path` (relative to the root) and returns its handle
    /// immediately. Requesting the same path twice shares one load.
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> ModelHandle {
        let full_path = self.root.join(path.as_ref());
        if let Some(&handle) = self.by_path.get(&full_path) {
            return handle;
        }

        let handle = self.models.insert(ModelEntry {
            path: full_path.clone(),
            state: LoadState::Pending,
        });
        self.by_path.insert(full_path.clone(), handle);

        log::debug!("Loading model {}", full_path.display());

        let sender = self.sender.clone();
        get_asset_runtime().spawn(async move {
            let result = tokio::task::spawn_blocking(move || load_model_file(&full_path))
                .await
                .map_err(SceneError::from)
                .and_then(|r| r);
            // The server may have been dropped meanwhile; nobody is waiting then.
            let _ = sender.send((handle, result));
        });

        handle
    }

    /// Registers an already parsed model, bypassing the loader.
    pub fn insert_model(&mut self, model: ModelAsset) -> ModelHandle {
        let path = self.root.join(&model.name);
        let handle = self.models.insert(ModelEntry {
            path: path.clone(),
            state: LoadState::Ready(Arc::new(model)),
        });
        self.by_path.insert(path, handle);
        handle
    }

    /// Applies every finished load. Returns how many settled.
    pub fn poll(&mut self) -> usize {
        let finished: Vec<LoadResult> = self.receiver.try_iter().collect();
        let count = finished.len();
        for (handle, result) in finished {
            self.settle(handle, result);
        }
        count
    }

    /// Blocks until `handle` settles, applying other results on the way.
    pub fn wait(&mut self, handle: ModelHandle) -> LoadState {
        while !self.state(handle).is_some_and(LoadState::is_settled) {
            match self.receiver.recv() {
                Ok((h, result)) => self.settle(h, result),
                Err(_) => break,
            }
        }
        self.state(handle).cloned().unwrap_or(LoadState::Pending)
    }

    #[must_use]
    pub fn state(&self, handle: ModelHandle) -> Option<&LoadState> {
        self.models.get(handle).map(|e| &e.state)
    }

    /// The parsed model, once ready.
    #[must_use]
    pub fn get(&self, handle: ModelHandle) -> Option<Arc<ModelAsset>> {
        match self.state(handle)? {
            LoadState::Ready(model) => Some(Arc::clone(model)),
            _ => None,
        }
    }

    #[must_use]
    pub fn path(&self, handle: ModelHandle) -> Option<&Path> {
        self.models.get(handle).map(|e| e.path.as_path())
    }

    fn settle(&mut self, handle: ModelHandle, result: Result<ModelAsset>) {
        let Some(entry) = self.models.get_mut(handle) else {
            return;
        };
        entry.state = match result {
            Ok(model) => LoadState::Ready(Arc::new(model)),
            Err(err) => {
                log::error!("Failed to load {}: {err}", entry.path.display());
                LoadState::Failed(Arc::new(err))
            }
        };
    }
}

#[cfg(feature = "gltf")]
fn load_model_file(path: &Path) -> Result<ModelAsset> {
    crate::assets::loaders::GltfLoader::load(path)
}

#[cfg(not(feature = "gltf"))]
fn load_model_file(path: &Path) -> Result<ModelAsset> {
    Err(SceneError::AssetLoad {
        path: path.display().to_string(),
        reason: "glTF support is not enabled".to_string(),
    })
}
