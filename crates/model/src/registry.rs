//! Process-wide model registry with lazy, exclusive loading.
//!
//! The registry owns the language → loaded-model cache. Loading a model is
//! slow and possibly network-bound, so first use for a language is guarded
//! by a per-language gate: concurrent first-use acquisitions serialize and
//! only one load runs, while cached reads and loads of other languages
//! proceed without contention. Invocation never holds a registry lock.

use std::collections::HashMap;
use std::sync::Arc;

use askdoc_core::AppResult;
use tokio::sync::{Mutex, RwLock};

use crate::backend::ModelHandle;
use crate::descriptor::{resolve, LanguageProfile, ModelDescriptor};

/// Two-phase model lifecycle: descriptor resolution is static, binding a
/// live instance is the loader's job. Tests substitute a stub loader
/// without touching the descriptor mapping.
#[async_trait::async_trait]
pub trait ModelLoader: Send + Sync {
    /// Bind a live model instance for the descriptor.
    ///
    /// Fails with `ModelUnavailable` (missing weights, unreachable
    /// endpoint, unsupported runtime). Must be side-effect free on
    /// failure so callers can retry.
    async fn load(
        &self,
        language: LanguageProfile,
        descriptor: &ModelDescriptor,
    ) -> AppResult<ModelHandle>;
}

/// Cached model instances, one per language, for the process lifetime.
pub struct ModelRegistry {
    loader: Arc<dyn ModelLoader>,
    cache: RwLock<HashMap<LanguageProfile, Arc<ModelHandle>>>,
    gates: Mutex<HashMap<LanguageProfile, Arc<Mutex<()>>>>,
}

impl ModelRegistry {
    /// Create a registry backed by the given loader.
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            cache: RwLock::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a language to its model descriptor. Total, infallible.
    pub fn resolve(&self, language: LanguageProfile) -> ModelDescriptor {
        resolve(language)
    }

    /// Get the loaded model for a language, loading it on first use.
    ///
    /// Idempotent: repeated calls return the same cached instance and a
    /// failed load leaves the cache unchanged, so retrying is safe.
    pub async fn acquire(&self, language: LanguageProfile) -> AppResult<Arc<ModelHandle>> {
        if let Some(handle) = self.cached(language).await {
            return Ok(handle);
        }

        let gate = self.gate(language).await;
        let _guard = gate.lock().await;

        // A concurrent acquisition may have finished while we waited.
        if let Some(handle) = self.cached(language).await {
            tracing::debug!(language = %language, "Model already loaded by a concurrent acquire");
            return Ok(handle);
        }

        let descriptor = resolve(language);
        tracing::info!(
            language = %language,
            model_id = %descriptor.model_id,
            "Loading model"
        );

        let handle = Arc::new(self.loader.load(language, &descriptor).await?);
        self.cache.write().await.insert(language, handle.clone());

        tracing::info!(language = %language, "Model loaded and cached");
        Ok(handle)
    }

    /// Whether a language's model is currently cached.
    pub async fn is_loaded(&self, language: LanguageProfile) -> bool {
        self.cache.read().await.contains_key(&language)
    }

    async fn cached(&self, language: LanguageProfile) -> Option<Arc<ModelHandle>> {
        self.cache.read().await.get(&language).cloned()
    }

    async fn gate(&self, language: LanguageProfile) -> Arc<Mutex<()>> {
        self.gates
            .lock()
            .await
            .entry(language)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GenerateRequest, GenerativeModel};
    use askdoc_core::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct EchoModel {
        descriptor: ModelDescriptor,
    }

    #[async_trait::async_trait]
    impl GenerativeModel for EchoModel {
        fn descriptor(&self) -> &ModelDescriptor {
            &self.descriptor
        }

        async fn generate(&self, request: &GenerateRequest) -> AppResult<String> {
            Ok(request.prompt.clone())
        }
    }

    struct CountingLoader {
        loads: AtomicUsize,
        fail_first: AtomicUsize,
        delay: Duration,
    }

    impl CountingLoader {
        fn new() -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail_first: AtomicUsize::new(0),
                delay: Duration::from_millis(0),
            }
        }

        fn failing_first(count: usize) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail_first: AtomicUsize::new(count),
                delay: Duration::from_millis(0),
            }
        }

        fn slow() -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail_first: AtomicUsize::new(0),
                delay: Duration::from_millis(20),
            }
        }
    }

    #[async_trait::async_trait]
    impl ModelLoader for CountingLoader {
        async fn load(
            &self,
            _language: LanguageProfile,
            descriptor: &ModelDescriptor,
        ) -> AppResult<ModelHandle> {
            tokio::time::sleep(self.delay).await;
            self.loads.fetch_add(1, Ordering::SeqCst);

            if self
                .fail_first
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(AppError::ModelUnavailable("simulated outage".to_string()));
            }

            Ok(ModelHandle::Generative(Box::new(EchoModel {
                descriptor: descriptor.clone(),
            })))
        }
    }

    #[tokio::test]
    async fn test_acquire_caches_instance() {
        let loader = Arc::new(CountingLoader::new());
        let registry = ModelRegistry::new(loader.clone());

        let first = registry.acquire(LanguageProfile::English).await.unwrap();
        let second = registry.acquire(LanguageProfile::English).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_languages_load_independently() {
        let loader = Arc::new(CountingLoader::new());
        let registry = ModelRegistry::new(loader.clone());

        registry.acquire(LanguageProfile::English).await.unwrap();
        registry.acquire(LanguageProfile::Sanskrit).await.unwrap();

        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
        assert!(registry.is_loaded(LanguageProfile::English).await);
        assert!(registry.is_loaded(LanguageProfile::Sanskrit).await);
        assert!(!registry.is_loaded(LanguageProfile::Japanese).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_use_loads_once() {
        let loader = Arc::new(CountingLoader::slow());
        let registry = Arc::new(ModelRegistry::new(loader.clone()));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry.acquire(LanguageProfile::Japanese).await
            }));
        }

        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }

        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_does_not_poison_cache() {
        let loader = Arc::new(CountingLoader::failing_first(1));
        let registry = ModelRegistry::new(loader.clone());

        let err = registry.acquire(LanguageProfile::English).await.unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
        assert!(!registry.is_loaded(LanguageProfile::English).await);

        // Retry succeeds and performs a fresh load
        let handle = registry.acquire(LanguageProfile::English).await.unwrap();
        assert_eq!(handle.descriptor().model_id, "google/flan-t5-base");
        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
    }
}
