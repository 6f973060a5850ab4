//! Dynamic root resolution service
//!
//! The orchestrator: validates a step pipeline against the strategy
//! registry, then folds the steps over the origin set, feeding each step's
//! matches into the next.

use crate::error::{ConfigurationError, ResolveError};
use crate::origin::OriginFinderRegistry;
use crate::types::{ResolverConfig, RootQuery};
use dynroot_steps::{QueryStep, StrategyRegistry, TraversalContext, TraversalResult, TraversalStrategy};
use dynroot_store::{ContentLookup, ScopeProvider, TreeQueryRepository};
use dynroot_tree::{NodeKey, OriginSet};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Resolves dynamic roots from origin queries and step pipelines
///
/// Holds only read-only registries; share one instance behind an `Arc` and
/// resolve concurrently.
#[derive(Debug, Clone)]
pub struct DynamicRootService {
    strategies: StrategyRegistry,
    origins: OriginFinderRegistry,
    config: ResolverConfig,
}

impl DynamicRootService {
    /// Create service from assembled registries
    #[must_use]
    pub fn new(
        strategies: StrategyRegistry,
        origins: OriginFinderRegistry,
        config: ResolverConfig,
    ) -> Self {
        Self {
            strategies,
            origins,
            config,
        }
    }

    /// Create service with built-in strategies and origin finders over one store
    #[must_use]
    pub fn with_defaults<S>(store: Arc<S>, scopes: Arc<dyn ScopeProvider>, config: ResolverConfig) -> Self
    where
        S: TreeQueryRepository + ContentLookup + 'static,
    {
        let repository: Arc<dyn TreeQueryRepository> = store.clone();
        let lookup: Arc<dyn ContentLookup> = store;
        let context = TraversalContext::new(repository, scopes);

        Self::new(
            StrategyRegistry::with_defaults(&context),
            OriginFinderRegistry::with_defaults(&lookup),
            config,
        )
    }

    /// Resolver configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Registered direction tags, in registration order
    #[must_use]
    pub fn step_directions(&self) -> Vec<String> {
        self.strategies.step_directions()
    }

    /// Registered origin aliases, in registration order
    #[must_use]
    pub fn origin_aliases(&self) -> Vec<String> {
        self.origins.aliases()
    }

    /// Origin the query's pipeline would start from
    ///
    /// # Errors
    /// - `ConfigurationError::UnknownOrigin` for an unregistered alias
    /// - `ResolveError::Storage` if the content lookup fails
    pub async fn find_origin_key(&self, query: &RootQuery) -> Result<Option<NodeKey>, ResolveError> {
        let finder = self.origins.get(&query.origin_alias).ok_or_else(|| {
            ConfigurationError::UnknownOrigin {
                alias: query.origin_alias.clone(),
            }
        });
        let finder = log_configuration(finder)?;
        Ok(finder.find(query).await?)
    }

    /// Find the query's origin and run its steps from it
    ///
    /// An origin that does not exist yields an empty root set. A query
    /// without steps yields the origin itself.
    ///
    /// # Errors
    /// - `ResolveError::Configuration` before any storage access
    /// - `ResolveError::Storage` on lookup or traversal failure
    pub async fn get_dynamic_roots(&self, query: &RootQuery) -> Result<OriginSet, ResolveError> {
        self.dynamic_roots(query, None).await
    }

    /// [`Self::get_dynamic_roots`], abandoned when `cancel` fires
    ///
    /// # Errors
    /// As [`Self::get_dynamic_roots`], plus `ResolveError::Cancelled`
    pub async fn get_dynamic_roots_with_cancellation(
        &self,
        query: &RootQuery,
        cancel: &CancellationToken,
    ) -> Result<OriginSet, ResolveError> {
        self.dynamic_roots(query, Some(cancel)).await
    }

    /// Fold `steps` over `origins`
    ///
    /// Every step is checked against the registry before the first
    /// repository call. An empty intermediate set ends the pipeline early.
    ///
    /// # Errors
    /// - `ResolveError::Configuration` for unknown directions or an
    ///   over-long pipeline
    /// - `ResolveError::Storage` if any step fails; no partial result
    /// - `ResolveError::StepTimedOut` if a step exceeds the configured deadline
    pub async fn resolve(&self, steps: &[QueryStep], origins: OriginSet) -> Result<OriginSet, ResolveError> {
        let plan = log_configuration(self.plan(steps))?;
        self.run(steps, &plan, origins, None).await
    }

    /// [`Self::resolve`], abandoned when `cancel` fires
    ///
    /// The in-flight step is dropped, releasing its scope uncompleted.
    ///
    /// # Errors
    /// As [`Self::resolve`], plus `ResolveError::Cancelled`
    pub async fn resolve_with_cancellation(
        &self,
        steps: &[QueryStep],
        origins: OriginSet,
        cancel: &CancellationToken,
    ) -> Result<OriginSet, ResolveError> {
        let plan = log_configuration(self.plan(steps))?;
        self.run(steps, &plan, origins, Some(cancel)).await
    }

    async fn dynamic_roots(
        &self,
        query: &RootQuery,
        cancel: Option<&CancellationToken>,
    ) -> Result<OriginSet, ResolveError> {
        let plan = log_configuration(self.plan(&query.steps))?;

        let Some(origin) = self.find_origin_key(query).await? else {
            tracing::debug!("No origin found for alias {}", query.origin_alias);
            return Ok(OriginSet::new());
        };

        self.run(&query.steps, &plan, OriginSet::single(origin), cancel)
            .await
    }

    /// Strategy per step, or the first configuration defect
    fn plan(&self, steps: &[QueryStep]) -> Result<Vec<Arc<dyn TraversalStrategy>>, ConfigurationError> {
        if steps.len() > self.config.max_steps {
            return Err(ConfigurationError::TooManySteps {
                count: steps.len(),
                max: self.config.max_steps,
            });
        }

        steps
            .iter()
            .enumerate()
            .map(|(step_index, step)| {
                self.strategies
                    .get(step.direction_tag())
                    .cloned()
                    .ok_or_else(|| ConfigurationError::UnknownDirection {
                        tag: step.direction_tag().to_string(),
                        step_index,
                    })
            })
            .collect()
    }

    async fn run(
        &self,
        steps: &[QueryStep],
        plan: &[Arc<dyn TraversalStrategy>],
        origins: OriginSet,
        cancel: Option<&CancellationToken>,
    ) -> Result<OriginSet, ResolveError> {
        let mut current = origins;

        for (step_index, (step, strategy)) in steps.iter().zip(plan).enumerate() {
            if current.is_empty() {
                tracing::debug!("Pipeline emptied before step {}, skipping the rest", step_index);
                break;
            }

            let input = current.len();
            let result = self
                .execute_step(step_index, strategy.as_ref(), &current, step, cancel)
                .await?;

            let Some(found) = result.into_origins() else {
                let err = ConfigurationError::StrategyDeclined {
                    tag: step.direction_tag().to_string(),
                    step_index,
                };
                tracing::warn!("{}", err);
                return Err(err.into());
            };

            tracing::debug!(
                step = step_index,
                direction = step.direction_tag(),
                input,
                output = found.len(),
                "step resolved"
            );
            current = found;
        }

        if self.config.log_resolutions {
            tracing::info!("Resolved {} dynamic roots in {} steps", current.len(), steps.len());
        }
        Ok(current)
    }

    async fn execute_step(
        &self,
        step_index: usize,
        strategy: &dyn TraversalStrategy,
        origins: &OriginSet,
        step: &QueryStep,
        cancel: Option<&CancellationToken>,
    ) -> Result<TraversalResult, ResolveError> {
        let bounded = async {
            match self.config.step_timeout_ms {
                Some(timeout_ms) => {
                    let limit = Duration::from_millis(timeout_ms);
                    match tokio::time::timeout(limit, strategy.execute(origins, step)).await {
                        Ok(result) => result.map_err(ResolveError::from),
                        Err(_) => {
                            tracing::warn!("Step {} ({}) timed out after {}ms", step_index, step, timeout_ms);
                            Err(ResolveError::StepTimedOut {
                                step_index,
                                timeout_ms,
                            })
                        }
                    }
                }
                None => strategy.execute(origins, step).await.map_err(ResolveError::from),
            }
        };

        let Some(cancel) = cancel else {
            return bounded.await;
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::warn!("Resolution cancelled at step {} ({})", step_index, step);
                Err(ResolveError::Cancelled)
            }
            result = bounded => result,
        }
    }
}

fn log_configuration<T>(result: Result<T, ConfigurationError>) -> Result<T, ConfigurationError> {
    if let Err(err) = &result {
        tracing::warn!("Rejected dynamic root pipeline: {}", err);
    }
    result
}
