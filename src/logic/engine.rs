//! Risk Engine - one evaluation cycle
//!
//! ## Flow
//! 1. Resolve device id (fallback on failure) and the epoch's MutationStrategy
//! 2. Build the MutationPlanner
//! 3. Run checks in planned order, each probe under the time budget
//! 4. Drain capture buffers, read the server cache, build the RiskSnapshot
//! 5. Run snapshot providers in planned order
//! 6. Jitter emitted scores / weights, aggregate with jittered tier thresholds
//!
//! Nothing survives the cycle except what the collaborators keep themselves.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::UNKNOWN_DEVICE_ID;
use crate::logic::aggregator::{aggregate_with_policy, RiskVerdict};
use crate::logic::capture::{MotionCapture, TouchCapture};
use crate::logic::checks::Check;
use crate::logic::config::EngineConfig;
use crate::logic::error::RiskResult;
use crate::logic::identity::IdentityProvider;
use crate::logic::mutation::{MutationPlanner, SeedSource};
use crate::logic::policy::{NoPolicy, PolicySource};
use crate::logic::probes::ProbeRunner;
use crate::logic::providers::{BehaviorSignalProvider, RiskSignalProvider, ServerIntelCache, ServerSignalProvider};
use crate::logic::signal::RiskSignal;
use crate::logic::snapshot::{BehaviorSnapshot, RiskSnapshot};

const CHECK_ORDER_SCOPE: &str = "checks";
const PROVIDER_ORDER_SCOPE: &str = "providers";

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub evaluation_id: String,
    pub device_id: String,
    pub evaluated_at: DateTime<Utc>,
    /// Planner keying audit id
    pub planner_fingerprint: String,
    pub seed_source: SeedSource,
    /// Checks in the order they ran
    pub check_order: Vec<String>,
    pub verdict: RiskVerdict,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct RiskEngine {
    config: EngineConfig,
    identity: Arc<dyn IdentityProvider>,
    policy: Arc<dyn PolicySource>,
    checks: Vec<Check>,
    providers: Vec<Arc<dyn RiskSignalProvider>>,
    touch: Option<Arc<TouchCapture>>,
    motion: Option<Arc<MotionCapture>>,
    server_intel: Arc<ServerIntelCache>,
    runner: ProbeRunner,
}

impl RiskEngine {
    pub fn builder(identity: Arc<dyn IdentityProvider>) -> RiskEngineBuilder {
        RiskEngineBuilder::new(identity)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cache the server-aggregate producer writes into
    pub fn server_intel(&self) -> &Arc<ServerIntelCache> {
        &self.server_intel
    }

    /// Device id for this cycle; identity failures never abort evaluation
    fn resolve_device_id(&self) -> String {
        match self.identity.get_or_create() {
            Ok(id) if !id.is_empty() => id,
            Ok(_) => {
                log::warn!("Identity provider returned an empty id, using '{}'", UNKNOWN_DEVICE_ID);
                UNKNOWN_DEVICE_ID.to_string()
            }
            Err(e) => {
                log::warn!("Identity unavailable ({}), using '{}'", e, UNKNOWN_DEVICE_ID);
                UNKNOWN_DEVICE_ID.to_string()
            }
        }
    }

    fn planner_for(&self, device_id: &str) -> MutationPlanner {
        match self.policy.current_strategy() {
            Some(strategy) => MutationPlanner::new(strategy, device_id, self.config.mutation_salt.as_str()),
            None => {
                log::debug!("No mutation policy, planner disabled");
                MutationPlanner::disabled(device_id)
            }
        }
    }

    fn behavior_snapshot(&self) -> BehaviorSnapshot {
        let touches = self
            .touch
            .as_ref()
            .map(|c| c.snapshot_detail_and_reset().1)
            .unwrap_or_default();
        let motion = self
            .motion
            .as_ref()
            .map(|c| c.snapshot_detail_and_reset().1)
            .unwrap_or_default();
        BehaviorSnapshot::from_samples(touches, motion)
    }

    /// Run one full evaluation cycle
    pub async fn evaluate(&self) -> EvaluationReport {
        let device_id = self.resolve_device_id();
        let planner = self.planner_for(&device_id);
        let short_id: String = device_id.chars().take(8).collect();

        log::info!(
            "Evaluation started: device={}, planner={}, seed={:?}, shuffle={}",
            short_id,
            planner.fingerprint(),
            planner.seed_source(),
            planner.strategy().shuffle_checks
        );

        // === CHECKS ===
        let mut signals: Vec<RiskSignal> = Vec::new();
        let mut check_order = Vec::with_capacity(self.checks.len());
        for idx in planner.permutation(CHECK_ORDER_SCOPE, self.checks.len()) {
            let check = &self.checks[idx];
            check_order.push(check.id().to_string());
            signals.extend(check.run(&self.runner, &planner).await);
        }

        // === SNAPSHOT ===
        let snapshot = RiskSnapshot {
            device_id: device_id.clone(),
            evaluated_at: Utc::now(),
            behavior: self.behavior_snapshot(),
            server: self.server_intel.current(),
            prior_signals: signals.clone(),
        };

        // === PROVIDERS ===
        for provider in planner.shuffle(PROVIDER_ORDER_SCOPE, self.providers.clone()) {
            let emitted = provider.signals(&snapshot, &planner);
            log::debug!("Provider '{}' emitted {} signal(s)", provider.name(), emitted.len());
            signals.extend(emitted);
        }

        // === JITTER + AGGREGATE ===
        let signals: Vec<RiskSignal> = signals.into_iter().map(|s| jitter_signal(s, &planner)).collect();
        let policy = self.config.aggregation.jittered(&planner);
        let verdict = aggregate_with_policy(&signals, &policy);

        if let Some(layer) = verdict.tamper_layer {
            log::warn!("Tampered instrumentation detected at layer {} on device {}", layer, short_id);
        }
        log::info!(
            "Evaluation finished: tier={}, score={:.2}, signals={}, fatal={}",
            verdict.tier,
            verdict.score,
            verdict.evidence.len(),
            verdict.fatal
        );

        EvaluationReport {
            evaluation_id: Uuid::new_v4().to_string(),
            device_id,
            evaluated_at: snapshot.evaluated_at,
            planner_fingerprint: planner.fingerprint(),
            seed_source: planner.seed_source(),
            check_order,
            verdict,
        }
    }
}

/// Score and weight hint scaled by the planner; state is never touched
fn jitter_signal(signal: RiskSignal, planner: &MutationPlanner) -> RiskSignal {
    let score = planner.jitter_score(&signal.id, signal.score);
    let weight = planner.jitter_score(&format!("{}#weight", signal.id), signal.weight_hint);
    signal.with_score(score).with_weight(weight)
}

// ============================================================================
// BUILDER
// ============================================================================

pub struct RiskEngineBuilder {
    config: EngineConfig,
    identity: Arc<dyn IdentityProvider>,
    policy: Arc<dyn PolicySource>,
    checks: Vec<Check>,
    providers: Vec<Arc<dyn RiskSignalProvider>>,
    default_providers: bool,
    touch: Option<Arc<TouchCapture>>,
    motion: Option<Arc<MotionCapture>>,
    server_intel: Option<Arc<ServerIntelCache>>,
}

impl RiskEngineBuilder {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            config: EngineConfig::default(),
            identity,
            policy: Arc::new(NoPolicy),
            checks: Vec::new(),
            providers: Vec::new(),
            default_providers: true,
            touch: None,
            motion: None,
            server_intel: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn policy(mut self, policy: Arc<dyn PolicySource>) -> Self {
        self.policy = policy;
        self
    }

    pub fn check(mut self, check: impl Into<Check>) -> Self {
        self.checks.push(check.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn RiskSignalProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Share an existing cache; otherwise one is built from `server_intel_ttl_secs`
    pub fn server_intel(mut self, cache: Arc<ServerIntelCache>) -> Self {
        self.server_intel = Some(cache);
        self
    }

    /// Skip the built-in behavior and server providers
    pub fn without_default_providers(mut self) -> Self {
        self.default_providers = false;
        self
    }

    pub fn touch_capture(mut self, capture: Arc<TouchCapture>) -> Self {
        self.touch = Some(capture);
        self
    }

    pub fn motion_capture(mut self, capture: Arc<MotionCapture>) -> Self {
        self.motion = Some(capture);
        self
    }

    pub fn build(self) -> RiskResult<RiskEngine> {
        self.config.validate()?;

        let mut providers = self.providers;
        if self.default_providers {
            providers.push(Arc::new(BehaviorSignalProvider::new(self.config.behavior.clone())));
            providers.push(Arc::new(ServerSignalProvider));
        }

        let server_intel = self
            .server_intel
            .unwrap_or_else(|| Arc::new(ServerIntelCache::new(self.config.server_intel_ttl_secs)));
        let runner = ProbeRunner::new(Duration::from_millis(self.config.probe_budget_ms));
        log::debug!(
            "Risk engine built: {} check(s), {} provider(s), probe budget {:?}",
            self.checks.len(),
            providers.len(),
            runner.budget()
        );

        Ok(RiskEngine {
            config: self.config,
            identity: self.identity,
            policy: self.policy,
            checks: self.checks,
            providers,
            touch: self.touch,
            motion: self.motion,
            server_intel,
            runner,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
