//! Device Risk CLI - one evaluation cycle, verdict printed as JSON
//!
//! Optional environment:
//! - `DEVICE_RISK_CONFIG`: path to an EngineConfig JSON file
//! - `DEVICE_RISK_POLICY`: path to a MutationStrategy JSON file
//! - `DEVICE_RISK_*`: per-field overrides (see `constants`)

use std::path::Path;
use std::sync::Arc;

use device_risk::constants::APP_VERSION;
use device_risk::logic::capture::{MotionCapture, MotionSample, TouchCapture, TouchSample};
use device_risk::logic::checks::{ConsensusCheck, DetectorCheck};
use device_risk::logic::config::{EngineConfig, DEFAULT_CONFIG};
use device_risk::logic::identity::FileIdentityStore;
use device_risk::logic::policy::{NoPolicy, PolicySource, StaticPolicy};
use device_risk::logic::probes::{
    marker_fact_id, marker_probes, FactProbe, FnDetector, TracerPidProbe, ANDROID_ROOT_MARKERS,
    EMULATOR_MARKERS, IOS_JAILBREAK_MARKERS,
};
use device_risk::logic::signal::{DetectorResult, SignalCategory, LAYER_ANTI_TAMPER, LAYER_ENVIRONMENT};
use device_risk::{RiskEngine, RiskResult};

fn load_config() -> RiskResult<EngineConfig> {
    match std::env::var("DEVICE_RISK_CONFIG") {
        Ok(path) => {
            log::info!("Loading config from {}", path);
            EngineConfig::from_json(&std::fs::read_to_string(path)?)
        }
        Err(_) => Ok((*DEFAULT_CONFIG).clone()),
    }
}

fn load_policy() -> RiskResult<Arc<dyn PolicySource>> {
    match std::env::var("DEVICE_RISK_POLICY") {
        Ok(path) => {
            log::info!("Loading mutation policy from {}", path);
            Ok(Arc::new(StaticPolicy::from_file(Path::new(&path))?))
        }
        Err(_) => Ok(Arc::new(NoPolicy)),
    }
}

fn platform_markers() -> Vec<&'static str> {
    if cfg!(any(target_os = "ios", target_os = "macos")) {
        IOS_JAILBREAK_MARKERS.to_vec()
    } else {
        ANDROID_ROOT_MARKERS.iter().chain(EMULATOR_MARKERS).copied().collect()
    }
}

/// Feed a few seconds of synthetic, loosely coupled input into the captures
fn simulate_session(touch: &TouchCapture, motion: &MotionCapture) {
    touch.start();
    motion.start();

    let mut t = 0.0;
    for i in 0..24 {
        t += 0.35 + ((i * 7) % 5) as f64 * 0.12;
        touch.record(TouchSample::new(t, 120.0 + (i * 37 % 200) as f64, 400.0 + (i * 53 % 300) as f64));
    }
    for i in 0..=150 {
        let ts = i as f64 / 10.0;
        let wobble = (ts * 3.1).sin() * 0.04 + (ts * 7.3).cos() * 0.02;
        motion.record(MotionSample::new(ts, wobble, 0.02, 0.98 + wobble));
    }

    touch.stop();
    motion.stop();
}

async fn run() -> RiskResult<()> {
    let config = load_config()?;
    let policy = load_policy()?;

    let touch = Arc::new(TouchCapture::new(config.touch_capacity));
    let motion = Arc::new(MotionCapture::new(config.motion_capacity));
    simulate_session(&touch, &motion);

    let mut builder = RiskEngine::builder(Arc::new(FileIdentityStore::in_data_dir()))
        .config(config)
        .policy(policy)
        .touch_capture(touch)
        .motion_capture(motion);

    for marker in platform_markers() {
        builder = builder.check(ConsensusCheck::new(marker_fact_id(marker), LAYER_ENVIRONMENT, marker_probes(marker)));
    }

    let debugger = FnDetector::new("debugger.tracer_pid", SignalCategory::AntiTamper, LAYER_ANTI_TAMPER, || {
        let probe = TracerPidProbe;
        if probe.probe() {
            DetectorResult::new(40.0, vec![probe.method().to_string()])
        } else {
            DetectorResult::clean()
        }
    });
    builder = builder.check(DetectorCheck::new(Arc::new(debugger)));

    let engine = builder.build()?;
    let report = engine.evaluate().await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Device Risk Engine v{}...", APP_VERSION);

    if let Err(e) = run().await {
        log::error!("Evaluation failed: {}", e);
        std::process::exit(1);
    }
}
