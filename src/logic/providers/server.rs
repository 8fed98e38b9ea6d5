//! Server Aggregate Signals
//!
//! Remote enrichment (public IP, ASN, datacenter flag, IP/account aggregation,
//! risk tags) arrives asynchronously through `ServerIntelCache`. Every signal
//! built from it is `serverRequired`: zero local weight, fixed legacy score.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::constants::{DATACENTER_SCORE, RISK_TAG_SCORE, RISK_TAG_SCORE_CAP};
use crate::logic::mutation::MutationPlanner;
use crate::logic::signal::{RiskSignal, RiskSignalState, SignalCategory, LAYER_SERVER};
use crate::logic::snapshot::RiskSnapshot;

use super::RiskSignalProvider;

pub const SIGNAL_NETWORK: &str = "server.network";
pub const SIGNAL_DATACENTER: &str = "server.datacenter";
pub const SIGNAL_IP_AGGREGATION: &str = "server.ip_aggregation";
pub const SIGNAL_RISK_TAGS: &str = "server.risk_tags";

/// (minimum accounts sharing the IP, score), highest first
const IP_AGGREGATION_TIERS: &[(u32, f64)] = &[(50, 35.0), (10, 20.0), (3, 10.0)];

// ============================================================================
// AGGREGATE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerAggregate {
    pub public_ip: Option<String>,
    pub asn: Option<u32>,
    pub asn_org: Option<String>,
    pub is_datacenter: bool,
    /// Accounts seen from the same public IP
    pub ip_account_count: Option<u32>,
    pub risk_tags: Vec<String>,
}

impl ServerAggregate {
    pub fn from_json(json: &str) -> crate::logic::error::RiskResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Score tier for the number of accounts sharing one IP
pub fn ip_aggregation_score(count: u32) -> f64 {
    IP_AGGREGATION_TIERS
        .iter()
        .find(|(min, _)| count >= *min)
        .map(|(_, score)| *score)
        .unwrap_or(0.0)
}

// ============================================================================
// CACHE
// ============================================================================

/// Latest server aggregate; one producer, many evaluation readers
#[derive(Debug)]
pub struct ServerIntelCache {
    entry: RwLock<Option<(ServerAggregate, DateTime<Utc>)>>,
    ttl: Duration,
}

impl ServerIntelCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl: Duration::seconds(ttl_secs.max(1)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn update(&self, aggregate: ServerAggregate) {
        self.update_at(aggregate, Utc::now());
    }

    pub fn update_at(&self, aggregate: ServerAggregate, received_at: DateTime<Utc>) {
        *self.entry.write() = Some((aggregate, received_at));
    }

    /// Aggregate if still fresh
    pub fn current(&self) -> Option<ServerAggregate> {
        self.current_at(Utc::now())
    }

    pub fn current_at(&self, now: DateTime<Utc>) -> Option<ServerAggregate> {
        let guard = self.entry.read();
        match guard.as_ref() {
            Some((aggregate, received_at)) if now - *received_at <= self.ttl => Some(aggregate.clone()),
            Some(_) => {
                log::debug!("Server aggregate expired");
                None
            }
            None => None,
        }
    }

    pub fn clear(&self) {
        *self.entry.write() = None;
    }
}

// ============================================================================
// PROVIDER
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct ServerSignalProvider;

impl ServerSignalProvider {
    fn signal(id: &str) -> RiskSignal {
        RiskSignal::new(id, SignalCategory::Server, LAYER_SERVER, RiskSignalState::ServerRequired)
    }
}

impl RiskSignalProvider for ServerSignalProvider {
    fn name(&self) -> &str {
        "server"
    }

    fn signals(&self, snapshot: &RiskSnapshot, _planner: &MutationPlanner) -> Vec<RiskSignal> {
        let aggregate = match &snapshot.server {
            Some(aggregate) => aggregate,
            None => {
                return vec![RiskSignal::new(
                    SIGNAL_NETWORK,
                    SignalCategory::Server,
                    LAYER_SERVER,
                    RiskSignalState::Unavailable,
                )];
            }
        };

        let mut network = Self::signal(SIGNAL_NETWORK);
        if let Some(ip) = &aggregate.public_ip {
            network = network.with_evidence("public_ip", ip);
        }
        if let Some(asn) = aggregate.asn {
            network = network.with_evidence("asn", asn);
        }
        if let Some(org) = &aggregate.asn_org {
            network = network.with_evidence("asn_org", org);
        }
        let mut signals = vec![network];

        if aggregate.is_datacenter {
            signals.push(
                Self::signal(SIGNAL_DATACENTER)
                    .with_score(DATACENTER_SCORE)
                    .with_evidence("is_datacenter", true),
            );
        }

        if let Some(count) = aggregate.ip_account_count {
            signals.push(
                Self::signal(SIGNAL_IP_AGGREGATION)
                    .with_score(ip_aggregation_score(count))
                    .with_evidence("ip_account_count", count),
            );
        }

        if !aggregate.risk_tags.is_empty() {
            let score = (aggregate.risk_tags.len() as f64 * RISK_TAG_SCORE).min(RISK_TAG_SCORE_CAP);
            signals.push(
                Self::signal(SIGNAL_RISK_TAGS)
                    .with_score(score)
                    .with_evidence("tags", aggregate.risk_tags.join(",")),
            );
        }

        signals
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run(server: Option<ServerAggregate>) -> Vec<RiskSignal> {
        let snapshot = RiskSnapshot::new("d").with_server(server);
        ServerSignalProvider.signals(&snapshot, &MutationPlanner::disabled("d"))
    }

    #[test]
    fn test_no_aggregate_is_unavailable() {
        let signals = run(None);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].id, SIGNAL_NETWORK);
        assert_eq!(signals[0].state, RiskSignalState::Unavailable);
    }

    #[test]
    fn test_ip_aggregation_tiers() {
        assert_eq!(ip_aggregation_score(0), 0.0);
        assert_eq!(ip_aggregation_score(2), 0.0);
        assert_eq!(ip_aggregation_score(3), 10.0);
        assert_eq!(ip_aggregation_score(10), 20.0);
        assert_eq!(ip_aggregation_score(49), 20.0);
        assert_eq!(ip_aggregation_score(500), 35.0);
    }

    #[test]
    fn test_full_aggregate_signals() {
        let aggregate = ServerAggregate::from_json(
            r#"{"publicIp":"203.0.113.9","asn":14061,"asnOrg":"DigitalOcean","isDatacenter":true,
                "ipAccountCount":12,"riskTags":["proxy","tor","vpn","abuse"]}"#,
        )
        .unwrap();
        let signals = run(Some(aggregate));

        assert!(signals.iter().all(|s| s.state == RiskSignalState::ServerRequired));
        assert!(signals.iter().all(|s| s.layer == LAYER_SERVER && s.weight_hint == 0.0));

        let score = |id: &str| signals.iter().find(|s| s.id == id).map(|s| s.score);
        assert_eq!(score(SIGNAL_NETWORK), Some(0.0));
        assert_eq!(score(SIGNAL_DATACENTER), Some(30.0));
        assert_eq!(score(SIGNAL_IP_AGGREGATION), Some(20.0));
        assert_eq!(score(SIGNAL_RISK_TAGS), Some(30.0));

        let network = signals.iter().find(|s| s.id == SIGNAL_NETWORK).unwrap();
        assert_eq!(network.evidence.get("asn").map(String::as_str), Some("14061"));
    }

    #[test]
    fn test_cache_ttl() {
        let cache = ServerIntelCache::new(60);
        assert!(cache.current().is_none());

        let received = Utc::now();
        cache.update_at(ServerAggregate { is_datacenter: true, ..Default::default() }, received);
        assert!(cache.current_at(received + Duration::seconds(30)).is_some());
        assert!(cache.current_at(received + Duration::seconds(61)).is_none());

        cache.clear();
        assert!(cache.current_at(received).is_none());
    }
}
