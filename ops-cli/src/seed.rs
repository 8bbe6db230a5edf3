//! Randomized demo-event generation
//!
//! Distributions mirror what real dashboards tend to show: mostly low
//! severity with a thin critical tail, an 80% share of authenticated
//! actors, and status codes dominated by 2xx.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use event_store::{EventSink, EventType, NewEvent, PgEventStore, Severity};
use ipnetwork::IpNetwork;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;
use std::net::{IpAddr, Ipv4Addr};
use tracing::info;
use uuid::Uuid;

pub struct SeedOptions {
    pub count: usize,
    pub days: i64,
    pub batch_size: usize,
}

const SEVERITY_WEIGHTS: &[(Severity, u32)] = &[
    (Severity::Low, 60),
    (Severity::Medium, 25),
    (Severity::High, 12),
    (Severity::Critical, 3),
];

const STATUS_CODE_WEIGHTS: &[(i32, u32)] = &[
    (200, 70),
    (201, 10),
    (400, 5),
    (401, 5),
    (403, 3),
    (404, 3),
    (500, 2),
    (503, 2),
];

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];

const ENDPOINTS: &[&str] = &[
    "/api/users",
    "/api/auth/login",
    "/api/auth/logout",
    "/api/data/export",
    "/api/admin/users",
    "/api/admin/settings",
    "/api/config/update",
    "/api/reports",
];

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0",
    "curl/8.4.0",
    "python-requests/2.32.0",
];

/// Generate events and insert them in batches. Returns rows inserted.
pub async fn run(store: &PgEventStore, options: SeedOptions) -> Result<u64> {
    info!(
        count = options.count,
        days = options.days,
        "Seeding events table"
    );

    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let mut inserted: u64 = 0;
    let mut remaining = options.count;

    while remaining > 0 {
        let batch_len = remaining.min(options.batch_size.max(1));
        let batch: Vec<NewEvent> = (0..batch_len)
            .map(|_| generate_event(&mut rng, now, options.days))
            .collect();

        inserted += store.insert_batch(batch).await?;
        remaining -= batch_len;
        info!(inserted, total = options.count, "Inserted batch");
    }

    Ok(inserted)
}

/// One random event with `occurred_at` in the past `days` days.
pub fn generate_event(rng: &mut impl Rng, now: DateTime<Utc>, days: i64) -> NewEvent {
    let event_type = *EventType::ALL
        .choose(rng)
        .unwrap_or(&EventType::ApiCall);
    let severity = weighted_pick(rng, SEVERITY_WEIGHTS).unwrap_or(Severity::Low);

    let occurred_at = now - Duration::seconds(rng.gen_range(0..days.max(1) * 86_400));
    let ingested_at = occurred_at + Duration::milliseconds(rng.gen_range(100..5000));

    let user_id = rng
        .gen_bool(0.8)
        .then(|| Uuid::new_v4().to_string());

    NewEvent {
        event_type,
        severity,
        user_id,
        ip_address: random_ip(rng),
        user_agent: USER_AGENTS.choose(rng).map(|ua| (*ua).to_string()),
        endpoint: ENDPOINTS.choose(rng).map(|e| (*e).to_string()),
        http_method: HTTP_METHODS.choose(rng).map(|m| (*m).to_string()),
        status_code: weighted_pick(rng, STATUS_CODE_WEIGHTS),
        metadata: Some(metadata_for(rng, event_type)),
        occurred_at: Some(occurred_at),
        ingested_at: Some(ingested_at),
    }
}

/// Metadata shape depends on the event type; the aggregation core never
/// inspects these, they exist so the dashboard detail view has something
/// realistic to render.
fn metadata_for(rng: &mut impl Rng, event_type: EventType) -> serde_json::Value {
    let request_id = Uuid::new_v4().to_string();
    let duration = rng.gen_range(10..5000);

    match event_type {
        EventType::AuthAttempt => json!({
            "request_id": request_id,
            "duration": duration,
            "success": rng.gen_bool(0.85),
            "mfa_used": rng.gen_bool(0.3),
            "provider": *pick(rng, &["local", "google", "github"]),
        }),
        EventType::ApiCall => json!({
            "request_id": request_id,
            "duration": duration,
            "response_size": rng.gen_range(100..50_000),
            "cached": rng.gen_bool(0.2),
        }),
        EventType::AdminAction => json!({
            "request_id": request_id,
            "duration": duration,
            "action": *pick(rng, &["user_created", "user_deleted", "role_changed", "settings_updated"]),
            "target_user_id": Uuid::new_v4().to_string(),
        }),
        EventType::DataAccess => json!({
            "request_id": request_id,
            "duration": duration,
            "resource": *pick(rng, &["users", "orders", "analytics", "logs"]),
            "record_count": rng.gen_range(1..1000),
        }),
        EventType::ConfigChange => json!({
            "request_id": request_id,
            "duration": duration,
            "setting": *pick(rng, &["feature_flags", "rate_limits", "permissions"]),
            "old_value": *pick(rng, &["enabled", "disabled", "default"]),
            "new_value": *pick(rng, &["enabled", "disabled", "strict"]),
        }),
    }
}

fn pick<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn random_ip(rng: &mut impl Rng) -> IpNetwork {
    let addr = Ipv4Addr::new(
        rng.gen_range(1..=223),
        rng.gen(),
        rng.gen(),
        rng.gen_range(1..=254),
    );
    IpNetwork::from(IpAddr::V4(addr))
}

/// Weighted choice; the last entry absorbs any remaining probability mass.
/// An empty table yields None rather than panicking.
fn weighted_pick<T: Copy>(rng: &mut impl Rng, weights: &[(T, u32)]) -> Option<T> {
    let (&(last, _), rest) = weights.split_last()?;
    let total: u32 = weights.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total.max(1));
    for (item, weight) in rest {
        if roll < *weight {
            return Some(*item);
        }
        roll -= weight;
    }
    Some(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn timestamps_stay_in_range_and_ordered() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();

        for _ in 0..500 {
            let event = generate_event(&mut rng, now, 30);
            let occurred = event.occurred_at.unwrap();
            let ingested = event.ingested_at.unwrap();

            assert!(occurred <= now);
            assert!(occurred >= now - Duration::days(30));
            assert!(ingested >= occurred);
        }
    }

    #[test]
    fn severity_weights_favor_low_over_critical() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc::now();

        let mut low = 0usize;
        let mut critical = 0usize;
        for _ in 0..2000 {
            match generate_event(&mut rng, now, 30).severity {
                Severity::Low => low += 1,
                Severity::Critical => critical += 1,
                _ => {}
            }
        }

        // 60% vs 3% leaves plenty of room even for an unlucky seed.
        assert!(low > critical * 5, "low={low} critical={critical}");
    }

    #[test]
    fn metadata_matches_event_type() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc::now();

        for _ in 0..200 {
            let event = generate_event(&mut rng, now, 30);
            let metadata = event.metadata.unwrap();
            let object = metadata.as_object().unwrap();

            assert!(object.contains_key("request_id"));
            assert!(object.contains_key("duration"));

            let type_key = match event.event_type {
                EventType::AuthAttempt => "provider",
                EventType::ApiCall => "response_size",
                EventType::AdminAction => "action",
                EventType::DataAccess => "resource",
                EventType::ConfigChange => "setting",
            };
            assert!(object.contains_key(type_key), "missing {type_key}");
        }
    }

    #[test]
    fn most_events_have_an_acting_principal() {
        let mut rng = StdRng::seed_from_u64(99);
        let now = Utc::now();

        let with_user = (0..1000)
            .filter(|_| generate_event(&mut rng, now, 30).user_id.is_some())
            .count();

        // 80% weighted; both populated and anonymous events must occur.
        assert!(with_user > 650 && with_user < 950, "with_user={with_user}");
    }

    #[test]
    fn weighted_pick_respects_zero_weight() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let picked = weighted_pick(&mut rng, &[("always", 1), ("never", 0)]);
            assert_eq!(picked, Some("always"));
        }
    }

    #[test]
    fn weighted_pick_handles_an_empty_table() {
        let mut rng = StdRng::seed_from_u64(3);
        let empty: &[(i32, u32)] = &[];
        assert_eq!(weighted_pick(&mut rng, empty), None);
    }
}
