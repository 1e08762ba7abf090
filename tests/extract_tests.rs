use chrono::{DateTime, Local, TimeZone};
use claude_statusline::segments::Probe;
use claude_statusline::utils::SessionSnapshot;
use claude_statusline::*;
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed answers, with a call counter per probe.
#[derive(Default)]
struct FakeProbe {
    git_calls: AtomicUsize,
    cpu_calls: AtomicUsize,
    memory_calls: AtomicUsize,
    battery_calls: AtomicUsize,
    python_calls: AtomicUsize,
}

impl Probe for FakeProbe {
    async fn git_summary(&self, _dir: &Path) -> Option<String> {
        self.git_calls.fetch_add(1, Ordering::SeqCst);
        Some("main *".to_string())
    }

    async fn cpu_usage(&self) -> Option<u8> {
        self.cpu_calls.fetch_add(1, Ordering::SeqCst);
        Some(42)
    }

    async fn memory_usage(&self) -> Option<u8> {
        self.memory_calls.fetch_add(1, Ordering::SeqCst);
        Some(63)
    }

    async fn battery(&self) -> Option<u8> {
        self.battery_calls.fetch_add(1, Ordering::SeqCst);
        None
    }

    async fn python_version(&self) -> Option<String> {
        self.python_calls.fetch_add(1, Ordering::SeqCst);
        Some("3.11.5".to_string())
    }

    fn python_venv(&self) -> Option<String> {
        Some("venv".to_string())
    }

    fn now(&self) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).single().unwrap()
    }
}

fn sample_session() -> SessionSnapshot {
    SessionSnapshot::from_value(&json!({
        "session_id": "abc123",
        "model": {"id": "claude-sonnet-4-20250514", "display_name": "Sonnet 4"},
        "version": "1.0.85",
        "context_window": {
            "remaining_percentage": 95,
            "total_input_tokens": 1000,
            "total_output_tokens": 500
        },
        "workspace": {"current_dir": "/home/user/my-project"},
        "cost": {
            "total_cost_usd": 2.48,
            "total_duration_ms": 3_600_000,
            "total_lines_added": 120,
            "total_lines_removed": 30
        },
        "output_style": {"name": "Explanatory"}
    }))
    .unwrap()
}

#[tokio::test]
async fn test_extracts_session_fields() {
    let extractor = DataExtractor::new(FakeProbe::default());
    let data = extractor.extract(&sample_session(), &Config::default()).await;

    assert_eq!(data.model.as_deref(), Some("claude-sonnet-4-20250514"));
    assert_eq!(data.version.as_deref(), Some("1.0.85"));
    assert_eq!(data.context_remaining, Some(95));
    assert_eq!(data.tokens, Some(1500));
    assert_eq!(data.current_dir.as_deref(), Some("my-project"));
    assert_eq!(data.git_branch.as_deref(), Some("main *"));
    assert_eq!(data.cost, Some(2.48));
    assert_eq!(data.duration_ms, Some(3_600_000));
    assert_eq!(data.lines_changed, Some(150));
    assert_eq!(data.output_style.as_deref(), Some("Explanatory"));
    assert_eq!(data.cpu_usage, Some(42));
    assert_eq!(data.memory_usage, Some(63));
    assert_eq!(data.battery, None);
    assert_eq!(data.python_version.as_deref(), Some("3.11.5"));
    assert_eq!(data.python_venv.as_deref(), Some("venv"));
    assert_eq!(data.datetime.as_deref(), Some("2025-01-01 12:00:00"));
}

#[tokio::test]
async fn test_rates_from_duration() {
    let extractor = DataExtractor::new(FakeProbe::default());
    let data = extractor.extract(&sample_session(), &Config::default()).await;

    // One hour: cost per hour equals cost, 1500 tokens over 60 minutes
    let cost_per_hour = data.cost_per_hour.unwrap();
    assert!((cost_per_hour - 2.48).abs() < 1e-9);
    assert_eq!(data.tokens_per_minute, Some(25));
}

#[tokio::test]
async fn test_zero_duration_omits_rates() {
    let session = SessionSnapshot::from_value(&json!({
        "context_window": {"total_input_tokens": 10, "total_output_tokens": 5},
        "cost": {"total_cost_usd": 0.5, "total_duration_ms": 0}
    }))
    .unwrap();

    let data = DataExtractor::new(FakeProbe::default())
        .extract(&session, &Config::default())
        .await;

    assert_eq!(data.cost, Some(0.5));
    assert_eq!(data.tokens, Some(15));
    assert_eq!(data.duration_ms, Some(0));
    assert_eq!(data.cost_per_hour, None);
    assert_eq!(data.tokens_per_minute, None);
}

#[tokio::test]
async fn test_missing_sections_leave_fields_empty() {
    let session = SessionSnapshot::parse("{}").unwrap();
    let data = DataExtractor::new(FakeProbe::default())
        .extract(&session, &Config::default())
        .await;

    assert_eq!(data.model, None);
    assert_eq!(data.version, None);
    assert_eq!(data.context_remaining, None);
    assert_eq!(data.tokens, None);
    assert_eq!(data.current_dir, None);
    assert_eq!(data.git_branch, None);
    assert_eq!(data.cost, None);
    assert_eq!(data.lines_changed, None);
    // Probe-backed fields still fill in
    assert_eq!(data.cpu_usage, Some(42));
    assert!(data.datetime.is_some());
}

#[tokio::test]
async fn test_malformed_section_only_affects_its_fields() {
    let session = SessionSnapshot::from_value(&json!({
        "model": "not-an-object",
        "version": "1.0.85",
        "cost": {"total_cost_usd": "expensive"}
    }))
    .unwrap();

    let data = DataExtractor::new(FakeProbe::default())
        .extract(&session, &Config::default())
        .await;

    assert_eq!(data.model, None);
    assert_eq!(data.cost, None);
    assert_eq!(data.version.as_deref(), Some("1.0.85"));
}

#[tokio::test]
async fn test_mistyped_number_only_loses_its_own_field() {
    let session = SessionSnapshot::from_value(&json!({
        "context_window": {
            "remaining_percentage": "ninety",
            "total_input_tokens": 1000,
            "total_output_tokens": 500
        },
        "cost": {"total_cost_usd": 2.48, "total_duration_ms": "long", "total_lines_added": 5}
    }))
    .unwrap();

    let data = DataExtractor::new(FakeProbe::default())
        .extract(&session, &Config::default())
        .await;

    assert_eq!(data.context_remaining, None);
    assert_eq!(data.tokens, Some(1500));
    assert_eq!(data.cost, Some(2.48));
    assert_eq!(data.duration_ms, None);
    assert_eq!(data.cost_per_hour, None);
    assert_eq!(data.lines_changed, Some(5));
}

#[tokio::test]
async fn test_model_prefers_id_over_display_name() {
    let session = SessionSnapshot::from_value(&json!({
        "model": {"id": "claude-sonnet-4-20250514", "display_name": "Sonnet 4"}
    }))
    .unwrap();

    let data = DataExtractor::new(FakeProbe::default())
        .extract(&session, &Config::default())
        .await;

    assert_eq!(data.model.as_deref(), Some("claude-sonnet-4-20250514"));
}

#[tokio::test]
async fn test_model_falls_back_to_display_name() {
    for model in [
        json!({"display_name": "Sonnet 4"}),
        json!({"id": "", "display_name": "Sonnet 4"}),
    ] {
        let session = SessionSnapshot::from_value(&json!({ "model": model })).unwrap();
        let data = DataExtractor::new(FakeProbe::default())
            .extract(&session, &Config::default())
            .await;
        assert_eq!(data.model.as_deref(), Some("Sonnet 4"));
    }
}

#[tokio::test]
async fn test_context_percentage_is_clamped() {
    for (raw, expected) in [(json!(150), 100), (json!(-5), 0), (json!(42.7), 42)] {
        let session = SessionSnapshot::from_value(&json!({
            "context_window": {"remaining_percentage": raw}
        }))
        .unwrap();
        let data = DataExtractor::new(FakeProbe::default())
            .extract(&session, &Config::default())
            .await;
        assert_eq!(data.context_remaining, Some(expected));
    }
}

#[tokio::test]
async fn test_cwd_used_without_workspace() {
    let session = SessionSnapshot::from_value(&json!({"cwd": "/tmp/scratch"})).unwrap();
    assert_eq!(session.current_dir(), Some("/tmp/scratch"));

    let data = DataExtractor::new(FakeProbe::default())
        .extract(&session, &Config::default())
        .await;
    assert_eq!(data.current_dir.as_deref(), Some("scratch"));
}

#[tokio::test]
async fn test_hidden_fields_skip_their_probes() {
    let mut config = Config::default();
    for field in [
        FieldKind::GitBranch,
        FieldKind::CpuUsage,
        FieldKind::MemoryUsage,
        FieldKind::Battery,
        FieldKind::PythonVersion,
    ] {
        config.toggle_field(field);
        assert!(!config.is_visible(field));
    }

    let extractor = DataExtractor::new(FakeProbe::default());
    let data = extractor.extract(&sample_session(), &config).await;

    let probe = extractor.probe();
    assert_eq!(probe.git_calls.load(Ordering::SeqCst), 0);
    assert_eq!(probe.cpu_calls.load(Ordering::SeqCst), 0);
    assert_eq!(probe.memory_calls.load(Ordering::SeqCst), 0);
    assert_eq!(probe.battery_calls.load(Ordering::SeqCst), 0);
    assert_eq!(probe.python_calls.load(Ordering::SeqCst), 0);
    assert_eq!(data.git_branch, None);
    assert_eq!(data.cpu_usage, None);
}

#[tokio::test]
async fn test_visible_fields_probe_once() {
    let extractor = DataExtractor::new(FakeProbe::default());
    extractor.extract(&sample_session(), &Config::default()).await;

    let probe = extractor.probe();
    assert_eq!(probe.git_calls.load(Ordering::SeqCst), 1);
    assert_eq!(probe.cpu_calls.load(Ordering::SeqCst), 1);
    assert_eq!(probe.memory_calls.load(Ordering::SeqCst), 1);
    assert_eq!(probe.battery_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_non_object_input_is_rejected() {
    assert!(matches!(
        SessionSnapshot::parse("[1, 2]"),
        Err(StatuslineError::InvalidInput(_))
    ));
    assert!(matches!(
        SessionSnapshot::parse("not json"),
        Err(StatuslineError::InvalidJson(_))
    ));
}
