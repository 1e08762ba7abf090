use claude_statusline::utils::SessionSnapshot;
use claude_statusline::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SESSION_JSON: &str = r#"{
    "session_id": "bench-session",
    "model": {"id": "claude-sonnet-4-20250514", "display_name": "Sonnet 4"},
    "version": "v1.0.85",
    "context_window": {"remaining_percentage": 95, "total_input_tokens": 1000, "total_output_tokens": 500},
    "workspace": {"current_dir": "/tmp/my-project", "project_dir": "/tmp/my-project"},
    "cost": {"total_cost_usd": 2.48, "total_duration_ms": 720000, "total_lines_added": 120, "total_lines_removed": 30},
    "output_style": {"name": "default"}
}"#;

fn all_fields_visible() -> Config {
    let mut config = Config::default();
    for field in FieldKind::ALL {
        if !config.is_visible(field) {
            config.toggle_field(field);
        }
    }
    config
}

fn bench_format(c: &mut Criterion) {
    let data = sample_data();
    let config = all_fields_visible();

    let mut group = c.benchmark_group("format_statusline");
    for (name, verbose, colors) in [
        ("compact_plain", false, false),
        ("compact_colored", false, true),
        ("verbose_colored", true, true),
    ] {
        let ctx = RenderContext { verbose, colors };
        group.bench_function(name, |b| {
            b.iter(|| format_statusline(black_box(&data), black_box(&config), &ctx))
        });
    }
    group.finish();
}

fn bench_parsing(c: &mut Criterion) {
    c.bench_function("parse_session", |b| {
        b.iter(|| SessionSnapshot::parse(black_box(SESSION_JSON)))
    });

    let raw = serde_json::to_value(Config::default()).unwrap();
    c.bench_function("validate_config", |b| b.iter(|| validate(black_box(&raw))));
}

criterion_group!(benches, bench_format, bench_parsing);
criterion_main!(benches);
