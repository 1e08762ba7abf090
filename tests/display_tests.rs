use claude_statusline::utils::{format_duration, format_metric};
use claude_statusline::*;

const PLAIN: RenderContext = RenderContext {
    verbose: false,
    colors: false,
};

/// Default config with every icon removed so expected strings stay readable.
fn iconless_config() -> Config {
    let mut config = Config::default();
    for key in icon_keys() {
        config.set_icon(key, "").unwrap();
    }
    config
}

fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[test]
fn test_progress_bar_segments_always_fill_width() {
    for width in 5..=50u8 {
        for percent in 0..=100u8 {
            let (filled, empty) = bar_segments(percent, width);
            assert_eq!(filled + empty, width as usize, "P={} W={}", percent, width);
            let expected = (percent as f64 / 100.0 * width as f64).round() as usize;
            assert_eq!(filled, expected, "P={} W={}", percent, width);
        }
    }
}

#[test]
fn test_progress_bar_extremes() {
    let config = Config::default();
    let painter = Painter::new(false);

    assert_eq!(progress_bar(0, 10, &config, &painter), "[----------]");
    assert_eq!(progress_bar(100, 10, &config, &painter), "[==========]");
    assert_eq!(progress_bar(95, 10, &config, &painter), "[==========]");
    assert_eq!(progress_bar(50, 5, &config, &painter), "[===--]");
}

#[test]
fn test_fields_group_into_lines() {
    let data = StatusData {
        model: Some("Sonnet 4".to_string()),
        current_dir: Some("my-project".to_string()),
        context_remaining: Some(80),
        cost: Some(1.5),
        tokens: Some(1500),
        ..Default::default()
    };
    let mut config = iconless_config();
    config.show_progress_bars = false;

    let output = format_statusline(&data, &config, &PLAIN);

    assert_eq!(output, "my-project  Sonnet 4\n80%\n1500 tok  $1.50");
}

#[test]
fn test_empty_lines_are_omitted() {
    let data = StatusData {
        model: Some("Sonnet 4".to_string()),
        cost: Some(0.25),
        ..Default::default()
    };
    let config = iconless_config();

    let output = format_statusline(&data, &config, &PLAIN);

    assert_eq!(output, "Sonnet 4\n$0.25");
    assert_eq!(format_statusline(&StatusData::default(), &config, &PLAIN), "");
}

#[test]
fn test_order_within_line_follows_field_order() {
    let data = StatusData {
        model: Some("Sonnet 4".to_string()),
        version: Some("v1.0.85".to_string()),
        current_dir: Some("my-project".to_string()),
        ..Default::default()
    };
    let mut config = iconless_config();
    config.move_field(FieldKind::Version, 0);

    let output = format_statusline(&data, &config, &PLAIN);

    assert_eq!(output, "v1.0.85  my-project  Sonnet 4");
}

#[test]
fn test_hidden_fields_are_not_rendered() {
    let data = StatusData {
        model: Some("Sonnet 4".to_string()),
        lines_changed: Some(12),
        ..Default::default()
    };
    let mut config = iconless_config();

    assert_eq!(format_statusline(&data, &config, &PLAIN), "Sonnet 4");

    config.toggle_field(FieldKind::LinesChanged);
    assert_eq!(format_statusline(&data, &config, &PLAIN), "Sonnet 4\n12 lines");
}

#[test]
fn test_compact_mode_uses_icons() {
    let data = StatusData {
        model: Some("Sonnet 4".to_string()),
        ..Default::default()
    };
    let config = Config::default();

    let output = format_statusline(&data, &config, &PLAIN);

    assert_eq!(output, format!("{} Sonnet 4", config.icon("model")));
}

#[test]
fn test_verbose_mode_adds_labels() {
    let data = StatusData {
        model: Some("Sonnet 4".to_string()),
        context_remaining: Some(50),
        ..Default::default()
    };
    let mut config = iconless_config();
    config.progress_bar_width = 10;
    let ctx = RenderContext {
        verbose: true,
        colors: false,
    };

    let output = format_statusline(&data, &config, &ctx);

    assert_eq!(output, "Model: Sonnet 4\nContext remaining: 50% [=====-----]");
}

#[test]
fn test_duration_line_depends_on_mode() {
    let data = StatusData {
        model: Some("Sonnet 4".to_string()),
        duration_ms: Some(720_000),
        ..Default::default()
    };
    let mut config = iconless_config();
    config.toggle_field(FieldKind::Duration);

    let compact = format_statusline(&data, &config, &PLAIN);
    assert_eq!(compact, "Sonnet 4\n12m");

    let verbose = format_statusline(
        &data,
        &config,
        &RenderContext {
            verbose: true,
            colors: false,
        },
    );
    assert_eq!(verbose, "Model: Sonnet 4\nDuration: 12m");

    assert_eq!(FieldKind::Duration.def().line(false), Line::Metrics);
    assert_eq!(FieldKind::Duration.def().line(true), Line::Status);
}

#[test]
fn test_rates_are_appended_when_known() {
    let data = StatusData {
        cost: Some(2.48),
        cost_per_hour: Some(12.4),
        tokens: Some(1500),
        tokens_per_minute: Some(125),
        ..Default::default()
    };
    let config = iconless_config();

    let output = format_statusline(&data, &config, &PLAIN);

    assert_eq!(output, "1500 tok (125 tpm)  $2.48 ($12.40/h)");
}

#[test]
fn test_colored_output_strips_to_plain_output() {
    let data = sample_data();
    let mut config = Config::default();
    for field in FieldKind::ALL {
        if !config.is_visible(field) {
            config.toggle_field(field);
        }
    }

    for verbose in [false, true] {
        let plain = format_statusline(&data, &config, &RenderContext { verbose, colors: false });
        let colored = format_statusline(&data, &config, &RenderContext { verbose, colors: true });

        assert!(!plain.contains('\x1b'));
        assert!(colored.contains("\x1b[96m"), "expected bright cyan in {:?}", colored);
        assert_ne!(plain, colored);
        assert_eq!(strip_ansi(&colored), plain);
    }
}

#[test]
fn test_colors_disabled_by_config_or_environment() {
    let mut config = Config::default();
    assert!(RenderContext::from_config(&config, false).colors);
    assert!(!RenderContext::from_config(&config, true).colors);

    config.enable_colors = false;
    assert!(!RenderContext::from_config(&config, false).colors);

    let overrides = RenderOverrides {
        display_mode: Some(DisplayMode::Verbose),
        no_color: true,
    };
    let ctx = overrides.context(&Config::default());
    assert!(ctx.verbose);
    assert!(!ctx.colors);
}

#[test]
fn test_painter_leaves_empty_text_alone() {
    let painter = Painter::new(true);
    assert_eq!(painter.paint("", ColorName::Red), "");
    assert_eq!(painter.paint("x", ColorName::Red), "\x1b[91mx\x1b[0m");
    assert_eq!(Painter::new(false).paint("x", ColorName::Red), "x");
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0), "0ms");
    assert_eq!(format_duration(850), "850ms");
    assert_eq!(format_duration(12_500), "12.5s");
    assert_eq!(format_duration(720_000), "12m");
    assert_eq!(format_duration(3_600_000), "1h 0m");
    assert_eq!(format_duration(7_500_000), "2h 5m");
}

#[test]
fn test_format_metric() {
    assert_eq!(format_metric(MetricUnit::Cost, 2.0, None), "$2.00");
    assert_eq!(format_metric(MetricUnit::Cost, 0.123, Some(1.0)), "$0.12 ($1.00/h)");
    assert_eq!(format_metric(MetricUnit::Tokens, 1500.0, Some(25.9)), "1500 tok (25 tpm)");
    assert_eq!(format_metric(MetricUnit::Lines, 42.0, Some(3.0)), "42 lines");
}

#[test]
fn test_preview_renders_every_line() {
    let config = Config::default();
    let output = preview(
        &config,
        &RenderOverrides {
            display_mode: None,
            no_color: true,
        },
    );

    assert_eq!(output.lines().count(), 3);
    assert!(output.contains("my-project"));
    assert!(output.contains("72%"));
}
