//! End-to-end renders: template JSON plus a fact snapshot in, text out.

use tidings_render::{render, ColorChoice, InfoId, InfoStore, RenderOptions, TemplateConfig};

fn plain() -> RenderOptions {
    RenderOptions {
        color: ColorChoice::Never,
    }
}

fn store() -> InfoStore {
    let mut s = InfoStore::new();
    s.push(InfoId::GeneralGreeting, "Welcome back");
    s.push(InfoId::SystemHostName, "orion");
    s.push(InfoId::SystemKernelRelease, "6.8.0-41");
    s.push(InfoId::NetworkInfoIp, "10.0.0.1");
    s.push(InfoId::NetworkInfoIp, "192.168.1.4");
    s.push(InfoId::WeatherWeather, "Sunny 72F");
    s
}

#[test]
fn full_width_optional_item_renders_one_line() {
    let config = TemplateConfig::from_json(
        r#"{
        "columns": ["ENTIRE_LINE"],
        "items": [{"column": "ENTIRE_LINE", "row_index": 0,
                   "value": ["%ID_WEATHER_WEATHER%"], "is_optional": true}]
    }"#,
    )
    .unwrap();
    assert_eq!(render(&config, &store(), &plain()).unwrap(), "Sunny 72F\n");
}

#[test]
fn banner_facts_and_footer_compose() {
    let config = TemplateConfig::from_json(
        r#"{
        "columns": ["ENTIRE_LINE", 0],
        "items": [
            {"column": "ENTIRE_LINE", "row_index": 0,
             "value": ["%ID_GENERAL_GREETING%"], "append_newlines": 2},
            {"column": 0, "row_index": 10,
             "name": ["Host"], "value": ["%ID_SYSTEM_HOST_NAME%"]},
            {"column": 0, "row_index": 11,
             "name": ["Kernel"], "value": ["%ID_SYSTEM_KERNEL_RELEASE%"]},
            {"column": "ENTIRE_LINE", "row_index": 90,
             "value": ["%ID_WEATHER_WEATHER%"], "is_optional": true,
             "prepend_newlines": 1}
        ]
    }"#,
    )
    .unwrap();

    let expected = concat!(
        "Welcome back\n",
        "\n",
        "  Host   orion\n",
        "  Kernel 6.8.0-41\n",
        "\n",
        "Sunny 72F\n",
    );
    assert_eq!(render(&config, &store(), &plain()).unwrap(), expected);
}

#[test]
fn repeatable_item_renders_one_row_per_entry() {
    let config = TemplateConfig::from_json(
        r#"{
        "columns": [0],
        "items": [
            {"column": 0, "row_index": 0, "name": ["IP"],
             "value": ["%ID_NETWORK_INFO_IP%"], "is_repeatable": true}
        ]
    }"#,
    )
    .unwrap();
    assert_eq!(
        render(&config, &store(), &plain()).unwrap(),
        "  IP 10.0.0.1\n  IP 192.168.1.4\n"
    );
}

#[test]
fn missing_optional_rows_close_the_gap() {
    let config = TemplateConfig::from_json(
        r#"{
        "columns": [0],
        "items": [
            {"column": 0, "row_index": 0, "name": ["Host"],
             "value": ["%ID_SYSTEM_HOST_NAME%"]},
            {"column": 0, "row_index": 5, "name": ["Fortune"],
             "value": ["%ID_FORTUNE_FORTUNE%"], "is_optional": true},
            {"column": 0, "row_index": 9, "name": ["Kernel"],
             "value": ["%ID_SYSTEM_KERNEL_RELEASE%"]}
        ]
    }"#,
    )
    .unwrap();
    assert_eq!(
        render(&config, &store(), &plain()).unwrap(),
        "  Host   orion\n  Kernel 6.8.0-41\n"
    );
}

#[test]
fn two_fact_columns_stay_aligned() {
    let config = TemplateConfig::from_json(
        r#"{
        "columns": [0, 1],
        "output_settings": {"collapse_column_rows": true},
        "items": [
            {"column": 0, "row_index": 0, "name": ["Host"],
             "value": ["%ID_SYSTEM_HOST_NAME%"]},
            {"column": 0, "row_index": 1, "name": ["Kernel"],
             "value": ["%ID_SYSTEM_KERNEL_RELEASE%"]},
            {"column": 1, "row_index": 0, "name": ["IP"],
             "value": ["%ID_NETWORK_INFO_IP%"]}
        ]
    }"#,
    )
    .unwrap();
    assert_eq!(
        render(&config, &store(), &plain()).unwrap(),
        "  Host   orion     IP 10.0.0.1\n  Kernel 6.8.0-41\n"
    );
}

#[test]
fn debug_color_mode_echoes_specs() {
    let config = TemplateConfig::from_json(
        r#"{
        "columns": ["ENTIRE_LINE"],
        "items": [{"column": "ENTIRE_LINE", "row_index": 0,
                   "value": ["%color:purple%%ID_SYSTEM_HOST_NAME%"]}]
    }"#,
    )
    .unwrap();
    let options = RenderOptions {
        color: ColorChoice::Debug,
    };
    assert_eq!(
        render(&config, &store(), &options).unwrap(),
        "[color:purple]orion\n"
    );
}

#[test]
fn always_color_mode_emits_ansi() {
    let config = TemplateConfig::from_json(
        r#"{
        "columns": ["ENTIRE_LINE"],
        "items": [{"column": "ENTIRE_LINE", "row_index": 0,
                   "value": ["%color:red%%ID_SYSTEM_HOST_NAME%"]}]
    }"#,
    )
    .unwrap();
    let options = RenderOptions {
        color: ColorChoice::Always,
    };
    let out = render(&config, &store(), &options).unwrap();
    assert!(out.contains("\x1b["));
    assert!(out.contains("orion"));
    assert_eq!(console::strip_ansi_codes(&out), "orion\n");
}

#[test]
fn built_in_template_renders_without_data() {
    let out = render(&TemplateConfig::default(), &InfoStore::new(), &plain()).unwrap();
    // required facts keep their labels, optional ones vanish
    assert!(out.contains("Host"));
    assert!(!out.contains("IP"));
    assert!(!out.contains('%'));
}

#[test]
fn built_in_template_renders_collected_facts() {
    let out = render(&TemplateConfig::default(), &store(), &plain()).unwrap();
    assert!(out.starts_with("Welcome back\n"));
    assert!(out.contains("orion"));
    assert!(out.contains("10.0.0.1"));
    assert!(out.contains("192.168.1.4"));
    assert!(out.contains("Sunny 72F"));
}
