#![cfg(feature = "serde")]

use rat_carousel::CarouselConfig;
use std::time::Duration;

#[test]
fn test_serde_config() {
    let cfg = CarouselConfig::new().auto_scroll(true).interval_ms(2500);
    let json = serde_json::to_string(&cfg).expect("json");
    assert!(json.contains("\"auto_scroll_interval\":2500"));

    let back: CarouselConfig = serde_json::from_str(&json).expect("json");
    assert_eq!(back, cfg);
}

#[test]
fn test_serde_defaults() {
    let cfg: CarouselConfig = serde_json::from_str(r#"{"auto_scroll":true}"#).expect("json");
    assert!(cfg.auto_scroll);
    assert!(cfg.show_indicators);
    assert_eq!(cfg.auto_scroll_interval, Duration::from_millis(3000));
}
