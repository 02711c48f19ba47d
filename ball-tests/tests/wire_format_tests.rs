// Tests für die Namen, die nach außen gehen (MQTT Topics, WebSocket JSON)

use ball_core::{EffectKind, Topic};

fn json<T: serde::Serialize>(value: &T) -> String {
    let mut buffer = [0u8; 64];
    let n = serde_json_core::to_slice(value, &mut buffer).expect("fits into buffer");
    std::str::from_utf8(&buffer[..n]).unwrap().to_owned()
}

#[test]
fn test_topic_names_match_serialized_names() {
    for topic in [Topic::Triggered, Topic::Reset, Topic::FirstTriggered] {
        assert_eq!(json(&topic), format!("\"{}\"", topic.as_str()));
    }
}

#[test]
fn test_effect_kind_is_snake_case() {
    assert_eq!(json(&EffectKind::Off), "\"off\"");
    assert_eq!(json(&EffectKind::FlashAlternate), "\"flash_alternate\"");
    assert_eq!(json(&EffectKind::Breathe), "\"breathe\"");
}

#[test]
fn test_effect_kind_names_match_serialized_names() {
    for kind in [EffectKind::Off, EffectKind::FlashAlternate, EffectKind::Breathe] {
        assert_eq!(json(&kind), format!("\"{}\"", kind.as_str()));
    }
}
