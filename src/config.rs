//! Page-level configuration, optionally passed to `start_greeting` as JSON.
//! Every section and key falls back to the values the greeting ships with.

use serde::{Deserialize, Serialize};

use crate::balloon::BalloonOptions;
use crate::confetti::ConfettiOptions;
use crate::error::GreetingError;
use crate::sequence::{OperateLabel, StepTimings};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingConfig {
    pub selectors: Selectors,
    pub assets: Assets,
    pub labels: Labels,
    pub timings: StepTimings,
    pub confetti: ConfettiOptions,
    pub balloons: BalloonOptions,
    /// Viewports narrower than this skip the welcome step.
    pub compact_below: f64,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            assets: Assets::default(),
            labels: Labels::default(),
            timings: StepTimings::default(),
            confetti: ConfettiOptions { max: 256, clock: 16.0, rotate: true, ..ConfettiOptions::default() },
            balloons: BalloonOptions::default(),
            compact_below: 500.0,
        }
    }
}

impl GreetingConfig {
    /// Parse `json`; `None` or a blank string yields the defaults.
    pub fn from_json(json: Option<&str>) -> Result<Self, GreetingError> {
        match json.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(text) => Ok(serde_json::from_str(text)?),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub confetti_canvas: String,
    pub card: String,
    pub cake_container: String,
    pub gift_box_wrapper: String,
    pub gift_box: String,
    pub cake_wrapper: String,
    pub operate: String,
    pub arrows: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            confetti_canvas: "#container".into(),
            card: ".card".into(),
            cake_container: ".card-face.cake".into(),
            gift_box_wrapper: ".gift-box-wrapper".into(),
            gift_box: ".gift-box".into(),
            cake_wrapper: ".cake-wrapper".into(),
            operate: ".cake-operate".into(),
            arrows: ".arrows".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assets {
    pub cake_image: String,
    pub music: String,
    pub cake_tint: String,
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            cake_image: "assets/images/cake.svg".into(),
            music: "assets/music/happy-birthday.mp3".into(),
            cake_tint: "#e05b7b".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub open_gift: String,
    pub make_wish: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self { open_gift: "Open the gift".into(), make_wish: "Make a wish, blow out the candles".into() }
    }
}

impl Labels {
    pub fn text(&self, label: OperateLabel) -> &str {
        match label {
            OperateLabel::OpenGift => &self.open_gift,
            OperateLabel::MakeWish => &self.make_wish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_blank_json_gives_defaults() {
        assert_eq!(GreetingConfig::from_json(None).unwrap(), GreetingConfig::default());
        assert_eq!(GreetingConfig::from_json(Some("  ")).unwrap(), GreetingConfig::default());
        assert_eq!(GreetingConfig::from_json(Some("{}")).unwrap(), GreetingConfig::default());
    }

    #[test]
    fn test_page_confetti_defaults() {
        let cfg = GreetingConfig::default();
        assert_eq!(cfg.confetti.max, 256);
        assert_eq!(cfg.confetti.clock, 16.0);
        assert!(cfg.confetti.rotate);
    }

    #[test]
    fn test_partial_sections_merge_with_defaults() {
        let cfg = GreetingConfig::from_json(Some(
            r#"{"balloons": {"floor": 4}, "labels": {"make_wish": "Wish!"}, "timings": {"reveal_ms": 10}}"#,
        ))
        .unwrap();
        assert_eq!(cfg.balloons.floor, 4);
        assert_eq!(cfg.balloons.total, 48);
        assert_eq!(cfg.labels.text(OperateLabel::MakeWish), "Wish!");
        assert_eq!(cfg.labels.text(OperateLabel::OpenGift), "Open the gift");
        assert_eq!(cfg.timings.reveal_ms, 10);
        assert_eq!(cfg.timings.advance_ms, [2000, 2000, 1000, 7000]);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = GreetingConfig::from_json(Some("{\"confetti\": {\"max\": -1}}")).unwrap_err();
        assert!(matches!(err, GreetingError::Config(_)));
    }
}
