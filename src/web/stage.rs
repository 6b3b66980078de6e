//! DOM regions of the greeting card and how each [`Effect`] projects onto them.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlAudioElement, HtmlElement, HtmlImageElement};

use super::{log_refused_playback, play_media, query};
use crate::config::GreetingConfig;
use crate::error::GreetingError;
use crate::sequence::{Effect, Step};

pub struct Stage {
    pub card: Element,
    pub cake_container: Element,
    pub gift_box_wrapper: HtmlElement,
    pub gift_box: Element,
    pub cake_wrapper: HtmlElement,
    pub operate: HtmlElement,
    pub arrows: Vec<HtmlElement>,
    pub cake: HtmlImageElement,
    pub music: HtmlAudioElement,
    music_refused: Closure<dyn FnMut(JsValue)>,
    config: GreetingConfig,
}

fn html(el: Element, selector: &str) -> Result<HtmlElement, GreetingError> {
    el.dyn_into().map_err(|_| GreetingError::NotAnHtmlElement(selector.to_owned()))
}

fn set_display(el: &HtmlElement, value: &str) {
    el.style().set_property("display", value).ok();
}

impl Stage {
    pub fn find(doc: &Document, config: &GreetingConfig) -> Result<Self, GreetingError> {
        let sel = &config.selectors;
        let arrows_list = doc.query_selector_all(&sel.arrows)?;
        let mut arrows = Vec::new();
        for i in 0..arrows_list.length() {
            if let Some(node) = arrows_list.item(i) {
                if let Ok(el) = node.dyn_into::<HtmlElement>() {
                    arrows.push(el);
                }
            }
        }

        let cake: HtmlImageElement = doc
            .create_element("img")?
            .dyn_into()
            .map_err(|_| GreetingError::Js("img element".into()))?;
        cake.set_class_name("cake-image");
        cake.style().set_property("cursor", "pointer").ok();

        let music = HtmlAudioElement::new_with_src(&config.assets.music)?;
        music.set_loop(true);

        Ok(Self {
            card: query(doc, &sel.card)?,
            cake_container: query(doc, &sel.cake_container)?,
            gift_box_wrapper: html(query(doc, &sel.gift_box_wrapper)?, &sel.gift_box_wrapper)?,
            gift_box: query(doc, &sel.gift_box)?,
            cake_wrapper: html(query(doc, &sel.cake_wrapper)?, &sel.cake_wrapper)?,
            operate: html(query(doc, &sel.operate)?, &sel.operate)?,
            arrows,
            cake,
            music,
            music_refused: log_refused_playback("music"),
            config: config.clone(),
        })
    }

    /// Cake image finished loading: put it on the plate.
    pub fn cake_loaded(&self) {
        if self.cake.parent_node().is_none() {
            self.cake_wrapper.append_child(&self.cake).ok();
        }
        set_display(&self.cake_wrapper, "flex");
    }

    fn set_step_class(&self, step: Step) {
        let classes = self.cake_container.class_list();
        for other in Step::ALL.iter().filter(|s| **s != step) {
            classes.remove_1(&other.class_name()).ok();
        }
        classes.add_1(&step.class_name()).ok();
    }

    /// Apply a DOM-only effect. Scheduling and launches are handled by the caller.
    pub fn apply(&self, effect: &Effect) {
        match effect {
            Effect::PlayMusic => {
                // Refused until the first user gesture; the next step retries.
                if self.music.paused() {
                    play_media(&self.music, &self.music_refused);
                }
            }
            Effect::ShowOperate(show) => set_display(&self.operate, if *show { "block" } else { "none" }),
            Effect::OperateLabel(label) => self.operate.set_inner_text(self.config.labels.text(*label)),
            Effect::ShowGiftBox(show) => set_display(&self.gift_box_wrapper, if *show { "block" } else { "none" }),
            Effect::ShowCakeWrapper(show) => set_display(&self.cake_wrapper, if *show { "flex" } else { "none" }),
            Effect::TintCakeWrapper => {
                self.cake_wrapper.style().set_property("background-color", &self.config.assets.cake_tint).ok();
            }
            Effect::ServeCake => self.cake.set_src(&self.config.assets.cake_image),
            Effect::Blow(on) => {
                let classes = self.cake_wrapper.class_list();
                if *on { classes.add_1("blow").ok() } else { classes.remove_1("blow").ok() };
            }
            Effect::ShowArrows => self.arrows.iter().for_each(|el| set_display(el, "block")),
            Effect::FlipCard => {
                self.card.class_list().toggle("reversal").ok();
            }
            Effect::StepClass(step) => self.set_step_class(*step),
            Effect::LaunchBalloons | Effect::LaunchConfetti | Effect::Schedule { .. } => {
                log::warn!("stage cannot apply {:?}", effect);
            }
        }
    }
}
