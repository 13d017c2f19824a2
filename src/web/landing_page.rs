use std::rc::Rc;
use std::time::Duration;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use super::dom;
use crate::controllers::{EffectsView, LandingPageEffects};
use crate::domain::effects::{CARD_SELECTOR, HoverPhase, StyleFrame};
use crate::services::{Scheduler, StorefrontError};

pub struct WebEffectsView {
    cards: Vec<HtmlElement>,
}

impl EffectsView for WebEffectsView {
    fn card_count(&self) -> usize {
        self.cards.len()
    }

    fn apply_style(&self, index: usize, frame: &StyleFrame) {
        let Some(card) = self.cards.get(index) else {
            return;
        };
        let style = card.style();
        let mut result = style.set_property("transform", frame.transform);
        if let Some(opacity) = frame.opacity {
            result = result.and(style.set_property("opacity", opacity));
        }
        if let Some(transition) = frame.transition {
            result = result.and(style.set_property("transition", transition));
        }
        if let Err(err) = result {
            warn!(error = ?err, index, "Could not style card");
        }
    }
}

/// Hover and entrance effects for landing page cards.
pub fn mount(scheduler: Rc<dyn Scheduler>, step: Duration, document: &Document) -> Result<bool, StorefrontError> {
    let cards: Vec<HtmlElement> = dom::query_all(document, CARD_SELECTOR)
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect();
    if cards.is_empty() {
        return Ok(false);
    }

    let targets = cards.clone();
    let effects = Rc::new(LandingPageEffects::new(Rc::new(WebEffectsView { cards }), scheduler, step));

    for (index, card) in targets.iter().enumerate() {
        for (event, phase) in [("mouseenter", HoverPhase::Enter), ("mouseleave", HoverPhase::Leave)] {
            let effects = Rc::clone(&effects);
            dom::listen(card, event, move |_| effects.hover(index, phase))?;
        }
    }

    effects.run_entrance();
    Ok(true)
}
