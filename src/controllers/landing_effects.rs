use std::rc::Rc;
use std::time::Duration;

use crate::domain::effects::{HoverPhase, StyleFrame, entrance_plan};
use crate::services::Scheduler;

/// Cards on the landing page, addressed by document order.
pub trait EffectsView {
    fn card_count(&self) -> usize;
    fn apply_style(&self, index: usize, frame: &StyleFrame);
}

pub struct LandingPageEffects<V: EffectsView + 'static> {
    view: Rc<V>,
    scheduler: Rc<dyn Scheduler>,
    step: Duration,
}

impl<V: EffectsView + 'static> LandingPageEffects<V> {
    pub fn new(view: Rc<V>, scheduler: Rc<dyn Scheduler>, step: Duration) -> Self {
        Self { view, scheduler, step }
    }

    /// Hide every card, then reveal them one after another.
    pub fn run_entrance(&self) {
        for step in entrance_plan(self.view.card_count(), self.step) {
            self.view.apply_style(step.index, &step.hidden);

            let view = Rc::clone(&self.view);
            self.scheduler.schedule(
                step.delay,
                Box::new(move || view.apply_style(step.index, &step.shown)),
            );
        }
    }

    pub fn hover(&self, index: usize, phase: HoverPhase) {
        self.view.apply_style(index, &phase.frame());
    }
}
