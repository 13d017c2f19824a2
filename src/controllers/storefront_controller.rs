use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, error, info};

use crate::domain::{ActionKind, ProductId};
use crate::domain::response::CartCount;
use crate::services::{BusyControl, BusyGuard, LogHelper, Services, StorefrontError, UserErrorFormatter};

/// Site-wide elements: navigation, cart badges, enhancement widgets.
pub trait StorefrontView {
    fn show_cart_count(&self, count: u32);
    fn current_path(&self) -> String;
    /// `href` of every navigation link, in document order.
    fn nav_link_targets(&self) -> Vec<String>;
    fn mark_nav_link_active(&self, index: usize);
    fn toggle_mobile_menu(&self);
    /// Attach tooltip/popover widgets; returns how many were attached.
    fn enhance_widgets(&self) -> Result<usize, StorefrontError>;
}

/// How a submitted form completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    /// The browser navigates; completion is the page going away.
    Navigation,
    /// A controller posts the form itself and owns the busy state.
    Scripted,
    /// The response opens in another browsing context; this page stays.
    Detached,
    /// A handler called `preventDefault`; nothing was sent.
    Cancelled,
}

/// What is known about a form once its submit event has finished
/// dispatching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    pub role: Option<ActionKind>,
    /// `data-async` on the form
    pub is_async: bool,
    /// Submitter `formtarget`, else the form `target`
    pub target: Option<String>,
    pub default_prevented: bool,
}

impl SubmissionKind {
    pub fn classify(submission: &FormSubmission) -> Self {
        if submission.default_prevented {
            return Self::Cancelled;
        }
        if submission.is_async || submission.role.is_some_and(ActionKind::handles_form_submit) {
            return Self::Scripted;
        }

        let target = submission.target.as_deref().map(str::trim).unwrap_or("");
        if target.is_empty() || ["_self", "_top", "_parent"].contains(&target.to_ascii_lowercase().as_str()) {
            Self::Navigation
        } else {
            Self::Detached
        }
    }
}

pub struct StorefrontController<V: StorefrontView> {
    services: Services,
    view: V,
    held_submissions: Rc<RefCell<HashMap<u64, BusyGuard>>>,
    next_submission: Cell<u64>,
}

impl<V: StorefrontView> StorefrontController<V> {
    pub fn new(services: Services, view: V) -> Self {
        Self {
            services,
            view,
            held_submissions: Rc::new(RefCell::new(HashMap::new())),
            next_submission: Cell::new(0),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// One-time page setup: active nav link and widgets.
    pub fn init(&self) {
        self.highlight_active_link();
        match self.view.enhance_widgets() {
            Ok(count) => debug!(count, "Widgets initialized"),
            Err(err) => error!(error = %err, "Widget initialization failed"),
        }
    }

    /// Add a product to the cart from any add-to-cart control. The control
    /// is busy until the request settles, whatever the outcome.
    pub async fn handle_add_to_cart(
        &self,
        product_id: Option<ProductId>,
        control: Rc<dyn BusyControl>,
    ) -> Result<u32, StorefrontError> {
        let Some(product_id) = product_id.filter(|id| !id.as_str().is_empty()) else {
            error!("Add-to-cart control has no product id");
            return Err(StorefrontError::MissingElement("data-product-id".into()));
        };

        let result = {
            let _busy = BusyGuard::acquire(control, Some(&self.services.config.labels.adding));
            self.services
                .api
                .post::<CartCount>(&self.services.config.endpoints.add_to_cart(&product_id), None)
                .await
        };
        LogHelper::log_request_outcome("add_to_cart", product_id.as_str(), result.as_ref().map(|_| ()));

        match result {
            Ok(CartCount { cart_count }) => {
                self.services.notifier.success("Product added to cart!");
                self.view.show_cart_count(cart_count);
                Ok(cart_count)
            }
            Err(err) => {
                self.services
                    .notifier
                    .error(UserErrorFormatter::message_for(&err, "Error adding product to cart"));
                Err(err)
            }
        }
    }

    /// Put a form's submit control into the busy state while the page
    /// navigates away. Released when the page is restored or when the
    /// configured fallback elapses, whichever comes first.
    pub fn handle_form_submit(&self, kind: SubmissionKind, submit_control: Option<Rc<dyn BusyControl>>) {
        let Some(control) = submit_control else {
            return;
        };
        if kind != SubmissionKind::Navigation {
            debug!(kind = ?kind, "Form submission keeps its control");
            return;
        }

        let id = self.next_submission.get();
        self.next_submission.set(id + 1);

        let guard = BusyGuard::acquire(control, Some(&self.services.config.labels.processing));
        self.held_submissions.borrow_mut().insert(id, guard);

        if let Some(delay) = self.services.config.form_submit_fallback() {
            let held = Rc::clone(&self.held_submissions);
            self.services.notifier.scheduler().schedule(
                delay,
                Box::new(move || {
                    let released = held.borrow_mut().remove(&id);
                    if released.is_some() {
                        debug!(submission = id, "Form submit fallback released");
                    }
                }),
            );
        }
    }

    /// The page came back from the back/forward cache: every submission
    /// that was navigating is over.
    pub fn page_restored(&self) {
        let released: Vec<BusyGuard> = self
            .held_submissions
            .borrow_mut()
            .drain()
            .map(|(_, guard)| guard)
            .collect();
        if !released.is_empty() {
            info!(count = released.len(), "Released form submissions after page restore");
        }
    }

    pub fn pending_submissions(&self) -> usize {
        self.held_submissions.borrow().len()
    }

    pub fn toggle_mobile_menu(&self) {
        self.view.toggle_mobile_menu();
    }

    fn highlight_active_link(&self) {
        let current = self.view.current_path();
        for (index, target) in self.view.nav_link_targets().iter().enumerate() {
            if *target == current {
                self.view.mark_nav_link_active(index);
            }
        }
    }
}
