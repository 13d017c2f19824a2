// Test helpers for integration testing
//
// In-memory stand-ins for the browser: a scripted HTTP transport, a manual
// clock, and views that record what the controllers wrote to them.

use async_trait::async_trait;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use crate::config::StorefrontConfig;
use crate::controllers::{CartView, EffectsView, InventoryView, StorefrontView};
use crate::domain::effects::StyleFrame;
use crate::domain::inventory::StockStatus;
use crate::domain::notification::{Notification, NotificationId, Severity};
use crate::domain::{CartLineId, ProductId};
use crate::services::{
    ApiClient, BusyControl, HttpClient, NotificationSurface, Notifier, PostRequest, Scheduler, Services,
    StaticCookies, StorefrontError,
};

pub const TEST_CSRF_TOKEN: &str = "test-token";

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct FakeHttp {
    responses: RefCell<VecDeque<Result<Value, StorefrontError>>>,
    requests: RefCell<Vec<PostRequest>>,
}

impl FakeHttp {
    pub fn respond(&self, body: Value) {
        self.responses.borrow_mut().push_back(Ok(body));
    }

    pub fn fail(&self, err: StorefrontError) {
        self.responses.borrow_mut().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<PostRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait(?Send)]
impl HttpClient for FakeHttp {
    async fn post_json(&self, request: PostRequest) -> Result<Value, StorefrontError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(StorefrontError::Transport("no response queued".into())))
    }
}

/// Collects scheduled tasks until the test advances time.
#[derive(Default)]
pub struct ManualScheduler {
    tasks: RefCell<Vec<(Duration, Box<dyn FnOnce()>)>>,
    delays: RefCell<Vec<Duration>>,
}

impl ManualScheduler {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Run every task due within `elapsed`, earliest first.
    pub fn advance(&self, elapsed: Duration) {
        let mut due: Vec<(Duration, Box<dyn FnOnce()>)> = {
            let mut tasks = self.tasks.borrow_mut();
            let (due, later) = tasks.drain(..).partition(|(delay, _)| *delay <= elapsed);
            *tasks = later;
            due
        };
        due.sort_by_key(|(delay, _)| *delay);
        for (_, task) in due {
            task();
        }
    }

    pub fn run_all(&self) {
        self.advance(Duration::MAX);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        self.delays.borrow_mut().push(delay);
        self.tasks.borrow_mut().push((delay, task));
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    shown: RefCell<Vec<Notification>>,
    dismissals: RefCell<Vec<NotificationId>>,
}

impl RecordingSurface {
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.borrow().clone()
    }

    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.shown
            .borrow()
            .iter()
            .map(|n| (n.severity, n.message.clone()))
            .collect()
    }

    pub fn last(&self) -> Option<(Severity, String)> {
        self.messages().pop()
    }

    pub fn dismissals(&self) -> Vec<NotificationId> {
        self.dismissals.borrow().clone()
    }

    /// Shown and not yet dismissed.
    pub fn visible(&self) -> usize {
        let dismissed: HashSet<NotificationId> = self.dismissals.borrow().iter().copied().collect();
        self.shown
            .borrow()
            .iter()
            .filter(|n| !dismissed.contains(&n.id))
            .count()
    }
}

impl NotificationSurface for RecordingSurface {
    fn show(&self, notification: &Notification) {
        self.shown.borrow_mut().push(notification.clone());
    }

    fn dismiss(&self, id: NotificationId) {
        self.dismissals.borrow_mut().push(id);
    }
}

/// A button or input with a label and a disabled flag.
pub struct FakeControl {
    label: RefCell<String>,
    disabled: Cell<bool>,
    disabled_history: RefCell<Vec<bool>>,
}

impl FakeControl {
    pub fn new(label: &str) -> Rc<Self> {
        Rc::new(Self {
            label: RefCell::new(label.to_string()),
            disabled: Cell::new(false),
            disabled_history: RefCell::new(Vec::new()),
        })
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    pub fn current_label(&self) -> String {
        self.label.borrow().clone()
    }

    /// Every value passed to `set_disabled`, in order.
    pub fn disabled_history(&self) -> Vec<bool> {
        self.disabled_history.borrow().clone()
    }
}

impl BusyControl for FakeControl {
    fn label(&self) -> String {
        self.current_label()
    }

    fn set_label(&self, label: &str) {
        *self.label.borrow_mut() = label.to_string();
    }

    fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
        self.disabled_history.borrow_mut().push(disabled);
    }
}

pub struct FakeCartView {
    pub confirm_answer: Cell<bool>,
    pub confirmations: RefCell<Vec<String>>,
    pub quantities: RefCell<HashMap<CartLineId, u32>>,
    pub controls: RefCell<HashMap<CartLineId, Rc<FakeControl>>>,
    pub removed: RefCell<Vec<CartLineId>>,
    pub totals: RefCell<Option<(String, String)>>,
    pub badge_count: Cell<Option<u32>>,
    pub reloads: Cell<usize>,
}

impl Default for FakeCartView {
    fn default() -> Self {
        Self {
            confirm_answer: Cell::new(true),
            confirmations: RefCell::default(),
            quantities: RefCell::default(),
            controls: RefCell::default(),
            removed: RefCell::default(),
            totals: RefCell::default(),
            badge_count: Cell::default(),
            reloads: Cell::default(),
        }
    }
}

impl FakeCartView {
    pub fn with_control(self, line: &CartLineId) -> Self {
        self.controls
            .borrow_mut()
            .insert(line.clone(), FakeControl::new(""));
        self
    }

    pub fn quantity(&self, line: &CartLineId) -> Option<u32> {
        self.quantities.borrow().get(line).copied()
    }

    pub fn control(&self, line: &CartLineId) -> Option<Rc<FakeControl>> {
        self.controls.borrow().get(line).cloned()
    }
}

impl CartView for FakeCartView {
    fn confirm(&self, message: &str) -> bool {
        self.confirmations.borrow_mut().push(message.to_string());
        self.confirm_answer.get()
    }

    fn show_quantity(&self, line: &CartLineId, quantity: u32) {
        self.quantities.borrow_mut().insert(line.clone(), quantity);
    }

    fn quantity_control(&self, line: &CartLineId) -> Option<Rc<dyn BusyControl>> {
        self.control(line).map(|c| c as Rc<dyn BusyControl>)
    }

    fn remove_line(&self, line: &CartLineId) {
        self.removed.borrow_mut().push(line.clone());
    }

    fn show_totals(&self, subtotal: &str, total: &str) {
        *self.totals.borrow_mut() = Some((subtotal.to_string(), total.to_string()));
    }

    fn show_cart_count(&self, count: u32) {
        self.badge_count.set(Some(count));
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}

#[derive(Default)]
pub struct FakeInventoryView {
    pub stock: RefCell<HashMap<ProductId, (u32, StockStatus)>>,
    pub visibility: RefCell<HashMap<ProductId, bool>>,
    pub visibility_writes: Cell<usize>,
    pub submit_controls: RefCell<HashMap<ProductId, Rc<FakeControl>>>,
}

impl FakeInventoryView {
    pub fn with_submit(self, product: &ProductId, label: &str) -> Self {
        self.submit_controls
            .borrow_mut()
            .insert(product.clone(), FakeControl::new(label));
        self
    }

    pub fn submit(&self, product: &ProductId) -> Option<Rc<FakeControl>> {
        self.submit_controls.borrow().get(product).cloned()
    }

    pub fn visible(&self, product: &ProductId) -> Option<bool> {
        self.visibility.borrow().get(product).copied()
    }
}

impl InventoryView for FakeInventoryView {
    fn show_stock(&self, product: &ProductId, stock: u32, status: StockStatus) {
        self.stock.borrow_mut().insert(product.clone(), (stock, status));
    }

    fn set_row_visible(&self, product: &ProductId, visible: bool) {
        self.visibility.borrow_mut().insert(product.clone(), visible);
        self.visibility_writes.set(self.visibility_writes.get() + 1);
    }

    fn submit_control(&self, product: &ProductId) -> Option<Rc<dyn BusyControl>> {
        self.submit(product).map(|c| c as Rc<dyn BusyControl>)
    }
}

/// A page with `badges` cart-count badges and the given navigation links.
pub struct FakeStorefrontView {
    pub badges: RefCell<Vec<Option<u32>>>,
    pub path: String,
    pub links: Vec<String>,
    pub active_links: RefCell<Vec<usize>>,
    pub menu_open: Cell<bool>,
    pub widgets: Result<usize, StorefrontError>,
}

impl FakeStorefrontView {
    pub fn new(badges: usize) -> Self {
        Self {
            badges: RefCell::new(vec![None; badges]),
            path: "/".into(),
            links: Vec::new(),
            active_links: RefCell::default(),
            menu_open: Cell::new(false),
            widgets: Ok(0),
        }
    }

    pub fn badge_values(&self) -> Vec<Option<u32>> {
        self.badges.borrow().clone()
    }
}

impl StorefrontView for FakeStorefrontView {
    fn show_cart_count(&self, count: u32) {
        for badge in self.badges.borrow_mut().iter_mut() {
            *badge = Some(count);
        }
    }

    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn nav_link_targets(&self) -> Vec<String> {
        self.links.clone()
    }

    fn mark_nav_link_active(&self, index: usize) {
        self.active_links.borrow_mut().push(index);
    }

    fn toggle_mobile_menu(&self) {
        self.menu_open.set(!self.menu_open.get());
    }

    fn enhance_widgets(&self) -> Result<usize, StorefrontError> {
        self.widgets.clone()
    }
}

/// Records every frame applied to each card.
#[derive(Default)]
pub struct FakeEffectsView {
    pub cards: usize,
    pub frames: RefCell<Vec<(usize, StyleFrame)>>,
}

impl FakeEffectsView {
    pub fn with_cards(cards: usize) -> Self {
        Self {
            cards,
            frames: RefCell::default(),
        }
    }

    pub fn last_frame(&self, index: usize) -> Option<StyleFrame> {
        self.frames
            .borrow()
            .iter()
            .rev()
            .find(|(i, _)| *i == index)
            .map(|(_, frame)| frame.clone())
    }
}

impl EffectsView for FakeEffectsView {
    fn card_count(&self) -> usize {
        self.cards
    }

    fn apply_style(&self, index: usize, frame: &StyleFrame) {
        self.frames.borrow_mut().push((index, frame.clone()));
    }
}

/// Services wired to in-memory fakes, with handles to inspect them.
pub struct TestContext {
    pub http: Rc<FakeHttp>,
    pub scheduler: Rc<ManualScheduler>,
    pub surface: Rc<RecordingSurface>,
    pub config: Rc<StorefrontConfig>,
    pub services: Services,
}

impl TestContext {
    pub fn new_for_test() -> Self {
        Self::with_config(StorefrontConfig::default())
    }

    pub fn with_config(config: StorefrontConfig) -> Self {
        let http = Rc::new(FakeHttp::default());
        let scheduler = Rc::new(ManualScheduler::default());
        let surface = Rc::new(RecordingSurface::default());
        let config = Rc::new(config);

        let cookies = StaticCookies(Some(format!("sessionid=s1; {}={TEST_CSRF_TOKEN}", config.csrf_cookie_name)));
        let api = Rc::new(ApiClient::new(
            http.clone(),
            Rc::new(cookies),
            config.csrf_cookie_name.clone(),
        ));
        let notifier = Rc::new(Notifier::new(
            surface.clone(),
            scheduler.clone(),
            config.notification_timeout(),
        ));
        let services = Services::new(api, notifier, Rc::clone(&config));

        Self {
            http,
            scheduler,
            surface,
            config,
            services,
        }
    }
}
