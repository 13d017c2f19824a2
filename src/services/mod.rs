mod busy;
mod cookies;
mod error_handling;
mod http_client;
mod notifier;
mod validation;

use std::rc::Rc;

pub use busy::{BusyControl, BusyGuard};
pub use cookies::{CookieSource, StaticCookies, read_cookie};
pub use error_handling::{LogHelper, StorefrontError, UserErrorFormatter};
pub use http_client::{ApiClient, HttpClient, PostRequest, ReqwestClient};
pub use notifier::{NotificationSurface, Notifier, Scheduler};
pub use validation::InputValidator;

use crate::config::StorefrontConfig;

/// Shared request and notification plumbing handed to every controller.
#[derive(Clone)]
pub struct Services {
    pub api: Rc<ApiClient>,
    pub notifier: Rc<Notifier>,
    pub config: Rc<StorefrontConfig>,
}

impl Services {
    pub fn new(api: Rc<ApiClient>, notifier: Rc<Notifier>, config: Rc<StorefrontConfig>) -> Self {
        Self { api, notifier, config }
    }

    /// Same transport and config, different notification surface.
    pub fn with_notifier(&self, notifier: Rc<Notifier>) -> Self {
        Self {
            api: Rc::clone(&self.api),
            notifier,
            config: Rc::clone(&self.config),
        }
    }
}
