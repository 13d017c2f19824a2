use std::cell::RefCell;
use std::collections::HashMap;
use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::domain::notification::{Notification, NotificationId};
use crate::services::NotificationSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceStyle {
    /// Inline alert strip at the top of the page content
    Alert,
    /// Fixed toast stack in the top right corner
    Toast,
}

pub struct WebNotificationSurface {
    document: Document,
    style: SurfaceStyle,
    rendered: RefCell<HashMap<NotificationId, Element>>,
}

impl WebNotificationSurface {
    pub fn new(document: Document, style: SurfaceStyle) -> Self {
        Self {
            document,
            style,
            rendered: RefCell::new(HashMap::new()),
        }
    }

    fn close_button(&self, class: &str, dismiss: &str) -> Result<Element, JsValue> {
        let button = self.document.create_element("button")?;
        button.set_attribute("type", "button")?;
        button.set_class_name(class);
        button.set_attribute("data-bs-dismiss", dismiss)?;
        Ok(button)
    }

    fn render(&self, notification: &Notification) -> Result<Element, JsValue> {
        let context = notification.severity.context_class();
        let element = self.document.create_element("div")?;

        match self.style {
            SurfaceStyle::Alert => {
                element.set_class_name(&format!("alert alert-{context} alert-dismissible fade show"));
                element.set_attribute("role", "alert")?;
                element.append_with_str_1(&notification.message)?;
                element.append_child(&self.close_button("btn-close", "alert")?)?;
            }
            SurfaceStyle::Toast => {
                element.set_class_name(&format!(
                    "toast show align-items-center text-white bg-{context} border-0"
                ));
                element.set_id(&format!("toast-{}", notification.id.0));

                let row = self.document.create_element("div")?;
                row.set_class_name("d-flex");
                let body = self.document.create_element("div")?;
                body.set_class_name("toast-body");
                body.set_text_content(Some(&notification.message));
                row.append_child(&body)?;
                row.append_child(&self.close_button("btn-close btn-close-white me-2 m-auto", "toast")?)?;
                element.append_child(&row)?;
            }
        }

        self.container()?.append_child(&element)?;
        Ok(element)
    }

    fn container(&self) -> Result<Element, JsValue> {
        match self.style {
            SurfaceStyle::Alert => self.alert_container(),
            SurfaceStyle::Toast => self.toast_container(),
        }
    }

    fn alert_container(&self) -> Result<Element, JsValue> {
        if let Some(existing) = self.document.query_selector(".messages")? {
            return Ok(existing);
        }

        let container = self.document.create_element("div")?;
        container.set_class_name("messages container mt-3");

        if let Some(fluid) = self.document.query_selector(".container-fluid")? {
            container.set_class_name("messages");
            fluid.insert_before(&container, fluid.first_child().as_ref())?;
        } else if let Some(nav) = self.document.query_selector("nav")? {
            nav.after_with_node_1(&container)?;
        } else {
            self.body()?.append_child(&container)?;
        }
        Ok(container)
    }

    fn toast_container(&self) -> Result<Element, JsValue> {
        if let Some(existing) = self.document.get_element_by_id("toastContainer") {
            return Ok(existing);
        }

        let container = self.document.create_element("div")?;
        container.set_id("toastContainer");
        container.set_class_name("toast-container position-fixed top-0 end-0 p-3");
        container.set_attribute("style", "z-index: 9999")?;
        self.body()?.append_child(&container)?;
        Ok(container)
    }

    fn body(&self) -> Result<Element, JsValue> {
        self.document
            .body()
            .map(Element::from)
            .ok_or_else(|| JsValue::from_str("document has no body"))
    }
}

impl NotificationSurface for WebNotificationSurface {
    fn show(&self, notification: &Notification) {
        match self.render(notification) {
            Ok(element) => {
                self.rendered.borrow_mut().insert(notification.id, element);
            }
            Err(err) => warn!(error = ?err, message = %notification.message, "Could not render notification"),
        }
    }

    fn dismiss(&self, id: NotificationId) {
        if let Some(element) = self.rendered.borrow_mut().remove(&id) {
            element.remove();
        }
    }
}
