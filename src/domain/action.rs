/// Role an element plays on a storefront page.
///
/// Markup marks roles either with a legacy class (`add-to-cart`) or with
/// `data-action="add-to-cart"`. The role is resolved once, when a control is
/// bound or an event is delegated, and everything downstream matches on the
/// variant instead of re-inspecting classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    AddToCart,
    RemoveItem,
    ClearCart,
    UpdateQuantity,
    UpdateStock,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::AddToCart,
        ActionKind::RemoveItem,
        ActionKind::ClearCart,
        ActionKind::UpdateQuantity,
        ActionKind::UpdateStock,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            ActionKind::AddToCart => "add-to-cart",
            ActionKind::RemoveItem => "remove-item",
            ActionKind::ClearCart => "clear-cart",
            ActionKind::UpdateQuantity => "quantity-input",
            ActionKind::UpdateStock => "stock-update-form",
        }
    }

    /// CSS selector matching every element carrying this role.
    pub fn selector(self) -> String {
        let marker = self.marker();
        match self {
            // The clear button is a singleton addressed by id
            ActionKind::ClearCart => format!("#clearCart, [data-action=\"{marker}\"]"),
            _ => format!(".{marker}, [data-action=\"{marker}\"]"),
        }
    }

    /// Resolve the role from an element's `data-action` value (preferred)
    /// or its class list.
    pub fn from_markup(data_action: Option<&str>, class_list: &str) -> Option<Self> {
        if let Some(action) = data_action.map(str::trim).filter(|a| !a.is_empty()) {
            return Self::ALL.into_iter().find(|kind| kind.marker() == action);
        }

        let classes: Vec<&str> = class_list.split_whitespace().collect();
        Self::ALL
            .into_iter()
            .find(|kind| classes.contains(&kind.marker()))
    }

    /// Forms with this role submit through a controller's own request
    /// instead of navigating.
    pub fn handles_form_submit(self) -> bool {
        matches!(self, ActionKind::UpdateStock)
    }
}
