/// One-shot banner chosen by the `notice` query parameter after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Registered,
    LoggedOut,
    ItemAdded,
    ItemUpdated,
    ItemDeleted,
}

impl Notice {
    /// The query-string code for this notice.
    pub fn code(self) -> &'static str {
        match self {
            Notice::Registered => "registered",
            Notice::LoggedOut => "logged-out",
            Notice::ItemAdded => "item-added",
            Notice::ItemUpdated => "item-updated",
            Notice::ItemDeleted => "item-deleted",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::Registered => "Registration successful! Please log in.",
            Notice::LoggedOut => "You have been logged out.",
            Notice::ItemAdded => "Item added successfully!",
            Notice::ItemUpdated => "Item updated successfully!",
            Notice::ItemDeleted => "Item deleted successfully!",
        }
    }

    /// `path` with this notice attached as a query parameter.
    pub fn redirect_to(self, path: &str) -> String {
        format!("{path}?notice={}", self.code())
    }

    /// Look up a notice by code. Unknown codes show nothing.
    pub fn from_code(code: &str) -> Option<Self> {
        [
            Notice::Registered,
            Notice::LoggedOut,
            Notice::ItemAdded,
            Notice::ItemUpdated,
            Notice::ItemDeleted,
        ]
        .into_iter()
        .find(|n| n.code() == code)
    }
}
