//! Alt+letter navigation table.
//!
//! Keys are lowercase ASCII letters. The same table drives dispatch and the
//! badges shown next to sidebar links.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Navigate(&'static str),
    ToggleSidebar,
}

/// How long a starter waits for its second key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceWindow {
    Default,
    /// Short window so a lone Alt+S reaches the supplier list quickly
    Supplier,
}

#[derive(Clone, Copy, Debug)]
pub struct Starter {
    pub key: char,
    pub window: SequenceWindow,
    /// Fired when the window runs out without a second key
    pub on_expiry: Option<Action>,
}

/// Single-key shortcuts that act immediately
pub const DIRECT: &[(char, Action)] = &[
    ('q', Action::ToggleSidebar),
    ('c', Action::Navigate("/customers/")),
    ('l', Action::Navigate("/logout/")),
    ('d', Action::Navigate("/")),
    ('i', Action::Navigate("/inventory")),
];

pub const STARTERS: &[Starter] = &[
    Starter { key: 'p', window: SequenceWindow::Default, on_expiry: None },
    Starter {
        key: 's',
        window: SequenceWindow::Supplier,
        on_expiry: Some(Action::Navigate("/suppliers/")),
    },
    Starter { key: 'b', window: SequenceWindow::Default, on_expiry: None },
    Starter { key: 'e', window: SequenceWindow::Default, on_expiry: None },
    Starter { key: 'r', window: SequenceWindow::Default, on_expiry: None },
    Starter { key: 'f', window: SequenceWindow::Default, on_expiry: None },
    Starter { key: 'a', window: SequenceWindow::Default, on_expiry: None },
];

/// `(starter, second key, path)`
pub const ROUTES: &[(char, char, &str)] = &[
    ('p', 'i', "/invoices/"),
    ('p', 'n', "/invoices/add-with-products/"),
    ('p', 'l', "/products/"),
    ('p', 'r', "/purchase-returns/"),
    ('p', 'd', "/pharmacy-details/"),
    ('s', 'i', "/sales"),
    ('s', 'n', "/sales/add-with-products/"),
    ('s', 'r', "/sales-returns"),
    ('s', 'p', "/receipts/"),
    ('b', 'i', "/reports/inventory/batch/"),
    ('b', 'r', "/rates/"),
    ('e', 'i', "/reports/inventory/expiry/"),
    ('r', 's', "/reports/sales/"),
    ('r', 'p', "/reports/purchase/"),
    ('r', 'f', "/reports/financial/"),
    ('f', 'p', "/payments/"),
    ('a', 'd', "/register/"),
];

pub fn direct(key: char) -> Option<Action> {
    DIRECT.iter().find(|(k, _)| *k == key).map(|(_, a)| *a)
}

pub fn starter(key: char) -> Option<&'static Starter> {
    STARTERS.iter().find(|s| s.key == key)
}

pub fn route(starter: char, key: char) -> Option<&'static str> {
    ROUTES
        .iter()
        .find(|(s, k, _)| *s == starter && *k == key)
        .map(|(_, _, path)| *path)
}

/// Letter of an Alt shortcut from `KeyboardEvent.key`, falling back to
/// `KeyboardEvent.code` for layouts where Alt produces another character.
pub fn normalize_key(key: &str, code: &str) -> Option<char> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(c.to_ascii_lowercase());
        }
    }
    let letter = code.strip_prefix("Key")?;
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}

fn same_path(a: &str, b: &str) -> bool {
    let trim = |p: &str| p.trim_end_matches('/').to_string();
    trim(a) == trim(b) && !(a.is_empty() || b.is_empty())
}

/// Shortcut label for a link target, e.g. "/reports/sales/" -> "Alt+R+S"
pub fn shortcut_for_path(path: &str) -> Option<String> {
    if let Some((key, _)) = DIRECT
        .iter()
        .find(|(_, a)| matches!(a, Action::Navigate(p) if same_path(p, path)))
    {
        return Some(format!("Alt+{}", key.to_ascii_uppercase()));
    }
    if let Some(s) = STARTERS.iter().find(
        |s| matches!(s.on_expiry, Some(Action::Navigate(p)) if same_path(p, path)),
    ) {
        return Some(format!("Alt+{}", s.key.to_ascii_uppercase()));
    }
    ROUTES
        .iter()
        .find(|(_, _, p)| same_path(p, path))
        .map(|(s, k, _)| format!("Alt+{}+{}", s.to_ascii_uppercase(), k.to_ascii_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_reference_known_starters() {
        for (s, _, _) in ROUTES {
            assert!(starter(*s).is_some(), "route starter {} missing", s);
        }
    }

    #[test]
    fn test_no_duplicate_routes() {
        for (i, (s, k, _)) in ROUTES.iter().enumerate() {
            assert!(
                !ROUTES[i + 1..].iter().any(|(s2, k2, _)| s2 == s && k2 == k),
                "duplicate route {}+{}",
                s,
                k
            );
        }
    }

    #[test]
    fn test_no_key_is_both_direct_and_starter() {
        for (k, _) in DIRECT {
            assert!(starter(*k).is_none());
        }
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("P", "KeyP"), Some('p'));
        assert_eq!(normalize_key("π", "KeyP"), Some('p'));
        assert_eq!(normalize_key("Alt", "AltLeft"), None);
        assert_eq!(normalize_key("1", "Digit1"), None);
    }

    #[test]
    fn test_shortcut_labels() {
        assert_eq!(shortcut_for_path("/customers/").as_deref(), Some("Alt+C"));
        assert_eq!(shortcut_for_path("/suppliers").as_deref(), Some("Alt+S"));
        assert_eq!(shortcut_for_path("/reports/sales/").as_deref(), Some("Alt+R+S"));
        assert_eq!(shortcut_for_path("/sales/").as_deref(), Some("Alt+S+I"));
        assert_eq!(shortcut_for_path("/").as_deref(), Some("Alt+D"));
        assert_eq!(shortcut_for_path("/unknown/"), None);
    }
}
