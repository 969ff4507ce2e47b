//! Smooth scrolling for in-page anchor links.

use std::borrow::Cow;

/// Element id named by an in-page `href` (`#section` → `section`).
///
/// Returns `None` for links that leave the page and for a bare `#`.
pub fn fragment_target(href: &str) -> Option<Cow<'_, str>> {
    let fragment = href.strip_prefix('#')?;
    if fragment.is_empty() {
        return None;
    }
    Some(urlencoding::decode(fragment).unwrap_or(Cow::Borrowed(fragment)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    Scrolled,
    /// No such element; the click is eaten without effect
    Swallowed,
}

/// Resolve the anchor and scroll to it if the target exists. The caller has
/// already cancelled the default jump.
pub fn scroll_to_anchor<T>(
    href: &str,
    find: impl FnOnce(&str) -> Option<T>,
    scroll: impl FnOnce(&T),
) -> ScrollOutcome {
    match fragment_target(href).and_then(|id| find(&id)) {
        Some(target) => {
            scroll(&target);
            ScrollOutcome::Scrolled
        }
        None => {
            tracing::trace!("Anchor {} has no target", href);
            ScrollOutcome::Swallowed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_fragment_target() {
        assert_eq!(fragment_target("#menu").as_deref(), Some("menu"));
        assert_eq!(fragment_target("#meal%20plan").as_deref(), Some("meal plan"));
        assert_eq!(fragment_target("#"), None);
        assert_eq!(fragment_target("/page#menu"), None);
    }

    #[test]
    fn test_scrolls_existing_target() {
        let scrolled = Cell::new(None);
        let outcome = scroll_to_anchor(
            "#contact",
            |id| (id == "contact").then_some(7),
            |t| scrolled.set(Some(*t)),
        );
        assert_eq!(outcome, ScrollOutcome::Scrolled);
        assert_eq!(scrolled.get(), Some(7));
    }

    #[test]
    fn test_missing_target_is_swallowed() {
        let scrolled = Cell::new(false);
        let outcome = scroll_to_anchor("#nowhere", |_| None::<()>, |_| scrolled.set(true));
        assert_eq!(outcome, ScrollOutcome::Swallowed);
        assert!(!scrolled.get());
    }

    #[test]
    fn test_bare_hash_never_looks_up() {
        let looked = Cell::new(false);
        let outcome = scroll_to_anchor(
            "#",
            |_| {
                looked.set(true);
                Some(())
            },
            |_| {},
        );
        assert_eq!(outcome, ScrollOutcome::Swallowed);
        assert!(!looked.get());
    }
}
