//! Minimal element tree with selector resolution.
//!
//! Supports what the storefront markup needs: tag, `#id`, `.class` and
//! `[attr="value"]` compounds, descendant steps, text filters and leaf text
//! selectors. Combinators and pseudo-classes inside a CSS string never match.

use crate::driver::ElementSnapshot;
use crate::locator::{Locator, Selector};

/// What clicking an element does to the storefront
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Submit the login form
    Login,
    /// Close the error banner
    DismissError,
    /// Add a catalog item by id
    AddToCart(u32),
    /// Remove a catalog item by id
    RemoveFromCart(u32),
    /// Open the cart screen
    OpenCart,
    /// Cart → checkout step one
    Checkout,
    /// Cart → inventory
    ContinueShopping,
    /// Submit checkout information
    ContinueCheckout,
    /// Leave checkout step one (to cart) or step two (to inventory)
    CancelCheckout,
    /// Place the order
    Finish,
    /// Complete → inventory
    BackToProducts,
    /// Open the burger menu
    OpenMenu,
    /// Close the burger menu
    CloseMenu,
    /// Menu: all items
    AllItems,
    /// Menu: log out
    Logout,
    /// Menu: reset app state
    ResetAppState,
}

/// Form control bound to storefront state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
    FirstName,
    LastName,
    PostalCode,
    Sort,
}

/// A rendered element
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: &'static str,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub value: Option<String>,
    pub visible: bool,
    pub enabled: bool,
    pub on_click: Option<Action>,
    pub field: Option<Field>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            visible: true,
            enabled: true,
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn test_id(self, value: impl Into<String>) -> Self {
        self.attr("data-test", value)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn hidden_if(mut self, hidden: bool) -> Self {
        self.visible = !hidden;
        self
    }

    pub fn on_click(mut self, action: Action) -> Self {
        self.on_click = Some(action);
        self
    }

    pub fn bind(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Attribute lookup, with `id` and `class` served from their fields
    pub fn get_attr(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" => Some(self.classes.join(" ")),
            "value" => self.value.clone(),
            _ => self
                .attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
        }
    }

    /// DOM `textContent`: own text followed by every descendant's
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::TestId(v) => self.get_attr("data-test").as_deref() == Some(v.as_str()),
            Selector::Id(v) => self.id.as_deref() == Some(v.as_str()),
            Selector::Class(v) => self.classes.iter().any(|c| c == v),
            Selector::Text(v) => self.children.is_empty() && self.text.trim() == v,
            Selector::Css(css) => {
                Compound::parse(css).is_some_and(|compound| compound.matches(self))
            }
        }
    }

    /// Outline of the tree, used as the simulated "screenshot"
    pub fn outline(&self, depth: usize, out: &mut String) {
        if !self.visible {
            return;
        }
        out.push_str(&"  ".repeat(depth));
        out.push_str(self.tag);
        if let Some(id) = &self.id {
            out.push('#');
            out.push_str(id);
        }
        for class in &self.classes {
            out.push('.');
            out.push_str(class);
        }
        if let Some(test) = self.get_attr("data-test") {
            out.push_str(&format!("[data-test={test:?}]"));
        }
        if !self.text.is_empty() {
            out.push_str(&format!(" {:?}", self.text));
        }
        if let Some(value) = &self.value {
            out.push_str(&format!(" value={value:?}"));
        }
        out.push('\n');
        for child in &self.children {
            child.outline(depth + 1, out);
        }
    }
}

/// A match found while resolving a locator
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub element: &'a Element,
    /// Visible itself and through every ancestor
    pub visible: bool,
}

impl Match<'_> {
    pub fn snapshot(&self) -> ElementSnapshot {
        ElementSnapshot {
            text: self.element.text_content(),
            visible: self.visible,
            enabled: self.element.enabled,
            value: self.element.value.clone(),
        }
    }
}

/// Resolve a locator chain against `root`, returning matches in document order
pub fn resolve<'a>(root: &'a Element, locator: &Locator) -> Vec<Match<'a>> {
    let mut scope = vec![Match {
        element: root,
        visible: root.visible,
    }];
    for step in locator.steps() {
        let mut next: Vec<Match<'a>> = Vec::new();
        for parent in &scope {
            collect(parent.element, parent.visible, &step.selector, &mut next);
        }
        if !step.has_text.is_empty() {
            next.retain(|m| {
                let content = m.element.text_content();
                step.has_text.iter().all(|text| content.contains(text.as_str()))
            });
        }
        let mut seen: Vec<*const Element> = Vec::with_capacity(next.len());
        next.retain(|m| {
            let ptr: *const Element = m.element;
            if seen.contains(&ptr) {
                false
            } else {
                seen.push(ptr);
                true
            }
        });
        scope = next;
    }
    scope
}

fn collect<'a>(parent: &'a Element, visible: bool, selector: &Selector, out: &mut Vec<Match<'a>>) {
    for child in &parent.children {
        let child_visible = visible && child.visible;
        if child.matches(selector) {
            out.push(Match {
                element: child,
                visible: child_visible,
            });
        }
        collect(child, child_visible, selector, out);
    }
}

/// A parsed compound CSS selector
#[derive(Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn parse(css: &str) -> Option<Self> {
        let css = css.trim();
        if css.is_empty() {
            return None;
        }
        let mut out = Self::default();
        let mut rest = css;

        let tag_len = rest
            .find(|c: char| matches!(c, '#' | '.' | '['))
            .unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if tag != "*" {
                if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                    return None;
                }
                out.tag = Some(tag.to_ascii_lowercase());
            }
            rest = &rest[tag_len..];
        }

        while let Some(first) = rest.chars().next() {
            match first {
                '#' | '.' => {
                    let body = &rest[1..];
                    let len = body
                        .find(|c: char| matches!(c, '#' | '.' | '['))
                        .unwrap_or(body.len());
                    let name = &body[..len];
                    if name.is_empty() || name.contains(char::is_whitespace) {
                        return None;
                    }
                    if first == '#' {
                        out.id = Some(name.to_string());
                    } else {
                        out.classes.push(name.to_string());
                    }
                    rest = &body[len..];
                }
                '[' => {
                    let close = rest.find(']')?;
                    let inner = &rest[1..close];
                    match inner.split_once('=') {
                        Some((name, value)) => {
                            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                            out.attrs
                                .push((name.trim().to_string(), Some(value.to_string())));
                        }
                        None => out.attrs.push((inner.trim().to_string(), None)),
                    }
                    rest = &rest[close + 1..];
                }
                _ => return None,
            }
        }
        Some(out)
    }

    fn matches(&self, element: &Element) -> bool {
        self.tag.as_deref().map_or(true, |t| t == element.tag)
            && self
                .id
                .as_deref()
                .map_or(true, |id| element.id.as_deref() == Some(id))
            && self
                .classes
                .iter()
                .all(|c| element.classes.iter().any(|ec| ec == c))
            && self.attrs.iter().all(|(name, value)| {
                let actual = element.get_attr(name);
                match value {
                    Some(v) => actual.as_deref() == Some(v.as_str()),
                    None => actual.is_some(),
                }
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tree() -> Element {
        Element::new("html").child(
            Element::new("div")
                .class("inventory_list")
                .child(
                    Element::new("div")
                        .class("inventory_item")
                        .test_id("inventory-item")
                        .child(Element::new("div").class("inventory_item_name").text("Sauce Labs Backpack"))
                        .child(
                            Element::new("button")
                                .id("add-to-cart-sauce-labs-backpack")
                                .class("btn btn_inventory")
                                .text("Add to cart"),
                        ),
                )
                .child(
                    Element::new("div")
                        .class("inventory_item")
                        .test_id("inventory-item")
                        .child(Element::new("div").class("inventory_item_name").text("Sauce Labs Onesie"))
                        .child(Element::new("button").class("btn btn_inventory").text("Remove")),
                )
                .child(Element::new("div").class("menu").hidden_if(true).child(
                    Element::new("a").id("logout_sidebar_link").text("Logout"),
                )),
        )
    }

    #[test]
    fn test_compound_parse() {
        let c = Compound::parse("button.btn.btn_inventory[data-test=\"x\"]").unwrap();
        assert_eq!(c.tag.as_deref(), Some("button"));
        assert_eq!(c.classes, vec!["btn", "btn_inventory"]);
        assert_eq!(c.attrs, vec![("data-test".to_string(), Some("x".to_string()))]);
        assert!(Compound::parse("div > span").is_none());
        assert!(Compound::parse("a:hover").is_none());
    }

    #[test]
    fn test_resolve_by_class() {
        let root = tree();
        let loc = Locator::from_selector(Selector::class("inventory_item"));
        assert_eq!(resolve(&root, &loc).len(), 2);
    }

    #[test]
    fn test_resolve_scoped_with_text() {
        let root = tree();
        let loc = Locator::from_selector(Selector::test_id("inventory-item"))
            .with_text("Sauce Labs Backpack")
            .locator(Selector::css("button"));
        let matches = resolve(&root, &loc);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].element.text, "Add to cart");
    }

    #[test]
    fn test_text_selector_matches_leaves_only() {
        let root = tree();
        let loc = Locator::from_selector(Selector::text("Remove"));
        assert_eq!(resolve(&root, &loc).len(), 1);
    }

    #[test]
    fn test_visibility_is_inherited() {
        let root = tree();
        let loc = Locator::from_selector(Selector::id("logout_sidebar_link"));
        let matches = resolve(&root, &loc);
        assert_eq!(matches.len(), 1);
        assert!(!matches[0].visible);
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let root = tree();
        let loc = Locator::from_selector(Selector::class("inventory_item")).with_text("Onesie");
        let m = resolve(&root, &loc);
        assert_eq!(m[0].element.text_content(), "Sauce Labs OnesieRemove");
    }

    #[test]
    fn test_stacked_text_filters_all_apply() {
        let root = tree();
        let rows = || Locator::from_selector(Selector::class("inventory_item"));
        assert_eq!(resolve(&root, &rows().with_text("Sauce Labs")).len(), 2);
        assert_eq!(resolve(&root, &rows().with_text("Sauce Labs").with_text("Remove")).len(), 1);
        assert!(resolve(&root, &rows().with_text("Backpack").with_text("Onesie")).is_empty());
    }

    #[test]
    fn test_outline_skips_hidden() {
        let mut out = String::new();
        tree().outline(0, &mut out);
        assert!(out.contains("inventory_item"));
        assert!(!out.contains("logout_sidebar_link"));
    }
}
