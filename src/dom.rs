//! Narrow node interface the extractors work against.
//!
//! Extraction code only needs attribute lookup, descendant search, ancestor
//! access and text content, so it goes through [`NodeExt`] rather than the
//! full `scraper` API.

use scraper::{ElementRef, Selector};

pub trait NodeExt<'a> {
    /// Attribute value, `None` when absent or blank.
    fn attr_value(&self, name: &str) -> Option<&'a str>;

    /// All descendants matching `selector`, in document order.
    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'a>>;

    fn find_first(&self, selector: &Selector) -> Option<ElementRef<'a>>;

    fn parent_element(&self) -> Option<ElementRef<'a>>;

    /// Walks up at most `levels` parents. Stops at the last element reached
    /// when the root comes first.
    fn ancestor(&self, levels: usize) -> ElementRef<'a>;

    /// Text of the subtree with whitespace runs collapsed to single spaces.
    fn text_content(&self) -> String;
}

impl<'a> NodeExt<'a> for ElementRef<'a> {
    fn attr_value(&self, name: &str) -> Option<&'a str> {
        let element: &'a scraper::node::Element = self.value();
        element.attr(name).filter(|value| !value.trim().is_empty())
    }

    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }

    fn find_first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }

    fn parent_element(&self) -> Option<ElementRef<'a>> {
        self.parent().and_then(ElementRef::wrap)
    }

    fn ancestor(&self, levels: usize) -> ElementRef<'a> {
        let mut current = *self;
        for _ in 0..levels {
            match current.parent_element() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    fn text_content(&self) -> String {
        self.text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
