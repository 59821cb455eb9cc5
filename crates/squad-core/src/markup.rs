//! Markup tree capability used by the extractors.
//!
//! The extraction code only talks to [`MarkupNode`]; selectors are plain CSS
//! selector strings. [`HtmlPage`] and [`HtmlNode`] implement it on top of the
//! `scraper` crate.

use scraper::{ElementRef, Html, Selector};
use scraper::CaseSensitivity;

use crate::error::FieldError;

/// A node of a parsed markup tree.
pub trait MarkupNode: Clone {
    /// First descendant matching `selector`, in document order.
    fn find_first(&self, selector: &str) -> Result<Option<Self>, FieldError>;

    /// All descendants matching `selector`, in document order.
    fn find_all(&self, selector: &str) -> Result<Vec<Self>, FieldError>;

    /// Direct element children.
    fn children(&self) -> Vec<Self>;

    /// Lower-case tag name.
    fn tag(&self) -> &str;

    fn attr(&self, name: &str) -> Option<&str>;

    fn has_class(&self, class: &str) -> bool;

    /// Concatenated text of the node and its descendants.
    fn text(&self) -> String;
}

/// A parsed HTML document.
pub struct HtmlPage {
    html: Html,
}

impl HtmlPage {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn root(&self) -> HtmlNode<'_> {
        HtmlNode(self.html.root_element())
    }
}

/// An element inside an [`HtmlPage`].
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a>(ElementRef<'a>);

fn compile(selector: &str) -> Result<Selector, FieldError> {
    Selector::parse(selector).map_err(|_| FieldError::InvalidSelector(selector.to_string()))
}

impl<'a> MarkupNode for HtmlNode<'a> {
    fn find_first(&self, selector: &str) -> Result<Option<Self>, FieldError> {
        let selector = compile(selector)?;
        Ok(self.0.select(&selector).next().map(HtmlNode))
    }

    fn find_all(&self, selector: &str) -> Result<Vec<Self>, FieldError> {
        let selector = compile(selector)?;
        Ok(self.0.select(&selector).map(HtmlNode).collect())
    }

    fn children(&self) -> Vec<Self> {
        self.0
            .children()
            .filter_map(ElementRef::wrap)
            .map(HtmlNode)
            .collect()
    }

    fn tag(&self) -> &str {
        self.0.value().name()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.0.value().attr(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.0
            .value()
            .has_class(class, CaseSensitivity::CaseSensitive)
    }

    fn text(&self) -> String {
        self.0.text().collect()
    }
}
