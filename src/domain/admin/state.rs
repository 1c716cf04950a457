//! Last-fetched signing page list with local filtering.

use super::SigningPage;

pub const NO_PAGES: &str = "No signing pages found";
pub const NO_MATCHES: &str = "No matching pages found";

/// What a page list view shows for a given search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRows<'a> {
    Pages(Vec<&'a SigningPage>),
    Placeholder(&'static str),
}

/// Signing pages as last fetched from the backend.
///
/// Only replaced wholesale after a successful fetch; a failed refresh leaves
/// the previous list in place.
#[derive(Debug, Clone, Default)]
pub struct PageDirectory {
    pages: Vec<SigningPage>,
}

impl PageDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, pages: Vec<SigningPage>) {
        self.pages = pages;
    }

    pub fn pages(&self) -> &[SigningPage] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages whose title or owner username contains `term`, ignoring case.
    /// A blank term matches everything.
    pub fn filter(&self, term: &str) -> Vec<&SigningPage> {
        let needle = term.trim().to_lowercase();
        self.pages
            .iter()
            .filter(|p| needle.is_empty() || p.matches(&needle))
            .collect()
    }

    pub fn rows(&self, term: &str) -> PageRows<'_> {
        if self.pages.is_empty() {
            return PageRows::Placeholder(NO_PAGES);
        }
        let matched = self.filter(term);
        if matched.is_empty() {
            PageRows::Placeholder(NO_MATCHES)
        } else {
            PageRows::Pages(matched)
        }
    }
}
