//! Pagination over filtered items.
//!
//! The current page lives in the `page` query parameter. Page 1 is the
//! canonical default and is never written to a link.

use std::collections::BTreeSet;

use url::form_urlencoded;

use crate::dom::{Document, NodeId};
use crate::feed::Item;

/// Query parameter holding the 1-based page number.
pub const PAGE_PARAM: &str = "page";

/// Requested page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// 1-based page number.
    pub page: usize,
    /// Items per page; 0 disables paging.
    pub limit: usize,
}

impl PaginationState {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit,
        }
    }

    /// Read the page from a query string. Missing, malformed or values
    /// below 2 all mean page 1.
    pub fn from_query(query: &str, limit: usize) -> Self {
        Self::new(page_param(query).unwrap_or(1), limit)
    }

    /// Index of the first item on the page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn page_param(query: &str) -> Option<usize> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(k, _)| k == PAGE_PARAM)
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .filter(|page| *page >= 2)
}

/// Number of pages needed for `total` items.
pub fn page_count(total: usize, limit: usize) -> usize {
    if limit == 0 {
        return usize::from(total > 0);
    }
    total.div_ceil(limit)
}

/// Matching items on the requested page, in order.
///
/// Out-of-range pages yield an empty window.
pub fn page_window<'a>(items: &'a [Item], state: &PaginationState) -> Vec<&'a Item> {
    let matching = items.iter().filter(|item| item.matches);
    if state.limit == 0 {
        return matching.collect();
    }
    matching.skip(state.offset()).take(state.limit).collect()
}

/// Query string with `page` rewritten: removed for page 1, set otherwise.
/// Every other parameter is kept in its original order.
pub fn query_with_page(query: &str, page: usize) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        if key != PAGE_PARAM {
            out.append_pair(&key, &value);
        }
    }
    if page >= 2 {
        out.append_pair(PAGE_PARAM, &page.to_string());
    }
    out.finish()
}

/// Query string with an invalid or first-page `page` parameter removed.
pub fn canonical_query(query: &str) -> String {
    query_with_page(query, page_param(query).unwrap_or(1))
}

/// Link to `page` of `path`, preserving the rest of `query`.
pub fn page_href(path: &str, query: &str, page: usize) -> String {
    let query = query_with_page(query, page);
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// One entry of the page navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerLink {
    Previous(usize),
    Page(usize),
    /// The page being shown; rendered without a link.
    Current(usize),
    Ellipsis,
    Next(usize),
}

/// Page navigation for a filtered result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub links: Vec<PagerLink>,
    pub total_pages: usize,
}

impl Pager {
    /// Build the navigation for `total` matching items.
    ///
    /// Results that fit on one page get an empty pager. Otherwise the first
    /// and last pages and the neighbours of the current page are linked, in
    /// ascending order, with an ellipsis wherever the run skips pages.
    pub fn build(total: usize, state: &PaginationState) -> Self {
        let total_pages = page_count(total, state.limit);
        if state.limit == 0 || total <= state.limit {
            return Self {
                links: Vec::new(),
                total_pages,
            };
        }

        let current = state.page;
        let numbers: BTreeSet<usize> = [
            1,
            current.saturating_sub(1),
            current,
            current.saturating_add(1),
            total_pages,
        ]
            .into_iter()
            .filter(|p| (1..=total_pages).contains(p))
            .collect();

        let mut links = Vec::new();
        if current > 1 {
            links.push(PagerLink::Previous((current - 1).min(total_pages)));
        }
        let mut last_shown = 0;
        for page in numbers {
            if last_shown != 0 && page > last_shown + 1 {
                links.push(PagerLink::Ellipsis);
            }
            links.push(if page == current {
                PagerLink::Current(page)
            } else {
                PagerLink::Page(page)
            });
            last_shown = page;
        }
        if current < total_pages {
            links.push(PagerLink::Next(current + 1));
        }

        Self { links, total_pages }
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Labels for the previous and next links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerLabels {
    pub previous: String,
    pub next: String,
}

impl Default for PagerLabels {
    fn default() -> Self {
        Self {
            previous: "Previous".to_string(),
            next: "Next".to_string(),
        }
    }
}

/// Render `pager` as `<nav class="pagination">`. An empty pager renders an
/// empty shell.
pub fn render_pager(
    doc: &mut Document,
    pager: &Pager,
    path: &str,
    query: &str,
    labels: &PagerLabels,
) -> NodeId {
    let nav = doc.create_element_with_class("nav", "pagination");
    if pager.is_empty() {
        return nav;
    }
    doc.set_attr(nav, "aria-label", "Pagination");
    let list = doc.create_element("ul");
    doc.append_child(nav, list);

    for link in &pager.links {
        let li = doc.create_element("li");
        match link {
            PagerLink::Previous(page) => {
                doc.add_class(li, "pagination-prev");
                append_link(doc, li, &page_href(path, query, *page), &labels.previous);
            }
            PagerLink::Next(page) => {
                doc.add_class(li, "pagination-next");
                append_link(doc, li, &page_href(path, query, *page), &labels.next);
            }
            PagerLink::Page(page) => {
                append_link(doc, li, &page_href(path, query, *page), &page.to_string());
            }
            PagerLink::Current(page) => {
                doc.add_class(li, "active");
                let span = doc.create_element("span");
                doc.set_attr(span, "aria-current", "page");
                doc.set_text(span, &page.to_string());
                doc.append_child(li, span);
            }
            PagerLink::Ellipsis => {
                doc.add_class(li, "ellipsis");
                let span = doc.create_element("span");
                doc.set_text(span, "\u{2026}");
                doc.append_child(li, span);
            }
        }
        doc.append_child(list, li);
    }
    nav
}

fn append_link(doc: &mut Document, parent: NodeId, href: &str, text: &str) {
    let a = doc.create_element("a");
    doc.set_attr(a, "href", href);
    doc.set_text(a, text);
    doc.append_child(parent, a);
}
