use crate::models::Listing;
use crate::scrapers::types::ListingSelectors;
use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, warn};
use url::Url;

/// Elements that start on a new line when rendered
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {:?}: {}", css, e))
}

/// Pulls listing records out of a rendered results page
pub struct ListingExtractor {
    card: Selector,
    title: Selector,
    price: Selector,
    location: Selector,
    description: Selector,
    link: Selector,
}

impl ListingExtractor {
    pub fn new(selectors: &ListingSelectors) -> Result<Self> {
        Ok(Self {
            card: compile(&selectors.card)?,
            title: compile(&selectors.title)?,
            price: compile(&selectors.price)?,
            location: compile(&selectors.location)?,
            description: compile(&selectors.description)?,
            link: compile(&selectors.link)?,
        })
    }

    /// Number of product cards in the document
    pub fn count_cards(&self, document: &Html) -> usize {
        document.select(&self.card).count()
    }

    /// One record per card, in document order. `page_url` resolves relative links.
    pub fn extract(&self, document: &Html, page_url: &str) -> Vec<Listing> {
        let base = match Url::parse(page_url) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Cannot resolve links against {:?}: {}", page_url, e);
                None
            }
        };

        document
            .select(&self.card)
            .enumerate()
            .map(|(idx, card)| {
                let listing = Listing {
                    title: self.text_of(card, &self.title),
                    price: self.text_of(card, &self.price),
                    location: self.text_of(card, &self.location),
                    description: self.text_of(card, &self.description),
                    link: self.link_of(card, base.as_ref()),
                };
                if listing.is_blank() {
                    debug!("Card {} has no recognizable fields", idx);
                }
                listing
            })
            .collect()
    }

    fn text_of(&self, card: ElementRef<'_>, selector: &Selector) -> String {
        card.select(selector)
            .next()
            .map(rendered_text)
            .unwrap_or_default()
    }

    fn link_of(&self, card: ElementRef<'_>, base: Option<&Url>) -> String {
        let href = match card
            .select(&self.link)
            .next()
            .and_then(|el| el.value().attr("href"))
        {
            Some(href) => href.trim(),
            None => return String::new(),
        };

        match base.map(|b| b.join(href)) {
            Some(Ok(url)) => url.to_string(),
            _ => href.to_string(),
        }
    }
}

/// Text of `el` as a browser lays it out, with line breaks folded into spaces
fn rendered_text(el: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(el, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                match child_el.value().name() {
                    "script" | "style" | "template" => {}
                    "br" => out.push('\n'),
                    name if BLOCK_ELEMENTS.contains(&name) => {
                        out.push('\n');
                        push_text(child_el, out);
                        out.push('\n');
                    }
                    _ => push_text(child_el, out),
                }
            }
            _ => {}
        }
    }
}
