// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use scraper::Html;
use url::Url;

use crate::model::{Document, Element};

/// Parses an HTML page into a [`Document`].
///
/// Comments, doctypes and processing instructions are dropped. Whitespace-only text is kept as
/// the page has it; the locators decide what to skip.
pub fn parse_html(source: &str, url: Option<Url>) -> Document {
    let html = Html::parse_document(source);
    let root_element = html.root_element();

    let mut root = Element::new(root_element.value().name());
    for (name, value) in root_element.value().attrs() {
        root.set_attr(name, value);
    }
    let mut document = Document::with_root(root);
    document.set_url(url);

    let document_root = document.root();
    let mut stack: Vec<_> =
        root_element.children().rev().map(|child| (child, document_root)).collect();
    while let Some((source_node, parent)) = stack.pop() {
        let created = match source_node.value() {
            scraper::Node::Text(text) => document.create_text(&**text),
            scraper::Node::Element(source_element) => {
                let created = document.create_element(source_element.name());
                if let Some(element) = document.element_mut(created) {
                    for (name, value) in source_element.attrs() {
                        element.set_attr(name, value);
                    }
                }
                stack.extend(source_node.children().rev().map(|child| (child, created)));
                created
            }
            _ => continue,
        };
        if let Err(err) = document.append_child(parent, created) {
            tracing::debug!(%err, "skipping node that cannot be attached");
        }
    }

    document.ensure_body();
    document
}
