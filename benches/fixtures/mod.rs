// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

const WORDS: [&str; 12] = [
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor",
];

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    fn paragraphs(self) -> usize {
        match self {
            Self::Small => 20,
            Self::Medium => 400,
            Self::Large => 4_000,
        }
    }
}

/// An article-like page: sections of paragraphs with inline links and the odd hidden block.
pub fn page(case: Case) -> String {
    let mut html = String::from("<!DOCTYPE html><html><head><title>bench</title>");
    html.push_str("<style>p { margin: 0 }</style></head><body>");

    for index in 0..case.paragraphs() {
        if index % 25 == 0 {
            html.push_str(&format!("<h2>Section {}</h2>", index / 25));
        }
        if index % 50 == 7 {
            html.push_str("<div style=\"display: none\">hidden dolor text</div>");
        }
        html.push_str("<p>");
        for offset in 0..24 {
            let word = WORDS[(index * 7 + offset * 3) % WORDS.len()];
            if offset % 11 == 5 {
                html.push_str(&format!("<a href=\"/p/{index}/{offset}\">{word}</a> "));
            } else {
                html.push_str(word);
                html.push(' ');
            }
        }
        html.push_str("</p>");
    }

    html.push_str("<script>var dolor = 1;</script></body></html>");
    html
}
