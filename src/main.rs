// SPDX-FileCopyrightText: 2026 Betterfind contributors
// SPDX-License-Identifier: LicenseRef-Betterfind-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Betterfind and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Betterfind CLI entrypoint.
//!
//! Searches a local HTML file the way the in-page engine would and prints the `searchWords`
//! response as JSON. `--follow` opens a live URL in a simulated tab and runs the linked-page flow.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use betterfind::browser::{HttpPageSource, SimulatedBrowser};
use betterfind::config::Config;
use betterfind::format::parse_html;
use betterfind::highlight::{HighlightManager, MarkerPalette};
use betterfind::orchestrator::Orchestrator;
use betterfind::page::PageContext;
use betterfind::protocol::{message_schema, PageRequest, PageResponse};
use betterfind::upstream::{resolve_occurrences, search_if_healthy, HttpSearchApi, SearchQuery};
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_LOG_FILTER: &str = "betterfind=info";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <page.html> <term> [--highlight <index>] [--links] [--url <page-url>] [--api] [--config <file>]\n  {program} --follow <url> <term> [--config <file>]\n  {program} --schema\n\nPrints the search result for <term> as JSON.\n--highlight prints the page with occurrence <index> marked.\n--links prints every link on the page first.\n--url sets the address links are resolved against.\n--api also asks the search service and prints its occurrences (in-page ones if it fails).\n--follow opens <url> in a new tab, searches and highlights the first hit.\n\nLogging is controlled by RUST_LOG (default `{DEFAULT_LOG_FILTER}`)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    page: Option<String>,
    term: Option<String>,
    highlight: Option<usize>,
    links: bool,
    url: Option<String>,
    api: bool,
    config: Option<String>,
    follow: Option<String>,
    schema: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--highlight" => {
                if options.highlight.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.highlight = Some(raw.parse().map_err(|_| ())?);
            }
            "--links" => {
                if options.links {
                    return Err(());
                }
                options.links = true;
            }
            "--url" => {
                if options.url.is_some() {
                    return Err(());
                }
                options.url = Some(args.next().ok_or(())?);
            }
            "--api" => {
                if options.api {
                    return Err(());
                }
                options.api = true;
            }
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(args.next().ok_or(())?);
            }
            "--follow" => {
                if options.follow.is_some() {
                    return Err(());
                }
                options.follow = Some(args.next().ok_or(())?);
            }
            "--schema" => {
                if options.schema {
                    return Err(());
                }
                options.schema = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => positional.push(arg),
        }
    }

    if options.schema {
        let alone = CliOptions { schema: true, ..Default::default() };
        return if positional.is_empty() && options == alone { Ok(options) } else { Err(()) };
    }

    if options.follow.is_some() {
        if options.highlight.is_some() || options.links || options.url.is_some() || options.api {
            return Err(());
        }
        let [term]: [String; 1] = positional.try_into().map_err(|_| ())?;
        options.term = Some(term);
        return Ok(options);
    }

    let [page, term]: [String; 2] = positional.try_into().map_err(|_| ())?;
    options.page = Some(page);
    options.term = Some(term);
    Ok(options)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn print_json(value: &impl serde::Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread().enable_all().build()
}

fn follow(config: &Config, url: &str, term: &str) -> Result<(), Box<dyn Error>> {
    let browser = Arc::new(
        SimulatedBrowser::new(HttpPageSource::default()).with_flash_timing(config.flash_timing()),
    );
    let orchestrator = Orchestrator::new(Arc::clone(&browser), config.settle_delay());

    runtime()?.block_on(async {
        let report = orchestrator.open_linked_page(url, term).await?;
        eprintln!(
            "tab {}: {} occurrence(s), highlighted: {}",
            report.tab.tab_id, report.occurrences, report.highlighted
        );
        if report.highlighted {
            let document = browser.snapshot(report.tab.tab_id).await?;
            println!("{}", document.to_html());
        }
        Ok::<(), Box<dyn Error>>(())
    })
}

fn search_page(config: &Config, options: CliOptions) -> Result<(), Box<dyn Error>> {
    let (Some(page), Some(term)) = (options.page, options.term) else {
        return Err("missing page or term".into());
    };
    let html = std::fs::read_to_string(&page)?;
    let url = options.url.as_deref().map(Url::parse).transpose()?;
    let page_url = url.as_ref().map_or_else(|| page.clone(), Url::to_string);

    let highlights = HighlightManager::new(MarkerPalette::default(), config.flash_timing());
    let mut context = PageContext::with_highlights(parse_html(&html, url), highlights);

    if options.links {
        print_json(&context.handle(PageRequest::Scrape).response)?;
    }

    let response = context.handle(PageRequest::SearchWords { searchword: term.clone() }).response;
    print_json(&response)?;

    if options.api {
        let PageResponse::Results(in_page) = &response else {
            return Err("search returned no results object".into());
        };
        let api = HttpSearchApi::new(&config.api_base_url)?;
        let query = SearchQuery {
            url: page_url.clone(),
            searchword: term.clone(),
            options: config.search_options(),
        };
        let upstream = runtime()?.block_on(search_if_healthy(&api, &query));
        let resolved = resolve_occurrences(upstream, &in_page.results, &page_url);
        eprintln!("occurrences from {:?}", resolved.source);
        print_json(&resolved.occurrences)?;
    }

    if let Some(index) = options.highlight {
        let handled =
            context.handle(PageRequest::HighlightWord { index, searchword: term.clone() });
        if handled.response != PageResponse::success(true) {
            return Err(format!("nothing to highlight for {term:?} at {index}").into());
        }
        println!("{}", context.document().to_html());
    }

    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "betterfind".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if options.schema {
            return print_json(&message_schema());
        }

        init_tracing();
        let config = match options.config.as_deref() {
            Some(path) => Config::load(Path::new(path))?,
            None => Config::default(),
        }
        .with_env_overrides();

        if let (Some(url), Some(term)) = (&options.follow, &options.term) {
            return follow(&config, url, term);
        }
        search_page(&config, options)
    })();

    if let Err(err) = result {
        eprintln!("betterfind: {err}");
        std::process::exit(1);
    }
}
