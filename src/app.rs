//! Terminal host for the portfolio browser.
//!
//! Reads one command per line, drives the navigator, the lightbox and the
//! content loader, and prints the resulting view as text.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use fluent_bundle::FluentArgs;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::browse::{BrowseAction, BrowseNavigator, Grid, Loadable, PaginationWindow, Selection, ViewMode};
use crate::i18n::Messages;
use crate::loader::{ContentLoader, LoadOutcome, Slice};
use crate::locale::Locale;
use crate::models::{ContentStore, MediaKind};
use crate::ui::{Key, LightboxAction, LightboxController, Playback};

const HELP: &str = "\
commands:
  all | category <id> | brand <id> | back | categories | brands
  kind all|image|video | search [term] | more
  open <n> | next | prev | close | key escape|left|right | backdrop
  locale en|ar | show | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Browse(BrowseAction),
    /// Up one level: media goes back to brands when there are any, else to categories.
    Back,
    /// Opens the lightbox on the n-th visible item (1-based).
    Open(usize),
    Lightbox(LightboxAction),
    Key(Key),
    Backdrop,
    Locale(Locale),
    Show,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_start();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (line.trim_end(), ""),
        };
        let arg = rest.trim();

        let command = match word.to_ascii_lowercase().as_str() {
            "all" => Self::Browse(BrowseAction::SelectCategory(Selection::All)),
            "category" | "cat" => {
                if arg.eq_ignore_ascii_case("all") {
                    Self::Browse(BrowseAction::SelectCategory(Selection::All))
                } else {
                    let id = arg
                        .parse()
                        .map_err(|_| format!("invalid category id: {arg:?}"))?;
                    Self::Browse(BrowseAction::SelectCategory(Selection::Only(id)))
                }
            }
            "brand" => {
                if arg.is_empty() || arg.eq_ignore_ascii_case("all") {
                    return Err("brand needs a brand id".to_string());
                }
                Self::Browse(BrowseAction::SelectBrand(arg.to_string()))
            }
            "back" => Self::Back,
            "categories" => Self::Browse(BrowseAction::BackToCategories),
            "brands" => Self::Browse(BrowseAction::BackToBrands),
            "kind" => {
                let kind = if arg.eq_ignore_ascii_case("all") {
                    Selection::All
                } else {
                    Selection::Only(
                        MediaKind::from_name(arg).ok_or_else(|| format!("unknown kind: {arg:?}"))?,
                    )
                };
                Self::Browse(BrowseAction::SetKind(kind))
            }
            // The search term is taken verbatim, surrounding spaces included.
            "search" => Self::Browse(BrowseAction::SetSearch(
                rest.trim_end_matches(|c| c == '\r' || c == '\n').to_string(),
            )),
            "more" => Self::Browse(BrowseAction::LoadMore),
            "open" => {
                let n: usize = arg.parse().map_err(|_| format!("invalid position: {arg:?}"))?;
                Self::Open(n.saturating_sub(1))
            }
            "next" => Self::Lightbox(LightboxAction::Next),
            "prev" | "previous" => Self::Lightbox(LightboxAction::Previous),
            "close" => Self::Lightbox(LightboxAction::Close),
            "key" => Self::Key(Key::from_name(arg).ok_or_else(|| format!("unknown key: {arg:?}"))?),
            "backdrop" => Self::Backdrop,
            "locale" => Self::Locale(arg.parse().map_err(|e| format!("{e}"))?),
            "show" | "" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command: {other:?}")),
        };
        Ok(command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct FolioApp<S: ContentStore + 'static> {
    navigator: BrowseNavigator,
    lightbox: LightboxController,
    loader: ContentLoader<S>,
    locale: Locale,
    messages: Messages,
    /// Message key of a pending non-blocking notice.
    notice: Option<&'static str>,
}

impl<S: ContentStore + 'static> FolioApp<S> {
    pub fn new(store: S, locale: Locale, pagination: PaginationWindow) -> Self {
        Self {
            navigator: BrowseNavigator::new(pagination),
            lightbox: LightboxController::new(),
            loader: ContentLoader::new(store),
            locale,
            messages: Messages::new(),
            notice: None,
        }
    }

    pub fn navigator(&self) -> &BrowseNavigator {
        &self.navigator
    }

    pub fn lightbox(&self) -> &LightboxController {
        &self.lightbox
    }

    /// Starts the loads the first screen depends on.
    pub fn start(&mut self) {
        for request in self.navigator.initial_requests() {
            self.loader.request(request);
        }
    }

    /// Waits for one load result and applies it.
    ///
    /// Returns false once the loader has shut down.
    pub async fn pump(&mut self) -> bool {
        match self.loader.next().await {
            Some(outcome) => {
                self.on_load(outcome);
                true
            }
            None => false,
        }
    }

    pub fn on_load(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Categories(result) => {
                if result.is_err() {
                    self.notice = Some("failed-categories");
                }
                self.navigator.set_categories(result);
            }
            LoadOutcome::Brands {
                category_id,
                result,
            } => {
                let failed = result.is_err();
                if self.navigator.set_brands(category_id, result) && failed {
                    self.notice = Some("failed-brands");
                }
            }
            LoadOutcome::Media(result) => {
                if result.is_err() {
                    self.notice = Some("failed-media");
                }
                self.navigator.set_media(result);
            }
        }
    }

    pub fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Browse(action) => self.browse(action),
            Command::Back => {
                let from_media = self.navigator.view_mode() == ViewMode::Media;
                if !(from_media && self.navigator.go_back_to_brands()) {
                    self.browse(BrowseAction::BackToCategories);
                }
            }
            Command::Open(_) if !self.navigator.shows_media_grid() => {
                debug!(view = ?self.navigator.view_mode(), "No media grid to open from");
            }
            Command::Open(index) => {
                let visible = self.navigator.compute_visible_items();
                if let Err(e) = self.lightbox.open(visible, index) {
                    debug!(error = %e, "Ignoring lightbox open");
                }
            }
            Command::Lightbox(action) => {
                self.lightbox.apply(action);
            }
            Command::Key(key) => {
                self.lightbox.handle_key(key);
            }
            Command::Backdrop => {
                self.lightbox.click_backdrop();
            }
            Command::Locale(locale) => {
                info!(%locale, "Switched locale");
                self.locale = locale;
            }
            Command::Show | Command::Help => {}
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn browse(&mut self, action: BrowseAction) {
        match self.navigator.apply(action) {
            Ok(Some(request)) => {
                self.loader.request(request);
            }
            Ok(None) => {}
            Err(e) => debug!(error = %e, "Ignoring navigation"),
        }
        if self.navigator.selected_category().is_none() && self.loader.is_loading(Slice::Brands) {
            self.loader.cancel(Slice::Brands);
        }
    }

    fn tr(&self, key: &str) -> String {
        self.messages.tr(self.locale, key)
    }

    /// Renders the current view as text. Takes any pending notice.
    pub fn render(&mut self) -> String {
        let mut out = String::new();
        if let Some(key) = self.notice.take() {
            let _ = writeln!(out, "! {}", self.tr(key));
        }

        match self.navigator.view_mode() {
            ViewMode::Categories => self.render_categories(&mut out),
            ViewMode::Brands => self.render_brands(&mut out),
            ViewMode::Media => self.render_media(&mut out),
        }

        self.render_lightbox(&mut out);
        out
    }

    fn render_categories(&self, out: &mut String) {
        let _ = writeln!(out, "== {} ==", self.tr("categories"));
        match self.navigator.categories() {
            Loadable::Loading => {
                let _ = writeln!(out, "{}", self.tr("loading"));
            }
            Loadable::Failed => {
                let _ = writeln!(out, "{}", self.tr("no-categories"));
            }
            Loadable::Ready(categories) => {
                let _ = writeln!(out, "  [all] {}", self.tr("all"));
                for category in categories {
                    let _ = writeln!(out, "  [{}] {}", category.id, category.name.get(self.locale));
                }
            }
        }

        if self.navigator.shows_media_grid() {
            let _ = writeln!(out);
            self.render_grid(out);
        }
    }

    fn render_brands(&self, out: &mut String) {
        let category = self
            .navigator
            .selected_category()
            .map(|id| self.navigator.category_name(id, self.locale))
            .unwrap_or("");
        let _ = writeln!(
            out,
            "== {}{}{category} ==",
            self.tr("categories"),
            self.locale.breadcrumb_separator()
        );
        match self.navigator.brands() {
            Loadable::Loading => {
                let _ = writeln!(out, "{}", self.tr("loading"));
            }
            Loadable::Failed => {
                let _ = writeln!(out, "{}", self.tr("no-brands"));
            }
            Loadable::Ready(brands) if brands.is_empty() => {
                let _ = writeln!(out, "{}", self.tr("empty-brands"));
            }
            Loadable::Ready(brands) => {
                let view_work = self.tr("view-work");
                for brand in brands {
                    let _ = writeln!(out, "  [{}] {} - {view_work}", brand.id, brand.name.get(self.locale));
                }
            }
        }
    }

    fn render_media(&self, out: &mut String) {
        let filter = self.navigator.filter();
        let separator = self.locale.breadcrumb_separator();
        let mut crumbs = self.tr("categories");
        if let Some(id) = filter.category.as_only() {
            let _ = write!(crumbs, "{separator}{}", self.navigator.category_name(*id, self.locale));
        }
        if let Some(id) = filter.brand.as_only() {
            let _ = write!(crumbs, "{separator}{}", self.navigator.brand_name(id, self.locale));
        }
        let _ = writeln!(out, "== {crumbs} ==");
        self.render_grid(out);
    }

    fn render_grid(&self, out: &mut String) {
        let filter = self.navigator.filter();
        let mut args = FluentArgs::new();
        args.set(
            "kind",
            match filter.kind.as_only() {
                Some(kind) => kind.as_str().to_string(),
                None => self.tr("all"),
            },
        );
        args.set("search", format!("{:?}", filter.search));
        let _ = writeln!(out, "{}", self.messages.tr_args(self.locale, "filter-summary", &args));

        match self.navigator.grid() {
            Grid::Loading => {
                let _ = writeln!(out, "{}", self.tr("loading"));
            }
            Grid::Failed | Grid::Empty => {
                let _ = writeln!(out, "{}", self.tr("no-matching"));
            }
            Grid::Items {
                visible,
                total,
                can_load_more,
            } => {
                for (i, item) in visible.iter().enumerate() {
                    let category = item
                        .category_name
                        .as_ref()
                        .map(|n| n.get(self.locale))
                        .unwrap_or("");
                    let _ = writeln!(
                        out,
                        "  {:>2}. [{}] {} ({})",
                        i + 1,
                        item.kind.as_str(),
                        item.title,
                        category
                    );
                }
                let mut args = FluentArgs::new();
                args.set("shown", visible.len());
                args.set("total", total);
                let _ = writeln!(out, "{}", self.messages.tr_args(self.locale, "showing", &args));
                if can_load_more {
                    let _ = writeln!(out, "[more] {}", self.tr("load-more"));
                }
            }
        }
    }

    fn render_lightbox(&self, out: &mut String) {
        let Some(view) = self.lightbox.presentation() else {
            return;
        };
        let mode = match view.playback {
            Playback::FitImage => self.tr("playback-image"),
            Playback::Video { controls, autoplay } => {
                let mut args = FluentArgs::new();
                args.set("controls", controls.to_string());
                args.set("autoplay", autoplay.to_string());
                self.messages.tr_args(self.locale, "playback-video", &args)
            }
        };
        let _ = writeln!(out, "-- {} --", self.tr("lightbox"));
        let _ = writeln!(out, "{} <{}> ({mode})", view.item.title, view.item.source_url);
        if let Some((position, len)) = view.counter {
            let mut args = FluentArgs::new();
            args.set("position", position);
            args.set("len", len);
            let _ = writeln!(out, "< {} >", self.messages.tr_args(self.locale, "lightbox-counter", &args));
        }
    }

    /// Runs the command loop until `quit` or end of input.
    pub async fn run<R, W>(mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.start();
        out.write_all(self.render().as_bytes())
            .context("Failed to write output")?;

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read command")? else {
                        break;
                    };
                    match Command::parse(&line) {
                        Ok(Command::Help) => {
                            writeln!(out, "{HELP}").context("Failed to write output")?;
                        }
                        Ok(command) => {
                            if self.handle(command) == Flow::Quit {
                                break;
                            }
                            out.write_all(self.render().as_bytes())
                                .context("Failed to write output")?;
                        }
                        Err(e) => {
                            writeln!(out, "? {e}").context("Failed to write output")?;
                        }
                    }
                }
                Some(outcome) = self.loader.next() => {
                    self.on_load(outcome);
                    out.write_all(self.render().as_bytes())
                        .context("Failed to write output")?;
                }
            }
            out.flush().context("Failed to flush output")?;
        }

        self.loader.shutdown();
        Ok(())
    }
}
