//! Floating result panel
//!
//! Three pages in a stack: an idle placeholder, a loading page with the snip
//! preview, and the rendered verdict.

use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;
use gtk::{glib, Align, Orientation};
use log::{debug, warn};
use std::time::Duration;

use crate::analysis::{display_label, reasoning_points_or_summary, AnalysisResult, ReasoningPoint, Source, Tier};
use crate::app::SnipPayload;
use crate::ui::clipboard::ClipboardManager;
use crate::ui::overlay::image_to_pixbuf;

const PAGE_IDLE: &str = "idle";
const PAGE_LOADING: &str = "loading";
const PAGE_RESULT: &str = "result";

pub struct PanelComponents {
    pub window: adw::ApplicationWindow,
    pub header_bar: adw::HeaderBar,
    pub snip_btn: gtk::Button,
    pub close_btn: gtk::Button,
    pub shortcuts_btn: gtk::Button,
    pub stack: gtk::Stack,
    pub idle_hint: gtk::Label,
    pub preview: gtk::Picture,
    pub copy_preview_btn: gtk::Button,
    pub crop_label: gtk::Label,
    pub result_scroller: gtk::ScrolledWindow,
}

pub fn create_panel(app: &adw::Application) -> PanelComponents {
    let snip_btn = gtk::Button::builder()
        .icon_name("camera-photo-symbolic")
        .tooltip_text("New Snip")
        .build();
    snip_btn.add_css_class("suggested-action");

    let close_btn = gtk::Button::builder()
        .icon_name("window-close-symbolic")
        .tooltip_text("Close Result")
        .build();
    close_btn.add_css_class("flat");

    let shortcuts_btn = gtk::Button::builder()
        .icon_name("preferences-desktop-keyboard-shortcuts-symbolic")
        .tooltip_text("Keyboard Shortcuts")
        .build();
    shortcuts_btn.add_css_class("flat");

    let title = gtk::Label::new(Some("AI Analysis"));
    title.add_css_class("heading");

    let header_bar = adw::HeaderBar::builder()
        .title_widget(&title)
        .show_end_title_buttons(false)
        .build();
    header_bar.pack_start(&snip_btn);
    header_bar.pack_end(&close_btn);
    header_bar.pack_end(&shortcuts_btn);

    let (idle_page, idle_hint) = build_idle_page();
    let (loading_page, preview, copy_preview_btn, crop_label) = build_loading_page();

    let result_scroller = gtk::ScrolledWindow::builder()
        .hscrollbar_policy(gtk::PolicyType::Never)
        .vexpand(true)
        .build();

    let stack = gtk::Stack::builder()
        .transition_type(gtk::StackTransitionType::Crossfade)
        .vexpand(true)
        .build();
    stack.add_named(&idle_page, Some(PAGE_IDLE));
    stack.add_named(&loading_page, Some(PAGE_LOADING));
    stack.add_named(&result_scroller, Some(PAGE_RESULT));
    stack.set_visible_child_name(PAGE_IDLE);

    let content = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .build();
    content.add_css_class("result-panel");
    content.append(&header_bar);
    content.append(&stack);

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Snipcheck")
        .content(&content)
        .default_width(400)
        .default_height(600)
        .resizable(false)
        .build();

    PanelComponents {
        window,
        header_bar,
        snip_btn,
        close_btn,
        shortcuts_btn,
        stack,
        idle_hint,
        preview,
        copy_preview_btn,
        crop_label,
        result_scroller,
    }
}

fn build_idle_page() -> (gtk::Box, gtk::Label) {
    let icon = gtk::Image::builder()
        .icon_name("edit-find-symbolic")
        .pixel_size(96)
        .opacity(0.2)
        .build();

    let hint = gtk::Label::builder()
        .label("Snip part of the screen to check it")
        .wrap(true)
        .justify(gtk::Justification::Center)
        .build();
    hint.add_css_class("dim-label");

    let page = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(12)
        .valign(Align::Center)
        .halign(Align::Center)
        .build();
    page.append(&icon);
    page.append(&hint);

    (page, hint)
}

fn build_loading_page() -> (gtk::Box, gtk::Picture, gtk::Button, gtk::Label) {
    let spinner = gtk::Spinner::builder()
        .spinning(true)
        .width_request(32)
        .height_request(32)
        .build();

    let status = gtk::Label::new(Some("SEARCHING & VERIFYING..."));
    status.add_css_class("section-title");

    let preview = gtk::Picture::builder()
        .can_shrink(true)
        .content_fit(gtk::ContentFit::Contain)
        .height_request(160)
        .margin_top(12)
        .build();

    let crop_label = gtk::Label::new(None);
    crop_label.add_css_class("dim-label");
    crop_label.add_css_class("caption");

    let copy_preview_btn = gtk::Button::builder()
        .icon_name("edit-copy-symbolic")
        .tooltip_text("Copy Snip")
        .halign(Align::Center)
        .build();
    copy_preview_btn.add_css_class("flat");

    let page = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(8)
        .valign(Align::Center)
        .margin_start(20)
        .margin_end(20)
        .build();
    page.append(&spinner);
    page.append(&status);
    page.append(&preview);
    page.append(&crop_label);
    page.append(&copy_preview_btn);

    (page, preview, copy_preview_btn, crop_label)
}

/// Show the placeholder page
pub fn show_idle(panel: &PanelComponents, snip_shortcut: &str) {
    panel
        .idle_hint
        .set_text(&format!("Press {} to snip part of the screen", snip_shortcut));
    panel.result_scroller.set_child(None::<&gtk::Widget>);
    panel.stack.set_visible_child_name(PAGE_IDLE);
}

/// Show the spinner with a preview of the snip being analyzed
pub fn show_loading(panel: &PanelComponents, snip: &SnipPayload) {
    let pixbuf = image_to_pixbuf(&snip.image);
    let texture = gtk::gdk::Texture::for_pixbuf(&pixbuf);
    panel.preview.set_paintable(Some(&texture));

    let crop = snip.crop;
    panel.crop_label.set_text(&format!(
        "{:.0}×{:.0} at ({:.0}, {:.0})",
        crop.width, crop.height, crop.x, crop.y
    ));
    panel.stack.set_visible_child_name(PAGE_LOADING);
}

/// Render a verdict
pub fn show_result(panel: &PanelComponents, result: &AnalysisResult) {
    let view = build_result_view(&panel.window, result);
    panel.result_scroller.set_child(Some(&view));
    panel.result_scroller.vadjustment().set_value(0.0);
    panel.stack.set_visible_child_name(PAGE_RESULT);
}

fn section_title(text: &str) -> gtk::Label {
    let label = gtk::Label::builder()
        .label(text.to_uppercase())
        .halign(Align::Start)
        .margin_bottom(4)
        .build();
    label.add_css_class("section-title");
    label
}

fn build_result_view(window: &adw::ApplicationWindow, result: &AnalysisResult) -> gtk::Box {
    let tier = Tier::from_score(result.score);

    let view = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(16)
        .margin_start(20)
        .margin_end(20)
        .margin_top(12)
        .margin_bottom(16)
        .build();

    // Score badge
    let score_value = gtk::Label::new(Some(&format!("{}%", result.score)));
    score_value.add_css_class("score-value");
    let score_label = gtk::Label::new(Some(&display_label(result).to_uppercase()));
    score_label.add_css_class("score-label");

    let badge = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .build();
    badge.add_css_class("score-badge");
    badge.add_css_class(tier.css_class());
    badge.append(&score_value);
    badge.append(&score_label);
    view.append(&badge);

    // Verdict summary
    let summary = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .build();
    summary.add_css_class("card");
    summary.append(&section_title("Verdict Summary"));
    let description = gtk::Label::builder()
        .label(tier.description())
        .wrap(true)
        .xalign(0.0)
        .build();
    summary.append(&description);
    view.append(&summary);

    // Key findings
    view.append(&section_title("Key Findings"));
    let findings = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(12)
        .build();
    for point in reasoning_points_or_summary(result) {
        findings.append(&build_finding(&point));
    }
    view.append(&findings);

    // Sources
    view.append(&section_title("Verified Sources"));
    let sources = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(8)
        .build();
    if result.sources.is_empty() {
        let empty = gtk::Label::builder()
            .label("No direct external links provided by AI.")
            .halign(Align::Start)
            .build();
        empty.add_css_class("no-sources");
        sources.append(&empty);
    } else {
        for source in &result.sources {
            sources.append(&build_source_row(window, source));
        }
    }
    view.append(&sources);

    view
}

fn build_finding(point: &ReasoningPoint) -> gtk::Box {
    let card = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(6)
        .build();
    card.add_css_class("card");

    let title = gtk::Label::builder()
        .label(point.display_title().to_uppercase())
        .halign(Align::Start)
        .wrap(true)
        .build();
    title.add_css_class("finding-title");
    card.append(&title);

    if let Some(detail) = &point.detail {
        let detail = gtk::Label::builder()
            .label(detail.as_str())
            .wrap(true)
            .xalign(0.0)
            .selectable(true)
            .build();
        detail.add_css_class("finding-detail");
        card.append(&detail);
    }

    for bullet in &point.bullets {
        let line = gtk::Label::builder()
            .label(format!("• {}", bullet))
            .wrap(true)
            .xalign(0.0)
            .margin_start(8)
            .build();
        line.add_css_class("finding-bullet");
        card.append(&line);
    }

    card
}

fn build_source_row(window: &adw::ApplicationWindow, source: &Source) -> gtk::Box {
    let link_btn = gtk::Button::builder()
        .hexpand(true)
        .tooltip_text(source.url.as_str())
        .build();
    link_btn.add_css_class("flat");

    let link_content = gtk::Box::builder()
        .orientation(Orientation::Horizontal)
        .spacing(6)
        .build();
    link_content.append(&gtk::Image::from_icon_name("insert-link-symbolic"));
    let site = gtk::Label::builder()
        .label(source.site_name.as_str())
        .ellipsize(gtk::pango::EllipsizeMode::End)
        .build();
    link_content.append(&site);
    link_btn.set_child(Some(&link_content));

    link_btn.connect_clicked({
        let url = source.url.clone();
        let window = window.clone();
        move |_| open_external(&window, &url)
    });

    let copy_btn = gtk::Button::builder()
        .icon_name("edit-copy-symbolic")
        .tooltip_text("Copy Link")
        .build();
    copy_btn.add_css_class("flat");

    copy_btn.connect_clicked({
        let url = source.url.clone();
        move |btn| {
            ClipboardManager::from_widget(btn).copy_text(&url);
            btn.set_icon_name("object-select-symbolic");

            let btn = btn.clone();
            glib::timeout_add_local_once(Duration::from_secs(2), move || {
                btn.set_icon_name("edit-copy-symbolic");
            });
        }
    });

    let row = gtk::Box::builder()
        .orientation(Orientation::Horizontal)
        .spacing(4)
        .build();
    row.add_css_class("source-row");
    row.append(&link_btn);
    row.append(&copy_btn);
    row
}

fn open_external(window: &adw::ApplicationWindow, url: &str) {
    debug!("Opening {}", url);
    let url = url.to_string();
    gtk::UriLauncher::new(&url).launch(
        Some(window),
        gtk::gio::Cancellable::NONE,
        move |res| {
            if let Err(e) = res {
                warn!("Failed to open {}: {}", url, e);
            }
        },
    );
}
