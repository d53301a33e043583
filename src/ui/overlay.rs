use gtk4 as gtk;

use gtk::DrawingArea;
use gtk4::prelude::*;
use image::RgbaImage;
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::AppState;

/// Fullscreen snip overlay showing the frozen capture
pub struct OverlayComponents {
    pub window: gtk::Window,
    pub drawing_area: DrawingArea,
    pub hint_label: gtk::Label,
    /// Capture converted for cairo, set when a snip begins
    pub backdrop: Rc<RefCell<Option<gtk::gdk_pixbuf::Pixbuf>>>,
}

pub fn create_overlay(app: &impl IsA<gtk::Application>, state: &Rc<RefCell<AppState>>) -> OverlayComponents {
    let drawing_area = DrawingArea::builder().hexpand(true).vexpand(true).build();
    let backdrop = Rc::new(RefCell::new(None));

    setup_draw_function(&drawing_area, state, &backdrop);

    let hint_label = gtk::Label::builder()
        .label("Drag to select a region · Esc to cancel")
        .halign(gtk::Align::Center)
        .valign(gtk::Align::Start)
        .margin_top(24)
        .build();
    hint_label.add_css_class("osd");

    let overlay = gtk::Overlay::builder().child(&drawing_area).build();
    overlay.add_overlay(&hint_label);

    let window = gtk::Window::builder()
        .application(app)
        .title("Snip")
        .decorated(false)
        .child(&overlay)
        .build();
    window.set_cursor_from_name(Some("crosshair"));

    OverlayComponents {
        window,
        drawing_area,
        hint_label,
        backdrop,
    }
}

/// Convert an RGBA capture to a GDK Pixbuf
pub fn image_to_pixbuf(image: &RgbaImage) -> gtk::gdk_pixbuf::Pixbuf {
    let width = image.width() as i32;
    let height = image.height() as i32;
    let stride = width * 4; // RGBA = 4 bytes per pixel

    let bytes = gtk::glib::Bytes::from(image.as_raw().as_slice());

    gtk::gdk_pixbuf::Pixbuf::from_bytes(
        &bytes,
        gtk::gdk_pixbuf::Colorspace::Rgb,
        true, // has_alpha
        8,    // bits_per_sample
        width,
        height,
        stride,
    )
}

fn setup_draw_function(
    drawing_area: &DrawingArea,
    state: &Rc<RefCell<AppState>>,
    backdrop: &Rc<RefCell<Option<gtk::gdk_pixbuf::Pixbuf>>>,
) {
    drawing_area.set_draw_func({
        let state = state.clone();
        let backdrop = backdrop.clone();
        move |_, cr, width, height| {
            let state = state.borrow();
            let backdrop = backdrop.borrow();
            draw_content(&state, backdrop.as_ref(), cr, width, height);
        }
    });
}

fn draw_content(
    state: &AppState,
    backdrop: Option<&gtk::gdk_pixbuf::Pixbuf>,
    cr: &gtk::cairo::Context,
    width: i32,
    height: i32,
) {
    let da_width = width as f64;
    let da_height = height as f64;

    cr.set_source_rgb(0.0, 0.0, 0.0);
    let _ = cr.paint();

    let Some(pixbuf) = backdrop else {
        return;
    };

    // The overlay covers the monitor, so stretch per axis: one logical point
    // on screen is one point here
    let scale_x = da_width / pixbuf.width() as f64;
    let scale_y = da_height / pixbuf.height() as f64;

    if cr.save().is_ok() {
        cr.scale(scale_x, scale_y);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        let _ = cr.paint();
        let _ = cr.restore();
    }

    draw_selection_overlay(state, cr, da_width, da_height);
}

fn draw_selection_overlay(state: &AppState, cr: &gtk::cairo::Context, da_width: f64, da_height: f64) {
    cr.set_source_rgba(0.0, 0.0, 0.0, 0.5);

    let Some(sel) = state.selection else {
        // Dim everything until a drag starts
        cr.rectangle(0.0, 0.0, da_width, da_height);
        let _ = cr.fill();
        return;
    };

    let region = sel.region();
    let (rx, ry, rw, rh) = (region.x, region.y, region.width, region.height);

    cr.rectangle(0.0, 0.0, da_width, ry);
    cr.rectangle(0.0, ry + rh, da_width, da_height - (ry + rh));
    cr.rectangle(0.0, ry, rx, rh);
    cr.rectangle(rx + rw, ry, da_width - (rx + rw), rh);
    let _ = cr.fill();

    cr.set_source_rgb(1.0, 1.0, 1.0);
    cr.set_line_width(2.0);
    cr.rectangle(rx, ry, rw, rh);
    let _ = cr.stroke();
}
