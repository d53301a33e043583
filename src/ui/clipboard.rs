use gtk4::gdk::Texture;
use gtk4::gdk_pixbuf::Pixbuf;
use gtk4::prelude::*;

pub struct ClipboardManager {
    display: gtk4::gdk::Display,
}

impl ClipboardManager {
    pub fn from_widget(widget: &impl IsA<gtk4::Widget>) -> Self {
        Self {
            display: widget.display(),
        }
    }

    /// Put a source link on the clipboard
    pub fn copy_text(&self, text: &str) {
        self.display.clipboard().set_text(text);
    }

    /// Put the snipped image on the clipboard
    pub fn copy_image(&self, pixbuf: &Pixbuf) {
        let texture = Texture::for_pixbuf(pixbuf);
        self.display.clipboard().set_texture(&texture);
    }
}
