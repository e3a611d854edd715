//! Wireframe rendering of the simulated screen.
//!
//! The simulator has no layout engine, so a frame is a block diagram: every
//! visible element that shows text or takes input gets one row, indented by
//! tree depth, as wide as its label. Enough to follow a failing flow in the
//! failure video.

use super::dom::Element;
use image::{Rgba, RgbaImage};

/// Frame width in pixels
pub const FRAME_WIDTH: u32 = 640;
/// Frame height in pixels
pub const FRAME_HEIGHT: u32 = 360;

const ROW_HEIGHT: u32 = 12;
const INDENT: u32 = 8;
const GLYPH_WIDTH: u32 = 5;
const INPUT_CHARS: u32 = 24;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TEXT: Rgba<u8> = Rgba([72, 76, 85, 255]);
const INPUT: Rgba<u8> = Rgba([188, 205, 230, 255]);
const ACTION: Rgba<u8> = Rgba([61, 220, 145, 255]);
const REMOVE: Rgba<u8> = Rgba([226, 35, 26, 255]);
const DISABLED: Rgba<u8> = Rgba([200, 200, 200, 255]);
const ERROR: Rgba<u8> = Rgba([226, 35, 26, 255]);

/// Paint the visible part of `root`
pub fn paint(root: &Element) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, BACKGROUND);
    let mut row = 0;
    paint_element(root, 0, &mut row, &mut canvas);
    canvas
}

fn paint_element(element: &Element, depth: u32, row: &mut u32, canvas: &mut RgbaImage) {
    if !element.visible {
        return;
    }
    if let Some(chars) = label_chars(element) {
        let y = *row * ROW_HEIGHT;
        if y + ROW_HEIGHT <= FRAME_HEIGHT {
            let x = (depth * INDENT).min(FRAME_WIDTH - GLYPH_WIDTH);
            let width = (chars * GLYPH_WIDTH).clamp(GLYPH_WIDTH, FRAME_WIDTH - x);
            fill_rect(canvas, x, y + 2, width, ROW_HEIGHT - 4, colour(element));
        }
        *row += 1;
    }
    for child in &element.children {
        paint_element(child, depth + 1, row, canvas);
    }
}

/// Width of the element's row in characters; `None` when it gets no row
fn label_chars(element: &Element) -> Option<u32> {
    let text = element.text.trim();
    if element.field.is_some() {
        let value = element.value.as_deref().unwrap_or_default();
        return Some(u32::try_from(value.chars().count()).unwrap_or(u32::MAX).max(INPUT_CHARS));
    }
    if text.is_empty() && element.on_click.is_none() {
        return None;
    }
    Some(u32::try_from(text.chars().count()).unwrap_or(u32::MAX).max(1))
}

fn colour(element: &Element) -> Rgba<u8> {
    let has_class = |name: &str| element.classes.iter().any(|c| c == name);
    if element.get_attr("data-test").as_deref() == Some("error") {
        ERROR
    } else if !element.enabled {
        DISABLED
    } else if element.field.is_some() {
        INPUT
    } else if element.on_click.is_some() {
        if has_class("btn_secondary") {
            REMOVE
        } else {
            ACTION
        }
    } else {
        TEXT
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, colour: Rgba<u8>) {
    for py in y..(y + height).min(canvas.height()) {
        for px in x..(x + width).min(canvas.width()) {
            canvas.put_pixel(px, py, colour);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn screen(button_hidden: bool) -> Element {
        Element::new("div").children([
            Element::new("div").class("login_logo").text("Swag Labs"),
            Element::new("button")
                .id("login-button")
                .text("Login")
                .hidden_if(button_hidden),
        ])
    }

    fn painted_rows(image: &RgbaImage) -> u32 {
        (0..FRAME_HEIGHT / ROW_HEIGHT)
            .filter(|row| image.get_pixel(INDENT, row * ROW_HEIGHT + ROW_HEIGHT / 2) != &BACKGROUND)
            .count() as u32
    }

    #[test]
    fn test_frame_size_is_fixed() {
        assert_eq!(paint(&screen(false)).dimensions(), (FRAME_WIDTH, FRAME_HEIGHT));
    }

    #[test]
    fn test_hidden_elements_are_not_painted() {
        assert_eq!(painted_rows(&paint(&screen(false))), 2);
        assert_eq!(painted_rows(&paint(&screen(true))), 1);
    }

    #[test]
    fn test_error_banner_colour() {
        let root = Element::new("div").child(Element::new("h3").test_id("error").text("Epic sadface"));
        let image = paint(&root);
        assert_eq!(image.get_pixel(INDENT, ROW_HEIGHT / 2), &ERROR);
    }

    #[test]
    fn test_empty_screen_is_blank() {
        let image = paint(&Element::new("div"));
        assert!(image.pixels().all(|p| p == &BACKGROUND));
    }
}
