//! Preview of the image picked in the product form.

use crate::shared::dom::{self, listen, mark_once};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, File, FileReader, HtmlElement, HtmlImageElement, HtmlInputElement};

const INPUT_ID: &str = "id_product_image";
const PREVIEW_ID: &str = "product-image-preview";
const PREVIEW_MARKER: &str = "data-preview-bound";

/// How a data URL reaches the preview element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewTarget {
    /// The element is an `<img>`; its `src` is replaced
    Image,
    /// Any other element; an `<img>` is rendered inside it
    Container,
}

impl PreviewTarget {
    pub fn for_tag(tag_name: &str) -> Self {
        if tag_name.eq_ignore_ascii_case("img") {
            PreviewTarget::Image
        } else {
            PreviewTarget::Container
        }
    }
}

/// Files without a type are let through; the browser decides.
pub fn is_previewable(mime: &str) -> bool {
    let mime = mime.trim();
    mime.is_empty() || mime.to_ascii_lowercase().starts_with("image/")
}

fn show_preview(preview: &HtmlElement, data_url: &str) {
    match PreviewTarget::for_tag(&preview.tag_name()) {
        PreviewTarget::Image => {
            if let Some(img) = preview.dyn_ref::<HtmlImageElement>() {
                img.set_src(data_url);
            }
        }
        PreviewTarget::Container => {
            let Some(img) = dom::document()
                .and_then(|doc| doc.create_element("img").ok())
                .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
            else {
                return;
            };
            img.set_src(data_url);
            img.set_alt("Product image preview");
            img.set_class_name("img-thumbnail");
            preview.set_inner_html("");
            let _ = preview.append_child(&img);
        }
    }
    dom::set_style(preview, "display", "block");
}

fn read_into_preview(file: File) -> Result<(), String> {
    let reader = FileReader::new().map_err(|e| format!("FileReader unavailable: {:?}", e))?;
    let source = reader.clone();
    let on_load = Closure::once_into_js(move |_ev: Event| {
        let Some(data_url) = source.result().ok().and_then(|r| r.as_string()) else {
            log::warn!("Image preview produced no data");
            return;
        };
        if let Some(preview) = dom::by_id::<HtmlElement>(PREVIEW_ID) {
            show_preview(&preview, &data_url);
        }
    });
    reader.set_onload(Some(on_load.unchecked_ref()));
    reader
        .read_as_data_url(&file)
        .map_err(|e| format!("Failed to read {}: {:?}", file.name(), e))
}

fn on_change(ev: Event) {
    let Some(input) = ev
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return;
    };
    if !is_previewable(&file.type_()) {
        log::debug!("No preview for {} ({})", file.name(), file.type_());
        return;
    }
    if let Err(e) = read_into_preview(file) {
        log::error!("{}", e);
    }
}

pub fn attach(root: &Element) {
    let Some(input) = dom::query_within(root, &format!("#{}", INPUT_ID)).into_iter().next() else {
        return;
    };
    if dom::by_id::<HtmlElement>(PREVIEW_ID).is_none() || !mark_once(&input, PREVIEW_MARKER) {
        return;
    }
    listen(input.as_ref(), "change", on_change);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_target_by_tag() {
        assert_eq!(PreviewTarget::for_tag("IMG"), PreviewTarget::Image);
        assert_eq!(PreviewTarget::for_tag("img"), PreviewTarget::Image);
        assert_eq!(PreviewTarget::for_tag("DIV"), PreviewTarget::Container);
    }

    #[test]
    fn test_only_images_previewed() {
        assert!(is_previewable("image/png"));
        assert!(is_previewable("IMAGE/JPEG"));
        assert!(is_previewable(""));
        assert!(!is_previewable("application/pdf"));
    }
}
