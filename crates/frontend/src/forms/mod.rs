pub mod calculators;
pub mod date_fields;
pub mod image_preview;
pub mod product_lookup;

use web_sys::Element;

/// Bind form behaviours inside `root`.
pub fn attach(root: &Element) {
    date_fields::binding::attach(root);
    calculators::attach(root);
    product_lookup::attach(root);
    image_preview::attach(root);
}
