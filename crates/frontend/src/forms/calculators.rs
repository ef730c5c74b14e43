//! Live totals for invoice tables and the single-line purchase/sales forms.

use crate::shared::dom::{self, listen, mark_once};
use crate::shared::number_format::format_money;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement, HtmlSelectElement};

const CALC_MARKER: &str = "data-calc-bound";

/// Leading numeric prefix of `raw`; anything unparsable is 0.
/// Example: "12.5kg" -> 12.5
pub fn parse_number(raw: &str) -> f64 {
    let raw = raw.trim();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in raw.char_indices() {
        let ok = c.is_ascii_digit()
            || (i == 0 && (c == '-' || c == '+'))
            || (c == '.' && !std::mem::replace(&mut seen_dot, true));
        if !ok {
            break;
        }
        end = i + c.len_utf8();
    }
    raw[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// `qty * rate` less a percentage discount.
pub fn line_total(qty: f64, rate: f64, discount_pct: f64) -> f64 {
    qty * rate * (1.0 - discount_pct / 100.0)
}

pub fn grand_total(lines: &[f64]) -> f64 {
    lines.iter().sum()
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DiscountMode {
    /// Discount is a percentage of the subtotal
    Percent,
    /// Discount is an absolute amount
    Amount,
}

impl DiscountMode {
    pub fn from_select(value: &str) -> Self {
        if value == "perc" {
            DiscountMode::Percent
        } else {
            DiscountMode::Amount
        }
    }
}

/// One purchase or sales line as entered in the form
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormLine {
    pub quantity: f64,
    pub rate: f64,
    pub discount: f64,
    pub igst: f64,
    pub mode: DiscountMode,
}

impl FormLine {
    pub fn subtotal(&self) -> f64 {
        self.rate * self.quantity
    }

    pub fn discount_amount(&self) -> f64 {
        match self.mode {
            DiscountMode::Percent => self.subtotal() * self.discount / 100.0,
            DiscountMode::Amount => self.discount,
        }
    }

    pub fn total(&self) -> f64 {
        let subtotal = self.subtotal();
        subtotal - self.discount_amount() + subtotal * self.igst / 100.0
    }
}

/// Field ids of a single-line form
#[derive(Clone, Copy, Debug)]
pub struct LineFormIds {
    pub form: &'static str,
    pub quantity: &'static str,
    pub rate: &'static str,
    pub scheme: &'static str,
    pub discount: &'static str,
    pub igst: &'static str,
    pub mode: &'static str,
}

pub const PURCHASE_FORM: LineFormIds = LineFormIds {
    form: "purchase-form",
    quantity: "id_product_quantity",
    rate: "id_product_purchase_rate",
    scheme: "id_product_scheme",
    discount: "id_product_discount_got",
    igst: "id_IGST",
    mode: "id_purchase_calculation_mode",
};

pub const SALES_FORM: LineFormIds = LineFormIds {
    form: "sales-form",
    quantity: "id_sale_quantity",
    rate: "id_sale_rate",
    scheme: "id_sale_scheme",
    discount: "id_sale_discount",
    igst: "id_sale_igst",
    mode: "id_sale_calculation_mode",
};

/// Current value of an `<input>` or `<select>`.
fn field_value(el: &Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    el.dyn_ref::<HtmlSelectElement>().map(|s| s.value())
}

fn value_by_id(id: &str) -> String {
    dom::by_id::<Element>(id)
        .and_then(|el| field_value(&el))
        .unwrap_or_default()
}

fn number_in_row(row: &Element, selector: &str) -> f64 {
    row.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| field_value(&el))
        .map(|v| parse_number(&v))
        .unwrap_or(0.0)
}

/// Recompute every `.qty-input` row and `#grandTotal`.
pub fn recalc_invoice_table() {
    let mut totals = Vec::new();
    for qty_el in dom::query_all(".qty-input") {
        let Some(row) = dom::closest(&qty_el, "tr") else {
            continue;
        };
        let qty = field_value(&qty_el).map(|v| parse_number(&v)).unwrap_or(0.0);
        let rate = number_in_row(&row, ".rate-input");
        let discount = number_in_row(&row, ".discount-input");
        let total = line_total(qty, rate, discount);

        if let Some(total_input) = row
            .query_selector(".total-input")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            total_input.set_value(&format_money(total));
        }
        totals.push(total);
    }

    dom::set_text("grandTotal", &format_money(grand_total(&totals)));
}

fn read_line(ids: &LineFormIds) -> FormLine {
    FormLine {
        quantity: parse_number(&value_by_id(ids.quantity)),
        rate: parse_number(&value_by_id(ids.rate)),
        discount: parse_number(&value_by_id(ids.discount)),
        igst: parse_number(&value_by_id(ids.igst)),
        mode: DiscountMode::from_select(&value_by_id(ids.mode)),
    }
}

/// Recompute `#total_amount_display` for a purchase or sales form.
pub fn recalc_line_form(ids: &LineFormIds) {
    let total = read_line(ids).total();
    dom::set_text("total_amount_display", &format_money(total));
}

fn bind_invoice_table(root: &Element) {
    let mut bound_any = false;
    for input in dom::query_within(root, ".qty-input, .rate-input, .discount-input") {
        if !mark_once(&input, CALC_MARKER) {
            continue;
        }
        for event in ["change", "keyup", "input"] {
            listen(input.as_ref(), event, |_ev: Event| recalc_invoice_table());
        }
        bound_any = true;
    }
    if bound_any {
        recalc_invoice_table();
    }
}

fn bind_line_form(root: &Element, ids: &'static LineFormIds) {
    let selector = format!("#{}", ids.form);
    let Some(form) = dom::query_within(root, &selector).into_iter().next() else {
        return;
    };
    if !mark_once(&form, CALC_MARKER) {
        return;
    }

    let fields = [ids.quantity, ids.rate, ids.scheme, ids.discount, ids.igst, ids.mode];
    for id in fields {
        let Some(el) = dom::by_id::<Element>(id) else {
            continue;
        };
        listen(el.as_ref(), "input", move |_ev: Event| recalc_line_form(ids));
        listen(el.as_ref(), "change", move |_ev: Event| recalc_line_form(ids));
    }
    recalc_line_form(ids);
    log::info!("Totals bound for #{}", ids.form);
}

/// Choosing `custom` unlocks the sale rate; A/B/C lock it.
fn bind_rate_selection(root: &Element) {
    let Some(select) = dom::query_within(root, "#id_rate_applied").into_iter().next() else {
        return;
    };
    if !mark_once(&select, CALC_MARKER) {
        return;
    }
    listen(select.as_ref(), "change", |ev: Event| {
        let Some(select) = dom::event_element(&ev) else {
            return;
        };
        let Some(rate) = dom::input_by_id("id_sale_rate") else {
            return;
        };
        let custom = field_value(&select).as_deref() == Some("custom");
        rate.set_read_only(!custom);
        if custom {
            let _ = rate.focus();
        }
    });
}

pub fn attach(root: &Element) {
    bind_invoice_table(root);
    bind_line_form(root, &PURCHASE_FORM);
    bind_line_form(root, &SALES_FORM);
    bind_rate_selection(root);
}
