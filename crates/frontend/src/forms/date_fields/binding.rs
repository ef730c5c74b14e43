use super::{accepts_key, DateFormat, DateNormalizer, SubmitStrategy, ValidationOutcome, FORMAT_ATTR};
use crate::shared::date_utils::split_iso;
use crate::shared::dom::{self, add_class, closest, listen, mark_once, remove_class, set_style};
use chrono::NaiveDate;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, HtmlFormElement, HtmlInputElement, KeyboardEvent};

const FIELD_MARKER: &str = "data-date-bound";
const FORM_MARKER: &str = "data-date-form-bound";
/// Last value that passed validation, in submit form
pub const CANONICAL_ATTR: &str = "data-canonical";
/// Set once the user has edited a field rendered with a server value
const DIRTY_ATTR: &str = "data-date-dirty";
const FEEDBACK_MS: u32 = 3000;
/// Hidden input posting a disabled field's value; holds the field's name
const COMPANION_ATTR: &str = "data-date-companion";
/// Display text of an overwritten field, kept until the submit goes through
const DISPLAY_ATTR: &str = "data-date-display";

/// What a submit does with a field's hidden companion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompanionPlan {
    Append,
    Update,
    Keep,
}

/// `existing` is the value of the companion already in the form, if any.
pub fn companion_plan(existing: Option<&str>, value: &str) -> CompanionPlan {
    match existing {
        None => CompanionPlan::Append,
        Some(current) if current == value => CompanionPlan::Keep,
        Some(_) => CompanionPlan::Update,
    }
}

/// Value sent on submit: the stored canonical value, otherwise whatever the
/// current display converts to.
pub fn submit_value(
    normalizer: &dyn DateNormalizer,
    display: &str,
    stored: Option<String>,
    today: NaiveDate,
) -> Option<String> {
    stored
        .filter(|v| !v.is_empty())
        .or_else(|| normalizer.canonical(display, today))
}

/// Canonical value kept for a server-rendered initial value.
/// `DayMonth` keeps the server's year; the others derive it from the display.
pub fn initial_canonical(
    format: DateFormat,
    server_value: &str,
    display: &str,
    today: NaiveDate,
) -> Option<String> {
    match format {
        DateFormat::DayMonth => {
            split_iso(server_value).map(|(y, m, d)| format!("{}-{}-{}", y, m, d))
        }
        _ => format.normalizer().canonical(display, today),
    }
}

fn field_format(input: &Element) -> Option<DateFormat> {
    let attr = input.get_attribute(FORMAT_ATTR)?;
    let format = DateFormat::from_attr(&attr);
    if format.is_none() {
        log::warn!("Unknown {}=\"{}\"; field left untouched", FORMAT_ATTR, attr);
    }
    format
}

/// Bind every declared date field and every form under `root`.
pub fn attach(root: &Element) {
    for el in dom::query_within(root, "input[data-date-format]") {
        if let Ok(input) = el.dyn_into::<HtmlInputElement>() {
            bind_field(&input);
        }
    }
    for el in dom::query_within(root, "form") {
        if let Ok(form) = el.dyn_into::<HtmlFormElement>() {
            bind_form(&form);
        }
    }
}

fn bind_field(input: &HtmlInputElement) {
    let Some(format) = field_format(input) else {
        return;
    };
    if !mark_once(input, FIELD_MARKER) {
        return;
    }
    let normalizer = format.normalizer();

    input.set_type("text");
    input.set_placeholder(normalizer.placeholder());
    input.set_max_length(normalizer.max_length() as i32);

    let server_value = input.value();
    if !server_value.trim().is_empty() {
        if let (Some(display), Some(today)) =
            (normalizer.display_from_server(&server_value), dom::today())
        {
            input.set_value(&display);
            if let Some(canonical) = initial_canonical(format, &server_value, &display, today) {
                let _ = input.set_attribute(CANONICAL_ATTR, &canonical);
                add_class(input, "valid-date");
            }
        }
    }

    let field = input.clone();
    listen(input.as_ref(), "input", move |_ev: Event| {
        on_input(&field, normalizer);
    });

    let field = input.clone();
    listen(input.as_ref(), "blur", move |_ev: Event| {
        on_blur(&field, normalizer);
    });

    let field = input.clone();
    listen(input.as_ref(), "keypress", move |ev: Event| {
        let Some(key_ev) = ev.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let key = key_ev.key();
        if normalizer.enter_advances() && key == "Enter" {
            ev.prevent_default();
            field.set_value(&normalizer.finalize(&normalizer.format(&field.value())));
            focus_next_field(&field);
            return;
        }
        if normalizer.digits_only() && !accepts_key(&key) {
            ev.prevent_default();
        }
    });
}

fn on_input(input: &HtmlInputElement, normalizer: &'static dyn DateNormalizer) {
    let display = normalizer.format(&input.value());
    if display != input.value() {
        input.set_value(&display);
    }
    let _ = input.set_attribute(DIRTY_ATTR, "true");
    let _ = input.remove_attribute(CANONICAL_ATTR);
    remove_class(input, "valid-date");
    remove_class(input, "invalid-date");
    set_style(input, "border-color", "");
    hide_feedback(input);
    if normalizer.uses_custom_validity() {
        input.set_custom_validity("");
    }

    if !normalizer.validates_while_typing() || display.is_empty() {
        return;
    }
    if normalizer.is_complete(&display) {
        let Some(today) = dom::today() else {
            return;
        };
        let outcome = normalizer.validate_on(&display, today);
        apply_outcome(input, normalizer, &display, &outcome, today);
    } else if let Some(hint) = normalizer.partial_hint() {
        set_style(input, "border-color", "#ffc107");
        input.set_title(hint);
    }
}

fn on_blur(input: &HtmlInputElement, normalizer: &'static dyn DateNormalizer) {
    let display = normalizer.finalize(&input.value());
    if display != input.value() {
        input.set_value(&display);
    }

    if display.is_empty() {
        let _ = input.remove_attribute(CANONICAL_ATTR);
        remove_class(input, "valid-date");
        remove_class(input, "invalid-date");
        if normalizer.uses_custom_validity() {
            input.set_custom_validity("");
        }
        return;
    }

    // Server-rendered value the user never touched.
    if !input.has_attribute(DIRTY_ATTR) && input.has_attribute(CANONICAL_ATTR) {
        return;
    }

    let Some(today) = dom::today() else {
        return;
    };
    let outcome = normalizer.validate_on(&display, today);
    apply_outcome(input, normalizer, &display, &outcome, today);

    if normalizer.uses_custom_validity() {
        input.set_custom_validity(&outcome.message);
        if !outcome.valid {
            input.report_validity();
        }
    } else if !outcome.valid {
        show_feedback(input, &outcome.message, false);
    } else if let Some(text) = normalizer.confirmation(&display, today) {
        show_feedback(input, &text, true);
    }
}

fn apply_outcome(
    input: &HtmlInputElement,
    normalizer: &dyn DateNormalizer,
    display: &str,
    outcome: &ValidationOutcome,
    today: NaiveDate,
) {
    let canonical = if outcome.valid {
        normalizer.canonical(display, today)
    } else {
        None
    };
    match canonical {
        Some(value) => {
            let _ = input.set_attribute(CANONICAL_ATTR, &value);
            add_class(input, "valid-date");
            remove_class(input, "invalid-date");
            set_style(input, "border-color", "#28a745");
            input.set_title("");
        }
        None => {
            let _ = input.remove_attribute(CANONICAL_ATTR);
            add_class(input, "invalid-date");
            remove_class(input, "valid-date");
            set_style(input, "border-color", "#dc3545");
            input.set_title(&outcome.message);
        }
    }
}

fn feedback_container(input: &HtmlInputElement) -> Option<Element> {
    closest(input, ".form-group").or_else(|| input.parent_element())
}

fn hide_feedback(input: &HtmlInputElement) {
    let Some(container) = feedback_container(input) else {
        return;
    };
    if let Ok(Some(existing)) = container.query_selector(".date-feedback") {
        existing.remove();
    }
}

fn show_feedback(input: &HtmlInputElement, message: &str, success: bool) {
    hide_feedback(input);
    let (Some(container), Some(doc)) = (feedback_container(input), dom::document()) else {
        return;
    };
    let Ok(note) = doc.create_element("div") else {
        return;
    };
    let kind = if success { "success" } else { "error" };
    note.set_class_name(&format!("date-feedback date-feedback-{}", kind));
    note.set_text_content(Some(message));
    if let Some(html) = container.dyn_ref::<HtmlElement>() {
        set_style(html, "position", "relative");
    }
    let _ = container.append_child(&note);
    dom::after(FEEDBACK_MS, move || note.remove());
}

fn focus_next_field(current: &HtmlInputElement) {
    let fields = dom::query_all("input, select");
    let Some(pos) = fields
        .iter()
        .position(|el| el.is_same_node(Some(current)))
    else {
        return;
    };
    if let Some(next) = fields
        .get(pos + 1)
        .and_then(|el| el.dyn_ref::<HtmlElement>())
    {
        let _ = next.focus();
    }
}

fn bind_form(form: &HtmlFormElement) {
    if !mark_once(form, FORM_MARKER) {
        return;
    }
    let target = form.clone();
    listen(form.as_ref(), "submit", move |ev: Event| {
        rewrite_for_submit(&target);
        // Later listeners may still cancel; check once dispatch is over
        let form = target.clone();
        dom::after(0, move || {
            if ev.default_prevented() {
                restore_after_cancel(&form);
            }
        });
    });
}

fn companion_of(form: &HtmlFormElement, name: &str) -> Option<HtmlInputElement> {
    let found = form.query_selector_all(&format!("input[{}]", COMPANION_ATTR)).ok()?;
    (0..found.length())
        .filter_map(|i| found.item(i))
        .filter_map(|n| n.dyn_into::<HtmlInputElement>().ok())
        .find(|el| el.get_attribute(COMPANION_ATTR).as_deref() == Some(name))
}

fn post_through_companion(form: &HtmlFormElement, input: &HtmlInputElement, value: &str) {
    let name = input.name();
    let existing = companion_of(form, &name);
    match companion_plan(existing.as_ref().map(|c| c.value()).as_deref(), value) {
        CompanionPlan::Keep => {}
        CompanionPlan::Update => {
            if let Some(companion) = &existing {
                companion.set_value(value);
            }
        }
        CompanionPlan::Append => {
            let Some(hidden) = dom::document()
                .and_then(|doc| doc.create_element("input").ok())
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            hidden.set_type("hidden");
            hidden.set_name(&name);
            hidden.set_value(value);
            let _ = hidden.set_attribute(COMPANION_ATTR, &name);
            let _ = form.append_child(&hidden);
        }
    }
    input.set_disabled(true);
}

/// Undo a submit rewrite after the submit was cancelled.
fn restore_after_cancel(form: &HtmlFormElement) {
    let Ok(fields) = form.query_selector_all("input[data-date-format]") else {
        return;
    };
    for i in 0..fields.length() {
        let Some(input) = fields
            .item(i)
            .and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
        else {
            continue;
        };
        if let Some(companion) = companion_of(form, &input.name()) {
            companion.remove();
            input.set_disabled(false);
        }
        if let Some(display) = input.get_attribute(DISPLAY_ATTR) {
            input.set_value(&display);
            let _ = input.remove_attribute(DISPLAY_ATTR);
        }
    }
    log::debug!("Submit cancelled; date fields restored");
}

/// Replace every declared field's value with its canonical form.
fn rewrite_for_submit(form: &HtmlFormElement) {
    let Some(today) = dom::today() else {
        return;
    };
    let Ok(fields) = form.query_selector_all("input[data-date-format]") else {
        return;
    };
    for i in 0..fields.length() {
        let Some(input) = fields
            .item(i)
            .and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
        else {
            continue;
        };
        let Some(format) = field_format(&input) else {
            continue;
        };
        let normalizer = format.normalizer();
        let display = input.value();
        let Some(value) = submit_value(
            normalizer,
            &display,
            input.get_attribute(CANONICAL_ATTR),
            today,
        ) else {
            continue;
        };

        match normalizer.submit_strategy() {
            SubmitStrategy::Overwrite => {
                if display != value {
                    let _ = input.set_attribute(DISPLAY_ATTR, &display);
                    input.set_value(&value);
                }
            }
            SubmitStrategy::HiddenCompanion => post_through_companion(form, &input, &value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::date_fields::{DayMonth, DayMonthYear, MonthYear};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_submit_prefers_stored_canonical() {
        let today = day(2025, 6, 1);
        assert_eq!(
            submit_value(&DayMonth, "1503", Some("2023-03-15".into()), today).as_deref(),
            Some("2023-03-15")
        );
    }

    #[test]
    fn test_complete_ddmm_converted_at_submit() {
        let today = day(2025, 6, 1);
        assert_eq!(
            submit_value(&DayMonth, "1503", None, today).as_deref(),
            Some("2025-03-15")
        );
        assert_eq!(submit_value(&DayMonth, "15", None, today), None);
    }

    #[test]
    fn test_invalid_values_are_left_alone() {
        let today = day(2025, 6, 1);
        assert_eq!(submit_value(&DayMonthYear, "29022023", None, today), None);
        assert_eq!(submit_value(&MonthYear, "13-2025", Some(String::new()), today), None);
    }

    #[test]
    fn test_repeated_submit_reuses_companion() {
        assert_eq!(companion_plan(None, "2025-03-15"), CompanionPlan::Append);
        assert_eq!(companion_plan(Some("2025-03-15"), "2025-03-15"), CompanionPlan::Keep);
        assert_eq!(companion_plan(Some("2025-03-15"), "2025-04-01"), CompanionPlan::Update);
    }

    #[test]
    fn test_server_year_kept_for_day_month() {
        let today = day(2025, 6, 1);
        assert_eq!(
            initial_canonical(DateFormat::DayMonth, "2023-03-15", "1503", today).as_deref(),
            Some("2023-03-15")
        );
        assert_eq!(
            initial_canonical(DateFormat::DayMonthYear, "2023-03-15", "15032023", today)
                .as_deref(),
            Some("2023-03-15")
        );
        assert_eq!(
            initial_canonical(DateFormat::MonthYear, "04-2026", "04-2026", today).as_deref(),
            Some("04-2026")
        );
    }
}
