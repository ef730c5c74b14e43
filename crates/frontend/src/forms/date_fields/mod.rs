//! Date field normalizers.
//!
//! Each input declares its convention with `data-date-format`; the attribute
//! selects one [`DateNormalizer`] and nothing else about the field (id, name,
//! class) is consulted.
//!
//! | attribute    | display       | canonical (submitted) |
//! |--------------|---------------|-----------------------|
//! | `month-year` | `MM-YYYY`     | `MM-YYYY`             |
//! | `ddmmyyyy`   | `DDMMYYYY`    | `YYYY-MM-DD`          |
//! | `ddmm`       | `DDMM`        | `YYYY-MM-DD` (year taken on blur) |
//! | `flexible`   | `DD-MM-YYYY`  | `YYYY-MM-DD`          |

pub mod binding;
pub mod day_month;
pub mod day_month_year;
pub mod flexible;
pub mod month_year;

use chrono::NaiveDate;

pub use day_month::DayMonth;
pub use day_month_year::DayMonthYear;
pub use flexible::Flexible;
pub use month_year::MonthYear;

/// Attribute carrying the declared variant
pub const FORMAT_ATTR: &str = "data-date-format";

/// Explicit per-field date convention
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DateFormat {
    MonthYear,
    DayMonthYear,
    DayMonth,
    Flexible,
}

impl DateFormat {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim() {
            "month-year" => Some(DateFormat::MonthYear),
            "ddmmyyyy" => Some(DateFormat::DayMonthYear),
            "ddmm" => Some(DateFormat::DayMonth),
            "flexible" => Some(DateFormat::Flexible),
            _ => None,
        }
    }

    pub fn as_attr(&self) -> &'static str {
        match self {
            DateFormat::MonthYear => "month-year",
            DateFormat::DayMonthYear => "ddmmyyyy",
            DateFormat::DayMonth => "ddmm",
            DateFormat::Flexible => "flexible",
        }
    }

    pub fn normalizer(&self) -> &'static dyn DateNormalizer {
        match self {
            DateFormat::MonthYear => &MonthYear,
            DateFormat::DayMonthYear => &DayMonthYear,
            DateFormat::DayMonth => &DayMonth,
            DateFormat::Flexible => &Flexible,
        }
    }
}

/// Result of validating a display string
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub message: String,
}

impl ValidationOutcome {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// How the canonical value reaches the server on submit
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SubmitStrategy {
    /// Replace the input's own value
    Overwrite,
    /// Disable the input and post a hidden input with the same name
    HiddenCompanion,
}

pub trait DateNormalizer {
    fn placeholder(&self) -> &'static str;

    fn max_length(&self) -> u32;

    /// Keystroke mask, applied on every `input` event.
    fn format(&self, raw: &str) -> String;

    /// Applied once on blur before validation.
    fn finalize(&self, display: &str) -> String {
        display.to_string()
    }

    fn validate(&self, display: &str) -> ValidationOutcome;

    /// Validation that may depend on the calendar date. Defaults to
    /// [`DateNormalizer::validate`].
    fn validate_on(&self, display: &str, _today: NaiveDate) -> ValidationOutcome {
        self.validate(display)
    }

    /// Value to submit. `None` for empty, partial or invalid input.
    fn canonical(&self, display: &str, today: NaiveDate) -> Option<String>;

    /// Convert a server-rendered initial value into this variant's display form.
    fn display_from_server(&self, value: &str) -> Option<String>;

    /// Input is checked while typing once `is_complete` holds, instead of
    /// waiting for blur.
    fn validates_while_typing(&self) -> bool {
        false
    }

    fn is_complete(&self, display: &str) -> bool;

    /// Message shown after a successful blur
    fn confirmation(&self, _display: &str, _today: NaiveDate) -> Option<String> {
        None
    }

    /// Hint shown while the value is still partial
    fn partial_hint(&self) -> Option<&'static str> {
        None
    }

    /// Keypresses other than digits and editing keys are rejected.
    fn digits_only(&self) -> bool {
        true
    }

    /// Enter finalizes the value and moves focus to the next field.
    fn enter_advances(&self) -> bool {
        false
    }

    /// Errors go through the native constraint-validation bubble.
    fn uses_custom_validity(&self) -> bool {
        false
    }

    fn submit_strategy(&self) -> SubmitStrategy {
        SubmitStrategy::Overwrite
    }
}

/// Editing keys that stay allowed in digit-only fields
pub fn is_editing_key(key: &str) -> bool {
    matches!(
        key,
        "Backspace" | "Delete" | "Tab" | "Enter" | "ArrowLeft" | "ArrowRight" | "Home" | "End"
    )
}

/// Whether a `keypress`/`keydown` key is accepted by a digit-only field
pub fn accepts_key(key: &str) -> bool {
    is_editing_key(key) || (key.len() == 1 && key.chars().all(|c| c.is_ascii_digit()))
}
