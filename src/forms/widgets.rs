//! HTML widgets. Every control gets its classes from [`widget_class`] so
//! forms look the same across the site.

use chrono::Datelike;

use super::FormData;
use crate::domain::FieldErrors;
use crate::utils::html::escape;

const INPUT_CLASS: &str = "block w-full rounded-md border border-gray-300 px-3 py-2 text-sm \
    shadow-sm focus:border-indigo-500 focus:outline-none focus:ring-1 focus:ring-indigo-500";
const SELECT_CLASS: &str = "block w-full rounded-md border border-gray-300 bg-white px-3 py-2 \
    text-sm shadow-sm focus:border-indigo-500 focus:outline-none";
const DATE_PART_CLASS: &str = "rounded-md border border-gray-300 bg-white px-2 py-2 text-sm";
const FILE_CLASS: &str = "block w-full text-sm text-gray-700 file:mr-4 file:rounded-md \
    file:border-0 file:bg-indigo-50 file:px-3 file:py-2 file:text-indigo-700";
const INVALID_CLASS: &str = "border-red-500";

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl ToString, label: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
        }
    }

    /// The "---------" entry of an optional select.
    pub fn blank() -> Self {
        Self::new("", "---------")
    }
}

#[derive(Debug, Clone)]
pub enum Widget {
    Text { max_length: Option<usize> },
    Email,
    Url,
    Number,
    TextArea,
    Select(Vec<Choice>),
    MultiSelect(Vec<Choice>),
    Date,
    Time,
    /// Year / month / day selects named `{name}_year`, `{name}_month`, `{name}_day`
    SelectDate { years: Vec<i32> },
    File { accept: &'static str },
    /// Pre-rendered control (the composer picker)
    Custom(String),
}

impl Widget {
    pub fn text(max_length: usize) -> Self {
        Widget::Text {
            max_length: Some(max_length),
        }
    }

    /// Year selector spanning `back` years before and `ahead` years after now.
    pub fn select_date(back: i32, ahead: i32) -> Self {
        let this_year = chrono::Local::now().year();
        Widget::SelectDate {
            years: ((this_year - back)..=(this_year + ahead)).rev().collect(),
        }
    }

    /// Year selector from `first_year` up to the current year.
    pub fn select_date_since(first_year: i32) -> Self {
        let this_year = chrono::Local::now().year();
        Widget::SelectDate {
            years: (first_year..=this_year).rev().collect(),
        }
    }
}

/// Shared styling for every widget.
pub fn widget_class(widget: &Widget, invalid: bool) -> String {
    let base = match widget {
        Widget::Select(_) | Widget::MultiSelect(_) => SELECT_CLASS,
        Widget::SelectDate { .. } => DATE_PART_CLASS,
        Widget::File { .. } => FILE_CLASS,
        _ => INPUT_CLASS,
    };
    if invalid {
        format!("{} {}", base, INVALID_CLASS)
    } else {
        base.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: Widget,
    pub required: bool,
    pub help_text: Option<&'static str>,
}

impl Field {
    pub fn new(name: &'static str, label: &'static str, widget: Widget) -> Self {
        Self {
            name,
            label,
            widget,
            required: false,
            help_text: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn help(mut self, text: &'static str) -> Self {
        self.help_text = Some(text);
        self
    }
}

fn render_options(choices: &[Choice], selected: &[&str]) -> String {
    choices
        .iter()
        .map(|c| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(&c.value),
                if selected.contains(&c.value.as_str()) {
                    " selected"
                } else {
                    ""
                },
                escape(&c.label)
            )
        })
        .collect()
}

/// Current `(year, month, day)` strings of a date field, from either the
/// ISO value or the three-select parts.
fn date_parts(name: &str, data: &FormData) -> (String, String, String) {
    if let Some(iso) = data.get(name)
        && let Ok(date) = chrono::NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d")
    {
        return (
            date.year().to_string(),
            date.month().to_string(),
            date.day().to_string(),
        );
    }
    (
        data.text(&format!("{}_year", name)),
        data.text(&format!("{}_month", name)),
        data.text(&format!("{}_day", name)),
    )
}

fn render_select_date(field: &Field, years: &[i32], data: &FormData, class: &str) -> String {
    let (year, month, day) = date_parts(field.name, data);
    let blank = Choice::blank();
    let mut years = years.to_vec();
    // A stored year outside the range stays selectable
    if let Ok(stored) = year.parse::<i32>()
        && !years.contains(&stored)
    {
        years.push(stored);
        years.sort_unstable_by(|a, b| b.cmp(a));
    }
    let mut year_choices = vec![blank.clone()];
    year_choices.extend(years.iter().map(|y| Choice::new(y, y.to_string())));
    let mut month_choices = vec![blank.clone()];
    month_choices.extend(MONTHS.iter().enumerate().map(|(i, m)| Choice::new(i + 1, *m)));
    let mut day_choices = vec![blank];
    day_choices.extend((1..=31).map(|d| Choice::new(d, d.to_string())));

    format!(
        r#"<div class="flex gap-2" id="id_{name}">
<select name="{name}_month" class="{class}" aria-label="Month">{months}</select>
<select name="{name}_day" class="{class}" aria-label="Day">{days}</select>
<select name="{name}_year" class="{class}" aria-label="Year">{years}</select>
</div>"#,
        name = field.name,
        class = class,
        months = render_options(&month_choices, &[month.as_str()]),
        days = render_options(&day_choices, &[day.as_str()]),
        years = render_options(&year_choices, &[year.as_str()]),
    )
}

/// The bare control for `field`, filled with the value from `data`.
pub fn render_widget(field: &Field, data: &FormData, invalid: bool) -> String {
    let class = widget_class(&field.widget, invalid);
    let name = field.name;
    let value = escape(data.get(name).unwrap_or_default());
    let required = if field.required { " required" } else { "" };

    match &field.widget {
        Widget::Text { max_length } => format!(
            r#"<input type="text" name="{name}" id="id_{name}" value="{value}" class="{class}"{maxlength}{required}>"#,
            maxlength = max_length
                .map(|m| format!(r#" maxlength="{}""#, m))
                .unwrap_or_default(),
        ),
        Widget::Email => format!(
            r#"<input type="email" name="{name}" id="id_{name}" value="{value}" class="{class}"{required}>"#
        ),
        Widget::Url => format!(
            r#"<input type="url" name="{name}" id="id_{name}" value="{value}" class="{class}"{required}>"#
        ),
        Widget::Number => format!(
            r#"<input type="number" name="{name}" id="id_{name}" value="{value}" class="{class}"{required}>"#
        ),
        Widget::Date => format!(
            r#"<input type="date" name="{name}" id="id_{name}" value="{value}" class="{class}"{required}>"#
        ),
        Widget::Time => format!(
            r#"<input type="time" name="{name}" id="id_{name}" value="{value}" class="{class}"{required}>"#
        ),
        Widget::TextArea => format!(
            r#"<textarea name="{name}" id="id_{name}" rows="4" class="{class}"{required}>{value}</textarea>"#
        ),
        Widget::Select(choices) => format!(
            r#"<select name="{name}" id="id_{name}" class="{class}"{required}>{options}</select>"#,
            options = render_options(choices, &[data.get(name).unwrap_or_default()]),
        ),
        Widget::MultiSelect(choices) => format!(
            r#"<select name="{name}" id="id_{name}" multiple size="6" class="{class}">{options}</select>"#,
            options = render_options(choices, &data.get_all(name)),
        ),
        Widget::SelectDate { years } => render_select_date(field, years, data, &class),
        Widget::File { accept } => format!(
            r#"<input type="file" name="{name}" id="id_{name}" accept="{accept}" class="{class}">"#
        ),
        Widget::Custom(html) => html.clone(),
    }
}

/// Label, control, help text and error list for one field.
pub fn render_field(field: &Field, data: &FormData, errors: &FieldErrors) -> String {
    let messages = errors.get(field.name);
    let error_html: String = messages
        .iter()
        .map(|m| format!(r#"<p class="mt-1 text-sm text-red-600">{}</p>"#, escape(m)))
        .collect();
    let help_html = field
        .help_text
        .map(|h| format!(r#"<p class="mt-1 text-xs text-gray-500">{}</p>"#, escape(h)))
        .unwrap_or_default();

    format!(
        r#"<div class="mb-4">
<label for="id_{name}" class="mb-1 block text-sm font-medium text-gray-700">{label}{star}</label>
{control}
{help_html}{error_html}
</div>"#,
        name = field.name,
        label = escape(field.label),
        star = if field.required {
            r#" <span class="text-red-600">*</span>"#
        } else {
            ""
        },
        control = render_widget(field, data, !messages.is_empty()),
    )
}

/// Non-field errors followed by every field.
pub fn render_fields(fields: &[Field], data: &FormData, errors: &FieldErrors) -> String {
    let mut html: String = errors
        .non_field()
        .iter()
        .map(|m| {
            format!(
                r#"<div class="mb-4 rounded-md bg-red-50 p-3 text-sm text-red-700">{}</div>"#,
                escape(m)
            )
        })
        .collect();
    for field in fields {
        html.push_str(&render_field(field, data, errors));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_input_keeps_entered_value_escaped() {
        let field = Field::new("last_name", "Last name", Widget::text(100)).required();
        let data = FormData::new().with("last_name", "O'Brien <b>");
        let html = render_widget(&field, &data, false);
        assert!(html.contains(r#"value="O&#x27;Brien &lt;b&gt;""#));
        assert!(html.contains(r#"maxlength="100""#));
        assert!(html.contains(" required"));
    }

    #[test]
    fn select_marks_current_choice() {
        let field = Field::new(
            "status",
            "Status",
            Widget::Select(vec![Choice::new("OWNED", "Owned"), Choice::new("RENTED", "Rented")]),
        );
        let html = render_widget(&field, &FormData::new().with("status", "RENTED"), false);
        assert!(html.contains(r#"<option value="RENTED" selected>Rented</option>"#));
        assert!(html.contains(r#"<option value="OWNED">Owned</option>"#));
    }

    #[test]
    fn select_date_reads_iso_value() {
        let field = Field::new(
            "purchase_date",
            "Purchase date",
            Widget::SelectDate {
                years: vec![2024, 2023],
            },
        );
        let html = render_widget(
            &field,
            &FormData::new().with("purchase_date", "2023-02-09"),
            false,
        );
        assert!(html.contains(r#"name="purchase_date_year""#));
        assert!(html.contains(r#"<option value="2023" selected>2023</option>"#));
        assert!(html.contains(r#"<option value="2" selected>February</option>"#));
        assert!(html.contains(r#"<option value="9" selected>9</option>"#));
    }

    #[test]
    fn select_date_keeps_year_outside_range() {
        let field = Field::new(
            "copyright_date",
            "Copyright date",
            Widget::SelectDate {
                years: vec![2024, 2023],
            },
        );
        let html = render_widget(
            &field,
            &FormData::new().with("copyright_date", "1685-03-21"),
            false,
        );
        assert!(html.contains(r#"<option value="1685" selected>1685</option>"#));
        let newest = html.find(r#"value="2024""#).unwrap();
        assert!(newest < html.find(r#"value="1685""#).unwrap());
    }

    #[test]
    fn errors_are_listed_and_styled() {
        let field = Field::new("name", "Name", Widget::text(10));
        let mut errors = FieldErrors::new();
        errors.add("name", "This field is required.");
        let html = render_field(&field, &FormData::new(), &errors);
        assert!(html.contains("This field is required."));
        assert!(html.contains(INVALID_CLASS));
    }

    #[test]
    fn non_field_errors_come_before_the_fields() {
        let fields = [Field::new("name", "Name", Widget::text(10))];
        let mut errors = FieldErrors::new();
        errors.add_non_field("The poster could not be saved.");
        let html = render_fields(&fields, &FormData::new(), &errors);
        let message = html.find("The poster could not be saved.").unwrap();
        assert!(message < html.find(r#"name="name""#).unwrap());
    }
}
