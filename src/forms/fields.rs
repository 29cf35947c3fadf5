//! Field cleaning. Each helper reads one field from the submitted data,
//! records any problem under that field's name and returns the cleaned value.

use chrono::{NaiveDate, NaiveTime};

use super::FormData;
use crate::domain::FieldErrors;

pub const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

fn check_length(name: &str, value: &str, max_length: usize, errors: &mut FieldErrors) {
    let length = value.chars().count();
    if length > max_length {
        errors.add(
            name,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max_length, length
            ),
        );
    }
}

pub fn required_text(
    data: &FormData,
    name: &str,
    max_length: usize,
    errors: &mut FieldErrors,
) -> String {
    let value = data.text(name);
    if value.is_empty() {
        errors.add(name, REQUIRED);
    } else {
        check_length(name, &value, max_length, errors);
    }
    value
}

pub fn optional_text(
    data: &FormData,
    name: &str,
    max_length: Option<usize>,
    errors: &mut FieldErrors,
) -> String {
    let value = data.text(name);
    if let Some(max) = max_length {
        check_length(name, &value, max, errors);
    }
    value
}

pub fn optional_email(data: &FormData, name: &str, errors: &mut FieldErrors) -> String {
    let value = data.text(name);
    if !value.is_empty() && !is_valid_email(&value) {
        errors.add(name, "Enter a valid email address.");
    }
    value
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !local.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '.')
}

/// Absolute http(s) URL, or empty.
pub fn optional_url(data: &FormData, name: &str, errors: &mut FieldErrors) -> String {
    let value = data.text(name);
    if value.is_empty() {
        return value;
    }
    match url::Url::parse(&value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => value,
        _ => {
            errors.add(name, "Enter a valid URL.");
            value
        }
    }
}

pub fn optional_int(data: &FormData, name: &str, errors: &mut FieldErrors) -> Option<i32> {
    let value = data.text(name);
    if value.is_empty() {
        return None;
    }
    match value.parse::<i32>() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.add(name, "Enter a whole number.");
            None
        }
    }
}

/// A date sent either as `name=YYYY-MM-DD` or as the three-select parts
/// `name_year`, `name_month`, `name_day`. `Ok(None)` when nothing was sent.
fn parse_date(data: &FormData, name: &str) -> Result<Option<NaiveDate>, ()> {
    let iso = data.text(name);
    if !iso.is_empty() {
        return NaiveDate::parse_from_str(&iso, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ());
    }
    let year = data.text(&format!("{}_year", name));
    let month = data.text(&format!("{}_month", name));
    let day = data.text(&format!("{}_day", name));
    if year.is_empty() && month.is_empty() && day.is_empty() {
        return Ok(None);
    }
    let (Ok(y), Ok(m), Ok(d)) = (year.parse(), month.parse(), day.parse()) else {
        return Err(());
    };
    NaiveDate::from_ymd_opt(y, m, d).map(Some).ok_or(())
}

pub fn optional_date(data: &FormData, name: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    match parse_date(data, name) {
        Ok(date) => date,
        Err(()) => {
            errors.add(name, "Enter a valid date.");
            None
        }
    }
}

pub fn required_date(data: &FormData, name: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    match parse_date(data, name) {
        Ok(Some(date)) => Some(date),
        Ok(None) => {
            errors.add(name, REQUIRED);
            None
        }
        Err(()) => {
            errors.add(name, "Enter a valid date.");
            None
        }
    }
}

pub fn required_time(data: &FormData, name: &str, errors: &mut FieldErrors) -> Option<NaiveTime> {
    let value = data.text(name);
    if value.is_empty() {
        errors.add(name, REQUIRED);
        return None;
    }
    let parsed = NaiveTime::parse_from_str(&value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M:%S"));
    match parsed {
        Ok(time) => Some(time),
        Err(_) => {
            errors.add(name, "Enter a valid time.");
            None
        }
    }
}

/// One value out of a fixed set. Empty means unset.
pub fn choice<T>(
    data: &FormData,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
    required: bool,
    errors: &mut FieldErrors,
) -> Option<T> {
    let value = data.text(name);
    if value.is_empty() {
        if required {
            errors.add(name, REQUIRED);
        }
        return None;
    }
    match parse(&value) {
        Some(v) => Some(v),
        None => {
            errors.add(
                name,
                format!(
                    "Select a valid choice. {} is not one of the available choices.",
                    value
                ),
            );
            None
        }
    }
}

/// One row id out of `valid_ids`.
pub fn model_choice(
    data: &FormData,
    name: &str,
    valid_ids: &[i32],
    required: bool,
    errors: &mut FieldErrors,
) -> Option<i32> {
    let value = data.text(name);
    if value.is_empty() {
        if required {
            errors.add(name, REQUIRED);
        }
        return None;
    }
    match value.parse::<i32>() {
        Ok(id) if valid_ids.contains(&id) => Some(id),
        _ => {
            errors.add(name, INVALID_CHOICE);
            None
        }
    }
}

/// Several row ids out of `valid_ids`, duplicates dropped, order kept.
pub fn model_multiple_choice(
    values: &[String],
    name: &str,
    valid_ids: &[i32],
    required: bool,
    errors: &mut FieldErrors,
) -> Vec<i32> {
    let mut ids = Vec::new();
    for raw in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        match raw.parse::<i32>() {
            Ok(id) if valid_ids.contains(&id) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            Ok(_) => errors.add(
                name,
                format!(
                    "Select a valid choice. {} is not one of the available choices.",
                    raw
                ),
            ),
            Err(_) => errors.add(name, format!("“{}” is not a valid value.", raw)),
        }
    }
    if required && ids.is_empty() && !errors.has(name) {
        errors.add(name, REQUIRED);
    }
    ids
}

/// Non-negative decimal with at most `max_digits` digits, `decimal_places`
/// of them after the point, returned in hundredths.
pub fn optional_money_cents(
    data: &FormData,
    name: &str,
    max_digits: usize,
    errors: &mut FieldErrors,
) -> Option<i64> {
    const DECIMAL_PLACES: usize = 2;

    let value = data.text(name);
    if value.is_empty() {
        return None;
    }
    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(&value)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
    {
        errors.add(name, "Enter a number.");
        return None;
    }
    if negative {
        errors.add(name, "Ensure this value is greater than or equal to 0.");
        return None;
    }
    let whole = whole.trim_start_matches('0');
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > DECIMAL_PLACES {
        errors.add(
            name,
            format!(
                "Ensure that there are no more than {} decimal places.",
                DECIMAL_PLACES
            ),
        );
        return None;
    }
    if whole.len() > max_digits - DECIMAL_PLACES {
        errors.add(
            name,
            format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                max_digits - DECIMAL_PLACES
            ),
        );
        return None;
    }
    let whole_cents: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse::<i64>().ok()? * 100
    };
    let fraction_cents: i64 = format!("{:0<2}", fraction).parse().ok()?;
    Some(whole_cents + fraction_cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> FormData {
        FormData::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn required_text_reports_missing_and_too_long() {
        let mut errors = FieldErrors::new();
        required_text(&data(&[("name", "   ")]), "name", 5, &mut errors);
        assert_eq!(errors.get("name"), [REQUIRED.to_string()]);

        let mut errors = FieldErrors::new();
        let v = required_text(&data(&[("state", "Idaho")]), "state", 2, &mut errors);
        assert_eq!(v, "Idaho");
        assert_eq!(
            errors.get("state"),
            ["Ensure this value has at most 2 characters (it has 5).".to_string()]
        );
    }

    #[test]
    fn email_and_url_validation() {
        let mut errors = FieldErrors::new();
        optional_email(&data(&[("e", "a@b.org")]), "e", &mut errors);
        optional_url(&data(&[("u", "https://example.org/x")]), "u", &mut errors);
        assert!(errors.is_empty());

        optional_email(&data(&[("e", "not-an-email")]), "e", &mut errors);
        optional_url(&data(&[("u", "example.org")]), "u", &mut errors);
        assert!(errors.has("e"));
        assert!(errors.has("u"));
    }

    #[test]
    fn dates_accept_iso_or_three_selects() {
        let mut errors = FieldErrors::new();
        let iso = optional_date(&data(&[("d", "2024-02-29")]), "d", &mut errors);
        let parts = optional_date(
            &data(&[("d_year", "2024"), ("d_month", "2"), ("d_day", "29")]),
            "d",
            &mut errors,
        );
        assert!(errors.is_empty());
        assert_eq!(iso, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parts, iso);

        let blank = optional_date(
            &data(&[("d_year", ""), ("d_month", ""), ("d_day", "")]),
            "d",
            &mut errors,
        );
        assert_eq!(blank, None);
        assert!(errors.is_empty());

        optional_date(
            &data(&[("d_year", "2023"), ("d_month", "2"), ("d_day", "30")]),
            "d",
            &mut errors,
        );
        assert_eq!(errors.get("d"), ["Enter a valid date.".to_string()]);
    }

    #[test]
    fn time_accepts_minutes_or_seconds() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            required_time(&data(&[("t", "19:30")]), "t", &mut errors),
            NaiveTime::from_hms_opt(19, 30, 0)
        );
        assert_eq!(
            required_time(&data(&[("t", "19:30:15")]), "t", &mut errors),
            NaiveTime::from_hms_opt(19, 30, 15)
        );
        assert!(errors.is_empty());
        required_time(&data(&[("t", "late")]), "t", &mut errors);
        assert!(errors.has("t"));
    }

    #[test]
    fn money_is_parsed_into_cents() {
        let mut errors = FieldErrors::new();
        let parse = |v: &str, errors: &mut FieldErrors| {
            optional_money_cents(&data(&[("c", v)]), "c", 10, errors)
        };
        assert_eq!(parse("125", &mut errors), Some(12500));
        assert_eq!(parse("12.5", &mut errors), Some(1250));
        assert_eq!(parse("0.07", &mut errors), Some(7));
        assert_eq!(parse(".5", &mut errors), Some(50));
        assert_eq!(parse("", &mut errors), None);
        assert!(errors.is_empty());

        for bad in ["abc", "1.234", "-3", "123456789.00"] {
            let mut errors = FieldErrors::new();
            assert_eq!(parse(bad, &mut errors), None, "{}", bad);
            assert!(errors.has("c"), "{}", bad);
        }
    }

    #[test]
    fn multiple_choice_validates_against_known_ids() {
        let mut errors = FieldErrors::new();
        let values = vec!["2".to_string(), "2".to_string(), "5".to_string()];
        let ids = model_multiple_choice(&values, "genres", &[2, 5, 9], false, &mut errors);
        assert_eq!(ids, vec![2, 5]);
        assert!(errors.is_empty());

        model_multiple_choice(&["7".to_string()], "genres", &[2], true, &mut errors);
        assert!(errors.has("genres"));
    }
}
