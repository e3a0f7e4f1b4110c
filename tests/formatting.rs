//! Formatting Tests
//!
//! Display rendering per field type.

use formfill_core::{
    format_value,
    templates::{Annotation, CaseTransform, FieldType, FormatRules, NumberStyle, Position},
    Formatted,
};
use serde_json::{json, Value};

fn annotation(field_type: FieldType, rules: FormatRules) -> Annotation {
    Annotation {
        field_id: "field".to_string(),
        position: Position::default(),
        data_path: "value".to_string(),
        field_type,
        format_rules: Some(rules),
        validation_rules: None,
    }
}

fn display(value: Value, annotation: &Annotation) -> String {
    format_value(Some(&value), annotation).into_display()
}

fn number_style(style: NumberStyle, precision: Option<usize>) -> FormatRules {
    FormatRules {
        number_style: Some(style),
        precision,
        ..Default::default()
    }
}

#[test]
fn empty_values_format_to_empty_for_every_type() {
    for field_type in [
        FieldType::Text,
        FieldType::Number,
        FieldType::Currency,
        FieldType::Ssn,
        FieldType::Date,
        FieldType::Checkbox,
    ] {
        let a = annotation(field_type, FormatRules::default());
        assert_eq!(format_value(None, &a), Formatted::Ok(String::new()));
        assert_eq!(display(Value::Null, &a), "");
        assert_eq!(display(json!(""), &a), "");
    }
}

#[test]
fn ssn_is_dashed_only_for_nine_characters_and_the_ssn_pattern() {
    let dashed = annotation(
        FieldType::Ssn,
        FormatRules { pattern: Some("###-##-####".to_string()), ..Default::default() },
    );
    assert_eq!(display(json!("123456789"), &dashed), "123-45-6789");
    assert_eq!(display(json!(123456789), &dashed), "123-45-6789");
    assert_eq!(display(json!("12345"), &dashed), "12345");

    let plain = annotation(FieldType::Ssn, FormatRules::default());
    assert_eq!(display(json!("123456789"), &plain), "123456789");
}

#[test]
fn currency_renders_us_dollars() {
    let a = annotation(FieldType::Currency, number_style(NumberStyle::Currency, None));
    assert_eq!(display(json!(1234.5), &a), "$1,234.50");
    assert_eq!(display(json!("1000000"), &a), "$1,000,000.00");
    assert_eq!(display(json!(0.5), &a), "$0.50");
    assert_eq!(display(json!(-42.1), &a), "-$42.10");
}

#[test]
fn currency_without_subtype_passes_through() {
    let a = annotation(FieldType::Currency, FormatRules::default());
    assert_eq!(display(json!(1234.5), &a), "1234.5");
}

#[test]
fn unparseable_currency_degrades_to_raw_string() {
    let a = annotation(FieldType::Currency, number_style(NumberStyle::Currency, None));
    let result = format_value(Some(&json!("lots")), &a);
    assert!(result.is_degraded());
    assert_eq!(result.display(), "lots");
}

#[test]
fn percentage_uses_default_precision() {
    let a = annotation(FieldType::Number, number_style(NumberStyle::Percentage, None));
    assert_eq!(display(json!(50), &a), "50.00%");
    assert_eq!(display(json!("7.5"), &a), "7.50%");
}

#[test]
fn percentage_honours_precision() {
    let one = annotation(FieldType::Number, number_style(NumberStyle::Percentage, Some(1)));
    assert_eq!(display(json!(12.26), &one), "12.3%");
}

#[test]
fn percentage_treats_zero_precision_as_default() {
    let zero = annotation(FieldType::Number, number_style(NumberStyle::Percentage, Some(0)));
    assert_eq!(display(json!(50), &zero), "50.00%");
    let decimal = annotation(FieldType::Number, number_style(NumberStyle::Decimal, Some(0)));
    assert_eq!(display(json!(3.14159), &decimal), "3.14");
}

#[test]
fn fractional_ties_round_away_from_zero() {
    let currency = annotation(FieldType::Currency, number_style(NumberStyle::Currency, None));
    assert_eq!(display(json!(1234.125), &currency), "$1,234.13");
    assert_eq!(display(json!(0.125), &currency), "$0.13");
    assert_eq!(display(json!(-0.125), &currency), "-$0.13");
    assert_eq!(display(json!(999.995), &currency), "$1,000.00");

    let one = annotation(FieldType::Number, number_style(NumberStyle::Decimal, Some(1)));
    assert_eq!(display(json!(0.25), &one), "0.3");
    let two = annotation(FieldType::Number, number_style(NumberStyle::Decimal, None));
    assert_eq!(display(json!(1.005), &two), "1.01");
}

#[test]
fn decimal_groups_thousands() {
    let a = annotation(FieldType::Number, number_style(NumberStyle::Decimal, None));
    assert_eq!(display(json!(1234.5678), &a), "1,234.57");
    let three = annotation(FieldType::Number, number_style(NumberStyle::Decimal, Some(3)));
    assert_eq!(display(json!(2), &three), "2.000");
}

#[test]
fn integer_rounds_ties_upward() {
    let a = annotation(FieldType::Number, number_style(NumberStyle::Integer, None));
    assert_eq!(display(json!(2.5), &a), "3");
    assert_eq!(display(json!(2.4), &a), "2");
    assert_eq!(display(json!(-2.5), &a), "-2");
    assert_eq!(display(json!("75000.7"), &a), "75001");
    assert_eq!(display(json!(0.49999999999999994), &a), "0");
    assert_eq!(display(json!(-0.4), &a), "0");
    assert_eq!(display(json!(-2.6), &a), "-3");
}

#[test]
fn number_without_subtype_passes_through() {
    let a = annotation(FieldType::Number, FormatRules::default());
    assert_eq!(display(json!(75000), &a), "75000");
    assert_eq!(display(json!("12abc"), &a), "12abc");
}

#[test]
fn dates_render_by_pattern() {
    let us = annotation(
        FieldType::Date,
        FormatRules { pattern: Some("MM/DD/YYYY".to_string()), ..Default::default() },
    );
    assert_eq!(display(json!("2024-01-05"), &us), "1/5/2024");
    assert_eq!(display(json!("2024-12-31T08:00:00Z"), &us), "12/31/2024");

    let iso = annotation(
        FieldType::Date,
        FormatRules { pattern: Some("YYYY-MM-DD".to_string()), ..Default::default() },
    );
    assert_eq!(display(json!("03/15/2024"), &iso), "2024-03-15");
    assert_eq!(display(json!(0), &iso), "1970-01-01");
}

#[test]
fn dates_fall_back_for_other_patterns_and_bad_input() {
    let other = annotation(
        FieldType::Date,
        FormatRules { pattern: Some("DD.MM.YYYY".to_string()), ..Default::default() },
    );
    assert_eq!(format_value(Some(&json!("2024-01-05")), &other), Formatted::Ok("2024-01-05".to_string()));

    let us = annotation(
        FieldType::Date,
        FormatRules { pattern: Some("MM/DD/YYYY".to_string()), ..Default::default() },
    );
    let result = format_value(Some(&json!("someday")), &us);
    assert!(result.is_degraded());
    assert_eq!(result.display(), "someday");

    let no_pattern = annotation(FieldType::Date, FormatRules::default());
    assert_eq!(display(json!("2024-01-05"), &no_pattern), "2024-01-05");
}

#[test]
fn checkbox_values_map_to_checkmark_or_empty() {
    let a = annotation(FieldType::Checkbox, FormatRules::default());
    for checked in [json!(true), json!("true"), json!("X"), json!("Yes"), json!("1"), json!("✓"), json!(1), json!("on")] {
        assert_eq!(display(checked.clone(), &a), "✓", "{} should be checked", checked);
    }
    for unchecked in [json!(false), json!("false"), json!("No"), json!("0"), json!(0)] {
        assert_eq!(display(unchecked.clone(), &a), "", "{} should be unchecked", unchecked);
    }
}

#[test]
fn text_case_transforms() {
    let upper = annotation(
        FieldType::Text,
        FormatRules { case: Some(CaseTransform::Uppercase), ..Default::default() },
    );
    assert_eq!(display(json!("john doe"), &upper), "JOHN DOE");

    let lower = annotation(
        FieldType::Text,
        FormatRules { case: Some(CaseTransform::Lowercase), ..Default::default() },
    );
    assert_eq!(display(json!("New York"), &lower), "new york");

    let title = annotation(
        FieldType::Text,
        FormatRules { case: Some(CaseTransform::Titlecase), ..Default::default() },
    );
    assert_eq!(display(json!("hello WORLD  o'neil"), &title), "Hello World  O'neil");
}

#[test]
fn text_truncates_after_case_transform() {
    let a = annotation(
        FieldType::Text,
        FormatRules {
            case: Some(CaseTransform::Uppercase),
            max_length: Some(5),
            ..Default::default()
        },
    );
    assert_eq!(display(json!("abcdefgh"), &a), "ABCDE");
    assert_eq!(display(json!("äöü"), &a), "ÄÖÜ");
}

#[test]
fn unknown_field_types_format_as_text() {
    let a: Annotation = serde_json::from_value(json!({
        "field_id": "f",
        "position": { "x": 0, "y": 0, "width": 10, "height": 10, "page": 1 },
        "data_path": "v",
        "field_type": "signature",
        "format_rules": { "case": "uppercase" }
    }))
    .unwrap();
    assert_eq!(a.field_type, FieldType::Other);
    assert_eq!(display(json!("ok"), &a), "OK");
}
