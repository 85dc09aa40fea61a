use crate::eligibility::{evaluate, Condition, FieldValue, Profile};

fn check(profile: &Profile, field: &str, op: &str, value: impl Into<FieldValue>) -> bool {
    evaluate(profile, &Condition::new(field, op, value))
}

#[test]
fn equality_compares_typed_values() {
    let profile = Profile::new()
        .with("occupation", "farmer")
        .with("land_owned", true)
        .with("age", 30_i64);

    assert!(check(&profile, "occupation", "eq", "farmer"));
    assert!(!check(&profile, "occupation", "eq", "Farmer"));
    assert!(check(&profile, "land_owned", "eq", true));
    assert!(check(&profile, "age", "eq", 30.0));
    assert!(!check(&profile, "age", "eq", "30"));
    assert!(check(&profile, "occupation", "neq", "student"));
    assert!(!check(&profile, "land_owned", "neq", true));
}

#[test]
fn unknown_fields_fail_equality_and_ordering() {
    let profile = Profile::new();

    assert!(!check(&profile, "land_owned", "eq", false));
    assert!(!check(&profile, "land_owned", "neq", true));
    assert!(!check(&profile, "annual_income", "lte", 50_000_i64));
    assert!(!check(&profile, "annual_income", "gt", 0_i64));
}

#[test]
fn explicit_unknown_operand_never_matches() {
    let profile = Profile::new().with("district", FieldValue::Unknown);
    assert!(!check(&profile, "district", "eq", FieldValue::Unknown));
}

#[test]
fn ordering_operators_compare_numbers() {
    let profile = Profile::new()
        .with("annual_income", 40_000_i64)
        .with("land_size_acres", 2.5);

    assert!(check(&profile, "annual_income", "lt", 50_000_i64));
    assert!(check(&profile, "annual_income", "lte", 40_000_i64));
    assert!(!check(&profile, "annual_income", "gt", 40_000_i64));
    assert!(check(&profile, "annual_income", "gte", 40_000_i64));
    assert!(check(&profile, "land_size_acres", "lte", 2.5));
    assert!(check(&profile, "land_size_acres", "gt", 2_i64));
}

#[test]
fn ordering_rejects_non_numeric_operands() {
    let profile = Profile::new()
        .with("occupation", "farmer")
        .with("annual_income", 40_000_i64)
        .with("land_owned", true);

    assert!(!check(&profile, "occupation", "lt", "zzz"));
    assert!(!check(&profile, "annual_income", "lt", "50000"));
    assert!(!check(&profile, "land_owned", "gte", 0_i64));
    assert!(!check(&profile, "annual_income", "lt", f64::NAN));
}

#[test]
fn membership_requires_a_list_operand() {
    let profile = Profile::new()
        .with("caste_category", "SC")
        .with("age", 17_i64);
    let categories = FieldValue::List(vec!["SC".into(), "ST".into(), "OBC".into()]);

    assert!(check(&profile, "caste_category", "in", categories.clone()));
    assert!(!check(&profile, "caste_category", "in", "SC"));
    assert!(!check(&profile, "gender", "in", categories));
    assert!(check(
        &profile,
        "age",
        "in",
        FieldValue::List(vec![16_i64.into(), 17_i64.into()])
    ));
}

#[test]
fn existence_check_follows_the_flag() {
    let profile = Profile::new()
        .with("district", "Nadia")
        .with("pan", FieldValue::Unknown);

    assert!(check(&profile, "district", "exists", true));
    assert!(!check(&profile, "district", "exists", false));
    assert!(check(&profile, "pan", "exists", false));
    assert!(check(&profile, "aadhaar", "exists", false));
    assert!(!check(&profile, "aadhaar", "exists", true));
    assert!(!check(&profile, "district", "exists", "yes"));
}

#[test]
fn existence_check_without_a_flag_is_false() {
    let profile = Profile::new().with("district", "Nadia");

    assert!(!check(&profile, "district", "exists", FieldValue::Unknown));
    assert!(!check(&profile, "aadhaar", "exists", FieldValue::Unknown));
    assert!(!check(&profile, "aadhaar", "exists", 0_i64));
}

#[test]
fn unrecognized_operators_evaluate_to_false() {
    let profile = Profile::new().with("age", 30_i64);

    assert!(!check(&profile, "age", "between", 30_i64));
    assert!(!check(&profile, "age", "==", 30_i64));
}
