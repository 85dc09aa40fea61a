use super::common::*;
use crate::eligibility::{find_matches, Condition, Profile, Scheme, ALL_REGIONS};

#[test]
fn farmer_matches_small_farmer_scheme_with_two_reasons() {
    let matches = find_matches(&farmer_profile(), &[small_farmer_scheme()], ALL_REGIONS);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].score, 2);
    assert_eq!(matches[0].reasons.len(), 2);
    assert!(matches[0].reasons.iter().all(|reason| reason.ends_with("=> OK")));
}

#[test]
fn farmer_does_not_match_student_scheme() {
    let matches = find_matches(&farmer_profile(), &[student_scheme()], "WB");
    assert!(matches.is_empty());
}

#[test]
fn regional_scheme_is_filtered_by_region() {
    let schemes = [west_bengal_scheme()];
    let profile = farmer_profile();

    assert!(find_matches(&profile, &schemes, "DL").is_empty());
    assert!(find_matches(&profile, &schemes, ALL_REGIONS).is_empty());
    assert_eq!(find_matches(&profile, &schemes, "WB").len(), 1);
}

#[test]
fn region_codes_are_matched_case_insensitively() {
    let schemes = [west_bengal_scheme()];
    let profile = farmer_profile();

    assert_eq!(find_matches(&profile, &schemes, "wb").len(), 1);
    assert_eq!(find_matches(&profile, &schemes, " Wb ").len(), 1);
    assert!(find_matches(&profile, &schemes, "").is_empty());
}

#[test]
fn nationwide_scheme_passes_any_region() {
    let schemes = [ration_scheme()];
    for region in ["WB", "DL", "XX", ALL_REGIONS] {
        assert_eq!(find_matches(&farmer_profile(), &schemes, region).len(), 1);
    }
}

#[test]
fn results_are_ranked_by_specificity() {
    let matches = engine().find_matches(&farmer_profile(), "WB");

    let ids: Vec<&str> = matches
        .iter()
        .map(|result| result.scheme.scheme_id.as_str())
        .collect();
    assert_eq!(ids, vec!["wb-farmer", "small-farmer", "ration"]);
    assert_eq!(matches[0].score, 3);
}

#[test]
fn find_matches_is_deterministic() {
    let engine = engine();
    let profile = farmer_profile();

    let first = engine.find_matches(&profile, "WB");
    let second = engine.find_matches(&profile, "WB");

    assert_eq!(first, second);
}

#[test]
fn find_matches_for_uses_profile_state() {
    let engine = engine();

    let in_state = engine.find_matches_for(&farmer_profile());
    assert!(in_state
        .iter()
        .any(|result| result.scheme.scheme_id == "wb-farmer"));

    let stateless = Profile::new()
        .with("occupation", "farmer")
        .with("land_owned", true)
        .with("annual_income", 40_000_i64);
    assert!(engine
        .find_matches_for(&stateless)
        .iter()
        .all(|result| result.scheme.scheme_id != "wb-farmer"));
}

#[test]
fn malformed_conditions_never_abort_matching() {
    let schemes = [
        Scheme::new("weird", "Weird")
            .with_condition(Condition::new("age", "approximately", 30_i64)),
        ration_scheme(),
    ];

    let matches = find_matches(&farmer_profile(), &schemes, "WB");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].scheme.scheme_id, "ration");
}

#[test]
fn empty_knowledge_base_yields_no_matches() {
    assert!(find_matches(&farmer_profile(), &[], "WB").is_empty());
}
