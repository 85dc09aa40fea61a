use super::condition::evaluate;
use super::domain::Profile;
use super::scheme::{Condition, Scheme};

/// Outcome of checking one scheme against a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeMatch {
    pub matched: bool,
    pub reasons: Vec<String>,
}

/// Evaluates the scheme's conditions in declaration order.
///
/// Stops at the first failing condition, so a rejected scheme reports exactly
/// as many reasons as conditions were evaluated. A scheme without conditions
/// matches with no reasons.
pub fn match_scheme(profile: &Profile, scheme: &Scheme) -> SchemeMatch {
    let mut reasons = Vec::with_capacity(scheme.eligibility_conditions.len());

    for condition in &scheme.eligibility_conditions {
        let ok = evaluate(profile, condition);
        reasons.push(reason(condition, ok));
        if !ok {
            return SchemeMatch {
                matched: false,
                reasons,
            };
        }
    }

    SchemeMatch {
        matched: true,
        reasons,
    }
}

/// `field op value => OK|NO`
pub fn reason(condition: &Condition, ok: bool) -> String {
    format!(
        "{} {} {} => {}",
        condition.field,
        condition.op,
        condition.value,
        if ok { "OK" } else { "NO" }
    )
}
