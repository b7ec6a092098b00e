use super::*;
use pretty_assertions::assert_eq;

fn lookup(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| (*value).to_string())
    }
}

#[test]
fn defaults() {
    let config = AnalysisConfig::default();
    assert!(config.check_redundancy);
    assert!(config.parallel);
    assert_eq!(config.max_witnesses, 3);
    assert_eq!(AnalysisConfig::from_lookup(lookup(&[])), config);
}

#[test]
fn environment_overrides() {
    let config = AnalysisConfig::from_lookup(lookup(&[
        (MAX_WITNESSES_VAR, " 7 "),
        (NO_REDUNDANCY_VAR, "1"),
        (SEQUENTIAL_VAR, "yes"),
    ]));
    assert_eq!(
        config,
        AnalysisConfig {
            check_redundancy: false,
            max_witnesses: 7,
            parallel: false,
        }
    );
}

#[test]
fn false_like_flags_are_unset() {
    let config = AnalysisConfig::from_lookup(lookup(&[
        (NO_REDUNDANCY_VAR, "false"),
        (SEQUENTIAL_VAR, "0"),
    ]));
    assert!(config.check_redundancy);
    assert!(config.parallel);
}

#[test]
fn invalid_witness_count_keeps_default() {
    let config = AnalysisConfig::from_lookup(lookup(&[(MAX_WITNESSES_VAR, "many")]));
    assert_eq!(config.max_witnesses, 3);
}

#[test]
fn match_config_always_asks_for_a_witness() {
    let config = AnalysisConfig::default()
        .with_max_witnesses(0)
        .with_redundancy(false);
    let matches = config.match_config();
    assert_eq!(matches.max_witnesses, 1);
    assert!(!matches.check_redundancy);
    assert_eq!(AnalysisConfig::unlimited().match_config().max_witnesses, usize::MAX);
}
