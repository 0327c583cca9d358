use super::*;

fn uk() -> Vec<TagGroup> {
    vec![TagGroup::require_all(["UK"])]
}

fn be_uk_and_staging_production() -> Vec<TagGroup> {
    vec![
        TagGroup::require_all(["BE", "UK"]),
        TagGroup::require_all(["Staging", "Production"]),
    ]
}

fn uk_any() -> Vec<TagGroup> {
    vec![TagGroup::require_any(["UK"])]
}

fn be_uk_staging_all_and_staging_production_any() -> Vec<TagGroup> {
    vec![
        TagGroup::require_all(["BE", "UK", "Staging"]),
        TagGroup::require_any(["Staging", "Production"]),
    ]
}

#[test]
fn test_single_require_all_group() {
    let cases: Vec<(Vec<&str>, bool)> = vec![
        (vec!["UK"], true),
        (vec!["IE"], false),
        (vec!["UK2"], false),
        (vec!["UK", "Production"], false),
        (vec![], false),
    ];
    for (requested, expected) in cases {
        assert_eq!(
            matches_tags(&uk(), &requested),
            expected,
            "requested {:?}",
            requested
        );
    }
}

#[test]
fn test_two_require_all_groups_use_union() {
    let groups = be_uk_and_staging_production();
    assert!(matches_tags(&groups, &["UK"]));
    assert!(matches_tags(&groups, &["UK", "Production"]));
    assert!(!matches_tags(&groups, &["UK", "IE"]));
}

#[test]
fn test_one_group_with_all_four_tags() {
    let groups = vec![TagGroup::require_all(["BE", "UK", "Staging", "Production"])];
    assert!(matches_tags(&groups, &["UK", "Production"]));
}

#[test]
fn test_require_any_group() {
    let groups = uk_any();
    assert!(matches_tags(&groups, &["UK", "IE"]));
    assert!(!matches_tags(&groups, &["Chrome", "IE"]));
}

#[test]
fn test_require_any_with_several_names() {
    let groups = vec![TagGroup::require_any(["BE", "UK", "Staging", "Production"])];
    assert!(matches_tags(&groups, &["UK", "Staging", "IE"]));
    assert!(!matches_tags(&groups, &["IE", "Chrome"]));
}

#[test]
fn test_two_require_any_groups() {
    let groups = vec![
        TagGroup::require_any(["BE", "UK"]),
        TagGroup::require_any(["Staging", "Production"]),
    ];
    assert!(matches_tags(&groups, &["UK", "Staging"]));
    assert!(matches_tags(&groups, &["UK", "IE"]));
}

#[test]
fn test_mixed_all_and_any_groups() {
    let groups = be_uk_staging_all_and_staging_production_any();
    assert!(matches_tags(&groups, &["UK", "Staging"]));
    assert!(matches_tags(&groups, &["UK", "Staging", "IE"]));
    assert!(matches_tags(&groups, &["BE", "UK"]));
}

#[test]
fn test_tags_are_case_sensitive() {
    assert!(!matches_tags(&uk(), &["uk"]));
}

#[test]
fn test_empty_group_counts_as_tagged() {
    let groups = vec![TagGroup::require_all(Vec::<String>::new())];
    assert!(has_tags(&groups));
    assert!(!matches_tags(&groups, &Vec::<String>::new()));
    assert!(!matches_tags(&groups, &["UK"]));
}

#[test]
fn test_untagged_is_always_selected() {
    assert!(!has_tags(&[]));
    assert!(is_selected::<&str>(&[], &[]));
    assert!(is_selected(&[], &["UK"]));
}

#[test]
fn test_tagged_is_selected_only_on_match() {
    assert!(is_selected(&uk(), &["UK"]));
    assert!(!is_selected(&uk(), &["IE"]));
    assert!(!is_selected::<&str>(&uk(), &[]));
}

#[test]
fn test_tag_group_deserializes_with_default_behavior() {
    let group: TagGroup = serde_yaml::from_str("names: [UK, BE]").unwrap();
    assert_eq!(group.behavior, MatchBehavior::RequireAll);
    assert_eq!(group.names, vec!["UK", "BE"]);

    let group: TagGroup =
        serde_yaml::from_str("names: [UK]\nbehavior: require_any").unwrap();
    assert_eq!(group.behavior, MatchBehavior::RequireAny);
}
