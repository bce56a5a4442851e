// SPDX-License-Identifier: PMPL-1.0-or-later
//! End-to-end translation of clause trees through the standard fields.

use jqlix_query::{
    standard_query_builder, Clause, DomainCatalog, IndexQuery, IssueConstant, Operand, Operator,
    QueryBuilder, QueryCreationContext, TranslatorConfig, User, Version, NON_EMPTY_FIELD_IDS,
    VISIBLE_FIELD_IDS,
};

fn catalog() -> DomainCatalog {
    DomainCatalog {
        statuses: vec![
            IssueConstant::new(1, "Open", 1),
            IssueConstant::new(3, "Closed", 2),
        ],
        priorities: vec![
            IssueConstant::new(1, "Blocker", 1),
            IssueConstant::new(2, "Critical", 2),
            IssueConstant::new(3, "Major", 3),
        ],
        resolutions: vec![IssueConstant::new(1, "Fixed", 1)],
        issue_types: vec![IssueConstant::new(1, "Bug", 1)],
        versions: vec![
            Version::new(5, 10, "1.0", 1),
            Version::new(6, 10, "2.0", 2),
        ],
        users: vec![User {
            key: "wilma".into(),
            username: "wilma".into(),
            display_name: "Wilma Flintstone".into(),
            email: Some("wilma@example.com".into()),
        }],
    }
}

fn builder() -> QueryBuilder {
    standard_query_builder(&catalog(), &TranslatorConfig::default()).unwrap()
}

fn translate(clause: &Clause) -> IndexQuery {
    builder().build(&QueryCreationContext::for_user("wilma"), clause)
}

#[test]
fn test_status_equals_resolves_name_to_id() {
    let query = translate(&Clause::terminal("status", Operator::Equals, "Open"));
    assert_eq!(query, IndexQuery::term("status", "1"));
}

#[test]
fn test_status_in_list() {
    let query = translate(&Clause::terminal(
        "status",
        Operator::In,
        Operand::list(["Open", "Closed"]),
    ));
    let expected = IndexQuery::boolean()
        .should(IndexQuery::term("status", "1"))
        .should(IndexQuery::term("status", "3"))
        .build();
    assert_eq!(query, expected);
}

#[test]
fn test_fix_version_not_equals_is_three_part_conjunction() {
    let query = translate(&Clause::terminal("fixVersion", Operator::NotEquals, "1.0"));
    let is_not_empty = IndexQuery::boolean()
        .must_not(IndexQuery::term("fixVersion", "-1"))
        .must(IndexQuery::term(VISIBLE_FIELD_IDS, "fixVersion"))
        .build();
    let expected = IndexQuery::boolean()
        .must(is_not_empty)
        .must_not(IndexQuery::term("fixVersion", "5"))
        .must(IndexQuery::term(VISIBLE_FIELD_IDS, "fixVersion"))
        .build();
    assert_eq!(query, expected);
    assert_eq!(
        query.to_string(),
        "+(-fixVersion:-1 +visiblefieldids:fixVersion) -fixVersion:5 +visiblefieldids:fixVersion"
    );
}

#[test]
fn test_summary_like_with_field_qualifier_stays_on_summary() {
    let query = translate(&Clause::terminal("summary", Operator::Like, "foo:bar"));
    assert_eq!(query.to_string(), "+summary:\"foo bar\"");
    assert_eq!(query.fields().into_iter().collect::<Vec<_>>(), vec!["summary"]);
}

#[test]
fn test_priority_is_empty_uses_sentinel() {
    let query = translate(&Clause::terminal("priority", Operator::Is, Operand::Empty));
    assert_eq!(query, IndexQuery::term("priority", "-1"));
}

#[test]
fn test_configured_sentinel_is_used() {
    let config = TranslatorConfig {
        empty_sentinel: "<none>".into(),
        ..TranslatorConfig::default()
    };
    let builder = standard_query_builder(&catalog(), &config).unwrap();
    let query = builder.build(
        &QueryCreationContext::anonymous(),
        &Clause::terminal("resolution", Operator::Is, Operand::Empty),
    );
    assert_eq!(query.to_string(), "resolution:<none>");
}

#[test]
fn test_description_is_empty_uses_guards() {
    let query = translate(&Clause::terminal("description", Operator::Is, Operand::Empty));
    assert_eq!(
        query.to_string(),
        format!("-{NON_EMPTY_FIELD_IDS}:description +{VISIBLE_FIELD_IDS}:description")
    );
}

#[test]
fn test_compound_query() {
    // status = Open AND NOT (assignee = currentUser() OR priority > Critical)
    let clause = Clause::And(vec![
        Clause::terminal("status", Operator::Equals, "Open"),
        Clause::Or(vec![
            Clause::terminal("assignee", Operator::Equals, Operand::function("currentUser")),
            Clause::terminal("priority", Operator::GreaterThan, "Critical"),
        ])
        .negate(),
    ]);
    assert_eq!(
        translate(&clause).to_string(),
        "+status:1 -(assignee:wilma priority:1)"
    );
}

#[test]
fn test_top_level_negation_is_explicit() {
    let clause = Clause::terminal("status", Operator::Equals, "Open").negate();
    assert_eq!(translate(&clause).to_string(), "+*:* -status:1");
}

#[test]
fn test_unknown_names_and_values_match_nothing() {
    assert!(translate(&Clause::terminal("nonsense", Operator::Equals, "x")).is_match_none());
    assert!(translate(&Clause::terminal("status", Operator::Equals, "Nope")).is_match_none());
    assert!(translate(&Clause::terminal("status", Operator::Like, "Open")).is_match_none());
    let anonymous = builder().build(
        &QueryCreationContext::anonymous(),
        &Clause::terminal("assignee", Operator::Equals, Operand::function("currentUser")),
    );
    assert!(anonymous.is_match_none());
}

#[test]
fn test_clause_tree_from_json() {
    let clause: Clause = serde_json::from_str(
        r#"{"or": [
            {"terminal": {"field": "type", "operator": "EQUALS", "operand": {"text": "bug"}}},
            {"terminal": {"field": "votes", "operator": "GREATER_THAN", "operand": {"number": 10}}}
        ]}"#,
    )
    .unwrap();
    assert_eq!(
        translate(&clause).to_string(),
        "issuetype:1 votes:{0000000000000000010 TO *}"
    );
}
