use serde_json::{json, Value};
use sieve_filter::{
    compile, ApiVersion, ClauseKind, ClauseValue, CompileOptions, Compiler, DiagnosticKind,
    Params, Pattern, REQUIRED_CLAUSE_MESSAGE,
};

fn params(body: Value) -> Params {
    Params::from_json_value(body, ApiVersion::V3).unwrap()
}

fn regex(pattern: &str) -> Value {
    json!({"$regularExpression": {"pattern": pattern, "options": "i"}})
}

#[test]
fn match_string_compiles_to_anchored_case_insensitive_pattern() {
    let clauses = compile(
        &params(json!({"query": {"match": [{"key": "status", "value": "Active"}]}})),
        false,
    )
    .unwrap();
    assert_eq!(
        clauses.get("status"),
        Some(&ClauseValue::Regex(Pattern::new("^Active$", "i")))
    );
    assert_eq!(clauses.to_json(), json!({"status": regex("^Active$")}));
}

#[test]
fn in_filter_compiles_string_members_to_patterns() {
    let clauses = compile(
        &params(json!({"filter": {"in": [{"key": "tag", "value": ["a", "b"]}]}})),
        false,
    )
    .unwrap();
    assert_eq!(
        clauses.to_json(),
        json!({"tag": {"$in": [regex("^a$"), regex("^b$")]}})
    );
}

#[test]
fn like_compiles_to_substring_pattern() {
    let clauses = compile(
        &params(json!({"query": {"like": [{"key": "name", "value": "john"}]}})),
        false,
    )
    .unwrap();
    assert_eq!(clauses.to_json(), json!({"name": regex(".*john.*")}));
}

#[test]
fn required_without_clauses_is_a_validation_error() {
    let err = compile(&params(json!({})), true).unwrap_err();
    assert!(matches!(err, sieve_filter::Error::Validation(_)));
    assert_eq!(err.to_string(), REQUIRED_CLAUSE_MESSAGE);

    // Not required: an empty map is fine.
    assert!(compile(&params(json!({})), false).unwrap().is_empty());
}

#[test]
fn nested_operator_match() {
    let clauses = compile(
        &params(json!({"query": {"match": [{"key": "age", "value": {"key": "$gt", "value": 18}}]}})),
        false,
    )
    .unwrap();
    assert_eq!(clauses.to_json(), json!({"age": {"$gt": 18}}));
}

#[test]
fn elem_match_compiles_sub_matches() {
    let clauses = compile(
        &params(json!({
            "query": {"elem_match": [{"key": "items", "value": [{"key": "sku", "value": "X1"}]}]}
        })),
        false,
    )
    .unwrap();
    assert_eq!(
        clauses.to_json(),
        json!({"items": {"$elemMatch": {"sku": regex("^X1$")}}})
    );
}

#[test]
fn range_emits_exactly_the_present_bounds() {
    let clauses = compile(
        &params(json!({
            "filter": {"range": [
                {"key": "a", "value": {"gt": 1}},
                {"key": "b", "value": {"lte": "2024-12-31", "gte": "2024-01-01"}},
                {"key": "c", "value": {"gt": 1, "lt": 2, "gte": 3, "lte": 4}}
            ]}
        })),
        false,
    )
    .unwrap();
    assert_eq!(
        clauses.to_json(),
        json!({
            "a": {"$gt": 1},
            "b": {"$gte": "2024-01-01", "$lte": "2024-12-31"},
            "c": {"$gt": 1, "$lt": 2, "$gte": 3, "$lte": 4}
        })
    );
}

#[test]
fn operator_operands_keep_strings_literal() {
    let clauses = compile(
        &params(json!({
            "query": {"match": [
                {"key": "state", "value": {"key": "$ne", "value": "archived"}},
                {"key": "kind", "value": {"key": "$in", "value": ["a", 1]}}
            ]}
        })),
        false,
    )
    .unwrap();
    assert_eq!(
        clauses.to_json(),
        json!({
            "state": {"$ne": "archived"},
            "kind": {"$in": [regex("^a$"), 1]}
        })
    );
}

#[test]
fn full_request_compiles_every_category() {
    let request = params(json!({
        "query": {
            "match": [
                {"key": "status", "value": "active"},
                {"key": "profile", "value": {"key": "verified", "value": true}},
                {"key": "score", "value": [{"key": "$gte", "value": 10}, {"key": "$lt", "value": 20}]}
            ],
            "like": [{"key": "name", "value": "ann"}],
            "elem_match": [{"key": "orders", "value": [{"key": "total", "value": {"key": "$gt", "value": 100}}]}]
        },
        "filter": {
            "range": [{"key": "age", "value": {"gte": 18}}],
            "in": [{"key": "city", "value": ["Jakarta", "Bandung"]}],
            "nin": [{"key": "role", "value": ["banned"]}],
            "all": [{"key": "tags", "value": ["vip", 7]}]
        },
        "sort": [{"key": "age", "value": "desc"}],
        "limit": {"rows": 10, "offset": 0}
    }));

    let compiled = Compiler::new(CompileOptions::required())
        .compile(&request)
        .unwrap();

    assert_eq!(compiled.parsed, 9);
    assert!(compiled.diagnostics.is_empty(), "{:?}", compiled.diagnostics);
    assert_eq!(
        compiled.clauses.to_json(),
        json!({
            "status": regex("^active$"),
            "profile.verified": true,
            "score": {"$gte": 10, "$lt": 20},
            "name": regex(".*ann.*"),
            "orders": {"$elemMatch": {"total": {"$gt": 100}}},
            "age": {"$gte": 18},
            "city": {"$in": [regex("^Jakarta$"), regex("^Bandung$")]},
            "role": {"$nin": [regex("^banned$")]},
            "tags": {"$all": [regex("^vip$"), 7]}
        })
    );
}

#[test]
fn malformed_entries_degrade_without_failing_the_request() {
    let compiled = Compiler::new(CompileOptions::required())
        .compile(&params(json!({
            "query": {"match": [
                {"key": "broken", "value": {"no_key": 1}},
                {"key": "nil_op", "value": {"key": "$gt", "value": null}},
                {"key": "ok", "value": 1}
            ]},
            "filter": {
                "range": [{"key": "r", "value": null}],
                "in": [{"key": "i", "value": ["x", {"nested": true}]}]
            }
        })))
        .unwrap();

    assert_eq!(compiled.parsed, 4);
    assert_eq!(
        compiled.clauses.to_json(),
        json!({"ok": 1, "i": {"$in": [regex("^x$")]}})
    );

    let kinds: Vec<_> = compiled
        .diagnostics
        .iter()
        .map(|d| (d.clause, d.key.as_str(), d.kind.clone()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (ClauseKind::Match, "broken", DiagnosticKind::UnsupportedValue),
            (
                ClauseKind::Match,
                "nil_op",
                DiagnosticKind::EmptyOperand {
                    operator: "$gt".to_string()
                }
            ),
            (ClauseKind::Range, "r", DiagnosticKind::MissingValue),
            (ClauseKind::In, "i", DiagnosticKind::DroppedElement { index: 1 }),
        ]
    );
}

#[test]
fn nil_operand_still_counts_as_parsed() {
    // An entry with a non-blank key satisfies the required check even when
    // it contributes nothing; the diagnostic makes that visible.
    let compiled = Compiler::new(CompileOptions::required())
        .compile(&params(json!({
            "query": {"match": [{"key": "x", "value": {"key": "$exists"}}]}
        })))
        .unwrap();
    assert_eq!(compiled.parsed, 1);
    assert!(compiled.clauses.is_empty());
    assert_eq!(compiled.diagnostics.len(), 1);
}

#[test]
fn v2_params_compile_through_the_same_compiler() {
    let request = Params::from_json_str(
        r#"{
            "query": {"match": [{"key": "status", "value": "Active"}]},
            "filter": {"range": [{"key": "age", "value": {"gt": 18, "lt": 65}}]}
        }"#,
        ApiVersion::V2,
    )
    .unwrap();
    let clauses = compile(&request, true).unwrap();
    assert_eq!(
        clauses.to_json(),
        json!({"status": regex("^Active$"), "age": {"$gt": 18, "$lt": 65}})
    );
}

#[test]
fn compiled_patterns_evaluate_case_insensitively() {
    let clauses = compile(
        &params(json!({"query": {"match": [{"key": "email", "value": "Ann@Example.com"}]}})),
        false,
    )
    .unwrap();
    let re = clauses
        .get("email")
        .and_then(ClauseValue::as_regex)
        .unwrap()
        .to_regex()
        .unwrap();
    assert!(re.is_match("ann@example.com"));
    assert!(!re.is_match("x-ann@example.com"));
}

#[test]
fn null_fields_skip_their_entry_and_keep_the_rest() {
    let compiled = Compiler::new(CompileOptions::required())
        .compile(&params(json!({
            "query": {
                "match": [{"key": "ok", "value": 1}, {"key": null, "value": 2}],
                "like": [{"key": "name", "value": null}]
            },
            "filter": {
                "range": [{"key": null, "value": {"gt": 1}}],
                "in": null
            },
            "sort": null,
            "limit": null
        })))
        .unwrap();

    assert_eq!(compiled.parsed, 1);
    assert_eq!(compiled.clauses.to_json(), json!({"ok": 1}));

    let kinds: Vec<_> = compiled
        .diagnostics
        .iter()
        .map(|d| (d.clause, d.key.as_str(), d.kind.clone()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (ClauseKind::Match, "", DiagnosticKind::BlankKey),
            (ClauseKind::Like, "name", DiagnosticKind::BlankPattern),
            (ClauseKind::Range, "", DiagnosticKind::BlankKey),
        ]
    );
}

#[test]
fn null_sections_compile_like_absent_ones() {
    let request = Params::from_json_str(
        r#"{"query": null, "filter": {"all": [{"key": "tags", "value": ["a"]}]}}"#,
        ApiVersion::V3,
    )
    .unwrap();
    let clauses = compile(&request, true).unwrap();
    assert_eq!(clauses.to_json(), json!({"tags": {"$all": [regex("^a$")]}}));
}

#[test]
fn elements_dropped_inside_match_values_are_reported() {
    let compiled = Compiler::default()
        .compile(&params(json!({
            "query": {"match": [
                {"key": "kind", "value": {"key": "$in", "value": ["a", null, {"x": 1}]}},
                {"key": "score", "value": [
                    {"key": "$gt", "value": 1},
                    {"key": "$lt", "value": null}
                ]},
                {"key": "address", "value": {"key": "city", "value": null}}
            ]}
        })))
        .unwrap();

    assert_eq!(compiled.parsed, 3);
    assert_eq!(
        compiled.clauses.to_json(),
        json!({
            "kind": {"$in": [regex("^a$")]},
            "score": {"$gt": 1}
        })
    );

    let kinds: Vec<_> = compiled
        .diagnostics
        .iter()
        .map(|d| (d.key.as_str(), d.kind.clone()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("kind", DiagnosticKind::DroppedElement { index: 1 }),
            ("kind", DiagnosticKind::DroppedElement { index: 2 }),
            (
                "score",
                DiagnosticKind::EmptyOperand {
                    operator: "$lt".to_string()
                }
            ),
            ("address.city", DiagnosticKind::UnsupportedValue),
        ]
    );
}

#[test]
fn elem_match_reports_nested_drops_under_its_key() {
    let compiled = Compiler::default()
        .compile(&params(json!({
            "query": {"elem_match": [{"key": "items", "value": [
                {"key": "sku", "value": {"key": "$in", "value": ["X1", null]}}
            ]}]}
        })))
        .unwrap();

    assert_eq!(
        compiled.clauses.to_json(),
        json!({"items": {"$elemMatch": {"sku": {"$in": [regex("^X1$")]}}}})
    );
    assert_eq!(compiled.diagnostics.len(), 1);
    assert_eq!(compiled.diagnostics[0].clause, ClauseKind::ElemMatch);
    assert_eq!(compiled.diagnostics[0].key, "items.sku");
    assert_eq!(
        compiled.diagnostics[0].kind,
        DiagnosticKind::DroppedElement { index: 1 }
    );
}
