#![allow(missing_docs)]

use derived_aql::query::{
    ast::{IgnoreCase, OperatorType, Order, PartTree, PredicatePart, Sort},
    compile,
    metadata::{InMemoryMetadata, LeafProperty, PropertyKind},
    Argument, CompileError, Value,
};

fn customers() -> InMemoryMetadata {
    InMemoryMetadata::new()
        .with_entity("Customer", "customers")
        .with_property("Customer", "name", LeafProperty::scalar(PropertyKind::String))
        .with_property("Customer", "surname", LeafProperty::scalar(PropertyKind::String))
        .with_property("Customer", "age", LeafProperty::scalar(PropertyKind::Number))
        .with_property("Customer", "alive", LeafProperty::scalar(PropertyKind::Boolean))
        .with_property(
            "Customer",
            "nicknames",
            LeafProperty::collection(PropertyKind::String),
        )
        .with_mapped_property(
            "Customer",
            "address.city",
            "addr.city",
            LeafProperty::scalar(PropertyKind::String),
        )
}

fn single(part: PredicatePart) -> PartTree {
    PartTree::new().or(vec![part])
}

#[test]
fn single_argument_operators_bind_at_current_counter() {
    let meta = customers();
    for operator in [
        OperatorType::SimpleProperty,
        OperatorType::NegatingSimpleProperty,
        OperatorType::Before,
        OperatorType::LessThan,
        OperatorType::After,
        OperatorType::GreaterThan,
        OperatorType::LessThanEqual,
        OperatorType::GreaterThanEqual,
        OperatorType::Like,
        OperatorType::NotLike,
        OperatorType::Regex,
        OperatorType::In,
        OperatorType::NotIn,
        OperatorType::Containing,
        OperatorType::Exists,
    ] {
        // A leading equality occupies @0 so the part under test starts at @1.
        let tree = PartTree::new().or(vec![
            PredicatePart::new("surname", OperatorType::SimpleProperty),
            PredicatePart::new("age", operator),
        ]);
        let compiled = compile(
            &meta,
            "Customer",
            &tree,
            vec!["Smith".into(), 42i64.into()],
            None,
        )
        .unwrap();
        assert_eq!(compiled.bind_vars.len(), 2, "{operator}");
        assert_eq!(compiled.bind_vars.get("1"), Some(&Value::Int(42)), "{operator}");
        assert!(compiled.query.contains("@1"), "{operator}: {}", compiled.query);
    }
}

#[test]
fn between_renders_both_bounds() {
    let compiled = compile(
        &customers(),
        "Customer",
        &single(PredicatePart::new("age", OperatorType::Between)),
        vec![5i64.into(), 10i64.into()],
        None,
    )
    .unwrap();
    assert_eq!(
        compiled.query,
        "FOR e IN customers FILTER @0 <= e.age AND e.age <= @1 RETURN e"
    );
    assert_eq!(compiled.bind_vars.get("0"), Some(&Value::Int(5)));
    assert_eq!(compiled.bind_vars.get("1"), Some(&Value::Int(10)));
}

#[test]
fn starting_and_ending_with_escape_wildcards() {
    let tree = PartTree::new().or(vec![
        PredicatePart::new("name", OperatorType::StartingWith),
        PredicatePart::new("surname", OperatorType::EndingWith),
    ]);
    let compiled = compile(
        &customers(),
        "Customer",
        &tree,
        vec!["Jo%hn".into(), "Jo_hn".into()],
        None,
    )
    .unwrap();
    assert_eq!(
        compiled.query,
        "FOR e IN customers FILTER e.name LIKE @0 AND e.surname LIKE @1 RETURN e"
    );
    assert_eq!(compiled.bind_vars.get("0"), Some(&Value::from("Jo\\%hn%")));
    assert_eq!(compiled.bind_vars.get("1"), Some(&Value::from("%Jo\\_hn")));
}

#[test]
fn ignore_case_wraps_property_and_lowers_argument() {
    let compiled = compile(
        &customers(),
        "Customer",
        &single(
            PredicatePart::new("name", OperatorType::SimpleProperty).ignore_case(IgnoreCase::Always),
        ),
        vec!["JoHn".into()],
        None,
    )
    .unwrap();
    assert_eq!(
        compiled.query,
        "FOR e IN customers FILTER LOWER(e.name) == @0 RETURN e"
    );
    assert_eq!(compiled.bind_vars.get("0"), Some(&Value::from("john")));
}

#[test]
fn ignore_case_lowers_sequences_element_wise() {
    let compiled = compile(
        &customers(),
        "Customer",
        &single(PredicatePart::new("name", OperatorType::In).ignore_case(IgnoreCase::WhenPossible)),
        vec![Argument::Sequence(vec!["Alice".into(), "BOB".into()])],
        None,
    )
    .unwrap();
    assert_eq!(
        compiled.query,
        "FOR e IN customers FILTER LOWER(e.name) IN @0 RETURN e"
    );
    assert_eq!(
        compiled.bind_vars.get("0"),
        Some(&Value::Array(vec!["alice".into(), "bob".into()]))
    );
}

#[test]
fn ignore_case_never_wraps_unsupported_operators() {
    let meta = customers();
    let cases: [(OperatorType, Vec<Argument>); 5] = [
        (OperatorType::Exists, vec!["name".into()]),
        (OperatorType::True, vec![]),
        (OperatorType::False, vec![]),
        (OperatorType::IsNull, vec![]),
        (OperatorType::IsNotNull, vec![]),
    ];
    for (operator, arguments) in cases {
        let tree = single(PredicatePart::new("name", operator).ignore_case(IgnoreCase::Always));
        let compiled = compile(&meta, "Customer", &tree, arguments, None).unwrap();
        assert!(!compiled.query.contains("LOWER"), "{operator}: {}", compiled.query);
    }
}

#[test]
fn regex_reports_case_flag() {
    let compiled = compile(
        &customers(),
        "Customer",
        &single(PredicatePart::new("name", OperatorType::Regex).ignore_case(IgnoreCase::Always)),
        vec!["^J.*".into()],
        None,
    )
    .unwrap();
    assert_eq!(
        compiled.query,
        "FOR e IN customers FILTER REGEX_TEST(LOWER(e.name), @0, true) RETURN e"
    );
    assert_eq!(compiled.bind_vars.get("0"), Some(&Value::from("^j.*")));
}

#[test]
fn nested_properties_use_mapped_field_paths() {
    let compiled = compile(
        &customers(),
        "Customer",
        &single(PredicatePart::new("address.city", OperatorType::SimpleProperty)),
        vec!["Berlin".into()],
        None,
    )
    .unwrap();
    assert_eq!(
        compiled.query,
        "FOR e IN customers FILTER e.addr.city == @0 RETURN e"
    );
}

#[test]
fn single_group_reduces_to_one_filter() {
    let tree = PartTree::new().or(vec![
        PredicatePart::new("name", OperatorType::SimpleProperty),
        PredicatePart::new("alive", OperatorType::True),
    ]);
    let compiled = compile(&customers(), "Customer", &tree, vec!["Ann".into()], None).unwrap();
    assert_eq!(
        compiled.query,
        "FOR e IN customers FILTER e.name == @0 AND e.alive == true RETURN e"
    );
}

#[test]
fn empty_tree_has_no_filter() {
    let compiled = compile(&customers(), "Customer", &PartTree::new(), vec![], None).unwrap();
    assert_eq!(compiled.query, "FOR e IN customers RETURN e");
    assert!(compiled.bind_vars.is_empty());
}

#[test]
fn or_groups_share_one_counter() {
    let tree = PartTree::new()
        .or(vec![
            PredicatePart::new("name", OperatorType::SimpleProperty),
            PredicatePart::new("age", OperatorType::Between),
        ])
        .or(vec![PredicatePart::new("surname", OperatorType::NotLike)]);
    let compiled = compile(
        &customers(),
        "Customer",
        &tree,
        vec!["Ann".into(), 18i64.into(), 30i64.into(), "X%".into()],
        None,
    )
    .unwrap();
    assert_eq!(
        compiled.query,
        "FOR e IN customers FILTER e.name == @0 AND @1 <= e.age AND e.age <= @2 OR NOT(e.surname LIKE @3) RETURN e"
    );
    let keys: Vec<&str> = compiled.bind_vars.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["0", "1", "2", "3"]);
}

#[test]
fn count_distinct_sort_and_limit() {
    let tree = single(PredicatePart::new("age", OperatorType::GreaterThan))
        .count()
        .distinct()
        .limit(5);
    let sort = Sort::by([Order::asc("age"), Order::desc("name")]);
    let compiled = compile(
        &customers(),
        "Customer",
        &tree,
        vec![21i64.into()],
        Some(&sort),
    )
    .unwrap();
    assert_eq!(
        compiled.query,
        "FOR e IN customers FILTER e.age > @0 COLLECT entity = e COLLECT WITH COUNT INTO length SORT e.age ASC, e.name DESC LIMIT 5 RETURN length"
    );
}

#[test]
fn distinct_without_count_is_plain_read() {
    let tree = single(PredicatePart::new("age", OperatorType::GreaterThan)).distinct();
    let compiled = compile(&customers(), "Customer", &tree, vec![21i64.into()], None).unwrap();
    assert_eq!(
        compiled.query,
        "FOR e IN customers FILTER e.age > @0 RETURN e"
    );
}

#[test]
fn delete_removes_from_collection() {
    let tree = single(PredicatePart::new("name", OperatorType::SimpleProperty)).delete();
    let compiled = compile(&customers(), "Customer", &tree, vec!["Ann".into()], None).unwrap();
    assert_eq!(
        compiled.query,
        "FOR e IN customers FILTER e.name == @0 REMOVE e IN customers"
    );
}

#[test]
fn unsupported_operator_is_named() {
    let err = compile(
        &customers(),
        "Customer",
        &single(PredicatePart::new("nicknames", OperatorType::IsEmpty)),
        vec![],
        None,
    )
    .unwrap_err();
    assert_eq!(
        err,
        CompileError::UnsupportedOperator {
            operator: OperatorType::IsEmpty
        }
    );
    assert!(err.to_string().contains("is_empty"));
}

#[test]
fn exhausted_arguments_abort() {
    let tree = PartTree::new().or(vec![
        PredicatePart::new("name", OperatorType::SimpleProperty),
        PredicatePart::new("age", OperatorType::LessThan),
    ]);
    let err = compile(&customers(), "Customer", &tree, vec!["Ann".into()], None).unwrap_err();
    assert_eq!(err.code(), "InsufficientArguments");
}

#[test]
fn unknown_property_aborts() {
    let err = compile(
        &customers(),
        "Customer",
        &single(PredicatePart::new("email", OperatorType::SimpleProperty)),
        vec!["a@b".into()],
        None,
    )
    .unwrap_err();
    assert_eq!(
        err,
        CompileError::UnknownProperty {
            entity: "Customer".into(),
            path: "email".into(),
        }
    );
}

#[test]
fn compiling_twice_is_byte_identical() {
    let tree = PartTree::new()
        .or(vec![
            PredicatePart::new("name", OperatorType::StartingWith).ignore_case(IgnoreCase::Always),
            PredicatePart::new("nicknames", OperatorType::Containing)
                .ignore_case(IgnoreCase::Always),
        ])
        .or(vec![PredicatePart::new("age", OperatorType::In)]);
    let args = || {
        vec![
            Argument::from("A_b"),
            Argument::from("Kid"),
            Argument::Sequence(vec![Value::Int(1), Value::Int(2)]),
        ]
    };
    let meta = customers();
    let first = compile(&meta, "Customer", &tree, args(), None).unwrap();
    let second = compile(&meta, "Customer", &tree, args(), None).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn list_in_scalar_argument_is_rejected() {
    let err = compile(
        &customers(),
        "Customer",
        &single(PredicatePart::new("age", OperatorType::In)),
        vec![Argument::Scalar(Value::Array(vec![Value::Int(1)]))],
        None,
    )
    .unwrap_err();
    assert_eq!(err.code(), "InvalidArgument");
}
