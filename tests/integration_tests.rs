use opl_dat::normalize::{KeywordNormalizer, ReservedWords};
use opl_dat::{
    check_disjoint_namespaces, from_str, from_str_with_options, key, row, to_string,
    to_string_with_options, CodecOptions, Dataset, Error, ErrorCategory, Number, Scalar, Schema,
    Table, TableSchema,
};

fn arcs_schema() -> Schema {
    Schema::new()
        .with_table(TableSchema::new("arcs", ["source", "destination"], ["capacity"]).unwrap())
        .unwrap()
}

fn nodes_schema() -> Schema {
    Schema::new()
        .with_table(TableSchema::new("nodes", ["name"], Vec::<String>::new()).unwrap())
        .unwrap()
}

#[test]
fn test_arcs_scenario() {
    let mut dataset = Dataset::new();
    dataset.insert_table(
        "arcs",
        Table::keyed([(key!["Detroit", "Boston"], row! { "capacity" => 100 })]),
    );

    let text = to_string(&arcs_schema(), &dataset).unwrap();
    assert_eq!(text, "arcs = {\n<\"Detroit\", \"Boston\", 100>\n};\n");

    let back = from_str(&arcs_schema(), &text).unwrap();
    assert_eq!(back, dataset);
    let row = back
        .table("arcs")
        .unwrap()
        .get(&key!["Detroit", "Boston"])
        .unwrap();
    assert_eq!(row.get("capacity"), Some(&Scalar::Number(Number::Integer(100))));
}

#[test]
fn test_nodes_reencode_is_byte_identical() {
    let text = "nodes = {\"Detroit\", \"Denver\"};\n";
    let dataset = from_str(&nodes_schema(), text).unwrap();

    let nodes = dataset.table("nodes").unwrap();
    let names: Vec<_> = nodes.rows().map(|(k, _)| k[0].clone()).collect();
    assert_eq!(names, vec![Scalar::from("Detroit"), Scalar::from("Denver")]);

    assert_eq!(to_string(&nodes_schema(), &dataset).unwrap(), text);
}

#[test]
fn test_infinity_reads_back_as_sentinel() {
    let schema = Schema::new()
        .with_table(TableSchema::new("caps", ["arc"], ["cap"]).unwrap())
        .unwrap();
    let mut dataset = Dataset::new();
    dataset.insert_table(
        "caps",
        Table::keyed([(key!["a"], row! { "cap" => f64::INFINITY })]),
    );

    let text = to_string(&schema, &dataset).unwrap();
    let back = from_str(&schema, &text).unwrap();
    let cap = back.table("caps").unwrap().get(&key!["a"]).unwrap().get("cap");
    assert_eq!(cap.and_then(Scalar::as_i64), Some(999_999));
}

#[test]
fn test_reserved_field_escaping() {
    let schema = Schema::new()
        .with_table(TableSchema::new("totals", ["item"], ["sum"]).unwrap())
        .unwrap();
    let normalizer = KeywordNormalizer::new(ReservedWords::opl(), '_');

    let escaped = normalizer.escape_schema(&schema).unwrap();
    assert_eq!(escaped.table("totals").unwrap().data_fields(), ["_sum"]);
    let restored = normalizer.unescape_schema(&escaped);
    assert_eq!(restored.table("totals").unwrap().data_fields(), ["sum"]);

    let mut dataset = Dataset::new();
    dataset.insert_table("totals", Table::keyed([(key!["bolts"], row! { "sum" => 3 })]));
    let text = to_string(&schema, &dataset).unwrap();
    assert_eq!(from_str(&schema, &text).unwrap(), dataset);
}

#[test]
fn test_arity_mismatch_names_table() {
    let err = from_str(
        &arcs_schema(),
        "arcs = {\n<\"a\", \"b\", 1>\n<\"a\", \"c\">\n};",
    )
    .unwrap_err();
    match &err {
        Error::ArityMismatch {
            table,
            expected,
            found,
        } => {
            assert_eq!(table, "arcs");
            assert_eq!((*expected, *found), (3, 2));
        }
        other => panic!("expected arity mismatch, got {:?}", other),
    }
    assert_eq!(err.category(), ErrorCategory::Format);
}

#[test]
fn test_duplicate_primary_key_is_rejected() {
    let err = from_str(
        &arcs_schema(),
        "arcs = {\n<\"a\", \"b\", 1>\n<\"a\", \"b\", 2>\n};",
    )
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateKey { ref table, .. } if table == "arcs"));
    assert_eq!(err.category(), ErrorCategory::Format);
}

#[test]
fn test_duplicate_table_name_is_rejected() {
    let err = from_str(&nodes_schema(), "nodes = {1};\nnodes = {2};").unwrap_err();
    assert!(matches!(err, Error::DuplicateTable { ref table, .. } if table == "nodes"));
    assert!(err.position().is_some());
}

#[test]
fn test_prefix_and_unmatched_blocks() {
    let text = "in_arcs = {<\"a\", \"b\", 1>};\nout_flow = {<\"a\", 2>};\nother = {1, 2};";
    let options = CodecOptions::new().with_name_prefix("in_");
    let dataset = from_str_with_options(&arcs_schema(), text, options).unwrap();

    assert_eq!(dataset.table("arcs").unwrap().len(), 1);
    let unmatched: Vec<_> = dataset.unmatched().keys().cloned().collect();
    assert_eq!(unmatched, vec!["out_flow".to_string(), "other".to_string()]);
    assert_eq!(dataset.unmatched()["other"].len(), 2);
}

#[test]
fn test_missing_table_decodes_empty() {
    let dataset = from_str(&arcs_schema(), "").unwrap();
    assert!(dataset.table("arcs").unwrap().is_empty());
}

#[test]
fn test_legacy_round_trip() {
    let text = "arcs = {<\"Detroit\" \"Boston\" 100>\n<\"Detroit\" \"Denver\" 2.5>};";
    assert!(from_str(&arcs_schema(), text).is_err());

    let dataset = from_str_with_options(&arcs_schema(), text, CodecOptions::legacy()).unwrap();
    let arcs = dataset.table("arcs").unwrap();
    assert_eq!(arcs.len(), 2);
    assert_eq!(
        arcs.get(&key!["Detroit", "Denver"]).unwrap().get("capacity"),
        Some(&Scalar::from(2.5))
    );

    let reencoded = to_string(&arcs_schema(), &dataset).unwrap();
    assert_eq!(from_str(&arcs_schema(), &reencoded).unwrap(), dataset);
}

#[test]
fn test_unkeyed_table_round_trip() {
    let schema = Schema::new()
        .with_table(TableSchema::new("log", Vec::<String>::new(), ["step", "cost"]).unwrap())
        .unwrap()
        .with_table(TableSchema::new("levels", Vec::<String>::new(), ["level"]).unwrap())
        .unwrap();
    let mut dataset = Dataset::new();
    dataset.insert_table(
        "log",
        Table::unkeyed([
            row! { "step" => "a", "cost" => 1 },
            row! { "step" => "a", "cost" => 1 },
        ]),
    );
    dataset.insert_table("levels", Table::unkeyed([row! { "level" => 0.25 }]));

    let options = CodecOptions::new().with_name_prefix("out_");
    let text = to_string_with_options(&schema, &dataset, options.clone()).unwrap();
    assert!(text.contains("out_levels = {0.25};"));
    assert_eq!(from_str_with_options(&schema, &text, options).unwrap(), dataset);
}

#[test]
fn test_validation_runs_before_encoding() {
    let mut dataset = Dataset::new();
    dataset.insert_table(
        "arcs",
        Table::keyed([(key!["Detroit"], row! { "capacity" => 1 })]),
    );
    let err = to_string(&arcs_schema(), &dataset).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[test]
fn test_namespace_collision() {
    let input = arcs_schema();
    let output = Schema::new()
        .with_table(TableSchema::new("arcs", ["source"], ["flow"]).unwrap())
        .unwrap();

    let err = check_disjoint_namespaces(&input, "", &output, "").unwrap_err();
    assert!(matches!(err, Error::CollidingTableNames { ref names } if names == &["arcs"]));
    assert_eq!(err.category(), ErrorCategory::Schema);
    assert!(check_disjoint_namespaces(&input, "in_", &output, "out_").is_ok());
}

#[test]
fn test_case_space_duplicates_fail_both_ways() {
    let schema = Schema::new()
        .with_table(TableSchema::new("t", ["Node Name"], ["node_name"]).unwrap())
        .unwrap();
    let err = from_str(&schema, "").unwrap_err();
    assert!(matches!(err, Error::CaseSpaceDuplicates { .. }));
    let err = to_string(&schema, &Dataset::new()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Schema);
}
