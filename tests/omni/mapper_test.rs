use lookml_omni::lookml::{ObjectKind, SourceObject, Value};
use lookml_omni::omni::{
    map_object, DimensionGroupFields, HiddenPolicy, MapperOptions, NameRewrite, OutputGroup,
};

fn dimension(name: &str) -> SourceObject {
    SourceObject::new(ObjectKind::Dimension, name)
}

fn measure(name: &str) -> SourceObject {
    SourceObject::new(ObjectKind::Measure, name)
}

#[test]
fn test_sql_table_reference_is_quoted() {
    let object = dimension("amount").with_property("sql", Value::str("${TABLE}.amount"));
    let record = map_object(&object, &MapperOptions::default());
    assert_eq!(record.get_str("sql"), Some("\"amount\""));
}

#[test]
fn test_sql_quoted_column_reference() {
    let object = dimension("user_id").with_property("sql", Value::str("${TABLE}.\"USER_ID\""));
    let record = map_object(&object, &MapperOptions::default());
    assert_eq!(record.get_str("sql"), Some("\"USER_ID\""));
}

#[test]
fn test_sql_complex_expression_kept_verbatim() {
    let object =
        measure("margin").with_property("sql", Value::str("${TABLE}.revenue - ${TABLE}.cost ;;"));
    let record = map_object(&object, &MapperOptions::default());
    assert_eq!(record.get_str("sql"), Some("${TABLE}.revenue - ${TABLE}.cost"));
}

#[test]
fn test_hidden_yes() {
    let object = dimension("secret").with_property("hidden", Value::Bool(true));
    let record = map_object(&object, &MapperOptions::default());
    assert_eq!(record.get("hidden"), Some(&Value::Bool(true)));
}

#[test]
fn test_hidden_no_is_omitted() {
    let object = dimension("status").with_property("hidden", Value::Bool(false));
    let record = map_object(&object, &MapperOptions::default());
    assert!(!record.contains("hidden"));
    assert!(!record.contains("tags"));
}

#[test]
fn test_hidden_business_facing_policy() {
    let options = MapperOptions::default().with_hidden_policy(HiddenPolicy::BusinessFacingTag);

    let visible = dimension("status").with_property("hidden", Value::Bool(false));
    let visible = map_object(&visible, &options);
    assert_eq!(visible.get("tags"), Some(&Value::list(["business_facing"])));

    let hidden = dimension("secret").with_property("hidden", Value::Bool(true));
    let hidden = map_object(&hidden, &options);
    assert!(!hidden.contains("tags"));

    let tagged = map_object(
        &dimension("tagged").with_property("tags", Value::list(["finance"])),
        &options,
    );
    assert_eq!(tagged.get("tags"), Some(&Value::list(["finance"])));
}

#[test]
fn test_primary_key() {
    let options = MapperOptions::default();
    let pk = dimension("id").with_property("primary_key", Value::Bool(true));
    let pk = map_object(&pk, &options);
    assert_eq!(pk.get("primary_key"), Some(&Value::Bool(true)));

    let not_pk = dimension("id").with_property("primary_key", Value::Bool(false));
    let not_pk = map_object(&not_pk, &options);
    assert!(!not_pk.contains("primary_key"));
}

#[test]
fn test_value_format_name() {
    let options = MapperOptions::default();
    let cases = [
        ("decimal_2", "NUMBER_2"),
        ("percent_1", "PERCENT_1"),
        ("usd", "CURRENCY"),
        ("eur", "EURCURRENCY"),
        ("gbp", "GBPCURRENCY"),
        ("usd_0", "USD_0"),
    ];
    for (format, expected) in cases {
        let object = measure("revenue").with_property("value_format_name", Value::str(format));
        let record = map_object(&object, &options);
        assert_eq!(record.get_str("format"), Some(expected), "format {}", format);
        assert!(!record.contains("value_format_name"));
    }
}

#[test]
fn test_dimension_yesno_type_dropped() {
    let object = dimension("is_active").with_property("type", Value::str("yesno"));
    let record = map_object(&object, &MapperOptions::default());
    assert!(!record.contains("type"));
    assert!(!record.contains("format"));
}

#[test]
fn test_dimension_id_string_gets_id_format() {
    let object = dimension("customer_id").with_property("type", Value::str("string"));
    let record = map_object(&object, &MapperOptions::default());
    assert_eq!(record.get_str("format"), Some("ID"));
    assert!(!record.contains("type"));
}

#[test]
fn test_dimension_number_format() {
    let object = dimension("quantity").with_property("type", Value::str("number"));
    let record = map_object(&object, &MapperOptions::default());
    assert_eq!(record.get_str("format"), Some("NUMBER"));
}

#[test]
fn test_value_format_name_beats_number_type() {
    let options = MapperOptions::default();
    let before = dimension("price")
        .with_property("type", Value::str("number"))
        .with_property("value_format_name", Value::str("usd"));
    let after = dimension("price")
        .with_property("value_format_name", Value::str("usd"))
        .with_property("type", Value::str("number"));

    assert_eq!(map_object(&before, &options).get_str("format"), Some("CURRENCY"));
    assert_eq!(map_object(&after, &options).get_str("format"), Some("CURRENCY"));
}

#[test]
fn test_measure_aggregate_types() {
    let options = MapperOptions::default();
    let cases = [
        ("count", "count"),
        ("count_distinct", "count_distinct"),
        ("sum", "sum"),
        ("average", "avg"),
        ("max", "max"),
        ("min", "min"),
        ("median", "median"),
        ("sum_distinct", "sum_distinct_on"),
        ("list", "list"),
    ];
    for (source_type, expected) in cases {
        let object = measure("m").with_property("type", Value::str(source_type));
        let record = map_object(&object, &options);
        assert_eq!(record.get_str("aggregate_type"), Some(expected), "type {}", source_type);
        assert!(!record.contains("type"));
    }
}

#[test]
fn test_calculated_measure_has_no_aggregate() {
    let object = measure("conversion_rate")
        .with_property("type", Value::str("number"))
        .with_property("sql", Value::str("${orders} / NULLIF(${visits}, 0)"));
    let record = map_object(&object, &MapperOptions::default());
    assert!(!record.contains("aggregate_type"));
    assert!(!record.contains("format"));
}

#[test]
fn test_unrecognized_measure_type_has_no_aggregate() {
    let object = measure("share").with_property("type", Value::str("percent_of_total"));
    let record = map_object(&object, &MapperOptions::default());
    assert!(!record.contains("aggregate_type"));
}

#[test]
fn test_sql_distinct_key_renamed() {
    let object = measure("total")
        .with_property("type", Value::str("sum_distinct"))
        .with_property("sql_distinct_key", Value::str("${TABLE}.order_id ;;"));
    let record = map_object(&object, &MapperOptions::default());
    assert_eq!(record.get_str("custom_primary_key_sql"), Some("${TABLE}.order_id"));
    assert!(!record.contains("sql_distinct_key"));
}

#[test]
fn test_drill_fields_wildcards_removed() {
    let object = measure("count")
        .with_property("drill_fields", Value::list(["detail*", "id", "users.name"]));
    let record = map_object(&object, &MapperOptions::default());
    assert_eq!(record.get("drill_fields"), Some(&Value::list(["id", "users.name"])));
}

#[test]
fn test_drill_fields_only_wildcards_omitted() {
    let object = measure("count").with_property("drill_fields", Value::list(["pa_drill*"]));
    let record = map_object(&object, &MapperOptions::default());
    assert!(!record.contains("drill_fields"));
}

#[test]
fn test_alias_and_link_normalized_to_lists() {
    let object = dimension("region")
        .with_property("alias", Value::str("area"))
        .with_property("aliases", Value::list(["zone"]))
        .with_property("link", Value::str("https://example.com"));
    let record = map_object(&object, &MapperOptions::default());
    assert_eq!(record.get("aliases"), Some(&Value::list(["area", "zone"])));
    assert_eq!(record.get("links"), Some(&Value::list(["https://example.com"])));
    assert!(!record.contains("alias"));
    assert!(!record.contains("link"));
}

#[test]
fn test_unlisted_properties_pass_through() {
    let object = dimension("region")
        .with_property("view_label", Value::str("Geography"))
        .with_property("case", Value::str("ignored"));
    let record = map_object(&object, &MapperOptions::default());
    assert_eq!(record.get_str("view_label"), Some("Geography"));
    assert!(!record.contains("case"));
}

#[test]
fn test_dimension_group_restricted() {
    let object = SourceObject::new(ObjectKind::DimensionGroup, "checkin")
        .with_property("type", Value::str("time"))
        .with_property("sql", Value::str("${TABLE}.checkin_at"))
        .with_property("timeframes", Value::list(["raw", "date"]))
        .with_property("convert_tz", Value::Bool(false))
        .with_property("view_label", Value::str("Times"));
    let record = map_object(&object, &MapperOptions::default());

    assert_eq!(record.group, OutputGroup::Dimensions);
    let keys: Vec<&str> = record.properties.keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 4);
    for key in ["sql", "label", "group_label", "description"] {
        assert!(record.contains(key), "missing {}", key);
    }
    assert!(!record.contains("timeframes"));
    assert!(!record.contains("convert_tz"));
}

#[test]
fn test_dimension_group_all_fields() {
    let object = SourceObject::new(ObjectKind::DimensionGroup, "checkin")
        .with_property("timeframes", Value::list(["raw", "date"]))
        .with_property("convert_tz", Value::Bool(false));
    let options = MapperOptions::default().with_dimension_group_fields(DimensionGroupFields::All);
    let record = map_object(&object, &options);
    assert_eq!(record.get("timeframes"), Some(&Value::list(["raw", "date"])));
    assert_eq!(record.get("convert_tz"), Some(&Value::Bool(false)));
}

#[test]
fn test_name_rewrite_applies_to_matching_label() {
    let rule = NameRewrite::new("count", "Total", "total_count").for_kind(ObjectKind::Measure);
    let options = MapperOptions::default().with_rewrite(rule);

    let total = measure("count").with_property("label", Value::str("Count (Total)"));
    assert_eq!(map_object(&total, &options).name, "total_count");

    let plain = measure("count").with_property("label", Value::str("Count"));
    assert_eq!(map_object(&plain, &options).name, "count");

    let dim = dimension("count").with_property("label", Value::str("Count (Total)"));
    assert_eq!(map_object(&dim, &options).name, "count");
}

#[test]
fn test_name_rewrite_matches_synthesized_label() {
    let rule = NameRewrite::new("created", "Created", "created_at");
    let options = MapperOptions::default().with_rewrite(rule);
    let object = SourceObject::new(ObjectKind::DimensionGroup, "created");
    assert_eq!(map_object(&object, &options).name, "created_at");
}
