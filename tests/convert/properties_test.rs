use lookml_omni::convert::{convert, ConvertOptions};
use lookml_omni::lookml::{self, ObjectKind, SourceObject, Value};
use lookml_omni::omni::{map_object, map_sql, render, MapperOptions, OmniView, RenderOptions};
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}(_[a-z0-9]{1,6}){0,3}"
}

fn dimension_kind() -> impl Strategy<Value = ObjectKind> {
    prop_oneof![Just(ObjectKind::Dimension), Just(ObjectKind::DimensionGroup)]
}

/// Printable ASCII without surrounding blanks.
fn text() -> impl Strategy<Value = String> {
    "[!-~]([ -~]{0,78}[!-~])?"
}

fn parse(yaml: &str) -> serde_yaml::Value {
    serde_yaml::from_str(yaml).expect("rendered YAML parses")
}

proptest! {
    #[test]
    fn table_reference_becomes_quoted_column(
        column in "[A-Za-z_][A-Za-z0-9_]{0,15}",
        leading in " {0,3}",
        trailing in " {0,3}",
    ) {
        let sql = Value::str(format!("{}${{TABLE}}.{}{}", leading, column, trailing));
        prop_assert_eq!(map_sql(&sql), Value::str(format!("\"{}\"", column)));
    }

    #[test]
    fn multiline_statement_collapses_to_one_line(
        name in identifier(),
        words in prop::collection::vec("[a-z]{1,6}", 1..6),
        indent in " {0,8}",
    ) {
        let mut source = format!("dimension: {} {{\n  sql: start\n", name);
        for word in &words {
            source.push_str(&format!("{}{}\n", indent, word));
        }
        source.push_str("  ;;\n}\n");

        let objects = lookml::scan(&source);
        prop_assert_eq!(objects.len(), 1);
        let expected = format!("start {}", words.join(" "));
        prop_assert_eq!(objects[0].get("sql"), Some(&Value::str(expected)));
    }

    #[test]
    fn wildcard_only_drill_fields_are_dropped(
        name in identifier(),
        sets in prop::collection::vec("[a-z]{1,8}", 1..4),
    ) {
        let items: Vec<String> = sets.iter().map(|s| format!("{}*", s)).collect();
        let source = format!(
            "measure: {} {{\n  type: count\n  drill_fields: [{}]\n}}\n",
            name,
            items.join(", ")
        );
        let output = convert(&source, &ConvertOptions::default());
        prop_assert!(!output.yaml.contains("drill_fields"));
        prop_assert!(!output.yaml.contains('*'));
    }

    #[test]
    fn dimensions_always_get_label_and_description(
        kind in dimension_kind(),
        name in identifier(),
    ) {
        let record = map_object(&SourceObject::new(kind, &name), &MapperOptions::default());
        prop_assert!(record.get_str("label").is_some_and(|l| !l.is_empty()));
        prop_assert!(record.get_str("description").is_some_and(|d| !d.is_empty()));
        prop_assert!(record.get_str("group_label").is_some_and(|g| !g.is_empty()));
    }

    #[test]
    fn input_without_declarations_renders_nothing(
        lines in prop::collection::vec("[a-z_]{1,10}: [a-z ]{0,12}", 0..8),
    ) {
        let source = lines.join("\n");
        let output = convert(&source, &ConvertOptions::default());
        prop_assert!(output.is_empty());
        prop_assert_eq!(output.yaml, "");
    }

    #[test]
    fn rendered_scalars_read_back_unchanged(
        name in identifier(),
        label in text(),
        description in text(),
        drill in prop::collection::vec("[a-z0-9_.]{1,8}", 1..4),
    ) {
        let view = OmniView::from_objects(
            &[
                SourceObject::new(ObjectKind::Dimension, &name)
                    .with_property("label", Value::str(label.as_str()))
                    .with_property("description", Value::str(description.as_str())),
                SourceObject::new(ObjectKind::Measure, "m_total")
                    .with_property("drill_fields", Value::list(drill.clone())),
            ],
            &MapperOptions::default(),
        );
        let yaml = render(&view, &RenderOptions::default());
        let parsed = parse(&yaml);

        let record = &parsed["dimensions"][name.as_str()];
        prop_assert_eq!(record["label"].as_str(), Some(label.as_str()));
        // Long descriptions are `|` block literals and keep a final newline.
        let read_back = record["description"].as_str().map(|d| d.trim_end_matches('\n'));
        prop_assert_eq!(read_back, Some(description.as_str()));

        let fields: Vec<&str> = parsed["measures"]["m_total"]["drill_fields"]
            .as_sequence()
            .map(|items| items.iter().filter_map(serde_yaml::Value::as_str).collect())
            .unwrap_or_default();
        prop_assert_eq!(fields, drill.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
