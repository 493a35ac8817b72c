use std::sync::Arc;

use proptest::prelude::*;
use tagcond::{
    Condition, ConditionDslSerializer, ConditionEvaluator, ConditionTreeCache,
    ConditionalExpression, InMemoryTagDictionary, LogicalOperator, LogicalOperatorKind,
    OperatorConditionEvaluator, ScriptConditionEvaluator, TagDefinition, TagSet, TagValue,
    ValueKind,
};

// --- Fixed tag schema ---
// locale : string, one of {"en", "fr", "de"}
// age    : int (0..=120)
// points : long
// total  : decimal, two digits of scale
// vip    : bool

const LOCALES: &[&str] = &["en", "fr", "de"];
const STRING_OPS: &[&str] = &[
    "equalTo",
    "notEqualTo",
    "includes",
    "notIncludes",
    "includesIgnoreCase",
    "equalsIgnoreCase",
];
const ORDER_OPS: &[&str] = &[
    "equalTo",
    "notEqualTo",
    "lessThan",
    "lessThanOrEqualTo",
    "greaterThan",
    "greaterThanOrEqualTo",
];

fn dictionary() -> Arc<InMemoryTagDictionary> {
    Arc::new(
        InMemoryTagDictionary::new()
            .define_simple("locale", ValueKind::String)
            .define_simple("age", ValueKind::Int)
            .define_simple("points", ValueKind::Long)
            .define_simple("total", ValueKind::Decimal)
            .define_simple("vip", ValueKind::Bool),
    )
}

fn definition(name: &str) -> Arc<TagDefinition> {
    use tagcond::TagDictionary as _;
    dictionary().find_definition_by_name(name).unwrap()
}

fn arb_decimal() -> impl Strategy<Value = TagValue> {
    (0_i64..100_000).prop_map(|cents| {
        TagValue::Decimal(rust_decimal::Decimal::new(cents, 2))
    })
}

/// Generate a leaf condition that respects the schema's declared kinds.
fn arb_condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        (prop::sample::select(LOCALES), prop::sample::select(STRING_OPS)).prop_map(|(v, op)| {
            Condition::new(definition("locale"), op, TagValue::String(v.to_owned()))
        }),
        (0_i32..=120, prop::sample::select(ORDER_OPS))
            .prop_map(|(v, op)| Condition::new(definition("age"), op, TagValue::Int(v))),
        (any::<i32>(), prop::sample::select(ORDER_OPS)).prop_map(|(v, op)| {
            Condition::new(definition("points"), op, TagValue::Long(i64::from(v)))
        }),
        (arb_decimal(), prop::sample::select(ORDER_OPS))
            .prop_map(|(v, op)| Condition::new(definition("total"), op, v)),
        any::<bool>()
            .prop_map(|v| Condition::new(definition("vip"), "equalTo", TagValue::Bool(v))),
    ]
}

/// Generate a condition tree of bounded depth and width.
fn arb_tree() -> impl Strategy<Value = LogicalOperator> {
    let leaf_node = (
        any::<bool>(),
        prop::collection::vec(arb_condition(), 1..4),
    )
        .prop_map(|(and, conditions)| {
            let kind = if and {
                LogicalOperatorKind::And
            } else {
                LogicalOperatorKind::Or
            };
            let mut node = LogicalOperator::new(kind);
            for condition in conditions {
                node.add_condition(condition);
            }
            node
        });
    leaf_node.prop_recursive(3, 12, 3, |inner| {
        (
            any::<bool>(),
            prop::collection::vec(arb_condition(), 0..3),
            prop::collection::vec(inner, 1..3),
        )
            .prop_map(|(and, conditions, children)| {
                let kind = if and {
                    LogicalOperatorKind::And
                } else {
                    LogicalOperatorKind::Or
                };
                let mut node = LogicalOperator::new(kind);
                for condition in conditions {
                    node.add_condition(condition);
                }
                for child in children {
                    node.add_operator(child);
                }
                node
            })
    })
}

/// Generate a tag set over the schema; each tag is independently present.
fn arb_tags() -> impl Strategy<Value = TagSet> {
    (
        prop::option::of(prop::sample::select(LOCALES)),
        prop::option::of(0_i32..=120),
        prop::option::of(any::<i32>()),
        prop::option::of(arb_decimal()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(locale, age, points, total, vip)| {
            let mut tags = TagSet::new();
            if let Some(v) = locale {
                tags = tags.set("locale", v);
            }
            if let Some(v) = age {
                tags = tags.set("age", v);
            }
            if let Some(v) = points {
                tags = tags.set("points", i64::from(v));
            }
            if let Some(v) = total {
                tags = tags.set("total", v);
            }
            if let Some(v) = vip {
                tags = tags.set("vip", v);
            }
            tags
        })
}

#[test]
fn guid_differing_from_name_round_trips() {
    let dict = Arc::new(InMemoryTagDictionary::new().define(TagDefinition::new(
        "TAG_SHOPPER_LOCALE",
        "shopperLocale",
        tagcond::TagValueType::new(ValueKind::String),
    )));
    let def = {
        use tagcond::TagDictionary as _;
        dict.find_definition_by_name("shopperLocale").unwrap()
    };
    let tree = LogicalOperator::new(LogicalOperatorKind::And).with_condition(Condition::new(
        def,
        "equalTo",
        TagValue::String("en".into()),
    ));

    // Serialized text identifies the tag by guid.
    let text = ConditionDslSerializer::new().serialize(Some(&tree)).unwrap();
    assert_eq!(text, " { AND { TAG_SHOPPER_LOCALE.equalTo 'en' }  } ");

    let reparsed = tagcond::parse::parse(&text, dict.as_ref()).unwrap().unwrap();
    assert_eq!(reparsed, tree);

    // Evaluation still looks tags up by name.
    let expression = ConditionalExpression::new("e1", "locale check", &text);
    let evaluator = OperatorConditionEvaluator::new(ConditionTreeCache::new(dict));
    let tags = TagSet::new().set("shopperLocale", "en");
    assert!(evaluator.evaluate(&expression, &tags).unwrap());
}

proptest! {
    /// Serialization and reparsing reproduce the tree exactly.
    #[test]
    fn serialize_then_parse_reproduces_the_tree(tree in arb_tree()) {
        let dict = dictionary();
        let text = ConditionDslSerializer::new().serialize(Some(&tree)).unwrap();
        let reparsed = tagcond::parse::parse(&text, dict.as_ref()).unwrap().unwrap();
        prop_assert_eq!(reparsed, tree);
    }

    /// Serialized output is a fixed point: serializing the reparsed tree
    /// yields byte-identical text.
    #[test]
    fn serialized_form_is_canonical(tree in arb_tree()) {
        let dict = dictionary();
        let serializer = ConditionDslSerializer::new();
        let text = serializer.serialize(Some(&tree)).unwrap();
        let reparsed = tagcond::parse::parse(&text, dict.as_ref()).unwrap();
        let text_again = serializer.serialize(reparsed.as_ref()).unwrap();
        prop_assert_eq!(text, text_again);
    }

    /// The two evaluation strategies agree on every tree and tag set.
    #[test]
    fn strategies_agree(tree in arb_tree(), tags in arb_tags()) {
        let text = ConditionDslSerializer::new().serialize(Some(&tree)).unwrap();
        let expression = ConditionalExpression::new("gen", "generated", &text);

        let operator = OperatorConditionEvaluator::new(ConditionTreeCache::new(dictionary()));
        let script = ScriptConditionEvaluator::new(dictionary());

        let a = operator.evaluate(&expression, &tags).unwrap();
        let b = script.evaluate(&expression, &tags).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Evaluation never panics and never errors for schema-typed trees.
    #[test]
    fn evaluation_never_errors(tree in arb_tree(), tags in arb_tags()) {
        let text = ConditionDslSerializer::new().serialize(Some(&tree)).unwrap();
        let expression = ConditionalExpression::new("gen", "generated", &text);
        let evaluator = OperatorConditionEvaluator::new(ConditionTreeCache::new(dictionary()));
        prop_assert!(evaluator.evaluate(&expression, &tags).is_ok());
    }
}
