//! Two-pass condition DSL parsing: a grammar pass that builds a raw
//! syntax tree, then a resolution pass that binds each tag reference to
//! its [`TagDefinition`] through the injected dictionary.

mod error;
mod grammar;

pub use error::{ParseError, ParseErrorKind};

use crate::{Condition, LogicalOperator, LogicalOperatorKind, TagDictionary};

use grammar::{RawKind, RawNode};

/// Parse a condition string into a tree, resolving each tag reference
/// through `dictionary` by name, falling back to guid (serialized text
/// identifies tags by guid). Empty or blank input means "no condition"
/// and yields `Ok(None)`; evaluators treat that as always satisfied.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid DSL syntax or if it
/// references a tag the dictionary does not know.
pub fn parse(
    input: &str,
    dictionary: &dyn TagDictionary,
) -> Result<Option<LogicalOperator>, ParseError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    use winnow::Parser;
    let raw = grammar::tree
        .parse(input)
        .map_err(|e| ParseError::syntax(e.to_string()))?;
    resolve(&raw, dictionary).map(Some)
}

fn resolve(raw: &RawNode, dictionary: &dyn TagDictionary) -> Result<LogicalOperator, ParseError> {
    let kind = match raw.kind {
        RawKind::And => LogicalOperatorKind::And,
        RawKind::Or => LogicalOperatorKind::Or,
    };
    let mut node = LogicalOperator::new(kind);
    for raw_cond in &raw.conditions {
        let definition = dictionary
            .find_definition_by_name(&raw_cond.tag)
            .or_else(|| dictionary.find_definition_by_guid(&raw_cond.tag))
            .ok_or_else(|| ParseError::unknown_tag(&raw_cond.tag))?;
        node.add_condition(Condition::new(
            definition,
            raw_cond.operator.clone(),
            raw_cond.value.clone(),
        ));
    }
    for child in &raw.children {
        node.add_operator(resolve(child, dictionary)?);
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryTagDictionary, TagValue, ValueKind};

    fn dict() -> InMemoryTagDictionary {
        InMemoryTagDictionary::new()
            .define_simple("refererUrl", ValueKind::String)
            .define_simple("age", ValueKind::Int)
    }

    #[test]
    fn blank_input_is_no_condition() {
        assert!(parse("", &dict()).unwrap().is_none());
        assert!(parse("   \n\t", &dict()).unwrap().is_none());
    }

    #[test]
    fn resolves_tags_through_dictionary() {
        let tree = parse("{AND {refererUrl.includes 'google'}}", &dict())
            .unwrap()
            .unwrap();
        assert_eq!(tree.kind(), Some(LogicalOperatorKind::And));
        let cond = &tree.conditions()[0];
        assert_eq!(cond.tag_definition().name(), "refererUrl");
        assert_eq!(cond.operator(), "includes");
        assert_eq!(cond.value(), &TagValue::String("google".into()));
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let err = parse("{AND {mystery.equalTo 'x'}}", &dict()).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnknownTag);
        assert!(err.to_string().contains("unknown tag 'mystery'"));
    }

    #[test]
    fn guid_token_resolves_when_name_lookup_misses() {
        let dict = InMemoryTagDictionary::new().define(crate::TagDefinition::new(
            "TAG_SHOPPER_LOCALE",
            "shopperLocale",
            crate::TagValueType::new(ValueKind::String),
        ));
        let tree = parse("{AND {TAG_SHOPPER_LOCALE.equalTo 'en'}}", &dict)
            .unwrap()
            .unwrap();
        let cond = &tree.conditions()[0];
        assert_eq!(cond.tag_definition().guid(), "TAG_SHOPPER_LOCALE");
        assert_eq!(cond.tag_definition().name(), "shopperLocale");
    }

    #[test]
    fn nested_nodes_resolve_recursively() {
        let tree = parse(
            "{OR {age.lessThan (18i)} {AND {refererUrl.includes 'google'} {age.greaterThan (65i)}}}",
            &dict(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(tree.kind(), Some(LogicalOperatorKind::Or));
        assert_eq!(tree.conditions().len(), 1);
        assert_eq!(tree.logical_operators().len(), 1);
        let inner = &tree.logical_operators()[0];
        assert_eq!(inner.kind(), Some(LogicalOperatorKind::And));
        assert_eq!(inner.conditions().len(), 2);
    }

    #[test]
    fn unknown_tag_in_nested_node_is_an_error() {
        let err = parse("{AND {OR {mystery.equalTo 'x'}}}", &dict()).unwrap_err();
        assert!(err.to_string().contains("unknown tag"));
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = parse("{AND {refererUrl.includes 'google'}", &dict()).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::Syntax);
    }

    #[test]
    fn leniently_accepts_literal_kind_mismatch() {
        // Resolution does not type-check; the validator and builder do.
        let tree = parse("{AND {age.equalTo 'ten'}}", &dict()).unwrap().unwrap();
        assert_eq!(tree.conditions()[0].value(), &TagValue::String("ten".into()));
    }
}
