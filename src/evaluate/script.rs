use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::cache::{Cache, MemoCache};
use crate::parse::parse;
use crate::{
    ConditionalExpression, LogicalOperator, LogicalOperatorKind, TagCondError, TagDictionary,
    TagSet, TagValue,
};

use super::operators::OperatorRegistry;
use super::ConditionEvaluator;

/// A condition string lowered to a self-contained predicate: tag
/// references are reduced to names and the tree shape is frozen, so
/// invocation needs neither the dictionary nor the original text.
pub struct CompiledPredicate {
    root: Option<PredNode>,
}

enum PredNode {
    Group { and: bool, children: Vec<PredNode> },
    Leaf {
        tag_name: String,
        symbol: String,
        operand: TagValue,
    },
}

impl CompiledPredicate {
    fn lower(tree: Option<&LogicalOperator>) -> Self {
        Self {
            root: tree.map(lower_node),
        }
    }

    /// Run the predicate against a tag set. Operator symbols resolve at
    /// invocation time so a registry swap applies to already-compiled
    /// predicates.
    ///
    /// # Errors
    ///
    /// Returns [`TagCondError::UnrecognizedOperator`] when a leaf names
    /// an operator the registry does not know.
    pub fn invoke(&self, registry: &OperatorRegistry, tags: &TagSet) -> Result<bool, TagCondError> {
        match &self.root {
            None => Ok(true),
            Some(node) => eval_node(node, registry, tags),
        }
    }
}

fn lower_node(node: &LogicalOperator) -> PredNode {
    let and = !matches!(node.kind(), Some(LogicalOperatorKind::Or));
    let mut children = Vec::new();
    for condition in node.conditions() {
        children.push(PredNode::Leaf {
            tag_name: condition.tag_definition().name().to_owned(),
            symbol: condition.operator().to_owned(),
            operand: condition.value().clone(),
        });
    }
    for child in node.logical_operators() {
        children.push(lower_node(child));
    }
    PredNode::Group { and, children }
}

fn eval_node(
    node: &PredNode,
    registry: &OperatorRegistry,
    tags: &TagSet,
) -> Result<bool, TagCondError> {
    match node {
        PredNode::Group { children, .. } if children.is_empty() => Ok(false),
        PredNode::Group { and, children } => {
            let mut acc = *and;
            for child in children {
                let hit = eval_node(child, registry, tags)?;
                acc = if *and { acc & hit } else { acc | hit };
            }
            Ok(acc)
        }
        PredNode::Leaf {
            tag_name,
            symbol,
            operand,
        } => {
            let operator =
                registry
                    .get(symbol)
                    .ok_or_else(|| TagCondError::UnrecognizedOperator {
                        symbol: symbol.clone(),
                    })?;
            let Some(tag) = tags.get(tag_name) else {
                return Ok(false);
            };
            Ok(operator.apply(tag.value(), operand))
        }
    }
}

/// Parses and lowers condition strings into [`CompiledPredicate`]s,
/// compiling each distinct string at most once. Concurrent callers for
/// the same string block until the first finishes; a failed compile is
/// forgotten so later callers can retry.
pub struct ConditionProcessingService {
    dictionary: Arc<dyn TagDictionary>,
    compiled: MemoCache<String, Arc<CompiledPredicate>>,
}

impl ConditionProcessingService {
    #[must_use]
    pub fn new(dictionary: Arc<dyn TagDictionary>) -> Self {
        Self {
            dictionary,
            compiled: MemoCache::new(),
        }
    }

    /// Fetch or build the compiled predicate for a condition string.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the string fails to parse or resolve.
    pub fn preprocess(&self, condition_string: &str) -> Result<Arc<CompiledPredicate>, TagCondError> {
        self.compiled
            .get_or_try_init(&condition_string.to_owned(), || {
                let tree = parse(condition_string, &*self.dictionary)?;
                Ok(Arc::new(CompiledPredicate::lower(tree.as_ref())))
            })
    }

    pub fn clear(&self) {
        self.compiled.clear();
    }
}

/// Cache key for evaluation results: the expression's identity plus the
/// tag values the result depends on. Tags named in the exclusion list
/// are filtered out before keying.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvaluationCacheKey {
    expression_guid: String,
    condition_string: String,
    tags: BTreeMap<String, TagValue>,
}

impl EvaluationCacheKey {
    fn new(expression: &ConditionalExpression, tags: &TagSet, excluded: &[String]) -> Self {
        let tags = tags
            .tags()
            .iter()
            .filter(|(name, _)| !excluded.iter().any(|ex| ex.as_str() == name.as_str()))
            .map(|(name, tag)| (name.clone(), tag.value().clone()))
            .collect();
        Self {
            expression_guid: expression.guid().to_owned(),
            condition_string: expression.condition_string().to_owned(),
            tags,
        }
    }
}

/// Compiled-predicate evaluator with an optional evaluation-result
/// cache. Compilation failures propagate unchanged; failures during
/// predicate invocation, including an unrecognized operator, are
/// reported as an evaluation error carrying the expression identity and
/// the tag set.
pub struct ScriptConditionEvaluator {
    processing: ConditionProcessingService,
    registry: OperatorRegistry,
    results: Option<Box<dyn Cache<EvaluationCacheKey, bool>>>,
    excluded_tags: Vec<String>,
    // Serializes the whole lookup-evaluate-store sequence when a result
    // cache is configured.
    result_lock: Mutex<()>,
}

impl ScriptConditionEvaluator {
    #[must_use]
    pub fn new(dictionary: Arc<dyn TagDictionary>) -> Self {
        Self {
            processing: ConditionProcessingService::new(dictionary),
            registry: OperatorRegistry::default(),
            results: None,
            excluded_tags: Vec::new(),
            result_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry: OperatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_result_cache(mut self, cache: Box<dyn Cache<EvaluationCacheKey, bool>>) -> Self {
        self.results = Some(cache);
        self
    }

    /// Tags whose values must not contribute to result-cache keys, such
    /// as per-request identifiers that would defeat caching.
    #[must_use]
    pub fn with_excluded_tags(mut self, names: Vec<String>) -> Self {
        self.excluded_tags = names;
        self
    }

    fn wrap(
        expression: &ConditionalExpression,
        tags: &TagSet,
        source: &TagCondError,
    ) -> TagCondError {
        TagCondError::Evaluation {
            expression: expression.to_string(),
            tags: tags.to_string(),
            reason: source.to_string(),
        }
    }
}

impl ConditionEvaluator for ScriptConditionEvaluator {
    fn evaluate(
        &self,
        expression: &ConditionalExpression,
        tags: &TagSet,
    ) -> Result<bool, TagCondError> {
        let compiled = self.processing.preprocess(expression.condition_string())?;

        let Some(results) = &self.results else {
            return compiled
                .invoke(&self.registry, tags)
                .map_err(|e| Self::wrap(expression, tags, &e));
        };

        let _guard = self
            .result_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let key = EvaluationCacheKey::new(expression, tags, &self.excluded_tags);
        if let Some(hit) = results.get(&key) {
            return Ok(hit);
        }
        let value = compiled
            .invoke(&self.registry, tags)
            .map_err(|e| Self::wrap(expression, tags, &e))?;
        results.put(key, value);
        Ok(value)
    }
}
