use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use tagcond::{
    ConditionEvaluator, ConditionProcessingService, ConditionalExpression, InMemoryTagDictionary,
    MemoCache, ScriptConditionEvaluator, TagDictionary, TagSet, ValueKind,
};

fn dictionary() -> Arc<InMemoryTagDictionary> {
    Arc::new(
        InMemoryTagDictionary::new()
            .define_simple("shopperLocale", ValueKind::String)
            .define_simple("age", ValueKind::Int),
    )
}

#[test]
fn evaluate_across_threads() {
    let evaluator = Arc::new(ScriptConditionEvaluator::new(dictionary()));
    let expression = Arc::new(ConditionalExpression::new(
        "promo",
        "adult english shoppers",
        "{AND {shopperLocale.equalTo 'en'} {age.greaterThanOrEqualTo (18i)}}",
    ));

    let cases = [
        ("en", 25_i32, true),
        ("en", 15_i32, false),
        ("fr", 25_i32, false),
        ("en", 18_i32, true),
    ];

    let mut handles = vec![];
    for (locale, age, expected) in cases {
        let evaluator = Arc::clone(&evaluator);
        let expression = Arc::clone(&expression);
        handles.push(thread::spawn(move || {
            let tags = TagSet::new().set("shopperLocale", locale).set("age", age);
            let result = evaluator.evaluate(&expression, &tags).unwrap();
            assert_eq!(result, expected, "locale={locale} age={age}");
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn preprocess_compiles_each_string_once_across_threads() {
    struct CountingDictionary {
        inner: Arc<InMemoryTagDictionary>,
        lookups: AtomicUsize,
    }
    impl TagDictionary for CountingDictionary {
        fn find_definition_by_name(&self, name: &str) -> Option<Arc<tagcond::TagDefinition>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_definition_by_name(name)
        }

        fn find_definition_by_guid(&self, guid: &str) -> Option<Arc<tagcond::TagDefinition>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_definition_by_guid(guid)
        }
    }

    let counting = Arc::new(CountingDictionary {
        inner: dictionary(),
        lookups: AtomicUsize::new(0),
    });
    let processing = Arc::new(ConditionProcessingService::new(
        Arc::clone(&counting) as Arc<dyn TagDictionary>
    ));

    let mut handles = vec![];
    for _ in 0..8 {
        let processing = Arc::clone(&processing);
        handles.push(thread::spawn(move || {
            processing
                .preprocess("{AND {age.greaterThan (18i)}}")
                .unwrap()
        }));
    }
    let compiled: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Every thread got the same compiled predicate, and resolution ran
    // for exactly one compile (one tag lookup).
    for pair in compiled.windows(2) {
        assert!(Arc::ptr_eq(&pair[0], &pair[1]));
    }
    assert_eq!(counting.lookups.load(Ordering::SeqCst), 1);
}

#[test]
fn memo_cache_single_initialization_under_contention() {
    let cache: Arc<MemoCache<String, u32>> = Arc::new(MemoCache::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        let calls = Arc::clone(&calls);
        handles.push(thread::spawn(move || {
            let value: Result<u32, ()> = cache.get_or_try_init(&"k".to_owned(), || {
                calls.fetch_add(1, Ordering::SeqCst);
                thread::sleep(std::time::Duration::from_millis(10));
                Ok(7)
            });
            value.unwrap()
        }));
    }
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 7);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
