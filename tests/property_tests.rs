//! Property-based tests for hierarchy and lookup laws.
//!
//! Hierarchies are random DAGs: every class may derive from any earlier
//! class with an arbitrary signed offset. Expected offsets come from a plain
//! declaration-ordered depth-first search over the generated graph.

use std::collections::BTreeSet;

use metaclass::prelude::*;
use proptest::prelude::*;
use proptest::sample::Index;

// -- Strategies --

/// Direct bases of one class: (pick among earlier classes, offset).
type BaseSpec = Vec<(Index, isize)>;

/// Resolved graph: direct bases of each class as (position, offset).
type Graph = Vec<Vec<(usize, isize)>>;

fn hierarchy_strategy() -> impl Strategy<Value = Vec<BaseSpec>> {
    let bases = prop::collection::vec((any::<Index>(), -64isize..64), 0..4);
    prop::collection::vec(bases, 1..14)
}

/// Distinct member names in random declaration order.
fn member_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,8}", 0..24)
        .prop_flat_map(shuffled)
}

fn shuffled(names: BTreeSet<String>) -> impl Strategy<Value = Vec<String>> {
    Just(names.into_iter().collect::<Vec<_>>()).prop_shuffle()
}

// -- Helpers --

fn class_name(position: usize) -> String {
    format!("C{position}")
}

/// Map picks to earlier positions, dropping repeated bases.
fn resolve(spec: &[BaseSpec]) -> Graph {
    spec.iter()
        .enumerate()
        .map(|(position, bases)| {
            let mut resolved: Vec<(usize, isize)> = Vec::new();
            if position == 0 {
                return resolved;
            }
            for (pick, offset) in bases {
                let base = pick.index(position);
                if resolved.iter().all(|&(existing, _)| existing != base) {
                    resolved.push((base, *offset));
                }
            }
            resolved
        })
        .collect()
}

fn build(graph: &Graph) -> ClassRegistry {
    let mut registry = ClassRegistry::new();
    for (position, bases) in graph.iter().enumerate() {
        let mut builder = registry.declare(class_name(position));
        for &(base, offset) in bases {
            builder = builder.base(&class_name(base), offset);
        }
        builder.register().unwrap();
    }
    registry
}

fn expected_offset(graph: &Graph, from: usize, to: usize) -> Option<isize> {
    if from == to {
        return Some(0);
    }
    for &(base, offset) in &graph[from] {
        if let Some(rest) = expected_offset(graph, base, to) {
            return Some(rest + offset);
        }
    }
    None
}

fn int_property(name: &str) -> PropertyEntry {
    PropertyEntry::read_only(name, ValueKind::Int, |_: &UserObject| Ok(Value::Int(0)))
}

fn noop_function(name: &str) -> FunctionEntry {
    FunctionEntry::new(name, vec![], ValueKind::None, |_: &UserObject, _: &Args| {
        Ok(Value::None)
    })
}

// -- Property Tests --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Offsets follow the first declared path and agree with `is_derived_from`.
    #[test]
    fn prop_base_offset_first_declared_path(spec in hierarchy_strategy()) {
        let graph = resolve(&spec);
        let registry = build(&graph);

        for from in 0..graph.len() {
            let source = registry.get_by_index(from).unwrap();
            for to in 0..graph.len() {
                let target = registry.get_by_index(to).unwrap();
                let expected = expected_offset(&graph, from, to);
                prop_assert_eq!(source.base_offset(target, &registry), expected);
                prop_assert_eq!(source.is_derived_from(target, &registry), expected.is_some());
            }
        }
    }

    /// Adjusting to a related class and back recovers the pointer; unrelated
    /// pairs fail; null always passes through.
    #[test]
    fn prop_apply_offset_round_trip(spec in hierarchy_strategy(), address in 4096usize..1 << 20) {
        let graph = resolve(&spec);
        let registry = build(&graph);
        let pointer = std::ptr::dangling_mut::<u8>().wrapping_add(address);

        for source in registry.classes() {
            for target in registry.classes() {
                let related = source.is_derived_from(target, &registry)
                    || target.is_derived_from(source, &registry);

                match source.apply_offset(pointer, target, &registry) {
                    Ok(adjusted) => {
                        prop_assert!(related);
                        let back = target.apply_offset(adjusted, source, &registry);
                        prop_assert_eq!(back, Ok(pointer));
                    }
                    Err(err) => {
                        prop_assert!(!related);
                        let unrelated = matches!(err, ClassError::ClassUnrelated { .. });
                        prop_assert!(unrelated, "unexpected error: {}", err);
                    }
                }

                let null = source.apply_offset(std::ptr::null_mut(), target, &registry);
                prop_assert_eq!(null, Ok(std::ptr::null_mut()));
            }
        }
    }

    /// `derived_classes` lists exactly the classes reaching the target.
    #[test]
    fn prop_derived_classes(spec in hierarchy_strategy()) {
        let graph = resolve(&spec);
        let registry = build(&graph);

        for to in 0..graph.len() {
            let target = registry.get_by_index(to).unwrap();
            let derived: Vec<String> = registry
                .derived_classes(target.id())
                .unwrap()
                .iter()
                .map(|class| class.name().to_string())
                .collect();
            let expected: Vec<String> = (0..graph.len())
                .filter(|&from| from != to && expected_offset(&graph, from, to).is_some())
                .map(class_name)
                .collect();
            prop_assert_eq!(derived, expected);
        }
    }

    /// Presence tests, id lookup, optional lookup and index access agree.
    #[test]
    fn prop_lookup_laws(
        properties in member_names(),
        functions in member_names(),
        probes in prop::collection::vec("[a-z]{1,8}", 0..16),
    ) {
        let mut registry = ClassRegistry::new();
        let mut builder = registry.declare("Subject");
        for name in &properties {
            builder = builder.property(int_property(name));
        }
        for name in &functions {
            builder = builder.function(noop_function(name));
        }
        builder.register().unwrap();
        let class = registry.get_by_name("Subject").unwrap();

        prop_assert_eq!(class.property_count(), properties.len());
        prop_assert_eq!(class.function_count(), functions.len());

        for (index, name) in properties.iter().enumerate() {
            let property = class.property_by_index(index).unwrap();
            prop_assert_eq!(&property.name, name);
            prop_assert!(std::ptr::eq(property, class.property_by_id(property.id).unwrap()));
        }
        for index in 0..class.function_count() {
            let function = class.function_by_index(index).unwrap();
            prop_assert!(std::ptr::eq(function, class.function_by_id(function.id).unwrap()));
        }

        for name in probes.iter().chain(&properties).chain(&functions) {
            let id = StringId::from_name(name);

            let has_property = class.has_property(id);
            prop_assert_eq!(has_property, properties.contains(name));
            prop_assert_eq!(class.try_property_by_id(id).is_some(), has_property);
            match class.property_by_id(id) {
                Ok(property) => {
                    prop_assert_eq!(property.id, id);
                }
                Err(err) => {
                    let missing = ClassError::PropertyNotFound { id, class: "Subject".to_string() };
                    prop_assert_eq!(err, missing);
                }
            }

            let has_function = class.has_function(id);
            prop_assert_eq!(has_function, functions.contains(name));
            prop_assert_eq!(class.try_function_by_id(id).is_some(), has_function);
            match class.function_by_id(id) {
                Ok(function) => {
                    prop_assert_eq!(function.id, id);
                }
                Err(err) => {
                    let missing = ClassError::FunctionNotFound { id, class: "Subject".to_string() };
                    prop_assert_eq!(err, missing);
                }
            }
        }

        let past_properties = class.property_by_index(properties.len());
        prop_assert!(matches!(past_properties, Err(ClassError::OutOfRange { .. })), "expected OutOfRange, got {:?}", past_properties);
        let past_functions = class.function_by_index(functions.len());
        prop_assert!(matches!(past_functions, Err(ClassError::OutOfRange { .. })), "expected OutOfRange, got {:?}", past_functions);
    }
}
