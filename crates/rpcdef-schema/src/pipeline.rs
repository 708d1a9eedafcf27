// crates/rpcdef-schema/src/pipeline.rs
// ============================================================================
// Module: Filter, Sort, and Output Injection
// Description: Post-traversal passes over an assembled definition.
// Purpose: Prune excluded objects, impose ordering, and add response fields.
// Dependencies: rpcdef-core, serde_json, tracing
// ============================================================================

//! ## Overview
//! These passes run once, after graph traversal completes, and always operate
//! on whole lists:
//! 1. [`prune_excluded`] drops objects recorded as excluded that no retained
//!    service can still reach.
//! 2. [`sort_definition`] orders services and objects by name.
//! 3. [`inject_output_fields`] appends the synthetic `Error` field to every
//!    object used as a response type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use rpcdef_core::Definition;
use rpcdef_core::Field;
use rpcdef_core::Object;
use rpcdef_core::Type;
use serde_json::Value;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the synthetic response field.
pub const ERROR_FIELD_NAME: &str = "Error";
/// Comment attached to the synthetic response field.
pub const ERROR_FIELD_COMMENT: &str =
    "Error is string explaining what went wrong. Empty if everything was fine.";
/// Example value attached to the synthetic response field.
pub const ERROR_FIELD_EXAMPLE: &str = "something went wrong";

// ============================================================================
// SECTION: Object Graph
// ============================================================================

/// Object references observed during traversal, keyed by type identity.
///
/// # Invariants
/// - `roots` holds objects referenced directly by methods of retained services.
/// - `edges` maps an object to every object its fields reference, including map keys and values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectGraph {
    /// Objects referenced by retained methods.
    pub roots: BTreeSet<String>,
    /// Object to referenced objects.
    pub edges: BTreeMap<String, BTreeSet<String>>,
}

impl ObjectGraph {
    /// Returns every object identity reachable from the roots.
    #[must_use]
    pub fn reachable(&self) -> BTreeSet<String> {
        let mut reached = BTreeSet::new();
        let mut pending: Vec<&String> = self.roots.iter().collect();
        while let Some(type_id) = pending.pop() {
            if !reached.insert(type_id.clone()) {
                continue;
            }
            if let Some(targets) = self.edges.get(type_id) {
                pending.extend(targets.iter().filter(|target| !reached.contains(*target)));
            }
        }
        reached
    }
}

// ============================================================================
// SECTION: Pruning
// ============================================================================

/// Removes excluded objects that retained services no longer reach.
///
/// An object whose identity is absent from `excluded` is always kept.
#[must_use]
pub fn prune_excluded(
    objects: Vec<Object>,
    excluded: &BTreeSet<String>,
    graph: &ObjectGraph,
) -> Vec<Object> {
    if excluded.is_empty() {
        return objects;
    }
    let reachable = graph.reachable();
    objects
        .into_iter()
        .filter(|object| {
            let keep =
                !excluded.contains(&object.type_id) || reachable.contains(&object.type_id);
            if !keep {
                debug!(object = %object.name, type_id = %object.type_id, "pruning excluded object");
            }
            keep
        })
        .collect()
}

// ============================================================================
// SECTION: Sorting
// ============================================================================

/// Sorts services and objects by name (stable, ordinal).
pub fn sort_definition(definition: &mut Definition) {
    definition.services.sort_by(|left, right| left.name.cmp(&right.name));
    definition.objects.sort_by(|left, right| left.name.cmp(&right.name));
}

// ============================================================================
// SECTION: Output Injection
// ============================================================================

/// Builds the synthetic field appended to response objects.
#[must_use]
pub fn error_field() -> Field {
    let string = "string".to_string();
    Field {
        name: ERROR_FIELD_NAME.to_string(),
        name_lower_camel: "error".to_string(),
        name_json: "error".to_string(),
        ty: Type {
            type_name: string.clone(),
            object_name: string.clone(),
            clean_object_name: string.clone(),
            underlying_type_name: string.clone(),
            object_name_lower_camel: string.clone(),
            js_type: string.clone(),
            ts_type: string,
            swift_type: "String".to_string(),
            ..Type::default()
        },
        omit_empty: true,
        comment: ERROR_FIELD_COMMENT.to_string(),
        example: Value::String(ERROR_FIELD_EXAMPLE.to_string()),
        ..Field::default()
    }
}

/// Appends one [`error_field`] to each named response object.
///
/// Names with no matching object (for example, pruned ones) are skipped.
pub fn inject_output_fields(definition: &mut Definition, output_objects: &BTreeSet<String>) {
    for name in output_objects {
        match definition.object_mut(name) {
            Ok(object) => object.fields.push(error_field()),
            Err(err) => debug!(object = %name, error = %err, "skipping output field injection"),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
