//! Domain integrity checks
//!
//! Cross-entity validation that the structural schema cannot express:
//! uniqueness of identifiers, existence of referenced identifiers, role
//! coverage across capstones, and prerequisite cycles. Runs only on
//! documents that already passed structural validation (see
//! [`crate::report::validate_roadmap`]), so a malformed document is the
//! caller's bug, not a condition this module reports on — every accessor
//! here degrades to "no finding" rather than panicking.
//!
//! Identifier collection completes before any reference is resolved, so a
//! forward reference to a topic later in the document is valid.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::config::IntegrityConfig;
use crate::validator::ValidationIssue;

/// Minimum fuzzy-match score for a "did you mean" suggestion
const SUGGESTION_SCORE_MIN: i64 = 50;

/// Findings from the integrity pass.
///
/// Duplicate identifiers are hard errors; everything else is advisory.
#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run all integrity checks over a structurally valid document
pub fn check_integrity(document: &Value, config: &IntegrityConfig) -> IntegrityReport {
    let mut report = IntegrityReport::default();
    let matcher = SkimMatcherV2::default();

    // A document without a topics section has nothing to check; an empty
    // capstones array, by contrast, is present and gets role warnings
    let Some(topics) = section_array(document, "topics") else {
        return report;
    };

    // Collect topic ids in document order; repeats are hard errors, the
    // first occurrence is never flagged
    let mut topic_ids: Vec<&str> = Vec::new();
    let mut known: HashSet<&str> = HashSet::new();
    for (index, topic) in topics.iter().enumerate() {
        let Some(id) = entity_id(topic) else { continue };
        if known.insert(id) {
            topic_ids.push(id);
        } else {
            report.errors.push(ValidationIssue::new(
                format!("root.topics[{index}].id"),
                format!("Duplicate topic ID: {id}"),
            ));
        }
    }

    for (index, topic) in topics.iter().enumerate() {
        let path = format!("root.topics[{index}]");
        check_prerequisites(topic, &path, &known, &topic_ids, &matcher, &mut report.warnings);
    }

    if let Some(capstones) = section_array(document, "capstones") {
        for (index, capstone) in capstones.iter().enumerate() {
            let path = format!("root.capstones[{index}]");
            check_prerequisites(
                capstone,
                &path,
                &known,
                &topic_ids,
                &matcher,
                &mut report.warnings,
            );
        }

        let mut known_capstones: HashSet<&str> = HashSet::new();
        for (index, capstone) in capstones.iter().enumerate() {
            let Some(id) = entity_id(capstone) else { continue };
            if !known_capstones.insert(id) {
                report.errors.push(ValidationIssue::new(
                    format!("root.capstones[{index}].id"),
                    format!("Duplicate capstone ID: {id}"),
                ));
            }
        }

        check_role_coverage(capstones, config, &mut report.warnings);
    }

    check_prerequisite_cycles(topics, &known, &mut report.warnings);

    report
}

fn check_prerequisites(
    entity: &Value,
    path: &str,
    known: &HashSet<&str>,
    ordered_ids: &[&str],
    matcher: &SkimMatcherV2,
    warnings: &mut Vec<ValidationIssue>,
) {
    let Some(prerequisites) = entity.get("prerequisites").and_then(Value::as_array) else {
        return;
    };
    for prerequisite in prerequisites {
        let Some(id) = prerequisite.as_str() else {
            continue;
        };
        if !known.contains(id) {
            let mut message = format!("Prerequisite ID \"{id}\" not found in topics");
            if let Some(suggestion) = closest_id(id, ordered_ids, matcher) {
                message.push_str(&format!(" (did you mean \"{suggestion}\"?)"));
            }
            warnings.push(ValidationIssue::new(format!("{path}.prerequisites"), message));
        }
    }
}

/// Best-scoring known id, earliest occurrence winning ties
fn closest_id<'a>(missing: &str, candidates: &[&'a str], matcher: &SkimMatcherV2) -> Option<&'a str> {
    let mut best: Option<(i64, &'a str)> = None;
    for candidate in candidates {
        if let Some(score) = matcher.fuzzy_match(candidate, missing) {
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, *candidate));
            }
        }
    }
    best.filter(|(score, _)| *score >= SUGGESTION_SCORE_MIN)
        .map(|(_, candidate)| candidate)
}

fn check_role_coverage(
    capstones: &[Value],
    config: &IntegrityConfig,
    warnings: &mut Vec<ValidationIssue>,
) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for capstone in capstones {
        if let Some(role) = capstone.get("role").and_then(Value::as_str) {
            *counts.entry(role).or_insert(0) += 1;
        }
    }

    for role in &config.required_roles {
        let found = counts.get(role.as_str()).copied().unwrap_or(0);
        if found < config.min_capstones_per_role {
            warnings.push(ValidationIssue::new(
                "root.capstones",
                format!(
                    "Expected at least {} capstones for role \"{role}\", found {found}",
                    config.min_capstones_per_role
                ),
            ));
        }
    }
}

/// Warn on circular prerequisite chains among topics.
///
/// Self-references are reported per topic; longer cycles are found as
/// strongly connected components of the topic/prerequisite graph and
/// reported once per component, members in document order.
fn check_prerequisite_cycles(
    topics: &[Value],
    known: &HashSet<&str>,
    warnings: &mut Vec<ValidationIssue>,
) {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
    let mut document_order: HashMap<&str, usize> = HashMap::new();

    for (index, topic) in topics.iter().enumerate() {
        let Some(id) = entity_id(topic) else { continue };
        nodes.entry(id).or_insert_with(|| {
            document_order.insert(id, index);
            graph.add_node(id)
        });
    }

    for (index, topic) in topics.iter().enumerate() {
        let Some(id) = entity_id(topic) else { continue };
        let Some(prerequisites) = topic.get("prerequisites").and_then(Value::as_array) else {
            continue;
        };
        for prerequisite in prerequisites {
            let Some(prerequisite) = prerequisite.as_str() else {
                continue;
            };
            if prerequisite == id {
                warnings.push(ValidationIssue::new(
                    format!("root.topics[{index}].prerequisites"),
                    format!("Topic \"{id}\" lists itself as a prerequisite"),
                ));
            } else if known.contains(prerequisite) {
                graph.add_edge(nodes[id], nodes[prerequisite], ());
            }
        }
    }

    let mut cycles: Vec<Vec<&str>> = kosaraju_scc(&graph)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut members: Vec<&str> = component.iter().map(|ni| graph[*ni]).collect();
            members.sort_by_key(|id| document_order[id]);
            members
        })
        .collect();
    cycles.sort_by_key(|members| document_order[members[0]]);

    for members in cycles {
        let listed = members
            .iter()
            .map(|id| format!("\"{id}\""))
            .collect::<Vec<_>>()
            .join(", ");
        warnings.push(ValidationIssue::new(
            "root.topics",
            format!("Prerequisite cycle among topics: {listed}"),
        ));
    }
}

fn section_array<'a>(document: &'a Value, key: &str) -> Option<&'a [Value]> {
    document
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

fn entity_id(entity: &Value) -> Option<&str> {
    entity.get("id").and_then(Value::as_str)
}
