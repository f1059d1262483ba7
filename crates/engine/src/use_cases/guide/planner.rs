//! Ending guide planner.
//!
//! Breadth-first search over `next` edges from the player's scene to the
//! nearest scene of the requested ending category. Flags are ignored: the
//! guide's override makes every edge traversable.

use std::collections::{HashMap, HashSet, VecDeque};

use branchline_domain::{EndingKind, GuidePlan, SceneGraph, SceneId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("No scene matches ending {target}")]
    NoTargets { target: EndingKind },
    #[error("No {target} ending reachable from {from}")]
    Unreachable { from: SceneId, target: EndingKind },
    #[error("Path reconstruction broke at scene {scene}")]
    BrokenPath { scene: SceneId },
}

/// Scenes that count as reaching `kind`.
///
/// 1. The conventional `end_<kind>` scene, if it exists.
/// 2. Otherwise scenes tagged `kind`, or whose id carries one of the
///    ending's naming markers.
/// 3. Otherwise every scene without choices.
pub fn resolve_targets(graph: &SceneGraph, kind: EndingKind) -> HashSet<SceneId> {
    let conventional = kind.conventional_scene_id();
    if let Some(scene) = graph.get_scene(&conventional) {
        return HashSet::from([scene.id().clone()]);
    }

    let tagged: HashSet<SceneId> = graph
        .scenes()
        .filter(|scene| {
            scene.ending() == Some(kind) || kind.matches_scene_id(scene.id().as_str())
        })
        .map(|scene| scene.id().clone())
        .collect();
    if !tagged.is_empty() {
        return tagged;
    }

    graph
        .scenes()
        .filter(|scene| scene.has_no_choices())
        .map(|scene| scene.id().clone())
        .collect()
}

/// Shortest path (by choices taken) from `from` to any target of `kind`.
///
/// Choices are expanded in their declared order, so ties resolve the same
/// way on every call.
pub fn compute_guide_plan(
    graph: &SceneGraph,
    from: &SceneId,
    kind: EndingKind,
) -> Result<GuidePlan, PlanError> {
    let targets = resolve_targets(graph, kind);
    if targets.is_empty() {
        return Err(PlanError::NoTargets { target: kind });
    }

    let mut queue = VecDeque::from([from.clone()]);
    let mut visited = HashSet::from([from.clone()]);
    let mut predecessors: HashMap<SceneId, SceneId> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        if targets.contains(&current) {
            let path = reconstruct_path(&predecessors, from, current)?;
            tracing::debug!(
                from = %from,
                target = %kind,
                edges = path.len().saturating_sub(1),
                visited = visited.len(),
                "Guide path found"
            );
            return GuidePlan::new(kind, path).ok_or_else(|| PlanError::BrokenPath {
                scene: from.clone(),
            });
        }

        let Some(scene) = graph.get_scene(current.as_str()) else {
            continue;
        };
        for next in scene.choices().iter().filter_map(|choice| choice.next()) {
            if visited.insert(next.clone()) {
                predecessors.insert(next.clone(), current.clone());
                queue.push_back(next.clone());
            }
        }
    }

    tracing::debug!(from = %from, target = %kind, visited = visited.len(), "No guide path");
    Err(PlanError::Unreachable {
        from: from.clone(),
        target: kind,
    })
}

fn reconstruct_path(
    predecessors: &HashMap<SceneId, SceneId>,
    from: &SceneId,
    target: SceneId,
) -> Result<Vec<SceneId>, PlanError> {
    let mut path = vec![target];
    // Each scene has one predecessor, so a valid chain is at most this long.
    let limit = predecessors.len() + 1;

    while let Some(last) = path.last() {
        if last == from {
            path.reverse();
            return Ok(path);
        }
        if path.len() > limit {
            break;
        }
        let previous = predecessors
            .get(last)
            .ok_or_else(|| PlanError::BrokenPath { scene: last.clone() })?;
        path.push(previous.clone());
    }

    Err(PlanError::BrokenPath {
        scene: from.clone(),
    })
}
