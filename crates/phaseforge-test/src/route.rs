//! List variable test fixtures.
//!
//! Vehicles visit locations on a line, starting and ending at the depot at
//! position 0. The `visits` list variable holds location indices in visiting
//! order. The score is the negated total travel distance.

use phaseforge_core::{
    EntityDescriptor, GenuineVariableDescriptor, PlanningSolution, ProblemFactDescriptor,
    SimpleScore, SolutionDescriptor,
};
use phaseforge_scoring::{EasyScoreCalculator, TypedScoreDirector};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub id: usize,
    pub visits: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouteSolution {
    pub routes: Vec<Route>,
    /// Position of each location on the line.
    pub locations: Vec<i64>,
    pub score: Option<SimpleScore>,
}

impl RouteSolution {
    pub fn new(locations: Vec<i64>, visits: Vec<Vec<usize>>) -> Self {
        Self {
            routes: visits
                .into_iter()
                .enumerate()
                .map(|(id, visits)| Route { id, visits })
                .collect(),
            locations,
            score: None,
        }
    }

    pub fn visits(&self) -> Vec<Vec<usize>> {
        self.routes.iter().map(|r| r.visits.clone()).collect()
    }
}

impl PlanningSolution for RouteSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

pub fn route_count(s: &RouteSolution) -> usize {
    s.routes.len()
}

pub fn location_count(s: &RouteSolution) -> usize {
    s.locations.len()
}

/// Every location index; the elements the `visits` lists draw from.
pub fn location_values(s: &RouteSolution) -> Vec<usize> {
    (0..s.locations.len()).collect()
}

pub fn visits_len(s: &RouteSolution, entity: usize) -> usize {
    s.routes.get(entity).map_or(0, |r| r.visits.len())
}

pub fn visits_get(s: &RouteSolution, entity: usize, pos: usize) -> Option<usize> {
    s.routes.get(entity).and_then(|r| r.visits.get(pos).copied())
}

pub fn visits_set(s: &mut RouteSolution, entity: usize, pos: usize, v: usize) {
    if let Some(slot) = s.routes.get_mut(entity).and_then(|r| r.visits.get_mut(pos)) {
        *slot = v;
    }
}

pub fn visits_remove(s: &mut RouteSolution, entity: usize, pos: usize) -> Option<usize> {
    let route = s.routes.get_mut(entity)?;
    (pos < route.visits.len()).then(|| route.visits.remove(pos))
}

pub fn visits_insert(s: &mut RouteSolution, entity: usize, pos: usize, v: usize) {
    if let Some(route) = s.routes.get_mut(entity) {
        let pos = pos.min(route.visits.len());
        route.visits.insert(pos, v);
    }
}

/// Reverses `visits[start..end]` in place.
pub fn visits_reverse(s: &mut RouteSolution, entity: usize, start: usize, end: usize) {
    if let Some(route) = s.routes.get_mut(entity) {
        let end = end.min(route.visits.len());
        if start < end {
            route.visits[start..end].reverse();
        }
    }
}

pub fn route_distance(s: &RouteSolution, route: &Route) -> i64 {
    let mut position = 0i64;
    let mut distance = 0i64;
    for &visit in &route.visits {
        let next = s.locations.get(visit).copied().unwrap_or(0);
        distance += (next - position).abs();
        position = next;
    }
    distance + position.abs()
}

pub fn calculate_route_score(s: &RouteSolution) -> SimpleScore {
    SimpleScore::of(-s.routes.iter().map(|r| route_distance(s, r)).sum::<i64>())
}

pub fn create_route_descriptor() -> SolutionDescriptor<RouteSolution> {
    SolutionDescriptor::new("RouteSolution")
        .with_entity(
            EntityDescriptor::new("Route", route_count)
                .with_genuine_variable(GenuineVariableDescriptor::list("visits")),
        )
        .with_problem_fact(ProblemFactDescriptor::new("Location", location_count))
}

pub type RouteCalculator = EasyScoreCalculator<fn(&RouteSolution) -> SimpleScore>;

pub type RouteDirector = TypedScoreDirector<RouteSolution, RouteCalculator>;

pub fn create_route_director(locations: Vec<i64>, visits: Vec<Vec<usize>>) -> RouteDirector {
    TypedScoreDirector::new(
        RouteSolution::new(locations, visits),
        create_route_descriptor(),
        EasyScoreCalculator::new(calculate_route_score as fn(&RouteSolution) -> SimpleScore),
    )
}
