//! The result of a fixed-point analysis.

use crate::analysis::Direction;
use crate::il::ProgramPoint;
use crate::Error;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// The converged facts of one analysis over one `ControlFlowGraph`.
///
/// A `FactStore` is only created by the fixed-point driver, once it has
/// converged, and has no mutating methods. Points the analysis never reached
/// hold the top of the analysis lattice, both before and after.
#[derive(Clone, Debug)]
pub struct FactStore<E> {
    direction: Direction,
    points: Vec<ProgramPoint>,
    indices: FxHashMap<ProgramPoint, usize>,
    before: Vec<E>,
    after: Vec<E>,
    visits: Vec<usize>,
}

#[derive(Serialize)]
struct FactEntry<'f, E> {
    point: ProgramPoint,
    before: &'f E,
    after: &'f E,
    visits: usize,
}

#[derive(Serialize)]
struct FactDump<'f, E> {
    direction: Direction,
    facts: Vec<FactEntry<'f, E>>,
}

impl<E> FactStore<E> {
    pub(crate) fn new(
        direction: Direction,
        points: Vec<ProgramPoint>,
        before: Vec<E>,
        after: Vec<E>,
        visits: Vec<usize>,
    ) -> FactStore<E> {
        let indices = points
            .iter()
            .enumerate()
            .map(|(index, point)| (*point, index))
            .collect();
        FactStore {
            direction,
            points,
            indices,
            before,
            after,
            visits,
        }
    }

    fn index(&self, point: ProgramPoint) -> Result<usize, Error> {
        self.indices
            .get(&point)
            .copied()
            .ok_or(Error::ProgramPointNotFound(point))
    }

    /// The fact which holds immediately before `point` executes.
    pub fn fact_before(&self, point: ProgramPoint) -> Result<&E, Error> {
        Ok(&self.before[self.index(point)?])
    }

    /// The fact which holds immediately after `point` executes.
    pub fn fact_after(&self, point: ProgramPoint) -> Result<&E, Error> {
        Ok(&self.after[self.index(point)?])
    }

    /// The number of times the driver applied a transfer function at `point`.
    pub fn visits(&self, point: ProgramPoint) -> Result<usize, Error> {
        Ok(self.visits[self.index(point)?])
    }

    pub fn total_visits(&self) -> usize {
        self.visits.iter().sum()
    }

    /// Returns `true` if the analysis reached `point` from its initial point.
    pub fn is_reachable(&self, point: ProgramPoint) -> Result<bool, Error> {
        Ok(self.visits(point)? > 0)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Every point in this store, ordered by block and then by position.
    pub fn points(&self) -> &[ProgramPoint] {
        &self.points
    }

    /// Iterate over `(point, before, after)` for every point.
    pub fn iter(&self) -> impl Iterator<Item = (ProgramPoint, &E, &E)> {
        self.points
            .iter()
            .zip(self.before.iter().zip(self.after.iter()))
            .map(|(point, (before, after))| (*point, before, after))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<E: Serialize> FactStore<E> {
    /// Dump every fact as JSON, for debugging.
    pub fn to_json(&self) -> Result<String, Error> {
        let facts = self
            .iter()
            .zip(self.visits.iter())
            .map(|((point, before, after), visits)| FactEntry {
                point,
                before,
                after,
                visits: *visits,
            })
            .collect();
        let dump = FactDump {
            direction: self.direction,
            facts,
        };
        Ok(serde_json::to_string_pretty(&dump)?)
    }
}
