use nalgebra::{DMatrix, DVector, Scalar};

use crate::Real;

/// Local blocks coupling one source element to one target element.
///
/// Rows of `jac_source_target` belong to the source element and its columns to the target
/// element; `jac_target_source` is laid out the other way around.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetBlocks<T: Scalar> {
    region_index: usize,
    res_target: DVector<T>,
    jac_source_target: DMatrix<T>,
    jac_target_source: DMatrix<T>,
    jac_target_target: DMatrix<T>,
}

impl<T: Real> TargetBlocks<T> {
    fn empty() -> Self {
        Self {
            region_index: usize::MAX,
            res_target: DVector::zeros(0),
            jac_source_target: DMatrix::zeros(0, 0),
            jac_target_source: DMatrix::zeros(0, 0),
            jac_target_target: DMatrix::zeros(0, 0),
        }
    }

    fn reset(&mut self, region_index: usize, source_dofs: usize, target_dofs: usize) {
        self.region_index = region_index;
        self.res_target.resize_vertically_mut(target_dofs, T::zero());
        self.jac_source_target
            .resize_mut(source_dofs, target_dofs, T::zero());
        self.jac_target_source
            .resize_mut(target_dofs, source_dofs, T::zero());
        self.jac_target_target
            .resize_mut(target_dofs, target_dofs, T::zero());
        self.res_target.fill(T::zero());
        self.jac_source_target.fill(T::zero());
        self.jac_target_source.fill(T::zero());
        self.jac_target_target.fill(T::zero());
    }

    /// Index of the target element in its region.
    pub fn region_index(&self) -> usize {
        self.region_index
    }

    pub fn res_target(&self) -> &DVector<T> {
        &self.res_target
    }

    pub fn jac_source_target(&self) -> &DMatrix<T> {
        &self.jac_source_target
    }

    pub fn jac_target_source(&self) -> &DMatrix<T> {
        &self.jac_target_source
    }

    pub fn jac_target_target(&self) -> &DMatrix<T> {
        &self.jac_target_target
    }

    pub(crate) fn res_target_mut(&mut self) -> &mut DVector<T> {
        &mut self.res_target
    }

    pub(crate) fn jac_source_target_mut(&mut self) -> &mut DMatrix<T> {
        &mut self.jac_source_target
    }

    pub(crate) fn jac_target_source_mut(&mut self) -> &mut DMatrix<T> {
        &mut self.jac_target_source
    }

    pub(crate) fn jac_target_target_mut(&mut self) -> &mut DMatrix<T> {
        &mut self.jac_target_target
    }
}

/// Local residual and Jacobian blocks produced by assembling a single source element.
///
/// Target blocks are pooled: the matrices of a slot are reused by later source elements, and
/// only targets that actually received a contribution are active.
#[derive(Debug, Clone, PartialEq)]
pub struct NonlocalLocalBlocks<T: Scalar> {
    res_source: DVector<T>,
    jac_source_source: DMatrix<T>,
    targets: Vec<TargetBlocks<T>>,
    num_active: usize,
    // (region index, slot) of each active target, sorted by region index
    slots: Vec<(usize, usize)>,
}

impl<T: Real> Default for NonlocalLocalBlocks<T> {
    fn default() -> Self {
        Self {
            res_source: DVector::zeros(0),
            jac_source_source: DMatrix::zeros(0, 0),
            targets: Vec::new(),
            num_active: 0,
            slots: Vec::new(),
        }
    }
}

impl<T: Real> NonlocalLocalBlocks<T> {
    /// Clears all blocks for a source element with `source_dofs` degrees of freedom.
    pub fn reset(&mut self, source_dofs: usize) {
        self.res_source.resize_vertically_mut(source_dofs, T::zero());
        self.jac_source_source
            .resize_mut(source_dofs, source_dofs, T::zero());
        self.res_source.fill(T::zero());
        self.jac_source_source.fill(T::zero());
        self.num_active = 0;
        self.slots.clear();
    }

    pub fn num_source_dofs(&self) -> usize {
        self.res_source.len()
    }

    pub fn res_source(&self) -> &DVector<T> {
        &self.res_source
    }

    pub fn jac_source_source(&self) -> &DMatrix<T> {
        &self.jac_source_source
    }

    /// Blocks of every target that received a contribution, in order of activation.
    pub fn targets(&self) -> &[TargetBlocks<T>] {
        &self.targets[..self.num_active]
    }

    /// Blocks of region element `region_index`, if it received a contribution.
    pub fn target(&self, region_index: usize) -> Option<&TargetBlocks<T>> {
        self.slots
            .binary_search_by_key(&region_index, |&(j, _)| j)
            .ok()
            .map(|pos| &self.targets[self.slots[pos].1])
    }

    /// Slot of region element `region_index`, activating zeroed blocks on first use.
    pub(crate) fn activate(&mut self, region_index: usize, target_dofs: usize) -> usize {
        let pos = match self.slots.binary_search_by_key(&region_index, |&(j, _)| j) {
            Ok(pos) => return self.slots[pos].1,
            Err(pos) => pos,
        };
        let slot = self.num_active;
        if slot == self.targets.len() {
            self.targets.push(TargetBlocks::empty());
        }
        let source_dofs = self.num_source_dofs();
        self.targets[slot].reset(region_index, source_dofs, target_dofs);
        self.slots.insert(pos, (region_index, slot));
        self.num_active += 1;
        slot
    }

    pub(crate) fn res_source_mut(&mut self) -> &mut DVector<T> {
        &mut self.res_source
    }

    pub(crate) fn jac_source_source_mut(&mut self) -> &mut DMatrix<T> {
        &mut self.jac_source_source
    }

    pub(crate) fn target_mut(&mut self, slot: usize) -> &mut TargetBlocks<T> {
        &mut self.targets[slot]
    }

    pub(crate) fn active_targets_mut(&mut self) -> (&DMatrix<T>, &mut DVector<T>, &mut [TargetBlocks<T>]) {
        (&self.jac_source_source, &mut self.res_source, &mut self.targets[..self.num_active])
    }

    /// An owned copy holding only the active blocks.
    pub fn snapshot(&self) -> Self {
        Self {
            res_source: self.res_source.clone(),
            jac_source_source: self.jac_source_source.clone(),
            targets: self.targets().to_vec(),
            num_active: self.num_active,
            slots: self.slots.clone(),
        }
    }
}
