//! Assembly of the global nonlocal system from local blocks.
use eyre::WrapErr;
use nalgebra::{DVector, DefaultAllocator, Scalar};
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use rayon::prelude::*;
use std::cell::RefCell;
use thread_local::ThreadLocal;

use crate::allocators::DimAllocator;
use crate::assembly::buffers::NonlocalLocalBlocks;
use crate::assembly::local::{NonlocalAssembler, RefinementStatistics};
use crate::element::RefinableElement;
use crate::io::DebugMeshSink;
use crate::mesh::Mesh;
use crate::quadrature::QuadraturePair;
use crate::region::Region;
use crate::settings::NonlocalSettings;
use crate::{Real, SmallDim};

/// Adds the local blocks of one source element to a global COO matrix and residual.
///
/// Target dof indices are looked up with `target_dofs(region_index)`.
pub fn scatter_local_blocks<'a, T, F>(
    coo: &mut CooMatrix<T>,
    residual: &mut DVector<T>,
    source_dofs: &[usize],
    blocks: &NonlocalLocalBlocks<T>,
    target_dofs: F,
) where
    T: Real,
    F: Fn(usize) -> &'a [usize],
{
    assert_eq!(source_dofs.len(), blocks.num_source_dofs(), "Source dof count must match blocks");

    for (i_local, &i) in source_dofs.iter().enumerate() {
        residual[i] += blocks.res_source()[i_local];
        for (k_local, &k) in source_dofs.iter().enumerate() {
            coo.push(i, k, blocks.jac_source_source()[(i_local, k_local)]);
        }
    }

    for target in blocks.targets() {
        let dofs = target_dofs(target.region_index());
        for (b_local, &b) in dofs.iter().enumerate() {
            residual[b] += target.res_target()[b_local];
            for (i_local, &i) in source_dofs.iter().enumerate() {
                coo.push(i, b, target.jac_source_target()[(i_local, b_local)]);
                coo.push(b, i, target.jac_target_source()[(b_local, i_local)]);
            }
            for (c_local, &c) in dofs.iter().enumerate() {
                coo.push(b, c, target.jac_target_target()[(b_local, c_local)]);
            }
        }
    }
}

/// The assembled nonlocal Jacobian and residual `J u + F`.
#[derive(Debug, Clone)]
pub struct NonlocalSystem<T: Scalar> {
    pub jacobian: CsrMatrix<T>,
    pub residual: DVector<T>,
    pub statistics: RefinementStatistics,
}

/// Assembles every element of a mesh as a source against all elements of the same mesh.
#[derive(Debug, Clone)]
pub struct NonlocalSystemAssembler<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    settings: NonlocalSettings<T>,
    quadrature: QuadraturePair<T, D>,
    debug_mesh: Option<DebugMeshSink>,
}

impl<T, D> NonlocalSystemAssembler<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub fn new(settings: NonlocalSettings<T>, quadrature: QuadraturePair<T, D>) -> Self {
        Self {
            settings,
            quadrature,
            debug_mesh: None,
        }
    }

    pub fn with_debug_mesh_sink(self, sink: DebugMeshSink) -> Self {
        Self {
            debug_mesh: Some(sink),
            ..self
        }
    }

    pub fn settings(&self) -> &NonlocalSettings<T> {
        &self.settings
    }

    fn make_local_assembler<E>(&self) -> eyre::Result<NonlocalAssembler<T, D, E>>
    where
        E: RefinableElement<T, D>,
    {
        let assembler = NonlocalAssembler::new(self.settings.clone(), self.quadrature.clone())?;
        Ok(match &self.debug_mesh {
            Some(sink) => assembler.with_debug_mesh_sink(sink.clone()),
            None => assembler,
        })
    }

    fn flush_debug_mesh(&self) -> eyre::Result<()> {
        if let Some(sink) = &self.debug_mesh {
            sink.lock().flush().wrap_err("failed to flush debug mesh")?;
        }
        Ok(())
    }

    /// Assembles the system for the nodal solution `u` on `mesh`.
    pub fn assemble<E>(&self, mesh: &Mesh<T, D, E>, u: &DVector<T>) -> eyre::Result<NonlocalSystem<T>>
    where
        E: RefinableElement<T, D>,
    {
        let region = Region::from_mesh(mesh, u, self.quadrature.clone())?;
        self.assemble_region(&region, mesh.num_vertices())
    }

    /// Assembles the system with every element of `region` acting as a source in turn.
    pub fn assemble_region<E>(&self, region: &Region<T, D, E>, num_dofs: usize) -> eyre::Result<NonlocalSystem<T>>
    where
        E: RefinableElement<T, D>,
    {
        let mut assembler: NonlocalAssembler<T, D, E> = self.make_local_assembler()?;
        let mut coo = CooMatrix::new(num_dofs, num_dofs);
        let mut residual = DVector::zeros(num_dofs);
        let mut statistics = RefinementStatistics::default();

        for source_index in 0..region.len() {
            let source_dofs = region.global_dofs(source_index);
            let blocks = assembler
                .assemble_element(
                    region.element(source_index),
                    source_dofs,
                    region.solution(source_index).as_slice(),
                    region,
                )
                .wrap_err_with(|| format!("failed to assemble source element {source_index}"))?;
            scatter_local_blocks(&mut coo, &mut residual, source_dofs, blocks, |j| region.global_dofs(j));
            statistics += assembler.statistics();
        }
        self.flush_debug_mesh()?;

        log::info!(
            "Assembled nonlocal system with {} dofs from {} source elements: {:?}",
            num_dofs,
            region.len(),
            statistics
        );
        Ok(NonlocalSystem {
            jacobian: CsrMatrix::from(&coo),
            residual,
            statistics,
        })
    }

    /// Parallel version of [`assemble`](Self::assemble).
    pub fn assemble_par<E>(&self, mesh: &Mesh<T, D, E>, u: &DVector<T>) -> eyre::Result<NonlocalSystem<T>>
    where
        E: RefinableElement<T, D>,
        Region<T, D, E>: Sync,
        NonlocalAssembler<T, D, E>: Send,
        Self: Sync,
    {
        let region = Region::from_mesh(mesh, u, self.quadrature.clone())?;
        self.assemble_region_par(&region, mesh.num_vertices())
    }

    /// Parallel version of [`assemble_region`](Self::assemble_region).
    ///
    /// Each worker thread keeps its own local assembler. Local blocks are collected and then
    /// scattered in source element order, so the result equals that of the serial driver.
    pub fn assemble_region_par<E>(
        &self,
        region: &Region<T, D, E>,
        num_dofs: usize,
    ) -> eyre::Result<NonlocalSystem<T>>
    where
        E: RefinableElement<T, D>,
        Region<T, D, E>: Sync,
        NonlocalAssembler<T, D, E>: Send,
        Self: Sync,
    {
        let workspace: ThreadLocal<RefCell<NonlocalAssembler<T, D, E>>> = ThreadLocal::new();

        let contributions = (0..region.len())
            .into_par_iter()
            .map(|source_index| -> eyre::Result<_> {
                let cell = workspace.get_or_try(|| self.make_local_assembler().map(RefCell::new))?;
                let assembler = &mut *cell.borrow_mut();
                let blocks = assembler
                    .assemble_element(
                        region.element(source_index),
                        region.global_dofs(source_index),
                        region.solution(source_index).as_slice(),
                        region,
                    )
                    .wrap_err_with(|| format!("failed to assemble source element {source_index}"))?
                    .snapshot();
                Ok((blocks, assembler.statistics()))
            })
            .collect::<eyre::Result<Vec<_>>>()?;

        let mut coo = CooMatrix::new(num_dofs, num_dofs);
        let mut residual = DVector::zeros(num_dofs);
        let mut statistics = RefinementStatistics::default();
        for (source_index, (blocks, element_statistics)) in contributions.iter().enumerate() {
            let source_dofs = region.global_dofs(source_index);
            scatter_local_blocks(&mut coo, &mut residual, source_dofs, blocks, |j| region.global_dofs(j));
            statistics += *element_statistics;
        }
        self.flush_debug_mesh()?;

        log::info!(
            "Assembled nonlocal system with {} dofs from {} source elements in parallel: {:?}",
            num_dofs,
            region.len(),
            statistics
        );
        Ok(NonlocalSystem {
            jacobian: CsrMatrix::from(&coo),
            residual,
            statistics,
        })
    }
}
