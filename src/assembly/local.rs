//! Adaptive nonlocal assembly of a single source element against a region of targets.
//!
//! The source element is subdivided depth-first. Each node of the refinement tree is compared
//! with the quadrature points of every nearby target: nodes cut by the smoothed boundary of some
//! neighborhood are refined, nodes entirely outside every neighborhood are skipped and all other
//! nodes are integrated right away. Leaves at `level_max - 1` are always integrated.
use eyre::WrapErr;
use nalgebra::DefaultAllocator;
use nlfem_geometry::AxisAlignedBoundingBox;
use std::ops::{Add, AddAssign};

use crate::allocators::DimAllocator;
use crate::assembly::buffers::NonlocalLocalBlocks;
use crate::element::{volume_form, FiniteElement, RefinableElement, ReferenceFiniteElement};
use crate::error::AssemblyError;
use crate::interaction::{smooth_step, InteractionKernel};
use crate::io::DebugMeshSink;
use crate::quadrature::QuadraturePair;
use crate::refinement::{child_path, RefineElement};
use crate::region::Region;
use crate::settings::NonlocalSettings;
use crate::{Real, SmallDim};

/// Counts of the decisions taken while refining source elements.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RefinementStatistics {
    /// Nodes that were subdivided.
    pub refined: usize,
    /// Nodes integrated at the deepest level.
    pub integrated_leaves: usize,
    /// Nodes integrated above the deepest level because no boundary passes through them.
    pub integrated_coarse: usize,
    /// Nodes outside every neighborhood.
    pub skipped: usize,
}

impl RefinementStatistics {
    pub fn integrated(&self) -> usize {
        self.integrated_leaves + self.integrated_coarse
    }
}

impl Add for RefinementStatistics {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            refined: self.refined + rhs.refined,
            integrated_leaves: self.integrated_leaves + rhs.integrated_leaves,
            integrated_coarse: self.integrated_coarse + rhs.integrated_coarse,
            skipped: self.skipped + rhs.skipped,
        }
    }
}

impl AddAssign for RefinementStatistics {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Position of a sub-element in the refinement tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Frame {
    level: usize,
    sibling: usize,
    path: usize,
}

/// How a node of the refinement tree relates to the neighborhoods of the target points.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeClass {
    /// The smoothed boundary of some neighborhood may pass through the node.
    Interface,
    /// The node lies strictly inside at least one neighborhood and away from every boundary.
    Inside,
    /// The node lies outside every smoothed neighborhood.
    Outside,
}

/// Classifies `element` against the quadrature points of the candidate targets.
///
/// A node is an interface node when a vertex lies in the band `|d| <= eps`, when its vertices
/// lie on both sides of a boundary, or when the centroid is too close to a boundary for the
/// node to be on one side of it. Interface distances are 1-Lipschitz in the center, so the last
/// test covers boundaries that cross the node between its vertices.
pub fn classify_node<T, D, E>(
    element: &E,
    region: &Region<T, D, E>,
    candidates: &[usize],
    kernel: InteractionKernel,
    delta: T,
    eps: T,
) -> NodeClass
where
    T: Real,
    D: SmallDim,
    E: RefinableElement<T, D>,
    DefaultAllocator: DimAllocator<T, D>,
{
    let vertices = element.vertices();
    let centroid = element.centroid();
    let radius = vertices
        .iter()
        .map(|v| (v - &centroid).norm())
        .fold(T::zero(), |a, b| a.max(b));
    let reach = match AxisAlignedBoundingBox::from_points(vertices) {
        Some(bounding_box) => bounding_box.grow_uniformly(delta + eps),
        None => return NodeClass::Outside,
    };

    let mut inside = false;
    for &j in candidates {
        if !reach.intersects(region.bounding_box(j)) {
            continue;
        }
        for y in region.quadrature_points(j) {
            let mut positive = false;
            let mut negative = false;
            for x in vertices {
                let d = kernel.interface_distance(x, y, delta);
                if d.abs() <= eps {
                    return NodeClass::Interface;
                }
                positive |= d > T::zero();
                negative |= d < T::zero();
            }
            if positive && negative {
                return NodeClass::Interface;
            }
            let d_centroid = kernel.interface_distance(&centroid, y, delta);
            if d_centroid.abs() <= eps + radius {
                return NodeClass::Interface;
            }
            inside |= d_centroid > T::zero();
        }
    }

    if inside {
        NodeClass::Inside
    } else {
        NodeClass::Outside
    }
}

/// Assembles the local nonlocal blocks of one source element at a time.
///
/// The assembler owns all of its workspace, including the refinement cache and the reference
/// octree, so it is meant to be reused for many source elements of the same type. Use one
/// assembler per thread.
#[derive(Debug)]
pub struct NonlocalAssembler<T, D, E>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    settings: NonlocalSettings<T>,
    kernel_constant: T,
    refine: RefineElement<T, D, E>,
    blocks: NonlocalLocalBlocks<T>,
    statistics: RefinementStatistics,
    debug_mesh: Option<DebugMeshSink>,
    stack: Vec<Frame>,
    candidates: Vec<usize>,
    target_moment: Vec<T>,
}

impl<T, D, E> NonlocalAssembler<T, D, E>
where
    T: Real,
    D: SmallDim,
    E: RefinableElement<T, D>,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Creates an assembler integrating every sub-element with the given reference rule.
    pub fn new(settings: NonlocalSettings<T>, quadrature: QuadraturePair<T, D>) -> eyre::Result<Self> {
        settings
            .validate()
            .wrap_err("invalid nonlocal assembly settings")?;
        let refine = RefineElement::new(settings.level_max, settings.smoothing_width, quadrature);
        let kernel_constant = settings
            .kernel
            .kernel(settings.kappa, settings.delta, refine.eps());
        Ok(Self {
            settings,
            kernel_constant,
            refine,
            blocks: NonlocalLocalBlocks::default(),
            statistics: RefinementStatistics::default(),
            debug_mesh: None,
            stack: Vec::new(),
            candidates: Vec::new(),
            target_moment: Vec::new(),
        })
    }

    /// Attaches the sink receiving integrated sub-elements when `print_debug_mesh` is set.
    pub fn with_debug_mesh_sink(self, sink: DebugMeshSink) -> Self {
        Self {
            debug_mesh: Some(sink),
            ..self
        }
    }

    pub fn settings(&self) -> &NonlocalSettings<T> {
        &self.settings
    }

    /// The normalization constant `K` at the leaf smoothing width.
    pub fn kernel_constant(&self) -> T {
        self.kernel_constant
    }

    /// Smoothing width used for the truncation and the refinement decisions.
    pub fn eps(&self) -> T {
        self.refine.eps()
    }

    pub fn refinement(&self) -> &RefineElement<T, D, E> {
        &self.refine
    }

    /// Blocks of the most recently assembled source element.
    pub fn blocks(&self) -> &NonlocalLocalBlocks<T> {
        &self.blocks
    }

    /// Statistics of the most recently assembled source element.
    pub fn statistics(&self) -> RefinementStatistics {
        self.statistics
    }

    /// Assembles the residual and Jacobian blocks coupling `source` to every element of
    /// `region`.
    ///
    /// `source_dofs` and `source_solution` hold one entry per node of `source`. The returned
    /// blocks stay valid until the next call.
    pub fn assemble_element(
        &mut self,
        source: &E,
        source_dofs: &[usize],
        source_solution: &[T],
        region: &Region<T, D, E>,
    ) -> eyre::Result<&NonlocalLocalBlocks<T>> {
        let num_nodes = source.num_nodes();
        if source_dofs.len() != num_nodes {
            return Err(AssemblyError::SourceNodeCountMismatch {
                what: "dofs",
                expected: num_nodes,
                actual: source_dofs.len(),
            }
            .into());
        }
        if source_solution.len() != num_nodes {
            return Err(AssemblyError::SourceNodeCountMismatch {
                what: "solution values",
                expected: num_nodes,
                actual: source_solution.len(),
            }
            .into());
        }
        if !(source.diameter() > T::zero()) {
            return Err(AssemblyError::DegenerateSourceElement.into());
        }
        if self.settings.print_debug_mesh {
            if D::dim() != 2 {
                return Err(AssemblyError::UnsupportedDebugMeshDimension { dim: D::dim() }.into());
            }
            if self.debug_mesh.is_none() {
                return Err(AssemblyError::MissingDebugSink.into());
            }
        }

        let delta = self.settings.delta;
        let eps = self.refine.eps();
        let source_box =
            AxisAlignedBoundingBox::from_points(source.vertices()).ok_or(AssemblyError::DegenerateSourceElement)?;

        self.blocks.reset(num_nodes);
        self.statistics = RefinementStatistics::default();
        self.refine.reset(source.clone());
        region.collect_candidates(&source_box, delta + eps, &mut self.candidates);

        self.stack.clear();
        self.stack.push(Frame {
            level: 0,
            sibling: 0,
            path: 0,
        });
        while let Some(frame) = self.stack.pop() {
            let is_leaf = frame.level + 1 >= self.settings.level_max;
            let class = if is_leaf {
                NodeClass::Inside
            } else if frame.level < self.settings.level_min {
                NodeClass::Interface
            } else {
                classify_node(
                    self.refine.element(frame.level, frame.sibling),
                    region,
                    &self.candidates,
                    self.settings.kernel,
                    delta,
                    eps,
                )
            };

            match class {
                NodeClass::Interface => {
                    log::trace!("refining node {frame:?}");
                    self.refine
                        .build_prolongation(frame.level, frame.sibling);
                    self.statistics.refined += 1;
                    let num_children = self.refine.num_children();
                    // Reverse order so that children are visited in ascending order
                    for child in (0..num_children).rev() {
                        self.stack.push(Frame {
                            level: frame.level + 1,
                            sibling: child,
                            path: child_path(frame.path, num_children, child),
                        });
                    }
                }
                NodeClass::Outside => {
                    log::trace!("skipping node {frame:?}");
                    self.statistics.skipped += 1;
                }
                NodeClass::Inside => {
                    self.integrate_node(frame, region)?;
                    if is_leaf {
                        self.statistics.integrated_leaves += 1;
                    } else {
                        self.statistics.integrated_coarse += 1;
                    }
                }
            }
        }

        self.add_forcing(source);
        self.finalize_residual(source_solution, region);

        log::debug!(
            "Assembled source element with {} candidate targets and {} coupled targets: {:?}",
            self.candidates.len(),
            self.blocks.targets().len(),
            self.statistics
        );
        Ok(&self.blocks)
    }

    fn integrate_node(&mut self, frame: Frame, region: &Region<T, D, E>) -> eyre::Result<()> {
        let Self {
            settings,
            kernel_constant,
            refine,
            blocks,
            debug_mesh,
            candidates,
            target_moment,
            ..
        } = self;
        let kernel = settings.kernel;
        let delta = settings.delta;
        let eps = refine.eps();
        let node = refine.node(frame.level, frame.sibling, frame.path);
        let (weights, points) = node.quadrature;
        let Some(target_basis) = region.basis() else {
            return Ok(());
        };

        for (ig, (w, xi)) in weights.iter().zip(points).enumerate() {
            let x1 = node.element.map_reference_coords(xi);
            let w1 = *w * volume_form(&node.element.reference_jacobian(xi));
            let phi1 = node.coarse_basis.at(ig);
            let mut source_sum = T::zero();

            for &j in candidates.iter() {
                if !region.coarse_intersection_test(j, &x1, delta, eps) {
                    continue;
                }
                let target_points = region.quadrature_points(j);
                let target_weights = region.quadrature_weights(j);
                let num_target_dofs = region.dof_count(j);
                let mut slot = None;
                target_moment.clear();
                target_moment.resize(num_target_dofs, T::zero());

                for (q, (y, w2)) in target_points.iter().zip(target_weights).enumerate() {
                    let step = smooth_step(kernel.interface_distance(&x1, y, delta), eps);
                    if !(step > T::zero()) {
                        continue;
                    }
                    let Some(gamma) = kernel.singular_weight((y - &x1).norm()) else {
                        continue;
                    };
                    let c = step * gamma * w1 * *w2 * *kernel_constant;
                    let phi2 = target_basis.at(q);
                    let slot_index = *slot.get_or_insert_with(|| blocks.activate(j, num_target_dofs));

                    let jac_tt = blocks.target_mut(slot_index).jac_target_target_mut();
                    for (a, phi2_a) in phi2.iter().enumerate() {
                        target_moment[a] += c * *phi2_a;
                        for (b, phi2_b) in phi2.iter().enumerate() {
                            jac_tt[(a, b)] -= c * *phi2_a * *phi2_b;
                        }
                    }
                    source_sum += c;
                }

                if let Some(slot) = slot {
                    let target = blocks.target_mut(slot);
                    for (i, phi1_i) in phi1.iter().enumerate() {
                        for (b, m_b) in target_moment.iter().enumerate() {
                            target.jac_source_target_mut()[(i, b)] += *phi1_i * *m_b;
                            target.jac_target_source_mut()[(b, i)] += *m_b * *phi1_i;
                        }
                    }
                }
            }

            let jac_ss = blocks.jac_source_source_mut();
            for (i, phi1_i) in phi1.iter().enumerate() {
                for (k, phi1_k) in phi1.iter().enumerate() {
                    jac_ss[(i, k)] -= source_sum * *phi1_i * *phi1_k;
                }
            }
        }

        if settings.print_debug_mesh {
            if let Some(sink) = debug_mesh {
                sink.lock()
                    .write_polygon(node.element.vertices())
                    .wrap_err("failed to write debug mesh record")?;
            }
        }
        Ok(())
    }

    /// Adds `int f phi_i` over the source element to the source residual.
    fn add_forcing(&mut self, source: &E) {
        let forcing = self.settings.forcing;
        if forcing == T::zero() {
            return;
        }
        let (weights, points) = self.refine.octree().quadrature();
        let basis = self.refine.octree().fine_basis();
        let res_source = self.blocks.res_source_mut();
        for (q, (w, xi)) in weights.iter().zip(points).enumerate() {
            let dx = *w * volume_form(&source.reference_jacobian(xi));
            for (i, phi_i) in basis.at(q).iter().enumerate() {
                res_source[i] += forcing * *phi_i * dx;
            }
        }
    }

    /// Residual blocks `J u + F` from the assembled Jacobian blocks.
    fn finalize_residual(&mut self, source_solution: &[T], region: &Region<T, D, E>) {
        let (jac_source_source, res_source, targets) = self.blocks.active_targets_mut();
        for (i, r) in res_source.iter_mut().enumerate() {
            *r += source_solution
                .iter()
                .enumerate()
                .fold(T::zero(), |acc, (k, u_k)| acc + jac_source_source[(i, k)] * *u_k);
        }

        for target in targets.iter_mut() {
            let target_solution = region.solution(target.region_index());
            let coupled = target.jac_source_target() * target_solution;
            *res_source += coupled;

            let mut res_target = target.jac_target_target() * target_solution;
            for (b, r) in res_target.iter_mut().enumerate() {
                *r += source_solution
                    .iter()
                    .enumerate()
                    .fold(T::zero(), |acc, (i, u_i)| acc + target.jac_target_source()[(b, i)] * *u_i);
            }
            *target.res_target_mut() = res_target;
        }
    }
}
