//! Ordered composition of transformations and the pointer state machine.

use std::collections::BTreeMap;

use super::uniforms::{UniformBlock, collect_uniforms};
use super::{
    EngineOptions, SelectionResult, Transformation, TransformationId, TransformationKind,
    TransformationParams,
};
use crate::error::{MobiusError, MobiusResult};
use crate::geom::{Complex, Sl2c};

/// Where the pointer interaction currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    /// Nothing grabbed.
    #[default]
    Idle,
    /// A handle was picked but has not moved yet.
    Selected(SelectionResult),
    /// The picked handle is following the pointer.
    Dragging(SelectionResult),
}

impl InteractionState {
    #[must_use]
    pub const fn selection(&self) -> Option<&SelectionResult> {
        match self {
            Self::Idle => None,
            Self::Selected(selection) | Self::Dragging(selection) => Some(selection),
        }
    }
}

/// Owns the transformations in composition order and the current selection.
///
/// The net matrix is recomposed after every mutation, so
/// [`TransformationManager::net_matrix`] is always the left-to-right product
/// of the list.
#[derive(Debug, Clone, Default)]
pub struct TransformationManager {
    transformations: Vec<Transformation>,
    next_id: usize,
    ordinals: BTreeMap<TransformationKind, usize>,
    state: InteractionState,
    net_matrix: Sl2c,
    options: EngineOptions,
}

impl TransformationManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> MobiusResult<Self> {
        Ok(Self {
            options: options.validate()?,
            ..Self::default()
        })
    }

    #[must_use]
    pub const fn options(&self) -> &EngineOptions {
        &self.options
    }

    #[must_use]
    pub fn transformations(&self) -> &[Transformation] {
        &self.transformations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: TransformationId) -> Option<&Transformation> {
        self.transformations.iter().find(|t| t.id() == id)
    }

    fn position(&self, id: TransformationId) -> MobiusResult<usize> {
        self.transformations
            .iter()
            .position(|t| t.id() == id)
            .ok_or(MobiusError::UnknownTransformation(id))
    }

    /// Appends a transformation, assigning its id and its ordinal within its
    /// kind, and recomposes.
    pub fn add_transformation(&mut self, mut transformation: Transformation) -> TransformationId {
        let id = TransformationId::new(self.next_id);
        self.next_id += 1;

        let ordinal = self.ordinals.entry(transformation.kind()).or_insert(0);
        transformation.assign_identity(id, *ordinal);
        *ordinal += 1;

        log::debug!(
            "adding {} {} as {}{}",
            transformation.kind(),
            id,
            transformation.kind().uniform_name(),
            transformation.ordinal()
        );

        self.transformations.push(transformation);
        self.recompose();
        id
    }

    /// Builds a transformation from parameters and appends it.
    pub fn add_params(&mut self, params: TransformationParams) -> MobiusResult<TransformationId> {
        let transformation = Transformation::new(params)?;
        Ok(self.add_transformation(transformation))
    }

    /// Removes a transformation. Ordinals of the others are left untouched;
    /// a selection on the removed transformation is dropped.
    pub fn remove_transformation(&mut self, id: TransformationId) -> MobiusResult<Transformation> {
        let index = self.position(id)?;
        let removed = self.transformations.remove(index);
        if self
            .state
            .selection()
            .is_some_and(|selection| selection.transformation == id)
        {
            self.state = InteractionState::Idle;
        }
        log::debug!("removed {} {}", removed.kind(), id);
        self.recompose();
        Ok(removed)
    }

    /// Marks `id` as the one grabbable transformation and hides the rest.
    pub fn set_active(&mut self, id: TransformationId) -> MobiusResult<()> {
        self.position(id)?;
        for transformation in &mut self.transformations {
            transformation.set_selected(transformation.id() == id);
        }
        if self
            .state
            .selection()
            .is_some_and(|selection| selection.transformation != id)
        {
            self.state = InteractionState::Idle;
        }
        Ok(())
    }

    pub fn clear_active(&mut self) {
        for transformation in &mut self.transformations {
            transformation.set_selected(false);
        }
        self.state = InteractionState::Idle;
    }

    #[must_use]
    pub fn active(&self) -> Option<TransformationId> {
        self.transformations
            .iter()
            .find(|t| t.is_selected())
            .map(Transformation::id)
    }

    /// Replaces the parameters of one transformation. A refused edit keeps
    /// the previous parameters and net matrix.
    pub fn set_parameters(
        &mut self,
        id: TransformationId,
        params: TransformationParams,
    ) -> MobiusResult<()> {
        let index = self.position(id)?;
        if let Err(err) = self.transformations[index].set_parameters(params) {
            log::warn!("refused edit of {id}: {err}");
            return Err(err);
        }
        self.recompose();
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> &InteractionState {
        &self.state
    }

    #[must_use]
    pub const fn selection(&self) -> Option<&SelectionResult> {
        self.state.selection()
    }

    /// Picks the first handle under `pointer` among the active
    /// transformations, in list order. A miss clears the selection.
    pub fn select(&mut self, pointer: Complex) -> bool {
        let options = self.options;
        let hit = self
            .transformations
            .iter()
            .filter(|t| t.is_selected())
            .find_map(|t| t.select_with(pointer, &options));

        match hit {
            Some(selection) => {
                log::debug!(
                    "selected handle {} of {}",
                    selection.handle,
                    selection.transformation
                );
                self.state = InteractionState::Selected(selection);
                true
            }
            None => {
                self.state = InteractionState::Idle;
                false
            }
        }
    }

    /// Drags the selected handle to `pointer`.
    ///
    /// Returns `Ok(false)` when nothing is selected. A degenerate edit is
    /// reported and leaves the previous parameters and net matrix in place.
    pub fn move_pointer(&mut self, pointer: Complex) -> MobiusResult<bool> {
        let Some(selection) = self.state.selection().copied() else {
            return Ok(false);
        };
        let index = self.position(selection.transformation)?;
        let options = self.options;
        if let Err(err) =
            self.transformations[index].move_selection_with(&selection, pointer, &options)
        {
            log::warn!("refused drag of {}: {err}", selection.transformation);
            return Err(err);
        }
        self.state = InteractionState::Dragging(selection);
        self.recompose();
        Ok(true)
    }

    /// Ends the current drag or selection.
    pub fn release(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Product of the matrices in list order; identity for an empty list.
    #[must_use]
    pub fn compose_matrix(&self) -> Sl2c {
        self.transformations
            .iter()
            .map(Transformation::matrix)
            .reduce(Sl2c::mult)
            .unwrap_or(Sl2c::IDENTITY)
    }

    fn recompose(&mut self) {
        self.net_matrix = self.compose_matrix();
    }

    #[must_use]
    pub const fn net_matrix(&self) -> Sl2c {
        self.net_matrix
    }

    /// What the renderer uploads: the inverse of the net matrix, flattened.
    #[must_use]
    pub fn net_matrix_for_render(&self) -> [f64; 8] {
        self.net_matrix.inverse().linear_array()
    }

    /// Per-instance uniforms in composition order.
    #[must_use]
    pub fn uniforms(&self) -> Vec<UniformBlock> {
        collect_uniforms(&self.transformations, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{PI_2, PI_4};
    use std::f64::consts::PI;

    fn rotate() -> Transformation {
        Transformation::rotate_around_axis(PI_2, PI_2, PI_2).expect("rotate")
    }

    fn zoom() -> Transformation {
        Transformation::zoom_in(Complex::new(PI, PI_4), Complex::new(2.0, 0.0)).expect("zoom")
    }

    #[test]
    fn empty_manager_is_identity() {
        let manager = TransformationManager::new();
        assert_eq!(manager.net_matrix(), Sl2c::IDENTITY);
        assert_eq!(manager.net_matrix_for_render(), Sl2c::IDENTITY.linear_array());
    }

    #[test]
    fn ordinals_count_per_kind() {
        let mut manager = TransformationManager::new();
        let a = manager.add_transformation(rotate());
        let b = manager.add_transformation(zoom());
        let c = manager.add_transformation(rotate());

        assert_eq!(manager.get(a).map(Transformation::ordinal), Some(0));
        assert_eq!(manager.get(b).map(Transformation::ordinal), Some(0));
        assert_eq!(manager.get(c).map(Transformation::ordinal), Some(1));

        manager.remove_transformation(a).expect("remove");
        let d = manager.add_transformation(rotate());
        assert_eq!(manager.get(d).map(Transformation::ordinal), Some(2));
        assert_ne!(a, d);
    }

    #[test]
    fn select_only_considers_active_transformation() {
        let mut manager = TransformationManager::new();
        let id = manager.add_transformation(rotate());

        assert!(!manager.select(Complex::new(PI_2, PI_2)));
        assert_eq!(*manager.state(), InteractionState::Idle);

        manager.set_active(id).expect("active");
        assert!(manager.select(Complex::new(PI_2, PI_2)));
        assert!(matches!(manager.state(), InteractionState::Selected(_)));
    }

    #[test]
    fn set_active_is_exclusive() {
        let mut manager = TransformationManager::new();
        let a = manager.add_transformation(rotate());
        let b = manager.add_transformation(zoom());

        manager.set_active(a).expect("active a");
        manager.set_active(b).expect("active b");
        assert_eq!(manager.active(), Some(b));
        assert!(!manager.get(a).expect("a").is_selected());

        manager.clear_active();
        assert_eq!(manager.active(), None);
        assert!(manager.set_active(TransformationId::new(99)).is_err());
    }

    #[test]
    fn move_without_selection_is_noop() {
        let mut manager = TransformationManager::new();
        manager.add_transformation(rotate());
        let before = manager.net_matrix();
        assert_eq!(manager.move_pointer(Complex::new(1.0, 1.0)), Ok(false));
        assert_eq!(manager.net_matrix(), before);
    }

    #[test]
    fn drag_lifecycle() {
        let mut manager = TransformationManager::new();
        let id = manager.add_transformation(rotate());
        manager.set_active(id).expect("active");

        assert!(manager.select(Complex::new(PI_2 + 0.02, PI_2)));
        assert_eq!(manager.move_pointer(Complex::new(1.0, 1.2)), Ok(true));
        assert!(matches!(manager.state(), InteractionState::Dragging(_)));

        let expected = Transformation::rotate_around_axis(0.98, 1.2, PI_2).expect("rotate");
        assert!(manager.net_matrix().approx_eq(expected.matrix()));

        manager.release();
        assert_eq!(*manager.state(), InteractionState::Idle);
        assert_eq!(manager.move_pointer(Complex::new(2.0, 2.0)), Ok(false));
    }

    #[test]
    fn removing_selected_transformation_clears_selection() {
        let mut manager = TransformationManager::new();
        let id = manager.add_transformation(rotate());
        manager.set_active(id).expect("active");
        assert!(manager.select(Complex::new(PI_2, PI_2)));

        manager.remove_transformation(id).expect("remove");
        assert_eq!(*manager.state(), InteractionState::Idle);
        assert_eq!(manager.net_matrix(), Sl2c::IDENTITY);
        assert!(matches!(
            manager.remove_transformation(id),
            Err(MobiusError::UnknownTransformation(_))
        ));
    }

    #[test]
    fn refused_set_parameters_keeps_net_matrix() {
        let mut manager = TransformationManager::new();
        let id = manager.add_transformation(zoom());
        let before = manager.net_matrix();

        let params = TransformationParams::ZoomIn(crate::mobius::ZoomInParams {
            center: Complex::new(PI, PI_4),
            zoom_factor: Complex::ZERO,
        });
        assert!(manager.set_parameters(id, params).is_err());
        assert_eq!(manager.net_matrix(), before);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = EngineOptions {
            zoom_handle_distance: f64::NAN,
            ..EngineOptions::default()
        };
        assert!(TransformationManager::with_options(options).is_err());
    }
}
