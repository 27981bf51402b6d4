//! Editable Möbius transformations and their pointer handles.
//!
//! A [`Transformation`] owns its raw parameters and the matrix derived from
//! them. Parameters are only written through [`Transformation::set_parameters`]
//! (or a handle drag), which computes the new matrix first and commits both
//! together, so the matrix can never lag behind the parameters.
//!
//! Handles live in pointer space: a [`Complex`] whose real part is a
//! longitude and whose imaginary part is a latitude, as produced by
//! [`crate::geom::pointer_from_pixel`].

pub mod manager;
pub mod uniforms;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MobiusError, MobiusResult};
use crate::geom::{
    Complex, Sl2c, rotate_around_axis, sphere_point_from_pointer, translate_along_axis, zoom_in,
};

pub use manager::{InteractionState, TransformationManager};
pub use uniforms::{UniformBlock, collect_uniforms, flatten_uniforms};

/// Pick radius in pointer space.
pub const DEFAULT_PICK_RADIUS: f64 = 0.1;
/// Pointer-space distance between a zoom centre and its factor handle for a
/// unit zoom factor.
pub const DEFAULT_ZOOM_HANDLE_DISTANCE: f64 = 0.5;

/// Tunables for selection and handle placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    /// A handle is grabbed when the pointer is strictly closer than this.
    pub pick_radius: f64,
    /// Scale from zoom factor to the offset of the zoom-factor handle.
    pub zoom_handle_distance: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            pick_radius: DEFAULT_PICK_RADIUS,
            zoom_handle_distance: DEFAULT_ZOOM_HANDLE_DISTANCE,
        }
    }
}

impl EngineOptions {
    pub fn validate(self) -> MobiusResult<Self> {
        if !(self.pick_radius.is_finite() && self.pick_radius > 0.0) {
            return Err(MobiusError::InvalidOptions(format!(
                "pick radius must be a positive finite number, got {}",
                self.pick_radius
            )));
        }
        if !(self.zoom_handle_distance.is_finite() && self.zoom_handle_distance > 0.0) {
            return Err(MobiusError::InvalidOptions(format!(
                "zoom handle distance must be a positive finite number, got {}",
                self.zoom_handle_distance
            )));
        }
        Ok(self)
    }
}

/// Stable identifier handed out by the manager at insertion time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
pub struct TransformationId(pub usize);

impl TransformationId {
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }
}

impl From<usize> for TransformationId {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TransformationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransformationKind {
    RotateAroundAxis,
    TranslateAlongAxis,
    ZoomIn,
}

impl TransformationKind {
    pub const ALL: [Self; 3] = [Self::RotateAroundAxis, Self::TranslateAlongAxis, Self::ZoomIn];

    /// Name fragment used in shader uniform names.
    #[must_use]
    pub const fn uniform_name(self) -> &'static str {
        match self {
            Self::RotateAroundAxis => "rotateAroundAxis",
            Self::TranslateAlongAxis => "translateAlongAxis",
            Self::ZoomIn => "zoomIn",
        }
    }

    #[must_use]
    pub const fn handle_count(self) -> usize {
        match self {
            Self::RotateAroundAxis => 1,
            Self::TranslateAlongAxis => 4,
            Self::ZoomIn => 2,
        }
    }
}

impl fmt::Display for TransformationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uniform_name())
    }
}

/// Rotation about the axis through `(lng, lat)` and its antipode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotateAroundAxisParams {
    pub lng: f64,
    pub lat: f64,
    /// Rotation angle in radians.
    pub theta: f64,
}

/// Motion fixing `p` and `q` that carries `r1` onto `r2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranslateAlongAxisParams {
    pub p: Complex,
    pub q: Complex,
    pub r1: Complex,
    pub r2: Complex,
}

/// Complex zoom centred on `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomInParams {
    pub center: Complex,
    pub zoom_factor: Complex,
}

/// The closed set of transformation kinds and their editable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransformationParams {
    RotateAroundAxis(RotateAroundAxisParams),
    TranslateAlongAxis(TranslateAlongAxisParams),
    ZoomIn(ZoomInParams),
}

impl TransformationParams {
    #[must_use]
    pub const fn kind(&self) -> TransformationKind {
        match self {
            Self::RotateAroundAxis(_) => TransformationKind::RotateAroundAxis,
            Self::TranslateAlongAxis(_) => TransformationKind::TranslateAlongAxis,
            Self::ZoomIn(_) => TransformationKind::ZoomIn,
        }
    }

    /// Rejects non-finite parameters.
    pub fn validate(&self) -> MobiusResult<()> {
        match self {
            Self::RotateAroundAxis(params) => {
                MobiusError::check_finite("lng", params.lng)?;
                MobiusError::check_finite("lat", params.lat)?;
                MobiusError::check_finite("theta", params.theta)?;
            }
            Self::TranslateAlongAxis(params) => {
                check_point("p", params.p)?;
                check_point("q", params.q)?;
                check_point("r1", params.r1)?;
                check_point("r2", params.r2)?;
            }
            Self::ZoomIn(params) => {
                check_point("center", params.center)?;
                check_point("zoom_factor", params.zoom_factor)?;
            }
        }
        Ok(())
    }

    /// Derives the matrix from the parameters. Pure: the same parameters
    /// always give the same matrix.
    pub fn compute_matrix(&self) -> MobiusResult<Sl2c> {
        self.validate()?;
        match self {
            Self::RotateAroundAxis(params) => rotate_around_axis(
                sphere_point_from_pointer(Complex::new(params.lng, params.lat)),
                params.theta,
            ),
            Self::TranslateAlongAxis(params) => translate_along_axis(
                sphere_point_from_pointer(params.p),
                sphere_point_from_pointer(params.q),
                sphere_point_from_pointer(params.r1),
                sphere_point_from_pointer(params.r2),
            ),
            Self::ZoomIn(params) => {
                zoom_in(sphere_point_from_pointer(params.center), params.zoom_factor)
            }
        }
    }

    /// Handle positions in pointer space, in handle-index order.
    #[must_use]
    pub fn handles(&self, options: &EngineOptions) -> Vec<Complex> {
        match self {
            Self::RotateAroundAxis(params) => vec![Complex::new(params.lng, params.lat)],
            Self::TranslateAlongAxis(params) => vec![params.p, params.q, params.r1, params.r2],
            Self::ZoomIn(params) => vec![
                params.center,
                params.center + params.zoom_factor.scale(options.zoom_handle_distance),
            ],
        }
    }

    /// Copy of these parameters with `handle` placed at `position`.
    #[must_use]
    pub fn with_handle_at(&self, handle: usize, position: Complex, options: &EngineOptions) -> Self {
        let mut next = *self;
        match &mut next {
            Self::RotateAroundAxis(params) => {
                params.lng = position.re;
                params.lat = position.im;
            }
            Self::TranslateAlongAxis(params) => match handle {
                0 => params.p = position,
                1 => params.q = position,
                2 => params.r1 = position,
                _ => params.r2 = position,
            },
            Self::ZoomIn(params) => {
                if handle == 0 {
                    params.center = position;
                } else {
                    params.zoom_factor =
                        (position - params.center).scale(1.0 / options.zoom_handle_distance);
                }
            }
        }
        next
    }
}

fn check_point(name: &'static str, point: Complex) -> MobiusResult<()> {
    MobiusError::check_finite(name, point.re)?;
    MobiusError::check_finite(name, point.im)?;
    Ok(())
}

/// A grabbed handle: which transformation, which handle, and where the
/// pointer sat relative to the handle when it was picked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionResult {
    pub transformation: TransformationId,
    pub handle: usize,
    /// `pointer − handle` at pick time.
    pub offset: Complex,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    id: TransformationId,
    ordinal: usize,
    params: TransformationParams,
    matrix: Sl2c,
    selected: bool,
}

impl Transformation {
    /// Builds a transformation and computes its matrix eagerly.
    pub fn new(params: TransformationParams) -> MobiusResult<Self> {
        let matrix = params.compute_matrix()?;
        Ok(Self {
            id: TransformationId::default(),
            ordinal: 0,
            params,
            matrix,
            selected: false,
        })
    }

    pub fn rotate_around_axis(lng: f64, lat: f64, theta: f64) -> MobiusResult<Self> {
        Self::new(TransformationParams::RotateAroundAxis(RotateAroundAxisParams {
            lng,
            lat,
            theta,
        }))
    }

    pub fn translate_along_axis(
        p: Complex,
        q: Complex,
        r1: Complex,
        r2: Complex,
    ) -> MobiusResult<Self> {
        Self::new(TransformationParams::TranslateAlongAxis(
            TranslateAlongAxisParams { p, q, r1, r2 },
        ))
    }

    pub fn zoom_in(center: Complex, zoom_factor: Complex) -> MobiusResult<Self> {
        Self::new(TransformationParams::ZoomIn(ZoomInParams {
            center,
            zoom_factor,
        }))
    }

    #[must_use]
    pub const fn id(&self) -> TransformationId {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> TransformationKind {
        self.params.kind()
    }

    /// Position among transformations of the same kind, in insertion order.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[must_use]
    pub const fn params(&self) -> &TransformationParams {
        &self.params
    }

    #[must_use]
    pub const fn matrix(&self) -> Sl2c {
        self.matrix
    }

    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn assign_identity(&mut self, id: TransformationId, ordinal: usize) {
        self.id = id;
        self.ordinal = ordinal;
    }

    /// Replaces the parameters and recomputes the matrix. On error both stay
    /// as they were.
    pub fn set_parameters(&mut self, params: TransformationParams) -> MobiusResult<()> {
        if params.kind() != self.kind() {
            return Err(MobiusError::InvalidOptions(format!(
                "cannot turn {} into {}",
                self.kind(),
                params.kind()
            )));
        }
        let matrix = params.compute_matrix()?;
        self.params = params;
        self.matrix = matrix;
        Ok(())
    }

    /// Recomputes the matrix from the current parameters.
    pub fn update(&mut self) -> MobiusResult<()> {
        self.matrix = self.params.compute_matrix()?;
        Ok(())
    }

    #[must_use]
    pub fn handles(&self, options: &EngineOptions) -> Vec<Complex> {
        self.params.handles(options)
    }

    /// Picks the first handle within the default pick radius.
    #[must_use]
    pub fn select(&self, pointer: Complex) -> Option<SelectionResult> {
        self.select_with(pointer, &EngineOptions::default())
    }

    #[must_use]
    pub fn select_with(&self, pointer: Complex, options: &EngineOptions) -> Option<SelectionResult> {
        self.handles(options)
            .into_iter()
            .enumerate()
            .find(|(_, handle)| Complex::distance(pointer, *handle) < options.pick_radius)
            .map(|(index, handle)| SelectionResult {
                transformation: self.id,
                handle: index,
                offset: pointer - handle,
            })
    }

    /// Drags the selected handle so that it sits at `pointer − offset`.
    pub fn move_selection(&mut self, selection: &SelectionResult, pointer: Complex) -> MobiusResult<()> {
        self.move_selection_with(selection, pointer, &EngineOptions::default())
    }

    pub fn move_selection_with(
        &mut self,
        selection: &SelectionResult,
        pointer: Complex,
        options: &EngineOptions,
    ) -> MobiusResult<()> {
        if selection.transformation != self.id {
            return Err(MobiusError::UnknownTransformation(selection.transformation));
        }
        check_point("pointer", pointer)?;
        let position = pointer - selection.offset;
        let params = self.params.with_handle_at(selection.handle, position, options);
        self.set_parameters(params)
    }

    /// Per-instance uniform values: handle `lng, lat` pairs followed by the
    /// visibility flag.
    #[must_use]
    pub fn uniform_values(&self, options: &EngineOptions) -> Vec<f64> {
        let mut values: Vec<f64> = self
            .handles(options)
            .into_iter()
            .flat_map(Complex::linear_array)
            .collect();
        values.push(if self.selected { 1.0 } else { 0.0 });
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{PI_2, TWO_PI};
    use std::f64::consts::PI;

    #[test]
    fn rotate_handle_picks_with_zero_offset() {
        let rotate = Transformation::rotate_around_axis(1.0, 0.5, 0.3).expect("rotate");

        let hit = rotate.select(Complex::new(1.0, 0.5)).expect("selection");
        assert_eq!(hit.transformation, rotate.id());
        assert_eq!(hit.handle, 0);
        assert_eq!(hit.offset, Complex::ZERO);

        assert!(rotate.select(Complex::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn pick_radius_is_strict() {
        let rotate = Transformation::rotate_around_axis(1.0, 0.5, 0.3).expect("rotate");
        assert!(rotate.select(Complex::new(1.09, 0.5)).is_some());
        assert!(rotate.select(Complex::new(1.1, 0.5)).is_none());
    }

    #[test]
    fn translate_has_four_handles() {
        let translate = Transformation::translate_along_axis(
            Complex::new(PI, 0.3),
            Complex::new(PI, 2.8),
            Complex::new(PI, PI_2),
            Complex::new(PI + 0.4, PI_2),
        )
        .expect("translate");

        let handles = translate.handles(&EngineOptions::default());
        assert_eq!(handles.len(), TransformationKind::TranslateAlongAxis.handle_count());
        let hit = translate
            .select(Complex::new(PI + 0.45, PI_2))
            .expect("r2 handle");
        assert_eq!(hit.handle, 3);
        assert!(hit.offset.approx_eq(Complex::new(0.05, 0.0)));
    }

    #[test]
    fn drag_keeps_pick_offset() {
        let mut rotate = Transformation::rotate_around_axis(1.0, 0.5, 0.3).expect("rotate");
        let hit = rotate.select(Complex::new(1.05, 0.5)).expect("selection");

        rotate
            .move_selection(&hit, Complex::new(2.05, 1.0))
            .expect("move");
        let TransformationParams::RotateAroundAxis(params) = *rotate.params() else {
            panic!("kind changed");
        };
        assert!((params.lng - 2.0).abs() < 1e-12);
        assert!((params.lat - 1.0).abs() < 1e-12);

        let expected = Transformation::rotate_around_axis(2.0, 1.0, 0.3).expect("rotate");
        assert!(rotate.matrix().approx_eq(expected.matrix()));
    }

    #[test]
    fn zoom_factor_handle_edits_factor() {
        let options = EngineOptions::default();
        let mut zoom = Transformation::zoom_in(Complex::new(PI, PI_2), Complex::ONE).expect("zoom");
        let handles = zoom.handles(&options);
        assert!(handles[1].approx_eq(Complex::new(PI + 0.5, PI_2)));

        let hit = zoom.select(handles[1]).expect("factor handle");
        assert_eq!(hit.handle, 1);
        zoom.move_selection(&hit, Complex::new(PI + 1.0, PI_2 + 0.5))
            .expect("move");
        let TransformationParams::ZoomIn(params) = *zoom.params() else {
            panic!("kind changed");
        };
        assert!(params.zoom_factor.approx_eq(Complex::new(2.0, 1.0)));
        assert!(params.center.approx_eq(Complex::new(PI, PI_2)));
    }

    #[test]
    fn refused_edit_keeps_previous_state() {
        let options = EngineOptions::default();
        let mut zoom = Transformation::zoom_in(Complex::new(1.0, 1.0), Complex::ONE).expect("zoom");
        let before = zoom.clone();

        let hit = zoom.select(zoom.handles(&options)[1]).expect("factor handle");
        // dragging the factor handle onto the centre gives a zero zoom factor
        let result = zoom.move_selection(&hit, Complex::new(1.0, 1.0));
        assert!(matches!(result, Err(MobiusError::DegenerateConfiguration(_))));
        assert_eq!(zoom, before);
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        assert!(matches!(
            Transformation::rotate_around_axis(f64::INFINITY, 0.0, 0.0),
            Err(MobiusError::InvalidParameter { name: "lng", .. })
        ));
        assert!(Transformation::zoom_in(Complex::new(0.0, f64::NAN), Complex::ONE).is_err());
    }

    #[test]
    fn set_parameters_refuses_kind_change() {
        let mut rotate = Transformation::rotate_around_axis(1.0, 0.5, 0.3).expect("rotate");
        let zoom = TransformationParams::ZoomIn(ZoomInParams {
            center: Complex::ONE,
            zoom_factor: Complex::ONE,
        });
        assert!(rotate.set_parameters(zoom).is_err());
        assert_eq!(rotate.kind(), TransformationKind::RotateAroundAxis);
    }

    #[test]
    fn uniform_values_end_with_visibility() {
        let mut rotate = Transformation::rotate_around_axis(TWO_PI / 4.0, 0.5, 0.3).expect("rotate");
        let options = EngineOptions::default();
        assert_eq!(rotate.uniform_values(&options), vec![TWO_PI / 4.0, 0.5, 0.0]);
        rotate.set_selected(true);
        assert_eq!(rotate.uniform_values(&options), vec![TWO_PI / 4.0, 0.5, 1.0]);
    }

    #[test]
    fn options_validation() {
        assert!(EngineOptions::default().validate().is_ok());
        let bad = EngineOptions {
            pick_radius: 0.0,
            ..EngineOptions::default()
        };
        assert!(matches!(bad.validate(), Err(MobiusError::InvalidOptions(_))));
    }
}
