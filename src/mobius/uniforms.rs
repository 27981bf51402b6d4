//! Per-instance shader uniforms.
//!
//! Each transformation contributes one block named after its kind and its
//! ordinal within that kind (`u_zoomIn0`, `u_rotateAroundAxis1`, ...). Blocks
//! are emitted in composition order and the flattened value list keeps that
//! order; the renderer relies on it.

use serde::Serialize;

use super::{EngineOptions, Transformation, TransformationKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformBlock {
    pub name: String,
    #[serde(skip)]
    pub kind: TransformationKind,
    pub ordinal: usize,
    pub values: Vec<f64>,
}

impl UniformBlock {
    #[must_use]
    pub fn for_transformation(transformation: &Transformation, options: &EngineOptions) -> Self {
        let kind = transformation.kind();
        Self {
            name: uniform_name(kind, transformation.ordinal()),
            kind,
            ordinal: transformation.ordinal(),
            values: transformation.uniform_values(options),
        }
    }
}

#[must_use]
pub fn uniform_name(kind: TransformationKind, ordinal: usize) -> String {
    format!("u_{}{ordinal}", kind.uniform_name())
}

#[must_use]
pub fn collect_uniforms(
    transformations: &[Transformation],
    options: &EngineOptions,
) -> Vec<UniformBlock> {
    transformations
        .iter()
        .map(|t| UniformBlock::for_transformation(t, options))
        .collect()
}

/// All block values back to back.
#[must_use]
pub fn flatten_uniforms(blocks: &[UniformBlock]) -> Vec<f64> {
    blocks
        .iter()
        .flat_map(|block| block.values.iter().copied())
        .collect()
}
