//! Core value types shared by grid operations.

use raster_common::Extent;
use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};

/// Top and bottom levels of the vertical layer a grid describes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalInterval {
    top: f32,
    bottom: f32,
}

impl VerticalInterval {
    /// Create an interval; `top` must not lie below `bottom`.
    pub fn new(top: f32, bottom: f32) -> Result<Self> {
        if top.is_nan() || bottom.is_nan() || top < bottom {
            return Err(RasterError::geometry(format!(
                "vertical interval top {} lies below bottom {}",
                top, bottom
            )));
        }
        Ok(Self { top, bottom })
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    /// Thickness of the layer.
    pub fn thickness(&self) -> f32 {
        self.top - self.bottom
    }
}

/// Reduction applied when aggregating fine cells into a coarse cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleUpMethod {
    Minimum,
    Maximum,
    Mean,
    Sum,
    /// Middle element of the sorted values, lower one for even counts.
    Median,
    /// Most frequent value, NoData included; ties go to the smallest value.
    MostOccurring,
    /// Same reduction as `MostOccurring`, for categorical -1/0/1 boundary grids.
    Boundary,
}

impl ScaleUpMethod {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "min" | "minimum" => Some(Self::Minimum),
            "max" | "maximum" => Some(Self::Maximum),
            "mean" | "average" => Some(Self::Mean),
            "sum" => Some(Self::Sum),
            "median" => Some(Self::Median),
            "mode" | "most_occurring" | "mostoccurring" => Some(Self::MostOccurring),
            "boundary" => Some(Self::Boundary),
            _ => None,
        }
    }

    /// Whether NoData cells take part in the reduction.
    pub fn counts_no_data(&self) -> bool {
        matches!(self, Self::MostOccurring | Self::Boundary)
    }
}

impl std::fmt::Display for ScaleUpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimum => write!(f, "minimum"),
            Self::Maximum => write!(f, "maximum"),
            Self::Mean => write!(f, "mean"),
            Self::Sum => write!(f, "sum"),
            Self::Median => write!(f, "median"),
            Self::MostOccurring => write!(f, "most_occurring"),
            Self::Boundary => write!(f, "boundary"),
        }
    }
}

/// Disaggregation applied when splitting a coarse cell into fine cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleDownMethod {
    /// Copy the coarse value into every fine cell.
    #[default]
    Block,
    /// Spread the coarse value evenly over the fine cells.
    Divide,
}

impl ScaleDownMethod {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "block" => Some(Self::Block),
            "divide" => Some(Self::Divide),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScaleDownMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Block => write!(f, "block"),
            Self::Divide => write!(f, "divide"),
        }
    }
}

/// How a [`CellIterator`](crate::CellIterator) reconciles participant extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtentPolicy {
    /// Intersection of all extents.
    Minimum,
    /// Union of all extents.
    #[default]
    Maximum,
    /// Extent of the first grid added.
    First,
}

/// How a [`CellIterator`](crate::CellIterator) reports NoData cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleMode {
    /// NoData cells report the grid's literal NoData value.
    #[default]
    Raw,
    /// NoData cells report `None`, like positions outside the grid.
    NoDataAsUndefined,
}

/// Serialisable summary of a grid's geometry and statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridInfo {
    pub columns: usize,
    pub rows: usize,
    pub cell_size_x: f64,
    pub cell_size_y: f64,
    pub extent: Extent,
    pub no_data: f32,
    pub min: f32,
    pub max: f32,
    pub vertical_interval: Option<VerticalInterval>,
    pub constant: bool,
    pub loaded: bool,
}
