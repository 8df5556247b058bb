use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// Pixel dimensions of one image variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub width: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub height: i32,
}

impl Dimensions {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Dimensions{{width: {}, height: {}}}", self.width, self.height)
    }
}

/// Generated variants of an image: the original plus optional breakpoints.
///
/// Two size maps are equal when every breakpoint is either absent on both
/// sides or present with equal dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeMap {
    pub original: Dimensions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xs: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xl: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xxl: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xxxl: Option<Dimensions>,
}

impl SizeMap {
    pub fn new(original: Dimensions) -> Self {
        Self {
            original,
            ..Default::default()
        }
    }

    /// Original first, then each present breakpoint from `xs` up to `xxxl`.
    pub fn all_dimensions(&self) -> Vec<Dimensions> {
        let breakpoints = [self.xs, self.s, self.m, self.l, self.xl, self.xxl, self.xxxl];
        std::iter::once(self.original)
            .chain(breakpoints.into_iter().flatten())
            .collect()
    }
}

fn fmt_optional(dimensions: &Option<Dimensions>) -> String {
    match dimensions {
        Some(d) => d.to_string(),
        None => "nil".to_string(),
    }
}

impl Display for SizeMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "SizeMap{{original: {}, xs: {}, s: {}, m: {}, l: {}, xl: {}, xxl: {}, xxxl: {}}}",
            self.original,
            fmt_optional(&self.xs),
            fmt_optional(&self.s),
            fmt_optional(&self.m),
            fmt_optional(&self.l),
            fmt_optional(&self.xl),
            fmt_optional(&self.xxl),
            fmt_optional(&self.xxxl),
        )
    }
}
