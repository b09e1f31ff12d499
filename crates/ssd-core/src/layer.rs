//! The four-layer structure: Physical → Foundation → Core → Upper.
//!
//! Every quantity that exists "per layer" (weights, local pressures,
//! unresolved-pressure attribution) is a [`LayerVec`], a fixed `[f32; 4]`
//! indexed by [`Layer`].  Keeping it a plain array means per-agent layer
//! state is `Copy` and lives inline in the SoA store.

use std::ops::{Add, AddAssign, Index, IndexMut};

/// One of the four propagation layers, in propagation order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layer {
    /// Bodily constraints and immediate physical contact.
    Physical,
    /// Survival instinct: threat and hunger responses.
    Foundation,
    /// Deliberate action selection.
    Core,
    /// Learning, social meaning, and anticipation.
    Upper,
}

impl Layer {
    /// All layers in propagation order.
    pub const ALL: [Layer; 4] = [Layer::Physical, Layer::Foundation, Layer::Core, Layer::Upper];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Physical   => "physical",
            Layer::Foundation => "foundation",
            Layer::Core       => "core",
            Layer::Upper      => "upper",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value for each of the four layers.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerVec(pub [f32; 4]);

impl LayerVec {
    pub const ZERO: LayerVec = LayerVec([0.0; 4]);

    #[inline]
    pub fn splat(v: f32) -> Self {
        LayerVec([v; 4])
    }

    #[inline]
    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }

    /// Weighted sum `Σ self[l] × weights[l]`.
    #[inline]
    pub fn dot(&self, weights: &LayerVec) -> f32 {
        self.0.iter().zip(weights.0.iter()).map(|(a, b)| a * b).sum()
    }

    #[inline]
    pub fn scale(&self, k: f32) -> LayerVec {
        LayerVec(self.0.map(|v| v * k))
    }

    /// The layer holding the largest strictly positive value.  Ties go to the
    /// earlier layer.  `None` when every entry is ≤ 0 or non-finite.
    pub fn dominant(&self) -> Option<Layer> {
        let mut best: Option<(Layer, f32)> = None;
        for layer in Layer::ALL {
            let v = self[layer];
            if !(v.is_finite() && v > 0.0) {
                continue;
            }
            match best {
                Some((_, b)) if b >= v => {}
                _ => best = Some((layer, v)),
            }
        }
        best.map(|(l, _)| l)
    }

    /// `true` if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl Index<Layer> for LayerVec {
    type Output = f32;
    #[inline]
    fn index(&self, layer: Layer) -> &f32 {
        &self.0[layer.index()]
    }
}

impl IndexMut<Layer> for LayerVec {
    #[inline]
    fn index_mut(&mut self, layer: Layer) -> &mut f32 {
        &mut self.0[layer.index()]
    }
}

impl Add for LayerVec {
    type Output = LayerVec;
    fn add(mut self, rhs: LayerVec) -> LayerVec {
        self += rhs;
        self
    }
}

impl AddAssign for LayerVec {
    fn add_assign(&mut self, rhs: LayerVec) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}
