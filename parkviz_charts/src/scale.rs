// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale utilities.
//!
//! Each visual channel gets one scale. Continuous domains use [`ScaleLinear`] or [`ScaleTime`],
//! categorical domains use [`ScaleBand`] or [`ScalePoint`] over an [`OrdinalDomain`], and color
//! channels use [`ScaleQuantize`] (continuous to a fixed palette) or [`ScaleOrdinal`].

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use peniko::Color;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::time;

/// A scale specification (domain + options, no range yet).
#[derive(Clone, Copy, Debug)]
pub enum ScaleSpec {
    /// Continuous linear scale.
    Linear(ScaleLinearSpec),
    /// Continuous time scale (seconds since the Unix epoch).
    Time(ScaleTimeSpec),
    /// Discrete point scale.
    Point(ScalePointSpec),
    /// Discrete band scale.
    Band(ScaleBandSpec),
}

impl From<ScaleLinearSpec> for ScaleSpec {
    fn from(value: ScaleLinearSpec) -> Self {
        Self::Linear(value)
    }
}

impl From<ScaleTimeSpec> for ScaleSpec {
    fn from(value: ScaleTimeSpec) -> Self {
        Self::Time(value)
    }
}

impl From<ScalePointSpec> for ScaleSpec {
    fn from(value: ScalePointSpec) -> Self {
        Self::Point(value)
    }
}

impl From<ScaleBandSpec> for ScaleSpec {
    fn from(value: ScaleBandSpec) -> Self {
        Self::Band(value)
    }
}

/// A continuous scale instance.
#[derive(Clone, Copy, Debug)]
pub enum ScaleContinuous {
    /// Linear scale.
    Linear(ScaleLinear),
    /// Time scale.
    Time(ScaleTime),
}

impl ScaleContinuous {
    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        match self {
            Self::Linear(s) => s.map(x),
            Self::Time(s) => s.map(x),
        }
    }

    /// Returns tick values.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self {
            Self::Linear(s) => s.ticks(count),
            Self::Time(s) => s.ticks(count),
        }
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain(),
            Self::Time(s) => s.domain(),
        }
    }
}

impl From<ScaleLinear> for ScaleContinuous {
    fn from(value: ScaleLinear) -> Self {
        Self::Linear(value)
    }
}

impl From<ScaleTime> for ScaleContinuous {
    fn from(value: ScaleTime) -> Self {
        Self::Time(value)
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

/// Specification for a linear scale (domain + options, no range yet).
#[derive(Clone, Copy, Debug)]
pub struct ScaleLinearSpec {
    /// Domain in data units.
    pub domain: (f64, f64),
    /// Whether to "nice" the domain outward to round tick values.
    pub nice: bool,
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a value from range space back into domain space.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        d0 + (y - r0) / denom * (d1 - d0)
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns “nice-ish” tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        nice_ticks(lo, hi, count)
            .into_iter()
            .filter(|t| *t >= lo - 1e-9 * (hi - lo).abs() && *t <= hi + 1e-9 * (hi - lo).abs())
            .collect()
    }
}

impl ScaleLinearSpec {
    /// Creates a new linear scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            nice: false,
        }
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Returns the effective domain after applying `nice` (if enabled).
    ///
    /// Nicing extends each endpoint outward to a multiple of the tick step.
    pub fn resolved_domain(&self, tick_count: usize) -> (f64, f64) {
        if !self.nice {
            return self.domain;
        }
        let (d0, d1) = self.domain;
        let reversed = d0 > d1;
        let (lo, hi) = ordered(self.domain);
        let step = nice_step((hi - lo) / tick_count.max(1) as f64);
        if step == 0.0 {
            return self.domain;
        }
        let lo = (lo / step).floor() * step;
        let hi = (hi / step).ceil() * step;
        if reversed { (hi, lo) } else { (lo, hi) }
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleLinear {
        ScaleLinear::new(self.domain, range)
    }

    /// Instantiates a concrete scale using the `resolved_domain` (respecting `nice`).
    pub fn instantiate_resolved(&self, range: (f64, f64), tick_count: usize) -> ScaleLinear {
        ScaleLinear::new(self.resolved_domain(tick_count), range)
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

pub(crate) fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    let (min, max) = ordered((min, max));
    let span = max - min;
    let step = nice_step(span / count.max(1) as f64);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let start = (min / step).ceil();
    let stop = (max / step).floor();
    let n_f = (stop - start).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    // Multiplying integers by the step keeps values like 0.3 exact-ish.
    (0..=n).map(|i| (start + i as f64) * step).collect()
}

pub(crate) fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "power of ten of a finite f64 fits in i32"
    )]
    let base = 10_f64.powi(power as i32);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// Sanitizes a data-driven continuous domain.
///
/// Each endpoint that is missing, non-finite, or zero is replaced by the corresponding endpoint
/// of `bounds` (the nearest known boundary, typically the full dataset's extent). If the result
/// still has zero width it is widened by one unit so the mapping never collapses.
pub fn sanitize_domain(d0: Option<f64>, d1: Option<f64>, bounds: (f64, f64)) -> (f64, f64) {
    let pick = |v: Option<f64>, bound: f64| match v {
        Some(v) if v.is_finite() && v != 0.0 => v,
        _ if bound.is_finite() => bound,
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    };
    let lo = pick(d0, bounds.0);
    let mut hi = pick(d1, bounds.1);
    if hi == lo {
        hi = lo + 1.0;
    }
    (lo, hi)
}

/// Ordered distinct category labels.
///
/// Label order is insertion order; duplicates are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrdinalDomain {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl OrdinalDomain {
    /// Creates an empty domain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a label if not already present.
    pub fn push(&mut self, label: impl Into<String>) {
        let label = label.into();
        if self.index.contains_key(&label) {
            return;
        }
        self.index.insert(label.clone(), self.labels.len());
        self.labels.push(label);
    }

    /// Returns the position of a label.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Returns the label at `index`.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Returns all labels in order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` when the domain has no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for OrdinalDomain {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut out = Self::new();
        for label in iter {
            out.push(label);
        }
        out
    }
}

/// A discrete band scale for categorical charts.
#[derive(Clone, Copy, Debug)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

/// Specification for a band scale (count + padding, no range yet).
#[derive(Clone, Copy, Debug)]
pub struct ScaleBandSpec {
    /// Number of bands.
    pub count: usize,
    /// Inner padding in band units.
    pub padding_inner: f64,
    /// Outer padding in band units.
    pub padding_outer: f64,
}

impl ScaleBand {
    /// Creates a new band scale covering `count` bands over `range`.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        if n <= 0.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = n - self.padding_inner + 2.0 * self.padding_outer;
        if denom <= 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the start position of the band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let step = self.step();
        let start = if r1 >= r0 { r0 } else { r1 };
        start + step * self.padding_outer + step * index as f64
    }

    /// Returns the center position of the band at `index`.
    pub fn center(&self, index: usize) -> f64 {
        self.x(index) + 0.5 * self.band_width()
    }
}

impl ScaleBandSpec {
    /// Creates a new band scale spec with default padding.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Sets inner and outer padding to the same value.
    pub fn with_uniform_padding(self, padding: f64) -> Self {
        self.with_padding(padding, padding)
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleBand {
        ScaleBand::new(range, self.count).with_padding(self.padding_inner, self.padding_outer)
    }
}

/// A discrete point scale (like band without width).
#[derive(Clone, Copy, Debug)]
pub struct ScalePoint {
    range: (f64, f64),
    count: usize,
    padding: f64,
}

/// Specification for a point scale (count + padding, no range yet).
#[derive(Clone, Copy, Debug)]
pub struct ScalePointSpec {
    /// Number of points.
    pub count: usize,
    /// Outer padding in point steps.
    pub padding: f64,
}

impl ScalePoint {
    /// Creates a new point scale.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding: 0.5,
        }
    }

    /// Sets the outer padding in point steps.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Returns the distance between adjacent points.
    pub fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        if n <= 0.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = (n - 1.0) + 2.0 * self.padding;
        if denom <= 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the number of points.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the position of the point at `index`.
    ///
    /// A single point without padding sits at the middle of the range.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let start = if r1 >= r0 { r0 } else { r1 };
        let step = self.step();
        if step == 0.0 {
            return 0.5 * (r0 + r1);
        }
        start + self.padding * step + step * index as f64
    }
}

impl ScalePointSpec {
    /// Creates a new point scale spec.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            padding: 0.5,
        }
    }

    /// Sets the outer padding in point steps.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScalePoint {
        ScalePoint::new(range, self.count).with_padding(self.padding)
    }
}

/// A time scale: a linear scale over seconds since the Unix epoch with calendar-aware ticks.
#[derive(Clone, Copy, Debug)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

/// Specification for a time scale (domain, no range yet).
#[derive(Clone, Copy, Debug)]
pub struct ScaleTimeSpec {
    /// Domain in seconds since the Unix epoch.
    pub domain: (f64, f64),
    /// Whether to extend the domain outward to tick boundaries.
    pub nice: bool,
}

impl ScaleTime {
    /// Creates a new time scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
        }
    }

    /// Maps a timestamp into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// Returns tick timestamps within the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.inner.domain());
        time::nice_time_ticks_seconds(lo, hi, count)
            .into_iter()
            .filter(|t| *t >= lo && *t <= hi)
            .collect()
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain()
    }
}

impl ScaleTimeSpec {
    /// Creates a new time scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            nice: false,
        }
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Returns the effective domain after applying `nice` (if enabled).
    pub fn resolved_domain(&self, tick_count: usize) -> (f64, f64) {
        if !self.nice {
            return self.domain;
        }
        let (lo, hi) = ordered(self.domain);
        let step = time::nice_time_step_seconds((hi - lo) / tick_count.max(1) as f64);
        if step == 0.0 {
            return self.domain;
        }
        ((lo / step).floor() * step, (hi / step).ceil() * step)
    }

    /// Instantiates a concrete scale using the `resolved_domain` (respecting `nice`).
    pub fn instantiate_resolved(&self, range: (f64, f64), tick_count: usize) -> ScaleTime {
        ScaleTime::new(self.resolved_domain(tick_count), range)
    }
}

/// A continuous-domain scale producing one of a fixed set of colors.
///
/// The domain `[d0, d1]` is cut into `N` equal-width buckets, one per palette entry. Values below
/// `d0` map to the first bucket, values at or above `d1` to the last.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleQuantize {
    domain: (f64, f64),
    colors: Vec<Color>,
}

impl ScaleQuantize {
    /// Creates a quantize scale. An empty palette produces a scale that maps nothing.
    pub fn new(domain: (f64, f64), colors: impl Into<Vec<Color>>) -> Self {
        Self {
            domain: ordered(domain),
            colors: colors.into(),
        }
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the palette.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Returns the `N - 1` interior bucket boundaries.
    pub fn thresholds(&self) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let n = self.colors.len();
        (1..n)
            .map(|i| d0 + (d1 - d0) * i as f64 / n as f64)
            .collect()
    }

    /// Returns the bucket index for `x`, or `None` for non-finite input or an empty palette.
    pub fn bucket(&self, x: f64) -> Option<usize> {
        if !x.is_finite() || self.colors.is_empty() {
            return None;
        }
        Some(self.thresholds().iter().filter(|t| x >= **t).count())
    }

    /// Returns the color for `x`.
    pub fn map(&self, x: f64) -> Option<Color> {
        self.bucket(x).map(|i| self.colors[i])
    }

    /// Returns the `[lo, hi)` domain extent that maps to the bucket at `index`.
    pub fn invert_extent(&self, index: usize) -> Option<(f64, f64)> {
        let n = self.colors.len();
        if index >= n {
            return None;
        }
        let t = self.thresholds();
        let lo = if index == 0 { self.domain.0 } else { t[index - 1] };
        let hi = if index + 1 == n { self.domain.1 } else { t[index] };
        Some((lo, hi))
    }
}

/// A position scale for one channel, as used by the mark generators.
///
/// Continuous channels read numeric columns; point and band channels read text columns and look
/// labels up in their [`OrdinalDomain`].
#[derive(Clone, Debug)]
pub enum PositionScale {
    /// Numeric or time values.
    Continuous(ScaleContinuous),
    /// Category labels at evenly spaced points.
    Point(ScalePoint, OrdinalDomain),
    /// Category labels at band centers.
    Band(ScaleBand, OrdinalDomain),
}

impl PositionScale {
    /// Returns `true` if this channel reads category labels.
    pub fn is_ordinal(&self) -> bool {
        !matches!(self, Self::Continuous(_))
    }

    /// Maps a numeric value. Ordinal scales treat `v` as a category index.
    pub fn map_number(&self, v: f64) -> f64 {
        match self {
            Self::Continuous(s) => s.map(v),
            Self::Point(s, _) => s.x(discrete_index(v)),
            Self::Band(s, _) => s.center(discrete_index(v)),
        }
    }

    /// Maps a category label; `None` for labels outside the domain or continuous scales.
    pub fn map_label(&self, label: &str) -> Option<f64> {
        match self {
            Self::Continuous(_) => None,
            Self::Point(s, d) => d.index_of(label).map(|i| s.x(i)),
            Self::Band(s, d) => d.index_of(label).map(|i| s.center(i)),
        }
    }
}

pub(crate) fn discrete_index(v: f64) -> usize {
    if !v.is_finite() || v < 0.0 {
        return 0;
    }
    let v = v.round().min(10_000.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value is clamped to a small non-negative range"
    )]
    {
        v as usize
    }
}

/// A categorical color scale; palette entries are assigned in domain order and cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleOrdinal {
    domain: OrdinalDomain,
    colors: Vec<Color>,
}

impl ScaleOrdinal {
    /// Creates an ordinal scale.
    pub fn new(domain: OrdinalDomain, colors: impl Into<Vec<Color>>) -> Self {
        Self {
            domain,
            colors: colors.into(),
        }
    }

    /// Returns the color for a label, or `None` for labels outside the domain.
    pub fn map(&self, label: &str) -> Option<Color> {
        if self.colors.is_empty() {
            return None;
        }
        let i = self.domain.index_of(label)?;
        Some(self.colors[i % self.colors.len()])
    }

    /// Returns the domain.
    pub fn domain(&self) -> &OrdinalDomain {
        &self.domain
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn point_scale_positions_are_monotonic() {
        let scale = ScalePoint::new((0.0, 100.0), 5);
        let a = scale.x(0);
        let b = scale.x(1);
        let c = scale.x(2);
        assert!(a < b, "points increase");
        assert!(b < c, "points increase");
        assert_eq!(scale.x(0), 10.0);
        assert_eq!(scale.x(4), 90.0);
    }

    #[test]
    fn band_scale_matches_padded_layout() {
        // 4 bands, padding 0.2: step = 100 / (4 - 0.2 + 0.4) = 23.809...
        let band = ScaleBandSpec::new(4)
            .with_uniform_padding(0.2)
            .instantiate((0.0, 100.0));
        let step = 100.0 / 4.2;
        assert!((band.band_width() - 0.8 * step).abs() < 1e-9);
        assert!((band.x(0) - 0.2 * step).abs() < 1e-9);
        let last_end = band.x(3) + band.band_width();
        assert!((last_end - (100.0 - 0.2 * step)).abs() < 1e-9, "outer padding is symmetric");
    }

    #[test]
    fn nice_extends_domain_outward() {
        let spec = ScaleLinearSpec::new((0.0, 4.37)).with_nice(true);
        assert_eq!(spec.resolved_domain(10), (0.0, 4.5));
        let ticks = spec.instantiate_resolved((0.0, 1.0), 10).ticks(10);
        assert_eq!(ticks.first().copied(), Some(0.0));
        assert!((ticks.last().copied().unwrap() - 4.5).abs() < 1e-9);
    }

    #[test]
    fn linear_invert_round_trips() {
        let s = ScaleLinear::new((0.0, 10.0), (400.0, 0.0));
        assert_eq!(s.map(2.5), 300.0);
        assert_eq!(s.invert(300.0), 2.5);
    }

    #[test]
    fn quantize_two_buckets_split_at_midpoint() {
        let q = ScaleQuantize::new((0.0, 4.0), vec![css::WHITE, css::BLACK]);
        assert_eq!(q.thresholds(), vec![2.0]);
        assert_eq!(q.map(1.0), Some(css::WHITE));
        assert_eq!(q.map(4.0), Some(css::BLACK));
        assert_eq!(q.map(f64::NAN), None);
    }

    #[test]
    fn quantize_buckets_are_contiguous_and_cover_domain() {
        let q = ScaleQuantize::new((0.0, 7.0), crate::palette::BLUES_7.to_vec());
        let mut prev_hi = 0.0;
        for i in 0..7 {
            let (lo, hi) = q.invert_extent(i).unwrap();
            assert_eq!(lo, prev_hi, "bucket {i} starts where the previous ended");
            assert!(hi > lo, "bucket {i} is non-empty");
            prev_hi = hi;
            assert_eq!(q.bucket(lo), Some(i));
        }
        assert_eq!(prev_hi, 7.0);
        assert_eq!(q.invert_extent(7), None);
    }

    #[test]
    fn sanitize_replaces_missing_and_zero_endpoints() {
        assert_eq!(sanitize_domain(None, Some(5.0), (1.0, 9.0)), (1.0, 5.0));
        assert_eq!(sanitize_domain(Some(2.0), Some(0.0), (1.0, 9.0)), (2.0, 9.0));
        assert_eq!(sanitize_domain(Some(f64::NAN), None, (1.0, 9.0)), (1.0, 9.0));
        assert_eq!(sanitize_domain(Some(3.0), Some(3.0), (3.0, 3.0)), (3.0, 4.0));
    }

    #[test]
    fn ordinal_cycles_palette() {
        let domain: OrdinalDomain = ["a", "b", "c"].into_iter().collect();
        let s = ScaleOrdinal::new(domain, vec![css::RED, css::BLUE]);
        assert_eq!(s.map("a"), Some(css::RED));
        assert_eq!(s.map("c"), Some(css::RED));
        assert_eq!(s.map("zzz"), None);
    }
}
