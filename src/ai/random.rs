use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 均匀整数采样源，`min` 与 `max` 均包含在内。
pub trait RandomSource {
    fn uniform(&mut self, min: u32, max: u32) -> u32;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn uniform(&mut self, min: u32, max: u32) -> u32 {
        (**self).uniform(min, max)
    }
}

/// 基于 `rand` 的随机源。
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<SmallRng> {
    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    /// 有种子时可复现，否则取系统熵。
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// 按固定顺序循环返回的确定性随机源，供测试与回放使用。
///
/// 取出的值会被夹到请求的区间内，因此同一序列可以同时喂给
/// 猜数（1..=999）与出题（1..=10）两种采样。
///
/// 序列最多循环两遍，再取就 panic：电脑猜数没有迭代上限，
/// 不含秘密数字的序列会让它永远转下去。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSource {
    values: Vec<u32>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// 已经取出的次数。
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn uniform(&mut self, min: u32, max: u32) -> u32 {
        let limit = self.values.len().max(1) * 2;
        assert!(
            self.cursor < limit,
            "sequence of {} values exhausted after {} draws",
            self.values.len(),
            self.cursor
        );
        if self.values.is_empty() {
            self.cursor += 1;
            return min;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(min, max.max(min))
    }
}
