/// Running arithmetic mean that ignores missing values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
    max: Option<f64>,
}

impl MeanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            self.sum += v;
            self.count += 1;
            self.max = Some(self.max.map_or(v, |m| m.max(v)));
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Mean of the observed values; `None` when nothing was observed
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

impl FromIterator<Option<f64>> for MeanAccumulator {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        let mut acc = Self::new();
        for value in iter {
            acc.push(value);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_ignores_missing() {
        let acc: MeanAccumulator = [None, Some(5.0)].into_iter().collect();
        assert_eq!(acc.mean(), Some(5.0));
        assert_eq!(acc.count(), 1);
        assert_eq!(acc.max(), Some(5.0));
    }

    #[test]
    fn test_empty_mean_is_absent() {
        let acc: MeanAccumulator = [None, None].into_iter().collect();
        assert_eq!(acc.mean(), None);
        assert_eq!(acc.max(), None);
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let acc: MeanAccumulator = [Some(f64::NAN), Some(1.0), Some(3.0)].into_iter().collect();
        assert_eq!(acc.mean(), Some(2.0));
    }
}
