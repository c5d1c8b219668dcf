/// Right-open stepped samples `start, start + step, ...` strictly below `stop`, the way
/// numpy.arange lays them out.
pub struct Arange {
    start: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Arange {
    /// `step` must be positive; an empty or inverted interval yields no samples.
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        let len = if stop > start && step > 0. {
            // ceil mirrors numpy's sample count. A float quotient that lands a hair
            // above an integer would add a sample at `stop`, so guard the last one.
            let n = ((stop - start) / step).ceil() as usize;
            if n > 0 && start + step * (n - 1) as f64 >= stop {
                n - 1
            } else {
                n
            }
        } else {
            0
        };

        Arange {
            start,
            step,
            index: 0,
            len,
        }
    }
}

impl Iterator for Arange {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            None
        } else {
            let i = self.index;
            self.index += 1;
            Some(self.start + self.step * i as f64)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Arange {}

#[test]
fn test_arange_integer_step() {
    let samples: Vec<_> = Arange::new(0., 5., 1.).collect();

    assert_eq!(samples, vec![0., 1., 2., 3., 4.]);
}

#[test]
fn test_arange_uneven_step() {
    let samples: Vec<_> = Arange::new(0., 5., 2.).collect();

    assert_eq!(samples, vec![0., 2., 4.]);
}

#[test]
fn test_arange_fractional_step_stays_below_stop() {
    let samples: Vec<_> = Arange::new(0., 1., 0.1).collect();

    assert_eq!(samples.len(), 10);
    assert!(samples.iter().all(|s| *s < 1.));
}

#[test]
fn test_arange_empty() {
    assert_eq!(Arange::new(3., 3., 1.).len(), 0);
    assert_eq!(Arange::new(4., 3., 1.).len(), 0);
}
