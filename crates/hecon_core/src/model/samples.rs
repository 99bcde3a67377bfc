//! Sampled parameter values, one column per parameter

use rustc_hash::FxHashMap;

/// Monte Carlo parameter draws: `n_iterations` values for every parameter.
///
/// Built once by the sampler and read-only afterwards. Column order follows
/// the parameter table.
#[derive(Debug, Clone)]
pub struct ParameterSamples {
    names: Vec<String>,
    index: FxHashMap<String, usize>,
    columns: Vec<Vec<f64>>,
    n_iterations: usize,
}

impl ParameterSamples {
    /// Create from named columns. Returns `None` when the name and column counts
    /// differ, when columns have unequal lengths, or when a name repeats.
    #[must_use]
    pub fn from_columns(names: Vec<String>, columns: Vec<Vec<f64>>) -> Option<Self> {
        if names.len() != columns.len() {
            return None;
        }
        let n_iterations = columns.first().map_or(0, Vec::len);
        if columns.iter().any(|c| c.len() != n_iterations) {
            return None;
        }

        let mut index = FxHashMap::default();
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return None;
            }
        }

        Some(Self {
            names,
            index,
            columns,
            n_iterations,
        })
    }

    /// Build from sampler output: names are unique and every column holds
    /// `n_iterations` values
    pub(crate) fn from_sampled(
        names: Vec<String>,
        columns: Vec<Vec<f64>>,
        n_iterations: usize,
    ) -> Self {
        debug_assert_eq!(names.len(), columns.len());
        debug_assert!(columns.iter().all(|c| c.len() == n_iterations));
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            names,
            index,
            columns,
            n_iterations,
        }
    }

    #[must_use]
    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }

    #[must_use]
    pub fn n_parameters(&self) -> usize {
        self.names.len()
    }

    /// Parameter names in column order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// All draws of one parameter
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.index.get(name).map(|&i| self.columns[i].as_slice())
    }

    /// Iterate `(name, draws)` in column order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(n, c)| (n.as_str(), c.as_slice()))
    }

    /// View of a single iteration's parameter vector
    ///
    /// # Panics
    /// Panics if `iteration >= n_iterations()`.
    #[must_use]
    pub fn draw(&self, iteration: usize) -> ParameterDraw<'_> {
        assert!(
            iteration < self.n_iterations,
            "iteration {iteration} out of range ({} iterations)",
            self.n_iterations
        );
        ParameterDraw {
            samples: self,
            iteration,
        }
    }
}

/// One iteration's parameter vector, borrowed from [`ParameterSamples`]
#[derive(Debug, Clone, Copy)]
pub struct ParameterDraw<'a> {
    samples: &'a ParameterSamples,
    iteration: usize,
}

impl<'a> ParameterDraw<'a> {
    #[must_use]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Value of a parameter in this iteration
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.samples
            .index
            .get(name)
            .map(|&i| self.samples.columns[i][self.iteration])
    }

    /// Iterate `(name, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        let iteration = self.iteration;
        let samples: &'a ParameterSamples = self.samples;
        samples
            .columns()
            .map(move |(name, column)| (name, column[iteration]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> ParameterSamples {
        ParameterSamples::from_columns(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_draw_lookup() {
        let s = samples();
        assert_eq!(s.n_iterations(), 3);
        assert_eq!(s.n_parameters(), 2);

        let draw = s.draw(1);
        assert_eq!(draw.iteration(), 1);
        assert_eq!(draw.get("a"), Some(2.0));
        assert_eq!(draw.get("b"), Some(20.0));
        assert_eq!(draw.get("c"), None);

        let pairs: Vec<_> = s.draw(2).iter().collect();
        assert_eq!(pairs, vec![("a", 3.0), ("b", 30.0)]);
    }

    #[test]
    fn test_from_columns_rejects_bad_shapes() {
        assert!(ParameterSamples::from_columns(vec!["a".into()], vec![]).is_none());
        assert!(
            ParameterSamples::from_columns(
                vec!["a".into(), "b".into()],
                vec![vec![1.0], vec![1.0, 2.0]]
            )
            .is_none()
        );
        assert!(
            ParameterSamples::from_columns(
                vec!["a".into(), "a".into()],
                vec![vec![1.0], vec![2.0]]
            )
            .is_none()
        );
    }
}
