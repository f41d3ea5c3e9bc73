use crate::{error::Result, NeatError, NeuralNetwork};

/// Feeds known cases through a [`NeuralNetwork`] and keeps track of the mean squared error.
#[derive(Debug, Clone)]
pub struct NetworkTester {
    network: NeuralNetwork,
    total_mse: f32,
    test_count: usize,
}

impl NetworkTester {
    /// Creates a tester with no recorded cases.
    pub fn new(network: NeuralNetwork) -> Self {
        Self {
            network,
            total_mse: 0.,
            test_count: 0,
        }
    }

    /// Runs one case and returns its mean squared error.
    /// Only the first `expected.len()` outputs are compared.
    pub fn test(&mut self, inputs: &[f32], expected: &[f32]) -> Result<f32> {
        let actual = self.network.activate(inputs)?;

        if expected.len() > actual.len() {
            return Err(NeatError::OutputArity {
                expected: actual.len(),
                found: expected.len(),
            });
        }

        let sum_squared_error: f32 = expected
            .iter()
            .zip(&actual)
            .map(|(e, a)| (e - a) * (e - a))
            .sum();

        // an empty expectation has nothing to be wrong about.
        let mse = if expected.is_empty() {
            0.
        } else {
            sum_squared_error / expected.len() as f32
        };

        self.total_mse += mse;
        self.test_count += 1;

        tracing::info!(
            test = self.test_count,
            mse,
            ?inputs,
            ?expected,
            ?actual,
            "tested network"
        );

        Ok(mse)
    }

    /// Runs every case of a truth table and returns the average error over all recorded cases.
    pub fn test_all<'a>(
        &mut self,
        cases: impl IntoIterator<Item = (&'a [f32], &'a [f32])>,
    ) -> Result<f32> {
        for (inputs, expected) in cases {
            self.test(inputs, expected)?;
        }

        Ok(self.average_mse())
    }

    /// Average error over every recorded case, or `0` if there are none.
    pub fn average_mse(&self) -> f32 {
        if self.test_count == 0 {
            return 0.;
        }

        self.total_mse / self.test_count as f32
    }

    /// Number of recorded cases.
    pub fn test_count(&self) -> usize {
        self.test_count
    }

    /// The network under test, including its last [`node_values`][NeuralNetwork::node_values].
    pub fn network(&self) -> &NeuralNetwork {
        &self.network
    }

    /// Logs the summary of every recorded case.
    pub fn report(&self) {
        tracing::info!(
            tests = self.test_count,
            average_mse = self.average_mse(),
            "testing complete"
        );
    }
}
