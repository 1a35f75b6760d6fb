use crate::result::AiError;

/// A model with a two-state lifecycle: untrained → trained.
///
/// Training inputs are provided by callers (simulator, dashboard); this crate
/// stays storage-agnostic. Retraining replaces the fitted state wholesale.
pub trait TrainableModel {
    /// Training dataset (usually a slice of readings or movements).
    type Dataset: ?Sized;
    /// A single prediction input.
    type Input: ?Sized;
    type Output;
    /// Summary returned by a successful `train`.
    type Report;

    /// Stable model name, used in errors and logs.
    fn name(&self) -> &'static str;

    fn is_trained(&self) -> bool;

    fn train(&mut self, data: &Self::Dataset) -> Result<Self::Report, AiError>;

    /// Must not mutate model state: identical input and trained state give
    /// identical output.
    fn predict(&self, input: &Self::Input) -> Result<Self::Output, AiError>;

    fn ensure_trained(&self) -> Result<(), AiError> {
        if self.is_trained() {
            Ok(())
        } else {
            Err(AiError::NotReady(self.name()))
        }
    }
}
