use crate::types::{ColorStep, SequenceError};
use heapless::Vec;

/// An ordered, never-empty list of color steps played in a loop.
///
/// Sequences are replaced wholesale; there is no in-place editing beyond the
/// per-step timers the sequencer advances.
///
/// # Type Parameters
/// * `N` - Maximum number of steps this sequence can hold
#[derive(Debug, Clone, PartialEq)]
pub struct PatternSequence<const N: usize> {
    steps: Vec<ColorStep, N>,
}

impl<const N: usize> PatternSequence<N> {
    /// Creates a new sequence builder.
    pub fn builder() -> SequenceBuilder<N> {
        SequenceBuilder::new()
    }

    /// The one-step default sequence: every LED off.
    pub fn blank() -> Self {
        const { assert!(N > 0, "pattern sequences need room for at least one step") };

        let mut steps = Vec::new();
        let _ = steps.push(ColorStep::DEFAULT);
        Self { steps }
    }

    /// Returns the number of steps in this sequence.
    #[inline]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Returns a reference to the step at the given index.
    pub fn get_step(&self, index: usize) -> Option<&ColorStep> {
        self.steps.get(index)
    }

    pub(crate) fn get_step_mut(&mut self, index: usize) -> Option<&mut ColorStep> {
        self.steps.get_mut(index)
    }

    /// All steps in playback order.
    pub fn steps(&self) -> &[ColorStep] {
        &self.steps
    }
}

impl<const N: usize> Default for PatternSequence<N> {
    fn default() -> Self {
        Self::blank()
    }
}

/// Builder for constructing non-empty pattern sequences.
#[derive(Debug)]
pub struct SequenceBuilder<const N: usize> {
    steps: Vec<ColorStep, N>,
}

impl<const N: usize> SequenceBuilder<N> {
    /// Creates a new empty sequence builder.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a step.
    ///
    /// # Errors
    /// * `CapacityExceeded` - The builder already holds `N` steps
    pub fn step(mut self, step: ColorStep) -> Result<Self, SequenceError> {
        self.push(step)?;
        Ok(self)
    }

    /// Appends a step in place.
    pub fn push(&mut self, step: ColorStep) -> Result<(), SequenceError> {
        self.steps
            .push(step)
            .map_err(|_| SequenceError::CapacityExceeded)
    }

    /// Number of steps added so far.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no steps have been added.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Builds the sequence.
    ///
    /// # Errors
    /// * `EmptySequence` - No steps were added
    pub fn build(self) -> Result<PatternSequence<N>, SequenceError> {
        if self.steps.is_empty() {
            return Err(SequenceError::EmptySequence);
        }

        Ok(PatternSequence { steps: self.steps })
    }
}

impl<const N: usize> Default for SequenceBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}
