use tracing::{debug, warn};

use super::domain::{FormData, FormDataPatch, ValidationErrors};
use super::steps::{FormStep, StepFlow, StepPosition};
use super::store::{ProgressStore, StoreError, PROGRESS_KEY};
use super::validation::StepValidator;
use crate::config::WizardConfig;

/// Single-owner wizard state: the Answer Set, the current error map and the
/// store that keeps a copy of the answers between visits.
#[derive(Debug)]
pub struct FormSession<S> {
    data: FormData,
    seed: FormData,
    errors: ValidationErrors,
    flow: StepFlow,
    validator: StepValidator,
    store: S,
}

impl<S: ProgressStore> FormSession<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, &WizardConfig::default())
    }

    pub fn with_config(store: S, config: &WizardConfig) -> Self {
        Self::seeded(store, config, FormData::default())
    }

    /// Start from prepared answers, e.g. `generate_smart_defaults` for the
    /// visitor's city. Resets return to this seed.
    pub fn seeded(store: S, config: &WizardConfig, seed: FormData) -> Self {
        Self {
            data: seed.clone(),
            seed,
            errors: ValidationErrors::new(),
            flow: StepFlow::new(config.total_steps),
            validator: StepValidator::from(config),
            store,
        }
    }

    /// Start a session and pick up any progress left in the store.
    pub fn resume(store: S, config: &WizardConfig) -> Self {
        let mut session = Self::with_config(store, config);
        session.load_saved_progress();
        session
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn current_step(&self) -> StepPosition {
        self.data.current_step
    }

    pub fn steps(&self) -> Vec<FormStep> {
        self.flow.steps(&self.data)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Shallow-merge a patch into the answers. No validation happens here.
    pub fn update_form_data(&mut self, patch: FormDataPatch) {
        self.data.apply(patch);
        self.clamp_step();
        self.autosave();
    }

    pub fn next_step(&mut self) {
        self.data.current_step = self.flow.next(self.data.current_step, &self.data);
        self.autosave();
    }

    pub fn prev_step(&mut self) {
        self.data.current_step = self.flow.previous(self.data.current_step, &self.data);
        self.autosave();
    }

    /// Validate the current step and move forward only when it is clean.
    pub fn advance(&mut self) -> bool {
        let errors = self.validator.validate(&self.data, self.data.current_step);
        if !errors.is_empty() {
            debug!(step = %self.data.current_step, errors = errors.len(), "step blocked");
            self.set_errors(errors);
            return false;
        }
        self.errors.clear();
        self.next_step();
        true
    }

    pub fn retreat(&mut self) {
        self.errors.clear();
        self.prev_step();
    }

    pub fn reset_form(&mut self) {
        self.data = self.seed.clone();
        self.errors.clear();
        self.forget();
    }

    /// Replaces the error map wholesale.
    pub fn set_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }

    pub fn save_progress(&self) -> Result<(), StoreError> {
        let blob = serde_json::to_string(&self.data).map_err(|err| {
            StoreError::Unavailable(format!("answers could not be serialized: {err}"))
        })?;
        self.store.write(PROGRESS_KEY, &blob)
    }

    /// Restore saved answers. Returns `false` and keeps defaults when nothing
    /// usable is stored.
    pub fn load_saved_progress(&mut self) -> bool {
        let blob = match self.store.read(PROGRESS_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return false,
            Err(err) => {
                warn!(error = %err, "saved progress could not be read");
                return false;
            }
        };

        match serde_json::from_str::<FormData>(&blob) {
            Ok(data) => {
                self.data = data;
                self.clamp_step();
                debug!(step = %self.data.current_step, "restored saved progress");
                true
            }
            Err(err) => {
                warn!(error = %err, "discarding corrupt saved progress");
                self.data = self.seed.clone();
                false
            }
        }
    }

    /// Mark the answers submitted and drop the saved copy.
    pub fn complete(&mut self) {
        self.data.is_complete = true;
        self.errors.clear();
        self.forget();
    }

    fn clamp_step(&mut self) {
        let last = self.flow.last();
        if self.data.current_step > last {
            self.data.current_step = last;
        }
    }

    fn autosave(&self) {
        if !self.data.is_non_trivial() {
            return;
        }
        if let Err(err) = self.save_progress() {
            warn!(error = %err, "failed to save form progress");
        }
    }

    fn forget(&self) {
        if let Err(err) = self.store.remove(PROGRESS_KEY) {
            warn!(error = %err, "failed to clear saved form progress");
        }
    }
}
