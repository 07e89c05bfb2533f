/// Fault injection strategy for simulated tasks.
///
/// Decisions must be a pure function of the inputs so a batch fails the same
/// way on every run.
pub trait FaultPolicy: Send + Sync {
    fn name(&self) -> &str;
    fn should_fail(&self, task_index: usize, task_name: &str) -> bool;
}
