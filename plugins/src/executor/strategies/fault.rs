use std::collections::BTreeSet;

use taskpool_core::executor::traits::FaultPolicy;

/// Fails task `i` when `i % n == 0`.
pub struct EveryNthFaultPlugin {
    n: usize,
}

/// Fails exactly the listed task indices.
pub struct FaultSetPlugin {
    indices: BTreeSet<usize>,
}

pub struct NeverFaultPlugin;

pub struct AlwaysFaultPlugin;

impl EveryNthFaultPlugin {
    pub fn new(n: usize) -> Self {
        Self { n: n.max(1) }
    }
}

impl FaultSetPlugin {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
        }
    }
}

impl FaultPolicy for EveryNthFaultPlugin {
    fn name(&self) -> &str {
        "every-nth"
    }

    fn should_fail(&self, task_index: usize, _task_name: &str) -> bool {
        task_index % self.n == 0
    }
}

impl FaultPolicy for FaultSetPlugin {
    fn name(&self) -> &str {
        "fault-set"
    }

    fn should_fail(&self, task_index: usize, _task_name: &str) -> bool {
        self.indices.contains(&task_index)
    }
}

impl FaultPolicy for NeverFaultPlugin {
    fn name(&self) -> &str {
        "never"
    }

    fn should_fail(&self, _task_index: usize, _task_name: &str) -> bool {
        false
    }
}

impl FaultPolicy for AlwaysFaultPlugin {
    fn name(&self) -> &str {
        "always"
    }

    fn should_fail(&self, _task_index: usize, _task_name: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_nth() {
        let plugin = EveryNthFaultPlugin::new(5);
        let failing: Vec<usize> = (0..12).filter(|&i| plugin.should_fail(i, "t")).collect();
        assert_eq!(failing, vec![0, 5, 10]);
    }

    #[test]
    fn test_every_nth_zero_is_clamped() {
        let plugin = EveryNthFaultPlugin::new(0);
        assert!((0..4).all(|i| plugin.should_fail(i, "t")));
    }

    #[test]
    fn test_fault_set() {
        let plugin = FaultSetPlugin::new([1, 3]);
        assert!(!plugin.should_fail(0, "a"));
        assert!(plugin.should_fail(1, "b"));
        assert!(plugin.should_fail(3, "d"));
    }

    #[test]
    fn test_constant_policies() {
        assert!(!NeverFaultPlugin.should_fail(0, "x"));
        assert!(AlwaysFaultPlugin.should_fail(42, "x"));
    }
}
